use super::{Marked, RubyRenderer};
use crate::furigana::Delimiters;

/// Writes `base[ruby]`, with either the kanji or the reading as the base.
pub struct BracketRenderer {
    delimiters: Delimiters,
    /// when true the reading is the base and the kanji goes in brackets
    reading_first: bool,
}

impl BracketRenderer {
    pub fn new(delimiters: Delimiters, reading_first: bool) -> Self {
        Self {
            delimiters,
            reading_first,
        }
    }
}

impl RubyRenderer for BracketRenderer {
    fn render(&self, out: &mut String, kanji: Marked<'_>, reading: Marked<'_>) {
        let (base, ruby) = if self.reading_first {
            (reading, kanji)
        } else {
            (kanji, reading)
        };

        base.write_to(out);
        out.push(self.delimiters.open);
        ruby.write_to(out);
        out.push(self.delimiters.close);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn furigana_and_furikanji_order() {
        let kanji = Marked::new("本", "<b>", "</b>");
        let reading = Marked::new("ほん", "<on>", "</on>");

        let mut out = String::new();
        BracketRenderer::new(Delimiters::default(), false).render(&mut out, kanji, reading);
        assert_eq!(out, "<b>本</b>[<on>ほん</on>]");

        let mut out = String::new();
        BracketRenderer::new(Delimiters::default(), true).render(&mut out, kanji, reading);
        assert_eq!(out, "<on>ほん</on>[<b>本</b>]");
    }

    #[test]
    fn uses_configured_delimiters() {
        let delimiters = Delimiters {
            open: '《',
            close: '》',
        };
        let mut out = String::new();
        BracketRenderer::new(delimiters, false).render(
            &mut out,
            Marked::plain("漢字"),
            Marked::plain("かんじ"),
        );
        assert_eq!(out, "漢字《かんじ》");
    }
}
