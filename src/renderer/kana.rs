use super::{Marked, RubyRenderer};

/// Drops the kanji and writes only the reading. Kanji markup still wraps it
/// so a highlighted kanji stays visible.
pub struct KanaRenderer;

impl RubyRenderer for KanaRenderer {
    fn render(&self, out: &mut String, kanji: Marked<'_>, reading: Marked<'_>) {
        out.push_str(kanji.open);
        reading.write_to(out);
        out.push_str(kanji.close);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_reading_inside_kanji_markup() {
        let mut out = String::new();
        KanaRenderer.render(
            &mut out,
            Marked::new("漢", "<b>", "</b>"),
            Marked::new("かん", "<on>", "</on>"),
        );
        KanaRenderer.render(&mut out, Marked::plain("字"), Marked::plain("じ"));
        assert_eq!(out, "<b><on>かん</on></b>じ");
    }
}
