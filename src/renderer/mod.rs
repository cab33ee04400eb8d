pub mod bracket;
pub mod kana;

use crate::furigana::Delimiters;

pub use self::{bracket::BracketRenderer, kana::KanaRenderer};

/// A piece of output text with the markup wrapped around it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Marked<'a> {
    pub text: &'a str,
    pub open: &'a str,
    pub close: &'a str,
}

impl<'a> Marked<'a> {
    pub fn plain(text: &'a str) -> Self {
        Self {
            text,
            open: "",
            close: "",
        }
    }

    pub fn new(text: &'a str, open: &'a str, close: &'a str) -> Self {
        Self { text, open, close }
    }

    pub fn write_to(&self, out: &mut String) {
        out.push_str(self.open);
        out.push_str(self.text);
        out.push_str(self.close);
    }
}

/// How a kanji and its reading are written back out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Notation {
    /// `漢字[かんじ]`
    #[default]
    Furigana,
    /// `かんじ[漢字]`
    Furikanji,
    /// `かんじ`
    KanaOnly,
}

impl Notation {
    pub fn renderer(self, delimiters: Delimiters) -> Box<dyn RubyRenderer> {
        match self {
            Notation::Furigana => Box::new(BracketRenderer::new(delimiters, false)),
            Notation::Furikanji => Box::new(BracketRenderer::new(delimiters, true)),
            Notation::KanaOnly => Box::new(KanaRenderer),
        }
    }
}

/// A pluggable writer for "ruby" pairs: a run of kanji and the reading above it.
pub trait RubyRenderer: Send + Sync {
    /// Appends `kanji` annotated with `reading` to `out`.
    fn render(&self, out: &mut String, kanji: Marked<'_>, reading: Marked<'_>);
}
