//! Splits furigana readings across the kanji they annotate and highlights
//! the part of a reading that belongs to a single kanji.
//!
//! ```text
//! 日本語[にほんご] + target 本  →  日[に]<b>本</b>[<on>ほん</on>]語[ご]
//! ```

pub mod align;
pub mod classify;
pub mod dictionary;
pub mod furigana;
pub mod highlight;
pub mod inflection;
pub mod kana;
pub mod phonetic;
pub mod renderer;

use thiserror::Error;

pub use crate::{
    align::{Aligner, Alignment, AlignmentSpan},
    classify::ReadingType,
    dictionary::{Dictionary, DictionaryEntry, KunReading, ReadingLookup},
    furigana::{Delimiters, ParseError, Token},
    highlight::{HighlightRequest, Highlighter, Mode, Tag, TagMap},
    inflection::{InflectedMatch, Morpheme, MorphologicalAnalyzer, find_inflected},
    phonetic::Normalization,
    renderer::{Notation, RubyRenderer},
};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("no reading dictionary installed; call Dictionary::install first")]
    DictionaryNotInstalled,
}

/// Highlights `text` against the installed process-wide dictionary.
pub fn highlight(text: &str, request: &HighlightRequest) -> Result<String, Error> {
    let dictionary = Dictionary::global().ok_or(Error::DictionaryNotInstalled)?;
    Ok(Highlighter::new(dictionary).highlight(text, request)?)
}
