//! Scanner for `KANJI[READING]` furigana notation.

use thiserror::Error;
use tracing::debug;

use crate::kana::is_kanji;

// Anki media references share the bracket syntax but are not readings.
const MEDIA_PREFIX: &str = "sound:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub open: char,
    pub close: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            open: '[',
            close: ']',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("reading opened at byte {offset} is never closed")]
    UnterminatedReading { offset: usize },
    #[error("empty reading for {kanji:?} at byte {offset}")]
    EmptyReading { kanji: String, offset: usize },
    #[error("nested '{delimiter}' inside reading at byte {offset}")]
    NestedDelimiter { delimiter: char, offset: usize },
}

/// A kanji run and the reading annotating it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuriganaToken {
    pub kanji: String,
    pub reading: String,
    /// The annotation exactly as written, delimiters included.
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Plain(String),
    Furigana(FuriganaToken),
}

impl Token {
    /// The input text this token was scanned from.
    pub fn source(&self) -> &str {
        match self {
            Token::Plain(text) => text,
            Token::Furigana(token) => &token.source,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Plain,
    InKanjiRun { start: usize },
    InReading { start: usize, open_at: usize },
}

/// Splits `text` into plain runs and furigana tokens.
///
/// Kanji not followed by the open delimiter stay plain text, as do stray
/// delimiters outside a reading. Concatenating every token's
/// [`Token::source`] gives back `text`.
pub fn parse(text: &str, delimiters: Delimiters) -> Result<Vec<Token>, ParseError> {
    let Delimiters { open, close } = delimiters;
    let mut tokens = Vec::new();
    let mut plain_start = 0;
    let mut state = State::Plain;

    for (idx, ch) in text.char_indices() {
        state = match state {
            State::Plain if is_kanji(ch) => State::InKanjiRun { start: idx },
            State::Plain => State::Plain,
            State::InKanjiRun { start } if is_kanji(ch) => State::InKanjiRun { start },
            State::InKanjiRun { start } if ch == open => State::InReading {
                start,
                open_at: idx,
            },
            State::InKanjiRun { .. } => State::Plain,
            State::InReading { start, open_at } if ch == close => {
                let kanji = &text[start..open_at];
                let reading = &text[open_at + open.len_utf8()..idx];
                if reading.is_empty() {
                    return Err(ParseError::EmptyReading {
                        kanji: kanji.to_string(),
                        offset: open_at,
                    });
                }

                if !reading.starts_with(MEDIA_PREFIX) {
                    if plain_start < start {
                        tokens.push(Token::Plain(text[plain_start..start].to_string()));
                    }
                    let end = idx + close.len_utf8();
                    tokens.push(Token::Furigana(FuriganaToken {
                        kanji: kanji.to_string(),
                        reading: reading.to_string(),
                        source: text[start..end].to_string(),
                    }));
                    plain_start = end;
                }
                State::Plain
            }
            State::InReading { .. } if ch == open => {
                return Err(ParseError::NestedDelimiter {
                    delimiter: open,
                    offset: idx,
                });
            }
            reading @ State::InReading { .. } => reading,
        };
    }

    if let State::InReading { open_at, .. } = state {
        return Err(ParseError::UnterminatedReading { offset: open_at });
    }
    if plain_start < text.len() {
        tokens.push(Token::Plain(text[plain_start..].to_string()));
    }

    debug!(tokens = tokens.len(), "parsed furigana text");
    Ok(tokens)
}
