//! Re-emits furigana text with one kanji's share of the reading marked up.

use std::borrow::Cow;

use rustc_hash::FxHashMap;
use tracing::{debug, debug_span};

use crate::{
    align::{Aligner, AlignmentSpan},
    classify::ReadingType,
    dictionary::ReadingLookup,
    furigana::{Delimiters, FuriganaToken, ParseError, Token, parse},
    kana::{byte_offset, to_katakana},
    renderer::{Marked, Notation, RubyRenderer},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Kanji,
    On,
    Kun,
    Jukujikun,
    Okurigana,
}

impl Tag {
    /// Tag for a reading of the given type; unknown readings get none.
    pub fn for_reading(reading_type: ReadingType) -> Option<Tag> {
        match reading_type {
            ReadingType::On => Some(Tag::On),
            ReadingType::Kun => Some(Tag::Kun),
            ReadingType::Jukujikun => Some(Tag::Jukujikun),
            ReadingType::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    pub open: String,
    pub close: String,
}

impl Markup {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

/// Markup per tag. Missing tags wrap nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap(FxHashMap<Tag, Markup>);

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tag: Tag, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.0.insert(tag, Markup::new(open, close));
        self
    }

    pub fn get(&self, tag: Tag) -> Option<&Markup> {
        self.0.get(&tag)
    }

    fn mark<'a>(&'a self, text: &'a str, tag: Option<Tag>) -> Marked<'a> {
        match tag.and_then(|tag| self.get(tag)) {
            Some(markup) => Marked::new(text, &markup.open, &markup.close),
            None => Marked::plain(text),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Every furigana token is split and each span tagged by reading type.
    SplitAll,
    /// Only the target's span is split out; everything else is left as written.
    #[default]
    Passthrough,
}

#[derive(Debug, Clone, Default)]
pub struct HighlightRequest {
    pub target_kanji: Option<char>,
    pub mode: Mode,
    pub tags: TagMap,
    pub notation: Notation,
    /// Emit on-readings in katakana wherever a span is written out on its own.
    pub katakana_on: bool,
    pub delimiters: Delimiters,
    /// Reading to align instead of the written one, for the first furigana
    /// token holding the target (or the first token when there is no target).
    pub reading_override: Option<String>,
}

impl HighlightRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, kanji: char) -> Self {
        self.target_kanji = Some(kanji);
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_tags(mut self, tags: TagMap) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_notation(mut self, notation: Notation) -> Self {
        self.notation = notation;
        self
    }

    pub fn with_katakana_on(mut self, katakana_on: bool) -> Self {
        self.katakana_on = katakana_on;
        self
    }

    pub fn with_delimiters(mut self, delimiters: Delimiters) -> Self {
        self.delimiters = delimiters;
        self
    }

    pub fn with_reading_override(mut self, reading: impl Into<String>) -> Self {
        self.reading_override = Some(reading.into());
        self
    }

    fn is_target(&self, kanji: &str) -> bool {
        self.target_kanji.is_some_and(|target| kanji.contains(target))
    }

    /// Index of the token `reading_override` replaces the reading of.
    fn override_index(&self, tokens: &[Token]) -> Option<usize> {
        self.reading_override.as_ref()?;
        tokens.iter().position(|token| match token {
            Token::Furigana(furigana) => {
                self.target_kanji.is_none() || self.is_target(&furigana.kanji)
            }
            Token::Plain(_) => false,
        })
    }
}

/// Runs parsed furigana through the aligner and writes it back out.
///
/// Cheap to construct; share one across threads for batch work.
#[derive(Clone, Copy)]
pub struct Highlighter<'d> {
    aligner: Aligner<'d>,
}

impl<'d> Highlighter<'d> {
    pub fn new(dictionary: &'d dyn ReadingLookup) -> Self {
        Self {
            aligner: Aligner::new(dictionary),
        }
    }

    pub fn highlight(&self, text: &str, request: &HighlightRequest) -> Result<String, ParseError> {
        let _span = debug_span!("highlight", target_kanji = ?request.target_kanji, mode = ?request.mode)
            .entered();
        let tokens = parse(text, request.delimiters)?;
        Ok(self.highlight_tokens(&tokens, request))
    }

    /// Highlights many texts independently on the rayon pool.
    #[cfg(feature = "parallel")]
    pub fn highlight_batch<S>(
        &self,
        texts: &[S],
        request: &HighlightRequest,
    ) -> Vec<Result<String, ParseError>>
    where
        S: AsRef<str> + Sync,
    {
        use rayon::prelude::*;

        texts
            .par_iter()
            .map(|text| self.highlight(text.as_ref(), request))
            .collect()
    }

    pub fn highlight_tokens(&self, tokens: &[Token], request: &HighlightRequest) -> String {
        let renderer = request.notation.renderer(request.delimiters);
        let override_at = request.override_index(tokens);
        let mut out = String::new();
        let mut okurigana = 0;

        for (idx, token) in tokens.iter().enumerate() {
            match token {
                Token::Plain(text) => {
                    self.write_plain(&mut out, text, okurigana, request);
                    okurigana = 0;
                }
                Token::Furigana(furigana) => {
                    let reading = match (override_at == Some(idx), &request.reading_override) {
                        (true, Some(reading)) => reading.as_str(),
                        _ => furigana.reading.as_str(),
                    };
                    let following = match tokens.get(idx + 1) {
                        Some(Token::Plain(text)) => text.as_str(),
                        _ => "",
                    };
                    okurigana = self.write_furigana(
                        &mut out,
                        renderer.as_ref(),
                        furigana,
                        reading,
                        following,
                        request,
                    );
                }
            }
        }

        out
    }

    fn write_plain(&self, out: &mut String, text: &str, okurigana: usize, request: &HighlightRequest) {
        let split = byte_offset(text, okurigana);
        match request.tags.get(Tag::Okurigana) {
            Some(markup) if split > 0 => {
                out.push_str(&markup.open);
                out.push_str(&text[..split]);
                out.push_str(&markup.close);
                out.push_str(&text[split..]);
            }
            _ => out.push_str(text),
        }
    }

    /// Writes one furigana token and returns how many chars of the following
    /// plain text are okurigana of a tagged span.
    fn write_furigana(
        &self,
        out: &mut String,
        renderer: &dyn RubyRenderer,
        token: &FuriganaToken,
        reading: &str,
        following: &str,
        request: &HighlightRequest,
    ) -> usize {
        if request.mode == Mode::Passthrough && !request.is_target(&token.kanji) {
            if reading == token.reading {
                out.push_str(&token.source);
            } else {
                write_ruby(out, renderer, Marked::plain(&token.kanji), Marked::plain(reading));
            }
            return 0;
        }

        let alignment = self.aligner.align(&token.kanji, reading, following);
        if !alignment.is_complete() {
            debug!(kanji = %token.kanji, reading, "best-effort alignment");
        }

        let mut untouched: Vec<&AlignmentSpan> = Vec::new();
        let mut last_tagged = false;
        for span in &alignment.spans {
            let is_target = request.is_target(&span.kanji);
            if request.mode == Mode::Passthrough && !is_target {
                untouched.push(span);
                last_tagged = false;
                continue;
            }

            write_untouched(out, renderer, &mut untouched);
            let span_reading = match span.reading_type {
                ReadingType::On if request.katakana_on => Cow::Owned(to_katakana(&span.reading)),
                _ => Cow::Borrowed(span.reading.as_str()),
            };
            let kanji_tag = is_target.then_some(Tag::Kanji);
            write_ruby(
                out,
                renderer,
                request.tags.mark(&span.kanji, kanji_tag),
                request
                    .tags
                    .mark(&span_reading, Tag::for_reading(span.reading_type)),
            );
            last_tagged = true;
        }
        write_untouched(out, renderer, &mut untouched);

        if last_tagged { alignment.okurigana_len } else { 0 }
    }
}

/// Renders a ruby pair. Kanji left with no reading are written bare, since
/// an empty annotation does not parse.
fn write_ruby(out: &mut String, renderer: &dyn RubyRenderer, kanji: Marked<'_>, reading: Marked<'_>) {
    if reading.text.is_empty() {
        kanji.write_to(out);
    } else {
        renderer.render(out, kanji, reading);
    }
}

/// Writes consecutive untargeted spans back as one unsplit annotation.
fn write_untouched(out: &mut String, renderer: &dyn RubyRenderer, spans: &mut Vec<&AlignmentSpan>) {
    if spans.is_empty() {
        return;
    }
    let kanji: String = spans.iter().map(|span| span.kanji.as_str()).collect();
    let reading: String = spans.iter().map(|span| span.reading.as_str()).collect();
    write_ruby(out, renderer, Marked::plain(&kanji), Marked::plain(&reading));
    spans.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;

    fn dictionary() -> Dictionary {
        Dictionary::builder()
            .kanjidic('日', "ニチ、ジツ", "ひ、-び、-か")
            .kanjidic('本', "ホン", "もと")
            .kanjidic('語', "ゴ", "かた.る")
            .build()
    }

    #[test]
    fn override_picks_the_target_token() {
        let tokens = parse("日[ひ]本[ほん]", Delimiters::default()).unwrap();
        let request = HighlightRequest::new()
            .with_target('本')
            .with_reading_override("もと");
        assert_eq!(request.override_index(&tokens), Some(1));

        let request = HighlightRequest::new().with_reading_override("に");
        assert_eq!(request.override_index(&tokens), Some(0));

        assert_eq!(HighlightRequest::new().override_index(&tokens), None);
    }

    #[test]
    fn unknown_spans_get_no_reading_tag() {
        let dictionary = Dictionary::default();
        let request = HighlightRequest::new()
            .with_target('麟')
            .with_tags(TagMap::new().with(Tag::Kanji, "<b>", "</b>"));

        let out = Highlighter::new(&dictionary)
            .highlight("麒麟[きりん]", &request)
            .unwrap();
        assert_eq!(out, "麒[き]<b>麟</b>[りん]");
    }

    #[test]
    fn okurigana_is_not_tagged_without_markup() {
        let dictionary = dictionary();
        let request = HighlightRequest::new()
            .with_target('語')
            .with_tags(TagMap::new().with(Tag::Kun, "<kun>", "</kun>"));

        let out = Highlighter::new(&dictionary)
            .highlight("語[かた]る", &request)
            .unwrap();
        assert_eq!(out, "語[<kun>かた</kun>]る");
    }
}
