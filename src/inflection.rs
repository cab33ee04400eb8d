//! Locating an inflected occurrence of a dictionary word in a sentence.
//!
//! Morphological analysis itself lives outside this crate; callers plug an
//! analyzer in through [`MorphologicalAnalyzer`].

use std::ops::Range;

use tracing::debug;

use crate::kana::fold;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Morpheme {
    /// Text as it appears in the sentence.
    pub surface: String,
    /// Dictionary (uninflected) form.
    pub base_form: String,
    /// Observed reading, in either kana script.
    pub reading: String,
}

pub trait MorphologicalAnalyzer {
    /// Splits `sentence` into morphemes whose surfaces concatenate back to it.
    fn analyze(&self, sentence: &str) -> Vec<Morpheme>;
}

/// An occurrence of a word as it was actually written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InflectedMatch {
    /// Byte range of the occurrence in the sentence.
    pub range: Range<usize>,
    pub surface: String,
    /// Reading of the occurrence with katakana folded to hiragana, suitable
    /// as a reading override. Nothing else about it is changed.
    pub reading: String,
}

/// Finds the first run of morphemes whose base forms spell `target_word`.
pub fn find_inflected(
    sentence: &str,
    target_word: &str,
    analyzer: &dyn MorphologicalAnalyzer,
) -> Option<InflectedMatch> {
    if target_word.is_empty() {
        return None;
    }

    let morphemes = analyzer.analyze(sentence);
    let mut offsets = Vec::with_capacity(morphemes.len() + 1);
    let mut offset = 0;
    offsets.push(offset);
    for morpheme in &morphemes {
        offset += morpheme.surface.len();
        offsets.push(offset);
    }

    for start in 0..morphemes.len() {
        let mut base = String::new();
        for end in start..morphemes.len() {
            base.push_str(&morphemes[end].base_form);
            if !target_word.starts_with(base.as_str()) {
                break;
            }
            if base != target_word {
                continue;
            }

            let run = &morphemes[start..=end];
            let range = offsets[start]..offsets[end + 1];
            let found = InflectedMatch {
                surface: run.iter().map(|m| m.surface.as_str()).collect(),
                reading: fold(&run.iter().map(|m| m.reading.as_str()).collect::<String>()),
                range,
            };
            debug!(target_word, surface = %found.surface, reading = %found.reading, "found inflected form");
            return Some(found);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns a canned analysis regardless of input.
    struct Canned(Vec<(&'static str, &'static str, &'static str)>);

    impl MorphologicalAnalyzer for Canned {
        fn analyze(&self, _sentence: &str) -> Vec<Morpheme> {
            self.0
                .iter()
                .map(|&(surface, base_form, reading)| Morpheme {
                    surface: surface.to_string(),
                    base_form: base_form.to_string(),
                    reading: reading.to_string(),
                })
                .collect()
        }
    }

    #[test]
    fn finds_inflected_verb() {
        let sentence = "本を読みました";
        let analyzer = Canned(vec![
            ("本", "本", "ホン"),
            ("を", "を", "ヲ"),
            ("読み", "読む", "ヨミ"),
            ("まし", "ます", "マシ"),
            ("た", "た", "タ"),
        ]);

        let found = find_inflected(sentence, "読む", &analyzer).expect("verb found");
        assert_eq!(found.surface, "読み");
        assert_eq!(found.reading, "よみ");
        assert_eq!(&sentence[found.range.clone()], "読み");
        assert_eq!(found.range, 6..12);
    }

    #[test]
    fn joins_multi_morpheme_words() {
        let analyzer = Canned(vec![
            ("勉強", "勉強", "ベンキョウ"),
            ("し", "する", "シ"),
            ("た", "た", "タ"),
        ]);

        let found = find_inflected("勉強した", "勉強する", &analyzer).expect("compound verb found");
        assert_eq!(found.surface, "勉強し");
        assert_eq!(found.reading, "べんきょうし");
        assert_eq!(found.range, 0..9);
    }

    #[test]
    fn reading_is_kept_as_observed() {
        let analyzer = Canned(vec![("コーヒー", "コーヒー", "コーヒー"), ("を", "を", "ヲ")]);

        let found = find_inflected("コーヒーを", "コーヒー", &analyzer).expect("loanword found");
        assert_eq!(found.reading, "こーひー");
        assert_eq!(found.range, 0..12);
    }

    #[test]
    fn missing_word_is_none() {
        let analyzer = Canned(vec![("本", "本", "ホン")]);
        assert_eq!(find_inflected("本", "読む", &analyzer), None);
        assert_eq!(find_inflected("本", "", &analyzer), None);
    }
}
