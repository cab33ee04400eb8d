use crate::{kana::is_hiragana, phonetic::Normalization};

/// What kind of reading a span of furigana is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadingType {
    On,
    Kun,
    Jukujikun,
    Unknown,
}

/// Which dictionary list a span was matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchSource {
    On,
    Kun,
    Jukujikun,
}

/// A dictionary hit for one span, as found by the aligner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingMatch {
    pub source: MatchSource,
    /// The dictionary form that matched (hiragana).
    pub stem: String,
    pub normalization: Normalization,
    /// Chars of okurigana found after the kanji run, for a kun stem whose
    /// dictionary form carries okurigana.
    pub okurigana_len: Option<usize>,
}

pub fn classify(matched: Option<&ReadingMatch>) -> ReadingType {
    match matched.map(|m| m.source) {
        Some(MatchSource::On) => ReadingType::On,
        Some(MatchSource::Kun) => ReadingType::Kun,
        Some(MatchSource::Jukujikun) => ReadingType::Jukujikun,
        None => ReadingType::Unknown,
    }
}

/// Length in chars of the okurigana `following` starts with, given the
/// dictionary okurigana `declared`.
///
/// Every char but the last of `declared` must appear verbatim; the last one
/// inflects, so any hiragana is accepted in its place. `None` means the
/// okurigana is missing.
pub fn okurigana_extent(declared: &str, following: &str) -> Option<usize> {
    let declared: Vec<char> = declared.chars().collect();
    let invariant = &declared[..declared.len().saturating_sub(1)];
    let mut following = following.chars();

    for expected in invariant {
        if following.next() != Some(*expected) {
            return None;
        }
    }

    match following.next() {
        Some(c) if is_hiragana(c) => Some(invariant.len() + 1),
        _ if !invariant.is_empty() => Some(invariant.len()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_follows_match_source() {
        let matched = ReadingMatch {
            source: MatchSource::Kun,
            stem: "ち".to_string(),
            normalization: Normalization::Rendaku,
            okurigana_len: None,
        };
        assert_eq!(classify(Some(&matched)), ReadingType::Kun);
        assert_eq!(classify(None), ReadingType::Unknown);

        let matched = ReadingMatch {
            source: MatchSource::On,
            normalization: Normalization::Sokuon,
            ..matched
        };
        assert_eq!(classify(Some(&matched)), ReadingType::On);
    }

    #[test]
    fn okurigana_must_follow_the_kanji() {
        assert_eq!(okurigana_extent("む", "みかた"), Some(1));
        assert_eq!(okurigana_extent("きい", "きいです"), Some(2));
        assert_eq!(okurigana_extent("きい", "きな"), Some(2));
        assert_eq!(okurigana_extent("べる", "べ"), Some(1));
        assert_eq!(okurigana_extent("む", "。"), None);
        assert_eq!(okurigana_extent("む", ""), None);
        assert_eq!(okurigana_extent("きい", "かい"), None);
    }
}
