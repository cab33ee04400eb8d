//! Character classes and kana folding shared by the parser and the aligner.

use std::ops::RangeInclusive;

use wana_kana::ConvertJapanese;

const HIRAGANA_RANGE: RangeInclusive<u32> = 0x3041..=0x309f;
const KATAKANA_RANGE: RangeInclusive<u32> = 0x30a0..=0x30ff;
const COMMON_KANJI_RANGE: RangeInclusive<u32> = 0x4e00..=0x9fff;
const KANJI_EXTENDED_A_RANGE: RangeInclusive<u32> = 0x3400..=0x4dbf;
const KANJI_EXTENDED_B_RANGE: RangeInclusive<u32> = 0x20000..=0x2a6df;
const COMPATIBILITY_KANJI_RANGE: RangeInclusive<u32> = 0xf900..=0xfaff;

// Katakana with a direct hiragana counterpart (ァ..ヶ).
const FOLDABLE_KATAKANA_RANGE: RangeInclusive<u32> = 0x30a1..=0x30f6;
const KATAKANA_TO_HIRAGANA: u32 = 0x60;

const KANJI_RANGES: [RangeInclusive<u32>; 4] = [
    COMMON_KANJI_RANGE,
    KANJI_EXTENDED_A_RANGE,
    KANJI_EXTENDED_B_RANGE,
    COMPATIBILITY_KANJI_RANGE,
];

/// Iteration mark that repeats the previous kanji.
pub const REPEATER: char = '々';

pub fn is_kanji(c: char) -> bool {
    c == REPEATER || c == '〆' || KANJI_RANGES.iter().any(|range| range.contains(&(c as u32)))
}

pub fn is_hiragana(c: char) -> bool {
    HIRAGANA_RANGE.contains(&(c as u32))
}

pub fn is_katakana(c: char) -> bool {
    KATAKANA_RANGE.contains(&(c as u32))
}

pub fn is_kana(c: char) -> bool {
    is_hiragana(c) || is_katakana(c)
}

/// Folds a single katakana to hiragana. Anything else, including `ー`, is
/// returned as is so folded strings keep their char positions.
pub fn fold_char(c: char) -> char {
    let code = c as u32;
    if FOLDABLE_KATAKANA_RANGE.contains(&code) {
        char::from_u32(code - KATAKANA_TO_HIRAGANA).unwrap_or(c)
    } else {
        c
    }
}

/// Char-for-char hiragana folding used for every reading comparison.
pub fn fold(text: &str) -> String {
    text.chars().map(fold_char).collect()
}

/// Katakana rendering of a reading, used when on-readings are emitted in katakana.
pub fn to_katakana(text: &str) -> String {
    text.to_katakana()
}

/// Kana that cannot begin a mora on their own.
fn is_dependent(c: char) -> bool {
    matches!(
        fold_char(c),
        'ゃ' | 'ゅ' | 'ょ' | 'ぁ' | 'ぃ' | 'ぅ' | 'ぇ' | 'ぉ' | 'ゎ' | 'っ' | 'ん' | 'ー'
    )
}

/// Char indices of `reading` where a span may start or end, always
/// including `0` and `reading.len()`.
pub fn mora_boundaries(reading: &[char]) -> Vec<usize> {
    let mut boundaries = vec![0];
    boundaries.extend((1..reading.len()).filter(|&i| !is_dependent(reading[i])));
    if !reading.is_empty() {
        boundaries.push(reading.len());
    }
    boundaries
}

/// Byte offset of the `count`-th char of `text`, or its length.
pub fn byte_offset(text: &str, count: usize) -> usize {
    text.char_indices()
        .nth(count)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}
