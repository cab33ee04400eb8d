//! Sound changes that let a surface reading match a dictionary reading.
//!
//! All inputs are hiragana-folded (see [`crate::kana::fold`]).

/// The phonetic alternation that had to be undone for a reading to match.
///
/// Variants are ordered by preference: when a surface matches a dictionary
/// reading in several ways, the smallest variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Normalization {
    /// Exact match.
    #[default]
    Plain,
    /// First kana voiced at a morpheme boundary (ち → ぢ).
    Rendaku,
    /// Final kana geminated into っ (がく → がっ).
    Sokuon,
    /// Rendaku and sokuon together.
    RendakuSokuon,
    /// Final う/い of an on-reading dropped or written ー.
    LongVowel,
}

impl Normalization {
    pub fn is_applied(self) -> bool {
        self != Normalization::Plain
    }
}

/// Voiceless counterpart of a voiced or semi-voiced kana.
fn devoice(c: char) -> Option<char> {
    let plain = match c {
        'が' => 'か',
        'ぎ' => 'き',
        'ぐ' => 'く',
        'げ' => 'け',
        'ご' => 'こ',
        'ざ' => 'さ',
        'じ' => 'し',
        'ず' => 'す',
        'ぜ' => 'せ',
        'ぞ' => 'そ',
        'だ' => 'た',
        'ぢ' => 'ち',
        'づ' => 'つ',
        'で' => 'て',
        'ど' => 'と',
        'ば' | 'ぱ' => 'は',
        'び' | 'ぴ' => 'ひ',
        'ぶ' | 'ぷ' => 'ふ',
        'べ' | 'ぺ' => 'へ',
        'ぼ' | 'ぽ' => 'ほ',
        _ => return None,
    };
    Some(plain)
}

// Final kana that can geminate before a following consonant.
fn can_geminate(c: char) -> bool {
    matches!(c, 'く' | 'ち' | 'つ' | 'き' | 'り')
}

fn rendaku_equivalent(ideal: char, actual: char) -> bool {
    devoice(actual) == Some(ideal)
}

fn sokuon_equivalent(ideal: char, actual: char) -> bool {
    actual == 'っ' && can_geminate(ideal)
}

fn has_long_vowel_tail(ideal: &[char]) -> bool {
    ideal.len() >= 2 && matches!(ideal[ideal.len() - 1], 'う' | 'い') && ideal[ideal.len() - 2] != 'っ'
}

/// Checks whether `surface` can be read as the dictionary reading `ideal`,
/// returning the least invasive normalization that makes them equal.
///
/// `allow_long_vowel` enables [`Normalization::LongVowel`], which only
/// applies to on-readings.
pub fn match_reading(ideal: &str, surface: &str, allow_long_vowel: bool) -> Option<Normalization> {
    let ideal: Vec<char> = ideal.chars().collect();
    let surface: Vec<char> = surface.chars().collect();
    if ideal.is_empty() || surface.is_empty() {
        return None;
    }
    if ideal == surface {
        return Some(Normalization::Plain);
    }

    if ideal.len() == surface.len() {
        let last = ideal.len() - 1;
        let first_voiced = rendaku_equivalent(ideal[0], surface[0]);

        if first_voiced && ideal[1..] == surface[1..] {
            return Some(Normalization::Rendaku);
        }

        if last > 0 && sokuon_equivalent(ideal[last], surface[last]) {
            if ideal[..last] == surface[..last] {
                return Some(Normalization::Sokuon);
            }
            if first_voiced && ideal[1..last] == surface[1..last] {
                return Some(Normalization::RendakuSokuon);
            }
        }
    }

    if allow_long_vowel && has_long_vowel_tail(&ideal) {
        let stem = &ideal[..ideal.len() - 1];
        let contracted = surface.len() == stem.len() && surface == stem;
        let written_long = surface.len() == ideal.len()
            && surface[surface.len() - 1] == 'ー'
            && surface[..stem.len()] == *stem;
        if contracted || written_long {
            return Some(Normalization::LongVowel);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_match() {
        assert_eq!(match_reading("ほん", "ほん", false), Some(Normalization::Plain));
        assert_eq!(match_reading("ほん", "もと", false), None);
        assert_eq!(match_reading("", "", false), None);
    }

    #[test]
    fn voiced_surface_matches_voiceless_reading() {
        assert_eq!(match_reading("ち", "ぢ", false), Some(Normalization::Rendaku));
        assert_eq!(match_reading("かみ", "がみ", false), Some(Normalization::Rendaku));
        assert_eq!(match_reading("ひと", "びと", false), Some(Normalization::Rendaku));
        assert_eq!(match_reading("ひょう", "ぴょう", false), Some(Normalization::Rendaku));
        // The reverse direction is not a sound change.
        assert_eq!(match_reading("が", "か", false), None);
    }

    #[test]
    fn geminated_final_kana() {
        assert_eq!(match_reading("がく", "がっ", false), Some(Normalization::Sokuon));
        assert_eq!(match_reading("いち", "いっ", false), Some(Normalization::Sokuon));
        assert_eq!(match_reading("はつ", "ぱっ", false), Some(Normalization::RendakuSokuon));
        assert_eq!(match_reading("かん", "かっ", false), None);
    }

    #[test]
    fn long_vowel_only_when_allowed() {
        assert_eq!(match_reading("こう", "こ", true), Some(Normalization::LongVowel));
        assert_eq!(match_reading("こう", "こー", true), Some(Normalization::LongVowel));
        assert_eq!(match_reading("こう", "こ", false), None);
        assert_eq!(match_reading("う", "", true), None);
    }
}
