use once_cell::sync::OnceCell;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::kana::fold;

static INSTALLED: OnceCell<Dictionary> = OnceCell::new();

/// Source of per-kanji reading data.
///
/// Implemented by [`Dictionary`]; external loaders can provide their own
/// storage as long as it is immutable and shareable across threads.
pub trait ReadingLookup: Send + Sync {
    fn lookup(&self, kanji: char) -> Option<&DictionaryEntry>;
}

/// A kun-reading stem and the okurigana its dictionary form is written with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KunReading {
    pub stem: String,
    pub okurigana: Option<String>,
}

impl KunReading {
    pub fn new(stem: &str) -> Self {
        Self {
            stem: fold(stem),
            okurigana: None,
        }
    }

    pub fn with_okurigana(stem: &str, okurigana: &str) -> Self {
        Self {
            stem: fold(stem),
            okurigana: (!okurigana.is_empty()).then(|| fold(okurigana)),
        }
    }

    pub fn has_okurigana(&self) -> bool {
        self.okurigana.is_some()
    }

    /// Readings this kun-reading can take inside a furigana run, paired with
    /// whether the okurigana is still expected after the kanji.
    ///
    /// `ひ.く` yields `ひ` (okurigana follows), `ひき` (noun form) and `ひく`.
    pub(crate) fn forms(&self) -> Vec<(String, bool)> {
        let mut forms = vec![(self.stem.clone(), self.has_okurigana())];
        let Some(okurigana) = &self.okurigana else {
            return forms;
        };

        let mut push = |form: String| {
            if !forms.iter().any(|(existing, _)| *existing == form) {
                forms.push((form, false));
            }
        };

        let mut chars: Vec<char> = okurigana.chars().collect();
        if let Some(last) = chars.pop() {
            let head: String = chars.iter().collect();
            if let Some(i_row) = continuative(last) {
                push(format!("{}{head}{i_row}", self.stem));
            }
            // Ichidan verbs drop the final る.
            if last == 'る' {
                push(format!("{}{head}", self.stem));
            }
        }
        push(format!("{}{okurigana}", self.stem));
        forms
    }
}

/// The i-row kana a godan verb ending takes in its noun (連用形) form.
fn continuative(ending: char) -> Option<char> {
    let i_row = match ending {
        'う' => 'い',
        'く' => 'き',
        'ぐ' => 'ぎ',
        'す' => 'し',
        'つ' => 'ち',
        'ぬ' => 'に',
        'ぶ' => 'び',
        'む' => 'み',
        'る' => 'り',
        _ => return None,
    };
    Some(i_row)
}

/// An irregular whole-compound reading such as `大人 → おとな`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JukujikunEntry {
    pub word: String,
    pub reading: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub on_readings: Vec<String>,
    pub kun_readings: Vec<KunReading>,
    pub jukujikun: Vec<JukujikunEntry>,
}

impl DictionaryEntry {
    /// Parses kanjidic-style reading lists: `ニチ、ジツ` and `ひ、-び、か.く`.
    ///
    /// Prefix/suffix dashes and parenthesised notes are dropped.
    pub fn from_kanjidic(onyomi: &str, kunyomi: &str) -> Self {
        let mut entry = Self::default();
        for reading in split_readings(onyomi) {
            entry.add_on(&reading);
        }
        for reading in split_readings(kunyomi) {
            let kun = match reading.split_once('.') {
                Some((stem, okurigana)) => KunReading::with_okurigana(stem, okurigana),
                None => KunReading::new(&reading),
            };
            entry.add_kun(kun);
        }
        entry
    }

    fn add_on(&mut self, reading: &str) {
        let reading = fold(reading);
        if !reading.is_empty() && !self.on_readings.contains(&reading) {
            self.on_readings.push(reading);
        }
    }

    fn add_kun(&mut self, kun: KunReading) {
        if !kun.stem.is_empty() && !self.kun_readings.contains(&kun) {
            self.kun_readings.push(kun);
        }
    }

    fn add_jukujikun(&mut self, entry: JukujikunEntry) {
        if !self.jukujikun.contains(&entry) {
            self.jukujikun.push(entry);
        }
    }

    fn merge(&mut self, other: DictionaryEntry) {
        for reading in other.on_readings {
            self.add_on(&reading);
        }
        for kun in other.kun_readings {
            self.add_kun(kun);
        }
        for entry in other.jukujikun {
            self.add_jukujikun(entry);
        }
    }
}

fn split_readings(list: &str) -> Vec<String> {
    list.split(['、', ','])
        .map(|reading| reading.split(['(', '（']).next().unwrap_or_default())
        .map(|reading| reading.trim().trim_matches('-'))
        .filter(|reading| !reading.is_empty())
        .map(str::to_string)
        .collect()
}

/// Immutable kanji → readings table.
///
/// Build one with [`Dictionary::builder`]. Tests use isolated instances;
/// applications call [`Dictionary::install`] once at startup and read it
/// back through [`Dictionary::global`].
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: FxHashMap<char, DictionaryEntry>,
}

impl Dictionary {
    pub fn builder() -> DictionaryBuilder {
        DictionaryBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Makes this dictionary the process-wide one. Only the first call
    /// succeeds; later calls hand their dictionary back.
    pub fn install(self) -> Result<&'static Dictionary, Dictionary> {
        let entries = self.len();
        let installed = INSTALLED.try_insert(self).map_err(|(_, rejected)| rejected)?;
        debug!(entries, "installed reading dictionary");
        Ok(installed)
    }

    pub fn global() -> Option<&'static Dictionary> {
        INSTALLED.get()
    }
}

impl ReadingLookup for Dictionary {
    fn lookup(&self, kanji: char) -> Option<&DictionaryEntry> {
        self.entries.get(&kanji)
    }
}

#[derive(Debug, Default)]
pub struct DictionaryBuilder {
    entries: FxHashMap<char, DictionaryEntry>,
}

impl DictionaryBuilder {
    fn entry_mut(&mut self, kanji: char) -> &mut DictionaryEntry {
        self.entries.entry(kanji).or_default()
    }

    pub fn on(mut self, kanji: char, reading: &str) -> Self {
        self.entry_mut(kanji).add_on(reading);
        self
    }

    pub fn kun(mut self, kanji: char, stem: &str) -> Self {
        self.entry_mut(kanji).add_kun(KunReading::new(stem));
        self
    }

    pub fn kun_with_okurigana(mut self, kanji: char, stem: &str, okurigana: &str) -> Self {
        self.entry_mut(kanji)
            .add_kun(KunReading::with_okurigana(stem, okurigana));
        self
    }

    /// Registers a whole-compound reading on every kanji of `word`.
    pub fn jukujikun(mut self, word: &str, reading: &str) -> Self {
        let entry = JukujikunEntry {
            word: word.to_string(),
            reading: fold(reading),
        };
        for kanji in word.chars() {
            self.entry_mut(kanji).add_jukujikun(entry.clone());
        }
        self
    }

    pub fn kanjidic(mut self, kanji: char, onyomi: &str, kunyomi: &str) -> Self {
        self.entry_mut(kanji)
            .merge(DictionaryEntry::from_kanjidic(onyomi, kunyomi));
        self
    }

    pub fn entry(mut self, kanji: char, entry: DictionaryEntry) -> Self {
        self.entry_mut(kanji).merge(entry);
        self
    }

    pub fn build(self) -> Dictionary {
        Dictionary {
            entries: self.entries,
        }
    }
}

#[cfg(feature = "json")]
mod json {
    use std::collections::BTreeMap;

    use anyhow::{Context, Result, bail};
    use serde::Deserialize;

    use super::{Dictionary, DictionaryBuilder, DictionaryEntry};

    #[derive(Debug, Deserialize)]
    struct KanjiRecord {
        #[serde(default)]
        onyomi: String,
        #[serde(default)]
        kunyomi: String,
        #[serde(default)]
        jukujikun: Vec<JukujikunRecord>,
    }

    #[derive(Debug, Deserialize)]
    struct JukujikunRecord {
        word: String,
        reading: String,
    }

    impl Dictionary {
        /// Loads `{ "漢": { "onyomi": "カン", "kunyomi": "", "jukujikun": [..] } }`.
        pub fn from_json(data: &str) -> Result<Self> {
            let records: BTreeMap<String, KanjiRecord> =
                serde_json::from_str(data).context("Failed to parse reading dictionary JSON")?;

            let mut builder = DictionaryBuilder::default();
            for (key, record) in records {
                let mut chars = key.chars();
                let (Some(kanji), None) = (chars.next(), chars.next()) else {
                    bail!("Dictionary key {key:?} is not a single kanji");
                };

                builder = builder.entry(
                    kanji,
                    DictionaryEntry::from_kanjidic(&record.onyomi, &record.kunyomi),
                );
                for juku in record.jukujikun {
                    builder = builder.jukujikun(&juku.word, &juku.reading);
                }
            }

            Ok(builder.build())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kanjidic_lists() {
        let entry = DictionaryEntry::from_kanjidic("ニチ、ジツ", "ひ、-び、-か、か.く (書く)");

        assert_eq!(entry.on_readings, vec!["にち", "じつ"]);
        assert_eq!(
            entry.kun_readings,
            vec![
                KunReading::new("ひ"),
                KunReading::new("び"),
                KunReading::new("か"),
                KunReading::with_okurigana("か", "く"),
            ]
        );
    }

    #[test]
    fn kun_forms_cover_compound_usage() {
        let forms = KunReading::with_okurigana("ひ", "く").forms();
        assert_eq!(
            forms,
            vec![
                ("ひ".to_string(), true),
                ("ひき".to_string(), false),
                ("ひく".to_string(), false),
            ]
        );

        let forms = KunReading::with_okurigana("た", "べる").forms();
        assert!(
            forms.iter().any(|(form, _)| form == "たべ"),
            "expected ichidan stem form, got {:?}",
            forms
        );

        assert_eq!(KunReading::new("まち").forms(), vec![("まち".to_string(), false)]);
    }

    #[test]
    fn jukujikun_registered_on_every_kanji() {
        let dictionary = Dictionary::builder().jukujikun("大人", "オトナ").build();

        for kanji in ['大', '人'] {
            let entry = dictionary.lookup(kanji).expect("entry for kanji");
            assert_eq!(entry.jukujikun[0].reading, "おとな");
        }
    }

    #[test]
    fn builder_deduplicates() {
        let dictionary = Dictionary::builder()
            .on('本', "ホン")
            .on('本', "ほん")
            .kun('本', "もと")
            .kanjidic('本', "ホン", "もと")
            .build();

        let entry = dictionary.lookup('本').expect("entry for 本");
        assert_eq!(entry.on_readings.len(), 1);
        assert_eq!(entry.kun_readings.len(), 1);
        assert!(dictionary.lookup('日').is_none());
    }

    #[cfg(feature = "json")]
    #[test]
    fn loads_json_records() {
        let data = r#"{
            "大": { "onyomi": "ダイ、タイ", "kunyomi": "おお、おお.きい",
                    "jukujikun": [{ "word": "大人", "reading": "おとな" }] },
            "人": { "onyomi": "ジン、ニン", "kunyomi": "ひと" }
        }"#;

        let dictionary = Dictionary::from_json(data).unwrap();
        assert_eq!(dictionary.len(), 2);
        let entry = dictionary.lookup('大').unwrap();
        assert_eq!(entry.on_readings, vec!["だい", "たい"]);
        assert!(entry.kun_readings.iter().any(KunReading::has_okurigana));
        assert_eq!(dictionary.lookup('人').unwrap().jukujikun.len(), 1);
    }

    #[cfg(feature = "json")]
    #[test]
    fn rejects_multi_char_keys() {
        let err = Dictionary::from_json(r#"{ "大人": { "onyomi": "" } }"#).unwrap_err();
        assert!(err.to_string().contains("not a single kanji"), "got {err}");

        let err = Dictionary::from_json("not json").unwrap_err();
        assert!(err.to_string().contains("Failed to parse"), "got {err}");
    }
}
