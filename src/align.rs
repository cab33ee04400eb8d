//! Splits a reading across the kanji it annotates.
//!
//! The split is a shortest path over a table indexed by kanji stage and
//! mora boundary. A step that reads a kanji with one of its dictionary
//! readings costs nothing; any other step costs one. Ties go to the path
//! with fewer sound changes, then to the one whose boundaries come first.

use tracing::{debug, trace};

use crate::{
    classify::{MatchSource, ReadingMatch, ReadingType, classify, okurigana_extent},
    dictionary::{DictionaryEntry, JukujikunEntry, ReadingLookup},
    kana::{REPEATER, fold_char, is_kana, mora_boundaries},
    phonetic::{Normalization, match_reading},
};

/// A run of kanji together with the part of the reading it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentSpan {
    pub kanji: String,
    pub reading: String,
    pub reading_type: ReadingType,
    pub normalization: Normalization,
    /// Dictionary form the reading was matched against, in hiragana.
    pub stem: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alignment {
    pub spans: Vec<AlignmentSpan>,
    /// Chars of okurigana at the start of the text following the run. They
    /// belong to the last span.
    pub okurigana_len: usize,
}

impl Alignment {
    /// True when every span was matched against the dictionary.
    pub fn is_complete(&self) -> bool {
        self.spans
            .iter()
            .all(|span| span.reading_type != ReadingType::Unknown)
    }
}

#[derive(Debug, Clone)]
struct Step {
    kanji_end: usize,
    reading_end: usize,
    matched: Option<ReadingMatch>,
}

#[derive(Debug, Clone, Default)]
struct Cell {
    cost: usize,
    normalized: usize,
    steps: Vec<Step>,
}

impl Cell {
    fn extend(&self, step: Step) -> Cell {
        let cost = self.cost + usize::from(step.matched.is_none());
        let normalized = self.normalized
            + usize::from(
                step.matched
                    .as_ref()
                    .is_some_and(|m| m.normalization.is_applied()),
            );
        let mut steps = self.steps.clone();
        steps.push(step);
        Cell {
            cost,
            normalized,
            steps,
        }
    }

    fn beats(&self, other: &Cell) -> bool {
        (self.cost, self.normalized)
            .cmp(&(other.cost, other.normalized))
            .then_with(|| self.boundaries().cmp(other.boundaries()))
            .is_lt()
    }

    fn boundaries(&self) -> impl Iterator<Item = usize> + '_ {
        self.steps.iter().map(|step| step.reading_end)
    }
}

// Every partial path pays one more for its unknown remainder, so the cheapest
// wins; among those, the one that assigned more kanji.
fn partial_beats((stage, cell): (usize, &Cell), (best_stage, best): (usize, &Cell)) -> bool {
    cell.cost
        .cmp(&best.cost)
        .then_with(|| best_stage.cmp(&stage))
        .then_with(|| cell.normalized.cmp(&best.normalized))
        .then_with(|| cell.boundaries().cmp(best.boundaries()))
        .is_lt()
}

fn relax(slot: &mut Option<Cell>, candidate: Cell) {
    if slot.as_ref().is_none_or(|current| candidate.beats(current)) {
        trace!(
            cost = candidate.cost,
            normalized = candidate.normalized,
            "relaxed alignment state"
        );
        *slot = Some(candidate);
    }
}

/// Where a kanji sits in its run; sound changes depend on it.
#[derive(Debug, Clone, Copy)]
struct Position<'a> {
    first: bool,
    last: bool,
    following: &'a str,
}

impl Position<'_> {
    fn allows(&self, normalization: Normalization) -> bool {
        match normalization {
            Normalization::Rendaku => !self.first,
            Normalization::RendakuSokuon => !self.first && self.allows_sokuon(),
            Normalization::Sokuon => self.allows_sokuon(),
            Normalization::Plain | Normalization::LongVowel => true,
        }
    }

    // Gemination needs a following consonant.
    fn allows_sokuon(&self) -> bool {
        !self.last || self.following.chars().next().is_some_and(is_kana)
    }
}

/// Best dictionary reading of one kanji for `surface`, if any.
///
/// Fewer sound changes win; among equals a kun-reading whose okurigana was
/// found beats an on-reading, which beats any other kun-reading.
fn best_match(
    entry: &DictionaryEntry,
    surface: &str,
    position: Position<'_>,
) -> Option<ReadingMatch> {
    let mut best: Option<(Normalization, u8, ReadingMatch)> = None;
    let mut consider = |priority: u8, matched: ReadingMatch| {
        let better = best
            .as_ref()
            .is_none_or(|(normalization, rank, _)| {
                (matched.normalization, priority) < (*normalization, *rank)
            });
        if better {
            best = Some((matched.normalization, priority, matched));
        }
    };

    for on in &entry.on_readings {
        let Some(normalization) = match_reading(on, surface, true) else {
            continue;
        };
        if position.allows(normalization) {
            consider(
                1,
                ReadingMatch {
                    source: MatchSource::On,
                    stem: on.clone(),
                    normalization,
                    okurigana_len: None,
                },
            );
        }
    }

    for kun in &entry.kun_readings {
        for (form, needs_okurigana) in kun.forms() {
            let Some(normalization) = match_reading(&form, surface, false) else {
                continue;
            };
            if !position.allows(normalization) {
                continue;
            }

            let (priority, okurigana_len) = match &kun.okurigana {
                Some(declared) if needs_okurigana && position.last => {
                    match okurigana_extent(declared, position.following) {
                        Some(len) => (0, Some(len)),
                        None => continue,
                    }
                }
                _ => (2, None),
            };
            consider(
                priority,
                ReadingMatch {
                    source: MatchSource::Kun,
                    stem: form,
                    normalization,
                    okurigana_len,
                },
            );
        }
    }

    best.map(|(_, _, matched)| matched)
}

fn jukujikun_match(entry: &JukujikunEntry) -> ReadingMatch {
    ReadingMatch {
        source: MatchSource::Jukujikun,
        stem: entry.reading.clone(),
        normalization: Normalization::Plain,
        okurigana_len: None,
    }
}

/// Aligns furigana readings against a [`ReadingLookup`].
///
/// Holds no state besides the dictionary reference, so one aligner can be
/// shared freely between threads.
#[derive(Clone, Copy)]
pub struct Aligner<'d> {
    dictionary: &'d dyn ReadingLookup,
}

impl<'d> Aligner<'d> {
    pub fn new(dictionary: &'d dyn ReadingLookup) -> Self {
        Self { dictionary }
    }

    /// Splits `reading` across `kanji`.
    ///
    /// `following` is the text right after the annotation; it is only used
    /// to look for okurigana. The returned spans always concatenate back to
    /// `kanji` and `reading`.
    pub fn align(&self, kanji: &str, reading: &str, following: &str) -> Alignment {
        let kanji: Vec<char> = kanji.chars().collect();
        let reading: Vec<char> = reading.chars().collect();
        let folded: Vec<char> = reading.iter().copied().map(fold_char).collect();

        if kanji.len() <= 1 {
            let position = Position {
                first: true,
                last: true,
                following,
            };
            let surface: String = folded.iter().collect();
            let matched = self
                .entries(&kanji)
                .first()
                .copied()
                .flatten()
                .and_then(|entry| best_match(entry, &surface, position));
            let step = Step {
                kanji_end: kanji.len(),
                reading_end: reading.len(),
                matched,
            };
            return finish(&kanji, &reading, vec![step]);
        }

        if let Some(entry) = self.whole_word_jukujikun(&kanji, &folded) {
            debug!(word = %entry.word, reading = %entry.reading, "jukujikun reading");
            let step = Step {
                kanji_end: kanji.len(),
                reading_end: reading.len(),
                matched: Some(jukujikun_match(entry)),
            };
            return finish(&kanji, &reading, vec![step]);
        }

        let steps = self.shortest_path(&kanji, &folded, following);
        finish(&kanji, &reading, steps)
    }

    /// Dictionary entry per kanji; `々` borrows the entry of the kanji it repeats.
    fn entries(&self, kanji: &[char]) -> Vec<Option<&'d DictionaryEntry>> {
        (0..kanji.len())
            .map(|idx| {
                let source = kanji[..=idx].iter().rev().copied().find(|&c| c != REPEATER)?;
                let entry = self.dictionary.lookup(source);
                if entry.is_none() {
                    debug!(kanji = %source, "no dictionary entry");
                }
                entry
            })
            .collect()
    }

    fn whole_word_jukujikun(&self, kanji: &[char], folded: &[char]) -> Option<&'d JukujikunEntry> {
        let word: String = kanji.iter().collect();
        let reading: String = folded.iter().collect();
        self.dictionary
            .lookup(*kanji.first()?)?
            .jukujikun
            .iter()
            .find(|entry| entry.word == word && entry.reading == reading)
    }

    fn shortest_path(&self, kanji: &[char], folded: &[char], following: &str) -> Vec<Step> {
        let entries = self.entries(kanji);
        let bounds = mora_boundaries(folded);
        let stages = kanji.len();
        let mut table: Vec<Vec<Option<Cell>>> = vec![vec![None; bounds.len()]; stages + 1];
        table[0][0] = Some(Cell::default());

        for stage in 0..stages {
            let position = Position {
                first: stage == 0,
                last: stage + 1 == stages,
                following,
            };

            for from in 0..bounds.len() {
                let Some(cell) = table[stage][from].clone() else {
                    continue;
                };
                let start = bounds[from];

                for to in from + 1..bounds.len() {
                    let end = bounds[to];
                    let surface: String = folded[start..end].iter().collect();
                    let matched = entries[stage].and_then(|entry| best_match(entry, &surface, position));
                    let step = Step {
                        kanji_end: stage + 1,
                        reading_end: end,
                        matched,
                    };
                    relax(&mut table[stage + 1][to], cell.extend(step));
                }

                // Compounds inside the run with an irregular reading of their own.
                let Some(entry) = self.dictionary.lookup(kanji[stage]) else {
                    continue;
                };
                for juku in &entry.jukujikun {
                    let word: Vec<char> = juku.word.chars().collect();
                    let reading: Vec<char> = juku.reading.chars().collect();
                    let end = start + reading.len();
                    if word.len() < 2
                        || !kanji[stage..].starts_with(&word)
                        || folded.get(start..end) != Some(reading.as_slice())
                    {
                        continue;
                    }
                    let Ok(to) = bounds.binary_search(&end) else {
                        continue;
                    };
                    let step = Step {
                        kanji_end: stage + word.len(),
                        reading_end: end,
                        matched: Some(jukujikun_match(juku)),
                    };
                    relax(&mut table[stage + word.len()][to], cell.extend(step));
                }
            }
        }

        if let Some(cell) = table[stages][bounds.len() - 1].take() {
            debug!(cost = cell.cost, normalized = cell.normalized, "aligned reading");
            return cell.steps;
        }

        // The reading ran out: keep the best partial split and hand
        // everything left over to one unknown span.
        let partial = (0..stages)
            .flat_map(|stage| table[stage].iter().flatten().map(move |cell| (stage, cell)))
            .reduce(|best, candidate| {
                if partial_beats(candidate, best) { candidate } else { best }
            });
        let mut steps = partial
            .map(|(_, cell)| cell.steps.clone())
            .unwrap_or_default();
        debug!(
            assigned = steps.last().map_or(0, |step| step.kanji_end),
            kanji = stages,
            "reading exhausted before every kanji was assigned"
        );
        steps.push(Step {
            kanji_end: stages,
            reading_end: folded.len(),
            matched: None,
        });
        steps
    }
}

fn finish(kanji: &[char], reading: &[char], steps: Vec<Step>) -> Alignment {
    let mut alignment = Alignment::default();
    let (mut kanji_start, mut reading_start) = (0, 0);

    for step in steps {
        alignment.spans.push(AlignmentSpan {
            kanji: kanji[kanji_start..step.kanji_end].iter().collect(),
            reading: reading[reading_start..step.reading_end].iter().collect(),
            reading_type: classify(step.matched.as_ref()),
            normalization: step
                .matched
                .as_ref()
                .map(|m| m.normalization)
                .unwrap_or_default(),
            stem: step.matched.as_ref().map(|m| m.stem.clone()),
        });
        alignment.okurigana_len = step
            .matched
            .as_ref()
            .and_then(|m| m.okurigana_len)
            .unwrap_or(0);
        kanji_start = step.kanji_end;
        reading_start = step.reading_end;
    }

    alignment
}
