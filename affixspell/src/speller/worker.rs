//! Candidate generation for spelling corrections.
//!
//! Candidates are produced in tiers, cheapest first: replacement-table
//! edits, keyboard-adjacency substitutions, doubled-letter repairs, case
//! variants. Every tier candidate then seeds a single-edit-distance
//! generator, and the strings that pass produces seed a second-distance
//! pass that runs in batches under a wall-clock deadline.

use std::time::{Duration, Instant};

use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use smol_str::SmolStr;

use super::suggestion::Suggestion;
use super::{DictSpeller, SpellerConfig};
use crate::case_handling::{self, CasePattern};
use crate::constants::EDIT_HIT_WEIGHT;
use crate::types::Weight;

/// The doubled-letter family is built over this many edit distances.
const DOUBLING_MAX_DISTANCE: usize = 3;
/// Hard cap on the doubled-letter family size, keeping the tier cheap.
const DOUBLING_FAMILY_CAP: usize = 64;

pub(crate) struct SuggestionWorker<'a> {
    speller: &'a DictSpeller,
    config: SpellerConfig,
    deadline: Instant,
    validity: HashMap<SmolStr, bool>,
    weights: HashMap<SmolStr, Weight>,
}

impl<'a> SuggestionWorker<'a> {
    pub(crate) fn new(speller: &'a DictSpeller, config: SpellerConfig) -> SuggestionWorker<'a> {
        SuggestionWorker {
            speller,
            config,
            deadline: Instant::now(),
            validity: HashMap::new(),
            weights: HashMap::new(),
        }
    }

    pub(crate) fn suggest(mut self, word: &str) -> Vec<Suggestion> {
        let value = self.speller.normalize(word);
        if value.is_empty() || self.speller.is_correct(&value) {
            return vec![];
        }

        let length = value.chars().count() as u64;
        self.deadline = Instant::now()
            + Duration::from_millis(
                (self.config.budget_ms_per_char * length).min(self.config.budget_cap_ms),
            );

        let tiers: [Vec<SmolStr>; 4] = [
            self.replacement_edits(&value),
            self.keyboard_edits(&value),
            self.doubling_edits(&value),
            self.case_variants(&value),
        ];

        // cheapest tier first; a hit lets us skip the edit-distance passes
        // entirely
        for tier in &tiers {
            for candidate in tier {
                self.consider(candidate);
            }
            if !self.weights.is_empty() {
                return self.finish(&value);
            }
        }

        // literal value first, so its neighbourhood leads the second-pass
        // pool before the cap cuts in
        let seeds: Vec<SmolStr> = std::iter::once(SmolStr::new(value.as_str()))
            .chain(tiers.into_iter().flatten())
            .unique()
            .collect();

        // first edit distance over every tier candidate; what it produces
        // becomes the pool for the second distance
        let mut pool: Vec<SmolStr> = Vec::new();
        for seed in &seeds {
            if Instant::now() >= self.deadline {
                log::debug!("suggestion budget exhausted during first pass for {:?}", value);
                return self.finish(&value);
            }
            let generated = self.generate_edits(seed);
            for candidate in &generated {
                self.consider(candidate);
            }
            pool.extend(generated);
        }

        if self.weights.is_empty() {
            self.second_pass(&value, pool);
        }

        self.finish(&value)
    }

    /// Validates a candidate once per request, crediting its weight on every
    /// occurrence.
    fn consider(&mut self, candidate: &SmolStr) {
        if candidate.is_empty() {
            return;
        }
        let valid = match self.validity.get(candidate) {
            Some(valid) => *valid,
            None => {
                let valid = self.speller.accepts_for_suggestion(candidate);
                self.validity.insert(candidate.clone(), valid);
                valid
            }
        };
        if valid {
            self.weights
                .entry(candidate.clone())
                .and_modify(|w| *w += 1)
                .or_insert(EDIT_HIT_WEIGHT);
        }
    }

    /// Tier 1: one edit per occurrence of each replacement-table pattern.
    fn replacement_edits(&self, value: &str) -> Vec<SmolStr> {
        let mut out = Vec::new();
        for (find, replace) in self.speller.index().affix().replacement_table() {
            for (pos, _) in value.match_indices(find.as_str()) {
                let mut edited = String::with_capacity(value.len() + replace.len());
                edited.push_str(&value[..pos]);
                edited.push_str(replace);
                edited.push_str(&value[pos + find.len()..]);
                out.push(SmolStr::new(edited));
            }
        }
        out
    }

    /// Tier 2: substitute each character with its keyboard neighbours,
    /// preserving the original character's case.
    fn keyboard_edits(&self, value: &str) -> Vec<SmolStr> {
        let chars: Vec<char> = value.chars().collect();
        let mut out = Vec::new();

        for (i, ch) in chars.iter().enumerate() {
            let lower = ch.to_lowercase().next().unwrap_or(*ch);
            for group in self.speller.index().affix().key_groups() {
                if !group.contains(lower) {
                    continue;
                }
                for other in group.chars() {
                    if other == lower {
                        continue;
                    }
                    let replacement = if ch.is_uppercase() {
                        other.to_uppercase().next().unwrap_or(other)
                    } else {
                        other
                    };
                    let mut edited = chars.clone();
                    edited[i] = replacement;
                    out.push(edited.iter().copied().collect());
                }
            }
        }
        out
    }

    /// Tier 3: collapse doubled runs and double single letters, over at most
    /// [`DOUBLING_MAX_DISTANCE`] edits. Catches forgot-to-double and
    /// doubled-by-mistake typos cheaply.
    fn doubling_edits(&self, value: &str) -> Vec<SmolStr> {
        let mut family: Vec<SmolStr> = Vec::new();
        let mut seen: HashSet<SmolStr> = HashSet::new();
        seen.insert(SmolStr::new(value));
        let mut frontier = vec![SmolStr::new(value)];

        for _ in 0..DOUBLING_MAX_DISTANCE {
            let mut next = Vec::new();
            for item in &frontier {
                for edit in doubling_neighbors(item) {
                    if seen.insert(edit.clone()) {
                        family.push(edit.clone());
                        next.push(edit);
                    }
                    if family.len() >= DOUBLING_FAMILY_CAP {
                        return family;
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
        family
    }

    /// Tier 4: the literal value and its straightforward case variants.
    fn case_variants(&self, value: &str) -> Vec<SmolStr> {
        let mut out = vec![SmolStr::new(value)];
        let lower = case_handling::lower_case(value);
        if lower.as_str() != value {
            out.push(lower);
        } else {
            out.push(case_handling::upper_first(value));
        }
        let upper = case_handling::upper_case(value);
        if upper.as_str() != value {
            out.push(upper);
        }
        out
    }

    /// Every string one edit away from `value`: deletions, adjacent
    /// transpositions, and alphabet-letter insertions and substitutions at
    /// the original and adjacent positions. Upper-cased letters are tried
    /// too wherever the source character is upper-case.
    fn generate_edits(&self, value: &str) -> Vec<SmolStr> {
        let chars: Vec<char> = value.chars().collect();
        let alphabet = self.speller.index().affix().try_chars();
        let mut out: Vec<SmolStr> = Vec::with_capacity(chars.len() * (alphabet.len() * 3 + 2));

        for i in 0..chars.len() {
            let mut deleted = chars.clone();
            deleted.remove(i);
            out.push(deleted.iter().copied().collect());

            if i + 1 < chars.len() && chars[i] != chars[i + 1] {
                let mut swapped = chars.clone();
                swapped.swap(i, i + 1);
                out.push(swapped.iter().copied().collect());
            }

            let upper = chars[i].is_uppercase();
            for &letter in alphabet {
                push_letter_edits(&mut out, &chars, i, letter);
                if upper {
                    for upper_letter in letter.to_uppercase() {
                        push_letter_edits(&mut out, &chars, i, upper_letter);
                    }
                }
            }
        }
        out
    }

    /// Second edit distance: the same generator over slices of the
    /// first-level pool. Longer words breed disproportionately large edit
    /// neighbourhoods, so both the pool and the batches shrink with length.
    /// Stops on the first valid hit or when the deadline elapses.
    fn second_pass(&mut self, value: &str, pool: Vec<SmolStr>) {
        let length = value.chars().count().max(1);
        let pool_cap = (4096 / length).max(32);
        let batch_size = (256 / length).max(8);

        let pool: Vec<SmolStr> = pool.into_iter().unique().take(pool_cap).collect();

        for batch in pool.chunks(batch_size) {
            if Instant::now() >= self.deadline {
                log::debug!("suggestion budget exhausted during second pass for {:?}", value);
                break;
            }
            for seed in batch {
                for candidate in self.generate_edits(seed) {
                    self.consider(&candidate);
                }
            }
            if !self.weights.is_empty() {
                break;
            }
        }
    }

    /// Orders, de-duplicates and output-converts whatever was found.
    fn finish(self, original: &str) -> Vec<Suggestion> {
        let SuggestionWorker {
            speller,
            config,
            weights,
            ..
        } = self;

        let original_pattern = CasePattern::of(original);
        let mut ranked: Vec<Suggestion> = weights
            .into_iter()
            .map(|(value, weight)| Suggestion::new(value, weight))
            .collect();

        ranked.sort_by(|a, b| {
            b.weight.cmp(&a.weight).then_with(|| {
                let a_match = CasePattern::of(a.value()) == original_pattern;
                let b_match = CasePattern::of(b.value()) == original_pattern;
                b_match
                    .cmp(&a_match)
                    .then_with(|| a.value.cmp(&b.value))
            })
        });

        let mut seen: HashSet<SmolStr> = HashSet::new();
        let mut out = Vec::with_capacity(ranked.len());
        for sugg in ranked {
            if !seen.insert(case_handling::lower_case(sugg.value())) {
                continue;
            }
            let value = speller.apply_output_conversion(sugg.value());
            out.push(Suggestion::new(SmolStr::new(value), sugg.weight));
        }

        if let Some(n_best) = config.n_best {
            out.truncate(n_best);
        }
        out
    }
}

fn push_letter_edits(out: &mut Vec<SmolStr>, chars: &[char], i: usize, letter: char) {
    let mut inserted = chars.to_vec();
    inserted.insert(i, letter);
    out.push(inserted.iter().copied().collect());

    let mut appended = chars.to_vec();
    appended.insert(i + 1, letter);
    out.push(appended.iter().copied().collect());

    if chars[i] != letter {
        let mut substituted = chars.to_vec();
        substituted[i] = letter;
        out.push(substituted.iter().copied().collect());
    }
}

fn doubling_neighbors(value: &str) -> Vec<SmolStr> {
    let chars: Vec<char> = value.chars().collect();
    let mut out = Vec::new();

    for i in 0..chars.len() {
        if i + 1 < chars.len() && chars[i] == chars[i + 1] {
            let mut collapsed = chars.clone();
            collapsed.remove(i);
            out.push(collapsed.iter().copied().collect());
        }

        let mut doubled = chars.clone();
        doubled.insert(i, chars[i]);
        out.push(doubled.iter().copied().collect());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const AFF: &str = "\
TRY esianrtolcdugmphbyfvkwz
KEY qwertyuiop|asdfghjkl|zxcvbnm

REP 1
REP f ph

NOSUGGEST Q
";

    const DIC: &str = "\
6
hello
world
photo
letter
baton
damn/Q
";

    fn speller() -> DictSpeller {
        DictSpeller::from_texts(AFF, DIC)
    }

    #[test]
    fn correct_word_gets_no_suggestions() {
        let speller = speller();
        assert!(speller.suggest("hello").is_empty());
        assert!(speller.suggest("").is_empty());
        assert!(speller.suggest("   ").is_empty());
    }

    #[test]
    fn single_edit_corrections_found() {
        let speller = speller();
        let suggestions = speller.suggest("helo");
        assert!(suggestions.iter().any(|s| s.value() == "hello"));
    }

    #[test]
    fn replacement_table_tier_fires_first() {
        let speller = speller();
        let suggestions = speller.suggest("foto");
        assert_eq!(suggestions[0].value(), "photo");
    }

    #[test]
    fn doubled_letter_typos_repaired() {
        let speller = speller();
        // collapsed double
        let suggestions = speller.suggest("leter");
        assert!(suggestions.iter().any(|s| s.value() == "letter"));
        // spurious double
        let suggestions = speller.suggest("hhello");
        assert!(suggestions.iter().any(|s| s.value() == "hello"));
    }

    #[test]
    fn keyboard_adjacency_tier() {
        let speller = speller();
        // v and b share a key row
        let suggestions = speller.suggest("vaton");
        assert!(suggestions.iter().any(|s| s.value() == "baton"));
    }

    #[test]
    fn casing_pattern_preferred_on_ties() {
        let speller = speller();
        let suggestions = speller.suggest("HELO");
        assert!(!suggestions.is_empty());
        assert_eq!(suggestions[0].value(), "HELLO");
    }

    #[test]
    fn two_edit_corrections_found_in_second_pass() {
        let speller = speller();
        let suggestions = speller.suggest("wrl");
        assert!(suggestions.iter().any(|s| s.value() == "world"));
    }

    #[test]
    fn nosuggest_words_never_suggested() {
        let speller = speller();
        let suggestions = speller.suggest("damm");
        assert!(suggestions.iter().all(|s| s.value() != "damn"));
    }

    #[test]
    fn suggest_is_idempotent() {
        let speller = speller();
        let first = speller.suggest("helo");
        let second = speller.suggest("helo");
        assert_eq!(first, second);
    }

    #[test]
    fn output_deduplicates_case_insensitively() {
        let speller = speller();
        let suggestions = speller.suggest("helo");
        let mut folded: Vec<SmolStr> = suggestions
            .iter()
            .map(|s| case_handling::lower_case(s.value()))
            .collect();
        folded.sort();
        folded.dedup();
        assert_eq!(folded.len(), suggestions.len());
    }
}
