//! Correctness queries and suggestion generation over a parsed dictionary.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use unic_ucd_category::GeneralCategory;

use self::worker::SuggestionWorker;
use crate::affix::AffixRuleSet;
use crate::case_handling;
use crate::constants::{SUGGEST_BUDGET_CAP_MS, SUGGEST_BUDGET_MS_PER_CHAR};
use crate::types::FlagCode;
use crate::word_index::WordIndex;

pub mod suggestion;
mod worker;

pub use self::suggestion::Suggestion;

/// Verdict for a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellCheck {
    /// the token has an acceptable resolved form
    pub correct: bool,
    /// the resolved form carries the FORBIDDENWORD flag
    pub forbidden: bool,
    /// the resolved form carries the WARN flag
    pub warn: bool,
}

impl SpellCheck {
    const fn correct() -> SpellCheck {
        SpellCheck {
            correct: true,
            forbidden: false,
            warn: false,
        }
    }

    const fn incorrect() -> SpellCheck {
        SpellCheck {
            correct: false,
            forbidden: false,
            warn: false,
        }
    }
}

/// Tunables for suggestion generation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpellerConfig {
    /// maximum number of suggestions returned, `None` for unlimited
    pub n_best: Option<usize>,
    /// per-character wall-clock allowance in milliseconds
    pub budget_ms_per_char: u64,
    /// overall wall-clock cap in milliseconds
    pub budget_cap_ms: u64,
}

impl SpellerConfig {
    /// The stock configuration.
    pub const fn default() -> SpellerConfig {
        SpellerConfig {
            n_best: Some(10),
            budget_ms_per_char: SUGGEST_BUDGET_MS_PER_CHAR,
            budget_cap_ms: SUGGEST_BUDGET_CAP_MS,
        }
    }
}

/// Read-only correctness checking and suggestion generation.
pub trait Speller {
    /// Whether `word` is correctly spelled.
    fn is_correct(&self, word: &str) -> bool;
    /// Full verdict for `word`, including forbidden/warn flags.
    fn spell(&self, word: &str) -> SpellCheck;
    /// Ranked correction candidates for `word`.
    fn suggest(&self, word: &str) -> Vec<Suggestion>;
    /// Ranked correction candidates under a custom configuration.
    fn suggest_with_config(&self, word: &str, config: &SpellerConfig) -> Vec<Suggestion>;
}

impl Speller for DictSpeller {
    #[inline]
    fn is_correct(&self, word: &str) -> bool {
        DictSpeller::is_correct(self, word)
    }

    #[inline]
    fn spell(&self, word: &str) -> SpellCheck {
        DictSpeller::spell(self, word)
    }

    #[inline]
    fn suggest(&self, word: &str) -> Vec<Suggestion> {
        DictSpeller::suggest(self, word)
    }

    #[inline]
    fn suggest_with_config(&self, word: &str, config: &SpellerConfig) -> Vec<Suggestion> {
        DictSpeller::suggest_with_config(self, word, config)
    }
}

/// Speller backed by a [`WordIndex`] and its [`AffixRuleSet`].
#[derive(Debug)]
pub struct DictSpeller {
    index: WordIndex,
}

impl DictSpeller {
    /// Wraps an already-populated index.
    pub fn new(index: WordIndex) -> DictSpeller {
        DictSpeller { index }
    }

    /// Parses an affix file and word list into a ready speller.
    pub fn from_texts(aff: &str, dic: &str) -> DictSpeller {
        let aff = AffixRuleSet::parse(aff);
        let mut index = WordIndex::new(aff);
        index.parse_dictionary(dic);
        DictSpeller { index }
    }

    /// The underlying word index.
    pub fn index(&self) -> &WordIndex {
        &self.index
    }

    /// Mutable access for runtime add/remove.
    pub fn index_mut(&mut self) -> &mut WordIndex {
        &mut self.index
    }

    /// Adds a word at runtime (custom-word path).
    pub fn add_word(&mut self, word: &str) {
        self.index.add(word, &[]);
    }

    /// Removes a word at runtime (custom-word path).
    pub fn remove_word(&mut self, word: &str) {
        self.index.remove(word);
    }

    /// Trims and applies input conversions, the common front of every query.
    pub(crate) fn normalize(&self, word: &str) -> String {
        let mut value = word.trim().to_string();
        for conv in self.index.affix().conversion_in() {
            value = conv.apply(&value);
        }
        value
    }

    pub(crate) fn apply_output_conversion(&self, value: &str) -> String {
        let mut value = value.to_string();
        for conv in self.index.affix().conversion_out() {
            value = conv.apply(&value);
        }
        value
    }

    /// Exact or compound resolution for one exact casing of the input.
    /// ONLYINCOMPOUND-flagged entries never match the exact path.
    fn resolve(&self, value: &str) -> Option<Vec<FlagCode>> {
        let aff = self.index.affix();

        if let Some(codes) = self.index.codes(value) {
            if !AffixRuleSet::flags_contain(codes, aff.only_in_compound()) {
                return Some(codes.to_vec());
            }
        }

        if value.chars().count() >= aff.compound_min() && aff.matches_compound(value) {
            return Some(Vec::new());
        }

        None
    }

    /// Resolution with the case-folding ladder: exact form first, then
    /// sentence case for all-caps input, then fully lower-cased. Case-folded
    /// matches carrying KEEPCASE or FORBIDDENWORD do not count.
    fn resolve_cased(&self, value: &str) -> Option<Vec<FlagCode>> {
        if let Some(codes) = self.resolve(value) {
            return Some(codes);
        }

        let aff = self.index.affix();
        let mut folded: Vec<SmolStr> = Vec::new();
        if case_handling::is_all_caps(value) {
            folded.push(case_handling::sentence_case(value));
        }
        folded.push(case_handling::lower_case(value));

        for candidate in folded {
            if candidate.as_str() == value {
                continue;
            }
            if let Some(codes) = self.resolve(&candidate) {
                if AffixRuleSet::flags_contain(&codes, aff.keep_case())
                    || AffixRuleSet::flags_contain(&codes, aff.forbidden_word())
                {
                    continue;
                }
                return Some(codes);
            }
        }

        None
    }

    /// Full verdict for `word`.
    pub fn spell(&self, word: &str) -> SpellCheck {
        let value = self.normalize(word);
        if value.is_empty() {
            return SpellCheck::correct();
        }

        // tokens with zero letters per the Unicode category are not words
        if value.chars().all(|c| !GeneralCategory::of(c).is_letter()) {
            return SpellCheck::correct();
        }

        match self.resolve_cased(&value) {
            Some(codes) => {
                let aff = self.index.affix();
                let forbidden = AffixRuleSet::flags_contain(&codes, aff.forbidden_word());
                let warn = AffixRuleSet::flags_contain(&codes, aff.warn_flag());
                SpellCheck {
                    correct: !forbidden,
                    forbidden,
                    warn,
                }
            }
            None => SpellCheck::incorrect(),
        }
    }

    /// Boolean collapse of [`DictSpeller::spell`].
    #[inline]
    pub fn is_correct(&self, word: &str) -> bool {
        self.spell(word).correct
    }

    /// Whether a generated candidate is worth suggesting: it must resolve,
    /// and the resolved form must carry neither NOSUGGEST nor FORBIDDENWORD.
    pub(crate) fn accepts_for_suggestion(&self, value: &str) -> bool {
        let aff = self.index.affix();
        match self.resolve_cased(value) {
            Some(codes) => {
                !AffixRuleSet::flags_contain(&codes, aff.nosuggest())
                    && !AffixRuleSet::flags_contain(&codes, aff.forbidden_word())
            }
            None => false,
        }
    }

    /// Ranked correction candidates with the stock configuration.
    #[inline]
    pub fn suggest(&self, word: &str) -> Vec<Suggestion> {
        self.suggest_with_config(word, &SpellerConfig::default())
    }

    /// Ranked correction candidates under `config`.
    pub fn suggest_with_config(&self, word: &str, config: &SpellerConfig) -> Vec<Suggestion> {
        SuggestionWorker::new(self, config.clone()).suggest(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AFF: &str = "\
TRY esianrtolcdugmphbyfvkwz

ICONV 1
ICONV ’ '

KEEPCASE K
FORBIDDENWORD F
NOSUGGEST Q
ONLYINCOMPOUND O
COMPOUNDMIN 1
COMPOUNDRULE 1
COMPOUNDRULE XY*

SFX B Y 2
SFX B 0 ed [^y]
SFX B y ied y
";

    const DIC: &str = "\
8
walk/B
don't
LaTeX/K
*crapola
damn/Q
foo/X
bar/Y
mid/O
";

    fn speller() -> DictSpeller {
        DictSpeller::from_texts(AFF, DIC)
    }

    #[test]
    fn exact_and_derived_forms_are_correct() {
        let speller = speller();
        assert!(speller.is_correct("walk"));
        assert!(speller.is_correct("walked"));
        assert!(!speller.is_correct("walkings"));
    }

    #[test]
    fn add_then_remove_round_trip() {
        let mut speller = speller();
        assert!(!speller.is_correct("snuckles"));
        speller.add_word("snuckles");
        assert!(speller.is_correct("snuckles"));
        speller.remove_word("snuckles");
        assert!(!speller.is_correct("snuckles"));
    }

    #[test]
    fn whitespace_and_input_conversion() {
        let speller = speller();
        assert!(speller.is_correct("  walk \t"));
        // ICONV maps the typographic apostrophe onto the ASCII one
        assert!(speller.is_correct("don’t"));
    }

    #[test]
    fn empty_and_letterless_tokens_are_correct() {
        let speller = speller();
        assert!(speller.is_correct(""));
        assert!(speller.is_correct("   "));
        assert!(speller.is_correct("1234"));
        assert!(speller.is_correct("!?"));
    }

    #[test]
    fn case_folding_ladder() {
        let speller = speller();
        assert!(speller.is_correct("WALK"));
        assert!(speller.is_correct("Walk"));
    }

    #[test]
    fn keepcase_suppresses_folded_matches() {
        let speller = speller();
        assert!(speller.is_correct("LaTeX"));
        assert!(!speller.is_correct("latex"));
    }

    #[test]
    fn forbidden_words_are_rejected_and_flagged() {
        let speller = speller();
        let check = speller.spell("crapola");
        assert!(!check.correct);
        assert!(check.forbidden);
    }

    #[test]
    fn compound_patterns_match_above_min_length() {
        let speller = speller();
        assert!(speller.is_correct("foobar"));
        assert!(speller.is_correct("foobarbar"));
        assert!(!speller.is_correct("barfoo"));
    }

    #[test]
    fn only_in_compound_is_excluded_from_exact_match() {
        let speller = speller();
        assert!(!speller.is_correct("mid"));
    }

    #[test]
    fn nosuggest_words_are_correct_but_not_suggestable() {
        let speller = speller();
        assert!(speller.is_correct("damn"));
        assert!(!speller.accepts_for_suggestion("damn"));
        assert!(speller.accepts_for_suggestion("walk"));
    }
}
