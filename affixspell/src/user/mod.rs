//! Multi-language orchestration: one speller per installed language, a
//! custom word list shared across languages, and content-language routing.

use hashbrown::HashMap;
use language_tags::LanguageTag;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::loader::LoadedDictionaries;
use crate::speller::DictSpeller;

pub mod custom;

pub use self::custom::{CustomWordList, CustomWordsFile};

/// Routing value substituted when content-language detection is unreliable.
/// Always resolves to the first installed language.
pub const UNRELIABLE_LANGUAGE: &str = "und";

/// Configuration invariant violations at user construction.
#[derive(Debug, Error)]
pub enum UserError {
    /// the language list and speller list differ in length
    #[error("language/dictionary count mismatch: {languages} languages, {spellers} dictionaries")]
    LanguageCountMismatch {
        /// number of installed language tags
        languages: usize,
        /// number of spellers actually supplied
        spellers: usize,
    },
    /// no language loaded at all
    #[error("no languages installed")]
    NoLanguages,
}

/// Result shape produced by an external content-language detector. Only
/// `is_reliable` and the top-ranked tag are consumed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    /// whether the detector trusts its own answer
    pub is_reliable: bool,
    /// detected languages, best first
    pub languages: Vec<DetectedLanguage>,
}

/// One detector candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedLanguage {
    /// BCP 47 language tag
    pub language: String,
    /// detector confidence, 0..=100
    pub confidence: f32,
}

impl Detection {
    /// The top-ranked tag, or the unreliable sentinel.
    pub fn routing_language(&self) -> &str {
        if !self.is_reliable {
            return UNRELIABLE_LANGUAGE;
        }
        self.languages
            .first()
            .map(|l| l.language.as_str())
            .unwrap_or(UNRELIABLE_LANGUAGE)
    }
}

/// A user session: installed languages in priority order, one speller per
/// language, and the custom words layered on top.
pub struct MultiLanguageUser {
    languages: Vec<String>,
    spellers: HashMap<String, DictSpeller>,
    custom_words: CustomWordList,
}

impl MultiLanguageUser {
    /// Builds a user from parallel language/speller lists. The lists must
    /// match one-to-one; a language whose dictionary failed to load has to be
    /// dropped from both before construction.
    pub fn new(
        languages: Vec<String>,
        spellers: Vec<DictSpeller>,
        custom_words: CustomWordList,
    ) -> Result<MultiLanguageUser, UserError> {
        if languages.len() != spellers.len() {
            return Err(UserError::LanguageCountMismatch {
                languages: languages.len(),
                spellers: spellers.len(),
            });
        }
        if languages.is_empty() {
            return Err(UserError::NoLanguages);
        }

        let spellers = languages.iter().cloned().zip(spellers).collect();
        let mut user = MultiLanguageUser {
            languages,
            spellers,
            custom_words,
        };
        user.apply_custom_words();
        Ok(user)
    }

    /// Builds a user straight from loader output, parsing each language's
    /// dictionary pair.
    pub fn from_loaded(
        loaded: LoadedDictionaries,
        custom_words: CustomWordList,
    ) -> Result<MultiLanguageUser, UserError> {
        let mut languages = Vec::with_capacity(loaded.dicts.len());
        let mut spellers = Vec::with_capacity(loaded.dicts.len());
        for pair in loaded.dicts {
            spellers.push(DictSpeller::from_texts(&pair.aff, &pair.dic));
            languages.push(pair.language);
        }
        MultiLanguageUser::new(languages, spellers, custom_words)
    }

    /// Seeds each installed language's index with the persisted custom words
    /// recorded against it. Recorded languages no longer installed are kept
    /// in the list but left inert.
    fn apply_custom_words(&mut self) {
        for (word, recorded) in self.custom_words.entries() {
            for language in recorded {
                if let Some(speller) = self.spellers.get_mut(language) {
                    speller.add_word(word);
                }
            }
        }
    }

    /// Installed language tags, priority order.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// The speller for one installed language.
    pub fn speller(&self, language: &str) -> Option<&DictSpeller> {
        self.spellers.get(language)
    }

    /// The custom word list.
    pub fn custom_words(&self) -> &CustomWordList {
        &self.custom_words
    }

    /// The first installed tag whose primary language subtag matches
    /// `content_language`, or the first installed language when nothing
    /// matches. Never fails: construction guarantees a non-empty list.
    pub fn preferred_language(&self, content_language: &str) -> &str {
        let target = primary_subtag(content_language);
        if !target.is_empty() && target != UNRELIABLE_LANGUAGE {
            for language in &self.languages {
                if primary_subtag(language) == target {
                    return language;
                }
            }
        }
        &self.languages[0]
    }

    /// Routes a detector result to an installed language.
    pub fn route_detection(&self, detection: &Detection) -> &str {
        self.preferred_language(detection.routing_language())
    }

    /// Whether `word` is correct under one installed language's speller.
    pub fn check(&self, language: &str, word: &str) -> Option<bool> {
        self.spellers.get(language).map(|s| s.is_correct(word))
    }

    /// Adds a custom word to every installed language that currently marks
    /// it incorrect, recording those languages against the word.
    ///
    /// A freshly added word can still fail the correctness re-check when it
    /// shadows a stale tombstone, so the add is re-verified and repaired with
    /// one remove/re-add cycle before the result is trusted.
    pub fn add_word(&mut self, word: &str) {
        let word = word.trim();
        if word.is_empty() {
            return;
        }

        for language in &self.languages {
            let speller = match self.spellers.get_mut(language) {
                Some(speller) => speller,
                None => continue,
            };
            if speller.is_correct(word) {
                continue;
            }

            speller.add_word(word);
            if !speller.is_correct(word) {
                speller.remove_word(word);
                speller.add_word(word);
                if !speller.is_correct(word) {
                    log::warn!(
                        "custom word {:?} still incorrect in {} after repair",
                        word,
                        language
                    );
                }
            }

            self.custom_words.record(word, language);
        }
    }

    /// Removes a custom word from every language recorded for it and drops
    /// the tracking entry. A word that was never tracked is a no-op; a
    /// recorded language that no longer holds the word is tolerated.
    pub fn remove_word(&mut self, word: &str) {
        let word = word.trim();
        let recorded = match self.custom_words.take(word) {
            Some(recorded) => recorded,
            None => return,
        };

        for language in recorded {
            if let Some(speller) = self.spellers.get_mut(&language) {
                speller.remove_word(word);
            }
        }
    }
}

/// The primary language subtag of a BCP 47 tag, lower-cased. Falls back to
/// the text before the first `-` for tags the parser rejects.
fn primary_subtag(tag: &str) -> String {
    match LanguageTag::parse(tag) {
        Ok(parsed) => parsed.primary_language().to_lowercase(),
        Err(_) => tag
            .split('-')
            .next()
            .unwrap_or_default()
            .to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AFF: &str = "TRY esianrtolcdugmphbyfvkwz\n";

    fn user() -> MultiLanguageUser {
        let au = DictSpeller::from_texts(AFF, "2\ncolour\ncolourful\n");
        let en = DictSpeller::from_texts(AFF, "1\ncolor\n");
        MultiLanguageUser::new(
            vec!["en-au".to_string(), "en-en".to_string()],
            vec![au, en],
            CustomWordList::new(),
        )
        .unwrap()
    }

    #[test]
    fn mismatched_counts_fail_construction() {
        let spellers = vec![
            DictSpeller::from_texts(AFF, "1\nhello\n"),
            DictSpeller::from_texts(AFF, "1\nhello\n"),
        ];
        let result = MultiLanguageUser::new(
            vec!["en".to_string(), "fr".to_string(), "de".to_string()],
            spellers,
            CustomWordList::new(),
        );
        assert!(matches!(
            result,
            Err(UserError::LanguageCountMismatch {
                languages: 3,
                spellers: 2
            })
        ));
    }

    #[test]
    fn preferred_language_matches_primary_subtag() {
        let user = user();
        assert_eq!(user.preferred_language("en"), "en-au");
        assert_eq!(user.preferred_language("en-GB"), "en-au");
    }

    #[test]
    fn preferred_language_falls_back_to_first_installed() {
        let user = user();
        assert_eq!(user.preferred_language("fr"), "en-au");
        assert_eq!(user.preferred_language(""), "en-au");
        assert_eq!(user.preferred_language(UNRELIABLE_LANGUAGE), "en-au");
    }

    #[test]
    fn unreliable_detection_routes_to_first_language() {
        let user = user();
        let detection = Detection {
            is_reliable: false,
            languages: vec![DetectedLanguage {
                language: "fr".to_string(),
                confidence: 99.0,
            }],
        };
        assert_eq!(detection.routing_language(), UNRELIABLE_LANGUAGE);
        assert_eq!(user.route_detection(&detection), "en-au");
    }

    #[test]
    fn add_word_registers_in_every_failing_language() {
        let mut user = user();
        user.add_word("snuckles");

        assert_eq!(user.check("en-au", "snuckles"), Some(true));
        assert_eq!(user.check("en-en", "snuckles"), Some(true));
        assert_eq!(
            user.custom_words().languages("snuckles").map(|l| l.len()),
            Some(2)
        );
    }

    #[test]
    fn add_word_skips_languages_already_correct() {
        let mut user = user();
        user.add_word("colourful");

        let recorded = user.custom_words().languages("colourful").unwrap();
        assert!(!recorded.contains("en-au"));
        assert!(recorded.contains("en-en"));
    }

    #[test]
    fn remove_word_only_touches_recorded_languages() {
        let mut user = user();
        user.add_word("colourful");
        user.remove_word("colourful");

        // native dictionary verdict untouched, custom registration gone
        assert_eq!(user.check("en-au", "colourful"), Some(true));
        assert_eq!(user.check("en-en", "colourful"), Some(false));
        assert!(user.custom_words().languages("colourful").is_none());
    }

    #[test]
    fn inert_inputs_are_no_ops() {
        let mut user = user();
        user.add_word("   ");
        user.remove_word("nevertracked");
        assert!(user.custom_words().is_empty());
    }

    #[test]
    fn persisted_custom_words_seed_spellers() {
        let au = DictSpeller::from_texts(AFF, "1\ncolour\n");
        let mut custom = CustomWordList::new();
        custom.record("snuckles", "en-au");
        let user = MultiLanguageUser::new(
            vec!["en-au".to_string()],
            vec![au],
            custom,
        )
        .unwrap();
        assert_eq!(user.check("en-au", "snuckles"), Some(true));
    }
}
