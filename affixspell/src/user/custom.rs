//! Custom word list shared across languages, with transparent upgrade of
//! the legacy persisted format.

use std::collections::BTreeSet;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Persisted custom-word shapes. Older versions stored a bare word array;
/// the current format records the languages each word was registered in.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CustomWordsFile {
    /// current format: word → language tags
    Current(HashMap<String, BTreeSet<String>>),
    /// legacy format: bare words, no language information
    Legacy(Vec<String>),
}

/// The in-memory custom word list: each word mapped to the set of language
/// tags it was registered in. A word with an empty set is tracked but inert.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct CustomWordList {
    words: HashMap<String, BTreeSet<String>>,
}

impl CustomWordList {
    /// An empty list.
    pub fn new() -> CustomWordList {
        CustomWordList::default()
    }

    /// Builds the list from either persisted shape, upgrading the legacy
    /// array to empty language sets.
    pub fn from_persisted(file: CustomWordsFile) -> CustomWordList {
        match file {
            CustomWordsFile::Current(words) => CustomWordList { words },
            CustomWordsFile::Legacy(list) => CustomWordList {
                words: list
                    .into_iter()
                    .map(|word| (word, BTreeSet::new()))
                    .collect(),
            },
        }
    }

    /// Parses persisted JSON in either format.
    pub fn from_json(text: &str) -> Result<CustomWordList, serde_json::Error> {
        serde_json::from_str::<CustomWordsFile>(text).map(CustomWordList::from_persisted)
    }

    /// Serializes the current format.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Whether `word` is tracked at all.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// The languages recorded for a tracked word.
    pub fn languages(&self, word: &str) -> Option<&BTreeSet<String>> {
        self.words.get(word)
    }

    /// Records `language` against `word`, tracking the word if new.
    pub fn record(&mut self, word: &str, language: &str) {
        self.words
            .entry(word.to_string())
            .or_default()
            .insert(language.to_string());
    }

    /// Drops a word's tracking entry, returning its recorded languages.
    pub fn take(&mut self, word: &str) -> Option<BTreeSet<String>> {
        self.words.remove(word)
    }

    /// Iterates tracked words with their recorded languages.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.words.iter().map(|(word, langs)| (word.as_str(), langs))
    }

    /// Tracked words.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.keys().map(|word| word.as_str())
    }

    /// Number of tracked words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_array_upgrades_to_empty_sets() {
        let list = CustomWordList::from_json(r#"["snuckles","colourful"]"#).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains("snuckles"));
        assert!(list.languages("snuckles").unwrap().is_empty());
    }

    #[test]
    fn current_map_round_trips() {
        let list = CustomWordList::from_json(r#"{"snuckles":["en-au","en-en"]}"#).unwrap();
        assert_eq!(
            list.languages("snuckles").map(|l| l.len()),
            Some(2)
        );

        let json = list.to_json().unwrap();
        let reparsed = CustomWordList::from_json(&json).unwrap();
        assert!(reparsed.languages("snuckles").unwrap().contains("en-au"));
    }

    #[test]
    fn record_and_take() {
        let mut list = CustomWordList::new();
        list.record("snuckles", "en-au");
        list.record("snuckles", "en-en");

        let taken = list.take("snuckles").unwrap();
        assert_eq!(taken.len(), 2);
        assert!(!list.contains("snuckles"));
        assert!(list.take("snuckles").is_none());
    }
}
