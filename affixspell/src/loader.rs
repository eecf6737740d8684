//! Dictionary loading, one affix/word-list pair per language.
//!
//! Languages whose files fail to load are dropped from both the pair list
//! and the surviving-tag list, preserving the relative order of the rest;
//! the user layer is only ever constructed from all-or-nothing languages.

use std::fs;
use std::path::PathBuf;

/// Raw dictionary texts for one language.
#[derive(Debug, Clone)]
pub struct DictionaryPair {
    /// the language tag the pair was requested under
    pub language: String,
    /// affix-file text
    pub aff: String,
    /// word-list text
    pub dic: String,
}

/// Loader output: the pairs that loaded, plus the surviving tags in request
/// order.
#[derive(Debug, Clone, Default)]
pub struct LoadedDictionaries {
    /// one entry per successfully loaded language
    pub dicts: Vec<DictionaryPair>,
    /// tags of the loaded languages, same order as `dicts`
    pub prefs: Vec<String>,
}

/// Source of dictionary texts for requested languages.
pub trait DictionaryLoader {
    /// Loads the subset of `languages` whose files are available.
    fn load(&self, languages: &[String]) -> LoadedDictionaries;
}

/// Loads `<tag>.aff` / `<tag>.dic` pairs from a directory.
#[derive(Debug, Clone)]
pub struct FsDictionaryLoader {
    root: PathBuf,
}

impl FsDictionaryLoader {
    /// A loader rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> FsDictionaryLoader {
        FsDictionaryLoader { root: root.into() }
    }

    fn read_pair(&self, language: &str) -> std::io::Result<DictionaryPair> {
        let aff = fs::read_to_string(self.root.join(format!("{}.aff", language)))?;
        let dic = fs::read_to_string(self.root.join(format!("{}.dic", language)))?;
        Ok(DictionaryPair {
            language: language.to_string(),
            aff,
            dic,
        })
    }
}

impl DictionaryLoader for FsDictionaryLoader {
    fn load(&self, languages: &[String]) -> LoadedDictionaries {
        let mut out = LoadedDictionaries::default();
        for language in languages {
            match self.read_pair(language) {
                Ok(pair) => {
                    out.prefs.push(language.clone());
                    out.dicts.push(pair);
                }
                Err(err) => {
                    log::warn!("dropping language {}: {}", language, err);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_language(dir: &std::path::Path, tag: &str, words: &str) {
        let mut aff = fs::File::create(dir.join(format!("{}.aff", tag))).unwrap();
        aff.write_all(b"TRY esianrtolcdugmphbyfvkwz\n").unwrap();
        let mut dic = fs::File::create(dir.join(format!("{}.dic", tag))).unwrap();
        dic.write_all(words.as_bytes()).unwrap();
    }

    #[test]
    fn missing_languages_dropped_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write_language(dir.path(), "en-au", "1\ncolour\n");
        write_language(dir.path(), "de", "1\nfarbe\n");

        let loader = FsDictionaryLoader::new(dir.path());
        let loaded = loader.load(&[
            "en-au".to_string(),
            "fr".to_string(),
            "de".to_string(),
        ]);

        assert_eq!(loaded.prefs, vec!["en-au".to_string(), "de".to_string()]);
        assert_eq!(loaded.dicts.len(), 2);
        assert_eq!(loaded.dicts[0].language, "en-au");
        assert_eq!(loaded.dicts[1].language, "de");
    }

    #[test]
    fn aff_without_dic_is_a_failed_language() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("en.aff"), "TRY abc\n").unwrap();

        let loader = FsDictionaryLoader::new(dir.path());
        let loaded = loader.load(&["en".to_string()]);
        assert!(loaded.dicts.is_empty());
        assert!(loaded.prefs.is_empty());
    }
}
