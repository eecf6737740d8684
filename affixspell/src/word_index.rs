//! Surface-form index expanded from a word list through affix rules.

use hashbrown::HashMap;
use smol_str::SmolStr;

use crate::affix::AffixRuleSet;
use crate::types::FlagCode;

/// Mapping from surface word to the flag codes that justify it.
///
/// Entries are expanded eagerly: adding a base word applies every resolvable
/// rule named by its codes, plus cross prefix×suffix combinations for
/// combineable rule pairs. A removed word is tombstoned rather than deleted,
/// so explicit removal stays distinguishable from absence.
#[derive(Debug, Default)]
pub struct WordIndex {
    aff: AffixRuleSet,
    entries: HashMap<SmolStr, Option<Vec<FlagCode>>>,
}

impl WordIndex {
    /// Creates an empty index over a parsed rule set.
    pub fn new(aff: AffixRuleSet) -> WordIndex {
        WordIndex {
            aff,
            entries: HashMap::new(),
        }
    }

    /// The rule set this index was expanded against.
    pub fn affix(&self) -> &AffixRuleSet {
        &self.aff
    }

    /// Whether `word` is present (added and not removed).
    pub fn contains(&self, word: &str) -> bool {
        matches!(self.entries.get(word), Some(Some(_)))
    }

    /// Whether `word` was explicitly removed.
    pub fn is_removed(&self, word: &str) -> bool {
        matches!(self.entries.get(word), Some(None))
    }

    /// The flag codes recorded for a present word.
    pub fn codes(&self, word: &str) -> Option<&[FlagCode]> {
        match self.entries.get(word) {
            Some(Some(codes)) => Some(codes),
            _ => None,
        }
    }

    /// Number of surface forms, tombstones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn register(&mut self, word: SmolStr, codes: Vec<FlagCode>) {
        if word.is_empty() {
            return;
        }
        // a live entry keeps its flags; a later registration of the same
        // surface form only adds codes it lacks
        if let Some(Some(existing)) = self.entries.get_mut(&word) {
            for code in codes {
                if !existing.contains(&code) {
                    existing.push(code);
                }
            }
            return;
        }
        self.entries.insert(word, Some(codes));
    }

    /// Adds a base word with its flag codes, expanding derived forms.
    ///
    /// Compound-rule codes route the word into their bucket instead of (or in
    /// addition to) the rule tables. Codes that resolve to nothing are
    /// ignored. A NEEDAFFIX flag suppresses the bare form but not its
    /// derivations.
    pub fn add(&mut self, word: &str, codes: &[FlagCode]) {
        if word.is_empty() {
            return;
        }

        let mut compound_changed = false;
        let mut derived: Vec<SmolStr> = Vec::new();

        for (idx, code) in codes.iter().enumerate() {
            if self.aff.is_compound_code(code) {
                self.aff.push_compound_word(code, word);
                compound_changed = true;
            }

            let rule = match self.aff.rule(code) {
                Some(rule) => rule,
                None => continue,
            };
            let forms = self.aff.apply_rule(word, code);

            if rule.combineable {
                // cross prefix×suffix combinations only; same-kind rules do
                // not stack
                for other in &codes[idx + 1..] {
                    let partner = match self.aff.rule(other) {
                        Some(partner) => partner,
                        None => continue,
                    };
                    if !partner.combineable || partner.kind == rule.kind {
                        continue;
                    }
                    for form in &forms {
                        derived.extend(self.aff.apply_rule(form, other));
                    }
                }
            }

            derived.extend(forms);
        }

        if !AffixRuleSet::flags_contain(codes, self.aff.need_affix()) {
            self.register(SmolStr::new(word), codes.to_vec());
        }
        for form in derived {
            self.register(form, Vec::new());
        }

        if compound_changed {
            self.aff.recompile_compound_patterns();
        }
    }

    /// Tombstones `word`. Both a never-added and a removed word test as not
    /// present.
    pub fn remove(&mut self, word: &str) {
        self.entries.insert(SmolStr::new(word), None);
    }

    /// Parses word-list text into the index, one `word[/codes]` entry per
    /// line. Malformed lines are skipped, never fatal.
    pub fn parse_dictionary(&mut self, text: &str) {
        for (number, line) in text.lines().enumerate() {
            // word lists open with an approximate entry count
            if number == 0 && line.trim().parse::<usize>().is_ok() {
                continue;
            }
            self.parse_dictionary_line(line);
        }
    }

    fn parse_dictionary_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return;
        }

        // morphological fields and trailing comments sit after whitespace
        let line = match line.split_whitespace().next() {
            Some(head) => head,
            None => return,
        };

        let (word, code_str) = split_codes(line);
        let forbidden = word.starts_with('*');
        let word = if forbidden { &word[1..] } else { word.as_str() };
        if word.is_empty() {
            return;
        }

        let mut codes = match code_str {
            Some(value) => self.aff.parse_flags(value),
            None => Vec::new(),
        };
        if forbidden {
            codes.push(self.aff.ensure_forbidden_flag());
        }

        let word = word.to_string();
        self.add(&word, &codes);
    }
}

/// Splits a word-list line at the first unescaped `/`, unescaping `\/` in
/// the word part.
fn split_codes(line: &str) -> (String, Option<&str>) {
    let bytes = line.as_bytes();
    let mut boundary = None;
    let mut escaped = false;

    for (i, b) in bytes.iter().enumerate() {
        if *b == b'/' && !escaped {
            boundary = Some(i);
            break;
        }
        escaped = *b == b'\\';
    }

    match boundary {
        Some(i) => (line[..i].replace("\\/", "/"), Some(&line[i + 1..])),
        None => (line.replace("\\/", "/"), None),
    }
}
