//! Affix-file parsing: prefix/suffix rule tables, compound rules,
//! replacement and conversion tables, and checker flags.
//!
//! Parsing is deliberately lenient. A malformed entry is dropped and logged;
//! a malformed line never aborts the rest of the file.

use hashbrown::HashMap;
use itertools::Itertools;
use regex::{Regex, RegexBuilder};
use smol_str::SmolStr;

use crate::constants::{
    DEFAULT_COMPOUND_MIN, DEFAULT_KEY_TABLE, ENGLISH_FREQUENCY_ALPHABET, FORBIDDEN_SENTINEL,
};
use crate::types::FlagCode;

mod rule;

pub use self::rule::{Rule, RuleEntry, RuleKind};

/// How flag codes are encoded in the affix and word-list files (FLAG
/// directive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagMode {
    /// one character per flag (the default)
    #[default]
    Single,
    /// two characters per flag (`FLAG long`)
    Long,
    /// comma-separated numeric flags (`FLAG num`)
    Numeric,
}

impl FlagMode {
    fn from_value(value: &str) -> FlagMode {
        match value {
            "long" => FlagMode::Long,
            "num" => FlagMode::Numeric,
            _ => FlagMode::Single,
        }
    }
}

/// One ICONV or OCONV substitution: a case-insensitive pattern applied
/// globally.
#[derive(Debug, Clone)]
pub struct Conversion {
    pattern: Regex,
    replacement: String,
}

impl Conversion {
    fn new(find: &str, replace: &str) -> Option<Conversion> {
        match RegexBuilder::new(find).case_insensitive(true).build() {
            Ok(pattern) => Some(Conversion {
                pattern,
                replacement: replace.to_string(),
            }),
            Err(err) => {
                log::warn!("dropping conversion entry {:?}: {}", find, err);
                None
            }
        }
    }

    /// Applies the substitution to every occurrence in `value`.
    pub fn apply(&self, value: &str) -> String {
        self.pattern
            .replace_all(value, regex::NoExpand(&self.replacement))
            .into_owned()
    }
}

/// One COMPOUNDRULE pattern over rule-code characters, plus its compiled
/// form. Recompiled whenever a code's word bucket changes; a code with no
/// known words stays a literal fragment.
#[derive(Debug, Clone)]
pub struct CompoundPattern {
    source: String,
    regex: Option<Regex>,
}

/// Structured view of one affix file.
#[derive(Debug, Default)]
pub struct AffixRuleSet {
    pub(crate) rules: HashMap<FlagCode, Rule>,
    compound_rules: Vec<CompoundPattern>,
    compound_rule_codes: HashMap<FlagCode, Vec<SmolStr>>,
    replacement_table: Vec<(String, String)>,
    conversion_in: Vec<Conversion>,
    conversion_out: Vec<Conversion>,
    flag_mode: FlagMode,
    try_chars: Vec<char>,
    key_groups: Vec<String>,
    compound_min: Option<usize>,
    keep_case: Option<FlagCode>,
    forbidden_word: Option<FlagCode>,
    nosuggest: Option<FlagCode>,
    only_in_compound: Option<FlagCode>,
    need_affix: Option<FlagCode>,
    warn: Option<FlagCode>,
    /// Unrecognized single-value directives, stored verbatim by name.
    extra_flags: HashMap<SmolStr, String>,
}

impl AffixRuleSet {
    /// Parses affix-file text into a rule set, applying defaults for
    /// anything the file leaves undeclared.
    pub fn parse(text: &str) -> AffixRuleSet {
        let mut aff = AffixRuleSet::default();
        let lines: Vec<&str> = text.lines().collect();
        let mut i = 0usize;

        while i < lines.len() {
            let line = lines[i].trim();
            i += 1;

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let directive = match tokens.next() {
                Some(d) => d,
                None => continue,
            };
            let rest: Vec<&str> = tokens.collect();

            match directive {
                "PFX" | "SFX" => {
                    i = aff.parse_affix_rule(directive, &rest, &lines, i);
                }
                "REP" => {
                    // the count header has a single numeric token
                    if rest.len() >= 2 {
                        aff.replacement_table
                            .push((rest[0].to_string(), rest[1].to_string()));
                    }
                }
                "ICONV" | "OCONV" => {
                    if rest.len() >= 2 {
                        if let Some(conv) = Conversion::new(rest[0], rest[1]) {
                            if directive == "ICONV" {
                                aff.conversion_in.push(conv);
                            } else {
                                aff.conversion_out.push(conv);
                            }
                        }
                    }
                }
                "COMPOUNDRULE" => {
                    if let Some(pattern) = rest.first() {
                        if pattern.parse::<usize>().is_err() {
                            aff.add_compound_rule(pattern);
                        }
                    }
                }
                "COMPOUNDMIN" => {
                    // an explicit 0 is a valid declaration, only absent or
                    // non-numeric values fall back to the default
                    if let Some(n) = rest.first().and_then(|v| v.parse::<usize>().ok()) {
                        aff.compound_min = Some(n);
                    }
                }
                "TRY" => {
                    if let Some(chars) = rest.first() {
                        aff.set_try_chars(chars);
                    }
                }
                "KEY" => {
                    if let Some(groups) = rest.first() {
                        aff.key_groups
                            .extend(groups.split('|').map(|g| g.to_string()));
                    }
                }
                "FLAG" => {
                    if let Some(value) = rest.first() {
                        aff.flag_mode = FlagMode::from_value(value);
                    }
                }
                "ONLYINCOMPOUND" => {
                    if let Some(code) = rest.first() {
                        let code = FlagCode::new(*code);
                        aff.compound_rule_codes.entry(code.clone()).or_default();
                        aff.only_in_compound = Some(code);
                    }
                }
                "NEEDAFFIX" => aff.need_affix = rest.first().map(|c| FlagCode::new(*c)),
                "KEEPCASE" => aff.keep_case = rest.first().map(|c| FlagCode::new(*c)),
                "FORBIDDENWORD" => aff.forbidden_word = rest.first().map(|c| FlagCode::new(*c)),
                "NOSUGGEST" => aff.nosuggest = rest.first().map(|c| FlagCode::new(*c)),
                "WARN" => aff.warn = rest.first().map(|c| FlagCode::new(*c)),
                other => {
                    if rest.len() == 1 {
                        aff.extra_flags
                            .insert(SmolStr::new(other), rest[0].to_string());
                    }
                }
            }
        }

        if aff.key_groups.is_empty() {
            aff.key_groups
                .extend(DEFAULT_KEY_TABLE.iter().map(|g| g.to_string()));
        }
        if aff.try_chars.is_empty() {
            aff.try_chars = ENGLISH_FREQUENCY_ALPHABET.chars().collect();
        }
        aff.recompile_compound_patterns();

        aff
    }

    fn parse_affix_rule(
        &mut self,
        directive: &str,
        header: &[&str],
        lines: &[&str],
        mut i: usize,
    ) -> usize {
        // header: code, combineable (Y/N), entry count
        if header.len() < 3 {
            return i;
        }
        let code = FlagCode::new(header[0]);
        let combineable = header[1] == "Y";
        let kind = if directive == "PFX" {
            RuleKind::Prefix
        } else {
            RuleKind::Suffix
        };
        let count: usize = match header[2].parse() {
            Ok(n) => n,
            Err(_) => {
                log::warn!("bad {} {} entry count {:?}", directive, code, header[2]);
                return i;
            }
        };

        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            if i >= lines.len() {
                break;
            }
            let tokens: Vec<&str> = lines[i].split_whitespace().collect();
            i += 1;

            // entry: directive, code, remove, add[/continuation], [match]
            if tokens.len() < 4 || tokens[0] != directive || tokens[1] != code.as_str() {
                continue;
            }
            if let Some(entry) =
                self.parse_rule_entry(kind, tokens[2], tokens[3], tokens.get(4).copied())
            {
                entries.push(entry);
            }
        }

        self.rules.insert(
            code,
            Rule {
                kind,
                combineable,
                entries,
            },
        );
        i
    }

    fn parse_rule_entry(
        &self,
        kind: RuleKind,
        remove: &str,
        add: &str,
        condition: Option<&str>,
    ) -> Option<RuleEntry> {
        let (add, continuation) = match add.split_once('/') {
            Some((a, codes)) => (a, self.parse_flags(codes)),
            None => (add, Vec::new()),
        };
        let add = if add == "0" { "" } else { add };

        let remove = if remove == "0" || remove.is_empty() {
            None
        } else {
            let pattern = match kind {
                RuleKind::Suffix => format!("{}$", remove),
                RuleKind::Prefix => format!("^{}", remove),
            };
            match Regex::new(&pattern) {
                Ok(re) => Some(re),
                Err(err) => {
                    log::warn!("dropping affix entry, bad removal {:?}: {}", remove, err);
                    return None;
                }
            }
        };

        let matcher = match condition {
            None | Some(".") => None,
            Some(cond) => {
                let pattern = match kind {
                    RuleKind::Suffix => format!("{}$", cond),
                    RuleKind::Prefix => format!("^{}", cond),
                };
                match Regex::new(&pattern) {
                    Ok(re) => Some(re),
                    Err(err) => {
                        log::warn!("dropping affix entry, bad condition {:?}: {}", cond, err);
                        return None;
                    }
                }
            }
        };

        Some(RuleEntry {
            add: SmolStr::new(add),
            remove,
            matcher,
            continuation,
        })
    }

    /// Splits a code string into flags per the active FLAG encoding.
    pub fn parse_flags(&self, value: &str) -> Vec<FlagCode> {
        match self.flag_mode {
            FlagMode::Single => value
                .chars()
                .map(|c| FlagCode::from(c.to_string()))
                .collect(),
            FlagMode::Long => {
                let chars: Vec<char> = value.chars().collect();
                chars
                    .chunks(2)
                    .map(|pair| pair.iter().collect::<String>().into())
                    .collect()
            }
            FlagMode::Numeric => value
                .split(',')
                .filter(|s| !s.is_empty())
                .map(FlagCode::new)
                .collect(),
        }
    }

    fn set_try_chars(&mut self, declared: &str) {
        let mut seen: Vec<char> = Vec::new();
        for ch in declared.chars().flat_map(|c| c.to_lowercase()) {
            if !seen.contains(&ch) {
                seen.push(ch);
            }
        }
        // dictionaries routinely omit rare letters from TRY; top up from the
        // frequency-ordered English alphabet
        for ch in ENGLISH_FREQUENCY_ALPHABET.chars() {
            if !seen.contains(&ch) {
                seen.push(ch);
            }
        }
        self.try_chars = seen;
    }

    fn add_compound_rule(&mut self, pattern: &str) {
        for ch in pattern.chars() {
            self.compound_rule_codes
                .entry(FlagCode::from(ch.to_string()))
                .or_default();
        }
        self.compound_rules.push(CompoundPattern {
            source: pattern.to_string(),
            regex: None,
        });
    }

    /// Whether `code` was declared by a COMPOUNDRULE pattern (or as the
    /// ONLYINCOMPOUND marker).
    pub(crate) fn is_compound_code(&self, code: &FlagCode) -> bool {
        self.compound_rule_codes.contains_key(code)
    }

    /// Appends a word to a compound code's bucket. The owning patterns are
    /// stale until [`AffixRuleSet::recompile_compound_patterns`] runs.
    pub(crate) fn push_compound_word(&mut self, code: &FlagCode, word: &str) {
        if let Some(bucket) = self.compound_rule_codes.get_mut(code) {
            bucket.push(SmolStr::new(word));
        }
    }

    /// Rebuilds every compound pattern from the current word buckets. Codes
    /// with a non-empty bucket become an alternation of their words; anything
    /// else stays literal, so `*` and `?` keep their quantifier meaning.
    pub(crate) fn recompile_compound_patterns(&mut self) {
        let codes = &self.compound_rule_codes;
        for compound in self.compound_rules.iter_mut() {
            let mut pattern = String::from("^");
            for ch in compound.source.chars() {
                let code = FlagCode::from(ch.to_string());
                match codes.get(&code) {
                    Some(words) if !words.is_empty() => {
                        pattern.push('(');
                        pattern.push_str(&words.iter().map(|w| regex::escape(w)).join("|"));
                        pattern.push(')');
                    }
                    _ => pattern.push(ch),
                }
            }
            pattern.push('$');

            compound.regex = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
                Ok(re) => Some(re),
                Err(err) => {
                    log::warn!("dropping compound rule {:?}: {}", compound.source, err);
                    None
                }
            };
        }
    }

    /// Whether `value` matches any compiled compound pattern.
    pub(crate) fn matches_compound(&self, value: &str) -> bool {
        self.compound_rules
            .iter()
            .filter_map(|c| c.regex.as_ref())
            .any(|re| re.is_match(value))
    }

    /// The FORBIDDENWORD flag, synthesizing a private sentinel when the affix
    /// file never declared one.
    pub(crate) fn ensure_forbidden_flag(&mut self) -> FlagCode {
        match &self.forbidden_word {
            Some(flag) => flag.clone(),
            None => {
                let flag = FlagCode::new(FORBIDDEN_SENTINEL);
                self.forbidden_word = Some(flag.clone());
                flag
            }
        }
    }

    /// Whether `codes` contains the given optional flag.
    pub(crate) fn flags_contain(codes: &[FlagCode], flag: Option<&FlagCode>) -> bool {
        match flag {
            Some(flag) => codes.contains(flag),
            None => false,
        }
    }

    /// Looks up the rule registered for `code`.
    pub fn rule(&self, code: &str) -> Option<&Rule> {
        self.rules.get(code)
    }

    /// The candidate alphabet for suggestion generation.
    pub fn try_chars(&self) -> &[char] {
        &self.try_chars
    }

    /// Keyboard adjacency groups.
    pub fn key_groups(&self) -> &[String] {
        &self.key_groups
    }

    /// Ordered REP pairs.
    pub fn replacement_table(&self) -> &[(String, String)] {
        &self.replacement_table
    }

    /// Ordered ICONV substitutions.
    pub fn conversion_in(&self) -> &[Conversion] {
        &self.conversion_in
    }

    /// Ordered OCONV substitutions.
    pub fn conversion_out(&self) -> &[Conversion] {
        &self.conversion_out
    }

    /// Minimum sub-word length for compound matching.
    pub fn compound_min(&self) -> usize {
        self.compound_min.unwrap_or(DEFAULT_COMPOUND_MIN)
    }

    /// Value of an unrecognized directive, if the file declared it.
    pub fn extra_flag(&self, name: &str) -> Option<&str> {
        self.extra_flags.get(name).map(|v| v.as_str())
    }

    pub(crate) fn keep_case(&self) -> Option<&FlagCode> {
        self.keep_case.as_ref()
    }

    pub(crate) fn forbidden_word(&self) -> Option<&FlagCode> {
        self.forbidden_word.as_ref()
    }

    pub(crate) fn nosuggest(&self) -> Option<&FlagCode> {
        self.nosuggest.as_ref()
    }

    pub(crate) fn only_in_compound(&self) -> Option<&FlagCode> {
        self.only_in_compound.as_ref()
    }

    pub(crate) fn need_affix(&self) -> Option<&FlagCode> {
        self.need_affix.as_ref()
    }

    pub(crate) fn warn_flag(&self) -> Option<&FlagCode> {
        self.warn.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "\
SET UTF-8
TRY esianrtolcdugmphbyfvkwz

REP 2
REP f ph
REP ie ei

PFX A Y 1
PFX A 0 re .

SFX B Y 2
SFX B 0 ed [^y]
SFX B y ied y

SFX C N 1
SFX C 0 s .
";

    #[test]
    fn parses_rule_tables() {
        let aff = AffixRuleSet::parse(FIXTURE);

        let prefix = aff.rule("A").unwrap();
        assert_eq!(prefix.kind, RuleKind::Prefix);
        assert!(prefix.combineable);
        assert_eq!(prefix.entries.len(), 1);

        let suffix = aff.rule("B").unwrap();
        assert_eq!(suffix.kind, RuleKind::Suffix);
        assert_eq!(suffix.entries.len(), 2);

        assert!(!aff.rule("C").unwrap().combineable);
        assert_eq!(aff.replacement_table().len(), 2);
    }

    #[test]
    fn try_alphabet_unions_missing_letters() {
        let aff = AffixRuleSet::parse("TRY abc\n");
        let chars = aff.try_chars();
        assert_eq!(&chars[..3], &['a', 'b', 'c']);
        // every English letter present exactly once
        assert_eq!(chars.len(), 26);
        assert!(chars.contains(&'q'));
    }

    #[test]
    fn defaults_applied() {
        let aff = AffixRuleSet::parse("");
        assert_eq!(aff.compound_min(), 3);
        assert_eq!(aff.key_groups().len(), 3);
        assert_eq!(aff.try_chars().len(), 26);
    }

    #[test]
    fn compoundmin_non_numeric_falls_back() {
        let aff = AffixRuleSet::parse("COMPOUNDMIN x\n");
        assert_eq!(aff.compound_min(), 3);
    }

    #[test]
    fn compoundmin_zero_is_honored() {
        let aff = AffixRuleSet::parse("COMPOUNDMIN 0\n");
        assert_eq!(aff.compound_min(), 0);
    }

    #[test]
    fn bad_condition_drops_single_entry() {
        let text = "\
SFX B Y 2
SFX B 0 ed [^y
SFX B y ied y
";
        let aff = AffixRuleSet::parse(text);
        assert_eq!(aff.rule("B").unwrap().entries.len(), 1);
    }

    #[test]
    fn long_flag_mode() {
        let aff = AffixRuleSet::parse("FLAG long\n");
        assert_eq!(
            aff.parse_flags("AaBb"),
            vec![FlagCode::new("Aa"), FlagCode::new("Bb")]
        );
    }

    #[test]
    fn numeric_flag_mode() {
        let aff = AffixRuleSet::parse("FLAG num\n");
        assert_eq!(
            aff.parse_flags("101,202"),
            vec![FlagCode::new("101"), FlagCode::new("202")]
        );
    }

    #[test]
    fn unknown_directives_stored_verbatim() {
        let aff = AffixRuleSet::parse("WORDCHARS 0123456789\nSET UTF-8\n");
        assert_eq!(aff.extra_flag("WORDCHARS"), Some("0123456789"));
        assert_eq!(aff.extra_flag("SET"), Some("UTF-8"));
        assert_eq!(aff.extra_flag("NOPE"), None);
    }

    #[test]
    fn key_groups_split_on_pipe() {
        let aff = AffixRuleSet::parse("KEY qwert|asdf\n");
        assert_eq!(aff.key_groups(), &["qwert".to_string(), "asdf".to_string()]);
    }
}
