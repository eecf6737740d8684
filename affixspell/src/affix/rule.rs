//! Prefix/suffix transformation rules and their application.

use regex::Regex;
use smol_str::SmolStr;

use super::AffixRuleSet;
use crate::types::FlagCode;

/// Which end of the word a rule transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// transforms the start of the word
    Prefix,
    /// transforms the end of the word
    Suffix,
}

/// One prefix or suffix rule: an ordered set of alternative entries.
#[derive(Debug, Clone)]
pub struct Rule {
    /// prefix or suffix
    pub kind: RuleKind,
    /// whether this rule may combine with opposite-kind rules on the same
    /// word
    pub combineable: bool,
    /// alternative transformations, tried in order
    pub entries: Vec<RuleEntry>,
}

/// One transformation alternative within a rule.
#[derive(Debug, Clone)]
pub struct RuleEntry {
    /// characters appended (suffix) or prepended (prefix)
    pub add: SmolStr,
    /// anchored removal pattern, `None` for no removal
    pub(crate) remove: Option<Regex>,
    /// anchored applicability condition, `None` matches everything
    pub(crate) matcher: Option<Regex>,
    /// rule codes chain-applied to the derived form
    pub continuation: Vec<FlagCode>,
}

impl RuleEntry {
    /// The derived form for `word`, or `None` when the condition does not
    /// match.
    pub(crate) fn derive(&self, kind: RuleKind, word: &str) -> Option<SmolStr> {
        if let Some(matcher) = &self.matcher {
            if !matcher.is_match(word) {
                return None;
            }
        }

        let mut next = match &self.remove {
            Some(remove) => remove.replace(word, "").into_owned(),
            None => word.to_string(),
        };
        match kind {
            RuleKind::Suffix => next.push_str(&self.add),
            RuleKind::Prefix => next.insert_str(0, &self.add),
        }

        Some(SmolStr::new(next))
    }
}

impl AffixRuleSet {
    /// Applies the rule named by `code` to `word` and returns every derived
    /// surface form, including forms reached through continuation codes.
    ///
    /// Continuations are chased with an explicit work list; a code already
    /// seen on the current chain is skipped, so a cyclic rule graph cannot
    /// loop.
    pub fn apply_rule(&self, word: &str, code: &str) -> Vec<SmolStr> {
        let mut derived = Vec::new();
        let start = FlagCode::new(code);
        let mut work: Vec<(SmolStr, FlagCode, Vec<FlagCode>)> =
            vec![(SmolStr::new(word), start.clone(), vec![start])];

        while let Some((value, code, chain)) = work.pop() {
            let rule = match self.rules.get(&code) {
                Some(rule) => rule,
                None => continue,
            };

            for entry in &rule.entries {
                let next = match entry.derive(rule.kind, &value) {
                    Some(next) => next,
                    None => continue,
                };

                for cont in &entry.continuation {
                    if chain.contains(cont) {
                        continue;
                    }
                    let mut chain = chain.clone();
                    chain.push(cont.clone());
                    work.push((next.clone(), cont.clone(), chain));
                }

                derived.push(next);
            }
        }

        derived
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_removal_and_addition() {
        let aff = AffixRuleSet::parse("SFX B Y 2\nSFX B 0 ed [^y]\nSFX B y ied y\n");
        assert_eq!(aff.apply_rule("walk", "B"), vec![SmolStr::new("walked")]);
        assert_eq!(aff.apply_rule("try", "B"), vec![SmolStr::new("tried")]);
    }

    #[test]
    fn prefix_addition() {
        let aff = AffixRuleSet::parse("PFX A Y 1\nPFX A 0 re .\n");
        assert_eq!(aff.apply_rule("do", "A"), vec![SmolStr::new("redo")]);
    }

    #[test]
    fn continuation_chains_apply_in_sequence() {
        let text = "\
PFX E Y 1
PFX E 0 un/D .

SFX D Y 1
SFX D 0 ing/C .

SFX C Y 1
SFX C 0 s .
";
        let aff = AffixRuleSet::parse(text);
        let forms = aff.apply_rule("do", "E");
        assert!(forms.contains(&SmolStr::new("undo")));
        assert!(forms.contains(&SmolStr::new("undoing")));
        assert!(forms.contains(&SmolStr::new("undoings")));
    }

    #[test]
    fn cyclic_continuations_terminate() {
        // D and C continue into each other; the chain guard breaks the loop
        let text = "\
SFX D Y 1
SFX D 0 ing/C .

SFX C Y 1
SFX C 0 s/D .
";
        let aff = AffixRuleSet::parse(text);
        let forms = aff.apply_rule("walk", "D");
        assert!(forms.contains(&SmolStr::new("walking")));
        assert!(forms.contains(&SmolStr::new("walkings")));
    }

    #[test]
    fn unknown_rule_code_yields_nothing() {
        let aff = AffixRuleSet::parse("");
        assert!(aff.apply_rule("walk", "Z").is_empty());
    }
}
