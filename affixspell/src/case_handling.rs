//! Casing helpers shared by the speller's case-folding ladder and the
//! suggestion engine's ranking tie-break.

use smol_str::SmolStr;

#[inline(always)]
#[allow(missing_docs)]
pub fn lower_case(s: &str) -> SmolStr {
    s.chars()
        .map(|c| c.to_lowercase().collect::<String>())
        .collect::<SmolStr>()
}

#[inline(always)]
#[allow(missing_docs)]
pub fn upper_case(s: &str) -> SmolStr {
    s.chars()
        .map(|c| c.to_uppercase().collect::<String>())
        .collect::<SmolStr>()
}

/// Upper-cases the first character, leaving the rest untouched.
#[inline(always)]
pub fn upper_first(s: &str) -> SmolStr {
    let mut c = s.chars();
    match c.next() {
        None => SmolStr::new(""),
        Some(f) => SmolStr::from(f.to_uppercase().collect::<String>() + c.as_str()),
    }
}

/// Keeps the first character as-is and lower-cases the rest. This is the
/// retry form for all-caps input ("HELLO" -> "Hello").
#[inline(always)]
pub fn sentence_case(s: &str) -> SmolStr {
    let mut c = s.chars();
    match c.next() {
        None => SmolStr::new(""),
        Some(f) => SmolStr::from(f.to_string() + &c.as_str().to_lowercase()),
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Case {
    Upper,
    Lower,
    Neither,
}

impl Case {
    #[inline(always)]
    fn new(ch: char) -> Case {
        if ch.is_lowercase() {
            Case::Lower
        } else if ch.is_uppercase() {
            Case::Upper
        } else {
            Case::Neither
        }
    }
}

/// Whether the word mixes cases beyond a single leading capital ("McDonald").
/// All-caps words are not mixed.
pub fn is_mixed_case(word: &str) -> bool {
    if is_all_caps(word) {
        return false;
    }

    let mut chars = word.chars();
    let mut last_case = match chars.next() {
        Some(ch) => Case::new(ch),
        None => return false,
    };

    if last_case == Case::Neither {
        return false;
    }

    let mut case_changes = 0;

    for ch in chars {
        let next_case = Case::new(ch);

        match (last_case, next_case) {
            (_, Case::Neither) => return false,
            (_, Case::Upper) => case_changes += 2,
            (Case::Upper, Case::Lower) => case_changes += 1,
            _ => {}
        }

        last_case = next_case;
    }

    case_changes > 1
}

#[allow(missing_docs)]
pub fn is_all_caps(word: &str) -> bool {
    upper_case(word) == word
}

#[allow(missing_docs)]
pub fn is_first_caps(word: &str) -> bool {
    upper_first(word) == word
}

/// Coarse casing shape of a token. Candidates whose pattern matches the
/// misspelled input's pattern rank above otherwise-equal candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasePattern {
    /// all lower case, or caseless
    Lower,
    /// all upper case
    Upper,
    /// leading capital, rest lower
    Sentence,
    /// anything else
    Mixed,
}

impl CasePattern {
    /// Classifies `word` into one of the four patterns.
    pub fn of(word: &str) -> CasePattern {
        if word.is_empty() || lower_case(word) == word {
            CasePattern::Lower
        } else if is_all_caps(word) {
            CasePattern::Upper
        } else if is_mixed_case(word) {
            CasePattern::Mixed
        } else if is_first_caps(word) {
            CasePattern::Sentence
        } else {
            CasePattern::Mixed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_folding() {
        assert_eq!(sentence_case("HELLO"), "Hello");
        assert_eq!(sentence_case("hELLO"), "hello");
        assert_eq!(upper_first("hello"), "Hello");
        assert_eq!(sentence_case(""), "");
    }

    #[test]
    fn patterns() {
        assert_eq!(CasePattern::of("hello"), CasePattern::Lower);
        assert_eq!(CasePattern::of("HELLO"), CasePattern::Upper);
        assert_eq!(CasePattern::of("Hello"), CasePattern::Sentence);
        assert_eq!(CasePattern::of("hEllo"), CasePattern::Mixed);
        assert_eq!(CasePattern::of("McDonald"), CasePattern::Mixed);
        assert_eq!(CasePattern::of("MCDONALD"), CasePattern::Upper);
        assert_eq!(CasePattern::of("123"), CasePattern::Lower);
    }

    #[test]
    fn mixed_case() {
        assert_eq!(is_mixed_case("McDonald"), true);
        assert_eq!(is_mixed_case("Mcdonald"), false);
        assert_eq!(is_mixed_case("McDoNaLd"), true);
        assert_eq!(is_mixed_case("MCDONALD"), false);
        assert_eq!(is_mixed_case("mcDonald"), true);
        assert_eq!(is_mixed_case("mcdonald"), false);

        assert_eq!(is_mixed_case("ab"), false);
        assert_eq!(is_mixed_case("aB"), true);
        assert_eq!(is_mixed_case("Ab"), false);
        assert_eq!(is_mixed_case("AB"), false);

        assert_eq!(is_mixed_case("A"), false);
        assert_eq!(is_mixed_case("a"), false);
        assert_eq!(is_mixed_case("aS:"), false);
        assert_eq!(is_mixed_case(":"), false);
    }
}
