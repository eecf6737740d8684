/// The 26 English letters in descending corpus frequency order. Used to top
/// up TRY alphabets from dictionaries that omit rare letters, and as the
/// whole candidate alphabet when no TRY directive is present.
pub(crate) const ENGLISH_FREQUENCY_ALPHABET: &str = "etaoinshrdlcumwfgypbvkjxqz";

/// Keyboard adjacency rows used when the affix file declares no KEY groups.
pub(crate) const DEFAULT_KEY_TABLE: &[&str] = &["qwertyuiop", "asdfghjkl", "zxcvbnm"];

/// Minimum sub-word length for compound matching when COMPOUNDMIN is absent.
pub(crate) const DEFAULT_COMPOUND_MIN: usize = 3;

/// Flag code synthesized for `*`-prefixed word-list entries when the affix
/// file never declares FORBIDDENWORD. Long enough to never collide with a
/// real flag under any FLAG encoding.
pub(crate) const FORBIDDEN_SENTINEL: &str = "__forbidden__";

/// Weight assigned to the first occurrence of a valid edit-distance hit.
pub(crate) const EDIT_HIT_WEIGHT: i32 = 10;

/// Suggestion wall-clock budget: per-character allowance and overall cap.
pub(crate) const SUGGEST_BUDGET_MS_PER_CHAR: u64 = 30;
pub(crate) const SUGGEST_BUDGET_CAP_MS: u64 = 200;
