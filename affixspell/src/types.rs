use smol_str::SmolStr;

/// A flag code naming an affix rule or a boolean word property. Depending on
/// the affix file's FLAG directive this is a single character, a two-character
/// "long" code, or a numeric string.
pub(crate) type FlagCode = SmolStr;

/// Ranking weight of a suggestion. Higher is better.
pub(crate) type Weight = i32;
