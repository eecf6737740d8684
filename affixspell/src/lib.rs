/*! Spell-checking and correction for affix-compressed word lists.

Implements spell-checking and correction over hunspell-style dictionaries:
an affix file describing prefix/suffix rules, compound rules and checker
flags, paired with a word list naming base words and the rule codes that
apply to them. On top of the single-language engine sits a multi-language
user layer that owns one speller per installed language, merges a custom
word list over the dictionary verdicts, and routes content to the right
language.

# Usage examples

```
use affixspell::speller::DictSpeller;

let aff = "TRY esianrtolcdugmphbyfvkwz\n";
let dic = "1\nhello\n";
let speller = DictSpeller::from_texts(aff, dic);
assert!(speller.is_correct("hello"));
assert!(!speller.is_correct("helol"));
```

*/

#![warn(missing_docs)]
pub mod affix;
pub mod case_handling;
pub mod loader;
pub mod speller;
pub mod user;
pub mod word_index;

pub(crate) mod constants;
pub(crate) mod types;
