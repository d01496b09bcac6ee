//! # libtranslit
//!
//! Code point tries and rule-based transliteration.
//!
//! The crate has two independent halves:
//!
//! - [`trie`]: compact, immutable two-stage tables mapping every Unicode code
//!   point to an integer value, with lookups that are pure arithmetic over a
//!   `u16` index and a data array. A [`TrieBuilder`](trie::TrieBuilder)
//!   produces them; iterators walk UTF-16 text or enumerate value ranges.
//! - [`translit`]: context-sensitive rewrite rules with variables and segment
//!   references, a rule set that rejects unreachable rules, and a single-pass
//!   transliterator that supports incremental input.
//!
//! ## Example
//!
//! ```rust,ignore
//! use libtranslit::prelude::*;
//!
//! let mut builder = TrieBuilder::new(0, u32::MAX);
//! builder.set_range(0x0391, 0x03A9, 1, true)?; // Greek capitals
//! let trie = builder.build_32()?;
//! assert_eq!(trie.get(0x03A3), 1);
//!
//! let rules = vec![TransliterationRule::new("ps", None, None, "ψ", None)?];
//! let t = RuleBasedTransliterator::new("Latin-Greek", rules, VariableTable::new(), RuleSetOptions::default())?;
//! assert_eq!(t.transliterate("psi"), "ψi");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod translit;
pub mod trie;

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::translit::{
        CharSet, IncrementalMatch, MatchDegree, PatternElement, Position, Replaceable,
        ReplaceableString, RuleBasedTransliterator, RuleData, RuleError, RuleSet,
        RuleSetOptions, TransliterationRule, UnicodeFilter, VariableTable,
    };
    pub use crate::trie::{
        CharSequenceIterator, CodePointRange, CodePointTrie, IterationResult, Trie16, Trie32,
        TrieBuilder, TrieError, TrieHeader, ValueWidth,
    };
}
