//! Rule-based transliteration.
//!
//! A [`TransliterationRule`] pairs an input pattern (ante context, key, post
//! context) with an output template. Rules are grouped into a [`RuleSet`],
//! which buckets them by the low byte of their first key character and
//! rejects unreachable rules at construction time. A
//! [`RuleBasedTransliterator`] drives a rule set over a [`Replaceable`]
//! buffer in a single forward pass.
//!
//! Pattern characters are resolved through a [`RuleData`] dictionary: a
//! character registered as a variable stands for a [`CharSet`], anything
//! else matches literally. Output characters that the dictionary resolves to
//! segment references are expanded to the text matched by that segment.
//!
//! # Example
//!
//! ```rust,ignore
//! use libtranslit::translit::*;
//!
//! let mut data = VariableTable::new();
//! let letter = data.define(CharSet::from_range('a', 'z'))?;
//! let digit = data.define(CharSet::from_range('0', '9'))?;
//! let one = data.segment_reference(1).unwrap();
//! let two = data.segment_reference(2).unwrap();
//!
//! // ([a-z])([0-9]) > $2$1
//! let swap = TransliterationRule::with_segments(
//!     &format!("{letter}{digit}"), None, None, &format!("{two}{one}"), None,
//!     vec![(0, 1), (1, 2)],
//! )?;
//! let t = RuleBasedTransliterator::new("Swap", vec![swap], data, RuleSetOptions::default())?;
//! assert_eq!(t.transliterate("c7"), "7c");
//! ```

pub mod data;
pub mod error;
pub mod masking;
pub mod replaceable;
pub mod rule;
pub mod rule_set;
pub mod transliterator;
pub mod unicode_set;

pub use data::VariableTable;
pub use error::RuleError;
pub use replaceable::{Replaceable, ReplaceableString};
pub use rule::{MatchDegree, TransliterationRule};
pub use rule_set::{IncrementalMatch, RuleSet, RuleSetOptions};
pub use transliterator::{Position, RuleBasedTransliterator};
pub use unicode_set::CharSet;

/// Decides which characters a transliterator may touch.
///
/// A text character that the filter rejects never matches any pattern
/// character, so rules cannot rewrite it.
pub trait UnicodeFilter {
    /// Whether `c` may be transliterated.
    fn contains(&self, c: char) -> bool;
}

/// Dictionary of placeholder characters consulted during matching and
/// rewriting.
pub trait RuleData {
    /// The set a variable placeholder stands for, or `None` for a literal.
    fn lookup(&self, c: char) -> Option<&CharSet>;

    /// The 0-based segment index a reference placeholder stands for.
    fn lookup_segment_reference(&self, c: char) -> Option<usize>;

    /// Resolve a pattern character.
    fn resolve(&self, c: char) -> PatternElement<'_> {
        match self.lookup(c) {
            Some(set) => PatternElement::Set(set),
            None => PatternElement::Literal(c),
        }
    }
}

/// A pattern character after variable resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternElement<'a> {
    /// Matches exactly this character
    Literal(char),
    /// Matches any member of the set
    Set(&'a CharSet),
}

impl PatternElement<'_> {
    /// Whether `c` matches this element.
    #[inline]
    pub fn matches(&self, c: char) -> bool {
        match self {
            PatternElement::Literal(literal) => *literal == c,
            PatternElement::Set(set) => set.contains(c),
        }
    }
}
