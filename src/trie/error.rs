//! Error types for trie construction.

use thiserror::Error;

use super::ValueWidth;

/// Errors raised while validating or building a code point trie.
///
/// Lookups never fail; these errors only surface from `try_new`,
/// deserialization, and [`TrieBuilder`](super::TrieBuilder).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrieError {
    /// The header or array lengths are inconsistent.
    #[error("Invalid trie structure: {reason}")]
    InvalidStructure {
        /// Which structural check failed
        reason: &'static str,
    },

    /// A code point or code unit outside the accepted range was supplied.
    #[error("Code point U+{0:04X} is out of range")]
    CodePointOutOfRange(u32),

    /// A range whose start lies after its end was supplied.
    #[error("Invalid code point range U+{start:04X}..=U+{end:04X}")]
    InvalidRange {
        /// First code point of the range
        start: u32,
        /// Last code point of the range
        end: u32,
    },

    /// A value does not fit the requested storage width.
    #[error("Value {value:#x} does not fit in a {width:?} trie")]
    ValueOutOfRange {
        /// The offending value
        value: u32,
        /// The requested width
        width: ValueWidth,
    },

    /// The frozen arrays are too large to be addressed by 16-bit index entries.
    #[error("Trie too large for 16-bit index entries: offset {offset:#x}")]
    IndexOverflow {
        /// The first offset that did not fit
        offset: usize,
    },
}
