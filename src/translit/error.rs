//! Error types for rule construction and rule set validation.

use thiserror::Error;

/// Errors raised while constructing rules, rule sets, or transliterators.
///
/// Matching and rewriting never fail; a mismatch is an ordinary return value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// The end of the ante context lies past the end of the input pattern.
    #[error("Invalid ante context: position {pos} exceeds pattern length {len}")]
    InvalidAnteContext {
        /// Requested end of the ante context
        pos: usize,
        /// Length of the input pattern
        len: usize,
    },

    /// The start of the post context is before the ante context or past the end.
    #[error("Invalid post context: position {pos} outside {ante}..={len}")]
    InvalidPostContext {
        /// Requested start of the post context
        pos: usize,
        /// Length of the ante context
        ante: usize,
        /// Length of the input pattern
        len: usize,
    },

    /// The cursor position lies past the end of the output.
    #[error("Invalid cursor position: {pos} exceeds output length {len}")]
    InvalidCursorPosition {
        /// Requested cursor position
        pos: usize,
        /// Length of the output
        len: usize,
    },

    /// A segment does not lie within the input pattern.
    #[error("Invalid segment ${number}: {start}..{limit} outside pattern of length {len}")]
    InvalidSegment {
        /// 1-based segment number
        number: usize,
        /// Segment start offset
        start: usize,
        /// Segment limit offset
        limit: usize,
        /// Length of the input pattern
        len: usize,
    },

    /// An output character refers to a segment the rule does not define.
    #[error("Rule {rule} refers to undefined segment ${number}")]
    DanglingSegmentReference {
        /// Display form of the offending rule
        rule: String,
        /// 1-based segment number
        number: usize,
    },

    /// An earlier rule matches everything a later rule matches.
    #[error("Rule {masking} masks {masked}")]
    RuleMasked {
        /// Display form of the earlier rule
        masking: String,
        /// Display form of the unreachable rule
        masked: String,
    },

    /// No placeholder characters remain for another variable.
    #[error("Too many variables: at most {limit} may be defined")]
    TooManyVariables {
        /// Number of available placeholders
        limit: usize,
    },

    /// A transliteration position is inconsistent with the text.
    #[error("Invalid position {context_start}..{start}..{limit}..{context_limit} for text of length {len}")]
    InvalidPosition {
        /// Start of the context window
        context_start: usize,
        /// First character to transliterate
        start: usize,
        /// End of the characters to transliterate
        limit: usize,
        /// End of the context window
        context_limit: usize,
        /// Length of the text
        len: usize,
    },
}
