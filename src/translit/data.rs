//! The bundled variable and segment-reference dictionary.

use super::{CharSet, RuleData, RuleError};

/// Default first placeholder character for segment references (`$1` is U+E000).
pub const DEFAULT_SEGMENT_BASE: char = '\u{E000}';

/// Default first placeholder character for variables.
pub const DEFAULT_VARIABLES_BASE: char = '\u{F000}';

/// Number of segment reference placeholders.
pub const MAX_SEGMENTS: usize = 0x100;

/// Number of variable placeholders.
pub const MAX_VARIABLES: usize = 0x900;

/// Maps private-use placeholder characters to character sets and segment
/// references.
///
/// Variables occupy a contiguous range starting at the variables base; the
/// n-th defined set is looked up through `variables_base + n`. Segment
/// references occupy a contiguous range starting at the segment base; the
/// placeholder `segment_base + n` refers to segment `n + 1`.
///
/// # Example
///
/// ```rust,ignore
/// use libtranslit::translit::{CharSet, RuleData, VariableTable};
///
/// let mut data = VariableTable::new();
/// let vowel = data.define(CharSet::from_iter("aeiou".chars()))?;
/// assert!(data.lookup(vowel).is_some_and(|set| set.contains('e')));
/// assert_eq!(data.segment_reference(1).and_then(|c| data.lookup_segment_reference(c)), Some(0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableTable {
    variables_base: char,
    segment_base: char,
    sets: Vec<CharSet>,
}

impl VariableTable {
    /// Create an empty table with the default placeholder ranges.
    pub fn new() -> Self {
        Self::with_bases(DEFAULT_VARIABLES_BASE, DEFAULT_SEGMENT_BASE)
    }

    /// Create an empty table with custom placeholder ranges.
    pub fn with_bases(variables_base: char, segment_base: char) -> Self {
        Self {
            variables_base,
            segment_base,
            sets: Vec::new(),
        }
    }

    /// First variable placeholder.
    pub fn set_variables_base(&self) -> char {
        self.variables_base
    }

    /// First segment reference placeholder.
    pub fn segment_base(&self) -> char {
        self.segment_base
    }

    /// Register `set` and return the placeholder that stands for it.
    pub fn define(&mut self, set: CharSet) -> Result<char, RuleError> {
        let n = self.sets.len();
        let placeholder = (n < MAX_VARIABLES)
            .then(|| char::from_u32(self.variables_base as u32 + n as u32))
            .flatten()
            .ok_or(RuleError::TooManyVariables {
                limit: MAX_VARIABLES,
            })?;
        self.sets.push(set);
        Ok(placeholder)
    }

    /// The placeholder for 1-based segment `number`.
    pub fn segment_reference(&self, number: usize) -> Option<char> {
        if number == 0 || number > MAX_SEGMENTS {
            return None;
        }
        char::from_u32(self.segment_base as u32 + (number - 1) as u32)
    }

    /// Number of defined variables.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether no variables are defined.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl Default for VariableTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleData for VariableTable {
    fn lookup(&self, c: char) -> Option<&CharSet> {
        let offset = (c as u32).checked_sub(self.variables_base as u32)?;
        self.sets.get(offset as usize)
    }

    fn lookup_segment_reference(&self, c: char) -> Option<usize> {
        let offset = (c as u32).checked_sub(self.segment_base as u32)? as usize;
        (offset < MAX_SEGMENTS).then_some(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_lookup() {
        let mut data = VariableTable::new();
        let letters = data.define(CharSet::from_range('a', 'z')).unwrap();
        let digits = data.define(CharSet::from_range('0', '9')).unwrap();

        assert_eq!(letters, DEFAULT_VARIABLES_BASE);
        assert_eq!(digits as u32, DEFAULT_VARIABLES_BASE as u32 + 1);
        assert!(data.lookup(digits).is_some_and(|s| s.contains('7')));
        assert!(data.lookup('a').is_none());
        assert!(data.lookup('\u{F002}').is_none());
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_segment_references_are_zero_based() {
        let data = VariableTable::new();
        assert_eq!(data.segment_reference(1), Some('\u{E000}'));
        assert_eq!(data.lookup_segment_reference('\u{E000}'), Some(0));
        assert_eq!(data.lookup_segment_reference('\u{E001}'), Some(1));
        assert_eq!(data.lookup_segment_reference('\u{E100}'), None);
        assert_eq!(data.lookup_segment_reference('x'), None);
        assert_eq!(data.segment_reference(0), None);
    }

    #[test]
    fn test_variable_limit() {
        // Only two placeholders before the surrogate gap.
        let mut data = VariableTable::with_bases('\u{D7FE}', DEFAULT_SEGMENT_BASE);
        assert!(data.define(CharSet::new()).is_ok());
        assert!(data.define(CharSet::new()).is_ok());
        assert_eq!(
            data.define(CharSet::new()),
            Err(RuleError::TooManyVariables { limit: MAX_VARIABLES })
        );
    }
}
