//! Mutable text buffers that rules rewrite in place.

use std::fmt;

/// A text buffer addressed by character offset that supports in-place
/// replacement.
///
/// Rules read context and key characters through [`char_at`](Self::char_at)
/// and rewrite the key range through [`replace`](Self::replace). Offsets are
/// `char` positions, not byte positions.
pub trait Replaceable {
    /// Number of characters in the buffer.
    fn len(&self) -> usize;

    /// Whether the buffer holds no characters.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The character at `offset`, or `None` past the end.
    fn char_at(&self, offset: usize) -> Option<char>;

    /// Replace the characters in `start..limit` with `text`.
    ///
    /// Callers guarantee `start <= limit <= len()`.
    fn replace(&mut self, start: usize, limit: usize, text: &[char]);

    /// Copy the characters in `start..limit` into a new string.
    fn extract(&self, start: usize, limit: usize) -> String {
        (start..limit).filter_map(|i| self.char_at(i)).collect()
    }
}

/// A [`Replaceable`] backed by a vector of characters.
///
/// # Example
///
/// ```rust,ignore
/// use libtranslit::translit::{Replaceable, ReplaceableString};
///
/// let mut text = ReplaceableString::from("hello");
/// text.replace(1, 2, &['a']);
/// assert_eq!(text.to_string(), "hallo");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ReplaceableString {
    chars: Vec<char>,
}

impl ReplaceableString {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The buffer contents.
    pub fn as_chars(&self) -> &[char] {
        &self.chars
    }
}

impl Replaceable for ReplaceableString {
    #[inline]
    fn len(&self) -> usize {
        self.chars.len()
    }

    #[inline]
    fn char_at(&self, offset: usize) -> Option<char> {
        self.chars.get(offset).copied()
    }

    fn replace(&mut self, start: usize, limit: usize, text: &[char]) {
        self.chars.splice(start..limit, text.iter().copied());
    }
}

impl From<&str> for ReplaceableString {
    fn from(s: &str) -> Self {
        Self {
            chars: s.chars().collect(),
        }
    }
}

impl From<String> for ReplaceableString {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl FromIterator<char> for ReplaceableString {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self {
            chars: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for ReplaceableString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.chars.iter().try_for_each(|c| fmt::Write::write_char(f, *c))
    }
}
