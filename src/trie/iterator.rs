//! Code point iteration over UTF-16 text with trie values.
//!
//! ```rust,ignore
//! use libtranslit::trie::{CodePointTrie, TrieBuilder};
//!
//! let mut builder = TrieBuilder::new(0, 0);
//! builder.set(0x1F600, 7)?;
//! let trie = builder.build_32()?;
//!
//! let text: Vec<u16> = "a😀".encode_utf16().collect();
//! let mut iter = trie.iter(&text, 0);
//! assert_eq!(iter.next().map(|r| r.code_point), Some(0x61));
//! assert_eq!(iter.next().map(|r| r.value), Some(7));
//! assert_eq!(iter.index(), 3);
//! ```

use super::CodePointTrie;

/// One step of a [`CharSequenceIterator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationResult {
    /// Code unit index of the first unit of the code point
    pub index: usize,
    /// The decoded code point (unpaired surrogates decode as themselves)
    pub code_point: u32,
    /// Trie value for the code point
    pub value: u32,
}

/// A bidirectional cursor over the code points of UTF-16 text.
///
/// The cursor sits between code units. [`Iterator::next`] decodes the code
/// point after the cursor and advances by one or two units;
/// [`previous`](Self::previous) decodes the code point before the cursor and
/// moves back. Both report the index of the decoded code point's first unit,
/// so calling `next` then `previous` returns the same result.
///
/// The iterator borrows the text immutably; it is not meant to be shared
/// between threads while moving.
#[derive(Debug, Clone)]
pub struct CharSequenceIterator<'a, T: CodePointTrie + ?Sized> {
    trie: &'a T,
    text: &'a [u16],
    index: usize,
}

#[inline]
fn is_lead(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

#[inline]
fn is_trail(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

#[inline]
fn combine(lead: u16, trail: u16) -> u32 {
    0x10000 + (((lead as u32) - 0xD800) << 10) + ((trail as u32) - 0xDC00)
}

impl<'a, T: CodePointTrie + ?Sized> CharSequenceIterator<'a, T> {
    /// Create an iterator positioned at code unit `index`.
    ///
    /// An index past the end of `text` is placed at the end.
    pub fn new(trie: &'a T, text: &'a [u16], index: usize) -> Self {
        Self {
            trie,
            text,
            index: index.min(text.len()),
        }
    }

    /// Current cursor position in code units.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Move the cursor to code unit `index`, clamped to the text length.
    pub fn set_index(&mut self, index: usize) {
        self.index = index.min(self.text.len());
    }

    /// Whether a code point follows the cursor.
    #[inline]
    pub fn has_next(&self) -> bool {
        self.index < self.text.len()
    }

    /// Whether a code point precedes the cursor.
    #[inline]
    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    /// Decode the code point before the cursor and move back over it.
    pub fn previous(&mut self) -> Option<IterationResult> {
        if self.index == 0 {
            return None;
        }
        let mut start = self.index - 1;
        let unit = self.text[start];
        let mut code_point = unit as u32;
        if is_trail(unit) && start > 0 && is_lead(self.text[start - 1]) {
            start -= 1;
            code_point = combine(self.text[start], unit);
        }
        self.index = start;
        Some(IterationResult {
            index: start,
            code_point,
            value: self.trie.get(code_point),
        })
    }
}

impl<T: CodePointTrie + ?Sized> Iterator for CharSequenceIterator<'_, T> {
    type Item = IterationResult;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.index;
        let unit = *self.text.get(start)?;
        let mut code_point = unit as u32;
        let mut end = start + 1;
        if is_lead(unit) {
            if let Some(&trail) = self.text.get(end).filter(|&&t| is_trail(t)) {
                code_point = combine(unit, trail);
                end += 1;
            }
        }
        self.index = end;
        Some(IterationResult {
            index: start,
            code_point,
            value: self.trie.get(code_point),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.text.len() - self.index;
        (remaining.div_ceil(2), Some(remaining))
    }
}
