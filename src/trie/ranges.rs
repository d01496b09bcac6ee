//! Enumeration of same-value code point ranges.

use super::{CodePointTrie, CODE_POINT_MAX};

/// A maximal run of consecutive code points sharing one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodePointRange {
    /// First code point of the run
    pub start: u32,
    /// Last code point of the run (inclusive)
    pub end: u32,
    /// The shared, possibly mapped, value
    pub value: u32,
}

impl CodePointRange {
    /// Whether `code_point` lies within this range.
    #[inline]
    pub fn contains(&self, code_point: u32) -> bool {
        (self.start..=self.end).contains(&code_point)
    }
}

pub(crate) fn identity(value: u32) -> u32 {
    value
}

/// Find the range starting at `start` whose mapped values are all equal.
pub(crate) fn range_from<T, F>(trie: &T, start: u32, mapper: &F) -> Option<CodePointRange>
where
    T: CodePointTrie + ?Sized,
    F: Fn(u32) -> u32 + ?Sized,
{
    if start > CODE_POINT_MAX {
        return None;
    }
    let high_start = trie.header().high_start;
    let value = mapper(trie.get(start));
    let mut end = start;
    while end < CODE_POINT_MAX {
        let next = end + 1;
        if next >= high_start {
            // Everything from high_start up shares the high value.
            if mapper(trie.get(next)) == value {
                end = CODE_POINT_MAX;
            }
            break;
        }
        if mapper(trie.get(next)) != value {
            break;
        }
        end = next;
    }
    Some(CodePointRange { start, end, value })
}

/// Lazy iterator over the value ranges of a trie.
///
/// Yields ranges in ascending order that together cover `0..=0x10FFFF`
/// exactly once.
pub struct RangeIterator<'a, T: CodePointTrie + ?Sized, F> {
    trie: &'a T,
    mapper: F,
    next_start: Option<u32>,
}

impl<'a, T: CodePointTrie + ?Sized, F: Fn(u32) -> u32> RangeIterator<'a, T, F> {
    /// Create an iterator starting at code point 0.
    pub fn new(trie: &'a T, mapper: F) -> Self {
        Self {
            trie,
            mapper,
            next_start: Some(0),
        }
    }

    /// Restart the iteration at code point 0.
    pub fn reset(&mut self) {
        self.next_start = Some(0);
    }
}

impl<T: CodePointTrie + ?Sized, F: Fn(u32) -> u32> Iterator for RangeIterator<'_, T, F> {
    type Item = CodePointRange;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next_start?;
        let range = range_from(self.trie, start, &self.mapper)?;
        self.next_start = range.end.checked_add(1).filter(|&s| s <= CODE_POINT_MAX);
        Some(range)
    }
}
