//! Compact two-stage tries mapping Unicode code points to integer values.
//!
//! A code point trie stores a value for every code point in `0..=0x10FFFF`
//! using a `u16` index array and a data array of fixed-width values. Lookups
//! are pure arithmetic over the two arrays:
//!
//! ```text
//! BMP (except lead surrogates):  data[(index[c >> 5] << 2) + (c & 31)]
//! lead surrogate code points:    data[(index[0x800 + ((c - 0xD800) >> 5)] << 2) + (c & 31)]
//! supplementary below highStart: i1 = index[0x820 + (c >> 11)]
//!                                data[(index[i1 + ((c >> 5) & 63)] << 2) + (c & 31)]
//! highStart..=0x10FFFF:          data[highValueIndex]
//! anything else:                 errorValue
//! ```
//!
//! ## Index layout
//!
//! | Offset            | Length      | Contents                                          |
//! |-------------------|-------------|---------------------------------------------------|
//! | `0`               | `0x800`     | index-2 for the BMP (code *unit* view of D800..DBFF) |
//! | `0x800`           | `0x20`      | index-2 for lead surrogate *code points*          |
//! | `0x820`           | `0x20`      | UTF-8 two-byte index (unshifted data offsets)     |
//! | `0x840`           | `index1Len` | index-1 for `0x10000..highStart`                  |
//! | after index-1     | `64 * n`    | supplementary index-2 blocks                      |
//!
//! Two storage widths are provided: [`Trie16`] keeps its 16-bit values in the
//! same array as the index, [`Trie32`] keeps 32-bit values in a separate array.
//! Both are immutable and `Send + Sync`; tries are produced either by an
//! external data pipeline (and validated by `try_new`) or by [`TrieBuilder`].

pub mod builder;
pub mod error;
pub mod frozen;
pub mod iterator;
pub mod ranges;

pub use builder::TrieBuilder;
pub use error::TrieError;
pub use frozen::{Trie16, Trie32};
pub use iterator::{CharSequenceIterator, IterationResult};
pub use ranges::{CodePointRange, RangeIterator};

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Largest Unicode code point.
pub const CODE_POINT_MAX: u32 = 0x10FFFF;

/// Shift size for getting the index-1 table offset.
pub const SHIFT_1: u32 = 6 + 5;

/// Shift size for getting the index-2 table offset.
pub const SHIFT_2: u32 = 5;

/// Difference between the two shift sizes.
pub const SHIFT_1_2: u32 = SHIFT_1 - SHIFT_2;

/// Number of index-1 entries for the BMP, which are omitted from the index-1 table.
pub const OMITTED_BMP_INDEX_1_LENGTH: usize = 0x10000 >> SHIFT_1;

/// Number of code points per index-1 table entry.
pub const CP_PER_INDEX_1_ENTRY: u32 = 1 << SHIFT_1;

/// Number of entries in an index-2 block.
pub const INDEX_2_BLOCK_LENGTH: usize = 1 << SHIFT_1_2;

/// Mask for getting the lower bits for the in-index-2-block offset.
pub const INDEX_2_MASK: u32 = (INDEX_2_BLOCK_LENGTH as u32) - 1;

/// Number of entries in a data block.
pub const DATA_BLOCK_LENGTH: usize = 1 << SHIFT_2;

/// Mask for getting the lower bits for the in-data-block offset.
pub const DATA_MASK: u32 = (DATA_BLOCK_LENGTH as u32) - 1;

/// Shift applied to index-2 entries to obtain data offsets.
pub const INDEX_SHIFT: u32 = 2;

/// Data offsets are always multiples of this granularity.
pub const DATA_GRANULARITY: usize = 1 << INDEX_SHIFT;

/// Start of the index-2 table.
pub const INDEX_2_OFFSET: usize = 0;

/// Start of the index-2 section for lead surrogate code points.
pub const LSCP_INDEX_2_OFFSET: usize = 0x10000 >> SHIFT_2;

/// Length of the lead surrogate code point index-2 section.
pub const LSCP_INDEX_2_LENGTH: usize = 0x400 >> SHIFT_2;

/// Length of the index-2 table for the BMP including the lead surrogate section.
pub const INDEX_2_BMP_LENGTH: usize = LSCP_INDEX_2_OFFSET + LSCP_INDEX_2_LENGTH;

/// Start of the UTF-8 two-byte index section.
pub const UTF8_2B_INDEX_2_OFFSET: usize = INDEX_2_BMP_LENGTH;

/// Length of the UTF-8 two-byte index section (one entry per lead byte `0xC0..0xE0`).
pub const UTF8_2B_INDEX_2_LENGTH: usize = 0x800 >> 6;

/// Start of the index-1 table for supplementary code points.
pub const INDEX_1_OFFSET: usize = UTF8_2B_INDEX_2_OFFSET + UTF8_2B_INDEX_2_LENGTH;

/// Maximum length of the index-1 table.
pub const MAX_INDEX_1_LENGTH: usize = 0x100000 >> SHIFT_1;

/// Value width of a frozen trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueWidth {
    /// 16-bit values stored inside the index array
    Bits16,
    /// 32-bit values stored in a separate data array
    Bits32,
}

/// Scalar fields describing a frozen trie.
///
/// `high_value_index` is an offset in the same address space as the
/// shifted index-2 entries: into the combined index+data array for
/// [`Trie16`], into the data array for [`Trie32`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct TrieHeader {
    /// Length of the index section in `u16` units
    pub index_length: usize,
    /// Length of the data section in values
    pub data_length: usize,
    /// Lowest code point served by the single high value slot
    pub high_start: u32,
    /// Offset of the high value
    pub high_value_index: usize,
    /// Value of every code point that was never set
    pub initial_value: u32,
    /// Value returned for out-of-range input
    pub error_value: u32,
}

impl TrieHeader {
    /// Number of index-1 entries implied by `high_start`.
    #[inline]
    pub fn index_1_length(&self) -> usize {
        (self.high_start.saturating_sub(0x10000) >> SHIFT_1) as usize
    }
}

/// Read access to a frozen code point trie.
///
/// Implementors supply raw array access; the lookup algorithm itself is
/// provided once by this trait so that both value widths share it.
pub trait CodePointTrie {
    /// Scalar fields of this trie.
    fn header(&self) -> &TrieHeader;

    /// Read entry `slot` of the index array.
    fn index_entry(&self, slot: usize) -> Option<u16>;

    /// Read the value stored at a composed data offset.
    fn value_at(&self, offset: usize) -> Option<u32>;

    /// Storage width of the values.
    fn value_width(&self) -> ValueWidth;

    /// Look up the value for a code point.
    ///
    /// Never fails: code points above `0x10FFFF` (and reads outside a
    /// corrupt trie's arrays) yield the error value. Trail surrogates
    /// `0xDC00..=0xDFFF` take the ordinary BMP path.
    #[inline]
    fn get(&self, code_point: u32) -> u32 {
        let header = self.header();
        let offset = if code_point < 0xD800 || (0xDC00..=0xFFFF).contains(&code_point) {
            self.data_offset(code_point as usize >> SHIFT_2, code_point)
        } else if code_point <= 0xFFFF {
            // Lead surrogate code points have their own index-2 section; the
            // main section holds the code unit values.
            self.data_offset(
                LSCP_INDEX_2_OFFSET + ((code_point - 0xD800) as usize >> SHIFT_2),
                code_point,
            )
        } else if code_point < header.high_start {
            self.supplementary_offset(code_point)
        } else if code_point <= CODE_POINT_MAX {
            Some(header.high_value_index)
        } else {
            None
        };
        offset
            .and_then(|o| self.value_at(o))
            .unwrap_or(header.error_value)
    }

    /// Look up the value for a UTF-16 code unit.
    ///
    /// Identical to [`get`](Self::get) except for lead surrogates, whose code
    /// unit values live in the main index-2 section.
    #[inline]
    fn get_from_u16_single_lead(&self, code_unit: u16) -> u32 {
        self.data_offset(code_unit as usize >> SHIFT_2, code_unit as u32)
            .and_then(|o| self.value_at(o))
            .unwrap_or(self.header().error_value)
    }

    /// Look up the value for a well-formed two-byte UTF-8 sequence.
    ///
    /// Returns the error value if `lead` is not in `0xC2..=0xDF` or `trail`
    /// is not a continuation byte.
    fn get_from_utf8_two_byte(&self, lead: u8, trail: u8) -> u32 {
        let error_value = self.header().error_value;
        if !(0xC2..=0xDF).contains(&lead) || trail & 0xC0 != 0x80 {
            return error_value;
        }
        self.index_entry(UTF8_2B_INDEX_2_OFFSET + (lead - 0xC0) as usize)
            .and_then(|base| self.value_at(base as usize + (trail & 0x3F) as usize))
            .unwrap_or(error_value)
    }

    /// Compose the data offset for `code_point` through index-2 entry `slot`.
    #[doc(hidden)]
    #[inline]
    fn data_offset(&self, slot: usize, code_point: u32) -> Option<usize> {
        let block = self.index_entry(slot)? as usize;
        Some((block << INDEX_SHIFT) + (code_point & DATA_MASK) as usize)
    }

    /// Three-stage lookup for `0x10000..high_start`.
    #[doc(hidden)]
    #[inline]
    fn supplementary_offset(&self, code_point: u32) -> Option<usize> {
        let i1 = self.index_entry(
            (INDEX_1_OFFSET - OMITTED_BMP_INDEX_1_LENGTH) + (code_point >> SHIFT_1) as usize,
        )? as usize;
        let slot = i1 + ((code_point >> SHIFT_2) & INDEX_2_MASK) as usize;
        self.data_offset(slot, code_point)
    }

    /// Iterate over the code points of UTF-16 `text` starting at code unit `index`.
    fn iter<'a>(&'a self, text: &'a [u16], index: usize) -> CharSequenceIterator<'a, Self>
    where
        Self: Sized,
    {
        CharSequenceIterator::new(self, text, index)
    }

    /// Get the maximal range of code points starting at `start` that share one value.
    fn get_range(&self, start: u32) -> Option<CodePointRange> {
        ranges::range_from(self, start, &ranges::identity)
    }

    /// Iterate over all value ranges covering `0..=0x10FFFF`.
    fn ranges(&self) -> RangeIterator<'_, Self, fn(u32) -> u32>
    where
        Self: Sized,
    {
        RangeIterator::new(self, ranges::identity as fn(u32) -> u32)
    }

    /// Iterate over value ranges after passing every value through `mapper`.
    ///
    /// Adjacent ranges whose mapped values are equal are merged.
    fn ranges_mapped<F>(&self, mapper: F) -> RangeIterator<'_, Self, F>
    where
        F: Fn(u32) -> u32,
        Self: Sized,
    {
        RangeIterator::new(self, mapper)
    }
}
