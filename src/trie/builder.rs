//! Mutable builder that freezes into [`Trie16`] or [`Trie32`].
//!
//! The builder keeps one optional 32-value block per data block of the code
//! space; unset blocks read as the initial value. Freezing lays the arrays out
//! as described in the [module docs](super):
//!
//! 1. `U+0000..U+07FF` data is kept linear so the UTF-8 two-byte index can
//!    address 64-value runs.
//! 2. Every other data block, and every supplementary index-2 block, is
//!    deduplicated: identical blocks are stored once.
//! 3. Above `high_start` nothing is stored; the value of `U+10FFFF` sits in a
//!    final granularity block.

use rustc_hash::FxHashMap;
use tracing::debug;

use super::{
    Trie16, Trie32, TrieError, TrieHeader, ValueWidth, CODE_POINT_MAX, CP_PER_INDEX_1_ENTRY,
    DATA_BLOCK_LENGTH, DATA_GRANULARITY, DATA_MASK, INDEX_1_OFFSET, INDEX_2_BLOCK_LENGTH,
    INDEX_SHIFT, LSCP_INDEX_2_LENGTH, LSCP_INDEX_2_OFFSET, SHIFT_1, SHIFT_2,
    UTF8_2B_INDEX_2_LENGTH, UTF8_2B_INDEX_2_OFFSET,
};

type DataBlock = [u32; DATA_BLOCK_LENGTH];
type Index2Block = [usize; INDEX_2_BLOCK_LENGTH];

const BLOCK_COUNT: usize = (CODE_POINT_MAX as usize + 1) >> SHIFT_2;
const LINEAR_BLOCK_COUNT: usize = 0x800 >> SHIFT_2;
const LEAD_SURROGATE_FIRST_BLOCK: usize = 0xD800 >> SHIFT_2;
const LEAD_UNIT_COUNT: usize = 0x400;

/// Builder for code point tries.
///
/// # Example
///
/// ```rust,ignore
/// use libtranslit::trie::{CodePointTrie, TrieBuilder};
///
/// let mut builder = TrieBuilder::new(0, 0xFFFF);
/// builder.set_range(0x3040, 0x309F, 1, true)?; // Hiragana
/// builder.set(0x1F600, 2)?;
/// let trie = builder.build_16()?;
/// assert_eq!(trie.get(0x3042), 1);
/// assert_eq!(trie.get(0x1F600), 2);
/// ```
#[derive(Debug, Clone)]
pub struct TrieBuilder {
    initial_value: u32,
    error_value: u32,
    blocks: Vec<Option<Box<DataBlock>>>,
    /// Code unit values for `0xD800..=0xDBFF`
    lead_units: Vec<u32>,
}

/// Data array under construction with block deduplication.
#[derive(Default)]
struct DataCompactor {
    data: Vec<u32>,
    offsets: FxHashMap<DataBlock, usize>,
}

impl DataCompactor {
    /// Append `block` unconditionally, registering it for later reuse.
    fn push(&mut self, block: DataBlock) -> usize {
        let offset = self.data.len();
        self.data.extend_from_slice(&block);
        self.offsets.entry(block).or_insert(offset);
        offset
    }

    /// Return the offset of an identical block, appending it if new.
    fn intern(&mut self, block: DataBlock) -> usize {
        match self.offsets.get(&block) {
            Some(&offset) => offset,
            None => self.push(block),
        }
    }
}

/// Arrays produced by freezing, before they are wrapped in a trie type.
struct FrozenParts {
    index: Vec<u16>,
    data: Vec<u32>,
    header: TrieHeader,
}

fn to_index_entry(value: usize) -> Result<u16, TrieError> {
    u16::try_from(value).map_err(|_| TrieError::IndexOverflow { offset: value })
}

impl TrieBuilder {
    /// Create a builder where every code point has `initial_value`.
    ///
    /// `error_value` is what the frozen trie returns for out-of-range input.
    pub fn new(initial_value: u32, error_value: u32) -> Self {
        Self {
            initial_value,
            error_value,
            blocks: vec![None; BLOCK_COUNT],
            lead_units: vec![initial_value; LEAD_UNIT_COUNT],
        }
    }

    /// The value of code points that were never set.
    pub fn initial_value(&self) -> u32 {
        self.initial_value
    }

    /// The value returned for out-of-range input.
    pub fn error_value(&self) -> u32 {
        self.error_value
    }

    /// Current value of a code point, or the error value if out of range.
    pub fn get(&self, code_point: u32) -> u32 {
        if code_point > CODE_POINT_MAX {
            return self.error_value;
        }
        self.blocks[(code_point >> SHIFT_2) as usize]
            .as_ref()
            .map_or(self.initial_value, |block| {
                block[(code_point & DATA_MASK) as usize]
            })
    }

    /// Current value of a lead surrogate code unit.
    pub fn get_for_lead_surrogate_code_unit(&self, code_unit: u16) -> u32 {
        match code_unit {
            0xD800..=0xDBFF => self.lead_units[(code_unit - 0xD800) as usize],
            _ => self.error_value,
        }
    }

    /// Set the value of one code point.
    ///
    /// For `0xD800..=0xDBFF` this sets the code *point* value, which is
    /// distinct from the code *unit* value.
    pub fn set(&mut self, code_point: u32, value: u32) -> Result<(), TrieError> {
        if code_point > CODE_POINT_MAX {
            return Err(TrieError::CodePointOutOfRange(code_point));
        }
        self.write(code_point, value);
        Ok(())
    }

    /// Set the value of every code point in `start..=end`.
    ///
    /// Without `overwrite`, only code points still holding the initial value
    /// are changed.
    pub fn set_range(
        &mut self,
        start: u32,
        end: u32,
        value: u32,
        overwrite: bool,
    ) -> Result<(), TrieError> {
        if end > CODE_POINT_MAX {
            return Err(TrieError::CodePointOutOfRange(end));
        }
        if start > end {
            return Err(TrieError::InvalidRange { start, end });
        }
        for code_point in start..=end {
            if overwrite || self.get(code_point) == self.initial_value {
                self.write(code_point, value);
            }
        }
        Ok(())
    }

    /// Set the value looked up for a lead surrogate *code unit*.
    pub fn set_for_lead_surrogate_code_unit(
        &mut self,
        code_unit: u16,
        value: u32,
    ) -> Result<(), TrieError> {
        if !(0xD800..=0xDBFF).contains(&code_unit) {
            return Err(TrieError::CodePointOutOfRange(code_unit as u32));
        }
        self.lead_units[(code_unit - 0xD800) as usize] = value;
        Ok(())
    }

    /// Freeze into a trie with 16-bit values.
    ///
    /// # Errors
    ///
    /// [`TrieError::ValueOutOfRange`] if any stored value exceeds `0xFFFF`,
    /// [`TrieError::IndexOverflow`] if the data is too varied to address.
    pub fn build_16(&self) -> Result<Trie16, TrieError> {
        let FrozenParts {
            mut index,
            data,
            header,
        } = self.freeze(ValueWidth::Bits16)?;
        index.reserve(data.len());
        for value in data {
            let narrow = u16::try_from(value).map_err(|_| TrieError::ValueOutOfRange {
                value,
                width: ValueWidth::Bits16,
            })?;
            index.push(narrow);
        }
        Trie16::try_new(index, header)
    }

    /// Freeze into a trie with 32-bit values.
    ///
    /// # Errors
    ///
    /// [`TrieError::IndexOverflow`] if the data is too varied to address.
    pub fn build_32(&self) -> Result<Trie32, TrieError> {
        let FrozenParts {
            index,
            data,
            header,
        } = self.freeze(ValueWidth::Bits32)?;
        Trie32::try_new(index, data, header)
    }

    fn write(&mut self, code_point: u32, value: u32) {
        let initial_value = self.initial_value;
        let block = self.blocks[(code_point >> SHIFT_2) as usize]
            .get_or_insert_with(|| Box::new([initial_value; DATA_BLOCK_LENGTH]));
        block[(code_point & DATA_MASK) as usize] = value;
    }

    fn block_values(&self, block: usize) -> DataBlock {
        self.blocks[block]
            .as_deref()
            .copied()
            .unwrap_or([self.initial_value; DATA_BLOCK_LENGTH])
    }

    fn lead_unit_block(&self, block: usize) -> DataBlock {
        let mut values = [0; DATA_BLOCK_LENGTH];
        let start = block * DATA_BLOCK_LENGTH;
        values.copy_from_slice(&self.lead_units[start..start + DATA_BLOCK_LENGTH]);
        values
    }

    /// Lowest index-1 boundary above which every code point has the high value.
    fn high_start(&self, high_value: u32) -> u32 {
        let uniform = |block: usize| match &self.blocks[block] {
            None => self.initial_value == high_value,
            Some(values) => values.iter().all(|&v| v == high_value),
        };
        let mut high_start = CODE_POINT_MAX + 1;
        while high_start > 0x10000 {
            let lower = high_start - CP_PER_INDEX_1_ENTRY;
            if !((lower >> SHIFT_2) as usize..(high_start >> SHIFT_2) as usize).all(&uniform) {
                break;
            }
            high_start = lower;
        }
        high_start
    }

    fn freeze(&self, width: ValueWidth) -> Result<FrozenParts, TrieError> {
        let high_value = self.get(CODE_POINT_MAX);
        let high_start = self.high_start(high_value);
        let index_1_length = ((high_start - 0x10000) >> SHIFT_1) as usize;

        let mut compactor = DataCompactor::default();
        for block in 0..LINEAR_BLOCK_COUNT {
            compactor.push(self.block_values(block));
        }

        // BMP index-2, with code unit values for the lead surrogate blocks.
        let mut bmp_index_2 = Vec::with_capacity(LSCP_INDEX_2_OFFSET);
        for block in 0..LSCP_INDEX_2_OFFSET {
            let offset = if block < LINEAR_BLOCK_COUNT {
                block * DATA_BLOCK_LENGTH
            } else if (LEAD_SURROGATE_FIRST_BLOCK..LEAD_SURROGATE_FIRST_BLOCK + LSCP_INDEX_2_LENGTH)
                .contains(&block)
            {
                compactor.intern(self.lead_unit_block(block - LEAD_SURROGATE_FIRST_BLOCK))
            } else {
                compactor.intern(self.block_values(block))
            };
            bmp_index_2.push(offset);
        }

        let lscp_index_2: Vec<usize> = (0..LSCP_INDEX_2_LENGTH)
            .map(|i| compactor.intern(self.block_values(LEAD_SURROGATE_FIRST_BLOCK + i)))
            .collect();

        // Supplementary index-2 blocks, deduplicated by content.
        let mut index_2_blocks: Vec<Index2Block> = Vec::new();
        let mut index_2_positions: FxHashMap<Index2Block, usize> = FxHashMap::default();
        let mut index_1 = Vec::with_capacity(index_1_length);
        for i1 in 0..index_1_length {
            let first_block = (0x10000 >> SHIFT_2) + i1 * INDEX_2_BLOCK_LENGTH;
            let mut entries = [0usize; INDEX_2_BLOCK_LENGTH];
            for (j, entry) in entries.iter_mut().enumerate() {
                *entry = compactor.intern(self.block_values(first_block + j));
            }
            let n = *index_2_positions.entry(entries).or_insert_with(|| {
                index_2_blocks.push(entries);
                index_2_blocks.len() - 1
            });
            index_1.push(n);
        }

        let high_offset = compactor.data.len();
        compactor.data.extend_from_slice(&[high_value; DATA_GRANULARITY]);
        let data = compactor.data;

        let index_2_start = INDEX_1_OFFSET + index_1_length;
        let unpadded = index_2_start + index_2_blocks.len() * INDEX_2_BLOCK_LENGTH;
        let index_length = unpadded.div_ceil(DATA_GRANULARITY) * DATA_GRANULARITY;
        let data_base = match width {
            ValueWidth::Bits16 => index_length,
            ValueWidth::Bits32 => 0,
        };
        let shifted = |offset: usize| to_index_entry((data_base + offset) >> INDEX_SHIFT);

        let mut index = Vec::with_capacity(index_length);
        for &offset in bmp_index_2.iter().chain(&lscp_index_2) {
            index.push(shifted(offset)?);
        }
        debug_assert_eq!(index.len(), UTF8_2B_INDEX_2_OFFSET);
        for lead in 0..UTF8_2B_INDEX_2_LENGTH {
            // Unshifted: the start of the 64 linear values for this lead byte.
            index.push(to_index_entry(data_base + (lead << 6))?);
        }
        for &n in &index_1 {
            index.push(to_index_entry(index_2_start + n * INDEX_2_BLOCK_LENGTH)?);
        }
        for block in &index_2_blocks {
            for &offset in block {
                index.push(shifted(offset)?);
            }
        }
        index.resize(index_length, 0);

        let header = TrieHeader {
            index_length,
            data_length: data.len(),
            high_start,
            high_value_index: data_base + high_offset,
            initial_value: self.initial_value,
            error_value: self.error_value,
        };
        debug!(
            index_length,
            data_length = header.data_length,
            high_start = header.high_start,
            ?width,
            "froze code point trie"
        );
        Ok(FrozenParts {
            index,
            data,
            header,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::CodePointTrie;

    fn sample_builder() -> TrieBuilder {
        let mut builder = TrieBuilder::new(0, 0xFFFF);
        builder.set_range(0x30, 0x39, 1, true).unwrap();
        builder.set(0xE9, 2).unwrap();
        builder.set_range(0x4E00, 0x9FFF, 3, true).unwrap();
        builder.set(0xD800, 4).unwrap();
        builder.set(0xDBFF, 5).unwrap();
        builder.set_range(0x1F300, 0x1F5FF, 6, true).unwrap();
        builder.set(0x2A6D6, 7).unwrap();
        builder
    }

    const PROBES: &[u32] = &[
        0, 0x2F, 0x30, 0x39, 0x3A, 0xE9, 0x7FF, 0x800, 0x4DFF, 0x4E00, 0x9FFF, 0xA000, 0xD7FF,
        0xD800, 0xDBFF, 0xDC00, 0xDFFF, 0xE000, 0xFFFF, 0x10000, 0x1F2FF, 0x1F300, 0x1F5FF,
        0x1F600, 0x2A6D5, 0x2A6D6, 0x2A6D7, 0x10FFFF,
    ];

    #[test]
    fn test_frozen_tries_agree_with_builder() {
        let builder = sample_builder();
        let trie16 = builder.build_16().unwrap();
        let trie32 = builder.build_32().unwrap();

        for &cp in PROBES {
            assert_eq!(trie16.get(cp), builder.get(cp), "16-bit U+{:04X}", cp);
            assert_eq!(trie32.get(cp), builder.get(cp), "32-bit U+{:04X}", cp);
        }
        assert_eq!(trie16.get(0x110000), 0xFFFF);
        assert_eq!(trie32.get(u32::MAX), 0xFFFF);
    }

    #[test]
    fn test_high_start_is_rounded_boundary() {
        let trie = sample_builder().build_32().unwrap();
        // 0x2A6D6 is the last non-default code point.
        assert_eq!(trie.header().high_start, 0x2A800);
    }

    #[test]
    fn test_empty_builder_has_bmp_only_layout() {
        let trie = TrieBuilder::new(9, 0).build_32().unwrap();
        assert_eq!(trie.header().high_start, 0x10000);
        assert_eq!(trie.header().index_length, INDEX_1_OFFSET);
        assert_eq!(trie.get(0x10FFFF), 9);
        // 64 linear blocks, no further unique blocks, one granularity block.
        assert_eq!(trie.data().len(), 0x800 + DATA_GRANULARITY);
    }

    #[test]
    fn test_identical_blocks_are_shared() {
        let mut builder = TrieBuilder::new(0, 0);
        for base in [0x1000u32, 0x2000, 0x3000, 0x4000] {
            builder.set_range(base, base + 0x1F, 8, true).unwrap();
        }
        let trie = builder.build_32().unwrap();
        // Linear blocks, one shared block of 8s, and the high value block.
        assert_eq!(trie.data().len(), 0x800 + DATA_BLOCK_LENGTH + DATA_GRANULARITY);
    }

    #[test]
    fn test_lead_surrogate_code_units_are_separate() {
        let mut builder = TrieBuilder::new(0, 0);
        builder.set(0xD801, 1).unwrap();
        builder.set_for_lead_surrogate_code_unit(0xD801, 2).unwrap();
        let trie = builder.build_16().unwrap();

        assert_eq!(trie.get(0xD801), 1);
        assert_eq!(trie.get_from_u16_single_lead(0xD801), 2);
        assert_eq!(trie.get_from_u16_single_lead(0x41), 0);
        assert!(builder.set_for_lead_surrogate_code_unit(0xDC00, 1).is_err());
    }

    #[test]
    fn test_utf8_two_byte_lookup() {
        let trie = sample_builder().build_16().unwrap();
        // U+00E9 is C3 A9 in UTF-8.
        assert_eq!(trie.get_from_utf8_two_byte(0xC3, 0xA9), 2);
        assert_eq!(trie.get_from_utf8_two_byte(0xC3, 0xA8), 0);
        assert_eq!(trie.get_from_utf8_two_byte(0xC1, 0xA9), 0xFFFF);
        assert_eq!(trie.get_from_utf8_two_byte(0xC3, 0x29), 0xFFFF);
    }

    #[test]
    fn test_set_range_without_overwrite() {
        let mut builder = TrieBuilder::new(0, 0);
        builder.set(0x42, 5).unwrap();
        builder.set_range(0x41, 0x43, 6, false).unwrap();
        assert_eq!(builder.get(0x41), 6);
        assert_eq!(builder.get(0x42), 5);
        assert_eq!(builder.get(0x43), 6);
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        let mut builder = TrieBuilder::new(0, 0);
        assert_eq!(
            builder.set(0x110000, 1),
            Err(TrieError::CodePointOutOfRange(0x110000))
        );
        assert_eq!(
            builder.set_range(0x50, 0x40, 1, true),
            Err(TrieError::InvalidRange { start: 0x50, end: 0x40 })
        );
    }

    #[test]
    fn test_16_bit_rejects_wide_values() {
        let mut builder = TrieBuilder::new(0, 0);
        builder.set(0x41, 0x10000).unwrap();
        assert!(matches!(
            builder.build_16(),
            Err(TrieError::ValueOutOfRange { value: 0x10000, .. })
        ));
        assert_eq!(builder.build_32().unwrap().get(0x41), 0x10000);
    }

    #[test]
    fn test_too_many_unique_blocks_overflow() {
        let mut builder = TrieBuilder::new(0, 0);
        for block in 0..BLOCK_COUNT as u32 {
            builder.set(block << SHIFT_2, block + 1).unwrap();
        }
        assert!(matches!(
            builder.build_32(),
            Err(TrieError::IndexOverflow { .. })
        ));
    }
}
