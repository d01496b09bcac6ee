//! Frozen, read-only tries in 16-bit and 32-bit value widths.

use super::{
    CodePointTrie, TrieError, TrieHeader, ValueWidth, CP_PER_INDEX_1_ENTRY, DATA_GRANULARITY,
    INDEX_1_OFFSET, MAX_INDEX_1_LENGTH,
};

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// A frozen trie holding 16-bit values.
///
/// The values follow the index section in one `u16` array, so index-2
/// entries address the combined array and the first `index_length` units
/// are never values.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialization", serde(try_from = "Trie16Parts"))]
pub struct Trie16 {
    header: TrieHeader,
    index: Vec<u16>,
}

/// A frozen trie holding 32-bit values in a separate data array.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialization", serde(try_from = "Trie32Parts"))]
pub struct Trie32 {
    header: TrieHeader,
    index: Vec<u16>,
    data: Vec<u32>,
}

/// Checks shared by both widths.
fn validate_header(header: &TrieHeader) -> Result<(), TrieError> {
    if !(0x10000..=0x110000).contains(&header.high_start)
        || header.high_start % CP_PER_INDEX_1_ENTRY != 0
    {
        return Err(TrieError::InvalidStructure {
            reason: "high_start must be a multiple of 0x800 in 0x10000..=0x110000",
        });
    }
    let index_1_length = header.index_1_length();
    if index_1_length > MAX_INDEX_1_LENGTH || header.index_length < INDEX_1_OFFSET + index_1_length
    {
        return Err(TrieError::InvalidStructure {
            reason: "index section too short for the BMP and index-1 tables",
        });
    }
    if header.data_length < DATA_GRANULARITY {
        return Err(TrieError::InvalidStructure {
            reason: "data section shorter than one granularity block",
        });
    }
    Ok(())
}

impl Trie16 {
    /// Wrap a combined index+data array produced by a trie builder.
    ///
    /// # Errors
    ///
    /// Returns [`TrieError::InvalidStructure`] if the array length disagrees
    /// with the header, the high value slot lies outside the data section, or
    /// the data section cannot be addressed by shifted 16-bit index entries.
    pub fn try_new(index: Vec<u16>, header: TrieHeader) -> Result<Self, TrieError> {
        validate_header(&header)?;
        if index.len() != header.index_length + header.data_length {
            return Err(TrieError::InvalidStructure {
                reason: "array length must equal index_length + data_length",
            });
        }
        if header.high_value_index < header.index_length || header.high_value_index >= index.len()
        {
            return Err(TrieError::InvalidStructure {
                reason: "high_value_index outside the data section",
            });
        }
        if header.index_length % DATA_GRANULARITY != 0 {
            return Err(TrieError::InvalidStructure {
                reason: "data section must start on a granularity boundary",
            });
        }
        Ok(Self { header, index })
    }

    /// The combined index+data array.
    pub fn as_slice(&self) -> &[u16] {
        &self.index
    }
}

impl Trie32 {
    /// Wrap index and data arrays produced by a trie builder.
    ///
    /// # Errors
    ///
    /// Returns [`TrieError::InvalidStructure`] if the array lengths disagree
    /// with the header or the high value slot lies outside the data array.
    pub fn try_new(index: Vec<u16>, data: Vec<u32>, header: TrieHeader) -> Result<Self, TrieError> {
        validate_header(&header)?;
        if index.len() != header.index_length || data.len() != header.data_length {
            return Err(TrieError::InvalidStructure {
                reason: "array lengths must equal index_length and data_length",
            });
        }
        if header.high_value_index >= data.len() {
            return Err(TrieError::InvalidStructure {
                reason: "high_value_index outside the data array",
            });
        }
        Ok(Self {
            header,
            index,
            data,
        })
    }

    /// The index array.
    pub fn index(&self) -> &[u16] {
        &self.index
    }

    /// The data array.
    pub fn data(&self) -> &[u32] {
        &self.data
    }
}

impl CodePointTrie for Trie16 {
    #[inline]
    fn header(&self) -> &TrieHeader {
        &self.header
    }

    #[inline]
    fn index_entry(&self, slot: usize) -> Option<u16> {
        if slot < self.header.index_length {
            self.index.get(slot).copied()
        } else {
            None
        }
    }

    #[inline]
    fn value_at(&self, offset: usize) -> Option<u32> {
        self.index.get(offset).map(|&v| u32::from(v))
    }

    fn value_width(&self) -> ValueWidth {
        ValueWidth::Bits16
    }
}

impl CodePointTrie for Trie32 {
    #[inline]
    fn header(&self) -> &TrieHeader {
        &self.header
    }

    #[inline]
    fn index_entry(&self, slot: usize) -> Option<u16> {
        self.index.get(slot).copied()
    }

    #[inline]
    fn value_at(&self, offset: usize) -> Option<u32> {
        self.data.get(offset).copied()
    }

    fn value_width(&self) -> ValueWidth {
        ValueWidth::Bits32
    }
}

#[cfg(feature = "serialization")]
#[derive(Deserialize)]
struct Trie16Parts {
    header: TrieHeader,
    index: Vec<u16>,
}

#[cfg(feature = "serialization")]
impl TryFrom<Trie16Parts> for Trie16 {
    type Error = TrieError;

    fn try_from(parts: Trie16Parts) -> Result<Self, Self::Error> {
        Trie16::try_new(parts.index, parts.header)
    }
}

#[cfg(feature = "serialization")]
#[derive(Deserialize)]
struct Trie32Parts {
    header: TrieHeader,
    index: Vec<u16>,
    data: Vec<u32>,
}

#[cfg(feature = "serialization")]
impl TryFrom<Trie32Parts> for Trie32 {
    type Error = TrieError;

    fn try_from(parts: Trie32Parts) -> Result<Self, Self::Error> {
        Trie32::try_new(parts.index, parts.data, parts.header)
    }
}
