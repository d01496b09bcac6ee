//! Character sets used as rule variables and filters.

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

use super::UnicodeFilter;

#[cfg(feature = "serialization")]
const MAX_SCALAR: u32 = 0x10FFFF;

/// A set of characters stored as sorted, disjoint, non-adjacent inclusive
/// ranges of scalar values.
///
/// # Example
///
/// ```rust,ignore
/// use libtranslit::translit::CharSet;
///
/// let vowels: CharSet = "aeiou".chars().collect();
/// assert!(vowels.contains('e'));
///
/// let digits = CharSet::from_range('0', '9');
/// assert!(digits.contains_index_value(b'5'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialization", serde(try_from = "CharSetParts"))]
pub struct CharSet {
    ranges: Vec<(u32, u32)>,
}

impl CharSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set holding `first..=last`.
    pub fn from_range(first: char, last: char) -> Self {
        let mut set = Self::new();
        set.add_range(first, last);
        set
    }

    /// Add one character.
    pub fn add(&mut self, c: char) {
        self.add_range(c, c);
    }

    /// Add the characters `first..=last`. An empty range is ignored.
    pub fn add_range(&mut self, first: char, last: char) {
        let (lo, hi) = (first as u32, last as u32);
        if lo > hi {
            return;
        }
        self.ranges.push((lo, hi));
        self.normalize();
    }

    /// Whether `c` is a member.
    #[inline]
    pub fn contains(&self, c: char) -> bool {
        let cp = c as u32;
        let i = self.ranges.partition_point(|&(_, hi)| hi < cp);
        self.ranges.get(i).is_some_and(|&(lo, _)| lo <= cp)
    }

    /// Whether any member has a low byte equal to `v`.
    ///
    /// Used to decide which index buckets a set-keyed rule belongs to.
    pub fn contains_index_value(&self, v: u8) -> bool {
        let v = u32::from(v);
        self.ranges.iter().any(|&(lo, hi)| {
            if hi - lo >= 0xFF {
                true
            } else if lo & !0xFF == hi & !0xFF {
                (lo & 0xFF) <= v && v <= (hi & 0xFF)
            } else {
                // Wraps once past a 256 boundary.
                (lo & 0xFF) <= v || v <= (hi & 0xFF)
            }
        })
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.ranges
            .iter()
            .map(|&(lo, hi)| (hi - lo + 1) as usize)
            .sum()
    }

    /// The member ranges as inclusive scalar value pairs, in ascending order.
    pub fn ranges(&self) -> &[(u32, u32)] {
        &self.ranges
    }

    fn normalize(&mut self) {
        self.ranges.sort_unstable();
        let mut merged: Vec<(u32, u32)> = Vec::with_capacity(self.ranges.len());
        for &(lo, hi) in &self.ranges {
            match merged.last_mut() {
                Some(last) if lo <= last.1.saturating_add(1) => last.1 = last.1.max(hi),
                _ => merged.push((lo, hi)),
            }
        }
        self.ranges = merged;
    }
}

impl UnicodeFilter for CharSet {
    #[inline]
    fn contains(&self, c: char) -> bool {
        CharSet::contains(self, c)
    }
}

impl FromIterator<char> for CharSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut set = Self {
            ranges: iter.into_iter().map(|c| (c as u32, c as u32)).collect(),
        };
        set.normalize();
        set
    }
}

#[cfg(feature = "serialization")]
#[derive(Deserialize)]
struct CharSetParts {
    ranges: Vec<(u32, u32)>,
}

#[cfg(feature = "serialization")]
impl TryFrom<CharSetParts> for CharSet {
    type Error = String;

    fn try_from(parts: CharSetParts) -> Result<Self, Self::Error> {
        let mut previous: Option<u32> = None;
        for &(lo, hi) in &parts.ranges {
            if lo > hi || hi > MAX_SCALAR {
                return Err(format!("invalid range {lo:#x}..={hi:#x}"));
            }
            if previous.is_some_and(|p| lo <= p.saturating_add(1)) {
                return Err(format!("range {lo:#x}..={hi:#x} is not sorted and disjoint"));
            }
            previous = Some(hi);
        }
        Ok(Self {
            ranges: parts.ranges,
        })
    }
}
