//! A single transliteration rule: matching, match degree, and rewriting.
//!
//! # Pattern layout
//!
//! The ante context, key, and post context are stored as one pattern with
//! two length markers:
//!
//! ```text
//! pattern:  a a a k k k k p p
//!           ^     ^       ^
//!           0     ante    ante + key
//! ```
//!
//! Matching aligns the pattern so that the key starts at the cursor.
//! Rewriting only ever touches the key range; context characters are read
//! but never replaced.

use std::fmt::{self, Write as _};

use smallvec::SmallVec;

use super::{masking, Replaceable, RuleData, RuleError, UnicodeFilter};

/// How well a rule matches the text at a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchDegree {
    /// At least one character of the context or key differs from the text
    Mismatch,
    /// Every available text character matches, but the text ends before the
    /// pattern does
    PartialMatch,
    /// The whole pattern matches
    FullMatch,
}

/// An immutable rule rewriting a key, optionally constrained by context.
///
/// # Example
///
/// ```rust,ignore
/// use libtranslit::translit::*;
///
/// // a{b}c > B
/// let rule = TransliterationRule::new("abc", Some(1), Some(2), "B", None)?;
/// let data = VariableTable::new();
/// let mut text = ReplaceableString::from("xabcX");
///
/// assert!(rule.matches(&text, 0, 5, 2, &data, None));
/// assert_eq!(rule.replace(&mut text, 2, &data), 0);
/// assert_eq!(text.to_string(), "xaBcX");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransliterationRule {
    /// Ante context, key, and post context, concatenated
    pattern: Vec<char>,
    output: Vec<char>,
    /// Offset/limit pairs into `pattern`; segment `n` is `segments[n - 1]`
    segments: Vec<(usize, usize)>,
    ante_context_length: usize,
    key_length: usize,
    cursor_pos: usize,
}

#[inline]
fn char_matches<D>(key: char, c: char, data: &D, filter: Option<&dyn UnicodeFilter>) -> bool
where
    D: RuleData + ?Sized,
{
    filter.map_or(true, |f| f.contains(c)) && data.resolve(key).matches(c)
}

fn write_escaped(f: &mut fmt::Formatter<'_>, chars: &[char]) -> fmt::Result {
    for &c in chars {
        match c {
            '\\' => f.write_str("\\\\")?,
            ' '..='~' => f.write_char(c)?,
            c if (c as u32) <= 0xFFFF => write!(f, "\\u{:04X}", c as u32)?,
            c => write!(f, "\\U{:08X}", c as u32)?,
        }
    }
    Ok(())
}

impl TransliterationRule {
    /// Create a rule without segments.
    ///
    /// # Arguments
    ///
    /// * `input` - Ante context, key, and post context, concatenated
    /// * `ante_context_pos` - End of the ante context in `input`, or `None`
    ///   for no ante context
    /// * `post_context_pos` - Start of the post context in `input`, or `None`
    ///   for no post context
    /// * `output` - Replacement for the key
    /// * `cursor_pos` - Where the cursor lands within `output` after a
    ///   replacement, or `None` for the end of `output`
    ///
    /// # Errors
    ///
    /// Any marker outside its valid range is rejected; markers are never
    /// clamped.
    pub fn new(
        input: &str,
        ante_context_pos: Option<usize>,
        post_context_pos: Option<usize>,
        output: &str,
        cursor_pos: Option<usize>,
    ) -> Result<Self, RuleError> {
        Self::with_segments(
            input,
            ante_context_pos,
            post_context_pos,
            output,
            cursor_pos,
            Vec::new(),
        )
    }

    /// Create a rule whose output may refer to segments of the matched text.
    ///
    /// Each segment is an `(offset, limit)` pair into `input` and may span
    /// context as well as key characters.
    pub fn with_segments(
        input: &str,
        ante_context_pos: Option<usize>,
        post_context_pos: Option<usize>,
        output: &str,
        cursor_pos: Option<usize>,
        segments: Vec<(usize, usize)>,
    ) -> Result<Self, RuleError> {
        let pattern: Vec<char> = input.chars().collect();
        let output: Vec<char> = output.chars().collect();
        let len = pattern.len();

        let ante_context_length = match ante_context_pos {
            None => 0,
            Some(pos) if pos <= len => pos,
            Some(pos) => return Err(RuleError::InvalidAnteContext { pos, len }),
        };
        let key_length = match post_context_pos {
            None => len - ante_context_length,
            Some(pos) if (ante_context_length..=len).contains(&pos) => pos - ante_context_length,
            Some(pos) => {
                return Err(RuleError::InvalidPostContext {
                    pos,
                    ante: ante_context_length,
                    len,
                })
            }
        };
        let cursor_pos = match cursor_pos {
            None => output.len(),
            Some(pos) if pos <= output.len() => pos,
            Some(pos) => {
                return Err(RuleError::InvalidCursorPosition {
                    pos,
                    len: output.len(),
                })
            }
        };
        for (i, &(start, limit)) in segments.iter().enumerate() {
            if start > limit || limit > len {
                return Err(RuleError::InvalidSegment {
                    number: i + 1,
                    start,
                    limit,
                    len,
                });
            }
        }

        Ok(Self {
            pattern,
            output,
            segments,
            ante_context_length,
            key_length,
            cursor_pos,
        })
    }

    /// Length of the ante context.
    #[inline]
    pub fn ante_context_length(&self) -> usize {
        self.ante_context_length
    }

    /// Length of the key.
    #[inline]
    pub fn key_length(&self) -> usize {
        self.key_length
    }

    /// Length of the post context.
    #[inline]
    pub fn post_context_length(&self) -> usize {
        self.pattern.len() - self.ante_context_length - self.key_length
    }

    /// Cursor position within the output, in `0..=output().len()`.
    #[inline]
    pub fn cursor_pos(&self) -> usize {
        self.cursor_pos
    }

    /// Ante context, key, and post context, concatenated.
    pub fn pattern(&self) -> &[char] {
        &self.pattern
    }

    /// The key alone.
    pub fn key(&self) -> &[char] {
        &self.pattern[self.ante_context_length..self.ante_context_length + self.key_length]
    }

    /// The output template.
    pub fn output(&self) -> &[char] {
        &self.output
    }

    /// Segment offset/limit pairs into the pattern; empty if none.
    pub fn segments(&self) -> &[(usize, usize)] {
        &self.segments
    }

    /// Low byte of the first key character, used to bucket rules.
    ///
    /// `None` when the first key character is a variable (its low byte is
    /// ambiguous) or the rule has no key and post context, in which case it
    /// can match at any cursor.
    pub fn index_value<D: RuleData + ?Sized>(&self, data: &D) -> Option<u8> {
        let &c = self.pattern.get(self.ante_context_length)?;
        match data.lookup(c) {
            Some(_) => None,
            None => Some((c as u32 & 0xFF) as u8),
        }
    }

    /// Whether this rule could match a key whose first character has low
    /// byte `v`.
    pub fn matches_index_value<D: RuleData + ?Sized>(&self, v: u8, data: &D) -> bool {
        let Some(&c) = self.pattern.get(self.ante_context_length) else {
            return true;
        };
        match data.lookup(c) {
            Some(set) => set.contains_index_value(v),
            None => (c as u32 & 0xFF) as u8 == v,
        }
    }

    /// Whether the whole pattern matches with the key starting at `cursor`.
    ///
    /// # Arguments
    ///
    /// * `start`, `limit` - The window the pattern must fit in
    /// * `cursor` - Where the key must start, in `start..=limit`
    /// * `filter` - Text characters the filter rejects never match
    pub fn matches<R, D>(
        &self,
        text: &R,
        start: usize,
        limit: usize,
        cursor: usize,
        data: &D,
        filter: Option<&dyn UnicodeFilter>,
    ) -> bool
    where
        R: Replaceable + ?Sized,
        D: RuleData + ?Sized,
    {
        let Some(begin) = cursor.checked_sub(self.ante_context_length) else {
            return false;
        };
        if begin < start || begin + self.pattern.len() > limit {
            return false;
        }
        self.pattern.iter().zip(begin..).all(|(&key, i)| {
            text.char_at(i)
                .is_some_and(|c| char_matches(key, c, data, filter))
        })
    }

    /// Degree of match with the key starting at `cursor`.
    ///
    /// A partial match means the text ran out at `limit` after covering at
    /// least the ante context; in incremental transliteration the caller
    /// must wait for more text before deciding.
    pub fn match_degree<R, D>(
        &self,
        text: &R,
        start: usize,
        limit: usize,
        cursor: usize,
        data: &D,
        filter: Option<&dyn UnicodeFilter>,
    ) -> MatchDegree
    where
        R: Replaceable + ?Sized,
        D: RuleData + ?Sized,
    {
        let matched = cursor
            .checked_sub(self.ante_context_length)
            .and_then(|begin| self.region_match_length(text, start, limit, begin, data, filter));
        match matched {
            Some(n) if n >= self.pattern.len() => MatchDegree::FullMatch,
            Some(n) if n >= self.ante_context_length => MatchDegree::PartialMatch,
            _ => MatchDegree::Mismatch,
        }
    }

    /// Number of pattern characters matched from `begin` before `limit`, or
    /// `None` on a mismatch.
    fn region_match_length<R, D>(
        &self,
        text: &R,
        start: usize,
        limit: usize,
        begin: usize,
        data: &D,
        filter: Option<&dyn UnicodeFilter>,
    ) -> Option<usize>
    where
        R: Replaceable + ?Sized,
        D: RuleData + ?Sized,
    {
        if begin < start {
            return None;
        }
        let mut matched = 0;
        for (&key, i) in self.pattern.iter().zip(begin..limit) {
            let c = text.char_at(i)?;
            if !char_matches(key, c, data, filter) {
                return None;
            }
            matched += 1;
        }
        Some(matched)
    }

    /// Replace the key at `offset` with the output and return the change in
    /// text length.
    ///
    /// Assumes this rule matched with the key starting at `offset`. Segment
    /// references in the output are expanded to the text the segment
    /// matched.
    pub fn replace<R, D>(&self, text: &mut R, offset: usize, data: &D) -> isize
    where
        R: Replaceable + ?Sized,
        D: RuleData + ?Sized,
    {
        let key_limit = offset + self.key_length;
        if self.segments.is_empty() {
            text.replace(offset, key_limit, &self.output);
            return self.output.len() as isize - self.key_length as isize;
        }

        let text_start = offset.saturating_sub(self.ante_context_length);
        let mut buf: SmallVec<[char; 32]> = SmallVec::new();
        for &c in &self.output {
            match data
                .lookup_segment_reference(c)
                .and_then(|b| self.segments.get(b))
            {
                Some(&(seg_start, seg_limit)) => buf.extend(
                    (text_start + seg_start..text_start + seg_limit).filter_map(|i| text.char_at(i)),
                ),
                None => buf.push(c),
            }
        }
        text.replace(offset, key_limit, &buf);
        buf.len() as isize - self.key_length as isize
    }

    /// Whether this rule matches every text that `other` matches.
    ///
    /// See [`masking::masks`].
    pub fn masks(&self, other: &TransliterationRule) -> bool {
        masking::masks(self, other)
    }

    /// Check that every segment reference in the output names a segment.
    pub fn check_segment_references<D: RuleData + ?Sized>(&self, data: &D) -> Result<(), RuleError> {
        for &c in &self.output {
            if let Some(b) = data.lookup_segment_reference(c) {
                if b >= self.segments.len() {
                    return Err(RuleError::DanglingSegmentReference {
                        rule: self.to_string(),
                        number: b + 1,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Formats as `(ante) key (post) > out|put`, escaping characters outside
/// printable ASCII.
impl fmt::Display for TransliterationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (ante, rest) = self.pattern.split_at(self.ante_context_length);
        let (key, post) = rest.split_at(self.key_length);
        if !ante.is_empty() {
            f.write_char('(')?;
            write_escaped(f, ante)?;
            f.write_str(") ")?;
        }
        write_escaped(f, key)?;
        if !post.is_empty() {
            f.write_str(" (")?;
            write_escaped(f, post)?;
            f.write_char(')')?;
        }
        f.write_str(" > ")?;
        let (before, after) = self.output.split_at(self.cursor_pos);
        write_escaped(f, before)?;
        if !after.is_empty() {
            f.write_char('|')?;
            write_escaped(f, after)?;
        }
        Ok(())
    }
}
