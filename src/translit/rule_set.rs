//! An ordered, indexed collection of rules.

use tracing::debug;

use super::masking::find_masked_pair;
use super::{MatchDegree, Replaceable, RuleData, RuleError, TransliterationRule, UnicodeFilter};

/// Number of index buckets, one per low byte.
const BUCKET_COUNT: usize = 256;

/// Validation performed when a [`RuleSet`] is frozen.
///
/// # Example
///
/// ```rust,ignore
/// let options = RuleSetOptions::new().check_masking(false);
/// let rules = RuleSet::new(rules, &data, options)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSetOptions {
    check_masking: bool,
    check_segment_references: bool,
}

impl RuleSetOptions {
    /// All checks enabled.
    pub fn new() -> Self {
        Self {
            check_masking: true,
            check_segment_references: true,
        }
    }

    /// Reject rule sets in which an earlier rule masks a later one.
    pub fn check_masking(mut self, enabled: bool) -> Self {
        self.check_masking = enabled;
        self
    }

    /// Reject rules whose output refers to an undefined segment.
    pub fn check_segment_references(mut self, enabled: bool) -> Self {
        self.check_segment_references = enabled;
        self
    }
}

impl Default for RuleSetOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of an incremental match attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementalMatch<'a> {
    /// A rule matched completely
    Full(&'a TransliterationRule),
    /// A rule could still match once more text arrives
    Partial,
    /// No rule can match at this cursor
    None,
}

/// A frozen rule set with a 256-way index on the first key character.
///
/// Rules are tried in declaration order. Each bucket lists, in order, the
/// rules that could match a key whose first character has that low byte;
/// rules keyed by a variable or with no key appear in several buckets.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<TransliterationRule>,
    /// `bucket_rules[index[x]..index[x + 1]]` are the candidates for low byte `x`
    index: Vec<usize>,
    bucket_rules: Vec<usize>,
    maximum_context_length: usize,
}

impl RuleSet {
    /// Freeze `rules` into an indexed set.
    ///
    /// # Errors
    ///
    /// * [`RuleError::DanglingSegmentReference`] if segment checking is on and
    ///   a rule refers to a segment it does not define
    /// * [`RuleError::RuleMasked`] if masking checking is on and a rule can
    ///   never fire because an earlier rule in the same bucket masks it
    pub fn new<D: RuleData + ?Sized>(
        rules: Vec<TransliterationRule>,
        data: &D,
        options: RuleSetOptions,
    ) -> Result<Self, RuleError> {
        if options.check_segment_references {
            rules
                .iter()
                .try_for_each(|rule| rule.check_segment_references(data))?;
        }

        let mut index = Vec::with_capacity(BUCKET_COUNT + 1);
        let mut bucket_rules = Vec::new();
        for x in 0..BUCKET_COUNT {
            index.push(bucket_rules.len());
            let v = x as u8;
            bucket_rules.extend(
                rules
                    .iter()
                    .enumerate()
                    .filter(|(_, rule)| rule.matches_index_value(v, data))
                    .map(|(i, _)| i),
            );
        }
        index.push(bucket_rules.len());

        let set = Self {
            maximum_context_length: rules
                .iter()
                .map(TransliterationRule::ante_context_length)
                .max()
                .unwrap_or(0),
            rules,
            index,
            bucket_rules,
        };

        if options.check_masking {
            for x in 0..BUCKET_COUNT {
                let bucket: Vec<&TransliterationRule> = set.bucket(x).collect();
                if let Some((i, j)) = find_masked_pair(&bucket) {
                    return Err(RuleError::RuleMasked {
                        masking: bucket[i].to_string(),
                        masked: bucket[j].to_string(),
                    });
                }
            }
        }

        debug!(
            rules = set.rules.len(),
            indexed = set.bucket_rules.len(),
            maximum_context_length = set.maximum_context_length,
            "froze rule set"
        );
        Ok(set)
    }

    /// The rules in declaration order.
    pub fn rules(&self) -> &[TransliterationRule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Longest ante context of any rule.
    pub fn maximum_context_length(&self) -> usize {
        self.maximum_context_length
    }

    fn bucket(&self, x: usize) -> impl Iterator<Item = &TransliterationRule> + '_ {
        self.bucket_rules[self.index[x]..self.index[x + 1]]
            .iter()
            .map(move |&i| &self.rules[i])
    }

    /// Rules that could match a key starting with `c`.
    fn candidates(&self, c: Option<char>) -> impl Iterator<Item = &TransliterationRule> + '_ {
        c.into_iter()
            .flat_map(move |c| self.bucket((c as u32 & 0xFF) as usize))
    }

    /// The first rule that fully matches with its key at `cursor`.
    pub fn find_match<R, D>(
        &self,
        text: &R,
        start: usize,
        limit: usize,
        cursor: usize,
        data: &D,
        filter: Option<&dyn UnicodeFilter>,
    ) -> Option<&TransliterationRule>
    where
        R: Replaceable + ?Sized,
        D: RuleData + ?Sized,
    {
        self.candidates(text.char_at(cursor))
            .find(|rule| rule.matches(text, start, limit, cursor, data, filter))
    }

    /// Like [`find_match`](Self::find_match), but stops at the first rule that
    /// only partially matches.
    ///
    /// A partial match ahead of any full match means the outcome depends on
    /// text that has not arrived yet.
    pub fn find_incremental_match<R, D>(
        &self,
        text: &R,
        start: usize,
        limit: usize,
        cursor: usize,
        data: &D,
        filter: Option<&dyn UnicodeFilter>,
    ) -> IncrementalMatch<'_>
    where
        R: Replaceable + ?Sized,
        D: RuleData + ?Sized,
    {
        for rule in self.candidates(text.char_at(cursor)) {
            match rule.match_degree(text, start, limit, cursor, data, filter) {
                MatchDegree::FullMatch => return IncrementalMatch::Full(rule),
                MatchDegree::PartialMatch => return IncrementalMatch::Partial,
                MatchDegree::Mismatch => {}
            }
        }
        IncrementalMatch::None
    }
}
