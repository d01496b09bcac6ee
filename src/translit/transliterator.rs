//! Driving a rule set over text.

use tracing::{trace, warn};

use super::{
    CharSet, IncrementalMatch, Replaceable, ReplaceableString, RuleData, RuleError, RuleSet,
    RuleSetOptions, TransliterationRule, UnicodeFilter, VariableTable,
};

/// Bound on rule applications per character of the range.
const LOOP_GUARD_FACTOR: usize = 16;

/// Offsets delimiting a transliteration pass.
///
/// `context_start..context_limit` is the text rules may read as context;
/// `start..limit` is the text still to be transliterated. After a pass,
/// `start` is where the next pass resumes and both limits reflect the
/// length changes made by replacements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Start of readable context
    pub context_start: usize,
    /// End of readable context
    pub context_limit: usize,
    /// First character to transliterate
    pub start: usize,
    /// End of the characters to transliterate
    pub limit: usize,
}

impl Position {
    /// Create a position from its four offsets.
    pub fn new(context_start: usize, context_limit: usize, start: usize, limit: usize) -> Self {
        Self {
            context_start,
            context_limit,
            start,
            limit,
        }
    }

    /// A position covering all of a text of length `len`.
    pub fn whole(len: usize) -> Self {
        Self::new(0, len, 0, len)
    }

    /// Check `context_start <= start <= limit <= context_limit <= len`.
    pub fn validate(&self, len: usize) -> Result<(), RuleError> {
        let ordered = self.context_start <= self.start
            && self.start <= self.limit
            && self.limit <= self.context_limit
            && self.context_limit <= len;
        if ordered {
            Ok(())
        } else {
            Err(RuleError::InvalidPosition {
                context_start: self.context_start,
                start: self.start,
                limit: self.limit,
                context_limit: self.context_limit,
                len,
            })
        }
    }
}

/// A transliterator built from a rule set, its placeholder dictionary, and
/// an optional filter.
///
/// # Example
///
/// ```rust,ignore
/// use libtranslit::translit::*;
///
/// let rules = vec![
///     TransliterationRule::new("sh", None, None, "ш", None)?,
///     TransliterationRule::new("s", None, None, "с", None)?,
/// ];
/// let t = RuleBasedTransliterator::new("Latin-Cyrillic", rules, VariableTable::new(), RuleSetOptions::default())?;
/// assert_eq!(t.transliterate("shss"), "шсс");
/// ```
#[derive(Debug, Clone)]
pub struct RuleBasedTransliterator<D = VariableTable> {
    id: String,
    rules: RuleSet,
    data: D,
    filter: Option<CharSet>,
}

impl<D: RuleData> RuleBasedTransliterator<D> {
    /// Freeze `rules` against `data` and wrap them in a transliterator.
    ///
    /// # Errors
    ///
    /// Propagates rule set validation errors from [`RuleSet::new`].
    pub fn new(
        id: impl Into<String>,
        rules: Vec<TransliterationRule>,
        data: D,
        options: RuleSetOptions,
    ) -> Result<Self, RuleError> {
        let rules = RuleSet::new(rules, &data, options)?;
        Ok(Self {
            id: id.into(),
            rules,
            data,
            filter: None,
        })
    }

    /// Only transliterate characters in `filter`.
    pub fn with_filter(mut self, filter: CharSet) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Identifier of this transliterator.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The frozen rules.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// The placeholder dictionary.
    pub fn data(&self) -> &D {
        &self.data
    }

    /// The filter, if any.
    pub fn filter(&self) -> Option<&CharSet> {
        self.filter.as_ref()
    }

    /// Number of characters before `start` that rules may need as context.
    pub fn maximum_context_length(&self) -> usize {
        self.rules.maximum_context_length()
    }

    /// Transliterate a whole string.
    pub fn transliterate(&self, s: &str) -> String {
        let mut text = ReplaceableString::from(s);
        let mut pos = Position::whole(text.len());
        self.run(&mut text, &mut pos, false);
        text.to_string()
    }

    /// Run one forward pass over `pos.start..pos.limit`.
    ///
    /// In incremental mode the pass stops at the first cursor where a rule
    /// only partially matches, leaving `pos.start` there so a later call can
    /// resume once more text has been appended. Otherwise the whole range is
    /// processed and `pos.start` ends at `pos.limit`.
    ///
    /// # Errors
    ///
    /// [`RuleError::InvalidPosition`] if `pos` is inconsistent with `text`.
    pub fn transliterate_range<R: Replaceable + ?Sized>(
        &self,
        text: &mut R,
        pos: &mut Position,
        incremental: bool,
    ) -> Result<(), RuleError> {
        pos.validate(text.len())?;
        self.run(text, pos, incremental);
        Ok(())
    }

    /// Transliterate whatever an incremental pass left pending.
    pub fn finish_transliteration<R: Replaceable + ?Sized>(
        &self,
        text: &mut R,
        pos: &mut Position,
    ) -> Result<(), RuleError> {
        self.transliterate_range(text, pos, false)
    }

    fn run<R: Replaceable + ?Sized>(&self, text: &mut R, pos: &mut Position, incremental: bool) {
        let filter = self.filter.as_ref().map(|f| f as &dyn UnicodeFilter);
        let mut cursor = pos.start;
        let mut limit = pos.limit;
        let loop_limit = (limit - cursor).saturating_mul(LOOP_GUARD_FACTOR);
        let mut loop_count = 0usize;

        while cursor < limit && loop_count <= loop_limit {
            let found = if incremental {
                match self.rules.find_incremental_match(
                    &*text,
                    pos.context_start,
                    limit,
                    cursor,
                    &self.data,
                    filter,
                ) {
                    IncrementalMatch::Full(rule) => Some(rule),
                    IncrementalMatch::Partial => break,
                    IncrementalMatch::None => None,
                }
            } else {
                self.rules
                    .find_match(&*text, pos.context_start, limit, cursor, &self.data, filter)
            };

            match found {
                Some(rule) => {
                    let delta = rule.replace(text, cursor, &self.data);
                    limit = limit.saturating_add_signed(delta);
                    pos.context_limit = pos.context_limit.saturating_add_signed(delta);
                    trace!(id = %self.id, %rule, cursor, delta, "applied rule");
                    cursor += rule.cursor_pos();
                    loop_count += 1;
                }
                None => cursor += 1,
            }
        }

        if loop_count > loop_limit {
            warn!(
                id = %self.id,
                loop_count,
                cursor,
                "loop guard tripped, abandoning the rest of the range"
            );
        }

        pos.limit = limit;
        pos.start = if incremental { cursor } else { limit };
    }
}
