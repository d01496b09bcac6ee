//! Masking analysis between rules.
//!
//! Rule `r1` masks rule `r2` when every text `r2` matches is also matched by
//! `r1`. If `r1` comes first in a rule set, `r2` can never fire. Patterns are
//! compared after aligning them at the first key character:
//!
//! ```text
//! r1:      aakkkpppp
//! r2:     aaakkkkkpppp
//!            ^
//! ```
//!
//! `r1` may be no longer than `r2` on either side of the alignment point,
//! and its characters must equal the corresponding characters of `r2`.
//! Pattern characters are compared as written; a variable masks another
//! only if both are the same placeholder.

use super::TransliterationRule;

/// Whether `r1` masks `r2`.
///
/// # Examples
///
/// ```rust,ignore
/// // "a > x" masks "ab > y", but not the other way around.
/// let a = TransliterationRule::new("a", None, None, "x", None)?;
/// let ab = TransliterationRule::new("ab", None, None, "y", None)?;
/// assert!(masks(&a, &ab));
/// assert!(!masks(&ab, &a));
/// ```
pub fn masks(r1: &TransliterationRule, r2: &TransliterationRule) -> bool {
    let left = r1.ante_context_length();
    let left2 = r2.ante_context_length();
    let right = r1.pattern().len() - left;
    let right2 = r2.pattern().len() - left2;
    left <= left2 && right <= right2 && r2.pattern()[left2 - left..].starts_with(r1.pattern())
}

/// Find the first pair `(i, j)` with `i < j` where `rules[i]` masks `rules[j]`.
pub fn find_masked_pair(rules: &[&TransliterationRule]) -> Option<(usize, usize)> {
    rules.iter().enumerate().find_map(|(i, r1)| {
        rules[i + 1..]
            .iter()
            .position(|r2| masks(r1, r2))
            .map(|offset| (i, i + 1 + offset))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(input: &str, ante: Option<usize>, post: Option<usize>) -> TransliterationRule {
        TransliterationRule::new(input, ante, post, "", None).unwrap()
    }

    #[test]
    fn test_shorter_key_masks_longer() {
        let a = rule("a", None, None);
        let ab = rule("ab", None, None);
        assert!(masks(&a, &ab));
        assert!(!masks(&ab, &a));
    }

    #[test]
    fn test_identical_rules_mask_each_other() {
        let r1 = rule("ab", Some(1), None);
        let r2 = rule("ab", Some(1), None);
        assert!(masks(&r1, &r2));
        assert!(masks(&r2, &r1));
    }

    #[test]
    fn test_context_must_not_be_longer() {
        // c{a} does not mask {a}: it needs context the other rule lacks.
        let with_context = rule("ca", Some(1), None);
        let bare = rule("a", None, None);
        assert!(!masks(&with_context, &bare));
        assert!(masks(&bare, &with_context));
    }

    #[test]
    fn test_alignment_at_key_start() {
        // c{a} masks dc{a}(b).
        let r1 = rule("ca", Some(1), None);
        let r2 = rule("dcab", Some(2), Some(3));
        assert!(masks(&r1, &r2));

        // x{a} does not.
        let r3 = rule("xa", Some(1), None);
        assert!(!masks(&r3, &r2));
    }

    #[test]
    fn test_find_masked_pair() {
        let ab = rule("ab", None, None);
        let a = rule("a", None, None);
        let b = rule("b", None, None);

        assert_eq!(find_masked_pair(&[&ab, &a, &b]), None);
        assert_eq!(find_masked_pair(&[&b, &a, &ab]), Some((1, 2)));
    }
}
