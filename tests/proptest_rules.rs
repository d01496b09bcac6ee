//! Property-based tests for transliteration rules using proptest

use libtranslit::prelude::*;
use proptest::prelude::*;

// Strategy for short strings over a small alphabet so rules fire often
fn text_strategy() -> impl Strategy<Value = String> {
    "[abcx]{0,24}"
}

// Strategy for a rule pattern with optional context markers
fn rule_strategy() -> impl Strategy<Value = TransliterationRule> {
    ("[abc]{1,4}", "[xyz]{0,3}")
        .prop_flat_map(|(input, output)| {
            let len = input.chars().count();
            (Just(input), Just(output), 0..=len)
        })
        .prop_flat_map(|(input, output, ante)| {
            let len = input.chars().count();
            (Just(input), Just(output), Just(ante), ante..=len)
        })
        .prop_map(|(input, output, ante, post)| {
            TransliterationRule::new(&input, Some(ante), Some(post), &output, None).unwrap()
        })
}

fn digraph_transliterator() -> RuleBasedTransliterator {
    let rules = vec![
        TransliterationRule::new("ab", None, None, "X", None).unwrap(),
        TransliterationRule::new("a", None, None, "Y", None).unwrap(),
        TransliterationRule::new("c", None, None, "ZZ", None).unwrap(),
    ];
    RuleBasedTransliterator::new("Digraphs", rules, VariableTable::new(), RuleSetOptions::default())
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: feeding text one character at a time, then finishing,
    /// gives the same result as a single batch pass
    #[test]
    fn prop_incremental_equals_batch(input in text_strategy()) {
        let t = digraph_transliterator();
        let mut buf = ReplaceableString::new();
        let mut pos = Position::default();

        for c in input.chars() {
            let end = buf.len();
            buf.replace(end, end, &[c]);
            pos.limit += 1;
            pos.context_limit += 1;
            t.transliterate_range(&mut buf, &mut pos, true).unwrap();
            prop_assert!(pos.start <= pos.limit);
        }
        t.finish_transliteration(&mut buf, &mut pos).unwrap();

        prop_assert_eq!(buf.to_string(), t.transliterate(&input));
        prop_assert_eq!(pos.start, buf.len());
    }

    /// Property: the returned delta is exactly the change in text length
    #[test]
    fn prop_replace_delta_matches_length(rule in rule_strategy(), input in text_strategy()) {
        let data = VariableTable::new();
        let mut buf = ReplaceableString::from(input.as_str());
        let limit = buf.len();

        for cursor in 0..=limit {
            if rule.matches(&buf, 0, limit, cursor, &data, None) {
                let before = buf.len() as isize;
                let delta = rule.replace(&mut buf, cursor, &data);
                prop_assert_eq!(buf.len() as isize - before, delta);
                break;
            }
        }
    }

    /// Property: a full match is exactly what `matches` reports
    #[test]
    fn prop_full_match_iff_matches(rule in rule_strategy(), input in text_strategy()) {
        let data = VariableTable::new();
        let buf = ReplaceableString::from(input.as_str());
        let limit = buf.len();

        for cursor in 0..=limit {
            let full = rule.match_degree(&buf, 0, limit, cursor, &data, None) == MatchDegree::FullMatch;
            prop_assert_eq!(full, rule.matches(&buf, 0, limit, cursor, &data, None));
        }
    }

    /// Property: every rule masks itself and any rule that only adds
    /// post context
    #[test]
    fn prop_masking_reflexive_and_prefix(rule in rule_strategy(), extra in "[abc]{1,3}") {
        prop_assert!(rule.masks(&rule));

        let pattern: String = rule.pattern().iter().collect();
        let output: String = rule.output().iter().collect();
        let extended = TransliterationRule::new(
            &format!("{pattern}{extra}"),
            Some(rule.ante_context_length()),
            Some(rule.ante_context_length() + rule.key_length()),
            &output,
            None,
        )
        .unwrap();
        prop_assert!(rule.masks(&extended));
    }

    /// Property: a literal-keyed rule belongs to exactly one index bucket
    #[test]
    fn prop_index_value_consistent(rule in rule_strategy()) {
        let data = VariableTable::new();
        match rule.index_value(&data) {
            Some(v) => {
                for other in 0..=255u8 {
                    prop_assert_eq!(rule.matches_index_value(other, &data), other == v);
                }
            }
            None => prop_assert!(rule.matches_index_value(0, &data)),
        }
    }
}
