//! Property-based tests for code point tries using proptest

use libtranslit::prelude::*;
use libtranslit::trie::CODE_POINT_MAX;
use proptest::prelude::*;

// Strategy for a code point, biased towards the interesting regions
fn code_point_strategy() -> impl Strategy<Value = u32> {
    prop_oneof![
        0u32..0x800,
        0xD700u32..0xE100,
        0u32..=0xFFFF,
        0x10000u32..0x30000,
        0u32..=CODE_POINT_MAX,
    ]
}

// Strategy for a handful of (start, length, value) range assignments
fn assignments_strategy() -> impl Strategy<Value = Vec<(u32, u32, u32)>> {
    prop::collection::vec((code_point_strategy(), 0u32..300, 0u32..=0xFFFF), 0..12)
}

fn build(assignments: &[(u32, u32, u32)]) -> TrieBuilder {
    let mut builder = TrieBuilder::new(7, 0xFFFF);
    for &(start, len, value) in assignments {
        let end = start.saturating_add(len).min(CODE_POINT_MAX);
        builder.set_range(start, end, value, true).unwrap();
    }
    builder
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: frozen tries of both widths agree with the builder
    #[test]
    fn prop_frozen_matches_builder(
        assignments in assignments_strategy(),
        probes in prop::collection::vec(code_point_strategy(), 1..200)
    ) {
        let builder = build(&assignments);
        let trie16 = builder.build_16().unwrap();
        let trie32 = builder.build_32().unwrap();

        for &(start, len, _) in &assignments {
            let end = start.saturating_add(len).min(CODE_POINT_MAX);
            for cp in [start.saturating_sub(1), start, end, end.saturating_add(1)] {
                prop_assert_eq!(trie16.get(cp), builder.get(cp));
                prop_assert_eq!(trie32.get(cp), builder.get(cp));
            }
        }
        for cp in probes {
            prop_assert_eq!(trie16.get(cp), builder.get(cp));
            prop_assert_eq!(trie32.get(cp), builder.get(cp));
        }
    }

    /// Property: everything at or above high_start shares the value of U+10FFFF
    #[test]
    fn prop_high_range_constant(
        assignments in assignments_strategy(),
        offsets in prop::collection::vec(0u32..0x100000, 1..50)
    ) {
        let trie = build(&assignments).build_32().unwrap();
        let high_start = trie.header().high_start;
        let high_value = trie.get(CODE_POINT_MAX);
        prop_assume!(high_start <= CODE_POINT_MAX);

        for offset in offsets {
            let cp = high_start + offset % (CODE_POINT_MAX + 1 - high_start);
            prop_assert_eq!(trie.get(cp), high_value);
        }
    }

    /// Property: anything above U+10FFFF yields the error value
    #[test]
    fn prop_out_of_range_is_error(cp in (CODE_POINT_MAX + 1)..=u32::MAX) {
        let trie = build(&[]).build_16().unwrap();
        prop_assert_eq!(trie.get(cp), 0xFFFF);
    }

    /// Property: next() then previous() returns the same step and index
    #[test]
    fn prop_iterator_round_trip(
        text in prop::collection::vec(any::<u16>(), 0..40),
        start in 0usize..40
    ) {
        let trie = build(&[(0xD800, 0x800, 3), (0x10000, 0x1000, 4)]).build_32().unwrap();
        let mut iter = trie.iter(&text, start);
        let before = iter.index();
        // Starting between the halves of a pair is not a code point boundary.
        let splits_pair = before > 0
            && before < text.len()
            && (0xDC00..=0xDFFF).contains(&text[before])
            && (0xD800..=0xDBFF).contains(&text[before - 1]);
        prop_assume!(!splits_pair);

        if let Some(forward) = iter.next() {
            prop_assert_eq!(forward.index, before);
            let backward = iter.previous();
            prop_assert_eq!(backward, Some(forward));
            prop_assert_eq!(iter.index(), before);
        } else {
            prop_assert!(!iter.has_next());
        }
    }

    /// Property: forward iteration visits every code unit exactly once
    #[test]
    fn prop_iterator_covers_text(text in prop::collection::vec(any::<u16>(), 0..40)) {
        let trie = build(&[]).build_32().unwrap();
        let steps: Vec<_> = trie.iter(&text, 0).collect();
        let mut expected_index = 0;
        for step in &steps {
            prop_assert_eq!(step.index, expected_index);
            expected_index += if step.code_point > 0xFFFF { 2 } else { 1 };
        }
        prop_assert_eq!(expected_index, text.len());
    }
}
