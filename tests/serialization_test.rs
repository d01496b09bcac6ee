//! Serialization round trips for frozen tries and character sets

#[cfg(feature = "serialization")]
mod serialization_tests {
    use libtranslit::prelude::*;

    fn sample_builder() -> TrieBuilder {
        let mut builder = TrieBuilder::new(0, 0xFFFF);
        builder.set_range(0x41, 0x5A, 1, true).unwrap();
        builder.set(0xD800, 2).unwrap();
        builder.set_for_lead_surrogate_code_unit(0xD800, 3).unwrap();
        builder.set_range(0x1F600, 0x1F64F, 4, true).unwrap();
        builder
    }

    const PROBES: &[u32] = &[0, 0x41, 0x5B, 0xD800, 0x1F600, 0x1F650, 0x10FFFF, 0x110000];

    // ============================================================================
    // JSON Round-Trip Tests
    // ============================================================================

    #[test]
    fn test_trie16_json_roundtrip() {
        let trie = sample_builder().build_16().unwrap();
        let json = serde_json::to_string(&trie).expect("Failed to serialize Trie16");
        let restored: Trie16 = serde_json::from_str(&json).expect("Failed to deserialize Trie16");

        assert_eq!(restored, trie);
        for &cp in PROBES {
            assert_eq!(restored.get(cp), trie.get(cp));
        }
        assert_eq!(restored.get_from_u16_single_lead(0xD800), 3);
    }

    #[test]
    fn test_trie32_json_roundtrip() {
        let trie = sample_builder().build_32().unwrap();
        let json = serde_json::to_string(&trie).expect("Failed to serialize Trie32");
        let restored: Trie32 = serde_json::from_str(&json).expect("Failed to deserialize Trie32");

        assert_eq!(restored, trie);
        for &cp in PROBES {
            assert_eq!(restored.get(cp), trie.get(cp));
        }
    }

    #[test]
    fn test_charset_json_roundtrip() {
        let mut set = CharSet::from_range('a', 'z');
        set.add('\u{1F600}');
        let json = serde_json::to_string(&set).expect("Failed to serialize CharSet");
        let restored: CharSet = serde_json::from_str(&json).expect("Failed to deserialize CharSet");
        assert_eq!(restored, set);
    }

    // ============================================================================
    // Validation on Deserialize
    // ============================================================================

    #[test]
    fn test_truncated_trie_rejected() {
        let trie = sample_builder().build_32().unwrap();
        let mut value = serde_json::to_value(&trie).unwrap();
        value["data"]
            .as_array_mut()
            .expect("data should be an array")
            .pop();

        assert!(serde_json::from_value::<Trie32>(value).is_err());
    }

    #[test]
    fn test_bad_high_start_rejected() {
        let trie = sample_builder().build_16().unwrap();
        let mut value = serde_json::to_value(&trie).unwrap();
        value["header"]["high_start"] = serde_json::json!(0x10001);

        assert!(serde_json::from_value::<Trie16>(value).is_err());
    }

    #[test]
    fn test_unsorted_charset_rejected() {
        let json = r#"{"ranges":[[100,120],[90,95]]}"#;
        assert!(serde_json::from_str::<CharSet>(json).is_err());

        let json = r#"{"ranges":[[50,40]]}"#;
        assert!(serde_json::from_str::<CharSet>(json).is_err());
    }
}
