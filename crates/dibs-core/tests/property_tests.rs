use dibs_core::chain::{BucketChain, Selector};
use dibs_core::{ConfigValue, Tokenizer, ValueEncoding, extract, group, tokenize_config_value};
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};

proptest! {
    #[test]
    fn test_tokenize_encode_decode_roundtrip(s in "\\PC*") {
        let tokenizer = Tokenizer::new(&HashMap::new()).unwrap();

        for encoding in [ValueEncoding::UrlSafeNoPad, ValueEncoding::StandardNoPad] {
            let value = ConfigValue::encode(&s, "global", &tokenizer, encoding);
            prop_assert!(!value.value.ends_with('='));
            prop_assert_eq!(value.decode_with(encoding).unwrap(), s.clone());
        }
    }

    #[test]
    fn test_text_without_placeholders_is_untouched(
        s in "[^$]*",
        name in "[a-z]{1,8}",
        replacement in "\\PC*",
    ) {
        let tokens = HashMap::from([(name, replacement)]);
        prop_assert_eq!(tokenize_config_value(&s, &tokens).unwrap(), s);
    }

    #[test]
    fn test_group_is_idempotent(
        paths in prop::collection::btree_set("(FILES/)?[a-c]{1,2}(#[a-c]{1,2})?", 0..12),
    ) {
        let resolved: BTreeMap<String, ConfigValue> = paths
            .into_iter()
            .map(|path| (path, ConfigValue { value: "dg".into(), bucket: "global".into() }))
            .collect();

        // Inputs with mixed kinds are rejected; both runs must agree either way
        let first = group(&resolved).map_err(|e| e.to_string());
        let second = group(&resolved).map_err(|e| e.to_string());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_most_specific_present_selector_wins(
        present in prop::collection::btree_set(0usize..6, 1..6),
    ) {
        let texts = ["A#svc", "A", "B#svc", "B", "global#svc", "global"];
        let chain = BucketChain::from_selectors(
            texts.iter().map(|t| Selector::generic(*t)).collect(),
        );
        let raw: HashMap<String, String> = present
            .iter()
            .map(|&rank| (format!("be/services/svc/{}/FILES/x", texts[rank]), texts[rank].to_string()))
            .collect();

        let resolved = extract(&chain, &raw, &HashMap::new()).unwrap();

        let best = *present.iter().next().unwrap();
        prop_assert_eq!(&resolved["FILES/x"].bucket, texts[best]);
    }
}
