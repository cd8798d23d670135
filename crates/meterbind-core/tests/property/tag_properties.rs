use meterbind_core::{Tag, TagSet};
use proptest::prelude::*;

fn tag_set() -> impl Strategy<Value = TagSet> {
    prop::collection::vec(("[a-d]{1,2}", "[a-z0-9]{0,4}"), 0..6)
        .prop_map(|pairs| pairs.into_iter().map(|(k, v)| Tag::new(k, v)).collect())
}

proptest! {
    #[test]
    fn concat_preserves_order_and_length(preset in tag_set(), extracted in tag_set()) {
        let merged = TagSet::concat(&preset, &extracted);
        prop_assert_eq!(merged.len(), preset.len() + extracted.len());

        let mut expected = preset.keys();
        expected.extend(extracted.keys());
        prop_assert_eq!(merged.keys(), expected);
    }

    #[test]
    fn has_keys_matches_membership(
        tags in tag_set(),
        keys in prop::collection::vec("[a-d]{1,2}", 0..4),
    ) {
        let expected = keys.iter().all(|k| tags.keys().contains(&k.as_str()));
        prop_assert_eq!(tags.has_keys(&keys), expected);
    }

    #[test]
    fn own_keys_are_always_present(tags in tag_set()) {
        let keys: Vec<String> = tags.keys().into_iter().map(String::from).collect();
        prop_assert!(tags.has_keys(&keys));
    }
}
