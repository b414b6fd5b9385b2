//! Algebraic laws of the compact combinator
//!
//! Run with: cargo test --package confmodel-property --test compact_laws

use confmodel_property::{compact, MapResolver, PropertyResolver, SharedResolver};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

fn resolver_from(map: &BTreeMap<String, String>) -> SharedResolver {
    Arc::new(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect::<MapResolver>())
}

fn keys() -> impl Strategy<Value = String> {
    "[a-e]"
}

fn scope() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(keys(), "[a-z]{1,4}", 0..4)
}

fn sample_keys() -> Vec<String> {
    ["a", "b", "c", "d", "e", "f"].iter().map(ToString::to_string).collect()
}

fn answers(resolver: &dyn PropertyResolver) -> Vec<Option<String>> {
    sample_keys().iter().map(|k| resolver.resolve(k)).collect()
}

proptest! {
    #[test]
    fn duplicate_collapse(m1 in scope(), m2 in scope()) {
        let r1 = resolver_from(&m1);
        let r2 = resolver_from(&m2);

        let with_dup = compact([Arc::clone(&r1), Arc::clone(&r1), Arc::clone(&r2)]);
        let without = compact([Arc::clone(&r1), Arc::clone(&r2)]);

        prop_assert_eq!(answers(&*with_dup), answers(&*without));
    }

    #[test]
    fn flattening(m1 in scope(), m2 in scope(), m3 in scope()) {
        let r1 = resolver_from(&m1);
        let r2 = resolver_from(&m2);
        let r3 = resolver_from(&m3);

        let nested = compact([compact([Arc::clone(&r1), Arc::clone(&r2)]), Arc::clone(&r3)]);
        let flat = compact([Arc::clone(&r1), Arc::clone(&r2), Arc::clone(&r3)]);

        prop_assert_eq!(answers(&*nested), answers(&*flat));
        prop_assert_eq!(nested.members().map(<[SharedResolver]>::len), Some(3));
    }

    #[test]
    fn first_match_is_authoritative(m1 in scope(), m2 in scope()) {
        let chain = compact([resolver_from(&m1), resolver_from(&m2)]);
        for key in sample_keys() {
            let expected = m1.get(&key).or_else(|| m2.get(&key)).cloned();
            prop_assert_eq!(chain.resolve(&key), expected);
        }
    }
}
