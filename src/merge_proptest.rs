//! Property-based tests for the manifest merge.
//!
//! These tests use proptest to generate random manifest trees and verify
//! that the merge laws hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::merge::merge_deep;
    use proptest::prelude::*;
    use serde_json::{Map, Value};

    fn object_from(entries: std::collections::BTreeMap<String, Value>) -> Value {
        Value::Object(entries.into_iter().collect::<Map<String, Value>>())
    }

    fn leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i32>().prop_map(Value::from),
            "[a-z^~|. 0-9]{0,8}".prop_map(Value::String),
        ]
    }

    /// Trees with objects and arrays at any depth.
    fn tree() -> impl Strategy<Value = Value> {
        leaf().prop_recursive(3, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-d]", inner, 0..4).prop_map(object_from),
            ]
        })
    }

    /// Trees made only of objects and scalars.
    fn array_free_tree() -> impl Strategy<Value = Value> {
        leaf().prop_recursive(3, 32, 4, |inner| {
            prop::collection::btree_map("[a-d]", inner, 0..4).prop_map(object_from)
        })
    }

    fn manifest(keys: &'static str) -> impl Strategy<Value = Value> {
        prop::collection::btree_map(keys, tree(), 0..5).prop_map(object_from)
    }

    fn object_manifest() -> impl Strategy<Value = Value> {
        prop::collection::btree_map("[a-d]", tree(), 0..4).prop_map(object_from)
    }

    proptest! {
        /// Property: merging manifests with disjoint keys yields their union
        #[test]
        fn disjoint_keys_union(a in manifest("[a-e]"), b in manifest("[f-j]")) {
            let merged = merge_deep([&a, &b]);
            let merged_map = merged.as_object().unwrap();
            let a_map = a.as_object().unwrap();
            let b_map = b.as_object().unwrap();

            prop_assert_eq!(merged_map.len(), a_map.len() + b_map.len());
            for (key, value) in a_map.iter().chain(b_map.iter()) {
                prop_assert_eq!(&merged_map[key], value);
            }
        }

        /// Property: colliding objects merge recursively instead of overwriting
        #[test]
        fn object_collisions_merge_recursively(
            a in manifest("[a-e]"),
            b in manifest("[a-e]"),
            a_inner in object_manifest(),
            b_inner in object_manifest(),
        ) {
            let mut a = a;
            let mut b = b;
            a.as_object_mut().unwrap().insert("k".to_string(), a_inner.clone());
            b.as_object_mut().unwrap().insert("k".to_string(), b_inner.clone());

            let merged = merge_deep([&a, &b]);
            prop_assert_eq!(&merged["k"], &merge_deep([&a_inner, &b_inner]));
        }

        /// Property: a scalar on either side of a collision means the last value wins
        #[test]
        fn scalar_collisions_last_writer_wins(
            a in manifest("[a-e]"),
            b in manifest("[a-e]"),
            first in tree(),
            last in leaf(),
            scalar_last in any::<bool>(),
        ) {
            let (first, last) = if scalar_last { (first, last) } else { (last, first) };
            let mut a = a;
            let mut b = b;
            a.as_object_mut().unwrap().insert("k".to_string(), first);
            b.as_object_mut().unwrap().insert("k".to_string(), last.clone());

            let merged = merge_deep([&a, &b]);
            prop_assert_eq!(&merged["k"], &last);
        }

        /// Property: merging is associative for object manifests
        #[test]
        fn merge_is_associative(
            a in manifest("[a-e]"),
            b in manifest("[a-e]"),
            c in manifest("[a-e]"),
        ) {
            let all_at_once = merge_deep([&a, &b, &c]);
            let stepwise = merge_deep([&merge_deep([&a, &b]), &c]);
            prop_assert_eq!(all_at_once, stepwise);
        }

        /// Property: merge is deterministic (same input = same output)
        #[test]
        fn merge_is_deterministic(a in manifest("[a-e]"), b in manifest("[a-e]")) {
            prop_assert_eq!(merge_deep([&a, &b]), merge_deep([&a, &b]));
        }

        /// Property: self-merge is idempotent when no arrays are involved
        #[test]
        fn self_merge_without_arrays_is_idempotent(
            entries in prop::collection::btree_map("[a-e]", array_free_tree(), 0..5)
        ) {
            let a = object_from(entries);
            prop_assert_eq!(merge_deep([&a, &a]), a);
        }

        /// Property: self-merge concatenates arrays with themselves
        #[test]
        fn self_merge_duplicates_arrays(
            a in manifest("[a-e]"),
            items in prop::collection::vec(leaf(), 0..5),
        ) {
            let mut a = a;
            a.as_object_mut().unwrap().insert("list".to_string(), Value::Array(items.clone()));

            let merged = merge_deep([&a, &a]);
            let doubled: Vec<Value> = items.iter().chain(items.iter()).cloned().collect();
            prop_assert_eq!(&merged["list"], &Value::Array(doubled));
        }

        /// Property: inputs are left untouched
        #[test]
        fn merge_does_not_mutate_inputs(a in manifest("[a-e]"), b in manifest("[a-e]")) {
            let a_before = a.clone();
            let b_before = b.clone();
            let _ = merge_deep([&a, &b]);
            prop_assert_eq!(a, a_before);
            prop_assert_eq!(b, b_before);
        }
    }
}
