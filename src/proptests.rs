use super::AvlTree;

use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
enum Op {
    Insert(String, usize),
    Remove(String),
    Get(String),
    Bump(String),
}

fn key_strategy() -> impl Strategy<Value = String> + Clone {
    // A small alphabet keeps collisions (duplicate inserts, hits on remove) frequent.
    "[a-f]{0,3}"
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        45 => (key.clone(), any::<usize>()).prop_map(|(k, v)| Op::Insert(k, v)),
        30 => key.clone().prop_map(Op::Remove),
        15 => key.clone().prop_map(Op::Get),
        10 => key.clone().prop_map(Op::Bump),
    ];
    prop::collection::vec(op, 0..=500)
}

fn max_avl_height(len: usize) -> usize {
    (1.45 * ((len + 2) as f64).log2()) as usize
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in ops_strategy()) {
        let mut t = AvlTree::new();
        let mut m: BTreeMap<String, usize> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    let inserted_t = t.insert(key.as_str(), value);
                    let inserted_m = !m.contains_key(&key);
                    m.entry(key).or_insert(value);
                    prop_assert_eq!(inserted_t, inserted_m);
                }
                Op::Remove(key) => {
                    let removed_t = t.remove(&key);
                    let removed_m = m.remove(&key).is_some();
                    prop_assert_eq!(removed_t, removed_m);
                }
                Op::Get(key) => {
                    prop_assert_eq!(t.get(&key), m.get(&key).copied());
                    prop_assert_eq!(t.contains_key(&key), m.contains_key(&key));
                }
                Op::Bump(key) => {
                    let value = &mut t[key.as_str()];
                    *value = value.wrapping_add(1);
                    let value = m.entry(key).or_insert(0);
                    *value = value.wrapping_add(1);
                }
            }

            t.check_consistency();
            prop_assert_eq!(t.len(), m.len());
            prop_assert!(t.height() <= max_avl_height(t.len()));
        }

        let got: Vec<(String, usize)> = t.iter().map(|(k, v)| (k.to_string(), v)).collect();
        let expected: Vec<(String, usize)> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(got, expected);
        prop_assert_eq!(t.keys(), m.keys().cloned().collect::<Vec<_>>());
    }

    #[test]
    fn prop_find_range(
        entries in prop::collection::vec((key_strategy(), any::<usize>()), 0..=200),
        low in key_strategy(),
        high in key_strategy(),
    ) {
        let t: AvlTree = entries.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        let mut m: BTreeMap<String, usize> = BTreeMap::new();
        for (k, v) in entries {
            m.entry(k).or_insert(v);
        }

        let expected: Vec<usize> = m
            .iter()
            .filter(|(k, _)| low <= **k && **k <= high)
            .map(|(_, v)| *v)
            .collect();
        prop_assert_eq!(t.find_range(&low, &high), expected);
    }

    #[test]
    fn prop_clone_is_independent(
        entries in prop::collection::vec((key_strategy(), any::<usize>()), 1..=100),
        extra in key_strategy(),
    ) {
        let mut original: AvlTree = entries.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        let snapshot: Vec<(String, usize)> =
            original.iter().map(|(k, v)| (k.to_string(), v)).collect();
        let copy = original.clone();

        for (k, _) in &entries {
            original.remove(k);
        }
        original.insert(extra, 0);
        original.check_consistency();

        copy.check_consistency();
        let got: Vec<(String, usize)> = copy.iter().map(|(k, v)| (k.to_string(), v)).collect();
        prop_assert_eq!(got, snapshot);
    }
}

#[test]
fn exhaustive_remove_from_small_trees() {
    let keys = ["a", "b", "c", "d", "e", "f", "g", "h"];

    for len in 1..=keys.len() {
        let tree: AvlTree = keys[..len].iter().enumerate().map(|(v, k)| (*k, v)).collect();
        for removed in &keys[..len] {
            let mut t = tree.clone();
            assert!(t.remove(removed));
            t.check_consistency();
            assert_eq!(t.len(), len - 1);

            let expected: Vec<&str> = keys[..len]
                .iter()
                .copied()
                .filter(|k| k != removed)
                .collect();
            assert_eq!(t.keys(), expected);
            for (v, k) in keys[..len].iter().enumerate() {
                if k != removed {
                    assert_eq!(t.get(k), Some(v));
                }
            }
        }
    }
}
