use pagetree::BTree;
use proptest::prelude::*;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
enum Operation {
    Insert(u8),
    Delete(u8),
    Search(u8),
}

fn operations() -> impl Strategy<Value = Vec<Operation>> {
    proptest::collection::vec(
        prop_oneof![
            3 => any::<u8>().prop_map(Operation::Insert),
            2 => any::<u8>().prop_map(Operation::Delete),
            1 => any::<u8>().prop_map(Operation::Search),
        ],
        1..400,
    )
}

fn in_order(tree: &BTree<u8>) -> Vec<u8> {
    let mut out = Vec::new();
    let mut cur = tree.first().copied();
    while let Some(k) = cur {
        out.push(k);
        cur = tree.next_key(&k).copied();
    }
    out
}

proptest! {
    #[test]
    fn test_btree_matches_std_set(
        order in prop_oneof![Just(2usize), Just(4), Just(6), Just(10)],
        ops in operations(),
    ) {
        let mut model = BTreeSet::new();
        let mut tree = BTree::new(order).unwrap();

        for op in ops {
            match op {
                Operation::Insert(k) => {
                    let stored = tree.insert(k).unwrap();
                    prop_assert_eq!(stored, model.insert(k), "insert mismatch for key {}", k);
                }
                Operation::Delete(k) => {
                    prop_assert_eq!(tree.delete(&k), model.remove(&k), "delete mismatch for key {}", k);
                }
                Operation::Search(k) => {
                    prop_assert_eq!(tree.search(&k).is_some(), model.contains(&k));
                }
            }
            prop_assert_eq!(tree.validate(), Ok(model.len()));
        }

        prop_assert_eq!(tree.len(), model.len());
        prop_assert_eq!(tree.is_empty(), model.is_empty());
        prop_assert_eq!(in_order(&tree), model.iter().copied().collect::<Vec<_>>());
        for k in 0..=u8::MAX {
            prop_assert_eq!(tree.contains(&k), model.contains(&k));
        }
    }

    #[test]
    fn test_neighbours_are_inverse(
        order in prop_oneof![Just(2usize), Just(4), Just(8)],
        keys in proptest::collection::btree_set(any::<u8>(), 1..200),
    ) {
        let mut tree = BTree::new(order).unwrap();
        for &k in &keys {
            tree.insert(k).unwrap();
        }
        for &k in &keys {
            if let Some(&prev) = tree.prev_key(&k) {
                prop_assert_eq!(tree.next_key(&prev), Some(&k));
            }
            if let Some(&next) = tree.next_key(&k) {
                prop_assert_eq!(tree.prev_key(&next), Some(&k));
            }
        }
        prop_assert_eq!(tree.first(), keys.iter().next());
        prop_assert_eq!(tree.last(), keys.iter().next_back());
    }

    #[test]
    fn test_insert_delete_round_trip_keeps_key_set(
        keys in proptest::collection::vec(any::<u8>(), 0..150),
        extra in any::<u8>(),
    ) {
        let mut tree = BTree::new(4).unwrap();
        for &k in &keys {
            tree.insert(k).unwrap();
        }
        prop_assume!(!tree.contains(&extra));
        let before = in_order(&tree);
        prop_assert!(tree.insert(extra).unwrap());
        prop_assert!(tree.delete(&extra));
        prop_assert_eq!(in_order(&tree), before);
        prop_assert!(tree.validate().is_ok());
    }
}
