use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tst_tree::{Error, TstSet};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-d]{0,5}"
}

fn build(keys: &[String]) -> (TstSet, BTreeSet<String>) {
    (keys.iter().collect(), keys.iter().cloned().collect())
}

#[derive(Debug, Clone)]
enum SetOp {
    Insert(String),
    Remove(String),
    Contains(String),
    Take(String),
    PopFirst,
    PopLast,
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    prop_oneof![
        5 => key_strategy().prop_map(SetOp::Insert),
        3 => key_strategy().prop_map(SetOp::Remove),
        2 => key_strategy().prop_map(SetOp::Contains),
        1 => key_strategy().prop_map(SetOp::Take),
        1 => Just(SetOp::PopFirst),
        1 => Just(SetOp::PopLast),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn set_ops_match_btreeset(ops in prop::collection::vec(set_op_strategy(), TEST_SIZE)) {
        let mut tst = TstSet::new();
        let mut bt = BTreeSet::new();
        for op in &ops {
            match op {
                SetOp::Insert(k) => prop_assert_eq!(tst.insert(k), bt.insert(k.clone())),
                SetOp::Remove(k) => prop_assert_eq!(tst.remove(k), bt.remove(k)),
                SetOp::Contains(k) => prop_assert_eq!(tst.contains(k), bt.contains(k)),
                SetOp::Take(k) => prop_assert_eq!(tst.take(k), bt.take(k)),
                SetOp::PopFirst => prop_assert_eq!(tst.pop_first(), bt.pop_first()),
                SetOp::PopLast => prop_assert_eq!(tst.pop_last(), bt.pop_last()),
            }
            prop_assert_eq!(tst.len(), bt.len());
        }
        prop_assert!(tst.into_iter().eq(bt));
    }

    #[test]
    fn set_algebra_matches_btreeset(
        a in prop::collection::vec(key_strategy(), 0..200),
        b in prop::collection::vec(key_strategy(), 0..200),
    ) {
        let (tst_a, bt_a) = build(&a);
        let (tst_b, bt_b) = build(&b);

        prop_assert!((&tst_a | &tst_b).iter().eq(&bt_a | &bt_b));
        prop_assert!((&tst_a & &tst_b).iter().eq(&bt_a & &bt_b));
        prop_assert!((&tst_a - &tst_b).iter().eq(&bt_a - &bt_b));
        prop_assert!((&tst_a ^ &tst_b).iter().eq(&bt_a ^ &bt_b));
        prop_assert_eq!(tst_a.is_subset(&tst_b), bt_a.is_subset(&bt_b));
        prop_assert_eq!(tst_a.is_superset(&tst_b), bt_a.is_superset(&bt_b));
        prop_assert_eq!(tst_a.is_disjoint(&tst_b), bt_a.is_disjoint(&bt_b));
    }

    #[test]
    fn ranks_match_sorted_order(keys in prop::collection::vec(key_strategy(), 0..500)) {
        let (tst, bt) = build(&keys);
        for (rank, key) in bt.iter().enumerate() {
            let by_rank = tst.get_by_rank(rank);
            prop_assert_eq!(by_rank.as_ref(), Some(key));
            prop_assert_eq!(tst.index_of(key), Some(rank));
        }
        prop_assert_eq!(tst.key_at(bt.len()), Err(Error::IndexOutOfRange { index: bt.len(), len: bt.len() }));
    }

    #[test]
    fn retain_matches_btreeset(keys in prop::collection::vec(key_strategy(), 0..500)) {
        let (mut tst, mut bt) = build(&keys);
        tst.retain(|k| k.contains('a'));
        bt.retain(|k| k.contains('a'));
        prop_assert!(tst.iter().eq(bt));
    }
}

#[test]
fn prefix_queries() {
    let set = TstSet::from(["Abigor", "Aborted", "Amon Amarth", "Amorphis", "Opeth"]);
    assert_eq!(set.prefix_iter("Am").collect::<Vec<_>>(), ["Amon Amarth", "Amorphis"]);
    assert_eq!(set.prefix_iter_excluding("A").collect::<Vec<_>>(), ["Opeth"]);

    let view = set.prefix_match("Ab");
    assert_eq!(view.len(), 2);
    assert!(view.contains("Aborted"));
    assert!(!view.contains("Opeth"));
    assert_eq!(view.last().as_deref(), Some("Aborted"));
}

#[test]
fn cursor_removal_contract() {
    let mut set = TstSet::from(["a", "b"]);
    let mut cursor = set.cursor();
    assert_eq!(cursor.remove(), Err(Error::IteratorMisuse));
    assert_eq!(cursor.try_next().as_deref(), Ok("a"));
    assert_eq!(cursor.remove().as_deref(), Ok("a"));
    assert_eq!(cursor.remove(), Err(Error::IteratorMisuse));
    assert_eq!(cursor.peek().as_deref(), Some("b"));
    assert_eq!(cursor.try_next().as_deref(), Ok("b"));
    assert_eq!(cursor.try_next(), Err(Error::Exhausted));
    assert_eq!(set.len(), 1);
}

#[test]
fn debug_lists_members() {
    let set = TstSet::from(["b", "a"]);
    assert_eq!(format!("{set:?}"), r#"{"a", "b"}"#);
}
