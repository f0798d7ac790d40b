use std::collections::BTreeMap;
use std::ops::Bound;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tst_tree::{Error, Rank, TstMap};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Short keys over a small alphabet, so that random operations collide and share prefixes.
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-d]{0,5}"
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

fn entries_strategy(len: impl Into<prop::collection::SizeRange>) -> impl Strategy<Value = Vec<(String, i64)>> {
    prop::collection::vec((key_strategy(), value_strategy()), len)
}

fn build(entries: &[(String, i64)]) -> (TstMap<i64>, BTreeMap<String, i64>) {
    let tst: TstMap<i64> = entries.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    let bt: BTreeMap<String, i64> = entries.iter().cloned().collect();
    (tst, bt)
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(String, i64),
    Remove(String),
    Get(String),
    ContainsKey(String),
    GetKeyValue(String),
    FirstKeyValue,
    LastKeyValue,
    PopFirst,
    PopLast,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        5 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        3 => key_strategy().prop_map(MapOp::Remove),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::ContainsKey),
        1 => key_strategy().prop_map(MapOp::GetKeyValue),
        1 => Just(MapOp::FirstKeyValue),
        1 => Just(MapOp::LastKeyValue),
        1 => Just(MapOp::PopFirst),
        1 => Just(MapOp::PopLast),
    ]
}

// ─── Core CRUD operations ────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both TstMap and BTreeMap and asserts
    /// identical results at every step.
    #[test]
    fn map_ops_match_btreemap(ops in prop::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut tst: TstMap<i64> = TstMap::new();
        let mut bt: BTreeMap<String, i64> = BTreeMap::new();

        for op in &ops {
            match op {
                MapOp::Insert(k, v) => prop_assert_eq!(tst.insert(k, *v), bt.insert(k.clone(), *v), "insert({:?})", k),
                MapOp::Remove(k) => prop_assert_eq!(tst.remove(k), bt.remove(k), "remove({:?})", k),
                MapOp::Get(k) => prop_assert_eq!(tst.get(k), bt.get(k), "get({:?})", k),
                MapOp::ContainsKey(k) => prop_assert_eq!(tst.contains_key(k), bt.contains_key(k)),
                MapOp::GetKeyValue(k) => {
                    let expected = bt.get_key_value(k).map(|(k, v)| (k.clone(), v));
                    prop_assert_eq!(tst.get_key_value(k), expected);
                }
                MapOp::FirstKeyValue => {
                    let expected = bt.first_key_value().map(|(k, v)| (k.clone(), v));
                    prop_assert_eq!(tst.first_key_value(), expected);
                }
                MapOp::LastKeyValue => {
                    let expected = bt.last_key_value().map(|(k, v)| (k.clone(), v));
                    prop_assert_eq!(tst.last_key_value(), expected);
                }
                MapOp::PopFirst => prop_assert_eq!(tst.pop_first(), bt.pop_first()),
                MapOp::PopLast => prop_assert_eq!(tst.pop_last(), bt.pop_last()),
            }
            prop_assert_eq!(tst.len(), bt.len());
        }

        prop_assert!(tst.iter().map(|(k, v)| (k, *v)).eq(bt.into_iter()));
    }

    #[test]
    fn iter_matches_btreemap(entries in entries_strategy(0..TEST_SIZE)) {
        let (tst, bt) = build(&entries);
        let iter = tst.iter();
        prop_assert_eq!(iter.len(), bt.len());
        prop_assert!(iter.map(|(k, v)| (k, *v)).eq(bt.clone()));
        prop_assert!(tst.keys().eq(bt.keys().cloned()));
        prop_assert!(tst.values().eq(bt.values()));
        prop_assert!(tst.into_iter().eq(bt));
    }

    #[test]
    fn retain_matches_btreemap(entries in entries_strategy(0..TEST_SIZE)) {
        let (mut tst, mut bt) = build(&entries);
        tst.retain(|k, v| k.len() % 2 == 0 || *v > 0);
        bt.retain(|k, v| k.len() % 2 == 0 || *v > 0);
        prop_assert!(tst.iter().map(|(k, v)| (k, *v)).eq(bt));
    }

    #[test]
    fn entry_api_matches_btreemap(entries in entries_strategy(0..TEST_SIZE)) {
        let mut tst: TstMap<i64> = TstMap::new();
        let mut bt: BTreeMap<String, i64> = BTreeMap::new();
        for (k, v) in &entries {
            *tst.entry(k).and_modify(|x| *x = x.wrapping_add(*v)).or_insert(*v) += 1;
            *bt.entry(k.clone()).and_modify(|x| *x = x.wrapping_add(*v)).or_insert(*v) += 1;
        }
        prop_assert!(tst.iter().map(|(k, v)| (k, *v)).eq(bt));
    }

    #[test]
    fn clone_eq_and_hash_agree(entries in entries_strategy(0..TEST_SIZE)) {
        use std::hash::{BuildHasher, RandomState};

        let (tst, _) = build(&entries);
        let copy = tst.clone();
        prop_assert_eq!(&tst, &copy);
        let state = RandomState::new();
        prop_assert_eq!(state.hash_one(&tst), state.hash_one(&copy));
    }

    #[test]
    fn ord_matches_btreemap(a in entries_strategy(0..50), b in entries_strategy(0..50)) {
        let (tst_a, bt_a) = build(&a);
        let (tst_b, bt_b) = build(&b);
        prop_assert_eq!(tst_a.cmp(&tst_b), bt_a.cmp(&bt_b));
        prop_assert_eq!(tst_a == tst_b, bt_a == bt_b);
    }
}

// ─── Order statistics ────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn get_by_rank_matches_vec(entries in entries_strategy(0..TEST_SIZE)) {
        let (tst, bt) = build(&entries);
        let sorted: Vec<(String, i64)> = bt.into_iter().collect();
        for (rank, (k, v)) in sorted.iter().enumerate() {
            prop_assert_eq!(tst.get_by_rank(rank), Some((k.clone(), v)));
            prop_assert_eq!(tst[Rank(rank)], *v);
        }
        prop_assert_eq!(tst.get_by_rank(sorted.len()), None);
        prop_assert_eq!(tst.key_at(sorted.len()), Err(Error::IndexOutOfRange { index: sorted.len(), len: sorted.len() }));
    }

    /// `index_of(key_at(i)) == i` for every valid rank.
    #[test]
    fn key_at_index_of_inverse(entries in entries_strategy(0..TEST_SIZE)) {
        let (tst, _) = build(&entries);
        for rank in 0..tst.len() {
            let key = tst.key_at(rank).unwrap();
            prop_assert_eq!(tst.index_of(&key), Some(rank));
        }
    }

    #[test]
    fn order_stats_after_mutations(ops in prop::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut tst: TstMap<i64> = TstMap::new();
        let mut bt: BTreeMap<String, i64> = BTreeMap::new();
        for op in ops {
            match op {
                MapOp::Insert(k, v) => {
                    tst.insert(&k, v);
                    bt.insert(k, v);
                }
                MapOp::Remove(k) => {
                    tst.remove(&k);
                    bt.remove(&k);
                }
                _ => {}
            }
        }
        for (rank, key) in bt.keys().enumerate() {
            prop_assert_eq!(tst.index_of(key), Some(rank));
        }
    }

    #[test]
    fn predecessor_successor_match_btreemap(entries in entries_strategy(0..200), probe in key_strategy()) {
        let (tst, bt) = build(&entries);
        let below = bt.range::<str, _>((Bound::Unbounded, Bound::Excluded(probe.as_str()))).next_back().map(|(k, _)| k.clone());
        let above = bt
            .range::<str, _>((std::ops::Bound::Excluded(probe.as_str()), std::ops::Bound::Unbounded))
            .next()
            .map(|(k, _)| k.clone());
        prop_assert_eq!(tst.predecessor(&probe), below);
        prop_assert_eq!(tst.successor(&probe), above);
    }
}

// ─── Prefix queries and views ────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    /// Keys with and without a prefix partition the map.
    #[test]
    fn prefix_partition(entries in entries_strategy(0..500), prefix in "[a-d]{0,3}") {
        let (tst, bt) = build(&entries);
        let with: Vec<String> = tst.prefix_iter(&prefix).map(|(k, _)| k).collect();
        let without: Vec<String> = tst.prefix_iter_excluding(&prefix).map(|(k, _)| k).collect();

        let expected_with: Vec<String> = bt.keys().filter(|k| k.starts_with(&prefix)).cloned().collect();
        let expected_without: Vec<String> = bt.keys().filter(|k| !k.starts_with(&prefix)).cloned().collect();
        prop_assert_eq!(&with, &expected_with);
        prop_assert_eq!(without, expected_without);
        prop_assert_eq!(tst.prefix_match(&prefix).keys().collect::<Vec<_>>(), with);
    }

    #[test]
    fn sub_map_matches_btreemap_range(entries in entries_strategy(0..500), a in key_strategy(), b in key_strategy()) {
        let (tst, bt) = build(&entries);
        let (from, to) = if a <= b { (a, b) } else { (b, a) };
        let view = tst.sub_map(&from, &to).unwrap();
        let expected: Vec<(String, i64)> = bt.range(from.clone()..to.clone()).map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(view.len(), expected.len());
        prop_assert!(view.iter().map(|(k, v)| (k, *v)).eq(expected.iter().cloned()));
        for (rank, (k, _)) in expected.iter().enumerate() {
            prop_assert_eq!(view.index_of(k), Some(rank));
        }

        let head: Vec<String> = tst.head_map(&to).keys().collect();
        prop_assert_eq!(head, bt.range::<str, _>((Bound::Unbounded, Bound::Excluded(to.as_str()))).map(|(k, _)| k.clone()).collect::<Vec<_>>());
        let tail: Vec<String> = tst.tail_map(&from).keys().collect();
        prop_assert_eq!(tail, bt.range::<str, _>((Bound::Included(from.as_str()), Bound::Unbounded)).map(|(k, _)| k.clone()).collect::<Vec<_>>());
    }

    /// Writes through a bounded view never escape it.
    #[test]
    fn view_writes_stay_in_range(entries in entries_strategy(0..300), probes in prop::collection::vec(key_strategy(), 0..50)) {
        let (mut tst, _) = build(&entries);
        let before: Vec<(String, i64)> = tst.iter().map(|(k, v)| (k, *v)).filter(|(k, _)| k.as_str() < "b" || k.as_str() >= "c").collect();
        {
            let mut view = tst.sub_map_mut("b", "c").unwrap();
            for probe in &probes {
                let in_range = probe.as_str() >= "b" && probe.as_str() < "c";
                match view.insert(probe, 0) {
                    Ok(_) => prop_assert!(in_range),
                    Err(Error::KeyOutOfRange { key }) => {
                        prop_assert!(!in_range);
                        prop_assert_eq!(&key, probe);
                    }
                    Err(other) => prop_assert!(false, "unexpected error {:?}", other),
                }
            }
            view.clear();
            prop_assert!(view.is_empty());
        }
        let after: Vec<(String, i64)> = tst.iter().map(|(k, v)| (k, *v)).collect();
        prop_assert_eq!(after, before);
    }

    /// Removing every entry through a cursor empties the range and nothing else.
    #[test]
    fn prefix_cursor_empties_prefix(entries in entries_strategy(0..300), prefix in "[a-d]{1,2}") {
        let (mut tst, mut bt) = build(&entries);
        let mut cursor = tst.prefix_cursor(&prefix);
        while cursor.try_next().is_ok() {
            cursor.remove().unwrap();
        }
        prop_assert_eq!(cursor.try_next(), Err(Error::Exhausted));
        bt.retain(|k, _| !k.starts_with(&prefix));
        prop_assert!(tst.iter().map(|(k, v)| (k, *v)).eq(bt));
    }
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn country_scenario() {
    let mut map = TstMap::from([
        ("sverige", "smorgasbord"),
        ("deutschland", "sauerkraut"),
        ("england", "fishnchips"),
        ("suomi", "salmiakki"),
        ("france", "fromage"),
        ("espana", "paella"),
    ]);

    assert_eq!(map.len(), 6);
    assert_eq!(map.first_key().as_deref(), Some("deutschland"));
    assert_eq!(map.last_key().as_deref(), Some("sverige"));
    assert_eq!(map.key_at(1).as_deref(), Ok("england"));
    assert_eq!(
        map.keys().collect::<Vec<_>>(),
        ["deutschland", "england", "espana", "france", "suomi", "sverige"]
    );
    assert_eq!(map.index_of("france"), Some(3));
    assert_eq!(map.get("suomi"), Some(&"salmiakki"));
    assert_eq!(map.prefix_iter("s").map(|(k, _)| k).collect::<Vec<_>>(), ["suomi", "sverige"]);
    assert_eq!(map.prefix_iter("e").count(), 2);
    assert_eq!(map.prefix_iter("x").count(), 0);

    assert_eq!(map.remove("suomi"), Some("salmiakki"));
    assert_eq!(map.remove("suomi"), None);
    assert_eq!(map.key_at(4).as_deref(), Ok("sverige"));
    assert_eq!(map.last_key().as_deref(), Some("sverige"));
}

#[test]
fn long_keys_survive_clone_and_drop() {
    let key: String = std::iter::repeat_n('a', 300_000).collect();
    let mut map = TstMap::new();
    map.insert(&key, 1);

    let copy = map.clone();
    assert_eq!(copy.get(&key), Some(&1));
    assert_eq!(copy, map);

    map.clear();
    assert!(map.is_empty());
    assert_eq!(copy.len(), 1);
}

#[test]
fn empty_key_is_an_ordinary_key() {
    let mut map = TstMap::from([("a", 1), ("", 0)]);
    assert_eq!(map.first_key().as_deref(), Some(""));
    assert_eq!(map.get(""), Some(&0));
    assert_eq!(map.index_of(""), Some(0));
    assert_eq!(map.prefix_iter("").count(), 2);
    assert_eq!(map.remove(""), Some(0));
    assert_eq!(map.first_key().as_deref(), Some("a"));
}

#[test]
fn dynamically_typed_lookups() {
    let map = TstMap::from([("a", 1)]);
    assert_eq!(map.get_any(&"a"), Ok(Some(&1)));
    assert_eq!(map.contains_key_any(&String::from("b")), Ok(false));
    assert_eq!(map.contains_key_any(&1_i32), Err(Error::IncomparableKey));
}

#[test]
fn fuzzy_matching_scenario() {
    let map: TstMap<()> = ["bat", "ca", "car", "cart", "cat", "dog"].into_iter().map(|k| (k, ())).collect();
    assert_eq!(map.match_almost("cat", 0, 0).iter().collect::<Vec<_>>(), ["cat"]);
    assert_eq!(map.match_almost("cat", 1, 0).iter().collect::<Vec<_>>(), ["bat", "car", "cat"]);
    assert_eq!(map.match_almost("cat", 1, 1).iter().collect::<Vec<_>>(), ["bat", "ca", "car", "cat"]);
    assert!(map.match_almost("", 0, 0).is_empty());
}
