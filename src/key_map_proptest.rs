// Property tests for KeyMap and Cursor kept inside the crate so they can
// check bucket internals directly.

use crate::cursor::Direction;
use crate::key::Key;
use crate::key_map::KeyMap;
use proptest::prelude::*;
use std::any::Any;
use std::collections::{BTreeSet, HashMap};

// Key whose hash code is `id % 3`, so every bucket sees collisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct Crowded(u8);

impl Key for Crowded {
    fn hash_code(&self) -> i64 {
        i64::from(self.0 % 3)
    }
    fn equals(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<Crowded>() == Some(self)
    }
}

#[derive(Clone, Debug)]
enum Op {
    Put(Option<u8>, i32),
    Remove(Option<u8>),
    Get(Option<u8>),
    Contains(Option<u8>),
    Extract,
    Walk,
}

fn arb_key() -> impl Strategy<Value = Option<u8>> {
    prop_oneof![1 => Just(None::<u8>), 6 => (0u8..12).prop_map(Some)]
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        4 => (arb_key(), any::<i32>()).prop_map(|(k, v)| Op::Put(k, v)),
        3 => arb_key().prop_map(Op::Remove),
        1 => arb_key().prop_map(Op::Get),
        1 => arb_key().prop_map(Op::Contains),
        1 => Just(Op::Extract),
        1 => Just(Op::Walk),
    ];
    proptest::collection::vec(op, 1..80)
}

fn check_structure(sut: &KeyMap<Crowded, i32>) -> Result<(), TestCaseError> {
    let live: usize = sut
        .buckets
        .values()
        .map(|b| b.iter().flatten().count())
        .sum();
    prop_assert_eq!(live, sut.len(), "size must equal live slots");
    for (hash, bucket) in &sut.buckets {
        prop_assert!(!bucket.is_empty(), "no empty bucket may stay indexed");
        for pair in bucket.iter().flatten() {
            prop_assert_eq!(pair.hash_code(), *hash, "pair filed under its own hash");
        }
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// - put returns the previous value and only grows the map for new keys.
// - remove returns the stored value and shrinks the map only when present.
// - get/contains parity with the model, absent key included.
// - keys/values/pairs return exactly len() entries matching the model.
// - a cursor's forward pass covers the model; the backward pass mirrors it.
// - structural invariants hold after every operation.
proptest! {
    #![proptest_config(ProptestConfig { cases: 96, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(ops in arb_ops()) {
        let mut sut: KeyMap<Crowded, i32> = KeyMap::new();
        let mut model: HashMap<Option<Crowded>, i32> = HashMap::new();

        for op in ops {
            match op {
                Op::Put(k, v) => {
                    let key = k.map(Crowded);
                    let before = sut.len();
                    let prev = sut.put(key, v);
                    prop_assert_eq!(prev, model.insert(key, v));
                    let grew = if prev.is_some() { 0 } else { 1 };
                    prop_assert_eq!(sut.len(), before + grew);
                }
                Op::Remove(k) => {
                    let key = k.map(Crowded);
                    let before = sut.len();
                    let removed = sut.remove(key.as_ref());
                    prop_assert_eq!(removed, model.remove(&key));
                    let shrank = if removed.is_some() { 1 } else { 0 };
                    prop_assert_eq!(sut.len(), before - shrank);
                    prop_assert!(!sut.contains(key.as_ref()));
                }
                Op::Get(k) => {
                    let key = k.map(Crowded);
                    prop_assert_eq!(sut.get(key.as_ref()), model.get(&key));
                }
                Op::Contains(k) => {
                    let key = k.map(Crowded);
                    prop_assert_eq!(sut.contains(key.as_ref()), model.contains_key(&key));
                }
                Op::Extract => {
                    let keys: BTreeSet<Option<Crowded>> =
                        sut.keys().into_iter().map(|k| k.copied()).collect();
                    let expected: BTreeSet<Option<Crowded>> = model.keys().copied().collect();
                    prop_assert_eq!(sut.keys().len(), model.len());
                    prop_assert_eq!(keys, expected);
                    let values = sut.values();
                    let pairs = sut.pairs();
                    prop_assert_eq!(values.len(), model.len());
                    prop_assert_eq!(pairs.len(), model.len());
                    for (p, v) in pairs.iter().zip(values) {
                        prop_assert_eq!(p.value(), v);
                        prop_assert_eq!(model.get(&p.key().copied()), Some(v));
                    }
                }
                Op::Walk => {
                    let mut c = sut.cursor();
                    let mut fwd = Vec::new();
                    while c.step(Direction::Forward) {
                        fwd.push(c.key().flatten().copied());
                    }
                    let mut back = Vec::new();
                    while c.step(Direction::Backward) {
                        back.push(c.key().flatten().copied());
                    }
                    prop_assert_eq!(fwd.len(), model.len());
                    let seen: BTreeSet<Option<Crowded>> = fwd.iter().copied().collect();
                    prop_assert_eq!(seen.len(), model.len(), "each pair visited once");
                    back.reverse();
                    prop_assert_eq!(back, fwd);
                }
            }
            check_structure(&sut)?;
        }
    }
}

// Property: turning a cursor around after a successful step yields the same
// pair again, and the step after that continues in the new direction.
proptest! {
    #[test]
    fn prop_turn_repeats_current(
        ids in proptest::collection::btree_set(0u8..30, 2..20),
        turn_at in 1usize..20,
    ) {
        let sut: KeyMap<Crowded, u8> = ids.iter().map(|&i| (Some(Crowded(i)), i)).collect();
        let order: Vec<u8> = sut.iter().map(|p| *p.value()).collect();
        let turn_at = turn_at.min(order.len() - 1);

        let mut c = sut.cursor();
        for expected in &order[..=turn_at] {
            prop_assert!(c.forward());
            prop_assert_eq!(c.value(), Some(expected));
        }
        prop_assert!(c.backward());
        prop_assert_eq!(c.value(), Some(&order[turn_at]));
        prop_assert!(c.backward());
        prop_assert_eq!(c.value(), Some(&order[turn_at - 1]));
    }
}
