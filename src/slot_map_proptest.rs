#![cfg(test)]

// Property tests for SlotMap kept inside the crate so they can call
// `check_invariants` without feature gates.

use crate::key::Key;
use crate::policy::GrowthPolicy;
use crate::slot_map::SlotMap;
use proptest::prelude::*;
use slotmap::{DefaultKey, DenseSlotMap};
use std::collections::{BTreeMap, HashMap};

// Ops pick live entries by position in the tracked list so shrinking keeps
// referring to earlier insertions.
#[derive(Clone, Debug)]
enum Op {
    Insert(i32),
    Erase(usize),
    EraseStale(usize),
    Get(usize),
    Mutate(usize, i32),
    Reserve(usize),
    Clear,
    Retain(i32),
    Iterate,
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        6 => any::<i32>().prop_map(Op::Insert),
        3 => any::<usize>().prop_map(Op::Erase),
        1 => any::<usize>().prop_map(Op::EraseStale),
        2 => any::<usize>().prop_map(Op::Get),
        2 => (any::<usize>(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
        1 => (0usize..64).prop_map(Op::Reserve),
        1 => Just(Op::Clear),
        1 => (1i32..5).prop_map(Op::Retain),
        1 => Just(Op::Iterate),
    ];
    proptest::collection::vec(op, 1..120)
}

fn arb_policy() -> impl Strategy<Value = GrowthPolicy> {
    prop_oneof![Just(GrowthPolicy::Geometric), Just(GrowthPolicy::Exact)]
}

// Property: State-machine equivalence against a HashMap model and against
// `slotmap::DenseSlotMap` as a reference dense slot map.
// Invariants exercised across random operation sequences:
// - `len` parity with both references; `capacity >= len`.
// - Every live key resolves to its model value regardless of relocation.
// - Erased and cleared keys never resolve again and erase reports `false`.
// - `reserve(n)` never invalidates a key and yields `capacity >= n`.
// - Packed values are a permutation of the model's values.
// - Structural invariants (slot/owner back references, free list) hold.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(policy in arb_policy(), ops in arb_ops()) {
        let mut sut: SlotMap<i32> = SlotMap::with_policy(policy);
        let mut reference: DenseSlotMap<DefaultKey, i32> = DenseSlotMap::new();
        let mut model: HashMap<Key, i32> = HashMap::new();
        let mut live: Vec<(Key, DefaultKey)> = Vec::new();
        let mut stale: Vec<Key> = Vec::new();

        for op in ops {
            match op {
                Op::Insert(v) => {
                    let k = sut.insert(v);
                    let rk = reference.insert(v);
                    prop_assert!(model.insert(k, v).is_none(), "key {:?} issued twice", k);
                    live.push((k, rk));
                }
                Op::Erase(i) => {
                    if !live.is_empty() {
                        let (k, rk) = live.swap_remove(i % live.len());
                        prop_assert!(sut.erase(k));
                        prop_assert!(reference.remove(rk).is_some());
                        model.remove(&k);
                        stale.push(k);
                    }
                }
                Op::EraseStale(i) => {
                    if !stale.is_empty() {
                        let k = stale[i % stale.len()];
                        let before = sut.len();
                        prop_assert!(!sut.erase(k));
                        prop_assert_eq!(sut.len(), before);
                    }
                }
                Op::Get(i) => {
                    if !live.is_empty() {
                        let (k, rk) = live[i % live.len()];
                        prop_assert_eq!(sut.try_get(k), model.get(&k));
                        prop_assert_eq!(sut.try_get(k), reference.get(rk));
                        prop_assert_eq!(*sut.get(k), model[&k]);
                    }
                }
                Op::Mutate(i, d) => {
                    if !live.is_empty() {
                        let (k, rk) = live[i % live.len()];
                        let v = sut.try_get_mut(k).expect("live key resolves");
                        *v = v.wrapping_add(d);
                        let r = &mut reference[rk];
                        *r = r.wrapping_add(d);
                        let m = model.get_mut(&k).expect("tracked in model");
                        *m = m.wrapping_add(d);
                    }
                }
                Op::Reserve(n) => {
                    let cap = sut.capacity();
                    sut.reserve(n);
                    prop_assert_eq!(sut.capacity(), cap.max(n));
                }
                Op::Clear => {
                    sut.clear();
                    reference.clear();
                    model.clear();
                    stale.extend(live.drain(..).map(|(k, _)| k));
                }
                Op::Retain(m) => {
                    sut.retain(|_, v| *v % m == 0);
                    reference.retain(|_, v| *v % m == 0);
                    model.retain(|_, v| *v % m == 0);
                    let (kept, dropped): (Vec<_>, Vec<_>) =
                        live.drain(..).partition(|(k, _)| model.contains_key(k));
                    live = kept;
                    stale.extend(dropped.into_iter().map(|(k, _)| k));
                }
                Op::Iterate => {
                    let got: BTreeMap<Key, i32> = sut
                        .iter_with_keys()
                        .map(|(k, v)| (k, *v))
                        .collect();
                    prop_assert_eq!(got.len(), model.len());
                    for (k, v) in &model {
                        prop_assert_eq!(got.get(k), Some(v));
                    }
                    let mut packed: Vec<i32> = sut.iter().copied().collect();
                    let mut expected: Vec<i32> = reference.values().copied().collect();
                    packed.sort_unstable();
                    expected.sort_unstable();
                    prop_assert_eq!(packed, expected);
                }
            }

            // Post-conditions after each op
            sut.check_invariants();
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.len(), reference.len());
            prop_assert!(sut.capacity() >= sut.len());
            for &k in &stale {
                prop_assert!(sut.try_get(k).is_none());
            }
            for &(k, _) in &live {
                prop_assert_eq!(sut.try_get(k), model.get(&k));
            }
        }
    }
}

// Property: A clone answers every key exactly like its source, and a taken map
// answers every key exactly like the map it was taken from.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_clone_and_take_preserve_keys(values in proptest::collection::vec(any::<i32>(), 0..40), erase_mask in any::<u64>()) {
        let mut src: SlotMap<i32> = SlotMap::new();
        let keys: Vec<Key> = values.iter().map(|&v| src.insert(v)).collect();
        for (i, &k) in keys.iter().enumerate() {
            if erase_mask & (1 << (i % 64)) != 0 {
                src.erase(k);
            }
        }

        let copy = src.clone();
        copy.check_invariants();
        for &k in &keys {
            prop_assert_eq!(copy.try_get(k), src.try_get(k));
        }

        let expected: Vec<Option<i32>> = keys.iter().map(|&k| src.try_get(k).copied()).collect();
        let taken = core::mem::take(&mut src);
        prop_assert_eq!(src.capacity(), 0);
        prop_assert!(src.is_empty());
        for (k, e) in keys.iter().zip(expected) {
            prop_assert_eq!(taken.try_get(*k).copied(), e);
        }
    }
}
