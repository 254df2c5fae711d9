use dense_slotmap::{GrowthPolicy, Key, ReserveError, SlotMap};
use std::collections::HashSet;

#[test]
fn erase_first_then_insert() {
    let mut m = SlotMap::new();
    let k1 = m.insert(3);
    let k2 = m.insert(4);
    let k3 = m.insert(5);
    assert!(m.erase(k1));
    assert!(m.try_get(k1).is_none());

    let k4 = m.insert(6);
    assert_eq!(*m.get(k2), 4);
    assert_eq!(*m.get(k3), 5);
    assert_eq!(*m.get(k4), 6);
    assert_eq!(m.len(), 3);
}

#[test]
fn erase_middle_keeps_other_keys() {
    let mut m = SlotMap::new();
    let k1 = m.insert(3);
    let k2 = m.insert(4);
    let k3 = m.insert(5);
    assert!(m.erase(k2));
    assert_eq!(m.len(), 2);
    assert!(m.try_get(k2).is_none());
    assert_eq!(*m.get(k1), 3);
    assert_eq!(*m.get(k3), 5);
}

#[test]
fn reserve_then_insert_does_not_regrow() {
    let mut m = SlotMap::new();
    m.reserve(4);
    assert_eq!(m.len(), 0);
    assert!(m.is_empty());
    assert!(m.capacity() >= 4);

    let k1 = m.insert(10);
    let k2 = m.insert(20);
    let k3 = m.insert(30);
    assert_eq!(m[k1], 10);
    assert_eq!(m[k2], 20);
    assert_eq!(m[k3], 30);
    assert_eq!(m.len(), 3);
    assert_eq!(m.capacity(), 4);
}

#[test]
fn reserve_smaller_is_noop() {
    let mut m = SlotMap::with_capacity(8);
    let keys: Vec<_> = (0..5).map(|v| m.insert(v)).collect();
    m.reserve(3);
    assert_eq!(m.capacity(), 8);
    assert_eq!(m.len(), 5);
    for (k, v) in keys.iter().zip(0..) {
        assert_eq!(m[*k], v);
    }
}

#[test]
fn reserve_larger_keeps_keys() {
    let mut m = SlotMap::new();
    let keys: Vec<_> = (0..4).map(|v| m.insert(v * 2)).collect();
    m.erase(keys[1]);
    m.reserve(100);
    assert!(m.capacity() >= 100);
    assert!(m.try_get(keys[1]).is_none());
    assert_eq!(m[keys[0]], 0);
    assert_eq!(m[keys[2]], 4);
    assert_eq!(m[keys[3]], 6);
}

#[test]
fn len_tracks_inserts_minus_erasures() {
    let mut m: SlotMap<i32> = SlotMap::with_policy(GrowthPolicy::Exact);
    let mut keys = Vec::new();
    for i in 0..50 {
        keys.push(m.insert(i));
        assert!(m.capacity() >= m.len());
    }
    let mut erased = 0;
    for k in keys.iter().step_by(3) {
        assert!(m.erase(*k));
        erased += 1;
    }
    for k in keys.iter().step_by(3) {
        assert!(!m.erase(*k));
    }
    assert_eq!(m.len(), 50 - erased);
}

#[test]
fn clear_invalidates_everything() {
    let mut m = SlotMap::new();
    let keys: Vec<_> = (0..20).map(|v| m.insert(v.to_string())).collect();
    let cap = m.capacity();
    m.clear();
    assert_eq!(m.len(), 0);
    assert!(m.is_empty());
    assert_eq!(m.capacity(), cap);
    for k in &keys {
        assert!(m.try_get(*k).is_none());
        assert!(!m.erase(*k));
    }

    // Reuse after clear never hands back a retired key.
    let old: HashSet<Key> = keys.into_iter().collect();
    for v in 0..20 {
        let k = m.insert(v.to_string());
        assert!(!old.contains(&k));
    }
}

#[test]
fn narrow_widths_work_end_to_end() {
    let mut m: SlotMap<&str, u16, u8> = SlotMap::default();
    let a = m.insert("a");
    // Cycle one slot through every generation and back around.
    for _ in 0..255 {
        let k = m.insert("tmp");
        assert!(m.erase(k));
    }
    assert_eq!(m[a], "a");
    assert_eq!(m.max_capacity(), u16::MAX as usize);
}

#[test]
fn try_reserve_reports_overflow() {
    let mut m: SlotMap<u64, u8> = SlotMap::default();
    match m.try_reserve(1_000) {
        Err(ReserveError::CapacityOverflow { requested, max }) => {
            assert_eq!(requested, 1_000);
            assert_eq!(max, 255);
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(m.capacity(), 0);
    let err = m.try_reserve(256).unwrap_err();
    assert!(err.to_string().contains("capacity overflow"));
}

#[test]
fn owned_iteration_yields_every_value() {
    let mut m = SlotMap::new();
    for v in 0..10 {
        m.insert(v);
    }
    let mut all: Vec<i32> = m.into_iter().collect();
    all.sort_unstable();
    assert_eq!(all, (0..10).collect::<Vec<_>>());
}

#[test]
fn keys_iterate_in_packed_order() {
    let mut m = SlotMap::new();
    let keys: Vec<_> = (0..5).map(|v| m.insert(v)).collect();
    m.erase(keys[0]);
    let listed: Vec<Key> = m.keys().collect();
    let values: Vec<i32> = listed.iter().map(|k| m[*k]).collect();
    assert_eq!(values, m.as_slice());
}
