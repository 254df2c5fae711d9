//! SlotMap: packed values addressed through generational keys.

use crate::error::ReserveError;
use crate::key::{Generation, Key, SlotIndex};
use crate::policy::GrowthPolicy;
use crate::slot::Slot;
use core::fmt;
use core::iter::FusedIterator;
use core::ops::{Index, IndexMut};
use core::slice;
use tracing::{debug, trace};

/// Generational slot map with densely packed storage.
///
/// Values live contiguously in `values[..len]`. `slots[key.index]` maps a key
/// to its packed position, and `owners[pos]` maps a packed position back to
/// the slot that owns it so erasure can move the last value into the hole.
pub struct SlotMap<T, I = u32, G = u32> {
    values: Vec<T>,
    owners: Vec<I>, // reverse lookup: packed position -> slot index
    slots: Vec<Slot<I, G>>,
    free_head: I,
    policy: GrowthPolicy,
}

impl<T> SlotMap<T> {
    pub fn new() -> Self {
        Self::with_policy(GrowthPolicy::default())
    }

    /// Creates a map whose first `capacity` inserts do not allocate.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut m = Self::new();
        m.reserve(capacity);
        m
    }
}

impl<T, I: SlotIndex, G: Generation> Default for SlotMap<T, I, G> {
    fn default() -> Self {
        Self::with_policy(GrowthPolicy::default())
    }
}

impl<T, I: SlotIndex, G: Generation> SlotMap<T, I, G> {
    pub fn with_policy(policy: GrowthPolicy) -> Self {
        Self {
            values: Vec::new(),
            owners: Vec::new(),
            slots: Vec::new(),
            free_head: I::NONE,
            policy,
        }
    }

    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of slots, occupied or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Largest capacity the index type can address. This is a representational
    /// limit, not a promise that the allocation will succeed.
    pub fn max_capacity(&self) -> usize {
        I::NONE.to_usize().min(isize::MAX as usize)
    }

    /// Grows the map to hold at least `capacity` values in total.
    ///
    /// Does nothing when `capacity <= self.capacity()`. The new slots are
    /// pushed onto the front of the free list in ascending order. Existing
    /// keys stay valid.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds [`max_capacity`](Self::max_capacity).
    /// Aborts on allocation failure like `Vec`; see
    /// [`try_reserve`](Self::try_reserve) for the fallible form.
    pub fn reserve(&mut self, capacity: usize) {
        if capacity <= self.capacity() {
            return;
        }
        let max = self.max_capacity();
        assert!(
            capacity <= max,
            "capacity overflow: requested {} slots, index type allows {}",
            capacity,
            max
        );
        self.slots.reserve_exact(capacity - self.slots.len());
        self.values.reserve_exact(capacity - self.values.len());
        self.owners.reserve_exact(capacity - self.owners.len());
        self.link_new_slots(capacity);
    }

    /// Fallible form of [`reserve`](Self::reserve). On error no slot is added
    /// and every key keeps resolving as before.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), ReserveError> {
        if capacity <= self.capacity() {
            return Ok(());
        }
        let max = self.max_capacity();
        if capacity > max {
            let err = ReserveError::CapacityOverflow {
                requested: capacity,
                max,
            };
            debug!(error = %err, "slot map reservation rejected");
            return Err(err);
        }
        let res = self
            .slots
            .try_reserve_exact(capacity - self.slots.len())
            .and_then(|()| self.values.try_reserve_exact(capacity - self.values.len()))
            .and_then(|()| self.owners.try_reserve_exact(capacity - self.owners.len()));
        if let Err(source) = res {
            let err = ReserveError::AllocError {
                requested: capacity,
                source,
            };
            debug!(error = %err, "slot map reservation failed");
            return Err(err);
        }
        self.link_new_slots(capacity);
        Ok(())
    }

    // Buffers must already hold `capacity` elements.
    fn link_new_slots(&mut self, capacity: usize) {
        let old = self.slots.len();
        let old_head = self.free_head;
        self.slots.extend((old..capacity).map(|i| {
            let next = if i + 1 < capacity {
                I::from_usize(i + 1)
            } else {
                old_head
            };
            Slot::vacant(next)
        }));
        self.free_head = I::from_usize(old);
        trace!(from = old, to = capacity, "slot map grew");
    }

    #[cold]
    #[inline(never)]
    fn grow(&mut self) {
        let cap = self.capacity();
        let to = self.policy.next_capacity(cap, self.max_capacity());
        debug!(from = cap, to, policy = ?self.policy, "slot map out of free slots");
        self.reserve(to);
    }

    /// Inserts a value and returns the key that now refers to it.
    pub fn insert(&mut self, value: T) -> Key<I, G> {
        self.insert_with_key(|_| value)
    }

    /// Inserts the value built by `f`, which receives the key the value will
    /// be stored under. If `f` panics the map is left unchanged.
    pub fn insert_with_key<F>(&mut self, f: F) -> Key<I, G>
    where
        F: FnOnce(Key<I, G>) -> T,
    {
        if self.free_head == I::NONE {
            self.grow();
        }
        let index = self.free_head;
        let slot_index = index.to_usize();
        let key = Key::new(index, self.slots[slot_index].generation());
        let value = f(key);

        let data_index = self.values.len();
        self.free_head = self.slots[slot_index].occupy(I::from_usize(data_index));
        self.values.push(value);
        self.owners.push(index);
        key
    }

    #[inline]
    fn position(&self, key: Key<I, G>) -> Option<usize> {
        self.slots
            .get(key.index.to_usize())?
            .resolve(key.generation)
    }

    pub fn contains_key(&self, key: Key<I, G>) -> bool {
        self.position(key).is_some()
    }

    /// Removes and returns the value for `key`, or `None` if the key is stale
    /// or was never issued by this map.
    ///
    /// The last packed value moves into the vacated position; its key keeps
    /// resolving to it. The map is consistent again before the value is
    /// handed back, so its `Drop` may run arbitrary code.
    pub fn remove(&mut self, key: Key<I, G>) -> Option<T> {
        let data_index = self.position(key)?;
        let slot_index = key.index.to_usize();
        self.slots[slot_index].release(self.free_head);
        self.free_head = key.index;

        let value = self.values.swap_remove(data_index);
        self.owners.swap_remove(data_index);
        if let Some(&moved) = self.owners.get(data_index) {
            self.slots[moved.to_usize()].relocate(I::from_usize(data_index));
        }
        Some(value)
    }

    /// Drops the value for `key`. Returns `false` without touching the map
    /// when the key does not resolve.
    pub fn erase(&mut self, key: Key<I, G>) -> bool {
        self.remove(key).is_some()
    }

    pub fn try_get(&self, key: Key<I, G>) -> Option<&T> {
        let pos = self.position(key)?;
        self.values.get(pos)
    }

    pub fn try_get_mut(&mut self, key: Key<I, G>) -> Option<&mut T> {
        let pos = self.position(key)?;
        self.values.get_mut(pos)
    }

    /// Returns the value for a key known to be live.
    ///
    /// # Panics
    ///
    /// Panics if `key` is stale or foreign. Use [`try_get`](Self::try_get)
    /// when validity is not guaranteed by the caller.
    #[track_caller]
    pub fn get(&self, key: Key<I, G>) -> &T {
        match self.try_get(key) {
            Some(v) => v,
            None => panic!("SlotMap::get called with stale key {:?}", key),
        }
    }

    /// Mutable form of [`get`](Self::get), with the same panics.
    #[track_caller]
    pub fn get_mut(&mut self, key: Key<I, G>) -> &mut T {
        match self.try_get_mut(key) {
            Some(v) => v,
            None => panic!("SlotMap::get_mut called with stale key {:?}", key),
        }
    }

    // Frees every slot in ascending order and retires live keys.
    fn retire_all(&mut self) {
        let n = self.slots.len();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let next = if i + 1 < n {
                I::from_usize(i + 1)
            } else {
                I::NONE
            };
            slot.reset(next);
        }
        self.free_head = if n == 0 { I::NONE } else { I::from_usize(0) };
        self.owners.clear();
        trace!(retired = self.values.len(), capacity = n, "slot map cleared");
    }

    /// Drops every value and invalidates every key issued so far. Capacity
    /// is kept.
    pub fn clear(&mut self) {
        self.retire_all();
        self.values.clear();
    }

    /// Removes every value, yielding them in packed order. Keys are retired
    /// as by [`clear`](Self::clear) even if the iterator is not exhausted.
    pub fn drain(&mut self) -> std::vec::Drain<'_, T> {
        self.retire_all();
        self.values.drain(..)
    }

    /// Keeps only the values for which `f` returns `true`.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(Key<I, G>, &mut T) -> bool,
    {
        let mut pos = 0;
        while pos < self.values.len() {
            let key = key_at(&self.slots, self.owners[pos]);
            if f(key, &mut self.values[pos]) {
                pos += 1;
            } else {
                // The last value moves into `pos`; visit it next.
                drop(self.remove(key));
            }
        }
    }

    /// Packed values, in storage order.
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.values
    }

    pub fn front(&self) -> Option<&T> {
        self.values.first()
    }
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.values.first_mut()
    }
    pub fn back(&self) -> Option<&T> {
        self.values.last()
    }
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.values.last_mut()
    }

    /// Values in packed order. This is neither insertion order nor key order.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.values.iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.values.iter_mut()
    }

    pub fn keys(&self) -> Keys<'_, I, G> {
        Keys {
            owners: self.owners.iter(),
            slots: &self.slots,
        }
    }

    /// `(key, value)` pairs in packed order.
    pub fn iter_with_keys(&self) -> Iter<'_, T, I, G> {
        Iter {
            owners: self.owners.iter(),
            values: self.values.iter(),
            slots: &self.slots,
        }
    }

    pub fn iter_with_keys_mut(&mut self) -> IterMut<'_, T, I, G> {
        IterMut {
            owners: self.owners.iter(),
            values: self.values.iter_mut(),
            slots: &self.slots,
        }
    }

    /// Asserts every structural invariant. Linear in capacity.
    #[cfg(any(test, feature = "bench_internal"))]
    pub fn check_invariants(&self) {
        let cap = self.slots.len();
        assert_eq!(self.values.len(), self.owners.len());
        assert!(self.values.len() <= cap);

        for (pos, &owner) in self.owners.iter().enumerate() {
            match self.slots[owner.to_usize()] {
                Slot::Occupied { data_index, .. } => {
                    assert_eq!(data_index.to_usize(), pos, "slot {:?} misrouted", owner)
                }
                Slot::Free { .. } => panic!("packed position {} owned by free slot", pos),
            }
        }
        let occupied = self.slots.iter().filter(|s| s.is_occupied()).count();
        assert_eq!(occupied, self.values.len());

        let mut seen = vec![false; cap];
        let mut cur = self.free_head;
        let mut free = 0;
        while cur != I::NONE {
            let i = cur.to_usize();
            assert!(i < cap, "free list link {} out of bounds", i);
            assert!(!seen[i], "free list cycles through {}", i);
            seen[i] = true;
            free += 1;
            cur = match self.slots[i] {
                Slot::Free { next, .. } => next,
                Slot::Occupied { .. } => panic!("free list reaches occupied slot {}", i),
            };
        }
        assert_eq!(free, cap - self.values.len());
    }
}

#[inline]
fn key_at<I: SlotIndex, G: Generation>(slots: &[Slot<I, G>], index: I) -> Key<I, G> {
    Key::new(index, slots[index.to_usize()].generation())
}

impl<T: Clone, I: SlotIndex, G: Generation> Clone for SlotMap<T, I, G> {
    /// Structural copy: keys of `self` resolve to equal values in the clone.
    fn clone(&self) -> Self {
        let cap = self.slots.len();
        let mut values = Vec::with_capacity(cap);
        values.extend_from_slice(&self.values);
        let mut owners = Vec::with_capacity(cap);
        owners.extend_from_slice(&self.owners);
        Self {
            values,
            owners,
            slots: self.slots.clone(),
            free_head: self.free_head,
            policy: self.policy,
        }
    }
}

impl<T: fmt::Debug, I: SlotIndex, G: Generation> fmt::Debug for SlotMap<T, I, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter_with_keys()).finish()
    }
}

impl<T, I: SlotIndex, G: Generation> Index<Key<I, G>> for SlotMap<T, I, G> {
    type Output = T;

    #[track_caller]
    fn index(&self, key: Key<I, G>) -> &T {
        self.get(key)
    }
}

impl<T, I: SlotIndex, G: Generation> IndexMut<Key<I, G>> for SlotMap<T, I, G> {
    #[track_caller]
    fn index_mut(&mut self, key: Key<I, G>) -> &mut T {
        self.get_mut(key)
    }
}

impl<'a, T, I: SlotIndex, G: Generation> IntoIterator for &'a SlotMap<T, I, G> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, I: SlotIndex, G: Generation> IntoIterator for &'a mut SlotMap<T, I, G> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, I: SlotIndex, G: Generation> IntoIterator for SlotMap<T, I, G> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// Iterator over the keys of live values, in packed order.
pub struct Keys<'a, I, G> {
    owners: slice::Iter<'a, I>,
    slots: &'a [Slot<I, G>],
}

impl<'a, I: SlotIndex, G: Generation> Iterator for Keys<'a, I, G> {
    type Item = Key<I, G>;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.owners.next().map(|&i| key_at(self.slots, i))
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.owners.size_hint()
    }
}

impl<I: SlotIndex, G: Generation> ExactSizeIterator for Keys<'_, I, G> {}
impl<I: SlotIndex, G: Generation> FusedIterator for Keys<'_, I, G> {}

/// Iterator over `(key, &value)` pairs.
pub struct Iter<'a, T, I, G> {
    owners: slice::Iter<'a, I>,
    values: slice::Iter<'a, T>,
    slots: &'a [Slot<I, G>],
}

impl<'a, T, I: SlotIndex, G: Generation> Iterator for Iter<'a, T, I, G> {
    type Item = (Key<I, G>, &'a T);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let &i = self.owners.next()?;
        let v = self.values.next()?;
        Some((key_at(self.slots, i), v))
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<T, I: SlotIndex, G: Generation> ExactSizeIterator for Iter<'_, T, I, G> {}
impl<T, I: SlotIndex, G: Generation> FusedIterator for Iter<'_, T, I, G> {}

/// Iterator over `(key, &mut value)` pairs.
pub struct IterMut<'a, T, I, G> {
    owners: slice::Iter<'a, I>,
    values: slice::IterMut<'a, T>,
    slots: &'a [Slot<I, G>],
}

impl<'a, T, I: SlotIndex, G: Generation> Iterator for IterMut<'a, T, I, G> {
    type Item = (Key<I, G>, &'a mut T);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let &i = self.owners.next()?;
        let v = self.values.next()?;
        Some((key_at(self.slots, i), v))
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<T, I: SlotIndex, G: Generation> ExactSizeIterator for IterMut<'_, T, I, G> {}
impl<T, I: SlotIndex, G: Generation> FusedIterator for IterMut<'_, T, I, G> {}
