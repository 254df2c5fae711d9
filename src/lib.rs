//! dense-slotmap: a single-threaded generational slot map whose values are
//! kept densely packed for iteration.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: O(1) insert, erase and lookup through stable keys, with every
//!   live value stored contiguously so iteration is a slice walk.
//! - Buffers:
//!   - values: `Vec<T>` holding the live values in `[0, len)`; no holes.
//!   - slots: one `Slot` per key index, either `Occupied { data_index }` or
//!     `Free { next }`. The free slots form an intrusive singly linked list
//!     whose head is `free_head`, terminated by the all-bits-set index.
//!   - owners: parallel to `values`; `owners[pos]` is the slot that points at
//!     `pos`. Erasure swap-removes the value and uses this table to repoint
//!     the relocated value's slot.
//!
//! Constraints
//! - Single-threaded: no atomics or locks. Mutation requires `&mut`.
//! - Keys are `(index, generation)` pairs. A key resolves iff its slot is
//!   occupied and carries the same generation; there is no search.
//! - Generations only move forward (wrapping) for the life of a slot.
//! - Growth never moves a key: only packed positions change, and those are
//!   reached through the slot table.
//!
//! Why this split?
//! - Tagged slots: a free slot can never satisfy a lookup, whatever the
//!   generation, so fabricated keys fail as cleanly as stale ones.
//! - Safe Rust throughout: the packed buffer is a `Vec` grown with
//!   `reserve_exact`, so no slot is ever bulk-initialized and every value is
//!   dropped exactly once.
//! - Clear failure boundaries: `remove` restores every invariant before
//!   handing the value back, so user `Drop` code never observes a torn map.
//!
//! Overflow semantics
//! - Generation counters wrap. A retired key could only revalidate after
//!   its slot has been released `2^bits(G)` times.
//! - The index type reserves its maximum value as the free-list sentinel, so
//!   a `SlotMap<T, u8>` holds at most 255 values.
//!
//! Notes and non-goals
//! - No ordering of values; iteration follows packed positions, which erase
//!   reshuffles.
//! - No serialization and no concurrent access.
//! - Keys are not branded to their map. A clone answers the source's keys,
//!   which is intended; using a key on an unrelated map is a logic error that
//!   returns arbitrary (but memory-safe) results.

mod error;
mod key;
mod policy;
mod slot;
pub mod slot_map;
mod slot_map_proptest;

// Public surface
pub use error::ReserveError;
pub use key::{Generation, Key, SlotIndex};
pub use policy::GrowthPolicy;
pub use slot_map::SlotMap;
