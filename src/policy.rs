//! Growth policy applied when an insert finds the free list empty.

/// How far capacity grows when an insert runs out of free slots.
///
/// An explicit [`SlotMap::reserve`](crate::SlotMap::reserve) is never affected
/// by the policy; it always grows to exactly the requested capacity.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum GrowthPolicy {
    /// Double the capacity, starting from [`GrowthPolicy::MIN_GEOMETRIC`] slots.
    /// Insertion is amortized O(1).
    #[default]
    Geometric,
    /// Grow by a single slot. Memory stays tight, but each exhausting insert
    /// reallocates all three buffers.
    Exact,
}

impl GrowthPolicy {
    pub const MIN_GEOMETRIC: usize = 4;

    /// Capacity to grow to from `capacity` so one more value fits.
    pub(crate) fn next_capacity(self, capacity: usize, max: usize) -> usize {
        let wanted = match self {
            GrowthPolicy::Geometric => capacity.saturating_mul(2).max(Self::MIN_GEOMETRIC),
            GrowthPolicy::Exact => capacity.saturating_add(1),
        };
        // Geometric growth near the limit degrades to whatever still fits.
        if wanted > max && capacity < max {
            max
        } else {
            wanted
        }
    }
}
