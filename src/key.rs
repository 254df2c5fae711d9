//! Keys and the integer widths they are built from.

use core::fmt;
use core::hash::Hash;

/// Unsigned integer usable as a slot index.
///
/// The all-bits-set value is reserved as the free-list terminator, so a map
/// indexed by `I` holds at most `I::NONE.to_usize()` slots.
pub trait SlotIndex: Copy + Eq + Ord + Hash + fmt::Debug + 'static {
    /// Sentinel marking the end of the free list.
    const NONE: Self;

    fn to_usize(self) -> usize;

    /// Converts a slot position; callers guarantee `v < NONE.to_usize()`.
    fn from_usize(v: usize) -> Self;
}

/// Unsigned counter stored alongside each slot.
///
/// Counters wrap on overflow. A retired key can only revalidate after a slot
/// has been released `2^bits` times.
pub trait Generation: Copy + Eq + Hash + fmt::Debug + 'static {
    const ZERO: Self;

    fn next(self) -> Self;
}

macro_rules! impl_widths {
    ($($t:ty)*) => {
        $(
            impl SlotIndex for $t {
                const NONE: Self = <$t>::MAX;

                #[inline]
                fn to_usize(self) -> usize {
                    self as usize
                }

                #[inline]
                fn from_usize(v: usize) -> Self {
                    debug_assert!(v < <$t>::MAX as usize, "slot index out of range");
                    v as $t
                }
            }

            impl Generation for $t {
                const ZERO: Self = 0;

                #[inline]
                fn next(self) -> Self {
                    self.wrapping_add(1)
                }
            }
        )*
    }
}

impl_widths!(u8 u16 u32 u64 usize);

/// Handle to a value stored in a [`SlotMap`](crate::SlotMap).
///
/// A key is a plain `(index, generation)` pair. It owns nothing and stays
/// meaningful only against the map that issued it, or a clone of that map.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key<I = u32, G = u32> {
    pub(crate) index: I,
    pub(crate) generation: G,
}

impl<I: SlotIndex, G: Generation> Key<I, G> {
    pub(crate) fn new(index: I, generation: G) -> Self {
        Key { index, generation }
    }

    /// Index of the slot this key refers to.
    pub fn index(&self) -> I {
        self.index
    }

    pub fn generation(&self) -> G {
        self.generation
    }
}

impl<I: fmt::Debug, G: fmt::Debug> fmt::Debug for Key<I, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}v{:?}", self.index, self.generation)
    }
}
