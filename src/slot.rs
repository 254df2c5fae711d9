//! Slot table entries.
//!
//! Each slot is either occupied, pointing at a packed value position, or free,
//! holding the next link of the intrusive free list. Both variants carry the
//! slot's generation: for an occupied slot it is the generation of the live
//! key, for a free slot it is the generation the next key will carry.

use crate::key::{Generation, SlotIndex};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Slot<I, G> {
    Occupied { data_index: I, generation: G },
    Free { next: I, generation: G },
}

impl<I: SlotIndex, G: Generation> Slot<I, G> {
    pub(crate) fn vacant(next: I) -> Self {
        Slot::Free {
            next,
            generation: G::ZERO,
        }
    }

    #[inline]
    pub(crate) fn generation(&self) -> G {
        match *self {
            Slot::Occupied { generation, .. } | Slot::Free { generation, .. } => generation,
        }
    }

    /// Packed position of the value when occupied by a key of generation `generation`.
    #[inline]
    pub(crate) fn resolve(&self, generation: G) -> Option<usize> {
        match *self {
            Slot::Occupied {
                data_index,
                generation: g,
            } if g == generation => Some(data_index.to_usize()),
            _ => None,
        }
    }

    /// Claims a free slot for `data_index`, returning the old free-list link.
    #[inline]
    pub(crate) fn occupy(&mut self, data_index: I) -> I {
        match *self {
            Slot::Free { next, generation } => {
                *self = Slot::Occupied {
                    data_index,
                    generation,
                };
                next
            }
            Slot::Occupied { .. } => unreachable!("free list points at an occupied slot"),
        }
    }

    /// Releases an occupied slot onto the free list, retiring its generation.
    #[inline]
    pub(crate) fn release(&mut self, next: I) {
        let generation = self.generation().next();
        *self = Slot::Free { next, generation };
    }

    /// Frees the slot as part of a bulk reset. Only an occupied slot has a live
    /// key to retire; a free slot already carries an unissued generation.
    #[inline]
    pub(crate) fn reset(&mut self, next: I) {
        let generation = match *self {
            Slot::Occupied { generation, .. } => generation.next(),
            Slot::Free { generation, .. } => generation,
        };
        *self = Slot::Free { next, generation };
    }

    /// Points an occupied slot at a new packed position.
    #[inline]
    pub(crate) fn relocate(&mut self, to: I) {
        match self {
            Slot::Occupied { data_index, .. } => *data_index = to,
            Slot::Free { .. } => unreachable!("back reference points at a free slot"),
        }
    }

    #[cfg(any(test, feature = "bench_internal"))]
    pub(crate) fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied { .. })
    }
}
