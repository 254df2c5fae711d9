//! Errors reported by fallible growth.

use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReserveError {
    /// The requested capacity does not fit the map's index type.
    #[error("capacity overflow: requested {requested} slots, index type allows {max}")]
    CapacityOverflow { requested: usize, max: usize },
    /// The allocator refused to provide memory for one of the buffers.
    #[error("allocation failed while growing to {requested} slots")]
    AllocError {
        requested: usize,
        #[source]
        source: TryReserveError,
    },
}
