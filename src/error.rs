//! Error type shared by the tree constructors and the insertion path.

use std::collections::TryReserveError;

/// Failures surfaced by [`BTree`](crate::BTree) operations.
///
/// Absent keys, duplicate inserts and operations on an empty tree are not
/// errors; they report through the `bool`/`Option` return values instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BTreeError {
    /// The requested order was odd or smaller than 2.
    InvalidOrder {
        /// The rejected order.
        order: usize,
    },
    /// Page storage could not be reserved.
    AllocFailed,
}

impl core::fmt::Display for BTreeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidOrder { order } => {
                write!(f, "invalid tree order {order}: must be even and at least 2")
            }
            Self::AllocFailed => f.write_str("page allocation failed"),
        }
    }
}

impl std::error::Error for BTreeError {}

impl From<TryReserveError> for BTreeError {
    fn from(_: TryReserveError) -> Self {
        Self::AllocFailed
    }
}
