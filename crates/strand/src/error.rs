//! Allocation error types.

use std::alloc::Layout;
use std::error::Error;
use std::fmt;

/// Errors that can occur while obtaining storage for a [`GrowVec`](crate::GrowVec).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The byte size of the request does not fit in a [`Layout`]
    /// (it exceeds `isize::MAX` or overflows `usize`).
    CapacityOverflow {
        /// Number of element slots requested.
        requested: usize,
    },
    /// The global allocator could not satisfy the request.
    OutOfMemory {
        /// The layout that was passed to the allocator.
        layout: Layout,
    },
}

impl AllocError {
    /// Escalates the error the way the infallible APIs do.
    ///
    /// Capacity overflow is a caller bug and panics; exhaustion is routed
    /// through [`std::alloc::handle_alloc_error`], which aborts by default.
    pub(crate) fn escalate(self) -> ! {
        match self {
            Self::CapacityOverflow { requested } => {
                panic!("capacity overflow: cannot lay out {requested} elements")
            }
            Self::OutOfMemory { layout } => std::alloc::handle_alloc_error(layout),
        }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow { requested } => {
                write!(f, "capacity overflow: requested {requested} elements")
            }
            Self::OutOfMemory { layout } => {
                write!(
                    f,
                    "out of memory: failed to allocate {} bytes (align {})",
                    layout.size(),
                    layout.align()
                )
            }
        }
    }
}

impl Error for AllocError {}
