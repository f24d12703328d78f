//! A growable, contiguous vector built on manually managed storage.
//!
//! The crate is two layers, with control flowing strictly downwards:
//!
//! ```text
//! GrowVec<T>            (element lifecycle, growth, insert/erase)
//! └── RawMemory<T>      (allocation, deallocation, slot addressing)
//! ```
//!
//! [`RawMemory`] owns an uninitialised buffer for a fixed number of
//! slots and knows nothing about which of them are live. [`GrowVec`]
//! owns exactly one `RawMemory` plus a length, and is responsible for
//! constructing, relocating and dropping elements.
//!
//! # Failure model
//!
//! - **Allocation failure** is reported as [`AllocError`] by the `try_*`
//!   operations. The infallible forms panic on capacity overflow and call
//!   [`std::alloc::handle_alloc_error`] on exhaustion.
//! - **Element failure** (a panicking `Default`, `Clone`, `clone_from` or
//!   constructor closure) unwinds through the container. Growth paths give
//!   the strong guarantee, in-place paths the basic one; see [`vector`].
//! - **Contract violations** (indexing past `len`, popping an empty
//!   vector, out-of-range insert/erase positions) panic.
//!
//! # Logging
//!
//! Reallocations are reported at `trace` level and allocator refusals at
//! `debug` level through the [`log`] facade. No logger is installed.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod error;
pub mod raw;
pub mod vector;

// Public re-exports for the primary API surface.
pub use error::AllocError;
pub use raw::RawMemory;
pub use vector::{GrowVec, IntoIter};
