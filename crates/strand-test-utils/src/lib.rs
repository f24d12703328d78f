//! Test utilities for strand development.
//!
//! Provides the instrumented [`Obj`] element (see [`fixtures`]) and
//! [`catch_panic`], which turns an unwinding panic into an `Err` carrying
//! the panic message so tests can assert on container state afterwards.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

pub use fixtures::{Census, Obj};

/// Run `f`, returning `Err(message)` if it panics.
///
/// The closure is wrapped in [`AssertUnwindSafe`]: the whole point of the
/// failure-safety tests is to inspect state a panic unwound through.
pub fn catch_panic<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(panic_message)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}
