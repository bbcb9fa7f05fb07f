//! Prototype export functionality.
//!
//! Effective records are rendered as JSON with blueprint member names in place
//! of field ids. Nested records are composed and rendered inline.
//!
//! With the `parallel` feature, exports run on rayon's thread pool.

mod json;

pub use json::JsonExporter;

#[cfg(feature = "parallel")]
mod parallel;

#[cfg(feature = "parallel")]
pub use parallel::{ExportStats, ParallelJsonExporter};
