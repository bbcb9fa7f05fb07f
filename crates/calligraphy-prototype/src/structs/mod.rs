//! Fixed-layout wire structures.

mod field;
mod header;

pub use field::{FieldHeader, GroupHeader, ListHeader};
pub use header::{FileHeader, RecordFlags};
