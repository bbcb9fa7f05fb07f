//! Error types for prototype parsing and loading.

use std::path::PathBuf;

use calligraphy_common::{BlueprintId, FieldId, PrototypeId};
use thiserror::Error;

use crate::FieldKind;

/// Errors that can occur when reading, writing or indexing prototype records.
///
/// Every variant except [`Error::Export`] is fatal for the record (or file)
/// being loaded: no partially populated record is ever returned alongside one.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error (truncated stream, bad magic, count overflow).
    #[error("{0}")]
    Common(#[from] calligraphy_common::Error),

    /// A field kind byte outside the closed tag set.
    #[error("unknown field kind tag {tag:#04x} at offset {offset}")]
    UnknownKindTag { tag: u8, offset: usize },

    /// Nested records exceed the configured depth limit.
    #[error("record too deeply nested: depth {depth} exceeds limit {limit}")]
    RecordTooDeep { depth: usize, limit: usize },

    /// Unsupported prototype file version.
    #[error("unsupported prototype file version: {0} (expected 1)")]
    UnsupportedVersion(u8),

    /// A list element whose kind differs from the list's declared kind.
    #[error("list field {field} declares {expected} elements but holds a {actual}")]
    ListKindMismatch {
        field: FieldId,
        expected: FieldKind,
        actual: FieldKind,
    },

    /// A record without the data flag that still carries field groups.
    #[error("record {0} has field groups but is marked as having no data")]
    GroupsWithoutData(PrototypeId),

    /// A record was registered under the invalid id.
    #[error("cannot register a prototype under the invalid id")]
    InvalidPrototypeId,

    /// Two records registered under the same id.
    #[error("duplicate prototype id: {0}")]
    DuplicatePrototype(PrototypeId),

    /// Lookup of an id that is not in the index.
    #[error("prototype not found: {0}")]
    PrototypeNotFound(PrototypeId),

    /// A parent reference that names no loaded record.
    #[error("prototype {id} references missing parent {parent}")]
    ParentNotFound { id: PrototypeId, parent: PrototypeId },

    /// A parent chain that revisits a record.
    #[error("inheritance cycle at prototype {id}: {}", format_chain(.chain))]
    InheritanceCycle {
        id: PrototypeId,
        chain: Vec<PrototypeId>,
    },

    /// Two blueprints registered under the same id.
    #[error("duplicate blueprint id: {0}")]
    DuplicateBlueprint(BlueprintId),

    /// Two members of one blueprint share a field id.
    #[error("blueprint {blueprint} declares field {field} more than once")]
    DuplicateMember {
        blueprint: BlueprintId,
        field: FieldId,
    },

    /// A prototype file whose name does not encode its id.
    #[error("prototype file name does not encode an id: {0}")]
    InvalidFileName(PathBuf),

    /// Error while loading a specific file.
    #[error("{path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// JSON (de)serialization error.
    #[cfg(feature = "json-export")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Export error.
    #[error("export error: {0}")]
    Export(String),
}

impl Error {
    /// Attach the path of the file being loaded.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        Error::File {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

fn format_chain(chain: &[PrototypeId]) -> String {
    chain
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Result type for prototype operations.
pub type Result<T> = std::result::Result<T, Error>;
