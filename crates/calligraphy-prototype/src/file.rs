//! Prototype data files.
//!
//! A file is a 4-byte header (`PDR` + version) followed by exactly one
//! record. The record id is not stored in the file; it is the file stem,
//! written as 16 hex digits (`00000000DEADBEEF.prototype`).

use std::path::Path;

use calligraphy_common::{BinaryReader, BinaryWriter, PrototypeId};
use memmap2::Mmap;

use crate::structs::FileHeader;
use crate::{Error, PrototypeRecord, ReaderOptions, Result};

/// Extension of prototype data files.
pub const FILE_EXTENSION: &str = "prototype";

/// A parsed prototype data file.
#[derive(Debug, Clone, PartialEq)]
pub struct PrototypeFile {
    /// Format version from the header.
    pub version: u8,
    /// The record carried by the file.
    pub record: PrototypeRecord,
    /// Bytes left after the record. Nonzero values are tolerated but logged.
    pub trailing_bytes: usize,
}

impl PrototypeFile {
    /// Memory-map and parse a prototype file. The id comes from the file name.
    pub fn open<P: AsRef<Path>>(path: P, options: &ReaderOptions) -> Result<Self> {
        let path = path.as_ref();
        let id = id_from_path(path)?;

        let load = || -> Result<Self> {
            let file = std::fs::File::open(path)?;
            // SAFETY: the map is only read while `file` is open and is dropped
            // before returning; the parsed record owns all of its data.
            let mmap = unsafe { Mmap::map(&file)? };
            Self::parse(&mmap, id, options)
        };

        load().map_err(|e| e.in_file(path))
    }

    /// Parse a prototype file from bytes.
    pub fn parse(data: &[u8], id: PrototypeId, options: &ReaderOptions) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        reader.expect_magic(FileHeader::MAGIC)?;

        let version = reader.read_u8()?;
        if version != FileHeader::VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        let record = PrototypeRecord::read(&mut reader, id, options)?;

        let trailing_bytes = reader.remaining();
        if trailing_bytes > 0 {
            tracing::warn!(
                prototype = %id,
                trailing_bytes,
                "ignoring bytes after prototype record"
            );
        }

        Ok(Self {
            version,
            record,
            trailing_bytes,
        })
    }

    /// Encode a record as a complete file image.
    pub fn to_bytes(record: &PrototypeRecord) -> Result<Vec<u8>> {
        let mut writer = BinaryWriter::new();
        writer.write_struct(&FileHeader::current());
        record.write(&mut writer)?;
        Ok(writer.into_inner())
    }

    /// Write a record to `dir`, named after its id. Returns the written path.
    pub fn save<P: AsRef<Path>>(dir: P, record: &PrototypeRecord) -> Result<std::path::PathBuf> {
        let path = dir.as_ref().join(file_name(record.id));
        let bytes = Self::to_bytes(record)?;
        std::fs::write(&path, bytes).map_err(|e| Error::from(e).in_file(&path))?;
        Ok(path)
    }
}

/// File name for a prototype id.
pub fn file_name(id: PrototypeId) -> String {
    format!("{}.{}", id, FILE_EXTENSION)
}

/// Extract the prototype id encoded in a file name.
pub fn id_from_path(path: &Path) -> Result<PrototypeId> {
    let invalid = || Error::InvalidFileName(path.to_path_buf());

    let stem = path.file_stem().and_then(|s| s.to_str()).ok_or_else(invalid)?;
    let id: PrototypeId = stem.parse().map_err(|_| invalid())?;
    if !id.is_valid() {
        return Err(invalid());
    }
    Ok(id)
}
