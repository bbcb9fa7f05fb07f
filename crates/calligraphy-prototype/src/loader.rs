//! Bulk loading of a content directory.

use std::path::Path;

use walkdir::WalkDir;

use crate::file::{id_from_path, FILE_EXTENSION};
use crate::{PrototypeFile, PrototypeIndex, PrototypeIndexBuilder, ReaderOptions, Result};

/// Load every `*.prototype` file under `dir` into a validated index.
///
/// Files whose stem is not a prototype id are skipped with a warning. Any
/// parse error aborts the load and names the offending file. Parent chains
/// are validated once all files are read.
pub fn load_directory<P: AsRef<Path>>(dir: P, options: &ReaderOptions) -> Result<PrototypeIndex> {
    let dir = dir.as_ref();
    let mut builder = PrototypeIndexBuilder::new();
    let mut skipped = 0usize;

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION)
        {
            continue;
        }

        if id_from_path(path).is_err() {
            tracing::warn!("Skipping {}: file name is not a prototype id", path.display());
            skipped += 1;
            continue;
        }

        let file = PrototypeFile::open(path, options)?;
        builder.insert(file.record).map_err(|e| e.in_file(path))?;
    }

    tracing::info!(
        "Read {} prototype files from {} ({} skipped)",
        builder.len(),
        dir.display(),
        skipped
    );

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, FieldGroup, FieldValue, PrototypeRecord};
    use calligraphy_common::{BlueprintId, FieldId, PrototypeId};

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("calligraphy-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_directory() {
        let dir = temp_dir("load");
        let nested = dir.join("items");
        std::fs::create_dir_all(&nested).unwrap();

        let base = PrototypeRecord::new(PrototypeId::new(0x10))
            .group(FieldGroup::new(BlueprintId::new(1), 0).simple(FieldId::new(1), FieldValue::Int64(3)));
        let child = PrototypeRecord::reference_only(PrototypeId::new(0x11), PrototypeId::new(0x10));
        PrototypeFile::save(&dir, &base).unwrap();
        PrototypeFile::save(&nested, &child).unwrap();
        std::fs::write(dir.join("notes.prototype"), b"junk").unwrap();
        std::fs::write(dir.join("readme.txt"), b"junk").unwrap();

        let index = load_directory(&dir, &ReaderOptions::default()).unwrap();
        assert_eq!(index.len(), 2);
        let view = index.effective(PrototypeId::new(0x11)).unwrap();
        assert_eq!(
            view.value(BlueprintId::new(1), 0, FieldId::new(1)),
            Some(&FieldValue::Int64(3))
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_reports_file() {
        let dir = temp_dir("corrupt");
        std::fs::write(dir.join("0000000000000001.prototype"), b"PDR\x01\x02\x01").unwrap();

        match load_directory(&dir, &ReaderOptions::default()) {
            Err(Error::File { path, .. }) => {
                assert!(path.ends_with("0000000000000001.prototype"));
            }
            other => panic!("expected file error, got {:?}", other),
        }

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
