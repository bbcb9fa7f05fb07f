//! Parallel JSON export using rayon.
//!
//! The index and catalog are immutable once loaded, so worker threads share
//! them by reference without locking. Only the progress callback is guarded.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use rayon::prelude::*;

use super::JsonExporter;
use crate::{BlueprintLookup, PrototypeIndex, Result};
use calligraphy_common::PrototypeId;

/// Exports effective records across the rayon thread pool.
pub struct ParallelJsonExporter<'a, L: BlueprintLookup + Sync + ?Sized> {
    index: &'a PrototypeIndex,
    catalog: &'a L,
}

impl<'a, L: BlueprintLookup + Sync + ?Sized> ParallelJsonExporter<'a, L> {
    pub fn new(index: &'a PrototypeIndex, catalog: &'a L) -> Self {
        Self { index, catalog }
    }

    /// Export every indexed prototype to `output_dir` in parallel.
    ///
    /// Failures are counted, not propagated; the progress callback receives
    /// (completed, total) counts.
    pub fn export_all<P: AsRef<Path>, F>(&self, output_dir: P, mut progress: F) -> Result<ExportStats>
    where
        F: FnMut(usize, usize) + Send,
    {
        let ids: Vec<PrototypeId> = self.index.iter().map(|r| r.id).collect();
        self.export_batch(&ids, output_dir, &mut progress)
    }

    /// Export the given prototypes to `output_dir` in parallel.
    pub fn export_batch<P: AsRef<Path>, F>(
        &self,
        ids: &[PrototypeId],
        output_dir: P,
        progress: &mut F,
    ) -> Result<ExportStats>
    where
        F: FnMut(usize, usize) + Send,
    {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        let total = ids.len();
        let exported = AtomicUsize::new(0);
        let errors = AtomicUsize::new(0);
        let progress = Mutex::new(progress);
        let exporter = JsonExporter::new(self.index, self.catalog);

        ids.par_iter().for_each(|&id| {
            match exporter.export_to_dir(id, output_dir) {
                Ok(_) => {
                    exported.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    tracing::warn!(prototype = %id, "export failed: {}", e);
                    errors.fetch_add(1, Ordering::Relaxed);
                }
            }

            let done = exported.load(Ordering::Relaxed) + errors.load(Ordering::Relaxed);
            if done % 100 == 0 || done == total {
                if let Some(mut p) = progress.try_lock() {
                    (*p)(done, total);
                }
            }
        });

        progress.lock()(total, total);

        Ok(ExportStats {
            exported: exported.load(Ordering::Relaxed),
            errors: errors.load(Ordering::Relaxed),
            total,
        })
    }

    /// Export prototypes in parallel, returning JSON strings in input order.
    pub fn export_to_strings(&self, ids: &[PrototypeId]) -> Vec<Result<String>> {
        let exporter = JsonExporter::new(self.index, self.catalog);
        ids.par_iter().map(|&id| exporter.export_record(id)).collect()
    }
}

/// Statistics from a parallel export operation.
#[derive(Debug, Clone, Copy)]
pub struct ExportStats {
    /// Number of records successfully exported.
    pub exported: usize,
    /// Number of records that failed to export.
    pub errors: usize,
    /// Total number of records attempted.
    pub total: usize,
}

impl ExportStats {
    /// Check if all records were exported successfully.
    pub fn is_complete(&self) -> bool {
        self.errors == 0 && self.exported == self.total
    }
}
