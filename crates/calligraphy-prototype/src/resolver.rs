//! Field resolution against the blueprint catalog.
//!
//! Content files may carry fields that a newer or older schema no longer
//! declares. Such fields resolve to nothing and are skipped: the resolver logs
//! them at info level and counts them, but never fails.

use std::sync::atomic::{AtomicUsize, Ordering};

use calligraphy_common::{BlueprintId, FieldId};

use crate::{BlueprintLookup, BlueprintMember};

/// Resolves `(schema, field)` pairs to blueprint members.
#[derive(Debug)]
pub struct FieldResolver<'a, L: BlueprintLookup + ?Sized> {
    lookup: &'a L,
    skipped: AtomicUsize,
}

impl<'a, L: BlueprintLookup + ?Sized> FieldResolver<'a, L> {
    /// Create a resolver over a catalog.
    pub fn new(lookup: &'a L) -> Self {
        Self {
            lookup,
            skipped: AtomicUsize::new(0),
        }
    }

    /// The underlying catalog.
    #[inline]
    pub fn lookup(&self) -> &'a L {
        self.lookup
    }

    /// Resolve a field. `None` means schema drift and the field must be skipped.
    pub fn resolve(&self, schema_ref: BlueprintId, field_id: FieldId) -> Option<&'a BlueprintMember> {
        let member = self.lookup.member(schema_ref, field_id);
        if member.is_none() {
            self.skipped.fetch_add(1, Ordering::Relaxed);
            tracing::info!(
                schema = %schema_ref,
                field = %field_id,
                "skipping field not declared by blueprint"
            );
        }
        member
    }

    /// Number of fields skipped so far.
    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::Relaxed)
    }
}
