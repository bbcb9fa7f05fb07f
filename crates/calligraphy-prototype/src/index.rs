//! Prototype inheritance index.
//!
//! Loading is two-phase. Records are registered with a
//! [`PrototypeIndexBuilder`] in whatever order the content arrives;
//! [`PrototypeIndexBuilder::finish`] then checks every parent chain and yields
//! an immutable [`PrototypeIndex`]. Parent links are ids resolved through the
//! index, never pointers between records.
//!
//! The effective view of a record is composed from its furthest ancestor down
//! to the record itself:
//!
//! - field groups are matched by `(schema, copy number)`
//! - a simple field overrides the inherited value with the same field id
//! - a list field replaces the inherited list with the same field id
//! - groups an ancestor does not have are appended in the order they appear

use calligraphy_common::{BlueprintId, FieldId, FxHashMap, PrototypeId};

use crate::{
    BlueprintLookup, BlueprintMember, Error, FieldGroup, FieldResolver, FieldValue, ListField,
    PrototypeRecord, Result,
};

/// Collects records before their parent chains are validated.
#[derive(Debug, Default)]
pub struct PrototypeIndexBuilder {
    records: Vec<PrototypeRecord>,
    by_id: FxHashMap<PrototypeId, usize>,
}

impl PrototypeIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record under its id. Parents may be registered later.
    pub fn insert(&mut self, record: PrototypeRecord) -> Result<()> {
        if !record.id.is_valid() {
            return Err(Error::InvalidPrototypeId);
        }
        if self.by_id.contains_key(&record.id) {
            return Err(Error::DuplicatePrototype(record.id));
        }
        self.by_id.insert(record.id, self.records.len());
        self.records.push(record);
        Ok(())
    }

    /// Number of registered records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Validate every parent chain and freeze the index.
    ///
    /// Fails on the first record whose parent is missing or whose chain
    /// loops back on itself.
    pub fn finish(self) -> Result<PrototypeIndex> {
        const UNVISITED: u8 = 0;
        const ON_PATH: u8 = 1;
        const VALID: u8 = 2;

        let mut state = vec![UNVISITED; self.records.len()];
        let mut path: Vec<usize> = Vec::new();

        for start in 0..self.records.len() {
            let mut current = start;
            loop {
                match state[current] {
                    VALID => break,
                    ON_PATH => {
                        let pos = path.iter().position(|&i| i == current).unwrap_or(0);
                        let mut chain: Vec<PrototypeId> =
                            path[pos..].iter().map(|&i| self.records[i].id).collect();
                        chain.push(self.records[current].id);
                        return Err(Error::InheritanceCycle {
                            id: self.records[current].id,
                            chain,
                        });
                    }
                    _ => {}
                }

                state[current] = ON_PATH;
                path.push(current);

                let record = &self.records[current];
                match record.parent_id() {
                    None => break,
                    Some(parent) => {
                        current = *self.by_id.get(&parent).ok_or(Error::ParentNotFound {
                            id: record.id,
                            parent,
                        })?;
                    }
                }
            }

            for i in path.drain(..) {
                state[i] = VALID;
            }
        }

        let roots = self.records.iter().filter(|r| r.parent_id().is_none()).count();
        tracing::debug!(
            "Indexed {} prototypes ({} roots, {} derived)",
            self.records.len(),
            roots,
            self.records.len() - roots
        );

        Ok(PrototypeIndex {
            records: self.records,
            by_id: self.by_id,
        })
    }
}

/// Immutable id → record index with validated parent chains.
#[derive(Debug)]
pub struct PrototypeIndex {
    records: Vec<PrototypeRecord>,
    by_id: FxHashMap<PrototypeId, usize>,
}

impl PrototypeIndex {
    /// Build an index from records in one step.
    pub fn from_records(records: impl IntoIterator<Item = PrototypeRecord>) -> Result<Self> {
        let mut builder = PrototypeIndexBuilder::new();
        for record in records {
            builder.insert(record)?;
        }
        builder.finish()
    }

    #[inline]
    pub fn get(&self, id: PrototypeId) -> Option<&PrototypeRecord> {
        self.by_id.get(&id).map(|&i| &self.records[i])
    }

    #[inline]
    pub fn contains(&self, id: PrototypeId) -> bool {
        self.by_id.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &PrototypeRecord> {
        self.records.iter()
    }

    /// The ids from the furthest ancestor down to `id` itself.
    pub fn ancestry(&self, id: PrototypeId) -> Result<Vec<PrototypeId>> {
        let record = self.get(id).ok_or(Error::PrototypeNotFound(id))?;
        let mut chain = self.parent_chain(record)?;
        chain.push(id);
        Ok(chain)
    }

    /// Whether `id` is `ancestor` or inherits from it.
    pub fn derives_from(&self, id: PrototypeId, ancestor: PrototypeId) -> bool {
        let mut current = self.get(id);
        while let Some(record) = current {
            if record.id == ancestor {
                return true;
            }
            current = record.parent_id().and_then(|p| self.get(p));
        }
        false
    }

    /// Compose the effective fields of an indexed record.
    pub fn effective(&self, id: PrototypeId) -> Result<EffectiveRecord> {
        let record = self.get(id).ok_or(Error::PrototypeNotFound(id))?;
        self.compose(record)
    }

    /// Compose the effective fields of any record whose parent is indexed.
    ///
    /// Nested records are not indexed themselves but may still name a parent;
    /// they are composed the same way.
    pub fn compose(&self, record: &PrototypeRecord) -> Result<EffectiveRecord> {
        let mut chain = self.parent_chain(record)?;

        let mut groups: Vec<FieldGroup> = Vec::new();
        for ancestor in &chain {
            let ancestor = self.get(*ancestor).ok_or(Error::PrototypeNotFound(*ancestor))?;
            merge_groups(&mut groups, ancestor);
        }
        merge_groups(&mut groups, record);

        chain.push(record.id);
        Ok(EffectiveRecord {
            id: record.id,
            chain,
            is_polymorphic: record.is_polymorphic,
            groups,
        })
    }

    /// Ancestors of `record`, furthest first, excluding the record itself.
    fn parent_chain(&self, record: &PrototypeRecord) -> Result<Vec<PrototypeId>> {
        let mut chain = Vec::new();
        let mut child = record;
        // Chains inside the index were checked for cycles by `finish`.
        while let Some(parent) = child.parent_id() {
            child = self.get(parent).ok_or(Error::ParentNotFound {
                id: child.id,
                parent,
            })?;
            chain.push(parent);
        }
        chain.reverse();
        Ok(chain)
    }
}

fn merge_groups(groups: &mut Vec<FieldGroup>, record: &PrototypeRecord) {
    for group in &record.groups {
        let Some(target) = groups.iter_mut().find(|g| g.key() == group.key()) else {
            groups.push(group.clone());
            continue;
        };

        for field in &group.simple_fields {
            match target.simple_fields.iter_mut().find(|f| f.field_id == field.field_id) {
                Some(existing) => existing.value = field.value.clone(),
                None => target.simple_fields.push(field.clone()),
            }
        }

        for field in &group.list_fields {
            match target.list_fields.iter_mut().find(|f| f.field_id == field.field_id) {
                Some(existing) => *existing = field.clone(),
                None => target.list_fields.push(field.clone()),
            }
        }
    }
}

/// The merged field view of one record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json-export", derive(serde::Serialize))]
pub struct EffectiveRecord {
    pub id: PrototypeId,
    /// Furthest ancestor first, ending with the record itself.
    pub chain: Vec<PrototypeId>,
    pub is_polymorphic: bool,
    pub groups: Vec<FieldGroup>,
}

impl EffectiveRecord {
    /// Direct parent, if any.
    pub fn parent(&self) -> Option<PrototypeId> {
        self.chain.iter().rev().nth(1).copied()
    }

    pub fn group(&self, schema_ref: BlueprintId, copy_number: u8) -> Option<&FieldGroup> {
        self.groups
            .iter()
            .find(|g| g.schema_ref == schema_ref && g.copy_number == copy_number)
    }

    /// Effective value of a simple field.
    pub fn value(&self, schema_ref: BlueprintId, copy_number: u8, field_id: FieldId) -> Option<&FieldValue> {
        self.group(schema_ref, copy_number)?.simple_field(field_id)
    }

    /// Attach blueprint members to every field, skipping fields the catalog
    /// no longer declares.
    pub fn resolve<'a, L>(&'a self, resolver: &FieldResolver<'a, L>) -> Vec<ResolvedField<'a>>
    where
        L: BlueprintLookup + ?Sized,
    {
        let mut fields = Vec::new();
        for group in &self.groups {
            for field in &group.simple_fields {
                if let Some(member) = resolver.resolve(group.schema_ref, field.field_id) {
                    fields.push(ResolvedField {
                        schema_ref: group.schema_ref,
                        copy_number: group.copy_number,
                        member,
                        value: ResolvedValue::Single(&field.value),
                    });
                }
            }
            for field in &group.list_fields {
                if let Some(member) = resolver.resolve(group.schema_ref, field.field_id) {
                    fields.push(ResolvedField {
                        schema_ref: group.schema_ref,
                        copy_number: group.copy_number,
                        member,
                        value: ResolvedValue::List(field),
                    });
                }
            }
        }
        fields
    }
}

/// A field with its blueprint member attached.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedField<'a> {
    pub schema_ref: BlueprintId,
    pub copy_number: u8,
    pub member: &'a BlueprintMember,
    pub value: ResolvedValue<'a>,
}

/// Value of a resolved field.
#[derive(Debug, Clone, Copy)]
pub enum ResolvedValue<'a> {
    Single(&'a FieldValue),
    List(&'a ListField),
}
