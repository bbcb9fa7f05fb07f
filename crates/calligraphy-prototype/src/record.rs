//! The in-memory prototype record tree.
//!
//! A [`PrototypeRecord`] is schema-agnostic: field ids stay opaque until they
//! are resolved through a [`BlueprintLookup`](crate::BlueprintLookup). Records
//! are built once during loading and are read-only afterwards.

use calligraphy_common::{BlueprintId, FieldId, PrototypeId};

use crate::{FieldKind, FieldValue};

/// One parsed prototype record.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "json-export", derive(serde::Serialize))]
pub struct PrototypeRecord {
    /// Id supplied by the loader. Nested records carry [`PrototypeId::INVALID`].
    pub id: PrototypeId,
    /// Parent reference as written on the wire. `Some(INVALID)` is a reference
    /// that names no parent; use [`parent_id`](Self::parent_id) for inheritance.
    pub parent_ref: Option<PrototypeId>,
    /// Whether the record carries its own field data.
    pub has_own_data: bool,
    /// Whether the record is polymorphic.
    pub is_polymorphic: bool,
    /// Field groups, in stream order. Always empty when `has_own_data` is false.
    pub groups: Vec<FieldGroup>,
}

impl PrototypeRecord {
    /// Create an empty root record with data.
    pub fn new(id: PrototypeId) -> Self {
        Self {
            id,
            parent_ref: None,
            has_own_data: true,
            is_polymorphic: false,
            groups: Vec::new(),
        }
    }

    /// Create a record that only references a parent and has no data of its own.
    pub fn reference_only(id: PrototypeId, parent: PrototypeId) -> Self {
        Self {
            id,
            parent_ref: Some(parent),
            has_own_data: false,
            is_polymorphic: false,
            groups: Vec::new(),
        }
    }

    /// Set the parent reference.
    pub fn with_parent(mut self, parent: PrototypeId) -> Self {
        self.parent_ref = Some(parent);
        self
    }

    /// Mark the record polymorphic.
    pub fn polymorphic(mut self) -> Self {
        self.is_polymorphic = true;
        self
    }

    /// Add a field group.
    pub fn group(mut self, group: FieldGroup) -> Self {
        self.has_own_data = true;
        self.groups.push(group);
        self
    }

    /// The parent to inherit from, if any. A zero reference means root.
    #[inline]
    pub fn parent_id(&self) -> Option<PrototypeId> {
        self.parent_ref.and_then(PrototypeId::non_zero)
    }

    /// Find a field group by its schema and copy number.
    pub fn find_group(&self, schema_ref: BlueprintId, copy_number: u8) -> Option<&FieldGroup> {
        self.groups
            .iter()
            .find(|g| g.schema_ref == schema_ref && g.copy_number == copy_number)
    }

    /// Total number of simple and list fields across all groups.
    pub fn field_count(&self) -> usize {
        self.groups
            .iter()
            .map(|g| g.simple_fields.len() + g.list_fields.len())
            .sum()
    }
}

/// Identity of a field group within a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub schema_ref: BlueprintId,
    pub copy_number: u8,
}

/// The portion of a record contributed by one (schema, copy number) pair.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json-export", derive(serde::Serialize))]
pub struct FieldGroup {
    pub schema_ref: BlueprintId,
    pub copy_number: u8,
    pub simple_fields: Vec<SimpleField>,
    pub list_fields: Vec<ListField>,
}

impl FieldGroup {
    /// Create an empty group.
    pub fn new(schema_ref: BlueprintId, copy_number: u8) -> Self {
        Self {
            schema_ref,
            copy_number,
            simple_fields: Vec::new(),
            list_fields: Vec::new(),
        }
    }

    /// Add a simple field.
    pub fn simple(mut self, field_id: FieldId, value: FieldValue) -> Self {
        self.simple_fields.push(SimpleField { field_id, value });
        self
    }

    /// Add a list field.
    pub fn list(mut self, field_id: FieldId, kind: FieldKind, elements: Vec<FieldValue>) -> Self {
        self.list_fields.push(ListField {
            field_id,
            kind,
            elements,
        });
        self
    }

    #[inline]
    pub fn key(&self) -> GroupKey {
        GroupKey {
            schema_ref: self.schema_ref,
            copy_number: self.copy_number,
        }
    }

    pub fn simple_field(&self, field_id: FieldId) -> Option<&FieldValue> {
        self.simple_fields
            .iter()
            .find(|f| f.field_id == field_id)
            .map(|f| &f.value)
    }

    pub fn list_field(&self, field_id: FieldId) -> Option<&ListField> {
        self.list_fields.iter().find(|f| f.field_id == field_id)
    }
}

/// A single-valued field.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json-export", derive(serde::Serialize))]
pub struct SimpleField {
    pub field_id: FieldId,
    pub value: FieldValue,
}

/// A homogeneous list field.
///
/// The kind is kept separately from the elements so empty lists survive a
/// round trip with their tag.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json-export", derive(serde::Serialize))]
pub struct ListField {
    pub field_id: FieldId,
    pub kind: FieldKind,
    pub elements: Vec<FieldValue>,
}
