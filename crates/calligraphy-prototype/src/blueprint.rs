//! Blueprint catalog.
//!
//! A blueprint is the schema that gives meaning to the field ids found in a
//! field group: an ordered list of named member slots, each with a declared
//! kind. The catalog is populated once during content load and is read-only
//! afterwards.

use calligraphy_common::{AssetTypeId, BlueprintId, FieldId, FxHashMap};

use crate::{Error, Result};

/// Base kind of a blueprint member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json-export", derive(serde::Serialize, serde::Deserialize))]
pub enum BaseKind {
    Boolean,
    FloatingPoint,
    Integer,
    ReferenceToAsset,
    ReferenceToPrototype,
    NestedStruct,
}

/// Declared kind of a blueprint member: a single value or a list of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json-export", derive(serde::Serialize, serde::Deserialize))]
pub enum MemberKind {
    Scalar(BaseKind),
    ListOf(BaseKind),
}

impl MemberKind {
    /// The element kind, regardless of list-ness.
    #[inline]
    pub const fn base(&self) -> BaseKind {
        match self {
            MemberKind::Scalar(base) | MemberKind::ListOf(base) => *base,
        }
    }

    #[inline]
    pub const fn is_list(&self) -> bool {
        matches!(self, MemberKind::ListOf(_))
    }
}

/// One member slot of a blueprint.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json-export", derive(serde::Serialize, serde::Deserialize))]
pub struct BlueprintMember {
    /// Field id that identifies this member in serialized records.
    pub field_id: FieldId,
    /// Member name.
    pub name: String,
    /// Declared kind.
    pub kind: MemberKind,
    /// For reference kinds, the enumerable space the reference ranges over:
    /// an asset type for asset references, a blueprint for prototype references.
    /// Zero when not applicable.
    #[cfg_attr(feature = "json-export", serde(default))]
    pub subtype_ref: u64,
}

impl BlueprintMember {
    /// The asset type this member ranges over, if it is an asset reference.
    pub fn asset_type(&self) -> Option<AssetTypeId> {
        match self.kind.base() {
            BaseKind::ReferenceToAsset => AssetTypeId::new(self.subtype_ref).non_zero(),
            _ => None,
        }
    }

    /// The blueprint this member's prototypes derive from, if it is a prototype reference.
    pub fn prototype_family(&self) -> Option<BlueprintId> {
        match self.kind.base() {
            BaseKind::ReferenceToPrototype => BlueprintId::new(self.subtype_ref).non_zero(),
            _ => None,
        }
    }
}

/// A schema: named, ordered member slots.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json-export", derive(serde::Serialize, serde::Deserialize))]
pub struct Blueprint {
    pub id: BlueprintId,
    pub name: String,
    pub members: Vec<BlueprintMember>,
}

impl Blueprint {
    /// Create an empty blueprint.
    pub fn new(id: BlueprintId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Add a member.
    pub fn member(mut self, field_id: FieldId, name: impl Into<String>, kind: MemberKind) -> Self {
        self.members.push(BlueprintMember {
            field_id,
            name: name.into(),
            kind,
            subtype_ref: 0,
        });
        self
    }

    /// Add a reference member with its subtype.
    pub fn reference_member(
        mut self,
        field_id: FieldId,
        name: impl Into<String>,
        kind: MemberKind,
        subtype_ref: u64,
    ) -> Self {
        self.members.push(BlueprintMember {
            field_id,
            name: name.into(),
            kind,
            subtype_ref,
        });
        self
    }
}

/// Read access to a blueprint catalog.
///
/// Lookup is keyed by `(blueprint, field)` only. A field group's copy number is
/// never part of the key.
pub trait BlueprintLookup {
    /// Look up a member by field id. `None` means the field is not (or no
    /// longer) part of the blueprint.
    fn member(&self, blueprint: BlueprintId, field: FieldId) -> Option<&BlueprintMember>;

    /// Look up a member by name.
    fn member_by_name(&self, blueprint: BlueprintId, name: &str) -> Option<&BlueprintMember>;

    /// Name of a blueprint, if it exists.
    fn blueprint_name(&self, blueprint: BlueprintId) -> Option<&str>;
}

/// Blueprint catalog indexed for field lookup.
#[derive(Debug, Default)]
pub struct BlueprintCatalog {
    blueprints: Vec<Blueprint>,
    by_id: FxHashMap<BlueprintId, usize>,
    members: FxHashMap<(BlueprintId, FieldId), (usize, usize)>,
}

impl BlueprintCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a list of blueprints.
    pub fn from_blueprints(blueprints: impl IntoIterator<Item = Blueprint>) -> Result<Self> {
        let mut catalog = Self::new();
        for blueprint in blueprints {
            catalog.insert(blueprint)?;
        }
        Ok(catalog)
    }

    /// Parse a JSON array of blueprints.
    #[cfg(feature = "json-export")]
    pub fn from_json(json: &str) -> Result<Self> {
        let blueprints: Vec<Blueprint> = serde_json::from_str(json)?;
        Self::from_blueprints(blueprints)
    }

    /// Load a JSON catalog file.
    #[cfg(feature = "json-export")]
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| Error::from(e).in_file(path))?;
        let catalog = Self::from_json(&json).map_err(|e| e.in_file(path))?;
        tracing::debug!(
            "Loaded {} blueprints with {} members from {}",
            catalog.len(),
            catalog.member_count(),
            path.display()
        );
        Ok(catalog)
    }

    /// Register a blueprint.
    pub fn insert(&mut self, blueprint: Blueprint) -> Result<()> {
        if self.by_id.contains_key(&blueprint.id) {
            return Err(Error::DuplicateBlueprint(blueprint.id));
        }

        for (i, member) in blueprint.members.iter().enumerate() {
            if blueprint.members[..i].iter().any(|m| m.field_id == member.field_id) {
                return Err(Error::DuplicateMember {
                    blueprint: blueprint.id,
                    field: member.field_id,
                });
            }
        }

        let index = self.blueprints.len();
        for (member_index, member) in blueprint.members.iter().enumerate() {
            self.members
                .insert((blueprint.id, member.field_id), (index, member_index));
        }
        self.by_id.insert(blueprint.id, index);
        self.blueprints.push(blueprint);
        Ok(())
    }

    /// Get a blueprint by id.
    #[inline]
    pub fn get(&self, id: BlueprintId) -> Option<&Blueprint> {
        self.by_id.get(&id).map(|&i| &self.blueprints[i])
    }

    /// Number of blueprints.
    #[inline]
    pub fn len(&self) -> usize {
        self.blueprints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blueprints.is_empty()
    }

    /// Total number of members across all blueprints.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Iterate blueprints in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Blueprint> {
        self.blueprints.iter()
    }
}

impl BlueprintLookup for BlueprintCatalog {
    #[inline]
    fn member(&self, blueprint: BlueprintId, field: FieldId) -> Option<&BlueprintMember> {
        self.members
            .get(&(blueprint, field))
            .map(|&(b, m)| &self.blueprints[b].members[m])
    }

    fn member_by_name(&self, blueprint: BlueprintId, name: &str) -> Option<&BlueprintMember> {
        self.get(blueprint)?.members.iter().find(|m| m.name == name)
    }

    #[inline]
    fn blueprint_name(&self, blueprint: BlueprintId) -> Option<&str> {
        self.get(blueprint).map(|b| b.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weapon_blueprint() -> Blueprint {
        Blueprint::new(BlueprintId::new(0x100), "WeaponPrototype")
            .member(FieldId::new(1), "Damage", MemberKind::Scalar(BaseKind::FloatingPoint))
            .reference_member(
                FieldId::new(2),
                "Rarity",
                MemberKind::Scalar(BaseKind::ReferenceToAsset),
                0xA5,
            )
            .member(FieldId::new(3), "Tags", MemberKind::ListOf(BaseKind::Integer))
    }

    #[test]
    fn test_lookup_by_field_and_name() {
        let catalog = BlueprintCatalog::from_blueprints([weapon_blueprint()]).unwrap();

        let member = catalog.member(BlueprintId::new(0x100), FieldId::new(2)).unwrap();
        assert_eq!(member.name, "Rarity");
        assert_eq!(member.asset_type(), Some(AssetTypeId::new(0xA5)));
        assert_eq!(member.prototype_family(), None);

        let tags = catalog.member_by_name(BlueprintId::new(0x100), "Tags").unwrap();
        assert!(tags.kind.is_list());
        assert_eq!(tags.kind.base(), BaseKind::Integer);

        assert!(catalog.member(BlueprintId::new(0x100), FieldId::new(99)).is_none());
        assert!(catalog.member(BlueprintId::new(0x999), FieldId::new(1)).is_none());
        assert_eq!(catalog.blueprint_name(BlueprintId::new(0x100)), Some("WeaponPrototype"));
        assert_eq!(catalog.member_count(), 3);
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut catalog = BlueprintCatalog::new();
        catalog.insert(weapon_blueprint()).unwrap();
        assert!(matches!(
            catalog.insert(weapon_blueprint()),
            Err(Error::DuplicateBlueprint(_))
        ));

        let twice = Blueprint::new(BlueprintId::new(0x200), "Broken")
            .member(FieldId::new(1), "A", MemberKind::Scalar(BaseKind::Integer))
            .member(FieldId::new(1), "B", MemberKind::Scalar(BaseKind::Integer));
        assert!(matches!(
            catalog.insert(twice),
            Err(Error::DuplicateMember { .. })
        ));
        // A rejected blueprint leaves nothing behind.
        assert!(catalog.get(BlueprintId::new(0x200)).is_none());
        assert_eq!(catalog.len(), 1);
    }

    #[cfg(feature = "json-export")]
    #[test]
    fn test_from_json() {
        let json = r#"[
            {
                "id": "0000000000000100",
                "name": "PropertyParams",
                "members": [
                    { "field_id": "1", "name": "Param0", "kind": { "Scalar": "ReferenceToAsset" }, "subtype_ref": 165 },
                    { "field_id": "2", "name": "Param1", "kind": { "Scalar": "Integer" } }
                ]
            }
        ]"#;
        let catalog = BlueprintCatalog::from_json(json).unwrap();
        let param0 = catalog.member_by_name(BlueprintId::new(0x100), "Param0").unwrap();
        assert_eq!(param0.asset_type(), Some(AssetTypeId::new(165)));
        let param1 = catalog.member(BlueprintId::new(0x100), FieldId::new(2)).unwrap();
        assert_eq!(param1.subtype_ref, 0);
    }
}
