//! Property definitions.

use calligraphy_common::{AssetTypeId, BlueprintId, PrototypeId};
use calligraphy_prototype::{BaseKind, BlueprintLookup, MemberKind};

use crate::{EnumRangeOracle, Error, ParamKind, ParamLayout, Result, MAX_PARAMS};

/// Type of a property's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyValueKind {
    Boolean,
    Real,
    Integer,
    Asset,
    Prototype,
    Curve,
}

/// A property value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Boolean(bool),
    Real(f64),
    Integer(i64),
    Asset(u64),
    Prototype(PrototypeId),
    Curve(u64),
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyValueKind {
        match self {
            PropertyValue::Boolean(_) => PropertyValueKind::Boolean,
            PropertyValue::Real(_) => PropertyValueKind::Real,
            PropertyValue::Integer(_) => PropertyValueKind::Integer,
            PropertyValue::Asset(_) => PropertyValueKind::Asset,
            PropertyValue::Prototype(_) => PropertyValueKind::Prototype,
            PropertyValue::Curve(_) => PropertyValueKind::Curve,
        }
    }
}

/// Replication and aggregation settings, carried but not interpreted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropertyMetadata {
    pub replication_flags: u32,
    pub aggregation: u32,
}

/// A named, typed property whose value may be keyed by up to four parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDefinition {
    pub name: String,
    /// Enum value that identifies the property in packed keys.
    pub property_enum: u16,
    pub default_value: PropertyValue,
    /// Blueprint declaring the `Param0`..`Param3` members, if the property
    /// takes parameters.
    pub param_blueprint: Option<BlueprintId>,
    pub param_defaults: [u64; MAX_PARAMS],
    pub metadata: PropertyMetadata,
}

impl PropertyDefinition {
    /// Create a parameterless property.
    pub fn new(name: impl Into<String>, property_enum: u16, default_value: PropertyValue) -> Self {
        Self {
            name: name.into(),
            property_enum,
            default_value,
            param_blueprint: None,
            param_defaults: [0; MAX_PARAMS],
            metadata: PropertyMetadata::default(),
        }
    }

    /// Declare the blueprint that holds the parameter members.
    pub fn with_params(mut self, blueprint: BlueprintId, defaults: [u64; MAX_PARAMS]) -> Self {
        self.param_blueprint = Some(blueprint);
        self.param_defaults = defaults;
        self
    }

    pub fn with_metadata(mut self, metadata: PropertyMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    #[inline]
    pub fn value_kind(&self) -> PropertyValueKind {
        self.default_value.kind()
    }

    /// Slot kinds declared by the `Param{i}` members of the parameter blueprint.
    ///
    /// A missing member leaves its slot unused.
    pub fn param_kinds<L>(&self, lookup: &L) -> Result<[ParamKind; MAX_PARAMS]>
    where
        L: BlueprintLookup + ?Sized,
    {
        let mut kinds = [ParamKind::None; MAX_PARAMS];
        let Some(blueprint) = self.param_blueprint else {
            return Ok(kinds);
        };
        if lookup.blueprint_name(blueprint).is_none() {
            return Err(Error::BlueprintNotFound(blueprint));
        }

        for (slot, kind) in kinds.iter_mut().enumerate() {
            let Some(member) = lookup.member_by_name(blueprint, &format!("Param{}", slot)) else {
                continue;
            };
            *kind = match member.kind {
                MemberKind::Scalar(BaseKind::Integer) => ParamKind::Integer,
                MemberKind::Scalar(BaseKind::ReferenceToAsset) => {
                    ParamKind::Asset(AssetTypeId::new(member.subtype_ref))
                }
                MemberKind::Scalar(BaseKind::ReferenceToPrototype) => {
                    ParamKind::Prototype(BlueprintId::new(member.subtype_ref))
                }
                other => {
                    return Err(Error::UnsupportedParamKind {
                        blueprint,
                        slot,
                        kind: other,
                    })
                }
            };
        }

        Ok(kinds)
    }

    /// Compute this property's parameter layout.
    pub fn layout<L, O>(&self, lookup: &L, oracle: &O) -> Result<ParamLayout>
    where
        L: BlueprintLookup + ?Sized,
        O: EnumRangeOracle + ?Sized,
    {
        ParamLayout::compute(self.param_kinds(lookup)?, self.param_defaults, oracle)
    }
}
