//! Property info table.
//!
//! Layouts are computed once, when the table is built, and stored next to
//! their definitions. The built table is immutable and shared without locks.

use calligraphy_common::FxHashMap;
use calligraphy_prototype::BlueprintLookup;

use crate::{
    EnumRangeOracle, Error, ParamLayout, PropertyDefinition, PropertyKey, Result, MAX_PARAMS,
    PROPERTY_ENUM_BITS,
};

/// A definition with its computed parameter layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyInfo {
    pub definition: PropertyDefinition,
    pub layout: ParamLayout,
}

/// Collects definitions until enum ranges and blueprints are available.
#[derive(Debug, Default)]
pub struct PropertyInfoTableBuilder {
    definitions: Vec<PropertyDefinition>,
}

impl PropertyInfoTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, definition: PropertyDefinition) -> Result<()> {
        if u32::from(definition.property_enum) >> PROPERTY_ENUM_BITS != 0 {
            return Err(Error::EnumOutOfRange(definition.property_enum));
        }
        if self
            .definitions
            .iter()
            .any(|d| d.property_enum == definition.property_enum)
        {
            return Err(Error::DuplicateProperty(definition.property_enum));
        }
        self.definitions.push(definition);
        Ok(())
    }

    /// Compute every layout. Fails on the first definition that cannot be laid out.
    pub fn build<L, O>(self, lookup: &L, oracle: &O) -> Result<PropertyInfoTable>
    where
        L: BlueprintLookup + ?Sized,
        O: EnumRangeOracle + ?Sized,
    {
        let mut infos = Vec::with_capacity(self.definitions.len());
        let mut by_enum = FxHashMap::default();

        for definition in self.definitions {
            let layout = definition.layout(lookup, oracle)?;
            tracing::debug!(
                property = %definition.name,
                used_bits = layout.used_bits(),
                "computed parameter layout"
            );
            by_enum.insert(definition.property_enum, infos.len());
            infos.push(PropertyInfo { definition, layout });
        }

        tracing::info!("Computed parameter layouts for {} properties", infos.len());
        Ok(PropertyInfoTable { infos, by_enum })
    }
}

/// Immutable property enum → definition and layout table.
#[derive(Debug)]
pub struct PropertyInfoTable {
    infos: Vec<PropertyInfo>,
    by_enum: FxHashMap<u16, usize>,
}

impl PropertyInfoTable {
    pub fn info(&self, property_enum: u16) -> Result<&PropertyInfo> {
        self.by_enum
            .get(&property_enum)
            .map(|&i| &self.infos[i])
            .ok_or(Error::UnknownProperty(property_enum))
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyInfo> {
        self.infos.iter()
    }

    /// Build the key for a property and its parameters.
    pub fn pack(&self, property_enum: u16, params: &[u64; MAX_PARAMS]) -> Result<PropertyKey> {
        let info = self.info(property_enum)?;
        PropertyKey::new(property_enum, info.layout.pack(params)?)
    }

    /// Split a key into its property enum and parameters.
    pub fn unpack(&self, key: PropertyKey) -> Result<(u16, [u64; MAX_PARAMS])> {
        let info = self.info(key.property_enum())?;
        Ok((key.property_enum(), info.layout.unpack(key.params())))
    }

    /// Key of a property with its default parameters.
    pub fn default_key(&self, property_enum: u16) -> Result<PropertyKey> {
        let info = self.info(property_enum)?;
        self.pack(property_enum, &info.layout.defaults())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PropertyValue, StaticEnumRanges};
    use calligraphy_common::{AssetTypeId, BlueprintId, FieldId};
    use calligraphy_prototype::{BaseKind, Blueprint, BlueprintCatalog, MemberKind};

    const PARAMS: BlueprintId = BlueprintId::new(0x10);
    const RARITY: AssetTypeId = AssetTypeId::new(0xA1);

    fn table() -> PropertyInfoTable {
        let catalog = BlueprintCatalog::from_blueprints([Blueprint::new(PARAMS, "Params")
            .reference_member(FieldId::new(1), "Param0", MemberKind::Scalar(BaseKind::ReferenceToAsset), RARITY.get())
            .member(FieldId::new(2), "Param1", MemberKind::Scalar(BaseKind::Integer))])
        .unwrap();
        let ranges = StaticEnumRanges::new().with(RARITY, 17);

        let mut builder = PropertyInfoTableBuilder::new();
        builder
            .insert(PropertyDefinition::new("Health", 1, PropertyValue::Integer(100)))
            .unwrap();
        builder
            .insert(PropertyDefinition::new("Resist", 2, PropertyValue::Real(0.0)).with_params(PARAMS, [4, 9, 0, 0]))
            .unwrap();
        builder.build(&catalog, &ranges).unwrap()
    }

    #[test]
    fn test_pack_unpack_through_table() {
        let table = table();
        assert_eq!(table.len(), 2);

        let key = table.pack(2, &[17, 1000, 0, 0]).unwrap();
        assert_eq!(key.property_enum(), 2);
        assert_eq!(table.unpack(key).unwrap(), (2, [17, 1000, 0, 0]));

        let default = table.default_key(2).unwrap();
        assert_eq!(table.unpack(default).unwrap().1, [4, 9, 0, 0]);

        let plain = table.pack(1, &[0; 4]).unwrap();
        assert_eq!(plain.params(), 0);
    }

    #[test]
    fn test_table_errors() {
        let table = table();
        assert!(matches!(table.pack(3, &[0; 4]), Err(Error::UnknownProperty(3))));
        assert!(matches!(table.pack(2, &[18, 0, 0, 0]), Err(Error::ParamOutOfRange { .. })));
        assert!(matches!(table.pack(1, &[1, 0, 0, 0]), Err(Error::ParamOutOfRange { .. })));

        let mut builder = PropertyInfoTableBuilder::new();
        builder.insert(PropertyDefinition::new("A", 7, PropertyValue::Boolean(true))).unwrap();
        assert!(matches!(
            builder.insert(PropertyDefinition::new("B", 7, PropertyValue::Boolean(true))),
            Err(Error::DuplicateProperty(7))
        ));
        assert!(matches!(
            builder.insert(PropertyDefinition::new("C", 0x800, PropertyValue::Boolean(true))),
            Err(Error::EnumOutOfRange(0x800))
        ));
    }

    #[test]
    fn test_table_is_shareable() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<PropertyInfoTable>();
    }
}
