//! Enumerable-space ranges for reference parameters.

use calligraphy_common::{AssetTypeId, FxHashMap};

/// Supplies the largest registered ordinal of an asset type.
///
/// Asset catalogs must finish registering before any layout that references
/// them is computed.
pub trait EnumRangeOracle {
    /// Maximum ordinal of `asset_type`, or `None` if the type is unknown.
    fn max_enum_value(&self, asset_type: AssetTypeId) -> Option<u64>;
}

/// Map-backed [`EnumRangeOracle`].
#[derive(Debug, Clone, Default)]
pub struct StaticEnumRanges {
    ranges: FxHashMap<AssetTypeId, u64>,
}

impl StaticEnumRanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the maximum ordinal of an asset type, replacing any previous value.
    pub fn insert(&mut self, asset_type: AssetTypeId, max_value: u64) {
        self.ranges.insert(asset_type, max_value);
    }

    pub fn with(mut self, asset_type: AssetTypeId, max_value: u64) -> Self {
        self.insert(asset_type, max_value);
        self
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl FromIterator<(AssetTypeId, u64)> for StaticEnumRanges {
    fn from_iter<I: IntoIterator<Item = (AssetTypeId, u64)>>(iter: I) -> Self {
        Self {
            ranges: iter.into_iter().collect(),
        }
    }
}

impl EnumRangeOracle for StaticEnumRanges {
    #[inline]
    fn max_enum_value(&self, asset_type: AssetTypeId) -> Option<u64> {
        self.ranges.get(&asset_type).copied()
    }
}

impl<T: EnumRangeOracle + ?Sized> EnumRangeOracle for &T {
    #[inline]
    fn max_enum_value(&self, asset_type: AssetTypeId) -> Option<u64> {
        (**self).max_enum_value(asset_type)
    }
}
