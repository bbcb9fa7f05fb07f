//! Property parameter layouts and packed property keys.
//!
//! A property may be keyed by up to four parameters (an asset ordinal, an
//! integer, ...). The parameters are packed into the low bits of a 64-bit
//! [`PropertyKey`]; the property enum takes the rest. Each definition's slot
//! widths depend on its parameter blueprint and on how many ordinals the
//! referenced asset types have, so layouts are computed once after content
//! has loaded.
//!
//! ```
//! use calligraphy_common::AssetTypeId;
//! use calligraphy_property::{ParamKind, ParamLayout, StaticEnumRanges};
//!
//! let rarity = AssetTypeId::new(0xA1);
//! let ranges = StaticEnumRanges::new().with(rarity, 17);
//!
//! let layout = ParamLayout::compute_with_budget(
//!     [ParamKind::Asset(rarity), ParamKind::Integer, ParamKind::Integer, ParamKind::None],
//!     [0; 4],
//!     &ranges,
//!     32,
//! )?;
//! assert_eq!(layout.slots()[1].bit_width, 13);
//!
//! let key = layout.pack(&[5, 100, 7, 0])?;
//! assert_eq!(layout.unpack(key), [5, 100, 7, 0]);
//! # Ok::<(), calligraphy_property::Error>(())
//! ```

mod definition;
mod error;
mod key;
mod layout;
mod oracle;
mod table;

pub use definition::{PropertyDefinition, PropertyMetadata, PropertyValue, PropertyValueKind};
pub use error::{Error, Result};
pub use key::{PropertyKey, PROPERTY_ENUM_BITS};
pub use layout::{bit_length, pack, unpack, ParamKind, ParamLayout, PropertyParamSlot, MAX_PARAMS, TOTAL_PARAM_BITS};
pub use oracle::{EnumRangeOracle, StaticEnumRanges};
pub use table::{PropertyInfo, PropertyInfoTable, PropertyInfoTableBuilder};
