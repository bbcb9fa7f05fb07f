//! Error types for property parameter layouts and packing.

use calligraphy_common::{AssetTypeId, BlueprintId};
use calligraphy_prototype::MemberKind;
use thiserror::Error;

/// Errors that can occur when laying out or packing property parameters.
#[derive(Debug, Error)]
pub enum Error {
    /// Prototype library error.
    #[error("{0}")]
    Prototype(#[from] calligraphy_prototype::Error),

    /// A parameter value that does not fit its slot. Never truncated.
    #[error("parameter {slot} value {value} exceeds slot maximum {max}")]
    ParamOutOfRange { slot: usize, value: u64, max: u64 },

    /// A default parameter value that does not fit its slot.
    #[error("parameter {slot} default {value} exceeds slot maximum {max}")]
    DefaultOutOfRange { slot: usize, value: u64, max: u64 },

    /// Reference slots alone need more bits than the budget provides.
    #[error("reference parameters need {used} bits but only {budget} are available")]
    BudgetExceeded { used: u32, budget: u32 },

    /// A bit budget wider than the packed key.
    #[error("parameter bit budget {0} exceeds 64 bits")]
    InvalidBudget(u32),

    /// A `Param{slot}` member whose kind cannot be a parameter.
    #[error("blueprint {blueprint} declares Param{slot} as {kind:?}, which cannot be a property parameter")]
    UnsupportedParamKind {
        blueprint: BlueprintId,
        slot: usize,
        kind: MemberKind,
    },

    /// A parameter blueprint missing from the catalog.
    #[error("property parameter blueprint not found: {0}")]
    BlueprintNotFound(BlueprintId),

    /// An asset type with no registered enum range.
    #[error("no enum range registered for asset type {0}")]
    UnknownAssetType(AssetTypeId),

    /// Two definitions for the same property enum.
    #[error("duplicate property definition for enum {0}")]
    DuplicateProperty(u16),

    /// A property enum with no definition.
    #[error("unknown property enum {0}")]
    UnknownProperty(u16),

    /// A property enum that does not fit the key's enum bits.
    #[error("property enum {0} does not fit in the property key")]
    EnumOutOfRange(u16),

    /// Packed parameters that overflow the key's parameter bits.
    #[error("packed parameters {0:#x} do not fit in the property key")]
    ParamsOutOfRange(u64),
}

/// Result type for property operations.
pub type Result<T> = std::result::Result<T, Error>;
