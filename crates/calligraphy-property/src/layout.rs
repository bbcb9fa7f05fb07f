//! Parameter slot layout and bit packing.
//!
//! A property carries up to four parameters packed into the low
//! [`TOTAL_PARAM_BITS`] bits of its key. Slot widths are fixed per property
//! definition when content loads:
//!
//! 1. Asset slots get `bit_length(max ordinal)` bits. Prototype slots get none.
//! 2. Integer slots split what remains of the budget evenly, rounding down.
//! 3. Each slot's offset is the sum of the preceding slots' widths.
//!
//! The resulting layout is shared with the peer that decodes the keys and
//! must be reproduced exactly.

use calligraphy_common::{AssetTypeId, BlueprintId};

use crate::{EnumRangeOracle, Error, Result};

/// Bits of a property key reserved for packed parameters.
pub const TOTAL_PARAM_BITS: u32 = 53;

/// Number of parameter slots per property.
pub const MAX_PARAMS: usize = 4;

/// Declared kind of a parameter slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParamKind {
    /// Unused slot.
    #[default]
    None,
    /// Plain integer parameter.
    Integer,
    /// Ordinal of an asset of the given type.
    Asset(AssetTypeId),
    /// Prototype derived from the given blueprint.
    Prototype(BlueprintId),
}

impl ParamKind {
    /// Whether the slot references an enumerable space.
    #[inline]
    pub const fn is_reference(&self) -> bool {
        matches!(self, ParamKind::Asset(_) | ParamKind::Prototype(_))
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            ParamKind::None => "None",
            ParamKind::Integer => "Integer",
            ParamKind::Asset(_) => "Asset",
            ParamKind::Prototype(_) => "Prototype",
        }
    }
}

/// One laid-out parameter slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropertyParamSlot {
    pub kind: ParamKind,
    pub default_value: u64,
    /// Largest value the slot accepts.
    pub value_max: u64,
    pub bit_width: u32,
    pub bit_offset: u32,
}

impl PropertyParamSlot {
    /// Mask covering `bit_width` low bits.
    #[inline]
    pub fn mask(&self) -> u64 {
        width_mask(self.bit_width)
    }
}

/// The four parameter slots of one property definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamLayout {
    slots: [PropertyParamSlot; MAX_PARAMS],
    budget: u32,
}

impl ParamLayout {
    /// Lay out slots against [`TOTAL_PARAM_BITS`].
    pub fn compute<O>(kinds: [ParamKind; MAX_PARAMS], defaults: [u64; MAX_PARAMS], oracle: &O) -> Result<Self>
    where
        O: EnumRangeOracle + ?Sized,
    {
        Self::compute_with_budget(kinds, defaults, oracle, TOTAL_PARAM_BITS)
    }

    /// Lay out slots against an explicit bit budget (at most 64).
    pub fn compute_with_budget<O>(
        kinds: [ParamKind; MAX_PARAMS],
        defaults: [u64; MAX_PARAMS],
        oracle: &O,
        budget: u32,
    ) -> Result<Self>
    where
        O: EnumRangeOracle + ?Sized,
    {
        if budget > u64::BITS {
            return Err(Error::InvalidBudget(budget));
        }

        let mut slots = [PropertyParamSlot::default(); MAX_PARAMS];
        let mut used_bits = 0u32;
        let mut int_count = 0u32;

        for (slot, kind) in slots.iter_mut().zip(kinds) {
            slot.kind = kind;
            match kind {
                ParamKind::None => {}
                ParamKind::Integer => int_count += 1,
                ParamKind::Asset(asset_type) => {
                    let max = oracle
                        .max_enum_value(asset_type)
                        .ok_or(Error::UnknownAssetType(asset_type))?;
                    slot.value_max = max;
                    slot.bit_width = bit_length(max);
                    used_bits += slot.bit_width;
                }
                // Prototype ids are not enumerated; these slots stay empty.
                ParamKind::Prototype(_) => {}
            }
        }

        if used_bits > budget {
            return Err(Error::BudgetExceeded {
                used: used_bits,
                budget,
            });
        }

        if int_count > 0 {
            let per_int_width = (budget - used_bits) / int_count;
            for slot in slots.iter_mut().filter(|s| s.kind == ParamKind::Integer) {
                slot.bit_width = per_int_width;
                slot.value_max = width_mask(per_int_width);
            }
        }

        let mut offset = 0;
        for (i, slot) in slots.iter_mut().enumerate() {
            slot.bit_offset = offset;
            offset += slot.bit_width;

            slot.default_value = defaults[i];
            if slot.default_value > slot.value_max {
                return Err(Error::DefaultOutOfRange {
                    slot: i,
                    value: slot.default_value,
                    max: slot.value_max,
                });
            }
        }

        Ok(Self { slots, budget })
    }

    #[inline]
    pub fn slots(&self) -> &[PropertyParamSlot; MAX_PARAMS] {
        &self.slots
    }

    #[inline]
    pub fn slot(&self, index: usize) -> Option<&PropertyParamSlot> {
        self.slots.get(index)
    }

    /// Bit budget the layout was computed against.
    #[inline]
    pub fn budget(&self) -> u32 {
        self.budget
    }

    /// Total bits occupied by all slots.
    pub fn used_bits(&self) -> u32 {
        self.slots.iter().map(|s| s.bit_width).sum()
    }

    /// Default value of every slot.
    pub fn defaults(&self) -> [u64; MAX_PARAMS] {
        self.slots.map(|s| s.default_value)
    }

    pub fn pack(&self, values: &[u64; MAX_PARAMS]) -> Result<u64> {
        pack(&self.slots, values)
    }

    pub fn unpack(&self, key: u64) -> [u64; MAX_PARAMS] {
        unpack(&self.slots, key)
    }
}

/// Pack parameter values into a key.
///
/// Every value is range-checked before anything is packed; a value above its
/// slot's maximum is an error and no key is produced.
pub fn pack(slots: &[PropertyParamSlot; MAX_PARAMS], values: &[u64; MAX_PARAMS]) -> Result<u64> {
    for (i, (slot, &value)) in slots.iter().zip(values).enumerate() {
        if value > slot.value_max {
            return Err(Error::ParamOutOfRange {
                slot: i,
                value,
                max: slot.value_max,
            });
        }
    }

    Ok(slots
        .iter()
        .zip(values)
        .filter(|(slot, _)| slot.bit_width > 0)
        .fold(0u64, |key, (slot, &value)| key | (value << slot.bit_offset)))
}

/// Unpack parameter values from a key. Bits outside every slot are ignored.
pub fn unpack(slots: &[PropertyParamSlot; MAX_PARAMS], key: u64) -> [u64; MAX_PARAMS] {
    std::array::from_fn(|i| {
        let slot = &slots[i];
        if slot.bit_width == 0 {
            0
        } else {
            (key >> slot.bit_offset) & slot.mask()
        }
    })
}

/// Number of bits needed to represent `value`; zero for zero.
#[inline]
pub const fn bit_length(value: u64) -> u32 {
    u64::BITS - value.leading_zeros()
}

#[inline]
fn width_mask(width: u32) -> u64 {
    if width >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}
