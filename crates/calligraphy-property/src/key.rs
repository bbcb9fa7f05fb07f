//! Packed property keys.

use crate::{Error, Result, TOTAL_PARAM_BITS};

/// Bits of a property key holding the property enum.
pub const PROPERTY_ENUM_BITS: u32 = u64::BITS - TOTAL_PARAM_BITS;

const PARAM_MASK: u64 = (1u64 << TOTAL_PARAM_BITS) - 1;

/// A property enum and its packed parameters in one 64-bit value.
///
/// The enum occupies the upper [`PROPERTY_ENUM_BITS`] bits, the parameters
/// the lower [`TOTAL_PARAM_BITS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyKey(u64);

impl PropertyKey {
    pub fn new(property_enum: u16, params: u64) -> Result<Self> {
        if u32::from(property_enum) >> PROPERTY_ENUM_BITS != 0 {
            return Err(Error::EnumOutOfRange(property_enum));
        }
        if params & !PARAM_MASK != 0 {
            return Err(Error::ParamsOutOfRange(params));
        }
        Ok(Self((u64::from(property_enum) << TOTAL_PARAM_BITS) | params))
    }

    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn property_enum(self) -> u16 {
        (self.0 >> TOTAL_PARAM_BITS) as u16
    }

    #[inline]
    pub const fn params(self) -> u64 {
        self.0 & PARAM_MASK
    }
}

impl std::fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{:#x}", self.property_enum(), self.params())
    }
}
