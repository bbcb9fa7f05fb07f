//! Opaque 64-bit reference types.
//!
//! Prototype data never embeds pointers. Parents, schemas, fields and asset
//! types are all named by stable 64-bit ids and resolved through lookup tables
//! once every table has been loaded. The value `0` is reserved as the invalid
//! id in every space.
//!
//! Ids render as 16 upper-case hex digits and parse from hex, with or without
//! a `0x` prefix.

use std::fmt;
use std::str::FromStr;

use crate::Error;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        #[repr(transparent)]
        pub struct $name(u64);

        impl $name {
            /// The reserved invalid id.
            pub const INVALID: Self = Self(0);

            /// Wrap a raw 64-bit value.
            #[inline]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Get the raw 64-bit value.
            #[inline]
            pub const fn get(self) -> u64 {
                self.0
            }

            /// Check if this is a usable (non-zero) id.
            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != 0
            }

            /// Convert to `None` if this is the invalid id.
            #[inline]
            pub const fn non_zero(self) -> Option<Self> {
                if self.0 == 0 {
                    None
                } else {
                    Some(self)
                }
            }
        }

        impl From<u64> for $name {
            #[inline]
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u64 {
            #[inline]
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:016X}", self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({:#018X})"), self.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_hex(s).map(Self)
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any(IdVisitor).map(Self)
            }
        }
    };
}

define_id!(
    /// Reference to a prototype record.
    PrototypeId
);

define_id!(
    /// Reference to a blueprint (schema) in the blueprint catalog.
    BlueprintId
);

define_id!(
    /// Identity of a field within a blueprint. Opaque until resolved.
    FieldId
);

define_id!(
    /// Reference to an asset type, the enumerable space an asset reference ranges over.
    AssetTypeId
);

fn parse_hex(s: &str) -> Result<u64, Error> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() || digits.len() > 16 {
        return Err(Error::InvalidId(s.to_string()));
    }

    u64::from_str_radix(digits, 16).map_err(|_| Error::InvalidId(s.to_string()))
}

/// Accepts ids written either as hex strings or as plain integers.
#[cfg(feature = "serde")]
struct IdVisitor;

#[cfg(feature = "serde")]
impl serde::de::Visitor<'_> for IdVisitor {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a hex id string or an unsigned integer")
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<u64, E> {
        Ok(v)
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<u64, E> {
        u64::try_from(v).map_err(|_| E::custom(format!("negative id {}", v)))
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<u64, E> {
        parse_hex(v).map_err(E::custom)
    }
}
