//! Type-safe field values.
//!
//! The kind tag read from the stream becomes the variant of [`FieldValue`], so
//! every consumer matches exhaustively on what the reader produced.

use calligraphy_common::PrototypeId;

use crate::{FieldKind, PrototypeRecord, RefKind};

/// A decoded field value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json-export", derive(serde::Serialize))]
pub enum FieldValue {
    /// Boolean value.
    Bool(bool),
    /// 64-bit floating point.
    Float64(f64),
    /// Signed 64-bit integer.
    Int64(i64),
    /// Nested record.
    Record(Box<PrototypeRecord>),
    /// Unresolved reference into an asset, curve, prototype or type table.
    RawId(RefKind, u64),
}

impl FieldValue {
    /// The kind tag this value is written with.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Float64(_) => FieldKind::Float64,
            FieldValue::Int64(_) => FieldKind::Int64,
            FieldValue::Record(_) => FieldKind::Record,
            FieldValue::RawId(table, _) => FieldKind::Ref(*table),
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float64(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int64(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_record(&self) -> Option<&PrototypeRecord> {
        match self {
            FieldValue::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Get the raw id of any reference kind.
    #[inline]
    pub fn as_raw_id(&self) -> Option<u64> {
        match self {
            FieldValue::RawId(_, id) => Some(*id),
            _ => None,
        }
    }

    /// Get the id if this is a prototype reference.
    #[inline]
    pub fn as_prototype_ref(&self) -> Option<PrototypeId> {
        match self {
            FieldValue::RawId(RefKind::Prototype, id) => Some(PrototypeId::new(*id)),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Bool(v) => write!(f, "{}", v),
            FieldValue::Float64(v) => write!(f, "{}", v),
            FieldValue::Int64(v) => write!(f, "{}", v),
            FieldValue::Record(r) => write!(f, "Record({} groups)", r.groups.len()),
            FieldValue::RawId(table, id) => write!(f, "{:?}({:016X})", table, id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(FieldValue::Bool(true).to_string(), "true");
        assert_eq!(FieldValue::Int64(-42).to_string(), "-42");
        assert_eq!(
            FieldValue::RawId(RefKind::Asset, 0x11).to_string(),
            "Asset(0000000000000011)"
        );
    }

    #[test]
    fn test_value_accessors() {
        let v = FieldValue::Int64(42);
        assert_eq!(v.as_i64(), Some(42));
        assert_eq!(v.as_f64(), None);
        assert_eq!(v.kind(), FieldKind::Int64);

        let v = FieldValue::RawId(RefKind::Prototype, 9);
        assert_eq!(v.as_prototype_ref(), Some(PrototypeId::new(9)));
        assert_eq!(v.as_raw_id(), Some(9));
        assert_eq!(v.kind(), FieldKind::Ref(RefKind::Prototype));

        let v = FieldValue::RawId(RefKind::Asset, 9);
        assert_eq!(v.as_prototype_ref(), None);
    }
}
