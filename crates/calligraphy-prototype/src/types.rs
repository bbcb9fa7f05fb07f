//! Field kind tags.

/// Which table a raw reference id points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json-export", derive(serde::Serialize))]
pub enum RefKind {
    /// Asset (enum-like content value).
    Asset,
    /// Curve table.
    Curve,
    /// Another prototype record.
    Prototype,
    /// Asset type.
    Type,
}

/// The kind of a field's value, as tagged by the one-byte kind field on the wire.
///
/// This is a closed set. Any other byte is rejected by the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json-export", derive(serde::Serialize))]
pub enum FieldKind {
    /// Boolean, stored as an 8-byte integer (non-zero = true).
    Bool,
    /// IEEE-754 double.
    Float64,
    /// Signed 64-bit integer.
    Int64,
    /// Nested record, stored inline.
    Record,
    /// Unresolved 8-byte reference id.
    Ref(RefKind),
}

impl FieldKind {
    /// Parse from the wire tag byte.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'B' => Some(Self::Bool),
            b'D' => Some(Self::Float64),
            b'L' => Some(Self::Int64),
            b'R' => Some(Self::Record),
            b'A' => Some(Self::Ref(RefKind::Asset)),
            b'C' => Some(Self::Ref(RefKind::Curve)),
            b'P' => Some(Self::Ref(RefKind::Prototype)),
            b'T' => Some(Self::Ref(RefKind::Type)),
            _ => None,
        }
    }

    /// Get the wire tag byte.
    pub const fn tag(&self) -> u8 {
        match self {
            Self::Bool => b'B',
            Self::Float64 => b'D',
            Self::Int64 => b'L',
            Self::Record => b'R',
            Self::Ref(RefKind::Asset) => b'A',
            Self::Ref(RefKind::Curve) => b'C',
            Self::Ref(RefKind::Prototype) => b'P',
            Self::Ref(RefKind::Type) => b'T',
        }
    }

    /// Get the string name for this kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::Float64 => "Float64",
            Self::Int64 => "Int64",
            Self::Record => "Record",
            Self::Ref(RefKind::Asset) => "AssetRef",
            Self::Ref(RefKind::Curve) => "CurveRef",
            Self::Ref(RefKind::Prototype) => "PrototypeRef",
            Self::Ref(RefKind::Type) => "TypeRef",
        }
    }

    /// Check if this kind holds an unresolved reference id.
    pub const fn is_reference(&self) -> bool {
        matches!(self, Self::Ref(_))
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_unique_and_reversible() {
        let all = [
            FieldKind::Bool,
            FieldKind::Float64,
            FieldKind::Int64,
            FieldKind::Record,
            FieldKind::Ref(RefKind::Asset),
            FieldKind::Ref(RefKind::Curve),
            FieldKind::Ref(RefKind::Prototype),
            FieldKind::Ref(RefKind::Type),
        ];
        for kind in all {
            assert_eq!(FieldKind::from_tag(kind.tag()), Some(kind));
        }
        let tags: std::collections::HashSet<u8> = all.iter().map(|k| k.tag()).collect();
        assert_eq!(tags.len(), all.len());
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(FieldKind::from_tag(0), None);
        assert_eq!(FieldKind::from_tag(b'X'), None);
        assert_eq!(FieldKind::from_tag(b'b'), None);
    }
}
