//! Field group and field header types.
//!
//! All integers are little-endian and unaligned, so these map the stream
//! byte-for-byte.

use zerocopy::byteorder::little_endian::{U16, U64};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Header of one field group: schema reference and copy number.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct GroupHeader {
    /// Blueprint that gives meaning to the group's field ids.
    pub schema_ref: U64,
    /// Disambiguates repeated application of the same blueprint on one record.
    pub copy_number: u8,
}

/// Header of a simple field: field id and kind tag. The value follows.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct FieldHeader {
    /// Opaque field id, resolved later through the blueprint catalog.
    pub field_id: U64,
    /// One of the closed set of kind tags.
    pub kind_tag: u8,
}

/// Header of a list field: field id, element kind tag and element count.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct ListHeader {
    pub field_id: U64,
    pub kind_tag: u8,
    pub element_count: U16,
}
