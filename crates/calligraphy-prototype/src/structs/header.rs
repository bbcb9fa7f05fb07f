//! Record and file header types.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// The one-byte record header.
///
/// Bits 3-7 are reserved and ignored on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(transparent)]
pub struct RecordFlags(u8);

impl RecordFlags {
    /// A parent reference follows the header.
    pub const REFERENCE_EXISTS: u8 = 1 << 0;
    /// Field groups follow the parent reference.
    pub const DATA_EXISTS: u8 = 1 << 1;
    /// The record is polymorphic.
    pub const POLYMORPHIC: u8 = 1 << 2;

    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Compose the header from its three flags.
    pub const fn new(reference_exists: bool, data_exists: bool, polymorphic: bool) -> Self {
        let mut bits = 0;
        if reference_exists {
            bits |= Self::REFERENCE_EXISTS;
        }
        if data_exists {
            bits |= Self::DATA_EXISTS;
        }
        if polymorphic {
            bits |= Self::POLYMORPHIC;
        }
        Self(bits)
    }

    #[inline]
    pub const fn reference_exists(self) -> bool {
        self.0 & Self::REFERENCE_EXISTS != 0
    }

    #[inline]
    pub const fn data_exists(self) -> bool {
        self.0 & Self::DATA_EXISTS != 0
    }

    #[inline]
    pub const fn polymorphic(self) -> bool {
        self.0 & Self::POLYMORPHIC != 0
    }
}

/// Header of a standalone prototype data file.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct FileHeader {
    /// Always `PDR`.
    pub magic: [u8; 3],
    /// Format version.
    pub version: u8,
}

impl FileHeader {
    pub const MAGIC: &'static [u8; 3] = b"PDR";
    pub const VERSION: u8 = 1;

    pub const fn current() -> Self {
        Self {
            magic: *Self::MAGIC,
            version: Self::VERSION,
        }
    }
}
