//! Common utilities for Calligraphy.
//!
//! This crate provides foundational types and utilities used across all Calligraphy crates:
//!
//! - [`BinaryReader`] - Zero-copy little-endian reading from byte slices
//! - [`BinaryWriter`] - The matching little-endian writer
//! - [`PrototypeId`], [`BlueprintId`], [`FieldId`], [`AssetTypeId`] - Opaque 64-bit references
//! - [`FxHashMap`] - The hash map behind every id lookup table

mod error;
mod ids;
mod reader;
mod writer;

pub use error::{Error, Result};
pub use ids::{AssetTypeId, BlueprintId, FieldId, PrototypeId};
pub use reader::BinaryReader;
pub use writer::BinaryWriter;

use hashbrown::HashMap as FastHashMap;
use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;

/// Hash map keyed by ids or other small integers.
pub type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};
