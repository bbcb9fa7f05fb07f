//! Calligraphy - game server prototype data engine.
//!
//! This crate provides a unified interface to the Calligraphy library
//! ecosystem for loading game content definitions.
//!
//! # Crates
//!
//! - [`calligraphy_common`] - Common utilities (binary reading/writing, id types)
//! - [`calligraphy_prototype`] - Prototype records, blueprint catalog, inheritance index
//! - [`calligraphy_property`] - Property parameter layouts and packed property keys
//!
//! # Example
//!
//! ```no_run
//! use calligraphy::prelude::*;
//!
//! let config = ContentConfig::load("content.toml")?;
//! let catalog = BlueprintCatalog::open("blueprints.json")?;
//! let index = load_directory("content/", &config.reader_options())?;
//!
//! let exporter = JsonExporter::new(&index, &catalog);
//! exporter.export_all("./output", |done, total| {
//!     println!("Progress: {}/{}", done, total);
//! })?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod error;

// Re-export all sub-crates
pub use calligraphy_common as common;
pub use calligraphy_property as property;
pub use calligraphy_prototype as prototype;

pub use config::{ContentConfig, ReaderConfig};
pub use error::{Error, Result};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::ContentConfig;
    pub use calligraphy_common::{AssetTypeId, BinaryReader, BinaryWriter, BlueprintId, FieldId, PrototypeId};
    pub use calligraphy_property::{
        EnumRangeOracle, ParamKind, ParamLayout, PropertyDefinition, PropertyInfoTable, PropertyKey,
        StaticEnumRanges,
    };
    #[cfg(feature = "full")]
    pub use calligraphy_prototype::JsonExporter;
    pub use calligraphy_prototype::{
        load_directory, BlueprintCatalog, BlueprintLookup, EffectiveRecord, FieldResolver, PrototypeFile,
        PrototypeIndex, PrototypeRecord, ReaderOptions,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
