//! Content configuration.
//!
//! ```toml
//! [reader]
//! max_nesting_depth = 64
//!
//! [asset_enums]
//! "00000000000000A1" = 17
//! ```
//!
//! `asset_enums` maps an asset type id (hex) to its largest registered
//! ordinal. Every section is optional.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use calligraphy_common::AssetTypeId;
use calligraphy_property::StaticEnumRanges;
use calligraphy_prototype::{ReaderOptions, DEFAULT_MAX_NESTING_DEPTH};

use crate::{Error, Result};

/// Settings for loading content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    pub reader: ReaderConfig,
    pub asset_enums: BTreeMap<AssetTypeId, u64>,
}

/// `[reader]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderConfig {
    pub max_nesting_depth: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl ContentConfig {
    /// Load a TOML config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(
            "Loaded config from {} ({} asset enum ranges)",
            path.display(),
            config.asset_enums.len()
        );
        Ok(config)
    }

    /// Parse a TOML config from a string.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|source| Error::ConfigParse {
            path: "<string>".into(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.reader.max_nesting_depth == 0 {
            return Err(Error::InvalidConfig(
                "reader.max_nesting_depth must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn reader_options(&self) -> ReaderOptions {
        ReaderOptions {
            max_nesting_depth: self.reader.max_nesting_depth,
        }
    }

    /// Asset enum ranges for parameter layouts.
    pub fn enum_ranges(&self) -> StaticEnumRanges {
        self.asset_enums.iter().map(|(&t, &max)| (t, max)).collect()
    }
}
