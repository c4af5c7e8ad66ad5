//! Site configuration module.
//!
//! Handles loading, validating, and compiling `config.toml`. User values are
//! merged over stock defaults, so a config file only needs the keys it wants
//! to change. Listing selectors are compiled as part of loading: an authoring
//! mistake such as an unsupported predicate operator fails here, before any
//! page is evaluated.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [engine]
//! config_attribute = "page-listing"      # Page attribute naming its listing
//! tags_attribute = "page-tags"           # Comma-separated tags for `tag` sections
//! data_prefix = "page-listing-data-"     # Card data attributes
//! padding = "grid-with-terminator"       # none | grid | terminator | grid-with-terminator
//!
//! [search]
//! enabled = true
//! index_file = "search-index.json"       # Written into the output directory
//! max_content_length = 1000              # Characters kept per document
//! min_content_length = 50                # Shorter documents are skipped
//! debug = false                          # Log every indexed document
//!
//! [listing.<name>.<section>]             # See `crate::listing`
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::listing::{ListingConfig, ListingError, ListingSet, Ordered};
use crate::resolve::Padding;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file inside the source directory.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Listing config error: {0}")]
    Listing(#[from] ListingError),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub engine: EngineConfig,
    pub search: SearchConfig,
    /// Listing configurations by name, in declaration order.
    pub listing: Ordered<ListingConfig>,
}

/// How the engine reads page metadata and lays out listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Attribute holding the name of the listing a page declares.
    pub config_attribute: String,
    /// Comma-separated tag list read by `tag` sections.
    pub tags_attribute: String,
    /// Prefix of attributes exposed as listing card data.
    pub data_prefix: String,
    /// Padding applied to assembled listings.
    pub padding: Padding,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            config_attribute: "page-listing".to_string(),
            tags_attribute: "page-tags".to_string(),
            data_prefix: "page-listing-data-".to_string(),
            padding: Padding::GridWithTerminator,
        }
    }
}

/// Search index generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub enabled: bool,
    /// File name of the index, relative to the output directory.
    pub index_file: String,
    /// Characters of text kept per document.
    pub max_content_length: usize,
    /// Documents with less text than this are left out.
    pub min_content_length: usize,
    /// Log each indexed document at debug level.
    pub debug: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            index_file: "search-index.json".to_string(),
            max_content_length: 1000,
            min_content_length: 50,
            debug: false,
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.config_attribute.is_empty() {
            return Err(ConfigError::Validation(
                "engine.config_attribute must not be empty".into(),
            ));
        }
        if self.engine.tags_attribute.is_empty() {
            return Err(ConfigError::Validation(
                "engine.tags_attribute must not be empty".into(),
            ));
        }
        if self.search.index_file.trim().is_empty() {
            return Err(ConfigError::Validation(
                "search.index_file must not be empty".into(),
            ));
        }
        if self.search.max_content_length < self.search.min_content_length {
            return Err(ConfigError::Validation(
                "search.max_content_length must be >= search.min_content_length".into(),
            ));
        }
        Ok(())
    }

    /// Compile every listing configuration.
    pub fn compile_listings(&self) -> Result<ListingSet, ConfigError> {
        Ok(ListingSet::compile(
            &self.listing,
            &self.engine.tags_attribute,
        )?)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Parse a config from a TOML string, over the stock defaults.
pub fn parse_config(content: &str) -> Result<SiteConfig, ConfigError> {
    let overlay: toml::Value = toml::from_str(content)?;
    resolve_config(stock_defaults_value()?, Some(overlay))
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Site Listing Configuration
# ==========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Engine
# ---------------------------------------------------------------------------
[engine]
# Page attribute naming the listing configuration a page declares.
# Pages declaring a listing with a navigation root section seed navigation.
config_attribute = "page-listing"

# Comma-separated tag list attribute read by `tag` sections.
tags_attribute = "page-tags"

# Attributes with this prefix are passed to listing cards (prefix removed).
data_prefix = "page-listing-data-"

# Listing grid padding, 3 cards per row:
#   none                  no placeholders
#   grid                  pad non-empty sections to a multiple of 3
#   terminator            always add one trailing placeholder
#   grid-with-terminator  both
padding = "grid-with-terminator"

# ---------------------------------------------------------------------------
# Search index
# ---------------------------------------------------------------------------
[search]
enabled = true
# Written into the output directory.
index_file = "search-index.json"
# Characters of page text kept per document.
max_content_length = 1000
# Pages with less text than this are not indexed.
min_content_length = 50
# Log every indexed document.
debug = false

# ---------------------------------------------------------------------------
# Listings
# ---------------------------------------------------------------------------
# Each [listing.<name>.<section>] table is one section; sections keep the
# order they are written in. A section selects pages either with a full
# selector or with the tag shorthand.
#
# [listing.handbook.guides]
# title = "Guides"                       # omit for an untitled section
# [listing.handbook.guides.selector]
# component = "<current>"                # "<current>" = the context page's value
# version = "<current>"
# module = "ROOT"
# attributes = [
#     { name = "page-category", contains = "guide" },   # token in a comma list
#     { name = "page-level", equals = "beginner" },     # also startsWith, endsWith
# ]
# [listing.handbook.guides.navigation]
# root = true                            # seed navigation from this section
# skip = false                           # leave this section out of navigation
# title = "All guides"                   # navigation label override
#
# [listing.handbook.tools]
# title = "Tools"
# tag = "tool"                           # same component and version as the page
# within_parent_module = true            # and the same module
#
# [listing]
# retired = false                        # disabled: renders nothing
"##
}
