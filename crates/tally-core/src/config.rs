//! Analytics configuration
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/tally/config/analytics.toml)
//!    or at an explicitly passed path
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Every key is optional, so an override file only changes what it names.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::DisplayLocale;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analytics.toml");

pub const DEFAULT_TOP_N: usize = 6;
pub const DEFAULT_HORIZON_MONTHS: u32 = 3;
pub const DEFAULT_GRAND_TOTAL_CATEGORY: &str = "Total";

/// Settings shared by the analytics screens
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsConfig {
    /// Categories listed by the breakdown
    pub top_n: usize,
    /// Months projected past the current one
    pub horizon_months: u32,
    /// Category label of pre-aggregated rows that every aggregator skips
    pub grand_total_category: String,
    /// Month label locale
    pub locale: DisplayLocale,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            horizon_months: DEFAULT_HORIZON_MONTHS,
            grand_total_category: DEFAULT_GRAND_TOTAL_CATEGORY.to_string(),
            locale: DisplayLocale::default(),
        }
    }
}

impl AnalyticsConfig {
    /// Load from the default override location, else embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit path (embedded defaults if it does not exist)
    pub fn load_from(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Parse TOML content on top of the built-in defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config").join("analytics.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<AnalyticsConfig> {
    let path = override_path
        .map(Path::to_path_buf)
        .or_else(default_config_path)
        .filter(|p| p.exists());

    let content = match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading analytics config override");
            fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?
        }
        None => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    defaults: Option<RawDefaults>,
    breakdown: Option<RawBreakdown>,
    projection: Option<RawProjection>,
}

#[derive(Debug, Deserialize)]
struct RawDefaults {
    locale: Option<String>,
    grand_total_category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBreakdown {
    top_n: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawProjection {
    horizon_months: Option<u32>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<AnalyticsConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = AnalyticsConfig::default();

    if let Some(defaults) = raw.defaults {
        if let Some(locale) = defaults.locale {
            config.locale = DisplayLocale::from_tag(&locale);
        }
        if let Some(label) = defaults.grand_total_category {
            config.grand_total_category = label;
        }
    }

    if let Some(top_n) = raw.breakdown.and_then(|b| b.top_n) {
        config.top_n = top_n;
    }

    if let Some(horizon) = raw.projection.and_then(|p| p.horizon_months) {
        config.horizon_months = horizon;
    }

    Ok(config)
}
