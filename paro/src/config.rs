//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: `PARO_`, nested keys separated by `__`)
//! 2. Config file: `./paro.toml`, or the path given to [`Config::load_from`]
//! 3. Default values
//!
//! ```toml
//! log_level = "debug"
//!
//! [parameters]
//! filters = "filter_groups"
//!
//! [defaults]
//! limit = 25
//! includeMode = "sideload"
//!
//! [parsing]
//! strict_sort = true
//! ```
//!
//! The same overrides from the environment: `PARO_PARAMETERS__FILTERS=filter_groups`,
//! `PARO_DEFAULTS__INCLUDE_MODE=sideload`.

use std::fmt;
use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::options::Defaults;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "paro.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "PARO_";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Query-string key for each logical parameter
    #[serde(default)]
    pub parameters: ParameterNames,

    /// Defaults applied when a parameter is absent from the request
    #[serde(default)]
    pub defaults: Defaults,

    /// Parser behaviour
    #[serde(default)]
    pub parsing: ParsingConfig,

    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text
    #[serde(default)]
    pub json_logs: bool,
}

/// The logical parameters understood by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    /// Field projection (JSON array of strings)
    Fields,
    /// Filter groups (JSON array)
    Filters,
    /// Related resources (JSON array)
    Includes,
    /// Page size (integer)
    Limit,
    /// Page number (integer)
    Page,
    /// Offset or cursor
    Start,
    /// Sort keys (JSON array)
    Sort,
}

impl Parameter {
    /// Every parameter, in documentation order
    pub const ALL: [Parameter; 7] = [
        Self::Fields,
        Self::Filters,
        Self::Includes,
        Self::Limit,
        Self::Page,
        Self::Start,
        Self::Sort,
    ];

    /// The logical name, also the default query-string key
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Fields => "fields",
            Self::Filters => "filters",
            Self::Includes => "includes",
            Self::Limit => "limit",
            Self::Page => "page",
            Self::Start => "start",
            Self::Sort => "sort",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mapping from logical parameter to the query-string key carrying it
///
/// Loaded once at startup and shared read-only between requests.
///
/// # Example
///
/// ```rust
/// use paro::config::{Parameter, ParameterNames};
///
/// let names = ParameterNames::default().with_key(Parameter::Filters, "filter_groups");
/// assert_eq!(names.key(Parameter::Filters), "filter_groups");
/// assert_eq!(names.key(Parameter::Sort), "sort");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterNames {
    /// Key for [`Parameter::Fields`]
    pub fields: String,
    /// Key for [`Parameter::Filters`]
    pub filters: String,
    /// Key for [`Parameter::Includes`]
    pub includes: String,
    /// Key for [`Parameter::Limit`]
    pub limit: String,
    /// Key for [`Parameter::Page`]
    pub page: String,
    /// Key for [`Parameter::Start`]
    pub start: String,
    /// Key for [`Parameter::Sort`]
    pub sort: String,
}

impl Default for ParameterNames {
    fn default() -> Self {
        Self {
            fields: Parameter::Fields.name().to_string(),
            filters: Parameter::Filters.name().to_string(),
            includes: Parameter::Includes.name().to_string(),
            limit: Parameter::Limit.name().to_string(),
            page: Parameter::Page.name().to_string(),
            start: Parameter::Start.name().to_string(),
            sort: Parameter::Sort.name().to_string(),
        }
    }
}

impl ParameterNames {
    /// Query-string key for `parameter`
    #[must_use]
    pub fn key(&self, parameter: Parameter) -> &str {
        match parameter {
            Parameter::Fields => &self.fields,
            Parameter::Filters => &self.filters,
            Parameter::Includes => &self.includes,
            Parameter::Limit => &self.limit,
            Parameter::Page => &self.page,
            Parameter::Start => &self.start,
            Parameter::Sort => &self.sort,
        }
    }

    /// Remap `parameter` to a different query-string key
    #[must_use]
    pub fn with_key(mut self, parameter: Parameter, key: impl Into<String>) -> Self {
        let slot = match parameter {
            Parameter::Fields => &mut self.fields,
            Parameter::Filters => &mut self.filters,
            Parameter::Includes => &mut self.includes,
            Parameter::Limit => &mut self.limit,
            Parameter::Page => &mut self.page,
            Parameter::Start => &mut self.start,
            Parameter::Sort => &mut self.sort,
        };
        *slot = key.into();
        self
    }
}

/// Parser behaviour switches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsingConfig {
    /// Reject sort directions other than `asc`/`desc` instead of passing them through
    #[serde(default)]
    pub strict_sort: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from `./paro.toml` (if present) and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific file
    ///
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            tracing::info!("Loading configuration from: {}", path.display());
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
        }

        let config = Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Config::default()))
            // Load from config file (if exists)
            .merge(Toml::file(path))
            // Override with environment variables
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parameters: ParameterNames::default(),
            defaults: Defaults::default(),
            parsing: ParsingConfig::default(),
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}
