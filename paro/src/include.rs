//! Include graph
//!
//! The `includes` parameter lists related resources to attach to the response.
//! Each entry is either a structured object or a colon-delimited shorthand
//! string, and the two shapes may be mixed:
//!
//! ```json
//! [
//!   { "resource": "comments", "columns": ["id", "body"], "includeMode": "sideload" },
//!   "author:embed",
//!   "tags"
//! ]
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ParseError;
use crate::raw;

const PARAMETER: &str = "includes";

/// Column list meaning "every column"
pub const ALL_COLUMNS: &str = "*";

/// How a related resource is attached to the response
///
/// # Example
///
/// ```rust
/// use paro::IncludeMode;
///
/// assert_eq!("sideload".parse::<IncludeMode>().unwrap(), IncludeMode::Sideload);
/// assert_eq!(IncludeMode::default(), IncludeMode::Embed);
/// assert_eq!(IncludeMode::Embed.to_string(), "embed");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncludeMode {
    /// Nested inline under the parent record
    #[default]
    Embed,
    /// Flat collection referenced by id
    Sideload,
}

impl fmt::Display for IncludeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embed => write!(f, "embed"),
            Self::Sideload => write!(f, "sideload"),
        }
    }
}

impl IncludeMode {
    /// Check whether this is the default mode
    #[must_use]
    pub fn is_embed(&self) -> bool {
        matches!(self, Self::Embed)
    }
}

impl FromStr for IncludeMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "embed" => Ok(Self::Embed),
            "sideload" => Ok(Self::Sideload),
            other => Err(ParseError::invalid_value(PARAMETER, other)),
        }
    }
}

/// Include mode per resource name
pub type IncludeModes = BTreeMap<String, IncludeMode>;

/// A normalized include descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludeSpec {
    /// Related resource name
    pub resource: String,

    /// Columns to load, `["*"]` for all
    pub columns: Vec<String>,

    /// How the resource is attached
    pub include_mode: IncludeMode,
}

impl IncludeSpec {
    /// Include every column of `resource` with the given mode
    pub fn new(resource: impl Into<String>, include_mode: IncludeMode) -> Self {
        Self {
            resource: resource.into(),
            columns: vec![ALL_COLUMNS.to_string()],
            include_mode,
        }
    }

    /// Restrict the columns to load
    #[must_use]
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }

    /// Check whether every column is requested
    #[must_use]
    pub fn all_columns(&self) -> bool {
        self.columns.iter().any(|c| c == ALL_COLUMNS)
    }
}

/// One raw entry of the `includes` array
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IncludeEntry {
    /// `"resource"` or `"resource:mode"`
    Shorthand(String),
    /// `{"resource": ..., "columns": [...], "includeMode": ...}`
    Structured {
        /// Related resource name
        resource: String,
        /// Requested columns, if given
        #[serde(default)]
        columns: Option<Vec<String>>,
        /// Requested mode, if given
        #[serde(default, rename = "includeMode", alias = "include_mode")]
        include_mode: Option<String>,
    },
}

impl IncludeEntry {
    /// Classify a raw JSON entry
    ///
    /// # Errors
    ///
    /// Fails with [`ParseError::MissingKey`] for an object without `resource`,
    /// and [`ParseError::MalformedParameter`] for any other JSON type.
    pub fn from_value(value: &Value) -> Result<Self, ParseError> {
        if value.is_object() && !raw::has_key(value, "resource") {
            return Err(ParseError::missing_key("resource"));
        }
        raw::decode(value, PARAMETER)
    }

    /// Resolve the entry into a canonical [`IncludeSpec`]
    ///
    /// Structured entries without a mode are embedded. Shorthand entries are
    /// read as `resource:mode`; segments after the second are ignored and a
    /// missing or empty mode uses `default_mode`.
    ///
    /// # Errors
    ///
    /// Fails when the resource name is empty or the mode is unknown.
    pub fn normalize(self, default_mode: IncludeMode) -> Result<IncludeSpec, ParseError> {
        let spec = match self {
            Self::Structured {
                resource,
                columns,
                include_mode,
            } => IncludeSpec {
                resource,
                columns: columns
                    .map(raw::dedup)
                    .unwrap_or_else(|| vec![ALL_COLUMNS.to_string()]),
                include_mode: include_mode
                    .map(|mode| mode.parse::<IncludeMode>())
                    .transpose()?
                    .unwrap_or_default(),
            },
            Self::Shorthand(shorthand) => {
                let mut segments = shorthand.split(':');
                let resource = segments.next().unwrap_or_default().trim();
                let mode = segments.next().unwrap_or_default().trim();
                let include_mode = if mode.is_empty() {
                    tracing::debug!(
                        resource,
                        %default_mode,
                        "Include mode not given, using default"
                    );
                    default_mode
                } else {
                    mode.parse()?
                };
                IncludeSpec::new(resource, include_mode)
            }
        };

        if spec.resource.is_empty() {
            return Err(ParseError::malformed(
                PARAMETER,
                "include resource name must not be empty",
            ));
        }

        Ok(spec)
    }
}

/// Result of [`parse_includes`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedIncludes {
    /// Descriptors in request order, duplicates kept
    pub resources: Vec<IncludeSpec>,

    /// Mode per resource, last entry wins
    pub include_modes: IncludeModes,
}

/// Parse raw include entries
///
/// # Errors
///
/// Propagates the first entry that fails [`IncludeEntry::from_value`] or
/// [`IncludeEntry::normalize`].
pub fn parse_includes(
    raw_includes: &[Value],
    default_mode: IncludeMode,
) -> Result<ParsedIncludes, ParseError> {
    let mut parsed = ParsedIncludes::default();

    for entry in raw_includes {
        let spec = IncludeEntry::from_value(entry)?.normalize(default_mode)?;
        parsed
            .include_modes
            .insert(spec.resource.clone(), spec.include_mode);
        parsed.resources.push(spec);
    }

    Ok(parsed)
}
