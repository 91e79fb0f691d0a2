//! Query options assembly
//!
//! [`OptionsParser`] turns the raw query-string map of a listing request into
//! a [`QueryOptions`] value. `fields`, `filters`, `includes` and `sort` carry
//! JSON text; `limit`, `page` and `start` are plain scalars. Absent parameters
//! fall back to the caller's [`Defaults`].
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use paro::{Defaults, IncludeMode, OptionsParser};
//!
//! let parser = OptionsParser::default().with_defaults(Defaults::default().with_limit(20));
//!
//! let raw = HashMap::from([
//!     ("includes".to_string(), r#"["author:sideload"]"#.to_string()),
//!     ("page".to_string(), "3".to_string()),
//! ]);
//!
//! let options = parser.parse(&raw).unwrap();
//! assert_eq!(options.limit(), Some(20));
//! assert_eq!(options.offset(), Some(40));
//! assert_eq!(options.include_mode("author"), Some(IncludeMode::Sideload));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{Config, Parameter, ParameterNames};
use crate::error::ParseError;
use crate::filter::{parse_filters, FilterGroup};
use crate::include::{parse_includes, IncludeMode, IncludeModes, IncludeSpec};
use crate::raw;
use crate::sort::{parse_sort, SortKey};

/// Where a listing starts: a numeric offset or an opaque cursor token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Start {
    /// Number of records to skip
    Offset(u64),
    /// Opaque continuation token
    Cursor(String),
}

impl fmt::Display for Start {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offset(offset) => write!(f, "{offset}"),
            Self::Cursor(cursor) => f.write_str(cursor),
        }
    }
}

impl Start {
    fn parse(text: &str) -> Result<Self, ParseError> {
        if let Ok(offset) = text.parse::<u64>() {
            return Ok(Self::Offset(offset));
        }
        if text.parse::<i64>().is_ok() {
            return Err(ParseError::malformed(
                Parameter::Start.name(),
                "offset must not be negative",
            ));
        }
        Ok(Self::Cursor(text.to_string()))
    }
}

/// Values used when a parameter is absent from the request
///
/// Every key missing from a deserialized table takes the built-in base value
/// (empty lists, `embed`, no limit/page/start), so callers only spell out what
/// they want to change.
///
/// # Example
///
/// ```rust
/// use paro::{Defaults, IncludeMode};
///
/// let defaults: Defaults = serde_json::from_str(r#"{ "limit": 50 }"#).unwrap();
/// assert_eq!(defaults.limit, Some(50));
/// assert_eq!(defaults.include_mode, IncludeMode::Embed);
/// assert!(defaults.sort.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Defaults {
    /// Fields to project
    pub fields: Vec<String>,

    /// Raw filter groups, same shape as the `filters` parameter
    pub filters: Vec<Value>,

    /// Raw include entries, same shape as the `includes` parameter
    pub includes: Vec<Value>,

    /// Mode for shorthand includes that name none
    ///
    /// Also read as `include_mode` and `includemode`, the spellings that
    /// reach it from `PARO_DEFAULTS__INCLUDE_MODE` and
    /// `PARO_DEFAULTS__INCLUDEMODE`. The built-in value is not serialized.
    #[serde(
        alias = "include_mode",
        alias = "includemode",
        skip_serializing_if = "IncludeMode::is_embed"
    )]
    pub include_mode: IncludeMode,

    /// Page size
    pub limit: Option<u32>,

    /// Page number
    pub page: Option<u32>,

    /// Raw sort entries, same shape as the `sort` parameter
    pub sort: Vec<Value>,

    /// Offset or cursor
    pub start: Option<Start>,
}

impl Defaults {
    /// Set the default projection
    #[must_use]
    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    /// Set the default raw filter groups
    #[must_use]
    pub fn with_filters(mut self, filters: Vec<Value>) -> Self {
        self.filters = filters;
        self
    }

    /// Set the default raw include entries
    #[must_use]
    pub fn with_includes(mut self, includes: Vec<Value>) -> Self {
        self.includes = includes;
        self
    }

    /// Set the mode used for shorthand includes without one
    #[must_use]
    pub fn with_include_mode(mut self, include_mode: IncludeMode) -> Self {
        self.include_mode = include_mode;
        self
    }

    /// Set the default page size
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the default page number
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the default raw sort entries
    #[must_use]
    pub fn with_sort(mut self, sort: Vec<Value>) -> Self {
        self.sort = sort;
        self
    }

    /// Set the default start
    #[must_use]
    pub fn with_start(mut self, start: Start) -> Self {
        self.start = Some(start);
        self
    }
}

/// Normalized options for one listing request
///
/// Built only through [`OptionsParser`], which guarantees that `page` is never
/// set without `limit`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOptions {
    fields: Vec<String>,
    filter_groups: Vec<FilterGroup>,
    includes: Vec<IncludeSpec>,
    include_modes: IncludeModes,
    sort: Vec<SortKey>,
    limit: Option<u32>,
    page: Option<u32>,
    start: Option<Start>,
}

impl QueryOptions {
    /// Fields to project, empty for all
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Filter groups, AND-combined in order
    #[must_use]
    pub fn filter_groups(&self) -> &[FilterGroup] {
        &self.filter_groups
    }

    /// Include descriptors in request order
    #[must_use]
    pub fn includes(&self) -> &[IncludeSpec] {
        &self.includes
    }

    /// Include mode per resource
    #[must_use]
    pub fn include_modes(&self) -> &IncludeModes {
        &self.include_modes
    }

    /// Include mode of one resource, if it was requested
    #[must_use]
    pub fn include_mode(&self, resource: &str) -> Option<IncludeMode> {
        self.include_modes.get(resource).copied()
    }

    /// Sort keys in priority order
    #[must_use]
    pub fn sort(&self) -> &[SortKey] {
        &self.sort
    }

    /// Page size
    #[must_use]
    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    /// 1-indexed page number
    #[must_use]
    pub fn page(&self) -> Option<u32> {
        self.page
    }

    /// Offset or cursor
    #[must_use]
    pub fn start(&self) -> Option<&Start> {
        self.start.as_ref()
    }

    /// Number of records to skip, if it can be computed
    ///
    /// A numeric `start` wins; otherwise `(page - 1) * limit` when paging.
    #[must_use]
    pub fn offset(&self) -> Option<u64> {
        match (&self.start, self.page, self.limit) {
            (Some(Start::Offset(offset)), _, _) => Some(*offset),
            (Some(Start::Cursor(_)), _, _) => None,
            (None, Some(page), Some(limit)) => {
                Some(u64::from(page.saturating_sub(1)) * u64::from(limit))
            }
            (None, _, _) => None,
        }
    }
}

/// Interprets listing query parameters
///
/// Holds the parameter-name table, the defaults for absent parameters and the
/// parsing switches. Cloning is cheap and the parser is shared read-only
/// across requests.
#[derive(Debug, Clone, Default)]
pub struct OptionsParser {
    parameters: Arc<ParameterNames>,
    defaults: Arc<Defaults>,
    strict_sort: bool,
}

impl OptionsParser {
    /// Create a parser reading the given query-string keys
    pub fn new(parameters: ParameterNames) -> Self {
        Self {
            parameters: Arc::new(parameters),
            ..Self::default()
        }
    }

    /// Create a parser from loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            parameters: Arc::new(config.parameters.clone()),
            defaults: Arc::new(config.defaults.clone()),
            strict_sort: config.parsing.strict_sort,
        }
    }

    /// Replace the defaults used by [`parse`](Self::parse)
    #[must_use]
    pub fn with_defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = Arc::new(defaults);
        self
    }

    /// Reject sort directions other than `asc`/`desc`
    #[must_use]
    pub fn with_strict_sort(mut self, strict: bool) -> Self {
        self.strict_sort = strict;
        self
    }

    /// The query-string key table
    #[must_use]
    pub fn parameters(&self) -> &ParameterNames {
        &self.parameters
    }

    /// The defaults used by [`parse`](Self::parse)
    #[must_use]
    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Parse with this parser's own defaults
    ///
    /// # Errors
    ///
    /// See [`parse_with`](Self::parse_with).
    pub fn parse(&self, raw_query: &HashMap<String, String>) -> Result<QueryOptions, ParseError> {
        self.parse_with(raw_query, &self.defaults)
    }

    /// Parse with per-call defaults
    ///
    /// # Errors
    ///
    /// - [`ParseError::MalformedParameter`] for invalid JSON, a JSON value of
    ///   the wrong shape, or an unparseable `limit`/`page`/`start`
    /// - [`ParseError::MissingKey`] for filter groups without `filters` and
    ///   include objects without `resource`
    /// - [`ParseError::InvalidValue`] for unknown include modes (and unknown
    ///   sort directions when strict)
    /// - [`ParseError::InvalidCombination`] when `page` is set without `limit`
    pub fn parse_with(
        &self,
        raw_query: &HashMap<String, String>,
        defaults: &Defaults,
    ) -> Result<QueryOptions, ParseError> {
        let fields = match self.json(raw_query, Parameter::Fields)? {
            Some(value) => raw::dedup(raw::decode(&value, Parameter::Fields.name())?),
            None => raw::dedup(defaults.fields.clone()),
        };

        let raw_filters = self.json_array(raw_query, Parameter::Filters)?;
        let filter_groups = parse_filters(raw_filters.as_deref().unwrap_or(&defaults.filters))?;

        let raw_includes = self.json_array(raw_query, Parameter::Includes)?;
        let includes = parse_includes(
            raw_includes.as_deref().unwrap_or(&defaults.includes),
            defaults.include_mode,
        )?;

        let raw_sort = self.json_array(raw_query, Parameter::Sort)?;
        let sort = parse_sort(
            raw_sort.as_deref().unwrap_or(&defaults.sort),
            self.strict_sort,
        )?;

        let limit = self.positive(raw_query, Parameter::Limit)?.or(defaults.limit);
        let page = self.positive(raw_query, Parameter::Page)?.or(defaults.page);
        let start = match self.scalar(raw_query, Parameter::Start) {
            Some(text) => Some(Start::parse(text)?),
            None => defaults.start.clone(),
        };

        if page.is_some() && limit.is_none() {
            return Err(ParseError::InvalidCombination(
                "page requires limit".to_string(),
            ));
        }

        tracing::debug!(
            fields = fields.len(),
            filter_groups = filter_groups.len(),
            includes = includes.resources.len(),
            sort = sort.len(),
            ?limit,
            ?page,
            "Parsed resource options"
        );

        Ok(QueryOptions {
            fields,
            filter_groups,
            includes: includes.resources,
            include_modes: includes.include_modes,
            sort,
            limit,
            page,
            start,
        })
    }

    /// Raw text of `parameter`; empty values count as absent.
    fn scalar<'a>(
        &self,
        raw_query: &'a HashMap<String, String>,
        parameter: Parameter,
    ) -> Option<&'a str> {
        raw_query
            .get(self.parameters.key(parameter))
            .map(|text| text.trim())
            .filter(|text| !text.is_empty())
    }

    fn json(
        &self,
        raw_query: &HashMap<String, String>,
        parameter: Parameter,
    ) -> Result<Option<Value>, ParseError> {
        self.scalar(raw_query, parameter)
            .map(|text| {
                serde_json::from_str(text).map_err(|e| {
                    ParseError::malformed(parameter.name(), format!("invalid JSON: {e}"))
                })
            })
            .transpose()
    }

    fn json_array(
        &self,
        raw_query: &HashMap<String, String>,
        parameter: Parameter,
    ) -> Result<Option<Vec<Value>>, ParseError> {
        match self.json(raw_query, parameter)? {
            None => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(other) => Err(ParseError::malformed(
                parameter.name(),
                format!("expected a JSON array, got {}", raw::type_name(&other)),
            )),
        }
    }

    fn positive(
        &self,
        raw_query: &HashMap<String, String>,
        parameter: Parameter,
    ) -> Result<Option<u32>, ParseError> {
        let Some(text) = self.scalar(raw_query, parameter) else {
            return Ok(None);
        };
        match text.parse::<u32>() {
            Ok(value) if value > 0 => Ok(Some(value)),
            _ => Err(ParseError::malformed(
                parameter.name(),
                format!("expected a positive integer, got `{text}`"),
            )),
        }
    }
}

/// Parse `raw_query` with the default parameter names and the given defaults
///
/// # Errors
///
/// See [`OptionsParser::parse_with`].
pub fn parse_resource_options(
    raw_query: &HashMap<String, String>,
    defaults: &Defaults,
) -> Result<QueryOptions, ParseError> {
    OptionsParser::default().parse_with(raw_query, defaults)
}
