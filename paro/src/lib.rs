//! # paro
//!
//! Query-string options for listing endpoints: field projection, grouped
//! filters, related-resource includes, sorting and pagination.
//!
//! A listing request carries up to seven parameters. Four of them hold JSON
//! (`fields`, `filters`, `includes`, `sort`) and three are scalars (`limit`,
//! `page`, `start`). [`OptionsParser`] reads them, applies defaults for the
//! absent ones, validates the structure and produces a [`QueryOptions`] value
//! for the data layer. The query-string key of every parameter is
//! configurable.
//!
//! ## Features
//!
//! - **Filters**: groups of conditions, AND between groups, AND or OR inside
//! - **Includes**: structured objects or `resource:mode` shorthand, embedded or sideloaded
//! - **Sorting**: ordered keys, ascending unless stated otherwise
//! - **Axum integration**: `QueryOptions` is an extractor, parse errors are 400 responses
//! - **Configuration**: parameter names and defaults from `paro.toml` and `PARO_*` env vars
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use paro::{parse_resource_options, Defaults, IncludeMode, SortDirection};
//!
//! let raw = HashMap::from([
//!     ("filters".to_string(), r#"[{"filters":[{"field":"status","operator":"eq","value":"live"}]}]"#.to_string()),
//!     ("includes".to_string(), r#"["author:sideload","comments"]"#.to_string()),
//!     ("sort".to_string(), r#"[{"field":"created_at","direction":"desc"}]"#.to_string()),
//!     ("limit".to_string(), "20".to_string()),
//! ]);
//!
//! let options = parse_resource_options(&raw, &Defaults::default()).unwrap();
//! assert_eq!(options.filter_groups().len(), 1);
//! assert_eq!(options.include_mode("author"), Some(IncludeMode::Sideload));
//! assert_eq!(options.include_mode("comments"), Some(IncludeMode::Embed));
//! assert_eq!(options.sort()[0].direction, SortDirection::Desc);
//! assert_eq!(options.limit(), Some(20));
//! ```

pub mod architect;
pub mod config;
pub mod error;
pub mod extract;
pub mod filter;
pub mod include;
pub mod observability;
pub mod options;
pub mod responses;
pub mod sort;

mod raw;

pub use architect::Architect;
pub use config::Config;
pub use error::{Error, ErrorResponse, ParseError, ParseErrorKind, Result};
pub use filter::{parse_filters, FilterCondition, FilterGroup};
pub use include::{
    parse_includes, IncludeEntry, IncludeMode, IncludeModes, IncludeSpec, ParsedIncludes,
    ALL_COLUMNS,
};
pub use options::{parse_resource_options, Defaults, OptionsParser, QueryOptions, Start};
pub use responses::JsonResponse;
pub use sort::{parse_sort, SortDirection, SortKey};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::architect::Architect;
    pub use crate::config::{Config, Parameter, ParameterNames};
    pub use crate::error::{Error, ParseError, Result};
    pub use crate::observability::init_tracing;
    pub use crate::options::{Defaults, OptionsParser, QueryOptions};
    pub use crate::responses::JsonResponse;
}
