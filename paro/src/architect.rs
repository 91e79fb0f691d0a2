//! Hand-off to the data architect
//!
//! The architect is the external component that shapes raw records into the
//! response body, attaching related resources according to their include
//! modes. This crate only defines the seam.

use serde_json::Value;

use crate::include::IncludeModes;
use crate::options::QueryOptions;

/// Shapes raw data according to include modes
///
/// # Example
///
/// ```rust
/// use paro::{Architect, IncludeModes};
/// use serde_json::Value;
///
/// struct Passthrough;
///
/// impl Architect for Passthrough {
///     fn parse_data(&self, data: Value, _modes: &IncludeModes, _key: Option<&str>) -> Value {
///         data
///     }
/// }
/// ```
pub trait Architect {
    /// Shape `data`, optionally wrapping it under `key`
    fn parse_data(&self, data: Value, modes: &IncludeModes, key: Option<&str>) -> Value;
}

impl<A: Architect + ?Sized> Architect for &A {
    fn parse_data(&self, data: Value, modes: &IncludeModes, key: Option<&str>) -> Value {
        (**self).parse_data(data, modes, key)
    }
}

impl QueryOptions {
    /// Hand `data` to `architect` along with this request's include modes
    pub fn shape<A: Architect>(&self, architect: &A, data: Value, key: Option<&str>) -> Value {
        architect.parse_data(data, self.include_modes(), key)
    }
}
