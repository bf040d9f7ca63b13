//! Configuration and naming context shared by a filter call.

use serde::{Deserialize, Serialize};

/// Options affecting how a [`Filter`](crate::filter::Filter) reports errors.
///
/// Deserializes from camelCase keys; the older `nestedNames` key is
/// accepted too. Missing keys take their defaults.
///
/// ```rust
/// use strainer::filter::FilterConfig;
///
/// let config: FilterConfig = serde_json::from_str(r#"{ "nestedNames": false }"#).unwrap();
/// assert!(!config.nested_field_names);
/// assert!(FilterConfig::default().nested_field_names);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterConfig {
    /// Report nested fields as `parent[child]` (on) or by their own name.
    #[serde(alias = "nestedNames")]
    pub nested_field_names: bool,
}

impl FilterConfig {
    /// Configuration that reports every field by its leaf name.
    pub fn flat() -> Self {
        Self {
            nested_field_names: false,
        }
    }

    /// Path used to report `name` under `parent`.
    ///
    /// In flat mode sibling leaves of different parents can share a path;
    /// that is the documented trade-off of the mode.
    pub fn field_path(&self, parent: Option<&str>, name: &str) -> String {
        match parent {
            Some(parent) if self.nested_field_names => format!("{}[{}]", parent, name),
            _ => name.to_string(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            nested_field_names: true,
        }
    }
}
