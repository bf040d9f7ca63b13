//! Strainer: declarative whitelisting of untrusted parameters
//!
//! Strainer sits between untrusted input (a request body, a query string
//! decoded into JSON) and application logic. Given a rule schema it returns
//! a new object holding only the declared fields, each coerced to its
//! declared type and checked against its constraints, or a single error
//! listing every field that was rejected.
//!
//! # Core Concepts
//!
//! - **Rules**: a [`RuleSchema`] maps field names to [`RuleSpec`]s
//! - **Whitelisting**: fields absent from the schema never reach the output
//! - **Coercion**: `"100"` becomes `100` for an integer rule, `"t"` becomes
//!   `true` for a boolean rule
//! - **Accumulation**: every rejected field, nested ones included, is
//!   reported in one [`ValidationError`]
//!
//! # Example
//!
//! ```rust
//! use strainer::core::RuleKind;
//! use strainer::rules::{RuleSchema, RuleSpec};
//! use serde_json::json;
//!
//! let schema = RuleSchema::new()
//!     .field("per_page", RuleSpec::integer().max(100).default_value(json!(20)))
//!     .field("active", RuleKind::Boolean)
//!     .field(
//!         "user",
//!         RuleSpec::object()
//!             .require_one_of(["username", "name"])
//!             .attributes(
//!                 RuleSchema::new()
//!                     .field("username", RuleKind::String)
//!                     .field("name", RuleKind::String),
//!             ),
//!     );
//!
//! let params = json!({
//!     "active": "t",
//!     "user": { "name": "Bob", "is_admin": true },
//!     "debug": 1,
//! });
//!
//! let filtered = strainer::filter(&schema, &params).unwrap();
//! assert_eq!(
//!     serde_json::Value::Object(filtered),
//!     json!({ "per_page": 20, "active": true, "user": { "name": "Bob" } })
//! );
//! ```

pub mod core;
pub mod filter;
pub mod rules;

pub use filter::{ArgumentError, FieldError, Filter, FilterConfig, FilterError, ValidationError};
pub use rules::{RuleSchema, RuleSpec};

use serde_json::{Map, Value};

/// Filter `params` against `rules` with the default configuration.
///
/// See [`Filter::filter`].
pub fn filter(rules: &RuleSchema, params: &Value) -> Result<Map<String, Value>, FilterError> {
    Filter::default().filter(rules, params)
}
