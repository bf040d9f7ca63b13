//! The rule engine.
//!
//! [`Filter`] walks a [`RuleSchema`](crate::rules::RuleSchema) and a
//! parameter tree in lockstep and returns either the whitelisted, coerced
//! parameters or every rejected field at once.
//!
//! Two failure shapes are kept apart:
//!
//! - [`ArgumentError`]: the call itself is malformed (parameters that are not
//!   an object, an unusable rule). Raised immediately.
//! - [`ValidationError`]: one or more fields were rejected. Raised once,
//!   after the whole tree has been visited.
//!
//! # Example
//!
//! ```rust
//! use strainer::filter::{Filter, FilterError};
//! use strainer::rules::{RuleSchema, RuleSpec};
//! use serde_json::json;
//!
//! let schema = RuleSchema::new()
//!     .field("id", RuleSpec::integer().required())
//!     .field("email", RuleSpec::email());
//!
//! let err = Filter::default()
//!     .filter(&schema, &json!({ "email": "bob@email" }))
//!     .unwrap_err();
//!
//! let errors = err.validation().unwrap().errors();
//! assert_eq!(errors.len(), 2);
//! assert_eq!(errors[0].to_string(), "id is required");
//! ```

mod coerce;
pub mod context;
mod engine;
pub mod error;

pub use context::FilterConfig;
pub use engine::Filter;
pub use error::{ArgumentError, FieldError, FilterError, ValidationError};
