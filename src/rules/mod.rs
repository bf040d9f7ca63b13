//! Rule schemas: which fields are accepted and how each is checked.
//!
//! Schemas are built in code with [`RuleSpec`] and [`RuleSchema`] (or the
//! [`rules!`](crate::rules!) macro), or loaded from JSON with
//! [`RuleSchema::from_json`]. Only schemas built in code can carry
//! predicates and transforms.

mod json;
pub mod macros;
mod schema;
mod spec;

pub use schema::RuleSchema;
pub use spec::{
    Accepted, ArrayRule, Bounds, DateRule, Elements, LengthBounds, ObjectRule, RuleSpec, RuleType,
};
