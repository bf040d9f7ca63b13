//! Building blocks shared by rules and the engine.
//!
//! - [`RuleKind`]: the closed set of type tags
//! - [`Predicate`] and [`Transform`]: user-supplied checks and mappings
//! - [`Calendar`]: date parsing and relative date bounds

mod calendar;
mod kind;
mod predicate;

pub use calendar::{Calendar, FixedCalendar, SystemCalendar};
pub use kind::{RuleKind, UnknownKind};
pub use predicate::{Predicate, Transform};
