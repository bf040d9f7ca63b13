//! Type tags understood by the rule engine.
//!
//! Every rule names exactly one kind. The tag strings are the ones used in
//! declarative schemas (`"integer"`, `"date"`, ...), matched exactly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of rule kinds.
///
/// `Scalar` is the fallback used when a rule does not name a type: the value
/// must already be a string or an integer.
///
/// # Example
///
/// ```rust
/// use strainer::core::RuleKind;
///
/// let kind: RuleKind = "integer".parse().unwrap();
/// assert_eq!(kind, RuleKind::Integer);
/// assert_eq!(kind.tag(), "integer");
/// assert!("Integer".parse::<RuleKind>().is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Scalar,
    Null,
    Integer,
    Float,
    Boolean,
    String,
    Email,
    Date,
    Array,
    Object,
}

impl RuleKind {
    /// All kinds, in tag order.
    pub const ALL: [RuleKind; 10] = [
        RuleKind::Scalar,
        RuleKind::Null,
        RuleKind::Integer,
        RuleKind::Float,
        RuleKind::Boolean,
        RuleKind::String,
        RuleKind::Email,
        RuleKind::Date,
        RuleKind::Array,
        RuleKind::Object,
    ];

    /// The tag used for this kind in declarative schemas.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Null => "null",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Email => "email",
            Self::Date => "date",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Long-form tag accepted for [`RuleKind::Scalar`].
const STRING_OR_NUMBER: &str = "string-or-number";

/// Error returned when a tag string names no known kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rule type '{0}'")]
pub struct UnknownKind(pub String);

impl FromStr for RuleKind {
    type Err = UnknownKind;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        if tag == STRING_OR_NUMBER {
            return Ok(RuleKind::Scalar);
        }
        RuleKind::ALL
            .into_iter()
            .find(|kind| kind.tag() == tag)
            .ok_or_else(|| UnknownKind(tag.to_string()))
    }
}
