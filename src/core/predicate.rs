//! User-supplied checks and transforms embedded in rules.
//!
//! Both are plain closures held behind an `Arc`, so rules stay cheap to
//! clone and can be shared across threads.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Pure predicate over a coerced value.
///
/// Predicates back `filter_with`, the bare-function rule shorthand, and the
/// predicate entries of an accepted-values list.
///
/// # Example
///
/// ```rust
/// use strainer::core::Predicate;
/// use serde_json::json;
///
/// let even = Predicate::named("even", |v| v.as_i64().is_some_and(|n| n % 2 == 0));
///
/// assert!(even.check(&json!(4)));
/// assert!(!even.check(&json!(3)));
/// assert_eq!(even.to_string(), "even");
/// ```
#[derive(Clone)]
pub struct Predicate {
    label: Option<String>,
    check: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl Predicate {
    /// Create a predicate from a pure function.
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Predicate {
            label: None,
            check: Arc::new(check),
        }
    }

    /// Create a predicate with a label used when it is listed in an error
    /// message.
    pub fn named<F>(label: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Predicate {
            label: Some(label.into()),
            check: Arc::new(check),
        }
    }

    pub fn check(&self, value: &Value) -> bool {
        (self.check)(value)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label.as_deref().unwrap_or("<predicate>"))
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Final mapping applied to a value after it passed every check.
///
/// A transform may refuse a value by returning `Err(message)`; the message is
/// reported against the field like any other validation failure.
#[derive(Clone)]
pub struct Transform {
    apply: Arc<dyn Fn(Value) -> Result<Value, String> + Send + Sync>,
}

impl Transform {
    /// Create an infallible transform.
    pub fn new<F>(apply: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Transform {
            apply: Arc::new(move |value| Ok(apply(value))),
        }
    }

    /// Create a transform that may reject the value with a message.
    pub fn fallible<F>(apply: F) -> Self
    where
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        Transform {
            apply: Arc::new(apply),
        }
    }

    pub fn apply(&self, value: Value) -> Result<Value, String> {
        (self.apply)(value)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform")
    }
}
