//! Rule evaluation over parameter trees.
//!
//! Every field of a schema is evaluated, and the outcome of each is a
//! `Validation`, so failures from siblings and from nested objects and
//! arrays are accumulated into one list instead of stopping at the first.
//! Within a single field the first violation wins.

use crate::core::{Calendar, SystemCalendar};
use crate::filter::coerce;
use crate::filter::context::FilterConfig;
use crate::filter::error::{ArgumentError, FieldError, FilterError, ValidationError};
use crate::rules::{ArrayRule, DateRule, Elements, ObjectRule, RuleSchema, RuleSpec, RuleType};
use chrono::SecondsFormat;
use serde_json::{Map, Value};
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Outcome of evaluating part of the tree.
pub(crate) type Checked<T> = Validation<T, NonEmptyVec<FieldError>>;

/// Filters parameter trees against rule schemas.
///
/// # Example
///
/// ```rust
/// use strainer::filter::Filter;
/// use strainer::rules::{RuleSchema, RuleSpec};
/// use serde_json::json;
///
/// let schema = RuleSchema::new()
///     .field("per_page", RuleSpec::integer().default_value(json!(20)))
///     .field("q", RuleSpec::string());
///
/// let filter = Filter::default();
/// let params = filter
///     .filter(&schema, &json!({ "q": "rust", "admin": true }))
///     .unwrap();
///
/// assert_eq!(serde_json::Value::Object(params), json!({ "per_page": 20, "q": "rust" }));
/// ```
#[derive(Clone)]
pub struct Filter {
    config: FilterConfig,
    calendar: Arc<dyn Calendar>,
}

impl Filter {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            calendar: Arc::new(SystemCalendar),
        }
    }

    /// Use `calendar` for parsing dates and resolving relative bounds.
    pub fn with_calendar(mut self, calendar: impl Calendar + 'static) -> Self {
        self.calendar = Arc::new(calendar);
        self
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Whitelist, coerce and validate `params` against `rules`.
    ///
    /// Returns only the fields named by `rules`. Fails with
    /// [`FilterError::Argument`] when `params` is not an object or a rule is
    /// unusable, and with [`FilterError::Validation`] listing every rejected
    /// field otherwise.
    pub fn filter(&self, rules: &RuleSchema, params: &Value) -> Result<Map<String, Value>, FilterError> {
        self.filter_at(rules, params, None)
    }

    /// Like [`filter`](Self::filter), reporting fields under `parent`.
    pub fn filter_under(
        &self,
        rules: &RuleSchema,
        params: &Value,
        parent: &str,
    ) -> Result<Map<String, Value>, FilterError> {
        self.filter_at(rules, params, Some(parent))
    }

    /// Load `rules` from JSON and filter `params` with them.
    pub fn filter_json(&self, rules: &Value, params: &Value) -> Result<Map<String, Value>, FilterError> {
        let rules = RuleSchema::from_json(rules)?;
        self.filter(&rules, params)
    }

    fn filter_at(
        &self,
        rules: &RuleSchema,
        params: &Value,
        parent: Option<&str>,
    ) -> Result<Map<String, Value>, FilterError> {
        let params = params
            .as_object()
            .ok_or_else(|| ArgumentError::new("params", "is not an object"))?;

        tracing::debug!(fields = rules.len(), parent, "filtering parameters");

        match self.filter_fields(rules, params, parent)? {
            Validation::Success(filtered) => {
                tracing::debug!(kept = filtered.len(), "parameters accepted");
                Ok(filtered)
            }
            Validation::Failure(errors) => {
                let errors: Vec<FieldError> = errors.iter().cloned().collect();
                tracing::debug!(errors = errors.len(), "parameters rejected");
                Err(ValidationError::new(errors).into())
            }
        }
    }

    fn filter_fields(
        &self,
        rules: &RuleSchema,
        params: &Map<String, Value>,
        parent: Option<&str>,
    ) -> Result<Checked<Map<String, Value>>, ArgumentError> {
        let mut checks = Vec::with_capacity(rules.len());

        for (name, rule) in rules.iter() {
            let path = self.config.field_path(parent, name);
            let check = self
                .evaluate(rule, params.get(name), name, &path)?
                .map(|value| value.map(|value| (name.to_string(), value)));
            checks.push(check);
        }

        Ok(Validation::all_vec(checks).map(|fields| fields.into_iter().flatten().collect()))
    }

    /// Evaluate one field. `Success(None)` leaves the field out of the
    /// output.
    fn evaluate(
        &self,
        rule: &RuleSpec,
        value: Option<&Value>,
        name: &str,
        path: &str,
    ) -> Result<Checked<Option<Value>>, ArgumentError> {
        let value = match value {
            Some(Value::Null) if rule.allow_null || matches!(rule.rule_type, RuleType::Null) => {
                return Ok(Validation::success(Some(Value::Null)));
            }
            Some(Value::Null) | None => {
                return Ok(match (&rule.default, rule.required) {
                    (Some(default), _) if value.is_none() || !rule.required => {
                        Validation::success(Some(default.clone()))
                    }
                    (_, true) => reject(path, "is required"),
                    _ => Validation::success(None),
                });
            }
            Some(value) => value,
        };

        let coerced = match self.coerce(rule, value, name, path)? {
            Validation::Success(coerced) => coerced,
            Validation::Failure(errors) => return Ok(Validation::Failure(errors)),
        };

        Ok(finish(rule, coerced, path).map(Some))
    }

    fn coerce(
        &self,
        rule: &RuleSpec,
        value: &Value,
        name: &str,
        path: &str,
    ) -> Result<Checked<Value>, ArgumentError> {
        let coerced = match &rule.rule_type {
            RuleType::Scalar => coerce::scalar(value),
            RuleType::Null => coerce::null(value),
            RuleType::Integer(bounds) => coerce::integer(value, bounds),
            RuleType::Float(bounds) => coerce::float(value, bounds),
            RuleType::Boolean => coerce::boolean(value),
            RuleType::String(length) => coerce::string(value, length),
            RuleType::Email => coerce::email(value),
            RuleType::Date(date) => self.date(date, value, path)?,
            RuleType::Array(array) => return self.array(array, value, name, path),
            RuleType::Object(object) => return self.object(rule, object, value, path),
        };

        Ok(match coerced {
            Ok(value) => Validation::success(value),
            Err(message) => reject(path, message),
        })
    }

    fn date(&self, rule: &DateRule, value: &Value, path: &str) -> Result<coerce::Coerced, ArgumentError> {
        let instant = match self.calendar.parse(value, rule.format.as_deref()) {
            Some(instant) => instant,
            None => {
                return Ok(Err(match &rule.format {
                    Some(format) => format!("invalid format, expected {}", format),
                    None => "is invalid".to_string(),
                }));
            }
        };

        if let Some(before) = &rule.before {
            if instant >= self.calendar.resolve_relative(path, before)? {
                return Ok(Err("is invalid (too late)".to_string()));
            }
        }
        if let Some(after) = &rule.after {
            if instant <= self.calendar.resolve_relative(path, after)? {
                return Ok(Err("is invalid (too early)".to_string()));
            }
        }

        Ok(Ok(if rule.parse {
            Value::String(instant.to_rfc3339_opts(SecondsFormat::Millis, true))
        } else {
            value.clone()
        }))
    }

    fn array(
        &self,
        rule: &ArrayRule,
        value: &Value,
        name: &str,
        path: &str,
    ) -> Result<Checked<Value>, ArgumentError> {
        let items = match value {
            Value::String(s) => coerce::split_list(s),
            Value::Array(items) => items.clone(),
            _ => return Ok(reject(path, "is not an array")),
        };

        if let Err(message) = coerce::element_count(items.len(), &rule.length) {
            return Ok(reject(path, message));
        }

        let elements = match &rule.elements {
            Some(elements) => elements,
            None => return Ok(Validation::success(Value::Array(items))),
        };

        let mut checks = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            // In flat mode elements are reported under the array's own name.
            let element_path = if self.config.nested_field_names {
                format!("{}[{}]", path, index)
            } else {
                name.to_string()
            };

            let check = match elements {
                // A null element without a default is coerced, so the
                // element type reports it.
                Elements::Each(element) => match self.evaluate(element, Some(item), name, &element_path)? {
                    Validation::Success(Some(value)) => Validation::success(value),
                    Validation::Success(None) => self.coerce(element, item, name, &element_path)?,
                    Validation::Failure(errors) => Validation::Failure(errors),
                },
                Elements::Attributes(schema) => match item {
                    Value::Object(fields) => self
                        .filter_fields(schema, fields, Some(&element_path))?
                        .map(Value::Object),
                    _ => reject(&element_path, "is not an object"),
                },
            };
            checks.push(check);
        }

        Ok(Validation::all_vec(checks).map(Value::Array))
    }

    fn object(
        &self,
        rule: &RuleSpec,
        object: &ObjectRule,
        value: &Value,
        path: &str,
    ) -> Result<Checked<Value>, ArgumentError> {
        let fields = match value {
            Value::Object(fields) if fields.is_empty() && rule.required => {
                return Ok(reject(path, "is required"));
            }
            Value::Object(fields) => fields,
            _ => return Ok(reject(path, "is not an object")),
        };

        if !object.require_one_of.is_empty()
            && !object.require_one_of.iter().any(|key| fields.contains_key(key))
        {
            return Ok(reject(
                path,
                format!("must include one of {}", object.require_one_of.join(", ")),
            ));
        }

        match &object.attributes {
            Some(schema) => Ok(self.filter_fields(schema, fields, Some(path))?.map(Value::Object)),
            None => Ok(Validation::success(Value::Object(Map::new()))),
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Accepted values, custom filter, then post transform.
fn finish(rule: &RuleSpec, value: Value, path: &str) -> Checked<Value> {
    if let Some(accepted) = &rule.accepted {
        if !accepted.iter().any(|entry| entry.admits(&value)) {
            let listed: Vec<String> = accepted.iter().map(ToString::to_string).collect();
            return reject(path, format!("must be one of {}", listed.join(", ")));
        }
    }

    if let Some(predicate) = &rule.filter_with {
        if !predicate.check(&value) {
            return reject(path, "is invalid");
        }
    }

    match &rule.post_transform {
        Some(transform) => match transform.apply(value) {
            Ok(value) => Validation::success(value),
            Err(message) => reject(path, message),
        },
        None => Validation::success(value),
    }
}

fn reject<T>(path: &str, message: impl Into<String>) -> Checked<T> {
    let error = FieldError::new(path, message);
    tracing::trace!(field = %error.field, reason = %error.message, "field rejected");
    Validation::fail(error)
}
