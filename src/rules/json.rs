//! Loading schemas from JSON.
//!
//! Declarative schemas can only carry literals: predicates and transforms
//! are attached in code after loading.

use crate::core::RuleKind;
use crate::filter::ArgumentError;
use crate::rules::schema::RuleSchema;
use crate::rules::spec::{Accepted, RuleSpec};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Keys recognised in a rule object.
const OPTION_KEYS: [&str; 20] = [
    "type",
    "required",
    "default",
    "allowNull",
    "allow_null",
    "min",
    "max",
    "minLength",
    "min_length",
    "maxLength",
    "max_length",
    "format",
    "before",
    "after",
    "parse",
    "acceptedValues",
    "accepted_values",
    "attributes",
    "requireOneOf",
    "require_one_of",
];

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawRule {
    #[serde(rename = "type")]
    kind: Option<String>,
    required: bool,
    default: Option<Value>,
    #[serde(alias = "allow_null")]
    allow_null: bool,
    min: Option<f64>,
    max: Option<f64>,
    #[serde(alias = "min_length")]
    min_length: Option<usize>,
    #[serde(alias = "max_length")]
    max_length: Option<usize>,
    format: Option<String>,
    before: Option<String>,
    after: Option<String>,
    parse: Option<bool>,
    #[serde(alias = "accepted_values")]
    accepted_values: Option<Vec<Value>>,
    attributes: Option<Value>,
    #[serde(alias = "require_one_of")]
    require_one_of: Option<Vec<String>>,
}

impl RuleSchema {
    /// Load a schema from a JSON object of `field -> rule`.
    ///
    /// A rule is a type tag string or an object of rule options.
    ///
    /// # Example
    ///
    /// ```rust
    /// use strainer::rules::RuleSchema;
    /// use serde_json::json;
    ///
    /// let schema = RuleSchema::from_json(&json!({
    ///     "per_page": { "type": "integer", "default": 20, "max": 100 },
    ///     "q": "string",
    /// }))
    /// .unwrap();
    /// assert!(schema.contains("per_page"));
    ///
    /// let err = RuleSchema::from_json(&json!(["q"])).unwrap_err();
    /// assert_eq!(err.to_string(), "rules is not an object");
    /// ```
    pub fn from_json(rules: &Value) -> Result<RuleSchema, ArgumentError> {
        let rules = rules
            .as_object()
            .ok_or_else(|| ArgumentError::new("rules", "is not an object"))?;
        schema_from_map(rules, None)
    }
}

fn schema_from_map(rules: &Map<String, Value>, parent: Option<&str>) -> Result<RuleSchema, ArgumentError> {
    let mut schema = RuleSchema::new();
    for (name, rule) in rules {
        let path = match parent {
            Some(parent) => format!("{}[{}]", parent, name),
            None => name.clone(),
        };
        schema.insert(name.as_str(), spec_from_value(rule, &path)?);
    }
    Ok(schema)
}

fn spec_from_value(rule: &Value, path: &str) -> Result<RuleSpec, ArgumentError> {
    match rule {
        Value::String(tag) => Ok(RuleSpec::from(parse_kind(tag, path))),
        Value::Object(_) => {
            let raw = RawRule::deserialize(rule)
                .map_err(|e| ArgumentError::new(path, format!("has an invalid rule: {}", e)))?;
            spec_from_raw(raw, path)
        }
        _ => Err(ArgumentError::new(path, "is not a type or rule object")),
    }
}

/// Tags naming no known kind fall back to the string-or-number rule.
fn parse_kind(tag: &str, path: &str) -> RuleKind {
    tag.parse().unwrap_or_else(|err| {
        tracing::debug!(field = path, %err, "treating rule as string or number");
        RuleKind::Scalar
    })
}

fn spec_from_raw(raw: RawRule, path: &str) -> Result<RuleSpec, ArgumentError> {
    let kind = match raw.kind.as_deref() {
        Some(tag) => parse_kind(tag, path),
        None => RuleKind::Scalar,
    };

    let mut spec = RuleSpec::from(kind);
    if raw.required {
        spec = spec.required();
    }
    if raw.allow_null {
        spec = spec.allow_null();
    }
    if let Some(default) = raw.default {
        spec = spec.default_value(default);
    }
    if let Some(min) = raw.min {
        spec = spec.min(min);
    }
    if let Some(max) = raw.max {
        spec = spec.max(max);
    }
    if let Some(min) = raw.min_length {
        spec = spec.min_length(min);
    }
    if let Some(max) = raw.max_length {
        spec = spec.max_length(max);
    }
    if let Some(format) = raw.format {
        spec = spec.format(format);
    }
    if let Some(before) = raw.before {
        spec = spec.before(before);
    }
    if let Some(after) = raw.after {
        spec = spec.after(after);
    }
    if raw.parse == Some(false) {
        spec = spec.keep_raw();
    }
    if let Some(accepted) = raw.accepted_values {
        spec = spec.accepted_values(accepted.into_iter().map(Accepted::Literal));
    }
    if let Some(keys) = raw.require_one_of {
        spec = spec.require_one_of(keys);
    }
    if let Some(attributes) = raw.attributes {
        spec = attach_attributes(spec, kind, &attributes, path)?;
    }
    Ok(spec)
}

fn attach_attributes(
    spec: RuleSpec,
    kind: RuleKind,
    attributes: &Value,
    path: &str,
) -> Result<RuleSpec, ArgumentError> {
    match (kind, attributes) {
        (RuleKind::Array, Value::String(_)) => Ok(spec.each(spec_from_value(attributes, path)?)),
        (RuleKind::Array, Value::Object(map)) if is_element_rule(map) => {
            Ok(spec.each(spec_from_value(attributes, path)?))
        }
        (RuleKind::Array | RuleKind::Object, Value::Object(map)) => {
            Ok(spec.attributes(schema_from_map(map, Some(path))?))
        }
        (RuleKind::Array | RuleKind::Object, _) => {
            Err(ArgumentError::new(path, "has attributes that are not an object"))
        }
        _ => Ok(spec),
    }
}

/// `{"type": "integer"}` describes elements; `{"type": "string", "id": ...}`
/// is a schema that happens to have a field called `type`.
fn is_element_rule(map: &Map<String, Value>) -> bool {
    map.get("type").is_some_and(Value::is_string)
        && map.keys().all(|key| OPTION_KEYS.contains(&key.as_str()))
}
