//! Coercion of scalar values.
//!
//! Each function takes the raw input and returns the canonical value, or
//! the message reported against the field.

use crate::rules::{Bounds, LengthBounds};
use regex::Regex;
use serde_json::{Number, Value};
use std::sync::OnceLock;

pub(crate) type Coerced = Result<Value, String>;

const TRUE_WORDS: [&str; 3] = ["true", "1", "t"];
const FALSE_WORDS: [&str; 3] = ["false", "0", "f"];

pub(crate) fn null(value: &Value) -> Coerced {
    match value {
        Value::Null => Ok(Value::Null),
        _ => Err("must be null".to_string()),
    }
}

/// Strings and integers pass through untouched.
pub(crate) fn scalar(value: &Value) -> Coerced {
    match value {
        Value::String(_) => Ok(value.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
        _ => Err("must be a string or number".to_string()),
    }
}

pub(crate) fn integer(value: &Value, bounds: &Bounds) -> Coerced {
    let n = as_integer(value).ok_or_else(|| "is not an integer".to_string())?;
    let magnitude = n.as_f64().ok_or_else(|| "is not an integer".to_string())?;
    check_bounds(magnitude, bounds)?;
    Ok(Value::Number(n))
}

/// JSON integers pass through unchanged, including those above `i64::MAX`.
fn as_integer(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.clone()),
        // `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
        Value::Number(n) => n
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| Number::from(f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .map(Number::from)
                .or_else(|_| s.parse::<u64>().map(Number::from))
                .ok()
        }
        _ => None,
    }
}

pub(crate) fn float(value: &Value, bounds: &Bounds) -> Coerced {
    let f = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
    .ok_or_else(|| "is not a float".to_string())?;

    check_bounds(f, bounds)?;
    Number::from_f64(f)
        .map(Value::Number)
        .ok_or_else(|| "is not a float".to_string())
}

fn check_bounds(n: f64, bounds: &Bounds) -> Result<(), String> {
    if let Some(max) = bounds.max.filter(|max| n > *max) {
        return Err(format!("is too large (max {})", max));
    }
    if let Some(min) = bounds.min.filter(|min| n < *min) {
        return Err(format!("is too small (min {})", min));
    }
    Ok(())
}

/// `1`, `true`, `"t"`... become `true`; `0`, `false`, `"F"`... become
/// `false`. Matching is case-insensitive.
pub(crate) fn boolean(value: &Value) -> Coerced {
    let word = match value {
        Value::Bool(b) => return Ok(Value::Bool(*b)),
        // Whole floats read as integers: `1.0` is "1".
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => f.to_string(),
            _ => n.to_string(),
        },
        Value::String(s) => s.to_lowercase(),
        _ => return Err("is not true or false".to_string()),
    };

    if TRUE_WORDS.contains(&word.as_str()) {
        Ok(Value::Bool(true))
    } else if FALSE_WORDS.contains(&word.as_str()) {
        Ok(Value::Bool(false))
    } else {
        Err("is not true or false".to_string())
    }
}

/// Numbers and booleans are stringified; length is measured on the trimmed
/// text but the untrimmed text is kept.
pub(crate) fn string(value: &Value, length: &LengthBounds) -> Coerced {
    let s = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return Err("is not a string".to_string()),
    };

    let len = s.trim().chars().count();
    if let Some(min) = length.min.filter(|min| len < *min) {
        return Err(format!("is too short (min {} characters)", min));
    }
    if let Some(max) = length.max.filter(|max| len > *max) {
        return Err(format!("is too long (max {} characters)", max));
    }
    Ok(Value::String(s))
}

pub(crate) fn email(value: &Value) -> Coerced {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(
            r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
        )
        .expect("email pattern is a valid regex")
    });

    match value {
        Value::String(s) if regex.is_match(s) => Ok(value.clone()),
        _ => Err("is not a valid email address".to_string()),
    }
}

/// Split a comma separated string into trimmed string elements.
pub(crate) fn split_list(s: &str) -> Vec<Value> {
    s.split(',')
        .map(|part| Value::String(part.trim().to_string()))
        .collect()
}

pub(crate) fn element_count(len: usize, length: &LengthBounds) -> Result<(), String> {
    if let Some(min) = length.min.filter(|min| len < *min) {
        return Err(format!("has too few elements (min {} elements)", min));
    }
    if let Some(max) = length.max.filter(|max| len > *max) {
        return Err(format!("has too many elements (max {} elements)", max));
    }
    Ok(())
}
