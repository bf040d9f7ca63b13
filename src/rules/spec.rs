//! Rule for a single field.

use crate::core::{Predicate, RuleKind, Transform};
use crate::rules::schema::RuleSchema;
use serde_json::Value;

/// Inclusive numeric bounds for `integer` and `float` rules.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Inclusive length bounds: characters for strings, elements for arrays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LengthBounds {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DateRule {
    /// chrono strftime format the input must match.
    pub format: Option<String>,
    /// The date must be strictly before this bound.
    pub before: Option<String>,
    /// The date must be strictly after this bound.
    pub after: Option<String>,
    /// Store the parsed instant (`true`) or the raw input (`false`).
    pub parse: bool,
}

impl Default for DateRule {
    fn default() -> Self {
        Self {
            format: None,
            before: None,
            after: None,
            parse: true,
        }
    }
}

/// How the elements of an array are filtered.
#[derive(Clone, Debug)]
pub enum Elements {
    /// Every element is filtered by the same field rule.
    Each(Box<RuleSpec>),
    /// Every element must be an object filtered by the schema.
    Attributes(RuleSchema),
}

#[derive(Clone, Debug, Default)]
pub struct ArrayRule {
    pub length: LengthBounds,
    pub elements: Option<Elements>,
}

#[derive(Clone, Debug, Default)]
pub struct ObjectRule {
    /// Without attributes every key of the object is dropped.
    pub attributes: Option<RuleSchema>,
    pub require_one_of: Vec<String>,
}

/// Type of a rule together with the options only that type understands.
#[derive(Clone, Debug)]
pub enum RuleType {
    Scalar,
    Null,
    Integer(Bounds),
    Float(Bounds),
    Boolean,
    String(LengthBounds),
    Email,
    Date(DateRule),
    Array(ArrayRule),
    Object(ObjectRule),
}

impl RuleType {
    pub fn kind(&self) -> RuleKind {
        match self {
            Self::Scalar => RuleKind::Scalar,
            Self::Null => RuleKind::Null,
            Self::Integer(_) => RuleKind::Integer,
            Self::Float(_) => RuleKind::Float,
            Self::Boolean => RuleKind::Boolean,
            Self::String(_) => RuleKind::String,
            Self::Email => RuleKind::Email,
            Self::Date(_) => RuleKind::Date,
            Self::Array(_) => RuleKind::Array,
            Self::Object(_) => RuleKind::Object,
        }
    }
}

impl From<RuleKind> for RuleType {
    fn from(kind: RuleKind) -> Self {
        match kind {
            RuleKind::Scalar => Self::Scalar,
            RuleKind::Null => Self::Null,
            RuleKind::Integer => Self::Integer(Bounds::default()),
            RuleKind::Float => Self::Float(Bounds::default()),
            RuleKind::Boolean => Self::Boolean,
            RuleKind::String => Self::String(LengthBounds::default()),
            RuleKind::Email => Self::Email,
            RuleKind::Date => Self::Date(DateRule::default()),
            RuleKind::Array => Self::Array(ArrayRule::default()),
            RuleKind::Object => Self::Object(ObjectRule::default()),
        }
    }
}

/// One entry of an accepted-values list.
#[derive(Clone, Debug)]
pub enum Accepted {
    Literal(Value),
    Matches(Predicate),
}

impl Accepted {
    /// Numbers compare by value, so `1` admits `1.0`.
    pub fn admits(&self, value: &Value) -> bool {
        match self {
            Accepted::Literal(Value::Number(literal)) => match value {
                Value::Number(n) if literal.is_f64() || n.is_f64() => literal.as_f64() == n.as_f64(),
                Value::Number(n) => literal == n,
                _ => false,
            },
            Accepted::Literal(literal) => literal == value,
            Accepted::Matches(predicate) => predicate.check(value),
        }
    }
}

impl std::fmt::Display for Accepted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Accepted::Literal(Value::String(s)) => f.write_str(s),
            Accepted::Literal(other) => write!(f, "{}", other),
            Accepted::Matches(predicate) => write!(f, "{}", predicate),
        }
    }
}

/// Validation and coercion policy for one field.
///
/// Built with a type constructor followed by modifiers. Modifiers that do
/// not apply to the rule's type are ignored.
///
/// # Example
///
/// ```rust
/// use strainer::rules::RuleSpec;
/// use serde_json::json;
///
/// let per_page = RuleSpec::integer().min(1).max(100).default_value(json!(20));
/// let role = RuleSpec::string().accept(json!("admin")).accept(json!("user"));
/// let id = RuleSpec::custom(|v| v != 100);
/// # let _ = (per_page, role, id);
/// ```
#[derive(Clone, Debug)]
pub struct RuleSpec {
    pub(crate) rule_type: RuleType,
    pub(crate) required: bool,
    pub(crate) default: Option<Value>,
    pub(crate) allow_null: bool,
    pub(crate) accepted: Option<Vec<Accepted>>,
    pub(crate) filter_with: Option<Predicate>,
    pub(crate) post_transform: Option<Transform>,
}

impl RuleSpec {
    pub fn new(rule_type: RuleType) -> Self {
        Self {
            rule_type,
            required: false,
            default: None,
            allow_null: false,
            accepted: None,
            filter_with: None,
            post_transform: None,
        }
    }

    /// Value must already be a string or an integer.
    pub fn scalar() -> Self {
        Self::new(RuleType::Scalar)
    }

    /// Value must be `null`.
    pub fn null() -> Self {
        Self::new(RuleType::Null)
    }

    pub fn integer() -> Self {
        Self::new(RuleType::Integer(Bounds::default()))
    }

    pub fn float() -> Self {
        Self::new(RuleType::Float(Bounds::default()))
    }

    pub fn boolean() -> Self {
        Self::new(RuleType::Boolean)
    }

    pub fn string() -> Self {
        Self::new(RuleType::String(LengthBounds::default()))
    }

    pub fn email() -> Self {
        Self::new(RuleType::Email)
    }

    pub fn date() -> Self {
        Self::new(RuleType::Date(DateRule::default()))
    }

    pub fn array() -> Self {
        Self::new(RuleType::Array(ArrayRule::default()))
    }

    pub fn object() -> Self {
        Self::new(RuleType::Object(ObjectRule::default()))
    }

    /// Shorthand for a scalar rule checked by a custom predicate.
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::scalar().filter_with(predicate)
    }

    pub fn kind(&self) -> RuleKind {
        self.rule_type.kind()
    }

    pub fn rule_type(&self) -> &RuleType {
        &self.rule_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Value stored verbatim when the field is absent.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn allow_null(mut self) -> Self {
        self.allow_null = true;
        self
    }

    /// Lower bound for `integer` and `float`.
    pub fn min(mut self, min: impl Into<f64>) -> Self {
        if let RuleType::Integer(bounds) | RuleType::Float(bounds) = &mut self.rule_type {
            bounds.min = Some(min.into());
        }
        self
    }

    /// Upper bound for `integer` and `float`.
    pub fn max(mut self, max: impl Into<f64>) -> Self {
        if let RuleType::Integer(bounds) | RuleType::Float(bounds) = &mut self.rule_type {
            bounds.max = Some(max.into());
        }
        self
    }

    /// Minimum trimmed length of a `string` or element count of an `array`.
    pub fn min_length(mut self, min: usize) -> Self {
        if let Some(length) = self.length_bounds_mut() {
            length.min = Some(min);
        }
        self
    }

    /// Maximum trimmed length of a `string` or element count of an `array`.
    pub fn max_length(mut self, max: usize) -> Self {
        if let Some(length) = self.length_bounds_mut() {
            length.max = Some(max);
        }
        self
    }

    fn length_bounds_mut(&mut self) -> Option<&mut LengthBounds> {
        match &mut self.rule_type {
            RuleType::String(length) => Some(length),
            RuleType::Array(array) => Some(&mut array.length),
            _ => None,
        }
    }

    /// chrono strftime format a `date` must match.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        if let RuleType::Date(date) = &mut self.rule_type {
            date.format = Some(format.into());
        }
        self
    }

    /// A `date` must be earlier than this bound (absolute or relative).
    pub fn before(mut self, bound: impl Into<String>) -> Self {
        if let RuleType::Date(date) = &mut self.rule_type {
            date.before = Some(bound.into());
        }
        self
    }

    /// A `date` must be later than this bound (absolute or relative).
    pub fn after(mut self, bound: impl Into<String>) -> Self {
        if let RuleType::Date(date) = &mut self.rule_type {
            date.after = Some(bound.into());
        }
        self
    }

    /// Store a valid `date` as given instead of its normalized instant.
    pub fn keep_raw(mut self) -> Self {
        if let RuleType::Date(date) = &mut self.rule_type {
            date.parse = false;
        }
        self
    }

    /// Nested schema for an `object`, or for each object element of an
    /// `array`.
    pub fn attributes(mut self, schema: RuleSchema) -> Self {
        match &mut self.rule_type {
            RuleType::Object(object) => object.attributes = Some(schema),
            RuleType::Array(array) => array.elements = Some(Elements::Attributes(schema)),
            _ => {}
        }
        self
    }

    /// Rule applied to every element of an `array`.
    pub fn each(mut self, element: RuleSpec) -> Self {
        if let RuleType::Array(array) = &mut self.rule_type {
            array.elements = Some(Elements::Each(Box::new(element)));
        }
        self
    }

    /// At least one of `keys` must be present in an `object`.
    pub fn require_one_of<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        if let RuleType::Object(object) = &mut self.rule_type {
            object.require_one_of = keys.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Add a literal to the accepted-values list.
    pub fn accept(mut self, literal: Value) -> Self {
        self.accepted
            .get_or_insert_with(Vec::new)
            .push(Accepted::Literal(literal));
        self
    }

    /// Add a predicate to the accepted-values list.
    pub fn accept_if(mut self, predicate: Predicate) -> Self {
        self.accepted
            .get_or_insert_with(Vec::new)
            .push(Accepted::Matches(predicate));
        self
    }

    /// Replace the accepted-values list.
    pub fn accepted_values(mut self, accepted: impl IntoIterator<Item = Accepted>) -> Self {
        self.accepted = Some(accepted.into_iter().collect());
        self
    }

    /// Reject the coerced value unless `predicate` holds.
    pub fn filter_with<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.filter_with = Some(Predicate::new(predicate));
        self
    }

    /// Map the checked value to the value stored in the output.
    pub fn post_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.post_transform = Some(Transform::new(transform));
        self
    }

    /// Like [`post_transform`](Self::post_transform), but `Err(message)`
    /// rejects the field with that message.
    pub fn try_post_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.post_transform = Some(Transform::fallible(transform));
        self
    }
}

impl From<RuleKind> for RuleSpec {
    fn from(kind: RuleKind) -> Self {
        RuleSpec::new(kind.into())
    }
}

impl From<Predicate> for RuleSpec {
    fn from(predicate: Predicate) -> Self {
        let mut spec = RuleSpec::scalar();
        spec.filter_with = Some(predicate);
        spec
    }
}
