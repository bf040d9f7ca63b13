//! Macros for literal schema construction.

/// Build a [`RuleSchema`](crate::rules::RuleSchema) from `name => rule`
/// pairs, in order.
///
/// A rule is anything convertible into a `RuleSpec`: a `RuleKind`, a
/// `Predicate`, or a `RuleSpec` itself.
///
/// # Example
///
/// ```
/// use strainer::core::RuleKind;
/// use strainer::rules::RuleSpec;
/// use strainer::rules;
///
/// let schema = rules! {
///     "name" => RuleKind::String,
///     "id" => RuleSpec::integer().required(),
///     "user" => RuleSpec::object().attributes(rules! {
///         "email" => RuleKind::Email,
///     }),
/// };
///
/// assert_eq!(schema.len(), 3);
/// ```
#[macro_export]
macro_rules! rules {
    () => {
        $crate::rules::RuleSchema::new()
    };
    ($($name:expr => $rule:expr),+ $(,)?) => {
        $crate::rules::RuleSchema::new()
            $(.field($name, $rule))+
    };
}
