//! Behavioural tests for whitelisting, coercion and error reporting.

use serde_json::{json, Value};
use strainer::core::{Predicate, RuleKind};
use strainer::rules::{RuleSchema, RuleSpec};
use strainer::{rules, ArgumentError, Filter, FilterConfig, FilterError};

fn run(schema: &RuleSchema, params: Value) -> Value {
    match strainer::filter(schema, &params) {
        Ok(filtered) => Value::Object(filtered),
        Err(e) => panic!("expected success, got {}", e),
    }
}

fn single_error(schema: &RuleSchema, params: Value) -> (String, String) {
    let err = strainer::filter(schema, &params).expect_err("expected a validation error");
    let errors = err
        .validation()
        .unwrap_or_else(|| panic!("expected validation error, got {}", err))
        .errors();
    assert_eq!(errors.len(), 1, "errors: {:?}", errors);
    (errors[0].field.clone(), errors[0].message.clone())
}

fn error_of(field: &str, message: &str) -> (String, String) {
    (field.to_string(), message.to_string())
}

mod basics {
    use super::*;

    #[test]
    fn empty_rules_yield_empty_object() {
        assert_eq!(run(&rules! {}, json!({ "a": 1 })), json!({}));
    }

    #[test]
    fn empty_params_yield_empty_object() {
        assert_eq!(run(&rules! { "name" => RuleKind::String }, json!({})), json!({}));
    }

    #[test]
    fn unlisted_params_are_dropped() {
        let schema = rules! { "name" => RuleKind::String };
        assert_eq!(run(&schema, json!({ "email": "bob@email.com" })), json!({}));
        assert_eq!(
            run(&schema, json!({ "email": "bob@email.com", "name": "Bob Smith" })),
            json!({ "name": "Bob Smith" })
        );
    }

    #[test]
    fn missing_required_field() {
        let schema = rules! {
            "name" => RuleKind::String,
            "id" => RuleSpec::integer().required(),
        };
        assert_eq!(
            single_error(&schema, json!({ "email": "bob@email.com", "name": "Bob Smith" })),
            error_of("id", "is required")
        );
    }

    #[test]
    fn params_must_be_an_object() {
        let schema = rules! { "name" => RuleKind::String };
        for params in [json!(null), json!("name=bob"), json!([1]), json!(3)] {
            let err = strainer::filter(&schema, &params).unwrap_err();
            assert_eq!(err, FilterError::Argument(ArgumentError::new("params", "is not an object")));
        }
    }

    #[test]
    fn json_rules_must_be_an_object() {
        let err = Filter::default().filter_json(&json!(true), &json!({})).unwrap_err();
        assert_eq!(err.to_string(), "rules is not an object");
    }

    #[test]
    fn default_is_used_verbatim() {
        let schema = rules! { "per_page" => RuleSpec::integer().default_value(json!(20)) };
        assert_eq!(run(&schema, json!({})), json!({ "per_page": 20 }));

        let schema = rules! { "per_page" => RuleSpec::integer().default_value(json!("twenty")) };
        assert_eq!(run(&schema, json!({})), json!({ "per_page": "twenty" }));
    }

    #[test]
    fn allow_null_passes_null_through() {
        let schema = rules! { "name" => RuleSpec::string().allow_null() };
        assert_eq!(run(&schema, json!({ "name": null })), json!({ "name": null }));
    }
}

mod types {
    use super::*;

    #[test]
    fn null_type() {
        let schema = rules! {
            "user" => RuleSpec::object().required().attributes(rules! {
                "secret_password" => RuleSpec::null().required(),
            }),
        };

        assert_eq!(
            single_error(&schema, json!({ "user": { "secret_password": "P@ssw0rd" } })),
            error_of("user[secret_password]", "must be null")
        );
        assert_eq!(
            run(&schema, json!({ "user": { "secret_password": null } })),
            json!({ "user": { "secret_password": null } })
        );
    }

    #[test]
    fn integer_type() {
        let schema = rules! { "user_id" => RuleKind::Integer };
        assert_eq!(
            single_error(&schema, json!({ "user_id": "hello" })),
            error_of("user_id", "is not an integer")
        );
        assert_eq!(run(&schema, json!({ "user_id": "100" })), json!({ "user_id": 100 }));
        assert_eq!(run(&schema, json!({ "user_id": 9999 })), json!({ "user_id": 9999 }));

        let capped = rules! { "user_id" => RuleSpec::integer().min(10).max(10) };
        assert_eq!(
            single_error(&capped, json!({ "user_id": 11 })),
            error_of("user_id", "is too large (max 10)")
        );
        assert_eq!(
            single_error(&capped, json!({ "user_id": 9 })),
            error_of("user_id", "is too small (min 10)")
        );
    }

    #[test]
    fn integer_type_keeps_unsigned_values() {
        let schema = rules! { "n" => RuleKind::Integer };
        assert_eq!(
            run(&schema, json!({ "n": 9223372036854775808u64 })),
            json!({ "n": 9223372036854775808u64 })
        );
        assert_eq!(run(&schema, json!({ "n": u64::MAX })), json!({ "n": u64::MAX }));
    }

    #[test]
    fn date_bound_beyond_calendar_is_argument_error() {
        let schema = rules! { "at" => RuleSpec::date().after("100000000 weeks ago") };
        let err = strainer::filter(&schema, &json!({ "at": "2024-01-01" })).unwrap_err();
        assert_eq!(
            err,
            FilterError::Argument(ArgumentError::new(
                "at",
                "has an unrecognized date bound '100000000 weeks ago'"
            ))
        );
    }

    #[test]
    fn float_type() {
        let schema = rules! { "amount" => RuleKind::Float };
        assert_eq!(
            single_error(&schema, json!({ "amount": "hello" })),
            error_of("amount", "is not a float")
        );
        assert_eq!(run(&schema, json!({ "amount": "99.9" })), json!({ "amount": 99.9 }));
        assert_eq!(run(&schema, json!({ "amount": 88.8 })), json!({ "amount": 88.8 }));

        let capped = rules! { "amount" => RuleSpec::float().min(44.4).max(44.4) };
        assert_eq!(
            single_error(&capped, json!({ "amount": 44.6 })),
            error_of("amount", "is too large (max 44.4)")
        );
        assert_eq!(
            single_error(&capped, json!({ "amount": 44.2 })),
            error_of("amount", "is too small (min 44.4)")
        );
    }

    #[test]
    fn boolean_type() {
        let schema = rules! { "accept" => RuleKind::Boolean };
        assert_eq!(
            single_error(&schema, json!({ "accept": "hello" })),
            error_of("accept", "is not true or false")
        );

        let schema = rules! {
            "is_ok" => RuleKind::Boolean,
            "is_fine" => RuleKind::Boolean,
            "is_nice" => RuleKind::Boolean,
            "is_alright" => RuleKind::Boolean,
            "is_meh" => RuleKind::Boolean,
        };
        assert_eq!(
            run(&schema, json!({ "is_ok": 1, "is_fine": true, "is_nice": "TRUE", "is_alright": "1", "is_meh": "t" })),
            json!({ "is_ok": true, "is_fine": true, "is_nice": true, "is_alright": true, "is_meh": true })
        );
        assert_eq!(
            run(&schema, json!({ "is_ok": 0, "is_fine": false, "is_nice": "false", "is_alright": "0", "is_meh": "F" })),
            json!({ "is_ok": false, "is_fine": false, "is_nice": false, "is_alright": false, "is_meh": false })
        );
    }

    #[test]
    fn string_type() {
        let schema = rules! { "message" => RuleKind::String };
        assert_eq!(
            single_error(&schema, json!({ "message": { "text": "howdy" } })),
            error_of("message", "is not a string")
        );
        assert_eq!(
            run(&schema, json!({ "message": "hello world" })),
            json!({ "message": "hello world" })
        );

        let sized = rules! { "message" => RuleSpec::string().min_length(2).max_length(4) };
        assert_eq!(
            single_error(&sized, json!({ "message": " a " })),
            error_of("message", "is too short (min 2 characters)")
        );
        assert_eq!(
            single_error(&sized, json!({ "message": "hello" })),
            error_of("message", "is too long (max 4 characters)")
        );
    }

    #[test]
    fn email_type() {
        let schema = rules! { "email" => RuleKind::Email };
        for bad in [json!({ "text": "howdy@thing.com" }), json!("bob@email"), json!("@email.com")] {
            assert_eq!(
                single_error(&schema, json!({ "email": bad })),
                error_of("email", "is not a valid email address")
            );
        }
        for good in ["bob@email.com", "bob+spam@email.com"] {
            assert_eq!(run(&schema, json!({ "email": good })), json!({ "email": good }));
        }
    }

    #[test]
    fn scalar_type() {
        let schema = rules! { "q" => RuleKind::Scalar };
        assert_eq!(run(&schema, json!({ "q": "x" })), json!({ "q": "x" }));
        assert_eq!(run(&schema, json!({ "q": 7 })), json!({ "q": 7 }));
        assert_eq!(
            single_error(&schema, json!({ "q": [1] })),
            error_of("q", "must be a string or number")
        );
    }

    #[test]
    fn array_type() {
        let schema = rules! { "digits" => RuleKind::Array };
        assert_eq!(
            single_error(&schema, json!({ "digits": { "numbers": [1, 2, 3] } })),
            error_of("digits", "is not an array")
        );
        assert_eq!(run(&schema, json!({ "digits": [1, 2, 3] })), json!({ "digits": [1, 2, 3] }));
        assert_eq!(
            run(&schema, json!({ "digits": "1, 2,3" })),
            json!({ "digits": ["1", "2", "3"] })
        );

        let min = rules! { "digits" => RuleSpec::array().min_length(7) };
        assert_eq!(
            single_error(&min, json!({ "digits": [1, 2, 3, 4, 5, 6] })),
            error_of("digits", "has too few elements (min 7 elements)")
        );

        let max = rules! { "digits" => RuleSpec::array().max_length(7) };
        assert_eq!(
            single_error(&max, json!({ "digits": [1, 2, 3, 4, 5, 6, 7, 8, 9] })),
            error_of("digits", "has too many elements (max 7 elements)")
        );
    }

    #[test]
    fn array_elements_are_coerced() {
        let schema = rules! { "digits" => RuleSpec::array().each(RuleSpec::integer()) };
        assert_eq!(
            run(&schema, json!({ "digits": ["1", "2", "3"] })),
            json!({ "digits": [1, 2, 3] })
        );
        assert_eq!(
            single_error(&schema, json!({ "digits": ["1", "x"] })),
            error_of("digits[1]", "is not an integer")
        );
    }

    #[test]
    fn object_type() {
        let bare = rules! { "user" => RuleSpec::object() };
        assert_eq!(
            single_error(&bare, json!({ "user": "hello world" })),
            error_of("user", "is not an object")
        );

        let schema = rules! {
            "user" => RuleSpec::object().attributes(rules! { "id" => RuleKind::Integer }),
        };
        assert_eq!(run(&schema, json!({ "user": { "id": 1 } })), json!({ "user": { "id": 1 } }));

        let required = rules! { "user" => RuleSpec::object().required() };
        assert_eq!(single_error(&required, json!({ "user": {} })), error_of("user", "is required"));
    }

    #[test]
    fn object_require_one_of() {
        let schema = rules! {
            "user" => RuleSpec::object()
                .require_one_of(["username", "name"])
                .attributes(rules! {
                    "username" => RuleKind::String,
                    "name" => RuleKind::String,
                }),
        };

        assert_eq!(
            single_error(&schema, json!({ "user": { "id": 1 } })),
            error_of("user", "must include one of username, name")
        );
        assert_eq!(
            run(&schema, json!({ "user": { "id": 1, "name": "Bob" } })),
            json!({ "user": { "name": "Bob" } })
        );
    }
}

mod custom {
    use super::*;

    fn user_with(id: RuleSpec) -> RuleSchema {
        rules! { "user" => RuleSpec::object().attributes(rules! { "id" => id }) }
    }

    #[test]
    fn shorthand_filter_rejects() {
        let schema = user_with(Predicate::new(|v| v != 100).into());
        assert_eq!(
            single_error(&schema, json!({ "user": { "id": 100 } })),
            error_of("user[id]", "is invalid")
        );
    }

    #[test]
    fn long_form_filter_rejects() {
        let schema = user_with(RuleSpec::integer().filter_with(|v| v != 100));
        assert_eq!(
            single_error(&schema, json!({ "user": { "id": 100 } })),
            error_of("user[id]", "is invalid")
        );
    }

    #[test]
    fn shorthand_filter_accepts() {
        let schema = user_with(RuleSpec::custom(|v| v == 100));
        assert_eq!(
            run(&schema, json!({ "user": { "id": 100 } })),
            json!({ "user": { "id": 100 } })
        );
    }

    #[test]
    fn long_form_filter_sees_coerced_value() {
        let schema = user_with(RuleSpec::integer().filter_with(|v| v == 100));
        assert_eq!(
            run(&schema, json!({ "user": { "id": "100" } })),
            json!({ "user": { "id": 100 } })
        );
    }

    #[test]
    fn post_transform_replaces_value() {
        let schema = rules! {
            "user_id" => RuleSpec::integer()
                .post_transform(|v| json!(v.as_i64().unwrap_or_default() / 2)),
        };
        assert_eq!(run(&schema, json!({ "user_id": 100 })), json!({ "user_id": 50 }));
    }

    #[test]
    fn accepted_values_gate() {
        let schema = rules! {
            "role" => RuleSpec::string().accept(json!("admin")).accept(json!("user")),
        };
        assert_eq!(
            single_error(&schema, json!({ "role": "guest" })),
            error_of("role", "must be one of admin, user")
        );
        assert_eq!(run(&schema, json!({ "role": "user" })), json!({ "role": "user" }));
    }

    #[test]
    fn accepted_numbers_compare_by_value() {
        let rules = json!({ "ratio": { "type": "float", "acceptedValues": [1, 2] } });
        let out = Filter::default()
            .filter_json(&rules, &json!({ "ratio": "1" }))
            .unwrap();
        assert_eq!(out.get("ratio").and_then(Value::as_f64), Some(1.0));

        let schema = rules! { "ratio" => RuleSpec::float().accept(json!(1)).accept(json!(2)) };
        assert_eq!(
            single_error(&schema, json!({ "ratio": 1.5 })),
            error_of("ratio", "must be one of 1, 2")
        );
    }

    #[test]
    fn accepted_values_may_be_predicates() {
        let schema = rules! {
            "n" => RuleSpec::integer()
                .accept(json!(0))
                .accept_if(Predicate::named("even", |v| v.as_i64().is_some_and(|n| n % 2 == 0))),
        };
        assert_eq!(run(&schema, json!({ "n": "4" })), json!({ "n": 4 }));
        assert_eq!(
            single_error(&schema, json!({ "n": 3 })),
            error_of("n", "must be one of 0, even")
        );
    }
}

mod naming {
    use super::*;

    #[test]
    fn flat_names_drop_parent() {
        let schema = rules! {
            "user" => RuleSpec::object().attributes(rules! { "id" => RuleKind::Integer }),
        };
        let err = Filter::new(FilterConfig::flat())
            .filter(&schema, &json!({ "user": { "id": "hello" } }))
            .unwrap_err();
        let errors = err.validation().unwrap().errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "id");
        assert_eq!(errors[0].message, "is not an integer");
    }

    #[test]
    fn deep_nesting_builds_bracket_path() {
        let schema = rules! {
            "order" => RuleSpec::object().attributes(rules! {
                "lines" => RuleSpec::array().attributes(rules! {
                    "sku" => RuleSpec::string().required(),
                }),
            }),
        };
        assert_eq!(
            single_error(&schema, json!({ "order": { "lines": [{ "sku": "a" }, { "qty": 1 }] } })),
            error_of("order[lines][1][sku]", "is required")
        );
    }
}

mod declarative {
    use super::*;

    #[test]
    fn json_schema_matches_built_schema() {
        let rules = json!({
            "per_page": { "type": "integer", "default": 20, "max": 100 },
            "digits": { "type": "array", "attributes": { "type": "integer" } },
            "role": { "type": "string", "acceptedValues": ["admin", "user"] },
        });

        let out = Filter::default()
            .filter_json(&rules, &json!({ "digits": ["1", "2", "3"], "role": "admin", "x": 1 }))
            .unwrap();
        assert_eq!(
            Value::Object(out),
            json!({ "per_page": 20, "digits": [1, 2, 3], "role": "admin" })
        );
    }

    #[test]
    fn json_schema_errors_in_declaration_order() {
        let rules = json!({
            "z": { "type": "integer", "required": true },
            "a": { "type": "boolean" },
        });
        let err = Filter::default()
            .filter_json(&rules, &json!({ "a": "maybe" }))
            .unwrap_err();
        let fields: Vec<&str> = err
            .validation()
            .unwrap()
            .errors()
            .iter()
            .map(|e| e.field.as_str())
            .collect();
        assert_eq!(fields, vec!["z", "a"]);
    }

    #[test]
    fn json_dates_keep_raw_when_asked() {
        let rules = json!({ "on": { "type": "date", "format": "%d/%m/%Y", "parse": false } });
        let out = Filter::default()
            .filter_json(&rules, &json!({ "on": "15/01/2024" }))
            .unwrap();
        assert_eq!(out.get("on"), Some(&json!("15/01/2024")));

        let err = Filter::default()
            .filter_json(&rules, &json!({ "on": "2024-01-15" }))
            .unwrap_err();
        assert_eq!(
            err.validation().unwrap().errors()[0].message,
            "invalid format, expected %d/%m/%Y"
        );
    }

    #[test]
    fn unknown_types_check_string_or_number() {
        let rules = json!({ "x": "uuid", "y": { "type": "Integer" } });
        let out = Filter::default()
            .filter_json(&rules, &json!({ "x": "abc", "y": "7" }))
            .unwrap();
        assert_eq!(Value::Object(out), json!({ "x": "abc", "y": "7" }));

        let err = Filter::default()
            .filter_json(&rules, &json!({ "x": [1] }))
            .unwrap_err();
        assert_eq!(
            err.validation().unwrap().errors()[0].message,
            "must be a string or number"
        );
    }

    #[test]
    fn unparseable_date_is_invalid() {
        let schema = rules! { "on" => RuleKind::Date };
        assert_eq!(single_error(&schema, json!({ "on": "soon" })), error_of("on", "is invalid"));
    }
}
