use serde_json::Number;

use crate::constant::*;
use crate::model::{display_value, permitted, TypeSpec, Value};
use crate::validation::{LocSegment, ValidationFailure};

/// Validate `value` as the single field `name` of type `type_spec`, returning the coerced value.
///
/// Coercion is lax: numeric strings become numbers, `"yes"`/`"off"` become booleans, JSON text becomes lists or records, and so on.
/// The input value is never modified.
///
/// ### Example
/// ```
/// # use ticli_builder as ticli;
/// use ticli::{check_type, TypeSpec, Value};
///
/// let height = check_type("height", &Value::from("3.5"), &TypeSpec::Float).unwrap();
/// assert_eq!(height, Value::from(3.5));
///
/// let failure = check_type("height", &Value::from("abc"), &TypeSpec::Float).unwrap_err();
/// assert_eq!(failure.errors()[0].location(), "height");
/// assert_eq!(failure.errors()[0].message(), "value is not a valid float");
/// ```
pub fn check_type(
    name: &str,
    value: &Value,
    type_spec: &TypeSpec,
) -> Result<Value, ValidationFailure> {
    coerce(value, type_spec).map_err(|failure| failure.prefixed(name))
}

/// Coerce `value` to `type_spec`; failure locations are relative to the value itself.
pub(crate) fn coerce(value: &Value, type_spec: &TypeSpec) -> Result<Value, ValidationFailure> {
    match (type_spec, value) {
        (TypeSpec::Any, _) => Ok(value.clone()),
        (TypeSpec::Optional(_), Value::Null) => Ok(Value::Null),
        (TypeSpec::Optional(inner), _) => coerce(value, inner),
        (_, Value::Null) => Err(invalid(NONE_NOT_ALLOWED)),
        (TypeSpec::Bool, _) => coerce_bool(value).ok_or_else(|| invalid(NOT_A_BOOL)),
        (TypeSpec::Int, _) => coerce_int(value).ok_or_else(|| invalid(NOT_AN_INT)),
        (TypeSpec::Float, _) => coerce_float(value).ok_or_else(|| invalid(NOT_A_FLOAT)),
        (TypeSpec::Str, _) => coerce_str(value).ok_or_else(|| invalid(NOT_A_STR)),
        (TypeSpec::Literal(choices), _) => coerce_literal(value, choices),
        (TypeSpec::List(inner), _) => coerce_list(value, inner),
        (TypeSpec::Record(fields), _) => coerce_record(value, fields),
    }
}

fn invalid(message: &str) -> ValidationFailure {
    ValidationFailure::single(Vec::<LocSegment>::new(), message)
}

fn coerce_bool(value: &Value) -> Option<Value> {
    match value {
        Value::Bool(_) => Some(value.clone()),
        Value::Number(number) => match number.as_f64() {
            Some(x) if x == 0.0 => Some(Value::Bool(false)),
            Some(x) if x == 1.0 => Some(Value::Bool(true)),
            _ => None,
        },
        Value::String(text) => {
            let text = text.trim().to_ascii_lowercase();

            if TRUE_STRINGS.contains(&text.as_str()) {
                Some(Value::Bool(true))
            } else if FALSE_STRINGS.contains(&text.as_str()) {
                Some(Value::Bool(false))
            } else {
                None
            }
        }
        _ => None,
    }
}

fn coerce_int(value: &Value) -> Option<Value> {
    match value {
        Value::Bool(b) => Some(Value::from(i64::from(*b))),
        Value::Number(number) if number.is_i64() || number.is_u64() => Some(value.clone()),
        Value::Number(number) => {
            let x = number.as_f64()?;

            if x.fract() == 0.0 && x >= i64::MIN as f64 && x < i64::MAX as f64 {
                Some(Value::from(x as i64))
            } else {
                None
            }
        }
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .map(Value::from)
                .or_else(|_| text.parse::<u64>().map(Value::from))
                .ok()
        }
        _ => None,
    }
}

fn coerce_float(value: &Value) -> Option<Value> {
    let x = match value {
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    Number::from_f64(x).map(Value::Number)
}

fn coerce_str(value: &Value) -> Option<Value> {
    match value {
        Value::String(_) => Some(value.clone()),
        Value::Number(number) => Some(Value::String(number.to_string())),
        _ => None,
    }
}

fn coerce_literal(value: &Value, choices: &[Value]) -> Result<Value, ValidationFailure> {
    let matched = choices.iter().find(|choice| {
        *choice == value
            || matches!(value, Value::String(text) if *text == display_value(choice))
    });

    match matched {
        Some(choice) => Ok(choice.clone()),
        None => Err(invalid(&format!(
            "unexpected value; permitted: {}",
            permitted(choices)
        ))),
    }
}

/// Accept JSON text wherever a structured value is expected.
fn structured(value: &Value) -> Option<Value> {
    match value {
        Value::String(text) => serde_json::from_str(text).ok(),
        _ => Some(value.clone()),
    }
}

fn coerce_list(value: &Value, inner: &TypeSpec) -> Result<Value, ValidationFailure> {
    let items = match structured(value) {
        Some(Value::Array(items)) => items,
        _ => return Err(invalid(NOT_A_LIST)),
    };
    let mut coerced = Vec::with_capacity(items.len());
    let mut failure = ValidationFailure::default();

    for (index, item) in items.iter().enumerate() {
        match coerce(item, inner) {
            Ok(item) => coerced.push(item),
            Err(error) => failure.extend(error.prefixed(index)),
        }
    }

    failure.into_result()?;
    Ok(Value::Array(coerced))
}

fn coerce_record(
    value: &Value,
    fields: &indexmap::IndexMap<String, TypeSpec>,
) -> Result<Value, ValidationFailure> {
    let object = match structured(value) {
        Some(Value::Object(object)) => object,
        _ => return Err(invalid(NOT_A_DICT)),
    };
    let mut coerced = serde_json::Map::default();
    let mut failure = ValidationFailure::default();

    for (name, type_spec) in fields {
        match object.get(name) {
            Some(field) => match coerce(field, type_spec) {
                Ok(field) => {
                    coerced.insert(name.clone(), field);
                }
                Err(error) => failure.extend(error.prefixed(LocSegment::from(name.as_str()))),
            },
            None if matches!(type_spec, TypeSpec::Optional(_) | TypeSpec::Any) => {
                coerced.insert(name.clone(), Value::Null);
            }
            None => failure.extend(ValidationFailure::single(
                [LocSegment::from(name.as_str())],
                FIELD_REQUIRED,
            )),
        }
    }

    failure.into_result()?;
    Ok(Value::Object(coerced))
}
