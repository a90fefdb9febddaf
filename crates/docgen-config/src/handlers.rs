//! Built-in type handlers and validators.
//!
//! Converters take [`Value::Strings`] and return the typed value. Validators
//! check the raw values and pass them through unchanged, so they go first in
//! a chain:
//!
//! ```
//! use docgen_config::{handler, handlers, TypeRegistry};
//!
//! let mut registry = TypeRegistry::new();
//! registry.register(
//!     "u16",
//!     [handler(handlers::validate_single_value), handler(handlers::to_uint)],
//! );
//! ```

use std::any::type_name;
use std::fmt::Display;
use std::path::PathBuf;
use std::time::Duration;

use regex::Regex;

use crate::registry::{TypeHandler, handler};
use crate::{HandlerError, Value};

/// Words accepted as `true` by [`to_bool`].
const TRUE_WORDS: &[&str] = &["1", "yes", "y", "true", "t", "on", "enable", "enabled"];

/// Words accepted as `false` by [`to_bool`].
const FALSE_WORDS: &[&str] = &["0", "no", "n", "false", "f", "off", "disable", "disabled"];

/// Unwrap raw values, failing on any other kind.
fn strings(value: Value) -> Result<Vec<String>, HandlerError> {
    match value {
        Value::Strings(v) => Ok(v),
        other => Err(format!("expected raw values, got {}", other.kind()).into()),
    }
}

fn single(value: Value) -> Result<String, HandlerError> {
    let mut values = strings(value)?;
    match values.len() {
        1 => Ok(values.remove(0)),
        n => Err(format!("must have exactly one value ({n} given)").into()),
    }
}

/// Fail unless no values were given.
pub fn validate_no_value(value: Value) -> Result<Value, HandlerError> {
    let values = strings(value)?;
    if !values.is_empty() {
        return Err(format!("takes no values ({} given)", values.len()).into());
    }
    Ok(Value::Strings(values))
}

/// Fail unless exactly one value was given.
pub fn validate_single_value(value: Value) -> Result<Value, HandlerError> {
    let values = strings(value)?;
    if values.len() != 1 {
        return Err(format!("must have exactly one value ({} given)", values.len()).into());
    }
    Ok(Value::Strings(values))
}

/// Validator that requires between `min` and `max` values (inclusive).
pub fn validate_value_limit(min: usize, max: usize) -> TypeHandler {
    handler(move |value| {
        let values = strings(value)?;
        let n = values.len();
        if n < min {
            return Err(format!("must have at least {min} values ({n} given)").into());
        }
        if n > max {
            return Err(format!("must have at most {max} values ({n} given)").into());
        }
        Ok(Value::Strings(values))
    })
}

/// Expand `${VAR}` and `${VAR:-default}` references in every value.
///
/// Fails if a referenced variable is unset and has no default.
pub fn expand_env(value: Value) -> Result<Value, HandlerError> {
    strings(value)?
        .iter()
        .map(|v| -> Result<String, HandlerError> { Ok(shellexpand::env(v)?.into_owned()) })
        .collect::<Result<Vec<_>, HandlerError>>()
        .map(Value::Strings)
}

/// Join the values with a single space.
pub fn to_string(value: Value) -> Result<Value, HandlerError> {
    Ok(Value::String(strings(value)?.join(" ")))
}

/// Pass the values through as a list.
pub fn to_strings(value: Value) -> Result<Value, HandlerError> {
    strings(value).map(Value::Strings)
}

/// Parse a boolean. A key without a value means `true`.
pub fn to_bool(value: Value) -> Result<Value, HandlerError> {
    let values = strings(value)?;
    let Some(word) = values.first() else {
        return Ok(Value::Bool(true));
    };

    let lower = word.to_lowercase();
    if TRUE_WORDS.contains(&lower.as_str()) {
        Ok(Value::Bool(true))
    } else if FALSE_WORDS.contains(&lower.as_str()) {
        Ok(Value::Bool(false))
    } else {
        Err(format!("unable to parse {word:?} as a boolean").into())
    }
}

/// Parse a single signed integer.
pub fn to_int(value: Value) -> Result<Value, HandlerError> {
    let s = single(value)?;
    s.parse::<i64>()
        .map(Value::Int)
        .map_err(|e| -> HandlerError { format!("unable to parse {s:?} as an integer: {e}").into() })
}

/// Parse a single unsigned integer.
pub fn to_uint(value: Value) -> Result<Value, HandlerError> {
    let s = single(value)?;
    s.parse::<u64>()
        .map(Value::UInt)
        .map_err(|e| -> HandlerError { format!("unable to parse {s:?} as an unsigned integer: {e}").into() })
}

/// Like [`to_int`], rejecting values outside the range of `T`.
pub fn to_int_in<T>() -> TypeHandler
where
    T: TryFrom<i64> + 'static,
{
    handler(|value| match to_int(value)? {
        Value::Int(n) if T::try_from(n).is_err() => Err(out_of_range::<T>(n)),
        converted => Ok(converted),
    })
}

/// Like [`to_uint`], rejecting values outside the range of `T`.
pub fn to_uint_in<T>() -> TypeHandler
where
    T: TryFrom<u64> + 'static,
{
    handler(|value| match to_uint(value)? {
        Value::UInt(n) if T::try_from(n).is_err() => Err(out_of_range::<T>(n)),
        converted => Ok(converted),
    })
}

fn out_of_range<T>(n: impl Display) -> HandlerError {
    format!("{n} out of range for {}", type_name::<T>()).into()
}

/// Parse a single floating point number.
pub fn to_float(value: Value) -> Result<Value, HandlerError> {
    let s = single(value)?;
    s.parse::<f64>()
        .map(Value::Float)
        .map_err(|e| -> HandlerError { format!("unable to parse {s:?} as a number: {e}").into() })
}

/// Parse every value as a signed integer.
pub fn to_ints(value: Value) -> Result<Value, HandlerError> {
    strings(value)?
        .iter()
        .map(|s| {
            s.parse::<i64>().map_err(|e| -> HandlerError {
                format!("unable to parse {s:?} as an integer: {e}").into()
            })
        })
        .collect::<Result<Vec<_>, HandlerError>>()
        .map(Value::Ints)
}

/// Join the values with a space into a path.
pub fn to_path(value: Value) -> Result<Value, HandlerError> {
    Ok(Value::Path(PathBuf::from(strings(value)?.join(" "))))
}

/// Parse a single duration such as `300ms`, `1.5s` or `1h30m`.
pub fn to_duration(value: Value) -> Result<Value, HandlerError> {
    let s = single(value)?;
    parse_duration(&s).map(Value::Duration)
}

/// Compile the values, joined with a space, as a regular expression.
pub fn to_regex(value: Value) -> Result<Value, HandlerError> {
    let pattern = strings(value)?.join(" ");
    Ok(Value::Regex(Regex::new(&pattern)?))
}

/// Parse a duration made of `<number><unit>` groups.
///
/// Units: `ns`, `us`/`µs`, `ms`, `s`, `m`, `h`. A bare `0` is accepted.
pub fn parse_duration(s: &str) -> Result<Duration, HandlerError> {
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err("empty duration".into());
    }

    let mut total = 0.0_f64;
    let mut rest = s;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| format!("missing unit in duration {s:?}"))?;
        if number_end == 0 {
            return Err(format!("invalid duration {s:?}").into());
        }
        let number: f64 = rest[..number_end]
            .parse()
            .map_err(|_| format!("invalid duration {s:?}"))?;
        rest = &rest[number_end..];

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let nanos_per_unit = match &rest[..unit_end] {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            unit => return Err(format!("unknown unit {unit:?} in duration {s:?}").into()),
        };
        rest = &rest[unit_end..];

        total += number * nanos_per_unit;
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "total is a non-negative sum of parsed groups"
    )]
    let nanos = total.round() as u64;
    Ok(Duration::from_nanos(nanos))
}
