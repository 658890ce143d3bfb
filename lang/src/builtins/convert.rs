use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};
use regex::Regex;
use std::rc::Rc;
use std::sync::LazyLock;

use crate::collections::{Dict, List, Set, Tuple, text};
use crate::error::RuntimeError;
use crate::protocols::Truthy;
use crate::value::{Value, ops};

/// Digits of an integer literal once the sign and base prefix are removed.
/// Single underscores may separate digits.
static INT_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z](?:_?[0-9A-Za-z])*$").expect("valid regex"));

static FLOAT_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[+-]?(?:\d(?:_?\d)*(?:\.(?:\d(?:_?\d)*)?)?|\.\d(?:_?\d)*)(?:[eE][+-]?\d(?:_?\d)*)?$",
    )
    .expect("valid regex")
});

static FLOAT_SPECIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([+-]?)(inf|infinity|nan)$").expect("valid regex"));

// ============================================================================
// Scalars
// ============================================================================

/// bool(x=False) → bool
pub fn to_bool(x: Option<&Value>) -> bool {
    x.is_some_and(Value::is_truthy)
}

/// int(x, base=10) → int
///
/// Text is parsed in `base` (0 infers it from a `0x`/`0o`/`0b` prefix),
/// floats truncate toward zero.
pub fn to_int(x: &Value, base: Option<i64>) -> Result<Value, RuntimeError> {
    let Value::Str(s) = x else {
        if base.is_some() {
            return Err(RuntimeError::type_error(
                "int() can't convert non-string with explicit base",
            ));
        }
        return match x {
            Value::Bool(b) => Ok(Value::from(i64::from(*b))),
            Value::Int(_) => Ok(x.clone()),
            Value::Float(f) => float_to_int(f.0),
            other => Err(RuntimeError::type_error(format!(
                "int() argument must be a string, a bytes-like object or a real number, not '{}'",
                other.type_name()
            ))),
        };
    };

    let base = base.unwrap_or(10);
    if base != 0 && !(2..=36).contains(&base) {
        return Err(RuntimeError::value_error(
            "int() base must be >= 2 and <= 36, or 0",
        ));
    }
    parse_int(s, base as u32).map(Value::Int).ok_or_else(|| {
        RuntimeError::value_error(format!(
            "invalid literal for int() with base {base}: {}",
            x.repr()
        ))
    })
}

fn float_to_int(f: f64) -> Result<Value, RuntimeError> {
    if f.is_nan() {
        return Err(RuntimeError::value_error(
            "cannot convert float NaN to integer",
        ));
    }
    BigInt::from_f64(f.trunc())
        .map(Value::Int)
        .ok_or_else(|| RuntimeError::overflow("cannot convert float infinity to integer"))
}

fn parse_int(literal: &str, base: u32) -> Option<BigInt> {
    let trimmed = literal.trim();
    let (negative, body) = match trimmed.as_bytes().first()? {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let prefix_base = match body.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };
    let (base, digits) = match prefix_base {
        Some(prefixed) if base == 0 || base == prefixed => {
            let rest = &body[2..];
            (prefixed, rest.strip_prefix('_').unwrap_or(rest))
        }
        _ if base == 0 => {
            // Base inference forbids leading zeros on non-zero literals
            if body.starts_with('0') && body.chars().any(|c| c != '0' && c != '_') {
                return None;
            }
            (10, body)
        }
        _ => (base, body),
    };

    if !INT_DIGITS.is_match(digits) {
        return None;
    }
    let cleaned: String = digits.chars().filter(|&c| c != '_').collect();
    let magnitude = BigInt::parse_bytes(cleaned.as_bytes(), base)?;
    Some(if negative { -magnitude } else { magnitude })
}

/// float(x=0.0) → float
pub fn to_float(x: &Value) -> Result<Value, RuntimeError> {
    match x {
        Value::Float(_) => Ok(x.clone()),
        Value::Bool(b) => Ok(Value::from(if *b { 1.0 } else { 0.0 })),
        Value::Int(n) => Ok(Value::from(ops::int_to_f64(n)?)),
        Value::Str(s) => parse_float(s).map(Value::from).ok_or_else(|| {
            RuntimeError::value_error(format!(
                "could not convert string to float: {}",
                x.repr()
            ))
        }),
        other => Err(RuntimeError::type_error(format!(
            "float() argument must be a string or a real number, not '{}'",
            other.type_name()
        ))),
    }
}

fn parse_float(literal: &str) -> Option<f64> {
    let trimmed = literal.trim();
    if let Some(captures) = FLOAT_SPECIAL.captures(trimmed) {
        let magnitude = if captures[2].eq_ignore_ascii_case("nan") {
            f64::NAN
        } else {
            f64::INFINITY
        };
        return Some(if &captures[1] == "-" { -magnitude } else { magnitude });
    }
    if !FLOAT_LITERAL.is_match(trimmed) {
        return None;
    }
    trimmed.replace('_', "").parse().ok()
}

/// str(object='') → str
pub fn to_str(object: &Value) -> Value {
    match object {
        Value::Str(_) => object.clone(),
        other => Value::from(other.to_string()),
    }
}

/// repr(obj) → str
pub fn repr(obj: &Value) -> Value {
    Value::from(obj.repr())
}

/// ord(c) → int
pub fn ord(c: &Value) -> Result<Value, RuntimeError> {
    let Value::Str(s) = c else {
        return Err(RuntimeError::type_error(format!(
            "ord() expected string of length 1, but {} found",
            c.type_name()
        )));
    };
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(Value::from(i64::from(u32::from(ch)))),
        _ => Err(RuntimeError::type_error(format!(
            "ord() expected a character, but string of length {} found",
            text::char_len(s)
        ))),
    }
}

/// chr(i) → str
pub fn chr(i: &Value) -> Result<Value, RuntimeError> {
    let out_of_range = || RuntimeError::value_error("chr() arg not in range(0x110000)");
    let code = match i {
        Value::Int(n) => n.to_i64().ok_or_else(out_of_range)?,
        other => other.as_index()?,
    };
    if !(0..=0x10FFFF).contains(&code) {
        return Err(out_of_range());
    }
    u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .map(|ch| Value::from(ch.to_string()))
        .ok_or_else(|| RuntimeError::value_error("chr() arg is a surrogate code point"))
}

// ============================================================================
// Containers
// ============================================================================

/// list(iterable=()) → new list
pub fn make_list(iterable: Option<&Value>) -> Result<Value, RuntimeError> {
    match iterable {
        Some(iterable) => Ok(Value::List(List::from_iterable(iterable)?)),
        None => Ok(Value::List(List::new())),
    }
}

/// tuple(iterable=()) → tuple (a tuple argument is returned as is)
pub fn make_tuple(iterable: Option<&Value>) -> Result<Value, RuntimeError> {
    match iterable {
        Some(iterable) => Ok(Value::Tuple(Tuple::from_iterable(iterable)?)),
        None => Ok(Value::Tuple(Tuple::new())),
    }
}

/// set(iterable=()) → new set; TypeError on unhashable members
pub fn make_set(iterable: Option<&Value>) -> Result<Value, RuntimeError> {
    match iterable {
        Some(iterable) => Ok(Value::Set(Set::from_iterable(iterable)?)),
        None => Ok(Value::Set(Set::new())),
    }
}

/// dict(iterable=(), **kwargs) → new dict; keyword pairs are applied last
pub fn make_dict(
    iterable: Option<&Value>,
    keywords: Vec<(Rc<str>, Value)>,
) -> Result<Value, RuntimeError> {
    let dict = Dict::new();
    if let Some(iterable) = iterable {
        dict.update(iterable)?;
    }
    for (name, value) in keywords {
        dict.set_item(Value::Str(name), value)?;
    }
    Ok(Value::Dict(dict))
}

// ============================================================================
// Types
// ============================================================================

/// type(object) → type discriminator
pub fn type_of(object: &Value) -> Value {
    Value::Type(object.type_tag())
}

/// isinstance(obj, classinfo) → bool
///
/// `classinfo` is a type or a (possibly nested) tuple of types.
pub fn isinstance(obj: &Value, classinfo: &Value) -> Result<bool, RuntimeError> {
    match classinfo {
        Value::Type(tag) => Ok(obj.type_tag().is_subtype_of(tag)),
        Value::Tuple(options) => {
            for option in options.values() {
                if isinstance(obj, option)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        _ => Err(RuntimeError::type_error(
            "isinstance() arg 2 must be a type, a tuple of types, or a union",
        )),
    }
}
