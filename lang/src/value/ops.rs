//! Arithmetic and ordering over values.
//!
//! Booleans promote to integers and integers to floats when the operands
//! are mixed. Integer arithmetic never overflows; converting an integer
//! too large for a double is an `OverflowError`.

use num_bigint::BigInt;
use num_traits::{FromPrimitive, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;

use super::Value;
use crate::collections::{List, Tuple};
use crate::error::RuntimeError;
use crate::protocols::Comparable;

enum Number {
    Int(BigInt),
    Float(f64),
}

fn number(value: &Value) -> Option<Number> {
    match value {
        Value::Bool(b) => Some(Number::Int(BigInt::from(u8::from(*b)))),
        Value::Int(n) => Some(Number::Int(n.clone())),
        Value::Float(f) => Some(Number::Float(f.0)),
        _ => None,
    }
}

/// Converts an integer to the nearest double, failing when it has no
/// finite representation.
pub fn int_to_f64(n: &BigInt) -> Result<f64, RuntimeError> {
    match n.to_f64() {
        Some(f) if f.is_finite() => Ok(f),
        _ => Err(RuntimeError::overflow("int too large to convert to float")),
    }
}

fn as_f64(n: &Number) -> Result<f64, RuntimeError> {
    match n {
        Number::Int(i) => int_to_f64(i),
        Number::Float(f) => Ok(*f),
    }
}

enum Pair {
    Ints(BigInt, BigInt),
    Floats(f64, f64),
}

fn promote(a: &Value, b: &Value) -> Result<Option<Pair>, RuntimeError> {
    let (Some(x), Some(y)) = (number(a), number(b)) else {
        return Ok(None);
    };
    Ok(Some(match (x, y) {
        (Number::Int(x), Number::Int(y)) => Pair::Ints(x, y),
        (x, y) => Pair::Floats(as_f64(&x)?, as_f64(&y)?),
    }))
}

fn unsupported(op: &str, a: &Value, b: &Value) -> RuntimeError {
    RuntimeError::type_error(format!(
        "unsupported operand type(s) for {op}: '{}' and '{}'",
        a.type_name(),
        b.type_name()
    ))
}

/// `a + b`: numeric addition or concatenation of str, list and tuple.
pub fn add(a: &Value, b: &Value) -> Result<Value, RuntimeError> {
    if let Some(pair) = promote(a, b)? {
        return Ok(match pair {
            Pair::Ints(x, y) => Value::Int(x + y),
            Pair::Floats(x, y) => Value::float(x + y),
        });
    }
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => Ok(Value::from(format!("{x}{y}"))),
        (Value::List(x), Value::List(y)) => {
            let mut items = x.snapshot();
            items.append(y.snapshot());
            Ok(Value::List(List::from_vector(items)))
        }
        (Value::Tuple(x), Value::Tuple(y)) => {
            let mut items = x.values().clone();
            items.append(y.values().clone());
            Ok(Value::Tuple(Tuple::from_vector(items)))
        }
        (Value::Str(_) | Value::List(_) | Value::Tuple(_), _) => {
            Err(RuntimeError::type_error(format!(
                "can only concatenate {} (not \"{}\") to {}",
                a.type_name(),
                b.type_name(),
                a.type_name()
            )))
        }
        _ => Err(unsupported("+", a, b)),
    }
}

pub fn sub(a: &Value, b: &Value) -> Result<Value, RuntimeError> {
    match promote(a, b)? {
        Some(Pair::Ints(x, y)) => Ok(Value::Int(x - y)),
        Some(Pair::Floats(x, y)) => Ok(Value::float(x - y)),
        None => Err(unsupported("-", a, b)),
    }
}

/// `a * b`: numeric product or repetition of a sequence by an integer.
pub fn mul(a: &Value, b: &Value) -> Result<Value, RuntimeError> {
    if let Some(pair) = promote(a, b)? {
        return Ok(match pair {
            Pair::Ints(x, y) => Value::Int(x * y),
            Pair::Floats(x, y) => Value::float(x * y),
        });
    }
    match (a, b) {
        (sequence @ (Value::Str(_) | Value::List(_) | Value::Tuple(_)), count)
        | (count, sequence @ (Value::Str(_) | Value::List(_) | Value::Tuple(_)))
            if matches!(count, Value::Int(_) | Value::Bool(_)) =>
        {
            repeat(sequence, count)
        }
        (Value::Str(_) | Value::List(_) | Value::Tuple(_), _)
        | (_, Value::Str(_) | Value::List(_) | Value::Tuple(_)) => {
            let other = if matches!(a, Value::Str(_) | Value::List(_) | Value::Tuple(_)) {
                b
            } else {
                a
            };
            Err(RuntimeError::type_error(format!(
                "can't multiply sequence by non-int of type '{}'",
                other.type_name()
            )))
        }
        _ => Err(unsupported("*", a, b)),
    }
}

fn repeat(sequence: &Value, count: &Value) -> Result<Value, RuntimeError> {
    let times = count
        .as_bigint()
        .map(|n| if n.is_negative() { 0 } else { n.to_usize().unwrap_or(usize::MAX) })
        .unwrap_or(0);
    let len = match sequence {
        Value::Str(s) => s.len(),
        Value::List(list) => list.len(),
        Value::Tuple(tuple) => tuple.len(),
        _ => 0,
    };
    if len.checked_mul(times).is_none() {
        return Err(RuntimeError::overflow("repeated sequence is too long"));
    }
    Ok(match sequence {
        Value::Str(s) => Value::from(s.repeat(times)),
        Value::List(list) => {
            let items = list.snapshot();
            Value::list((0..times).flat_map(|_| items.iter().cloned()))
        }
        Value::Tuple(tuple) => {
            let items = tuple.values();
            Value::tuple((0..times).flat_map(|_| items.iter().cloned()))
        }
        other => other.clone(),
    })
}

/// `a / b`: always a float.
pub fn truediv(a: &Value, b: &Value) -> Result<Value, RuntimeError> {
    let (x, y) = match promote(a, b)? {
        Some(Pair::Ints(x, y)) => {
            if y.is_zero() {
                return Err(RuntimeError::zero_division("division by zero"));
            }
            (int_to_f64(&x)?, int_to_f64(&y)?)
        }
        Some(Pair::Floats(x, y)) => {
            if y == 0.0 {
                return Err(RuntimeError::zero_division("float division by zero"));
            }
            (x, y)
        }
        None => return Err(unsupported("/", a, b)),
    };
    Ok(Value::float(x / y))
}

/// Quotient and remainder with the quotient rounded towards negative
/// infinity, so the remainder takes the divisor's sign.
fn floor_divmod(x: &BigInt, y: &BigInt) -> (BigInt, BigInt) {
    let mut quotient = x / y;
    let mut remainder = x % y;
    if !remainder.is_zero() && (remainder.is_negative() != y.is_negative()) {
        quotient -= 1;
        remainder += y;
    }
    (quotient, remainder)
}

fn float_mod(x: f64, y: f64) -> f64 {
    let remainder = x % y;
    if remainder == 0.0 {
        0.0f64.copysign(y)
    } else if (remainder < 0.0) != (y < 0.0) {
        remainder + y
    } else {
        remainder
    }
}

/// `a // b`
pub fn floordiv(a: &Value, b: &Value) -> Result<Value, RuntimeError> {
    match promote(a, b)? {
        Some(Pair::Ints(x, y)) => {
            if y.is_zero() {
                return Err(RuntimeError::zero_division("integer division or modulo by zero"));
            }
            Ok(Value::Int(floor_divmod(&x, &y).0))
        }
        Some(Pair::Floats(x, y)) => {
            if y == 0.0 {
                return Err(RuntimeError::zero_division("float floor division by zero"));
            }
            Ok(Value::float(((x - float_mod(x, y)) / y).round()))
        }
        None => Err(unsupported("//", a, b)),
    }
}

/// `a % b`
pub fn modulo(a: &Value, b: &Value) -> Result<Value, RuntimeError> {
    match promote(a, b)? {
        Some(Pair::Ints(x, y)) => {
            if y.is_zero() {
                return Err(RuntimeError::zero_division("integer modulo by zero"));
            }
            Ok(Value::Int(floor_divmod(&x, &y).1))
        }
        Some(Pair::Floats(x, y)) => {
            if y == 0.0 {
                return Err(RuntimeError::zero_division("float modulo"));
            }
            Ok(Value::float(float_mod(x, y)))
        }
        None => Err(unsupported("%", a, b)),
    }
}

/// `-a`
pub fn neg(a: &Value) -> Result<Value, RuntimeError> {
    match number(a) {
        Some(Number::Int(n)) => Ok(Value::Int(-n)),
        Some(Number::Float(f)) => Ok(Value::float(-f)),
        None => Err(RuntimeError::type_error(format!(
            "bad operand type for unary -: '{}'",
            a.type_name()
        ))),
    }
}

/// Exact comparison of an integer with a float, without rounding the
/// integer. `None` when the float is NaN.
fn compare_int_float(n: &BigInt, f: f64) -> Option<Ordering> {
    if f.is_nan() {
        return None;
    }
    if f.is_infinite() {
        return Some(if f > 0.0 { Ordering::Less } else { Ordering::Greater });
    }
    let floor = f.floor();
    let whole = BigInt::from_f64(floor)?;
    Some(match n.cmp(&whole) {
        Ordering::Equal if f != floor => Ordering::Less,
        ordering => ordering,
    })
}

fn compare_numbers(a: &Value, b: &Value) -> Option<Option<Ordering>> {
    let ordering = match (number(a)?, number(b)?) {
        (Number::Int(x), Number::Int(y)) => Some(x.cmp(&y)),
        (Number::Float(x), Number::Float(y)) => x.partial_cmp(&y),
        (Number::Int(x), Number::Float(y)) => compare_int_float(&x, y),
        (Number::Float(x), Number::Int(y)) => compare_int_float(&y, x).map(Ordering::reverse),
    };
    Some(ordering)
}

/// Numeric equality across bool, int and float. `None` when either side
/// is not a number.
pub(crate) fn numeric_eq(a: &Value, b: &Value) -> Option<bool> {
    compare_numbers(a, b).map(|ordering| ordering == Some(Ordering::Equal))
}

fn compare_sequences<'a>(
    a: impl Iterator<Item = &'a Value>,
    b: impl Iterator<Item = &'a Value>,
    len_a: usize,
    len_b: usize,
) -> Result<Option<Ordering>, RuntimeError> {
    for (x, y) in a.zip(b) {
        if x.is(y) || x == y {
            continue;
        }
        return x.py_cmp(y);
    }
    Ok(Some(len_a.cmp(&len_b)))
}

impl Comparable for Value {
    /// Ordering between numbers, between texts (by code point) and
    /// lexicographically between lists or tuples. `Ok(None)` means the
    /// operands are unordered (NaN involved).
    fn py_cmp(&self, other: &Value) -> Result<Option<Ordering>, RuntimeError> {
        if let Some(ordering) = compare_numbers(self, other) {
            return Ok(ordering);
        }
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
            (Value::List(a), Value::List(b)) => {
                let (x, y) = (a.snapshot(), b.snapshot());
                compare_sequences(x.iter(), y.iter(), x.len(), y.len())
            }
            (Value::Tuple(a), Value::Tuple(b)) => compare_sequences(
                a.values().iter(),
                b.values().iter(),
                a.len(),
                b.len(),
            ),
            (Value::Set(a), Value::Set(b)) => Ok(if a.members_equal(b) {
                Some(Ordering::Equal)
            } else if a.is_subset(b) {
                Some(Ordering::Less)
            } else if b.is_subset(a) {
                Some(Ordering::Greater)
            } else {
                None
            }),
            _ => Err(RuntimeError::type_error(format!(
                "'<' not supported between instances of '{}' and '{}'",
                self.type_name(),
                other.type_name()
            ))),
        }
    }
}

/// Three-way comparison for sorting; unordered operands compare equal.
pub fn compare(a: &Value, b: &Value) -> Result<Ordering, RuntimeError> {
    Ok(a.py_cmp(b)?.unwrap_or(Ordering::Equal))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: i64) -> Value {
        Value::from(n)
    }

    #[test]
    fn mixed_addition_promotes() {
        assert_eq!(add(&int(1), &Value::Bool(true)).unwrap(), int(2));
        assert!(matches!(add(&int(1), &Value::from(0.5)).unwrap(), Value::Float(f) if f.0 == 1.5));
    }

    #[test]
    fn integer_arithmetic_is_unbounded() {
        let big = Value::Int(BigInt::from(i64::MAX));
        let doubled = mul(&big, &int(2)).unwrap();
        assert_eq!(doubled.repr(), "18446744073709551614");
    }

    #[test]
    fn floor_division_rounds_down() {
        assert_eq!(floordiv(&int(7), &int(2)).unwrap(), int(3));
        assert_eq!(floordiv(&int(-7), &int(2)).unwrap(), int(-4));
        assert_eq!(modulo(&int(-7), &int(2)).unwrap(), int(1));
        assert_eq!(modulo(&int(7), &int(-2)).unwrap(), int(-1));
        assert_eq!(modulo(&Value::from(-7.5), &Value::from(2.0)).unwrap(), Value::from(0.5));
        assert_eq!(floordiv(&Value::from(-7.5), &Value::from(2.0)).unwrap(), Value::from(-4.0));
    }

    #[test]
    fn division_by_zero() {
        let err = truediv(&int(1), &int(0)).unwrap_err();
        assert_eq!(err.to_string(), "ZeroDivisionError: division by zero");
        assert!(floordiv(&int(1), &int(0)).is_err());
        assert!(modulo(&Value::from(1.0), &Value::from(0.0)).is_err());
    }

    #[test]
    fn true_division_is_float() {
        assert_eq!(truediv(&int(1), &int(2)).unwrap(), Value::from(0.5));
        assert_eq!(truediv(&int(4), &int(2)).unwrap().repr(), "2.0");
    }

    #[test]
    fn concatenation_and_repetition() {
        assert_eq!(add(&Value::from("ab"), &Value::from("c")).unwrap(), Value::from("abc"));
        assert_eq!(mul(&Value::from("ab"), &int(3)).unwrap(), Value::from("ababab"));
        assert_eq!(mul(&int(2), &Value::list([int(1)])).unwrap(), Value::list([int(1), int(1)]));
        assert_eq!(mul(&Value::tuple([int(1)]), &int(-1)).unwrap(), Value::tuple([]));
    }

    #[test]
    fn concatenation_type_errors() {
        let err = add(&Value::from("a"), &int(1)).unwrap_err();
        assert_eq!(err.message, "can only concatenate str (not \"int\") to str");
        let err = add(&int(1), &Value::None).unwrap_err();
        assert_eq!(err.message, "unsupported operand type(s) for +: 'int' and 'NoneType'");
        let err = mul(&Value::from("a"), &Value::from(2.0)).unwrap_err();
        assert_eq!(err.message, "can't multiply sequence by non-int of type 'float'");
    }

    #[test]
    fn huge_int_to_float_overflows() {
        let huge = Value::Int(BigInt::from(1) << 2000);
        let err = add(&huge, &Value::from(1.0)).unwrap_err();
        assert_eq!(err.to_string(), "OverflowError: int too large to convert to float");
    }

    #[test]
    fn int_float_comparison_is_exact() {
        let big = Value::Int((BigInt::from(1) << 53) + 1);
        let float = Value::from(2f64.powi(53));
        assert_eq!(big.py_cmp(&float).unwrap(), Some(Ordering::Greater));
        assert_ne!(big, float);
        assert_eq!(int(2).py_cmp(&Value::from(2.5)).unwrap(), Some(Ordering::Less));
        assert_eq!(int(3).py_cmp(&Value::from(2.5)).unwrap(), Some(Ordering::Greater));
        assert_eq!(int(-3).py_cmp(&Value::from(-2.5)).unwrap(), Some(Ordering::Less));
        assert_eq!(int(1).py_cmp(&Value::from(f64::NAN)).unwrap(), None);
    }

    #[test]
    fn sequences_compare_lexicographically() {
        let a = Value::list([int(1), int(2)]);
        let b = Value::list([int(1), int(3)]);
        let c = Value::list([int(1)]);
        assert_eq!(compare(&a, &b).unwrap(), Ordering::Less);
        assert_eq!(compare(&c, &a).unwrap(), Ordering::Less);
        assert_eq!(compare(&Value::from("b"), &Value::from("ab")).unwrap(), Ordering::Greater);
    }

    #[test]
    fn incomparable_types() {
        let err = compare(&Value::from("a"), &int(1)).unwrap_err();
        assert_eq!(err.message, "'<' not supported between instances of 'str' and 'int'");
    }

    #[test]
    fn negation() {
        assert_eq!(neg(&Value::Bool(true)).unwrap(), int(-1));
        assert!(neg(&Value::from("x")).is_err());
    }
}
