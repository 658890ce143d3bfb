use num_traits::Signed;

use super::{Args, call_value};
use crate::error::RuntimeError;
use crate::protocols::{Comparable, Iterable, Len, Truthy};
use crate::value::{Value, ops};

// ============================================================================
// Size and Arithmetic
// ============================================================================

/// len(obj) → int
pub fn len(obj: &Value) -> Result<usize, RuntimeError> {
    obj.py_len()
}

/// abs(x) → same numeric kind (bool becomes int)
pub fn abs(x: &Value) -> Result<Value, RuntimeError> {
    match x {
        Value::Bool(b) => Ok(Value::from(i64::from(*b))),
        Value::Int(n) => Ok(Value::Int(n.abs())),
        Value::Float(f) => Ok(Value::float(f.0.abs())),
        other => Err(RuntimeError::type_error(format!(
            "bad operand type for abs(): '{}'",
            other.type_name()
        ))),
    }
}

/// Keyword options of `min` and `max`.
#[derive(Clone, Debug, Default)]
pub struct MinMaxOptions {
    /// Callable applied to each candidate before comparison
    pub key: Option<Value>,
    /// Result for an empty single iterable (instead of ValueError)
    pub default: Option<Value>,
}

/// min(iterable, *, key=None, default=?) / min(a, b, *rest, key=None) → Value
pub fn min(args: &[Value], options: &MinMaxOptions) -> Result<Value, RuntimeError> {
    extreme("min", args, options, |candidate, best| candidate.py_lt(best))
}

/// max(iterable, *, key=None, default=?) / max(a, b, *rest, key=None) → Value
pub fn max(args: &[Value], options: &MinMaxOptions) -> Result<Value, RuntimeError> {
    extreme("max", args, options, |candidate, best| candidate.py_gt(best))
}

/// Scans for the extreme element. A candidate replaces the current best
/// only when strictly better, so the first of several equal extremes wins.
fn extreme(
    name: &str,
    args: &[Value],
    options: &MinMaxOptions,
    better: impl Fn(&Value, &Value) -> Result<bool, RuntimeError>,
) -> Result<Value, RuntimeError> {
    let candidates: Box<dyn Iterator<Item = Value>> = match args {
        [] => {
            return Err(RuntimeError::type_error(format!(
                "{name} expected at least 1 argument, got 0"
            )));
        }
        [iterable] => Box::new(iterable.py_iter()?),
        _ => {
            if options.default.is_some() {
                return Err(RuntimeError::type_error(format!(
                    "Cannot specify a default for {name}() with multiple positional arguments"
                )));
            }
            Box::new(args.iter().cloned())
        }
    };

    let mut best: Option<(Value, Value)> = None;
    for candidate in candidates {
        let rank = match &options.key {
            Some(key) => call_value(key, Args::from(vec![candidate.clone()]))?,
            None => candidate.clone(),
        };
        best = match best {
            Some((best_rank, best_item)) if !better(&rank, &best_rank)? => {
                Some((best_rank, best_item))
            }
            _ => Some((rank, candidate)),
        };
    }

    match (best, &options.default) {
        (Some((_, item)), _) => Ok(item),
        (None, Some(default)) => Ok(default.clone()),
        (None, None) => Err(RuntimeError::value_error(format!(
            "{name}() iterable argument is empty"
        ))),
    }
}

/// sum(iterable, start=0) → Value
pub fn sum(iterable: &Value, start: Value) -> Result<Value, RuntimeError> {
    if let Value::Str(_) = start {
        return Err(RuntimeError::type_error(
            "sum() can't sum strings [use ''.join(seq) instead]",
        ));
    }
    let mut total = start;
    for item in iterable.py_iter()? {
        total = ops::add(&total, &item)?;
    }
    Ok(total)
}

// ============================================================================
// Truth Tests
// ============================================================================

/// all(iterable) → bool; stops at the first falsy element
pub fn all(iterable: &Value) -> Result<bool, RuntimeError> {
    Ok(iterable.py_iter()?.all(|item| item.is_truthy()))
}

/// any(iterable) → bool; stops at the first truthy element
pub fn any(iterable: &Value) -> Result<bool, RuntimeError> {
    Ok(iterable.py_iter()?.any(|item| item.is_truthy()))
}
