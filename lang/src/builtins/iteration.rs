use num_traits::ToPrimitive;

use crate::collections::List;
use crate::error::RuntimeError;
use crate::iter::{LazySeq, RangeSpec};
use crate::protocols::Iterable;
use crate::value::Value;

/// enumerate(iterable, start=0) → lazy (index, element) pairs
pub fn enumerate(iterable: &Value, start: &Value) -> Result<Value, RuntimeError> {
    let count = start.as_bigint().ok_or_else(|| {
        RuntimeError::type_error(format!(
            "'{}' object cannot be interpreted as an integer",
            start.type_name()
        ))
    })?;
    Ok(Value::lazy(LazySeq::Enumerate {
        source: iterable.py_iter()?.shared(),
        count,
    }))
}

/// zip(*iterables) → lazy tuples, truncated to the shortest input
///
/// Every argument is checked for iterability up front.
pub fn zip(iterables: &[Value]) -> Result<Value, RuntimeError> {
    let sources = iterables
        .iter()
        .map(|iterable| Ok(iterable.py_iter()?.shared()))
        .collect::<Result<Vec<_>, RuntimeError>>()?;
    Ok(Value::lazy(LazySeq::Zip { sources }))
}

/// range(stop) / range(start, stop, step=1) → range
pub fn range(args: &[Value]) -> Result<Value, RuntimeError> {
    if args.len() > 3 {
        return Err(RuntimeError::type_error(format!(
            "range expected at most 3 arguments, got {}",
            args.len()
        )));
    }
    let bounds = args
        .iter()
        .map(range_bound)
        .collect::<Result<Vec<_>, _>>()?;
    let spec = match bounds[..] {
        [] => {
            return Err(RuntimeError::type_error(
                "range expected at least 1 argument, got 0",
            ));
        }
        [stop] => RangeSpec::new(0, stop, 1)?,
        [start, stop] => RangeSpec::new(start, stop, 1)?,
        [start, stop, step, ..] => RangeSpec::new(start, stop, step)?,
    };
    Ok(Value::Range(spec))
}

fn range_bound(value: &Value) -> Result<i64, RuntimeError> {
    match value {
        Value::Int(n) => n.to_i64().ok_or_else(|| {
            RuntimeError::overflow("range() arguments must fit in a 64-bit integer")
        }),
        other => other.as_index(),
    }
}

/// iter(obj) → iterator over `obj`; an iterator is returned as is
pub fn iter(obj: &Value) -> Result<Value, RuntimeError> {
    Ok(obj.py_iter()?.into_value())
}

/// next(iterator) → the next element, or `None` when exhausted
pub fn next(iterator: &Value) -> Result<Option<Value>, RuntimeError> {
    match iterator {
        Value::LazySequence(seq) => Ok(seq.borrow_mut().next_value()),
        other => Err(RuntimeError::type_error(format!(
            "'{}' object is not an iterator",
            other.type_name()
        ))),
    }
}

/// sorted(iterable, key=None, reverse=False) → new list
///
/// Stable: elements with equal keys keep their input order.
pub fn sorted(iterable: &Value, key: Option<&Value>, reverse: bool) -> Result<Value, RuntimeError> {
    let list = List::from_iterable(iterable)?;
    list.sort(key, reverse)?;
    Ok(Value::List(list))
}

/// reversed(sequence) → lazy sequence walking `sequence` backwards
pub fn reversed(sequence: &Value) -> Result<Value, RuntimeError> {
    let seq = match sequence {
        Value::List(list) => LazySeq::ListReversed {
            source: list.clone(),
            remaining: list.len(),
        },
        Value::Range(range) => range.reversed().iter(),
        Value::Tuple(tuple) => LazySeq::Items {
            items: tuple.values().iter().rev().cloned().collect(),
            index: 0,
        },
        Value::Str(s) => LazySeq::Items {
            items: s.chars().rev().map(|c| Value::from(c.to_string())).collect(),
            index: 0,
        },
        Value::Dict(dict) => LazySeq::Items {
            items: dict.entries().into_iter().rev().map(|(key, _)| key).collect(),
            index: 0,
        },
        other => {
            return Err(RuntimeError::type_error(format!(
                "'{}' object is not reversible",
                other.type_name()
            )));
        }
    };
    Ok(Value::lazy(seq))
}
