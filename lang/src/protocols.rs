//! Capabilities a value may have.
//!
//! Builtins never switch on concrete types to decide whether an operation is
//! allowed; they ask for a capability and surface the TypeError the
//! capability reports when the value lacks it.

use num_bigint::BigInt;
use num_traits::FromPrimitive;
use std::cmp::Ordering;
use std::rc::Rc;

use crate::builtins::{Callable, methods};
use crate::collections::{Dict, List, Object, Set, Tuple, text};
use crate::error::RuntimeError;
use crate::iter::{LazySeq, SeqIter};
use crate::value::{TypeTag, Value};

/// Has a length (`len(x)`).
pub trait Len {
    fn py_len(&self) -> Result<usize, RuntimeError>;
}

/// Has a truth value (`bool(x)`).
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

/// Can be traversed (`for x in ...`).
pub trait Iterable {
    fn py_iter(&self) -> Result<SeqIter, RuntimeError>;
}

/// Can be a dict key or set member. Equal values hash equally.
pub trait Hashable {
    fn py_hash(&self) -> Result<i64, RuntimeError>;
}

/// Supports ordering comparisons. `Ok(None)` means unordered (NaN).
pub trait Comparable {
    fn py_cmp(&self, other: &Self) -> Result<Option<Ordering>, RuntimeError>;

    fn py_lt(&self, other: &Self) -> Result<bool, RuntimeError> {
        Ok(self.py_cmp(other)? == Some(Ordering::Less))
    }

    fn py_gt(&self, other: &Self) -> Result<bool, RuntimeError> {
        Ok(self.py_cmp(other)? == Some(Ordering::Greater))
    }
}

/// Named attribute access.
pub trait AttributeBearing {
    fn has_attr(&self, name: &str) -> bool;
    fn get_attr(&self, name: &str) -> Option<Value>;
    fn set_attr(&self, name: &str, value: Value) -> Result<(), RuntimeError>;
    fn del_attr(&self, name: &str) -> Result<(), RuntimeError>;
}

/// Subscription (`x[key]`) and membership (`item in x`).
pub trait Subscript {
    fn get_item(&self, key: &Value) -> Result<Value, RuntimeError>;
    fn set_item(&self, key: &Value, value: Value) -> Result<(), RuntimeError>;
    fn del_item(&self, key: &Value) -> Result<(), RuntimeError>;
    fn contains(&self, item: &Value) -> Result<bool, RuntimeError>;
}

// ============================================================================
// Value
// ============================================================================

impl Len for Value {
    fn py_len(&self) -> Result<usize, RuntimeError> {
        match self {
            Value::Str(s) => Ok(text::char_len(s)),
            Value::List(list) => list.py_len(),
            Value::Tuple(tuple) => tuple.py_len(),
            Value::Dict(dict) => dict.py_len(),
            Value::Set(set) => set.py_len(),
            Value::Range(range) => Ok(range.len()),
            other => Err(RuntimeError::type_error(format!(
                "object of type '{}' has no len()",
                other.type_name()
            ))),
        }
    }
}

impl Truthy for Value {
    fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(_) | Value::Float(_) => !self.is_zero(),
            Value::Str(s) => !s.is_empty(),
            Value::List(list) => !list.is_empty(),
            Value::Tuple(tuple) => !tuple.is_empty(),
            Value::Dict(dict) => !dict.is_empty(),
            Value::Set(set) => !set.is_empty(),
            Value::Range(range) => !range.is_empty(),
            Value::Object(_) | Value::LazySequence(_) | Value::Function(_) | Value::Type(_) => {
                true
            }
        }
    }
}

impl Iterable for Value {
    /// A lazy sequence iterates itself (sharing its position); every other
    /// iterable gets a fresh cursor.
    fn py_iter(&self) -> Result<SeqIter, RuntimeError> {
        let seq = match self {
            Value::LazySequence(seq) => return Ok(SeqIter::from_shared(seq.clone())),
            Value::List(list) => LazySeq::List {
                source: list.clone(),
                index: 0,
            },
            Value::Tuple(tuple) => LazySeq::Tuple {
                source: tuple.clone(),
                index: 0,
            },
            Value::Str(s) => LazySeq::Str {
                source: s.clone(),
                offset: 0,
            },
            Value::Dict(dict) => LazySeq::DictKeys {
                source: dict.clone(),
                index: 0,
            },
            Value::Set(set) => LazySeq::Set {
                source: set.clone(),
                index: 0,
            },
            Value::Range(range) => range.iter(),
            other => {
                return Err(RuntimeError::type_error(format!(
                    "'{}' object is not iterable",
                    other.type_name()
                )));
            }
        };
        Ok(SeqIter::new(seq))
    }
}

/// Data attributes of builtin values.
fn builtin_data_attr(value: &Value, name: &str) -> Option<Value> {
    match (value, name) {
        (Value::Range(range), "start") => Some(Value::from(range.start)),
        (Value::Range(range), "stop") => Some(Value::from(range.stop)),
        (Value::Range(range), "step") => Some(Value::from(range.step)),
        (Value::Int(_) | Value::Bool(_), "real" | "numerator") => {
            value.as_bigint().map(Value::Int)
        }
        (Value::Int(_) | Value::Bool(_), "imag") => Some(Value::from(0)),
        (Value::Int(_) | Value::Bool(_), "denominator") => Some(Value::from(1)),
        (Value::Float(_), "real") => Some(value.clone()),
        (Value::Float(_), "imag") => Some(Value::from(0.0)),
        (Value::Type(tag), "__name__") => Some(Value::from(tag.name())),
        (Value::Object(object), "__class__") => {
            Some(Value::Type(TypeTag::Instance(object.class_name())))
        }
        (_, "__class__") => Some(Value::Type(value.type_tag())),
        _ => None,
    }
}

fn no_attribute(value: &Value, name: &str) -> RuntimeError {
    RuntimeError::attribute_error(format!(
        "'{}' object has no attribute '{name}'",
        value.type_name()
    ))
}

impl AttributeBearing for Value {
    fn has_attr(&self, name: &str) -> bool {
        self.get_attr(name).is_some()
    }

    /// User objects look in their attribute table. Builtin values expose
    /// bound methods of their type and a few data attributes.
    fn get_attr(&self, name: &str) -> Option<Value> {
        if let Value::Object(object) = self
            && let Some(value) = object.get_attr(name)
        {
            return Some(value);
        }
        if let Some(value) = builtin_data_attr(self, name) {
            return Some(value);
        }
        if methods::has_method(self, name) {
            return Some(Value::Function(Rc::new(Callable::Method {
                receiver: self.clone(),
                name: Rc::from(name),
            })));
        }
        None
    }

    fn set_attr(&self, name: &str, value: Value) -> Result<(), RuntimeError> {
        match self {
            Value::Object(object) => {
                object.set_attr(name, value);
                Ok(())
            }
            other => Err(no_attribute(other, name)),
        }
    }

    fn del_attr(&self, name: &str) -> Result<(), RuntimeError> {
        match self {
            Value::Object(object) if object.del_attr(name) => Ok(()),
            other => Err(no_attribute(other, name)),
        }
    }
}

fn slice_bounds(key: &Value) -> Option<(Option<i64>, Option<i64>, Option<i64>)> {
    let Value::Tuple(parts) = key else {
        return None;
    };
    if parts.len() != 3 {
        return None;
    }
    let bound = |position: usize| match parts.item_at(position) {
        Some(Value::None) | None => Some(None),
        Some(value) => value.as_index().ok().map(Some),
    };
    Some((bound(0)?, bound(1)?, bound(2)?))
}

impl Subscript for Value {
    /// Integer index into a sequence, or key lookup in a dict. A 3-tuple
    /// `(start, stop, step)` of ints/None slices a sequence.
    fn get_item(&self, key: &Value) -> Result<Value, RuntimeError> {
        if let Value::Dict(dict) = self {
            return dict.get_item(key);
        }
        if let Some((start, stop, step)) = slice_bounds(key) {
            match self {
                Value::List(list) => return Ok(Value::List(list.slice(start, stop, step)?)),
                Value::Tuple(tuple) => return Ok(Value::Tuple(tuple.slice(start, stop, step)?)),
                Value::Str(s) => return text::slice(s, start, stop, step),
                _ => {}
            }
        }
        let index_of = |kind: &str| {
            key.as_index().map_err(|_| {
                RuntimeError::type_error(format!(
                    "{kind} indices must be integers or slices, not {}",
                    key.type_name()
                ))
            })
        };
        match self {
            Value::List(list) => list.get(index_of("list")?),
            Value::Tuple(tuple) => tuple.get(index_of("tuple")?),
            Value::Str(s) => text::char_at(s, index_of("string")?),
            Value::Range(range) => Ok(Value::from(range.get(index_of("range")?)?)),
            other => Err(RuntimeError::type_error(format!(
                "'{}' object is not subscriptable",
                other.type_name()
            ))),
        }
    }

    fn set_item(&self, key: &Value, value: Value) -> Result<(), RuntimeError> {
        match self {
            Value::List(list) => list.set_item(key.as_index()?, value),
            Value::Dict(dict) => dict.set_item(key.clone(), value),
            other => Err(RuntimeError::type_error(format!(
                "'{}' object does not support item assignment",
                other.type_name()
            ))),
        }
    }

    fn del_item(&self, key: &Value) -> Result<(), RuntimeError> {
        match self {
            Value::List(list) => list.del_item(key.as_index()?),
            Value::Dict(dict) => dict.del_item(key),
            other => Err(RuntimeError::type_error(format!(
                "'{}' object does not support item deletion",
                other.type_name()
            ))),
        }
    }

    fn contains(&self, item: &Value) -> Result<bool, RuntimeError> {
        match self {
            Value::Str(s) => match item {
                Value::Str(sub) => Ok(text::contains(s, sub)),
                other => Err(RuntimeError::type_error(format!(
                    "'in <string>' requires string as left operand, not {}",
                    other.type_name()
                ))),
            },
            Value::List(list) => Ok(list.contains(item)),
            Value::Tuple(tuple) => Ok(tuple.contains(item)),
            Value::Dict(dict) => dict.contains_key(item),
            Value::Set(set) => set.contains(item),
            Value::Range(range) => Ok(match item {
                Value::Float(f) if f.0.fract() == 0.0 => {
                    BigInt::from_f64(f.0).is_some_and(|n| range.contains(&n))
                }
                Value::Float(_) => false,
                other => other.as_bigint().is_some_and(|n| range.contains(&n)),
            }),
            Value::LazySequence(_) => {
                let mut items = self.py_iter()?;
                Ok(items.any(|candidate| candidate.is(item) || candidate == *item))
            }
            other => Err(RuntimeError::type_error(format!(
                "argument of type '{}' is not iterable",
                other.type_name()
            ))),
        }
    }
}

// ============================================================================
// Containers
// ============================================================================

impl Len for List {
    fn py_len(&self) -> Result<usize, RuntimeError> {
        Ok(self.len())
    }
}

impl Len for Tuple {
    fn py_len(&self) -> Result<usize, RuntimeError> {
        Ok(self.len())
    }
}

impl Len for Dict {
    fn py_len(&self) -> Result<usize, RuntimeError> {
        Ok(self.len())
    }
}

impl Len for Set {
    fn py_len(&self) -> Result<usize, RuntimeError> {
        Ok(self.len())
    }
}

impl Truthy for List {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for Tuple {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for Dict {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for Set {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl AttributeBearing for Object {
    fn has_attr(&self, name: &str) -> bool {
        Object::has_attr(self, name)
    }

    fn get_attr(&self, name: &str) -> Option<Value> {
        Object::get_attr(self, name)
    }

    fn set_attr(&self, name: &str, value: Value) -> Result<(), RuntimeError> {
        Object::set_attr(self, name, value);
        Ok(())
    }

    fn del_attr(&self, name: &str) -> Result<(), RuntimeError> {
        if Object::del_attr(self, name) {
            Ok(())
        } else {
            Err(RuntimeError::attribute_error(format!(
                "'{}' object has no attribute '{name}'",
                self.class_name()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn len_counts_code_points() {
        assert_eq!(Value::from("héllo").py_len().unwrap(), 5);
        assert_eq!(
            Value::from(1).py_len().unwrap_err().message,
            "object of type 'int' has no len()"
        );
    }

    #[test]
    fn truthiness() {
        assert!(!Value::None.is_truthy());
        assert!(!Value::from(0.0).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::list([]).is_truthy());
        assert!(Value::list([Value::None]).is_truthy());
        assert!(Value::from(-1).is_truthy());
        assert!(Value::Object(Object::new("Point")).is_truthy());
    }

    #[test]
    fn non_iterables_report_type() {
        let err = Value::from(5).py_iter().unwrap_err();
        assert_eq!(err.to_string(), "TypeError: 'int' object is not iterable");
    }

    #[test]
    fn object_attributes() {
        let point = Value::Object(Object::with_attributes("Point", [("x", Value::from(1))]));
        assert!(point.has_attr("x"));
        assert!(!point.has_attr("y"));
        point.set_attr("y", Value::from(2)).unwrap();
        assert_eq!(point.get_attr("y"), Some(Value::from(2)));
        point.del_attr("y").unwrap();
        let err = point.del_attr("y").unwrap_err();
        assert_eq!(err.kind, ErrorKind::AttributeError);
        assert_eq!(err.message, "'Point' object has no attribute 'y'");
    }

    #[test]
    fn builtin_values_expose_methods_but_reject_assignment() {
        let list = Value::list([]);
        assert!(list.has_attr("append"));
        assert!(!list.has_attr("push"));
        let err = list.set_attr("x", Value::None).unwrap_err();
        assert_eq!(err.message, "'list' object has no attribute 'x'");
        assert_eq!(Value::from(3).get_attr("real"), Some(Value::from(3)));
    }

    #[test]
    fn subscription() {
        let list = Value::list([Value::from(1), Value::from(2), Value::from(3)]);
        assert_eq!(list.get_item(&Value::from(-1)).unwrap(), Value::from(3));
        list.set_item(&Value::from(0), Value::from(9)).unwrap();
        assert_eq!(list.get_item(&Value::from(0)).unwrap(), Value::from(9));
        let slice = Value::tuple([Value::None, Value::None, Value::from(-1)]);
        assert_eq!(
            list.get_item(&slice).unwrap(),
            Value::list([Value::from(3), Value::from(2), Value::from(9)])
        );
        assert_eq!(Value::from("abc").get_item(&Value::from(1)).unwrap(), Value::from("b"));
        let err = list.get_item(&Value::from("a")).unwrap_err();
        assert_eq!(err.message, "list indices must be integers or slices, not str");
    }

    #[test]
    fn membership() {
        assert!(Value::from("hello").contains(&Value::from("ell")).unwrap());
        let dict = Value::Dict(Dict::from_pairs([(Value::from("a"), Value::from(1))]).unwrap());
        assert!(dict.contains(&Value::from("a")).unwrap());
        assert!(!dict.contains(&Value::from(1)).unwrap());
        assert!(dict.contains(&Value::list([])).is_err());
        let range = Value::Range(crate::iter::RangeSpec::new(0, 10, 2).unwrap());
        assert!(range.contains(&Value::from(4)).unwrap());
        assert!(range.contains(&Value::from(4.0)).unwrap());
        assert!(!range.contains(&Value::from(5)).unwrap());
    }
}
