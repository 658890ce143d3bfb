//! Methods of builtin values (`xs.append(1)`, `d.keys()`, `s.split()`).
//!
//! Attribute lookup on a builtin value yields a bound method
//! ([`Callable::Method`](super::Callable::Method)); calling it lands in
//! [`call_method`], which binds the arguments against the method's
//! signature and forwards to the container.

use super::{Args, Bound, Signature, optional_text, text_arg};
use crate::collections::{Dict, List, Set, Tuple, text};
use crate::error::RuntimeError;
use crate::protocols::Truthy;
use crate::value::Value;

const LIST_METHODS: &[&str] = &[
    "append", "clear", "copy", "count", "extend", "index", "insert", "pop", "remove", "reverse",
    "sort",
];
const TUPLE_METHODS: &[&str] = &["count", "index"];
const DICT_METHODS: &[&str] = &[
    "clear",
    "copy",
    "get",
    "items",
    "keys",
    "pop",
    "setdefault",
    "update",
    "values",
];
const SET_METHODS: &[&str] = &[
    "add",
    "clear",
    "copy",
    "difference",
    "discard",
    "intersection",
    "issubset",
    "remove",
    "union",
];
const STR_METHODS: &[&str] = &[
    "count",
    "endswith",
    "find",
    "format",
    "join",
    "lower",
    "replace",
    "split",
    "startswith",
    "strip",
    "upper",
];

fn methods_of(receiver: &Value) -> &'static [&'static str] {
    match receiver {
        Value::List(_) => LIST_METHODS,
        Value::Tuple(_) => TUPLE_METHODS,
        Value::Dict(_) => DICT_METHODS,
        Value::Set(_) => SET_METHODS,
        Value::Str(_) => STR_METHODS,
        _ => &[],
    }
}

/// Whether `receiver`'s type defines a method called `name`.
pub fn has_method(receiver: &Value, name: &str) -> bool {
    methods_of(receiver).contains(&name)
}

/// Invokes method `name` of a builtin value.
pub fn call_method(receiver: &Value, name: &str, args: Args) -> Result<Value, RuntimeError> {
    tracing::trace!(receiver = %receiver.type_name(), method = name, "method call");
    match receiver {
        Value::List(list) => list_method(list, name, args),
        Value::Tuple(tuple) => tuple_method(tuple, name, args),
        Value::Dict(dict) => dict_method(dict, name, args),
        Value::Set(set) => set_method(set, name, args),
        Value::Str(s) => str_method(s, name, args),
        other => Err(no_method(other, name)),
    }
}

fn no_method(receiver: &Value, name: &str) -> RuntimeError {
    RuntimeError::attribute_error(format!(
        "'{}' object has no attribute '{name}'",
        receiver.type_name()
    ))
}

fn bind(
    name: &'static str,
    params: &'static [&'static str],
    required: usize,
    args: Args,
) -> Result<Bound, RuntimeError> {
    Signature::fixed(name, params, required).bind(args)
}

fn none(result: Result<(), RuntimeError>) -> Result<Value, RuntimeError> {
    result.map(|()| Value::None)
}

// ============================================================================
// list
// ============================================================================

fn list_method(list: &List, name: &str, args: Args) -> Result<Value, RuntimeError> {
    match name {
        "append" => {
            let mut bound = bind("list.append", &["object"], 1, args)?;
            list.append(bound.required(0)?);
            Ok(Value::None)
        }
        "extend" => {
            let mut bound = bind("list.extend", &["iterable"], 1, args)?;
            none(list.extend(&bound.required(0)?))
        }
        "insert" => {
            let mut bound = bind("list.insert", &["index", "object"], 2, args)?;
            let index = bound.required(0)?.as_index()?;
            list.insert(index, bound.required(1)?);
            Ok(Value::None)
        }
        "pop" => {
            let mut bound = bind("list.pop", &["index"], 0, args)?;
            let index = bound.take(0).map(|index| index.as_index()).transpose()?;
            list.pop(index)
        }
        "remove" => {
            let mut bound = bind("list.remove", &["value"], 1, args)?;
            none(list.remove(&bound.required(0)?))
        }
        "index" => {
            let mut bound = bind("list.index", &["value"], 1, args)?;
            Ok(Value::from(list.index(&bound.required(0)?)?))
        }
        "count" => {
            let mut bound = bind("list.count", &["value"], 1, args)?;
            Ok(Value::from(list.count(&bound.required(0)?)))
        }
        "sort" => {
            if !args.positional.is_empty() {
                return Err(RuntimeError::type_error(
                    "sort() takes no positional arguments",
                ));
            }
            let mut bound = Signature::variadic("sort", &["key", "reverse"]).bind(args)?;
            let key = bound.take_some(0);
            let reverse = bound.take(1).is_some_and(|flag| flag.is_truthy());
            none(list.sort(key.as_ref(), reverse))
        }
        "reverse" => {
            bind("list.reverse", &[], 0, args)?;
            list.reverse();
            Ok(Value::None)
        }
        "clear" => {
            bind("list.clear", &[], 0, args)?;
            list.clear();
            Ok(Value::None)
        }
        "copy" => {
            bind("list.copy", &[], 0, args)?;
            Ok(Value::List(list.copy()))
        }
        _ => Err(no_method(&Value::List(list.clone()), name)),
    }
}

// ============================================================================
// tuple
// ============================================================================

fn tuple_method(tuple: &Tuple, name: &str, args: Args) -> Result<Value, RuntimeError> {
    match name {
        "count" => {
            let mut bound = bind("tuple.count", &["value"], 1, args)?;
            Ok(Value::from(tuple.count(&bound.required(0)?)))
        }
        "index" => {
            let mut bound = bind("tuple.index", &["value"], 1, args)?;
            Ok(Value::from(tuple.index(&bound.required(0)?)?))
        }
        _ => Err(no_method(&Value::Tuple(tuple.clone()), name)),
    }
}

// ============================================================================
// dict
// ============================================================================

fn dict_method(dict: &Dict, name: &str, args: Args) -> Result<Value, RuntimeError> {
    match name {
        "get" => {
            let mut bound = bind("get", &["key", "default"], 1, args)?;
            let key = bound.required(0)?;
            dict.get(&key, bound.take(1).unwrap_or(Value::None))
        }
        "keys" => {
            bind("dict.keys", &[], 0, args)?;
            Ok(dict.keys())
        }
        "values" => {
            bind("dict.values", &[], 0, args)?;
            Ok(dict.values())
        }
        "items" => {
            bind("dict.items", &[], 0, args)?;
            Ok(dict.items())
        }
        "pop" => {
            let mut bound = bind("pop", &["key", "default"], 1, args)?;
            let key = bound.required(0)?;
            dict.pop(&key, bound.take(1))
        }
        "setdefault" => {
            let mut bound = bind("setdefault", &["key", "default"], 1, args)?;
            let key = bound.required(0)?;
            dict.setdefault(key, bound.take(1).unwrap_or(Value::None))
        }
        "update" => {
            let mut bound = Signature::fixed("update", &["other"], 0)
                .with_kwargs()
                .bind(args)?;
            if let Some(other) = bound.take(0) {
                dict.update(&other)?;
            }
            for (key, value) in std::mem::take(&mut bound.extra) {
                dict.set_item(Value::Str(key), value)?;
            }
            Ok(Value::None)
        }
        "clear" => {
            bind("dict.clear", &[], 0, args)?;
            dict.clear();
            Ok(Value::None)
        }
        "copy" => {
            bind("dict.copy", &[], 0, args)?;
            Ok(Value::Dict(dict.copy()))
        }
        _ => Err(no_method(&Value::Dict(dict.clone()), name)),
    }
}

// ============================================================================
// set
// ============================================================================

/// Operand of a set method: a set, or any iterable of hashables.
fn set_operand(value: &Value) -> Result<Set, RuntimeError> {
    match value {
        Value::Set(set) => Ok(set.clone()),
        other => Set::from_iterable(other),
    }
}

/// Folds `combine` over every positional operand, starting from a copy
/// of `set`.
fn set_fold(
    set: &Set,
    name: &'static str,
    args: Args,
    combine: impl Fn(&Set, &Set) -> Set,
) -> Result<Value, RuntimeError> {
    let bound = Signature::variadic(name, &[]).bind(args)?;
    let mut result = set.copy();
    for operand in &bound.rest {
        result = combine(&result, &set_operand(operand)?);
    }
    Ok(Value::Set(result))
}

fn set_method(set: &Set, name: &str, args: Args) -> Result<Value, RuntimeError> {
    match name {
        "add" => {
            let mut bound = bind("set.add", &["object"], 1, args)?;
            none(set.add(bound.required(0)?))
        }
        "remove" => {
            let mut bound = bind("set.remove", &["object"], 1, args)?;
            none(set.remove(&bound.required(0)?))
        }
        "discard" => {
            let mut bound = bind("set.discard", &["object"], 1, args)?;
            none(set.discard(&bound.required(0)?))
        }
        "union" => set_fold(set, "union", args, Set::union),
        "intersection" => set_fold(set, "intersection", args, Set::intersection),
        "difference" => set_fold(set, "difference", args, Set::difference),
        "issubset" => {
            let mut bound = bind("set.issubset", &["other"], 1, args)?;
            let other = set_operand(&bound.required(0)?)?;
            Ok(Value::Bool(set.is_subset(&other)))
        }
        "clear" => {
            bind("set.clear", &[], 0, args)?;
            set.clear();
            Ok(Value::None)
        }
        "copy" => {
            bind("set.copy", &[], 0, args)?;
            Ok(Value::Set(set.copy()))
        }
        _ => Err(no_method(&Value::Set(set.clone()), name)),
    }
}

// ============================================================================
// str
// ============================================================================

/// Prefix/suffix argument: a string or a tuple of strings.
fn affixes(value: &Value, method: &str) -> Result<Vec<String>, RuntimeError> {
    let message = || {
        RuntimeError::type_error(format!(
            "{method} first arg must be str or a tuple of str, not {}",
            value.type_name()
        ))
    };
    match value {
        Value::Str(s) => Ok(vec![s.to_string()]),
        Value::Tuple(options) => options
            .values()
            .iter()
            .map(|option| option.as_str().map(str::to_string).ok_or_else(message))
            .collect(),
        _ => Err(message()),
    }
}

fn str_method(s: &str, name: &str, args: Args) -> Result<Value, RuntimeError> {
    match name {
        "split" => {
            let mut bound = bind("split", &["sep", "maxsplit"], 0, args)?;
            let sep = optional_text(bound.take(0), "sep")?;
            let maxsplit = match bound.take(1) {
                Some(limit) => usize::try_from(limit.as_index()?).ok(),
                None => None,
            };
            Ok(Value::List(text::split(s, sep.as_deref(), maxsplit)?))
        }
        "join" => {
            let mut bound = bind("str.join", &["iterable"], 1, args)?;
            text::join(s, &bound.required(0)?)
        }
        "strip" => {
            let mut bound = bind("strip", &["chars"], 0, args)?;
            let chars = optional_text(bound.take(0), "strip arg")?;
            Ok(text::strip(s, chars.as_deref()))
        }
        "lower" => {
            bind("str.lower", &[], 0, args)?;
            Ok(text::lower(s))
        }
        "upper" => {
            bind("str.upper", &[], 0, args)?;
            Ok(text::upper(s))
        }
        "replace" => {
            let mut bound = bind("replace", &["old", "new"], 2, args)?;
            let old = bound.required(0)?;
            let new = bound.required(1)?;
            Ok(text::replace(
                s,
                text_arg(&old, "replace() argument 1")?,
                text_arg(&new, "replace() argument 2")?,
            ))
        }
        "startswith" | "endswith" => {
            let signature = if name == "startswith" { "startswith" } else { "endswith" };
            let mut bound = bind(signature, &["prefix"], 1, args)?;
            let options = affixes(&bound.required(0)?, name)?;
            let test = if name == "startswith" {
                text::startswith
            } else {
                text::endswith
            };
            Ok(Value::Bool(options.iter().any(|option| test(s, option))))
        }
        "find" => {
            let mut bound = bind("find", &["sub"], 1, args)?;
            let sub = bound.required(0)?;
            Ok(Value::from(text::find(s, text_arg(&sub, "find() argument 1")?)))
        }
        "count" => {
            let mut bound = bind("count", &["sub"], 1, args)?;
            let sub = bound.required(0)?;
            Ok(Value::from(text::count(s, text_arg(&sub, "count() argument 1")?)))
        }
        "format" => text::format(s, &args.positional, &args.keywords),
        _ => Err(no_method(&Value::from(s), name)),
    }
}
