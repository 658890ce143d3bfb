//! Builtin functions.
//!
//! Each builtin has a typed Rust entry point (e.g. [`len`], [`min`] with
//! [`MinMaxOptions`]) and an entry in the [`BuiltinId`] catalogue. Compiled
//! call sites that only know the callee at run time go through
//! [`call_builtin`], which binds positional and keyword arguments against
//! the builtin's [`Signature`] before dispatching.

use std::fmt;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::protocols::Truthy;
use crate::value::Value;

mod aggregate;
mod args;
mod attrs;
mod convert;
mod io;
mod iteration;
pub mod methods;


pub use aggregate::{MinMaxOptions, abs, all, any, len, max, min, sum};
pub use args::{Args, Bound, Signature};
pub use attrs::{delattr, getattr, hasattr, hash, id, setattr};
pub use convert::{
    chr, isinstance, make_dict, make_list, make_set, make_tuple, ord, repr, to_bool, to_float,
    to_int, to_str, type_of,
};
pub use io::{PrintOptions, print, print_to, redirect_stdout, restore_stdout};
pub use iteration::{enumerate, iter, next, range, reversed, sorted, zip};
pub use methods::call_method;

/// Builtin function identifier, stable across compilation units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum BuiltinId {
    // Output
    Print = 0,

    // Size and arithmetic
    Len = 10,
    Abs = 11,
    Min = 12,
    Max = 13,
    Sum = 14,

    // Truth tests
    All = 20,
    Any = 21,

    // Sequence producers
    Enumerate = 30,
    Zip = 31,
    Range = 32,
    Iter = 33,
    Next = 34,
    Sorted = 35,
    Reversed = 36,

    // Conversion
    Bool = 40,
    Int = 41,
    Float = 42,
    Str = 43,
    Repr = 44,
    Ord = 45,
    Chr = 46,

    // Container construction
    List = 50,
    Tuple = 51,
    Set = 52,
    Dict = 53,

    // Introspection
    Type = 60,
    IsInstance = 61,
    HasAttr = 62,
    GetAttr = 63,
    SetAttr = 64,
    DelAttr = 65,
    Id = 66,
    Hash = 67,
}

impl BuiltinId {
    pub const ALL: [BuiltinId; 34] = [
        BuiltinId::Print,
        BuiltinId::Len,
        BuiltinId::Abs,
        BuiltinId::Min,
        BuiltinId::Max,
        BuiltinId::Sum,
        BuiltinId::All,
        BuiltinId::Any,
        BuiltinId::Enumerate,
        BuiltinId::Zip,
        BuiltinId::Range,
        BuiltinId::Iter,
        BuiltinId::Next,
        BuiltinId::Sorted,
        BuiltinId::Reversed,
        BuiltinId::Bool,
        BuiltinId::Int,
        BuiltinId::Float,
        BuiltinId::Str,
        BuiltinId::Repr,
        BuiltinId::Ord,
        BuiltinId::Chr,
        BuiltinId::List,
        BuiltinId::Tuple,
        BuiltinId::Set,
        BuiltinId::Dict,
        BuiltinId::Type,
        BuiltinId::IsInstance,
        BuiltinId::HasAttr,
        BuiltinId::GetAttr,
        BuiltinId::SetAttr,
        BuiltinId::DelAttr,
        BuiltinId::Id,
        BuiltinId::Hash,
    ];

    pub fn name(self) -> &'static str {
        self.signature().name
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }

    pub fn signature(self) -> Signature {
        match self {
            BuiltinId::Print => Signature::variadic("print", &["sep", "end", "file", "flush"]),
            BuiltinId::Len => Signature::fixed("len", &["obj"], 1),
            BuiltinId::Abs => Signature::fixed("abs", &["x"], 1),
            BuiltinId::Min => Signature::variadic("min", &["key", "default"]),
            BuiltinId::Max => Signature::variadic("max", &["key", "default"]),
            BuiltinId::Sum => Signature::fixed("sum", &["iterable", "start"], 1),
            BuiltinId::All => Signature::fixed("all", &["iterable"], 1),
            BuiltinId::Any => Signature::fixed("any", &["iterable"], 1),
            BuiltinId::Enumerate => Signature::fixed("enumerate", &["iterable", "start"], 1),
            BuiltinId::Zip => Signature::variadic("zip", &[]),
            BuiltinId::Range => Signature::variadic("range", &[]),
            BuiltinId::Iter => Signature::fixed("iter", &["obj"], 1),
            BuiltinId::Next => Signature::fixed("next", &["iterator", "default"], 1),
            BuiltinId::Sorted => Signature::fixed("sorted", &["iterable", "key", "reverse"], 1),
            BuiltinId::Reversed => Signature::fixed("reversed", &["sequence"], 1),
            BuiltinId::Bool => Signature::fixed("bool", &["x"], 0),
            BuiltinId::Int => Signature::fixed("int", &["x", "base"], 0),
            BuiltinId::Float => Signature::fixed("float", &["x"], 0),
            BuiltinId::Str => Signature::fixed("str", &["object", "encoding", "errors"], 0),
            BuiltinId::Repr => Signature::fixed("repr", &["obj"], 1),
            BuiltinId::Ord => Signature::fixed("ord", &["c"], 1),
            BuiltinId::Chr => Signature::fixed("chr", &["i"], 1),
            BuiltinId::List => Signature::fixed("list", &["iterable"], 0),
            BuiltinId::Tuple => Signature::fixed("tuple", &["iterable"], 0),
            BuiltinId::Set => Signature::fixed("set", &["iterable"], 0),
            BuiltinId::Dict => Signature::fixed("dict", &["iterable"], 0).with_kwargs(),
            BuiltinId::Type => Signature::fixed("type", &["object"], 1),
            BuiltinId::IsInstance => Signature::fixed("isinstance", &["obj", "classinfo"], 2),
            BuiltinId::HasAttr => Signature::fixed("hasattr", &["obj", "name"], 2),
            BuiltinId::GetAttr => Signature::fixed("getattr", &["obj", "name", "default"], 2),
            BuiltinId::SetAttr => Signature::fixed("setattr", &["obj", "name", "value"], 3),
            BuiltinId::DelAttr => Signature::fixed("delattr", &["obj", "name"], 2),
            BuiltinId::Id => Signature::fixed("id", &["obj"], 1),
            BuiltinId::Hash => Signature::fixed("hash", &["obj"], 1),
        }
    }
}

impl TryFrom<u16> for BuiltinId {
    type Error = u16;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|id| *id as u16 == value)
            .ok_or(value)
    }
}

/// Anything a compiled program can call.
pub enum Callable {
    Builtin(BuiltinId),
    /// A method looked up on a builtin value (`xs.append`)
    Method { receiver: Value, name: Rc<str> },
    /// A host function, typically a compiled lambda passed as `key=`
    Native {
        name: Rc<str>,
        function: Box<dyn Fn(Args) -> Result<Value, RuntimeError>>,
    },
}

impl Callable {
    /// Wraps a host closure as a callable value.
    pub fn native(
        name: &str,
        function: impl Fn(Args) -> Result<Value, RuntimeError> + 'static,
    ) -> Value {
        Value::Function(Rc::new(Callable::Native {
            name: Rc::from(name),
            function: Box::new(function),
        }))
    }

    pub fn builtin(id: BuiltinId) -> Value {
        Value::Function(Rc::new(Callable::Builtin(id)))
    }

    pub fn name(&self) -> &str {
        match self {
            Callable::Builtin(id) => id.name(),
            Callable::Method { name, .. } | Callable::Native { name, .. } => name.as_ref(),
        }
    }

    pub fn call(&self, args: Args) -> Result<Value, RuntimeError> {
        match self {
            Callable::Builtin(id) => call_builtin(*id, args),
            Callable::Method { receiver, name } => call_method(receiver, name, args),
            Callable::Native { function, .. } => function(args),
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Builtin(id) => f.debug_tuple("Builtin").field(id).finish(),
            Callable::Method { receiver, name } => f
                .debug_struct("Method")
                .field("receiver", &receiver.type_name())
                .field("name", name)
                .finish(),
            Callable::Native { name, .. } => f.debug_struct("Native").field("name", name).finish(),
        }
    }
}

/// Calls a callable value: a function, or a type used as its constructor.
pub fn call_value(callee: &Value, args: Args) -> Result<Value, RuntimeError> {
    match callee {
        Value::Function(function) => function.call(args),
        Value::Type(tag) => match tag.constructor() {
            Some(id) => call_builtin(id, args),
            None => Err(RuntimeError::type_error(format!(
                "cannot create '{}' instances",
                tag.name()
            ))),
        },
        other => Err(RuntimeError::type_error(format!(
            "'{}' object is not callable",
            other.type_name()
        ))),
    }
}

fn text_arg<'a>(value: &'a Value, what: &str) -> Result<&'a str, RuntimeError> {
    value.as_str().ok_or_else(|| {
        RuntimeError::type_error(format!("{what} must be str, not {}", value.type_name()))
    })
}

fn optional_text(value: Option<Value>, what: &str) -> Result<Option<String>, RuntimeError> {
    match value {
        None | Some(Value::None) => Ok(None),
        Some(Value::Str(s)) => Ok(Some(s.to_string())),
        Some(other) => Err(RuntimeError::type_error(format!(
            "{what} must be None or a string, not {}",
            other.type_name()
        ))),
    }
}

/// Dynamic entry point: binds `args` against the builtin's signature and
/// runs it.
pub fn call_builtin(id: BuiltinId, args: Args) -> Result<Value, RuntimeError> {
    tracing::trace!(
        builtin = id.name(),
        positional = args.positional.len(),
        keywords = args.keywords.len(),
        "dispatch"
    );
    let result = dispatch(id, args);
    if let Err(err) = &result {
        tracing::debug!(builtin = id.name(), kind = %err.kind, "builtin raised");
    }
    result
}

fn dispatch(builtin: BuiltinId, args: Args) -> Result<Value, RuntimeError> {
    let mut bound = builtin.signature().bind(args)?;

    match builtin {
        BuiltinId::Print => {
            let defaults = PrintOptions::default();
            let options = PrintOptions {
                sep: optional_text(bound.take(0), "sep")?.unwrap_or(defaults.sep),
                end: optional_text(bound.take(1), "end")?.unwrap_or(defaults.end),
                flush: bound.take(3).is_some_and(|flush| flush.is_truthy()),
            };
            if let Some(file) = bound.take_some(2) {
                return Err(RuntimeError::type_error(format!(
                    "print() cannot write to a '{}' object; redirect stdout instead",
                    file.type_name()
                )));
            }
            print(&bound.rest, &options)?;
            Ok(Value::None)
        }
        BuiltinId::Len => Ok(Value::from(len(&bound.required(0)?)?)),
        BuiltinId::Abs => abs(&bound.required(0)?),
        BuiltinId::Min | BuiltinId::Max => {
            let options = MinMaxOptions {
                key: bound.take_some(0),
                default: bound.take(1),
            };
            if builtin == BuiltinId::Min {
                min(&bound.rest, &options)
            } else {
                max(&bound.rest, &options)
            }
        }
        BuiltinId::Sum => {
            let start = bound.take(1).unwrap_or_else(|| Value::from(0));
            sum(&bound.required(0)?, start)
        }
        BuiltinId::All => Ok(Value::Bool(all(&bound.required(0)?)?)),
        BuiltinId::Any => Ok(Value::Bool(any(&bound.required(0)?)?)),
        BuiltinId::Enumerate => {
            let start = bound.take(1).unwrap_or_else(|| Value::from(0));
            enumerate(&bound.required(0)?, &start)
        }
        BuiltinId::Zip => zip(&bound.rest),
        BuiltinId::Range => range(&bound.rest),
        BuiltinId::Iter => iter(&bound.required(0)?),
        BuiltinId::Next => {
            let iterator = bound.required(0)?;
            match (next(&iterator)?, bound.take(1)) {
                (Some(item), _) => Ok(item),
                (None, Some(default)) => Ok(default),
                (None, None) => Err(RuntimeError::stop_iteration()),
            }
        }
        BuiltinId::Sorted => {
            let iterable = bound.required(0)?;
            let key = bound.take_some(1);
            let reverse = bound.take(2).is_some_and(|flag| flag.is_truthy());
            sorted(&iterable, key.as_ref(), reverse)
        }
        BuiltinId::Reversed => reversed(&bound.required(0)?),
        BuiltinId::Bool => Ok(Value::Bool(to_bool(bound.take(0).as_ref()))),
        BuiltinId::Int => {
            let base = match bound.take(1) {
                Some(base) => Some(base.as_index()?),
                None => None,
            };
            match bound.take(0) {
                Some(x) => to_int(&x, base),
                None if base.is_some() => {
                    Err(RuntimeError::type_error("int() missing string argument"))
                }
                None => Ok(Value::from(0)),
            }
        }
        BuiltinId::Float => match bound.take(0) {
            Some(x) => to_float(&x),
            None => Ok(Value::from(0.0)),
        },
        BuiltinId::Str => {
            let object = bound.take(0);
            if bound.is_given(1) || bound.is_given(2) {
                let found = object.as_ref().map_or("str".to_string(), Value::type_name);
                return Err(RuntimeError::type_error(format!(
                    "decoding to str: need a bytes-like object, {found} found"
                )));
            }
            Ok(object.map_or_else(|| Value::from(""), |object| to_str(&object)))
        }
        BuiltinId::Repr => Ok(repr(&bound.required(0)?)),
        BuiltinId::Ord => ord(&bound.required(0)?),
        BuiltinId::Chr => chr(&bound.required(0)?),
        BuiltinId::List => make_list(bound.take_some(0).as_ref()),
        BuiltinId::Tuple => make_tuple(bound.take_some(0).as_ref()),
        BuiltinId::Set => make_set(bound.take_some(0).as_ref()),
        BuiltinId::Dict => {
            let iterable = bound.take_some(0);
            make_dict(iterable.as_ref(), std::mem::take(&mut bound.extra))
        }
        BuiltinId::Type => Ok(type_of(&bound.required(0)?)),
        BuiltinId::IsInstance => {
            let obj = bound.required(0)?;
            Ok(Value::Bool(isinstance(&obj, &bound.required(1)?)?))
        }
        BuiltinId::HasAttr => {
            let obj = bound.required(0)?;
            let name = bound.required(1)?;
            Ok(Value::Bool(hasattr(&obj, attribute_name(&name)?)))
        }
        BuiltinId::GetAttr => {
            let obj = bound.required(0)?;
            let name = bound.required(1)?;
            getattr(&obj, attribute_name(&name)?, bound.take(2))
        }
        BuiltinId::SetAttr => {
            let obj = bound.required(0)?;
            let name = bound.required(1)?;
            setattr(&obj, attribute_name(&name)?, bound.required(2)?)?;
            Ok(Value::None)
        }
        BuiltinId::DelAttr => {
            let obj = bound.required(0)?;
            let name = bound.required(1)?;
            delattr(&obj, attribute_name(&name)?)?;
            Ok(Value::None)
        }
        BuiltinId::Id => Ok(id(&bound.required(0)?)),
        BuiltinId::Hash => Ok(Value::from(hash(&bound.required(0)?)?)),
    }
}

fn attribute_name(name: &Value) -> Result<&str, RuntimeError> {
    name.as_str().ok_or_else(|| {
        RuntimeError::type_error(format!(
            "attribute name must be string, not '{}'",
            name.type_name()
        ))
    })
}
