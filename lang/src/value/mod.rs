use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};
use ordered_float::OrderedFloat;
use std::cell::RefCell;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::builtins::{BuiltinId, Callable};
use crate::collections::{Dict, List, Object, Set, Tuple};
use crate::error::RuntimeError;
use crate::iter::{LazySeq, RangeSpec};

mod display;
mod hash;
pub mod ops;

#[cfg(test)]
mod tests;

pub use display::format_float;
pub use hash::HashKey;

/// Runtime value manipulated by compiled programs.
///
/// Scalars are stored inline. Text, containers, user objects and callables
/// live behind `Rc`, so cloning a `Value` aliases the same storage: a
/// mutation through one binding is visible through every other.
#[derive(Clone, Debug)]
pub enum Value {
    /// The absent value
    None,

    Bool(bool),

    /// Arbitrary-precision integer
    Int(BigInt),

    /// IEEE 754 double
    Float(OrderedFloat<f64>),

    /// Immutable Unicode text, indexed by code point
    Str(Rc<str>),

    /// Mutable ordered sequence
    List(List),

    /// Immutable ordered sequence
    Tuple(Tuple),

    /// Insertion-ordered mapping from hashable keys
    Dict(Dict),

    /// Collection of unique hashable members
    Set(Set),

    /// Instance of a compiled class: a class name plus an attribute table
    Object(Object),

    /// Restartable integer sequence produced by `range`
    Range(RangeSpec),

    /// One-shot iterator (enumerate, zip, container iterators)
    LazySequence(Rc<RefCell<LazySeq>>),

    /// Builtin, bound method or host function
    Function(Rc<Callable>),

    /// Type discriminator returned by `type()`
    Type(TypeTag),
}

/// Discriminator of a value's runtime type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Root of the hierarchy; every value is an instance of it
    Object,
    NoneType,
    Bool,
    Int,
    Float,
    Str,
    List,
    Tuple,
    Dict,
    Set,
    Range,
    BuiltinFunction,
    Function,
    Type,
    /// Iterator kinds (`enumerate`, `zip`, `list_iterator`, ...)
    Iterator(&'static str),
    /// User class, by name
    Instance(Rc<str>),
}

impl TypeTag {
    pub fn name(&self) -> &str {
        match self {
            TypeTag::Object => "object",
            TypeTag::NoneType => "NoneType",
            TypeTag::Bool => "bool",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Str => "str",
            TypeTag::List => "list",
            TypeTag::Tuple => "tuple",
            TypeTag::Dict => "dict",
            TypeTag::Set => "set",
            TypeTag::Range => "range",
            TypeTag::BuiltinFunction => "builtin_function_or_method",
            TypeTag::Function => "function",
            TypeTag::Type => "type",
            TypeTag::Iterator(kind) => *kind,
            TypeTag::Instance(class) => class.as_ref(),
        }
    }

    /// Subtype relation used by `isinstance`: every type derives from
    /// `object`, and `bool` derives from `int`.
    pub fn is_subtype_of(&self, other: &TypeTag) -> bool {
        self == other
            || *other == TypeTag::Object
            || (*self == TypeTag::Bool && *other == TypeTag::Int)
    }

    /// The builtin invoked when the type itself is called.
    pub fn constructor(&self) -> Option<BuiltinId> {
        match self {
            TypeTag::Bool => Some(BuiltinId::Bool),
            TypeTag::Int => Some(BuiltinId::Int),
            TypeTag::Float => Some(BuiltinId::Float),
            TypeTag::Str => Some(BuiltinId::Str),
            TypeTag::List => Some(BuiltinId::List),
            TypeTag::Tuple => Some(BuiltinId::Tuple),
            TypeTag::Dict => Some(BuiltinId::Dict),
            TypeTag::Set => Some(BuiltinId::Set),
            TypeTag::Range => Some(BuiltinId::Range),
            TypeTag::Type => Some(BuiltinId::Type),
            TypeTag::Iterator("enumerate") => Some(BuiltinId::Enumerate),
            TypeTag::Iterator("zip") => Some(BuiltinId::Zip),
            _ => None,
        }
    }
}

// Identity tokens for immediates are odd; heap addresses are at least
// 2-aligned, so the two never collide.
const NONE_IDENTITY: usize = 0x11;
const FALSE_IDENTITY: usize = 0x21;
const TRUE_IDENTITY: usize = 0x31;

impl Value {
    pub fn int(n: impl Into<BigInt>) -> Value {
        Value::Int(n.into())
    }

    pub fn float(f: f64) -> Value {
        Value::Float(OrderedFloat(f))
    }

    pub fn str(s: impl AsRef<str>) -> Value {
        Value::Str(Rc::from(s.as_ref()))
    }

    pub fn list(values: impl IntoIterator<Item = Value>) -> Value {
        Value::List(List::from_values(values))
    }

    pub fn tuple(values: impl IntoIterator<Item = Value>) -> Value {
        Value::Tuple(Tuple::from_values(values))
    }

    pub fn lazy(seq: LazySeq) -> Value {
        Value::LazySequence(Rc::new(RefCell::new(seq)))
    }

    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::None => TypeTag::NoneType,
            Value::Bool(_) => TypeTag::Bool,
            Value::Int(_) => TypeTag::Int,
            Value::Float(_) => TypeTag::Float,
            Value::Str(_) => TypeTag::Str,
            Value::List(_) => TypeTag::List,
            Value::Tuple(_) => TypeTag::Tuple,
            Value::Dict(_) => TypeTag::Dict,
            Value::Set(_) => TypeTag::Set,
            Value::Object(object) => TypeTag::Instance(object.class_name()),
            Value::Range(_) => TypeTag::Range,
            Value::LazySequence(seq) => TypeTag::Iterator(seq.borrow().kind()),
            Value::Function(function) => match function.as_ref() {
                Callable::Native { .. } => TypeTag::Function,
                _ => TypeTag::BuiltinFunction,
            },
            Value::Type(_) => TypeTag::Type,
        }
    }

    /// Type name for error messages
    pub fn type_name(&self) -> String {
        self.type_tag().name().to_string()
    }

    /// Identity token, stable for as long as the value is alive.
    ///
    /// Heap values use their allocation address. Immediates (numbers, ranges,
    /// type tags) derive the token from their contents, so equal immediates
    /// share an identity.
    pub fn identity(&self) -> usize {
        match self {
            Value::None => NONE_IDENTITY,
            Value::Bool(false) => FALSE_IDENTITY,
            Value::Bool(true) => TRUE_IDENTITY,
            Value::Int(n) => immediate_identity(0, n),
            Value::Float(f) => immediate_identity(1, f),
            Value::Range(range) => immediate_identity(2, &(range.start, range.stop, range.step)),
            Value::Type(tag) => immediate_identity(3, tag),
            Value::Str(s) => Rc::as_ptr(s) as *const u8 as usize,
            Value::List(list) => list.identity(),
            Value::Tuple(tuple) => tuple.identity(),
            Value::Dict(dict) => dict.identity(),
            Value::Set(set) => set.identity(),
            Value::Object(object) => object.identity(),
            Value::LazySequence(seq) => Rc::as_ptr(seq) as usize,
            Value::Function(function) => Rc::as_ptr(function) as usize,
        }
    }

    /// `a is b`
    ///
    /// Floats carry no allocation, so two of them are the same object only
    /// when they compare equal. A NaN is never identical to anything.
    pub fn is(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) if a.0 != b.0 => false,
            _ => self.identity() == other.identity(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view of a value used as an index, count or code point.
    /// Booleans count as 0 and 1.
    pub fn as_index(&self) -> Result<i64, RuntimeError> {
        match self {
            Value::Bool(b) => Ok(i64::from(*b)),
            Value::Int(n) => n.to_i64().ok_or_else(|| {
                RuntimeError::index_error("cannot fit 'int' into an index-sized integer")
            }),
            other => Err(RuntimeError::type_error(format!(
                "'{}' object cannot be interpreted as an integer",
                other.type_name()
            ))),
        }
    }

    /// Integer view without the index-size limit
    pub fn as_bigint(&self) -> Option<BigInt> {
        match self {
            Value::Bool(b) => Some(BigInt::from(u8::from(*b))),
            Value::Int(n) => Some(n.clone()),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Value::Bool(b) => !*b,
            Value::Int(n) => n.is_zero(),
            Value::Float(f) => f.0 == 0.0,
            _ => false,
        }
    }
}

fn immediate_identity<T: Hash + ?Sized>(salt: u8, value: &T) -> usize {
    let mut hasher = DefaultHasher::new();
    salt.hash(&mut hasher);
    value.hash(&mut hasher);
    (hasher.finish() as usize >> 1) | 1
}

/// Structural equality with numeric cross-kind comparison
/// (`1 == 1.0 == True`). Identical objects are always equal to
/// themselves, even when they contain NaN.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if let Some(equal) = ops::numeric_eq(self, other) {
            return equal;
        }
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                a.ptr_eq(b) || sequences_equal(&a.snapshot(), &b.snapshot())
            }
            (Value::Tuple(a), Value::Tuple(b)) => {
                a.ptr_eq(b) || sequences_equal(a.values(), b.values())
            }
            (Value::Dict(a), Value::Dict(b)) => a.ptr_eq(b) || a.entries_equal(b),
            (Value::Set(a), Value::Set(b)) => a.ptr_eq(b) || a.members_equal(b),
            (Value::Range(a), Value::Range(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::LazySequence(a), Value::LazySequence(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Type(a), Value::Type(b)) => a == b,
            _ => false,
        }
    }
}

fn sequences_equal(a: &im_rc::Vector<Value>, b: &im_rc::Vector<Value>) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.is(y) || x == y)
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(BigInt::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(BigInt::from(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Int(BigInt::from(n))
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(OrderedFloat(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<List> for Value {
    fn from(list: List) -> Self {
        Value::List(list)
    }
}

impl From<Tuple> for Value {
    fn from(tuple: Tuple) -> Self {
        Value::Tuple(tuple)
    }
}

impl From<Dict> for Value {
    fn from(dict: Dict) -> Self {
        Value::Dict(dict)
    }
}

impl From<Set> for Value {
    fn from(set: Set) -> Self {
        Value::Set(set)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<RangeSpec> for Value {
    fn from(range: RangeSpec) -> Self {
        Value::Range(range)
    }
}

impl From<TypeTag> for Value {
    fn from(tag: TypeTag) -> Self {
        Value::Type(tag)
    }
}
