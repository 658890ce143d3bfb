use crate::error::RuntimeError;
use crate::protocols::{AttributeBearing, Hashable};
use crate::value::Value;

/// hasattr(obj, name) → bool
pub fn hasattr(obj: &Value, name: &str) -> bool {
    obj.has_attr(name)
}

/// getattr(obj, name, default=?) → attribute value
///
/// Without a default a missing attribute is an AttributeError.
pub fn getattr(obj: &Value, name: &str, default: Option<Value>) -> Result<Value, RuntimeError> {
    match (obj.get_attr(name), default) {
        (Some(value), _) => Ok(value),
        (None, Some(default)) => Ok(default),
        (None, None) => Err(RuntimeError::attribute_error(format!(
            "'{}' object has no attribute '{name}'",
            obj.type_name()
        ))),
    }
}

/// setattr(obj, name, value); only user objects accept new attributes
pub fn setattr(obj: &Value, name: &str, value: Value) -> Result<(), RuntimeError> {
    obj.set_attr(name, value)
}

/// delattr(obj, name)
pub fn delattr(obj: &Value, name: &str) -> Result<(), RuntimeError> {
    obj.del_attr(name)
}

/// id(obj) → int, unique among simultaneously live values
pub fn id(obj: &Value) -> Value {
    Value::from(obj.identity())
}

/// hash(obj) → int; TypeError for mutable containers and objects
pub fn hash(obj: &Value) -> Result<i64, RuntimeError> {
    obj.py_hash()
}
