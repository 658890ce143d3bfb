use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::iter::LazySeq;
use crate::protocols::Iterable;
use crate::value::{HashKey, Value};

/// Mutable, shared mapping that remembers insertion order.
#[derive(Clone, Debug, Default)]
pub struct Dict(Rc<RefCell<IndexMap<HashKey, Value>>>);

fn missing(key: &Value) -> RuntimeError {
    RuntimeError::key_error(key.repr())
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a dict from `(key, value)` pairs; later duplicates overwrite.
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (Value, Value)>,
    ) -> Result<Self, RuntimeError> {
        let dict = Dict::new();
        for (key, value) in pairs {
            dict.set_item(key, value)?;
        }
        Ok(dict)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn ptr_eq(&self, other: &Dict) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    /// Snapshot of the entries in insertion order.
    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.0
            .borrow()
            .iter()
            .map(|(key, value)| (key.value().clone(), value.clone()))
            .collect()
    }

    /// Entry at an insertion-order position, as read by an iterator cursor.
    pub fn entry_at(&self, position: usize) -> Option<(Value, Value)> {
        self.0
            .borrow()
            .get_index(position)
            .map(|(key, value)| (key.value().clone(), value.clone()))
    }

    pub(crate) fn entries_equal(&self, other: &Dict) -> bool {
        let (ours, theirs) = (self.0.borrow(), other.0.borrow());
        ours.len() == theirs.len()
            && ours.iter().all(|(key, value)| {
                theirs
                    .get(key)
                    .is_some_and(|candidate| candidate.is(value) || candidate == value)
            })
    }

    /// `d.get(key, default)`
    pub fn get(&self, key: &Value, default: Value) -> Result<Value, RuntimeError> {
        let key = HashKey::new(key.clone())?;
        Ok(self.0.borrow().get(&key).cloned().unwrap_or(default))
    }

    /// `d[key]`
    pub fn get_item(&self, key: &Value) -> Result<Value, RuntimeError> {
        let probe = HashKey::new(key.clone())?;
        self.0.borrow().get(&probe).cloned().ok_or_else(|| missing(key))
    }

    /// `d[key] = value`. An existing key keeps its position and its
    /// original key object.
    pub fn set_item(&self, key: Value, value: Value) -> Result<(), RuntimeError> {
        let key = HashKey::new(key)?;
        self.0.borrow_mut().insert(key, value);
        Ok(())
    }

    /// `del d[key]`
    pub fn del_item(&self, key: &Value) -> Result<(), RuntimeError> {
        let probe = HashKey::new(key.clone())?;
        self.0
            .borrow_mut()
            .shift_remove(&probe)
            .map(|_| ())
            .ok_or_else(|| missing(key))
    }

    /// `d.pop(key[, default])`
    pub fn pop(&self, key: &Value, default: Option<Value>) -> Result<Value, RuntimeError> {
        let probe = HashKey::new(key.clone())?;
        let removed = self.0.borrow_mut().shift_remove(&probe);
        match (removed, default) {
            (Some(value), _) => Ok(value),
            (None, Some(default)) => Ok(default),
            (None, None) => Err(missing(key)),
        }
    }

    /// `key in d`
    pub fn contains_key(&self, key: &Value) -> Result<bool, RuntimeError> {
        let probe = HashKey::new(key.clone())?;
        Ok(self.0.borrow().contains_key(&probe))
    }

    /// `d.setdefault(key, default)`
    pub fn setdefault(&self, key: Value, default: Value) -> Result<Value, RuntimeError> {
        let key = HashKey::new(key)?;
        let mut entries = self.0.borrow_mut();
        Ok(entries.entry(key).or_insert(default).clone())
    }

    pub fn keys(&self) -> Value {
        Value::lazy(LazySeq::DictKeys {
            source: self.clone(),
            index: 0,
        })
    }

    pub fn values(&self) -> Value {
        Value::lazy(LazySeq::DictValues {
            source: self.clone(),
            index: 0,
        })
    }

    pub fn items(&self) -> Value {
        Value::lazy(LazySeq::DictItems {
            source: self.clone(),
            index: 0,
        })
    }

    /// `d.update(other)`: `other` is a dict or an iterable of key/value
    /// pairs.
    pub fn update(&self, other: &Value) -> Result<(), RuntimeError> {
        if let Value::Dict(source) = other {
            for (key, value) in source.entries() {
                self.set_item(key, value)?;
            }
            return Ok(());
        }
        for (position, element) in other.py_iter()?.enumerate() {
            let (key, value) = pair_of(&element, position)?;
            self.set_item(key, value)?;
        }
        Ok(())
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn copy(&self) -> Dict {
        Dict(Rc::new(RefCell::new(self.0.borrow().clone())))
    }
}

fn pair_of(element: &Value, position: usize) -> Result<(Value, Value), RuntimeError> {
    let items: Vec<Value> = match element.py_iter() {
        Ok(items) => items.collect(),
        Err(_) => {
            return Err(RuntimeError::type_error(format!(
                "cannot convert dictionary update sequence element #{position} to a sequence"
            )));
        }
    };
    match <[Value; 2]>::try_from(items) {
        Ok([key, value]) => Ok((key, value)),
        Err(items) => Err(RuntimeError::value_error(format!(
            "dictionary update sequence element #{position} has length {}; 2 is required",
            items.len()
        ))),
    }
}
