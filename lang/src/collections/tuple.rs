use im_rc::Vector;
use std::rc::Rc;

use super::{normalize_index, slice_positions};
use crate::error::RuntimeError;
use crate::protocols::Iterable;
use crate::value::Value;

/// Immutable ordered sequence. Hashable when all of its elements are.
#[derive(Clone, Debug, Default)]
pub struct Tuple(Rc<Vector<Value>>);

impl Tuple {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        Self::from_vector(values.into_iter().collect())
    }

    pub fn from_vector(values: Vector<Value>) -> Self {
        Tuple(Rc::new(values))
    }

    pub fn from_iterable(iterable: &Value) -> Result<Self, RuntimeError> {
        if let Value::Tuple(tuple) = iterable {
            return Ok(tuple.clone());
        }
        Ok(Self::from_values(iterable.py_iter()?))
    }

    pub fn values(&self) -> &Vector<Value> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ptr_eq(&self, other: &Tuple) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    pub fn item_at(&self, position: usize) -> Option<Value> {
        self.0.get(position).cloned()
    }

    pub fn get(&self, index: i64) -> Result<Value, RuntimeError> {
        normalize_index(index, self.0.len())
            .and_then(|position| self.item_at(position))
            .ok_or_else(|| RuntimeError::index_error("tuple index out of range"))
    }

    pub fn count(&self, value: &Value) -> usize {
        self.0.iter().filter(|item| item.is(value) || *item == value).count()
    }

    pub fn index(&self, value: &Value) -> Result<usize, RuntimeError> {
        self.0
            .iter()
            .position(|item| item.is(value) || item == value)
            .ok_or_else(|| RuntimeError::value_error("tuple.index(x): x not in tuple"))
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.0.iter().any(|item| item.is(value) || item == value)
    }

    pub fn slice(
        &self,
        start: Option<i64>,
        stop: Option<i64>,
        step: Option<i64>,
    ) -> Result<Tuple, RuntimeError> {
        let positions = slice_positions(self.0.len(), start, stop, step)?;
        Ok(Tuple::from_values(
            positions.into_iter().filter_map(|i| self.item_at(i)),
        ))
    }
}
