use im_rc::Vector;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

use super::{normalize_index, slice_positions};
use crate::builtins::{Args, call_value};
use crate::error::RuntimeError;
use crate::protocols::{Comparable, Iterable};
use crate::value::Value;

/// Mutable, shared, ordered sequence.
///
/// Backed by a persistent vector so that snapshots (`copy`, iteration
/// for comparison, `list(xs)`) are O(1) structural copies.
#[derive(Clone, Debug, Default)]
pub struct List(Rc<RefCell<Vector<Value>>>);

impl List {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        Self::from_vector(values.into_iter().collect())
    }

    pub fn from_vector(values: Vector<Value>) -> Self {
        List(Rc::new(RefCell::new(values)))
    }

    /// Builds a list from any iterable value.
    pub fn from_iterable(iterable: &Value) -> Result<Self, RuntimeError> {
        Ok(Self::from_values(iterable.py_iter()?))
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Current contents, detached from later mutation.
    pub fn snapshot(&self) -> Vector<Value> {
        self.0.borrow().clone()
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().iter().cloned().collect()
    }

    pub fn ptr_eq(&self, other: &List) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    /// Element at a non-negative position, as read by an iterator cursor.
    pub fn item_at(&self, position: usize) -> Option<Value> {
        self.0.borrow().get(position).cloned()
    }

    /// `xs[index]`
    pub fn get(&self, index: i64) -> Result<Value, RuntimeError> {
        let items = self.0.borrow();
        normalize_index(index, items.len())
            .and_then(|position| items.get(position).cloned())
            .ok_or_else(|| RuntimeError::index_error("list index out of range"))
    }

    /// `xs[index] = value`
    pub fn set_item(&self, index: i64, value: Value) -> Result<(), RuntimeError> {
        let mut items = self.0.borrow_mut();
        let position = normalize_index(index, items.len())
            .ok_or_else(|| RuntimeError::index_error("list assignment index out of range"))?;
        items.set(position, value);
        Ok(())
    }

    /// `del xs[index]`
    pub fn del_item(&self, index: i64) -> Result<(), RuntimeError> {
        let mut items = self.0.borrow_mut();
        let position = normalize_index(index, items.len())
            .ok_or_else(|| RuntimeError::index_error("list assignment index out of range"))?;
        items.remove(position);
        Ok(())
    }

    pub fn append(&self, value: Value) {
        self.0.borrow_mut().push_back(value);
    }

    /// Appends every element of `iterable`. The iterable is drained before
    /// the list is touched, so `xs.extend(xs)` doubles `xs`.
    pub fn extend(&self, iterable: &Value) -> Result<(), RuntimeError> {
        let incoming: Vec<Value> = iterable.py_iter()?.collect();
        self.0.borrow_mut().extend(incoming);
        Ok(())
    }

    /// Inserts before `index`; out-of-range indices clamp to either end.
    pub fn insert(&self, index: i64, value: Value) {
        let mut items = self.0.borrow_mut();
        let len = items.len() as i64;
        let position = if index < 0 {
            (index + len).max(0)
        } else {
            index.min(len)
        };
        items.insert(position as usize, value);
    }

    /// Removes and returns the element at `index` (default: last).
    pub fn pop(&self, index: Option<i64>) -> Result<Value, RuntimeError> {
        let mut items = self.0.borrow_mut();
        if items.is_empty() {
            return Err(RuntimeError::index_error("pop from empty list"));
        }
        let position = normalize_index(index.unwrap_or(-1), items.len())
            .ok_or_else(|| RuntimeError::index_error("pop index out of range"))?;
        Ok(items.remove(position))
    }

    pub fn reverse(&self) {
        let mut items = self.0.borrow_mut();
        let reversed: Vector<Value> = items.iter().rev().cloned().collect();
        *items = reversed;
    }

    /// Removes the first element equal to `value`.
    pub fn remove(&self, value: &Value) -> Result<(), RuntimeError> {
        let position = self.position(value).ok_or_else(|| {
            RuntimeError::value_error(format!("list.remove(x): {} not in list", value.repr()))
        })?;
        self.0.borrow_mut().remove(position);
        Ok(())
    }

    /// Position of the first element equal to `value`.
    pub fn index(&self, value: &Value) -> Result<usize, RuntimeError> {
        self.position(value)
            .ok_or_else(|| RuntimeError::value_error(format!("{} is not in list", value.repr())))
    }

    pub fn count(&self, value: &Value) -> usize {
        self.snapshot().iter().filter(|item| item.is(value) || *item == value).count()
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.position(value).is_some()
    }

    fn position(&self, value: &Value) -> Option<usize> {
        self.snapshot().iter().position(|item| item.is(value) || item == value)
    }

    /// Stable in-place sort, optionally by `key(element)`, comparing with `<`.
    ///
    /// With `reverse`, equal elements keep their original order. When a
    /// comparison or key call fails the list is left unchanged.
    pub fn sort(&self, key: Option<&Value>, reverse: bool) -> Result<(), RuntimeError> {
        let items = self.snapshot();
        let mut keyed = Vec::with_capacity(items.len());
        for item in items {
            let sort_key = match key {
                Some(key) => call_value(key, Args::from(vec![item.clone()]))?,
                None => item.clone(),
            };
            keyed.push((sort_key, item));
        }

        let mut failure = None;
        keyed.sort_by(|(a, _), (b, _)| {
            if failure.is_some() {
                return Ordering::Equal;
            }
            let (left, right) = if reverse { (b, a) } else { (a, b) };
            match left.py_lt(right) {
                Ok(true) => Ordering::Less,
                Ok(false) => match right.py_lt(left) {
                    Ok(true) => Ordering::Greater,
                    Ok(false) => Ordering::Equal,
                    Err(err) => {
                        failure = Some(err);
                        Ordering::Equal
                    }
                },
                Err(err) => {
                    failure = Some(err);
                    Ordering::Equal
                }
            }
        });
        if let Some(err) = failure {
            return Err(err);
        }

        *self.0.borrow_mut() = keyed.into_iter().map(|(_, item)| item).collect();
        Ok(())
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Shallow copy with a fresh identity.
    pub fn copy(&self) -> List {
        List::from_vector(self.snapshot())
    }

    pub fn slice(
        &self,
        start: Option<i64>,
        stop: Option<i64>,
        step: Option<i64>,
    ) -> Result<List, RuntimeError> {
        let items = self.snapshot();
        let positions = slice_positions(items.len(), start, stop, step)?;
        Ok(List::from_values(
            positions.into_iter().filter_map(|i| items.get(i).cloned()),
        ))
    }
}
