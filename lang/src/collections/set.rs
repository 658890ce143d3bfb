use indexmap::IndexSet;
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::protocols::Iterable;
use crate::value::{HashKey, Value};

/// Mutable, shared collection of unique hashable members.
///
/// Members iterate in insertion order.
#[derive(Clone, Debug, Default)]
pub struct Set(Rc<RefCell<IndexSet<HashKey>>>);

impl Set {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_keys(keys: IndexSet<HashKey>) -> Self {
        Set(Rc::new(RefCell::new(keys)))
    }

    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Result<Self, RuntimeError> {
        let keys = values
            .into_iter()
            .map(HashKey::new)
            .collect::<Result<IndexSet<_>, _>>()?;
        Ok(Self::from_keys(keys))
    }

    pub fn from_iterable(iterable: &Value) -> Result<Self, RuntimeError> {
        Self::from_values(iterable.py_iter()?)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn ptr_eq(&self, other: &Set) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    /// Snapshot of the members in insertion order.
    pub fn members(&self) -> Vec<Value> {
        self.0.borrow().iter().map(|key| key.value().clone()).collect()
    }

    pub fn member_at(&self, position: usize) -> Option<Value> {
        self.0.borrow().get_index(position).map(|key| key.value().clone())
    }

    pub(crate) fn members_equal(&self, other: &Set) -> bool {
        self.len() == other.len() && self.is_subset(other)
    }

    pub fn add(&self, value: Value) -> Result<(), RuntimeError> {
        let key = HashKey::new(value)?;
        self.0.borrow_mut().insert(key);
        Ok(())
    }

    /// Removes `value`, failing with KeyError when absent.
    pub fn remove(&self, value: &Value) -> Result<(), RuntimeError> {
        let key = HashKey::new(value.clone())?;
        if self.0.borrow_mut().shift_remove(&key) {
            Ok(())
        } else {
            Err(RuntimeError::key_error(value.repr()))
        }
    }

    /// Removes `value` if present.
    pub fn discard(&self, value: &Value) -> Result<(), RuntimeError> {
        let key = HashKey::new(value.clone())?;
        self.0.borrow_mut().shift_remove(&key);
        Ok(())
    }

    pub fn contains(&self, value: &Value) -> Result<bool, RuntimeError> {
        let key = HashKey::new(value.clone())?;
        Ok(self.0.borrow().contains(&key))
    }

    pub fn union(&self, other: &Set) -> Set {
        let mut keys = self.0.borrow().clone();
        keys.extend(other.0.borrow().iter().cloned());
        Set::from_keys(keys)
    }

    pub fn intersection(&self, other: &Set) -> Set {
        let theirs = other.0.borrow();
        Set::from_keys(
            self.0
                .borrow()
                .iter()
                .filter(|key| theirs.contains(*key))
                .cloned()
                .collect(),
        )
    }

    pub fn difference(&self, other: &Set) -> Set {
        let theirs = other.0.borrow();
        Set::from_keys(
            self.0
                .borrow()
                .iter()
                .filter(|key| !theirs.contains(*key))
                .cloned()
                .collect(),
        )
    }

    /// Every member of `self` is a member of `other`.
    pub fn is_subset(&self, other: &Set) -> bool {
        let theirs = other.0.borrow();
        self.0.borrow().iter().all(|key| theirs.contains(key))
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn copy(&self) -> Set {
        Set::from_keys(self.0.borrow().clone())
    }
}
