use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

use crate::value::Value;

/// State of a user object: its class name and attribute table.
#[derive(Debug)]
pub struct Instance {
    pub class_name: Rc<str>,
    pub attributes: IndexMap<Rc<str>, Value>,
}

/// Shared handle to a user object. Objects compare by identity and are
/// unhashable.
#[derive(Clone, Debug)]
pub struct Object(Rc<RefCell<Instance>>);

impl Object {
    pub fn new(class_name: &str) -> Self {
        Object(Rc::new(RefCell::new(Instance {
            class_name: Rc::from(class_name),
            attributes: IndexMap::new(),
        })))
    }

    pub fn with_attributes<'a>(
        class_name: &str,
        attributes: impl IntoIterator<Item = (&'a str, Value)>,
    ) -> Self {
        let object = Object::new(class_name);
        for (name, value) in attributes {
            object.set_attr(name, value);
        }
        object
    }

    pub fn class_name(&self) -> Rc<str> {
        self.0.borrow().class_name.clone()
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    pub fn get_attr(&self, name: &str) -> Option<Value> {
        self.0.borrow().attributes.get(name).cloned()
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.0.borrow().attributes.contains_key(name)
    }

    pub fn set_attr(&self, name: &str, value: Value) {
        self.0.borrow_mut().attributes.insert(Rc::from(name), value);
    }

    /// Returns whether the attribute existed.
    pub fn del_attr(&self, name: &str) -> bool {
        self.0.borrow_mut().attributes.shift_remove(name).is_some()
    }

    pub fn attribute_names(&self) -> Vec<Rc<str>> {
        self.0.borrow().attributes.keys().cloned().collect()
    }
}
