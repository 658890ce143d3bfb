use std::rc::Rc;

use crate::error::RuntimeError;
use crate::value::Value;

/// Arguments of a dynamic call: positionals in order plus keyword pairs.
#[derive(Clone, Debug, Default)]
pub struct Args {
    pub positional: Vec<Value>,
    pub keywords: Vec<(Rc<str>, Value)>,
}

impl Args {
    pub fn new(positional: Vec<Value>) -> Self {
        Self {
            positional,
            keywords: Vec::new(),
        }
    }

    pub fn keyword(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.keywords.push((Rc::from(name), value.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.positional.len() + self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<Value>> for Args {
    fn from(positional: Vec<Value>) -> Self {
        Args::new(positional)
    }
}

/// Static description of how a callable binds its arguments.
///
/// Named `params` bind positionally (in order) or by keyword. With
/// `varargs`, every positional argument goes to [`Bound::rest`] and the
/// named params become keyword-only. With `kwargs`, unknown keywords are
/// collected in [`Bound::extra`] instead of being rejected.
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    pub name: &'static str,
    pub params: &'static [&'static str],
    pub required: usize,
    pub varargs: bool,
    pub kwargs: bool,
}

impl Signature {
    pub const fn fixed(
        name: &'static str,
        params: &'static [&'static str],
        required: usize,
    ) -> Self {
        Self {
            name,
            params,
            required,
            varargs: false,
            kwargs: false,
        }
    }

    pub const fn variadic(name: &'static str, keyword_only: &'static [&'static str]) -> Self {
        Self {
            name,
            params: keyword_only,
            required: 0,
            varargs: true,
            kwargs: false,
        }
    }

    pub const fn with_kwargs(mut self) -> Self {
        self.kwargs = true;
        self
    }

    pub fn bind(&self, args: Args) -> Result<Bound, RuntimeError> {
        let Args {
            positional,
            keywords,
        } = args;
        let mut slots: Vec<Option<Value>> = vec![None; self.params.len()];
        let mut rest = Vec::new();

        if self.varargs {
            rest = positional;
        } else {
            if positional.len() > self.params.len() {
                return Err(self.too_many(positional.len()));
            }
            for (slot, value) in slots.iter_mut().zip(positional) {
                *slot = Some(value);
            }
        }

        let mut extra = Vec::new();
        for (name, value) in keywords {
            match self.params.iter().position(|param| **param == *name) {
                Some(i) if slots[i].is_some() => {
                    return Err(RuntimeError::type_error(format!(
                        "{}() got multiple values for argument '{name}'",
                        self.name
                    )));
                }
                Some(i) => slots[i] = Some(value),
                None if self.kwargs => extra.push((name, value)),
                None => {
                    return Err(RuntimeError::type_error(format!(
                        "{}() got an unexpected keyword argument '{name}'",
                        self.name
                    )));
                }
            }
        }

        if let Some(missing) = (0..self.required).find(|&i| slots[i].is_none()) {
            return Err(RuntimeError::type_error(format!(
                "{}() missing required argument '{}' (pos {})",
                self.name,
                self.params[missing],
                missing + 1
            )));
        }

        Ok(Bound { slots, rest, extra })
    }

    fn too_many(&self, given: usize) -> RuntimeError {
        let expected = self.params.len();
        let message = match (self.required == expected, expected) {
            (true, 0) => format!("{}() takes no arguments ({given} given)", self.name),
            (true, 1) => format!("{}() takes exactly one argument ({given} given)", self.name),
            (true, n) => format!("{}() takes exactly {n} arguments ({given} given)", self.name),
            (false, n) => format!("{}() takes at most {n} arguments ({given} given)", self.name),
        };
        RuntimeError::type_error(message)
    }
}

/// Arguments after binding against a [`Signature`].
#[derive(Debug)]
pub struct Bound {
    slots: Vec<Option<Value>>,
    pub rest: Vec<Value>,
    pub extra: Vec<(Rc<str>, Value)>,
}

impl Bound {
    /// The argument bound to param `i`, if one was supplied.
    pub fn take(&mut self, i: usize) -> Option<Value> {
        self.slots.get_mut(i).and_then(Option::take)
    }

    /// Like [`Bound::take`], treating an explicit `None` as omitted.
    pub fn take_some(&mut self, i: usize) -> Option<Value> {
        self.take(i).filter(|value| !value.is_none())
    }

    /// A param the signature marks as required.
    pub fn required(&mut self, i: usize) -> Result<Value, RuntimeError> {
        self.take(i)
            .ok_or_else(|| RuntimeError::type_error("missing required argument"))
    }

    pub fn is_given(&self, i: usize) -> bool {
        self.slots.get(i).is_some_and(Option::is_some)
    }
}
