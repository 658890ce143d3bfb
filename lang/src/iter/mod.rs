//! Ranges and lazy sequences.
//!
//! A lazy sequence over a container holds the container itself plus a
//! position. Each step reads the element at that position from the
//! container's *current* contents, then advances. Elements appended during
//! traversal are therefore visited, and removing an element before the
//! cursor shifts the next one under it (it is skipped). Once a sequence
//! reports exhaustion it stays exhausted.

use im_rc::Vector;
use num_bigint::BigInt;
use std::cell::RefCell;
use std::rc::Rc;

use crate::collections::{Dict, List, Set, Tuple};
use crate::error::RuntimeError;
use crate::value::Value;

#[cfg(test)]
mod tests;

/// Arithmetic progression `start, start + step, ...` stopping before
/// `stop`. The step is never zero.
#[derive(Clone, Copy, Debug)]
pub struct RangeSpec {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl RangeSpec {
    pub fn new(start: i64, stop: i64, step: i64) -> Result<Self, RuntimeError> {
        if step == 0 {
            return Err(RuntimeError::value_error("range() arg 3 must not be zero"));
        }
        Ok(Self { start, stop, step })
    }

    pub fn len(&self) -> usize {
        let (start, stop, step) = (
            i128::from(self.start),
            i128::from(self.stop),
            i128::from(self.step),
        );
        let len = if step > 0 && start < stop {
            (stop - start - 1) / step + 1
        } else if step < 0 && start > stop {
            (start - stop - 1) / (-step) + 1
        } else {
            0
        };
        len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn nth(&self, position: usize) -> i64 {
        (i128::from(self.start) + i128::from(self.step) * position as i128) as i64
    }

    /// `r[index]`, negative indices counting from the end.
    pub fn get(&self, index: i64) -> Result<i64, RuntimeError> {
        crate::collections::normalize_index(index, self.len())
            .map(|position| self.nth(position))
            .ok_or_else(|| RuntimeError::index_error("range object index out of range"))
    }

    /// Membership without iterating.
    pub fn contains(&self, n: &BigInt) -> bool {
        let Ok(n) = i64::try_from(n) else {
            return false;
        };
        let in_bounds = if self.step > 0 {
            self.start <= n && n < self.stop
        } else {
            self.stop < n && n <= self.start
        };
        in_bounds && (i128::from(n) - i128::from(self.start)) % i128::from(self.step) == 0
    }

    /// The same elements in the opposite order.
    pub fn reversed(&self) -> RangeSpec {
        let len = self.len();
        if len == 0 {
            return RangeSpec {
                start: self.start,
                stop: self.start,
                step: 1,
            };
        }
        let last = self.nth(len - 1);
        RangeSpec {
            start: last,
            stop: (i128::from(self.start) - i128::from(self.step))
                .clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64,
            step: -self.step,
        }
    }

    pub fn iter(&self) -> LazySeq {
        LazySeq::Range {
            next: self.start,
            remaining: self.len(),
            step: self.step,
        }
    }
}

/// Ranges are equal when they produce the same elements.
impl PartialEq for RangeSpec {
    fn eq(&self, other: &Self) -> bool {
        let len = self.len();
        len == other.len()
            && (len == 0 || (self.start == other.start && (len == 1 || self.step == other.step)))
    }
}

/// State of a one-shot iterator.
#[derive(Debug)]
pub enum LazySeq {
    Range {
        next: i64,
        remaining: usize,
        step: i64,
    },
    List {
        source: List,
        index: usize,
    },
    /// Walks a list backwards from its length at creation time.
    ListReversed {
        source: List,
        remaining: usize,
    },
    Tuple {
        source: Tuple,
        index: usize,
    },
    Str {
        source: Rc<str>,
        offset: usize,
    },
    /// Fixed snapshot of elements
    Items {
        items: Vector<Value>,
        index: usize,
    },
    DictKeys {
        source: Dict,
        index: usize,
    },
    DictValues {
        source: Dict,
        index: usize,
    },
    DictItems {
        source: Dict,
        index: usize,
    },
    Set {
        source: Set,
        index: usize,
    },
    Enumerate {
        source: Rc<RefCell<LazySeq>>,
        count: BigInt,
    },
    /// Stops as soon as any source is exhausted
    Zip {
        sources: Vec<Rc<RefCell<LazySeq>>>,
    },
    /// Exhausted sequence, remembering what it was
    Exhausted(&'static str),
}

fn advance(index: &mut usize, item: Option<Value>) -> Option<Value> {
    if item.is_some() {
        *index += 1;
    }
    item
}

impl LazySeq {
    /// Name reported by `type()` and repr.
    pub fn kind(&self) -> &'static str {
        match self {
            LazySeq::Range { .. } => "range_iterator",
            LazySeq::List { .. } => "list_iterator",
            LazySeq::ListReversed { .. } => "list_reverseiterator",
            LazySeq::Tuple { .. } => "tuple_iterator",
            LazySeq::Str { .. } => "str_iterator",
            LazySeq::Items { .. } => "reversed",
            LazySeq::DictKeys { .. } => "dict_keyiterator",
            LazySeq::DictValues { .. } => "dict_valueiterator",
            LazySeq::DictItems { .. } => "dict_itemiterator",
            LazySeq::Set { .. } => "set_iterator",
            LazySeq::Enumerate { .. } => "enumerate",
            LazySeq::Zip { .. } => "zip",
            LazySeq::Exhausted(kind) => *kind,
        }
    }

    pub fn shared(self) -> Rc<RefCell<LazySeq>> {
        Rc::new(RefCell::new(self))
    }

    /// Produces the next element, or `None` once exhausted.
    pub fn next_value(&mut self) -> Option<Value> {
        let item = self.step();
        if item.is_none() {
            *self = LazySeq::Exhausted(self.kind());
        }
        item
    }

    fn step(&mut self) -> Option<Value> {
        match self {
            LazySeq::Range {
                next,
                remaining,
                step,
            } => {
                if *remaining == 0 {
                    return None;
                }
                let value = *next;
                *remaining -= 1;
                *next = next.wrapping_add(*step);
                Some(Value::from(value))
            }
            LazySeq::List { source, index } => advance(index, source.item_at(*index)),
            LazySeq::ListReversed { source, remaining } => {
                if *remaining == 0 {
                    return None;
                }
                *remaining -= 1;
                source.item_at(*remaining)
            }
            LazySeq::Tuple { source, index } => advance(index, source.item_at(*index)),
            LazySeq::Str { source, offset } => {
                let c = source.get(*offset..)?.chars().next()?;
                *offset += c.len_utf8();
                Some(Value::from(c.to_string()))
            }
            LazySeq::Items { items, index } => advance(index, items.get(*index).cloned()),
            LazySeq::DictKeys { source, index } => {
                advance(index, source.entry_at(*index).map(|(key, _)| key))
            }
            LazySeq::DictValues { source, index } => {
                advance(index, source.entry_at(*index).map(|(_, value)| value))
            }
            LazySeq::DictItems { source, index } => advance(
                index,
                source
                    .entry_at(*index)
                    .map(|(key, value)| Value::tuple([key, value])),
            ),
            LazySeq::Set { source, index } => advance(index, source.member_at(*index)),
            LazySeq::Enumerate { source, count } => {
                let item = source.borrow_mut().next_value()?;
                let position = count.clone();
                *count += 1;
                Some(Value::tuple([Value::Int(position), item]))
            }
            LazySeq::Zip { sources } => {
                if sources.is_empty() {
                    return None;
                }
                let mut row = Vec::with_capacity(sources.len());
                for source in sources.iter() {
                    row.push(source.borrow_mut().next_value()?);
                }
                Some(Value::tuple(row))
            }
            LazySeq::Exhausted(_) => None,
        }
    }
}

/// Rust iterator over a shared lazy sequence. Advancing it advances every
/// other holder of the same sequence.
#[derive(Clone, Debug)]
pub struct SeqIter(Rc<RefCell<LazySeq>>);

impl SeqIter {
    pub fn new(seq: LazySeq) -> Self {
        SeqIter(seq.shared())
    }

    pub fn from_shared(seq: Rc<RefCell<LazySeq>>) -> Self {
        SeqIter(seq)
    }

    pub fn shared(&self) -> Rc<RefCell<LazySeq>> {
        self.0.clone()
    }

    pub fn into_value(self) -> Value {
        Value::LazySequence(self.0)
    }
}

impl Iterator for SeqIter {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.0.borrow_mut().next_value()
    }
}
