//! Shared containers.
//!
//! `List`, `Dict`, `Set` and `Object` are handles onto `Rc<RefCell<_>>`
//! storage: cloning a handle aliases the container, and every mutation is
//! visible through all handles. `Tuple` is immutable and shares its storage
//! freely. Reference cycles between containers are not collected.

mod dict;
mod list;
mod object;
mod set;
pub mod text;
mod tuple;


pub use dict::Dict;
pub use list::List;
pub use object::{Instance, Object};
pub use set::Set;
pub use tuple::Tuple;

use crate::error::RuntimeError;

/// Resolves a possibly negative index against `len`.
pub(crate) fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let resolved = if index < 0 {
        index.checked_add(len as i64)?
    } else {
        index
    };
    if resolved >= 0 && (resolved as usize) < len {
        Some(resolved as usize)
    } else {
        None
    }
}

/// Positions selected by `[start:stop:step]` over a sequence of `len`
/// elements. Bounds are clamped; only a zero step is an error.
pub(crate) fn slice_positions(
    len: usize,
    start: Option<i64>,
    stop: Option<i64>,
    step: Option<i64>,
) -> Result<Vec<usize>, RuntimeError> {
    let step = step.unwrap_or(1);
    if step == 0 {
        return Err(RuntimeError::value_error("slice step cannot be zero"));
    }
    let len = len as i64;
    let (lower, upper) = if step > 0 { (0, len) } else { (-1, len - 1) };
    let clamp = |bound: i64| {
        let bound = if bound < 0 { bound.saturating_add(len) } else { bound };
        bound.clamp(lower, upper)
    };
    let start = start.map_or(if step > 0 { lower } else { upper }, clamp);
    let stop = stop.map_or(if step > 0 { upper } else { lower }, clamp);

    let mut positions = Vec::new();
    let mut i = start;
    while (step > 0 && i < stop) || (step < 0 && i > stop) {
        positions.push(i as usize);
        match i.checked_add(step) {
            Some(next) => i = next,
            None => break,
        }
    }
    Ok(positions)
}
