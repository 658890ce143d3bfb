//! Runtime support library for compiled Python-style programs.
//!
//! Compiled call sites build [`Value`]s and reach the builtin catalogue either
//! through [`call_builtin`] (dynamic, keyword-aware binding) or through the
//! typed functions in [`builtins`]. Containers are shared by reference and
//! mutated in place, so aliasing behaves the way the source program expects.

pub mod builtins;
pub mod collections;
pub mod error;
pub mod iter;
pub mod protocols;
pub mod value;

pub use builtins::{Args, BuiltinId, Callable, call_builtin, call_method, call_value};
pub use error::{ErrorKind, RuntimeError};
pub use value::{HashKey, TypeTag, Value};
