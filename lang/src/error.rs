use std::fmt;

use thiserror::Error;

/// Category of a runtime failure, named after the exception class compiled
/// programs observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Operand lacks the capability the operation needs
    TypeError,
    /// Operand has the right type but an unacceptable value
    ValueError,
    /// Sequence access or pop out of bounds
    IndexError,
    /// Mapping or set lookup of an absent key
    KeyError,
    /// Attribute lookup of an absent name
    AttributeError,
    ZeroDivisionError,
    OverflowError,
    /// `next()` on an exhausted iterator without a default
    StopIteration,
    /// The output stream of `print` failed
    OSError,
}

impl ErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::TypeError => "TypeError",
            ErrorKind::ValueError => "ValueError",
            ErrorKind::IndexError => "IndexError",
            ErrorKind::KeyError => "KeyError",
            ErrorKind::AttributeError => "AttributeError",
            ErrorKind::ZeroDivisionError => "ZeroDivisionError",
            ErrorKind::OverflowError => "OverflowError",
            ErrorKind::StopIteration => "StopIteration",
            ErrorKind::OSError => "OSError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned by every fallible runtime operation.
///
/// Rendered as `Kind: message`, e.g. `TypeError: unhashable type: 'list'`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
}

impl RuntimeError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeError, message)
    }

    pub fn value_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValueError, message)
    }

    pub fn index_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IndexError, message)
    }

    pub fn key_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::KeyError, message)
    }

    pub fn attribute_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AttributeError, message)
    }

    pub fn zero_division(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ZeroDivisionError, message)
    }

    pub fn overflow(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::OverflowError, message)
    }

    pub fn stop_iteration() -> Self {
        Self::new(ErrorKind::StopIteration, "iterator is exhausted")
    }

    pub fn os_error(err: std::io::Error) -> Self {
        Self::new(ErrorKind::OSError, err.to_string())
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

pub type Result<T, E = RuntimeError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_kind() {
        let err = RuntimeError::type_error("unhashable type: 'list'");
        assert_eq!(err.to_string(), "TypeError: unhashable type: 'list'");
    }

    #[test]
    fn constructors_set_kind() {
        assert!(RuntimeError::value_error("x").is(ErrorKind::ValueError));
        assert!(RuntimeError::index_error("x").is(ErrorKind::IndexError));
        assert!(RuntimeError::key_error("x").is(ErrorKind::KeyError));
        assert!(RuntimeError::attribute_error("x").is(ErrorKind::AttributeError));
        assert!(RuntimeError::zero_division("x").is(ErrorKind::ZeroDivisionError));
        assert!(RuntimeError::overflow("x").is(ErrorKind::OverflowError));
        assert!(RuntimeError::stop_iteration().is(ErrorKind::StopIteration));
    }

    #[test]
    fn io_failures_become_os_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = RuntimeError::os_error(io);
        assert_eq!(err.kind, ErrorKind::OSError);
        assert_eq!(err.to_string(), "OSError: pipe closed");
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> = Box::new(RuntimeError::key_error("'a'"));
        assert_eq!(err.to_string(), "KeyError: 'a'");
    }
}
