//! Error types for filter expression parsing

use std::fmt;

use thiserror::Error;

/// Category of a parse failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Malformed token stream: unexpected token, unterminated quote, missing bound
    Syntax,
    /// More than one tree is derivable for the same input. Only raised by the
    /// grammar self-check, never by [`crate::parse`] on user input.
    Ambiguous,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::Syntax => f.write_str("Syntax error"),
            ParseErrorKind::Ambiguous => f.write_str("Ambiguous grammar"),
        }
    }
}

/// Error returned when a filter expression cannot be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at position {position}: {message}")]
pub struct ParseError {
    /// Byte offset into the source where the problem was detected
    pub position: usize,
    pub message: String,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
            kind: ParseErrorKind::Syntax,
        }
    }

    pub fn ambiguous(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
            kind: ParseErrorKind::Ambiguous,
        }
    }

    pub fn is_syntax(&self) -> bool {
        self.kind == ParseErrorKind::Syntax
    }
}

#[cfg(feature = "python")]
impl From<ParseError> for pyo3::PyErr {
    fn from(err: ParseError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyRuntimeError, PyValueError};

        match err.kind {
            ParseErrorKind::Syntax => PyValueError::new_err(err.to_string()),
            ParseErrorKind::Ambiguous => PyRuntimeError::new_err(err.to_string()),
        }
    }
}

/// Result type alias for filter parsing
pub type Result<T> = std::result::Result<T, ParseError>;
