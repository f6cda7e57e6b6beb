//! Error types for TOON encoding and decoding.
//!
//! Every parse or validation failure is reported through a single [`Error`]
//! enum whose variants mirror the format's error taxonomy. Errors abort the
//! whole operation; a failed decode never returns a partial tree.
//!
//! ## Error Categories
//!
//! - **Syntax**: malformed tokens, unterminated quotes, invalid escapes,
//!   a missing colon after a key
//! - **Indentation**: tabs in indentation or a non-multiple indent
//!   (strict mode)
//! - **Range**: declared array length or tabular row width vs. actual count
//! - **Validation**: blank lines inside array bodies, extra rows or items,
//!   header delimiter mismatches (strict mode)
//! - **PathExpansion**: type conflicts while expanding dotted keys
//!
//! ## Examples
//!
//! ```rust
//! use toon_codec::{decode, DecodeOptions, ErrorKind};
//!
//! let err = decode("numbers[3]: 1,2", &DecodeOptions::default()).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Range);
//! ```

use std::fmt;
use thiserror::Error;

/// The category of a codec error, one tag per failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Indentation,
    Range,
    Validation,
    Delimiter,
    PathExpansion,
    Unknown,
}

/// Represents all errors that can occur while encoding or decoding TOON.
///
/// Decode errors carry the 1-based line (and, where known, column) of the
/// failure plus the offending source line so callers can render a caret
/// under the exact position.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Malformed token, unterminated quote, invalid escape, or a missing
    /// colon after a key.
    #[error("Syntax error at line {line}, column {col}: {msg}{context}")]
    Syntax {
        line: usize,
        col: usize,
        msg: String,
        context: String,
    },

    /// Indentation rule violation in strict mode.
    #[error("Indentation error at line {line}: {msg}{context}")]
    Indentation {
        line: usize,
        msg: String,
        context: String,
    },

    /// Declared length or width does not match what was parsed.
    #[error("Length mismatch at line {line}: expected {expected} {what}, found {actual}")]
    Range {
        line: usize,
        what: String,
        expected: usize,
        actual: usize,
    },

    /// Structural constraint violation in strict mode: blank line inside an
    /// array body, an extra row or item past the declared count, or a
    /// header whose field list uses a foreign delimiter.
    #[error("Validation error at line {line}: {msg}")]
    Validation { line: usize, msg: String },

    /// An unquoted field or value contains the active delimiter.
    #[error("Delimiter error at line {line}: {msg}")]
    Delimiter { line: usize, msg: String },

    /// Type conflict while expanding a dotted key into nested objects.
    #[error("Path expansion error at `{path}`: expected object, found {found}")]
    PathExpansion { path: String, found: String },

    /// Anything that does not fit the taxonomy above, including errors
    /// surfaced from serde during normalization.
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Returns the taxonomy tag for this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Syntax { .. } => ErrorKind::Syntax,
            Error::Indentation { .. } => ErrorKind::Indentation,
            Error::Range { .. } => ErrorKind::Range,
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Delimiter { .. } => ErrorKind::Delimiter,
            Error::PathExpansion { .. } => ErrorKind::PathExpansion,
            Error::Message(_) => ErrorKind::Unknown,
        }
    }

    /// Creates a syntax error with line and column information.
    ///
    /// A column of `0` means the column is not known.
    pub fn syntax(line: usize, col: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
            context: String::new(),
        }
    }

    /// Creates a syntax error that also carries the offending source line,
    /// rendered with a caret under the failing column.
    pub fn syntax_in(line: usize, col: usize, msg: &str, source_line: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
            context: render_context(source_line, col),
        }
    }

    /// Creates an indentation error for a strict-mode violation.
    pub fn indentation(line: usize, msg: &str, source_line: &str) -> Self {
        Error::Indentation {
            line,
            msg: msg.to_string(),
            context: render_context(source_line, 1),
        }
    }

    /// Creates a count or width mismatch error.
    pub fn range(line: usize, what: &str, expected: usize, actual: usize) -> Self {
        Error::Range {
            line,
            what: what.to_string(),
            expected,
            actual,
        }
    }

    /// Creates a strict-mode validation error.
    pub fn validation(line: usize, msg: &str) -> Self {
        Error::Validation {
            line,
            msg: msg.to_string(),
        }
    }

    /// Creates a delimiter conflict error.
    pub fn delimiter(line: usize, msg: &str) -> Self {
        Error::Delimiter {
            line,
            msg: msg.to_string(),
        }
    }

    /// Creates a path expansion conflict error.
    pub fn path_expansion(path: &str, found: &str) -> Self {
        Error::PathExpansion {
            path: path.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an error from any displayable message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

/// Renders the offending source line with a caret under `col` (1-based).
fn render_context(source_line: &str, col: usize) -> String {
    if source_line.is_empty() {
        return String::new();
    }
    format!("\n{}\n{}^", source_line, " ".repeat(col.saturating_sub(1)))
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_variants() {
        assert_eq!(Error::syntax(1, 2, "bad").kind(), ErrorKind::Syntax);
        assert_eq!(
            Error::indentation(3, "tabs not allowed in indentation", "\tx: 1").kind(),
            ErrorKind::Indentation
        );
        assert_eq!(Error::range(1, "array items", 3, 2).kind(), ErrorKind::Range);
        assert_eq!(Error::validation(4, "extra row").kind(), ErrorKind::Validation);
        assert_eq!(
            Error::path_expansion("a", "number").kind(),
            ErrorKind::PathExpansion
        );
        assert_eq!(Error::custom("boom").kind(), ErrorKind::Unknown);
    }

    #[test]
    fn messages_carry_positions() {
        let err = Error::range(7, "array items", 3, 2);
        let text = err.to_string();
        assert!(text.contains("line 7"));
        assert!(text.contains("expected 3"));
        assert!(text.contains("found 2"));
    }

    #[test]
    fn context_renders_caret() {
        let err = Error::syntax_in(2, 5, "unexpected token", "key: @bad");
        let text = err.to_string();
        assert!(text.contains("key: @bad"));
        assert!(text.contains("    ^"));
    }
}
