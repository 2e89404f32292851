//! Parse and compile errors.

use std::fmt;

/// Result type for parsing and compiling source text.
pub type LangResult<T> = Result<T, LangError>;

/// Errors that can occur while compiling source text.
///
/// Every variant carries the 1-based line number of the first physical line
/// of the offending statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LangError {
    /// The line does not match any statement form.
    InvalidStatement { line: usize, text: String },

    /// A name is not a valid identifier.
    InvalidName { line: usize, name: String },

    /// An integer literal could not be parsed.
    InvalidLiteral { line: usize, literal: String },

    /// An expression has an empty term, as in `1 + + 2`.
    EmptyTerm { line: usize },

    /// A top-level statement is indented.
    UnexpectedIndent { line: usize },

    /// A function definition has no body.
    EmptyFunction { line: usize, name: String },

    /// A statement follows `return` in the same body.
    StatementAfterReturn { line: usize },

    /// A `def` appears inside a function body.
    NestedFunction { line: usize },

    /// The last line ends with a `\` continuation.
    DanglingContinuation { line: usize },
}

impl LangError {
    /// Returns the 1-based line the error refers to.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::InvalidStatement { line, .. }
            | Self::InvalidName { line, .. }
            | Self::InvalidLiteral { line, .. }
            | Self::EmptyTerm { line }
            | Self::UnexpectedIndent { line }
            | Self::EmptyFunction { line, .. }
            | Self::StatementAfterReturn { line }
            | Self::NestedFunction { line }
            | Self::DanglingContinuation { line } => *line,
        }
    }
}

impl fmt::Display for LangError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStatement { line, text } => {
                write!(f, "line {line}: invalid statement `{text}`")
            }
            Self::InvalidName { line, name } => {
                write!(f, "line {line}: invalid name `{name}`")
            }
            Self::InvalidLiteral { line, literal } => {
                write!(f, "line {line}: invalid integer literal `{literal}`")
            }
            Self::EmptyTerm { line } => write!(f, "line {line}: empty term in expression"),
            Self::UnexpectedIndent { line } => write!(f, "line {line}: unexpected indent"),
            Self::EmptyFunction { line, name } => {
                write!(f, "line {line}: function `{name}` has no body")
            }
            Self::StatementAfterReturn { line } => {
                write!(f, "line {line}: statement after return")
            }
            Self::NestedFunction { line } => {
                write!(f, "line {line}: nested function definitions are not supported")
            }
            Self::DanglingContinuation { line } => {
                write!(f, "line {line}: line continuation at end of input")
            }
        }
    }
}

impl std::error::Error for LangError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_line() {
        let err = LangError::InvalidName {
            line: 12,
            name: "9x".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("line 12"));
        assert!(msg.contains("9x"));
    }

    #[test]
    fn line_accessor() {
        assert_eq!(LangError::EmptyTerm { line: 4 }.line(), 4);
        assert_eq!(LangError::DanglingContinuation { line: 9 }.line(), 9);
    }
}
