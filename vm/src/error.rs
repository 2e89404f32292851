//! Execution errors.

use std::fmt;

use codec::CodecError;

/// Result type for execution.
pub type VmResult<T> = Result<T, VmError>;

/// Errors that can occur while executing a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    /// Materializing lazily loaded code failed.
    Codec(CodecError),

    /// A global name was read before being bound.
    UnboundName { name: String },

    /// A local slot was read before being assigned.
    UnboundLocal { name: String },

    /// An operand indexes past its table.
    InvalidOperand { instr: &'static str, operand: u32 },

    /// An instruction got a value of the wrong type.
    TypeMismatch {
        instr: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// Integer addition overflowed.
    IntegerOverflow,

    /// An instruction needed more values than the stack holds.
    StackUnderflow { instr: &'static str },

    /// The operand stack grew past the configured limit.
    StackOverflow { limit: usize },

    /// Calls nested past the configured limit.
    CallDepthExceeded { limit: usize },

    /// A code object ran off its end without returning.
    MissingReturn { function: String },
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec(e) => write!(f, "codec error: {e}"),
            Self::UnboundName { name } => write!(f, "name `{name}` is not defined"),
            Self::UnboundLocal { name } => {
                write!(f, "local `{name}` referenced before assignment")
            }
            Self::InvalidOperand { instr, operand } => {
                write!(f, "{instr} operand {operand} out of range")
            }
            Self::TypeMismatch {
                instr,
                expected,
                found,
            } => {
                write!(f, "{instr} expected {expected} but got {found}")
            }
            Self::IntegerOverflow => write!(f, "integer overflow"),
            Self::StackUnderflow { instr } => write!(f, "stack underflow in {instr}"),
            Self::StackOverflow { limit } => write!(f, "operand stack exceeded {limit} values"),
            Self::CallDepthExceeded { limit } => {
                write!(f, "call depth exceeded {limit}")
            }
            Self::MissingReturn { function } => {
                write!(f, "`{function}` ended without returning")
            }
        }
    }
}

impl std::error::Error for VmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for VmError {
    fn from(err: CodecError) -> Self {
        Self::Codec(err)
    }
}
