//! Runtime values.

use std::fmt;
use std::rc::Rc;

use codec::CodeRef;

/// A value on the operand stack or bound to a name.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    None,
    Int(i64),
    Function(Rc<Function>),
    /// A code constant not yet wrapped by `MakeFunction`.
    Code(CodeRef),
}

/// A callable created by `MakeFunction`.
///
/// The function shares its code handle with the constant it was made from,
/// so a lazily loaded body is decoded on the first call only.
pub struct Function {
    pub code: CodeRef,
}

impl Value {
    /// Returns the type name used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Int(_) => "int",
            Self::Function(_) => "function",
            Self::Code(_) => "code",
        }
    }

    /// Returns the integer payload, if any.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns `true` for `None`.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Int(value) => write!(f, "Int({value})"),
            Self::Function(function) => write!(f, "Function({:?})", function.code),
            Self::Code(code) => write!(f, "Code({code:?})"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}
