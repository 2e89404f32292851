//! Error types for codec operations.

use std::fmt;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or loading code objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Wire format error.
    Wire(wire::DecodeError),

    /// Wire framing failed while encoding.
    WireEncode(wire::EncodeError),

    /// Byte stream error.
    Stream(stream::StreamError),

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// A required section is absent from the blob.
    MissingSection { section: wire::SectionTag },

    /// Duplicate section encountered.
    DuplicateSection { section: wire::SectionTag },

    /// Section body had trailing bytes after parsing.
    TrailingSectionData {
        section: wire::SectionTag,
        remaining: usize,
    },

    /// A code object body had trailing bytes after parsing.
    TrailingCodeData { offset: usize, remaining: usize },

    /// Unknown constant tag.
    UnknownConstTag { tag: u8, offset: usize },

    /// Unknown instruction opcode.
    UnknownOpcode { opcode: u8, offset: usize },

    /// An instruction operand indexes past its table.
    OperandOutOfRange {
        instr: &'static str,
        operand: u32,
        len: usize,
    },

    /// A name index points past the blob's name table.
    NameOutOfRange { index: u32, len: usize },

    /// A name table entry is not valid UTF-8.
    InvalidName { index: u32 },

    /// A pending code span does not lie within its blob.
    SpanOutOfRange { start: usize, end: usize, len: usize },

    /// A code handle has neither a materialized object nor a pending span.
    DetachedCode,
}

/// Specific limit that was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    Depth,
    Consts,
    Names,
    Locals,
    Instrs,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wire(e) => write!(f, "wire error: {e}"),
            Self::WireEncode(e) => write!(f, "wire encode error: {e}"),
            Self::Stream(e) => write!(f, "stream error: {e}"),
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
            Self::MissingSection { section } => {
                write!(f, "missing section {section:?} in blob")
            }
            Self::DuplicateSection { section } => {
                write!(f, "duplicate section {section:?} in blob")
            }
            Self::TrailingSectionData { section, remaining } => {
                write!(
                    f,
                    "trailing data in section {section:?}: {remaining} bytes"
                )
            }
            Self::TrailingCodeData { offset, remaining } => {
                write!(
                    f,
                    "trailing data in code object at {offset}: {remaining} bytes"
                )
            }
            Self::UnknownConstTag { tag, offset } => {
                write!(f, "unknown constant tag {tag} at {offset}")
            }
            Self::UnknownOpcode { opcode, offset } => {
                write!(f, "unknown opcode {opcode} at {offset}")
            }
            Self::OperandOutOfRange {
                instr,
                operand,
                len,
            } => {
                write!(f, "{instr} operand {operand} out of range (table has {len})")
            }
            Self::NameOutOfRange { index, len } => {
                write!(f, "name index {index} out of range (table has {len})")
            }
            Self::InvalidName { index } => {
                write!(f, "name {index} is not valid UTF-8")
            }
            Self::SpanOutOfRange { start, end, len } => {
                write!(f, "code span {start}..{end} outside blob of {len} bytes")
            }
            Self::DetachedCode => write!(f, "code handle has nothing to materialize"),
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Depth => "nesting depth",
            Self::Consts => "constants",
            Self::Names => "names",
            Self::Locals => "locals",
            Self::Instrs => "instructions",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Wire(e) => Some(e),
            Self::WireEncode(e) => Some(e),
            Self::Stream(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wire::DecodeError> for CodecError {
    fn from(err: wire::DecodeError) -> Self {
        Self::Wire(err)
    }
}

impl From<wire::EncodeError> for CodecError {
    fn from(err: wire::EncodeError) -> Self {
        Self::WireEncode(err)
    }
}

impl From<stream::StreamError> for CodecError {
    fn from(err: stream::StreamError) -> Self {
        Self::Stream(err)
    }
}
