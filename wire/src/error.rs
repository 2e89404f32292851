//! Error types for blob framing.

use std::fmt;

/// Result type for blob decoding.
pub type WireResult<T> = Result<T, DecodeError>;

/// Reasons a blob was rejected before any code object was read.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Fewer bytes than a header.
    BlobTooSmall { actual: usize, required: usize },

    /// The first four bytes are not the lazyco magic.
    InvalidMagic { found: u32 },

    /// The header names a format version this build cannot read.
    UnsupportedVersion { found: u16 },

    /// Reserved flag bits are set, or not exactly one strategy hint is.
    InvalidFlags { flags: u16 },

    /// The header's payload length disagrees with the bytes after it.
    PayloadLengthMismatch { header_len: u32, actual_len: usize },

    /// A section tag this version does not define.
    UnknownSectionTag { tag: u8 },

    /// A size or count is above the configured [`Limits`](crate::Limits).
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// A section's tag or length prefix is malformed.
    SectionFraming(SectionFramingError),
}

/// Which [`Limits`](crate::Limits) field was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    BlobBytes,
    SectionCount,
    SectionLength,
}

impl LimitKind {
    /// Returns the limit's name as used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BlobBytes => "blob size",
            Self::SectionCount => "section count",
            Self::SectionLength => "section length",
        }
    }
}

/// Malformed section framing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionFramingError {
    /// The length prefix is not a valid varint.
    InvalidVarint,
    /// The section claims more bytes than the payload holds.
    Truncated { needed: usize, available: usize },
}

/// Failure to frame a blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A section or payload does not fit the format's `u32` lengths.
    LengthOverflow { length: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlobTooSmall { actual, required } => {
                write!(f, "blob has {actual} bytes, header needs {required}")
            }
            Self::InvalidMagic { found } => write!(f, "not a lazyco blob (magic 0x{found:08X})"),
            Self::UnsupportedVersion { found } => write!(f, "blob format version {found} is not supported"),
            Self::InvalidFlags { flags } => write!(f, "bad header flags 0x{flags:04X}"),
            Self::PayloadLengthMismatch {
                header_len,
                actual_len,
            } => write!(
                f,
                "header declares a {header_len}-byte payload, found {actual_len}"
            ),
            Self::UnknownSectionTag { tag } => write!(f, "unknown section tag {tag}"),
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => write!(f, "{} {actual} is over the limit of {limit}", kind.as_str()),
            Self::SectionFraming(err) => write!(f, "bad section framing: {err}"),
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SectionFramingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidVarint => f.write_str("length prefix is not a valid varint"),
            Self::Truncated { needed, available } => {
                write!(f, "section needs {needed} bytes but only {available} remain")
            }
        }
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthOverflow { length } => {
                write!(f, "{length} bytes does not fit a u32 length")
            }
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SectionFraming(err) => Some(err),
            _ => None,
        }
    }
}

impl std::error::Error for SectionFramingError {}

impl std::error::Error for EncodeError {}
