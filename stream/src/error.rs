//! Error types for byte stream operations.

use std::fmt;

/// Result type for byte stream operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// Errors that can occur during byte-level encoding/decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// Attempted to read past the end of the buffer.
    UnexpectedEof {
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// A varint ran past its maximum encoded width.
    InvalidVarint {
        /// Byte offset where the varint started.
        position: usize,
    },

    /// A length-prefixed string was not valid UTF-8.
    InvalidUtf8 {
        /// Byte offset where the string body started.
        position: usize,
    },

    /// A length does not fit the on-wire length field.
    LengthOverflow {
        /// The length that was too large.
        length: usize,
    },
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof {
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to read {requested} bytes but only {available} bytes available"
                )
            }
            Self::InvalidVarint { position } => {
                write!(f, "invalid varint at byte {position}")
            }
            Self::InvalidUtf8 { position } => {
                write!(f, "invalid utf-8 string at byte {position}")
            }
            Self::LengthOverflow { length } => {
                write!(f, "length {length} does not fit in a u32 length prefix")
            }
        }
    }
}

impl std::error::Error for StreamError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_unexpected_eof() {
        let err = StreamError::UnexpectedEof {
            requested: 8,
            available: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("8 bytes"), "should mention requested bytes");
        assert!(msg.contains("3 bytes"), "should mention available bytes");
        assert!(msg.contains("read"), "should mention read operation");
    }

    #[test]
    fn error_display_invalid_varint() {
        let err = StreamError::InvalidVarint { position: 17 };
        assert!(err.to_string().contains("17"));
    }

    #[test]
    fn error_display_invalid_utf8() {
        let err = StreamError::InvalidUtf8 { position: 4 };
        let msg = err.to_string();
        assert!(msg.contains("utf-8"));
        assert!(msg.contains('4'));
    }

    #[test]
    fn error_display_length_overflow() {
        let err = StreamError::LengthOverflow { length: usize::MAX };
        assert!(err.to_string().contains("u32"));
    }

    #[test]
    fn error_equality() {
        let err1 = StreamError::UnexpectedEof {
            requested: 8,
            available: 3,
        };
        let err2 = StreamError::UnexpectedEof {
            requested: 8,
            available: 3,
        };
        let err3 = StreamError::UnexpectedEof {
            requested: 8,
            available: 4,
        };
        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }

    #[test]
    fn error_is_std_error() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<StreamError>();
    }
}
