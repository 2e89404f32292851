//! Byte-level encoding primitives for the lazyco blob format.
//!
//! This crate provides [`ByteWriter`] and [`ByteReader`] for the varint-heavy
//! encoding used by code-object blobs. It is designed for bounded, panic-free
//! operation with explicit error handling.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads are bounds-checked.
//! - **No domain knowledge** - This crate knows nothing about code objects or blobs.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use stream::{ByteReader, ByteWriter};
//!
//! let mut writer = ByteWriter::new();
//! writer.write_varu32(300);
//! writer.write_str("f_0").unwrap();
//!
//! let bytes = writer.finish();
//!
//! let mut reader = ByteReader::new(&bytes);
//! assert_eq!(reader.read_varu32().unwrap(), 300);
//! assert_eq!(reader.read_str().unwrap(), "f_0");
//! ```

mod error;
mod reader;
mod writer;

pub use error::{StreamError, StreamResult};
pub use reader::ByteReader;
pub use writer::{varu32_len, ByteWriter};
