//! Code-object encoding and eager/lazy loading for lazyco blobs.
//!
//! This is the main codec crate that ties together stream and wire to turn
//! a tree of [`CodeObject`]s into a [`CompiledBlob`] and back.
//!
//! # Features
//!
//! - Deterministic blob encoding with a shared name table
//! - Eager loading: the whole code-object tree is decoded up front
//! - Lazy loading: nested code objects and names are decoded on first use
//! - Operand validation for every decoded code object
//!
//! # Design Principles
//!
//! - **Correctness first** - Both loaders produce equivalent modules.
//! - **Bounded decoding** - Every count is checked against [`CodecLimits`].
//! - **Deterministic** - Same inputs produce same outputs.

mod code;
mod encode;
mod error;
mod limits;
mod load;
mod names;
mod types;

pub use code::{CodeObject, CodeRef, Constant, Instr};
pub use encode::encode_module;
pub use error::{CodecError, CodecResult, LimitKind};
pub use limits::CodecLimits;
pub use load::{load_module, Module};
pub use names::NameTable;
pub use types::{CompiledBlob, LoadMode, Strategy};
pub use wire::Limits as WireLimits;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = WireLimits::default();
        let _ = CodecLimits::default();
        let _ = LoadMode::default();
        let _ = CodeObject::new("<module>", 1);

        let _: CodecResult<()> = Ok(());
    }

    #[test]
    fn limits_reexported() {
        let limits = WireLimits::default();
        assert!(limits.max_blob_bytes > 0);
    }
}
