//! Wire framing and blob layout for lazyco code-object blobs.
//!
//! This crate handles the binary container: blob headers, section framing,
//! and limit enforcement. It does not know about code objects, only the
//! structure of blobs.
//!
//! # Design Principles
//!
//! - **Stable wire format** - The format is versioned and checked on every decode.
//! - **Bounded decoding** - All length fields are validated against limits before iteration.
//! - **No domain knowledge** - This crate handles framing, not instructions.

mod blob;
mod error;
mod header;
mod limits;

pub use blob::{
    decode_blob, decode_header, decode_sections, encode_header, encode_section, SectionTag,
    WireBlob, WireSection,
};
pub use error::{DecodeError, EncodeError, LimitKind, SectionFramingError, WireResult};
pub use header::{BlobFlags, BlobHeader, HEADER_SIZE, MAGIC, VERSION};
pub use limits::Limits;

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn public_api_exports() {
        let _ = MAGIC;
        let _ = VERSION;
        let _ = HEADER_SIZE;
        let _ = BlobFlags::eager();
        let _ = BlobHeader::new(BlobFlags::lazy(), 0, 0);
        let _ = Limits::default();
        let _ = SectionTag::Code;

        let _: WireResult<()> = Ok(());
    }

    #[test]
    fn limits_default_is_reasonable() {
        let limits = Limits::default();
        assert!(
            limits.max_blob_bytes >= 1024 * 1024,
            "should allow large generated modules"
        );
        assert!(limits.max_sections >= 2, "needs names and code sections");
    }

    #[test]
    fn header_size_constant_correct() {
        assert_eq!(
            HEADER_SIZE,
            size_of::<u32>() // magic
                + size_of::<u16>() // version
                + size_of::<u16>() // flags
                + size_of::<u64>() // source_hash
                + size_of::<u32>() // payload_len
        );
    }

    #[test]
    fn header_roundtrip_through_encode() {
        let header = BlobHeader::new(BlobFlags::lazy(), 0x1234_5678_9ABC_DEF0, 0);
        let mut buf = Vec::new();
        assert_eq!(encode_header(&header, &mut buf), HEADER_SIZE);
        assert_eq!(decode_header(&buf).unwrap(), header);
    }
}
