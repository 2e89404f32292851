//! Blob header types and constants.

/// Magic number identifying lazyco blobs.
///
/// This value is fixed and must never change across versions.
pub const MAGIC: u32 = 0x4C5A_434F; // "LZCO" in ASCII

/// Current blob format version.
pub const VERSION: u16 = 1;

/// Header size in bytes (20 total).
pub const HEADER_SIZE: usize = 4 + 2 + 2 + 8 + 4;

/// Blob flags.
///
/// The flags record which load strategy the producer prefers. Loaders may
/// override the hint; it only decides the behavior of a default-mode load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlobFlags(u16);

impl BlobFlags {
    /// Flag indicating the blob prefers eager loading.
    pub const EAGER_HINT: u16 = 1 << 0;

    /// Flag indicating the blob prefers lazy loading.
    pub const LAZY_HINT: u16 = 1 << 1;

    /// Reserved bits mask (must be zero in version 1).
    const RESERVED_MASK: u16 = !0b11;

    /// Creates new flags from a raw value.
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the raw flag bits.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Returns `true` if the eager hint is set.
    #[must_use]
    pub const fn prefers_eager(self) -> bool {
        self.0 & Self::EAGER_HINT != 0
    }

    /// Returns `true` if the lazy hint is set.
    #[must_use]
    pub const fn prefers_lazy(self) -> bool {
        self.0 & Self::LAZY_HINT != 0
    }

    /// Returns `true` if the flags are valid for version 1.
    ///
    /// Valid means exactly one of `EAGER_HINT` or `LAZY_HINT` is set,
    /// and no reserved bits are set.
    #[must_use]
    pub const fn is_valid_v1(self) -> bool {
        let has_reserved = self.0 & Self::RESERVED_MASK != 0;
        self.prefers_eager() ^ self.prefers_lazy() && !has_reserved
    }

    /// Creates flags for an eager-preferring blob.
    #[must_use]
    pub const fn eager() -> Self {
        Self(Self::EAGER_HINT)
    }

    /// Creates flags for a lazy-preferring blob.
    #[must_use]
    pub const fn lazy() -> Self {
        Self(Self::LAZY_HINT)
    }
}

/// Blob header (version 1).
///
/// This struct represents the header fields *after* the magic number.
/// The magic number is validated separately during decoding and is not
/// stored in this struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlobHeader {
    /// Blob format version.
    pub version: u16,
    /// Blob flags.
    pub flags: BlobFlags,
    /// Hash of the source text the blob was compiled from.
    pub source_hash: u64,
    /// Payload length in bytes.
    pub payload_len: u32,
}

impl BlobHeader {
    /// Creates a new version-1 header.
    #[must_use]
    pub const fn new(flags: BlobFlags, source_hash: u64, payload_len: u32) -> Self {
        Self {
            version: VERSION,
            flags,
            source_hash,
            payload_len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_is_lzco_ascii() {
        assert_eq!(MAGIC, 0x4C5A_434F);
        let bytes = MAGIC.to_be_bytes();
        assert_eq!(&bytes, b"LZCO");
    }

    #[test]
    fn header_size_is_correct() {
        // magic(4) + version(2) + flags(2) + source_hash(8) + payload_len(4)
        assert_eq!(HEADER_SIZE, 20);
    }

    #[test]
    fn flags_eager() {
        let flags = BlobFlags::eager();
        assert!(flags.prefers_eager());
        assert!(!flags.prefers_lazy());
        assert!(flags.is_valid_v1());
    }

    #[test]
    fn flags_lazy() {
        let flags = BlobFlags::lazy();
        assert!(flags.prefers_lazy());
        assert!(!flags.prefers_eager());
        assert!(flags.is_valid_v1());
    }

    #[test]
    fn flags_invalid_both_hints() {
        let flags = BlobFlags::from_raw(BlobFlags::EAGER_HINT | BlobFlags::LAZY_HINT);
        assert!(!flags.is_valid_v1());
    }

    #[test]
    fn flags_invalid_none() {
        assert!(!BlobFlags::from_raw(0).is_valid_v1());
        assert!(!BlobFlags::default().is_valid_v1());
    }

    #[test]
    fn flags_invalid_reserved_bits() {
        let flags = BlobFlags::from_raw(BlobFlags::EAGER_HINT | 0x0100);
        assert!(!flags.is_valid_v1());
    }

    #[test]
    fn header_new_uses_current_version() {
        let header = BlobHeader::new(BlobFlags::lazy(), 0xFEED, 12);
        assert_eq!(header.version, VERSION);
        assert_eq!(header.source_hash, 0xFEED);
        assert_eq!(header.payload_len, 12);
    }
}
