//! Deterministic source hashing.

use blake3::Hasher;

/// Computes a stable 64-bit hash of source text.
///
/// Blobs record this value so a loaded module can be traced back to the
/// exact source it was compiled from.
#[must_use]
pub fn source_hash(source: &str) -> u64 {
    let mut hasher = Hasher::new();
    write_u64(&mut hasher, source.len() as u64);
    hasher.update(source.as_bytes());

    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

fn write_u64(hasher: &mut Hasher, value: u64) {
    hasher.update(&value.to_le_bytes());
}
