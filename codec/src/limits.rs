//! Limits for codec-level decoding.

/// Codec-specific limits enforced while decoding code objects.
///
/// Every limit is checked against the count read from the blob before any
/// allocation sized by that count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecLimits {
    /// Maximum nesting depth of code objects (the module is depth 0).
    pub max_depth: usize,
    /// Maximum number of constants per code object.
    pub max_consts: usize,
    /// Maximum number of entries in the name table, and per code object.
    pub max_names: usize,
    /// Maximum number of locals per code object.
    pub max_locals: usize,
    /// Maximum number of instructions per code object.
    pub max_instrs: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_consts: 1 << 16,
            max_names: 1 << 16,
            max_locals: 1 << 12,
            max_instrs: 1 << 20,
        }
    }
}

impl CodecLimits {
    /// Small bounds for tests and the fuzz targets.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_depth: 4,
            max_consts: 256,
            max_names: 256,
            max_locals: 64,
            max_instrs: 1024,
        }
    }

    /// No bounds at all.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
            max_consts: usize::MAX,
            max_names: usize::MAX,
            max_locals: usize::MAX,
            max_instrs: usize::MAX,
        }
    }
}
