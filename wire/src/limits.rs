//! Size ceilings checked while framing a blob.

/// Wire-level limits for blob decoding.
///
/// These limits are enforced before any section body is touched, so a
/// malformed or hostile blob cannot trigger unbounded work. Body-level
/// limits belong to the codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum blob size in bytes.
    pub max_blob_bytes: usize,

    /// Most sections a blob may declare.
    pub max_sections: usize,

    /// Largest section body, in bytes.
    pub max_section_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            // A 100-unit, 100-line workload with unique names stays well below this.
            max_blob_bytes: 64 * 1024 * 1024,

            // Names + code, with room for future sections
            max_sections: 8,
            max_section_len: 64 * 1024 * 1024,
        }
    }
}

impl Limits {
    /// Tight ceilings for tests and fuzzing.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_blob_bytes: 64 * 1024,
            max_sections: 4,
            max_section_len: 32 * 1024,
        }
    }

    /// Disables every ceiling.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_blob_bytes: usize::MAX,
            max_sections: usize::MAX,
            max_section_len: usize::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_admit_both_sections() {
        let limits = Limits::default();
        assert!(limits.max_sections >= 2);
        assert!(limits.max_section_len <= limits.max_blob_bytes);
    }

    #[test]
    fn testing_limits_are_tighter() {
        let tight = Limits::for_testing();
        let normal = Limits::default();
        assert!(tight.max_blob_bytes < normal.max_blob_bytes);
        assert!(tight.max_sections < normal.max_sections);
        assert!(tight.max_section_len < normal.max_section_len);
    }

    #[test]
    fn unlimited_has_no_ceiling() {
        let limits = Limits::unlimited();
        assert_eq!(limits.max_blob_bytes, usize::MAX);
        assert_eq!(limits.max_section_len, usize::MAX);
    }

    #[test]
    fn testing_limits_in_const_context() {
        const LIMITS: Limits = Limits::for_testing();
        assert_eq!(LIMITS.max_sections, 4);
    }
}
