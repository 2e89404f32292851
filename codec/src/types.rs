//! Core types for the codec.

use std::fmt;
use std::rc::Rc;

use wire::BlobFlags;

/// A serialized code-object blob.
///
/// The bytes are reference counted so lazily loaded code can point back
/// into the blob it came from. Cloning is cheap and shares the bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct CompiledBlob(Rc<[u8]>);

impl CompiledBlob {
    /// Wraps raw blob bytes.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes.into())
    }

    /// Returns the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the blob size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the blob has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of other live handles sharing these bytes.
    ///
    /// Loaded modules and pending code spans each hold one.
    #[must_use]
    pub fn outstanding_refs(&self) -> usize {
        Rc::strong_count(&self.0) - 1
    }
}

impl fmt::Debug for CompiledBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledBlob")
            .field("len", &self.len())
            .field("outstanding_refs", &self.outstanding_refs())
            .finish()
    }
}

impl From<Vec<u8>> for CompiledBlob {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

/// How nested code objects are materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Decode every nested code object during load.
    Eager,
    /// Decode nested code objects on first use.
    Lazy,
}

impl Strategy {
    /// Returns a lowercase name for logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eager => "eager",
            Self::Lazy => "lazy",
        }
    }

    /// Returns the blob header flags hinting this strategy.
    #[must_use]
    pub const fn flags(self) -> BlobFlags {
        match self {
            Self::Eager => BlobFlags::eager(),
            Self::Lazy => BlobFlags::lazy(),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy selection for a single load call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadMode {
    /// Follow the strategy hint recorded in the blob header.
    #[default]
    Default,
    /// Force eager loading.
    Eager,
    /// Force lazy loading.
    Lazy,
}

impl LoadMode {
    /// Resolves the mode against a blob's header flags.
    #[must_use]
    pub const fn resolve(self, flags: BlobFlags) -> Strategy {
        match self {
            Self::Eager => Strategy::Eager,
            Self::Lazy => Strategy::Lazy,
            Self::Default => {
                if flags.prefers_lazy() {
                    Strategy::Lazy
                } else {
                    Strategy::Eager
                }
            }
        }
    }
}

impl From<Strategy> for LoadMode {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Eager => Self::Eager,
            Strategy::Lazy => Self::Lazy,
        }
    }
}
