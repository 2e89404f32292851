//! Deserialization strategies under test.

use codec::{load_module, CodecLimits, CodecResult, CompiledBlob, LoadMode, Module, Strategy, WireLimits};

/// Limits applied to every load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderLimits {
    pub wire: WireLimits,
    pub codec: CodecLimits,
}

/// One way of turning a blob into a module.
///
/// The timing harness is written once against this trait.
pub trait LoadStrategy {
    /// Returns a short name for logs and reports.
    fn describe(&self) -> &'static str;

    /// Returns the strategy this loader applies.
    fn strategy(&self) -> Strategy;

    /// Deserializes `blob` into a new module handle.
    fn deserialize(&self, blob: &CompiledBlob) -> CodecResult<Module>;
}

/// Decodes the whole code-object tree at load time.
#[derive(Debug, Clone, Default)]
pub struct EagerLoader {
    limits: LoaderLimits,
}

/// Defers nested code objects until first use.
#[derive(Debug, Clone, Default)]
pub struct LazyLoader {
    limits: LoaderLimits,
}

impl EagerLoader {
    #[must_use]
    pub const fn new(limits: LoaderLimits) -> Self {
        Self { limits }
    }
}

impl LazyLoader {
    #[must_use]
    pub const fn new(limits: LoaderLimits) -> Self {
        Self { limits }
    }
}

impl LoadStrategy for EagerLoader {
    fn describe(&self) -> &'static str {
        "eager"
    }

    fn strategy(&self) -> Strategy {
        Strategy::Eager
    }

    fn deserialize(&self, blob: &CompiledBlob) -> CodecResult<Module> {
        load_module(blob, LoadMode::Eager, &self.limits.wire, &self.limits.codec)
    }
}

impl LoadStrategy for LazyLoader {
    fn describe(&self) -> &'static str {
        "lazy"
    }

    fn strategy(&self) -> Strategy {
        Strategy::Lazy
    }

    fn deserialize(&self, blob: &CompiledBlob) -> CodecResult<Module> {
        load_module(blob, LoadMode::Lazy, &self.limits.wire, &self.limits.codec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::compile;

    const SOURCE: &str = "def f_0():\n    return 0+ \\\n        1+ 0\n";

    #[test]
    fn loaders_override_the_header_hint() {
        let blob = compile(SOURCE, Strategy::Lazy).unwrap();
        let eager = EagerLoader::default().deserialize(&blob).unwrap();
        assert_eq!(eager.strategy(), Strategy::Eager);
        assert_eq!(eager.materialized_count(), 1);

        let blob = compile(SOURCE, Strategy::Eager).unwrap();
        let lazy = LazyLoader::default().deserialize(&blob).unwrap();
        assert_eq!(lazy.strategy(), Strategy::Lazy);
        assert_eq!(lazy.materialized_count(), 0);
    }

    #[test]
    fn descriptions_match_strategy() {
        let loaders: [&dyn LoadStrategy; 2] = [&EagerLoader::default(), &LazyLoader::default()];
        for loader in loaders {
            assert_eq!(loader.describe(), loader.strategy().as_str());
        }
    }

    #[test]
    fn limits_are_applied() {
        let blob = compile(SOURCE, Strategy::Eager).unwrap();
        let limits = LoaderLimits {
            wire: WireLimits {
                max_blob_bytes: 4,
                ..WireLimits::default()
            },
            codec: CodecLimits::default(),
        };
        assert!(EagerLoader::new(limits).deserialize(&blob).is_err());
    }
}
