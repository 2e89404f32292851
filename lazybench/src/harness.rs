//! Timing harness: repeated loads, repeated execution passes.

use std::time::{Duration, Instant};

use codec::{CompiledBlob, Module};
use serde::Serialize;
use tracing::debug;
use vm::{execute, Context, VmLimits};

use crate::error::HarnessError;
use crate::strategy::LoadStrategy;

/// Repetition counts for one strategy run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HarnessConfig {
    /// Handles deserialized from the blob during the load phase.
    pub repeats: usize,
    /// Execution passes over every handle.
    pub passes: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            repeats: 1000,
            passes: 4,
        }
    }
}

impl HarnessConfig {
    /// Creates a configuration small enough for tests.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            repeats: 3,
            passes: 2,
        }
    }

    /// Returns `true` if both counts are positive.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.repeats >= 1 && self.passes >= 1
    }
}

/// Wall-clock timings of one strategy run, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timings {
    /// Time to deserialize every handle.
    pub load: f64,
    /// Time of each execution pass over every handle.
    pub execs: Vec<f64>,
}

impl Timings {
    /// Load time plus the first execution pass.
    #[must_use]
    pub fn load_plus_first_exec(&self) -> Option<f64> {
        self.execs.first().map(|first| self.load + first)
    }

    /// The last execution pass.
    #[must_use]
    pub fn steady_state(&self) -> Option<f64> {
        self.execs.last().copied()
    }
}

/// Outcome of the release barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseReport {
    /// Handles dropped by the barrier.
    pub handles: usize,
    /// References to the blob still alive after the handles were dropped.
    pub outstanding_refs: usize,
}

impl ReleaseReport {
    /// Returns `true` if nothing outlived the run.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.outstanding_refs == 0
    }

    /// Converts outstanding references into an error.
    pub const fn check(self) -> Result<Self, HarnessError> {
        if self.is_clean() {
            Ok(self)
        } else {
            Err(HarnessError::ResourceLeak {
                outstanding: self.outstanding_refs,
            })
        }
    }
}

/// Owns a blob and every module handle loaded from it.
///
/// Dropping a context releases everything, but only [`RunContext::release`]
/// verifies that no handle kept the blob alive.
#[derive(Debug)]
pub struct RunContext {
    blob: CompiledBlob,
    modules: Vec<Module>,
    vm_limits: VmLimits,
}

impl RunContext {
    /// Takes ownership of `blob` for one run.
    #[must_use]
    pub fn new(blob: CompiledBlob) -> Self {
        Self::with_limits(blob, VmLimits::default())
    }

    /// Takes ownership of `blob`, executing under `vm_limits`.
    #[must_use]
    pub const fn with_limits(blob: CompiledBlob, vm_limits: VmLimits) -> Self {
        Self {
            blob,
            modules: Vec::new(),
            vm_limits,
        }
    }

    /// Returns the blob this run loads from.
    #[must_use]
    pub const fn blob(&self) -> &CompiledBlob {
        &self.blob
    }

    /// Returns the retained handles in load order.
    #[must_use]
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Deserializes the blob `repeats` times, retaining every handle.
    pub fn load(
        &mut self,
        loader: &dyn LoadStrategy,
        repeats: usize,
    ) -> Result<Duration, HarnessError> {
        self.modules.reserve(repeats);
        let start = Instant::now();
        for _ in 0..repeats {
            let module = loader.deserialize(&self.blob)?;
            self.modules.push(module);
        }
        Ok(start.elapsed())
    }

    /// Executes every retained handle once, each in a fresh context.
    pub fn execute_pass(&self) -> Result<Duration, HarnessError> {
        let start = Instant::now();
        for module in &self.modules {
            let mut context = Context::with_limits(self.vm_limits.clone());
            execute(module, &mut context)?;
        }
        Ok(start.elapsed())
    }

    /// Drops every handle and counts surviving blob references.
    #[must_use]
    pub fn release(self) -> ReleaseReport {
        let Self { blob, modules, .. } = self;
        let handles = modules.len();
        drop(modules);
        ReleaseReport {
            handles,
            outstanding_refs: blob.outstanding_refs(),
        }
    }
}

/// Times one strategy on one blob.
///
/// Loads `config.repeats` handles, runs `config.passes` execution passes,
/// then passes the run through the release barrier.
pub fn measure(
    blob: CompiledBlob,
    loader: &dyn LoadStrategy,
    config: &HarnessConfig,
) -> Result<Timings, HarnessError> {
    let mut run = RunContext::new(blob);

    let load = run.load(loader, config.repeats)?;
    debug!(
        strategy = loader.describe(),
        seconds = load.as_secs_f64(),
        "load"
    );

    let mut execs = Vec::with_capacity(config.passes);
    for pass in 0..config.passes {
        let elapsed = run.execute_pass()?;
        debug!(
            strategy = loader.describe(),
            pass = pass + 1,
            seconds = elapsed.as_secs_f64(),
            "exec"
        );
        execs.push(elapsed.as_secs_f64());
    }

    let report = run.release().check()?;
    debug!(
        strategy = loader.describe(),
        handles = report.handles,
        "released"
    );

    Ok(Timings {
        load: load.as_secs_f64(),
        execs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::compile;
    use crate::strategy::{EagerLoader, LazyLoader};
    use codec::Strategy;

    const SOURCE: &str = "\
v_0 = 1
def f_0():
    return 0+ \\
        v_0+ 0
f_0()
";

    #[test]
    fn timings_have_one_entry_per_pass() {
        let config = HarnessConfig::for_testing();
        let blob = compile(SOURCE, Strategy::Eager).unwrap();
        let timings = measure(blob, &EagerLoader::default(), &config).unwrap();
        assert_eq!(timings.execs.len(), config.passes);
        assert!(timings.load >= 0.0);
        assert!(timings.execs.iter().all(|t| *t >= 0.0));
    }

    #[test]
    fn run_context_retains_every_handle() {
        let blob = compile(SOURCE, Strategy::Lazy).unwrap();
        let mut run = RunContext::new(blob);
        run.load(&LazyLoader::default(), 5).unwrap();
        assert_eq!(run.modules().len(), 5);
        assert!(run.blob().outstanding_refs() > 0);

        run.execute_pass().unwrap();
        let report = run.release();
        assert_eq!(report.handles, 5);
        assert!(report.is_clean());
    }

    #[test]
    fn external_blob_reference_is_a_leak() {
        let blob = compile(SOURCE, Strategy::Lazy).unwrap();
        let kept = blob.clone();
        let mut run = RunContext::new(blob);
        run.load(&LazyLoader::default(), 2).unwrap();
        let report = run.release();
        assert_eq!(report.outstanding_refs, 1);
        assert_eq!(
            report.check(),
            Err(HarnessError::ResourceLeak { outstanding: 1 })
        );
        drop(kept);
    }

    #[test]
    fn execution_errors_surface() {
        let blob = compile("def f():\n    return missing\nf()\n", Strategy::Eager).unwrap();
        let err = measure(blob, &EagerLoader::default(), &HarnessConfig::for_testing())
            .unwrap_err();
        assert!(matches!(err, HarnessError::Execute(_)));
    }

    #[test]
    fn steady_state_and_first_pass() {
        let timings = Timings {
            load: 1.0,
            execs: vec![0.5, 0.25, 0.125],
        };
        assert_eq!(timings.load_plus_first_exec(), Some(1.5));
        assert_eq!(timings.steady_state(), Some(0.125));

        let empty = Timings {
            load: 1.0,
            execs: Vec::new(),
        };
        assert_eq!(empty.load_plus_first_exec(), None);
        assert_eq!(empty.steady_state(), None);
    }

    #[test]
    fn config_validity() {
        assert!(HarnessConfig::default().is_valid());
        assert!(!HarnessConfig {
            repeats: 0,
            passes: 1
        }
        .is_valid());
        assert!(!HarnessConfig {
            repeats: 1,
            passes: 0
        }
        .is_valid());
    }
}
