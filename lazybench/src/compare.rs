//! Eager vs lazy comparison metrics.

use serde::Serialize;

use crate::harness::Timings;

/// A lazy/eager time ratio together with the times it came from.
///
/// A ratio below 1 means lazy loading was faster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ratio {
    pub eager: f64,
    pub lazy: f64,
    pub ratio: f64,
}

impl Ratio {
    /// Returns `None` unless `eager` is positive and both times are finite.
    #[must_use]
    pub fn new(eager: f64, lazy: f64) -> Option<Self> {
        if !(eager > 0.0 && eager.is_finite() && lazy.is_finite()) {
            return None;
        }
        Some(Self {
            eager,
            lazy,
            ratio: lazy / eager,
        })
    }

    /// How much faster lazy was than eager, in percent.
    #[must_use]
    pub fn percent_faster(&self) -> f64 {
        100.0 * (1.0 / self.ratio - 1.0)
    }
}

/// Both comparison metrics for one workload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    /// Load time plus the first execution pass.
    pub load_plus_exec: Ratio,
    /// The last execution pass.
    pub steady_state: Ratio,
}

/// Compares lazy against eager timings.
///
/// Missing timings, empty passes, or a zero eager time yield `None`.
#[must_use]
pub fn compare(eager: Option<&Timings>, lazy: Option<&Timings>) -> Option<ComparisonResult> {
    let (eager, lazy) = (eager?, lazy?);
    Some(ComparisonResult {
        load_plus_exec: Ratio::new(eager.load_plus_first_exec()?, lazy.load_plus_first_exec()?)?,
        steady_state: Ratio::new(eager.steady_state()?, lazy.steady_state()?)?,
    })
}
