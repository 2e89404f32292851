//! Runs every configuration of a grid.

use std::collections::HashMap;

use codec::Strategy;
use serde::Serialize;
use tracing::{info, info_span};

use crate::adapter::compile;
use crate::compare::{compare, ComparisonResult};
use crate::error::{BenchError, BenchResult};
use crate::generator::generate;
use crate::grid::ParameterGrid;
use crate::harness::{measure, HarnessConfig, Timings};
use crate::params::WorkloadParams;
use crate::strategy::{EagerLoader, LazyLoader, LoadStrategy};

/// Measurements for one configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecord {
    pub params: WorkloadParams,
    pub eager: Timings,
    pub lazy: Timings,
    /// `None` when the timings cannot be compared.
    pub comparison: Option<ComparisonResult>,
}

/// Records keyed by parameters, iterated in enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    records: Vec<RunRecord>,
    #[serde(skip)]
    index: HashMap<WorkloadParams, usize>,
}

impl ResultSet {
    /// Creates an empty result set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, replacing any record with the same parameters.
    ///
    /// A replaced record keeps its original position.
    pub fn insert(&mut self, record: RunRecord) {
        if let Some(&position) = self.index.get(&record.params) {
            self.records[position] = record;
        } else {
            self.index.insert(record.params, self.records.len());
            self.records.push(record);
        }
    }

    /// Returns the record for `params`.
    #[must_use]
    pub fn get(&self, params: &WorkloadParams) -> Option<&RunRecord> {
        self.index.get(params).map(|&position| &self.records[position])
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no configuration has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over records in enumeration order.
    pub fn iter(&self) -> std::slice::Iter<'_, RunRecord> {
        self.records.iter()
    }

    /// Iterates over records that have a comparison, in enumeration order.
    pub fn compared(&self) -> impl Iterator<Item = (&RunRecord, &ComparisonResult)> {
        self.records
            .iter()
            .filter_map(|record| record.comparison.as_ref().map(|cmp| (record, cmp)))
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a RunRecord;
    type IntoIter = std::slice::Iter<'a, RunRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Drives generation, compilation, timing, and comparison.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    config: HarnessConfig,
    eager: EagerLoader,
    lazy: LazyLoader,
}

impl Orchestrator {
    /// Creates an orchestrator with default loader limits.
    #[must_use]
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Creates an orchestrator with explicit loaders.
    #[must_use]
    pub const fn with_loaders(config: HarnessConfig, eager: EagerLoader, lazy: LazyLoader) -> Self {
        Self {
            config,
            eager,
            lazy,
        }
    }

    /// Returns the harness configuration.
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Runs every configuration of `grid` in order, stopping at the first
    /// failure.
    pub fn run(&self, grid: &ParameterGrid) -> BenchResult<ResultSet> {
        self.check_config()?;

        let total = grid.len();
        let mut results = ResultSet::new();
        for (index, params) in grid.params().enumerate() {
            let params = params.map_err(BenchError::Grid)?;
            let span = info_span!("workload", n = index + 1, total, label = %params.label());
            let _enter = span.enter();

            let record = self.run_workload(params)?;
            match &record.comparison {
                Some(cmp) => info!(
                    load_plus_exec = cmp.load_plus_exec.ratio,
                    steady_state = cmp.steady_state.ratio,
                    "compared"
                ),
                None => info!("no comparison"),
            }
            results.insert(record);
        }
        Ok(results)
    }

    /// Measures both strategies on one configuration, eager first.
    pub fn run_workload(&self, params: WorkloadParams) -> BenchResult<RunRecord> {
        self.check_config()?;
        let source = generate(&params).map_err(|source| BenchError::Generate { params, source })?;

        let eager = self.measure(&params, &source, &self.eager)?;
        let lazy = self.measure(&params, &source, &self.lazy)?;
        let comparison = compare(Some(&eager), Some(&lazy));

        Ok(RunRecord {
            params,
            eager,
            lazy,
            comparison,
        })
    }

    fn measure(
        &self,
        params: &WorkloadParams,
        source: &str,
        loader: &dyn LoadStrategy,
    ) -> BenchResult<Timings> {
        let strategy: Strategy = loader.strategy();
        let blob = compile(source, strategy).map_err(|source| BenchError::Compile {
            params: *params,
            strategy,
            source,
        })?;
        measure(blob, loader, &self.config).map_err(|source| BenchError::Harness {
            params: *params,
            strategy,
            source,
        })
    }

    const fn check_config(&self) -> BenchResult<()> {
        if self.config.is_valid() {
            Ok(())
        } else {
            Err(BenchError::InvalidConfig {
                repeats: self.config.repeats,
                passes: self.config.passes,
            })
        }
    }
}

/// Runs `grid` with default loaders.
pub fn run(grid: &ParameterGrid, config: &HarnessConfig) -> BenchResult<ResultSet> {
    Orchestrator::new(*config).run(grid)
}
