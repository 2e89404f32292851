//! Eager vs lazy code-object loading benchmark harness.
//!
//! This crate provides:
//!
//! - A deterministic workload generator over seven structural parameters
//! - A compilation adapter producing one blob per strategy
//! - A timing harness with scoped run contexts and a release barrier
//! - Ratio comparison, grid orchestration, and table/CSV/JSON reporting
//!
//! # Design Principles
//!
//! - **Reproducible** - Workloads are a pure function of their parameters.
//! - **Isolated** - Each strategy run owns its blob and handles, and releases
//!   them before the next run starts.
//! - **Fail-fast** - Any error aborts the whole run with the failing
//!   configuration attached.

mod adapter;
mod compare;
mod error;
mod generator;
mod grid;
mod harness;
mod orchestrator;
mod params;
mod report;
mod strategy;

pub use adapter::{compile, WORKLOAD_FILENAME};
pub use compare::{compare, ComparisonResult, Ratio};
pub use error::{AdapterError, BenchError, BenchResult, HarnessError, ParamsError};
pub use generator::generate;
pub use grid::{Assignment, Assignments, DimValue, Dimension, ParameterGrid};
pub use harness::{measure, HarnessConfig, ReleaseReport, RunContext, Timings};
pub use orchestrator::{run, Orchestrator, ResultSet, RunRecord};
pub use params::WorkloadParams;
pub use report::{format_summary, write_csv, write_json_summary, METRIC_COLUMNS};
pub use strategy::{EagerLoader, LazyLoader, LoadStrategy, LoaderLimits};
