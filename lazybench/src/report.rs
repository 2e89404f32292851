//! Summary table and exports.

use std::fmt::Write as _;
use std::io;

use serde::Serialize;

use crate::compare::ComparisonResult;
use crate::harness::HarnessConfig;
use crate::orchestrator::{ResultSet, RunRecord};
use crate::params::WorkloadParams;

const LABEL_WIDTH: usize = 64;
const COLUMN_WIDTH: usize = 15;

/// CSV metric columns, after the parameter columns.
pub const METRIC_COLUMNS: [&str; 10] = [
    "loadPlusExecRatio",
    "steadyStateRatio",
    "loadPlusExecPercent",
    "steadyStatePercent",
    "eagerLoadSeconds",
    "lazyLoadSeconds",
    "eagerFirstExecSeconds",
    "lazyFirstExecSeconds",
    "eagerSteadyStateSeconds",
    "lazySteadyStateSeconds",
];

/// Renders compared configurations sorted by load+exec ratio, highest first.
///
/// Sorting uses the unrounded ratio; ties keep enumeration order.
#[must_use]
pub fn format_summary(results: &ResultSet) -> String {
    let mut rows: Vec<(&RunRecord, &ComparisonResult)> = results.compared().collect();
    rows.sort_by(|(_, a), (_, b)| b.load_plus_exec.ratio.total_cmp(&a.load_plus_exec.ratio));

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:LABEL_WIDTH$}{:>COLUMN_WIDTH$}{:>COLUMN_WIDTH$}{:>COLUMN_WIDTH$}",
        "", "load+exec", "steady state", "load+exec %"
    );
    for (record, cmp) in rows {
        let _ = writeln!(
            out,
            "{:LABEL_WIDTH$}{:>COLUMN_WIDTH$.3}{:>COLUMN_WIDTH$.3}{:>COLUMN_WIDTH$.0}",
            record.params.label(),
            cmp.load_plus_exec.ratio,
            cmp.steady_state.ratio,
            cmp.load_plus_exec.percent_faster(),
        );
    }
    out
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CsvRow {
    unit_count: u32,
    unit_length: u32,
    var_count: u32,
    use_local_scope: bool,
    unique_names: bool,
    vary_constants: bool,
    invoke_at_load: bool,
    load_plus_exec_ratio: f64,
    steady_state_ratio: f64,
    load_plus_exec_percent: f64,
    steady_state_percent: f64,
    eager_load_seconds: f64,
    lazy_load_seconds: f64,
    eager_first_exec_seconds: f64,
    lazy_first_exec_seconds: f64,
    eager_steady_state_seconds: f64,
    lazy_steady_state_seconds: f64,
}

impl CsvRow {
    fn new(record: &RunRecord, cmp: &ComparisonResult) -> Self {
        let WorkloadParams {
            unit_count,
            unit_length,
            var_count,
            use_local_scope,
            unique_names,
            vary_constants,
            invoke_at_load,
        } = record.params;
        Self {
            unit_count,
            unit_length,
            var_count,
            use_local_scope,
            unique_names,
            vary_constants,
            invoke_at_load,
            load_plus_exec_ratio: cmp.load_plus_exec.ratio,
            steady_state_ratio: cmp.steady_state.ratio,
            load_plus_exec_percent: cmp.load_plus_exec.percent_faster(),
            steady_state_percent: cmp.steady_state.percent_faster(),
            eager_load_seconds: record.eager.load,
            lazy_load_seconds: record.lazy.load,
            eager_first_exec_seconds: record.eager.execs.first().copied().unwrap_or_default(),
            lazy_first_exec_seconds: record.lazy.execs.first().copied().unwrap_or_default(),
            eager_steady_state_seconds: cmp.steady_state.eager,
            lazy_steady_state_seconds: cmp.steady_state.lazy,
        }
    }
}

/// Writes one CSV row per compared configuration, in enumeration order.
///
/// The header row is always written, even when nothing was compared.
pub fn write_csv<W: io::Write>(results: &ResultSet, writer: W) -> csv::Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(WorkloadParams::FIELDS.iter().chain(METRIC_COLUMNS.iter()))?;
    for (record, cmp) in results.compared() {
        csv.serialize(CsvRow::new(record, cmp))?;
    }
    csv.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    config: &'a HarnessConfig,
    configurations: usize,
    compared: usize,
    records: &'a ResultSet,
}

/// Writes the harness configuration and every record as pretty JSON.
pub fn write_json_summary<W: io::Write>(
    results: &ResultSet,
    config: &HarnessConfig,
    writer: W,
) -> serde_json::Result<()> {
    let summary = JsonSummary {
        config,
        configurations: results.len(),
        compared: results.compared().count(),
        records: results,
    };
    serde_json::to_writer_pretty(writer, &summary)
}
