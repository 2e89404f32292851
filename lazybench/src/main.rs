use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use lazybench::{format_summary, write_csv, write_json_summary, HarnessConfig, ParameterGrid, ResultSet};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "lazybench",
    version,
    about = "Eager vs lazy code-object loading benchmark"
)]
struct Cli {
    /// Write raw and derived metrics to this CSV file.
    #[arg(short = 'f', long = "csv")]
    csv: Option<PathBuf>,
    /// Write a JSON summary to this file.
    #[arg(long)]
    json: Option<PathBuf>,
    /// Run the small grid instead of the full one.
    #[arg(long)]
    quick: bool,
    /// Handles deserialized per strategy and configuration.
    #[arg(long, default_value_t = 1000)]
    repeats: usize,
    /// Execution passes over every handle.
    #[arg(long, default_value_t = 4)]
    passes: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let grid = if cli.quick {
        ParameterGrid::quick()
    } else {
        ParameterGrid::default()
    };
    let config = HarnessConfig {
        repeats: cli.repeats,
        passes: cli.passes,
    };
    info!(
        configurations = grid.len(),
        repeats = config.repeats,
        passes = config.passes,
        "starting"
    );

    let results = lazybench::run(&grid, &config).context("benchmark run failed")?;

    print!("{}", format_summary(&results));
    std::io::stdout().flush().context("flush summary")?;

    if let Some(path) = &cli.csv {
        write_csv_file(path, &results)?;
    }
    if let Some(path) = &cli.json {
        write_json_file(path, &results, &config)?;
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("create output dir {}", dir.display()))?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn write_csv_file(path: &Path, results: &ResultSet) -> Result<()> {
    let file = create(path)?;
    write_csv(results, file).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "results were written");
    Ok(())
}

fn write_json_file(path: &Path, results: &ResultSet, config: &HarnessConfig) -> Result<()> {
    let mut file = create(path)?;
    write_json_summary(results, config, &mut file).context("serialize summary")?;
    file.flush()
        .with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "summary was written");
    Ok(())
}
