use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};

use forestcharts::data::{self, normalize, normalize_strict};
use forestcharts::runtime::{build_charts, make_rng, write_chart};
use forestcharts::{ChartConfig, ChartKind, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "forestcharts")]
#[command(about = "Render forest cover statistics charts from CSV or JSON data", long_about = None)]
struct Args {
    /// Input file (.csv or .json). Reads CSV from stdin when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory the charts are written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Output format, overrides the config file
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Seed for the jitter chart, overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    /// JSON chart configuration (layout, violin, jitter)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fail on the first malformed row instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Chart to render; repeat for several. All charts when omitted.
    #[arg(long = "chart", value_enum)]
    charts: Vec<ChartKind>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ChartConfig::from_path(path)?,
        None => ChartConfig::default(),
    };
    if let Some(format) = args.format {
        config.format = format;
    }
    if args.seed.is_some() {
        config.jitter.seed = args.seed;
    }

    let rows = match &args.input {
        Some(path) => data::load_path(path)?,
        None => data::load_csv(io::stdin().lock()).context("Failed to read CSV from stdin")?,
    };
    let dataset = if args.strict {
        normalize_strict(&rows).context("Malformed input")?
    } else {
        normalize(&rows)
    };
    if dataset.is_empty() {
        warn!("no usable records in input");
    }
    info!("loaded {} of {} rows", dataset.len(), rows.len());

    let kinds = if args.charts.is_empty() {
        ChartKind::ALL.to_vec()
    } else {
        args.charts.clone()
    };

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;

    let mut rng = make_rng(config.jitter.seed);
    let mut failed = Vec::new();
    for outcome in build_charts(&dataset, &config, &kinds, &mut rng) {
        match outcome.result {
            Ok(geometry) => {
                write_chart(&args.out_dir, &geometry, config.format)?;
            }
            Err(_) => failed.push(outcome.kind.name()),
        }
    }

    if !failed.is_empty() {
        bail!("Failed to build charts: {}", failed.join(", "));
    }
    Ok(())
}
