//! CLI entry point for the vehicle QPR rater.
//!
//! Each subcommand loads the dataset, scores every vehicle and prints one
//! view: summary, top models, brands, motorization, radar matrix or
//! conclusions. `report` prints all of them and `export` writes the scored
//! records to CSV.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use qpr_rater::analyzers::views::{
    brand_comparison, build_report, conclusions, fuel_comparison, leaderboard, radar, summary,
};
use qpr_rater::config::ViewConfig;
use qpr_rater::loader::{Dataset, load_or_empty};
use qpr_rater::output::{
    print_pretty, render_brands, render_conclusions, render_fuel, render_leaderboard,
    render_radar, render_summary, write_json, write_records,
};
use qpr_rater::stats::score_all;
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "qpr_rater")]
#[command(about = "Rank vehicles by quality-price ratio", long_about = None)]
struct Cli {
    /// Vehicle dataset CSV (Latin-1 encoded)
    #[arg(
        short,
        long,
        global = true,
        env = "QPR_DATASET",
        default_value = "Cars Datasets 2025.csv"
    )]
    data: PathBuf,

    /// Optional JSON file with view settings
    #[arg(short, long, global = true, env = "QPR_CONFIG")]
    config: Option<PathBuf>,

    /// Output format for views
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Total models analyzed, average price and best QPR
    Summary,
    /// Best quality-price models
    Top {
        /// Number of models to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Compare manufacturers by average QPR
    Brands {
        /// Skip brands with fewer scored models
        #[arg(short, long)]
        min_models: Option<usize>,

        /// Number of brands to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Compare motorization classes (fossil, hybrid, electric, other)
    Fuel,
    /// Normalized motorization matrix for a radar chart
    Radar,
    /// Narrative findings from all views
    Conclusions,
    /// Every view in one document
    Report,
    /// Write scored records to a CSV file
    Export {
        /// Destination CSV file
        #[arg(short, long, default_value = "scored.csv")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/qpr_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("qpr_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = ViewConfig::load_or_default(cli.config.as_deref())?;
    let dataset = load_or_empty(&cli.data)
        .with_context(|| format!("failed to load dataset '{}'", cli.data.display()))?;

    if !dataset.available {
        warn!(source = %dataset.source, "Derived views disabled: no data available");
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    run(cli.command, cli.format, &dataset, &config, &mut out)?;
    out.flush()?;

    Ok(())
}

/// Scores the dataset and emits the view selected by `command`.
#[tracing::instrument(skip_all, fields(source = %dataset.source))]
fn run<W: Write>(
    command: Commands,
    format: Format,
    dataset: &Dataset,
    config: &ViewConfig,
    out: &mut W,
) -> Result<()> {
    let scored = score_all(&dataset.records);
    let records = &scored.records;

    if scored.dropped_rows > 0 {
        info!(
            dropped = scored.dropped_rows,
            drop_pct = scored.drop_pct(),
            "Rows excluded from scoring"
        );
    }

    match command {
        Commands::Summary => {
            let view = summary(records);
            print_pretty(&view);
            match format {
                Format::Json => write_json(out, &view)?,
                Format::Text => render_summary(out, &view)?,
            }
        }
        Commands::Top { limit } => {
            let view = leaderboard(records, limit.unwrap_or(config.top_n));
            match format {
                Format::Json => write_json(out, &view)?,
                Format::Text => render_leaderboard(out, &view)?,
            }
        }
        Commands::Brands { min_models, limit } => {
            let view = brand_comparison(
                records,
                min_models.unwrap_or(config.min_brand_models),
                limit.unwrap_or(config.brand_limit),
            );
            match format {
                Format::Json => write_json(out, &view)?,
                Format::Text => render_brands(out, &view)?,
            }
        }
        Commands::Fuel => {
            let view = fuel_comparison(records);
            match format {
                Format::Json => write_json(out, &view)?,
                Format::Text => render_fuel(out, &view)?,
            }
        }
        Commands::Radar => {
            let view = radar(&fuel_comparison(records).classes);
            match format {
                Format::Json => write_json(out, &view)?,
                Format::Text => render_radar(out, &view)?,
            }
        }
        Commands::Conclusions => {
            let top = leaderboard(records, config.top_n);
            let brands = brand_comparison(records, config.min_brand_models, config.brand_limit);
            let fuel = fuel_comparison(records);
            let view = conclusions(&top, &brands, &fuel);
            match format {
                Format::Json => write_json(out, &view)?,
                Format::Text => render_conclusions(out, &view)?,
            }
        }
        Commands::Report => {
            let report = build_report(dataset, &scored, config);
            match format {
                Format::Json => write_json(out, &report)?,
                Format::Text => {
                    writeln!(out, "== Summary")?;
                    render_summary(&mut *out, &report.summary)?;
                    writeln!(out, "\n== Top {} models", config.top_n)?;
                    render_leaderboard(&mut *out, &report.top)?;
                    writeln!(out, "\n== Brands")?;
                    render_brands(&mut *out, &report.brands)?;
                    writeln!(out, "\n== Motorization")?;
                    render_fuel(&mut *out, &report.fuel)?;
                    writeln!(out, "\n== Radar (normalized)")?;
                    render_radar(&mut *out, &report.radar)?;
                    writeln!(out, "\n== Conclusions")?;
                    render_conclusions(&mut *out, &report.conclusions)?;
                }
            }
        }
        Commands::Export { output } => {
            write_records(&output, records)?;
        }
    }

    Ok(())
}
