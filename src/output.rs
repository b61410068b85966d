//! Output formatting and persistence for scored records and views.
//!
//! Supports pretty-printing, JSON, Markdown text tables and CSV export.

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::{debug, info};

use crate::analyzers::types::{
    BrandRow, BrandTableRow, Conclusions, FuelTableRow, FuelView, LeaderboardRow, MISSING_LABEL,
    RadarChart, RadarTableRow, Summary,
};
use crate::stats::ScoredRecord;

const UNAVAILABLE: &str = "unavailable";

/// Logs any value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Writes a value as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(mut out: W, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Formats a price as whole US dollars with thousands separators.
pub fn format_usd(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

// Cell formatters for `#[tabled(display_with = ...)]`.

pub(crate) fn display_usd(value: &f64) -> String {
    format_usd(*value)
}

pub(crate) fn display_fixed1(value: &f64) -> String {
    format!("{value:.1}")
}

pub(crate) fn display_fixed2(value: &f64) -> String {
    format!("{value:.2}")
}

pub(crate) fn display_fixed3(value: &f64) -> String {
    format!("{value:.3}")
}

pub(crate) fn display_label(value: &Option<String>) -> String {
    value.as_deref().unwrap_or(MISSING_LABEL).to_string()
}

fn or_unavailable(value: Option<f64>, fmt: impl Fn(f64) -> String) -> String {
    value.map_or_else(|| UNAVAILABLE.to_string(), fmt)
}

/// Writes rows as a Markdown table.
fn write_markdown_table<W, T, I>(mut out: W, rows: I) -> Result<()>
where
    W: Write,
    T: Tabled,
    I: IntoIterator<Item = T>,
{
    let mut table = Table::new(rows);
    table.with(Style::markdown());
    writeln!(out, "{table}")?;
    Ok(())
}

pub fn render_summary<W: Write>(mut out: W, summary: &Summary) -> Result<()> {
    writeln!(out, "Models analyzed: {}", summary.total_models)?;
    writeln!(out, "Average price:   {}", or_unavailable(summary.mean_price, format_usd))?;
    writeln!(
        out,
        "Best QPR:        {}",
        or_unavailable(summary.max_qpr, |v| format!("{v:.2} pts/1k USD"))
    )?;
    Ok(())
}

pub fn render_leaderboard<W: Write>(out: W, rows: &[LeaderboardRow]) -> Result<()> {
    write_markdown_table(out, rows)
}

pub fn render_brands<W: Write>(out: W, rows: &[BrandRow]) -> Result<()> {
    write_markdown_table(out, rows.iter().map(BrandTableRow::from))
}

pub fn render_fuel<W: Write>(mut out: W, fuel: &FuelView) -> Result<()> {
    write_markdown_table(&mut out, fuel.classes.iter().map(FuelTableRow::from))?;

    if !fuel.unclassified_labels.is_empty() {
        writeln!(out)?;
        writeln!(out, "Unclassified fuel labels: {}", fuel.unclassified_labels.join(", "))?;
    }
    Ok(())
}

pub fn render_radar<W: Write>(out: W, chart: &RadarChart) -> Result<()> {
    write_markdown_table(out, chart.series.iter().map(RadarTableRow::from))
}

pub fn render_conclusions<W: Write>(mut out: W, conclusions: &Conclusions) -> Result<()> {
    if conclusions.findings.is_empty() {
        writeln!(out, "No data available for conclusions.")?;
    }
    for finding in &conclusions.findings {
        writeln!(out, "- {finding}")?;
    }
    Ok(())
}

/// Writes scored records to a CSV file, replacing any existing file.
pub fn write_records(path: &Path, records: &[ScoredRecord]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = records.len(), "Scored records written");
    Ok(())
}
