//! Data types produced by the view builders.
//!
//! The `serde` renames name the JSON fields; the `tabled` renames name the
//! columns of the text tables.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::Tabled;

use crate::analyzers::aggregate::GroupSummary;
use crate::analyzers::classify::Motorization;
use crate::output::{display_fixed1, display_fixed2, display_fixed3, display_label, display_usd};
use crate::stats::ScoredRecord;

/// Shown in place of an empty manufacturer or fuel label.
pub const MISSING_LABEL: &str = "(missing)";

/// Headline scalars for the introduction view. `None` means unavailable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_models: usize,
    pub mean_price: Option<f64>,
    pub max_qpr: Option<f64>,
}

/// One leaderboard row, serialized and tabulated with its display column names.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct LeaderboardRow {
    #[serde(rename = "Manufacturer")]
    #[tabled(rename = "Manufacturer", display_with = "display_label")]
    pub manufacturer: Option<String>,
    #[serde(rename = "Model")]
    #[tabled(rename = "Model")]
    pub model: String,
    #[serde(rename = "Motorization")]
    #[tabled(rename = "Motorization")]
    pub motorization: Motorization,
    #[serde(rename = "Avg Price (USD)")]
    #[tabled(rename = "Avg Price (USD)", display_with = "display_usd")]
    pub price_avg: f64,
    #[serde(rename = "Quality Index")]
    #[tabled(rename = "Quality Index", display_with = "display_fixed1")]
    pub quality_index: f64,
    #[serde(rename = "QPR (pts/1k USD)")]
    #[tabled(rename = "QPR (pts/1k USD)", display_with = "display_fixed2")]
    pub qpr: f64,
}

impl From<&ScoredRecord> for LeaderboardRow {
    fn from(r: &ScoredRecord) -> Self {
        LeaderboardRow {
            manufacturer: r.company.clone(),
            model: r.model.clone(),
            motorization: r.motorization,
            price_avg: r.price_avg,
            quality_index: r.quality_index,
            qpr: r.qpr,
        }
    }
}

pub type BrandRow = GroupSummary<String>;
pub type FuelRow = GroupSummary<Motorization>;

/// Text-table variant of [`BrandRow`].
#[derive(Debug, Clone, Tabled)]
pub struct BrandTableRow {
    #[tabled(rename = "Manufacturer")]
    pub manufacturer: String,
    #[tabled(rename = "Models")]
    pub count: usize,
    #[tabled(rename = "Mean QPR", display_with = "display_fixed2")]
    pub mean_qpr: f64,
    #[tabled(rename = "Avg Price (USD)", display_with = "display_usd")]
    pub mean_price: f64,
    #[tabled(rename = "Max Price (USD)", display_with = "display_usd")]
    pub max_price: f64,
}

impl From<&BrandRow> for BrandTableRow {
    fn from(r: &BrandRow) -> Self {
        BrandTableRow {
            manufacturer: r.key.clone(),
            count: r.count,
            mean_qpr: r.mean_qpr,
            mean_price: r.mean_price,
            max_price: r.max_price,
        }
    }
}

/// Text-table variant of [`FuelRow`].
#[derive(Debug, Clone, Tabled)]
pub struct FuelTableRow {
    #[tabled(rename = "Motorization")]
    pub motorization: Motorization,
    #[tabled(rename = "Models")]
    pub count: usize,
    #[tabled(rename = "Mean QPR", display_with = "display_fixed2")]
    pub mean_qpr: f64,
    #[tabled(rename = "Avg Price (USD)", display_with = "display_usd")]
    pub mean_price: f64,
    #[tabled(rename = "Max Price (USD)", display_with = "display_usd")]
    pub max_price: f64,
}

impl From<&FuelRow> for FuelTableRow {
    fn from(r: &FuelRow) -> Self {
        FuelTableRow {
            motorization: r.key,
            count: r.count,
            mean_qpr: r.mean_qpr,
            mean_price: r.mean_price,
            max_price: r.max_price,
        }
    }
}

/// Motorization comparison plus the raw labels that could not be classified.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FuelView {
    pub classes: Vec<FuelRow>,
    pub unclassified_labels: Vec<String>,
}

/// One polygon of the radar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarSeries {
    pub name: Motorization,
    pub values: Vec<f64>,
}

/// Text-table variant of [`RadarSeries`], one column per radar axis.
#[derive(Debug, Clone, Tabled)]
pub struct RadarTableRow {
    #[tabled(rename = "Motorization")]
    pub motorization: Motorization,
    #[tabled(rename = "mean_qpr", display_with = "display_fixed3")]
    pub mean_qpr: f64,
    #[tabled(rename = "mean_price", display_with = "display_fixed3")]
    pub mean_price: f64,
    #[tabled(rename = "count", display_with = "display_fixed3")]
    pub count: f64,
}

impl From<&RadarSeries> for RadarTableRow {
    fn from(s: &RadarSeries) -> Self {
        let value = |i: usize| s.values.get(i).copied().unwrap_or_default();
        RadarTableRow {
            motorization: s.name,
            mean_qpr: value(0),
            mean_price: value(1),
            count: value(2),
        }
    }
}

/// Normalized matrix for a multi-series polar chart: one series per
/// motorization, one value in `[0, 1]` per axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarChart {
    pub axes: Vec<&'static str>,
    pub series: Vec<RadarSeries>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Conclusions {
    pub findings: Vec<String>,
}

/// Every view in one document.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub available: bool,
    pub total_rows: usize,
    pub dropped_rows: usize,
    pub summary: Summary,
    pub top: Vec<LeaderboardRow>,
    pub brands: Vec<BrandRow>,
    pub fuel: FuelView,
    pub radar: RadarChart,
    pub conclusions: Conclusions,
}
