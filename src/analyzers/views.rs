use crate::analyzers::aggregate::{group_by, normalize_min_max, rank_groups, top_n_by_qpr};
use crate::analyzers::classify::Motorization;
use crate::analyzers::types::{
    BrandRow, Conclusions, FuelRow, FuelView, LeaderboardRow, MISSING_LABEL, RadarChart,
    RadarSeries, Report, Summary,
};
use crate::analyzers::utility::{max, mean};
use crate::config::ViewConfig;
use crate::loader::Dataset;
use crate::output::format_usd;
use crate::stats::{ScoreReport, ScoredRecord};
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Axes of the radar chart, in display order.
pub const RADAR_AXES: [&str; 3] = ["mean_qpr", "mean_price", "count"];

/// Total valid models, mean price and best QPR.
pub fn summary(records: &[ScoredRecord]) -> Summary {
    let prices: Vec<f64> = records.iter().map(|r| r.price_avg).collect();
    let qprs: Vec<f64> = records.iter().map(|r| r.qpr).collect();

    Summary {
        total_models: records.len(),
        mean_price: mean(&prices),
        max_qpr: max(&qprs),
    }
}

/// The `n` best-value models.
pub fn leaderboard(records: &[ScoredRecord], n: usize) -> Vec<LeaderboardRow> {
    top_n_by_qpr(records, n)
        .iter()
        .map(LeaderboardRow::from)
        .collect()
}

/// Manufacturers with at least `min_models` scored models, best mean QPR first.
///
/// Records without a manufacturer are left out.
pub fn brand_comparison(
    records: &[ScoredRecord],
    min_models: usize,
    limit: usize,
) -> Vec<BrandRow> {
    rank_groups(group_by(records, |r| r.company.clone()), min_models, limit)
}

/// Every motorization class present, best mean QPR first.
pub fn fuel_comparison(records: &[ScoredRecord]) -> FuelView {
    let classes: Vec<FuelRow> =
        rank_groups(group_by(records, |r| Some(r.motorization)), 1, usize::MAX);

    let unclassified_labels: Vec<String> = records
        .iter()
        .filter(|r| r.motorization == Motorization::Other)
        .map(|r| r.fuel_type.as_deref().unwrap_or(MISSING_LABEL).to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    if !unclassified_labels.is_empty() {
        warn!(labels = ?unclassified_labels, "Fuel labels fell back to Other/Unclassified");
    }

    FuelView {
        classes,
        unclassified_labels,
    }
}

/// Normalizes the motorization table over [`RADAR_AXES`].
pub fn radar(classes: &[FuelRow]) -> RadarChart {
    let matrix: Vec<Vec<f64>> = classes
        .iter()
        .map(|c| vec![c.mean_qpr, c.mean_price, c.count as f64])
        .collect();

    let series = classes
        .iter()
        .zip(normalize_min_max(&matrix))
        .map(|(c, values)| RadarSeries {
            name: c.key,
            values,
        })
        .collect();

    RadarChart {
        axes: RADAR_AXES.to_vec(),
        series,
    }
}

fn models(count: usize) -> String {
    if count == 1 {
        "1 model".to_string()
    } else {
        format!("{count} models")
    }
}

/// Narrative findings drawn from the leaderboard, brand and fuel views.
pub fn conclusions(top: &[LeaderboardRow], brands: &[BrandRow], fuel: &FuelView) -> Conclusions {
    let mut findings = Vec::new();

    if let Some(best) = top.first() {
        findings.push(format!(
            "Best value model: {} {} ({}) delivers {:.2} pts/1k USD at an average price of {}.",
            best.manufacturer.as_deref().unwrap_or(MISSING_LABEL),
            best.model,
            best.motorization,
            best.qpr,
            format_usd(best.price_avg)
        ));
    }

    if let Some(brand) = brands.first() {
        findings.push(format!(
            "Most consistent brand: {} averages {:.2} pts/1k USD across {}.",
            brand.key,
            brand.mean_qpr,
            models(brand.count)
        ));
    }

    if let Some(class) = fuel.classes.first() {
        findings.push(format!(
            "Best motorization on average: {} with {:.2} pts/1k USD over {}.",
            class.key,
            class.mean_qpr,
            models(class.count)
        ));
    }

    let fossil = fuel.classes.iter().find(|c| c.key == Motorization::Fossil);
    if let Some(fossil) = fossil {
        for class in fuel.classes.iter().filter(|c| c.key.is_electrified()) {
            let verdict = match class.mean_qpr.total_cmp(&fossil.mean_qpr) {
                Ordering::Greater => "beats",
                Ordering::Equal => "matches",
                Ordering::Less => "trails",
            };
            findings.push(format!(
                "{} {} Fossil on value: {:.2} vs {:.2} pts/1k USD, \
                 at an average price of {} vs {}.",
                class.key,
                verdict,
                class.mean_qpr,
                fossil.mean_qpr,
                format_usd(class.mean_price),
                format_usd(fossil.mean_price)
            ));
        }
    }

    if !fuel.unclassified_labels.is_empty() {
        findings.push(format!(
            "Unrecognized fuel labels grouped as {}: {}.",
            Motorization::Other,
            fuel.unclassified_labels.join(", ")
        ));
    }

    Conclusions { findings }
}

/// Builds every view from a dataset and its already scored records.
#[tracing::instrument(skip_all, fields(source = %dataset.source))]
pub fn build_report(dataset: &Dataset, scored: &ScoreReport, config: &ViewConfig) -> Report {
    let records = &scored.records;

    let top = leaderboard(records, config.top_n);
    let brands = brand_comparison(records, config.min_brand_models, config.brand_limit);
    let fuel = fuel_comparison(records);
    let radar = radar(&fuel.classes);
    let conclusions = conclusions(&top, &brands, &fuel);

    info!(
        valid = records.len(),
        brands = brands.len(),
        classes = fuel.classes.len(),
        "Report built"
    );

    Report {
        generated_at: Utc::now(),
        source: dataset.source.clone(),
        available: dataset.available,
        total_rows: scored.total_rows,
        dropped_rows: scored.dropped_rows,
        summary: summary(records),
        top,
        brands,
        fuel,
        radar,
        conclusions,
    }
}
