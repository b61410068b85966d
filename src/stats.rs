use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::classify::{Motorization, classify};
use crate::loader::VehicleRecord;
use crate::parser::{parse_leading_number, parse_price};

/// Weight of the 0-100 km/h time in the quality index. Lower times are
/// better, so it is subtracted.
pub const ACCEL_PENALTY: f64 = 10.0;

/// QPR is expressed in points per 1000 currency units.
pub const QPR_SCALE: f64 = 1000.0;

/// A row whose four numeric fields all parsed and whose price is positive.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedRecord {
    pub row: usize,
    pub raw: VehicleRecord,
    pub price_avg: f64,
    pub hp_clean: f64,
    pub speed_clean: f64,
    pub accel_clean: f64,
}

impl CleanedRecord {
    /// Parses the numeric fields of `raw`. Returns `None` if any of them is
    /// missing or the average price is not positive.
    pub fn from_vehicle(row: usize, raw: &VehicleRecord) -> Option<Self> {
        let price_avg = parse_price(raw.price.as_deref())?;
        let hp_clean = parse_leading_number(raw.horsepower.as_deref())?;
        let speed_clean = parse_leading_number(raw.top_speed.as_deref())?;
        let accel_clean = parse_leading_number(raw.acceleration.as_deref())?;

        if price_avg <= 0.0 {
            return None;
        }

        Some(CleanedRecord {
            row,
            raw: raw.clone(),
            price_avg,
            hp_clean,
            speed_clean,
            accel_clean,
        })
    }
}

/// A cleaned record with its derived quality index, QPR and motorization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    /// Position of the row in the input, used to keep ranking ties stable.
    pub row: usize,
    /// `None` when the manufacturer cell is empty; such rows join no brand.
    pub company: Option<String>,
    pub model: String,
    pub fuel_type: Option<String>,
    pub motorization: Motorization,
    pub price_avg: f64,
    pub hp_clean: f64,
    pub speed_clean: f64,
    pub accel_clean: f64,
    pub quality_index: f64,
    pub qpr: f64,
}

impl ScoredRecord {
    pub fn from_cleaned(cleaned: CleanedRecord) -> Self {
        let quality_index =
            quality_index(cleaned.hp_clean, cleaned.speed_clean, cleaned.accel_clean);
        let qpr = qpr(quality_index, cleaned.price_avg);
        let motorization = classify(cleaned.raw.fuel_type.as_deref());

        ScoredRecord {
            row: cleaned.row,
            company: cleaned.raw.company,
            model: cleaned.raw.model.unwrap_or_default(),
            fuel_type: cleaned.raw.fuel_type,
            motorization,
            price_avg: cleaned.price_avg,
            hp_clean: cleaned.hp_clean,
            speed_clean: cleaned.speed_clean,
            accel_clean: cleaned.accel_clean,
            quality_index,
            qpr,
        }
    }
}

/// `hp + speed - 10 * accel`. Not clamped: a slow car can score negative.
pub fn quality_index(hp: f64, speed: f64, accel: f64) -> f64 {
    hp + speed - ACCEL_PENALTY * accel
}

/// Quality points per 1000 of price. Callers guarantee `price_avg > 0`.
pub fn qpr(quality_index: f64, price_avg: f64) -> f64 {
    quality_index / price_avg * QPR_SCALE
}

/// Result of running the scoring pipeline over a dataset.
#[derive(Debug, Clone, Default)]
pub struct ScoreReport {
    pub total_rows: usize,
    pub dropped_rows: usize,
    pub records: Vec<ScoredRecord>,
}

impl ScoreReport {
    pub fn valid_rows(&self) -> usize {
        self.records.len()
    }

    pub fn drop_pct(&self) -> f64 {
        pct(self.dropped_rows, self.total_rows)
    }
}

pub fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Parses, filters, scores and classifies every raw row.
#[tracing::instrument(skip_all, fields(rows = raw.len()))]
pub fn score_all(raw: &[VehicleRecord]) -> ScoreReport {
    let mut records = Vec::with_capacity(raw.len());

    for (row, vehicle) in raw.iter().enumerate() {
        match CleanedRecord::from_vehicle(row, vehicle) {
            Some(cleaned) => records.push(ScoredRecord::from_cleaned(cleaned)),
            None => debug!(
                row,
                company = vehicle.company.as_deref().unwrap_or(""),
                model = vehicle.model.as_deref().unwrap_or(""),
                "Row dropped: unparseable or non-positive field"
            ),
        }
    }

    let report = ScoreReport {
        total_rows: raw.len(),
        dropped_rows: raw.len() - records.len(),
        records,
    };

    info!(
        total = report.total_rows,
        valid = report.valid_rows(),
        dropped = report.dropped_rows,
        "Scoring complete"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(price: &str, hp: &str, speed: &str, accel: &str, fuel: &str) -> VehicleRecord {
        VehicleRecord {
            company: Some("ACME".to_string()),
            model: Some("Roadster".to_string()),
            price: Some(price.to_string()),
            horsepower: Some(hp.to_string()),
            top_speed: Some(speed.to_string()),
            acceleration: Some(accel.to_string()),
            fuel_type: Some(fuel.to_string()),
        }
    }

    #[test]
    fn test_quality_index_and_qpr() {
        let qi = quality_index(500.0, 300.0, 3.0);
        assert_eq!(qi, 770.0);
        assert!((qpr(qi, 100_000.0) - 7.7).abs() < 1e-12);
    }

    #[test]
    fn test_from_vehicle_full_record() {
        let v = vehicle("$100,000", "500 hp", "300 km/h", "3.0 sec", "Petrol");
        let scored = ScoredRecord::from_cleaned(CleanedRecord::from_vehicle(0, &v).unwrap());

        assert_eq!(scored.price_avg, 100_000.0);
        assert_eq!(scored.quality_index, 770.0);
        assert!((scored.qpr - 7.7).abs() < 1e-12);
        assert_eq!(scored.motorization, Motorization::Fossil);
        assert_eq!(scored.company.as_deref(), Some("ACME"));
    }

    #[test]
    fn test_missing_field_is_filtered() {
        let mut v = vehicle("$100,000", "500 hp", "300 km/h", "3.0 sec", "Petrol");
        v.acceleration = None;
        assert!(CleanedRecord::from_vehicle(0, &v).is_none());

        let v = vehicle("$100,000", "N/A", "300 km/h", "3.0 sec", "Petrol");
        assert!(CleanedRecord::from_vehicle(0, &v).is_none());
    }

    #[test]
    fn test_missing_company_is_scored_without_brand() {
        let mut v = vehicle("$20,000", "150 hp", "200 km/h", "8 sec", "Petrol");
        v.company = None;
        let scored = ScoredRecord::from_cleaned(CleanedRecord::from_vehicle(0, &v).unwrap());

        assert_eq!(scored.company, None);
        assert_eq!(scored.quality_index, 270.0);
    }

    #[test]
    fn test_non_positive_price_is_filtered() {
        let v = vehicle("$0", "500 hp", "300 km/h", "3.0 sec", "Petrol");
        assert!(CleanedRecord::from_vehicle(0, &v).is_none());
    }

    #[test]
    fn test_negative_qpr_is_kept() {
        let v = vehicle("$10,000", "50 hp", "100 km/h", "20 sec", "Diesel");
        let scored = ScoredRecord::from_cleaned(CleanedRecord::from_vehicle(0, &v).unwrap());

        assert_eq!(scored.quality_index, -50.0);
        assert!(scored.qpr < 0.0);
    }

    #[test]
    fn test_score_all_counts_and_invariants() {
        let rows = vec![
            vehicle("$100,000", "500 hp", "300 km/h", "3.0 sec", "Petrol"),
            vehicle("TBD", "500 hp", "300 km/h", "3.0 sec", "Petrol"),
            vehicle("$40,000 - $50,000", "200 hp", "200 km/h", "7 sec", "Hybrid"),
            VehicleRecord::default(),
        ];

        let report = score_all(&rows);

        assert_eq!(report.total_rows, 4);
        assert_eq!(report.valid_rows(), 2);
        assert_eq!(report.dropped_rows, 2);
        assert_eq!(report.drop_pct(), 50.0);
        assert_eq!(report.records[0].row, 0);
        assert_eq!(report.records[1].row, 2);
        assert!(report.records.iter().all(|r| r.price_avg > 0.0));
    }

    #[test]
    fn test_score_all_empty() {
        let report = score_all(&[]);
        assert_eq!(report.total_rows, 0);
        assert!(report.records.is_empty());
        assert_eq!(report.drop_pct(), 0.0);
    }
}
