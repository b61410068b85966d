//! Dataset loading: Latin-1 CSV decoding and required-column checks.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};
use encoding_rs::WINDOWS_1252;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::error::DatasetError;

pub const COL_PRICE: &str = "Cars Prices";
pub const COL_HORSEPOWER: &str = "HorsePower";
pub const COL_TOP_SPEED: &str = "Total Speed";
pub const COL_ACCELERATION: &str = "Performance(0 - 100 )KM/H";
pub const COL_FUEL: &str = "Fuel Types";
pub const COL_COMPANY: &str = "Company Names";
pub const COL_MODEL: &str = "Cars Names";

/// Column names the derivation needs, matched exactly.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    COL_PRICE,
    COL_HORSEPOWER,
    COL_TOP_SPEED,
    COL_ACCELERATION,
    COL_FUEL,
    COL_COMPANY,
    COL_MODEL,
];

/// A raw dataset row. Empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VehicleRecord {
    pub company: Option<String>,
    pub model: Option<String>,
    pub price: Option<String>,
    pub horsepower: Option<String>,
    pub top_speed: Option<String>,
    pub acceleration: Option<String>,
    pub fuel_type: Option<String>,
}

/// The loaded table. `available` is false when the file or its columns could
/// not be used, in which case `records` is empty and every view is empty.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub source: String,
    pub available: bool,
    pub columns: Vec<String>,
    pub records: Vec<VehicleRecord>,
}

impl Dataset {
    pub fn unavailable(source: &str) -> Self {
        Dataset {
            source: source.to_string(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Column positions resolved from the header row.
struct ColumnIndex {
    price: usize,
    horsepower: usize,
    top_speed: usize,
    acceleration: usize,
    fuel: usize,
    company: usize,
    model: usize,
}

impl ColumnIndex {
    fn resolve(columns: &[String]) -> Result<Self, DatasetError> {
        let find = |name: &'static str| {
            columns.iter().position(|c| c == name).ok_or_else(|| {
                DatasetError::MissingRequiredColumn {
                    column: name,
                    available: columns.to_vec(),
                }
            })
        };

        Ok(ColumnIndex {
            price: find(COL_PRICE)?,
            horsepower: find(COL_HORSEPOWER)?,
            top_speed: find(COL_TOP_SPEED)?,
            acceleration: find(COL_ACCELERATION)?,
            fuel: find(COL_FUEL)?,
            company: find(COL_COMPANY)?,
            model: find(COL_MODEL)?,
        })
    }

    fn record(&self, row: &ByteRecord) -> VehicleRecord {
        let cell = |i: usize| row.get(i).filter(|b| !b.is_empty()).map(decode_latin1);

        VehicleRecord {
            company: cell(self.company),
            model: cell(self.model),
            price: cell(self.price),
            horsepower: cell(self.horsepower),
            top_speed: cell(self.top_speed),
            acceleration: cell(self.acceleration),
            fuel_type: cell(self.fuel),
        }
    }
}

fn decode_latin1(bytes: &[u8]) -> String {
    WINDOWS_1252
        .decode_without_bom_handling(bytes)
        .0
        .into_owned()
}

/// Reads vehicle rows from any CSV source encoded as Latin-1.
///
/// # Errors
///
/// Returns [`DatasetError::MissingRequiredColumn`] if the header lacks any of
/// [`REQUIRED_COLUMNS`], or a CSV error for malformed input.
pub fn read_records<R: Read>(
    reader: R,
) -> Result<(Vec<String>, Vec<VehicleRecord>), DatasetError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);

    let columns: Vec<String> = rdr.byte_headers()?.iter().map(decode_latin1).collect();
    let index = ColumnIndex::resolve(&columns)?;

    let mut records = Vec::new();
    for result in rdr.byte_records() {
        let row = result?;
        records.push(index.record(&row));
    }

    Ok((columns, records))
}

/// Loads the dataset at `path`.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let source = path.display().to_string();

    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DatasetError::MissingSourceFile {
            path: source.clone(),
        },
        _ => DatasetError::Io(e),
    })?;

    let (columns, records) = read_records(file)?;
    debug!(columns = ?columns, "Dataset header read");
    info!(rows = records.len(), "Dataset loaded");

    Ok(Dataset {
        source,
        available: true,
        columns,
        records,
    })
}

/// Loads the dataset, substituting an unavailable empty dataset when the file
/// is missing or a required column is absent.
///
/// # Errors
///
/// Only unrecoverable read failures (I/O, malformed CSV) are returned.
pub fn load_or_empty(path: &Path) -> Result<Dataset, DatasetError> {
    match load_dataset(path) {
        Ok(dataset) => Ok(dataset),
        Err(e) if e.is_recoverable() => {
            error!(error = %e, "No data available, continuing with an empty dataset");
            Ok(Dataset::unavailable(&path.display().to_string()))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "Company Names,Cars Names,Engines,CC/Battery Capacity,HorsePower,Total Speed,Performance(0 - 100 )KM/H,Cars Prices,Fuel Types,Seats,Torque\n";

    #[test]
    fn test_read_records_maps_columns() {
        let csv = format!(
            "{HEADER}FERRARI,SF90 STRADALE,V8,3990 cc,963 hp,340 km/h,2.5 sec,\"$1,100,000 \",plug in hyrbrid,2,800 Nm\n"
        );
        let (columns, records) = read_records(csv.as_bytes()).unwrap();

        assert_eq!(columns.len(), 11);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.company.as_deref(), Some("FERRARI"));
        assert_eq!(r.model.as_deref(), Some("SF90 STRADALE"));
        assert_eq!(r.horsepower.as_deref(), Some("963 hp"));
        assert_eq!(r.top_speed.as_deref(), Some("340 km/h"));
        assert_eq!(r.acceleration.as_deref(), Some("2.5 sec"));
        assert_eq!(r.price.as_deref(), Some("$1,100,000 "));
        assert_eq!(r.fuel_type.as_deref(), Some("plug in hyrbrid"));
    }

    #[test]
    fn test_empty_cells_are_missing() {
        let csv = format!("{HEADER}KIA,Rio,,,,180 km/h,,\"$16,000\",Petrol,5,\n");
        let (_, records) = read_records(csv.as_bytes()).unwrap();

        assert_eq!(records[0].horsepower, None);
        assert_eq!(records[0].acceleration, None);
        assert_eq!(records[0].top_speed.as_deref(), Some("180 km/h"));
    }

    #[test]
    fn test_short_row_is_tolerated() {
        let csv = format!("{HEADER}KIA,Rio\n");
        let (_, records) = read_records(csv.as_bytes()).unwrap();

        assert_eq!(records[0].model.as_deref(), Some("Rio"));
        assert_eq!(records[0].price, None);
        assert_eq!(records[0].fuel_type, None);
    }

    #[test]
    fn test_latin1_bytes_are_decoded() {
        let mut bytes = HEADER.as_bytes().to_vec();
        bytes.extend_from_slice(
            b"CITRO\xcbN,C\xe9 3,,,110 hp,190 km/h,10 sec,\"$20,000\",Diesel,5,\n",
        );
        let (_, records) = read_records(bytes.as_slice()).unwrap();

        assert_eq!(records[0].company.as_deref(), Some("CITROËN"));
        assert_eq!(records[0].model.as_deref(), Some("Cé 3"));
    }

    #[test]
    fn test_missing_column_reports_available() {
        let csv = "Company Names,Cars Names,Cars Prices\nKIA,Rio,$1\n";
        let err = read_records(csv.as_bytes()).unwrap_err();

        match err {
            DatasetError::MissingRequiredColumn { column, available } => {
                assert_eq!(column, "HorsePower");
                assert_eq!(available, vec!["Company Names", "Cars Names", "Cars Prices"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_column_names_are_case_sensitive() {
        let csv = HEADER.replace("HorsePower", "Horsepower");
        let err = read_records(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MissingRequiredColumn { column: "HorsePower", .. }
        ));
    }

    #[test]
    fn test_load_dataset_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");

        let err = load_dataset(&path).unwrap_err();
        assert!(matches!(err, DatasetError::MissingSourceFile { .. }));

        let dataset = load_or_empty(&path).unwrap();
        assert!(!dataset.available);
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_load_or_empty_on_missing_column() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Company Names,Cars Names\nKIA,Rio\n").unwrap();

        let dataset = load_or_empty(file.path()).unwrap();
        assert!(!dataset.available);
        assert!(dataset.records.is_empty());
    }

    #[test]
    fn test_load_dataset_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{HEADER}TOYOTA,Prius,,,120 hp,180 km/h,10.5 sec,\"$28,000\",Hybrid,5,\n"
        )
        .unwrap();

        let dataset = load_dataset(file.path()).unwrap();
        assert!(dataset.available);
        assert_eq!(dataset.records.len(), 1);
        assert_eq!(dataset.columns[0], "Company Names");
    }
}
