use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::record::FlowRecord;

const EMBEDDED_CSV: &str = include_str!("../../data/sankey_flows.csv");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read flow catalog {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported flow catalog format for {path}; expected .json or .csv")]
    UnsupportedFormat { path: PathBuf },
    #[error("invalid JSON flow catalog")]
    Json(#[from] serde_json::Error),
    #[error("invalid CSV flow catalog at row {row}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },
    #[error("row {row}: empty {field} name")]
    EmptyName { row: usize, field: &'static str },
    #[error("row {row}: missing value")]
    MissingValue { row: usize },
    #[error("row {row}: value {raw:?} is not a number")]
    InvalidValue { row: usize, raw: String },
    #[error("row {row}: value {value} is not finite")]
    NonFinite { row: usize, value: f64 },
    #[error("row {row}: value {value} is negative")]
    Negative { row: usize, value: f64 },
}

#[derive(Debug, Deserialize)]
struct RawJsonRow {
    #[serde(default)]
    source: String,
    #[serde(default)]
    target: String,
    #[serde(default)]
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawCsvRow {
    #[serde(default)]
    source: String,
    #[serde(default)]
    target: String,
    #[serde(default)]
    value: String,
}

/// Validated, immutable list of flow records.
///
/// Every constructor checks the whole catalog and rejects it on the first
/// defective row, so a [`FlowCatalog`] in hand is always safe to build from.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowCatalog {
    records: Vec<FlowRecord>,
    revision: u64,
}

impl FlowCatalog {
    pub fn new(records: Vec<FlowRecord>) -> Result<Self, CatalogError> {
        for (index, record) in records.iter().enumerate() {
            validate_record(index + 1, record)?;
        }

        let revision = catalog_revision(&records);
        Ok(Self { records, revision })
    }

    /// The catalog bundled with the binary.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_csv_str(EMBEDDED_CSV)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let rows: Vec<RawJsonRow> = serde_json::from_str(raw)?;
        let mut records = Vec::with_capacity(rows.len());

        for (index, row) in rows.into_iter().enumerate() {
            let row_number = index + 1;
            let value = row
                .value
                .ok_or(CatalogError::MissingValue { row: row_number })?;
            records.push(FlowRecord::new(row.source.trim(), row.target.trim(), value));
        }

        Self::new(records)
    }

    pub fn from_csv_str(raw: &str) -> Result<Self, CatalogError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(raw.as_bytes());
        let mut records = Vec::new();

        for (index, row) in reader.deserialize::<RawCsvRow>().enumerate() {
            let row_number = index + 1;
            let row = row.map_err(|source| CatalogError::Csv {
                row: row_number,
                source,
            })?;

            if row.value.is_empty() {
                return Err(CatalogError::MissingValue { row: row_number });
            }
            let value = row
                .value
                .parse::<f64>()
                .map_err(|_| CatalogError::InvalidValue {
                    row: row_number,
                    raw: row.value.clone(),
                })?;

            records.push(FlowRecord::new(row.source, row.target, value));
        }

        Self::new(records)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|value| value.to_str())
            .map(str::to_ascii_lowercase);

        let catalog = match extension.as_deref() {
            Some("json") => Self::from_json_str(&raw)?,
            Some("csv") => Self::from_csv_str(&raw)?,
            _ => {
                return Err(CatalogError::UnsupportedFormat {
                    path: path.to_path_buf(),
                });
            }
        };

        debug!(
            path = %path.display(),
            records = catalog.len(),
            "loaded flow catalog"
        );
        Ok(catalog)
    }

    pub fn records(&self) -> &[FlowRecord] {
        &self.records
    }

    /// Content hash of the records, stable for identical input in identical order.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn validate_record(row: usize, record: &FlowRecord) -> Result<(), CatalogError> {
    if record.source.trim().is_empty() {
        return Err(CatalogError::EmptyName {
            row,
            field: "source",
        });
    }
    if record.target.trim().is_empty() {
        return Err(CatalogError::EmptyName {
            row,
            field: "target",
        });
    }
    if !record.value.is_finite() {
        return Err(CatalogError::NonFinite {
            row,
            value: record.value,
        });
    }
    if record.value < 0.0 {
        return Err(CatalogError::Negative {
            row,
            value: record.value,
        });
    }
    Ok(())
}

fn catalog_revision(records: &[FlowRecord]) -> u64 {
    let mut hasher = DefaultHasher::new();
    records.len().hash(&mut hasher);
    for record in records {
        record.source.hash(&mut hasher);
        record.target.hash(&mut hasher);
        record.value.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn embedded_catalog_is_valid() {
        let catalog = FlowCatalog::embedded().expect("embedded catalog parses");
        assert_eq!(catalog.len(), 81);
        assert_eq!(catalog.records()[0].source, "cables");
        assert_eq!(catalog.records()[0].target, "grid status quo");
    }

    #[test]
    fn csv_rows_are_trimmed() {
        let catalog =
            FlowCatalog::from_csv_str("source,target,value\n copper , cables , 2.5\n").unwrap();
        assert_eq!(catalog.records(), &[FlowRecord::new("copper", "cables", 2.5)]);
    }

    #[test]
    fn csv_rejects_non_numeric_value_with_row_number() {
        let raw = "source,target,value\na,b,1.0\nc,d,lots\n";
        let error = FlowCatalog::from_csv_str(raw).unwrap_err();
        assert!(matches!(
            error,
            CatalogError::InvalidValue { row: 2, ref raw } if raw == "lots"
        ));
    }

    #[test]
    fn csv_rejects_missing_value() {
        let error = FlowCatalog::from_csv_str("source,target,value\na,b,\n").unwrap_err();
        assert!(matches!(error, CatalogError::MissingValue { row: 1 }));
    }

    #[test]
    fn json_rejects_empty_target() {
        let raw = r#"[{"source":"a","target":"b","value":1.0},{"source":"a","target":" ","value":2.0}]"#;
        let error = FlowCatalog::from_json_str(raw).unwrap_err();
        assert!(matches!(
            error,
            CatalogError::EmptyName {
                row: 2,
                field: "target"
            }
        ));
    }

    #[test]
    fn json_rejects_missing_value() {
        let raw = r#"[{"source":"a","target":"b"}]"#;
        let error = FlowCatalog::from_json_str(raw).unwrap_err();
        assert!(matches!(error, CatalogError::MissingValue { row: 1 }));
    }

    #[test]
    fn json_rejects_string_value() {
        let raw = r#"[{"source":"a","target":"b","value":"1.0"}]"#;
        assert!(matches!(
            FlowCatalog::from_json_str(raw),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn negative_and_non_finite_values_are_rejected() {
        let negative = FlowCatalog::new(vec![FlowRecord::new("a", "b", -0.5)]).unwrap_err();
        assert!(matches!(negative, CatalogError::Negative { row: 1, .. }));

        let nan = FlowCatalog::new(vec![
            FlowRecord::new("a", "b", 1.0),
            FlowRecord::new("a", "c", f64::NAN),
        ])
        .unwrap_err();
        assert!(matches!(nan, CatalogError::NonFinite { row: 2, .. }));
    }

    #[test]
    fn empty_catalog_is_not_an_error() {
        let catalog = FlowCatalog::from_json_str("[]").unwrap();
        assert!(catalog.is_empty());

        let catalog = FlowCatalog::from_csv_str("source,target,value\n").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn revision_tracks_content_and_order() {
        let a = FlowCatalog::new(vec![
            FlowRecord::new("a", "b", 1.0),
            FlowRecord::new("c", "b", 2.0),
        ])
        .unwrap();
        let same = FlowCatalog::new(a.records().to_vec()).unwrap();
        let reordered = FlowCatalog::new(vec![
            FlowRecord::new("c", "b", 2.0),
            FlowRecord::new("a", "b", 1.0),
        ])
        .unwrap();

        assert_eq!(a.revision(), same.revision());
        assert_ne!(a.revision(), reordered.revision());
    }

    #[test]
    fn from_path_picks_format_by_extension() {
        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"[{{"source":"a","target":"b","value":0.5}}]"#).unwrap();
        let catalog = FlowCatalog::from_path(json.path()).unwrap();
        assert_eq!(catalog.len(), 1);

        let mut csv = tempfile::Builder::new().suffix(".CSV").tempfile().unwrap();
        write!(csv, "source,target,value\na,b,0.5\nb,c,0.25\n").unwrap();
        let catalog = FlowCatalog::from_path(csv.path()).unwrap();
        assert_eq!(catalog.len(), 2);

        let other = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        assert!(matches!(
            FlowCatalog::from_path(other.path()),
            Err(CatalogError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.csv");
        assert!(matches!(
            FlowCatalog::from_path(&missing),
            Err(CatalogError::Io { .. })
        ));
    }
}
