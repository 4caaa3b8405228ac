use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// CellValue – a single raw cell read from a source table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as it comes out of a spreadsheet, CSV, Parquet or
/// JSON source, before any normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            // `{:?}` keeps the trailing `.0` on whole floats.
            CellValue::Float(v) => write!(f, "{v:?}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::DateTime(dt) => write!(f, "{}", format_timestamp(dt)),
            CellValue::Null => write!(f, ""),
        }
    }
}

impl CellValue {
    /// Try to interpret the cell as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Text content of a descriptive field; `None` for null cells.
    pub fn as_label(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Render a timestamp the way the export and the detail table show it: the
/// bare date at midnight, date and time otherwise.
pub fn format_timestamp(dt: &NaiveDateTime) -> String {
    if dt.time() == chrono::NaiveTime::MIN {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

// ---------------------------------------------------------------------------
// RawTable – the source as read, before cleaning
// ---------------------------------------------------------------------------

/// Header names (case preserved) and rows of cells. Every row has exactly
/// `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Push a row, padding with nulls or truncating to the header width.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Null);
        self.rows.push(row);
    }
}

// ---------------------------------------------------------------------------
// IncidentRecord – one row of the normalized dataset
// ---------------------------------------------------------------------------

/// A single marine pollution incident.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentRecord {
    pub country: Option<String>,
    pub incident_date: Option<NaiveDateTime>,
    pub pollution_quantity: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
    /// Normalized, title-cased category label. Never empty.
    pub pollution_type: String,
    pub material: Option<String>,
    pub aware_ans: Option<String>,
    /// Remaining pass-through columns: column_name → value.
    pub extra: BTreeMap<String, CellValue>,
}

impl IncidentRecord {
    /// Calendar day of the incident, time of day discarded.
    pub fn incident_day(&self) -> Option<NaiveDate> {
        self.incident_date.map(|dt| dt.date())
    }
}

// ---------------------------------------------------------------------------
// IncidentDataset – normalized (or filtered) dataset
// ---------------------------------------------------------------------------

/// A normalized dataset with pre-computed selector indices.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentDataset {
    pub records: Vec<IncidentRecord>,
    /// Ordered column names as they appear after cleaning.
    pub column_names: Vec<String>,
    /// Sorted unique non-missing countries.
    pub countries: BTreeSet<String>,
    /// Sorted unique normalized pollution types.
    pub pollution_types: BTreeSet<String>,
    /// Earliest and latest incident day, if any row has a date.
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
}

impl IncidentDataset {
    /// Build selector indices from the records.
    pub fn from_records(records: Vec<IncidentRecord>, column_names: Vec<String>) -> Self {
        let mut countries = BTreeSet::new();
        let mut pollution_types = BTreeSet::new();
        let mut date_bounds: Option<(NaiveDate, NaiveDate)> = None;

        for rec in &records {
            if let Some(country) = &rec.country {
                countries.insert(country.clone());
            }
            pollution_types.insert(rec.pollution_type.clone());
            if let Some(day) = rec.incident_day() {
                date_bounds = Some(match date_bounds {
                    Some((lo, hi)) => (lo.min(day), hi.max(day)),
                    None => (day, day),
                });
            }
        }

        IncidentDataset {
            records,
            column_names,
            countries,
            pollution_types,
            date_bounds,
        }
    }

    /// Build a dataset over a subset of this one's rows, sharing its schema.
    pub fn subset(&self, indices: &[usize]) -> Self {
        let records = indices
            .iter()
            .filter_map(|&i| self.records.get(i).cloned())
            .collect();
        Self::from_records(records, self.column_names.clone())
    }

    /// Number of incidents.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_names.iter().any(|c| c == name)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn indices_are_sorted_and_bounded() {
        let ds = dataset(vec![
            record("Malaysia", "Oil Spill", Some(at_midnight(2021, 3, 4))),
            record("Indonesia", "Plastic Waste", None),
            record("Indonesia", "Oil Spill", Some(at_midnight(2019, 12, 31))),
        ]);

        assert_eq!(
            ds.countries.iter().cloned().collect::<Vec<_>>(),
            vec!["Indonesia", "Malaysia"]
        );
        assert_eq!(ds.pollution_types.len(), 2);
        assert_eq!(ds.date_bounds, Some((day(2019, 12, 31), day(2021, 3, 4))));
    }

    #[test]
    fn empty_dataset_has_no_date_bounds() {
        let ds = dataset(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.date_bounds.is_none());
        assert!(ds.has_column("LAT_1"));
    }

    #[test]
    fn timestamps_drop_midnight_time() {
        assert_eq!(format_timestamp(&at_midnight(2020, 1, 5)), "2020-01-05");
        let with_time = day(2020, 1, 5).and_hms_opt(14, 30, 0).unwrap();
        assert_eq!(format_timestamp(&with_time), "2020-01-05 14:30:00");
    }

    #[test]
    fn cell_labels() {
        assert_eq!(CellValue::Float(0.0).to_string(), "0.0");
        assert_eq!(CellValue::Integer(0).to_string(), "0");
        assert_eq!(CellValue::Null.as_label(), None);
        assert_eq!(CellValue::Text("Yes".into()).as_label().as_deref(), Some("Yes"));
    }
}
