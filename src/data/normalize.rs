use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use super::error::DataError;
use super::model::{CellValue, IncidentDataset, IncidentRecord, RawTable};
use super::schema::ColumnIndex;

// ---------------------------------------------------------------------------
// Pollution type canonicalization
// ---------------------------------------------------------------------------

/// Sentinel for absent or placeholder categories (before title-casing).
pub const UNKNOWN_TYPE: &str = "unknown";

/// The sentinel as it appears in a normalized dataset.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Category assigned to every row when the source has no `pollution_type`.
pub const MISSING_COLUMN_TYPE: &str = "Unknown (Column Missing)";

static NULL_CELL: CellValue = CellValue::Null;

/// Lower-cased placeholder values that carry no category.
/// `nan` is what a null cell stringifies to.
const PLACEHOLDER_TYPES: &[&str] = &["nan", "", "-", "0", "null", "n/a", "no data"];

/// Known duplicate phrasings, applied after lower-casing.
const TYPE_SYNONYMS: &[(&str, &str)] = &[
    ("oil spill", "oil spill"),
    ("oil spills", "oil spill"),
    ("waste dumped overboard", "waste dumped at sea"),
    ("plastic waste", "plastic waste"),
];

/// Canonical label for a raw `pollution_type` cell.
pub fn normalize_pollution_type(cell: &CellValue) -> String {
    let raw = match cell {
        CellValue::Null => "nan".to_string(),
        other => other.to_string(),
    };
    normalize_pollution_label(&raw)
}

/// Canonical label for raw category text. Canonical labels map to themselves.
pub fn normalize_pollution_label(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();

    let canonical = if PLACEHOLDER_TYPES.contains(&lowered.as_str()) {
        UNKNOWN_TYPE
    } else {
        TYPE_SYNONYMS
            .iter()
            .find(|(from, _)| *from == lowered)
            .map(|(_, to)| *to)
            .unwrap_or(lowered.as_str())
    };

    title_case(canonical)
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Field coercion
// ---------------------------------------------------------------------------

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y", "%B %d, %Y", "%b %d, %Y"];

/// Coerce a cell to a timestamp; anything unparsable is missing.
pub fn parse_incident_date(cell: &CellValue) -> Option<NaiveDateTime> {
    match cell {
        CellValue::DateTime(dt) => Some(*dt),
        CellValue::Text(s) => parse_date_text(s),
        _ => None,
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Coerce a cell to a finite number; anything else is missing.
pub fn parse_number(cell: &CellValue) -> Option<f64> {
    let value = match cell {
        CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
        other => other.as_f64()?,
    };
    value.is_finite().then_some(value)
}

// ---------------------------------------------------------------------------
// Table normalization
// ---------------------------------------------------------------------------

/// Turn a raw table into a normalized dataset.
///
/// Fails only when required columns are missing. Bad cells become missing
/// values, rows without both coordinates are dropped, and zero surviving rows
/// is a valid (empty) result.
pub fn normalize_table(raw: &RawTable, path: &Path) -> Result<IncidentDataset, DataError> {
    let index = ColumnIndex::resolve(&raw.columns).map_err(|missing| {
        DataError::format(
            path,
            format!("missing required column(s): {}", missing.join(", ")),
        )
    })?;

    if !index.notes.is_empty() {
        log::info!("Dropping note columns {:?}", index.notes);
    }
    if index.pollution_type.is_none() {
        log::warn!("Source has no pollution_type column; using '{MISSING_COLUMN_TYPE}'");
    }

    let text = |row: &[CellValue], col: Option<usize>| -> Option<String> {
        col.and_then(|i| row.get(i)).and_then(CellValue::as_label)
    };

    let mut records = Vec::with_capacity(raw.rows.len());
    for row in &raw.rows {
        let cell = |i: usize| row.get(i).unwrap_or(&NULL_CELL);

        let (Some(latitude), Some(longitude)) =
            (parse_number(cell(index.latitude)), parse_number(cell(index.longitude)))
        else {
            continue;
        };

        let pollution_type = match index.pollution_type {
            Some(i) => normalize_pollution_type(cell(i)),
            None => MISSING_COLUMN_TYPE.to_string(),
        };

        let extra = index
            .extra
            .iter()
            .map(|(i, name)| (name.clone(), cell(*i).clone()))
            .collect();

        records.push(IncidentRecord {
            country: text(row, Some(index.country)),
            incident_date: parse_incident_date(cell(index.inc_date)),
            pollution_quantity: parse_number(cell(index.pollution_qty)),
            latitude,
            longitude,
            pollution_type,
            material: text(row, index.material),
            aware_ans: text(row, index.aware_ans),
            extra,
        });
    }

    let dropped = raw.rows.len() - records.len();
    log::info!(
        "Normalized {} of {} rows ({dropped} dropped for missing coordinates)",
        records.len(),
        raw.rows.len()
    );

    Ok(IncidentDataset::from_records(
        records,
        index.cleaned_columns(&raw.columns),
    ))
}
