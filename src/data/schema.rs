//! Explicit column schema of the incident sheet.
//!
//! Column lookups by name happen exactly once, when a raw table is resolved
//! into a [`ColumnIndex`]. After that every field is addressed by position.

pub const COUNTRY: &str = "Country";
pub const INC_DATE: &str = "inc_date";
pub const POLLUTION_QTY: &str = "pollution_qty";
pub const LATITUDE: &str = "LAT_1";
pub const LONGITUDE: &str = "LONG";
pub const POLLUTION_TYPE: &str = "pollution_type";
pub const MATERIAL: &str = "material";
pub const AWARE_ANS: &str = "aware_ans";

/// Columns whose name starts with this prefix are annotations and are dropped.
pub const NOTE_PREFIX: &str = "Note";

pub const REQUIRED_COLUMNS: [&str; 5] = [COUNTRY, INC_DATE, POLLUTION_QTY, LATITUDE, LONGITUDE];

/// Columns written by the CSV export and shown in the detail table.
pub const EXPORT_COLUMNS: [&str; 6] = [COUNTRY, INC_DATE, POLLUTION_TYPE, MATERIAL, LATITUDE, LONGITUDE];

pub fn is_note_column(name: &str) -> bool {
    name.starts_with(NOTE_PREFIX)
}

/// Positions of the known columns within a raw table's header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndex {
    pub country: usize,
    pub inc_date: usize,
    pub pollution_qty: usize,
    pub latitude: usize,
    pub longitude: usize,
    pub pollution_type: Option<usize>,
    pub material: Option<usize>,
    pub aware_ans: Option<usize>,
    /// Pass-through columns (neither known nor notes) in header order.
    pub extra: Vec<(usize, String)>,
    /// Names of the dropped note columns.
    pub notes: Vec<String>,
}

impl ColumnIndex {
    /// Resolve the header, returning every missing required column on failure.
    pub fn resolve(columns: &[String]) -> Result<Self, Vec<&'static str>> {
        let find = |name: &str| columns.iter().position(|c| c == name);

        let missing: Vec<&'static str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| find(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }

        let known = [
            COUNTRY,
            INC_DATE,
            POLLUTION_QTY,
            LATITUDE,
            LONGITUDE,
            POLLUTION_TYPE,
            MATERIAL,
            AWARE_ANS,
        ];
        let mut extra = Vec::new();
        let mut notes = Vec::new();
        for (i, name) in columns.iter().enumerate() {
            if is_note_column(name) {
                notes.push(name.clone());
            } else if !known.contains(&name.as_str()) {
                extra.push((i, name.clone()));
            }
        }

        // `find` only returns None for optional columns past the check above.
        let required = |name: &str| find(name).unwrap_or_default();

        Ok(ColumnIndex {
            country: required(COUNTRY),
            inc_date: required(INC_DATE),
            pollution_qty: required(POLLUTION_QTY),
            latitude: required(LATITUDE),
            longitude: required(LONGITUDE),
            pollution_type: find(POLLUTION_TYPE),
            material: find(MATERIAL),
            aware_ans: find(AWARE_ANS),
            extra,
            notes,
        })
    }

    /// Column names of the cleaned dataset: the header without note columns,
    /// with `pollution_type` appended when it had to be synthesized.
    pub fn cleaned_columns(&self, columns: &[String]) -> Vec<String> {
        let mut cleaned: Vec<String> = columns
            .iter()
            .filter(|c| !is_note_column(c))
            .cloned()
            .collect();
        if self.pollution_type.is_none() {
            cleaned.push(POLLUTION_TYPE.to_string());
        }
        cleaned
    }
}
