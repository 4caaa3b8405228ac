use std::path::{Path, PathBuf};

use arrow::array::{
    Array, ArrayRef, BooleanArray, Date32Array, Date64Array, Float32Array, Float64Array,
    Int32Array, Int64Array, LargeStringArray, StringArray, TimestampMicrosecondArray,
    TimestampMillisecondArray, TimestampNanosecondArray, TimestampSecondArray,
};
use arrow::datatypes::{DataType, TimeUnit};
use calamine::{open_workbook_auto, Data, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{CellValue, IncidentDataset, RawTable};
use super::normalize::normalize_table;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// A file to load plus the sheet to read when it is a workbook.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataSource {
    pub path: PathBuf,
    pub sheet: String,
}

impl DataSource {
    pub fn new(path: impl Into<PathBuf>, sheet: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet: sheet.into(),
        }
    }

    fn extension(&self) -> String {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
    }
}

/// Load and normalize an incident dataset.
pub fn load_file(source: &DataSource) -> Result<IncidentDataset, DataError> {
    let raw = read_raw(source)?;
    log::info!(
        "Read {} rows x {} columns from {}",
        raw.rows.len(),
        raw.columns.len(),
        source.path.display()
    );
    normalize_table(&raw, &source.path)
}

/// Read a source into a raw table. Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – the named sheet of a workbook
/// * `.csv`     – header row followed by records
/// * `.parquet` – one column per field
/// * `.json`    – `[{ "Country": ..., "LAT_1": ..., ... }, ...]`
pub fn read_raw(source: &DataSource) -> Result<RawTable, DataError> {
    let path = source.path.as_path();
    let metadata = std::fs::metadata(path).map_err(|e| DataError::Load {
        path: path.to_path_buf(),
        source: e,
    })?;
    if !metadata.is_file() {
        return Err(DataError::Load {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
        });
    }

    match source.extension().as_str() {
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => load_workbook(path, &source.sheet),
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        other => Err(DataError::format(
            path,
            format!("unsupported file extension: .{other}"),
        )),
    }
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

/// The first row of the sheet is the header; empty cells are null.
fn load_workbook(path: &Path, sheet: &str) -> Result<RawTable, DataError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| DataError::format(path, format!("opening workbook: {e}")))?;
    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| DataError::format(path, format!("reading sheet '{sheet}': {e}")))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| DataError::format(path, format!("sheet '{sheet}' has no header row")))?;

    let mut table = RawTable {
        columns: header.iter().map(|c| c.to_string()).collect(),
        rows: Vec::new(),
    };
    for row in rows {
        table.push_row(row.iter().map(workbook_cell).collect());
    }
    Ok(table)
}

fn workbook_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => workbook_number(*f),
        Data::String(s) if s.is_empty() => CellValue::Null,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            CellValue::Text(s.clone())
        }
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Null),
        Data::Error(_) | Data::Empty => CellValue::Null,
    }
}

/// Workbooks store every number as a float; whole values read back as
/// integers so `0` stays `"0"` rather than `"0.0"` when used as a label.
fn workbook_number(v: f64) -> CellValue {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53
    if v.fract() == 0.0 && v.abs() <= MAX_EXACT {
        CellValue::Integer(v as i64)
    } else {
        CellValue::Float(v)
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one incident per record.
/// Short records are padded with nulls.
fn load_csv(path: &Path) -> Result<RawTable, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| DataError::format(path, format!("opening CSV: {e}")))?;
    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| DataError::format(path, format!("reading CSV headers: {e}")))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if columns.is_empty() {
        return Err(DataError::format(path, "CSV has no header row"));
    }

    let mut table = RawTable {
        columns,
        rows: Vec::new(),
    };
    for (row_no, result) in reader.records().enumerate() {
        let record =
            result.map_err(|e| DataError::format(path, format!("CSV row {row_no}: {e}")))?;
        table.push_row(record.iter().map(guess_cell_type).collect());
    }
    Ok(table)
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// Columns are the union of keys in first-seen order.
fn load_json(path: &Path) -> Result<RawTable, DataError> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::Load {
        path: path.to_path_buf(),
        source: e,
    })?;
    let root: JsonValue = serde_json::from_str(&text)
        .map_err(|e| DataError::format(path, format!("parsing JSON: {e}")))?;
    let records = root
        .as_array()
        .ok_or_else(|| DataError::format(path, "expected a top-level JSON array"))?;

    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DataError::format(path, format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let mut table = RawTable {
        columns,
        rows: Vec::with_capacity(records.len()),
    };
    for rec in records {
        let row = table
            .columns
            .iter()
            .map(|col| rec.get(col).map(json_to_cell).unwrap_or(CellValue::Null))
            .collect();
        table.push_row(row);
    }
    Ok(table)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<RawTable, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::Load {
        path: path.to_path_buf(),
        source: e,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| DataError::format(path, format!("reading parquet metadata: {e}")))?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder
        .build()
        .map_err(|e| DataError::format(path, format!("building parquet reader: {e}")))?;

    let mut table = RawTable {
        columns,
        rows: Vec::new(),
    };
    for batch_result in reader {
        let batch = batch_result
            .map_err(|e| DataError::format(path, format!("reading parquet record batch: {e}")))?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| arrow_cell(col, row))
                .collect();
            table.push_row(cells);
        }
    }
    Ok(table)
}

fn downcast<T: 'static>(col: &ArrayRef) -> Option<&T> {
    col.as_any().downcast_ref::<T>()
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let cell = match col.data_type() {
        DataType::Utf8 => downcast::<StringArray>(col).map(|a| CellValue::Text(a.value(row).to_string())),
        DataType::LargeUtf8 => {
            downcast::<LargeStringArray>(col).map(|a| CellValue::Text(a.value(row).to_string()))
        }
        DataType::Int32 => downcast::<Int32Array>(col).map(|a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int64 => downcast::<Int64Array>(col).map(|a| CellValue::Integer(a.value(row))),
        DataType::Float32 => downcast::<Float32Array>(col).map(|a| CellValue::Float(a.value(row) as f64)),
        DataType::Float64 => downcast::<Float64Array>(col).map(|a| CellValue::Float(a.value(row))),
        DataType::Boolean => downcast::<BooleanArray>(col).map(|a| CellValue::Bool(a.value(row))),
        DataType::Date32 => downcast::<Date32Array>(col).and_then(|a| a.value_as_datetime(row)).map(CellValue::DateTime),
        DataType::Date64 => downcast::<Date64Array>(col).and_then(|a| a.value_as_datetime(row)).map(CellValue::DateTime),
        DataType::Timestamp(unit, _) => {
            let dt = match unit {
                TimeUnit::Second => downcast::<TimestampSecondArray>(col).and_then(|a| a.value_as_datetime(row)),
                TimeUnit::Millisecond => downcast::<TimestampMillisecondArray>(col).and_then(|a| a.value_as_datetime(row)),
                TimeUnit::Microsecond => downcast::<TimestampMicrosecondArray>(col).and_then(|a| a.value_as_datetime(row)),
                TimeUnit::Nanosecond => downcast::<TimestampNanosecondArray>(col).and_then(|a| a.value_as_datetime(row)),
            };
            dt.map(CellValue::DateTime)
        }
        _ => arrow::util::display::array_value_to_string(col, row)
            .ok()
            .map(CellValue::Text),
    };
    cell.unwrap_or(CellValue::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_cells_are_typed() {
        assert_eq!(guess_cell_type(""), CellValue::Null);
        assert_eq!(guess_cell_type("42"), CellValue::Integer(42));
        assert_eq!(guess_cell_type("-6.25"), CellValue::Float(-6.25));
        assert_eq!(guess_cell_type("Oil spill"), CellValue::Text("Oil spill".into()));
    }

    #[test]
    fn json_cells_are_typed() {
        assert_eq!(json_to_cell(&serde_json::json!(null)), CellValue::Null);
        assert_eq!(json_to_cell(&serde_json::json!(3)), CellValue::Integer(3));
        assert_eq!(json_to_cell(&serde_json::json!(1.5)), CellValue::Float(1.5));
    }

    #[test]
    fn workbook_empty_strings_are_null() {
        assert_eq!(workbook_cell(&Data::String(String::new())), CellValue::Null);
        assert_eq!(workbook_cell(&Data::Empty), CellValue::Null);
        assert_eq!(workbook_cell(&Data::Int(7)), CellValue::Integer(7));
    }

    #[test]
    fn whole_workbook_floats_become_integers() {
        assert_eq!(workbook_cell(&Data::Float(0.0)), CellValue::Integer(0));
        assert_eq!(workbook_cell(&Data::Float(-3.0)), CellValue::Integer(-3));
        assert_eq!(workbook_cell(&Data::Float(106.8)), CellValue::Float(106.8));
        assert_eq!(workbook_cell(&Data::Float(f64::NAN)).to_string(), "NaN");
        assert_eq!(workbook_cell(&Data::Float(0.0)).as_label().as_deref(), Some("0"));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = load_file(&DataSource::new("/definitely/not/here.xlsx", "Sheet1")).unwrap_err();
        assert!(err.is_load());
    }
}
