use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use tempfile::TempDir;

use marine_pollution_dashboard::data::normalize::UNKNOWN_LABEL;
use marine_pollution_dashboard::data::{load_file, DataSource};

const SHEET: &str = "ENV_Marine_Pollution_Obs_data_v";

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ---------------------------------------------------------------------------
// Workbook sources
// ---------------------------------------------------------------------------

/// Two dated incidents and one without a longitude, all numbers stored as
/// workbook numbers.
fn write_workbook(path: &Path) {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET).unwrap();

    let header = [
        "Country",
        "inc_date",
        "pollution_qty",
        "LAT_1",
        "LONG",
        "pollution_type",
        "material",
        "aware_ans",
        "Notes",
    ];
    for (col, name) in header.iter().enumerate() {
        sheet.write_string(0, col as u16, *name).unwrap();
    }

    // Row 1: numeric 0 as the pollution type, numeric awareness answer.
    sheet.write_string(1, 0, "Indonesia").unwrap();
    sheet
        .write_datetime_with_format(1, 1, &ExcelDateTime::from_ymd(2020, 3, 15).unwrap(), &date_format)
        .unwrap();
    sheet.write_number(1, 2, 12.5).unwrap();
    sheet.write_number(1, 3, -6.2).unwrap();
    sheet.write_number(1, 4, 106.8).unwrap();
    sheet.write_number(1, 5, 0.0).unwrap();
    sheet.write_string(1, 6, "Crude oil").unwrap();
    sheet.write_number(1, 7, 1.0).unwrap();
    sheet.write_string(1, 8, "checked").unwrap();

    // Row 2: text category and whole-number quantity.
    sheet.write_string(2, 0, "Malaysia").unwrap();
    sheet
        .write_datetime_with_format(2, 1, &ExcelDateTime::from_ymd(2021, 7, 1).unwrap(), &date_format)
        .unwrap();
    sheet.write_number(2, 2, 3.0).unwrap();
    sheet.write_number(2, 3, 5.4).unwrap();
    sheet.write_number(2, 4, 100.3).unwrap();
    sheet.write_string(2, 5, "Oil Spills").unwrap();
    sheet.write_string(2, 7, "Yes").unwrap();

    // Row 3: no longitude, dropped.
    sheet.write_string(3, 0, "Vietnam").unwrap();
    sheet.write_number(3, 3, 10.3).unwrap();
    sheet.write_string(3, 5, "Sewage").unwrap();

    workbook.save(path).unwrap();
}

fn workbook_fixture(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("Marine Pollution data.xlsx");
    write_workbook(&path);
    path
}

#[test]
fn workbook_numbers_and_dates_are_normalized() {
    let dir = TempDir::new().unwrap();
    let path = workbook_fixture(&dir);

    let ds = load_file(&DataSource::new(&path, SHEET)).unwrap();
    assert_eq!(ds.len(), 2);
    assert!(!ds.has_column("Notes"));

    let first = &ds.records[0];
    assert_eq!(first.pollution_type, UNKNOWN_LABEL);
    assert_eq!(first.aware_ans.as_deref(), Some("1"));
    assert_eq!(first.pollution_quantity, Some(12.5));
    assert_eq!(first.incident_day(), Some(day(2020, 3, 15)));
    assert_eq!(first.latitude, -6.2);

    let second = &ds.records[1];
    assert_eq!(second.pollution_type, "Oil Spill");
    assert_eq!(second.pollution_quantity, Some(3.0));
    assert_eq!(second.material, None);
    assert_eq!(ds.date_bounds, Some((day(2020, 3, 15), day(2021, 7, 1))));
}

#[test]
fn unknown_sheet_is_a_format_error() {
    let dir = TempDir::new().unwrap();
    let path = workbook_fixture(&dir);

    let err = load_file(&DataSource::new(&path, "Sheet1")).unwrap_err();
    assert!(err.is_format());
    assert!(err.to_string().contains("Sheet1"));
}

// ---------------------------------------------------------------------------
// Parquet sources
// ---------------------------------------------------------------------------

fn days_since_epoch(d: NaiveDate) -> i32 {
    (d - day(1970, 1, 1)).num_days() as i32
}

fn write_parquet(path: &Path) {
    let fields = vec![
        Field::new("Country", DataType::Utf8, true),
        Field::new("inc_date", DataType::Date32, true),
        Field::new("pollution_qty", DataType::Float64, true),
        Field::new("LAT_1", DataType::Float64, true),
        Field::new("LONG", DataType::Float64, true),
        Field::new("pollution_type", DataType::Utf8, true),
        Field::new("Note_2", DataType::Utf8, true),
    ];
    let schema = Arc::new(Schema::new(fields));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec![Some("Norway"), Some("Chile"), Some("Brazil")])),
        Arc::new(Date32Array::from(vec![
            Some(days_since_epoch(day(2022, 2, 2))),
            None,
            Some(days_since_epoch(day(2022, 3, 3))),
        ])),
        Arc::new(Float64Array::from(vec![Some(7.5), None, Some(1.0)])),
        Arc::new(Float64Array::from(vec![Some(60.4), Some(-33.0), None])),
        Arc::new(Float64Array::from(vec![Some(5.3), Some(-71.6), Some(-43.2)])),
        Arc::new(StringArray::from(vec![Some(" OIL SPILLS"), None, Some("Sewage")])),
        Arc::new(StringArray::from(vec![None, Some("late report"), None])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

    let file = std::fs::File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

#[test]
fn parquet_columns_are_read_and_normalized() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("incidents.parquet");
    write_parquet(&path);

    let ds = load_file(&DataSource::new(&path, SHEET)).unwrap();

    // Brazil has no latitude.
    assert_eq!(ds.len(), 2);
    assert!(!ds.has_column("Note_2"));

    let norway = &ds.records[0];
    assert_eq!(norway.pollution_type, "Oil Spill");
    assert_eq!(norway.incident_day(), Some(day(2022, 2, 2)));
    assert_eq!(norway.pollution_quantity, Some(7.5));

    let chile = &ds.records[1];
    assert_eq!(chile.pollution_type, UNKNOWN_LABEL);
    assert_eq!(chile.incident_date, None);
    assert_eq!(chile.pollution_quantity, None);
    assert_eq!(ds.date_bounds, Some((day(2022, 2, 2), day(2022, 2, 2))));
}
