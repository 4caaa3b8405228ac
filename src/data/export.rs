use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::model::{format_timestamp, IncidentDataset, IncidentRecord};

/// Default file name offered when saving an export.
pub const EXPORT_FILE_NAME: &str = "filtered_marine_pollution.csv";

/// One exported line. Field order and names are the CSV header.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Country")]
    country: Option<&'a str>,
    #[serde(rename = "inc_date")]
    incident_date: Option<String>,
    pollution_type: &'a str,
    material: Option<&'a str>,
    #[serde(rename = "LAT_1")]
    latitude: f64,
    #[serde(rename = "LONG")]
    longitude: f64,
}

impl<'a> From<&'a IncidentRecord> for ExportRow<'a> {
    fn from(rec: &'a IncidentRecord) -> Self {
        ExportRow {
            country: rec.country.as_deref(),
            incident_date: rec.incident_date.as_ref().map(format_timestamp),
            pollution_type: &rec.pollution_type,
            material: rec.material.as_deref(),
            latitude: rec.latitude,
            longitude: rec.longitude,
        }
    }
}

/// Write the export columns of `dataset` as UTF-8 CSV with a header row.
/// Missing values are empty fields.
pub fn write_csv<W: Write>(dataset: &IncidentDataset, writer: W) -> csv::Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(super::schema::EXPORT_COLUMNS)?;
    for rec in &dataset.records {
        wtr.serialize(ExportRow::from(rec))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Export to an in-memory buffer.
pub fn to_csv_bytes(dataset: &IncidentDataset) -> csv::Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(dataset, &mut buf)?;
    Ok(buf)
}

/// Export to a file, replacing it if it exists.
pub fn export_to_path(dataset: &IncidentDataset, path: &Path) -> csv::Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(dataset, std::io::BufWriter::new(file))?;
    log::info!("Exported {} incidents to {}", dataset.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::test_support::*;

    #[test]
    fn writes_header_and_export_columns_only() {
        let mut rec = record("Indonesia", "Oil Spill", Some(at_midnight(2020, 2, 29)));
        rec.material = Some("Crude, heavy".into());
        rec.aware_ans = Some("Yes".into());
        let mut undated = record("Fiji", "Unknown", None);
        undated.country = None;

        let csv = String::from_utf8(to_csv_bytes(&dataset(vec![rec, undated])).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Country,inc_date,pollution_type,material,LAT_1,LONG");
        assert_eq!(lines[1], "Indonesia,2020-02-29,Oil Spill,\"Crude, heavy\",-6.2,106.8");
        assert_eq!(lines[2], ",,Unknown,,-6.2,106.8");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_dataset_exports_header_only() {
        let csv = to_csv_bytes(&dataset(Vec::new())).unwrap();
        assert_eq!(
            String::from_utf8(csv).unwrap(),
            "Country,inc_date,pollution_type,material,LAT_1,LONG\n"
        );
    }
}
