use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

const INCIDENTS: usize = 400;

/// (country, latitude, longitude) of a coastal anchor point.
const COASTS: &[(&str, f64, f64)] = &[
    ("Indonesia", -6.1, 106.8),
    ("Malaysia", 5.4, 100.3),
    ("Philippines", 14.6, 120.9),
    ("Vietnam", 10.3, 107.1),
    ("Thailand", 13.1, 100.9),
    ("India", 19.0, 72.8),
    ("Nigeria", 6.4, 3.4),
    ("Brazil", -22.9, -43.2),
    ("Chile", -33.0, -71.6),
    ("Norway", 60.4, 5.3),
];

/// Raw category labels as they show up in field reports, messy on purpose.
const POLLUTION_TYPES: &[&str] = &[
    "Oil spill",
    "OIL SPILLS",
    "  oil spill ",
    "Plastic waste",
    "plastic waste",
    "Waste dumped overboard",
    "Ghost nets",
    "Sewage",
    "Chemical discharge",
    "n/a",
    "-",
    "",
    "No Data",
];

const MATERIALS: &[&str] = &["Crude oil", "Plastic", "Fishing gear", "Sewage", "Chemicals", "Mixed"];
const AWARENESS: &[&str] = &["Yes", "No", "Partly"];

/// SplitMix64: small, deterministic, good enough for demo data.
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

#[derive(Default)]
struct Columns {
    country: Vec<Option<String>>,
    inc_date: Vec<Option<String>>,
    pollution_qty: Vec<Option<String>>,
    lat: Vec<Option<f64>>,
    long: Vec<Option<f64>>,
    pollution_type: Vec<Option<String>>,
    material: Vec<Option<String>>,
    aware_ans: Vec<Option<String>>,
    note: Vec<Option<String>>,
}

fn generate(rng: &mut SampleRng) -> Result<Columns> {
    let first_day = NaiveDate::from_ymd_opt(2018, 1, 1).context("invalid start date")?;
    let mut cols = Columns::default();

    for _ in 0..INCIDENTS {
        let (country, lat, long) = COASTS[rng.below(COASTS.len())];
        let day = first_day + Duration::days(rng.below(6 * 365) as i64);

        cols.country.push(Some(country.to_string()));
        cols.inc_date.push(if rng.chance(0.05) {
            Some("unknown".to_string())
        } else {
            Some(day.format("%Y-%m-%d").to_string())
        });
        cols.pollution_qty.push(if rng.chance(0.1) {
            Some("not measured".to_string())
        } else {
            Some(format!("{:.1}", rng.next_f64() * 500.0))
        });
        // About one incident in twenty lacks a coordinate.
        cols.lat.push((!rng.chance(0.03)).then(|| lat + (rng.next_f64() - 0.5) * 4.0));
        cols.long.push((!rng.chance(0.03)).then(|| long + (rng.next_f64() - 0.5) * 4.0));
        cols.pollution_type.push(Some(rng.pick(POLLUTION_TYPES).to_string()));
        cols.material.push(Some(rng.pick(MATERIALS).to_string()));
        cols.aware_ans.push((!rng.chance(0.2)).then(|| rng.pick(AWARENESS).to_string()));
        cols.note.push(rng.chance(0.1).then(|| "checked by field team".to_string()));
    }
    Ok(cols)
}

const HEADER: [&str; 9] = [
    "Country",
    "inc_date",
    "pollution_qty",
    "LAT_1",
    "LONG",
    "pollution_type",
    "material",
    "aware_ans",
    "Note_1",
];

fn write_csv(cols: &Columns, path: &str) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    wtr.write_record(HEADER)?;
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    let num = |v: &Option<f64>| v.map(|x| format!("{x:.5}")).unwrap_or_default();
    for i in 0..cols.country.len() {
        wtr.write_record([
            text(&cols.country[i]),
            text(&cols.inc_date[i]),
            text(&cols.pollution_qty[i]),
            num(&cols.lat[i]),
            num(&cols.long[i]),
            text(&cols.pollution_type[i]),
            text(&cols.material[i]),
            text(&cols.aware_ans[i]),
            text(&cols.note[i]),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_parquet(cols: &Columns, path: &str) -> Result<()> {
    let strings = |v: &[Option<String>]| -> ArrayRef {
        Arc::new(StringArray::from(
            v.iter().map(|s| s.as_deref()).collect::<Vec<_>>(),
        ))
    };
    let floats = |v: &[Option<f64>]| -> ArrayRef { Arc::new(Float64Array::from(v.to_vec())) };

    let schema = Arc::new(Schema::new(
        HEADER
            .iter()
            .map(|name| {
                let dtype = if *name == "LAT_1" || *name == "LONG" {
                    DataType::Float64
                } else {
                    DataType::Utf8
                };
                Field::new(*name, dtype, true)
            })
            .collect::<Vec<_>>(),
    ));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            strings(&cols.country),
            strings(&cols.inc_date),
            strings(&cols.pollution_qty),
            floats(&cols.lat),
            floats(&cols.long),
            strings(&cols.pollution_type),
            strings(&cols.material),
            strings(&cols.aware_ans),
            strings(&cols.note),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SampleRng(42);
    let cols = generate(&mut rng)?;

    write_csv(&cols, "sample_marine_pollution.csv")?;
    write_parquet(&cols, "sample_marine_pollution.parquet")?;

    println!(
        "Wrote {INCIDENTS} incidents to sample_marine_pollution.csv and sample_marine_pollution.parquet"
    );
    Ok(())
}
