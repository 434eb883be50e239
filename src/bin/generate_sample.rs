use std::f64::consts::PI;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::print_batches;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DAYS: i64 = 3;
const MINUTES_PER_DAY: i64 = 24 * 60;
const CSV_PATH: &str = "sample_solar.csv";
const PARQUET_PATH: &str = "sample_solar.parquet";

/// Normal sample by the Box-Muller transform.
fn gauss(rng: &mut impl Rng, mean: f64, std_dev: f64) -> f64 {
    let u1 = rng.random::<f64>().max(1e-15);
    let u2 = rng.random::<f64>();
    mean + std_dev * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// One measurement row. `None` numbers are written as deliberately bad cells.
struct Row {
    timestamp: Option<String>,
    ghi: Option<f64>,
    dni: f64,
    dhi: f64,
    tamb: f64,
    rh: f64,
    ws: f64,
    cleaning: i64,
}

/// Clear-sky-ish diurnal curve: zero at night, peak at solar noon.
fn daylight(hour: f64) -> f64 {
    if (6.0..=18.0).contains(&hour) {
        (PI * (hour - 6.0) / 12.0).sin()
    } else {
        0.0
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn generate_rows(rng: &mut impl Rng) -> Vec<Row> {
    let start = NaiveDate::from_ymd_opt(2021, 8, 9)
        .and_then(|d| d.and_hms_opt(0, 1, 0))
        .expect("valid start date");

    (0..DAYS * MINUTES_PER_DAY)
        .map(|i| {
            let ts = start + Duration::minutes(i);
            let hour = (i % MINUTES_PER_DAY) as f64 / 60.0 + 1.0 / 60.0;
            let sun = daylight(hour);
            let clouds = 0.85 + 0.15 * rng.random::<f64>();

            let ghi = if sun > 0.0 {
                1000.0 * sun * clouds + gauss(rng, 0.0, 8.0)
            } else {
                gauss(rng, -0.8, 0.4)
            };
            let dni = (0.85 * ghi + gauss(rng, 0.0, 15.0)).max(0.0);
            let dhi = (0.2 * ghi + gauss(rng, 0.0, 4.0)).max(0.0);

            Row {
                timestamp: (i % 1499 != 700).then(|| ts.format("%Y-%m-%d %H:%M").to_string()),
                ghi: (i % 997 != 500).then_some(round1(ghi)),
                dni: round1(dni),
                dhi: round1(dhi),
                tamb: round1(24.0 + 8.0 * sun + gauss(rng, 0.0, 0.3)),
                rh: round1((85.0 - 35.0 * sun + gauss(rng, 0.0, 1.5)).clamp(0.0, 100.0)),
                ws: round1(gauss(rng, 2.0, 1.0).max(0.0)),
                cleaning: i64::from(i % MINUTES_PER_DAY == 8 * 60 && i / MINUTES_PER_DAY == 1),
            }
        })
        .collect()
}

fn write_csv(rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(CSV_PATH).context("creating CSV file")?;
    writer.write_record([
        "Timestamp", "GHI", "DNI", "DHI", "Tamb", "RH", "WS", "Cleaning", "Comments",
    ])?;
    for row in rows {
        writer.write_record([
            row.timestamp.clone().unwrap_or_else(|| "bad".to_string()),
            row.ghi.map_or_else(|| "N/A".to_string(), |v| v.to_string()),
            row.dni.to_string(),
            row.dhi.to_string(),
            row.tamb.to_string(),
            row.rh.to_string(),
            row.ws.to_string(),
            row.cleaning.to_string(),
            String::new(),
        ])?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(rows: &[Row]) -> Result<RecordBatch> {
    let floats = |f: fn(&Row) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("Timestamp", DataType::Utf8, true),
        Field::new("GHI", DataType::Float64, true),
        Field::new("DNI", DataType::Float64, false),
        Field::new("DHI", DataType::Float64, false),
        Field::new("Tamb", DataType::Float64, false),
        Field::new("RH", DataType::Float64, false),
        Field::new("WS", DataType::Float64, false),
        Field::new("Cleaning", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.timestamp.clone()).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.ghi).collect::<Vec<_>>())),
            floats(|r| r.dni),
            floats(|r| r.dhi),
            floats(|r| r.tamb),
            floats(|r| r.rh),
            floats(|r| r.ws),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.cleaning).collect::<Vec<_>>())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(PARQUET_PATH).context("creating Parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating Parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing Parquet writer")?;
    Ok(batch)
}

fn main() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    let rows = generate_rows(&mut rng);

    write_csv(&rows)?;
    let batch = write_parquet(&rows)?;
    print_batches(&[batch.slice(0, 5)]).context("printing preview")?;

    let bad = rows
        .iter()
        .filter(|r| r.timestamp.is_none() || r.ghi.is_none())
        .count();
    println!(
        "Wrote {} rows ({bad} with an invalid Timestamp or GHI) to {CSV_PATH} and {PARQUET_PATH}",
        rows.len()
    );
    Ok(())
}
