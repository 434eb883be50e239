use std::path::Path;

use arrow::array::{Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::coerce::{coerce_cell, ColumnKind, MissingPolicy};
use super::error::LoadError;
use super::model::{
    CellValue, MeasurementTable, DNI_COLUMN, GHI_COLUMN, REQUIRED_COLUMNS, TIMESTAMP_COLUMN,
};
use super::source::{fetch, DataSource, TextEncoding};

// ---------------------------------------------------------------------------
// Load options
// ---------------------------------------------------------------------------

/// Everything the loader needs besides the source itself.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    pub encoding: TextEncoding,
    pub missing_policy: MissingPolicy,
    /// Columns coerced to numbers (GHI is always among them).
    pub numeric_columns: Vec<String>,
    pub insecure_tls: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            encoding: TextEncoding::Latin1,
            missing_policy: MissingPolicy::Drop,
            numeric_columns: vec![GHI_COLUMN.to_string(), DNI_COLUMN.to_string()],
            insecure_tls: false,
        }
    }
}

impl LoadOptions {
    fn column_kind(&self, name: &str) -> ColumnKind {
        if name == TIMESTAMP_COLUMN {
            ColumnKind::Timestamp
        } else if name == GHI_COLUMN || self.numeric_columns.iter().any(|c| c == name) {
            ColumnKind::Numeric
        } else {
            ColumnKind::Inferred
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Source formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
    Parquet,
}

impl SourceFormat {
    /// Unknown or absent extensions are read as CSV.
    pub fn detect(source: &DataSource) -> Self {
        match source.extension().as_deref() {
            Some("json") => SourceFormat::Json,
            Some("parquet") | Some("pq") => SourceFormat::Parquet,
            _ => SourceFormat::Csv,
        }
    }
}

/// Load a measurement table, coerce Timestamp/GHI/DNI and apply the missing policy.
pub fn load_data(source: &DataSource, options: &LoadOptions) -> Result<MeasurementTable, LoadError> {
    let format = SourceFormat::detect(source);
    log::debug!("loading {source} as {format:?}");

    let raw = match (format, source) {
        (SourceFormat::Parquet, DataSource::File(path)) => load_parquet(path, options)?,
        (SourceFormat::Parquet, DataSource::Url(url)) => {
            return Err(LoadError::Unsupported(format!(
                "Parquet is only read from local files, not {url}"
            )))
        }
        (SourceFormat::Json, _) => {
            let text = options.encoding.decode(fetch(source, options.insecure_tls)?)?;
            parse_json(&text, options)?
        }
        (SourceFormat::Csv, _) => {
            let text = options.encoding.decode(fetch(source, options.insecure_tls)?)?;
            parse_csv(&text, options)?
        }
    };

    let (table, dropped) = options.missing_policy.apply(raw);
    if dropped > 0 {
        log::warn!("dropped {dropped} rows with a missing {TIMESTAMP_COLUMN} or {GHI_COLUMN}");
    }
    log::info!(
        "loaded {} rows x {} columns from {source}",
        table.len(),
        table.column_count()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Column layout shared by all formats
// ---------------------------------------------------------------------------

struct Layout {
    names: Vec<String>,
    kinds: Vec<ColumnKind>,
}

impl Layout {
    fn new(names: Vec<String>, options: &LoadOptions) -> Result<Self, LoadError> {
        for required in REQUIRED_COLUMNS {
            if !names.iter().any(|n| n == required) {
                return Err(LoadError::MissingColumn(required.to_string()));
            }
        }
        let kinds = names.iter().map(|n| options.column_kind(n)).collect();
        Ok(Layout { names, kinds })
    }

    fn coerce_row<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> Vec<CellValue> {
        self.kinds
            .iter()
            .zip(fields)
            .map(|(&kind, field)| coerce_cell(kind, field))
            .collect()
    }

    fn into_table(self, rows: Vec<Vec<CellValue>>) -> MeasurementTable {
        MeasurementTable::new(self.names, rows)
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Header row required; every record must have as many fields as the header.
pub fn parse_csv(text: &str, options: &LoadOptions) -> Result<MeasurementTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let layout = Layout::new(headers, options)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(layout.coerce_row(record.iter()));
    }
    Ok(layout.into_table(rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "Timestamp": "2021-08-09 00:01", "GHI": -1.2, "DNI": 0.0, "Comments": null },
///   ...
/// ]
/// ```
///
/// Columns are the union of all record keys, in first-seen order.
pub fn parse_json(text: &str, options: &LoadOptions) -> Result<MeasurementTable, LoadError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let records = root
        .as_array()
        .ok_or_else(|| LoadError::Unsupported("expected a top-level JSON array".into()))?;

    let mut names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::Unsupported(format!("JSON row {i} is not an object")))?;
        for key in obj.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }
    let layout = Layout::new(names, options)?;

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            let texts: Vec<String> = layout
                .names
                .iter()
                .map(|name| json_cell_text(obj.get(name)))
                .collect();
            layout.coerce_row(texts.iter().map(String::as_str))
        })
        .collect();
    Ok(layout.into_table(rows))
}

fn json_cell_text(val: Option<&JsonValue>) -> String {
    match val {
        None | Some(JsonValue::Null) => String::new(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of scalar columns.
///
/// Every column is cast to text and coerced exactly like a CSV field, so a
/// native Arrow timestamp and a string timestamp end up the same.
fn load_parquet(path: &Path, options: &LoadOptions) -> Result<MeasurementTable, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let layout = Layout::new(names, options)?;
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let columns = batch
            .columns()
            .iter()
            .map(|col| cast(col.as_ref(), &DataType::Utf8))
            .collect::<Result<Vec<_>, _>>()?;
        let text_columns = columns
            .iter()
            .map(|col| {
                col.as_any().downcast_ref::<StringArray>().ok_or_else(|| {
                    LoadError::Unsupported(format!(
                        "cannot read {:?} column as text",
                        col.data_type()
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for row in 0..batch.num_rows() {
            let fields = text_columns
                .iter()
                .map(|col| if col.is_null(row) { "" } else { col.value(row) });
            rows.push(layout.coerce_row(fields));
        }
    }
    Ok(layout.into_table(rows))
}
