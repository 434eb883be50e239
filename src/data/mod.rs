/// Data layer: sources, cell coercion, loading, filtering and statistics.
///
/// Architecture:
/// ```text
///  local .csv / .json / .parquet   or   http(s) URL
///        │
///        ▼
///   ┌──────────┐
///   │  source   │  fetch bytes, decode Latin-1 / UTF-8
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse → coerce Timestamp / GHI / DNI → missing policy
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ MeasurementTable │  column names, rows of CellValue
///   └──────────────────┘
///        │
///        ├──▶ filter   GHI range → filtered table
///        └──▶ stats    Pearson correlation with GHI
/// ```

pub mod coerce;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod source;
pub mod stats;
