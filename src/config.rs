use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::coerce::MissingPolicy;
use crate::data::loader::LoadOptions;
use crate::data::model::{DNI_COLUMN, GHI_COLUMN};
use crate::data::source::{DataSource, TextEncoding};

pub const DEFAULT_SOURCE: &str = "solar_measurements_benin_malanville_qc_year2.csv";
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug, Default)]
#[command(name = "solar-dash")]
#[command(about = "Interactive dashboard for solar irradiance measurements")]
#[command(version)]
pub struct Cli {
    /// CSV, JSON or Parquet file, or an http(s) URL
    pub source: Option<String>,

    /// JSON configuration file; command-line flags take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Text encoding of the source
    #[arg(long, value_enum)]
    pub encoding: Option<TextEncoding>,

    /// Drop or keep rows whose Timestamp or GHI cannot be parsed
    #[arg(long = "missing", value_enum)]
    pub missing_policy: Option<MissingPolicy>,

    /// Skip TLS certificate verification for https sources
    #[arg(long)]
    pub insecure_tls: bool,

    /// Show the Deploy button
    #[arg(long)]
    pub deploy_button: bool,

    /// Start with the time-series plot hidden
    #[arg(long)]
    pub no_time_series: bool,

    /// Rows shown in the data overview
    #[arg(long)]
    pub preview_rows: Option<usize>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Dashboard settings. Every field may be omitted from the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub source: DataSource,
    pub encoding: TextEncoding,
    pub missing_policy: MissingPolicy,
    /// Columns coerced to numbers on load.
    pub numeric_columns: Vec<String>,
    pub insecure_tls: bool,
    pub show_deploy_button: bool,
    /// Initial state of the time-series toggle.
    pub show_time_series: bool,
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: DataSource::File(PathBuf::from(DEFAULT_SOURCE)),
            encoding: TextEncoding::Latin1,
            missing_policy: MissingPolicy::Drop,
            numeric_columns: vec![GHI_COLUMN.to_string(), DNI_COLUMN.to_string()],
            insecure_tls: false,
            show_deploy_button: false,
            show_time_series: true,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults, then the config file (if given), then command-line flags.
    pub fn resolve(cli: Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        Ok(config)
    }

    fn apply_cli(&mut self, cli: Cli) {
        if let Some(source) = cli.source {
            self.source = DataSource::from(source);
        }
        if let Some(encoding) = cli.encoding {
            self.encoding = encoding;
        }
        if let Some(policy) = cli.missing_policy {
            self.missing_policy = policy;
        }
        if let Some(rows) = cli.preview_rows {
            self.preview_rows = rows;
        }
        self.insecure_tls |= cli.insecure_tls;
        self.show_deploy_button |= cli.deploy_button;
        if cli.no_time_series {
            self.show_time_series = false;
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            encoding: self.encoding,
            missing_policy: self.missing_policy,
            numeric_columns: self.numeric_columns.clone(),
            insecure_tls: self.insecure_tls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_local_csv_setup() {
        let config = DashboardConfig::resolve(Cli::default()).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.source, DataSource::File(PathBuf::from(DEFAULT_SOURCE)));
        assert_eq!(config.encoding, TextEncoding::Latin1);
        assert_eq!(config.missing_policy, MissingPolicy::Drop);
        assert!(!config.insecure_tls);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: DashboardConfig = serde_json::from_str(
            r#"{"source": "https://example.org/solar.csv", "missing_policy": "retain", "insecure_tls": true}"#,
        )
        .unwrap();
        assert_eq!(config.source, DataSource::Url("https://example.org/solar.csv".into()));
        assert_eq!(config.missing_policy, MissingPolicy::Retain);
        assert!(config.insecure_tls);
        assert_eq!(config.preview_rows, DEFAULT_PREVIEW_ROWS);
        assert!(config.show_time_series);
    }

    #[test]
    fn cli_overrides_config_file() {
        let path = std::env::temp_dir().join(format!("solar_dash_cfg_{}.json", std::process::id()));
        std::fs::write(&path, r#"{"source": "a.csv", "encoding": "utf8", "preview_rows": 3}"#).unwrap();

        let cli = Cli::parse_from([
            "solar-dash",
            "b.csv",
            "--config",
            path.to_str().unwrap(),
            "--missing",
            "retain",
            "--no-time-series",
            "--deploy-button",
        ]);
        let config = DashboardConfig::resolve(cli).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.source, DataSource::File(PathBuf::from("b.csv")));
        assert_eq!(config.encoding, TextEncoding::Utf8);
        assert_eq!(config.preview_rows, 3);
        assert_eq!(config.missing_policy, MissingPolicy::Retain);
        assert!(!config.show_time_series);
        assert!(config.show_deploy_button);
    }

    #[test]
    fn unreadable_config_file_is_reported() {
        let err = DashboardConfig::from_file(Path::new("/no/such/dash.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn source_round_trips_as_a_plain_string() {
        let config = DashboardConfig::default();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["source"], DEFAULT_SOURCE);
    }
}
