use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::LoadError;

// ---------------------------------------------------------------------------
// DataSource – where the measurement table comes from
// ---------------------------------------------------------------------------

/// A local file or a remote HTTP(S) document.
///
/// Serialised as a plain string; anything starting with `http://` or
/// `https://` is a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// Lower-cased extension of the file name or URL path, if any.
    pub fn extension(&self) -> Option<String> {
        let path = match self {
            DataSource::File(path) => path.as_path(),
            DataSource::Url(url) => {
                let without_query = url.split(['?', '#']).next().unwrap_or(url);
                Path::new(without_query.rsplit('/').next().unwrap_or(without_query))
            }
        };
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, DataSource::Url(_))
    }
}

impl From<String> for DataSource {
    fn from(s: String) -> Self {
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(s)
        } else {
            DataSource::File(PathBuf::from(s))
        }
    }
}

impl From<DataSource> for String {
    fn from(source: DataSource) -> Self {
        source.to_string()
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{url}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Text encoding
// ---------------------------------------------------------------------------

/// Text encoding of CSV/JSON sources.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    /// ISO-8859-1: every byte is the code point of the same value.
    #[default]
    Latin1,
    Utf8,
}

impl TextEncoding {
    /// Decode raw bytes. A leading UTF-8 byte-order mark is dropped.
    pub fn decode(self, bytes: Vec<u8>) -> Result<String, LoadError> {
        match self {
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            TextEncoding::Utf8 => {
                let mut text = String::from_utf8(bytes)?;
                if text.starts_with('\u{feff}') {
                    text.remove(0);
                }
                Ok(text)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Read the raw bytes of a source.
///
/// `insecure_tls` disables certificate verification for HTTPS fetches.
pub fn fetch(source: &DataSource, insecure_tls: bool) -> Result<Vec<u8>, LoadError> {
    match source {
        DataSource::File(path) => std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        }),
        DataSource::Url(url) => fetch_url(url, insecure_tls),
    }
}

fn fetch_url(url: &str, insecure_tls: bool) -> Result<Vec<u8>, LoadError> {
    let http_err = |source| LoadError::Http {
        url: url.to_string(),
        source,
    };

    if insecure_tls {
        log::warn!("TLS certificate verification is disabled for {url}");
    }
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .danger_accept_invalid_certs(insecure_tls)
        .build()
        .map_err(http_err)?;

    log::debug!("GET {url}");
    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(http_err)?;
    let body = response.bytes().map_err(http_err)?;
    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_and_paths_are_told_apart() {
        assert_eq!(
            DataSource::from("https://example.org/data.csv".to_string()),
            DataSource::Url("https://example.org/data.csv".into())
        );
        assert_eq!(
            DataSource::from("HTTP://example.org/x".to_string()),
            DataSource::Url("HTTP://example.org/x".into())
        );
        assert_eq!(
            DataSource::from("data/solar.csv".to_string()),
            DataSource::File(PathBuf::from("data/solar.csv"))
        );
    }

    #[test]
    fn extension_ignores_query_string() {
        let url = DataSource::from("https://host/dir/solar.PARQUET?raw=1".to_string());
        assert_eq!(url.extension().as_deref(), Some("parquet"));
        let bare = DataSource::from("https://host/download".to_string());
        assert_eq!(bare.extension(), None);
        let file = DataSource::from("a/b/solar.Csv".to_string());
        assert_eq!(file.extension().as_deref(), Some("csv"));
    }

    #[test]
    fn latin1_maps_bytes_to_code_points() {
        let text = TextEncoding::Latin1
            .decode(b"Temp \xb0C,Malanville\xe9".to_vec())
            .unwrap();
        assert_eq!(text, "Temp °C,Malanvilleé");
    }

    #[test]
    fn utf8_strips_bom_and_rejects_invalid_bytes() {
        let text = TextEncoding::Utf8
            .decode(b"\xef\xbb\xbfTimestamp,GHI".to_vec())
            .unwrap();
        assert_eq!(text, "Timestamp,GHI");
        assert!(matches!(
            TextEncoding::Utf8.decode(vec![0xff, 0xfe]),
            Err(LoadError::Decode(_))
        ));
    }

    #[test]
    fn absent_file_is_an_io_error() {
        let source = DataSource::File(PathBuf::from("/definitely/not/here.csv"));
        assert!(matches!(fetch(&source, false), Err(LoadError::Io { .. })));
    }
}
