//! Provenance of a loaded file.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Layout of a loaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    Csv,
    Tsv,
    Semicolon,
    Pipe,
    /// Any other single-byte delimiter.
    Delimited,
    Json,
    /// First worksheet of an Excel workbook.
    Xlsx,
}

impl SourceFormat {
    pub fn from_delimiter(delimiter: u8) -> Self {
        match delimiter {
            b',' => SourceFormat::Csv,
            b'\t' => SourceFormat::Tsv,
            b';' => SourceFormat::Semicolon,
            b'|' => SourceFormat::Pipe,
            _ => SourceFormat::Delimited,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SourceFormat::Csv => "csv",
            SourceFormat::Tsv => "tsv",
            SourceFormat::Semicolon => "csv-semicolon",
            SourceFormat::Pipe => "psv",
            SourceFormat::Delimited => "delimited",
            SourceFormat::Json => "json",
            SourceFormat::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a session's canonical dataset came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without directories.
    pub file: String,
    pub path: PathBuf,
    /// `sha256:<hex>` of the raw bytes.
    pub hash: String,
    pub size_bytes: u64,
    pub format: SourceFormat,
    /// Data rows loaded (after any row limit).
    pub rows: usize,
    /// Columns of the first record.
    pub columns: usize,
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    pub(crate) fn describe(path: PathBuf, bytes: &[u8], format: SourceFormat) -> Self {
        use sha2::{Digest, Sha256};

        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash: format!("sha256:{:x}", Sha256::digest(bytes)),
            size_bytes: bytes.len() as u64,
            format,
            rows: 0,
            columns: 0,
            loaded_at: Utc::now(),
        }
    }
}
