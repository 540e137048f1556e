//! Writers for the active dataset.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use rust_xlsxwriter::{Workbook, XlsxError};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TablewrightError};
use crate::model::{Dataset, Value};

/// Worksheet name of exported workbooks.
const XLSX_SHEET: &str = "Export";

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Tsv,
    Json,
    Xlsx,
}

impl ExportFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = TablewrightError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" | "tab" => Ok(ExportFormat::Tsv),
            "json" => Ok(ExportFormat::Json),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            _ => Err(TablewrightError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Writes datasets as delimited text, JSON or an XLSX workbook.
pub struct Exporter {
    format: ExportFormat,
}

impl Exporter {
    pub fn new(format: ExportFormat) -> Self {
        Self { format }
    }

    /// Write `data` to `path`, creating parent directories as needed.
    ///
    /// Returns the number of rows written.
    pub fn write_file(&self, data: &Dataset, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        if data.is_empty() {
            return Err(TablewrightError::NoData("nothing to export".to_string()));
        }

        let io_err = |source: std::io::Error| TablewrightError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let file = File::create(path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        let rows = self.write(data, &mut writer)?;
        writer.flush().map_err(io_err)?;

        tracing::info!(path = %path.display(), rows, format = %self.format, "exported dataset");
        Ok(rows)
    }

    /// Write `data` to any writer.
    ///
    /// Columns follow the first record; cells a record lacks are written
    /// empty.
    pub fn write<W: Write>(&self, data: &Dataset, writer: W) -> Result<usize> {
        if data.is_empty() {
            return Err(TablewrightError::NoData("nothing to export".to_string()));
        }

        match self.format {
            ExportFormat::Csv => write_delimited(data, writer, b','),
            ExportFormat::Tsv => write_delimited(data, writer, b'\t'),
            ExportFormat::Json => write_json(data, writer),
            ExportFormat::Xlsx => write_xlsx(data, writer),
        }
    }
}

fn write_delimited<W: Write>(data: &Dataset, writer: W, delimiter: u8) -> Result<usize> {
    let headers = data.headers();
    let mut out = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    out.write_record(&headers)?;
    for row in data {
        out.write_record(headers.iter().map(|h| row.text(h)))?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(data.len())
}

fn write_json<W: Write>(data: &Dataset, writer: W) -> Result<usize> {
    let headers = data.headers();
    let mut rows = Vec::with_capacity(data.len());
    for row in data {
        let mut object = serde_json::Map::new();
        for header in &headers {
            object.insert(header.clone(), serde_json::to_value(row.get(header))?);
        }
        rows.push(serde_json::Value::Object(object));
    }

    serde_json::to_writer_pretty(writer, &rows)?;
    Ok(rows.len())
}

/// One worksheet named [`XLSX_SHEET`]: a header row, then one row per
/// record. Finite numbers are numeric cells, other values are strings.
fn write_xlsx<W: Write>(data: &Dataset, mut writer: W) -> Result<usize> {
    let headers = data.headers();
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(XLSX_SHEET)?;

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, header)?;
    }
    for (i, row) in data.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, header) in headers.iter().enumerate() {
            match row.get(header) {
                Value::Empty => {}
                Value::Number(n) if n.is_finite() => {
                    sheet.write_number(r, col as u16, *n)?;
                }
                other => {
                    sheet.write_string(r, col as u16, other.to_text())?;
                }
            }
        }
    }

    let buffer = workbook.save_to_buffer()?;
    writer.write_all(&buffer).map_err(XlsxError::IoError)?;
    Ok(data.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    fn data() -> Dataset {
        vec![
            Record::new().with("name", "Ada").with("score", 9.5).with("note", "a,b"),
            Record::new().with("name", "Bob").with("score", 7.0),
        ]
        .into()
    }

    fn render(format: ExportFormat, data: &Dataset) -> String {
        let mut buf = Vec::new();
        Exporter::new(format).write(data, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_csv_uses_first_record_headers() {
        let out = render(ExportFormat::Csv, &data());
        assert_eq!(out, "name,score,note\nAda,9.5,\"a,b\"\nBob,7,\n");
    }

    #[test]
    fn test_tsv() {
        let out = render(ExportFormat::Tsv, &data());
        assert!(out.starts_with("name\tscore\tnote\n"));
    }

    #[test]
    fn test_json_fills_missing_cells() {
        let out = render(ExportFormat::Json, &data());
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[1]["note"], serde_json::Value::Null);
        assert_eq!(parsed[0]["score"], serde_json::json!(9.5));
    }

    #[test]
    fn test_xlsx_round_trip() {
        use calamine::{Reader, Xlsx};

        let source: Dataset = vec![
            Record::new().with("name", "Ada").with("score", 9.5).with("note", "a,b"),
            Record::new().with("name", "Bob").with("score", f64::INFINITY).with("note", Value::Empty),
        ]
        .into();

        let mut buf = Vec::new();
        let rows = Exporter::new(ExportFormat::Xlsx).write(&source, &mut buf).unwrap();
        assert_eq!(rows, 2);

        let workbook: Xlsx<_> = Xlsx::new(std::io::Cursor::new(buf.as_slice())).unwrap();
        assert_eq!(workbook.sheet_names(), vec![XLSX_SHEET.to_string()]);

        let table = crate::input::Parser::new().parse_xlsx(&buf).unwrap();
        assert_eq!(table.headers(), vec!["name", "score", "note"]);
        assert_eq!(table.get(0), source.get(0));
        assert_eq!(table.get(1).map(|r| r.get("score")), Some(&Value::from("Infinity")));
        assert_eq!(table.get(1).map(|r| r.get("note")), Some(&Value::Empty));
    }

    #[test]
    fn test_empty_dataset_is_no_data() {
        let err = Exporter::new(ExportFormat::Csv)
            .write(&Dataset::new(), Vec::new())
            .unwrap_err();
        assert!(matches!(err, TablewrightError::NoData(_)));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("out.TSV")), Some(ExportFormat::Tsv));
        assert_eq!(ExportFormat::from_path(Path::new("out.xlsx")), Some(ExportFormat::Xlsx));
        assert_eq!(ExportFormat::from_path(Path::new("out.xls")), None);
        assert_eq!(ExportFormat::from_path(Path::new("out")), None);
    }

    #[test]
    fn test_write_file_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let rows = Exporter::new(ExportFormat::Csv).write_file(&data(), &path).unwrap();
        assert_eq!(rows, 2);
        assert!(path.exists());
    }
}
