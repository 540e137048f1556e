//! Delimited-text, JSON and XLSX loaders with delimiter detection.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, Xlsx};

use super::source::{SourceFormat, SourceMetadata};
use crate::error::{Result, TablewrightError};
use crate::model::{Dataset, Record, Value};

/// Candidate delimiters, in tie-break order.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Lines sampled by [`detect_delimiter`].
const SAMPLE_LINES: usize = 10;

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Fixed delimiter; `None` detects it from the first lines.
    pub delimiter: Option<u8>,
    /// Whether the first line names the columns.
    pub has_header: bool,
    /// Stop after this many data rows.
    pub max_rows: Option<usize>,
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Loads tabular files into datasets.
///
/// Delimited cells are typed with [`Value::infer`]; JSON and XLSX cells keep
/// the type stored in the file.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Read a file. `.json` files are parsed as an array of objects, `.xlsx`
    /// files as a workbook and everything else as delimited text.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| TablewrightError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let (data, format) = match extension.as_deref() {
            Some("json") => (self.parse_json(&bytes)?, SourceFormat::Json),
            Some("xlsx" | "xlsm") => (self.parse_xlsx(&bytes)?, SourceFormat::Xlsx),
            _ => {
                let delimiter = match self.config.delimiter {
                    Some(delimiter) => delimiter,
                    None => detect_delimiter(&bytes)?,
                };
                (
                    self.parse_bytes(&bytes, delimiter)?,
                    SourceFormat::from_delimiter(delimiter),
                )
            }
        };

        let mut source = SourceMetadata::describe(path.to_path_buf(), &bytes, format);
        source.rows = data.len();
        source.columns = data.headers().len();

        tracing::info!(
            file = %source.file,
            format = %source.format,
            rows = source.rows,
            columns = source.columns,
            "loaded dataset"
        );
        Ok((data, source))
    }

    /// Parse delimited text. Short rows are padded with empty cells and
    /// extra cells past the header are dropped.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .quote(self.config.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut rows = reader.records();
        let headers = if self.config.has_header {
            match rows.next() {
                Some(first) => header_names(first?.iter()),
                None => Vec::new(),
            }
        } else {
            Vec::new()
        };

        let limit = self.config.max_rows.unwrap_or(usize::MAX);
        let mut headers = headers;
        let mut data = Dataset::new();
        for row in rows.take(limit) {
            let row = row?;
            if headers.is_empty() {
                headers = (1..=row.len()).map(|i| format!("column_{}", i)).collect();
            }
            let record: Record = headers
                .iter()
                .enumerate()
                .map(|(i, header)| (header.as_str(), Value::infer(row.get(i).unwrap_or(""))))
                .collect();
            data.push(record);
        }

        if headers.is_empty() {
            return Err(TablewrightError::EmptyData("no columns found".to_string()));
        }
        if data.is_empty() {
            return Err(TablewrightError::EmptyData("no data rows found".to_string()));
        }
        Ok(data)
    }

    /// Parse the first worksheet of an XLSX workbook.
    ///
    /// The first used row names the columns. Numeric and date cells become
    /// numbers, everything else is text.
    pub fn parse_xlsx(&self, bytes: &[u8]) -> Result<Dataset> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| TablewrightError::EmptyData("workbook contains no sheets".to_string()))??;

        let mut rows = range.rows();
        let mut headers = if self.config.has_header {
            rows.next()
                .map(|cells| header_names(cells.iter().map(|c| cell_value(c).to_text())))
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        let limit = self.config.max_rows.unwrap_or(usize::MAX);
        let mut data = Dataset::new();
        for cells in rows.take(limit) {
            if headers.is_empty() {
                headers = (1..=cells.len()).map(|i| format!("column_{}", i)).collect();
            }
            let record: Record = headers
                .iter()
                .enumerate()
                .map(|(i, header)| (header.as_str(), cells.get(i).map(cell_value).unwrap_or_default()))
                .collect();
            data.push(record);
        }

        if data.is_empty() {
            return Err(TablewrightError::EmptyData("no data rows found".to_string()));
        }
        Ok(data)
    }

    /// Parse a JSON array of objects. Key order of each object is kept.
    pub fn parse_json(&self, bytes: &[u8]) -> Result<Dataset> {
        let objects: Vec<serde_json::Map<String, serde_json::Value>> =
            serde_json::from_slice(bytes)?;

        let limit = self.config.max_rows.unwrap_or(usize::MAX);
        let data: Dataset = objects
            .into_iter()
            .take(limit)
            .map(|object| object.into_iter().collect::<Record>())
            .collect();

        if data.is_empty() {
            return Err(TablewrightError::EmptyData("no data rows found".to_string()));
        }
        Ok(data)
    }
}

/// Cell of a worksheet as a [`Value`]. Dates keep their serial number.
fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Empty,
        Data::String(s) if s.is_empty() => Value::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Text(s.clone()),
        Data::Float(f) => Value::Number(*f),
        Data::Int(i) => Value::Number(*i as f64),
        Data::Bool(b) => Value::Text(b.to_string()),
        Data::DateTime(dt) => Value::Number(dt.as_f64()),
        Data::Error(e) => Value::Text(e.to_string()),
    }
}

/// Name every header cell: blanks become `column_N`, repeats get `_1`, `_2`...
fn header_names<S: AsRef<str>>(cells: impl IntoIterator<Item = S>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for (i, cell) in cells.into_iter().enumerate() {
        let base = match cell.as_ref().trim() {
            "" => format!("column_{}", i + 1),
            name => name.to_string(),
        };
        let mut name = base.clone();
        let mut n = 0;
        while names.contains(&name) {
            n += 1;
            name = format!("{}_{}", base, n);
        }
        names.push(name);
    }
    names
}

/// Pick the delimiter that splits the sampled lines most evenly.
///
/// A candidate that appears the same number of times on every sampled line
/// wins over one that does not; among equals the higher count wins, and the
/// order of [`DELIMITERS`] breaks remaining ties.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(SAMPLE_LINES)
        .collect();

    if lines.is_empty() {
        return Err(TablewrightError::EmptyData("no lines to analyze".to_string()));
    }

    let best = DELIMITERS
        .iter()
        .filter_map(|&delimiter| {
            let counts: Vec<usize> = lines
                .iter()
                .map(|line| count_unquoted(line, delimiter))
                .collect();
            let header = counts[0];
            if header == 0 {
                return None;
            }
            let steady = counts.iter().all(|&c| c == header);
            Some((steady, header, delimiter))
        })
        // max_by_key keeps the last maximum, so walk candidates in reverse
        .rev()
        .max_by_key(|&(steady, header, _)| (steady, header));

    Ok(best.map_or(b',', |(_, _, delimiter)| delimiter))
}

/// Occurrences of `delimiter` outside double quotes.
fn count_unquoted(line: &str, delimiter: u8) -> usize {
    line.bytes()
        .fold((0, false), |(count, quoted), byte| match byte {
            b'"' => (count, !quoted),
            b if b == delimiter && !quoted => (count + 1, quoted),
            _ => (count, quoted),
        })
        .0
}
