use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use csv::ReaderBuilder;

use super::error::LoadError;
use super::model::Table;

/// Cell tokens read as missing values, besides the empty field.
const NA_TOKENS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL", "#N/A"];

const UTF8_BOM: char = '\u{feff}';

// ---------------------------------------------------------------------------
// Encodings
// ---------------------------------------------------------------------------

/// Text encodings the loader knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Strict UTF-8; a leading byte-order mark is dropped.
    Utf8,
    /// Latin-1, also known as ISO-8859-1. Every byte sequence decodes.
    Latin1,
}

impl Encoding {
    pub fn label(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Latin1 => "latin-1",
        }
    }

    /// Decode `bytes`, or explain why they are not valid in this encoding.
    pub fn decode(self, bytes: &[u8]) -> Result<Cow<'_, str>, String> {
        match self {
            Encoding::Utf8 => std::str::from_utf8(bytes)
                .map(|text| Cow::Borrowed(text.strip_prefix(UTF8_BOM).unwrap_or(text)))
                .map_err(|e| format!("invalid byte sequence at offset {}", e.valid_up_to())),
            Encoding::Latin1 => Ok(Cow::Owned(bytes.iter().map(|&b| b as char).collect())),
        }
    }
}

// ---------------------------------------------------------------------------
// Options / report
// ---------------------------------------------------------------------------

/// Loader configuration.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Encodings tried in order until one parses.
    pub encodings: Vec<Encoding>,
    /// Field delimiter byte.
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            encodings: vec![Encoding::Utf8, Encoding::Latin1],
            delimiter: b',',
        }
    }
}

impl LoadOptions {
    /// Sets the candidate encodings.
    pub fn encodings(mut self, encodings: Vec<Encoding>) -> Self {
        self.encodings = encodings;
        self
    }

    /// Sets the field delimiter.
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// A loaded table plus how it was read.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub table: Table,
    /// The encoding that was accepted.
    pub encoding: Encoding,
    /// Records dropped for a wrong field count or a parse failure.
    pub skipped_rows: usize,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load CSV bytes with the default options.
pub fn load(bytes: &[u8]) -> Result<Table, LoadError> {
    load_with_report(bytes, &LoadOptions::default()).map(|report| report.table)
}

/// Read and load a CSV file.
pub fn load_path(path: &Path, options: &LoadOptions) -> Result<LoadReport, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_with_report(&bytes, options)
}

/// Load CSV bytes, trying each candidate encoding in turn.
///
/// Malformed records under the accepted encoding are skipped, not fatal;
/// their number is reported in [`LoadReport::skipped_rows`].
pub fn load_with_report(bytes: &[u8], options: &LoadOptions) -> Result<LoadReport, LoadError> {
    let mut causes = Vec::with_capacity(options.encodings.len());

    for &encoding in &options.encodings {
        let parsed = encoding
            .decode(bytes)
            .and_then(|text| parse_text(&text, options.delimiter));

        match parsed {
            Ok(parsed) => {
                let skipped_rows = parsed.skipped;
                let table = parsed.into_table()?;
                if skipped_rows > 0 {
                    log::warn!("Skipped {skipped_rows} malformed rows");
                }
                log::info!(
                    "Loaded {} rows x {} columns as {}",
                    table.num_rows(),
                    table.num_columns(),
                    encoding.label()
                );
                return Ok(LoadReport {
                    table,
                    encoding,
                    skipped_rows,
                });
            }
            Err(cause) => {
                log::debug!("Encoding {} rejected: {cause}", encoding.label());
                causes.push(format!("{}: {cause}", encoding.label()));
            }
        }
    }

    Err(LoadError::Unparseable {
        causes: causes.join("; "),
    })
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Raw cells of a successfully parsed CSV text, column-major.
struct ParsedCsv {
    headers: Vec<String>,
    columns: Vec<Vec<String>>,
    rows: usize,
    skipped: usize,
}

/// Parse decoded text. Fails only when no header row can be read.
fn parse_text(text: &str, delimiter: u8) -> Result<ParsedCsv, String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let raw_headers = reader
        .headers()
        .map_err(|e| format!("unreadable header row: {e}"))?
        .clone();
    if raw_headers.is_empty() {
        return Err("no columns to parse".to_string());
    }

    let headers = normalize_headers(raw_headers.iter());
    let mut columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    let mut rows = 0;
    let mut skipped = 0;

    for (row_no, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) if record.len() == headers.len() => record,
            Ok(record) => {
                log::debug!(
                    "Row {row_no}: expected {} fields, found {}",
                    headers.len(),
                    record.len()
                );
                skipped += 1;
                continue;
            }
            Err(e) => {
                log::debug!("Row {row_no}: {e}");
                skipped += 1;
                continue;
            }
        };
        for (column, field) in columns.iter_mut().zip(record.iter()) {
            column.push(field.to_string());
        }
        rows += 1;
    }

    Ok(ParsedCsv {
        headers,
        columns,
        rows,
        skipped,
    })
}

impl ParsedCsv {
    fn into_table(self) -> Result<Table, arrow::error::ArrowError> {
        let columns = self
            .headers
            .into_iter()
            .zip(self.columns)
            .map(|(name, cells)| (name, infer_column(cells)))
            .collect();
        Table::from_columns(columns, self.rows)
    }
}

/// Make header names non-empty and unique: `""` becomes `Unnamed: <i>`,
/// repeats of `x` become `x.1`, `x.2`, ...
fn normalize_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for (idx, name) in raw.enumerate() {
        let base = if name.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name.to_string()
        };
        let mut candidate = base.clone();
        let mut suffix = 1;
        while names.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        names.push(candidate);
    }
    names
}

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || NA_TOKENS.contains(&cell)
}

/// Type a column: integer if every present cell is an `i64`, float if every
/// present cell is an `f64`, text otherwise.
fn infer_column(cells: Vec<String>) -> ArrayRef {
    let values: Vec<Option<String>> = cells
        .into_iter()
        .map(|cell| (!is_missing(&cell)).then_some(cell))
        .collect();

    if values.iter().all(Option::is_none) {
        return Arc::new(StringArray::from(values));
    }

    if values.iter().flatten().all(|v| v.parse::<i64>().is_ok()) {
        let ints: Int64Array = values
            .iter()
            .map(|v| v.as_deref().and_then(|s| s.parse::<i64>().ok()))
            .collect();
        return Arc::new(ints);
    }

    if values.iter().flatten().all(|v| v.parse::<f64>().is_ok()) {
        let floats: Float64Array = values
            .iter()
            .map(|v| v.as_deref().and_then(|s| s.parse::<f64>().ok()))
            .collect();
        return Arc::new(floats);
    }

    Arc::new(StringArray::from(values))
}
