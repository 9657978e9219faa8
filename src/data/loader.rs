use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, open_workbook_auto};
use thiserror::Error;

use super::model::{RawColumn, RawTable, RawValue, float_repr};

/// Cell texts treated as missing data (the pandas default NA set).
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Unsupported file format '{0}'. Only CSV and Excel files are allowed.")]
    UnsupportedFormat(String),

    #[error("Error processing the file: {0:#}")]
    Parse(anyhow::Error),
}

// ---------------------------------------------------------------------------
// Format detection
// ---------------------------------------------------------------------------

/// Source formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `.csv`
    Delimited,
    /// `.xls` / `.xlsx`, first worksheet only.
    Spreadsheet,
}

impl FileFormat {
    /// Pick the format from a file name's extension (case-insensitive).
    pub fn from_file_name(name: &str) -> Result<Self, LoadError> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(FileFormat::Delimited),
            "xls" | "xlsx" => Ok(FileFormat::Spreadsheet),
            _ => Err(LoadError::UnsupportedFormat(name.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
pub fn load_file(path: &Path) -> Result<RawTable, LoadError> {
    let name = path.to_string_lossy();
    let format = FileFormat::from_file_name(&name)?;
    load_with_format(path, format)
}

/// Load a table from `path` using an explicit format.
pub fn load_with_format(path: &Path, format: FileFormat) -> Result<RawTable, LoadError> {
    let loaded = match format {
        FileFormat::Delimited => load_csv(path),
        FileFormat::Spreadsheet => load_spreadsheet(path),
    };
    loaded.map_err(LoadError::Parse)
}

/// Parse delimited text already held in memory.
pub fn parse_csv_bytes(bytes: &[u8]) -> Result<RawTable, LoadError> {
    let reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);
    read_csv(reader).map_err(LoadError::Parse)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then one record per row.
/// Short rows are padded with absent cells; long rows are rejected.
fn load_csv(path: &Path) -> Result<RawTable> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    read_csv(reader)
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<RawTable> {
    let raw_headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    if raw_headers.is_empty() {
        bail!("No columns to parse from file");
    }

    let width = raw_headers.len();
    let mut cells: Vec<Vec<RawValue>> = vec![Vec::new(); width];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {}", row_no + 1))?;
        if record.len() > width {
            bail!(
                "CSV row {}: expected {width} fields, saw {}",
                row_no + 1,
                record.len()
            );
        }
        for (col_idx, column) in cells.iter_mut().enumerate() {
            column.push(record.get(col_idx).map(text_cell).unwrap_or(RawValue::Absent));
        }
    }

    build_table(raw_headers, cells)
}

fn text_cell(s: &str) -> RawValue {
    if NA_TOKENS.contains(&s) {
        RawValue::Absent
    } else {
        RawValue::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

/// Reads the first worksheet; the first row is the header.
fn load_spreadsheet(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;

    let mut rows = range.rows();
    let header_row = rows.next().context("No columns to parse from file")?;
    let headers: Vec<String> = header_row.iter().map(header_text).collect();

    let mut cells: Vec<Vec<RawValue>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (col_idx, column) in cells.iter_mut().enumerate() {
            column.push(row.get(col_idx).map(sheet_cell).unwrap_or(RawValue::Absent));
        }
    }

    build_table(headers, cells)
}

fn header_text(cell: &Data) -> String {
    match sheet_cell(cell) {
        RawValue::Text(s) => s,
        RawValue::Integer(i) => i.to_string(),
        RawValue::Float(f) => float_repr(f),
        RawValue::Bool(b) => b.to_string(),
        RawValue::Absent => String::new(),
    }
}

fn sheet_cell(cell: &Data) -> RawValue {
    match cell {
        Data::Int(i) => RawValue::Integer(*i),
        Data::Float(f) if f.is_nan() => RawValue::Absent,
        Data::Float(f) => RawValue::Float(*f),
        Data::Bool(b) => RawValue::Bool(*b),
        Data::String(s) => text_cell(s),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ts) => RawValue::Text(ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
            None => RawValue::Absent,
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawValue::Text(s.clone()),
        Data::Error(_) | Data::Empty => RawValue::Absent,
    }
}

// ---------------------------------------------------------------------------
// Header handling
// ---------------------------------------------------------------------------

fn build_table(raw_headers: Vec<String>, cells: Vec<Vec<RawValue>>) -> Result<RawTable> {
    let columns = unique_headers(&raw_headers)
        .into_iter()
        .zip(cells)
        .map(|(name, values)| RawColumn { name, values })
        .collect();
    RawTable::new(columns).map_err(anyhow::Error::msg)
}

/// Blank names become `Unnamed: <i>`; repeats get `.1`, `.2`, … suffixes.
pub fn unique_headers(raw: &[String]) -> Vec<String> {
    let mut taken: BTreeSet<String> = BTreeSet::new();
    let mut out = Vec::with_capacity(raw.len());

    for (idx, header) in raw.iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            header.clone()
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while taken.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        taken.insert(name.clone());
        out.push(name);
    }
    out
}
