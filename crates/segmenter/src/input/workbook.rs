//! XLSX reader for the first worksheet of a workbook.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use tracing::debug;

use crate::error::{Result, SegmenterError};

use super::dataset::{Dataset, Value};
use super::dataset::is_null_marker;
use super::source::SourceMetadata;

/// Read the first worksheet of an XLSX file.
///
/// The first row is the header; completely empty rows are skipped.
pub fn read_workbook_file(path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
    let path = path.as_ref();
    let contents = std::fs::read(path).map_err(|e| SegmenterError::io(path, e))?;

    let dataset = read_workbook_bytes(&contents)?;
    let metadata = SourceMetadata::describe(path, &contents, "xlsx", &dataset);

    Ok((dataset, metadata))
}

/// Read the first worksheet of an in-memory XLSX document.
pub fn read_workbook_bytes(bytes: &[u8]) -> Result<Dataset> {
    read_first_sheet(Cursor::new(bytes))
}

fn read_first_sheet<RS: Read + Seek>(reader: RS) -> Result<Dataset> {
    let mut workbook: Xlsx<RS> = open_workbook_from_rs(reader)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| SegmenterError::EmptyData("Workbook has no worksheets".to_string()))?;
    debug!(sheet = %sheet_name, "reading worksheet");

    let range = workbook.worksheet_range(&sheet_name)?;
    let mut rows = range.rows();

    let header_row = rows
        .next()
        .ok_or_else(|| SegmenterError::EmptyData(format!("Worksheet '{}' is empty", sheet_name)))?;

    let headers: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = cell.to_string().trim().to_string();
            if name.is_empty() {
                format!("column_{}", i + 1)
            } else {
                name
            }
        })
        .collect();

    let values: Vec<Vec<Value>> = rows
        .map(|row| row.iter().map(cell_value).collect::<Vec<_>>())
        .filter(|row| row.iter().any(Value::is_present))
        .collect();

    Dataset::new(headers, values)
}

/// Convert a worksheet cell. Text cells stay text even when they look numeric.
fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::Int(i) => Value::Number(*i as f64),
        Data::Float(f) if f.is_finite() => Value::Number(*f),
        Data::Float(_) => Value::Null,
        Data::String(s) if is_null_marker(s) => Value::Null,
        Data::String(s) => Value::Text(s.trim().to_string()),
        other => Value::Text(other.to_string()),
    }
}
