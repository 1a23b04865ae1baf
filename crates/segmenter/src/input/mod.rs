//! Dataset ingestion and the in-memory data model.

mod dataset;
mod parser;
mod source;
mod workbook;

use std::path::Path;

pub use dataset::{Dataset, Value};
pub use parser::{Parser, ParserConfig};
pub use source::SourceMetadata;
pub use workbook::{read_workbook_bytes, read_workbook_file};

use crate::error::{Result, SegmenterError};

/// Load a dataset, choosing the reader from the file extension.
///
/// `.xlsx` files are read through the workbook reader; `.csv`, `.tsv` and
/// `.txt` through the delimited parser.
pub fn load_dataset(
    path: impl AsRef<Path>,
    config: &ParserConfig,
) -> Result<(Dataset, SourceMetadata)> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" => read_workbook_file(path),
        "csv" | "tsv" | "txt" => Parser::with_config(config.clone()).parse_file(path),
        _ => Err(SegmenterError::UnsupportedFormat(format!(
            "'{}' (expected .csv, .tsv, .txt or .xlsx)",
            path.display()
        ))),
    }
}
