//! Multi-sheet XLSX export of a segmentation run.

use std::fs;
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use tracing::info;

use crate::error::{Result, SegmenterError};
use crate::input::{Dataset, Value};
use crate::segment::SegmentationRun;

use super::sheet::{assign_sheet_names, sanitize_sheet_name, SheetNamePolicy};

/// Name of the first sheet, which holds the full dataset.
pub const DEFAULT_ALL_DATA_SHEET: &str = "All Data";

/// Configuration for the tabular export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Name of the full-dataset sheet.
    pub all_data_sheet: String,
    /// Policy for rules whose sheet names collide.
    pub sheet_name_policy: SheetNamePolicy,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            all_data_sheet: DEFAULT_ALL_DATA_SHEET.to_string(),
            sheet_name_policy: SheetNamePolicy::default(),
        }
    }
}

impl ExportConfig {
    pub fn with_all_data_sheet(mut self, name: impl Into<String>) -> Self {
        self.all_data_sheet = name.into();
        self
    }

    pub fn with_sheet_name_policy(mut self, policy: SheetNamePolicy) -> Self {
        self.sheet_name_policy = policy;
        self
    }
}

/// Writes the full dataset and every segment to one workbook.
///
/// Sheet 1 holds the full dataset; then one sheet per segment, in run order.
/// Every sheet starts with a bold, frozen header row.
pub struct WorkbookExporter {
    config: ExportConfig,
}

impl WorkbookExporter {
    pub fn new() -> Self {
        Self::with_config(ExportConfig::default())
    }

    pub fn with_config(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Worksheet names in write order, the full-data sheet first.
    pub fn sheet_names(&self, run: &SegmentationRun) -> Result<Vec<String>> {
        let all_data = sanitize_sheet_name(&self.config.all_data_sheet);
        let segments = assign_sheet_names(
            run.results.iter().map(|r| r.rule_name.as_str()),
            &all_data,
            self.config.sheet_name_policy,
        )?;

        let mut names = Vec::with_capacity(segments.len() + 1);
        names.push(all_data);
        names.extend(segments);
        Ok(names)
    }

    /// Render the workbook to XLSX bytes.
    pub fn to_bytes(&self, dataset: &Dataset, run: &SegmentationRun) -> Result<Vec<u8>> {
        let names = self.sheet_names(run)?;
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        let sheets = std::iter::once(dataset).chain(run.results.iter().map(|r| &r.subset));
        for (name, data) in names.iter().zip(sheets) {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(name)?;
            write_sheet(worksheet, data, &header)?;
        }

        Ok(workbook.save_to_buffer()?)
    }

    /// Write the workbook to a file.
    pub fn save(
        &self,
        dataset: &Dataset,
        run: &SegmentationRun,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes(dataset, run)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| SegmenterError::io(parent, e))?;
            }
        }
        fs::write(path, &bytes).map_err(|e| SegmenterError::io(path, e))?;

        info!(
            path = %path.display(),
            sheets = run.len() + 1,
            bytes = bytes.len(),
            "exported workbook"
        );
        Ok(())
    }
}

impl Default for WorkbookExporter {
    fn default() -> Self {
        Self::new()
    }
}

fn write_sheet(worksheet: &mut Worksheet, data: &Dataset, header: &Format) -> Result<()> {
    for (col, name) in data.column_names().into_iter().enumerate() {
        worksheet.write_string_with_format(0, column_index(col)?, name, header)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (i, row) in data.rows().iter().enumerate() {
        let row_num = row_index(i + 1)?;
        for (col, value) in row.iter().enumerate() {
            let col_num = column_index(col)?;
            match value {
                Value::Null => {}
                Value::Number(n) => {
                    worksheet.write_number(row_num, col_num, *n)?;
                }
                Value::Text(s) => {
                    worksheet.write_string(row_num, col_num, s)?;
                }
            }
        }
    }

    Ok(())
}

fn row_index(i: usize) -> Result<u32> {
    u32::try_from(i).map_err(|_| XlsxError::RowColumnLimitError.into())
}

fn column_index(i: usize) -> Result<u16> {
    u16::try_from(i).map_err(|_| XlsxError::RowColumnLimitError.into())
}
