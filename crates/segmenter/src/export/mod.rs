//! Export of segmentation results: the multi-sheet workbook and the
//! summary report.

mod report;
mod sheet;
mod workbook;

pub use report::{Report, SegmentSummary};
pub use sheet::{assign_sheet_names, sanitize_sheet_name, SheetNamePolicy, MAX_SHEET_NAME_LEN};
pub use workbook::{ExportConfig, WorkbookExporter, DEFAULT_ALL_DATA_SHEET};
