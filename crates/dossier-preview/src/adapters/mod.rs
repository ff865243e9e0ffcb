//! Inline renderer adapters
//!
//! Each adapter turns raw file bytes into something the console can display
//! without a third-party viewer.

mod spreadsheet;
mod word;

pub use spreadsheet::{spreadsheet_to_grid, CellValue};
pub use word::docx_to_html;
