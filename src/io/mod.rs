//! I/O module
//!
//! Handles workbook reading and writing.
//!
//! # Components
//!
//! - `xlsx_reader` - input workbook reader (values, formulas, style overlay)
//! - `xlsx_styles` - style layer parsing out of the xlsx ZIP
//! - `xlsx_writer` - report rendering into the output workbook

pub mod xlsx_reader;
pub mod xlsx_styles;
pub mod xlsx_writer;

pub use xlsx_reader::{read_table, HeaderMode, HEADER_KEYWORDS};
pub use xlsx_writer::{write_report, write_report_to_buffer, SHEET_NAME};
