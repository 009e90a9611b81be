//! Output workbook writer
//!
//! Renders a built `Report` into a single-sheet xlsx workbook: every cell
//! written by value type with a per-cell format constructed from its owned
//! style, custom row heights carried over, and the report's fitted column
//! widths applied. Nothing is written on error; the artifact either exists
//! complete or not at all.

use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatUnderline, Workbook, Worksheet};

use crate::core::report::{Report, ReportRow};
use crate::types::{CellStyle, CellValue, HorizontalAlign, SummaryError};

/// Name of the single output sheet
pub const SHEET_NAME: &str = "Summary";

/// Write a report to an xlsx file
///
/// # Errors
///
/// Returns `SummaryError::OutputBuild` when the workbook cannot be rendered
/// or saved.
pub fn write_report(report: &Report, path: &Path) -> Result<(), SummaryError> {
    let mut workbook = render(report)?;
    workbook.save(path)?;
    Ok(())
}

/// Write a report to an in-memory xlsx byte buffer
///
/// This is the shape a wrapping service wants: the artifact bytes, produced
/// completely or not at all.
///
/// # Errors
///
/// Returns `SummaryError::OutputBuild` when the workbook cannot be rendered.
pub fn write_report_to_buffer(report: &Report) -> Result<Vec<u8>, SummaryError> {
    let mut workbook = render(report)?;
    let buffer = workbook.save_to_buffer()?;
    Ok(buffer)
}

/// Render a report into an xlsx workbook
fn render(report: &Report) -> Result<Workbook, SummaryError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (row_index, row) in report.rows.iter().enumerate() {
        write_row(worksheet, row_index as u32, row)?;
    }

    for (col, width) in report.column_widths.iter().enumerate() {
        // 0.0 means "no measurable content": keep the default width
        if *width > 0.0 {
            worksheet.set_column_width(col as u16, *width)?;
        }
    }

    Ok(workbook)
}

/// Write one report row, cell by cell
fn write_row(
    worksheet: &mut Worksheet,
    row_index: u32,
    row: &ReportRow,
) -> Result<(), SummaryError> {
    if let Some(height) = row.height {
        worksheet.set_row_height(row_index, height)?;
    }

    for (col_index, cell) in row.cells.iter().enumerate() {
        let col = col_index as u16;
        let format = cell.style.as_ref().map(build_format);

        match (&cell.value, format) {
            (CellValue::Text(s), Some(format)) => {
                worksheet.write_string_with_format(row_index, col, s, &format)?;
            }
            (CellValue::Text(s), None) => {
                worksheet.write_string(row_index, col, s)?;
            }
            (CellValue::Number(n), Some(format)) => {
                worksheet.write_number_with_format(row_index, col, *n, &format)?;
            }
            (CellValue::Number(n), None) => {
                worksheet.write_number(row_index, col, *n)?;
            }
            (CellValue::Bool(b), Some(format)) => {
                worksheet.write_boolean_with_format(row_index, col, *b, &format)?;
            }
            (CellValue::Bool(b), None) => {
                worksheet.write_boolean(row_index, col, *b)?;
            }
            (CellValue::Formula(f), Some(format)) => {
                worksheet.write_formula_with_format(row_index, col, f.as_str(), &format)?;
            }
            (CellValue::Formula(f), None) => {
                worksheet.write_formula(row_index, col, f.as_str())?;
            }
            (CellValue::Blank, Some(format)) => {
                worksheet.write_blank(row_index, col, &format)?;
            }
            // Unstyled blanks carry nothing worth writing
            (CellValue::Blank, None) => {}
        }
    }

    Ok(())
}

/// Build a writer format from an owned cell style
fn build_format(style: &CellStyle) -> Format {
    let mut format = Format::new();

    if style.bold {
        format = format.set_bold();
    }
    if style.italic {
        format = format.set_italic();
    }
    if style.underline {
        format = format.set_underline(FormatUnderline::Single);
    }
    if let Some(size) = style.font_size {
        format = format.set_font_size(size);
    }
    if let Some(color) = style.font_color {
        format = format.set_font_color(Color::RGB(color));
    }
    if let Some(color) = style.background_color {
        format = format.set_background_color(Color::RGB(color));
    }
    if let Some(ref code) = style.number_format {
        format = format.set_num_format(code);
    }
    format = match style.align {
        Some(HorizontalAlign::Left) => format.set_align(FormatAlign::Left),
        Some(HorizontalAlign::Center) => format.set_align(FormatAlign::Center),
        Some(HorizontalAlign::Right) => format.set_align(FormatAlign::Right),
        None => format,
    };

    format
}
