//! Input workbook reader
//!
//! Reads the first sheet of an xlsx export into typed rows: cell values via
//! calamine, formulas via the formula range, and visual styles plus row
//! heights via the style overlay parser. Rows keep their absolute sheet
//! indices so error messages point at the real spreadsheet row.
//!
//! The export's leading header row(s) are skipped here: either a fixed
//! offset or keyword-based auto-detection against a single consolidated
//! keyword table.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::io::xlsx_styles;
use crate::types::{CellValue, SourceCell, SourceRow, SummaryError};

/// Column-name keywords that mark a header row, lowercased
///
/// One consolidated table covering the English and Russian column names the
/// known export variants use. A cell counts as a hit only when its whole
/// trimmed text equals a keyword, so merchant names in data rows cannot
/// trigger detection.
pub const HEADER_KEYWORDS: &[&str] = &[
    "name",
    "price",
    "amount",
    "category",
    "description",
    "date",
    "наименование",
    "цена",
    "сумма",
    "категория",
    "описание",
    "дата",
    "операция",
];

/// How many leading rows to scan for a header row in auto mode
const MAX_HEADER_SCAN: usize = 10;

/// Header offset used when auto-detection finds nothing
const DEFAULT_HEADER_OFFSET: usize = 1;

/// Where the data rows start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMode {
    /// Skip exactly this many leading rows
    Offset(usize),
    /// Scan leading rows for a keyword header; data starts after it.
    /// Falls back to skipping one row when no header row is found.
    Auto,
}

impl Default for HeaderMode {
    fn default() -> Self {
        HeaderMode::Auto
    }
}

/// Read the data rows of the first sheet of an xlsx file
///
/// Rows before the header offset are dropped; rows with no content at all
/// (padding between data) are dropped too, since they are not transactions.
/// Each surviving row keeps its absolute sheet index, all original cells in
/// column order, the cell styles the workbook defines, and any custom row
/// height.
///
/// # Errors
///
/// Returns `SummaryError::InputRead` when the file cannot be opened as a
/// workbook or contains no sheets.
pub fn read_table(path: &Path, header: HeaderMode) -> Result<Vec<SourceRow>, SummaryError> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| SummaryError::input_read("workbook contains no sheets"))?;

    let range = workbook.worksheet_range(&sheet_name)?;

    // Absolute grid: the data range may not begin at A1
    let (start_row, start_col) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));
    let (height, _) = range.get_size();

    let mut rows: Vec<SourceRow> = (0..start_row + height)
        .map(|index| SourceRow {
            index,
            cells: Vec::new(),
            height: None,
        })
        .collect();

    for (i, source_cells) in range.rows().enumerate() {
        let row = &mut rows[start_row + i];
        row.cells = vec![SourceCell::plain(CellValue::Blank); start_col];
        for data in source_cells {
            row.cells.push(SourceCell::plain(convert_value(data)));
        }
    }

    // Formula cells: calamine reports cached values above; replace them
    // with the formula source so passthrough re-emits live formulas
    if let Ok(formulas) = workbook.worksheet_formula(&sheet_name) {
        let (f_start_row, f_start_col) = formulas
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        for (i, formula_cells) in formulas.rows().enumerate() {
            for (j, formula) in formula_cells.iter().enumerate() {
                if formula.is_empty() {
                    continue;
                }
                if let Some(row) = rows.get_mut(f_start_row + i) {
                    let col = f_start_col + j;
                    if row.cells.len() <= col {
                        row.cells
                            .resize(col + 1, SourceCell::plain(CellValue::Blank));
                    }
                    row.cells[col].value = CellValue::Formula(formula.clone());
                }
            }
        }
    }

    apply_style_overlay(path, &sheet_name, &mut rows);

    for row in &mut rows {
        trim_trailing_blanks(row);
    }

    let data_start = match header {
        HeaderMode::Offset(offset) => offset,
        HeaderMode::Auto => detect_header_offset(&rows),
    };

    Ok(rows
        .into_iter()
        .skip(data_start)
        .filter(|row| !row.cells.is_empty())
        .collect())
}

/// Map one calamine cell into a typed value
fn convert_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Blank,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        // Serial value; the cell's number format carries the rendering
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
    }
}

/// Attach parsed styles and row heights to the value grid
///
/// Styled cells with no value are materialized as styled blanks so the
/// passthrough block keeps them; styles that resolve to the default are
/// dropped.
fn apply_style_overlay(path: &Path, sheet_name: &str, rows: &mut [SourceRow]) {
    let (style_table, formatting) = xlsx_styles::load_formatting(path, sheet_name);
    if style_table.is_empty() {
        return;
    }

    for (&(r, c), &style_id) in &formatting.cell_styles {
        let Some(style) = style_table.get(style_id) else {
            continue;
        };
        if style.is_default() {
            continue;
        }
        if let Some(row) = rows.get_mut(r) {
            if row.cells.len() <= c {
                row.cells.resize(c + 1, SourceCell::plain(CellValue::Blank));
            }
            row.cells[c].style = Some(style.clone());
        }
    }

    for (&r, &height) in &formatting.row_heights {
        if let Some(row) = rows.get_mut(r) {
            row.height = Some(height);
        }
    }
}

/// Drop unstyled blank cells from the end of a row
fn trim_trailing_blanks(row: &mut SourceRow) {
    while matches!(
        row.cells.last(),
        Some(cell) if cell.value.is_blank() && cell.style.is_none()
    ) {
        row.cells.pop();
    }
}

/// Find the first data row by scanning for a keyword header row
fn detect_header_offset(rows: &[SourceRow]) -> usize {
    for row in rows.iter().take(MAX_HEADER_SCAN) {
        let is_header = row.cells.iter().any(|cell| {
            cell.value
                .as_text()
                .map(|text| HEADER_KEYWORDS.contains(&text.trim().to_lowercase().as_str()))
                .unwrap_or(false)
        });
        if is_header {
            return row.index + 1;
        }
    }
    DEFAULT_HEADER_OFFSET
}
