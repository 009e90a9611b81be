//! Row-level types for the expense summary engine
//!
//! This module defines the raw input rows read from the workbook, the
//! positional schema used to locate the amount and description cells, and
//! the outcome of classifying a row.

use rust_decimal::Decimal;

use crate::types::cell::{CellStyle, CellValue};

/// One cell of an input row: its typed value plus its visual style
#[derive(Debug, Clone, PartialEq)]
pub struct SourceCell {
    pub value: CellValue,
    /// Style parsed from the workbook, if the cell carries one
    pub style: Option<CellStyle>,
}

impl SourceCell {
    /// A bare cell with no style
    pub fn plain(value: CellValue) -> Self {
        SourceCell { value, style: None }
    }
}

/// One data row of the input table
///
/// Rows are read once and never mutated. A row either contributes its amount
/// to a category total or is carried verbatim (cells, styles, height) into
/// the passthrough block of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    /// 0-based row index in the source sheet, for error messages
    pub index: usize,
    /// All original cells in column order
    pub cells: Vec<SourceCell>,
    /// Custom row height in points, if the source row had one
    pub height: Option<f64>,
}

impl SourceRow {
    /// Cell at the given column index, if present
    pub fn cell(&self, column: usize) -> Option<&SourceCell> {
        self.cells.get(column)
    }
}

/// Positional contract of the input table (0-indexed columns)
///
/// The export format places the transaction amount and the free-text
/// description at fixed column positions. The defaults match the bank
/// export this engine was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    /// Column holding the transaction amount
    pub amount_col: usize,
    /// Column holding the transaction description
    pub desc_col: usize,
}

impl Default for TableSchema {
    fn default() -> Self {
        TableSchema {
            amount_col: 4,
            desc_col: 11,
        }
    }
}

/// Outcome of classifying one row
///
/// A row with a resolvable description yields its category and amount
/// magnitude; the original cells are no longer needed. An unresolved row is
/// handed back whole for the passthrough block.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// The description resolved to a category
    Categorized {
        category: String,
        /// Amount magnitude (always non-negative)
        amount: Decimal,
    },
    /// No category matched; the full row is preserved for passthrough
    Unresolved(SourceRow),
}
