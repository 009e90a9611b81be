//! Report building
//!
//! Renders an aggregation result into the output table structure: a summary
//! block (category, total) and, when any row stayed uncategorized, a
//! passthrough block that copies those rows verbatim — every cell value by
//! type and every cell style as an independently owned copy.
//!
//! Column widths are fitted per block: the summary block is measured over
//! its own content only, the passthrough block over its own content only,
//! and where both blocks share a column index the wider candidate wins.
//! The summary can therefore never be clipped by a narrow passthrough
//! column, while oversized passthrough content still widens the column.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::RoundingStrategy;

use crate::core::aggregator::CategoryTotals;
use crate::types::{CellStyle, CellValue, SourceRow};

/// Header labels of the summary block
pub const CATEGORY_HEADER: &str = "Category";
pub const TOTAL_HEADER: &str = "Total";

/// Section label introducing the passthrough block
pub const UNCATEGORIZED_HEADER: &str = "Uncategorized transactions";

/// Extra character units added to a fitted column width
const WIDTH_PADDING: f64 = 1.0;

/// One output cell: a typed value plus an owned style
#[derive(Debug, Clone, PartialEq)]
pub struct ReportCell {
    pub value: CellValue,
    pub style: Option<CellStyle>,
}

impl ReportCell {
    /// An unstyled text cell
    pub fn text(text: impl Into<String>) -> Self {
        ReportCell {
            value: CellValue::Text(text.into()),
            style: None,
        }
    }

    /// An unstyled number cell
    pub fn number(value: f64) -> Self {
        ReportCell {
            value: CellValue::Number(value),
            style: None,
        }
    }
}

/// One output row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportRow {
    pub cells: Vec<ReportCell>,
    /// Custom row height carried over from a passthrough source row
    pub height: Option<f64>,
}

/// The output report: rows in order plus fitted column widths
///
/// `column_widths` holds one entry per column index; a value of `0.0` means
/// the column had no measurable content and keeps the writer's default
/// width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub rows: Vec<ReportRow>,
    pub column_widths: Vec<f64>,
}

/// Build the output report from an aggregation result
///
/// The summary block always starts at the top: a header row and one row per
/// category in first-seen order, with the total rounded to two digits,
/// half-up. When `uncategorized` is empty the report ends there; otherwise
/// a blank separator row, a section-header row, and the verbatim copies of
/// the uncategorized rows follow.
pub fn build_report(totals: &CategoryTotals, uncategorized: &[SourceRow]) -> Report {
    let mut summary_rows = Vec::with_capacity(totals.len() + 1);
    summary_rows.push(ReportRow {
        cells: vec![
            ReportCell::text(CATEGORY_HEADER),
            ReportCell::text(TOTAL_HEADER),
        ],
        height: None,
    });

    for (category, total) in totals.iter() {
        let rounded = total
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .unwrap_or_default();
        summary_rows.push(ReportRow {
            cells: vec![ReportCell::text(category), ReportCell::number(rounded)],
            height: None,
        });
    }

    let summary_widths = fit_columns(&summary_rows);

    if uncategorized.is_empty() {
        return Report {
            rows: summary_rows,
            column_widths: summary_widths,
        };
    }

    let mut passthrough_rows = Vec::with_capacity(uncategorized.len() + 1);
    passthrough_rows.push(ReportRow {
        cells: vec![ReportCell::text(UNCATEGORIZED_HEADER)],
        height: None,
    });
    for row in uncategorized {
        passthrough_rows.push(copy_row(row));
    }

    let passthrough_widths = fit_columns(&passthrough_rows);
    let column_widths = merge_widths(summary_widths, passthrough_widths);

    let mut rows = summary_rows;
    rows.push(ReportRow::default()); // blank separator
    rows.extend(passthrough_rows);

    Report {
        rows,
        column_widths,
    }
}

/// Copy a source row verbatim into an output row
///
/// Values are copied by type and styles are cloned into fresh, independently
/// owned objects; the output never aliases style data belonging to the
/// input workbook.
fn copy_row(source: &SourceRow) -> ReportRow {
    let cells = source
        .cells
        .iter()
        .map(|cell| ReportCell {
            value: cell.value.clone(),
            style: cell.style.clone(),
        })
        .collect();

    ReportRow {
        cells,
        height: source.height,
    }
}

/// Fit column widths over one block of rows
///
/// Returns one width per column, in approximate Excel character units, or
/// `0.0` for columns with no measurable content in this block.
fn fit_columns(rows: &[ReportRow]) -> Vec<f64> {
    let column_count = rows.iter().map(|row| row.cells.len()).max().unwrap_or(0);
    let mut widths = vec![0.0_f64; column_count];

    for row in rows {
        for (col, cell) in row.cells.iter().enumerate() {
            let chars = display_width(&cell.value);
            if chars > 0 {
                widths[col] = widths[col].max(chars as f64 + WIDTH_PADDING);
            }
        }
    }

    widths
}

/// Merge two blocks' fitted widths: per column index, the wider wins
fn merge_widths(a: Vec<f64>, b: Vec<f64>) -> Vec<f64> {
    (0..a.len().max(b.len()))
        .map(|col| {
            let first = a.get(col).copied().unwrap_or(0.0);
            let second = b.get(col).copied().unwrap_or(0.0);
            first.max(second)
        })
        .collect()
}

/// Approximate display width of a value, in characters
fn display_width(value: &CellValue) -> usize {
    match value {
        CellValue::Text(s) => s.chars().count(),
        CellValue::Number(n) => format!("{}", n).chars().count(),
        CellValue::Bool(b) => {
            if *b {
                4 // TRUE
            } else {
                5 // FALSE
            }
        }
        CellValue::Formula(f) => f.chars().count() + 1,
        CellValue::Blank => 0,
    }
}
