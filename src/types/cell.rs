//! Cell-level types for the expense summary engine
//!
//! This module defines the typed cell values read from the input workbook and
//! the owned visual style attached to a cell. Both are carried through the
//! pipeline unchanged so that uncategorized rows can be copied verbatim into
//! the output report.

/// A typed cell value
///
/// Covers the value shapes a transaction export can contain. Formula cells
/// carry their formula text (without a leading `=`); the passthrough block
/// re-emits them as formulas rather than cached results.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Text content
    Text(String),
    /// Numeric content (also used for date/time serial values)
    Number(f64),
    /// Boolean content
    Bool(bool),
    /// Formula source text, without the leading `=`
    Formula(String),
    /// An empty cell
    Blank,
}

impl CellValue {
    /// Returns the text content if this is a `Text` cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true for `Blank` cells
    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Blank)
    }
}

/// Horizontal alignment of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

/// Owned visual formatting for a single cell
///
/// Styles are always copied by value: an output cell never aliases style
/// data owned by the input workbook, so mutating one copy can never affect
/// another. Colors are packed RGB (`0xRRGGBB`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    /// Font size in points, when it differs from the workbook default
    pub font_size: Option<f64>,
    pub font_color: Option<u32>,
    pub background_color: Option<u32>,
    /// Number format code (e.g. `0.00`), custom or resolved from a built-in id
    pub number_format: Option<String>,
    pub align: Option<HorizontalAlign>,
}

impl CellStyle {
    /// Returns true when every attribute is at its default
    ///
    /// Default-styled cells are written without an explicit format so the
    /// output workbook stays small.
    pub fn is_default(&self) -> bool {
        *self == CellStyle::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_text_only_for_text_cells() {
        assert_eq!(CellValue::Text("shop".to_string()).as_text(), Some("shop"));
        assert_eq!(CellValue::Number(1.0).as_text(), None);
        assert_eq!(CellValue::Blank.as_text(), None);
    }

    #[test]
    fn test_default_style_is_default() {
        assert!(CellStyle::default().is_default());

        let bold = CellStyle {
            bold: true,
            ..CellStyle::default()
        };
        assert!(!bold.is_default());
    }

    #[test]
    fn test_cloned_style_is_independent() {
        let source = CellStyle {
            bold: true,
            font_color: Some(0x336699),
            ..CellStyle::default()
        };

        let mut copy = source.clone();
        copy.bold = false;
        copy.font_color = Some(0x000000);

        // The original is untouched by mutations of the copy
        assert!(source.bold);
        assert_eq!(source.font_color, Some(0x336699));
    }
}
