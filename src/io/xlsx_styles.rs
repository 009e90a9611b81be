//! XLSX style overlay parser
//!
//! The workbook reader gets cell values from calamine, which does not
//! surface visual formatting. This module pulls the missing layer straight
//! out of the xlsx ZIP: `xl/styles.xml` (number formats, fonts, fills,
//! cellXfs) and the worksheet XML (per-cell style ids, custom row heights).
//!
//! Parsing is best-effort: a workbook without a styles part, or with styles
//! we cannot read, yields an empty overlay rather than an error — values
//! still flow, passthrough rows just lose their formatting.

use std::collections::HashMap;
use std::io::{Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::types::{CellStyle, HorizontalAlign};

/// Resolved style table from styles.xml — indexed by cellXfs position
#[derive(Debug, Default)]
pub struct StyleTable {
    styles: Vec<CellStyle>,
}

impl StyleTable {
    pub fn get(&self, id: usize) -> Option<&CellStyle> {
        self.styles.get(id)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// Per-cell style ids and custom row heights for one worksheet
#[derive(Debug, Default)]
pub struct SheetFormatting {
    /// (row, col) → cellXfs index
    pub cell_styles: HashMap<(usize, usize), usize>,
    /// row → height in points, for rows with an explicit custom height
    pub row_heights: HashMap<usize, f64>,
}

/// Load the style overlay for one sheet of an xlsx file
///
/// Returns empty tables when the file is not a readable xlsx ZIP, has no
/// styles part, or the sheet XML cannot be located.
pub fn load_formatting(path: &Path, sheet_name: &str) -> (StyleTable, SheetFormatting) {
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(_) => return (StyleTable::default(), SheetFormatting::default()),
    };
    let mut archive = match ZipArchive::new(file) {
        Ok(archive) => archive,
        Err(_) => return (StyleTable::default(), SheetFormatting::default()),
    };

    let style_table = match read_zip_file(&mut archive, "xl/styles.xml") {
        Ok(xml) => parse_styles_xml(&xml),
        Err(_) => StyleTable::default(),
    };

    let sheet_path = resolve_sheet_path(&mut archive, sheet_name)
        .unwrap_or_else(|| "xl/worksheets/sheet1.xml".to_string());
    let formatting = match read_zip_file(&mut archive, &sheet_path) {
        Ok(xml) => parse_sheet_xml(&xml),
        Err(_) => SheetFormatting::default(),
    };

    (style_table, formatting)
}

// =============================================================================
// styles.xml
// =============================================================================

/// Parsed `<font>` entry
#[derive(Debug, Clone, Default)]
struct ParsedFont {
    bold: bool,
    italic: bool,
    underline: bool,
    size: Option<f64>,
    color: Option<u32>,
}

/// Parse styles.xml into a resolved style table
pub fn parse_styles_xml(xml: &str) -> StyleTable {
    let num_fmts = parse_num_fmts(xml);
    let fonts = parse_fonts(xml);
    let fills = parse_fills(xml);

    StyleTable {
        styles: parse_cell_xfs(xml, &num_fmts, &fonts, &fills),
    }
}

/// Parse `<numFmts>` → format id → format code
fn parse_num_fmts(xml: &str) -> HashMap<u16, String> {
    let mut map = HashMap::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.name().as_ref() == b"numFmt" =>
            {
                let mut id: Option<u16> = None;
                let mut code: Option<String> = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"numFmtId" => {
                            id = std::str::from_utf8(&attr.value)
                                .ok()
                                .and_then(|s| s.parse().ok());
                        }
                        b"formatCode" => {
                            // Format codes can carry escaped quotes, e.g. "$"#,##0
                            let raw = String::from_utf8_lossy(&attr.value).to_string();
                            code = Some(unescape_xml(&raw));
                        }
                        _ => {}
                    }
                }
                if let (Some(id), Some(code)) = (id, code) {
                    map.insert(id, code);
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    map
}

/// Parse `<fonts>` into the font table
fn parse_fonts(xml: &str) -> Vec<ParsedFont> {
    let mut fonts = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut in_fonts = false;
    let mut in_font = false;
    let mut current = ParsedFont::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"fonts" => in_fonts = true,
                b"font" if in_fonts => {
                    in_font = true;
                    current = ParsedFont::default();
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"font" if in_fonts => fonts.push(ParsedFont::default()),
                b"b" if in_font => current.bold = true,
                b"i" if in_font => current.italic = true,
                b"u" if in_font => current.underline = true,
                b"sz" if in_font => {
                    current.size = attr_value(e, b"val").and_then(|s| s.parse().ok());
                }
                b"color" if in_font => {
                    current.color = attr_value(e, b"rgb").and_then(|s| parse_argb_hex(&s));
                }
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"font" if in_font => {
                    fonts.push(current.clone());
                    in_font = false;
                }
                b"fonts" => break,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    fonts
}

/// Parse `<fills>` into per-fill background colors
///
/// Only solid pattern fills carry a usable background; the gray125 filler
/// fill that every workbook declares resolves to `None`.
fn parse_fills(xml: &str) -> Vec<Option<u32>> {
    let mut fills = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut in_fills = false;
    let mut in_fill = false;
    let mut solid = false;
    let mut current: Option<u32> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"fills" => in_fills = true,
                b"fill" if in_fills => {
                    in_fill = true;
                    solid = false;
                    current = None;
                }
                b"patternFill" if in_fill => {
                    solid = attr_value(e, b"patternType").as_deref() == Some("solid");
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"fill" if in_fills => fills.push(None),
                b"patternFill" if in_fill => {
                    solid = attr_value(e, b"patternType").as_deref() == Some("solid");
                }
                b"fgColor" if in_fill && solid => {
                    current = attr_value(e, b"rgb").and_then(|s| parse_argb_hex(&s));
                }
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"fill" if in_fill => {
                    fills.push(current.take());
                    in_fill = false;
                }
                b"fills" => break,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    fills
}

/// Parse `<cellXfs>` and resolve each `<xf>` against the component tables
fn parse_cell_xfs(
    xml: &str,
    num_fmts: &HashMap<u16, String>,
    fonts: &[ParsedFont],
    fills: &[Option<u32>],
) -> Vec<CellStyle> {
    let mut styles = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut in_cell_xfs = false;
    let mut in_xf = false;
    let mut current = XfEntry::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"cellXfs" => in_cell_xfs = true,
                b"xf" if in_cell_xfs => {
                    in_xf = true;
                    current = XfEntry::from_attrs(e);
                }
                b"alignment" if in_xf => current.h_align = attr_value(e, b"horizontal"),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"xf" if in_cell_xfs => {
                    styles.push(resolve_xf(&XfEntry::from_attrs(e), num_fmts, fonts, fills));
                }
                b"alignment" if in_xf => current.h_align = attr_value(e, b"horizontal"),
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"xf" if in_xf => {
                    styles.push(resolve_xf(&current, num_fmts, fonts, fills));
                    in_xf = false;
                }
                b"cellXfs" => break,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    styles
}

#[derive(Debug, Default)]
struct XfEntry {
    num_fmt_id: Option<u16>,
    font_id: Option<usize>,
    fill_id: Option<usize>,
    h_align: Option<String>,
}

impl XfEntry {
    fn from_attrs(e: &quick_xml::events::BytesStart) -> Self {
        let mut entry = XfEntry::default();
        for attr in e.attributes().flatten() {
            let value = std::str::from_utf8(&attr.value).ok();
            match attr.key.as_ref() {
                b"numFmtId" => entry.num_fmt_id = value.and_then(|s| s.parse().ok()),
                b"fontId" => entry.font_id = value.and_then(|s| s.parse().ok()),
                b"fillId" => entry.fill_id = value.and_then(|s| s.parse().ok()),
                _ => {}
            }
        }
        entry
    }
}

/// Resolve one xf entry into an owned `CellStyle`
fn resolve_xf(
    xf: &XfEntry,
    num_fmts: &HashMap<u16, String>,
    fonts: &[ParsedFont],
    fills: &[Option<u32>],
) -> CellStyle {
    let mut style = CellStyle::default();

    if let Some(font) = xf.font_id.and_then(|id| fonts.get(id)) {
        style.bold = font.bold;
        style.italic = font.italic;
        style.underline = font.underline;
        // Excel's default font size is 11pt; only carry deviations
        style.font_size = font.size.filter(|size| *size != 11.0);
        style.font_color = font.color;
    }

    if let Some(fill) = xf.fill_id.and_then(|id| fills.get(id)) {
        style.background_color = *fill;
    }

    if let Some(id) = xf.num_fmt_id {
        style.number_format = num_fmts
            .get(&id)
            .cloned()
            .or_else(|| builtin_format_code(id).map(str::to_string));
    }

    style.align = match xf.h_align.as_deref() {
        Some("left") => Some(HorizontalAlign::Left),
        Some("center") => Some(HorizontalAlign::Center),
        Some("right") => Some(HorizontalAlign::Right),
        _ => None,
    };

    style
}

/// Format codes for the built-in number format ids that matter for money
/// and date columns; `General` (id 0) and unknown ids resolve to `None`
fn builtin_format_code(id: u16) -> Option<&'static str> {
    let code = match id {
        1 => "0",
        2 => "0.00",
        3 => "#,##0",
        4 => "#,##0.00",
        9 => "0%",
        10 => "0.00%",
        11 => "0.00E+00",
        14 => "m/d/yy",
        15 => "d-mmm-yy",
        16 => "d-mmm",
        17 => "mmm-yy",
        18 => "h:mm AM/PM",
        19 => "h:mm:ss AM/PM",
        20 => "h:mm",
        21 => "h:mm:ss",
        22 => "m/d/yy h:mm",
        37 => "#,##0;(#,##0)",
        38 => "#,##0;[Red](#,##0)",
        39 => "#,##0.00;(#,##0.00)",
        40 => "#,##0.00;[Red](#,##0.00)",
        45 => "mm:ss",
        46 => "[h]:mm:ss",
        47 => "mm:ss.0",
        49 => "@",
        _ => return None,
    };
    Some(code)
}

// =============================================================================
// Worksheet XML
// =============================================================================

/// Parse a worksheet XML for per-cell style ids and custom row heights
pub fn parse_sheet_xml(xml: &str) -> SheetFormatting {
    let mut formatting = SheetFormatting::default();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"row" => {
                    let row = attr_value(e, b"r")
                        .and_then(|s| s.parse::<usize>().ok())
                        .map(|r| r.saturating_sub(1));
                    let height = attr_value(e, b"ht").and_then(|s| s.parse::<f64>().ok());
                    let custom = attr_value(e, b"customHeight")
                        .map(|v| v == "1" || v == "true")
                        .unwrap_or(false);

                    if custom {
                        if let (Some(row), Some(height)) = (row, height) {
                            formatting.row_heights.insert(row, height);
                        }
                    }
                }
                b"c" => {
                    let position = attr_value(e, b"r").and_then(|r| parse_cell_ref(&r));
                    let style_id = attr_value(e, b"s").and_then(|s| s.parse::<usize>().ok());

                    if let (Some(position), Some(style_id)) = (position, style_id) {
                        formatting.cell_styles.insert(position, style_id);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    formatting
}

/// Parse a cell reference like `B5` into (row, col) = (4, 1)
pub fn parse_cell_ref(r: &str) -> Option<(usize, usize)> {
    let mut col_part = String::new();
    let mut row_part = String::new();

    for ch in r.chars() {
        if ch.is_ascii_alphabetic() {
            col_part.push(ch);
        } else if ch.is_ascii_digit() {
            row_part.push(ch);
        }
    }

    if col_part.is_empty() || row_part.is_empty() {
        return None;
    }

    let mut col: usize = 0;
    for ch in col_part.chars() {
        col = col * 26 + (ch.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }

    let row: usize = row_part.parse().ok()?;
    Some((row.saturating_sub(1), col.saturating_sub(1)))
}

// =============================================================================
// Helpers
// =============================================================================

/// Read one attribute of an XML element as a string
fn attr_value(e: &quick_xml::events::BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Parse an `AARRGGBB` or `RRGGBB` hex string into packed RGB
fn parse_argb_hex(hex: &str) -> Option<u32> {
    let s = hex.trim_start_matches('#');
    let rgb = match s.len() {
        8 => &s[2..],
        6 => s,
        _ => return None,
    };
    u32::from_str_radix(rgb, 16).ok()
}

/// Unescape the predefined XML entities in attribute text
fn unescape_xml(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Read one file out of the xlsx ZIP
fn read_zip_file<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Result<String, String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| format!("'{}' not found in workbook: {}", path, e))?;
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| format!("failed to read '{}': {}", path, e))?;
    Ok(content)
}

/// Resolve the ZIP path of a worksheet by its name
///
/// Follows workbook.xml (name → relationship id) and the workbook rels
/// (relationship id → target path). Returns `None` when either part is
/// missing or the sheet is not listed.
fn resolve_sheet_path<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    sheet_name: &str,
) -> Option<String> {
    let workbook_xml = read_zip_file(archive, "xl/workbook.xml").ok()?;
    let rels_xml = read_zip_file(archive, "xl/_rels/workbook.xml.rels").ok()?;

    let rid = find_sheet_rid(&workbook_xml, sheet_name)?;
    let target = find_rel_target(&rels_xml, &rid)?;

    if let Some(absolute) = target.strip_prefix('/') {
        Some(absolute.to_string())
    } else {
        Some(format!("xl/{}", target))
    }
}

fn find_sheet_rid(workbook_xml: &str, sheet_name: &str) -> Option<String> {
    let mut reader = Reader::from_str(workbook_xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.name().as_ref() == b"sheet" =>
            {
                if attr_value(e, b"name").as_deref() == Some(sheet_name) {
                    return attr_value(e, b"r:id");
                }
            }
            Ok(Event::Eof) => return None,
            Err(_) => return None,
            _ => {}
        }
        buf.clear();
    }
}

fn find_rel_target(rels_xml: &str, rid: &str) -> Option<String> {
    let mut reader = Reader::from_str(rels_xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                if attr_value(e, b"Id").as_deref() == Some(rid) {
                    return attr_value(e, b"Target");
                }
            }
            Ok(Event::Eof) => return None,
            Err(_) => return None,
            _ => {}
        }
        buf.clear();
    }
}
