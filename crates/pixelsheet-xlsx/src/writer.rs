use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

use pixelsheet_model::{cell_ref, CellGrid, Rgb, COLUMN_WIDTH, SHEET_NAME};
use thiserror::Error;
use zip::ZipWriter;

/// Excel refuses style sheets with more fills than this.
const MAX_FILLS: usize = 65_430;

#[derive(Debug, Error)]
pub enum XlsxWriteError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("invalid grid: {0}")]
    Invalid(String),
}

pub fn write_grid(grid: &CellGrid, path: impl AsRef<Path>) -> Result<(), XlsxWriteError> {
    let file = File::create(path)?;
    write_grid_to_writer(grid, file)
}

pub fn write_grid_to_vec(grid: &CellGrid) -> Result<Vec<u8>, XlsxWriteError> {
    let mut buffer = Cursor::new(Vec::new());
    write_grid_to_writer(grid, &mut buffer)?;
    Ok(buffer.into_inner())
}

pub fn write_grid_to_writer<W: Write + Seek>(
    grid: &CellGrid,
    writer: W,
) -> Result<(), XlsxWriteError> {
    if grid.rows() == 0 || grid.cols() == 0 {
        return Err(XlsxWriteError::Invalid(format!(
            "grid has no cells ({}x{})",
            grid.rows(),
            grid.cols()
        )));
    }

    let fills = FillTable::build(grid);
    if fills.colors.len() > MAX_FILLS {
        return Err(XlsxWriteError::Invalid(format!(
            "{} distinct fills exceed the sheet limit of {MAX_FILLS}",
            fills.colors.len()
        )));
    }

    let mut zip = ZipWriter::new(writer);
    let options = zip::write::FileOptions::<()>::default()
        .compression_method(zip::CompressionMethod::Deflated);

    // Root relationships
    zip.start_file("_rels/.rels", options)?;
    zip.write_all(root_rels_xml().as_bytes())?;

    // Content types
    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(content_types_xml().as_bytes())?;

    // Workbook
    zip.start_file("xl/workbook.xml", options)?;
    zip.write_all(workbook_xml().as_bytes())?;

    // Workbook relationships
    zip.start_file("xl/_rels/workbook.xml.rels", options)?;
    zip.write_all(workbook_rels_xml().as_bytes())?;

    // Styles
    zip.start_file("xl/styles.xml", options)?;
    zip.write_all(styles_xml(&fills).as_bytes())?;

    // Worksheet
    zip.start_file("xl/worksheets/sheet1.xml", options)?;
    zip.write_all(sheet_xml(grid, &fills).as_bytes())?;

    zip.finish()?;
    Ok(())
}

/// Deduplicated cell fills in first-seen (row-major) order.
///
/// Fill ids 0 and 1 are the mandatory `none`/`gray125` fills, so color `i`
/// becomes fill `i + 2`. Cell xf 0 is the default style, so color `i` is
/// addressed from cells as xf `i + 1`.
struct FillTable {
    colors: Vec<Rgb>,
    index: HashMap<Rgb, usize>,
}

impl FillTable {
    fn build(grid: &CellGrid) -> Self {
        let mut colors: Vec<Rgb> = Vec::new();
        let mut index: HashMap<Rgb, usize> = HashMap::new();
        for (_, _, color) in grid.iter_filled() {
            if !index.contains_key(&color) {
                index.insert(color, colors.len());
                colors.push(color);
            }
        }
        Self { colors, index }
    }

    fn xf_index(&self, color: Rgb) -> Option<usize> {
        self.index.get(&color).map(|i| i + 1)
    }
}

fn root_rels_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#
}

fn content_types_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
  <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
  <Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#
}

fn workbook_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>
    <sheet name="{}" sheetId="1" r:id="rId1"/>
  </sheets>
</workbook>"#,
        escape_xml(SHEET_NAME)
    )
}

fn workbook_rels_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#
}

fn styles_xml(fills: &FillTable) -> String {
    let mut fills_xml = String::new();
    fills_xml.push_str(r#"<fill><patternFill patternType="none"/></fill>"#);
    fills_xml.push_str(r#"<fill><patternFill patternType="gray125"/></fill>"#);
    for color in &fills.colors {
        fills_xml.push_str(&format!(
            r#"<fill><patternFill patternType="solid"><fgColor rgb="{}"/></patternFill></fill>"#,
            color.to_hex()
        ));
    }

    let mut xfs_xml = String::new();
    xfs_xml.push_str(r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>"#);
    for (i, _) in fills.colors.iter().enumerate() {
        xfs_xml.push_str(&format!(
            r#"<xf numFmtId="0" fontId="0" fillId="{}" borderId="0" xfId="0" applyFill="1"/>"#,
            i + 2
        ));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
  <fills count="{}">{}</fills>
  <borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
  <cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
  <cellXfs count="{}">{}</cellXfs>
</styleSheet>"#,
        fills.colors.len() + 2,
        fills_xml,
        fills.colors.len() + 1,
        xfs_xml
    )
}

fn sheet_xml(grid: &CellGrid, fills: &FillTable) -> String {
    let mut sheet_data = String::new();
    for row in 0..grid.rows() {
        let mut row_xml = String::new();
        for col in 0..grid.cols() {
            let Some(color) = grid.fill(row, col) else {
                continue;
            };
            let Some(xf) = fills.xf_index(color) else {
                continue;
            };
            // Style-only cell: the fill is the payload, there is no value.
            row_xml.push_str(&format!(r#"<c r="{}" s="{}"/>"#, cell_ref(row, col), xf));
        }
        if !row_xml.is_empty() {
            sheet_data.push_str(&format!(r#"<row r="{}">{}</row>"#, row + 1, row_xml));
        }
    }

    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#);
    xml.push('\n');
    // One narrow span covering every used column keeps cells pixel-shaped.
    xml.push_str(&format!(
        "  <cols><col min=\"1\" max=\"{}\" width=\"{}\" customWidth=\"1\"/></cols>\n",
        grid.cols(),
        COLUMN_WIDTH
    ));
    xml.push_str("  <sheetData>\n");
    if !sheet_data.is_empty() {
        xml.push_str("    ");
        xml.push_str(&sheet_data);
        xml.push('\n');
    }
    xml.push_str("  </sheetData>\n");
    xml.push_str("</worksheet>");
    xml
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
