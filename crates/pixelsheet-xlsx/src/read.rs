//! Read an exported workbook back into a cell grid.
//!
//! Only the parts the writer produces are understood: one worksheet whose
//! cells carry solid pattern fills through `cellXfs`. Parsing is by local
//! element name, so namespace prefixes from other writers don't matter.

use std::io::{Cursor, Read, Seek};

use pixelsheet_model::{parse_cell_ref, CellGrid, Rgb};
use roxmltree::{Document, Node};
use thiserror::Error;
use zip::ZipArchive;

#[derive(Debug, Error)]
pub enum XlsxReadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("missing part: {0}")]
    MissingPart(String),
    #[error("xml error in {part}: {source}")]
    Xml {
        part: String,
        source: roxmltree::Error,
    },
    #[error("invalid workbook: {0}")]
    Invalid(String),
}

/// A `<col>` width span from the worksheet, 1-indexed and inclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColSpan {
    pub min: u32,
    pub max: u32,
    pub width: f64,
}

/// The decoded contents of an exported workbook.
#[derive(Debug)]
pub struct SheetGrid {
    pub sheet_name: String,
    pub grid: CellGrid,
    pub col_spans: Vec<ColSpan>,
}

pub fn read_grid(bytes: &[u8]) -> Result<SheetGrid, XlsxReadError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let workbook = read_part(&mut archive, "xl/workbook.xml")?;
    let sheet_name = parse_sheet_name(&workbook)?;

    let styles = read_part(&mut archive, "xl/styles.xml")?;
    let xf_fills = parse_xf_fills(&styles)?;

    let sheet = read_part(&mut archive, "xl/worksheets/sheet1.xml")?;
    let (grid, col_spans) = parse_sheet(&sheet, &xf_fills)?;

    Ok(SheetGrid {
        sheet_name,
        grid,
        col_spans,
    })
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<String, XlsxReadError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(XlsxReadError::MissingPart(name.to_string()))
        }
        Err(err) => return Err(err.into()),
    };
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

fn parse_xml<'a>(part: &str, xml: &'a str) -> Result<Document<'a>, XlsxReadError> {
    Document::parse(xml).map_err(|source| XlsxReadError::Xml {
        part: part.to_string(),
        source,
    })
}

fn elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.descendants()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn parse_sheet_name(workbook: &str) -> Result<String, XlsxReadError> {
    let doc = parse_xml("xl/workbook.xml", workbook)?;
    let sheet = elements(doc.root(), "sheet")
        .next()
        .ok_or_else(|| XlsxReadError::Invalid("workbook has no sheets".to_string()))?;
    sheet
        .attribute("name")
        .map(str::to_string)
        .ok_or_else(|| XlsxReadError::Invalid("sheet is missing its name".to_string()))
}

/// Cell xf index → solid fill color (if that xf carries one).
fn parse_xf_fills(styles: &str) -> Result<Vec<Option<Rgb>>, XlsxReadError> {
    let doc = parse_xml("xl/styles.xml", styles)?;

    let fills_parent = elements(doc.root(), "fills")
        .next()
        .ok_or_else(|| XlsxReadError::Invalid("styles have no fills".to_string()))?;
    let fill_colors: Vec<Option<Rgb>> = fills_parent
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "fill")
        .map(|fill| {
            let pattern = elements(fill, "patternFill").next()?;
            if pattern.attribute("patternType") != Some("solid") {
                return None;
            }
            let fg = elements(pattern, "fgColor").next()?;
            Rgb::from_hex(fg.attribute("rgb")?)
        })
        .collect();

    let cell_xfs = elements(doc.root(), "cellXfs")
        .next()
        .ok_or_else(|| XlsxReadError::Invalid("styles have no cellXfs".to_string()))?;
    cell_xfs
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "xf")
        .map(|xf| {
            let Some(fill_id) = xf.attribute("fillId") else {
                return Ok(None);
            };
            let fill_id: usize = fill_id
                .parse()
                .map_err(|_| XlsxReadError::Invalid(format!("bad fillId '{fill_id}'")))?;
            Ok(fill_colors.get(fill_id).copied().flatten())
        })
        .collect()
}

fn parse_sheet(
    sheet: &str,
    xf_fills: &[Option<Rgb>],
) -> Result<(CellGrid, Vec<ColSpan>), XlsxReadError> {
    let doc = parse_xml("xl/worksheets/sheet1.xml", sheet)?;

    let mut col_spans = Vec::new();
    for col in elements(doc.root(), "col") {
        let parse = |attr: &str| -> Result<u32, XlsxReadError> {
            col.attribute(attr)
                .and_then(|v| v.parse().ok())
                .ok_or_else(|| XlsxReadError::Invalid(format!("col is missing {attr}")))
        };
        let width = col
            .attribute("width")
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| XlsxReadError::Invalid("col is missing width".to_string()))?;
        col_spans.push(ColSpan {
            min: parse("min")?,
            max: parse("max")?,
            width,
        });
    }

    let mut cells: Vec<(u32, u32, Rgb)> = Vec::new();
    let mut max_row = 0u32;
    let mut max_col = 0u32;
    for cell in elements(doc.root(), "c") {
        let a1 = cell
            .attribute("r")
            .ok_or_else(|| XlsxReadError::Invalid("cell is missing its reference".to_string()))?;
        let (row, col) = parse_cell_ref(a1)
            .ok_or_else(|| XlsxReadError::Invalid(format!("bad cell reference '{a1}'")))?;
        max_row = max_row.max(row + 1);
        max_col = max_col.max(col + 1);

        let Some(style) = cell.attribute("s") else {
            continue;
        };
        let xf: usize = style
            .parse()
            .map_err(|_| XlsxReadError::Invalid(format!("bad style index '{style}'")))?;
        if let Some(color) = xf_fills.get(xf).copied().flatten() {
            cells.push((row, col, color));
        }
    }

    // Column spans can extend past the rightmost populated cell.
    for span in &col_spans {
        max_col = max_col.max(span.max);
    }

    let mut grid = CellGrid::new(max_row, max_col);
    for (row, col, color) in cells {
        grid.set(row, col, color);
    }
    Ok((grid, col_spans))
}
