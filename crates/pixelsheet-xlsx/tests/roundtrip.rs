use std::io::Read;

use pixelsheet_model::{CellGrid, Rgb, COLUMN_WIDTH, SHEET_NAME};
use pixelsheet_xlsx::{read_grid, write_grid, write_grid_to_vec};
use pretty_assertions::assert_eq;

fn sample_grid() -> CellGrid {
    let mut grid = CellGrid::new(3, 4);
    for row in 0..3 {
        for col in 0..4 {
            // A gradient with a repeated color so dedup is exercised.
            let color = if (row + col) % 2 == 0 {
                Rgb::new(255, 0, 0)
            } else {
                Rgb::new(row as u8 * 10, col as u8 * 10, 200)
            };
            grid.set(row, col, color);
        }
    }
    grid
}

fn part_text(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    let mut part = archive.by_name(name).unwrap();
    let mut text = String::new();
    part.read_to_string(&mut text).unwrap();
    text
}

#[test]
fn written_grid_reads_back_exactly() {
    let grid = sample_grid();
    let bytes = write_grid_to_vec(&grid).unwrap();
    let sheet = read_grid(&bytes).unwrap();

    assert_eq!(sheet.sheet_name, SHEET_NAME);
    assert_eq!(sheet.grid, grid);
}

#[test]
fn serialization_is_byte_identical_across_runs() {
    let grid = sample_grid();
    let first = write_grid_to_vec(&grid).unwrap();
    let second = write_grid_to_vec(&grid).unwrap();
    assert_eq!(first, second);
}

#[test]
fn every_used_column_gets_the_narrow_width() {
    let bytes = write_grid_to_vec(&sample_grid()).unwrap();
    let sheet = read_grid(&bytes).unwrap();

    assert_eq!(sheet.col_spans.len(), 1);
    let span = sheet.col_spans[0];
    assert_eq!((span.min, span.max), (1, 4));
    assert_eq!(span.width, COLUMN_WIDTH);
}

#[test]
fn one_cell_grid_fills_a1_only() {
    let mut grid = CellGrid::new(1, 1);
    grid.set(0, 0, Rgb::new(1, 15, 16));

    let bytes = write_grid_to_vec(&grid).unwrap();
    let sheet = read_grid(&bytes).unwrap();
    assert_eq!(sheet.grid.rows(), 1);
    assert_eq!(sheet.grid.cols(), 1);
    assert_eq!(sheet.grid.fill(0, 0), Some(Rgb::new(1, 15, 16)));

    let worksheet = part_text(&bytes, "xl/worksheets/sheet1.xml");
    assert!(worksheet.contains(r#"<c r="A1" s="1"/>"#), "{worksheet}");
}

#[test]
fn duplicate_colors_share_one_fill() {
    let mut grid = CellGrid::new(2, 2);
    for row in 0..2 {
        for col in 0..2 {
            grid.set(row, col, Rgb::new(255, 0, 0));
        }
    }

    let bytes = write_grid_to_vec(&grid).unwrap();
    let styles = part_text(&bytes, "xl/styles.xml");
    assert_eq!(styles.matches(r#"patternType="solid""#).count(), 1);
    assert_eq!(styles.matches(r#"<fgColor rgb="ff0000"/>"#).count(), 1);
}

#[test]
fn unfilled_cells_stay_unfilled_after_a_round_trip() {
    let mut grid = CellGrid::new(2, 3);
    grid.set(0, 0, Rgb::black());
    grid.set(1, 2, Rgb::white());

    let bytes = write_grid_to_vec(&grid).unwrap();
    let sheet = read_grid(&bytes).unwrap();
    assert_eq!(sheet.grid.fill(0, 1), None);
    assert_eq!(sheet.grid.fill(1, 0), None);
    assert_eq!(sheet.grid.fill(0, 0), Some(Rgb::black()));
    assert_eq!(sheet.grid.fill(1, 2), Some(Rgb::white()));
}

#[test]
fn write_grid_creates_the_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.xlsx");
    write_grid(&sample_grid(), &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes, write_grid_to_vec(&sample_grid()).unwrap());
}
