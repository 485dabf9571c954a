//! Component list input.
//!
//! The list is a spreadsheet whose title row is marked by "Part No" in column A. Columns
//! are located by substring match on their titles; data rows follow the title row to the
//! end of the sheet.

use calamine::{open_workbook_auto, DataType, Reader};
use partfinder_core::{Component, UNKNOWN};
use std::collections::HashMap;
use std::path::Path;

use crate::SheetError;

pub const TITLE_MARKER: &str = "Part No";

const REFERENCE: &str = "Reference";
const PACKAGE: &str = "Package";
const FLASH: &str = "Flash";
const RAM: &str = "RAM";
const COLUMN_KEYS: [&str; 4] = [REFERENCE, PACKAGE, FLASH, RAM];

/// Read components from a workbook (xlsx, xls, ods) or a CSV file
pub fn read_components(path: &Path) -> Result<Vec<Component>, SheetError> {
    if !path.is_file() {
        return Err(SheetError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    let grid = if is_csv {
        read_csv_grid(path)?
    } else {
        read_workbook_grid(path)?
    };

    let components = components_from_grid(&grid)?;
    log::info!(
        "Read {} components from {}",
        components.len(),
        path.display()
    );
    Ok(components)
}

fn read_csv_grid(path: &Path) -> Result<Vec<Vec<String>>, SheetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut grid = Vec::new();
    for record in reader.records() {
        grid.push(record?.iter().map(|c| c.trim().to_string()).collect());
    }
    Ok(grid)
}

fn read_workbook_grid(path: &Path) -> Result<Vec<Vec<String>>, SheetError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| SheetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::EmptyWorkbook)??;

    // Ranges start at the first used cell; pad so column A is always index 0
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut grid = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![String::new(); start_col as usize];
        cells.extend(row.iter().map(cell_text));
        grid.push(cells);
    }
    Ok(grid)
}

fn cell_text(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        DataType::String(s) => s.trim().to_string(),
        DataType::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

/// Build components from a grid of cell texts, column A first
pub fn components_from_grid(grid: &[Vec<String>]) -> Result<Vec<Component>, SheetError> {
    let title_row = grid
        .iter()
        .position(|row| row.first().is_some_and(|a| a.contains(TITLE_MARKER)))
        .ok_or(SheetError::MissingHeader(TITLE_MARKER))?;

    let columns = column_indices(&grid[title_row]);
    let reference_col = *columns
        .get(REFERENCE)
        .ok_or(SheetError::MissingColumn(REFERENCE))?;

    let cell = |row: &[String], key: &str| -> Option<String> {
        let col = *columns.get(key)?;
        row.get(col)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let mut components = Vec::new();
    for (offset, row) in grid[title_row + 1..].iter().enumerate() {
        let reference = row.get(reference_col).map(|v| v.trim()).unwrap_or_default();
        if reference.is_empty() {
            log::debug!("Row {}: no reference, skipped", title_row + offset + 2);
            continue;
        }

        let component = Component::new(reference)
            .with_package(cell(row, PACKAGE).unwrap_or_else(|| UNKNOWN.to_string()))
            .with_sizes(
                cell(row, FLASH).as_deref().and_then(parse_size),
                cell(row, RAM).as_deref().and_then(parse_size),
            );
        components.push(component);
    }

    Ok(components)
}

/// Map each known column key to the index of the last title containing it
fn column_indices(titles: &[String]) -> HashMap<&'static str, usize> {
    let mut columns = HashMap::new();
    for (i, title) in titles.iter().enumerate() {
        for key in COLUMN_KEYS {
            if title.contains(key) {
                columns.insert(key, i);
            }
        }
    }
    columns
}

/// Normalise a "<number> <unit>" memory size to KiB.
///
/// A bare number is taken to be KiB already. Returns `None` for text that does not start
/// with a number or carries an unknown unit.
pub fn parse_size(text: &str) -> Option<u32> {
    let text = text.trim();
    let number_end = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
        .unwrap_or(text.len());
    let (number, unit) = text.split_at(number_end);
    let number: f64 = number.replace(',', ".").parse().ok()?;

    let unit = unit.trim().to_ascii_lowercase();
    let kib = match unit.chars().next() {
        None | Some('k') => number,
        Some('m') => number * 1024.0,
        Some('g') => number * 1024.0 * 1024.0,
        Some('b') => number / 1024.0,
        Some(_) => return None,
    };
    Some(kib.floor() as u32)
}
