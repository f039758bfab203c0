//! In-place edits of an existing workbook.
//!
//! calamine exposes values only, so commands that save over their input
//! reopen the file with umya-spreadsheet and touch just the cells they
//! change. Formulas, column widths, fonts and every other sheet are carried
//! through the save untouched.

use std::path::Path;

use tracing::debug;
use umya_spreadsheet::{HorizontalAlignmentValues, Spreadsheet, Worksheet, reader, writer};

use crate::adjustment::tools::config::CURRENCY_FORMAT;
use crate::adjustment::tools::error::{Result, ToolError};
use crate::adjustment::tools::io::excel_write::{effective_number_format, persist_atomically};
use crate::adjustment::tools::model::{CellValue, Fill, Sheet};
use crate::adjustment::tools::summary::SummaryGrid;

/// Opens the workbook at `path` for editing.
pub fn open_book(path: &Path) -> Result<Spreadsheet> {
    reader::xlsx::read(path).map_err(|error| ToolError::Open {
        path: path.to_path_buf(),
        reason: error.to_string(),
    })
}

/// Saves `book` over `path` through a temporary file in the same directory.
pub fn save_book(path: &Path, book: &Spreadsheet) -> Result<()> {
    persist_atomically(path, |staging| {
        writer::xlsx::write(book, staging.path())
            .map_err(|error| ToolError::ExcelEdit(error.to_string()))
    })?;
    debug!(path = %path.display(), "workbook saved in place");
    Ok(())
}

pub fn worksheet_mut<'a>(book: &'a mut Spreadsheet, name: &str) -> Result<&'a mut Worksheet> {
    book.get_sheet_by_name_mut(name)
        .ok_or_else(|| ToolError::MissingSheet(name.to_string()))
}

/// Rewrites the data rows of `worksheet` from `sheet` and applies its style.
///
/// Every cell of the first `max(previous_rows, sheet.rows.len())` data rows
/// within the sheet's width is replaced; the header row and everything
/// outside that block keep their content and formatting.
pub fn replace_data_rows(worksheet: &mut Worksheet, sheet: &Sheet, previous_rows: usize) {
    let rows = sheet.rows.len().max(previous_rows);
    for row_idx in 0..rows {
        for col_idx in 0..sheet.width() {
            let coordinate = data_coordinate(row_idx, col_idx);
            worksheet.remove_cell(coordinate);

            let Some(cell) = sheet.rows.get(row_idx).map(|row| &row[col_idx]) else {
                continue;
            };
            write_value(worksheet, coordinate, cell);
            apply_style(
                worksheet,
                coordinate,
                effective_number_format(&sheet.style, col_idx, cell),
                sheet.style.fill(row_idx, col_idx),
            );
        }
    }
    debug!(
        sheet = %sheet.name,
        rows = sheet.rows.len(),
        cleared = rows - sheet.rows.len(),
        "data rows rewritten"
    );
}

/// Deletes the given zero-based data rows, shifting the rows below up.
pub fn remove_data_rows(worksheet: &mut Worksheet, removed_rows: &[usize]) {
    for (first, count) in contiguous_runs(removed_rows).into_iter().rev() {
        worksheet.remove_row(&(first as u32 + 2), &(count as u32));
    }
}

/// Writes `grid` from A1 into the sheet called `name`, creating the sheet
/// when it is missing and clearing its cells when it exists.
pub fn write_grid(book: &mut Spreadsheet, name: &str, grid: &SummaryGrid) -> Result<()> {
    if book.get_sheet_by_name(name).is_none() {
        book.new_sheet(name)
            .map_err(|error| ToolError::ExcelEdit(error.to_string()))?;
        debug!(sheet = name, "sheet created");
    }
    let worksheet = worksheet_mut(book, name)?;
    clear_cells(worksheet);

    for (row_idx, row) in grid.rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let coordinate = (col_idx as u32 + 1, row_idx as u32 + 1);
            write_value(worksheet, coordinate, cell);
            let style = worksheet.get_style_mut(coordinate);
            style
                .get_alignment_mut()
                .set_horizontal(HorizontalAlignmentValues::Left);
            if grid.is_currency(row_idx, col_idx) {
                style.get_number_format_mut().set_format_code(CURRENCY_FORMAT);
            }
        }
    }
    Ok(())
}

fn clear_cells(worksheet: &mut Worksheet) {
    let columns = worksheet.get_highest_column();
    let rows = worksheet.get_highest_row();
    for row in 1..=rows {
        for col in 1..=columns {
            worksheet.remove_cell((col, row));
        }
    }
}

/// 1-based (column, row) of a zero-based data cell; row 1 is the header.
fn data_coordinate(row_idx: usize, col_idx: usize) -> (u32, u32) {
    (col_idx as u32 + 1, row_idx as u32 + 2)
}

fn write_value(worksheet: &mut Worksheet, coordinate: (u32, u32), cell: &CellValue) {
    match cell {
        CellValue::Empty => {}
        CellValue::Text(value) => {
            worksheet.get_cell_mut(coordinate).set_value_string(value.as_str());
        }
        CellValue::Number(value) | CellValue::DateTime(value) => {
            worksheet.get_cell_mut(coordinate).set_value_number(*value);
        }
        CellValue::Bool(value) => {
            worksheet.get_cell_mut(coordinate).set_value_bool(*value);
        }
    }
}

fn apply_style(
    worksheet: &mut Worksheet,
    coordinate: (u32, u32),
    number_format: Option<&str>,
    fill: Option<Fill>,
) {
    if number_format.is_none() && fill.is_none() {
        return;
    }
    let style = worksheet.get_style_mut(coordinate);
    if let Some(pattern) = number_format {
        style.get_number_format_mut().set_format_code(pattern);
    }
    if let Some(fill) = fill {
        style.set_background_color(fill_argb(fill));
    }
}

/// ARGB hex string of the fill colour, as stored in the styles part.
pub fn fill_argb(fill: Fill) -> String {
    format!("FF{:06X}", fill.rgb())
}

/// Groups ascending row indices into `(first, count)` runs.
fn contiguous_runs(rows: &[usize]) -> Vec<(usize, usize)> {
    let mut runs: Vec<(usize, usize)> = Vec::new();
    for &row in rows {
        match runs.last_mut() {
            Some((first, count)) if *first + *count == row => *count += 1,
            _ => runs.push((row, 1)),
        }
    }
    runs
}
