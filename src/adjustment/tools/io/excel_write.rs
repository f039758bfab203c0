use std::io::Write;
use std::path::Path;

use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::adjustment::tools::error::{Result, ToolError};
use crate::adjustment::tools::model::{CellValue, Sheet, SheetStyle, WorkbookData};

const DATE_FALLBACK_FORMAT: &str = "yyyy-mm-dd";
const DATETIME_FALLBACK_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Writes the workbook to `path`, replacing any existing file.
///
/// The workbook is rendered in memory first, so a sheet that cannot be
/// rendered leaves the previous file intact.
pub fn write_workbook(path: &Path, workbook: &WorkbookData) -> Result<()> {
    let buffer = render_workbook(workbook)?;
    persist_atomically(path, |staging| {
        staging.write_all(&buffer)?;
        Ok(())
    })?;

    debug!(path = %path.display(), bytes = buffer.len(), "workbook saved");
    Ok(())
}

/// Runs `write` against a temporary file in the destination directory and
/// renames it over `path` once it succeeds.
pub(crate) fn persist_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut NamedTempFile) -> Result<()>,
{
    let directory = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut staging = NamedTempFile::new_in(directory)?;
    write(&mut staging)?;
    staging.as_file().sync_all()?;
    staging
        .persist(path)
        .map_err(|error| ToolError::Io(error.error))?;
    Ok(())
}

/// Serialises the workbook to XLSX bytes.
pub fn render_workbook(workbook: &WorkbookData) -> Result<Vec<u8>> {
    let mut workbook_writer = Workbook::new();

    for sheet in &workbook.sheets {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        write_sheet(worksheet, sheet)?;
    }

    Ok(workbook_writer.save_to_buffer()?)
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet) -> Result<()> {
    for (col_idx, header) in sheet.header.iter().enumerate() {
        write_cell(worksheet, 0, col_idx as u16, header, None)?;
    }

    for (row_idx, row) in sheet.rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let format = cell_format(&sheet.style, row_idx, col_idx, cell);
            write_cell(
                worksheet,
                (row_idx + 1) as u32,
                col_idx as u16,
                cell,
                format.as_ref(),
            )?;
        }
    }

    Ok(())
}

/// Number format a data cell is displayed with: the column's format, or a
/// date fallback for date cells in unformatted columns.
pub(crate) fn effective_number_format<'a>(
    style: &'a SheetStyle,
    column: usize,
    cell: &CellValue,
) -> Option<&'a str> {
    match (style.number_format(column), cell) {
        (Some(pattern), _) => Some(pattern),
        (None, CellValue::DateTime(serial)) if serial.fract() == 0.0 => Some(DATE_FALLBACK_FORMAT),
        (None, CellValue::DateTime(_)) => Some(DATETIME_FALLBACK_FORMAT),
        (None, _) => None,
    }
}

/// Combines the cell's number format and fill, if any.
fn cell_format(style: &SheetStyle, row: usize, column: usize, cell: &CellValue) -> Option<Format> {
    let number_format = effective_number_format(style, column, cell);
    let fill = style.fill(row, column);
    if number_format.is_none() && fill.is_none() {
        return None;
    }

    let mut format = Format::new();
    if let Some(pattern) = number_format {
        format = format.set_num_format(pattern);
    }
    if let Some(fill) = fill {
        format = format.set_background_color(Color::RGB(fill.rgb()));
    }
    Some(format)
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    format: Option<&Format>,
) -> Result<()> {
    match (cell, format) {
        (CellValue::Empty, Some(format)) => {
            worksheet.write_blank(row, col, format)?;
        }
        (CellValue::Empty, None) => {}
        (CellValue::Text(value), Some(format)) => {
            worksheet.write_string_with_format(row, col, value, format)?;
        }
        (CellValue::Text(value), None) => {
            worksheet.write_string(row, col, value)?;
        }
        (CellValue::Number(value) | CellValue::DateTime(value), Some(format)) => {
            worksheet.write_number_with_format(row, col, *value, format)?;
        }
        (CellValue::Number(value) | CellValue::DateTime(value), None) => {
            worksheet.write_number(row, col, *value)?;
        }
        (CellValue::Bool(value), Some(format)) => {
            worksheet.write_boolean_with_format(row, col, *value, format)?;
        }
        (CellValue::Bool(value), None) => {
            worksheet.write_boolean(row, col, *value)?;
        }
    }
    Ok(())
}
