use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};
use tracing::debug;

use crate::adjustment::tools::error::{Result, ToolError};
use crate::adjustment::tools::model::{CellValue, Sheet, WorkbookData};

/// Reads every sheet of the workbook at `path`, first row as header.
pub fn read_workbook(path: &Path) -> Result<WorkbookData> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|error: calamine::XlsxError| {
        ToolError::Open {
            path: path.to_path_buf(),
            reason: error.to_string(),
        }
    })?;

    let names = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = read_required_sheet(&mut workbook, &name)?;
        let sheet = range_to_sheet(&name, &range);
        debug!(sheet = %name, rows = sheet.rows.len(), columns = sheet.width(), "sheet loaded");
        sheets.push(sheet);
    }

    Ok(WorkbookData { sheets })
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ToolError::MissingSheet(name.to_string()))?;
    let range = range_result.map_err(ToolError::from)?;
    Ok(range)
}

/// Converts a calamine range into a sheet addressed from A1.
///
/// The used range may start below or right of A1; leading rows and columns
/// are padded with empty cells so positions match the worksheet.
fn range_to_sheet(name: &str, range: &Range<DataType>) -> Sheet {
    let (start_row, start_col) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or((0, 0));

    let mut grid: Vec<Vec<CellValue>> = vec![Vec::new(); start_row];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col];
        cells.extend(row.iter().map(cell_value));
        grid.push(cells);
    }

    let mut grid = grid.into_iter();
    let header = grid.next().unwrap_or_default();
    Sheet::new(name, header, grid.collect())
}

fn cell_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::String(value) => CellValue::Text(value.clone()),
        DataType::Float(value) => CellValue::Number(*value),
        DataType::Int(value) => CellValue::Number(*value as f64),
        DataType::Bool(value) => CellValue::Bool(*value),
        DataType::DateTime(value) => CellValue::DateTime(*value),
        DataType::Empty => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}
