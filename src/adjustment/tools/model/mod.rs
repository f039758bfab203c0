use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Value held by a single worksheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Blank cell.
    Empty,
    /// String content.
    Text(String),
    /// Numeric content. Integers are widened to `f64`.
    Number(f64),
    /// Boolean content.
    Bool(bool),
    /// Excel serial date/time.
    DateTime(f64),
}

impl CellValue {
    /// Returns the numeric value when the cell holds a plain number.
    ///
    /// Dates and booleans are not considered numeric, and neither is NaN.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) if !value.is_nan() => Some(*value),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
            || matches!(self, CellValue::Number(value) if value.is_nan())
    }

    /// Text form used when a cell is compared against a configured code.
    ///
    /// Whole numbers render without a fractional part so that a numeric cell
    /// `5` matches the code `"5"`.
    pub fn code_text(&self) -> String {
        self.to_string()
    }

    /// Total order used by the pipeline sort. Empty cells are not handled
    /// here; callers place them last regardless of direction.
    pub fn sort_cmp(&self, other: &CellValue) -> Ordering {
        match (self.sort_rank(), other.sort_rank()) {
            (lhs, rhs) if lhs != rhs => lhs.cmp(&rhs),
            _ => match (self, other) {
                (CellValue::Text(lhs), CellValue::Text(rhs)) => lhs.cmp(rhs),
                (CellValue::Bool(lhs), CellValue::Bool(rhs)) => lhs.cmp(rhs),
                _ => {
                    let lhs = self.numeric_key().unwrap_or(f64::NAN);
                    let rhs = other.numeric_key().unwrap_or(f64::NAN);
                    lhs.total_cmp(&rhs)
                }
            },
        }
    }

    /// Type group used as the outer sort key: numbers and dates, then text,
    /// then booleans, then empty.
    pub fn sort_rank(&self) -> u8 {
        match self {
            CellValue::Number(_) | CellValue::DateTime(_) => 0,
            CellValue::Text(_) => 1,
            CellValue::Bool(_) => 2,
            CellValue::Empty => 3,
        }
    }

    fn numeric_key(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) | CellValue::DateTime(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(value) => f.write_str(value),
            CellValue::Number(value) | CellValue::DateTime(value) => {
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    write!(f, "{}", *value as i64)
                } else {
                    write!(f, "{value}")
                }
            }
            CellValue::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

/// Solid background fill applied to a highlighted cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fill {
    Green,
    Red,
    Yellow,
}

impl Fill {
    /// RGB value of the fill colour.
    pub fn rgb(self) -> u32 {
        match self {
            Fill::Green => 0x00B050,
            Fill::Red => 0xFF0000,
            Fill::Yellow => 0xFFFF00,
        }
    }
}

/// Display attributes layered on top of a sheet's values.
///
/// Column indices are zero-based; row indices address data rows (the header
/// is row `0` of the worksheet and is never styled).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetStyle {
    /// Column index → Excel number format, applied to every data row.
    pub column_formats: BTreeMap<usize, String>,
    /// (data row, column) → fill.
    pub fills: BTreeMap<(usize, usize), Fill>,
}

impl SheetStyle {
    pub fn number_format(&self, column: usize) -> Option<&str> {
        self.column_formats.get(&column).map(String::as_str)
    }

    pub fn fill(&self, row: usize, column: usize) -> Option<Fill> {
        self.fills.get(&(row, column)).copied()
    }
}

/// A worksheet whose first row is a header.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<CellValue>,
    pub rows: Vec<Vec<CellValue>>,
    pub style: SheetStyle,
}

impl Sheet {
    /// Builds a sheet, padding the header and every row to a common width.
    pub fn new(name: impl Into<String>, header: Vec<CellValue>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0);

        let mut header = header;
        header.resize(width, CellValue::Empty);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();

        Self {
            name: name.into(),
            header,
            rows,
            style: SheetStyle::default(),
        }
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Position of the first header cell whose text equals `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header
            .iter()
            .position(|cell| matches!(cell, CellValue::Text(text) if text == name))
    }
}

/// Every sheet of a workbook, in workbook order.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookData {
    pub sheets: Vec<Sheet>,
}

impl WorkbookData {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    /// Index of the named sheet, or of the first sheet when `name` is `None`.
    pub fn sheet_position(&self, name: Option<&str>) -> Option<usize> {
        match name {
            Some(name) => self.sheets.iter().position(|sheet| sheet.name == name),
            None if self.sheets.is_empty() => None,
            None => Some(0),
        }
    }
}
