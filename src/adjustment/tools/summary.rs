//! Cost summaries of the adjustment data sheet.
//!
//! [`build_summary`] lays out three tables stacked in one grid, each
//! separated by a blank row:
//!
//! 1. sum of cost by sell branch and adjustment type,
//! 2. sum of cost by sell branch and product division,
//! 3. sum and count of cost by sell branch, then by who wrote the adjustment.
//!
//! Row and column items are listed in ascending order with blank items last
//! and labelled `(blank)`. A branch/item pair with no data rows shows
//! [`NULL_DISPLAY`] instead of a number.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::adjustment::tools::config::ToolConfig;
use crate::adjustment::tools::error::{Result, ToolError};
use crate::adjustment::tools::model::{CellValue, Sheet};

pub const BLANK_LABEL: &str = "(blank)";
pub const GRAND_TOTAL: &str = "Grand Total";
pub const NULL_DISPLAY: &str = "$0.00";

/// Cells of the summary sheet, addressed from A1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryGrid {
    pub rows: Vec<Vec<CellValue>>,
    /// Zero-based (row, column) of every cost sum.
    pub currency: BTreeSet<(usize, usize)>,
}

impl SummaryGrid {
    pub fn is_currency(&self, row: usize, column: usize) -> bool {
        self.currency.contains(&(row, column))
    }

    /// Appends a row, marking the numeric cells of `currency_columns`.
    fn push_row(&mut self, cells: Vec<CellValue>, currency_columns: &[usize]) {
        let row_idx = self.rows.len();
        for &column in currency_columns {
            if matches!(cells.get(column), Some(CellValue::Number(_))) {
                self.currency.insert((row_idx, column));
            }
        }
        self.rows.push(cells);
    }
}

#[derive(Debug, Clone, Copy)]
struct SummaryColumns {
    branch: usize,
    adjustment_type: usize,
    division: usize,
    written_by: usize,
    cost: usize,
}

impl SummaryColumns {
    fn resolve(sheet: &Sheet, config: &ToolConfig) -> Result<Self> {
        let lookup = |name: &str| {
            sheet
                .column_index(name)
                .ok_or_else(|| ToolError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            branch: lookup(&config.columns.sell_branch)?,
            adjustment_type: lookup(&config.columns.adjustment_type)?,
            division: lookup(&config.summary.division)?,
            written_by: lookup(&config.summary.written_by)?,
            cost: lookup(&config.summary.cost)?,
        })
    }
}

/// Builds the three summary tables from the data sheet.
pub fn build_summary(sheet: &Sheet, config: &ToolConfig) -> Result<SummaryGrid> {
    let columns = SummaryColumns::resolve(sheet, config)?;
    let mut grid = SummaryGrid::default();

    cross_tab(&mut grid, sheet, columns, columns.adjustment_type, "ADJ Code");
    grid.rows.push(Vec::new());
    cross_tab(&mut grid, sheet, columns, columns.division, "Division");
    grid.rows.push(Vec::new());
    written_by_table(&mut grid, sheet, columns);

    debug!(
        data_rows = sheet.rows.len(),
        summary_rows = grid.rows.len(),
        "summary tables built"
    );
    Ok(grid)
}

/// Sum of cost with branches down the side and `item_column` across.
fn cross_tab(
    grid: &mut SummaryGrid,
    sheet: &Sheet,
    columns: SummaryColumns,
    item_column: usize,
    item_caption: &str,
) {
    let branches = distinct_labels(sheet.rows.iter().map(|row| &row[columns.branch]));
    let items = distinct_labels(sheet.rows.iter().map(|row| &row[item_column]));

    let mut sums: HashMap<(String, String), f64> = HashMap::new();
    for row in &sheet.rows {
        let key = (label_text(&row[columns.branch]), label_text(&row[item_column]));
        *sums.entry(key).or_default() += cost_value(&row[columns.cost]);
    }

    let sum_columns: Vec<usize> = (1..=items.len() + 1).collect();
    grid.push_row(vec!["ADJ$".into(), item_caption.into()], &[]);

    let mut header = vec![CellValue::from("BR#")];
    header.extend(items.iter().map(|item| label_cell(item)));
    header.push(GRAND_TOTAL.into());
    grid.push_row(header, &[]);

    let mut item_totals = vec![0.0; items.len()];
    for branch in &branches {
        let branch_key = label_text(branch);
        let mut cells = vec![label_cell(branch)];
        let mut branch_total = 0.0;
        for (idx, item) in items.iter().enumerate() {
            match sums.get(&(branch_key.clone(), label_text(item))) {
                Some(sum) => {
                    cells.push(CellValue::Number(*sum));
                    branch_total += sum;
                    item_totals[idx] += sum;
                }
                None => cells.push(NULL_DISPLAY.into()),
            }
        }
        cells.push(CellValue::Number(branch_total));
        grid.push_row(cells, &sum_columns);
    }

    let mut totals = vec![CellValue::from(GRAND_TOTAL)];
    totals.extend(item_totals.iter().map(|total| CellValue::Number(*total)));
    totals.push(CellValue::Number(item_totals.iter().sum()));
    grid.push_row(totals, &sum_columns);
}

/// Sum and count of cost per branch, with one nested row per writer.
fn written_by_table(grid: &mut SummaryGrid, sheet: &Sheet, columns: SummaryColumns) {
    grid.push_row(vec![CellValue::Empty, "Values".into()], &[]);
    grid.push_row(vec!["ADJ By".into(), "ADJ $".into(), "# of ADJ".into()], &[]);

    let branches = distinct_labels(sheet.rows.iter().map(|row| &row[columns.branch]));
    for branch in &branches {
        let branch_key = label_text(branch);
        let branch_rows: Vec<&Vec<CellValue>> = sheet
            .rows
            .iter()
            .filter(|row| label_text(&row[columns.branch]) == branch_key)
            .collect();
        grid.push_row(tally_row(label_cell(branch), &branch_rows, columns.cost), &[1]);

        let writers = distinct_labels(branch_rows.iter().map(|row| &row[columns.written_by]));
        for writer in &writers {
            let writer_key = label_text(writer);
            let writer_rows: Vec<&Vec<CellValue>> = branch_rows
                .iter()
                .copied()
                .filter(|row| label_text(&row[columns.written_by]) == writer_key)
                .collect();
            grid.push_row(tally_row(label_cell(writer), &writer_rows, columns.cost), &[1]);
        }
    }

    let all_rows: Vec<&Vec<CellValue>> = sheet.rows.iter().collect();
    grid.push_row(tally_row(GRAND_TOTAL.into(), &all_rows, columns.cost), &[1]);
}

fn tally_row(label: CellValue, rows: &[&Vec<CellValue>], cost: usize) -> Vec<CellValue> {
    let sum: f64 = rows.iter().map(|row| cost_value(&row[cost])).sum();
    let count = rows.iter().filter(|row| !row[cost].is_empty()).count();
    vec![label, CellValue::Number(sum), CellValue::Number(count as f64)]
}

/// Distinct items in ascending order: numbers and dates, text, booleans,
/// then blank.
fn distinct_labels<'a>(cells: impl Iterator<Item = &'a CellValue>) -> Vec<&'a CellValue> {
    let mut labels: Vec<&CellValue> = cells.collect();
    labels.sort_by(|lhs, rhs| lhs.sort_cmp(rhs));
    let mut seen = HashSet::new();
    labels.retain(|label| seen.insert(label_text(label)));
    labels
}

fn label_text(cell: &CellValue) -> String {
    if cell.is_empty() {
        BLANK_LABEL.to_string()
    } else {
        cell.code_text()
    }
}

fn label_cell(cell: &CellValue) -> CellValue {
    if cell.is_empty() {
        CellValue::from(BLANK_LABEL)
    } else {
        cell.clone()
    }
}

fn cost_value(cell: &CellValue) -> f64 {
    cell.as_number().unwrap_or(0.0)
}
