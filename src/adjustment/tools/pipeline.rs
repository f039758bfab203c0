//! Sort and highlight pipeline for adjustment reports.
//!
//! [`process`] is a pure transformation: it takes a loaded sheet and returns
//! a new one with reordered data rows and a [`SheetStyle`] describing number
//! formats and fills. Nothing touches the file system here, so every schema
//! problem surfaces before the caller writes anything.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::adjustment::tools::config::ToolConfig;
use crate::adjustment::tools::error::{Result, ToolError};
use crate::adjustment::tools::highlight;
use crate::adjustment::tools::model::{CellValue, Fill, Sheet, SheetStyle};

/// Zero-based positions of the columns the pipeline keys on, resolved once
/// against the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub sell_branch: usize,
    pub abs_cost: usize,
    pub adjustment_type: usize,
}

impl ResolvedColumns {
    pub fn resolve(sheet: &Sheet, config: &ToolConfig) -> Result<Self> {
        let lookup = |name: &str| {
            sheet
                .column_index(name)
                .ok_or_else(|| ToolError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            sell_branch: lookup(&config.columns.sell_branch)?,
            abs_cost: lookup(&config.columns.abs_cost)?,
            adjustment_type: lookup(&config.columns.adjustment_type)?,
        })
    }
}

/// Sorts, formats, and highlights `sheet`, returning the transformed copy.
pub fn process(sheet: &Sheet, config: &ToolConfig) -> Result<Sheet> {
    let columns = ResolvedColumns::resolve(sheet, config)?;
    let column_formats = resolve_number_formats(sheet, config)?;
    debug!(?columns, formats = column_formats.len(), "columns resolved");

    let rows = sort_rows(&sheet.rows, &columns);

    let mut fills = BTreeMap::new();
    for (row_idx, row) in rows.iter().enumerate() {
        let fill = highlight::classify(
            &config.highlight,
            &row[columns.adjustment_type],
            &row[columns.abs_cost],
        );
        fills.insert((row_idx, columns.abs_cost), fill);
    }
    log_fill_tally(&fills);

    Ok(Sheet {
        name: sheet.name.clone(),
        header: sheet.header.clone(),
        rows,
        style: SheetStyle {
            column_formats,
            fills,
        },
    })
}

/// Stable sort by sell branch ascending, then cost descending.
///
/// Numbers come before text and text before booleans whichever the direction;
/// empty keys always sort last.
pub fn sort_rows(rows: &[Vec<CellValue>], columns: &ResolvedColumns) -> Vec<Vec<CellValue>> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|lhs, rhs| {
        compare_key(&lhs[columns.sell_branch], &rhs[columns.sell_branch], false).then_with(|| {
            compare_key(&lhs[columns.abs_cost], &rhs[columns.abs_cost], true)
        })
    });
    sorted
}

fn compare_key(lhs: &CellValue, rhs: &CellValue, descending: bool) -> Ordering {
    match (lhs.is_empty(), rhs.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => lhs.sort_rank().cmp(&rhs.sort_rank()).then_with(|| {
            let ordering = lhs.sort_cmp(rhs);
            if descending { ordering.reverse() } else { ordering }
        }),
    }
}

fn resolve_number_formats(sheet: &Sheet, config: &ToolConfig) -> Result<BTreeMap<usize, String>> {
    let mut formats = BTreeMap::new();
    for rule in &config.number_formats {
        match rule.column.resolve(sheet)? {
            Some(column) => {
                formats.insert(column, rule.format.clone());
            }
            None => warn!(
                column = %rule.column,
                width = sheet.width(),
                "number format target is outside the sheet; skipping"
            ),
        }
    }
    Ok(formats)
}

fn log_fill_tally(fills: &BTreeMap<(usize, usize), Fill>) {
    let count = |wanted: Fill| fills.values().filter(|fill| **fill == wanted).count();
    debug!(
        green = count(Fill::Green),
        red = count(Fill::Red),
        yellow = count(Fill::Yellow),
        "highlight fills assigned"
    );
}
