use std::collections::HashSet;

use tracing::debug;

use crate::adjustment::tools::config::PurgeConfig;
use crate::adjustment::tools::error::{Result, ToolError};
use crate::adjustment::tools::model::Sheet;

/// Outcome of a purge: the filtered sheet and the dropped data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PurgeOutcome {
    pub sheet: Sheet,
    /// Zero-based data-row indices of the source sheet that were dropped,
    /// ascending.
    pub removed_rows: Vec<usize>,
}

impl PurgeOutcome {
    pub fn removed(&self) -> usize {
        self.removed_rows.len()
    }
}

/// Drops every data row whose code cell matches one of the configured codes.
///
/// Matching compares the cell's text form against each code ignoring case,
/// the way an Excel AutoFilter on the column selects rows, so `bsm` also
/// removes `BSM` and `Bsm`. The header and the relative order of the
/// remaining rows are preserved.
pub fn purge_rows(sheet: &Sheet, config: &PurgeConfig) -> Result<PurgeOutcome> {
    let column = config.column.resolve(sheet)?.ok_or_else(|| {
        ToolError::InvalidWorkbook(format!(
            "{} is outside sheet '{}' ({} columns)",
            config.column,
            sheet.name,
            sheet.width()
        ))
    })?;
    let codes: HashSet<String> = config.codes.iter().map(|code| code.to_lowercase()).collect();

    let mut rows = Vec::with_capacity(sheet.rows.len());
    let mut removed_rows = Vec::new();
    for (row_idx, row) in sheet.rows.iter().enumerate() {
        if codes.contains(&row[column].code_text().to_lowercase()) {
            removed_rows.push(row_idx);
        } else {
            rows.push(row.clone());
        }
    }
    debug!(column, removed = removed_rows.len(), kept = rows.len(), "rows purged");

    Ok(PurgeOutcome {
        sheet: Sheet {
            name: sheet.name.clone(),
            header: sheet.header.clone(),
            rows,
            style: sheet.style.clone(),
        },
        removed_rows,
    })
}
