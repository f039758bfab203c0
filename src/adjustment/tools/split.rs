use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::warn;

use crate::adjustment::tools::config::BranchCode;
use crate::adjustment::tools::error::{Result, ToolError};
use crate::adjustment::tools::model::Sheet;

/// Prefix of every workbook produced by a split.
pub const SPLIT_FILE_PREFIX: &str = "SellBranch_";

/// Rows of one branch group, ready to be written as its own workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSheet {
    pub group: String,
    pub sheet: Sheet,
}

impl GroupSheet {
    pub fn file_name(&self) -> String {
        format!("{SPLIT_FILE_PREFIX}{}.xlsx", self.group)
    }
}

/// Partitions `sheet` by the branch codes in `groups`.
///
/// Each group keeps the rows whose branch cell matches one of its codes, in
/// their original order. Groups are returned in configuration order; groups
/// without any matching row are left out.
pub fn split_by_branch(
    sheet: &Sheet,
    branch_column: &str,
    groups: &IndexMap<String, Vec<BranchCode>>,
) -> Result<Vec<GroupSheet>> {
    if groups.is_empty() {
        return Err(ToolError::Config("no branch groups configured".into()));
    }
    for group in groups.keys() {
        validate_group_name(group)?;
    }
    let column = sheet
        .column_index(branch_column)
        .ok_or_else(|| ToolError::MissingColumn(branch_column.to_string()))?;

    let mut output = Vec::new();
    for (group, codes) in groups {
        let codes: HashSet<String> = codes.iter().map(BranchCode::code_text).collect();
        let rows: Vec<_> = sheet
            .rows
            .iter()
            .filter(|row| codes.contains(&row[column].code_text()))
            .cloned()
            .collect();

        if rows.is_empty() {
            warn!(group = %group, "no rows matched branch group; no file written");
            continue;
        }

        output.push(GroupSheet {
            group: group.clone(),
            sheet: Sheet::new(sheet.name.clone(), sheet.header.clone(), rows),
        });
    }
    Ok(output)
}

/// Group names become part of a file name next to the input, so they must
/// not be able to name another directory.
fn validate_group_name(group: &str) -> Result<()> {
    if group.trim().is_empty() {
        return Err(ToolError::Config("branch group name is empty".into()));
    }
    if group.contains(['/', '\\']) || group.contains("..") {
        return Err(ToolError::Config(format!(
            "branch group name '{group}' must not contain path separators or '..'"
        )));
    }
    Ok(())
}
