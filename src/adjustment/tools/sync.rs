use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::adjustment::tools::config::{PurgeConfig, ToolConfig};
use crate::adjustment::tools::error::{Result, ToolError};
use crate::adjustment::tools::io::excel_edit;
use crate::adjustment::tools::io::excel_read;
use crate::adjustment::tools::io::excel_write;
use crate::adjustment::tools::io::locate::{self, SourceLocator};
use crate::adjustment::tools::model::WorkbookData;
use crate::adjustment::tools::pipeline;
use crate::adjustment::tools::purge;
use crate::adjustment::tools::split;
use crate::adjustment::tools::summary;

/// Sorts and highlights the adjustment sheet of the located workbook, saving
/// it in place. `sheet` selects a sheet by name; the first sheet is used
/// otherwise. Only that sheet's data rows are rewritten.
pub fn format_adjustments(
    locator: &dyn SourceLocator,
    sheet: Option<&str>,
    config: &ToolConfig,
) -> Result<PathBuf> {
    let path = locator.locate()?;
    format_workbook(&path, sheet, config)?;
    Ok(path)
}

#[instrument(level = "info", skip_all, fields(input = %path.display(), ?sheet))]
pub fn format_workbook(path: &Path, sheet: Option<&str>, config: &ToolConfig) -> Result<()> {
    locate::validate_in_place(path)?;
    let workbook = excel_read::read_workbook(path)?;
    let position = sheet_position(&workbook, sheet)?;
    let source = &workbook.sheets[position];

    let processed = pipeline::process(source, config)?;
    info!(
        sheet = %processed.name,
        rows = processed.rows.len(),
        "adjustment rows sorted and highlighted"
    );

    let mut book = excel_edit::open_book(path)?;
    let worksheet = excel_edit::worksheet_mut(&mut book, &processed.name)?;
    excel_edit::replace_data_rows(worksheet, &processed, source.rows.len());
    excel_edit::save_book(path, &book)
}

/// Deletes rows matching the configured codes from the located workbook and
/// saves it in place. Returns the path and the number of rows removed.
pub fn purge_codes(locator: &dyn SourceLocator, config: &PurgeConfig) -> Result<(PathBuf, usize)> {
    let path = locator.locate()?;
    let removed = purge_workbook(&path, config)?;
    Ok((path, removed))
}

#[instrument(level = "info", skip_all, fields(input = %path.display(), sheet = %config.sheet))]
pub fn purge_workbook(path: &Path, config: &PurgeConfig) -> Result<usize> {
    locate::validate_in_place(path)?;
    let workbook = excel_read::read_workbook(path)?;
    let position = sheet_position(&workbook, Some(&config.sheet))?;

    let outcome = purge::purge_rows(&workbook.sheets[position], config)?;
    info!(
        removed = outcome.removed(),
        remaining = outcome.sheet.rows.len(),
        "rows deleted"
    );
    if outcome.removed_rows.is_empty() {
        return Ok(0);
    }

    let mut book = excel_edit::open_book(path)?;
    let worksheet = excel_edit::worksheet_mut(&mut book, &config.sheet)?;
    excel_edit::remove_data_rows(worksheet, &outcome.removed_rows);
    excel_edit::save_book(path, &book)?;
    Ok(outcome.removed())
}

/// Rebuilds the summary sheet of the located workbook from its data sheet
/// and saves it in place.
pub fn summarize(locator: &dyn SourceLocator, config: &ToolConfig) -> Result<PathBuf> {
    let path = locator.locate()?;
    summarize_workbook(&path, config)?;
    Ok(path)
}

#[instrument(
    level = "info",
    skip_all,
    fields(
        input = %path.display(),
        data = %config.summary.data_sheet,
        sheet = %config.summary.sheet
    )
)]
pub fn summarize_workbook(path: &Path, config: &ToolConfig) -> Result<()> {
    if config.summary.sheet == config.summary.data_sheet {
        return Err(ToolError::Config(format!(
            "summary sheet '{}' would overwrite the data sheet",
            config.summary.sheet
        )));
    }
    locate::validate_in_place(path)?;
    let workbook = excel_read::read_workbook(path)?;
    let data = workbook
        .sheet(&config.summary.data_sheet)
        .ok_or_else(|| ToolError::MissingSheet(config.summary.data_sheet.clone()))?;

    let grid = summary::build_summary(data, config)?;
    info!(rows = grid.rows.len(), "summary tables built");

    let mut book = excel_edit::open_book(path)?;
    excel_edit::write_grid(&mut book, &config.summary.sheet, &grid)?;
    excel_edit::save_book(path, &book)
}

/// Writes one `SellBranch_<group>.xlsx` per non-empty branch group next to
/// the located workbook. The source file is left untouched.
pub fn split_branches(locator: &dyn SourceLocator, config: &ToolConfig) -> Result<Vec<PathBuf>> {
    let path = locator.locate()?;
    split_workbook(&path, config)
}

#[instrument(level = "info", skip_all, fields(input = %path.display()))]
pub fn split_workbook(path: &Path, config: &ToolConfig) -> Result<Vec<PathBuf>> {
    locate::validate_source(path)?;
    let workbook = excel_read::read_workbook(path)?;
    let position = sheet_position(&workbook, None)?;

    let groups = split::split_by_branch(
        &workbook.sheets[position],
        &config.columns.sell_branch,
        &config.split.groups,
    )?;

    let directory = path.parent().unwrap_or_else(|| Path::new(""));
    let mut written = Vec::with_capacity(groups.len());
    for group in groups {
        let output = directory.join(group.file_name());
        info!(
            group = %group.group,
            rows = group.sheet.rows.len(),
            output = %output.display(),
            "writing branch group"
        );
        excel_write::write_workbook(
            &output,
            &WorkbookData {
                sheets: vec![group.sheet],
            },
        )?;
        written.push(output);
    }
    Ok(written)
}

fn sheet_position(workbook: &WorkbookData, name: Option<&str>) -> Result<usize> {
    workbook.sheet_position(name).ok_or_else(|| match name {
        Some(name) => ToolError::MissingSheet(name.to_string()),
        None => ToolError::InvalidWorkbook("workbook contains no sheets".into()),
    })
}
