use std::path::{Path, PathBuf};

use crate::adjustment::tools::error::{Result, ToolError};

/// Supplies the workbook a command should operate on.
///
/// The transformation code only ever sees the resolved path; how it was
/// chosen (argument, prompt, fixture) stays behind this trait.
pub trait SourceLocator {
    fn locate(&self) -> Result<PathBuf>;
}

/// Locator backed by an already-known path, typically a CLI argument.
#[derive(Debug, Clone, Default)]
pub struct PathLocator {
    path: Option<PathBuf>,
}

impl PathLocator {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl From<PathBuf> for PathLocator {
    fn from(path: PathBuf) -> Self {
        Self::new(Some(path))
    }
}

impl SourceLocator for PathLocator {
    fn locate(&self) -> Result<PathBuf> {
        let path = self.path.clone().ok_or(ToolError::NoSelection)?;
        if path.as_os_str().is_empty() {
            return Err(ToolError::NoSelection);
        }
        Ok(path)
    }
}

/// Spreadsheet container recognised by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookKind {
    Xlsx,
    Xlsm,
}

impl WorkbookKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("xlsx") => Ok(WorkbookKind::Xlsx),
            Some("xlsm") => Ok(WorkbookKind::Xlsm),
            _ => Err(ToolError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: "expected a .xlsx or .xlsm workbook".into(),
            }),
        }
    }
}

/// Checks that `path` names an existing workbook that can be read.
pub fn validate_source(path: &Path) -> Result<WorkbookKind> {
    let kind = WorkbookKind::from_path(path)?;
    if !path.exists() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }
    Ok(kind)
}

/// Like [`validate_source`], but also requires that the workbook can be
/// rewritten in place without losing content.
pub fn validate_in_place(path: &Path) -> Result<()> {
    match validate_source(path)? {
        WorkbookKind::Xlsx => Ok(()),
        WorkbookKind::Xlsm => Err(ToolError::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: "rewriting a macro-enabled workbook would drop its macros".into(),
        }),
    }
}
