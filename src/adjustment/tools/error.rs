use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur while a
/// workbook is located, loaded, transformed, or saved.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Raised when no workbook was selected.
    #[error("no file was selected")]
    NoSelection,

    /// Raised when the selected file is not a workbook this tool can handle.
    #[error("unsupported file {path}: {reason}")]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the workbook cannot be opened at all.
    #[error(
        "failed to open workbook {path}; ensure it is not corrupted or open in another program: {reason}"
    )]
    Open { path: PathBuf, reason: String },

    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Errors raised while saving an edited workbook in place.
    #[error("Excel save error: {0}")]
    ExcelEdit(String),

    /// Raised when a required header is absent from the sheet.
    #[error("required column '{0}' not found in header row")]
    MissingColumn(String),

    /// Raised when a named sheet does not exist in the workbook.
    #[error("missing sheet '{0}'")]
    MissingSheet(String),

    /// Raised when a sheet does not follow the expected conventions.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when the configuration is inconsistent or incomplete.
    #[error("configuration error: {0}")]
    Config(String),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
