use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool ingests, transforms, or emits timetable data.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when CSV parsing or serialization fails.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Raised when JSON parsing of the options file fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a required column is absent from an input table.
    #[error("{table} is missing required columns: {}", .columns.join(", "))]
    MissingColumns { table: String, columns: Vec<String> },

    /// Raised when a workbook does not follow the expected conventions.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when a non-empty timetable yields no session at all.
    #[error("no sessions could be built: check the Hour column format (expected times like 08:30)")]
    NoSessions,

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the CLI is invoked without any output target.
    #[error("no output requested: pass at least one of --week-csv, --week-xlsx, --sessions-xlsx")]
    NoOutput,

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
