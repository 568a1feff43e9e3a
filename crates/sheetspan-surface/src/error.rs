//! Error types for surface resolution and surface operations.

use thiserror::Error;

/// Errors a surface or resolver can report. Callers in the region core treat
/// most of these as recoverable and fall back to leaving state untouched;
/// the unknown-mode variants are hard errors raised at parse time.
#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("Workbook not found: {0}")]
    WorkbookNotFound(String),

    #[error("Sheet not found: [{workbook}]{sheet}")]
    SheetNotFound { workbook: String, sheet: String },

    #[error("No defined name {0}")]
    NameNotFound(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Unknown shift mode {0}")]
    UnknownShiftMode(String),

    #[error("Unknown grow mode {0}")]
    UnknownGrowMode(String),

    #[error("Clipboard is empty")]
    ClipboardEmpty,
}

pub type Result<T> = std::result::Result<T, SurfaceError>;
