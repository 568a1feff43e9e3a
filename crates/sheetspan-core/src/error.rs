//! Error types for the region core.

use thiserror::Error;

/// Hard failures of region geometry. Surface-resolution problems are not
/// represented here: the core swallows those and leaves state untouched.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(
        "Not a valid range: row_s={row_start}, col_s={col_start}; row_e={row_end}, col_e={col_end}"
    )]
    InvalidRange {
        row_start: i64,
        col_start: i64,
        row_end: i64,
        col_end: i64,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
