//! Error types for the orchestration layer.

use thiserror::Error;

use sheetspan_core::CoreError;
use sheetspan_surface::SurfaceError;

/// Errors from the helpers that drive live surfaces. Unlike the region core,
/// this layer does not swallow resolution failures: a batch that cannot
/// reach its surface is a failed batch.
#[derive(Error, Debug)]
pub enum SheetspanError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error("Region is not addressable: {0}")]
    Unaddressable(String),
}

pub type Result<T> = std::result::Result<T, SheetspanError>;
