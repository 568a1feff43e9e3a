//! sheetspan - region bookkeeping for spreadsheet automation.
//!
//! The core model lives in `sheetspan-core` ([`Region`], [`SheetLayout`] and
//! the pairing types) and talks to grid applications only through the
//! resolver traits in `sheetspan-surface`. This crate adds the orchestration
//! layer above both: quiet-mode batching, pivot refresh walks, copy/paste
//! flows and workbook-name stamp tooling.

pub mod batch;
pub mod error;
pub mod naming;
pub mod pivot;
pub mod transfer;

pub use batch::QuietScope;
pub use error::{Result, SheetspanError};
pub use pivot::{refresh_sheet_pivots, refresh_workbook_pivots};
pub use transfer::{
    apply_sort, copy_paste, copy_paste_into_values, copy_paste_values, copy_paste_values_formats,
};

pub use sheetspan_core::{
    CoreError, LayoutPair, Region, RegionPair, SheetLayout, SheetRef, Target,
};
pub use sheetspan_surface::{
    AddrSpec, AppControl, AppState, CalcMode, CellAddr, GrowMode, MemoryApp, PasteMode, PasteOp,
    PivotHandle, RectHandle, ShiftDir, SortOrder, SortOrientation, SurfaceError, SurfaceHandle,
    SurfaceResolver, WorkbookHandle,
};
