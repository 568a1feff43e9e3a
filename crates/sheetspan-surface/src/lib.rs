//! sheetspan-surface - grid addressing and the surface collaborator layer.
//!
//! Defines the name-based resolution contract a region core talks through
//! ([`SurfaceResolver`] and the handle traits) and ships a dashmap-backed
//! in-memory implementation of the whole contract.

pub mod addr;
pub mod error;
pub mod handle;
pub mod memory;
pub mod mode;

pub use addr::{AddrSpec, CellAddr, MAX_COLS, MAX_ROWS, SpanSpec, col_to_letters, letters_to_col, parse_span};
pub use error::{Result, SurfaceError};
pub use handle::{
    AppControl, AppState, CalcMode, PivotHandle, RectHandle, SheetRef, SurfaceHandle,
    SurfaceResolver, WorkbookHandle,
};
pub use memory::{MemoryApp, MemoryPivot, MemoryRect, MemorySheet, MemoryWorkbook};
pub use mode::{GrowMode, PasteMode, PasteOp, ShiftDir, SortOrder, SortOrientation};
