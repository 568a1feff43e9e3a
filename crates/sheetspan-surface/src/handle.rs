//! The surface collaborator abstraction.
//!
//! A region never owns the grid surface it describes; it holds a name-based
//! [`SheetRef`] and asks a [`SurfaceResolver`] for a live handle only when an
//! operation truly needs one. Resolution is a lookup that may fail at any
//! time (the named workbook or sheet may be gone), so every method here is
//! Result-returning and callers decide whether failure is fatal.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::addr::{AddrSpec, CellAddr};
use crate::error::Result;
use crate::mode::{GrowMode, PasteMode, PasteOp, ShiftDir, SortOrder, SortOrientation};

/// Name-based weak reference to a sheet within a workbook.
///
/// Holding one never keeps the surface alive; two equal refs resolve to the
/// same underlying surface with no coordination between holders.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct SheetRef {
    pub workbook: String,
    pub sheet: String,
}

impl SheetRef {
    pub fn new(workbook: impl Into<String>, sheet: impl Into<String>) -> SheetRef {
        SheetRef {
            workbook: workbook.into(),
            sheet: sheet.into(),
        }
    }
}

impl fmt::Display for SheetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]{}", self.workbook, self.sheet)
    }
}

/// Resolves name-based references to live handles.
pub trait SurfaceResolver {
    /// Look up a sheet by workbook and sheet name.
    fn resolve(&self, sheet: &SheetRef) -> Result<Box<dyn SurfaceHandle>>;

    /// Look up a workbook by name.
    fn workbook(&self, name: &str) -> Result<Box<dyn WorkbookHandle>>;
}

/// A live workbook.
pub trait WorkbookHandle {
    fn name(&self) -> String;

    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    fn sheet(&self, name: &str) -> Result<Box<dyn SurfaceHandle>>;

    /// Resolve a defined name to the rectangle it refers to.
    ///
    /// Lookup order follows the host application: workbook-scope names first
    /// (filtered to `sheet_scope`'s sheet when one is given), then names
    /// scoped to that sheet, then a scan of every sheet's scoped names when
    /// no scope was given.
    fn named(&self, name: &str, sheet_scope: Option<&str>) -> Result<Box<dyn RectHandle>>;
}

/// A live sheet surface.
pub trait SurfaceHandle {
    /// The name-based reference this handle was resolved from.
    fn sheet_ref(&self) -> SheetRef;

    /// Resolve an address expression (one or two specs) to a rectangle.
    fn region(&self, first: AddrSpec, second: Option<AddrSpec>) -> Result<Box<dyn RectHandle>>;

    /// Toggle the sheet's autofilter.
    fn set_autofilter(&self, on: bool) -> Result<()>;

    /// Pivot tables on this sheet.
    fn pivots(&self) -> Result<Vec<Box<dyn PivotHandle>>>;
}

/// A live rectangle on a sheet surface.
pub trait RectHandle {
    fn top_left(&self) -> CellAddr;

    fn last_cell(&self) -> CellAddr;

    /// True when the rectangle's top-left cell holds nothing or only blanks.
    fn anchor_blank(&self) -> bool;

    /// Grow over contiguous non-blank content from the anchor.
    fn expand(&self, mode: GrowMode) -> Result<Box<dyn RectHandle>>;

    /// Insert this rectangle's span, shifting existing content in `shift`'s
    /// direction.
    fn insert(&self, shift: ShiftDir) -> Result<()>;

    /// Cell contents of the rectangle, row-major. Blank cells read as empty
    /// strings.
    fn values(&self) -> Vec<Vec<String>>;

    /// Write row-major contents starting at the rectangle's anchor.
    fn write_values(&self, rows: &[Vec<String>]) -> Result<()>;

    /// Copy to `destination`, or to the application clipboard when None.
    fn copy(&self, destination: Option<&dyn RectHandle>) -> Result<()>;

    /// Paste the application clipboard into this rectangle.
    fn paste_special(
        &self,
        paste: PasteMode,
        operation: Option<PasteOp>,
        skip_blanks: bool,
        transpose: bool,
    ) -> Result<()>;

    /// Sort the rectangle's records by a key rectangle (or its own first
    /// record when None).
    fn sort(
        &self,
        key: Option<&dyn RectHandle>,
        order: SortOrder,
        orientation: SortOrientation,
    ) -> Result<()>;

    /// A1-style address of the rectangle.
    fn address(&self) -> String;
}

/// A live pivot table.
pub trait PivotHandle {
    fn name(&self) -> String;

    fn refresh(&self) -> Result<()>;

    /// Show or hide one item of a pivot field.
    fn set_item_visible(&self, field: &str, item: &str, visible: bool) -> Result<()>;
}

/// Recalculation behavior of the host application.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalcMode {
    Automatic,
    Manual,
}

/// Snapshot of the host application's automation-state toggles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub screen_updating: bool,
    pub display_alerts: bool,
    pub visible: bool,
    pub calculation: CalcMode,
}

impl AppState {
    /// State applied around batches of surface mutations: UI feedback off,
    /// recalculation automatic.
    pub fn quiet() -> AppState {
        AppState {
            screen_updating: false,
            display_alerts: false,
            visible: false,
            calculation: CalcMode::Automatic,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            screen_updating: true,
            display_alerts: true,
            visible: true,
            calculation: CalcMode::Automatic,
        }
    }
}

/// Process-wide automation-state control of the host application.
pub trait AppControl {
    fn state(&self) -> AppState;

    fn apply(&self, state: AppState);
}
