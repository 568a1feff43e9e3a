//! Operation modes accepted by surface calls.
//!
//! Grid applications take these as loosely-spelled strings; here they are
//! closed enums, with unknown spellings rejected when a string is parsed
//! rather than deep inside an operation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SurfaceError;

/// Direction existing content moves when a span is inserted, and the axis a
/// region is relocated along when it shifts away from a collision.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftDir {
    Down,
    Right,
}

impl ShiftDir {
    pub fn as_str(self) -> &'static str {
        match self {
            ShiftDir::Down => "down",
            ShiftDir::Right => "right",
        }
    }
}

impl std::str::FromStr for ShiftDir {
    type Err = SurfaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "down" => Ok(ShiftDir::Down),
            "right" => Ok(ShiftDir::Right),
            other => Err(SurfaceError::UnknownShiftMode(other.to_string())),
        }
    }
}

impl fmt::Display for ShiftDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a rectangle grows from its anchor cell over contiguous content.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrowMode {
    /// Extend downward along the anchor column only.
    Down,
    /// Extend rightward along the anchor row only.
    Right,
    /// Extend down and right to the filled table's bounding box.
    Table,
}

impl GrowMode {
    pub fn as_str(self) -> &'static str {
        match self {
            GrowMode::Down => "down",
            GrowMode::Right => "right",
            GrowMode::Table => "table",
        }
    }
}

impl std::str::FromStr for GrowMode {
    type Err = SurfaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "down" => Ok(GrowMode::Down),
            "right" => Ok(GrowMode::Right),
            "table" => Ok(GrowMode::Table),
            other => Err(SurfaceError::UnknownGrowMode(other.to_string())),
        }
    }
}

impl fmt::Display for GrowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a paste-special transfers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PasteMode {
    All,
    AllExceptBorders,
    ColumnWidths,
    Comments,
    Formats,
    Formulas,
    FormulasAndNumberFormats,
    Validation,
    Values,
    ValuesAndNumberFormats,
}

impl PasteMode {
    /// Whether this paste carries cell contents (as opposed to presentation
    /// attributes only).
    pub fn carries_values(self) -> bool {
        matches!(
            self,
            PasteMode::All
                | PasteMode::AllExceptBorders
                | PasteMode::Formulas
                | PasteMode::FormulasAndNumberFormats
                | PasteMode::Values
                | PasteMode::ValuesAndNumberFormats
        )
    }
}

/// Arithmetic combined with the destination during a paste-special.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PasteOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Which way records run in a sorted rectangle: `Columns` sorts rows by a key
/// column, `Rows` sorts columns by a key row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrientation {
    Rows,
    Columns,
}
