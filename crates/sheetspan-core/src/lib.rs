//! sheetspan-core - the region geometry model.
//!
//! Rectangular regions on a 1-based grid with lazy, name-based sheet
//! bindings, plus the layout triple and pairing types built on them.

pub mod error;
pub mod layout;
pub mod region;

pub use error::{CoreError, Result};
pub use layout::{LayoutPair, RegionPair, SheetLayout};
pub use region::{Region, Target};

pub use sheetspan_surface::SheetRef;
