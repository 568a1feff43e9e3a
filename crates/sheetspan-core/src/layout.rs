//! Sheet layout triples and source/destination pairings.
//!
//! Pure composition over [`Region`]: no invariant ties the contained regions
//! together, they exist to carry a sheet's logical areas (or a copy's two
//! endpoints) through an operation as one value.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::region::Region;

/// The three named regions describing one sheet's logical layout: a title
/// block, a formula block and a data block. The regions are independent and
/// may overlap.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetLayout {
    pub title: Region,
    pub formulas: Region,
    pub data: Region,
}

impl SheetLayout {
    /// A layout of three empty regions.
    pub fn new() -> SheetLayout {
        SheetLayout::default()
    }

    pub fn duplicate(&self) -> SheetLayout {
        SheetLayout {
            title: self.title.duplicate(),
            formulas: self.formulas.duplicate(),
            data: self.data.duplicate(),
        }
    }

    /// Copy bounds and bindings from `other` field by field.
    pub fn update_from(&mut self, other: &SheetLayout) -> &mut Self {
        self.title.update_from(&other.title);
        self.formulas.update_from(&other.formulas);
        self.data.update_from(&other.data);
        self
    }

    /// Copy any subset of the three regions from the given sources.
    pub fn update(
        &mut self,
        title: Option<&Region>,
        formulas: Option<&Region>,
        data: Option<&Region>,
    ) -> &mut Self {
        if let Some(title) = title {
            self.title.update_from(title);
        }
        if let Some(formulas) = formulas {
            self.formulas.update_from(formulas);
        }
        if let Some(data) = data {
            self.data.update_from(data);
        }
        self
    }
}

impl fmt::Display for SheetLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SheetLayout(title={}, formulas={}, data={})",
            self.title, self.formulas, self.data
        )
    }
}

/// A source and destination region, carried together through a copy or
/// transform between two locations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionPair {
    pub src: Region,
    pub dst: Region,
}

impl RegionPair {
    pub fn new() -> RegionPair {
        RegionPair::default()
    }

    pub fn duplicate(&self) -> RegionPair {
        RegionPair {
            src: self.src.duplicate(),
            dst: self.dst.duplicate(),
        }
    }

    pub fn update_from(&mut self, other: &RegionPair) -> &mut Self {
        self.src.update_from(&other.src);
        self.dst.update_from(&other.dst);
        self
    }

    pub fn update(&mut self, src: Option<&Region>, dst: Option<&Region>) -> &mut Self {
        if let Some(src) = src {
            self.src.update_from(src);
        }
        if let Some(dst) = dst {
            self.dst.update_from(dst);
        }
        self
    }
}

/// A source and destination sheet layout.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPair {
    pub src: SheetLayout,
    pub dst: SheetLayout,
}

impl LayoutPair {
    pub fn new() -> LayoutPair {
        LayoutPair::default()
    }

    pub fn duplicate(&self) -> LayoutPair {
        LayoutPair {
            src: self.src.duplicate(),
            dst: self.dst.duplicate(),
        }
    }

    pub fn update_from(&mut self, other: &LayoutPair) -> &mut Self {
        self.src.update_from(&other.src);
        self.dst.update_from(&other.dst);
        self
    }

    pub fn update(&mut self, src: Option<&SheetLayout>, dst: Option<&SheetLayout>) -> &mut Self {
        if let Some(src) = src {
            self.src.update_from(src);
        }
        if let Some(dst) = dst {
            self.dst.update_from(dst);
        }
        self
    }
}
