//! The rectangular region value type and its geometry operations.
//!
//! A [`Region`] is a four-coordinate bounding box (1-based, inclusive) with
//! an optional name-based binding to a sheet surface. Geometry operations
//! mutate in place and return `&mut Self` so calls compose; operations that
//! need the live surface take a [`SurfaceResolver`] and treat every
//! resolution failure as "contributes nothing", leaving bounds intact.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use sheetspan_surface::{
    AddrSpec, CellAddr, GrowMode, RectHandle, SheetRef, ShiftDir, SurfaceHandle, SurfaceResolver,
};

use crate::error::{CoreError, Result};

/// Where a region is repositioned to by [`Region::move_to_target`].
pub enum Target<'a> {
    /// An explicit 1-based cell coordinate.
    Cell(CellAddr),
    /// An address resolved against the bound surface; ignored when
    /// resolution fails.
    Address(&'a str),
    /// A live rectangle whose top-left cell becomes the new start corner.
    Handle(&'a dyn RectHandle),
}

impl<'a> From<CellAddr> for Target<'a> {
    fn from(addr: CellAddr) -> Self {
        Target::Cell(addr)
    }
}

impl<'a> From<(i64, i64)> for Target<'a> {
    fn from((row, col): (i64, i64)) -> Self {
        Target::Cell(CellAddr::new(row, col))
    }
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(s: &'a str) -> Self {
        Target::Address(s)
    }
}

impl<'a> From<&'a dyn RectHandle> for Target<'a> {
    fn from(rect: &'a dyn RectHandle) -> Self {
        Target::Handle(rect)
    }
}

/// A rectangular span of grid cells, optionally bound to a sheet by name.
///
/// Bounds are 1-based and inclusive; a freshly constructed region holds the
/// unset sentinel 0 in all four and is not yet addressable. The ordering
/// invariant `row_start <= row_end && col_start <= col_end` is revalidated
/// on every mutation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    row_start: i64,
    col_start: i64,
    row_end: i64,
    col_end: i64,
    sheet: Option<SheetRef>,
}

impl Region {
    /// An empty, detached region.
    pub fn new() -> Region {
        Region::default()
    }

    /// A detached region with the given bounds.
    pub fn from_bounds(row_start: i64, col_start: i64, row_end: i64, col_end: i64) -> Result<Region> {
        let mut region = Region::new();
        region.update(Some(row_start), Some(col_start), Some(row_end), Some(col_end))?;
        Ok(region)
    }

    pub fn row_start(&self) -> i64 {
        self.row_start
    }

    pub fn col_start(&self) -> i64 {
        self.col_start
    }

    pub fn row_end(&self) -> i64 {
        self.row_end
    }

    pub fn col_end(&self) -> i64 {
        self.col_end
    }

    pub fn top(&self) -> i64 {
        self.row_start
    }

    pub fn left(&self) -> i64 {
        self.col_start
    }

    pub fn bottom(&self) -> i64 {
        self.row_end
    }

    pub fn right(&self) -> i64 {
        self.col_end
    }

    /// Top-left corner.
    pub fn start(&self) -> CellAddr {
        CellAddr::new(self.row_start, self.col_start)
    }

    /// Bottom-right corner.
    pub fn end(&self) -> CellAddr {
        CellAddr::new(self.row_end, self.col_end)
    }

    pub fn width(&self) -> i64 {
        self.col_end - self.col_start + 1
    }

    pub fn height(&self) -> i64 {
        self.row_end - self.row_start + 1
    }

    /// True when all four bounds are set, i.e. the region addresses real
    /// cells.
    pub fn rangeable(&self) -> bool {
        self.row_start > 0 && self.row_end > 0 && self.col_start > 0 && self.col_end > 0
    }

    pub fn contains(&self, addr: CellAddr) -> bool {
        addr.row >= self.row_start
            && addr.row <= self.row_end
            && addr.col >= self.col_start
            && addr.col <= self.col_end
    }

    /// The name-based sheet binding, if any.
    pub fn sheet(&self) -> Option<&SheetRef> {
        self.sheet.as_ref()
    }

    /// Bind to a sheet by name. `None` keeps the current binding.
    pub fn attach(&mut self, sheet: Option<SheetRef>) -> &mut Self {
        if let Some(sheet) = sheet {
            self.sheet = Some(sheet);
        }
        self
    }

    /// Drop the sheet binding.
    pub fn detach(&mut self) -> &mut Self {
        self.sheet = None;
        self
    }

    /// Independent copy: same bounds, same name-based binding. Both copies
    /// keep resolving to the same underlying surface.
    pub fn duplicate(&self) -> Region {
        self.clone()
    }

    /// Apply any subset of the four bounds, keeping omitted ones, then
    /// revalidate the ordering invariant. On failure the prior bounds are
    /// left unchanged.
    pub fn update(
        &mut self,
        row_start: Option<i64>,
        col_start: Option<i64>,
        row_end: Option<i64>,
        col_end: Option<i64>,
    ) -> Result<&mut Self> {
        let r1 = row_start.unwrap_or(self.row_start);
        let c1 = col_start.unwrap_or(self.col_start);
        let r2 = row_end.unwrap_or(self.row_end);
        let c2 = col_end.unwrap_or(self.col_end);
        if r1 > r2 || c1 > c2 {
            return Err(CoreError::InvalidRange {
                row_start: r1,
                col_start: c1,
                row_end: r2,
                col_end: c2,
            });
        }
        self.row_start = r1;
        self.col_start = c1;
        self.row_end = r2;
        self.col_end = c2;
        Ok(self)
    }

    /// Structural assignment: adopt `other`'s binding and bounds wholesale.
    pub fn update_from(&mut self, other: &Region) -> &mut Self {
        self.sheet = other.sheet.clone();
        self.row_start = other.row_start;
        self.col_start = other.col_start;
        self.row_end = other.row_end;
        self.col_end = other.col_end;
        self
    }

    /// Best-effort refresh from the live surface: resolve an address
    /// expression against the bound sheet and adopt the resulting
    /// rectangle's bounds. Any resolution failure leaves the region
    /// unchanged.
    pub fn update_by(
        &mut self,
        resolver: &dyn SurfaceResolver,
        first: AddrSpec,
        second: Option<AddrSpec>,
    ) -> &mut Self {
        if let Some(surface) = self.live(resolver) {
            match surface.region(first, second) {
                Ok(rect) => self.adopt(rect.as_ref()),
                Err(err) => debug!("update_by left region unchanged: {err}"),
            }
        }
        self
    }

    /// Translate all four bounds, preserving width and height.
    pub fn offset(&mut self, row_delta: i64, col_delta: i64) -> Result<&mut Self> {
        self.update(
            Some(self.row_start + row_delta),
            Some(self.col_start + col_delta),
            Some(self.row_end + row_delta),
            Some(self.col_end + col_delta),
        )
    }

    /// Adjust the end corner so height/width match the requested sizes,
    /// keeping the start corner fixed. Omitted dimensions are unchanged.
    pub fn resize(&mut self, height: Option<i64>, width: Option<i64>) -> Result<&mut Self> {
        let vr = height.map_or(0, |h| h - self.height());
        let vc = width.map_or(0, |w| w - self.width());
        self.update(None, None, Some(self.row_end + vr), Some(self.col_end + vc))
    }

    /// Reposition the start corner, translating the end corner by the same
    /// delta so the size is preserved.
    pub fn move_to(&mut self, row: i64, col: i64) -> Result<&mut Self> {
        let vr = row - self.row_start;
        let vc = col - self.col_start;
        self.update(
            Some(row),
            Some(col),
            Some(self.row_end + vr),
            Some(self.col_end + vc),
        )
    }

    /// [`move_to`](Self::move_to) with a target that may also be an address
    /// string or a live rectangle. Address resolution failures are silently
    /// ignored.
    pub fn move_to_target<'a>(
        &mut self,
        resolver: &dyn SurfaceResolver,
        target: impl Into<Target<'a>>,
    ) -> Result<&mut Self> {
        match target.into() {
            Target::Cell(addr) => return self.move_to(addr.row, addr.col),
            Target::Handle(rect) => {
                let anchor = rect.top_left();
                return self.move_to(anchor.row, anchor.col);
            }
            Target::Address(a1) => {
                if let Some(surface) = self.live(resolver) {
                    match surface.region(AddrSpec::A1(a1.to_string()), None) {
                        Ok(rect) => {
                            let anchor = rect.top_left();
                            return self.move_to(anchor.row, anchor.col);
                        }
                        Err(err) => debug!("move_to_target ignored address {a1}: {err}"),
                    }
                }
            }
        }
        Ok(self)
    }

    /// Grow over the contiguous filled area starting at the anchor cell.
    ///
    /// Reads the live surface; when the region cannot be resolved, or the
    /// anchor cell is blank, the bounds stay as they are.
    pub fn expand(&mut self, resolver: &dyn SurfaceResolver, mode: GrowMode) -> &mut Self {
        let Some(rect) = self.rect(resolver) else {
            return self;
        };
        // Never grow from a blank origin.
        if rect.anchor_blank() {
            return self;
        }
        match rect.expand(mode) {
            Ok(grown) => self.adopt(grown.as_ref()),
            Err(err) => debug!("expand left region unchanged: {err}"),
        }
        self
    }

    /// The overlap of `self` and `target`, bound to `self`'s surface, or
    /// None when the two regions reference different surfaces or do not
    /// overlap.
    pub fn intersect(&self, target: &Region) -> Option<Region> {
        if self.sheet != target.sheet {
            return None;
        }

        // Four-sided separation check.
        if target.top() > self.bottom()
            || target.bottom() < self.top()
            || target.left() > self.right()
            || target.right() < self.left()
        {
            return None;
        }

        let mut r1 = self.row_start;
        let mut c1 = self.col_start;
        let mut r2 = self.row_end;
        let mut c2 = self.col_end;

        // Per side: adopt target's bound where its edge falls within self's
        // span on that axis.
        if target.top() >= self.top() && target.top() <= self.bottom() {
            r1 = target.row_start;
        }
        if target.left() >= self.left() && target.left() <= self.right() {
            c1 = target.col_start;
        }
        if target.bottom() >= self.top() && target.bottom() <= self.bottom() {
            r2 = target.row_end;
        }
        if target.right() >= self.left() && target.right() <= self.right() {
            c2 = target.col_end;
        }

        let mut overlap = Region::new();
        overlap.attach(self.sheet.clone());
        overlap.row_start = r1;
        overlap.col_start = c1;
        overlap.row_end = r2;
        overlap.col_end = c2;
        Some(overlap)
    }

    /// Collision-avoidance relocation: when `target` overlaps this region,
    /// insert a gap on the surface and move past it.
    ///
    /// The gap is the distance `target` extends beyond this region's
    /// top-left corner along the shift axis. With `entire` the insertion
    /// spans whole rows or columns; otherwise it is a partial range matching
    /// this region's span on the other axis. A surface that cannot be
    /// resolved skips the physical insertion; the bookkeeping move still
    /// happens so the region's coordinates stay where the caller expects
    /// them.
    pub fn shift_away(
        &mut self,
        resolver: &dyn SurfaceResolver,
        target: &Region,
        dir: ShiftDir,
        entire: bool,
    ) -> Result<&mut Self> {
        if self.intersect(target).is_none() {
            return Ok(self);
        }

        let gap_h = target.right() - self.left();
        let gap_v = target.bottom() - self.top();
        debug!(
            "shift_away: target.right={}, self.left={}, gap_h={}",
            target.right(),
            self.left(),
            gap_h
        );
        debug!(
            "shift_away: target.bottom={}, self.top={}, gap_v={}",
            target.bottom(),
            self.top(),
            gap_v
        );

        match dir {
            ShiftDir::Right => {
                let (first, second) = if entire {
                    (AddrSpec::Cols(self.left(), self.left() + gap_h), None)
                } else {
                    (
                        AddrSpec::Cell(self.start()),
                        Some(AddrSpec::Cell(CellAddr::new(
                            self.row_end,
                            self.left() + gap_h,
                        ))),
                    )
                };
                self.insert_gap(resolver, first, second, dir);
                self.move_to(self.row_start, self.left() + gap_h + 1)
            }
            ShiftDir::Down => {
                let (first, second) = if entire {
                    (AddrSpec::Rows(self.top(), self.top() + gap_v), None)
                } else {
                    (
                        AddrSpec::Cell(self.start()),
                        Some(AddrSpec::Cell(CellAddr::new(
                            self.top() + gap_v,
                            self.col_end,
                        ))),
                    )
                };
                self.insert_gap(resolver, first, second, dir);
                self.move_to(self.top() + gap_v + 1, self.col_start)
            }
        }
    }

    /// Resolve this region's own bounds to a live rectangle. None when the
    /// region is detached, not addressable, or the surface is gone.
    pub fn rect(&self, resolver: &dyn SurfaceResolver) -> Option<Box<dyn RectHandle>> {
        if !self.rangeable() {
            return None;
        }
        let surface = self.live(resolver)?;
        match surface.region(
            AddrSpec::Cell(self.start()),
            Some(AddrSpec::Cell(self.end())),
        ) {
            Ok(rect) => Some(rect),
            Err(err) => {
                debug!("region {self} does not resolve: {err}");
                None
            }
        }
    }

    /// A1-style address on the live surface, when resolvable.
    pub fn address(&self, resolver: &dyn SurfaceResolver) -> Option<String> {
        self.rect(resolver).map(|rect| rect.address())
    }

    fn live(&self, resolver: &dyn SurfaceResolver) -> Option<Box<dyn SurfaceHandle>> {
        let sheet = self.sheet.as_ref()?;
        match resolver.resolve(sheet) {
            Ok(surface) => Some(surface),
            Err(err) => {
                debug!("sheet {sheet} does not resolve: {err}");
                None
            }
        }
    }

    fn adopt(&mut self, rect: &dyn RectHandle) {
        // Live rectangles are already normalized; adopt bounds directly.
        let start = rect.top_left();
        let end = rect.last_cell();
        self.row_start = start.row;
        self.col_start = start.col;
        self.row_end = end.row;
        self.col_end = end.col;
    }

    fn insert_gap(
        &self,
        resolver: &dyn SurfaceResolver,
        first: AddrSpec,
        second: Option<AddrSpec>,
        dir: ShiftDir,
    ) {
        let Some(surface) = self.live(resolver) else {
            return;
        };
        match surface.region(first, second) {
            Ok(rect) => {
                debug!("shift_away: inserting {} shifting {dir}", rect.address());
                if let Err(err) = rect.insert(dir) {
                    debug!("shift_away insert skipped: {err}");
                }
            }
            Err(err) => debug!("shift_away insert skipped: {err}"),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span = if self.rangeable() {
            format!("{}:{}", self.start().to_a1(), self.end().to_a1())
        } else {
            "<unset>".to_string()
        };
        match &self.sheet {
            Some(sheet) => write!(f, "{sheet}!{span}"),
            None => f.write_str(&span),
        }
    }
}
