//! Pivot-table refresh walkers.
//!
//! Walks the pivots of a sheet or a whole workbook, refreshing each one,
//! with optional filters and pre/post hooks around every step.

use log::info;

use sheetspan_surface::{PivotHandle, SurfaceHandle, WorkbookHandle};

use crate::error::Result;

pub type SheetFilter<'a> = &'a dyn Fn(&dyn SurfaceHandle) -> bool;
pub type PivotFilter<'a> = &'a dyn Fn(&dyn PivotHandle) -> bool;
pub type SheetHook<'a> = &'a dyn Fn(&dyn SurfaceHandle);
pub type PivotHook<'a> = &'a dyn Fn(&dyn SurfaceHandle, &dyn PivotHandle);

/// Refresh every pivot on a sheet, skipping those the filter rejects.
/// Returns the number of pivots refreshed.
pub fn refresh_sheet_pivots(
    sheet: &dyn SurfaceHandle,
    filter: Option<PivotFilter<'_>>,
    pre: Option<PivotHook<'_>>,
    post: Option<PivotHook<'_>>,
) -> Result<usize> {
    let mut refreshed = 0;
    for pivot in sheet.pivots()? {
        if let Some(filter) = filter {
            if !filter(pivot.as_ref()) {
                continue;
            }
        }

        info!(">>> processing pivot [{}]{} ...", sheet.sheet_ref(), pivot.name());

        if let Some(pre) = pre {
            pre(sheet, pivot.as_ref());
        }
        pivot.refresh()?;
        if let Some(post) = post {
            post(sheet, pivot.as_ref());
        }
        refreshed += 1;
    }
    Ok(refreshed)
}

/// Refresh pivots across every sheet of a workbook, with sheet-level and
/// pivot-level filters and hooks. Returns the number of pivots refreshed.
#[allow(clippy::too_many_arguments)]
pub fn refresh_workbook_pivots(
    workbook: &dyn WorkbookHandle,
    sheet_filter: Option<SheetFilter<'_>>,
    pivot_filter: Option<PivotFilter<'_>>,
    pre_sheet: Option<SheetHook<'_>>,
    post_sheet: Option<SheetHook<'_>>,
    pre_pivot: Option<PivotHook<'_>>,
    post_pivot: Option<PivotHook<'_>>,
) -> Result<usize> {
    let mut refreshed = 0;
    for name in workbook.sheet_names() {
        let sheet = workbook.sheet(&name)?;

        if let Some(filter) = sheet_filter {
            if !filter(sheet.as_ref()) {
                continue;
            }
        }

        info!(">>> processing worksheet [{}]{} ...", workbook.name(), name);

        if let Some(pre) = pre_sheet {
            pre(sheet.as_ref());
        }
        refreshed += refresh_sheet_pivots(sheet.as_ref(), pivot_filter, pre_pivot, post_pivot)?;
        if let Some(post) = post_sheet {
            post(sheet.as_ref());
        }
    }
    Ok(refreshed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetspan_surface::{MemoryApp, SurfaceResolver};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_refresh_sheet_pivots_with_filter() {
        let app = MemoryApp::new();
        let book = app.add_workbook("b.xlsx");
        let sheet = book.add_sheet("S1");
        let sales = sheet.add_pivot("pvt_sales");
        let costs = sheet.add_pivot("pvt_costs");

        let handle = app.workbook("b.xlsx").unwrap().sheet("S1").unwrap();
        let filter: PivotFilter<'_> = &|p| p.name().ends_with("sales");
        let refreshed = refresh_sheet_pivots(handle.as_ref(), Some(filter), None, None).unwrap();

        assert_eq!(refreshed, 1);
        assert_eq!(sales.refresh_count(), 1);
        assert_eq!(costs.refresh_count(), 0);
    }

    #[test]
    fn test_refresh_workbook_pivots_hooks_fire_in_order() {
        let app = MemoryApp::new();
        let book = app.add_workbook("b.xlsx");
        let s1 = book.add_sheet("S1");
        let s2 = book.add_sheet("S2");
        let p1 = s1.add_pivot("p1");
        let p2 = s2.add_pivot("p2");

        let pre_count = AtomicUsize::new(0);
        let post_count = AtomicUsize::new(0);
        let pre: PivotHook<'_> = &|_, pivot| {
            // Refresh happens after pre.
            assert_eq!(
                pivot.name(),
                if pre_count.load(Ordering::SeqCst) == 0 { "p1" } else { "p2" }
            );
            pre_count.fetch_add(1, Ordering::SeqCst);
        };
        let post: PivotHook<'_> = &|_, _| {
            post_count.fetch_add(1, Ordering::SeqCst);
        };

        let workbook = app.workbook("b.xlsx").unwrap();
        let refreshed = refresh_workbook_pivots(
            workbook.as_ref(),
            None,
            None,
            None,
            None,
            Some(pre),
            Some(post),
        )
        .unwrap();

        assert_eq!(refreshed, 2);
        assert_eq!(pre_count.load(Ordering::SeqCst), 2);
        assert_eq!(post_count.load(Ordering::SeqCst), 2);
        assert_eq!(p1.refresh_count(), 1);
        assert_eq!(p2.refresh_count(), 1);
    }

    #[test]
    fn test_refresh_workbook_sheet_filter() {
        let app = MemoryApp::new();
        let book = app.add_workbook("b.xlsx");
        let s1 = book.add_sheet("S1");
        let skip = book.add_sheet("scratch");
        let kept = s1.add_pivot("kept");
        let skipped = skip.add_pivot("skipped");

        let sheet_filter: SheetFilter<'_> = &|s| !s.sheet_ref().sheet.starts_with("scratch");
        let workbook = app.workbook("b.xlsx").unwrap();
        let refreshed = refresh_workbook_pivots(
            workbook.as_ref(),
            Some(sheet_filter),
            None,
            None,
            None,
            None,
            None,
        )
        .unwrap();

        assert_eq!(refreshed, 1);
        assert_eq!(kept.refresh_count(), 1);
        assert_eq!(skipped.refresh_count(), 0);
    }
}
