//! Copy, paste-special and sort flows over live rectangles.
//!
//! Thin compositions of [`RectHandle`] calls that reproduce the common
//! transfer sequences: copy to a destination, replace a block with its own
//! values, carry values then formats, and apply a sort to a bookkept region.

use sheetspan_core::Region;
use sheetspan_surface::{
    PasteMode, RectHandle, SortOrder, SortOrientation, SurfaceResolver,
};

use crate::error::{Result, SheetspanError};

/// Copy one rectangle onto another.
pub fn copy_paste(src: &dyn RectHandle, dst: &dyn RectHandle) -> Result<()> {
    src.copy(Some(dst))?;
    Ok(())
}

/// Replace a rectangle's contents with its own values (formulas become
/// plain results on surfaces that compute).
pub fn copy_paste_values(rect: &dyn RectHandle) -> Result<()> {
    rect.copy(None)?;
    rect.paste_special(PasteMode::Values, None, false, false)?;
    Ok(())
}

/// Copy to a destination, then flatten the destination to values.
pub fn copy_paste_into_values(src: &dyn RectHandle, dst: &dyn RectHandle) -> Result<()> {
    copy_paste(src, dst)?;
    copy_paste_values(dst)
}

/// Paste values from `src` into `dst`, optionally following with formats.
pub fn copy_paste_values_formats(
    src: &dyn RectHandle,
    dst: &dyn RectHandle,
    with_formats: bool,
) -> Result<()> {
    src.copy(None)?;
    dst.paste_special(PasteMode::Values, None, false, false)?;
    if with_formats {
        dst.paste_special(PasteMode::Formats, None, false, false)?;
    }
    Ok(())
}

/// Sort the cells a region bookkeeps, using `key`'s column (or row, per
/// orientation) as the sort key. Both regions must resolve to live
/// rectangles.
pub fn apply_sort(
    resolver: &dyn SurfaceResolver,
    region: &Region,
    key: Option<&Region>,
    order: SortOrder,
    orientation: SortOrientation,
) -> Result<()> {
    let rect = region
        .rect(resolver)
        .ok_or_else(|| SheetspanError::Unaddressable(region.to_string()))?;
    let key_rect = match key {
        Some(key) => Some(
            key.rect(resolver)
                .ok_or_else(|| SheetspanError::Unaddressable(key.to_string()))?,
        ),
        None => None,
    };
    rect.sort(key_rect.as_deref(), order, orientation)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetspan_core::SheetRef;
    use sheetspan_surface::{AddrSpec, MemoryApp, MemorySheet, SurfaceHandle};

    fn populated_sheet(app: &MemoryApp) -> MemorySheet {
        let book = app.add_workbook("b.xlsx");
        let sheet = book.add_sheet("S1");
        sheet.set("A1", "3");
        sheet.set("B1", "z");
        sheet.set("A2", "1");
        sheet.set("B2", "a");
        sheet
    }

    #[test]
    fn test_copy_paste_between_rects() {
        let app = MemoryApp::new();
        let sheet = populated_sheet(&app);

        let src = sheet.region(AddrSpec::from("A1:B2"), None).unwrap();
        let dst = sheet.region(AddrSpec::from("D1"), None).unwrap();
        copy_paste(src.as_ref(), dst.as_ref()).unwrap();

        assert_eq!(sheet.get("D1").unwrap(), "3");
        assert_eq!(sheet.get("E2").unwrap(), "a");
    }

    #[test]
    fn test_copy_paste_values_in_place() {
        let app = MemoryApp::new();
        let sheet = populated_sheet(&app);

        let rect = sheet.region(AddrSpec::from("A1:B2"), None).unwrap();
        copy_paste_values(rect.as_ref()).unwrap();

        // A value grid is already values; the flow must at least be lossless.
        assert_eq!(sheet.get("A1").unwrap(), "3");
        assert_eq!(sheet.get("B2").unwrap(), "a");
    }

    #[test]
    fn test_copy_paste_into_values() {
        let app = MemoryApp::new();
        let sheet = populated_sheet(&app);

        let src = sheet.region(AddrSpec::from("A1:B2"), None).unwrap();
        let dst = sheet.region(AddrSpec::from("D4"), None).unwrap();
        copy_paste_into_values(src.as_ref(), dst.as_ref()).unwrap();

        assert_eq!(sheet.get("D4").unwrap(), "3");
        assert_eq!(sheet.get("E5").unwrap(), "a");
    }

    #[test]
    fn test_apply_sort_over_regions() {
        let app = MemoryApp::new();
        let sheet = populated_sheet(&app);

        let mut region = Region::from_bounds(1, 1, 2, 2).unwrap();
        region.attach(Some(sheet.sheet_ref()));
        let mut key = Region::from_bounds(1, 1, 2, 1).unwrap();
        key.attach(Some(sheet.sheet_ref()));

        apply_sort(
            &app,
            &region,
            Some(&key),
            SortOrder::Ascending,
            SortOrientation::Columns,
        )
        .unwrap();

        assert_eq!(sheet.get("A1").unwrap(), "1");
        assert_eq!(sheet.get("B1").unwrap(), "a");
        assert_eq!(sheet.get("A2").unwrap(), "3");
        assert_eq!(sheet.get("B2").unwrap(), "z");
    }

    #[test]
    fn test_apply_sort_detached_region_fails() {
        let app = MemoryApp::new();
        let region = Region::from_bounds(1, 1, 2, 2).unwrap();

        let err = apply_sort(
            &app,
            &region,
            None,
            SortOrder::Ascending,
            SortOrientation::Columns,
        )
        .unwrap_err();
        assert!(matches!(err, SheetspanError::Unaddressable(_)));
    }

    #[test]
    fn test_apply_sort_missing_sheet_fails() {
        let app = MemoryApp::new();
        let mut region = Region::from_bounds(1, 1, 2, 2).unwrap();
        region.attach(Some(SheetRef::new("gone.xlsx", "S1")));

        assert!(
            apply_sort(
                &app,
                &region,
                None,
                SortOrder::Ascending,
                SortOrientation::Columns,
            )
            .is_err()
        );
    }
}
