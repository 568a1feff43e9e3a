//! In-memory surface implementation.
//!
//! A complete, process-local implementation of the resolver and handle
//! traits, backed by dashmap cell grids. It is the reference collaborator
//! for tests and for consumers that want region bookkeeping without a host
//! grid application attached.

use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

use crate::addr::{AddrSpec, CellAddr, MAX_COLS, MAX_ROWS, SpanSpec, parse_span};
use crate::error::{Result, SurfaceError};
use crate::handle::{
    AppControl, AppState, PivotHandle, RectHandle, SheetRef, SurfaceHandle, SurfaceResolver,
    WorkbookHandle,
};
use crate::mode::{GrowMode, PasteMode, PasteOp, ShiftDir, SortOrder, SortOrientation};

type Clipboard = Arc<Mutex<Option<Vec<Vec<String>>>>>;

/// The in-memory host application: workbook registry, automation state and
/// a process-wide clipboard slot.
pub struct MemoryApp {
    books: DashMap<String, MemoryWorkbook>,
    order: Mutex<Vec<String>>,
    state: Mutex<AppState>,
    clipboard: Clipboard,
}

impl MemoryApp {
    pub fn new() -> MemoryApp {
        MemoryApp {
            books: DashMap::new(),
            order: Mutex::new(Vec::new()),
            state: Mutex::new(AppState::default()),
            clipboard: Arc::new(Mutex::new(None)),
        }
    }

    /// Register a workbook, or return the existing one with that name.
    pub fn add_workbook(&self, name: &str) -> MemoryWorkbook {
        if let Some(existing) = self.books.get(name) {
            return existing.clone();
        }
        let book = MemoryWorkbook::new(name, self.clipboard.clone());
        self.books.insert(name.to_string(), book.clone());
        self.order.lock().unwrap().push(name.to_string());
        book
    }

    pub fn workbook_names(&self) -> Vec<String> {
        self.order.lock().unwrap().clone()
    }

    pub fn remove_workbook(&self, name: &str) {
        self.books.remove(name);
        self.order.lock().unwrap().retain(|n| n != name);
    }
}

impl Default for MemoryApp {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceResolver for MemoryApp {
    fn resolve(&self, sheet: &SheetRef) -> Result<Box<dyn SurfaceHandle>> {
        let book = self
            .books
            .get(&sheet.workbook)
            .ok_or_else(|| SurfaceError::WorkbookNotFound(sheet.workbook.clone()))?;
        book.sheet(&sheet.sheet)
    }

    fn workbook(&self, name: &str) -> Result<Box<dyn WorkbookHandle>> {
        let book = self
            .books
            .get(name)
            .ok_or_else(|| SurfaceError::WorkbookNotFound(name.to_string()))?;
        Ok(Box::new(book.clone()))
    }
}

impl AppControl for MemoryApp {
    fn state(&self) -> AppState {
        *self.state.lock().unwrap()
    }

    fn apply(&self, state: AppState) {
        *self.state.lock().unwrap() = state;
    }
}

/// Workbook-scope defined name.
struct NamedSpan {
    sheet: String,
    span: String,
}

struct BookInner {
    sheets: DashMap<String, MemorySheet>,
    order: Mutex<Vec<String>>,
    names: DashMap<String, NamedSpan>,
    clipboard: Clipboard,
}

#[derive(Clone)]
pub struct MemoryWorkbook {
    name: String,
    inner: Arc<BookInner>,
}

impl MemoryWorkbook {
    fn new(name: &str, clipboard: Clipboard) -> MemoryWorkbook {
        MemoryWorkbook {
            name: name.to_string(),
            inner: Arc::new(BookInner {
                sheets: DashMap::new(),
                order: Mutex::new(Vec::new()),
                names: DashMap::new(),
                clipboard,
            }),
        }
    }

    /// Add a sheet, or return the existing one with that name.
    pub fn add_sheet(&self, name: &str) -> MemorySheet {
        if let Some(existing) = self.inner.sheets.get(name) {
            return existing.clone();
        }
        let sheet = MemorySheet::new(&self.name, name, self.inner.clipboard.clone());
        self.inner.sheets.insert(name.to_string(), sheet.clone());
        self.inner.order.lock().unwrap().push(name.to_string());
        sheet
    }

    /// Define a workbook-scope name referring to a span on one of the sheets.
    pub fn define_name(&self, name: &str, sheet: &str, span: &str) {
        self.inner.names.insert(
            name.to_string(),
            NamedSpan {
                sheet: sheet.to_string(),
                span: span.to_string(),
            },
        );
    }
}

impl WorkbookHandle for MemoryWorkbook {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn sheet_names(&self) -> Vec<String> {
        self.inner.order.lock().unwrap().clone()
    }

    fn sheet(&self, name: &str) -> Result<Box<dyn SurfaceHandle>> {
        let sheet = self
            .inner
            .sheets
            .get(name)
            .ok_or_else(|| SurfaceError::SheetNotFound {
                workbook: self.name.clone(),
                sheet: name.to_string(),
            })?;
        Ok(Box::new(sheet.clone()))
    }

    fn named(&self, name: &str, sheet_scope: Option<&str>) -> Result<Box<dyn RectHandle>> {
        // Workbook scope first, honoring a sheet filter when one is given.
        if let Some(entry) = self.inner.names.get(name) {
            match sheet_scope {
                Some(scope) if entry.sheet != scope => {
                    log::debug!(
                        "name {} is workbook-scoped to {}, not {}; trying sheet scope",
                        name,
                        entry.sheet,
                        scope
                    );
                }
                _ => {
                    let sheet = self.sheet(&entry.sheet)?;
                    return sheet.region(AddrSpec::A1(entry.span.clone()), None);
                }
            }
        }

        // Then the given sheet's own names.
        if let Some(scope) = sheet_scope {
            if let Some(sheet) = self.inner.sheets.get(scope) {
                if let Some(span) = sheet.inner.names.get(name) {
                    return sheet.region(AddrSpec::A1(span.clone()), None);
                }
            }
            return Err(SurfaceError::NameNotFound(name.to_string()));
        }

        // No scope given: scan every sheet's names in order.
        for sheet_name in self.sheet_names() {
            if let Some(sheet) = self.inner.sheets.get(&sheet_name) {
                if let Some(span) = sheet.inner.names.get(name) {
                    return sheet.region(AddrSpec::A1(span.clone()), None);
                }
            }
        }
        Err(SurfaceError::NameNotFound(name.to_string()))
    }
}

struct SheetInner {
    cells: DashMap<CellAddr, String>,
    names: DashMap<String, String>,
    pivots: Mutex<Vec<MemoryPivot>>,
    autofilter: AtomicBool,
    clipboard: Clipboard,
}

#[derive(Clone)]
pub struct MemorySheet {
    book: String,
    name: String,
    inner: Arc<SheetInner>,
}

impl MemorySheet {
    fn new(book: &str, name: &str, clipboard: Clipboard) -> MemorySheet {
        MemorySheet {
            book: book.to_string(),
            name: name.to_string(),
            inner: Arc::new(SheetInner {
                cells: DashMap::new(),
                names: DashMap::new(),
                pivots: Mutex::new(Vec::new()),
                autofilter: AtomicBool::new(false),
                clipboard,
            }),
        }
    }

    /// Set a cell by A1 address. Empty values clear the cell.
    pub fn set(&self, a1: &str, value: &str) {
        if let Some(addr) = CellAddr::from_a1(a1) {
            self.set_at(addr, value);
        }
    }

    pub fn set_at(&self, addr: CellAddr, value: &str) {
        if value.is_empty() {
            self.inner.cells.remove(&addr);
        } else {
            self.inner.cells.insert(addr, value.to_string());
        }
    }

    pub fn get(&self, a1: &str) -> Option<String> {
        CellAddr::from_a1(a1).and_then(|addr| self.get_at(addr))
    }

    pub fn get_at(&self, addr: CellAddr) -> Option<String> {
        self.inner.cells.get(&addr).map(|v| v.clone())
    }

    /// Define a sheet-scope name referring to a span on this sheet.
    pub fn define_name(&self, name: &str, span: &str) {
        self.inner.names.insert(name.to_string(), span.to_string());
    }

    pub fn add_pivot(&self, name: &str) -> MemoryPivot {
        let pivot = MemoryPivot::new(name);
        self.inner.pivots.lock().unwrap().push(pivot.clone());
        pivot
    }

    pub fn autofilter(&self) -> bool {
        self.inner.autofilter.load(AtomicOrdering::SeqCst)
    }

    pub fn cell_count(&self) -> usize {
        self.inner.cells.len()
    }

    /// Bottom-right extent of the populated area, or None when empty.
    pub fn used_extent(&self) -> Option<CellAddr> {
        let mut max_row = 0;
        let mut max_col = 0;
        for entry in self.inner.cells.iter() {
            max_row = max_row.max(entry.key().row);
            max_col = max_col.max(entry.key().col);
        }
        if max_row == 0 { None } else { Some(CellAddr::new(max_row, max_col)) }
    }

    fn blank_at(&self, addr: CellAddr) -> bool {
        self.get_at(addr).map_or(true, |v| v.trim().is_empty())
    }

    fn bounds_of(&self, spec: &AddrSpec) -> Result<(CellAddr, CellAddr)> {
        let span = match spec {
            AddrSpec::Cell(addr) => SpanSpec::Cells(*addr, *addr),
            AddrSpec::A1(s) => parse_span(s)?,
            AddrSpec::Rows(a, b) => SpanSpec::Rows(*a.min(b), *a.max(b)),
            AddrSpec::Cols(a, b) => SpanSpec::Cols(*a.min(b), *a.max(b)),
        };
        let (start, end) = match span {
            SpanSpec::Cells(a, b) => (a, b),
            SpanSpec::Rows(a, b) => (CellAddr::new(a, 1), CellAddr::new(b, MAX_COLS)),
            SpanSpec::Cols(a, b) => (CellAddr::new(1, a), CellAddr::new(MAX_ROWS, b)),
        };
        if start.row < 1 || start.col < 1 || end.row > MAX_ROWS || end.col > MAX_COLS {
            return Err(SurfaceError::InvalidAddress(format!("{:?}", spec)));
        }
        Ok((start, end))
    }
}

impl SurfaceHandle for MemorySheet {
    fn sheet_ref(&self) -> SheetRef {
        SheetRef::new(&self.book, &self.name)
    }

    fn region(&self, first: AddrSpec, second: Option<AddrSpec>) -> Result<Box<dyn RectHandle>> {
        let (mut start, mut end) = self.bounds_of(&first)?;
        if let Some(spec) = second {
            let (s2, e2) = self.bounds_of(&spec)?;
            start = CellAddr::new(start.row.min(s2.row), start.col.min(s2.col));
            end = CellAddr::new(end.row.max(e2.row), end.col.max(e2.col));
        }
        Ok(Box::new(MemoryRect {
            sheet: self.clone(),
            start,
            end,
        }))
    }

    fn set_autofilter(&self, on: bool) -> Result<()> {
        self.inner.autofilter.store(on, AtomicOrdering::SeqCst);
        Ok(())
    }

    fn pivots(&self) -> Result<Vec<Box<dyn PivotHandle>>> {
        let pivots = self.inner.pivots.lock().unwrap();
        Ok(pivots
            .iter()
            .map(|p| Box::new(p.clone()) as Box<dyn PivotHandle>)
            .collect())
    }
}

/// A rectangle on an in-memory sheet.
pub struct MemoryRect {
    sheet: MemorySheet,
    start: CellAddr,
    end: CellAddr,
}

impl MemoryRect {
    fn height(&self) -> i64 {
        self.end.row - self.start.row + 1
    }

    fn width(&self) -> i64 {
        self.end.col - self.start.col + 1
    }

    /// Whether the rectangle spans every addressable column (a whole-row
    /// span) or every addressable row (a whole-column span).
    fn full_width(&self) -> bool {
        self.start.col == 1 && self.end.col >= MAX_COLS
    }

    fn full_height(&self) -> bool {
        self.start.row == 1 && self.end.row >= MAX_ROWS
    }

    /// End corner clamped to the populated area, for iteration.
    fn clamped_end(&self) -> CellAddr {
        match self.sheet.used_extent() {
            Some(used) => CellAddr::new(self.end.row.min(used.row), self.end.col.min(used.col)),
            None => CellAddr::new(0, 0),
        }
    }
}

fn compare_cells(a: &str, b: &str) -> std::cmp::Ordering {
    // Numbers sort numerically and ahead of text, like a grid application's
    // default sort.
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

fn combine(existing: &str, incoming: &str, op: PasteOp) -> String {
    let (Ok(x), Ok(y)) = (existing.trim().parse::<f64>(), incoming.trim().parse::<f64>()) else {
        return incoming.to_string();
    };
    let result = match op {
        PasteOp::Add => x + y,
        PasteOp::Subtract => x - y,
        PasteOp::Multiply => x * y,
        PasteOp::Divide => x / y,
    };
    if result == result.trunc() && result.abs() < 1e15 {
        format!("{}", result as i64)
    } else {
        format!("{}", result)
    }
}

impl RectHandle for MemoryRect {
    fn top_left(&self) -> CellAddr {
        self.start
    }

    fn last_cell(&self) -> CellAddr {
        self.end
    }

    fn anchor_blank(&self) -> bool {
        self.sheet.blank_at(self.start)
    }

    fn expand(&self, mode: GrowMode) -> Result<Box<dyn RectHandle>> {
        let mut end = self.end;

        if matches!(mode, GrowMode::Down | GrowMode::Table) {
            let mut row = self.start.row;
            while row < MAX_ROWS && !self.sheet.blank_at(CellAddr::new(row + 1, self.start.col)) {
                row += 1;
            }
            end.row = end.row.max(row);
        }

        if matches!(mode, GrowMode::Right | GrowMode::Table) {
            let mut col = self.start.col;
            while col < MAX_COLS && !self.sheet.blank_at(CellAddr::new(self.start.row, col + 1)) {
                col += 1;
            }
            end.col = end.col.max(col);
        }

        Ok(Box::new(MemoryRect {
            sheet: self.sheet.clone(),
            start: self.start,
            end,
        }))
    }

    fn insert(&self, shift: ShiftDir) -> Result<()> {
        let cells = &self.sheet.inner.cells;

        // Collect the cells that move, remove them, then reinsert shifted.
        let moved: Vec<(CellAddr, String)> = match shift {
            ShiftDir::Down => cells
                .iter()
                .filter(|entry| {
                    let addr = entry.key();
                    addr.row >= self.start.row
                        && (self.full_width()
                            || (addr.col >= self.start.col && addr.col <= self.end.col))
                })
                .map(|entry| (*entry.key(), entry.value().clone()))
                .collect(),
            ShiftDir::Right => cells
                .iter()
                .filter(|entry| {
                    let addr = entry.key();
                    addr.col >= self.start.col
                        && (self.full_height()
                            || (addr.row >= self.start.row && addr.row <= self.end.row))
                })
                .map(|entry| (*entry.key(), entry.value().clone()))
                .collect(),
        };

        for (addr, _) in &moved {
            cells.remove(addr);
        }

        for (addr, value) in moved {
            let target = match shift {
                ShiftDir::Down => CellAddr::new(addr.row + self.height(), addr.col),
                ShiftDir::Right => CellAddr::new(addr.row, addr.col + self.width()),
            };
            if target.row <= MAX_ROWS && target.col <= MAX_COLS {
                cells.insert(target, value);
            }
        }
        Ok(())
    }

    fn values(&self) -> Vec<Vec<String>> {
        let end = self.clamped_end();
        let mut rows = Vec::new();
        let mut row = self.start.row;
        while row <= end.row {
            let mut cols = Vec::new();
            let mut col = self.start.col;
            while col <= end.col {
                cols.push(
                    self.sheet
                        .get_at(CellAddr::new(row, col))
                        .unwrap_or_default(),
                );
                col += 1;
            }
            rows.push(cols);
            row += 1;
        }
        rows
    }

    fn write_values(&self, rows: &[Vec<String>]) -> Result<()> {
        for (i, cols) in rows.iter().enumerate() {
            for (j, value) in cols.iter().enumerate() {
                let addr = CellAddr::new(self.start.row + i as i64, self.start.col + j as i64);
                if addr.row <= MAX_ROWS && addr.col <= MAX_COLS {
                    self.sheet.set_at(addr, value);
                }
            }
        }
        Ok(())
    }

    fn copy(&self, destination: Option<&dyn RectHandle>) -> Result<()> {
        match destination {
            Some(dst) => dst.write_values(&self.values()),
            None => {
                *self.sheet.inner.clipboard.lock().unwrap() = Some(self.values());
                Ok(())
            }
        }
    }

    fn paste_special(
        &self,
        paste: PasteMode,
        operation: Option<PasteOp>,
        skip_blanks: bool,
        transpose: bool,
    ) -> Result<()> {
        let clip = self
            .sheet
            .inner
            .clipboard
            .lock()
            .unwrap()
            .clone()
            .ok_or(SurfaceError::ClipboardEmpty)?;

        // Presentation-only pastes have nothing to transfer in a value grid.
        if !paste.carries_values() {
            return Ok(());
        }

        let data: Vec<Vec<String>> = if transpose {
            let rows = clip.len();
            let cols = clip.iter().map(|r| r.len()).max().unwrap_or(0);
            (0..cols)
                .map(|c| {
                    (0..rows)
                        .map(|r| clip[r].get(c).cloned().unwrap_or_default())
                        .collect()
                })
                .collect()
        } else {
            clip
        };

        for (i, cols) in data.iter().enumerate() {
            for (j, value) in cols.iter().enumerate() {
                if skip_blanks && value.trim().is_empty() {
                    continue;
                }
                let addr = CellAddr::new(self.start.row + i as i64, self.start.col + j as i64);
                if addr.row > MAX_ROWS || addr.col > MAX_COLS {
                    continue;
                }
                let next = match operation {
                    Some(op) => {
                        let existing = self.sheet.get_at(addr).unwrap_or_default();
                        combine(&existing, value, op)
                    }
                    None => value.clone(),
                };
                self.sheet.set_at(addr, &next);
            }
        }
        Ok(())
    }

    fn sort(
        &self,
        key: Option<&dyn RectHandle>,
        order: SortOrder,
        orientation: SortOrientation,
    ) -> Result<()> {
        let end = self.clamped_end();
        if end.row < self.start.row || end.col < self.start.col {
            return Ok(());
        }

        match orientation {
            SortOrientation::Columns => {
                // Sort rows by a key column.
                let key_col = key
                    .map(|k| k.top_left().col)
                    .unwrap_or(self.start.col)
                    .clamp(self.start.col, end.col);
                let mut rows: Vec<Vec<String>> = (self.start.row..=end.row)
                    .map(|row| {
                        (self.start.col..=end.col)
                            .map(|col| self.sheet.get_at(CellAddr::new(row, col)).unwrap_or_default())
                            .collect()
                    })
                    .collect();
                let key_idx = (key_col - self.start.col) as usize;
                rows.sort_by(|a, b| {
                    let cmp = compare_cells(&a[key_idx], &b[key_idx]);
                    match order {
                        SortOrder::Ascending => cmp,
                        SortOrder::Descending => cmp.reverse(),
                    }
                });
                for (i, cols) in rows.iter().enumerate() {
                    for (j, value) in cols.iter().enumerate() {
                        self.sheet.set_at(
                            CellAddr::new(self.start.row + i as i64, self.start.col + j as i64),
                            value,
                        );
                    }
                }
            }
            SortOrientation::Rows => {
                // Sort columns by a key row.
                let key_row = key
                    .map(|k| k.top_left().row)
                    .unwrap_or(self.start.row)
                    .clamp(self.start.row, end.row);
                let mut cols: Vec<Vec<String>> = (self.start.col..=end.col)
                    .map(|col| {
                        (self.start.row..=end.row)
                            .map(|row| self.sheet.get_at(CellAddr::new(row, col)).unwrap_or_default())
                            .collect()
                    })
                    .collect();
                let key_idx = (key_row - self.start.row) as usize;
                cols.sort_by(|a, b| {
                    let cmp = compare_cells(&a[key_idx], &b[key_idx]);
                    match order {
                        SortOrder::Ascending => cmp,
                        SortOrder::Descending => cmp.reverse(),
                    }
                });
                for (j, rows) in cols.iter().enumerate() {
                    for (i, value) in rows.iter().enumerate() {
                        self.sheet.set_at(
                            CellAddr::new(self.start.row + i as i64, self.start.col + j as i64),
                            value,
                        );
                    }
                }
            }
        }
        Ok(())
    }

    fn address(&self) -> String {
        if self.start == self.end {
            self.start.to_a1()
        } else {
            format!("{}:{}", self.start.to_a1(), self.end.to_a1())
        }
    }
}

struct PivotInner {
    refreshes: AtomicUsize,
    hidden: DashMap<(String, String), ()>,
}

/// Pivot table stub: tracks refreshes and item visibility.
#[derive(Clone)]
pub struct MemoryPivot {
    name: String,
    inner: Arc<PivotInner>,
}

impl MemoryPivot {
    fn new(name: &str) -> MemoryPivot {
        MemoryPivot {
            name: name.to_string(),
            inner: Arc::new(PivotInner {
                refreshes: AtomicUsize::new(0),
                hidden: DashMap::new(),
            }),
        }
    }

    pub fn refresh_count(&self) -> usize {
        self.inner.refreshes.load(AtomicOrdering::SeqCst)
    }

    pub fn item_visible(&self, field: &str, item: &str) -> bool {
        !self
            .inner
            .hidden
            .contains_key(&(field.to_string(), item.to_string()))
    }
}

impl PivotHandle for MemoryPivot {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn refresh(&self) -> Result<()> {
        self.inner.refreshes.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(())
    }

    fn set_item_visible(&self, field: &str, item: &str, visible: bool) -> Result<()> {
        let key = (field.to_string(), item.to_string());
        if visible {
            self.inner.hidden.remove(&key);
        } else {
            self.inner.hidden.insert(key, ());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet_with(cells: &[(&str, &str)]) -> (MemoryApp, MemorySheet) {
        let app = MemoryApp::new();
        let book = app.add_workbook("book.xlsx");
        let sheet = book.add_sheet("S1");
        for (a1, value) in cells {
            sheet.set(a1, value);
        }
        (app, sheet)
    }

    #[test]
    fn test_resolve_by_name() {
        let (app, sheet) = sheet_with(&[("A1", "x")]);
        let handle = app.resolve(&sheet.sheet_ref()).unwrap();
        assert_eq!(handle.sheet_ref(), SheetRef::new("book.xlsx", "S1"));

        assert!(app.resolve(&SheetRef::new("book.xlsx", "missing")).is_err());
        assert!(app.resolve(&SheetRef::new("missing.xlsx", "S1")).is_err());
    }

    #[test]
    fn test_region_forms() {
        let (_app, sheet) = sheet_with(&[]);

        let rect = sheet.region(AddrSpec::from("B2:C4"), None).unwrap();
        assert_eq!(rect.top_left(), CellAddr::new(2, 2));
        assert_eq!(rect.last_cell(), CellAddr::new(4, 3));

        let rect = sheet
            .region(AddrSpec::from((2, 2)), Some(AddrSpec::from((4, 3))))
            .unwrap();
        assert_eq!(rect.address(), "B2:C4");

        let rect = sheet.region(AddrSpec::Rows(3, 7), None).unwrap();
        assert_eq!(rect.top_left(), CellAddr::new(3, 1));
        assert_eq!(rect.last_cell().col, MAX_COLS);

        let rect = sheet.region(AddrSpec::from("A:C"), None).unwrap();
        assert_eq!(rect.last_cell().row, MAX_ROWS);
        assert_eq!(rect.last_cell().col, 3);
    }

    #[test]
    fn test_expand_scans_contiguous_content() {
        let (_app, sheet) = sheet_with(&[
            ("B2", "h1"),
            ("C2", "h2"),
            ("B3", "1"),
            ("C3", "2"),
            ("B4", "3"),
            // B5 blank, B6 isolated
            ("B6", "stray"),
        ]);

        let anchor = sheet.region(AddrSpec::from("B2"), None).unwrap();

        let down = anchor.expand(GrowMode::Down).unwrap();
        assert_eq!(down.last_cell(), CellAddr::new(4, 2));

        let right = anchor.expand(GrowMode::Right).unwrap();
        assert_eq!(right.last_cell(), CellAddr::new(2, 3));

        let table = anchor.expand(GrowMode::Table).unwrap();
        assert_eq!(table.last_cell(), CellAddr::new(4, 3));
    }

    #[test]
    fn test_insert_partial_shifts_only_span() {
        let (_app, sheet) = sheet_with(&[("B2", "moves"), ("B5", "also"), ("D2", "stays")]);

        // Insert B1:B2 shifting down: column B content at/below row 1 moves
        // down two rows, column D is untouched.
        let rect = sheet.region(AddrSpec::from("B1:B2"), None).unwrap();
        rect.insert(ShiftDir::Down).unwrap();

        assert_eq!(sheet.get("B4").unwrap(), "moves");
        assert_eq!(sheet.get("B7").unwrap(), "also");
        assert_eq!(sheet.get("D2").unwrap(), "stays");
        assert!(sheet.get("B2").is_none());
    }

    #[test]
    fn test_insert_whole_columns() {
        let (_app, sheet) = sheet_with(&[("A1", "left"), ("B1", "b"), ("C3", "c")]);

        let rect = sheet.region(AddrSpec::from("B:C"), None).unwrap();
        rect.insert(ShiftDir::Right).unwrap();

        assert_eq!(sheet.get("A1").unwrap(), "left");
        assert_eq!(sheet.get("D1").unwrap(), "b");
        assert_eq!(sheet.get("E3").unwrap(), "c");
    }

    #[test]
    fn test_values_and_write_values() {
        let (_app, sheet) = sheet_with(&[("A1", "1"), ("B1", "2"), ("A2", "3")]);

        let rect = sheet.region(AddrSpec::from("A1:B2"), None).unwrap();
        assert_eq!(
            rect.values(),
            vec![
                vec!["1".to_string(), "2".to_string()],
                vec!["3".to_string(), "".to_string()],
            ]
        );

        rect.write_values(&[vec!["x".to_string(), "y".to_string()]])
            .unwrap();
        assert_eq!(sheet.get("A1").unwrap(), "x");
        assert_eq!(sheet.get("B1").unwrap(), "y");
        assert_eq!(sheet.get("A2").unwrap(), "3");
    }

    #[test]
    fn test_copy_paste_special_values() {
        let (_app, sheet) = sheet_with(&[("A1", "10"), ("A2", "20")]);

        let src = sheet.region(AddrSpec::from("A1:A2"), None).unwrap();
        src.copy(None).unwrap();

        let dst = sheet.region(AddrSpec::from("C1"), None).unwrap();
        dst.paste_special(PasteMode::Values, None, false, false)
            .unwrap();
        assert_eq!(sheet.get("C1").unwrap(), "10");
        assert_eq!(sheet.get("C2").unwrap(), "20");

        // Paste again with an Add operation.
        dst.paste_special(PasteMode::Values, Some(PasteOp::Add), false, false)
            .unwrap();
        assert_eq!(sheet.get("C1").unwrap(), "20");
        assert_eq!(sheet.get("C2").unwrap(), "40");
    }

    #[test]
    fn test_paste_special_transpose_and_skip_blanks() {
        let (_app, sheet) = sheet_with(&[("A1", "1"), ("B1", ""), ("C1", "3"), ("E1", "keep")]);

        let src = sheet.region(AddrSpec::from("A1:C1"), None).unwrap();
        src.copy(None).unwrap();

        let dst = sheet.region(AddrSpec::from("E1"), None).unwrap();
        dst.paste_special(PasteMode::Values, None, true, true).unwrap();

        assert_eq!(sheet.get("E1").unwrap(), "1");
        // Blank skipped: prior content survives... row 2 had nothing.
        assert!(sheet.get("E2").is_none());
        assert_eq!(sheet.get("E3").unwrap(), "3");
    }

    #[test]
    fn test_paste_special_empty_clipboard() {
        let (_app, sheet) = sheet_with(&[]);
        let rect = sheet.region(AddrSpec::from("A1"), None).unwrap();
        assert!(matches!(
            rect.paste_special(PasteMode::Values, None, false, false),
            Err(SurfaceError::ClipboardEmpty)
        ));
    }

    #[test]
    fn test_sort_rows_by_key_column() {
        let (_app, sheet) = sheet_with(&[
            ("A1", "banana"),
            ("B1", "3"),
            ("A2", "apple"),
            ("B2", "1"),
            ("A3", "cherry"),
            ("B3", "20"),
        ]);

        let rect = sheet.region(AddrSpec::from("A1:B3"), None).unwrap();
        let key = sheet.region(AddrSpec::from("B1:B3"), None).unwrap();
        rect.sort(Some(key.as_ref()), SortOrder::Ascending, SortOrientation::Columns)
            .unwrap();

        // Numeric key: 1, 3, 20 (not lexicographic "1", "20", "3").
        assert_eq!(sheet.get("A1").unwrap(), "apple");
        assert_eq!(sheet.get("A2").unwrap(), "banana");
        assert_eq!(sheet.get("A3").unwrap(), "cherry");
        assert_eq!(sheet.get("B3").unwrap(), "20");
    }

    #[test]
    fn test_sort_descending_default_key() {
        let (_app, sheet) = sheet_with(&[("A1", "1"), ("A2", "3"), ("A3", "2")]);

        let rect = sheet.region(AddrSpec::from("A1:A3"), None).unwrap();
        rect.sort(None, SortOrder::Descending, SortOrientation::Columns)
            .unwrap();

        assert_eq!(sheet.get("A1").unwrap(), "3");
        assert_eq!(sheet.get("A2").unwrap(), "2");
        assert_eq!(sheet.get("A3").unwrap(), "1");
    }

    #[test]
    fn test_named_lookup_precedence() {
        let app = MemoryApp::new();
        let book = app.add_workbook("book.xlsx");
        book.add_sheet("S1");
        let s2 = book.add_sheet("S2");

        book.define_name("Header", "S1", "A1:C1");
        s2.define_name("Header", "B2:D2");
        s2.define_name("Local", "E5");

        // Workbook scope wins without a filter.
        let rect = book.named("Header", None).unwrap();
        assert_eq!(rect.address(), "A1:C1");

        // Sheet filter diverts to the sheet-scoped name.
        let rect = book.named("Header", Some("S2")).unwrap();
        assert_eq!(rect.address(), "B2:D2");

        // Scan across sheets when unscoped.
        let rect = book.named("Local", None).unwrap();
        assert_eq!(rect.address(), "E5");

        assert!(book.named("Missing", None).is_err());
    }

    #[test]
    fn test_pivot_stub() {
        let (_app, sheet) = sheet_with(&[]);
        let pivot = sheet.add_pivot("pvt_sales");

        assert_eq!(pivot.refresh_count(), 0);
        pivot.refresh().unwrap();
        pivot.refresh().unwrap();
        assert_eq!(pivot.refresh_count(), 2);

        assert!(pivot.item_visible("Region", "East"));
        pivot.set_item_visible("Region", "East", false).unwrap();
        assert!(!pivot.item_visible("Region", "East"));
        pivot.set_item_visible("Region", "East", true).unwrap();
        assert!(pivot.item_visible("Region", "East"));
    }

    #[test]
    fn test_app_control_state() {
        let app = MemoryApp::new();
        assert_eq!(app.state(), AppState::default());
        app.apply(AppState::quiet());
        assert!(!app.state().screen_updating);
    }
}
