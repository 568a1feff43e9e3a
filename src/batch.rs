//! Scoped automation-state control.
//!
//! Surface mutations run much faster with the host application's UI feedback
//! suspended. [`QuietScope`] snapshots the application state, applies the
//! quiet profile, and restores the snapshot when dropped, on every exit path.

use sheetspan_surface::{AppControl, AppState};

/// RAII guard over the host application's automation-state toggles.
///
/// ```
/// use sheetspan::QuietScope;
/// use sheetspan_surface::{AppControl, MemoryApp};
///
/// let app = MemoryApp::new();
/// {
///     let _quiet = QuietScope::new(&app);
///     // batch of surface mutations
/// }
/// assert!(app.state().screen_updating);
/// ```
pub struct QuietScope<'a> {
    app: &'a dyn AppControl,
    prior: AppState,
}

impl<'a> QuietScope<'a> {
    /// Apply the quiet profile, remembering the state to restore.
    pub fn new(app: &'a dyn AppControl) -> QuietScope<'a> {
        let prior = app.state();
        app.apply(AppState::quiet());
        QuietScope { app, prior }
    }

    /// The state that will be restored on drop.
    pub fn prior(&self) -> AppState {
        self.prior
    }
}

impl Drop for QuietScope<'_> {
    fn drop(&mut self) {
        self.app.apply(self.prior);
    }
}
