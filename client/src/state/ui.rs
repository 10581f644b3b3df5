//! Local UI chrome state.
//!
//! Kept apart from auth and review data so presentation toggles never
//! trigger data reloads.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

/// Transient presentation flags shared across pages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    /// Grade/subject menu overlay on the home page.
    pub menu_open: bool,
    /// Last blocking notice shown to the user, e.g. a failed delete.
    pub notice: Option<String>,
}

impl UiState {
    pub fn open_menu(&mut self) {
        self.menu_open = true;
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}
