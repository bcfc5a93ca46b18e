//! Visibility of the console's modal overlay.

/// Whether any overlay is open. Owned by the session instead of global state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverlaySession {
    open: bool,
}

impl OverlaySession {
    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close_all(&mut self) {
        self.open = false;
    }

    pub fn is_any_open(&self) -> bool {
        self.open
    }
}
