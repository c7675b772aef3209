use parking_lot::Mutex;

use super::Emitter;

/// Tracks whether the editor UI currently holds focus.
///
/// Emits the new value only when it actually changes.
#[derive(Debug, Default)]
pub struct FocusTracker {
    focused: Mutex<bool>,
    changes: Emitter<bool>,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_focused(&self) -> bool {
        *self.focused.lock()
    }

    pub fn set_focused(&self, focused: bool) {
        {
            let mut current = self.focused.lock();
            if *current == focused {
                return;
            }
            *current = focused;
        }
        self.changes.emit(&focused);
    }

    pub const fn changes(&self) -> &Emitter<bool> {
        &self.changes
    }
}
