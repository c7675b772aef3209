use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// Where a controller is in its create → ready → destroy cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    #[default]
    Uninitialized,
    Creating,
    Ready,
    Destroying,
    Destroyed,
}

impl LifecycleState {
    /// False once teardown has started.
    pub const fn is_alive(self) -> bool {
        !matches!(self, Self::Destroying | Self::Destroyed)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Creating => "creating",
            Self::Ready => "ready",
            Self::Destroying => "destroying",
            Self::Destroyed => "destroyed",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The single authoritative lifecycle state, shared by the controller, the
/// construction continuation and every event-bridge delivery.
#[derive(Debug, Clone, Default)]
pub struct LifecycleCell(Arc<Mutex<LifecycleState>>);

impl LifecycleCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> LifecycleState {
        *self.0.lock()
    }

    pub fn is_alive(&self) -> bool {
        self.get().is_alive()
    }

    pub fn set(&self, state: LifecycleState) {
        *self.0.lock() = state;
    }

    /// Move `from` → `to` atomically. Returns false if the state was not `from`.
    pub fn transition(&self, from: LifecycleState, to: LifecycleState) -> bool {
        let mut state = self.0.lock();
        if *state != from {
            return false;
        }
        *state = to;
        true
    }

    /// Run `f` with the state locked.
    ///
    /// Other locks taken inside `f` must always be taken after this one.
    pub fn update<R>(&self, f: impl FnOnce(&mut LifecycleState) -> R) -> R {
        f(&mut self.0.lock())
    }
}
