use parking_lot::Mutex;
use tracing::{debug, warn};

use super::LifecycleCell;
use crate::host::{ToolbarMount, ToolbarView};

#[derive(Debug, Default)]
struct Handoff {
    mount: Option<ToolbarMount>,
    pending: Option<ToolbarView>,
    placed: bool,
}

impl Handoff {
    fn place(&mut self, gate: &LifecycleCell) -> bool {
        if self.placed || !gate.is_alive() {
            return false;
        }
        let Some(mount) = self.mount.as_ref() else {
            return false;
        };
        let Some(view) = self.pending.take() else {
            return false;
        };
        debug!(mount = mount.id(), owner = view.owner(), "placing toolbar");
        mount.append_child(view);
        self.placed = true;
        true
    }
}

/// Meets the toolbar mount and the constructed toolbar, in either order.
///
/// Whichever side arrives second performs the append. The toolbar is placed
/// at most once, and never after teardown started.
#[derive(Debug, Default)]
pub(crate) struct ToolbarHandoff {
    inner: Mutex<Handoff>,
}

impl ToolbarHandoff {
    pub(crate) fn provide_mount(&self, mount: ToolbarMount, gate: &LifecycleCell) -> bool {
        let mut inner = self.inner.lock();
        if inner.placed {
            warn!(mount = mount.id(), "toolbar already placed; ignoring new mount");
            return false;
        }
        inner.mount = Some(mount);
        inner.place(gate)
    }

    pub(crate) fn provide_view(&self, view: ToolbarView, gate: &LifecycleCell) -> bool {
        let mut inner = self.inner.lock();
        inner.pending = Some(view);
        let placed = inner.place(gate);
        if !placed && inner.mount.is_none() {
            debug!("toolbar mount not available yet; buffering toolbar");
        }
        placed
    }

    pub(crate) fn is_placed(&self) -> bool {
        self.inner.lock().placed
    }
}
