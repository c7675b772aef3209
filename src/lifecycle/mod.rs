//! The mount → ready → unmount state machine for one editor instance.
//!
//! The host drives a [`EditorLifecycleController`] synchronously (mount,
//! prop updates, unmount) while construction finishes on the tokio runtime.
//! Every continuation re-reads the shared [`LifecycleState`] before it acts,
//! so an unmount that lands while construction is in flight wins: the late
//! instance is destroyed and nothing reaches the host.

mod state;
mod toolbar;

pub use state::{LifecycleCell, LifecycleState};

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::bridge::{EventBridge, GatedCallbacks, HostCallbacks};
use crate::classify::ContentClassifier;
use crate::config::ComponentArgs;
use crate::debounce::ChangeDebouncer;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::editor::{Editor, EditorConstructor, EditorError};
use crate::factory;
use crate::host::{HostElement, ToolbarMount};

use toolbar::ToolbarHandoff;

/// Owns at most one editor instance for the lifetime of one mount.
#[derive(Debug)]
pub struct EditorLifecycleController {
    shared: Arc<Shared>,
}

struct Shared {
    args: ComponentArgs,
    constructor: Arc<dyn EditorConstructor>,
    host: GatedCallbacks,
    diagnostics: Arc<dyn DiagnosticSink>,
    state: LifecycleCell,
    editor: Mutex<Option<Arc<dyn Editor>>>,
    bridge: Mutex<Option<EventBridge>>,
    debouncer: Mutex<Option<Arc<ChangeDebouncer>>>,
    toolbar: ToolbarHandoff,
}

impl std::fmt::Debug for Shared {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shared")
            .field("constructor", &self.constructor.name())
            .field("state", &self.state.get())
            .finish_non_exhaustive()
    }
}

impl EditorLifecycleController {
    /// A controller that reports construction failures through `tracing`.
    pub fn new(args: ComponentArgs, callbacks: HostCallbacks) -> Self {
        Self::with_diagnostics(args, callbacks, Arc::new(TracingSink))
    }

    pub fn with_diagnostics(
        args: ComponentArgs,
        callbacks: HostCallbacks,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        let constructor = factory::resolve(args.editor.as_ref());
        let state = LifecycleCell::new();
        Self {
            shared: Arc::new(Shared {
                args,
                constructor,
                host: GatedCallbacks::new(callbacks, state.clone()),
                diagnostics,
                state,
                editor: Mutex::new(None),
                bridge: Mutex::new(None),
                debouncer: Mutex::new(None),
                toolbar: ToolbarHandoff::default(),
            }),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.shared.state.get()
    }

    /// The constructor this controller resolved its variant to.
    pub fn constructor(&self) -> &Arc<dyn EditorConstructor> {
        &self.shared.constructor
    }

    /// The live instance, once Ready.
    pub fn editor(&self) -> Option<Arc<dyn Editor>> {
        self.shared.live_editor()
    }

    /// Whether the toolbar has been placed into the host's mount.
    pub fn toolbar_placed(&self) -> bool {
        self.shared.toolbar.is_placed()
    }

    /// Start constructing the editor against `element`.
    ///
    /// Only the first mount of a controller does anything; later calls are
    /// ignored and return `None`. The returned handle resolves once the
    /// construction continuation has finished, whatever its outcome.
    pub fn mount(&self, element: HostElement) -> Option<JoinHandle<()>> {
        let shared = &self.shared;
        if !shared
            .state
            .transition(LifecycleState::Uninitialized, LifecycleState::Creating)
        {
            warn!(state = %shared.state.get(), "mount ignored: controller already used");
            return None;
        }
        let Ok(runtime) = Handle::try_current() else {
            shared
                .diagnostics
                .construction_failed(shared.constructor.name(), &EditorError::NoRuntime);
            shared.state.set(LifecycleState::Destroyed);
            return None;
        };
        let debouncer = Arc::new(ChangeDebouncer::new(shared.args.debounce(), runtime.clone()));
        *shared.debouncer.lock() = Some(Arc::clone(&debouncer));

        debug!(editor = shared.constructor.name(), element = element.id(), "creating editor");
        crate::eventlog::log_event(
            "lifecycle.creating",
            format!("editor={} element={}", shared.constructor.name(), element.id()),
        );
        let shared = Arc::clone(shared);
        Some(runtime.spawn(async move { shared.construct(element, debouncer).await }))
    }

    /// Hand over the element the detached toolbar goes into.
    ///
    /// May arrive before or after construction completes.
    pub fn set_toolbar_mount(&self, mount: ToolbarMount) {
        self.shared.toolbar.provide_mount(mount, &self.shared.state);
    }

    /// Apply the host's disabled prop. Ignored unless Ready.
    pub fn set_disabled(&self, disabled: bool) {
        match self.shared.live_editor() {
            Some(editor) => editor.set_read_only(disabled),
            None => debug!(disabled, state = %self.state(), "disabled change ignored: not ready"),
        }
    }

    /// Push a new value from the host. Ignored unless Ready, and when the
    /// editor already holds exactly this content.
    pub fn set_value(&self, value: &str) {
        let Some(editor) = self.shared.live_editor() else {
            debug!(state = %self.state(), "value change ignored: not ready");
            return;
        };
        if editor.get_data() != value {
            editor.set_data(value);
        }
    }

    /// Begin teardown. Idempotent.
    ///
    /// The state moves to Destroying before this returns, whether or not
    /// construction is still pending.
    pub fn unmount(&self) {
        let shared = &self.shared;
        let previous = shared.state.update(|state| {
            let previous = *state;
            match previous {
                LifecycleState::Uninitialized => *state = LifecycleState::Destroyed,
                LifecycleState::Creating | LifecycleState::Ready => {
                    *state = LifecycleState::Destroying;
                }
                LifecycleState::Destroying | LifecycleState::Destroyed => {}
            }
            previous
        });
        match previous {
            LifecycleState::Ready => shared.teardown(),
            LifecycleState::Creating => {
                debug!("unmounted during construction; teardown deferred");
            }
            LifecycleState::Uninitialized => debug!("unmounted before mount"),
            LifecycleState::Destroying | LifecycleState::Destroyed => {
                debug!(state = %previous, "unmount ignored: already torn down");
            }
        }
        crate::eventlog::log_event("lifecycle.unmount", format!("from={previous}"));
    }
}

impl Drop for EditorLifecycleController {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl Shared {
    fn live_editor(&self) -> Option<Arc<dyn Editor>> {
        self.state.update(|state| {
            if *state == LifecycleState::Ready {
                self.editor.lock().clone()
            } else {
                None
            }
        })
    }

    async fn construct(self: Arc<Self>, element: HostElement, debouncer: Arc<ChangeDebouncer>) {
        // A panic while creating, sync or async, is a construction failure.
        let constructor = Arc::clone(&self.constructor);
        let options = self.args.options.clone();
        let create = async move { constructor.create(element, options).await };
        let creation = AssertUnwindSafe(create)
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(EditorError::Construction(panic_message(&*panic))));
        let editor = match creation {
            Ok(editor) => editor,
            Err(error) => {
                self.diagnostics
                    .construction_failed(self.constructor.name(), &error);
                self.settle_destroyed();
                return;
            }
        };

        let adopted = self.state.update(|state| {
            if *state != LifecycleState::Creating {
                return false;
            }
            *self.editor.lock() = Some(Arc::clone(&editor));
            *state = LifecycleState::Ready;
            true
        });
        if !adopted {
            debug!("construction resolved after unmount; destroying late instance");
            editor.destroy();
            self.settle_destroyed();
            return;
        }
        crate::eventlog::log_event("lifecycle.ready", self.constructor.name());

        if self.constructor.requires_toolbar_mount() {
            match editor.toolbar() {
                Some(view) => {
                    self.toolbar.provide_view(view, &self.state);
                }
                None => warn!(
                    editor = self.constructor.name(),
                    "editor needs a toolbar mount but exposes no toolbar"
                ),
            }
        }
        self.initialize(&editor, debouncer);
    }

    fn initialize(&self, editor: &Arc<dyn Editor>, debouncer: Arc<ChangeDebouncer>) {
        ContentClassifier::new(self.args.content_class()).apply(editor.as_ref());

        let value = self.args.value.as_deref().unwrap_or_default();
        if !value.is_empty() {
            editor.set_data(value);
        }
        if self.args.disabled {
            editor.set_read_only(true);
        }

        // The editor may have rewritten the value; tell the host what it holds.
        let data = editor.get_data();
        if data != value {
            self.host.input(data);
        }

        *self.bridge.lock() = Some(EventBridge::attach(editor, &self.host, debouncer));
        if !self.state.is_alive() {
            if let Some(bridge) = self.bridge.lock().take() {
                bridge.detach();
            }
            return;
        }
        self.host.ready(Arc::clone(editor));
    }

    fn teardown(&self) {
        if let Some(bridge) = self.bridge.lock().take() {
            bridge.detach();
        }
        if let Some(editor) = self.editor.lock().take() {
            editor.destroy();
        }
        self.settle_destroyed();
    }

    fn settle_destroyed(&self) {
        if let Some(debouncer) = self.debouncer.lock().take() {
            debouncer.cancel();
        }
        self.state.set(LifecycleState::Destroyed);
        crate::eventlog::log_event("lifecycle.destroyed", self.constructor.name());
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    let detail = panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown cause");
    format!("constructor panicked: {detail}")
}
