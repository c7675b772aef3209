//! Re-emits editor-internal events as host callbacks.
//!
//! Every delivery checks the lifecycle state at the moment it fires, not when
//! the subscription was made, so a listener that outlives unmount stays
//! silent until it is detached.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::trace;

use crate::debounce::ChangeDebouncer;
use crate::editor::{Editor, FILE_REPOSITORY, FileRepository, ListenerId, UploadLoader};
use crate::lifecycle::LifecycleCell;

pub type ReadyCallback = Arc<dyn Fn(Arc<dyn Editor>) + Send + Sync>;
pub type InputCallback = Arc<dyn Fn(String) + Send + Sync>;
pub type SignalCallback = Arc<dyn Fn() + Send + Sync>;
pub type UploadCallback = Arc<dyn Fn(Value) + Send + Sync>;

/// Callbacks the host may supply. All optional.
#[derive(Clone, Default)]
pub struct HostCallbacks {
    on_ready: Option<ReadyCallback>,
    on_input: Option<InputCallback>,
    on_focus: Option<SignalCallback>,
    on_blur: Option<SignalCallback>,
    on_upload: Option<UploadCallback>,
}

impl HostCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_ready(mut self, callback: impl Fn(Arc<dyn Editor>) + Send + Sync + 'static) -> Self {
        self.on_ready = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub fn on_input(mut self, callback: impl Fn(String) + Send + Sync + 'static) -> Self {
        self.on_input = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub fn on_focus(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_focus = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub fn on_blur(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_blur = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub fn on_upload(mut self, callback: impl Fn(Value) + Send + Sync + 'static) -> Self {
        self.on_upload = Some(Arc::new(callback));
        self
    }
}

impl fmt::Debug for HostCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostCallbacks")
            .field("on_ready", &self.on_ready.is_some())
            .field("on_input", &self.on_input.is_some())
            .field("on_focus", &self.on_focus.is_some())
            .field("on_blur", &self.on_blur.is_some())
            .field("on_upload", &self.on_upload.is_some())
            .finish()
    }
}

/// Host callbacks behind the lifecycle gate.
#[derive(Debug, Clone)]
pub(crate) struct GatedCallbacks {
    callbacks: HostCallbacks,
    gate: LifecycleCell,
}

impl GatedCallbacks {
    pub(crate) const fn new(callbacks: HostCallbacks, gate: LifecycleCell) -> Self {
        Self { callbacks, gate }
    }

    fn open(&self, event: &str) -> bool {
        let alive = self.gate.is_alive();
        if !alive {
            trace!(event, "dropping host callback after teardown");
        }
        alive
    }

    pub(crate) fn ready(&self, editor: Arc<dyn Editor>) {
        if let Some(callback) = self.callbacks.on_ready.as_ref().filter(|_| self.open("ready")) {
            callback(editor);
        }
    }

    pub(crate) fn input(&self, value: String) {
        if let Some(callback) = self.callbacks.on_input.as_ref().filter(|_| self.open("input")) {
            callback(value);
        }
    }

    fn focus(&self) {
        if let Some(callback) = self.callbacks.on_focus.as_ref().filter(|_| self.open("focus")) {
            callback();
        }
    }

    fn blur(&self) {
        if let Some(callback) = self.callbacks.on_blur.as_ref().filter(|_| self.open("blur")) {
            callback();
        }
    }

    fn upload(&self, response: Value) {
        if let Some(callback) = self.callbacks.on_upload.as_ref().filter(|_| self.open("upload")) {
            callback(response);
        }
    }
}

type LoaderSubscriptions = Arc<Mutex<Vec<(Arc<UploadLoader>, ListenerId)>>>;

#[derive(Default)]
struct Subscriptions {
    document: Option<ListenerId>,
    focus: Option<ListenerId>,
    loader_created: Option<(Arc<FileRepository>, ListenerId)>,
    loaders: LoaderSubscriptions,
}

/// The set of listeners one controller holds on one editor.
pub struct EventBridge {
    editor: Arc<dyn Editor>,
    subscriptions: Mutex<Option<Subscriptions>>,
}

impl EventBridge {
    pub(crate) fn attach(
        editor: &Arc<dyn Editor>,
        host: &GatedCallbacks,
        debouncer: Arc<ChangeDebouncer>,
    ) -> Self {
        let loaders = LoaderSubscriptions::default();
        let subscriptions = Subscriptions {
            document: Some(listen_to_changes(editor, host.clone(), debouncer)),
            focus: Some(listen_to_focus(editor.as_ref(), host.clone())),
            loader_created: listen_to_upload(editor.as_ref(), host.clone(), Arc::clone(&loaders)),
            loaders,
        };
        Self {
            editor: Arc::clone(editor),
            subscriptions: Mutex::new(Some(subscriptions)),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscriptions.lock().is_some()
    }

    /// Whether the upload subscription was made.
    pub fn listens_for_uploads(&self) -> bool {
        self.subscriptions
            .lock()
            .as_ref()
            .is_some_and(|subs| subs.loader_created.is_some())
    }

    /// Remove every listener this bridge registered. Idempotent.
    pub fn detach(&self) {
        let Some(subscriptions) = self.subscriptions.lock().take() else {
            return;
        };
        if let Some(id) = subscriptions.document {
            self.editor.document_changes().off(id);
        }
        if let Some(id) = subscriptions.focus {
            self.editor.focus_tracker().changes().off(id);
        }
        if let Some((repository, id)) = subscriptions.loader_created {
            repository.loader_created().off(id);
        }
        for (loader, id) in subscriptions.loaders.lock().drain(..) {
            loader.response_changes().off(id);
        }
    }
}

impl fmt::Debug for EventBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBridge")
            .field("attached", &self.is_attached())
            .finish_non_exhaustive()
    }
}

fn listen_to_changes(
    editor: &Arc<dyn Editor>,
    host: GatedCallbacks,
    debouncer: Arc<ChangeDebouncer>,
) -> ListenerId {
    let weak = Arc::downgrade(editor);
    editor.document_changes().on(move |()| {
        if !host.gate.is_alive() {
            return;
        }
        let weak = weak.clone();
        let host = host.clone();
        debouncer.notify(move || {
            if let Some(editor) = weak.upgrade() {
                host.input(editor.get_data());
            }
        });
    })
}

fn listen_to_focus(editor: &dyn Editor, host: GatedCallbacks) -> ListenerId {
    editor.focus_tracker().changes().on(move |focused| {
        if *focused {
            host.focus();
        } else {
            host.blur();
        }
    })
}

fn listen_to_upload(
    editor: &dyn Editor,
    host: GatedCallbacks,
    loaders: LoaderSubscriptions,
) -> Option<(Arc<FileRepository>, ListenerId)> {
    if !editor.plugins().has(FILE_REPOSITORY) {
        return None;
    }
    let repository = editor.plugins().file_repository()?;
    let id = repository.loader_created().on(move |loader: &Arc<UploadLoader>| {
        let host = host.clone();
        let id = loader.response_changes().on(move |response| {
            if let Some(response) = response.as_ref().filter(|r| is_non_empty(r)) {
                host.upload(response.clone());
            }
        });
        loaders.lock().push((Arc::clone(loader), id));
    });
    Some((repository, id))
}

fn is_non_empty(response: &Value) -> bool {
    match response {
        Value::Null => false,
        Value::Bool(value) => *value,
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
        Value::Number(number) => number.as_f64() != Some(0.0),
    }
}
