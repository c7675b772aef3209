use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use futures_util::FutureExt;
use parking_lot::Mutex;
use regex::{Captures, Regex};
use serde::Deserialize;
use tracing::debug;

use super::{
    CreateFuture, EditingView, Editor, EditorConstructor, EditorError, EditorOptions, Emitter,
    FocusTracker, PluginRegistry,
};
use crate::factory::EditorKind;
use crate::host::{HostElement, ToolbarView};

const DEFAULT_ROOT_NAME: &str = "main";

const TOOLBAR_ITEMS: [&str; 8] = [
    "heading",
    "bold",
    "italic",
    "link",
    "bulletedList",
    "numberedList",
    "undo",
    "redo",
];

/// Tags that survive normalization. `b` and `i` are rewritten first.
const SUPPORTED_TAGS: [&str; 18] = [
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "strong",
    "em",
    "u",
    "s",
    "a",
    "ul",
    "ol",
    "li",
    "blockquote",
    "br",
    "figure",
    "img",
    "figcaption",
];

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .expect("script pattern is valid")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)([^>]*)>").expect("tag pattern is valid")
});
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(href|src|alt)\s*=\s*"([^"]*)""#).expect("attribute pattern is valid")
});
static BLOCK_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<(p|h[1-4]|ul|ol|blockquote|figure)[\s>]").expect("block pattern is valid")
});

/// Normalize markup into the editor's canonical form.
///
/// Script and style blocks are dropped, unsupported tags are stripped (their
/// text is kept), attributes other than `href`, `src` and `alt` are removed,
/// `b`/`i` become `strong`/`em`, and loose inline content is wrapped in a
/// paragraph.
pub fn normalize_markup(input: &str) -> String {
    let without_scripts = SCRIPT_RE.replace_all(input, "");
    let cleaned = TAG_RE.replace_all(&without_scripts, |caps: &Captures<'_>| rewrite_tag(caps));
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if BLOCK_START_RE.is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("<p>{trimmed}</p>")
    }
}

fn rewrite_tag(caps: &Captures<'_>) -> String {
    let closing = !caps[1].is_empty();
    let lowered = caps[2].to_ascii_lowercase();
    let name = match lowered.as_str() {
        "b" => "strong",
        "i" => "em",
        other => other,
    };
    if !SUPPORTED_TAGS.contains(&name) {
        return String::new();
    }
    if closing {
        return format!("</{name}>");
    }
    let attrs: String = ATTR_RE
        .captures_iter(&caps[3])
        .map(|attr| format!(" {}=\"{}\"", attr[1].to_ascii_lowercase(), &attr[2]))
        .collect();
    format!("<{name}{attrs}>")
}

/// Options understood by [`MemoryEditor`].
///
/// Unknown keys are ignored so the same options object can carry settings
/// for other editors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemoryEditorOptions {
    /// Plugins to load, by registry name.
    pub plugins: Vec<String>,
    /// Simulated construction latency.
    pub create_delay_ms: u64,
    /// When set, construction rejects with this message.
    pub fail_with: Option<String>,
    /// Name of the editable root. Defaults to `main`.
    pub root_name: Option<String>,
}

impl MemoryEditorOptions {
    /// # Errors
    /// Returns [`EditorError::Options`] if `options` is not null and does not
    /// deserialize into this shape.
    pub fn from_value(options: &EditorOptions) -> Result<Self, EditorError> {
        if options.is_null() {
            return Ok(Self::default());
        }
        Ok(Self::deserialize(options)?)
    }
}

/// In-memory editor used by the built-in variants.
#[derive(Debug)]
pub struct MemoryEditor {
    kind: EditorKind,
    element: HostElement,
    root_name: String,
    data: Mutex<String>,
    read_only: AtomicBool,
    destroyed: AtomicBool,
    plugins: PluginRegistry,
    changes: Emitter<()>,
    focus: FocusTracker,
    view: EditingView,
}

impl MemoryEditor {
    pub fn new(kind: EditorKind, element: HostElement, options: &MemoryEditorOptions) -> Self {
        let root_name = options
            .root_name
            .clone()
            .unwrap_or_else(|| DEFAULT_ROOT_NAME.to_string());
        Self {
            kind,
            element,
            view: EditingView::with_roots([root_name.clone()]),
            root_name,
            data: Mutex::new(String::new()),
            read_only: AtomicBool::new(false),
            destroyed: AtomicBool::new(false),
            plugins: PluginRegistry::from_names(&options.plugins),
            changes: Emitter::new(),
            focus: FocusTracker::new(),
        }
    }

    pub const fn kind(&self) -> EditorKind {
        self.kind
    }

    pub const fn element(&self) -> &HostElement {
        &self.element
    }
}

impl Editor for MemoryEditor {
    fn get_data(&self) -> String {
        self.data.lock().clone()
    }

    fn set_data(&self, data: &str) {
        if self.is_destroyed() {
            return;
        }
        let normalized = normalize_markup(data);
        {
            let mut current = self.data.lock();
            if *current == normalized {
                return;
            }
            *current = normalized;
        }
        self.changes.emit(&());
    }

    fn is_read_only(&self) -> bool {
        self.read_only.load(Ordering::SeqCst)
    }

    fn set_read_only(&self, read_only: bool) {
        if self.is_destroyed() {
            return;
        }
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    fn document_changes(&self) -> &Emitter<()> {
        &self.changes
    }

    fn focus_tracker(&self) -> &FocusTracker {
        &self.focus
    }

    fn editing_view(&self) -> &EditingView {
        &self.view
    }

    fn editable_root_name(&self) -> &str {
        &self.root_name
    }

    fn toolbar(&self) -> Option<ToolbarView> {
        match self.kind {
            EditorKind::Classic | EditorKind::Document => {
                Some(ToolbarView::new(self.element.id(), TOOLBAR_ITEMS))
            }
            EditorKind::Inline | EditorKind::Comment => None,
        }
    }

    fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.changes.clear();
        self.focus.changes().clear();
        self.plugins.clear_listeners();
        debug!(kind = self.kind.name(), element = self.element.id(), "editor destroyed");
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }
}

/// Constructor for one of the built-in variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinEditor {
    kind: EditorKind,
}

impl BuiltinEditor {
    pub const fn new(kind: EditorKind) -> Self {
        Self { kind }
    }

    pub const fn kind(&self) -> EditorKind {
        self.kind
    }
}

impl EditorConstructor for BuiltinEditor {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn requires_toolbar_mount(&self) -> bool {
        self.kind == EditorKind::Document
    }

    fn create(&self, element: HostElement, options: EditorOptions) -> CreateFuture {
        let kind = self.kind;
        async move {
            let options = MemoryEditorOptions::from_value(&options)?;
            if options.create_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(options.create_delay_ms)).await;
            }
            if let Some(message) = &options.fail_with {
                return Err(EditorError::Construction(message.clone()));
            }
            let editor: Arc<dyn Editor> = Arc::new(MemoryEditor::new(kind, element, &options));
            Ok(editor)
        }
        .boxed()
    }
}
