//! The editor collaborator contract.
//!
//! The adapter never reaches into a concrete widget. It talks to an
//! [`Editor`] through data access, a read-only flag, a plugin registry, a
//! focus tracker, a document-change emitter and a scoped view writer, and it
//! builds instances through an [`EditorConstructor`]. [`MemoryEditor`] is
//! the in-memory implementation behind the built-in variants.

mod emitter;
mod focus;
mod memory;
mod plugins;
mod view;

pub use emitter::{Emitter, ListenerId};
pub use focus::FocusTracker;
pub use memory::{BuiltinEditor, MemoryEditor, MemoryEditorOptions, normalize_markup};
pub use plugins::{FILE_REPOSITORY, FileRepository, Plugin, PluginRegistry, UploadLoader};
pub use view::{EditingView, ViewRoot, ViewWriter};

use std::fmt;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::host::{HostElement, ToolbarView};

/// Construction options, passed through to the editor untouched.
pub type EditorOptions = serde_json::Value;

/// Future returned by [`EditorConstructor::create`].
pub type CreateFuture = BoxFuture<'static, Result<Arc<dyn Editor>, EditorError>>;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("editor construction failed: {0}")]
    Construction(String),
    #[error("invalid editor options: {0}")]
    Options(#[from] serde_json::Error),
    #[error("no async runtime available to construct the editor")]
    NoRuntime,
}

/// A live editor instance.
///
/// Methods take `&self`; implementations synchronize internally, the way a
/// widget owns its own state.
pub trait Editor: Send + Sync {
    /// Serialized document content.
    fn get_data(&self) -> String;

    /// Replace the document. The editor may normalize what it is given.
    fn set_data(&self, data: &str);

    fn is_read_only(&self) -> bool;

    fn set_read_only(&self, read_only: bool);

    fn plugins(&self) -> &PluginRegistry;

    /// Fires after every change to the document model.
    fn document_changes(&self) -> &Emitter<()>;

    fn focus_tracker(&self) -> &FocusTracker;

    fn editing_view(&self) -> &EditingView;

    /// Name of the root the editable surface renders into.
    fn editable_root_name(&self) -> &str;

    /// The toolbar, for editors whose toolbar the host places itself.
    fn toolbar(&self) -> Option<ToolbarView>;

    /// Tear the instance down and release every internal listener.
    fn destroy(&self);

    fn is_destroyed(&self) -> bool;
}

impl fmt::Debug for dyn Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("root", &self.editable_root_name())
            .field("read_only", &self.is_read_only())
            .field("destroyed", &self.is_destroyed())
            .finish_non_exhaustive()
    }
}

/// A constructible editor type.
pub trait EditorConstructor: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the toolbar must be relocated into a host-provided mount.
    fn requires_toolbar_mount(&self) -> bool {
        false
    }

    fn create(&self, element: HostElement, options: EditorOptions) -> CreateFuture;
}

impl fmt::Debug for dyn EditorConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorConstructor")
            .field("name", &self.name())
            .field("requires_toolbar_mount", &self.requires_toolbar_mount())
            .finish()
    }
}
