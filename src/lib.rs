// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditorError)
    clippy::module_name_repetitions
)]

//! # wysiwyg-mount
//!
//! Host-side lifecycle adapter for an asynchronously constructed rich-text
//! editor.
//!
//! A host builds an [`EditorLifecycleController`] from [`ComponentArgs`] and
//! [`HostCallbacks`], mounts it against a [`HostElement`] and later unmounts
//! it. The controller:
//! - resolves the editor variant through [`factory`]
//! - constructs the editor on the tokio runtime
//! - applies the initial value, disabled flag and content class
//! - bridges focus, blur, upload and debounced input events to the host
//! - tears everything down on unmount, even mid-construction
//!
//! ## Modules
//!
//! - [`lifecycle`]: The controller and its state machine
//! - [`editor`]: The editor contract and the in-memory editor
//! - [`factory`]: Variant resolution
//! - [`bridge`]: Editor events to host callbacks
//! - [`debounce`]: Trailing-edge change notification
//! - [`classify`]: Content class on the editable root
//! - [`diagnostics`]: Construction failure sinks
//! - [`config`]: Component arguments and flag files
//! - [`script`], [`session`]: Scripted host sessions for the binary
//! - [`eventlog`]: Optional event log file

pub mod bridge;
pub mod classify;
pub mod config;
pub mod debounce;
pub mod diagnostics;
pub mod editor;
pub mod eventlog;
pub mod factory;
pub mod host;
pub mod lifecycle;
pub mod script;
pub mod session;

pub use bridge::HostCallbacks;
pub use config::ComponentArgs;
pub use factory::{EditorDescriptor, EditorKind};
pub use host::{HostElement, ToolbarMount};
pub use lifecycle::{EditorLifecycleController, LifecycleState};
