//! Host-side handles the adapter hands to, or receives from, the component tree.
//!
//! These stand in for the DOM nodes a real host would pass around: the element
//! the editor is created against and the slot its detached toolbar lives in.

use std::sync::Arc;

use parking_lot::Mutex;

/// The element an editor instance is created against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostElement {
    id: String,
}

impl HostElement {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// A toolbar produced by an editor, ready to be relocated by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarView {
    owner: String,
    items: Vec<String>,
}

impl ToolbarView {
    pub fn new(owner: impl Into<String>, items: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            owner: owner.into(),
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Id of the host element whose editor produced this toolbar.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }
}

/// Insertion point the host provides for an externally placed toolbar.
///
/// Clones share the same children, so the host keeps one handle and gives
/// another to the controller.
#[derive(Debug, Clone)]
pub struct ToolbarMount {
    id: String,
    children: Arc<Mutex<Vec<ToolbarView>>>,
}

impl ToolbarMount {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            children: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn append_child(&self, view: ToolbarView) {
        self.children.lock().push(view);
    }

    pub fn children(&self) -> Vec<ToolbarView> {
        self.children.lock().clone()
    }

    pub fn child_count(&self) -> usize {
        self.children.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toolbar_mount_clones_share_children() {
        let mount = ToolbarMount::new("toolbar");
        let host_side = mount.clone();
        mount.append_child(ToolbarView::new("editor", ["bold", "italic"]));

        assert_eq!(host_side.child_count(), 1);
        assert_eq!(host_side.children()[0].items(), ["bold", "italic"]);
        assert_eq!(host_side.children()[0].owner(), "editor");
    }
}
