//! Tags the editable root with the component's content class.

use crate::editor::Editor;

/// Class applied when the component does not override it.
pub const DEFAULT_CONTENT_CLASS: &str = "content-scope";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentClassifier {
    class: String,
}

impl ContentClassifier {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    /// Add the class to the editable root inside one view change block.
    ///
    /// Returns false if the root could not be found or already carried it.
    pub fn apply(&self, editor: &dyn Editor) -> bool {
        let root = editor.editable_root_name();
        editor
            .editing_view()
            .change(|writer| writer.add_class(&self.class, root))
    }
}

impl Default for ContentClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_CLASS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{MemoryEditor, MemoryEditorOptions};
    use crate::factory::EditorKind;
    use crate::host::HostElement;

    fn editor(root_name: Option<&str>) -> MemoryEditor {
        MemoryEditor::new(
            EditorKind::Classic,
            HostElement::new("host"),
            &MemoryEditorOptions {
                root_name: root_name.map(ToString::to_string),
                ..MemoryEditorOptions::default()
            },
        )
    }

    #[test]
    fn test_default_class_lands_on_root() {
        let editor = editor(None);
        assert!(ContentClassifier::default().apply(&editor));

        let root = editor.editing_view().root("main").expect("root");
        assert!(root.has_class(DEFAULT_CONTENT_CLASS));
        assert_eq!(editor.editing_view().render_count(), 1);
    }

    #[test]
    fn test_custom_class_follows_custom_root() {
        let editor = editor(Some("body"));
        assert!(ContentClassifier::new("prose").apply(&editor));

        let root = editor.editing_view().root("body").expect("root");
        assert!(root.has_class("prose"));
    }

    #[test]
    fn test_apply_does_not_touch_document_data() {
        let editor = editor(None);
        editor.set_data("<p>kept</p>");
        ContentClassifier::default().apply(&editor);
        assert_eq!(editor.get_data(), "<p>kept</p>");
    }
}
