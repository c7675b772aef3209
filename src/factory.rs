//! Editor variant resolution.
//!
//! A component names the editor it wants either symbolically (`"inline"`,
//! `"document"`, ...) or by handing over a constructor directly. Resolution
//! never fails: anything unrecognized falls back to the classic editor.

use std::fmt;
use std::sync::Arc;

use crate::editor::{BuiltinEditor, EditorConstructor};

/// The built-in editor flavors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EditorKind {
    Inline,
    Comment,
    /// Decoupled editor; its toolbar is placed by the host.
    Document,
    #[default]
    Classic,
}

impl EditorKind {
    pub const ALL: [Self; 4] = [Self::Inline, Self::Comment, Self::Document, Self::Classic];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Comment => "comment",
            Self::Document => "document",
            Self::Classic => "classic",
        }
    }

    /// Look up a symbolic name. Unknown names resolve to [`EditorKind::Classic`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "inline" => Self::Inline,
            "comment" => Self::Comment,
            "document" => Self::Document,
            _ => Self::Classic,
        }
    }
}

impl fmt::Display for EditorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a component asks for: a symbolic name or a concrete constructor.
#[derive(Clone)]
pub enum EditorDescriptor {
    Name(String),
    Constructor(Arc<dyn EditorConstructor>),
}

impl fmt::Debug for EditorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Self::Constructor(constructor) => f
                .debug_tuple("Constructor")
                .field(&constructor.name())
                .finish(),
        }
    }
}

impl From<&str> for EditorDescriptor {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for EditorDescriptor {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<EditorKind> for EditorDescriptor {
    fn from(kind: EditorKind) -> Self {
        Self::Name(kind.name().to_string())
    }
}

impl From<Arc<dyn EditorConstructor>> for EditorDescriptor {
    fn from(constructor: Arc<dyn EditorConstructor>) -> Self {
        Self::Constructor(constructor)
    }
}

/// Resolve a descriptor to a constructible editor type.
///
/// A constructor descriptor comes back as the same `Arc`.
pub fn resolve(descriptor: Option<&EditorDescriptor>) -> Arc<dyn EditorConstructor> {
    match descriptor {
        Some(EditorDescriptor::Constructor(constructor)) => Arc::clone(constructor),
        Some(EditorDescriptor::Name(name)) => builtin(EditorKind::from_name(name)),
        None => builtin(EditorKind::Classic),
    }
}

pub fn builtin(kind: EditorKind) -> Arc<dyn EditorConstructor> {
    Arc::new(BuiltinEditor::new(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{CreateFuture, EditorError, EditorOptions};
    use crate::host::HostElement;
    use futures_util::FutureExt;

    struct Custom;

    impl EditorConstructor for Custom {
        fn name(&self) -> &str {
            "custom"
        }

        fn create(&self, _element: HostElement, _options: EditorOptions) -> CreateFuture {
            async { Err(EditorError::Construction("unused".to_string())) }.boxed()
        }
    }

    #[test]
    fn test_symbolic_names_resolve_to_builtins() {
        for kind in [EditorKind::Inline, EditorKind::Comment, EditorKind::Document] {
            let resolved = resolve(Some(&EditorDescriptor::from(kind.name())));
            assert_eq!(resolved.name(), kind.name());
        }
    }

    #[test]
    fn test_missing_descriptor_is_classic() {
        assert_eq!(resolve(None).name(), "classic");
    }

    #[test]
    fn test_unknown_and_empty_names_fall_back_to_classic() {
        assert_eq!(resolve(Some(&"balloon".into())).name(), "classic");
        assert_eq!(resolve(Some(&"".into())).name(), "classic");
        assert_eq!(resolve(Some(&"Inline".into())).name(), "classic");
    }

    #[test]
    fn test_constructor_descriptor_is_returned_unchanged() {
        let custom: Arc<dyn EditorConstructor> = Arc::new(Custom);
        let descriptor = EditorDescriptor::from(Arc::clone(&custom));
        let resolved = resolve(Some(&descriptor));
        assert!(Arc::ptr_eq(&resolved, &custom));
    }

    #[test]
    fn test_document_is_the_only_builtin_needing_a_toolbar_mount() {
        let needing: Vec<_> = EditorKind::ALL
            .into_iter()
            .filter(|kind| builtin(*kind).requires_toolbar_mount())
            .collect();
        assert_eq!(needing, [EditorKind::Document]);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn unknown_names_always_fall_back(name in "[a-zA-Z]{0,12}") {
                prop_assume!(!["inline", "comment", "document"].contains(&name.as_str()));
                let resolved = resolve(Some(&EditorDescriptor::Name(name)));
                prop_assert_eq!(resolved.name(), "classic");
            }
        }
    }
}
