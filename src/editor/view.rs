use std::collections::{BTreeMap, BTreeSet};

use parking_lot::Mutex;

/// Presentation state of one editable root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewRoot {
    classes: BTreeSet<String>,
}

impl ViewRoot {
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

#[derive(Debug, Default)]
struct ViewState {
    roots: BTreeMap<String, ViewRoot>,
    renders: u64,
}

/// Scoped writer handed out by [`EditingView::change`].
#[derive(Debug)]
pub struct ViewWriter<'a> {
    roots: &'a mut BTreeMap<String, ViewRoot>,
    touched: bool,
}

impl ViewWriter<'_> {
    /// Add each whitespace-separated class in `class` to the named root.
    ///
    /// Returns false if the root does not exist or nothing was added.
    pub fn add_class(&mut self, class: &str, root: &str) -> bool {
        let Some(view_root) = self.roots.get_mut(root) else {
            return false;
        };
        let mut added = false;
        for token in class.split_whitespace() {
            added |= view_root.classes.insert(token.to_string());
        }
        self.touched |= added;
        added
    }

    pub fn remove_class(&mut self, class: &str, root: &str) -> bool {
        let Some(view_root) = self.roots.get_mut(root) else {
            return false;
        };
        let mut removed = false;
        for token in class.split_whitespace() {
            removed |= view_root.classes.remove(token);
        }
        self.touched |= removed;
        removed
    }
}

/// The editing view: presentation markup of the editable roots.
///
/// All mutation goes through [`change`](Self::change); a change block that
/// modifies anything counts as exactly one render, however many writes it
/// performs.
#[derive(Debug, Default)]
pub struct EditingView {
    state: Mutex<ViewState>,
}

impl EditingView {
    pub fn with_roots(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let roots = names
            .into_iter()
            .map(|name| (name.into(), ViewRoot::default()))
            .collect();
        Self {
            state: Mutex::new(ViewState { roots, renders: 0 }),
        }
    }

    pub fn change<R>(&self, block: impl FnOnce(&mut ViewWriter<'_>) -> R) -> R {
        let mut state = self.state.lock();
        let mut writer = ViewWriter {
            roots: &mut state.roots,
            touched: false,
        };
        let result = block(&mut writer);
        let touched = writer.touched;
        if touched {
            state.renders += 1;
        }
        result
    }

    pub fn root(&self, name: &str) -> Option<ViewRoot> {
        self.state.lock().roots.get(name).cloned()
    }

    pub fn render_count(&self) -> u64 {
        self.state.lock().renders
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_block_renders_once() {
        let view = EditingView::with_roots(["main"]);
        view.change(|writer| {
            writer.add_class("a", "main");
            writer.add_class("b c", "main");
        });

        let root = view.root("main").expect("root");
        assert_eq!(root.classes().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(view.render_count(), 1);
    }

    #[test]
    fn test_noop_change_does_not_render() {
        let view = EditingView::with_roots(["main"]);
        let added = view.change(|writer| writer.add_class("a", "missing"));
        assert!(!added);
        assert_eq!(view.render_count(), 0);
    }

    #[test]
    fn test_remove_class() {
        let view = EditingView::with_roots(["main"]);
        view.change(|writer| writer.add_class("a b", "main"));
        view.change(|writer| writer.remove_class("a", "main"));
        let root = view.root("main").expect("root");
        assert!(!root.has_class("a"));
        assert!(root.has_class("b"));
        assert_eq!(view.render_count(), 2);
    }
}
