//! Immutable, versioned editor state.

use std::rc::Rc;

use crate::node::DocumentTree;
use crate::selection::SelectionSnapshot;

/// Point-in-time view of the document and selection.
///
/// Cloning is cheap: the tree is shared and only copied when an update
/// actually modifies it.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorState {
    version: u64,
    tree: Rc<DocumentTree>,
    selection: Option<SelectionSnapshot>,
}

impl EditorState {
    pub fn new(tree: DocumentTree) -> Self {
        Self {
            version: 0,
            tree: Rc::new(tree),
            selection: None,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    pub fn selection(&self) -> Option<&SelectionSnapshot> {
        self.selection.as_ref()
    }

    /// Next version with the same content and a new selection.
    #[must_use]
    pub fn with_selection(&self, selection: Option<SelectionSnapshot>) -> Self {
        Self {
            version: self.version + 1,
            tree: Rc::clone(&self.tree),
            selection,
        }
    }

    /// Next version after applying `f` to a copy-on-write tree and selection.
    #[must_use]
    pub fn updated<R>(
        &self,
        f: impl FnOnce(&mut DocumentTree, &mut Option<SelectionSnapshot>) -> R,
    ) -> (Self, R) {
        let mut tree = Rc::clone(&self.tree);
        let mut selection = self.selection.clone();
        let result = f(Rc::make_mut(&mut tree), &mut selection);
        (
            Self {
                version: self.version + 1,
                tree,
                selection,
            },
            result,
        )
    }
}
