//! Deciding whether the selection rests on an editable link.

use crate::node::Classifiable;
use crate::selection::SelectionSnapshot;
use crate::state::EditorState;

/// Link under the selection, as far as the floating editor is concerned.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum LinkContext {
    Present {
        url: String,
    },
    #[default]
    Absent,
}

impl LinkContext {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present { .. })
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Present { url } => Some(url),
            Self::Absent => None,
        }
    }
}

/// Resolve the link context for the selection in `state`.
///
/// Only range selections are considered. The selection counts as "on a link"
/// when the selected node or one of its ancestors is a manually authored link
/// and nothing on that path is an auto-detected link. Auto-links always win,
/// whatever manual link may sit further up the tree.
pub fn resolve_link_context(state: &EditorState) -> LinkContext {
    let Some(SelectionSnapshot::Range(range)) = state.selection() else {
        return LinkContext::Absent;
    };
    let tree = state.tree();
    let Some(selected) = range.selected_node(tree) else {
        return LinkContext::Absent;
    };

    let link = tree.find_matching_parent(selected, |node| node.is_link());
    let auto_link = tree.find_matching_parent(selected, |node| node.is_auto_link());

    match (link, auto_link) {
        (Some(link), None) => LinkContext::Present {
            url: link.url().unwrap_or_default().to_owned(),
        },
        _ => LinkContext::Absent,
    }
}

/// Raw URL directly under the selection, auto-links included.
///
/// Looks at the selected node's parent first, then the node itself. This is
/// what seeds the panel's draft; it never decides visibility.
pub fn preview_url(state: &EditorState) -> Option<String> {
    let range = state.selection()?.as_range()?;
    let tree = state.tree();
    let node = tree.get(range.selected_node(tree)?)?;
    let parent = node.parent.and_then(|key| tree.get(key));

    parent
        .filter(|parent| parent.is_link())
        .or_else(|| Some(node).filter(|node| node.is_link()))
        .and_then(|link| link.url())
        .map(str::to_owned)
}
