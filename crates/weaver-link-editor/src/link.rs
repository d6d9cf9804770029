//! Default handling for [`EditorCommand::ToggleLink`].

use crate::command::{CommandKind, CommandPriority, EditorCommand, Propagation, ToggleLink};
use crate::editor::Editor;
use crate::error::LinkEditorError;
use crate::node::{Classifiable, DocumentTree};
use crate::selection::SelectionSnapshot;
use crate::subscription::Unsubscribe;

/// What a toggle did to the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkEdit {
    UrlChanged,
    Wrapped,
    Removed,
    /// Selection was stale, not a range, or not on anything linkable.
    Nothing,
}

/// Register the engine-level toggle-link handler on `editor`.
///
/// Runs at [`CommandPriority::Editor`], so anything registered higher can
/// intercept the command first.
pub fn register_link_commands(editor: &Editor) -> Unsubscribe {
    let weak = editor.downgrade();
    editor.register_command(
        CommandKind::ToggleLink,
        CommandPriority::Editor,
        move |command, _origin| {
            let (EditorCommand::ToggleLink(toggle), Some(editor)) = (command, weak.upgrade())
            else {
                return Propagation::Continue;
            };
            if !editor.is_editable() {
                return Propagation::Continue;
            }
            let (next, edit) = editor.state().updated(|tree, selection| {
                let target = toggle.selection.as_ref().or(selection.as_ref());
                apply_toggle(tree, target, toggle)
            });
            if edit != LinkEdit::Nothing {
                editor.set_state(next);
            }
            Propagation::Stop
        },
    )
}

/// Apply `toggle` to `tree` around `selection`.
pub fn apply_toggle(
    tree: &mut DocumentTree,
    selection: Option<&SelectionSnapshot>,
    toggle: &ToggleLink,
) -> LinkEdit {
    match try_apply_toggle(tree, selection, toggle) {
        Ok(edit) => edit,
        Err(error) => {
            tracing::warn!(
                target: "weaver::link_editor::commands",
                %error,
                "toggle link failed, leaving document untouched"
            );
            LinkEdit::Nothing
        }
    }
}

fn try_apply_toggle(
    tree: &mut DocumentTree,
    selection: Option<&SelectionSnapshot>,
    toggle: &ToggleLink,
) -> Result<LinkEdit, LinkEditorError> {
    let Some(range) = selection.and_then(SelectionSnapshot::as_range) else {
        return Ok(LinkEdit::Nothing);
    };
    if !selection.is_some_and(|s| s.is_valid_in(tree)) {
        tracing::warn!(
            target: "weaver::link_editor::commands",
            anchor = %range.anchor.key,
            focus = %range.focus.key,
            "toggle link against a stale selection"
        );
        return Ok(LinkEdit::Nothing);
    }

    let selected = range
        .selected_node(tree)
        .ok_or(LinkEditorError::MissingNode(range.anchor.key))?;
    let link = tree
        .find_matching_parent(selected, |node| node.is_link())
        .map(|node| node.key);

    match (&toggle.url, link) {
        (Some(url), Some(link)) => {
            tree.set_link_url(link, url)?;
            Ok(LinkEdit::UrlChanged)
        }
        (Some(url), None) if tree.get(selected).is_some_and(|node| node.is_text()) => {
            tree.wrap_in_link(selected, url)?;
            Ok(LinkEdit::Wrapped)
        }
        (None, Some(link)) => {
            tree.unwrap_link(link)?;
            Ok(LinkEdit::Removed)
        }
        _ => Ok(LinkEdit::Nothing),
    }
}
