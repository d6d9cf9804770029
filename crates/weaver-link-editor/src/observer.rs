//! Gathering everything the state machine needs from a single trigger.

use crate::editor::Editor;
use crate::platform::LinkEditorPlatform;
use crate::position::Rect;
use crate::resolver::{LinkContext, preview_url, resolve_link_context};
use crate::selection::SelectionSnapshot;

/// Why the controller is re-deriving its state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    Mount,
    Update,
    SelectionChange,
    EditableChange,
    Viewport,
}

/// Inputs for one pass of the state machine, all read at the same moment.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub link: LinkContext,
    /// Raw URL under the selection; seeds the draft.
    pub preview_url: Option<String>,
    pub selection: Option<SelectionSnapshot>,
    pub selection_in_root: bool,
    pub editable: bool,
    pub input_focused: bool,
    pub rect: Option<Rect>,
}

impl Observation {
    /// Whether the selection is somewhere the panel may be shown for.
    pub fn selection_is_actionable(&self) -> bool {
        self.selection.is_some() && self.selection_in_root && self.editable
    }
}

/// Read the editor state and the platform for one trigger.
pub fn observe(editor: &Editor, platform: &impl LinkEditorPlatform, trigger: Trigger) -> Observation {
    let observation = editor.read(|state| Observation {
        link: resolve_link_context(state),
        preview_url: preview_url(state),
        selection: state.selection().cloned(),
        selection_in_root: platform.selection_in_root(),
        editable: editor.is_editable(),
        input_focused: platform.link_input_focused(),
        rect: platform.selection_rect(),
    });

    tracing::trace!(
        target: "weaver::link_editor::observer",
        ?trigger,
        editor = editor.id().0,
        link = ?observation.link,
        in_root = observation.selection_in_root,
        editable = observation.editable,
        input_focused = observation.input_focused,
        rect = ?observation.rect,
        "observed selection"
    );

    observation
}
