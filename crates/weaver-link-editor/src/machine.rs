//! The floating panel's state machine.
//!
//! ```text
//!            link under selection            user types
//!  Hidden ───────────────────────▶ Viewing ─────────────▶ Editing
//!    ▲                              │   ▲                    │
//!    └──── no link / escape ────────┘   └── link re-resolved ┘
//! ```
//!
//! Draft and selection live inside the visible variants, so leaving for
//! `Hidden` drops both.

use crate::command::{Propagation, ToggleLink};
use crate::observer::Observation;
use crate::selection::SelectionSnapshot;
use crate::url::sanitize_url;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Hidden,
    /// Showing the link's current URL.
    Viewing {
        url: String,
        selection: SelectionSnapshot,
    },
    /// The user has changed the URL text.
    Editing {
        draft: String,
        selection: SelectionSnapshot,
    },
}

/// Outcome of feeding an observation to the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Shown,
    /// Still visible, re-seeded from a fresh selection.
    Refreshed,
    Hidden,
    Unchanged,
}

/// Keys the URL input reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKey {
    Enter,
    Escape,
    Other,
}

/// Whether the input's keydown default should be suppressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    PreventDefault,
    Default,
}

impl InputKey {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Self {
        match key {
            "Enter" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Default)]
pub struct LinkEditorMachine {
    state: PanelState,
}

impl LinkEditorMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self.state, PanelState::Hidden)
    }

    /// Text bound to the input: the URL while viewing, the draft while editing.
    pub fn draft(&self) -> &str {
        match &self.state {
            PanelState::Hidden => "",
            PanelState::Viewing { url, .. } => url,
            PanelState::Editing { draft, .. } => draft,
        }
    }

    /// Selection captured when the panel was last shown.
    pub fn last_selection(&self) -> Option<&SelectionSnapshot> {
        match &self.state {
            PanelState::Hidden => None,
            PanelState::Viewing { selection, .. } | PanelState::Editing { selection, .. } => {
                Some(selection)
            }
        }
    }

    /// React to a fresh observation of the editor and host.
    pub fn observe(&mut self, observation: &Observation) -> Transition {
        // Focus in the link input means the native selection left the editor on
        // purpose; keep whatever the user is doing.
        if observation.input_focused && self.is_visible() {
            return Transition::Unchanged;
        }

        let url = observation
            .preview_url
            .as_deref()
            .or_else(|| observation.link.url());

        match (&observation.link, &observation.selection, url) {
            (link, Some(selection), Some(url))
                if link.is_present() && observation.selection_is_actionable() =>
            {
                let was_visible = self.is_visible();
                self.state = PanelState::Viewing {
                    url: url.to_owned(),
                    selection: selection.clone(),
                };
                if was_visible {
                    Transition::Refreshed
                } else {
                    tracing::debug!(
                        target: "weaver::link_editor::machine",
                        url,
                        "showing link editor"
                    );
                    Transition::Shown
                }
            }
            _ if observation.input_focused => Transition::Unchanged,
            _ => self.hide(),
        }
    }

    /// Replace the draft with what the user typed.
    pub fn edit_draft(&mut self, text: impl Into<String>) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            PanelState::Hidden => {
                tracing::trace!(
                    target: "weaver::link_editor::machine",
                    "ignoring draft edit while hidden"
                );
                PanelState::Hidden
            }
            PanelState::Viewing { selection, .. } | PanelState::Editing { selection, .. } => {
                PanelState::Editing {
                    draft: text.into(),
                    selection,
                }
            }
        };
    }

    /// Build the toggle-link command for the current draft.
    ///
    /// Nothing is produced while hidden, for an empty draft, or when the draft
    /// can't be turned into a URL. The machine itself doesn't change; the next
    /// observation decides what the panel shows.
    pub fn submit(&self) -> Option<ToggleLink> {
        let selection = self.last_selection()?;
        let draft = self.draft();
        if draft.is_empty() {
            return None;
        }
        match sanitize_url(draft) {
            Ok(url) => Some(ToggleLink {
                url: Some(url),
                selection: Some(selection.clone()),
            }),
            Err(error) => {
                tracing::debug!(
                    target: "weaver::link_editor::machine",
                    draft,
                    %error,
                    "skipping link submission"
                );
                None
            }
        }
    }

    /// Escape pressed in the editor: collapse if visible, otherwise let others handle it.
    pub fn escape(&mut self) -> Propagation {
        if self.is_visible() {
            self.hide();
            Propagation::Stop
        } else {
            Propagation::Continue
        }
    }

    /// Keydown inside the URL input. Enter is handled by the caller via [`submit`](Self::submit).
    pub fn input_key(&self, key: InputKey) -> KeyOutcome {
        match key {
            InputKey::Enter | InputKey::Escape => KeyOutcome::PreventDefault,
            InputKey::Other => KeyOutcome::Default,
        }
    }

    pub fn hide(&mut self) -> Transition {
        if !self.is_visible() {
            return Transition::Unchanged;
        }
        tracing::debug!(target: "weaver::link_editor::machine", "hiding link editor");
        self.state = PanelState::Hidden;
        Transition::Hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKey;
    use crate::resolver::LinkContext;

    fn selection() -> SelectionSnapshot {
        SelectionSnapshot::caret(NodeKey(3), 1)
    }

    fn on_link(url: &str) -> Observation {
        Observation {
            link: LinkContext::Present { url: url.into() },
            preview_url: Some(url.into()),
            selection: Some(selection()),
            selection_in_root: true,
            editable: true,
            input_focused: false,
            rect: None,
        }
    }

    fn off_link() -> Observation {
        Observation {
            link: LinkContext::Absent,
            preview_url: None,
            ..on_link("")
        }
    }

    fn viewing(url: &str) -> LinkEditorMachine {
        let mut machine = LinkEditorMachine::new();
        assert_eq!(machine.observe(&on_link(url)), Transition::Shown);
        machine
    }

    #[test]
    fn test_shows_for_manual_link() {
        let machine = viewing("https://a.com/x");
        assert_eq!(
            machine.state(),
            &PanelState::Viewing {
                url: "https://a.com/x".into(),
                selection: selection(),
            }
        );
        assert_eq!(machine.draft(), "https://a.com/x");
        assert_eq!(machine.last_selection(), Some(&selection()));
    }

    #[test]
    fn test_refresh_while_visible() {
        let mut machine = viewing("https://a.com/x");
        assert_eq!(machine.observe(&on_link("https://d.com")), Transition::Refreshed);
        assert_eq!(machine.draft(), "https://d.com");
    }

    #[test]
    fn test_stays_hidden_when_read_only_or_outside_root() {
        let mut machine = LinkEditorMachine::new();
        let read_only = Observation {
            editable: false,
            ..on_link("https://a.com")
        };
        assert_eq!(machine.observe(&read_only), Transition::Unchanged);
        assert!(!machine.is_visible());

        let outside = Observation {
            selection_in_root: false,
            ..on_link("https://a.com")
        };
        machine.observe(&outside);
        assert!(!machine.is_visible());
    }

    #[test]
    fn test_hide_clears_draft_and_selection_from_any_state() {
        let mut machine = viewing("https://a.com");
        assert_eq!(machine.observe(&off_link()), Transition::Hidden);
        assert_eq!(machine.draft(), "");
        assert_eq!(machine.last_selection(), None);

        let mut machine = viewing("https://a.com");
        machine.edit_draft("half-typ");
        assert_eq!(machine.escape(), Propagation::Stop);
        assert_eq!(machine.draft(), "");
        assert_eq!(machine.last_selection(), None);

        let mut machine = LinkEditorMachine::new();
        assert_eq!(machine.hide(), Transition::Unchanged);
        assert_eq!(machine.draft(), "");
        assert_eq!(machine.last_selection(), None);
    }

    #[test]
    fn test_focused_input_keeps_draft() {
        let mut machine = viewing("https://a.com");
        machine.edit_draft("c.co");
        let focused = Observation {
            selection_in_root: false,
            input_focused: true,
            ..off_link()
        };
        assert_eq!(machine.observe(&focused), Transition::Unchanged);
        assert_eq!(machine.draft(), "c.co");
    }

    #[test]
    fn test_selection_leaving_root_hides_when_input_unfocused() {
        let mut machine = viewing("https://a.com");
        let outside = Observation {
            selection_in_root: false,
            ..on_link("https://a.com")
        };
        assert_eq!(machine.observe(&outside), Transition::Hidden);
    }

    #[test]
    fn test_edit_draft_ignored_while_hidden() {
        let mut machine = LinkEditorMachine::new();
        machine.edit_draft("x.com");
        assert_eq!(machine.state(), &PanelState::Hidden);
        assert_eq!(machine.submit(), None);
    }

    #[test]
    fn test_submit_sanitizes_and_carries_selection() {
        let mut machine = viewing("https://a.com/x");
        machine.edit_draft("example.com");
        assert_eq!(
            machine.submit(),
            Some(ToggleLink {
                url: Some("https://example.com".into()),
                selection: Some(selection()),
            })
        );
        // Submitting doesn't move the machine.
        assert!(matches!(machine.state(), PanelState::Editing { .. }));
    }

    #[test]
    fn test_submit_skips_empty_and_invalid_drafts() {
        let mut machine = viewing("https://a.com/x");
        machine.edit_draft("");
        assert_eq!(machine.submit(), None);
        machine.edit_draft("javascript:alert(1)");
        assert_eq!(machine.submit(), None);
    }

    #[test]
    fn test_submit_from_viewing_uses_current_url() {
        let machine = viewing("https://a.com/x");
        let command = machine.submit().unwrap();
        assert_eq!(command.url.as_deref(), Some("https://a.com/x"));
    }

    #[test]
    fn test_escape_only_consumed_when_visible() {
        let mut machine = LinkEditorMachine::new();
        assert_eq!(machine.escape(), Propagation::Continue);
        let mut machine = viewing("https://a.com");
        assert_eq!(machine.escape(), Propagation::Stop);
        assert!(!machine.is_visible());
    }

    #[test]
    fn test_input_keys() {
        let mut machine = viewing("https://a.com");
        machine.edit_draft("typing");
        assert_eq!(machine.input_key(InputKey::from_key("Escape")), KeyOutcome::PreventDefault);
        assert_eq!(machine.input_key(InputKey::from_key("Enter")), KeyOutcome::PreventDefault);
        assert_eq!(machine.input_key(InputKey::from_key("a")), KeyOutcome::Default);
        // Cancel in the input never collapses the panel.
        assert_eq!(machine.draft(), "typing");
        assert!(machine.is_visible());
    }
}
