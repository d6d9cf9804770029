//! Platform abstraction for the floating link editor.
//!
//! The controller never touches the DOM directly. Everything it needs to know
//! about the host (native selection, focus, geometry) and everything it needs
//! to change (panel transform, input contents) goes through
//! [`LinkEditorPlatform`]. The browser implementation lives in
//! `weaver-link-editor-browser`; tests use an in-memory double.

use std::rc::Rc;

use crate::position::{PanelPlacement, Rect, Size};
use crate::subscription::Unsubscribe;

/// Error type for platform operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformError(pub String);

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for PlatformError {}

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        PlatformError(s.to_owned())
    }
}

impl From<String> for PlatformError {
    fn from(s: String) -> Self {
        PlatformError(s)
    }
}

/// What the panel should display.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PanelView {
    pub visible: bool,
    /// Current draft, shown in the input and used as the "open" link target.
    pub draft: String,
}

/// Host-side queries and effects.
pub trait LinkEditorPlatform {
    /// Whether the native selection's anchor lies inside the editable root.
    fn selection_in_root(&self) -> bool;

    /// Whether the panel's URL input currently has focus.
    fn link_input_focused(&self) -> bool;

    /// Bounding box of the element holding the native selection's focus.
    ///
    /// `None` when there is no selection or the element has no layout box.
    fn selection_rect(&self) -> Option<Rect>;

    /// Bounding box of the element the panel is rendered into.
    fn anchor_rect(&self) -> Rect;

    /// Bounding box of the anchor's scrollable parent, if it has one.
    fn scroller_rect(&self) -> Option<Rect>;

    /// Rendered size of the panel.
    fn panel_size(&self) -> Size;

    fn apply_placement(&self, placement: &PanelPlacement) -> Result<(), PlatformError>;

    fn render_panel(&self, view: &PanelView) -> Result<(), PlatformError>;

    /// Call `on_change` whenever the viewport moves under the panel
    /// (window resize, scroller scroll). Returned disposers are owned by the
    /// controller's subscription group.
    fn observe_viewport(&self, on_change: Rc<dyn Fn()>) -> Vec<Unsubscribe> {
        let _ = on_change;
        Vec::new()
    }
}

impl<T: LinkEditorPlatform + ?Sized> LinkEditorPlatform for Rc<T> {
    fn selection_in_root(&self) -> bool {
        (**self).selection_in_root()
    }

    fn link_input_focused(&self) -> bool {
        (**self).link_input_focused()
    }

    fn selection_rect(&self) -> Option<Rect> {
        (**self).selection_rect()
    }

    fn anchor_rect(&self) -> Rect {
        (**self).anchor_rect()
    }

    fn scroller_rect(&self) -> Option<Rect> {
        (**self).scroller_rect()
    }

    fn panel_size(&self) -> Size {
        (**self).panel_size()
    }

    fn apply_placement(&self, placement: &PanelPlacement) -> Result<(), PlatformError> {
        (**self).apply_placement(placement)
    }

    fn render_panel(&self, view: &PanelView) -> Result<(), PlatformError> {
        (**self).render_panel(view)
    }

    fn observe_viewport(&self, on_change: Rc<dyn Fn()>) -> Vec<Unsubscribe> {
        (**self).observe_viewport(on_change)
    }
}
