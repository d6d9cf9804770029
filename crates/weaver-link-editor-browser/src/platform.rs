//! DOM implementation of [`LinkEditorPlatform`].
//!
//! Reads the native selection and focus from `document`, measures with
//! `getBoundingClientRect`, and drives the panel built by [`PanelElements`].

use std::rc::Rc;

use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{DomRect, Element, HtmlElement};
use weaver_link_editor::{
    LinkEditorConfig, LinkEditorPlatform, PanelPlacement, PanelView, PlatformError, Rect, Size,
    Unsubscribe,
};

use crate::panel::PanelElements;

/// Browser platform for one floating link editor.
pub struct BrowserLinkPlatform {
    /// The editor's contenteditable root.
    root: HtmlElement,
    /// Element the panel is rendered into.
    anchor: HtmlElement,
    panel: PanelElements,
    input_class: String,
}

impl BrowserLinkPlatform {
    pub fn new(
        root: HtmlElement,
        anchor: HtmlElement,
        panel: PanelElements,
        config: &LinkEditorConfig,
    ) -> Self {
        Self {
            root,
            anchor,
            panel,
            input_class: config.input_class.clone(),
        }
    }

    pub fn root(&self) -> &HtmlElement {
        &self.root
    }

    pub fn panel(&self) -> &PanelElements {
        &self.panel
    }

    /// The anchor's parent, which the panel is kept inside of.
    fn scroller(&self) -> Option<Element> {
        self.anchor.parent_element()
    }
}

fn native_selection() -> Option<web_sys::Selection> {
    web_sys::window()?.get_selection().ok().flatten()
}

fn to_rect(rect: DomRect) -> Rect {
    Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
}

impl LinkEditorPlatform for BrowserLinkPlatform {
    fn selection_in_root(&self) -> bool {
        native_selection()
            .and_then(|selection| selection.anchor_node())
            .is_some_and(|node| self.root.contains(Some(&node)))
    }

    fn link_input_focused(&self) -> bool {
        web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.active_element())
            .is_some_and(|element| element.class_list().contains(&self.input_class))
    }

    fn selection_rect(&self) -> Option<Rect> {
        let selection = native_selection()?;
        if selection.range_count() == 0 {
            return None;
        }
        let focus = selection.focus_node()?;
        // Text nodes have no box of their own; measure the element around them.
        let element = match focus.dyn_into::<Element>() {
            Ok(element) => element,
            Err(node) => node.parent_element()?,
        };
        Some(to_rect(element.get_bounding_client_rect()))
    }

    fn anchor_rect(&self) -> Rect {
        to_rect(self.anchor.get_bounding_client_rect())
    }

    fn scroller_rect(&self) -> Option<Rect> {
        self.scroller()
            .map(|scroller| to_rect(scroller.get_bounding_client_rect()))
    }

    fn panel_size(&self) -> Size {
        let (width, height) = self.panel.size();
        Size::new(width, height)
    }

    fn apply_placement(&self, placement: &PanelPlacement) -> Result<(), PlatformError> {
        self.panel.apply(placement)
    }

    fn render_panel(&self, view: &PanelView) -> Result<(), PlatformError> {
        self.panel.render(view)
    }

    fn observe_viewport(&self, on_change: Rc<dyn Fn()>) -> Vec<Unsubscribe> {
        let mut listeners = Vec::new();
        if let Some(window) = web_sys::window() {
            let on_resize = Rc::clone(&on_change);
            listeners.push(EventListener::new(&window, "resize", move |_| on_resize()));
        }
        if let Some(scroller) = self.scroller() {
            let on_scroll = Rc::clone(&on_change);
            listeners.push(EventListener::new(&scroller, "scroll", move |_| on_scroll()));
        }
        tracing::trace!(
            target: "weaver::link_editor::browser",
            count = listeners.len(),
            "observing viewport"
        );
        listeners
            .into_iter()
            .map(|listener| -> Unsubscribe { Box::new(move || drop(listener)) })
            .collect()
    }
}
