//! Placing the floating panel relative to the selection.
//!
//! All coordinates are viewport pixels (as returned by
//! `getBoundingClientRect`). The output is a translation relative to the
//! anchor element the panel is rendered into.

use serde::Serialize;

use crate::config::LinkEditorConfig;

/// Axis-aligned rectangle in px.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Transform and opacity to apply to the panel element.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PanelPlacement {
    pub x: f64,
    pub y: f64,
    pub opacity: f64,
}

impl PanelPlacement {
    /// Parked out of view: transparent and far off-screen so it can't take clicks or focus.
    pub fn hidden(config: &LinkEditorConfig) -> Self {
        Self {
            x: config.hidden_offset,
            y: config.hidden_offset,
            opacity: 0.0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }

    /// CSS `transform` value.
    pub fn transform(&self) -> String {
        format!("translate({}px, {}px)", self.x, self.y)
    }

    /// CSS `opacity` value.
    pub fn opacity_css(&self) -> &'static str {
        if self.is_visible() { "1" } else { "0" }
    }
}

/// Compute where the panel goes.
///
/// The panel sits `vertical_gap` below `target`, shifted `horizontal_offset`
/// to the left. It flips above the target when it would run past the bottom of
/// the scroller and there is room above, and it is clamped horizontally inside
/// the scroller. Without a target, or without a scroller to measure against,
/// the panel is hidden.
pub fn compute_placement(
    target: Option<Rect>,
    panel: Size,
    anchor: Rect,
    scroller: Option<Rect>,
    config: &LinkEditorConfig,
) -> PanelPlacement {
    let (Some(target), Some(scroller)) = (target, scroller) else {
        return PanelPlacement::hidden(config);
    };

    let mut top = target.bottom() + config.vertical_gap;
    if top + panel.height > scroller.bottom() {
        let above = target.top() - config.vertical_gap - panel.height;
        if above >= scroller.top() {
            top = above;
        }
    }

    let mut left = target.left() - config.horizontal_offset;
    if left + panel.width > scroller.right() {
        left = scroller.right() - panel.width - config.horizontal_offset;
    }
    left = left.max(scroller.left());

    PanelPlacement {
        x: left - anchor.left(),
        y: top - anchor.top(),
        opacity: 1.0,
    }
}

/// Remembers the last applied placement so identical updates are skipped.
#[derive(Debug, Default)]
pub struct PositionSynchronizer {
    last: Option<PanelPlacement>,
}

impl PositionSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `placement`; returns whether it differs from what was applied last.
    pub fn update(&mut self, placement: PanelPlacement) -> bool {
        if self.last == Some(placement) {
            return false;
        }
        tracing::trace!(
            target: "weaver::link_editor::position",
            x = placement.x,
            y = placement.y,
            visible = placement.is_visible(),
            "panel moved"
        );
        self.last = Some(placement);
        true
    }

    pub fn last(&self) -> Option<PanelPlacement> {
        self.last
    }
}
