//! Tunables for the floating link editor.

use serde::{Deserialize, Serialize};

use crate::error::LinkEditorError;

/// Layout and DOM naming for the floating panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkEditorConfig {
    /// Gap in px between the target rectangle and the panel.
    pub vertical_gap: f64,
    /// How far in px the panel sits left of the target's left edge.
    pub horizontal_offset: f64,
    /// Translation used to park the hidden panel out of view.
    pub hidden_offset: f64,
    /// Class carried by the URL input. Focus on an element with this class keeps the panel open.
    pub input_class: String,
    /// Class carried by the panel container.
    pub panel_class: String,
    /// Upper bound for the panel width in px.
    pub max_panel_width: f64,
}

impl Default for LinkEditorConfig {
    fn default() -> Self {
        Self {
            vertical_gap: 10.0,
            horizontal_offset: 5.0,
            hidden_offset: -10000.0,
            input_class: "link-input".to_owned(),
            panel_class: "link-editor".to_owned(),
            max_panel_width: 360.0,
        }
    }
}

impl LinkEditorConfig {
    /// Parse a (possibly partial) JSON config; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, LinkEditorError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_vertical_gap(mut self, gap: f64) -> Self {
        self.vertical_gap = gap;
        self
    }

    #[must_use]
    pub fn with_horizontal_offset(mut self, offset: f64) -> Self {
        self.horizontal_offset = offset;
        self
    }

    #[must_use]
    pub fn with_input_class(mut self, class: impl Into<String>) -> Self {
        self.input_class = class.into();
        self
    }

    #[must_use]
    pub fn with_panel_class(mut self, class: impl Into<String>) -> Self {
        self.panel_class = class.into();
        self
    }
}
