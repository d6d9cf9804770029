//! The floating panel's DOM.
//!
//! ```html
//! <div class="link-editor" aria-hidden="true">
//!   <input class="link-input" type="url">
//!   <a target="_blank" rel="noopener noreferrer"></a>
//! </div>
//! ```

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlAnchorElement, HtmlElement, HtmlInputElement};
use weaver_link_editor::{LinkEditorConfig, PanelPlacement, PanelView, PlatformError};

/// Elements making up one panel instance.
#[derive(Clone, Debug)]
pub struct PanelElements {
    pub container: HtmlElement,
    pub input: HtmlInputElement,
    pub link: HtmlAnchorElement,
}

fn js_err(context: &str, err: wasm_bindgen::JsValue) -> PlatformError {
    PlatformError(format!("{context}: {err:?}"))
}

fn create<T: JsCast>(document: &Document, tag: &str) -> Result<T, PlatformError> {
    document
        .create_element(tag)
        .map_err(|e| js_err("create element", e))?
        .dyn_into::<T>()
        .map_err(|_| PlatformError(format!("<{tag}> has unexpected type")))
}

impl PanelElements {
    /// Build the panel and append it to `anchor`, parked out of view.
    pub fn create(
        document: &Document,
        anchor: &HtmlElement,
        config: &LinkEditorConfig,
    ) -> Result<Self, PlatformError> {
        let container: HtmlElement = create(document, "div")?;
        container.set_class_name(&config.panel_class);
        let style = container.style();
        let max_width = format!("{}px", config.max_panel_width);
        for (property, value) in [
            ("position", "absolute"),
            ("top", "0"),
            ("left", "0"),
            ("z-index", "10"),
            ("max-width", max_width.as_str()),
            ("transition", "opacity 0.5s"),
        ] {
            style
                .set_property(property, value)
                .map_err(|e| js_err("style panel", e))?;
        }

        let input: HtmlInputElement = create(document, "input")?;
        input.set_class_name(&config.input_class);
        input.set_type("url");

        let link: HtmlAnchorElement = create(document, "a")?;
        link.set_target("_blank");
        link.set_rel("noopener noreferrer");

        container
            .append_child(&input)
            .and_then(|_| container.append_child(&link))
            .and_then(|_| anchor.append_child(&container))
            .map_err(|e| js_err("attach panel", e))?;

        let panel = Self {
            container,
            input,
            link,
        };
        panel.apply(&PanelPlacement::hidden(config))?;
        panel.render(&PanelView::default())?;
        Ok(panel)
    }

    pub fn apply(&self, placement: &PanelPlacement) -> Result<(), PlatformError> {
        let style = self.container.style();
        style
            .set_property("transform", &placement.transform())
            .and_then(|_| style.set_property("opacity", placement.opacity_css()))
            .map_err(|e| js_err("position panel", e))
    }

    pub fn render(&self, view: &PanelView) -> Result<(), PlatformError> {
        // Writing the same value back would move the caret in the input.
        if self.input.value() != view.draft {
            self.input.set_value(&view.draft);
        }
        self.link.set_href(&view.draft);
        self.link.set_text_content(Some(&view.draft));
        self.container
            .set_attribute("aria-hidden", if view.visible { "false" } else { "true" })
            .map_err(|e| js_err("render panel", e))
    }

    pub fn size(&self) -> (f64, f64) {
        (
            f64::from(self.container.offset_width()),
            f64::from(self.container.offset_height()),
        )
    }

    pub fn remove(&self) {
        self.container.remove();
    }
}
