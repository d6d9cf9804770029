//! Mounting a floating link editor into a page.

use web_sys::HtmlElement;
use weaver_link_editor::{Editor, FloatingLinkEditor, LinkEditorConfig, LinkEditorError, PlatformError};

use crate::events::{bind_input, bind_input_keys};
use crate::panel::PanelElements;
use crate::platform::BrowserLinkPlatform;

/// A floating link editor running against the real DOM.
pub type BrowserLinkEditor = FloatingLinkEditor<BrowserLinkPlatform>;

/// Create the panel inside `anchor` (the document body when `None`) and
/// mount a controller for `editor`, whose contenteditable element is `root`.
///
/// The panel element and its listeners are removed together with the
/// controller's other registrations when the returned value is dropped.
pub fn mount_link_editor(
    editor: &Editor,
    root: HtmlElement,
    anchor: Option<HtmlElement>,
    config: LinkEditorConfig,
) -> Result<BrowserLinkEditor, LinkEditorError> {
    let document = root
        .owner_document()
        .ok_or_else(|| PlatformError::from("editor root is not in a document"))?;
    let anchor = match anchor {
        Some(anchor) => anchor,
        None => document
            .body()
            .ok_or_else(|| PlatformError::from("document has no body"))?,
    };

    let panel = PanelElements::create(&document, &anchor, &config)?;
    let platform = BrowserLinkPlatform::new(root, anchor, panel.clone(), &config);
    let controller = FloatingLinkEditor::mount(editor, platform, config);

    controller.add_subscription(bind_input(&panel.input, controller.downgrade()));
    controller.add_subscription(bind_input_keys(&panel.input, controller.downgrade()));
    controller.add_subscription(Box::new(move || panel.remove()));

    tracing::debug!(
        target: "weaver::link_editor::browser",
        editor = editor.id().0,
        "link editor panel attached"
    );
    Ok(controller)
}
