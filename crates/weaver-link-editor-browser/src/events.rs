//! DOM event wiring for the panel input and the editable root.

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{EventTarget, HtmlInputElement, KeyboardEvent};
use weaver_link_editor::{
    Editor, EditorCommand, InputKey, KeyOutcome, LinkEditorPlatform, Unsubscribe, WeakLinkEditor,
};

fn disposer(listener: EventListener) -> Unsubscribe {
    Box::new(move || drop(listener))
}

/// Keep the controller's draft in sync with what is typed into `input`.
pub fn bind_input<P: LinkEditorPlatform + 'static>(
    input: &HtmlInputElement,
    controller: WeakLinkEditor<P>,
) -> Unsubscribe {
    let field = input.clone();
    disposer(EventListener::new(input, "input", move |_| {
        controller.edit_draft(field.value());
    }))
}

/// Route Enter and Escape in `input` to the controller.
pub fn bind_input_keys<P: LinkEditorPlatform + 'static>(
    input: &HtmlInputElement,
    controller: WeakLinkEditor<P>,
) -> Unsubscribe {
    disposer(EventListener::new_with_options(
        input,
        "keydown",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let key = InputKey::from_key(&event.key());
            if controller.handle_input_key(key) == KeyOutcome::PreventDefault {
                event.prevent_default();
            }
        },
    ))
}

/// Dispatch [`EditorCommand::KeyEscape`] for Escape pressed inside `root`,
/// suppressing the default when a handler consumed it.
///
/// Hosts whose editor engine already turns keydown into commands don't need this.
pub fn bind_escape(editor: &Editor, root: &EventTarget) -> Unsubscribe {
    let editor = editor.downgrade();
    disposer(EventListener::new_with_options(
        root,
        "keydown",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if InputKey::from_key(&event.key()) != InputKey::Escape {
                return;
            }
            if let Some(editor) = editor.upgrade()
                && editor.dispatch_command(EditorCommand::KeyEscape)
            {
                tracing::trace!(target: "weaver::link_editor::browser", "escape consumed");
                event.prevent_default();
            }
        },
    ))
}
