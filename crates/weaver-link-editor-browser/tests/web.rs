//! WASM browser tests for weaver-link-editor-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use web_sys::{Event, HtmlElement, KeyboardEvent, KeyboardEventInit};
use weaver_link_editor_browser::{
    BrowserLinkEditor, DocumentTree, Editor, EditorCommand, LinkEditorConfig, LinkEditorPlatform,
    NodeKey, NodeKind, PanelState, SelectionSnapshot, bind_escape, mount_link_editor,
};

struct Page {
    root: HtmlElement,
    anchor: HtmlElement,
    editor: Editor,
    linked: NodeKey,
    plain: NodeKey,
}

fn element(tag: &str) -> HtmlElement {
    gloo_utils::document()
        .create_element(tag)
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap()
}

/// `<div contenteditable>see <a href="https://a.com/x">here</a></div>` inside a
/// positioned wrapper, with a matching document tree.
fn page() -> Page {
    let body = gloo_utils::body();
    let scroller = element("div");
    scroller.style().set_property("position", "relative").unwrap();
    let anchor = element("div");
    let root = element("div");
    root.set_attribute("contenteditable", "true").unwrap();
    root.set_inner_html(r#"see <a href="https://a.com/x">here</a>"#);
    anchor.append_child(&root).unwrap();
    scroller.append_child(&anchor).unwrap();
    body.append_child(&scroller).unwrap();

    let mut tree = DocumentTree::new();
    let para = tree.append(tree.root(), NodeKind::Paragraph).unwrap();
    let plain = tree.append(para, NodeKind::text("see ")).unwrap();
    let link = tree.append(para, NodeKind::link("https://a.com/x")).unwrap();
    let linked = tree.append(link, NodeKind::text("here")).unwrap();

    Page {
        root,
        anchor,
        editor: Editor::new("web", tree),
        linked,
        plain,
    }
}

fn mount(page: &Page) -> BrowserLinkEditor {
    mount_link_editor(
        &page.editor,
        page.root.clone(),
        Some(page.anchor.clone()),
        LinkEditorConfig::default(),
    )
    .unwrap()
}

/// Put the native caret inside the `<a>` text.
fn select_link_text(page: &Page) {
    let text = page
        .root
        .query_selector("a")
        .unwrap()
        .unwrap()
        .first_child()
        .unwrap();
    let range = gloo_utils::document().create_range().unwrap();
    range.set_start(&text, 1).unwrap();
    range.collapse_with_to_start(true);
    let selection = gloo_utils::window().get_selection().unwrap().unwrap();
    selection.remove_all_ranges().unwrap();
    selection.add_range(&range).unwrap();
}

fn panel_opacity(controller: &BrowserLinkEditor) -> String {
    controller
        .platform()
        .panel()
        .container
        .style()
        .get_property_value("opacity")
        .unwrap()
}

#[wasm_bindgen_test]
fn test_mount_builds_hidden_panel() {
    let page = page();
    let controller = mount(&page);

    let input = page.anchor.query_selector("input.link-input").unwrap();
    assert!(input.is_some());
    let link = page.anchor.query_selector(".link-editor a").unwrap().unwrap();
    assert_eq!(link.get_attribute("target").as_deref(), Some("_blank"));
    assert_eq!(link.get_attribute("rel").as_deref(), Some("noopener noreferrer"));
    assert_eq!(panel_opacity(&controller), "0");
    assert!(!controller.is_visible());
}

#[wasm_bindgen_test]
fn test_native_selection_is_read_from_root() {
    let page = page();
    let controller = mount(&page);
    assert!(!controller.platform().selection_in_root());

    select_link_text(&page);
    assert!(controller.platform().selection_in_root());
    assert!(controller.platform().selection_rect().is_some());
    assert!(!controller.platform().link_input_focused());

    controller.platform().panel().input.focus().unwrap();
    assert!(controller.platform().link_input_focused());
}

#[wasm_bindgen_test]
fn test_selecting_link_shows_panel() {
    let page = page();
    let controller = mount(&page);
    select_link_text(&page);
    page.editor.select(Some(SelectionSnapshot::caret(page.linked, 1)));

    assert!(matches!(controller.state(), PanelState::Viewing { .. }));
    assert_eq!(panel_opacity(&controller), "1");
    let panel = controller.platform().panel();
    assert_eq!(panel.input.value(), "https://a.com/x");
    assert_eq!(panel.link.text_content().as_deref(), Some("https://a.com/x"));

    page.editor.select(Some(SelectionSnapshot::caret(page.plain, 1)));
    assert_eq!(controller.state(), PanelState::Hidden);
    assert_eq!(panel_opacity(&controller), "0");
}

#[wasm_bindgen_test]
fn test_typing_updates_draft() {
    let page = page();
    let controller = mount(&page);
    select_link_text(&page);
    page.editor.select(Some(SelectionSnapshot::caret(page.linked, 1)));

    let input = &controller.platform().panel().input;
    input.set_value("c.com");
    input
        .dispatch_event(&Event::new("input").unwrap())
        .unwrap();
    assert_eq!(controller.draft(), "c.com");
}

#[wasm_bindgen_test]
fn test_enter_in_input_is_suppressed() {
    let page = page();
    let controller = mount(&page);
    select_link_text(&page);
    page.editor.select(Some(SelectionSnapshot::caret(page.linked, 1)));

    let init = KeyboardEventInit::new();
    init.set_key("Enter");
    init.set_cancelable(true);
    let event = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
    let not_cancelled = controller
        .platform()
        .panel()
        .input
        .dispatch_event(&event)
        .unwrap();
    assert!(!not_cancelled);
}

#[wasm_bindgen_test]
fn test_escape_in_root_hides_panel() {
    let page = page();
    let controller = mount(&page);
    let _escape = bind_escape(&page.editor, &page.root);
    select_link_text(&page);
    page.editor.select(Some(SelectionSnapshot::caret(page.linked, 1)));
    assert!(controller.is_visible());

    let init = KeyboardEventInit::new();
    init.set_key("Escape");
    init.set_cancelable(true);
    let event = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
    assert!(!page.root.dispatch_event(&event).unwrap());
    assert!(!controller.is_visible());
    assert!(!page.editor.dispatch_command(EditorCommand::KeyEscape));
}

#[wasm_bindgen_test]
fn test_unmount_removes_panel() {
    let page = page();
    let controller = mount(&page);
    assert!(page.anchor.query_selector(".link-editor").unwrap().is_some());

    controller.unmount();
    assert!(page.anchor.query_selector(".link-editor").unwrap().is_none());
    assert_eq!(page.editor.listener_count(), 0);
    assert!(page.editor.commands().is_empty());
}
