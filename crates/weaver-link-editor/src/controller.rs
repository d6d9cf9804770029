//! The floating link editor controller.
//!
//! [`FloatingLinkEditor`] wires the resolver, state machine and position
//! synchronizer to an [`Editor`] and a [`LinkEditorPlatform`]. Every trigger
//! (content update, selection change, editable toggle, viewport change)
//! re-derives the panel from scratch, so the order triggers arrive in does not
//! matter. Registrations on the root editor live in one [`SubscriptionGroup`];
//! a nested active editor gets its own listeners, swapped whenever the active
//! editor changes. Both are torn down together on unmount or drop.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::command::{CommandKind, CommandPriority, EditorCommand, Propagation};
use crate::config::LinkEditorConfig;
use crate::editor::{Editor, WeakEditor};
use crate::machine::{InputKey, KeyOutcome, LinkEditorMachine, PanelState};
use crate::observer::{Observation, Trigger, observe};
use crate::platform::{LinkEditorPlatform, PanelView};
use crate::position::{PanelPlacement, PositionSynchronizer, Rect, Size, compute_placement};
use crate::subscription::{SubscriptionGroup, Unsubscribe, merge_register};

struct ControllerInner<P> {
    editor: Editor,
    /// Editor that last reported a selection change; may be nested in `editor`.
    active_editor: RefCell<WeakEditor>,
    /// Update and editable listeners on a nested active editor.
    active_listeners: RefCell<Option<Unsubscribe>>,
    platform: P,
    config: LinkEditorConfig,
    machine: RefCell<LinkEditorMachine>,
    position: RefCell<PositionSynchronizer>,
    last_view: RefCell<Option<PanelView>>,
    subscriptions: RefCell<SubscriptionGroup>,
}

/// A mounted floating link editor. Dropping it unmounts.
pub struct FloatingLinkEditor<P: LinkEditorPlatform + 'static> {
    inner: Rc<ControllerInner<P>>,
}

impl<P: LinkEditorPlatform + 'static> std::fmt::Debug for FloatingLinkEditor<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloatingLinkEditor")
            .field("editor", &self.inner.editor)
            .field("state", &*self.inner.machine.borrow())
            .field("subscriptions", &*self.inner.subscriptions.borrow())
            .finish()
    }
}

impl<P: LinkEditorPlatform + 'static> FloatingLinkEditor<P> {
    /// Register against `editor` and `platform`, then sync the panel once.
    pub fn mount(editor: &Editor, platform: P, config: LinkEditorConfig) -> Self {
        let inner = Rc::new(ControllerInner {
            editor: editor.clone(),
            active_editor: RefCell::new(editor.downgrade()),
            active_listeners: RefCell::new(None),
            platform,
            config,
            machine: RefCell::new(LinkEditorMachine::new()),
            position: RefCell::new(PositionSynchronizer::new()),
            last_view: RefCell::new(None),
            subscriptions: RefCell::new(SubscriptionGroup::new()),
        });

        let mut group = SubscriptionGroup::new();
        let weak = Rc::downgrade(&inner);

        let on_update = refresher(&weak, Trigger::Update);
        group.add(editor.register_update_listener(move |_| on_update()));

        let on_editable = refresher(&weak, Trigger::EditableChange);
        group.add(editor.register_editable_listener(move |_| on_editable()));

        // Runs ahead of everything else so the active editor is known before
        // any other handler looks at the selection.
        let weak_active = weak.clone();
        group.add(editor.register_command(
            CommandKind::SelectionChange,
            CommandPriority::Critical,
            move |_, origin| {
                if let Some(inner) = weak_active.upgrade() {
                    inner.set_active_editor(origin, &weak_active);
                }
                Propagation::Continue
            },
        ));

        let on_selection = refresher(&weak, Trigger::SelectionChange);
        group.add(editor.register_command(
            CommandKind::SelectionChange,
            CommandPriority::Low,
            move |_, _| {
                on_selection();
                Propagation::Continue
            },
        ));

        let weak_escape = weak.clone();
        group.add(editor.register_command(
            CommandKind::KeyEscape,
            CommandPriority::High,
            move |_, _| match weak_escape.upgrade() {
                Some(inner) => inner.escape(),
                None => Propagation::Continue,
            },
        ));

        let on_viewport: Rc<dyn Fn()> = Rc::new(refresher(&weak, Trigger::Viewport));
        for disposer in inner.platform.observe_viewport(on_viewport) {
            group.add(disposer);
        }

        tracing::debug!(
            target: "weaver::link_editor::controller",
            editor = editor.id().0,
            subscriptions = group.len(),
            "mounted floating link editor"
        );
        inner.subscriptions.replace(group);
        inner.refresh(Trigger::Mount);

        Self { inner }
    }

    pub fn editor(&self) -> &Editor {
        &self.inner.editor
    }

    /// Editor the panel currently tracks.
    pub fn active_editor(&self) -> Editor {
        self.inner.active_editor()
    }

    pub fn config(&self) -> &LinkEditorConfig {
        &self.inner.config
    }

    pub fn platform(&self) -> &P {
        &self.inner.platform
    }

    pub fn state(&self) -> PanelState {
        self.inner.machine.borrow().state().clone()
    }

    pub fn is_visible(&self) -> bool {
        self.inner.machine.borrow().is_visible()
    }

    pub fn draft(&self) -> String {
        self.inner.machine.borrow().draft().to_owned()
    }

    /// The user typed into the URL input.
    pub fn edit_draft(&self, text: impl Into<String>) {
        self.inner.edit_draft(text.into());
    }

    /// Dispatch the draft as a toggle-link command on the active editor.
    ///
    /// Returns whether a command was dispatched and handled. The panel is left
    /// as it is; the resulting editor update decides what it shows next.
    pub fn submit(&self) -> bool {
        self.inner.submit()
    }

    /// Keydown inside the URL input. Enter submits; Enter and Escape both
    /// suppress the browser default.
    pub fn handle_input_key(&self, key: InputKey) -> KeyOutcome {
        self.inner.handle_input_key(key)
    }

    /// Handle for callbacks owned by the controller itself, such as DOM
    /// listeners on the panel.
    pub fn downgrade(&self) -> WeakLinkEditor<P> {
        WeakLinkEditor {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Re-derive the panel now, as if `trigger` had fired.
    pub fn refresh(&self, trigger: Trigger) {
        self.inner.refresh(trigger);
    }

    /// Tie an extra disposer (e.g. a DOM listener on the panel) to this controller's lifetime.
    pub fn add_subscription(&self, disposer: Unsubscribe) {
        self.inner.subscriptions.borrow_mut().add(disposer);
    }

    pub fn is_mounted(&self) -> bool {
        !self.inner.subscriptions.borrow().is_disposed()
    }

    /// Tear down every registration. Equivalent to dropping the controller.
    pub fn unmount(self) {
        drop(self);
    }
}

impl<P: LinkEditorPlatform + 'static> Drop for FloatingLinkEditor<P> {
    fn drop(&mut self) {
        // Take the group out first so disposers that reach back into the
        // controller don't find it borrowed.
        let mut group = std::mem::take(&mut *self.inner.subscriptions.borrow_mut());
        group.dispose();
        self.inner.subscriptions.borrow_mut().dispose();
        let active = self.inner.active_listeners.take();
        if let Some(dispose) = active {
            dispose();
        }
        tracing::debug!(
            target: "weaver::link_editor::controller",
            editor = self.inner.editor.id().0,
            "unmounted floating link editor"
        );
    }
}

/// Non-owning handle to a mounted [`FloatingLinkEditor`]. Calls after
/// unmount do nothing.
pub struct WeakLinkEditor<P> {
    inner: Weak<ControllerInner<P>>,
}

impl<P> Clone for WeakLinkEditor<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<P: LinkEditorPlatform + 'static> WeakLinkEditor<P> {
    pub fn edit_draft(&self, text: impl Into<String>) {
        if let Some(inner) = self.inner.upgrade() {
            inner.edit_draft(text.into());
        }
    }

    pub fn handle_input_key(&self, key: InputKey) -> KeyOutcome {
        match self.inner.upgrade() {
            Some(inner) => inner.handle_input_key(key),
            None => KeyOutcome::Default,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| !inner.subscriptions.borrow().is_disposed())
    }
}

/// Refresh callback that holds the controller weakly.
fn refresher<P>(weak: &Weak<ControllerInner<P>>, trigger: Trigger) -> impl Fn() + 'static
where
    P: LinkEditorPlatform + 'static,
{
    let weak = weak.clone();
    move || {
        if let Some(inner) = weak.upgrade() {
            inner.refresh(trigger);
        }
    }
}

impl<P: LinkEditorPlatform + 'static> ControllerInner<P> {
    /// The tracked editor, or the root once a nested one has been dropped.
    fn active_editor(&self) -> Editor {
        self.active_editor
            .borrow()
            .upgrade()
            .unwrap_or_else(|| self.editor.clone())
    }

    /// Follow `editor` for content and editable changes from now on.
    fn set_active_editor(&self, editor: &Editor, weak: &Weak<Self>) {
        if self.active_editor() == *editor {
            return;
        }
        self.active_editor.replace(editor.downgrade());
        let previous = self.active_listeners.take();
        if let Some(dispose) = previous {
            dispose();
        }
        tracing::debug!(
            target: "weaver::link_editor::controller",
            editor = editor.id().0,
            nested = *editor != self.editor,
            "active editor changed"
        );
        // The root's listeners are part of the main group.
        if *editor == self.editor {
            return;
        }
        let on_update = refresher(weak, Trigger::Update);
        let on_editable = refresher(weak, Trigger::EditableChange);
        let listeners = merge_register([
            editor.register_update_listener(move |_| on_update()),
            editor.register_editable_listener(move |_| on_editable()),
        ]);
        self.active_listeners.replace(Some(listeners));
    }

    fn edit_draft(&self, text: String) {
        self.machine.borrow_mut().edit_draft(text);
        self.sync(None);
    }

    fn submit(&self) -> bool {
        let command = self.machine.borrow().submit();
        let Some(command) = command else {
            return false;
        };
        let editor = self.active_editor();
        tracing::debug!(
            target: "weaver::link_editor::controller",
            editor = editor.id().0,
            url = command.url.as_deref(),
            "submitting link"
        );
        editor.dispatch_command(EditorCommand::ToggleLink(command))
    }

    fn handle_input_key(&self, key: InputKey) -> KeyOutcome {
        if key == InputKey::Enter {
            self.submit();
        }
        self.machine.borrow().input_key(key)
    }

    fn refresh(&self, trigger: Trigger) {
        let active = self.active_editor();
        let observation = observe(&active, &self.platform, trigger);
        let transition = self.machine.borrow_mut().observe(&observation);
        tracing::trace!(
            target: "weaver::link_editor::controller",
            ?trigger,
            ?transition,
            "refreshed"
        );
        self.sync(Some(&observation));
    }

    fn escape(&self) -> Propagation {
        if self.platform.link_input_focused() {
            return Propagation::Continue;
        }
        let outcome = self.machine.borrow_mut().escape();
        if outcome.is_stop() {
            self.sync(None);
        }
        outcome
    }

    /// Push the machine's current state out to the platform.
    ///
    /// With an observation the panel is (re)placed: parked when hidden, moved
    /// to the selection when the selection is usable, left alone otherwise.
    /// Without one, only a hidden panel is moved.
    fn sync(&self, observation: Option<&Observation>) {
        let view = {
            let machine = self.machine.borrow();
            PanelView {
                visible: machine.is_visible(),
                draft: machine.draft().to_owned(),
            }
        };

        let placement = if !view.visible {
            Some(PanelPlacement::hidden(&self.config))
        } else {
            observation
                .filter(|observation| observation.selection_is_actionable())
                .map(|observation| self.place(observation.rect))
        };

        let moved = placement.filter(|placement| self.position.borrow_mut().update(*placement));
        if let Some(placement) = moved {
            if let Err(error) = self.platform.apply_placement(&placement) {
                tracing::warn!(
                    target: "weaver::link_editor::controller",
                    %error,
                    "failed to position link editor"
                );
            }
        }

        if self.last_view.borrow().as_ref() == Some(&view) {
            return;
        }
        if let Err(error) = self.platform.render_panel(&view) {
            tracing::warn!(
                target: "weaver::link_editor::controller",
                %error,
                "failed to render link editor"
            );
        }
        self.last_view.replace(Some(view));
    }

    fn place(&self, target: Option<Rect>) -> PanelPlacement {
        let size = self.platform.panel_size();
        let panel = Size::new(size.width.min(self.config.max_panel_width), size.height);
        compute_placement(
            target,
            panel,
            self.platform.anchor_rect(),
            self.platform.scroller_rect(),
            &self.config,
        )
    }
}
