//! The editor engine surface the link editor talks to.
//!
//! This is deliberately small: an immutable state that is swapped on every
//! update, an editable flag, update/editable listeners, and a command bus.
//! Nested editors (e.g. an image caption) forward commands they don't consume
//! to their parent, so a single controller on the root editor sees them all.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use smol_str::SmolStr;

use crate::command::{CommandBus, CommandKind, CommandPriority, EditorCommand, Propagation};
use crate::node::DocumentTree;
use crate::selection::SelectionSnapshot;
use crate::state::EditorState;
use crate::subscription::Unsubscribe;

static NEXT_EDITOR_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an editor instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EditorId(pub u64);

/// Passed to update listeners after every committed update.
#[derive(Clone, Debug)]
pub struct UpdateEvent {
    pub state: EditorState,
    pub prev_version: u64,
}

type UpdateListener = Rc<dyn Fn(&UpdateEvent)>;
type EditableListener = Rc<dyn Fn(bool)>;

/// Listener list that hands out unsubscribe closures.
struct Listeners<F: ?Sized> {
    entries: Rc<RefCell<Vec<(u64, Rc<F>)>>>,
    next_id: Cell<u64>,
}

impl<F: ?Sized + 'static> Listeners<F> {
    fn new() -> Self {
        Self {
            entries: Rc::new(RefCell::new(Vec::new())),
            next_id: Cell::new(0),
        }
    }

    fn register(&self, listener: Rc<F>) -> Unsubscribe {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push((id, listener));
        let entries = Rc::downgrade(&self.entries);
        Box::new(move || {
            if let Some(entries) = entries.upgrade() {
                entries.borrow_mut().retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    fn snapshot(&self) -> Vec<Rc<F>> {
        self.entries
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

struct EditorInner {
    id: EditorId,
    namespace: SmolStr,
    parent: Option<Weak<EditorInner>>,
    state: RefCell<EditorState>,
    editable: Cell<bool>,
    commands: CommandBus,
    update_listeners: Listeners<dyn Fn(&UpdateEvent)>,
    editable_listeners: Listeners<dyn Fn(bool)>,
}

/// Shared handle to an editor. Clones refer to the same editor.
#[derive(Clone)]
pub struct Editor {
    inner: Rc<EditorInner>,
}

/// Non-owning handle, for closures stored inside the editor itself.
#[derive(Clone)]
pub struct WeakEditor {
    inner: Weak<EditorInner>,
}

impl WeakEditor {
    pub fn upgrade(&self) -> Option<Editor> {
        self.inner.upgrade().map(|inner| Editor { inner })
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("id", &self.inner.id)
            .field("namespace", &self.inner.namespace)
            .field("version", &self.inner.state.borrow().version())
            .field("editable", &self.inner.editable.get())
            .finish()
    }
}

impl PartialEq for Editor {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Editor {}

impl Editor {
    /// Create an editable root editor over `tree` with no selection.
    pub fn new(namespace: impl Into<SmolStr>, tree: DocumentTree) -> Self {
        Self::build(namespace.into(), tree, None)
    }

    /// Create an editor nested inside this one.
    pub fn create_nested(&self, namespace: impl Into<SmolStr>, tree: DocumentTree) -> Self {
        Self::build(namespace.into(), tree, Some(Rc::downgrade(&self.inner)))
    }

    fn build(namespace: SmolStr, tree: DocumentTree, parent: Option<Weak<EditorInner>>) -> Self {
        Self {
            inner: Rc::new(EditorInner {
                id: EditorId(NEXT_EDITOR_ID.fetch_add(1, Ordering::Relaxed)),
                namespace,
                parent,
                state: RefCell::new(EditorState::new(tree)),
                editable: Cell::new(true),
                commands: CommandBus::new(),
                update_listeners: Listeners::new(),
                editable_listeners: Listeners::new(),
            }),
        }
    }

    pub fn id(&self) -> EditorId {
        self.inner.id
    }

    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    pub fn parent(&self) -> Option<Editor> {
        self.inner
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| Editor { inner })
    }

    pub fn downgrade(&self) -> WeakEditor {
        WeakEditor {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> EditorState {
        self.inner.state.borrow().clone()
    }

    /// Run `f` against a consistent snapshot of the current state.
    ///
    /// The snapshot is detached from the editor, so updates triggered from
    /// inside `f` do not affect what `f` sees.
    pub fn read<R>(&self, f: impl FnOnce(&EditorState) -> R) -> R {
        let state = self.state();
        f(&state)
    }

    /// Commit `state` and notify update listeners.
    pub fn set_state(&self, state: EditorState) {
        let prev_version = self.inner.state.replace(state.clone()).version();
        tracing::trace!(
            target: "weaver::link_editor::editor",
            editor = self.inner.id.0,
            prev_version,
            version = state.version(),
            "committed editor state"
        );
        let event = UpdateEvent {
            state,
            prev_version,
        };
        for listener in self.inner.update_listeners.snapshot() {
            listener(&event);
        }
    }

    /// Apply `f` to a copy of the tree and selection, then commit the result.
    pub fn update<R>(
        &self,
        f: impl FnOnce(&mut DocumentTree, &mut Option<SelectionSnapshot>) -> R,
    ) -> R {
        let (next, result) = self.state().updated(f);
        self.set_state(next);
        result
    }

    /// Commit a new selection without announcing it.
    pub fn set_selection(&self, selection: Option<SelectionSnapshot>) {
        let next = self.inner.state.borrow().with_selection(selection);
        self.set_state(next);
    }

    /// Commit a new selection and dispatch [`EditorCommand::SelectionChange`],
    /// the way a DOM `selectionchange` reaches the editor.
    pub fn select(&self, selection: Option<SelectionSnapshot>) {
        self.set_selection(selection);
        self.dispatch_command(EditorCommand::SelectionChange);
    }

    pub fn is_editable(&self) -> bool {
        self.inner.editable.get()
    }

    /// Toggle read-only mode, notifying editable listeners on change.
    pub fn set_editable(&self, editable: bool) {
        if self.inner.editable.replace(editable) == editable {
            return;
        }
        tracing::debug!(
            target: "weaver::link_editor::editor",
            editor = self.inner.id.0,
            editable,
            "editable state changed"
        );
        for listener in self.inner.editable_listeners.snapshot() {
            listener(editable);
        }
    }

    pub fn register_update_listener(&self, listener: impl Fn(&UpdateEvent) + 'static) -> Unsubscribe {
        let listener: UpdateListener = Rc::new(listener);
        self.inner.update_listeners.register(listener)
    }

    pub fn register_editable_listener(&self, listener: impl Fn(bool) + 'static) -> Unsubscribe {
        let listener: EditableListener = Rc::new(listener);
        self.inner.editable_listeners.register(listener)
    }

    pub fn register_command(
        &self,
        kind: CommandKind,
        priority: CommandPriority,
        handler: impl Fn(&EditorCommand, &Editor) -> Propagation + 'static,
    ) -> Unsubscribe {
        self.inner.commands.register(kind, priority, Rc::new(handler))
    }

    pub fn commands(&self) -> &CommandBus {
        &self.inner.commands
    }

    /// Number of registered update and editable listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.update_listeners.len() + self.inner.editable_listeners.len()
    }

    /// Dispatch `command`, walking priorities from highest to lowest and, within
    /// each tier, this editor before its ancestors. Returns whether a handler
    /// stopped propagation.
    pub fn dispatch_command(&self, command: EditorCommand) -> bool {
        let kind = command.kind();
        let chain: Vec<Editor> = std::iter::successors(Some(self.clone()), Editor::parent).collect();

        for priority in CommandPriority::DESCENDING {
            for editor in &chain {
                for handler in editor.inner.commands.handlers(kind, priority) {
                    if handler(&command, self).is_stop() {
                        tracing::trace!(
                            target: "weaver::link_editor::commands",
                            ?kind,
                            ?priority,
                            origin = self.inner.id.0,
                            handled_by = editor.inner.id.0,
                            "command handled"
                        );
                        return true;
                    }
                }
            }
        }
        false
    }
}
