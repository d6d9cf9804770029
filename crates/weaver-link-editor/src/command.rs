//! Named commands with priority-ordered handlers.
//!
//! Handlers run from the highest [`CommandPriority`] down, in registration
//! order within a tier, until one returns [`Propagation::Stop`].

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::editor::Editor;
use crate::selection::SelectionSnapshot;
use crate::subscription::Unsubscribe;

/// Handler tiers, lowest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommandPriority {
    /// Built-in engine behaviour; runs last.
    Editor,
    Low,
    Normal,
    High,
    Critical,
}

impl CommandPriority {
    /// All tiers in dispatch order.
    pub const DESCENDING: [CommandPriority; 5] = [
        CommandPriority::Critical,
        CommandPriority::High,
        CommandPriority::Normal,
        CommandPriority::Low,
        CommandPriority::Editor,
    ];
}

/// Whether a handler consumed the command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Propagation {
    /// Handled; later handlers are skipped.
    Stop,
    /// Not (fully) handled; keep going.
    Continue,
}

impl Propagation {
    pub fn is_stop(self) -> bool {
        self == Propagation::Stop
    }
}

/// Payload for [`EditorCommand::ToggleLink`].
///
/// `url: None` removes the link around `selection`. A `None` selection means
/// "whatever is selected when the command runs".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToggleLink {
    pub url: Option<String>,
    pub selection: Option<SelectionSnapshot>,
}

/// Commands understood by the link editor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorCommand {
    /// The selection moved in this editor or a nested one.
    SelectionChange,
    /// Escape pressed while the editable surface had focus.
    KeyEscape,
    ToggleLink(ToggleLink),
}

/// Discriminant used to register for a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
    SelectionChange,
    KeyEscape,
    ToggleLink,
}

impl EditorCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::SelectionChange => CommandKind::SelectionChange,
            Self::KeyEscape => CommandKind::KeyEscape,
            Self::ToggleLink(_) => CommandKind::ToggleLink,
        }
    }
}

/// Receives the command and the editor it was originally dispatched on.
pub type CommandHandler = Rc<dyn Fn(&EditorCommand, &Editor) -> Propagation>;

struct HandlerEntry {
    id: u64,
    kind: CommandKind,
    priority: CommandPriority,
    handler: CommandHandler,
}

/// Per-editor handler registry.
#[derive(Default)]
pub struct CommandBus {
    entries: Rc<RefCell<Vec<HandlerEntry>>>,
    next_id: Cell<u64>,
}

impl std::fmt::Debug for CommandBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandBus")
            .field("handlers", &self.entries.borrow().len())
            .finish()
    }
}

impl CommandBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        kind: CommandKind,
        priority: CommandPriority,
        handler: CommandHandler,
    ) -> Unsubscribe {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push(HandlerEntry {
            id,
            kind,
            priority,
            handler,
        });

        let entries: Weak<RefCell<Vec<HandlerEntry>>> = Rc::downgrade(&self.entries);
        Box::new(move || {
            if let Some(entries) = entries.upgrade() {
                entries.borrow_mut().retain(|entry| entry.id != id);
            }
        })
    }

    /// Snapshot of the handlers for one tier, so handlers may (un)register while running.
    pub fn handlers(&self, kind: CommandKind, priority: CommandPriority) -> Vec<CommandHandler> {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.kind == kind && entry.priority == priority)
            .map(|entry| Rc::clone(&entry.handler))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::DocumentTree;

    fn logging_handler(
        log: &Rc<RefCell<Vec<&'static str>>>,
        name: &'static str,
        result: Propagation,
    ) -> impl Fn(&EditorCommand, &Editor) -> Propagation + 'static {
        let log = Rc::clone(log);
        move |_, _| {
            log.borrow_mut().push(name);
            result
        }
    }

    #[test]
    fn test_priority_order_and_short_circuit() {
        let editor = Editor::new("test", DocumentTree::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        let _low = editor.register_command(
            CommandKind::KeyEscape,
            CommandPriority::Low,
            logging_handler(&log, "low", Propagation::Continue),
        );
        let _high = editor.register_command(
            CommandKind::KeyEscape,
            CommandPriority::High,
            logging_handler(&log, "high", Propagation::Continue),
        );
        let _critical = editor.register_command(
            CommandKind::KeyEscape,
            CommandPriority::Critical,
            logging_handler(&log, "critical", Propagation::Continue),
        );

        assert!(!editor.dispatch_command(EditorCommand::KeyEscape));
        assert_eq!(*log.borrow(), vec!["critical", "high", "low"]);

        log.borrow_mut().clear();
        let _stop = editor.register_command(
            CommandKind::KeyEscape,
            CommandPriority::Normal,
            logging_handler(&log, "normal", Propagation::Stop),
        );
        assert!(editor.dispatch_command(EditorCommand::KeyEscape));
        assert_eq!(*log.borrow(), vec!["critical", "high", "normal"]);
    }

    #[test]
    fn test_registration_order_within_tier() {
        let editor = Editor::new("test", DocumentTree::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        let _a = editor.register_command(
            CommandKind::SelectionChange,
            CommandPriority::Low,
            logging_handler(&log, "first", Propagation::Continue),
        );
        let _b = editor.register_command(
            CommandKind::SelectionChange,
            CommandPriority::Low,
            logging_handler(&log, "second", Propagation::Continue),
        );
        editor.dispatch_command(EditorCommand::SelectionChange);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_unsubscribe_removes_only_that_handler() {
        let bus = CommandBus::new();
        let noop: CommandHandler = Rc::new(|_: &EditorCommand, _: &Editor| Propagation::Continue);
        let first = bus.register(CommandKind::KeyEscape, CommandPriority::High, Rc::clone(&noop));
        let _second = bus.register(CommandKind::KeyEscape, CommandPriority::High, noop);
        assert_eq!(bus.handlers(CommandKind::KeyEscape, CommandPriority::High).len(), 2);

        first();
        assert_eq!(bus.handlers(CommandKind::KeyEscape, CommandPriority::High).len(), 1);
        assert!(bus.handlers(CommandKind::ToggleLink, CommandPriority::High).is_empty());
    }

    #[test]
    fn test_unsubscribe_after_bus_dropped() {
        let bus = CommandBus::new();
        let unsubscribe = bus.register(
            CommandKind::SelectionChange,
            CommandPriority::Low,
            Rc::new(|_: &EditorCommand, _: &Editor| Propagation::Continue),
        );
        drop(bus);
        unsubscribe();
    }

    #[test]
    fn test_handler_can_unregister_itself_mid_dispatch() {
        let editor = Editor::new("test", DocumentTree::new());
        let slot: Rc<RefCell<Option<Unsubscribe>>> = Rc::new(RefCell::new(None));
        let calls = Rc::new(Cell::new(0));

        let handler = {
            let slot = Rc::clone(&slot);
            let calls = Rc::clone(&calls);
            move |_: &EditorCommand, _: &Editor| {
                calls.set(calls.get() + 1);
                if let Some(unsubscribe) = slot.borrow_mut().take() {
                    unsubscribe();
                }
                Propagation::Continue
            }
        };
        let unsubscribe =
            editor.register_command(CommandKind::KeyEscape, CommandPriority::Low, handler);
        *slot.borrow_mut() = Some(unsubscribe);

        editor.dispatch_command(EditorCommand::KeyEscape);
        editor.dispatch_command(EditorCommand::KeyEscape);
        assert_eq!(calls.get(), 1);
    }
}
