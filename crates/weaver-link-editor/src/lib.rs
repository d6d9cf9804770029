//! weaver-link-editor: floating link editor logic without DOM dependencies.
//!
//! This crate provides:
//! - `Editor` - a small editor engine surface: versioned state, listeners,
//!   priority-ordered command bus, nested editors
//! - `resolve_link_context` - whether the selection rests on an editable link
//! - `LinkEditorMachine` - Hidden / Viewing / Editing panel state
//! - `compute_placement` / `PositionSynchronizer` - panel geometry
//! - `FloatingLinkEditor` - the controller composing all of the above,
//!   generic over `LinkEditorPlatform`

pub mod command;
pub mod config;
pub mod controller;
pub mod editor;
pub mod error;
pub mod link;
pub mod machine;
pub mod node;
pub mod observer;
pub mod platform;
pub mod position;
pub mod resolver;
pub mod selection;
pub mod state;
pub mod subscription;
pub mod url;

pub use command::{
    CommandBus, CommandHandler, CommandKind, CommandPriority, EditorCommand, Propagation,
    ToggleLink,
};
pub use config::LinkEditorConfig;
pub use controller::{FloatingLinkEditor, WeakLinkEditor};
pub use editor::{Editor, EditorId, UpdateEvent, WeakEditor};
pub use error::LinkEditorError;
pub use link::{LinkEdit, apply_toggle, register_link_commands};
pub use machine::{InputKey, KeyOutcome, LinkEditorMachine, PanelState, Transition};
pub use node::{Classifiable, DocumentTree, Node, NodeKey, NodeKind};
pub use observer::{Observation, Trigger, observe};
pub use platform::{LinkEditorPlatform, PanelView, PlatformError};
pub use position::{PanelPlacement, PositionSynchronizer, Rect, Size, compute_placement};
pub use resolver::{LinkContext, preview_url, resolve_link_context};
pub use selection::{GridSelection, NodeSelection, Point, RangeSelection, SelectionSnapshot};
pub use smol_str::SmolStr;
pub use state::EditorState;
pub use subscription::{SubscriptionGroup, Unsubscribe, merge_register};
pub use crate::url::{UrlError, sanitize_url};
