//! Error types for the link editor.

use miette::Diagnostic;

use crate::node::NodeKey;
use crate::platform::PlatformError;
use crate::url::UrlError;

/// Errors surfaced by document edits and the controller's collaborators.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum LinkEditorError {
    /// The key does not (or no longer) exist in the document.
    #[error("node {0} not found")]
    #[diagnostic(code(weaver::link_editor::missing_node))]
    MissingNode(NodeKey),

    /// Tried to give children to a leaf node.
    #[error("node {0} cannot hold children")]
    #[diagnostic(code(weaver::link_editor::not_an_element))]
    NotAnElement(NodeKey),

    /// Link-only operation applied to another kind of node.
    #[error("node {0} is not a link")]
    #[diagnostic(code(weaver::link_editor::not_a_link))]
    NotALink(NodeKey),

    /// Draft could not be turned into a usable URL.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Url(#[from] UrlError),

    /// DOM or other host failure.
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    #[diagnostic(code(weaver::link_editor::config))]
    Config(#[from] serde_json::Error),
}
