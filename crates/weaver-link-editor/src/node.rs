//! Document node model: a closed set of node kinds stored in an arena.
//!
//! Nodes are addressed by [`NodeKey`]. Removed nodes leave an empty slot behind,
//! so a key captured in an old selection can be detected as stale rather than
//! silently pointing at a different node.

use smol_str::SmolStr;

use crate::error::LinkEditorError;

/// Stable handle to a node in a [`DocumentTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeKey(pub u32);

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Every kind of node the editor knows about.
///
/// `Link` is authored through the editing UI; `AutoLink` is inferred from
/// URL- or email-like text and is never offered for editing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Paragraph,
    Text(SmolStr),
    LineBreak,
    Link { url: SmolStr },
    AutoLink { url: SmolStr },
}

impl NodeKind {
    pub fn text(s: impl Into<SmolStr>) -> Self {
        Self::Text(s.into())
    }

    pub fn link(url: impl Into<SmolStr>) -> Self {
        Self::Link { url: url.into() }
    }

    pub fn auto_link(url: impl Into<SmolStr>) -> Self {
        Self::AutoLink { url: url.into() }
    }

    /// Whether nodes of this kind may hold children.
    pub fn is_element(&self) -> bool {
        matches!(
            self,
            Self::Root | Self::Paragraph | Self::Link { .. } | Self::AutoLink { .. }
        )
    }
}

/// Classification predicates over node kinds.
///
/// Mirrors the editor engine's node checks: an auto-detected link *is* a link
/// (it renders as an anchor and carries a URL), so `is_link` holds for both
/// kinds and callers that care about authorship also test `is_auto_link`.
pub trait Classifiable {
    fn kind(&self) -> &NodeKind;

    /// Any hyperlink, manual or auto-detected.
    fn is_link(&self) -> bool {
        matches!(
            self.kind(),
            NodeKind::Link { .. } | NodeKind::AutoLink { .. }
        )
    }

    fn is_auto_link(&self) -> bool {
        matches!(self.kind(), NodeKind::AutoLink { .. })
    }

    fn is_manual_link(&self) -> bool {
        matches!(self.kind(), NodeKind::Link { .. })
    }

    fn is_text(&self) -> bool {
        matches!(self.kind(), NodeKind::Text(_))
    }

    /// Target URL for link-like nodes.
    fn url(&self) -> Option<&str> {
        match self.kind() {
            NodeKind::Link { url } | NodeKind::AutoLink { url } => Some(url.as_str()),
            _ => None,
        }
    }
}

/// A node stored in the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub key: NodeKey,
    pub kind: NodeKind,
    pub parent: Option<NodeKey>,
    pub children: Vec<NodeKey>,
}

impl Classifiable for Node {
    fn kind(&self) -> &NodeKind {
        &self.kind
    }
}

impl Node {
    /// Size used by selection points: chars for text, child count for elements.
    pub fn size(&self) -> usize {
        match &self.kind {
            NodeKind::Text(text) => text.chars().count(),
            _ => self.children.len(),
        }
    }
}

/// Arena-backed document tree rooted at a `Root` node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentTree {
    slots: Vec<Option<Node>>,
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentTree {
    /// Create a tree holding only the root node.
    pub fn new() -> Self {
        let root = Node {
            key: NodeKey(0),
            kind: NodeKind::Root,
            parent: None,
            children: Vec::new(),
        };
        Self {
            slots: vec![Some(root)],
        }
    }

    pub fn root(&self) -> NodeKey {
        NodeKey(0)
    }

    pub fn get(&self, key: NodeKey) -> Option<&Node> {
        self.slots.get(key.0 as usize).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, key: NodeKey) -> Result<&mut Node, LinkEditorError> {
        self.slots
            .get_mut(key.0 as usize)
            .and_then(Option::as_mut)
            .ok_or(LinkEditorError::MissingNode(key))
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.get(key).and_then(|node| node.parent)
    }

    /// Append a new node as the last child of `parent`.
    pub fn append(&mut self, parent: NodeKey, kind: NodeKind) -> Result<NodeKey, LinkEditorError> {
        let parent_node = self.get(parent).ok_or(LinkEditorError::MissingNode(parent))?;
        if !parent_node.kind.is_element() {
            return Err(LinkEditorError::NotAnElement(parent));
        }
        let key = NodeKey(self.slots.len() as u32);
        self.slots.push(Some(Node {
            key,
            kind,
            parent: Some(parent),
            children: Vec::new(),
        }));
        self.get_mut(parent)?.children.push(key);
        Ok(key)
    }

    /// Iterate from `key` up to (but excluding) the root, starting with `key` itself.
    pub fn ancestors(&self, key: NodeKey) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.get(key).map(|node| node.key),
        }
    }

    /// Nearest node at or above `key` matching `predicate`. The root never matches.
    pub fn find_matching_parent(
        &self,
        key: NodeKey,
        predicate: impl Fn(&Node) -> bool,
    ) -> Option<&Node> {
        self.ancestors(key).find(|node| predicate(node))
    }

    /// Index of `key` within its parent's children.
    pub fn index_in_parent(&self, key: NodeKey) -> Option<usize> {
        let parent = self.get(self.parent(key)?)?;
        parent.children.iter().position(|child| *child == key)
    }

    /// Whether `a` comes strictly before `b` in document order.
    pub fn is_before(&self, a: NodeKey, b: NodeKey) -> bool {
        if a == b {
            return false;
        }
        let path_a = self.path_from_root(a);
        let path_b = self.path_from_root(b);
        for (ia, ib) in path_a.iter().zip(path_b.iter()) {
            if ia != ib {
                return ia < ib;
            }
        }
        // One is an ancestor of the other; ancestors come first.
        path_a.len() < path_b.len()
    }

    fn path_from_root(&self, key: NodeKey) -> Vec<usize> {
        let mut path: Vec<usize> = self
            .ancestors(key)
            .filter_map(|node| self.index_in_parent(node.key))
            .collect();
        path.reverse();
        path
    }

    /// Replace the URL of a link-like node, turning an auto-link into a manual one.
    pub fn set_link_url(&mut self, key: NodeKey, url: &str) -> Result<(), LinkEditorError> {
        let node = self.get_mut(key)?;
        if !node.is_link() {
            return Err(LinkEditorError::NotALink(key));
        }
        node.kind = NodeKind::link(url);
        Ok(())
    }

    /// Insert a new link in place of `key` and move `key` inside it.
    pub fn wrap_in_link(&mut self, key: NodeKey, url: &str) -> Result<NodeKey, LinkEditorError> {
        let parent = self.parent(key).ok_or(LinkEditorError::MissingNode(key))?;
        let index = self
            .index_in_parent(key)
            .ok_or(LinkEditorError::MissingNode(key))?;

        let link = NodeKey(self.slots.len() as u32);
        self.slots.push(Some(Node {
            key: link,
            kind: NodeKind::link(url),
            parent: Some(parent),
            children: vec![key],
        }));
        self.get_mut(parent)?.children[index] = link;
        self.get_mut(key)?.parent = Some(link);
        Ok(link)
    }

    /// Remove a link node, splicing its children into its parent at its position.
    pub fn unwrap_link(&mut self, key: NodeKey) -> Result<(), LinkEditorError> {
        let node = self.get(key).ok_or(LinkEditorError::MissingNode(key))?;
        if !node.is_link() {
            return Err(LinkEditorError::NotALink(key));
        }
        let children = node.children.clone();
        let parent = node.parent.ok_or(LinkEditorError::MissingNode(key))?;
        let index = self
            .index_in_parent(key)
            .ok_or(LinkEditorError::MissingNode(key))?;

        for child in &children {
            self.get_mut(*child)?.parent = Some(parent);
        }
        self.get_mut(parent)?
            .children
            .splice(index..=index, children);
        self.slots[key.0 as usize] = None;
        Ok(())
    }
}

/// Iterator returned by [`DocumentTree::ancestors`].
pub struct Ancestors<'a> {
    tree: &'a DocumentTree,
    next: Option<NodeKey>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.get(self.next?)?;
        if node.kind == NodeKind::Root {
            self.next = None;
            return None;
        }
        self.next = node.parent;
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DocumentTree, NodeKey, NodeKey, NodeKey) {
        let mut tree = DocumentTree::new();
        let para = tree.append(tree.root(), NodeKind::Paragraph).unwrap();
        tree.append(para, NodeKind::text("see ")).unwrap();
        let link = tree.append(para, NodeKind::link("https://a.com/x")).unwrap();
        let inside = tree.append(link, NodeKind::text("here")).unwrap();
        (tree, para, link, inside)
    }

    #[test]
    fn test_classification() {
        let manual = Node {
            key: NodeKey(1),
            kind: NodeKind::link("https://a.com"),
            parent: None,
            children: vec![],
        };
        assert!(manual.is_link());
        assert!(manual.is_manual_link());
        assert!(!manual.is_auto_link());
        assert_eq!(manual.url(), Some("https://a.com"));

        let auto = Node {
            kind: NodeKind::auto_link("https://www.b.com"),
            ..manual.clone()
        };
        assert!(auto.is_link());
        assert!(auto.is_auto_link());
        assert!(!auto.is_manual_link());

        let text = Node {
            kind: NodeKind::text("plain"),
            ..manual
        };
        assert!(!text.is_link());
        assert_eq!(text.url(), None);
        assert_eq!(text.size(), 5);
    }

    #[test]
    fn test_ancestors_exclude_root() {
        let (tree, para, link, inside) = sample();
        let keys: Vec<_> = tree.ancestors(inside).map(|n| n.key).collect();
        assert_eq!(keys, vec![inside, link, para]);
    }

    #[test]
    fn test_find_matching_parent_is_inclusive() {
        let (tree, _, link, inside) = sample();
        let found = tree.find_matching_parent(inside, |n| n.is_link()).unwrap();
        assert_eq!(found.key, link);
        let found = tree.find_matching_parent(link, |n| n.is_link()).unwrap();
        assert_eq!(found.key, link);
    }

    #[test]
    fn test_append_to_text_fails() {
        let (mut tree, _, _, inside) = sample();
        assert!(matches!(
            tree.append(inside, NodeKind::LineBreak),
            Err(LinkEditorError::NotAnElement(_))
        ));
        assert!(matches!(
            tree.append(NodeKey(99), NodeKind::LineBreak),
            Err(LinkEditorError::MissingNode(NodeKey(99)))
        ));
    }

    #[test]
    fn test_document_order() {
        let (tree, para, link, inside) = sample();
        let before = tree.get(para).unwrap().children[0];
        assert!(tree.is_before(before, inside));
        assert!(!tree.is_before(inside, before));
        assert!(tree.is_before(link, inside));
        assert!(!tree.is_before(inside, inside));
    }

    #[test]
    fn test_wrap_and_unwrap_link() {
        let (mut tree, para, _, _) = sample();
        let before = tree.get(para).unwrap().children[0];

        let link = tree.wrap_in_link(before, "https://c.com").unwrap();
        assert_eq!(tree.get(para).unwrap().children[0], link);
        assert_eq!(tree.parent(before), Some(link));
        assert_eq!(tree.get(link).unwrap().url(), Some("https://c.com"));

        tree.unwrap_link(link).unwrap();
        assert_eq!(tree.get(para).unwrap().children[0], before);
        assert_eq!(tree.parent(before), Some(para));
        assert!(!tree.contains(link));
    }

    #[test]
    fn test_set_link_url_promotes_auto_link() {
        let mut tree = DocumentTree::new();
        let para = tree.append(tree.root(), NodeKind::Paragraph).unwrap();
        let auto = tree.append(para, NodeKind::auto_link("https://www.b.com")).unwrap();
        tree.set_link_url(auto, "https://b.org").unwrap();
        let node = tree.get(auto).unwrap();
        assert!(node.is_manual_link());
        assert_eq!(node.url(), Some("https://b.org"));

        assert!(matches!(
            tree.set_link_url(para, "https://x.com"),
            Err(LinkEditorError::NotALink(_))
        ));
    }
}
