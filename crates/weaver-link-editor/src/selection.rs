//! Selection snapshots.
//!
//! A snapshot is captured by value and never mutated. Keys inside it may go
//! stale once the document changes; consumers check with
//! [`SelectionSnapshot::is_valid_in`] before acting on it.

use crate::node::{DocumentTree, NodeKey};

/// A position inside a node: char offset for text, child index for elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    pub key: NodeKey,
    pub offset: usize,
}

impl Point {
    pub fn new(key: NodeKey, offset: usize) -> Self {
        Self { key, offset }
    }

    /// Whether the point sits at the very end of its node.
    pub fn is_at_node_end(&self, tree: &DocumentTree) -> bool {
        tree.get(self.key)
            .is_some_and(|node| self.offset == node.size())
    }
}

/// Cursor or highlighted range between two points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeSelection {
    /// Where the selection started.
    pub anchor: Point,
    /// Where the selection currently ends.
    pub focus: Point,
}

impl RangeSelection {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    /// Collapsed selection at a single point.
    pub fn caret(point: Point) -> Self {
        Self {
            anchor: point,
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Whether the focus precedes the anchor in document order.
    pub fn is_backward(&self, tree: &DocumentTree) -> bool {
        if self.anchor.key == self.focus.key {
            self.focus.offset < self.anchor.offset
        } else {
            tree.is_before(self.focus.key, self.anchor.key)
        }
    }

    /// The node a range selection is considered to "rest on".
    ///
    /// For a selection spanning two nodes, a boundary point sitting at the end
    /// of its node does not count; the other end is used instead.
    pub fn selected_node(&self, tree: &DocumentTree) -> Option<NodeKey> {
        let anchor = tree.get(self.anchor.key)?.key;
        let focus = tree.get(self.focus.key)?.key;
        if anchor == focus {
            return Some(anchor);
        }
        let node = if self.is_backward(tree) {
            if self.focus.is_at_node_end(tree) { anchor } else { focus }
        } else if self.anchor.is_at_node_end(tree) {
            focus
        } else {
            anchor
        };
        Some(node)
    }
}

/// One or more whole nodes selected as objects (images, embeds).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeSelection {
    pub keys: Vec<NodeKey>,
}

/// Rectangular cell selection inside a table-like node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSelection {
    pub grid: NodeKey,
    pub anchor_cell: NodeKey,
    pub focus_cell: NodeKey,
}

/// Editor selection at a point in time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionSnapshot {
    Range(RangeSelection),
    Node(NodeSelection),
    Grid(GridSelection),
}

impl From<RangeSelection> for SelectionSnapshot {
    fn from(range: RangeSelection) -> Self {
        Self::Range(range)
    }
}

impl SelectionSnapshot {
    /// Collapsed range selection at `key`/`offset`.
    pub fn caret(key: NodeKey, offset: usize) -> Self {
        Self::Range(RangeSelection::caret(Point::new(key, offset)))
    }

    pub fn range(
        anchor_key: NodeKey,
        anchor_offset: usize,
        focus_key: NodeKey,
        focus_offset: usize,
    ) -> Self {
        Self::Range(RangeSelection::new(
            Point::new(anchor_key, anchor_offset),
            Point::new(focus_key, focus_offset),
        ))
    }

    pub fn as_range(&self) -> Option<&RangeSelection> {
        match self {
            Self::Range(range) => Some(range),
            _ => None,
        }
    }

    /// Whether every node referenced by the snapshot still exists in `tree`.
    pub fn is_valid_in(&self, tree: &DocumentTree) -> bool {
        match self {
            Self::Range(range) => {
                tree.contains(range.anchor.key) && tree.contains(range.focus.key)
            }
            Self::Node(nodes) => nodes.keys.iter().all(|key| tree.contains(*key)),
            Self::Grid(grid) => {
                tree.contains(grid.grid)
                    && tree.contains(grid.anchor_cell)
                    && tree.contains(grid.focus_cell)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    /// `plain` then a link holding `linked`, all in one paragraph.
    fn two_texts() -> (DocumentTree, NodeKey, NodeKey) {
        let mut tree = DocumentTree::new();
        let para = tree.append(tree.root(), NodeKind::Paragraph).unwrap();
        let plain = tree.append(para, NodeKind::text("plain")).unwrap();
        let link = tree.append(para, NodeKind::link("https://a.com")).unwrap();
        let linked = tree.append(link, NodeKind::text("linked")).unwrap();
        (tree, plain, linked)
    }

    #[test]
    fn test_selected_node_same_node() {
        let (tree, plain, _) = two_texts();
        let sel = RangeSelection::new(Point::new(plain, 1), Point::new(plain, 3));
        assert_eq!(sel.selected_node(&tree), Some(plain));
    }

    #[test]
    fn test_selected_node_forward_from_node_end() {
        let (tree, plain, linked) = two_texts();
        // Anchor at the end of `plain`: the selection really starts in `linked`.
        let sel = RangeSelection::new(Point::new(plain, 5), Point::new(linked, 3));
        assert!(!sel.is_backward(&tree));
        assert_eq!(sel.selected_node(&tree), Some(linked));

        let sel = RangeSelection::new(Point::new(plain, 2), Point::new(linked, 3));
        assert_eq!(sel.selected_node(&tree), Some(plain));
    }

    #[test]
    fn test_selected_node_backward() {
        let (tree, plain, linked) = two_texts();
        let sel = RangeSelection::new(Point::new(linked, 3), Point::new(plain, 5));
        assert!(sel.is_backward(&tree));
        assert_eq!(sel.selected_node(&tree), Some(linked));

        let sel = RangeSelection::new(Point::new(linked, 3), Point::new(plain, 1));
        assert_eq!(sel.selected_node(&tree), Some(plain));
    }

    #[test]
    fn test_backward_within_node() {
        let (tree, plain, _) = two_texts();
        assert!(RangeSelection::new(Point::new(plain, 4), Point::new(plain, 1)).is_backward(&tree));
        assert!(!RangeSelection::caret(Point::new(plain, 1)).is_backward(&tree));
    }

    #[test]
    fn test_stale_snapshot() {
        let (tree, plain, _) = two_texts();
        assert!(SelectionSnapshot::caret(plain, 0).is_valid_in(&tree));
        assert!(!SelectionSnapshot::caret(NodeKey(42), 0).is_valid_in(&tree));
        let nodes = SelectionSnapshot::Node(NodeSelection {
            keys: vec![plain, NodeKey(42)],
        });
        assert!(!nodes.is_valid_in(&tree));
        assert_eq!(nodes.as_range(), None);
    }
}
