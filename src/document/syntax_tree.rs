//! Structural tree of a parsed document.
//!
//! Only the nodes that matter for deciding where an abbreviation may expand are
//! kept: elements for markup, rules, at-rules and declarations for
//! stylesheets. Nodes live in an arena and refer to their parent by index.

use tower_lsp_server::ls_types::{Position, Range};

use crate::text::range_strictly_contains;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// What a structural node is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// A markup element. `inner` is the span strictly between the opening and
    /// closing tag, or `None` when the element has no closing tag.
    Element { inner: Option<Range> },
    /// A style rule with its selector span
    Rule { selector: Range },
    /// `@media`, `@keyframes` and friends
    AtRule,
    /// A `property: value` pair
    Declaration,
    Other,
}

#[derive(Clone, Debug)]
struct NodeData {
    kind: NodeKind,
    range: Range,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Clone, Debug, Default)]
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
    top_level: Vec<NodeId>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node under `parent` (or at the top level) and return its id.
    ///
    /// Children must be pushed in document order.
    pub fn push(&mut self, parent: Option<NodeId>, kind: NodeKind, range: Range) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            range,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(NodeId(index)) => self.nodes[index].children.push(id),
            None => self.top_level.push(id),
        }
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> ParsedNode<'_> {
        ParsedNode { tree: self, id }
    }

    pub fn top_level(&self) -> impl Iterator<Item = ParsedNode<'_>> {
        self.top_level.iter().map(|id| self.node(*id))
    }

    /// Deepest node whose range strictly contains `position`.
    ///
    /// A position sitting exactly on a node boundary does not belong to it.
    pub fn node_at(&self, position: Position) -> Option<ParsedNode<'_>> {
        let mut found = None;
        let mut candidates = &self.top_level;

        while let Some(id) = candidates
            .iter()
            .find(|id| range_strictly_contains(&self.nodes[id.0].range, position))
        {
            found = Some(*id);
            candidates = &self.nodes[id.0].children;
        }

        found.map(|id| self.node(id))
    }
}

/// A borrowed handle to a node of a [`SyntaxTree`].
#[derive(Clone, Copy)]
pub struct ParsedNode<'tree> {
    tree: &'tree SyntaxTree,
    id: NodeId,
}

impl<'tree> ParsedNode<'tree> {
    fn data(&self) -> &'tree NodeData {
        &self.tree.nodes[self.id.0]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &'tree NodeKind {
        &self.data().kind
    }

    pub fn range(&self) -> Range {
        self.data().range
    }

    pub fn parent(&self) -> Option<ParsedNode<'tree>> {
        self.data().parent.map(|id| self.tree.node(id))
    }

    pub fn children(&self) -> impl Iterator<Item = ParsedNode<'tree>> + 'tree {
        let tree = self.tree;
        self.data().children.iter().map(move |id| tree.node(*id))
    }

    pub fn is_rule(&self) -> bool {
        matches!(self.kind(), NodeKind::Rule { .. })
    }

    /// Span between the opening and closing tag of an element
    pub fn inner_range(&self) -> Option<Range> {
        match self.kind() {
            NodeKind::Element { inner } => *inner,
            _ => None,
        }
    }
}

impl std::fmt::Debug for ParsedNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedNode")
            .field("id", &self.id)
            .field("kind", self.kind())
            .field("range", &self.range())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(sl: u32, sc: u32, el: u32, ec: u32) -> Range {
        Range::new(Position::new(sl, sc), Position::new(el, ec))
    }

    /// `<ul><li></li></ul><p></p>` laid out on one line
    fn sample_tree() -> SyntaxTree {
        let mut tree = SyntaxTree::new();
        let ul = tree.push(
            None,
            NodeKind::Element {
                inner: Some(range(0, 4, 0, 13)),
            },
            range(0, 0, 0, 18),
        );
        tree.push(
            Some(ul),
            NodeKind::Element {
                inner: Some(range(0, 8, 0, 8)),
            },
            range(0, 4, 0, 13),
        );
        tree.push(
            None,
            NodeKind::Element {
                inner: Some(range(0, 21, 0, 21)),
            },
            range(0, 18, 0, 25),
        );
        tree
    }

    #[test]
    fn test_node_at_finds_deepest() {
        let tree = sample_tree();
        let node = tree.node_at(Position::new(0, 8)).unwrap();
        assert_eq!(node.range(), range(0, 4, 0, 13));
        assert_eq!(node.parent().unwrap().range(), range(0, 0, 0, 18));
    }

    #[test]
    fn test_node_at_excludes_boundaries() {
        let tree = sample_tree();
        // On the start of <li>, only <ul> strictly contains the position
        let node = tree.node_at(Position::new(0, 4)).unwrap();
        assert_eq!(node.range(), range(0, 0, 0, 18));
        // Between </ul> and <p>
        assert!(tree.node_at(Position::new(0, 18)).is_none());
    }

    #[test]
    fn test_node_at_sibling() {
        let tree = sample_tree();
        let node = tree.node_at(Position::new(0, 20)).unwrap();
        assert_eq!(node.range(), range(0, 18, 0, 25));
        assert!(node.parent().is_none());
    }

    #[test]
    fn test_children_and_inner_range() {
        let tree = sample_tree();
        let ul = tree.top_level().next().unwrap();
        assert_eq!(ul.children().count(), 1);
        assert_eq!(ul.inner_range(), Some(range(0, 4, 0, 13)));
        assert!(!ul.is_rule());
        assert_eq!(tree.len(), 3);
    }
}
