//! Document parsing backed by tree-sitter grammars.

use tower_lsp_server::ls_types::Range;
use tree_sitter::{Language, Node, Parser};

use super::TextDocument;
use super::syntax_tree::{NodeId, NodeKind, SyntaxTree};
use crate::syntax::is_stylesheet_language;
use crate::text::PositionMapper;

/// Produces the structural tree of a document.
pub trait DocumentParser: Send + Sync {
    /// Returns `None` when the document cannot be parsed at all.
    fn parse(&self, document: &TextDocument) -> Option<SyntaxTree>;
}

/// Parses stylesheet languages with tree-sitter-css and everything else with
/// tree-sitter-html.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeSitterParser;

impl TreeSitterParser {
    pub fn new() -> Self {
        Self
    }

    fn language_for(language_id: &str) -> Language {
        if is_stylesheet_language(language_id) {
            tree_sitter_css::LANGUAGE.into()
        } else {
            tree_sitter_html::LANGUAGE.into()
        }
    }
}

impl DocumentParser for TreeSitterParser {
    fn parse(&self, document: &TextDocument) -> Option<SyntaxTree> {
        let mut parser = Parser::new();
        if let Err(e) = parser.set_language(&Self::language_for(document.language_id())) {
            log::error!(
                "Failed to load grammar for language '{}': {}",
                document.language_id(),
                e
            );
            return None;
        }

        let Some(ts_tree) = parser.parse(document.text(), None) else {
            log::warn!(
                "tree-sitter returned no tree for a '{}' document",
                document.language_id()
            );
            return None;
        };

        let mapper = document.mapper();
        let mut tree = SyntaxTree::new();
        let mut stack: Vec<(Node, Option<NodeId>)> = vec![(ts_tree.root_node(), None)];

        // Pre-order walk so siblings are appended in document order
        while let Some((node, parent)) = stack.pop() {
            let own = classify(node, &mapper).map(|(kind, range)| tree.push(parent, kind, range));
            let next_parent = own.or(parent);

            let mut cursor = node.walk();
            let children: Vec<Node> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev().map(|child| (child, next_parent)));
        }

        Some(tree)
    }
}

fn node_range(node: Node, mapper: &PositionMapper) -> Option<Range> {
    mapper.byte_range_to_range(node.start_byte(), node.end_byte())
}

fn find_child<'tree>(node: Node<'tree>, kind: &str) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .find(|child| child.kind() == kind && !child.is_missing());
    found
}

/// A tag still being typed (`<li` with no `>`) does not open an element yet.
fn is_unterminated_tag(element: Node) -> bool {
    let mut cursor = element.walk();
    let tag = element
        .children(&mut cursor)
        .find(|child| matches!(child.kind(), "start_tag" | "self_closing_tag"));
    let Some(tag) = tag else {
        return true;
    };
    let mut tag_cursor = tag.walk();
    let closed = tag
        .children(&mut tag_cursor)
        .last()
        .is_some_and(|last| matches!(last.kind(), ">" | "/>") && !last.is_missing());
    tag.is_missing() || tag.has_error() || !closed
}

/// Map a tree-sitter node to a structural node, or `None` for nodes that are
/// only traversed.
fn classify(node: Node, mapper: &PositionMapper) -> Option<(NodeKind, Range)> {
    let kind = match node.kind() {
        "element" | "script_element" | "style_element" => {
            if is_unterminated_tag(node) {
                return None;
            }
            let inner = match (find_child(node, "start_tag"), find_child(node, "end_tag")) {
                (Some(open), Some(close)) => {
                    mapper.byte_range_to_range(open.end_byte(), close.start_byte())
                }
                _ => None,
            };
            NodeKind::Element { inner }
        }
        "rule_set" => match find_child(node, "selectors") {
            Some(selectors) => NodeKind::Rule {
                selector: node_range(selectors, mapper)?,
            },
            None => NodeKind::Other,
        },
        "at_rule" | "media_statement" | "keyframes_statement" | "keyframe_block"
        | "supports_statement" | "import_statement" | "charset_statement"
        | "namespace_statement" => NodeKind::AtRule,
        "declaration" => NodeKind::Declaration,
        _ => return None,
    };
    Some((kind, node_range(node, mapper)?))
}
