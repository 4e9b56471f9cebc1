use tower_lsp_server::ls_types::Position;

use crate::document::{NodeKind, ParsedNode};
use crate::syntax::Dialect;
use crate::text::range_contains;

/// Whether an abbreviation may expand at `position`, given the deepest node
/// enclosing it.
///
/// Stylesheets allow expansion anywhere except inside a rule's selector.
/// Markup allows it only between an element's opening and closing tags.
pub fn is_valid_location(node: Option<ParsedNode<'_>>, dialect: Dialect, position: Position) -> bool {
    let Some(node) = node else {
        return dialect.is_stylesheet();
    };

    if dialect.is_stylesheet() {
        return match node.kind() {
            NodeKind::Rule { selector } => {
                // Nested rules with a wrapped selector report a selector end that
                // does not match what the editor shows, so the body check is skipped.
                let nested = node.parent().is_some_and(|parent| parent.is_rule());
                if nested && selector.start.line != selector.end.line {
                    return true;
                }
                position > selector.end
            }
            NodeKind::Element { .. }
            | NodeKind::AtRule
            | NodeKind::Declaration
            | NodeKind::Other => true,
        };
    }

    match node.kind() {
        NodeKind::Element { inner: Some(inner) } => range_contains(inner, position),
        NodeKind::Element { inner: None } => false,
        NodeKind::Rule { .. } | NodeKind::AtRule | NodeKind::Declaration | NodeKind::Other => {
            false
        }
    }
}
