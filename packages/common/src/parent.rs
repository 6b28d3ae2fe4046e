//! Ancestor lookups around a position or selection

use weft_model::{Node, NodeType, ResolvedPos, Selection};

/// An ancestor found around a position
#[derive(Debug, Clone, PartialEq)]
pub struct FoundNode {
    /// Position directly before the node
    pub pos: usize,
    /// Position where the node's content starts
    pub start: usize,
    pub depth: usize,
    pub node: Node,
}

/// Closest ancestor of `pos` matching `predicate`. The document itself is
/// never returned.
pub fn find_parent_node_closest_to_pos<P>(pos: &ResolvedPos, mut predicate: P) -> Option<FoundNode>
where
    P: FnMut(&Node) -> bool,
{
    (1..=pos.depth()).rev().find_map(|depth| {
        let node = pos.node(depth);
        predicate(node).then(|| FoundNode {
            pos: pos.before(depth),
            start: pos.start(depth),
            depth,
            node: node.clone(),
        })
    })
}

/// Closest ancestor of the selection start matching `predicate`
pub fn find_parent_node<P>(doc: &Node, selection: &Selection, predicate: P) -> Option<FoundNode>
where
    P: FnMut(&Node) -> bool,
{
    let from = selection.resolve_from(doc).ok()?;
    find_parent_node_closest_to_pos(&from, predicate)
}

pub fn find_parent_node_of_type_closest_to_pos(
    pos: &ResolvedPos,
    types: &[&NodeType],
) -> Option<FoundNode> {
    find_parent_node_closest_to_pos(pos, |node| is_one_of(node, types))
}

pub fn find_parent_node_of_type(
    doc: &Node,
    selection: &Selection,
    types: &[&NodeType],
) -> Option<FoundNode> {
    find_parent_node(doc, selection, |node| is_one_of(node, types))
}

pub fn has_parent_node<P>(doc: &Node, selection: &Selection, predicate: P) -> bool
where
    P: FnMut(&Node) -> bool,
{
    find_parent_node(doc, selection, predicate).is_some()
}

pub fn has_parent_node_of_type(doc: &Node, selection: &Selection, types: &[&NodeType]) -> bool {
    find_parent_node_of_type(doc, selection, types).is_some()
}

/// The node under a node selection, when it has one of `types`
pub fn find_selected_node_of_type(
    doc: &Node,
    selection: &Selection,
    types: &[&NodeType],
) -> Option<FoundNode> {
    let Selection::Node { pos } = selection else {
        return None;
    };
    let node = doc.node_at(*pos)?;
    if !is_one_of(node, types) {
        return None;
    }
    let resolved = doc.resolve(*pos).ok()?;
    Some(FoundNode {
        pos: *pos,
        start: pos + 1,
        depth: resolved.depth(),
        node: node.clone(),
    })
}

/// Position directly before the node that precedes the selection start
pub fn find_position_of_node_before(doc: &Node, selection: &Selection) -> Option<usize> {
    let from = selection.resolve_from(doc).ok()?;
    let before = from.node_before()?;
    Some(from.pos() - before.node_size())
}

pub(crate) fn is_one_of(node: &Node, types: &[&NodeType]) -> bool {
    types.iter().any(|node_type| node.node_type() == *node_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_model::builders::*;

    fn quote_doc() -> Node {
        doc(vec![p("intro"), blockquote(vec![p("quoted")])])
    }

    #[test]
    fn test_closest_ancestor_wins() {
        let doc = quote_doc();
        let pos = doc.resolve(pos_of(&doc, "quoted") + 2).unwrap();

        let found = find_parent_node_closest_to_pos(&pos, Node::is_block).unwrap();
        assert_eq!(found.node.type_name(), "paragraph");
        assert_eq!(found.depth, 2);
        assert_eq!(found.pos, 8);
        assert_eq!(found.start, 9);
    }

    #[test]
    fn test_find_parent_node_of_type() {
        let doc = quote_doc();
        let quote = schema().node_type("blockquote").unwrap();
        let table = schema().node_type("table").unwrap();
        let inside = Selection::cursor(pos_of(&doc, "quoted"));

        let found = find_parent_node_of_type(&doc, &inside, &[quote]).unwrap();
        assert_eq!(found.pos, 7);
        assert_eq!(found.depth, 1);
        assert!(has_parent_node_of_type(&doc, &inside, &[table, quote]));
        assert!(!has_parent_node_of_type(&doc, &Selection::cursor(2), &[quote]));
    }

    #[test]
    fn test_document_is_never_a_parent() {
        let doc = quote_doc();
        assert!(!has_parent_node(&doc, &Selection::cursor(0), |_| true));
    }

    #[test]
    fn test_find_selected_node_of_type() {
        let doc = quote_doc();
        let quote = schema().node_type("blockquote").unwrap();
        let paragraph = schema().node_type("paragraph").unwrap();

        let found = find_selected_node_of_type(&doc, &Selection::node(7), &[quote]).unwrap();
        assert_eq!(found.node.type_name(), "blockquote");
        assert_eq!(found.depth, 0);
        assert!(find_selected_node_of_type(&doc, &Selection::node(7), &[paragraph]).is_none());
        assert!(find_selected_node_of_type(&doc, &Selection::cursor(7), &[quote]).is_none());
    }

    #[test]
    fn test_position_of_node_before() {
        let doc = quote_doc();

        assert_eq!(find_position_of_node_before(&doc, &Selection::cursor(7)), Some(0));
        assert_eq!(find_position_of_node_before(&doc, &Selection::cursor(0)), None);
    }
}
