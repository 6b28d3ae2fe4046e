//! Descendant lookups.
//!
//! Every finder reports positions relative to the start of the searched
//! node's content, so for a document they are absolute positions.

use crate::visitor::{walk_children, walk_node, NodeVisit, Visitor};
use weft_model::{AttrValue, Attrs, Node, NodeType};

/// A node together with the position directly before it
#[derive(Debug, Clone, PartialEq)]
pub struct NodeWithPos {
    pub node: Node,
    pub pos: usize,
}

struct Collector<P> {
    predicate: P,
    descend: bool,
    found: Vec<NodeWithPos>,
}

impl<P: FnMut(&Node) -> bool> Collector<P> {
    fn consider(&mut self, visit: &NodeVisit<'_>) {
        if (self.predicate)(visit.node) {
            self.found.push(NodeWithPos {
                node: visit.node.clone(),
                pos: visit.pos,
            });
        }
    }
}

impl<P: FnMut(&Node) -> bool> Visitor for Collector<P> {
    fn visit_node(&mut self, visit: NodeVisit<'_>) {
        self.consider(&visit);
        if self.descend {
            walk_node(self, visit);
        }
    }

    fn visit_text(&mut self, visit: NodeVisit<'_>) {
        self.consider(&visit);
    }

    fn visit_leaf(&mut self, visit: NodeVisit<'_>) {
        self.consider(&visit);
    }
}

/// All descendants in document order, or only direct children when
/// `descend` is false
pub fn flatten(node: &Node, descend: bool) -> Vec<NodeWithPos> {
    find_children(node, |_| true, descend)
}

pub fn find_children<P>(node: &Node, predicate: P, descend: bool) -> Vec<NodeWithPos>
where
    P: FnMut(&Node) -> bool,
{
    let mut collector = Collector {
        predicate,
        descend,
        found: Vec::new(),
    };
    walk_children(&mut collector, node, 0);
    collector.found
}

pub fn find_text_nodes(node: &Node, descend: bool) -> Vec<NodeWithPos> {
    find_children(node, Node::is_text, descend)
}

pub fn find_inline_nodes(node: &Node, descend: bool) -> Vec<NodeWithPos> {
    find_children(node, Node::is_inline, descend)
}

pub fn find_block_nodes(node: &Node, descend: bool) -> Vec<NodeWithPos> {
    find_children(node, Node::is_block, descend)
}

/// Descendants whose attributes satisfy `predicate`
pub fn find_children_by_attr<P>(node: &Node, mut predicate: P, descend: bool) -> Vec<NodeWithPos>
where
    P: FnMut(&Attrs) -> bool,
{
    find_children(node, |child| predicate(child.attrs()), descend)
}

pub fn find_children_by_type(node: &Node, node_type: &NodeType, descend: bool) -> Vec<NodeWithPos> {
    find_children(node, |child| child.node_type() == node_type, descend)
}

/// Descendants carrying a mark named `mark`
pub fn find_children_by_mark(node: &Node, mark: &str, descend: bool) -> Vec<NodeWithPos> {
    find_children(
        node,
        |child| child.marks().iter().any(|m| m.name == mark),
        descend,
    )
}

/// Whether any descendant has the given type
pub fn contains(node: &Node, node_type: &NodeType) -> bool {
    !find_children_by_type(node, node_type, true).is_empty()
}

/// Descendants whose attribute `name` equals `value`
pub fn find_children_with_attr(
    node: &Node,
    name: &str,
    value: &AttrValue,
    descend: bool,
) -> Vec<NodeWithPos> {
    find_children_by_attr(node, |attrs| attrs.get(name) == Some(value), descend)
}
