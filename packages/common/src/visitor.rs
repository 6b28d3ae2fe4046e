use weft_model::Node;

/// A node reached during traversal, with its position and parent
#[derive(Debug, Clone, Copy)]
pub struct NodeVisit<'a> {
    pub node: &'a Node,
    /// Position directly before the node, relative to the traversal root's content
    pub pos: usize,
    pub parent: &'a Node,
    /// Index of the node in its parent
    pub index: usize,
}

/// Visitor pattern for traversing document trees immutably
///
/// This trait provides default implementations that walk the entire tree.
/// Override specific visit_* methods to perform custom actions on nodes.
pub trait Visitor: Sized {
    fn visit_node(&mut self, visit: NodeVisit<'_>) {
        walk_node(self, visit);
    }

    fn visit_text(&mut self, _visit: NodeVisit<'_>) {
        // Leaf node, no children to walk
    }

    fn visit_leaf(&mut self, _visit: NodeVisit<'_>) {
        // Leaf node, no children to walk
    }
}

/// Visit every child of `node`; `content_start` is the position of the
/// node's content start in the traversal's coordinates
pub fn walk_children<V: Visitor>(visitor: &mut V, node: &Node, content_start: usize) {
    for (index, (offset, child)) in node.children_with_offsets().enumerate() {
        let visit = NodeVisit {
            node: child,
            pos: content_start + offset,
            parent: node,
            index,
        };
        if child.is_text() {
            visitor.visit_text(visit);
        } else if child.is_leaf() {
            visitor.visit_leaf(visit);
        } else {
            visitor.visit_node(visit);
        }
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, visit: NodeVisit<'_>) {
    walk_children(visitor, visit.node, visit.pos + 1);
}

/// Walk all descendants of `root`, positions relative to its content
pub fn walk_descendants<V: Visitor>(visitor: &mut V, root: &Node) {
    walk_children(visitor, root, 0);
}
