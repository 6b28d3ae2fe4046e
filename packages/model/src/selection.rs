//! Editor selections

use crate::error::PositionError;
use crate::node::Node;
use crate::resolved_pos::ResolvedPos;
use crate::transaction::StepMap;
use serde::{Deserialize, Serialize};

/// The current selection of a transaction.
///
/// Positions are absolute document positions. `Node` points directly before
/// the selected node; `Cell` points directly before the anchor and head cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Selection {
    Text { anchor: usize, head: usize },
    Node { pos: usize },
    Cell { anchor: usize, head: usize },
    All,
}

impl Selection {
    pub fn cursor(pos: usize) -> Self {
        Selection::Text {
            anchor: pos,
            head: pos,
        }
    }

    pub fn text(anchor: usize, head: usize) -> Self {
        Selection::Text { anchor, head }
    }

    pub fn node(pos: usize) -> Self {
        Selection::Node { pos }
    }

    pub fn cell(anchor: usize, head: usize) -> Self {
        Selection::Cell { anchor, head }
    }

    /// Cursor at the start of the first textblock, or at 0
    pub fn at_start(doc: &Node) -> Self {
        let mut node = doc;
        let mut pos = 0;
        loop {
            if node.is_textblock() {
                return Selection::cursor(pos);
            }
            match node.first_child() {
                Some(child) if !child.is_leaf() => {
                    node = child;
                    pos += 1;
                }
                _ => return Selection::cursor(0),
            }
        }
    }

    /// Cursor in the textblock closest to `pos`, looking backwards first
    pub fn near(doc: &Node, pos: usize) -> Self {
        let size = doc.content_size();
        let pos = pos.min(size);
        let in_textblock = |candidate: &usize| {
            doc.resolve(*candidate)
                .is_ok_and(|resolved| resolved.parent().is_textblock())
        };
        (0..=pos)
            .rev()
            .chain(pos + 1..=size)
            .find(in_textblock)
            .map_or_else(|| Selection::at_start(doc), Selection::cursor)
    }

    pub fn anchor(&self) -> usize {
        match self {
            Selection::Text { anchor, .. } | Selection::Cell { anchor, .. } => *anchor,
            Selection::Node { pos } => *pos,
            Selection::All => 0,
        }
    }

    pub fn head(&self) -> usize {
        match self {
            Selection::Text { head, .. } | Selection::Cell { head, .. } => *head,
            Selection::Node { pos } => *pos,
            Selection::All => 0,
        }
    }

    /// Lower bound of the selection
    pub fn from(&self) -> usize {
        match self {
            Selection::Text { anchor, head } | Selection::Cell { anchor, head } => {
                (*anchor).min(*head)
            }
            Selection::Node { pos } => *pos,
            Selection::All => 0,
        }
    }

    /// Upper bound of the selection
    pub fn to(&self, doc: &Node) -> usize {
        match self {
            Selection::Text { anchor, head } => (*anchor).max(*head),
            Selection::Node { pos } => pos + doc.node_at(*pos).map_or(0, Node::node_size),
            Selection::Cell { anchor, head } => {
                let last = (*anchor).max(*head);
                last + doc.node_at(last).map_or(0, Node::node_size)
            }
            Selection::All => doc.content_size(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::Text { anchor, head } if anchor == head)
    }

    pub fn resolve_from(&self, doc: &Node) -> Result<ResolvedPos, PositionError> {
        doc.resolve(self.from())
    }

    /// Map the selection through a step. Node and cell selections that no
    /// longer point at a suitable node collapse into a cursor.
    pub fn map(&self, map: &StepMap, doc: &Node) -> Selection {
        let clamp = |pos: usize| pos.min(doc.content_size());
        match self {
            Selection::Text { anchor, head } => Selection::Text {
                anchor: clamp(map.map(*anchor)),
                head: clamp(map.map(*head)),
            },
            Selection::Node { pos } => {
                let mapped = clamp(map.map(*pos));
                match doc.node_at(mapped) {
                    Some(node) if !node.is_text() => Selection::Node { pos: mapped },
                    _ => Selection::cursor(mapped),
                }
            }
            Selection::Cell { anchor, head } => {
                let anchor = clamp(map.map(*anchor));
                let head = clamp(map.map(*head));
                let is_cell = |pos: usize| {
                    doc.node_at(pos)
                        .and_then(|node| node.node_type().table_role())
                        .is_some_and(|role| role.is_cell())
                };
                if is_cell(anchor) && is_cell(head) {
                    Selection::Cell { anchor, head }
                } else {
                    Selection::cursor(anchor)
                }
            }
            Selection::All => Selection::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::Attrs;
    use crate::schema::basic_schema;

    #[test]
    fn test_at_start_descends_into_first_textblock() {
        let schema = basic_schema();
        let p = schema.node("paragraph", Attrs::new(), vec![]).unwrap();
        let quote = schema.node("blockquote", Attrs::new(), vec![p]).unwrap();
        let doc = schema.node("doc", Attrs::new(), vec![quote]).unwrap();

        assert_eq!(Selection::at_start(&doc), Selection::cursor(2));
    }

    #[test]
    fn test_near_prefers_textblock_before() {
        let schema = basic_schema();
        let text = schema.text("ab", vec![]).unwrap();
        let first = schema.node("paragraph", Attrs::new(), vec![text]).unwrap();
        let second = schema.node("paragraph", Attrs::new(), vec![]).unwrap();
        let doc = schema.node("doc", Attrs::new(), vec![first, second]).unwrap();

        // 4 sits between the paragraphs, 3 is the end of the first one
        assert_eq!(Selection::near(&doc, 4), Selection::cursor(3));
        assert_eq!(Selection::near(&doc, 0), Selection::cursor(1));
        assert_eq!(Selection::near(&doc, 99), Selection::cursor(5));
    }

    #[test]
    fn test_bounds() {
        let selection = Selection::text(7, 3);
        assert_eq!(selection.from(), 3);
        assert_eq!(selection.anchor(), 7);
        assert!(!selection.is_empty());
    }
}
