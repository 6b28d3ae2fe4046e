//! Resolved positions: a position plus its ancestry

use crate::error::PositionError;
use crate::node::Node;

#[derive(Debug, Clone, PartialEq)]
struct PathEntry {
    node: Node,
    /// Index of the child the position points into (or before)
    index: usize,
    /// Absolute position of the start of that child
    offset: usize,
}

/// A document position with the chain of ancestor nodes around it.
///
/// Depth 0 is the document node itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPos {
    pos: usize,
    path: Vec<PathEntry>,
    parent_offset: usize,
}

impl ResolvedPos {
    pub(crate) fn resolve(doc: &Node, pos: usize) -> Result<Self, PositionError> {
        if pos > doc.content_size() {
            return Err(PositionError::OutOfRange {
                pos,
                size: doc.content_size(),
            });
        }

        let mut path = Vec::new();
        let mut start = 0;
        let mut parent_offset = pos;
        let mut node = doc.clone();
        loop {
            let (index, offset) = node.find_index(parent_offset);
            let rem = parent_offset - offset;
            path.push(PathEntry {
                node: node.clone(),
                index,
                offset: start + offset,
            });
            if rem == 0 {
                break;
            }
            let child = node.child(index).clone();
            if child.is_text() {
                break;
            }
            parent_offset = rem - 1;
            start += offset + 1;
            node = child;
        }

        Ok(Self {
            pos,
            path,
            parent_offset,
        })
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }

    /// Offset of the position inside its parent's content
    pub fn parent_offset(&self) -> usize {
        self.parent_offset
    }

    pub fn node(&self, depth: usize) -> &Node {
        &self.path[depth].node
    }

    pub fn parent(&self) -> &Node {
        self.node(self.depth())
    }

    pub fn doc(&self) -> &Node {
        self.node(0)
    }

    /// Index into the ancestor at `depth`
    pub fn index(&self, depth: usize) -> usize {
        self.path[depth].index
    }

    /// Position where the content of the ancestor at `depth` starts
    pub fn start(&self, depth: usize) -> usize {
        if depth == 0 {
            0
        } else {
            self.path[depth - 1].offset + 1
        }
    }

    /// Position where the content of the ancestor at `depth` ends
    pub fn end(&self, depth: usize) -> usize {
        self.start(depth) + self.node(depth).content_size()
    }

    /// Position directly before the ancestor at `depth`. The document has no
    /// position before it; depth 0 yields 0.
    pub fn before(&self, depth: usize) -> usize {
        if depth == 0 {
            0
        } else {
            self.path[depth - 1].offset
        }
    }

    /// Position directly after the ancestor at `depth`
    pub fn after(&self, depth: usize) -> usize {
        if depth == 0 {
            self.doc().content_size()
        } else {
            self.before(depth) + self.node(depth).node_size()
        }
    }

    /// Offset into the text node the position points into, 0 between nodes
    pub fn text_offset(&self) -> usize {
        self.pos - self.path[self.depth()].offset
    }

    /// Node directly after the position, cut when inside text
    pub fn node_after(&self) -> Option<Node> {
        let parent = self.parent();
        let index = self.index(self.depth());
        let child = parent.maybe_child(index)?;
        let text_offset = self.text_offset();
        if text_offset > 0 {
            return Some(child.cut_text(text_offset, child.node_size()));
        }
        Some(child.clone())
    }

    /// Node directly before the position, cut when inside text
    pub fn node_before(&self) -> Option<Node> {
        let parent = self.parent();
        let index = self.index(self.depth());
        let text_offset = self.text_offset();
        if text_offset > 0 {
            return Some(parent.child(index).cut_text(0, text_offset));
        }
        if index == 0 {
            return None;
        }
        Some(parent.child(index - 1).clone())
    }
}

#[cfg(test)]
mod tests {
    use crate::attrs::Attrs;
    use crate::schema::basic_schema;

    #[test]
    fn test_resolve_inside_nested_nodes() {
        let schema = basic_schema();
        let text = schema.text("ab", vec![]).unwrap();
        let p = schema.node("paragraph", Attrs::new(), vec![text]).unwrap();
        let quote = schema.node("blockquote", Attrs::new(), vec![p]).unwrap();
        let doc = schema.node("doc", Attrs::new(), vec![quote]).unwrap();

        // <doc><blockquote><p>a|b</p></blockquote></doc>
        let pos = doc.resolve(3).unwrap();
        assert_eq!(pos.depth(), 2);
        assert_eq!(pos.parent().type_name(), "paragraph");
        assert_eq!(pos.start(2), 2);
        assert_eq!(pos.before(2), 1);
        assert_eq!(pos.after(2), 5);
        assert_eq!(pos.before(1), 0);
        assert_eq!(pos.text_offset(), 1);
        assert_eq!(pos.node_before().and_then(|n| n.text().map(str::to_string)), Some("a".into()));
        assert_eq!(pos.node_after().and_then(|n| n.text().map(str::to_string)), Some("b".into()));
    }

    #[test]
    fn test_resolve_between_blocks() {
        let schema = basic_schema();
        let p1 = schema.node("paragraph", Attrs::new(), vec![]).unwrap();
        let p2 = schema.node("paragraph", Attrs::new(), vec![]).unwrap();
        let doc = schema.node("doc", Attrs::new(), vec![p1, p2]).unwrap();

        let pos = doc.resolve(2).unwrap();
        assert_eq!(pos.depth(), 0);
        assert_eq!(pos.index(0), 1);
        assert_eq!(pos.node_before().map(|n| n.type_name().to_string()), Some("paragraph".into()));
        assert!(doc.resolve(5).is_err());
    }
}
