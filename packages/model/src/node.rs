//! # Document nodes
//!
//! Immutable, structurally shared tree nodes. A node never changes after
//! construction; edits build new nodes and reuse untouched subtrees through
//! `Arc`.
//!
//! ## Position addressing
//!
//! ```text
//! <doc> <p> h i </p> <p> </p> </doc>
//!      0   1 2 3    4   5    6
//! ```
//!
//! Non-leaf nodes contribute an opening and a closing token, text
//! contributes one token per char, leaf nodes contribute a single token.

use crate::attrs::{AttrValue, Attrs, Mark};
use crate::error::{PositionError, SchemaError, TransformError};
use crate::resolved_pos::ResolvedPos;
use crate::schema::NodeType;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

struct NodeData {
    node_type: NodeType,
    attrs: Attrs,
    content: Vec<Node>,
    text: Option<String>,
    marks: Vec<Mark>,
    content_size: usize,
}

/// Shared, immutable tree node
#[derive(Clone)]
pub struct Node(Arc<NodeData>);

impl Node {
    pub(crate) fn new_unchecked(
        node_type: NodeType,
        attrs: Attrs,
        content: Vec<Node>,
        marks: Vec<Mark>,
    ) -> Self {
        let content = join_text(content);
        let content_size = content.iter().map(Node::node_size).sum();
        Node(Arc::new(NodeData {
            node_type,
            attrs,
            content,
            text: None,
            marks,
            content_size,
        }))
    }

    pub(crate) fn new_text(node_type: NodeType, text: String, marks: Vec<Mark>) -> Self {
        let content_size = text.chars().count();
        Node(Arc::new(NodeData {
            node_type,
            attrs: Attrs::new(),
            content: Vec::new(),
            text: Some(text),
            marks,
            content_size,
        }))
    }

    pub fn node_type(&self) -> &NodeType {
        &self.0.node_type
    }

    pub fn type_name(&self) -> &str {
        self.0.node_type.name()
    }

    pub fn attrs(&self) -> &Attrs {
        &self.0.attrs
    }

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.0.attrs.get(name)
    }

    pub fn marks(&self) -> &[Mark] {
        &self.0.marks
    }

    pub fn text(&self) -> Option<&str> {
        self.0.text.as_deref()
    }

    pub fn is_text(&self) -> bool {
        self.0.text.is_some()
    }

    pub fn is_leaf(&self) -> bool {
        self.0.node_type.is_leaf()
    }

    pub fn is_inline(&self) -> bool {
        self.0.node_type.is_inline()
    }

    pub fn is_block(&self) -> bool {
        self.0.node_type.is_block()
    }

    pub fn is_textblock(&self) -> bool {
        self.0.node_type.is_textblock()
    }

    /// Leaf nodes other than text are selected as a whole
    pub fn is_atom(&self) -> bool {
        self.is_leaf() && !self.is_text()
    }

    /// Size of the node's content, without its own open/close tokens
    pub fn content_size(&self) -> usize {
        self.0.content_size
    }

    /// Number of position tokens this node occupies in its parent
    pub fn node_size(&self) -> usize {
        if self.is_text() {
            self.0.content_size
        } else if self.is_leaf() {
            1
        } else {
            self.0.content_size + 2
        }
    }

    pub fn children(&self) -> &[Node] {
        &self.0.content
    }

    pub fn child_count(&self) -> usize {
        self.0.content.len()
    }

    /// Child at `index`. Panics when out of bounds, like slice indexing.
    pub fn child(&self, index: usize) -> &Node {
        &self.0.content[index]
    }

    pub fn maybe_child(&self, index: usize) -> Option<&Node> {
        self.0.content.get(index)
    }

    pub fn first_child(&self) -> Option<&Node> {
        self.0.content.first()
    }

    pub fn last_child(&self) -> Option<&Node> {
        self.0.content.last()
    }

    /// Children paired with their offset inside this node's content
    pub fn children_with_offsets(&self) -> impl Iterator<Item = (usize, &Node)> {
        self.0.content.iter().scan(0, |offset, child| {
            let start = *offset;
            *offset += child.node_size();
            Some((start, child))
        })
    }

    pub fn text_content(&self) -> String {
        match &self.0.text {
            Some(text) => text.clone(),
            None => self.0.content.iter().map(Node::text_content).collect(),
        }
    }

    /// Same type and attributes and marks
    pub fn same_markup(&self, other: &Node) -> bool {
        self.node_type() == other.node_type()
            && self.attrs() == other.attrs()
            && self.marks() == other.marks()
    }

    /// Child index and offset for a position inside this node's content
    pub(crate) fn find_index(&self, pos: usize) -> (usize, usize) {
        if pos == 0 {
            return (0, 0);
        }
        if pos >= self.content_size() {
            return (self.child_count(), self.content_size());
        }
        let mut offset = 0;
        for (index, child) in self.0.content.iter().enumerate() {
            let end = offset + child.node_size();
            if end >= pos {
                if end == pos {
                    return (index + 1, end);
                }
                return (index, offset);
            }
            offset = end;
        }
        (self.child_count(), self.content_size())
    }

    /// Node starting at `pos` (relative to this node's content). Text nodes
    /// are returned whole when `pos` points inside them.
    pub fn node_at(&self, pos: usize) -> Option<&Node> {
        let mut node = self;
        let mut pos = pos;
        loop {
            let (index, offset) = node.find_index(pos);
            let child = node.maybe_child(index)?;
            if offset == pos || child.is_text() {
                return Some(child);
            }
            pos -= offset + 1;
            node = child;
        }
    }

    pub fn resolve(&self, pos: usize) -> Result<ResolvedPos, PositionError> {
        ResolvedPos::resolve(self, pos)
    }

    /// Copy of this node with different content. The content is not checked.
    pub fn copy(&self, content: Vec<Node>) -> Node {
        Node::new_unchecked(
            self.node_type().clone(),
            self.attrs().clone(),
            content,
            self.marks().to_vec(),
        )
    }

    /// Copy of a text node holding the chars in `from..to`
    pub fn cut_text(&self, from: usize, to: usize) -> Node {
        match &self.0.text {
            Some(text) => {
                let cut: String = text.chars().skip(from).take(to.saturating_sub(from)).collect();
                Node::new_text(self.node_type().clone(), cut, self.marks().to_vec())
            }
            None => self.clone(),
        }
    }

    /// Replace the range `from..to` with `nodes`. Both ends must resolve into
    /// the same parent; the parent's new content is validated.
    pub fn replace(&self, from: usize, to: usize, nodes: Vec<Node>) -> Result<Node, TransformError> {
        if from > to {
            return Err(PositionError::InvalidRange { from, to }.into());
        }
        let rfrom = self.resolve(from)?;
        let rto = self.resolve(to)?;
        let depth = rfrom.depth();
        if rto.depth() != depth || rfrom.start(depth) != rto.start(depth) {
            return Err(TransformError::MismatchedParents { from, to });
        }

        let start = rfrom.start(depth);
        let parent = rfrom.parent();
        let content = replace_in_content(parent.children(), from - start, to - start, nodes);
        parent.node_type().check_content(&content)?;

        let mut replaced = parent.copy(content);
        for d in (0..depth).rev() {
            let ancestor = rfrom.node(d);
            let mut children = ancestor.children().to_vec();
            children[rfrom.index(d)] = replaced;
            replaced = ancestor.copy(children);
        }
        Ok(replaced)
    }

    /// Copy with new type, attributes and marks, keeping the content
    pub fn with_markup(
        &self,
        node_type: &NodeType,
        attrs: Attrs,
        marks: Vec<Mark>,
    ) -> Result<Node, SchemaError> {
        node_type.create_checked(attrs, self.children().to_vec(), marks)
    }

    /// Copy with a single attribute changed
    pub fn with_attr(&self, name: &str, value: impl Into<AttrValue>) -> Node {
        if self.is_text() {
            return self.clone();
        }
        let mut attrs = self.attrs().clone();
        attrs.insert(name.to_string(), value.into());
        Node::new_unchecked(
            self.node_type().clone(),
            attrs,
            self.children().to_vec(),
            self.marks().to_vec(),
        )
    }

    /// JSON view of the node, for diagnostics and snapshots
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Merge adjacent text nodes that carry the same marks
fn join_text(content: Vec<Node>) -> Vec<Node> {
    let mut joined: Vec<Node> = Vec::with_capacity(content.len());
    for node in content {
        if let (Some(last), Some(text)) = (joined.last_mut(), node.text()) {
            if let Some(previous) = last.text() {
                if last.marks() == node.marks() {
                    let merged = format!("{previous}{text}");
                    *last = Node::new_text(node.node_type().clone(), merged, node.marks().to_vec());
                    continue;
                }
            }
        }
        joined.push(node);
    }
    joined
}

/// Splice `insert` into `children` over the content range `from..to`,
/// splitting text nodes at the boundaries
fn replace_in_content(children: &[Node], from: usize, to: usize, insert: Vec<Node>) -> Vec<Node> {
    let mut before = Vec::new();
    let mut after = Vec::new();
    let mut pos = 0;
    for child in children {
        let end = pos + child.node_size();
        if end <= from {
            before.push(child.clone());
        } else if pos >= to {
            after.push(child.clone());
        } else {
            if pos < from {
                before.push(child.cut_text(0, from - pos));
            }
            if end > to {
                after.push(child.cut_text(to - pos, end - pos));
            }
        }
        pos = end;
    }
    before.extend(insert);
    before.extend(after);
    join_text(before)
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.same_markup(other)
                && self.0.text == other.0.text
                && self.0.content == other.0.content)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(text) = &self.0.text {
            return write!(f, "{text:?}");
        }
        write!(f, "{}", self.type_name())?;
        let spans: Vec<String> = ["rowspan", "colspan"]
            .iter()
            .filter_map(|name| match self.attr(name) {
                Some(value) if value.as_usize().is_some_and(|v| v != 1) => {
                    Some(format!("{name}={}", value.as_usize().unwrap_or(1)))
                }
                _ => None,
            })
            .collect();
        if !spans.is_empty() {
            write!(f, "[{}]", spans.join(" "))?;
        }
        if self.is_leaf() {
            return Ok(());
        }
        write!(f, "(")?;
        for (i, child) in self.children().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{child:?}")?;
        }
        write!(f, ")")
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.type_name())?;
        if !self.attrs().is_empty() {
            map.serialize_entry("attrs", self.attrs())?;
        }
        if let Some(text) = self.text() {
            map.serialize_entry("text", text)?;
        }
        if !self.children().is_empty() {
            map.serialize_entry("content", self.children())?;
        }
        if !self.marks().is_empty() {
            map.serialize_entry("marks", self.marks())?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::basic_schema;

    fn paragraph(text: &str) -> Node {
        let schema = basic_schema();
        let content = if text.is_empty() {
            vec![]
        } else {
            vec![schema.text(text, vec![]).unwrap()]
        };
        schema.node("paragraph", Attrs::new(), content).unwrap()
    }

    #[test]
    fn test_sizes() {
        let schema = basic_schema();
        let doc = schema
            .node("doc", Attrs::new(), vec![paragraph("hi"), paragraph("")])
            .unwrap();

        assert_eq!(doc.content_size(), 6);
        assert_eq!(doc.node_size(), 8);
        assert_eq!(doc.node_at(0).map(Node::type_name), Some("paragraph"));
        assert_eq!(doc.node_at(1).and_then(Node::text), Some("hi"));
        assert_eq!(doc.node_at(4).map(Node::content_size), Some(0));
        assert!(doc.node_at(6).is_none());
    }

    #[test]
    fn test_adjacent_text_is_joined() {
        let schema = basic_schema();
        let p = schema
            .node(
                "paragraph",
                Attrs::new(),
                vec![schema.text("a", vec![]).unwrap(), schema.text("b", vec![]).unwrap()],
            )
            .unwrap();
        assert_eq!(p.child_count(), 1);
        assert_eq!(p.text_content(), "ab");
    }

    #[test]
    fn test_replace_splits_text() {
        let schema = basic_schema();
        let doc = schema.node("doc", Attrs::new(), vec![paragraph("hello")]).unwrap();
        let image = schema
            .node("image", crate::attrs::attrs([("src", "x.png")]), vec![])
            .unwrap();

        let replaced = doc.replace(3, 5, vec![image]).unwrap();
        let p = replaced.child(0);
        assert_eq!(p.child_count(), 3);
        assert_eq!(p.child(0).text(), Some("he"));
        assert_eq!(p.child(1).type_name(), "image");
        assert_eq!(p.child(2).text(), Some("o"));
    }

    #[test]
    fn test_replace_rejects_invalid_content() {
        let schema = basic_schema();
        let doc = schema.node("doc", Attrs::new(), vec![paragraph("x")]).unwrap();
        let text = schema.text("loose", vec![]).unwrap();

        assert!(matches!(doc.replace(0, 3, vec![text]), Err(TransformError::Schema(_))));
    }

    #[test]
    fn test_replace_across_parents_fails() {
        let schema = basic_schema();
        let doc = schema
            .node("doc", Attrs::new(), vec![paragraph("ab"), paragraph("cd")])
            .unwrap();

        assert!(matches!(
            doc.replace(2, 6, vec![]),
            Err(TransformError::MismatchedParents { .. })
        ));
    }

    #[test]
    fn test_json_view() {
        let json = paragraph("x").to_json();
        assert_eq!(json["type"], "paragraph");
        assert_eq!(json["content"][0]["text"], "x");
    }
}
