//! Terse constructors over [`basic_schema`](crate::schema::basic_schema).
//!
//! Meant for tests and benches: every constructor panics when the content
//! does not fit the schema.

use crate::attrs::{attrs, Attrs, Mark};
use crate::node::Node;
use crate::schema::{basic_schema, Schema};
use std::sync::OnceLock;

pub fn schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(basic_schema)
}

fn build(name: &str, attrs: Attrs, content: Vec<Node>) -> Node {
    schema()
        .node(name, attrs, content)
        .unwrap_or_else(|e| panic!("invalid {name}: {e}"))
}

pub fn text(value: &str) -> Node {
    schema()
        .text(value, Vec::new())
        .unwrap_or_else(|e| panic!("invalid text: {e}"))
}

pub fn strong(value: &str) -> Node {
    schema()
        .text(value, vec![Mark::new("strong")])
        .unwrap_or_else(|e| panic!("invalid text: {e}"))
}

pub fn doc(content: Vec<Node>) -> Node {
    build("doc", Attrs::new(), content)
}

/// Paragraph holding `value`, empty when `value` is empty
pub fn p(value: &str) -> Node {
    let content = if value.is_empty() { Vec::new() } else { vec![text(value)] };
    build("paragraph", Attrs::new(), content)
}

pub fn p_with(content: Vec<Node>) -> Node {
    build("paragraph", Attrs::new(), content)
}

pub fn heading(level: i64, value: &str) -> Node {
    build("heading", attrs([("level", level)]), vec![text(value)])
}

pub fn blockquote(content: Vec<Node>) -> Node {
    build("blockquote", Attrs::new(), content)
}

pub fn image(src: &str) -> Node {
    build("image", attrs([("src", src)]), Vec::new())
}

pub fn hard_break() -> Node {
    build("hard_break", Attrs::new(), Vec::new())
}

pub fn table(rows: Vec<Node>) -> Node {
    build("table", Attrs::new(), rows)
}

pub fn row(cells: Vec<Node>) -> Node {
    build("table_row", Attrs::new(), cells)
}

/// Table cell holding one paragraph
pub fn td(value: &str) -> Node {
    build("table_cell", Attrs::new(), vec![p(value)])
}

/// Header cell holding one paragraph
pub fn th(value: &str) -> Node {
    build("table_header", Attrs::new(), vec![p(value)])
}

pub fn td_span(value: &str, rowspan: usize, colspan: usize) -> Node {
    build(
        "table_cell",
        attrs([("rowspan", rowspan), ("colspan", colspan)]),
        vec![p(value)],
    )
}

pub fn th_span(value: &str, rowspan: usize, colspan: usize) -> Node {
    build(
        "table_header",
        attrs([("rowspan", rowspan), ("colspan", colspan)]),
        vec![p(value)],
    )
}

/// Absolute position of the first char of `needle` in `doc`
pub fn pos_of(doc: &Node, needle: &str) -> usize {
    fn search(node: &Node, start: usize, needle: &str) -> Option<usize> {
        for (offset, child) in node.children_with_offsets() {
            let pos = start + offset;
            if let Some(value) = child.text() {
                if let Some(byte_index) = value.find(needle) {
                    return Some(pos + value[..byte_index].chars().count());
                }
            } else if let Some(found) = search(child, pos + 1, needle) {
                return Some(found);
            }
        }
        None
    }
    search(doc, 0, needle).unwrap_or_else(|| panic!("text {needle:?} not found"))
}

/// Absolute position directly before the cell whose text is `needle`
pub fn cell_pos(doc: &Node, needle: &str) -> usize {
    // cell > paragraph > text
    pos_of(doc, needle) - 2
}
