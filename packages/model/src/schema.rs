//! # Schema
//!
//! Node types and the structural containment rules between them.
//!
//! A schema is described by a serde-friendly [`SchemaSpec`] (so it can be
//! loaded from JSON configuration) and compiled into a [`Schema`] holding
//! shared [`NodeType`] handles. Content rules use a small expression
//! language:
//!
//! ```text
//! block+                          one or more nodes of group "block"
//! inline*                         any number of inline nodes
//! (table_cell | table_header)*    alternatives
//! paragraph                       exactly one paragraph
//! table_row?                      at most one row
//! ```
//!
//! Sequences (`heading paragraph+`) are not supported.

use crate::attrs::{AttrValue, Attrs, Mark};
use crate::error::{SchemaError, SchemaResult};
use crate::node::Node;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Name of the built-in text node type
pub const TEXT_TYPE: &str = "text";

/// Structural role of a node type inside a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableRole {
    Table,
    Row,
    Cell,
    HeaderCell,
}

impl TableRole {
    pub fn is_cell(self) -> bool {
        matches!(self, TableRole::Cell | TableRole::HeaderCell)
    }
}

/// Declaration of a single attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AttrSpec {
    #[serde(default)]
    pub default: AttrValue,
    /// Required attributes have no default and must be supplied
    #[serde(default)]
    pub required: bool,
}

impl AttrSpec {
    pub fn with_default(value: impl Into<AttrValue>) -> Self {
        Self {
            default: value.into(),
            required: false,
        }
    }

    pub fn required() -> Self {
        Self {
            default: AttrValue::Null,
            required: true,
        }
    }
}

/// Declaration of a node type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    /// Content expression; `None` makes the type a leaf
    #[serde(default)]
    pub content: Option<String>,
    /// Space separated group names
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub inline: bool,
    #[serde(default)]
    pub attrs: BTreeMap<String, AttrSpec>,
    #[serde(default)]
    pub table_role: Option<TableRole>,
}

impl NodeSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: None,
            group: None,
            inline: false,
            attrs: BTreeMap::new(),
            table_role: None,
        }
    }

    pub fn content(mut self, expr: impl Into<String>) -> Self {
        self.content = Some(expr.into());
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }

    pub fn attr(mut self, name: impl Into<String>, spec: AttrSpec) -> Self {
        self.attrs.insert(name.into(), spec);
        self
    }

    pub fn table_role(mut self, role: TableRole) -> Self {
        self.table_role = Some(role);
        self
    }
}

fn default_top_node() -> String {
    "doc".to_string()
}

/// Serializable schema definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaSpec {
    #[serde(default = "default_top_node")]
    pub top_node: String,
    pub nodes: Vec<NodeSpec>,
}

impl SchemaSpec {
    pub fn from_json(source: &str) -> SchemaResult<Self> {
        serde_json::from_str(source).map_err(|e| SchemaError::InvalidSpec(e.to_string()))
    }
}

/// Parsed content expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentExpr {
    pub alternatives: Vec<String>,
    pub min: usize,
    pub max: Option<usize>,
}

impl ContentExpr {
    pub fn parse(source: &str) -> SchemaResult<Self> {
        let trimmed = source.trim();
        let (body, min, max) = match trimmed.chars().last() {
            Some('*') => (&trimmed[..trimmed.len() - 1], 0, None),
            Some('+') => (&trimmed[..trimmed.len() - 1], 1, None),
            Some('?') => (&trimmed[..trimmed.len() - 1], 0, Some(1)),
            Some(_) => (trimmed, 1, Some(1)),
            None => return Err(SchemaError::invalid_expr(source, "empty expression")),
        };

        let body = body.trim();
        let body = match (body.strip_prefix('('), body.ends_with(')')) {
            (Some(inner), true) => &inner[..inner.len() - 1],
            (None, false) => body,
            _ => return Err(SchemaError::invalid_expr(source, "unbalanced parentheses")),
        };

        let mut alternatives = Vec::new();
        for part in body.split('|') {
            let name = part.trim();
            if name.is_empty() {
                return Err(SchemaError::invalid_expr(source, "empty alternative"));
            }
            if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(SchemaError::invalid_expr(
                    source,
                    format!("unsupported token {name:?}"),
                ));
            }
            alternatives.push(name.to_string());
        }

        Ok(Self {
            alternatives,
            min,
            max,
        })
    }
}

struct NodeTypeInner {
    spec: NodeSpec,
    groups: Vec<String>,
    content: Option<ContentExpr>,
    /// Content admits inline nodes
    inline_content: bool,
    /// Type used to fill required content
    fill_type: Option<String>,
}

/// Shared handle to a compiled node type. Two handles are equal when they
/// carry the same name.
#[derive(Clone)]
pub struct NodeType(Arc<NodeTypeInner>);

impl NodeType {
    pub fn name(&self) -> &str {
        &self.0.spec.name
    }

    pub fn spec(&self) -> &NodeSpec {
        &self.0.spec
    }

    pub fn groups(&self) -> &[String] {
        &self.0.groups
    }

    pub fn table_role(&self) -> Option<TableRole> {
        self.0.spec.table_role
    }

    pub fn is_text(&self) -> bool {
        self.name() == TEXT_TYPE
    }

    pub fn is_inline(&self) -> bool {
        self.0.spec.inline || self.is_text()
    }

    pub fn is_block(&self) -> bool {
        !self.is_inline()
    }

    pub fn is_leaf(&self) -> bool {
        self.0.content.is_none()
    }

    pub fn is_textblock(&self) -> bool {
        self.is_block() && self.0.inline_content
    }

    pub fn content_expr(&self) -> Option<&ContentExpr> {
        self.0.content.as_ref()
    }

    /// Whether `child` matches one of the alternatives of this type's content
    pub fn allows_child(&self, child: &NodeType) -> bool {
        match &self.0.content {
            Some(expr) => expr
                .alternatives
                .iter()
                .any(|alt| child.name() == alt || child.groups().iter().any(|g| g == alt)),
            None => false,
        }
    }

    /// Fill in defaults and check required attributes
    pub fn compute_attrs(&self, given: Attrs) -> SchemaResult<Attrs> {
        let mut attrs = given;
        for (name, spec) in &self.0.spec.attrs {
            if attrs.contains_key(name) {
                continue;
            }
            if spec.required {
                return Err(SchemaError::MissingAttribute {
                    node_type: self.name().to_string(),
                    attr: name.clone(),
                });
            }
            attrs.insert(name.clone(), spec.default.clone());
        }
        Ok(attrs)
    }

    /// Validate a content sequence against this type's content expression
    pub fn check_content(&self, content: &[Node]) -> SchemaResult<()> {
        let Some(expr) = &self.0.content else {
            if content.is_empty() {
                return Ok(());
            }
            return Err(SchemaError::invalid_content(self.name(), "leaf nodes cannot have content"));
        };

        if let Some(child) = content.iter().find(|child| !self.allows_child(child.node_type())) {
            return Err(SchemaError::invalid_content(
                self.name(),
                format!("{} is not allowed here", child.type_name()),
            ));
        }
        if content.len() < expr.min {
            return Err(SchemaError::invalid_content(
                self.name(),
                format!("expected at least {} children, found {}", expr.min, content.len()),
            ));
        }
        if let Some(max) = expr.max {
            if content.len() > max {
                return Err(SchemaError::invalid_content(
                    self.name(),
                    format!("expected at most {max} children, found {}", content.len()),
                ));
            }
        }
        Ok(())
    }

    /// Create a node without validating its content
    pub fn create(&self, attrs: Attrs, content: Vec<Node>, marks: Vec<Mark>) -> SchemaResult<Node> {
        if self.is_text() {
            return Err(SchemaError::NotText(self.name().to_string()));
        }
        let attrs = self.compute_attrs(attrs)?;
        Ok(Node::new_unchecked(self.clone(), attrs, content, marks))
    }

    /// Create a node, failing when the content does not satisfy this type
    pub fn create_checked(
        &self,
        attrs: Attrs,
        content: Vec<Node>,
        marks: Vec<Mark>,
    ) -> SchemaResult<Node> {
        let node = self.create(attrs, content, marks)?;
        self.check_content(node.children())?;
        Ok(node)
    }
}

impl PartialEq for NodeType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.name() == other.name()
    }
}

impl Eq for NodeType {}

impl fmt::Debug for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeType({})", self.name())
    }
}

struct SchemaInner {
    /// Declaration order is kept for fill-type resolution
    order: Vec<String>,
    types: BTreeMap<String, NodeType>,
    top_node: String,
}

/// Compiled schema
#[derive(Clone)]
pub struct Schema(Arc<SchemaInner>);

impl Schema {
    pub fn new(spec: SchemaSpec) -> SchemaResult<Self> {
        let mut specs = spec.nodes;
        if !specs.iter().any(|node| node.name == TEXT_TYPE) {
            specs.push(NodeSpec::new(TEXT_TYPE).group("inline").inline());
        }

        let mut exprs = BTreeMap::new();
        for node in &specs {
            if let Some(source) = &node.content {
                exprs.insert(node.name.clone(), ContentExpr::parse(source)?);
            }
        }

        let groups_of = |node: &NodeSpec| -> Vec<String> {
            node.group
                .as_deref()
                .map(|g| g.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default()
        };
        let matching = |alt: &str| -> Vec<&NodeSpec> {
            specs
                .iter()
                .filter(|node| node.name == alt || groups_of(node).iter().any(|g| g == alt))
                .collect()
        };

        let mut types = BTreeMap::new();
        for node in &specs {
            let content = exprs.get(&node.name).cloned();
            let mut inline_content = false;
            let mut fill_type = None;
            if let Some(expr) = &content {
                for alt in &expr.alternatives {
                    let candidates = matching(alt);
                    if candidates.is_empty() {
                        return Err(SchemaError::UnknownContentReference {
                            node_type: node.name.clone(),
                            name: alt.clone(),
                        });
                    }
                    inline_content |= candidates.iter().any(|c| c.inline || c.name == TEXT_TYPE);
                    if fill_type.is_none() {
                        fill_type = candidates
                            .iter()
                            .find(|c| c.name != TEXT_TYPE)
                            .map(|c| c.name.clone());
                    }
                }
            }

            let node_type = NodeType(Arc::new(NodeTypeInner {
                groups: groups_of(node),
                spec: node.clone(),
                content,
                inline_content,
                fill_type,
            }));
            types.insert(node.name.clone(), node_type);
        }

        if !types.contains_key(&spec.top_node) {
            return Err(SchemaError::MissingTopNode(spec.top_node));
        }

        Ok(Self(Arc::new(SchemaInner {
            order: specs.iter().map(|node| node.name.clone()).collect(),
            types,
            top_node: spec.top_node,
        })))
    }

    pub fn from_json(source: &str) -> SchemaResult<Self> {
        Self::new(SchemaSpec::from_json(source)?)
    }

    pub fn node_type(&self, name: &str) -> SchemaResult<&NodeType> {
        self.0
            .types
            .get(name)
            .ok_or_else(|| SchemaError::UnknownNodeType(name.to_string()))
    }

    /// Node types in declaration order
    pub fn node_types(&self) -> impl Iterator<Item = &NodeType> {
        self.0.order.iter().filter_map(|name| self.0.types.get(name))
    }

    pub fn top_node_type(&self) -> &NodeType {
        // Presence is checked in `new`
        &self.0.types[&self.0.top_node]
    }

    /// Create a validated node by type name
    pub fn node(&self, name: &str, attrs: Attrs, content: Vec<Node>) -> SchemaResult<Node> {
        self.node_type(name)?.create_checked(attrs, content, Vec::new())
    }

    pub fn text(&self, text: &str, marks: Vec<Mark>) -> SchemaResult<Node> {
        if text.is_empty() {
            return Err(SchemaError::EmptyText);
        }
        let node_type = self.node_type(TEXT_TYPE)?.clone();
        Ok(Node::new_text(node_type, text.to_string(), marks))
    }

    /// Create a node of `node_type`, filling required content with default
    /// children (an empty paragraph for a table cell)
    pub fn create_and_fill(&self, node_type: &NodeType, attrs: Attrs) -> SchemaResult<Node> {
        self.fill(node_type, attrs, 0)
    }

    fn fill(&self, node_type: &NodeType, attrs: Attrs, depth: usize) -> SchemaResult<Node> {
        const MAX_FILL_DEPTH: usize = 32;
        if depth > MAX_FILL_DEPTH {
            return Err(SchemaError::CannotFill(node_type.name().to_string()));
        }

        let required = node_type.content_expr().map_or(0, |expr| expr.min);
        let mut content = Vec::with_capacity(required);
        if required > 0 {
            let fill_name = node_type
                .0
                .fill_type
                .as_deref()
                .ok_or_else(|| SchemaError::CannotFill(node_type.name().to_string()))?;
            let fill_type = self.node_type(fill_name)?;
            for _ in 0..required {
                content.push(self.fill(fill_type, Attrs::new(), depth + 1)?);
            }
        }
        node_type.create_checked(attrs, content, Vec::new())
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("top_node", &self.0.top_node)
            .field("types", &self.0.order)
            .finish()
    }
}

fn cell_spec(name: &str, role: TableRole) -> NodeSpec {
    NodeSpec::new(name)
        .content("block+")
        .attr("colspan", AttrSpec::with_default(1))
        .attr("rowspan", AttrSpec::with_default(1))
        .attr("colwidth", AttrSpec::default())
        .table_role(role)
}

/// Specification of a small rich-text schema with tables
pub fn basic_schema_spec() -> SchemaSpec {
    SchemaSpec {
        top_node: default_top_node(),
        nodes: vec![
            NodeSpec::new("doc").content("block+"),
            NodeSpec::new("paragraph").content("inline*").group("block"),
            NodeSpec::new("heading")
                .content("inline*")
                .group("block")
                .attr("level", AttrSpec::with_default(1)),
            NodeSpec::new("blockquote").content("block+").group("block"),
            NodeSpec::new(TEXT_TYPE).group("inline").inline(),
            NodeSpec::new("image")
                .group("inline")
                .inline()
                .attr("src", AttrSpec::required()),
            NodeSpec::new("hard_break").group("inline").inline(),
            NodeSpec::new("table")
                .content("table_row+")
                .group("block")
                .table_role(TableRole::Table),
            NodeSpec::new("table_row")
                .content("(table_cell | table_header)*")
                .table_role(TableRole::Row),
            cell_spec("table_cell", TableRole::Cell),
            cell_spec("table_header", TableRole::HeaderCell),
        ],
    }
}

/// Compiled [`basic_schema_spec`]
pub fn basic_schema() -> Schema {
    // The preset is static and always compiles
    match Schema::new(basic_schema_spec()) {
        Ok(schema) => schema,
        Err(e) => unreachable!("basic schema is invalid: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::attrs;

    #[test]
    fn test_parse_content_expressions() {
        let expr = ContentExpr::parse("(table_cell | table_header)*").unwrap();
        assert_eq!(expr.alternatives, vec!["table_cell", "table_header"]);
        assert_eq!((expr.min, expr.max), (0, None));

        let expr = ContentExpr::parse("block+").unwrap();
        assert_eq!((expr.min, expr.max), (1, None));

        let expr = ContentExpr::parse("paragraph").unwrap();
        assert_eq!((expr.min, expr.max), (1, Some(1)));

        assert!(ContentExpr::parse("heading paragraph+").is_err());
        assert!(ContentExpr::parse("(a | b*").is_err());
    }

    #[test]
    fn test_schema_from_json() {
        let schema = Schema::from_json(
            r#"{
                "nodes": [
                    {"name": "doc", "content": "grid+"},
                    {"name": "grid", "content": "line+", "table_role": "table"},
                    {"name": "line", "content": "slot*", "table_role": "row"},
                    {"name": "slot", "content": "text*", "table_role": "cell",
                     "attrs": {"rowspan": {"default": 1}, "colspan": {"default": 1}}}
                ]
            }"#,
        )
        .unwrap();

        let slot = schema.node_type("slot").unwrap();
        assert_eq!(slot.table_role(), Some(TableRole::Cell));
        assert!(slot.is_textblock());
        assert_eq!(schema.top_node_type().name(), "doc");
    }

    #[test]
    fn test_unknown_content_reference_rejected() {
        let spec = SchemaSpec {
            top_node: "doc".into(),
            nodes: vec![NodeSpec::new("doc").content("missing+")],
        };
        assert!(matches!(
            Schema::new(spec),
            Err(SchemaError::UnknownContentReference { .. })
        ));
    }

    #[test]
    fn test_create_checked_validates_content() {
        let schema = basic_schema();
        let text = schema.text("hi", vec![]).unwrap();
        let row = schema.node_type("table_row").unwrap();

        let result = row.create_checked(Attrs::new(), vec![text], vec![]);
        assert!(matches!(result, Err(SchemaError::InvalidContent { .. })));
    }

    #[test]
    fn test_required_attribute() {
        let schema = basic_schema();
        let image = schema.node_type("image").unwrap();

        assert!(image.create(Attrs::new(), vec![], vec![]).is_err());
        assert!(image.create(attrs([("src", "a.png")]), vec![], vec![]).is_ok());
    }

    #[test]
    fn test_create_and_fill_cell() {
        let schema = basic_schema();
        let cell_type = schema.node_type("table_cell").unwrap();
        let cell = schema.create_and_fill(cell_type, Attrs::new()).unwrap();

        assert_eq!(cell.child_count(), 1);
        assert_eq!(cell.child(0).type_name(), "paragraph");
        assert_eq!(cell.attr("rowspan"), Some(&AttrValue::Int(1)));
        assert_eq!(cell.node_size(), 4);
    }
}
