//! Node types playing the table roles of a schema

use crate::error::{TableError, TableResult};
use weft_model::{Node, NodeType, Schema, TableRole};

/// The table, row and cell types every table transform works with.
///
/// Built once from a schema and passed to the transforms explicitly.
#[derive(Debug, Clone)]
pub struct TableRoles {
    schema: Schema,
    table: NodeType,
    row: NodeType,
    cell: NodeType,
    header_cell: Option<NodeType>,
}

impl TableRoles {
    /// Pick the first node type declaring each role. Table, row and cell
    /// roles are required; a header cell type is optional.
    pub fn from_schema(schema: &Schema) -> TableResult<Self> {
        let find = |role: TableRole| {
            schema
                .node_types()
                .find(|node_type| node_type.table_role() == Some(role))
                .cloned()
        };
        let require = |role: TableRole| find(role).ok_or(TableError::MissingRole(role));

        Ok(Self {
            schema: schema.clone(),
            table: require(TableRole::Table)?,
            row: require(TableRole::Row)?,
            cell: require(TableRole::Cell)?,
            header_cell: find(TableRole::HeaderCell),
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn table(&self) -> &NodeType {
        &self.table
    }

    pub fn row(&self) -> &NodeType {
        &self.row
    }

    pub fn cell(&self) -> &NodeType {
        &self.cell
    }

    pub fn header_cell(&self) -> Option<&NodeType> {
        self.header_cell.as_ref()
    }

    pub fn is_table(&self, node: &Node) -> bool {
        node.node_type() == &self.table
    }

    pub fn is_row(&self, node: &Node) -> bool {
        node.node_type() == &self.row
    }

    pub fn is_cell(&self, node: &Node) -> bool {
        node.node_type() == &self.cell || self.is_header_cell(node)
    }

    pub fn is_header_cell(&self, node: &Node) -> bool {
        self.header_cell
            .as_ref()
            .is_some_and(|header| node.node_type() == header)
    }
}
