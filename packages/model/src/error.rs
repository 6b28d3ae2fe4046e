//! Error types for the document model

use thiserror::Error;

pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    #[error("Schema has no top node type {0}")]
    MissingTopNode(String),

    #[error("Invalid content expression {expr:?}: {message}")]
    InvalidContentExpr { expr: String, message: String },

    #[error("Content expression of {node_type} references unknown type or group {name}")]
    UnknownContentReference { node_type: String, name: String },

    #[error("No value supplied for required attribute {attr} of {node_type}")]
    MissingAttribute { node_type: String, attr: String },

    #[error("Invalid content for node {node_type}: {message}")]
    InvalidContent { node_type: String, message: String },

    #[error("Empty text nodes are not allowed")]
    EmptyText,

    #[error("Node type {0} cannot be created as a text node")]
    NotText(String),

    #[error("Cannot fill required content of {0}")]
    CannotFill(String),

    #[error("Invalid schema definition: {0}")]
    InvalidSpec(String),
}

impl SchemaError {
    pub fn invalid_content(node_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidContent {
            node_type: node_type.into(),
            message: message.into(),
        }
    }

    pub fn invalid_expr(expr: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidContentExpr {
            expr: expr.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PositionError {
    #[error("Position {pos} out of range (document content size {size})")]
    OutOfRange { pos: usize, size: usize },

    #[error("Invalid range {from}..{to}")]
    InvalidRange { from: usize, to: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Position error: {0}")]
    Position(#[from] PositionError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Replace range {from}..{to} does not start and end in the same parent")]
    MismatchedParents { from: usize, to: usize },

    #[error("No node at position {0}")]
    NoNodeAt(usize),
}
