//! Error types for table transforms

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use weft_common::CommonError;
use weft_model::{PositionError, SchemaError, TableRole, TransformError};

/// The direction a table is sliced in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => f.write_str("row"),
            Axis::Column => f.write_str("column"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error(
        "Target position is invalid, you can't move the {axis} {origin} to {target}, \
         the target can't be split. You could use the try_to_fit option."
    )]
    InvalidMovement {
        axis: Axis,
        origin: usize,
        target: usize,
    },

    #[error("Schema has no node type with table role {0:?}")]
    MissingRole(TableRole),

    #[error("Matrix has {found} rows but the table has {expected}")]
    MatrixShape { expected: usize, found: usize },

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Position error: {0}")]
    Position(#[from] PositionError),

    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Common(#[from] CommonError),
}

pub type TableResult<T> = Result<T, TableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_movement_message() {
        let error = TableError::InvalidMovement {
            axis: Axis::Column,
            origin: 0,
            target: 2,
        };
        let message = error.to_string();

        assert!(message.contains("move the column 0 to 2"));
        assert!(message.contains("try_to_fit"));
    }
}
