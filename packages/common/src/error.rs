use thiserror::Error;
use weft_model::{PositionError, SchemaError, TransformError};

/// Common error type that can hold any weft model error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommonError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Position error: {0}")]
    Position(#[from] PositionError),

    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),
}
