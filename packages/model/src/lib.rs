//! # Weft Model
//!
//! Immutable document model used by the weft utilities.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ schema: node types + containment rules      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ node: immutable tree, position addressing   │
//! │  - resolve positions to ancestor chains     │
//! │  - replace ranges into new trees            │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ transaction: replayable replace steps       │
//! │  + mapped selection + logical time          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use weft_model::{basic_schema, Attrs, Transaction};
//!
//! let schema = basic_schema();
//! let text = schema.text("Hello", vec![])?;
//! let paragraph = schema.node("paragraph", Attrs::new(), vec![text])?;
//! let doc = schema.node("doc", Attrs::new(), vec![paragraph])?;
//!
//! let mut tr = Transaction::new(doc);
//! tr.delete(1, 3)?;
//! assert_eq!(tr.doc().text_content(), "llo");
//! ```

mod attrs;
mod error;
mod node;
mod resolved_pos;
mod schema;
mod selection;
mod transaction;

#[cfg(any(test, feature = "builders"))]
pub mod builders;

pub use attrs::{attrs, AttrValue, Attrs, Mark};
pub use error::{PositionError, SchemaError, SchemaResult, TransformError};
pub use node::Node;
pub use resolved_pos::ResolvedPos;
pub use schema::{
    basic_schema, basic_schema_spec, AttrSpec, ContentExpr, NodeSpec, NodeType, Schema,
    SchemaSpec, TableRole, TEXT_TYPE,
};
pub use selection::Selection;
pub use transaction::{ReplaceStep, StepMap, Transaction};
