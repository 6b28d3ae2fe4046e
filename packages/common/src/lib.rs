//! # Weft Common
//!
//! Tree-walking glue shared by the weft crates: a document visitor,
//! descendant finders, ancestor lookups and transaction helpers.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use weft_common::{find_parent_node_of_type, remove_parent_node_of_type};
//!
//! let quote = schema.node_type("blockquote")?;
//! if find_parent_node_of_type(tr.doc(), tr.selection(), &[quote]).is_some() {
//!     tr = remove_parent_node_of_type(&tr, &[quote])?;
//! }
//! ```

pub mod error;
pub mod finders;
pub mod parent;
pub mod result;
pub mod transforms;
pub mod visitor;

pub use error::*;
pub use finders::*;
pub use parent::*;
pub use result::*;
pub use transforms::*;
pub use visitor::*;
