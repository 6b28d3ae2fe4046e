//! # Weft Tables
//!
//! Span-aware table transforms over weft documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ map: slot grid, spans, structural problems  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ range: widen an index to the block of rows  │
//! │  or columns its merged cells tie together   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ matrix + planner: reorder whole blocks,     │
//! │  rebuild the table in one replace step      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Tables never get split: a move that would cut through a merged block
//! either fails with [`TableError::InvalidMovement`] or, with
//! [`MoveOptions::try_to_fit`], lands next to the block.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use weft_model::basic_schema;
//! use weft_tables::{move_row, MoveOptions, TableRoles};
//!
//! let roles = TableRoles::from_schema(&basic_schema())?;
//! let tr = move_row(&tr, &roles, 0, 2, MoveOptions::default())?;
//! assert!(tr.doc_changed());
//! ```

pub mod cells;
pub mod commands;
pub mod edits;
pub mod error;
pub mod map;
pub mod matrix;
pub mod moves;
pub mod planner;
pub mod range;
pub mod roles;
pub mod selection;

pub use cells::*;
pub use commands::*;
pub use edits::*;
pub use error::*;
pub use map::*;
pub use matrix::*;
pub use moves::*;
pub use planner::*;
pub use range::*;
pub use roles::*;
pub use selection::*;
