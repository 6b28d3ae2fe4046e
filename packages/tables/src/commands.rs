//! # Table Commands
//!
//! Serializable descriptions of table transforms, so a host can queue or
//! replay them as data:
//!
//! ```json
//! [
//!   { "MoveRow": { "origin": 0, "target": 2, "options": { "try_to_fit": true } } },
//!   { "AddColumnAt": { "index": 1 } },
//!   "SelectTable"
//! ]
//! ```

use crate::edits::{
    add_column_at, add_row_at, empty_selected_cells, remove_column_at, remove_row_at, remove_table,
};
use crate::error::TableResult;
use crate::moves::{move_column, move_row, MoveOptions};
use crate::roles::TableRoles;
use crate::selection::{select_column, select_row, select_table};
use serde::{Deserialize, Serialize};
use tracing::debug;
use weft_model::Transaction;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TableCommand {
    MoveRow {
        origin: usize,
        target: usize,
        #[serde(default)]
        options: MoveOptions,
    },

    MoveColumn {
        origin: usize,
        target: usize,
        #[serde(default)]
        options: MoveOptions,
    },

    AddRowAt {
        index: usize,
        #[serde(default)]
        clone_previous: bool,
    },

    AddColumnAt {
        index: usize,
    },

    RemoveRowAt {
        index: usize,
    },

    RemoveColumnAt {
        index: usize,
    },

    /// Remove the table around the selection
    RemoveTable,

    SelectRow {
        index: usize,
        /// Keep the rows of the currently selected cell
        #[serde(default)]
        expand: bool,
    },

    SelectColumn {
        index: usize,
        #[serde(default)]
        expand: bool,
    },

    SelectTable,

    /// Reset every selected cell to its default content
    EmptySelectedCells,
}

impl TableCommand {
    pub fn apply(&self, tr: &Transaction, roles: &TableRoles) -> TableResult<Transaction> {
        match *self {
            TableCommand::MoveRow {
                origin,
                target,
                options,
            } => move_row(tr, roles, origin, target, options),

            TableCommand::MoveColumn {
                origin,
                target,
                options,
            } => move_column(tr, roles, origin, target, options),

            TableCommand::AddRowAt {
                index,
                clone_previous,
            } => add_row_at(tr, roles, index, clone_previous),

            TableCommand::AddColumnAt { index } => add_column_at(tr, roles, index),
            TableCommand::RemoveRowAt { index } => remove_row_at(tr, roles, index),
            TableCommand::RemoveColumnAt { index } => remove_column_at(tr, roles, index),
            TableCommand::RemoveTable => remove_table(tr, roles),
            TableCommand::SelectRow { index, expand } => Ok(select_row(tr, roles, index, expand)),
            TableCommand::SelectColumn { index, expand } => {
                Ok(select_column(tr, roles, index, expand))
            }
            TableCommand::SelectTable => Ok(select_table(tr, roles)),
            TableCommand::EmptySelectedCells => empty_selected_cells(tr, roles),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TableCommand::MoveRow { .. } => "move_row",
            TableCommand::MoveColumn { .. } => "move_column",
            TableCommand::AddRowAt { .. } => "add_row_at",
            TableCommand::AddColumnAt { .. } => "add_column_at",
            TableCommand::RemoveRowAt { .. } => "remove_row_at",
            TableCommand::RemoveColumnAt { .. } => "remove_column_at",
            TableCommand::RemoveTable => "remove_table",
            TableCommand::SelectRow { .. } => "select_row",
            TableCommand::SelectColumn { .. } => "select_column",
            TableCommand::SelectTable => "select_table",
            TableCommand::EmptySelectedCells => "empty_selected_cells",
        }
    }

    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }
}

/// Apply `commands` in order, stopping at the first error
pub fn apply_all(
    commands: &[TableCommand],
    tr: &Transaction,
    roles: &TableRoles,
) -> TableResult<Transaction> {
    commands.iter().try_fold(tr.clone(), |current, command| {
        let next = command.apply(&current, roles)?;
        debug!(command = command.name(), time = next.time(), "Applied table command");
        Ok(next)
    })
}
