//! # Row and Column Movement
//!
//! ```text
//!   move_row(tr, roles, 0, 2)
//!
//!   ┌───┬───┐      ┌───┬───┐
//!   │ a │ b │      │ c │ d │
//!   ├───┼───┤      ├───┼───┤
//!   │ c │ d │  →   │ e │ f │
//!   ├───┼───┤      ├───┼───┤
//!   │ e │ f │      │ a │ b │
//!   └───┴───┘      └───┴───┘
//! ```
//!
//! Both the origin and the target index are widened to the blocks that
//! merged cells tie together. The origin block is then lifted out of the
//! table matrix and dropped on one side of the target block, and the
//! rebuilt table replaces the old one in a single step.

use crate::cells::TableContext;
use crate::error::{Axis, TableResult};
use crate::matrix::{from_matrix, Matrix};
use crate::planner::{check_invalid_movement, plan_move, Direction};
use crate::range::resolve_range;
use crate::roles::TableRoles;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use weft_common::clone_tr;
use weft_model::Transaction;

/// Options for [`move_row`] and [`move_column`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveOptions {
    /// Land next to a merged target block instead of failing
    pub try_to_fit: bool,
    pub direction: Direction,
}

impl MoveOptions {
    pub fn try_to_fit() -> Self {
        Self {
            try_to_fit: true,
            ..Self::default()
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }
}

/// Move the row at `origin` to `target`, together with every row its
/// merged cells are tied to
#[instrument(skip(tr, roles))]
pub fn move_row(
    tr: &Transaction,
    roles: &TableRoles,
    origin: usize,
    target: usize,
    options: MoveOptions,
) -> TableResult<Transaction> {
    move_along(tr, roles, Axis::Row, origin, target, options)
}

/// Move the column at `origin` to `target`, together with every column
/// its merged cells are tied to
#[instrument(skip(tr, roles))]
pub fn move_column(
    tr: &Transaction,
    roles: &TableRoles,
    origin: usize,
    target: usize,
    options: MoveOptions,
) -> TableResult<Transaction> {
    move_along(tr, roles, Axis::Column, origin, target, options)
}

fn move_along(
    tr: &Transaction,
    roles: &TableRoles,
    axis: Axis,
    origin: usize,
    target: usize,
    options: MoveOptions,
) -> TableResult<Transaction> {
    let Some(table) = TableContext::find(tr, roles) else {
        return Ok(tr.clone());
    };
    let (Some(origin_range), Some(target_range)) = (
        resolve_range(&table, axis, origin),
        resolve_range(&table, axis, target),
    ) else {
        return Ok(tr.clone());
    };
    if origin_range.contains(target) || origin_range.overlaps(&target_range) {
        return Ok(tr.clone());
    }
    if !options.try_to_fit {
        check_invalid_movement(axis, origin, target, &target_range)?;
    }

    let matrix = Matrix::from_table(&table.node);
    let planned = match axis {
        Axis::Row => Matrix::new(plan_move(
            matrix.into_rows(),
            origin_range.span(),
            target_range.span(),
            options.direction,
        )),
        Axis::Column => Matrix::new(plan_move(
            matrix.transpose().into_rows(),
            origin_range.span(),
            target_range.span(),
            options.direction,
        ))
        .transpose(),
    };
    let moved = from_matrix(&table.node, &planned)?;

    let mut next = clone_tr(tr);
    next.replace_with(table.pos, table.pos + table.node.node_size(), vec![moved])?;
    debug!(
        %axis,
        origin = ?origin_range.span(),
        target = ?target_range.span(),
        direction = i8::from(options.direction),
        "Moved table block"
    );
    Ok(next)
}
