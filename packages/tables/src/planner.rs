//! # Movement Planner
//!
//! Reorders a list of rows (or transposed columns) by lifting a contiguous
//! origin block out and dropping it next to a target block. Blocks are
//! always kept whole, which is what keeps span attributes valid.
//!
//! ```text
//!   natural backward (origin after target)   → lands before the target
//!   natural forward  (origin before target)  → lands after the target
//!   direction override                       → forces the side
//! ```

use crate::error::{Axis, TableError, TableResult};
use crate::range::CellRange;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Which side of a merged target block a moved block lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Direction {
    /// Land before the target block
    Backward,
    /// Follow the direction of movement
    #[default]
    Natural,
    /// Land after the target block
    Forward,
}

impl Direction {
    /// Direction of a move from `origin` to `target`; never `Natural`
    pub fn of_move(origin: usize, target: usize) -> Self {
        if origin > target {
            Direction::Backward
        } else {
            Direction::Forward
        }
    }
}

impl TryFrom<i8> for Direction {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Direction::Backward),
            0 => Ok(Direction::Natural),
            1 => Ok(Direction::Forward),
            other => Err(format!("invalid direction {other}, expected -1, 0 or 1")),
        }
    }
}

impl From<Direction> for i8 {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Backward => -1,
            Direction::Natural => 0,
            Direction::Forward => 1,
        }
    }
}

/// Move the `origin` block of `items` next to the `target` block.
///
/// Indexes refer to `items` before the move. The blocks must not overlap.
pub fn plan_move<T>(
    mut items: Vec<T>,
    origin: RangeInclusive<usize>,
    target: RangeInclusive<usize>,
    direction: Direction,
) -> Vec<T> {
    let len = items.len();
    let (origin_start, origin_end) = (*origin.start(), (*origin.end()).min(len.saturating_sub(1)));
    if origin_start > origin_end || origin_start >= len {
        return items;
    }

    let natural = Direction::of_move(origin_start, *target.start());
    let before = match (natural, direction) {
        (Direction::Forward, Direction::Backward) => true,
        (Direction::Backward, Direction::Forward) => false,
        (natural, _) => natural == Direction::Backward,
    };

    let block: Vec<T> = items.drain(origin_start..=origin_end).collect();
    let shift = if origin_start < *target.start() {
        block.len()
    } else {
        0
    };
    let insert_at = if before {
        target.start().saturating_sub(shift)
    } else {
        (target.end() + 1).saturating_sub(shift)
    };
    let insert_at = insert_at.min(items.len());

    items.splice(insert_at..insert_at, block);
    items
}

/// Reject a strict move whose target index sits inside a merged block
/// rather than on the boundary the block would be entered from.
///
/// Only indexes holding cells of their own count: a block of one such
/// index plus rows or columns fully covered by its spans accepts any
/// target.
pub fn check_invalid_movement(
    axis: Axis,
    origin: usize,
    target: usize,
    target_range: &CellRange,
) -> TableResult<()> {
    let indexes = &target_range.indexes;
    if indexes.len() < 2 {
        return Ok(());
    }
    let boundary = match Direction::of_move(origin, target) {
        Direction::Backward => indexes.first(),
        _ => indexes.last(),
    };
    if boundary == Some(&target) {
        Ok(())
    } else {
        Err(TableError::InvalidMovement {
            axis,
            origin,
            target,
        })
    }
}
