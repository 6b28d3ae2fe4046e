//! # Span-Aware Index Resolver
//!
//! With merged cells, "row 2" may not be something that can move on its
//! own. The resolver widens a requested index to the smallest block of
//! rows (or columns) that no cell crosses:
//!
//! ```text
//!   row 0 │ a       │ b │
//!   row 1 │ c rs=2  │ d │   resolve(Row, 2) → 1..=2
//!   row 2 │         │ e │
//! ```
//!
//! 1. walk back from the index: a cell starting at `i` whose span reaches
//!    the current start pulls the start back to `i`
//! 2. walk forward to the current end: any cell reaching further pushes it
//! 3. keep the indexes that still hold a cell of their own
//! 4. bound the block with an anchor and a head cell for a cell selection,
//!    taken from opposite corners so spans reaching the first row or
//!    column are selected too

use crate::cells::TableContext;
use crate::error::Axis;
use crate::map::{colspan, rowspan};
use crate::roles::TableRoles;
use std::ops::RangeInclusive;
use weft_model::{Node, Selection, Transaction};

/// The atomic block of rows or columns around an index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    pub axis: Axis,
    /// First index of the block. Always holds cells of its own, so it is
    /// also the first of `indexes`.
    pub start: usize,
    /// Last index of the block. Unlike the last of `indexes` this may be an
    /// index fully covered by spans, which keeps the whole block together
    /// when it moves.
    pub end: usize,
    /// Indexes of the block holding at least one cell of their own
    pub indexes: Vec<usize>,
    /// Position of the cell covering the far corner of `start`: the last
    /// column of a row block, the last row of a column block
    pub anchor: usize,
    /// Position of the cell covering the near corner of `end`: the first
    /// column of a row block, the first row of a column block
    pub head: usize,
}

impl CellRange {
    pub fn span(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        self.span().contains(&index)
    }

    pub fn overlaps(&self, other: &CellRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// More than one row or column has to move together
    pub fn is_merged(&self) -> bool {
        self.end > self.start
    }

    pub fn selection(&self) -> Selection {
        Selection::cell(self.anchor, self.head)
    }
}

fn axis_span(axis: Axis, cell: &Node) -> usize {
    match axis {
        Axis::Row => rowspan(cell),
        Axis::Column => colspan(cell),
    }
}

/// Block of rows or columns around `index`; `None` when the index is
/// outside the table
pub fn resolve_range(table: &TableContext, axis: Axis, index: usize) -> Option<CellRange> {
    let len = table.len(axis);
    if index >= len {
        return None;
    }

    let mut start = index;
    let mut end = index;
    for i in (0..=index).rev() {
        for cell in table.cells_at(axis, i) {
            let far = i + axis_span(axis, &cell.node) - 1;
            if far >= start {
                start = i;
            }
            end = end.max(far);
        }
    }

    let mut i = index;
    while i <= end && i < len {
        for cell in table.cells_at(axis, i) {
            end = end.max(i + axis_span(axis, &cell.node) - 1);
        }
        i += 1;
    }
    let end = end.min(len - 1);

    let indexes: Vec<usize> = (start..=end)
        .filter(|i| !table.cells_at(axis, *i).is_empty())
        .collect();
    if indexes.is_empty() {
        return None;
    }
    let (anchor, head) = match axis {
        Axis::Row => (
            table.cell_at(start, table.map.width - 1)?,
            table.cell_at(end, 0)?,
        ),
        Axis::Column => (
            table.cell_at(table.map.height - 1, start)?,
            table.cell_at(0, end)?,
        ),
    };

    Some(CellRange {
        axis,
        start,
        end,
        indexes,
        anchor: anchor.pos,
        head: head.pos,
    })
}

fn selection_range(
    tr: &Transaction,
    roles: &TableRoles,
    axis: Axis,
    index: usize,
) -> Option<CellRange> {
    let table = TableContext::find(tr, roles)?;
    resolve_range(&table, axis, index)
}

/// Rows that have to move together with row `index`
pub fn selection_range_in_row(
    tr: &Transaction,
    roles: &TableRoles,
    index: usize,
) -> Option<CellRange> {
    selection_range(tr, roles, Axis::Row, index)
}

/// Columns that have to move together with column `index`
pub fn selection_range_in_column(
    tr: &Transaction,
    roles: &TableRoles,
    index: usize,
) -> Option<CellRange> {
    selection_range(tr, roles, Axis::Column, index)
}
