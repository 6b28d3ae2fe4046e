//! Cell selections over rows, columns and whole tables

use crate::cells::{find_cell_closest_to_pos, CellInfo, TableContext};
use crate::error::Axis;
use crate::map::Rect;
use crate::roles::TableRoles;
use tracing::debug;
use weft_common::clone_tr;
use weft_model::{Selection, Transaction};

pub fn is_cell_selection(selection: &Selection) -> bool {
    matches!(selection, Selection::Cell { .. })
}

/// Slots spanned by the current cell selection
pub fn get_selection_rect(tr: &Transaction, roles: &TableRoles) -> Option<Rect> {
    let Selection::Cell { anchor, head } = *tr.selection() else {
        return None;
    };
    let table = TableContext::find(tr, roles)?;
    table.map.rect_between(
        anchor.checked_sub(table.start)?,
        head.checked_sub(table.start)?,
    )
}

/// Whether every cell starting inside `rect` is part of the cell selection
pub fn is_rect_selected(tr: &Transaction, roles: &TableRoles, rect: Rect) -> bool {
    let (Some(table), Some(selected)) = (
        TableContext::find(tr, roles),
        get_selection_rect(tr, roles),
    ) else {
        return false;
    };
    let selected = table.map.cells_in_rect(selected);
    table
        .map
        .cells_in_rect(rect)
        .iter()
        .all(|cell| selected.contains(cell))
}

fn is_line_selected(tr: &Transaction, roles: &TableRoles, axis: Axis, index: usize) -> bool {
    let Some(table) = TableContext::find(tr, roles) else {
        return false;
    };
    if index >= table.len(axis) {
        return false;
    }
    let rect = match axis {
        Axis::Row => Rect::new(0, index, table.map.width, index + 1),
        Axis::Column => Rect::new(index, 0, index + 1, table.map.height),
    };
    is_rect_selected(tr, roles, rect)
}

pub fn is_row_selected(tr: &Transaction, roles: &TableRoles, index: usize) -> bool {
    is_line_selected(tr, roles, Axis::Row, index)
}

pub fn is_column_selected(tr: &Transaction, roles: &TableRoles, index: usize) -> bool {
    is_line_selected(tr, roles, Axis::Column, index)
}

pub fn is_table_selected(tr: &Transaction, roles: &TableRoles) -> bool {
    TableContext::find(tr, roles).is_some_and(|table| is_rect_selected(tr, roles, table.full_rect()))
}

/// Cells covered by the cell selection; empty for any other selection
pub fn get_selected_cells(tr: &Transaction, roles: &TableRoles) -> Vec<CellInfo> {
    match (TableContext::find(tr, roles), get_selection_rect(tr, roles)) {
        (Some(table), Some(rect)) => table.cells_in_rect(rect),
        _ => Vec::new(),
    }
}

/// Slots of the cell the selection starts in
fn selected_cell_rect(tr: &Transaction, roles: &TableRoles, table: &TableContext) -> Option<Rect> {
    let pos = match *tr.selection() {
        Selection::Cell { anchor, head } => anchor.min(head),
        _ => {
            let from = tr.selection().resolve_from(tr.doc()).ok()?;
            find_cell_closest_to_pos(roles, &from)?.pos
        }
    };
    table.map.find_cell(pos.checked_sub(table.start)?)
}

fn select_line(
    tr: &Transaction,
    roles: &TableRoles,
    axis: Axis,
    index: usize,
    expand: bool,
) -> Transaction {
    let Some(table) = TableContext::find(tr, roles) else {
        return tr.clone();
    };
    if index >= table.len(axis) {
        return tr.clone();
    }

    let mut rect = match axis {
        Axis::Row => Rect::new(0, index, table.map.width, index + 1),
        Axis::Column => Rect::new(index, 0, index + 1, table.map.height),
    };
    if expand {
        let Some(current) = selected_cell_rect(tr, roles, &table) else {
            return tr.clone();
        };
        match axis {
            Axis::Row => {
                rect.top = rect.top.min(current.top);
                rect.bottom = rect.bottom.max(current.bottom);
            }
            Axis::Column => {
                rect.left = rect.left.min(current.left);
                rect.right = rect.right.max(current.right);
            }
        }
    }

    // first and last line of the rect, along the axis
    let (first, last) = match axis {
        Axis::Row => (
            Rect::new(rect.left, rect.top, rect.right, rect.top + 1),
            Rect::new(rect.left, rect.bottom - 1, rect.right, rect.bottom),
        ),
        Axis::Column => (
            Rect::new(rect.left, rect.top, rect.left + 1, rect.bottom),
            Rect::new(rect.right - 1, rect.top, rect.right, rect.bottom),
        ),
    };
    let (Some(head), Some(anchor)) = (
        table.map.cells_in_rect(first).first().copied(),
        table.map.cells_in_rect(last).last().copied(),
    ) else {
        return tr.clone();
    };

    let mut next = clone_tr(tr);
    next.set_selection(Selection::cell(table.start + anchor, table.start + head));
    debug!(%axis, index, expand, "Selected table line");
    next
}

/// Select the cells of row `index`. With `expand`, the selection also keeps
/// the rows of the cell the current selection starts in.
pub fn select_row(tr: &Transaction, roles: &TableRoles, index: usize, expand: bool) -> Transaction {
    select_line(tr, roles, Axis::Row, index, expand)
}

/// Select the cells of column `index`
pub fn select_column(
    tr: &Transaction,
    roles: &TableRoles,
    index: usize,
    expand: bool,
) -> Transaction {
    select_line(tr, roles, Axis::Column, index, expand)
}

pub fn select_table(tr: &Transaction, roles: &TableRoles) -> Transaction {
    let Some(table) = TableContext::find(tr, roles) else {
        return tr.clone();
    };
    let (Some(head), Some(anchor)) = (
        table.map.map.first().copied().flatten(),
        table.map.map.last().copied().flatten(),
    ) else {
        return tr.clone();
    };

    let mut next = clone_tr(tr);
    next.set_selection(Selection::cell(table.start + anchor, table.start + head));
    next
}
