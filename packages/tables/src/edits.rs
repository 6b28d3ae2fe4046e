//! # Row and Column Insertion and Removal
//!
//! Every edit lays the table out as a list of cells with their slot
//! rectangles, shifts and resizes those rectangles, and rebuilds the table
//! from the resulting matrix. Cells crossing the edited line are resized
//! through their span attributes instead of being split:
//!
//! ```text
//!   add_row_at(1)                remove_row_at(0)
//!   ┌───┬───┐   ┌───┬───┐        ┌───┬───┐   ┌───┬───┐
//!   │ a │ b │   │ a │ b │        │ a │ b │   │ a │ c │
//!   │rs2├───┤ → │rs3├───┤        │rs2├───┤ → └───┴───┘
//!   │   │ c │   │   │   │        │   │ c │
//!   └───┴───┘   │   ├───┤        └───┴───┘
//!               │   │ c │
//!               └───┴───┘
//! ```

use crate::cells::{CellInfo, TableContext};
use crate::error::{Axis, TableResult};
use crate::map::{colspan, Rect};
use crate::matrix::{rebuild_table, Matrix};
use crate::roles::TableRoles;
use crate::selection::get_selected_cells;
use tracing::{debug, instrument};
use weft_common::{clone_tr, remove_parent_node_of_type};
use weft_model::{AttrValue, Attrs, Node, NodeType, Selection, Transaction};

/// A cell and the slots it covers
#[derive(Debug, Clone)]
struct PlacedCell {
    node: Node,
    rect: Rect,
}

/// Cells of the table ordered by their top-left slot
fn placed_cells(table: &TableContext) -> Vec<PlacedCell> {
    let mut cells: Vec<PlacedCell> = table
        .map
        .cell_rects()
        .into_iter()
        .filter_map(|(offset, rect)| {
            let node = table.node.node_at(offset)?.clone();
            Some(PlacedCell { node, rect })
        })
        .collect();
    cells.sort_by_key(|cell| (cell.rect.top, cell.rect.left));
    cells
}

fn layout(cells: Vec<PlacedCell>, height: usize, width: usize) -> Matrix {
    let mut rows = vec![vec![None; width]; height];
    for cell in cells {
        if let Some(slot) = rows
            .get_mut(cell.rect.top)
            .and_then(|row: &mut Vec<Option<Node>>| row.get_mut(cell.rect.left))
        {
            *slot = Some(cell.node);
        }
    }
    Matrix::new(rows)
}

fn add_col_span(cell: &Node, at: usize, n: usize) -> Node {
    let mut next = cell.with_attr("colspan", colspan(cell) + n);
    if let Some(widths) = cell.attr("colwidth").and_then(AttrValue::as_list) {
        let mut widths = widths.to_vec();
        let at = at.min(widths.len());
        widths.splice(at..at, std::iter::repeat(AttrValue::Int(0)).take(n));
        next = next.with_attr("colwidth", AttrValue::List(widths));
    }
    next
}

fn remove_col_span(cell: &Node, at: usize, n: usize) -> Node {
    let mut next = cell.with_attr("colspan", colspan(cell).saturating_sub(n).max(1));
    if let Some(widths) = cell.attr("colwidth").and_then(AttrValue::as_list) {
        let mut widths = widths.to_vec();
        let from = at.min(widths.len());
        let to = (at + n).min(widths.len());
        widths.drain(from..to);
        let any_width = widths
            .iter()
            .any(|width| width.as_i64().is_some_and(|width| width > 0));
        next = next.with_attr(
            "colwidth",
            if any_width {
                AttrValue::List(widths)
            } else {
                AttrValue::Null
            },
        );
    }
    next
}

/// The line new cells take their type from. A header line is only used as
/// reference when the new line lands between two lines.
fn reference_line(table: &TableContext, roles: &TableRoles, axis: Axis, index: usize) -> Option<usize> {
    let reference = index.saturating_sub(1);
    if table.is_header(roles, axis, reference) {
        (index != 0 && index != table.len(axis)).then_some(index)
    } else {
        Some(reference)
    }
}

fn new_cell(
    table: &TableContext,
    roles: &TableRoles,
    reference: Option<(usize, usize)>,
) -> TableResult<Node> {
    let node_type: NodeType = reference
        .and_then(|(row, col)| table.map.slot(row, col))
        .and_then(|offset| table.node.node_at(offset))
        .map_or_else(|| roles.cell().clone(), |cell| cell.node_type().clone());
    Ok(roles.schema().create_and_fill(&node_type, Attrs::new())?)
}

/// Swap the table for `rebuilt`, keeping the cursor inside it
fn replace_table(tr: &Transaction, table: &TableContext, rebuilt: Node) -> TableResult<Transaction> {
    let from = tr.selection().from();
    let last_inside = table.pos + rebuilt.node_size() - 1;

    let mut next = clone_tr(tr);
    next.replace_with(table.pos, table.pos + table.node.node_size(), vec![rebuilt])?;
    let selection = Selection::near(next.doc(), from.min(last_inside));
    next.set_selection(selection);
    Ok(next)
}

/// Insert a row at `index` (`0..=height`).
///
/// Cells spanning across the insertion line grow instead of getting a new
/// cell. With `clone_previous` the new cells copy type and attributes of
/// the cells in the row above, and multi-row cells there grow into the new
/// row.
#[instrument(skip(tr, roles))]
pub fn add_row_at(
    tr: &Transaction,
    roles: &TableRoles,
    index: usize,
    clone_previous: bool,
) -> TableResult<Transaction> {
    let Some(table) = TableContext::find(tr, roles) else {
        return Ok(tr.clone());
    };
    let (width, height) = (table.map.width, table.map.height);
    if index > height {
        return Ok(tr.clone());
    }
    let above = if clone_previous { index.checked_sub(1) } else { None };

    let mut covered = vec![false; width];
    let mut cells = Vec::new();
    for mut cell in placed_cells(&table) {
        let rect = cell.rect;
        let grows = match above {
            Some(above) => {
                rect.top <= above && rect.bottom > above && (rect.top < above || rect.bottom > index)
            }
            None => rect.top < index && rect.bottom > index,
        };
        let copied = above.is_some_and(|above| rect.top == above && rect.bottom == index);

        if grows {
            cell.node = cell.node.with_attr("rowspan", rect.height() + 1);
        }
        if copied {
            let attrs = cell.node.with_attr("rowspan", 1usize).attrs().clone();
            let node = roles.schema().create_and_fill(cell.node.node_type(), attrs)?;
            cells.push(PlacedCell {
                node,
                rect: Rect::new(rect.left, index, rect.right, index + 1),
            });
        }
        if grows || copied {
            for slot in covered.iter_mut().take(rect.right).skip(rect.left) {
                *slot = true;
            }
        }
        if rect.top >= index {
            cell.rect.top += 1;
        }
        cells.push(cell);
    }

    let reference = reference_line(&table, roles, Axis::Row, index);
    for col in (0..width).filter(|col| !covered[*col]) {
        let node = new_cell(&table, roles, reference.map(|row| (row, col)))?;
        cells.push(PlacedCell {
            node,
            rect: Rect::new(col, index, col + 1, index + 1),
        });
    }

    let template = match above {
        Some(above) => table.node.child(above).clone(),
        None => roles.row().create(Attrs::new(), Vec::new(), Vec::new())?,
    };
    let mut rows = table.node.children().to_vec();
    rows.insert(index, template);

    let rebuilt = rebuild_table(&table.node, &rows, &layout(cells, height + 1, width))?;
    let next = replace_table(tr, &table, rebuilt)?;
    debug!(index, clone_previous, "Added table row");
    Ok(next)
}

/// Insert a column at `index` (`0..=width`). Cells spanning across the
/// insertion line grow, keeping their column widths aligned.
#[instrument(skip(tr, roles))]
pub fn add_column_at(tr: &Transaction, roles: &TableRoles, index: usize) -> TableResult<Transaction> {
    let Some(table) = TableContext::find(tr, roles) else {
        return Ok(tr.clone());
    };
    let (width, height) = (table.map.width, table.map.height);
    if index > width {
        return Ok(tr.clone());
    }

    let mut covered = vec![false; height];
    let mut cells = Vec::new();
    for mut cell in placed_cells(&table) {
        let rect = cell.rect;
        if rect.left < index && rect.right > index {
            cell.node = add_col_span(&cell.node, index - rect.left, 1);
            for slot in covered.iter_mut().take(rect.bottom).skip(rect.top) {
                *slot = true;
            }
        }
        if rect.left >= index {
            cell.rect.left += 1;
        }
        cells.push(cell);
    }

    let reference = reference_line(&table, roles, Axis::Column, index);
    for row in (0..height).filter(|row| !covered[*row]) {
        let node = new_cell(&table, roles, reference.map(|col| (row, col)))?;
        cells.push(PlacedCell {
            node,
            rect: Rect::new(index, row, index + 1, row + 1),
        });
    }

    let rebuilt = rebuild_table(&table.node, table.node.children(), &layout(cells, height, width + 1))?;
    let next = replace_table(tr, &table, rebuilt)?;
    debug!(index, "Added table column");
    Ok(next)
}

/// Remove row `index`. Cells reaching into the row shrink; cells starting
/// in it and spanning below move down into the next row. Removing the only
/// row removes the table.
#[instrument(skip(tr, roles))]
pub fn remove_row_at(tr: &Transaction, roles: &TableRoles, index: usize) -> TableResult<Transaction> {
    let Some(table) = TableContext::find(tr, roles) else {
        return Ok(tr.clone());
    };
    let (width, height) = (table.map.width, table.map.height);
    if index >= height {
        return Ok(tr.clone());
    }
    if height == 1 {
        return remove_table(tr, roles);
    }

    let mut cells = Vec::new();
    for mut cell in placed_cells(&table) {
        let rect = cell.rect;
        if rect.top <= index && index < rect.bottom {
            if rect.height() == 1 {
                continue;
            }
            cell.node = cell.node.with_attr("rowspan", rect.height() - 1);
        } else if rect.top > index {
            cell.rect.top -= 1;
        }
        cells.push(cell);
    }

    let mut rows = table.node.children().to_vec();
    rows.remove(index);

    let rebuilt = rebuild_table(&table.node, &rows, &layout(cells, height - 1, width))?;
    let next = replace_table(tr, &table, rebuilt)?;
    debug!(index, "Removed table row");
    Ok(next)
}

/// Remove column `index`. Cells spanning over it shrink; removing the only
/// column removes the table.
#[instrument(skip(tr, roles))]
pub fn remove_column_at(tr: &Transaction, roles: &TableRoles, index: usize) -> TableResult<Transaction> {
    let Some(table) = TableContext::find(tr, roles) else {
        return Ok(tr.clone());
    };
    let (width, height) = (table.map.width, table.map.height);
    if index >= width {
        return Ok(tr.clone());
    }
    if width == 1 {
        return remove_table(tr, roles);
    }

    let mut cells = Vec::new();
    for mut cell in placed_cells(&table) {
        let rect = cell.rect;
        if rect.left <= index && index < rect.right {
            if rect.width() == 1 {
                continue;
            }
            cell.node = remove_col_span(&cell.node, index - rect.left, 1);
        } else if rect.left > index {
            cell.rect.left -= 1;
        }
        cells.push(cell);
    }

    let rebuilt = rebuild_table(&table.node, table.node.children(), &layout(cells, height, width - 1))?;
    let next = replace_table(tr, &table, rebuilt)?;
    debug!(index, "Removed table column");
    Ok(next)
}

/// Remove the table around the selection
pub fn remove_table(tr: &Transaction, roles: &TableRoles) -> TableResult<Transaction> {
    Ok(remove_parent_node_of_type(tr, &[roles.table()])?)
}

fn empty_content(roles: &TableRoles, cell: &Node) -> TableResult<Vec<Node>> {
    let filled = roles
        .schema()
        .create_and_fill(cell.node_type(), Attrs::new())?;
    Ok(filled.children().to_vec())
}

fn clear_cell(tr: &mut Transaction, cell: &CellInfo, content: Vec<Node>) -> TableResult<()> {
    let end = cell.start + cell.node.content_size();
    tr.replace_with(cell.start, end, content)?;
    Ok(())
}

/// Replace the content of `cell` with the default content of its type
pub fn empty_cell(tr: &Transaction, roles: &TableRoles, cell: &CellInfo) -> TableResult<Transaction> {
    let content = empty_content(roles, &cell.node)?;
    if cell.node.children() == content.as_slice() {
        return Ok(tr.clone());
    }
    let mut next = clone_tr(tr);
    clear_cell(&mut next, cell, content)?;
    Ok(next)
}

/// Empty every cell of the cell selection
pub fn empty_selected_cells(tr: &Transaction, roles: &TableRoles) -> TableResult<Transaction> {
    let mut cells = get_selected_cells(tr, roles);
    // back to front, so earlier positions stay valid
    cells.sort_by_key(|cell| std::cmp::Reverse(cell.pos));

    let mut next: Option<Transaction> = None;
    for cell in &cells {
        let content = empty_content(roles, &cell.node)?;
        if cell.node.children() == content.as_slice() {
            continue;
        }
        let edited = next.get_or_insert_with(|| clone_tr(tr));
        clear_cell(edited, cell, content)?;
    }
    if next.is_some() {
        debug!(cells = cells.len(), "Emptied selected cells");
    }
    Ok(next.unwrap_or_else(|| tr.clone()))
}
