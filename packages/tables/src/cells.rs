//! Table lookup and cell accessors

use crate::error::Axis;
use crate::map::{Rect, TableMap};
use crate::roles::TableRoles;
use weft_common::{find_parent_node, find_parent_node_closest_to_pos, FoundNode};
use weft_model::{Node, ResolvedPos, Transaction};

/// A cell together with its document position
#[derive(Debug, Clone, PartialEq)]
pub struct CellInfo {
    /// Position directly before the cell
    pub pos: usize,
    /// Position where the cell's content starts
    pub start: usize,
    pub node: Node,
}

/// A table found in a document, with its map
#[derive(Debug, Clone)]
pub struct TableContext {
    pub node: Node,
    /// Position directly before the table
    pub pos: usize,
    /// Position where the table's content starts
    pub start: usize,
    pub map: TableMap,
}

impl TableContext {
    pub fn new(found: FoundNode) -> Self {
        let map = TableMap::get(&found.node);
        Self {
            node: found.node,
            pos: found.pos,
            start: found.start,
            map,
        }
    }

    /// The table around the selection of `tr`
    pub fn find(tr: &Transaction, roles: &TableRoles) -> Option<Self> {
        find_table(tr, roles).map(Self::new)
    }

    /// Number of rows or columns
    pub fn len(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.map.height,
            Axis::Column => self.map.width,
        }
    }

    /// Cell at an offset relative to the table content
    pub fn cell(&self, offset: usize) -> Option<CellInfo> {
        let node = self.node.node_at(offset)?.clone();
        let pos = self.start + offset;
        Some(CellInfo {
            pos,
            start: pos + 1,
            node,
        })
    }

    /// Cell covering the slot at `row`, `col`
    pub fn cell_at(&self, row: usize, col: usize) -> Option<CellInfo> {
        self.cell(self.map.slot(row, col)?)
    }

    pub fn cells_in_rect(&self, rect: Rect) -> Vec<CellInfo> {
        self.map
            .cells_in_rect(rect)
            .into_iter()
            .filter_map(|offset| self.cell(offset))
            .collect()
    }

    /// Cells starting in row or column `index`
    pub fn cells_at(&self, axis: Axis, index: usize) -> Vec<CellInfo> {
        if index >= self.len(axis) {
            return Vec::new();
        }
        let rect = match axis {
            Axis::Row => Rect::new(0, index, self.map.width, index + 1),
            Axis::Column => Rect::new(index, 0, index + 1, self.map.height),
        };
        self.cells_in_rect(rect)
    }

    pub fn full_rect(&self) -> Rect {
        Rect::new(0, 0, self.map.width, self.map.height)
    }

    /// Whether every slot of the row or column is covered by a header cell
    pub fn is_header(&self, roles: &TableRoles, axis: Axis, index: usize) -> bool {
        let slots = match axis {
            Axis::Row => self.map.width,
            Axis::Column => self.map.height,
        };
        (0..slots).all(|i| {
            let (row, col) = match axis {
                Axis::Row => (index, i),
                Axis::Column => (i, index),
            };
            self.map
                .slot(row, col)
                .and_then(|offset| self.node.node_at(offset))
                .is_some_and(|cell| roles.is_header_cell(cell))
        })
    }
}

/// Closest table around the selection start
pub fn find_table(tr: &Transaction, roles: &TableRoles) -> Option<FoundNode> {
    find_parent_node(tr.doc(), tr.selection(), |node| roles.is_table(node))
}

fn collect_cells(
    tr: &Transaction,
    roles: &TableRoles,
    axis: Axis,
    indexes: &[usize],
) -> Option<Vec<CellInfo>> {
    let table = TableContext::find(tr, roles)?;
    Some(
        indexes
            .iter()
            .flat_map(|index| table.cells_at(axis, *index))
            .collect(),
    )
}

/// Cells starting in each of the given columns. Indexes outside the table
/// are skipped; `None` when the selection is not inside a table.
pub fn get_cells_in_column(
    tr: &Transaction,
    roles: &TableRoles,
    indexes: &[usize],
) -> Option<Vec<CellInfo>> {
    collect_cells(tr, roles, Axis::Column, indexes)
}

/// Cells starting in each of the given rows
pub fn get_cells_in_row(
    tr: &Transaction,
    roles: &TableRoles,
    indexes: &[usize],
) -> Option<Vec<CellInfo>> {
    collect_cells(tr, roles, Axis::Row, indexes)
}

pub fn get_cells_in_table(tr: &Transaction, roles: &TableRoles) -> Option<Vec<CellInfo>> {
    let table = TableContext::find(tr, roles)?;
    Some(table.cells_in_rect(table.full_rect()))
}

pub fn find_cell_closest_to_pos(roles: &TableRoles, pos: &ResolvedPos) -> Option<FoundNode> {
    find_parent_node_closest_to_pos(pos, |node| roles.is_cell(node))
}

/// Slots covered by the cell around `pos`
pub fn find_cell_rect_closest_to_pos(roles: &TableRoles, pos: &ResolvedPos) -> Option<Rect> {
    let cell = find_cell_closest_to_pos(roles, pos)?;
    let table = find_parent_node_closest_to_pos(pos, |node| roles.is_table(node))?;
    let offset = cell.pos - table.start;
    TableMap::get(&table.node).rect_between(offset, offset)
}
