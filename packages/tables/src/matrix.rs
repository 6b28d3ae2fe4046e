//! # Grid Matrix Codec
//!
//! Converts a table node into a dense `height x width` matrix of cell nodes
//! and back. Each real cell sits once, at its top-left slot; every slot a
//! span covers holds `None`.
//!
//! ```text
//!   table                      matrix
//!   ┌─────────┬───┐            [ Some(a), None,    Some(b) ]
//!   │ a cs=2  │ b │     ⇄      [ Some(c), Some(d), Some(e) ]
//!   ├───┬───┬─┴───┤
//!   │ c │ d │ e   │
//!   └───┴───┴─────┘
//! ```
//!
//! Rows and columns are reordered by reordering matrix rows; columns go
//! through [`Matrix::transpose`] first. Rebuilding reads the matrix left to
//! right, so as long as span blocks move whole the rebuilt table maps onto
//! exactly the reordered matrix.

use crate::error::{TableError, TableResult};
use crate::map::TableMap;
use std::collections::HashSet;
use weft_model::Node;

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: Vec<Vec<Option<Node>>>,
}

impl Matrix {
    pub fn new(rows: Vec<Vec<Option<Node>>>) -> Self {
        Self { rows }
    }

    /// Matrix of `table`. Cells are placed the first time their offset shows
    /// up in a row-major scan, which is their top-left slot.
    pub fn from_table(table: &Node) -> Self {
        let map = TableMap::get(table);
        let mut seen = HashSet::new();
        let rows = (0..map.height)
            .map(|row| {
                (0..map.width)
                    .map(|col| {
                        let pos = map.slot(row, col)?;
                        if !seen.insert(pos) {
                            return None;
                        }
                        table.node_at(pos).cloned()
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<Option<Node>>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<Option<Node>>> {
        self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Node> {
        self.rows.get(row)?.get(col)?.as_ref()
    }

    /// Rows become columns
    pub fn transpose(&self) -> Self {
        let width = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = (0..width)
            .map(|col| {
                self.rows
                    .iter()
                    .map(|row| row.get(col).cloned().flatten())
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Real cells in the order they appear, top to bottom, left to right
    pub fn cells(&self) -> impl Iterator<Item = &Node> {
        self.rows.iter().flatten().flatten()
    }
}

pub fn to_matrix(table: &Node) -> Matrix {
    Matrix::from_table(table)
}

/// Rebuild `table` from `matrix`, keeping each original row node for its
/// type and attributes
pub fn from_matrix(table: &Node, matrix: &Matrix) -> TableResult<Node> {
    if matrix.height() != table.child_count() {
        return Err(TableError::MatrixShape {
            expected: table.child_count(),
            found: matrix.height(),
        });
    }
    rebuild_table(table, table.children(), matrix)
}

/// Rebuild `table` with one row per matrix row, taking the row node
/// markup from `rows`
pub fn rebuild_table(table: &Node, rows: &[Node], matrix: &Matrix) -> TableResult<Node> {
    if matrix.height() != rows.len() {
        return Err(TableError::MatrixShape {
            expected: rows.len(),
            found: matrix.height(),
        });
    }

    let rebuilt = rows
        .iter()
        .zip(matrix.rows())
        .map(|(row, slots)| {
            let cells = slots
                .iter()
                .flatten()
                .map(|cell| {
                    cell.node_type().create_checked(
                        cell.attrs().clone(),
                        cell.children().to_vec(),
                        cell.marks().to_vec(),
                    )
                })
                .collect::<Result<Vec<_>, _>>()?;
            row.node_type()
                .create_checked(row.attrs().clone(), cells, row.marks().to_vec())
                .map_err(TableError::from)
        })
        .collect::<TableResult<Vec<_>>>()?;

    Ok(table
        .node_type()
        .create_checked(table.attrs().clone(), rebuilt, table.marks().to_vec())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_model::builders::*;

    fn texts(matrix: &Matrix) -> Vec<Vec<String>> {
        matrix
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|slot| slot.as_ref().map_or(String::new(), Node::text_content))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_spans_leave_placeholders() {
        let table = table(vec![
            row(vec![td_span("a", 1, 2), td("b")]),
            row(vec![td_span("c", 2, 1), td("d"), td("e")]),
            row(vec![td("f"), td("g")]),
        ]);
        let matrix = to_matrix(&table);

        assert_eq!(
            texts(&matrix),
            vec![
                vec!["a", "", "b"],
                vec!["c", "d", "e"],
                vec!["", "f", "g"],
            ]
        );
        assert_eq!(matrix.cells().count(), 7);
    }

    #[test]
    fn test_round_trip_keeps_table() {
        let table = table(vec![
            row(vec![th("h1"), th_span("h2", 1, 2)]),
            row(vec![td_span("a", 2, 1), td("b"), td("c")]),
            row(vec![td("d"), td("e")]),
        ]);

        let rebuilt = from_matrix(&table, &to_matrix(&table)).unwrap();

        assert_eq!(rebuilt, table);
        assert_eq!(TableMap::get(&rebuilt), TableMap::get(&table));
    }

    #[test]
    fn test_transpose_twice_is_identity() {
        let table = table(vec![
            row(vec![td("a"), td("b"), td("c")]),
            row(vec![td("d"), td("e"), td("f")]),
        ]);
        let matrix = to_matrix(&table);
        let transposed = matrix.transpose();

        assert_eq!(transposed.height(), 3);
        assert_eq!(transposed.get(2, 1).map(Node::text_content), Some("f".to_string()));
        assert_eq!(transposed.transpose(), matrix);
    }

    #[test]
    fn test_shape_mismatch() {
        let table = table(vec![row(vec![td("a")])]);
        let matrix = Matrix::new(vec![]);

        assert_eq!(
            from_matrix(&table, &matrix),
            Err(TableError::MatrixShape {
                expected: 1,
                found: 0
            })
        );
    }
}
