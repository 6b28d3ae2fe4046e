//! # Table Map
//!
//! A derived slot grid for a table node. Each of the `width * height` slots
//! holds the offset of the cell covering it, measured from the start of the
//! table's content (so the first cell of the first row sits at offset 1).
//!
//! ```text
//!   ┌───────┬───┐        map (width 2, height 2)
//!   │ a     │ b │        ┌────┬────┐
//!   │ rs=2  ├───┤   →    │ a  │ b  │
//!   │       │ c │        │ a  │ c  │
//!   └───────┴───┘        └────┴────┘
//! ```
//!
//! The map is never cached: it is a pure function of the table node and is
//! recomputed whenever it is needed. A malformed table still produces a map;
//! what went wrong is listed in [`TableMap::problems`].

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use weft_model::Node;

/// A rectangle of slots: `left..right` columns, `top..bottom` rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub left: usize,
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
}

impl Rect {
    pub fn new(left: usize, top: usize, right: usize, bottom: usize) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> usize {
        self.right - self.left
    }

    pub fn height(&self) -> usize {
        self.bottom - self.top
    }
}

/// Structural defects found while mapping a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TableProblem {
    /// Two cells claim the same slot
    Collision { row: usize, pos: usize, n: usize },
    /// A row leaves `n` slots unfilled
    Missing { row: usize, n: usize },
    /// A cell's rowspan reaches `n` rows past the end of the table
    OverlongRowspan { pos: usize, n: usize },
}

/// Span attribute of a cell, values below 1 read as 1
pub fn span(cell: &Node, name: &str) -> usize {
    cell.attr(name)
        .and_then(|value| value.as_usize())
        .unwrap_or(1)
        .max(1)
}

pub fn rowspan(cell: &Node) -> usize {
    span(cell, "rowspan")
}

pub fn colspan(cell: &Node) -> usize {
    span(cell, "colspan")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMap {
    pub width: usize,
    pub height: usize,
    /// Cell offset per slot, row-major; `None` for an unfilled slot
    pub map: Vec<Option<usize>>,
    pub problems: Vec<TableProblem>,
}

impl TableMap {
    /// Map the cells of `table`
    pub fn get(table: &Node) -> Self {
        let width = find_width(table);
        let height = table.child_count();
        let mut map = vec![None; width * height];
        let mut problems = Vec::new();
        let mut map_pos = 0;
        let mut pos = 0;

        for (row, row_node) in table.children().iter().enumerate() {
            pos += 1;
            for cell in row_node.children() {
                while map_pos < map.len() && map[map_pos].is_some() {
                    map_pos += 1;
                }
                let cols = colspan(cell);
                let rows = rowspan(cell);
                for h in 0..rows {
                    if h + row >= height {
                        problems.push(TableProblem::OverlongRowspan { pos, n: rows - h });
                        break;
                    }
                    let start = map_pos + h * width;
                    for w in 0..cols {
                        let Some(slot) = map.get_mut(start + w) else {
                            continue;
                        };
                        if slot.is_none() {
                            *slot = Some(pos);
                        } else {
                            problems.push(TableProblem::Collision {
                                row,
                                pos,
                                n: cols - w,
                            });
                        }
                    }
                }
                map_pos += cols;
                pos += cell.node_size();
            }

            while map_pos < map.len() && map[map_pos].is_some() {
                map_pos += 1;
            }
            let expected = (row + 1) * width;
            let mut missing = 0;
            while map_pos < expected {
                if map[map_pos].is_none() {
                    missing += 1;
                }
                map_pos += 1;
            }
            if missing > 0 {
                problems.push(TableProblem::Missing { row, n: missing });
            }
            pos += 1;
        }

        Self {
            width,
            height,
            map,
            problems,
        }
    }

    pub fn slot(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.map[row * self.width + col]
    }

    /// Rectangle covered by the cell at `pos`
    pub fn find_cell(&self, pos: usize) -> Option<Rect> {
        let index = self.map.iter().position(|slot| *slot == Some(pos))?;
        let left = index % self.width;
        let top = index / self.width;
        let mut right = left + 1;
        while right < self.width && self.map[top * self.width + right] == Some(pos) {
            right += 1;
        }
        let mut bottom = top + 1;
        while bottom < self.height && self.map[bottom * self.width + left] == Some(pos) {
            bottom += 1;
        }
        Some(Rect::new(left, top, right, bottom))
    }

    /// Offsets of the cells whose top-left corner lies inside `rect`, in
    /// row-major order. Cells reaching into the rect from above or from the
    /// left are left out.
    pub fn cells_in_rect(&self, rect: Rect) -> Vec<usize> {
        let mut result = Vec::new();
        let mut seen = HashSet::new();
        for row in rect.top..rect.bottom.min(self.height) {
            for col in rect.left..rect.right.min(self.width) {
                let index = row * self.width + col;
                let Some(pos) = self.map[index] else {
                    continue;
                };
                if !seen.insert(pos) {
                    continue;
                }
                let from_left = col == rect.left && col > 0 && self.map[index - 1] == Some(pos);
                let from_above =
                    row == rect.top && row > 0 && self.map[index - self.width] == Some(pos);
                if from_left || from_above {
                    continue;
                }
                result.push(pos);
            }
        }
        result
    }

    /// Smallest rectangle covering the cells at `a` and `b`
    pub fn rect_between(&self, a: usize, b: usize) -> Option<Rect> {
        let a = self.find_cell(a)?;
        let b = self.find_cell(b)?;
        Some(Rect::new(
            a.left.min(b.left),
            a.top.min(b.top),
            a.right.max(b.right),
            a.bottom.max(b.bottom),
        ))
    }

    /// Rectangle of every mapped cell, keyed by offset
    pub fn cell_rects(&self) -> HashMap<usize, Rect> {
        let mut rects: HashMap<usize, Rect> = HashMap::new();
        for (index, slot) in self.map.iter().enumerate() {
            let Some(pos) = *slot else {
                continue;
            };
            let (row, col) = (index / self.width, index % self.width);
            rects
                .entry(pos)
                .and_modify(|rect| {
                    rect.right = rect.right.max(col + 1);
                    rect.bottom = rect.bottom.max(row + 1);
                })
                .or_insert_with(|| Rect::new(col, row, col + 1, row + 1));
        }
        rects
    }

    pub fn is_well_formed(&self) -> bool {
        self.problems.is_empty() && self.map.iter().all(Option::is_some)
    }
}

/// Widest row, counting cells that reach into a row from above
fn find_width(table: &Node) -> usize {
    let mut width = 0;
    let mut has_rowspan = false;
    for (row, row_node) in table.children().iter().enumerate() {
        let mut row_width = 0;
        if has_rowspan {
            for (j, previous) in table.children()[..row].iter().enumerate() {
                row_width += previous
                    .children()
                    .iter()
                    .filter(|cell| j + rowspan(cell) > row)
                    .map(colspan)
                    .sum::<usize>();
            }
        }
        for cell in row_node.children() {
            row_width += colspan(cell);
            if rowspan(cell) > 1 {
                has_rowspan = true;
            }
        }
        width = width.max(row_width);
    }
    width
}
