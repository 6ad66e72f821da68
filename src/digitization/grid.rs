// src/digitization/grid.rs

use super::cell::Cell;
use super::row_label::parse_row_label;

pub const GRID_ROWS: usize = 5;
pub const GRID_COLS: usize = 5;

/// A position inside the 5x5 survey grid. Construction checks the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
    row: usize,
    col: usize,
}

impl GridPos {
    pub fn new(row: usize, col: usize) -> Option<Self> {
        (row < GRID_ROWS && col < GRID_COLS).then_some(Self { row, col })
    }

    /// Maps the parsed indices of a cell to a grid position, if they land inside it.
    pub fn from_indices(row: i64, col: i64) -> Option<Self> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        Self::new(row, col)
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn all() -> impl Iterator<Item = GridPos> {
        (0..GRID_ROWS).flat_map(|row| (0..GRID_COLS).map(move |col| GridPos { row, col }))
    }
}

/// Parsed (row, col) of a cell; row is `None` when the label is unusable.
pub fn cell_indices(cell: &Cell) -> (Option<i64>, i64) {
    (parse_row_label(&cell.row_label), cell.column)
}

/// Grid position a cell claims, if any.
pub fn cell_position(cell: &Cell) -> Option<GridPos> {
    let (row, col) = cell_indices(cell);
    GridPos::from_indices(row?, col)
}

/// Fixed-shape view over a flat cell list.
///
/// Built from scratch on every read. Cells outside the grid are skipped here but stay
/// in the flat list, and when two cells claim the same slot the later one wins.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseGrid<'a> {
    slots: [[Option<&'a Cell>; GRID_COLS]; GRID_ROWS],
}

impl<'a> DenseGrid<'a> {
    pub fn build(cells: &'a [Cell]) -> Self {
        let mut slots = [[None; GRID_COLS]; GRID_ROWS];
        for cell in cells {
            if let Some(pos) = cell_position(cell) {
                slots[pos.row][pos.col] = Some(cell);
            }
        }
        Self { slots }
    }

    pub fn get(&self, pos: GridPos) -> Option<&'a Cell> {
        self.slots[pos.row][pos.col]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<&'a Cell>; GRID_COLS]> {
        self.slots.iter()
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().flatten().filter(|slot| slot.is_some()).count()
    }

    pub fn low_confidence_count(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .flatten()
            .filter(|cell| cell.is_low_confidence())
            .count()
    }
}
