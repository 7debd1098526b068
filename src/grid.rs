use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// Grid position in logical cell coordinates.
///
/// Signed so that a candidate head one step past the border can be
/// represented and rejected before it is ever used as an index.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this position shifted by a unit delta.
    #[must_use]
    pub fn offset(self, (dx, dy): (i32, i32)) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns true when the position lies on a `size`×`size` board.
    #[must_use]
    pub fn is_within(self, size: u16) -> bool {
        let size = i32::from(size);
        self.x >= 0 && self.y >= 0 && self.x < size && self.y < size
    }

    /// Manhattan distance between two positions.
    #[must_use]
    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Label carried by one board cell.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    #[default]
    Empty,
    Snake,
    Food,
}

/// Square board of cell labels stored row-major.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridCells")]
pub struct Grid {
    size: u16,
    cells: Vec<Cell>,
}

#[derive(Deserialize)]
struct GridCells {
    size: u16,
    cells: Vec<Cell>,
}

impl TryFrom<GridCells> for Grid {
    type Error = StateError;

    fn try_from(raw: GridCells) -> Result<Self, Self::Error> {
        let expected = usize::from(raw.size) * usize::from(raw.size);
        if raw.size == 0 || raw.cells.len() != expected {
            return Err(StateError::CellCount {
                size: raw.size,
                expected,
                actual: raw.cells.len(),
            });
        }

        Ok(Self {
            size: raw.size,
            cells: raw.cells,
        })
    }
}

impl Grid {
    /// Creates an empty `size`×`size` grid with `occupied` labeled as snake.
    ///
    /// The caller places the food cell afterwards.
    #[must_use]
    pub fn new(size: u16, occupied: Position) -> Self {
        let mut grid = Self {
            size,
            cells: vec![Cell::Empty; usize::from(size) * usize::from(size)],
        };
        grid.set(occupied, Cell::Snake);
        grid
    }

    #[must_use]
    pub fn size(&self) -> u16 {
        self.size
    }

    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        position.is_within(self.size)
    }

    /// Returns the label at `position`.
    ///
    /// # Panics
    ///
    /// Panics when `position` is off the board. Callers bounds-check first.
    #[must_use]
    pub fn get(&self, position: Position) -> Cell {
        self.cells[self.index(position)]
    }

    /// Overwrites the label at `position`.
    ///
    /// # Panics
    ///
    /// Panics when `position` is off the board.
    pub fn set(&mut self, position: Position, cell: Cell) {
        let index = self.index(position);
        self.cells[index] = cell;
    }

    /// Returns the food cell, if one is on the board.
    #[must_use]
    pub fn food(&self) -> Option<Position> {
        self.cells
            .iter()
            .position(|cell| *cell == Cell::Food)
            .map(|index| self.position_of(index))
    }

    /// Counts cells carrying `cell`.
    #[must_use]
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|c| **c == cell).count()
    }

    /// Iterates rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(usize::from(self.size.max(1)))
    }

    /// Iterates every position carrying `cell`.
    pub fn positions_of(&self, cell: Cell) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, c)| **c == cell)
            .map(|(index, _)| self.position_of(index))
    }

    fn index(&self, position: Position) -> usize {
        assert!(
            self.contains(position),
            "grid access out of range: ({}, {}) on a {}x{} board",
            position.x,
            position.y,
            self.size,
            self.size,
        );
        // Both coordinates are non-negative and below `size` here.
        position.y as usize * usize::from(self.size) + position.x as usize
    }

    fn position_of(&self, index: usize) -> Position {
        let size = usize::from(self.size);
        // Indices never exceed u16::MAX², so each coordinate fits in i32.
        Position {
            x: (index % size) as i32,
            y: (index / size) as i32,
        }
    }
}
