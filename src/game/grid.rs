use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move cell by delta, saturating at the `i32` limits
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// The neighbouring cell one step in `direction`
    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// Fixed board geometry: a board measured in units, cut into square cells.
///
/// Immutable after construction. Partial cells at the right/bottom edge of
/// the board are not playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    cell_size: u32,
    width_cells: u32,
    height_cells: u32,
}

impl Grid {
    /// Largest side length in cells; every in-bounds coordinate fits in `i32`
    pub const MAX_SIDE: u32 = i32::MAX as u32;

    /// Build a grid from board dimensions in units.
    ///
    /// `cell_size` must be non-zero; `GameConfig::validate` checks this
    /// before any grid is built from user input.
    pub fn new(board_width: u32, board_height: u32, cell_size: u32) -> Self {
        assert!(cell_size > 0, "cell_size must be positive");
        Self {
            cell_size,
            width_cells: (board_width / cell_size).min(Self::MAX_SIDE),
            height_cells: (board_height / cell_size).min(Self::MAX_SIDE),
        }
    }

    /// Build a grid directly from a cell count, one unit per cell
    pub fn with_cells(width_cells: u32, height_cells: u32) -> Self {
        Self {
            cell_size: 1,
            width_cells: width_cells.min(Self::MAX_SIDE),
            height_cells: height_cells.min(Self::MAX_SIDE),
        }
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Board dimensions in cells as (width, height)
    pub fn cell_count(&self) -> (u32, u32) {
        (self.width_cells, self.height_cells)
    }

    /// Total number of playable cells
    pub fn area(&self) -> usize {
        self.width_cells as usize * self.height_cells as usize
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as i64) < self.width_cells as i64
            && (cell.y as i64) < self.height_cells as i64
    }

    /// Cell at the middle of the board (integer division)
    pub fn center(&self) -> Cell {
        Cell::new(
            (self.width_cells / 2) as i32,
            (self.height_cells / 2) as i32,
        )
    }

    /// The cell containing the given unit-space point, if it is playable
    pub fn cell_at(&self, unit_x: u32, unit_y: u32) -> Option<Cell> {
        let cell = Cell::new(
            i32::try_from(unit_x / self.cell_size).ok()?,
            i32::try_from(unit_y / self.cell_size).ok()?,
        );
        self.in_bounds(cell).then_some(cell)
    }

    /// Top-left corner of a cell in unit space
    pub fn origin_of(&self, cell: Cell) -> Option<(u32, u32)> {
        self.in_bounds(cell)
            .then(|| (cell.x as u32 * self.cell_size, cell.y as u32 * self.cell_size))
    }

    /// All playable cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height_cells as i32)
            .flat_map(move |y| (0..self.width_cells as i32).map(move |x| Cell::new(x, y)))
    }
}
