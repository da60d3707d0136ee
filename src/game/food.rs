use std::collections::HashSet;

use rand::Rng;
use thiserror::Error;

use super::grid::{Cell, Grid};

/// Every cell on the board is taken, so there is nowhere to put food
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no free cell left on the board")]
pub struct BoardFull;

/// Picks a uniformly random free cell for the next food item
#[derive(Debug, Default, Clone, Copy)]
pub struct FoodSpawner;

impl FoodSpawner {
    pub fn new() -> Self {
        Self
    }

    /// Place food on a random in-bounds cell not in `occupied`.
    ///
    /// Sparse boards use rejection sampling. Once the snake covers half the
    /// board the free cells are enumerated instead, so the cost stays bounded
    /// by the board area no matter how full it gets.
    pub fn place<R: Rng>(
        &self,
        grid: &Grid,
        occupied: &HashSet<Cell>,
        rng: &mut R,
    ) -> Result<Cell, BoardFull> {
        let area = grid.area();
        if occupied.len() >= area {
            return Err(BoardFull);
        }

        let (width, height) = grid.cell_count();

        if occupied.len() * 2 < area {
            loop {
                let x = rng.random_range(0..width) as i32;
                let y = rng.random_range(0..height) as i32;
                let cell = Cell::new(x, y);

                if !occupied.contains(&cell) {
                    return Ok(cell);
                }
            }
        }

        let free: Vec<Cell> = grid.cells().filter(|c| !occupied.contains(c)).collect();
        if free.is_empty() {
            return Err(BoardFull);
        }
        Ok(free[rng.random_range(0..free.len())])
    }
}
