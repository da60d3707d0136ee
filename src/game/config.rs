use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::GameError;
use super::grid::Grid;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the board in units
    pub board_width: u32,
    /// Height of the board in units
    pub board_height: u32,
    /// Side length of one cell in units
    pub cell_size: u32,

    // Speed progression
    /// Tick interval after start or restart
    pub base_interval_ms: u64,
    /// Amount the interval shrinks at each speed-up
    pub interval_step_ms: u64,
    /// The interval never drops below this
    pub interval_floor_ms: u64,
    /// A speed-up happens each time the score reaches a multiple of this
    pub speedup_every: u32,

    /// Initial state of the grid overlay (presentation only)
    pub show_grid: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 200,
            board_height: 200,
            cell_size: 10,
            base_interval_ms: 100,
            interval_step_ms: 10,
            interval_floor_ms: 20,
            speedup_every: 5,
            show_grid: true,
        }
    }
}

impl GameConfig {
    /// Largest accepted board side, in cells
    pub const MAX_CELLS_PER_SIDE: u32 = 1000;

    /// Create a new configuration with a custom board size in units
    pub fn new(board_width: u32, board_height: u32) -> Self {
        Self {
            board_width,
            board_height,
            ..Default::default()
        }
    }

    /// Create a small board for testing
    pub fn small() -> Self {
        Self::new(100, 100)
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Board geometry derived from this configuration
    pub fn grid(&self) -> Grid {
        Grid::new(self.board_width, self.board_height, self.cell_size)
    }

    /// Display speed level for a tick interval.
    ///
    /// Level 1 at the base interval, one more per step; with the defaults
    /// this is `11 - interval / 10`.
    pub fn speed_level(&self, interval_ms: u64) -> u32 {
        let step = self.interval_step_ms.max(1);
        (self.base_interval_ms / step + 1).saturating_sub(interval_ms / step) as u32
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), GameError> {
        if self.cell_size == 0 {
            return Err(GameError::InvalidConfig(
                "cell_size must be at least 1".to_string(),
            ));
        }

        let (width, height) = self.grid().cell_count();
        if width == 0 || height == 0 {
            return Err(GameError::InvalidConfig(format!(
                "board {}x{} is smaller than one cell of size {}",
                self.board_width, self.board_height, self.cell_size
            )));
        }

        if width > Self::MAX_CELLS_PER_SIDE || height > Self::MAX_CELLS_PER_SIDE {
            return Err(GameError::InvalidConfig(format!(
                "board of {}x{} cells exceeds the {} cell limit per side",
                width,
                height,
                Self::MAX_CELLS_PER_SIDE
            )));
        }

        if (width as u64) * (height as u64) < 2 {
            return Err(GameError::InvalidConfig(
                "board must hold at least 2 cells".to_string(),
            ));
        }

        if self.base_interval_ms == 0 {
            return Err(GameError::InvalidConfig(
                "base_interval_ms must be positive".to_string(),
            ));
        }

        if self.interval_step_ms == 0 {
            return Err(GameError::InvalidConfig(
                "interval_step_ms must be positive".to_string(),
            ));
        }

        if self.interval_floor_ms == 0 || self.interval_floor_ms > self.base_interval_ms {
            return Err(GameError::InvalidConfig(format!(
                "interval_floor_ms must be in [1, {}], got {}",
                self.base_interval_ms, self.interval_floor_ms
            )));
        }

        if self.speedup_every == 0 {
            return Err(GameError::InvalidConfig(
                "speedup_every must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
