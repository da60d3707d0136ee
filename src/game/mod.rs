//! Core simulation for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The front end feeds it direction intents, calls `tick` on a timer and draws
//! whatever `snapshot` returns.

pub mod config;
pub mod direction;
pub mod error;
pub mod food;
pub mod grid;
pub mod snake;
pub mod snapshot;
pub mod state;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use error::GameError;
pub use food::{BoardFull, FoodSpawner};
pub use grid::{Cell, Grid};
pub use snake::SnakeBody;
pub use snapshot::RenderSnapshot;
pub use state::{EndReason, GameState, Phase, TickResult};
