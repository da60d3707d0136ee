//! Grid Snake - a grid-based snake simulation with a terminal front end
//!
//! This library provides:
//! - The simulation core with no I/O (game module)
//! - A fixed-delay tick scheduler (clock module)
//! - Keyboard mapping, TUI rendering and session metrics
//! - The interactive mode tying them together (modes module)

pub mod clock;
pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
