use super::grid::Cell;
use super::state::{EndReason, Phase};

/// Everything a renderer needs to draw one frame.
///
/// Produced by `GameState::snapshot`; owns its data so the renderer never
/// borrows simulation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSnapshot {
    /// Snake cells, head first
    pub segments: Vec<Cell>,
    /// `None` only before the first start and after the board is cleared
    pub food: Option<Cell>,
    pub score: u32,
    pub speed_level: u32,
    pub phase: Phase,
    pub end_reason: Option<EndReason>,
}

impl RenderSnapshot {
    pub fn head(&self) -> Option<Cell> {
        self.segments.first().copied()
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
}
