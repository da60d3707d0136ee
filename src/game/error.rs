use thiserror::Error;

use super::food::BoardFull;
use super::state::Phase;

/// Caller-contract violations and configuration faults.
///
/// Gameplay outcomes (crashes, a cleared board, ignored reversals) are not
/// errors; they are reported through `Phase` and `TickResult`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("cannot {action} while the game is {from:?}")]
    InvalidTransition { from: Phase, action: &'static str },

    #[error("invalid game configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    BoardFull(#[from] BoardFull),
}
