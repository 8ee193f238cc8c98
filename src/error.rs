/// Top-level error type for the binary.
///
/// Gameplay itself never fails: blocked moves and refused pushes are
/// no-ops. Only startup (level data), the terminal and replay parsing can.

use thiserror::Error;

use crate::sim::level::LevelError;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid level data: {0}")]
    Level(#[from] LevelError),
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
    #[error("bad replay character {ch:?} at position {pos}")]
    Replay { ch: char, pos: usize },
}
