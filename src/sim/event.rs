/// Events emitted during a simulation step.
/// The game loop logs these; tests use them to observe a tick.

use crate::domain::entity::MoveDir;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PlayerMoved { x: usize, y: usize },
    FluxEaten { x: usize, y: usize },
    KeyCollected { first: bool, locks_removed: usize },
    Pushed { from_x: usize, to_x: usize, y: usize },
    MoveBlocked { dir: MoveDir },
    TileFell { x: usize, y: usize },
    TileLanded { x: usize, y: usize },
}
