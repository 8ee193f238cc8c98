/// Movement rules, decided by the tile in the destination cell.
///
/// Pure functions operating on a grid view, no side effects.
/// These encode "what happens" without performing the action;
/// `sim::step` applies the outcome.
///
/// ## Movement Truth Table
///
/// ┌───────────────────┬──────────────┬──────────────────────────────┐
/// │ Destination tile   │ Horizontal   │ Vertical                     │
/// ├───────────────────┼──────────────┼──────────────────────────────┤
/// │ Air                │ Walk         │ Walk                         │
/// │ Flux               │ Walk (eaten) │ Walk (eaten)                 │
/// │ Unbreakable        │ Blocked      │ Blocked                      │
/// │ Lock               │ Blocked      │ Blocked                      │
/// │ Player             │ Blocked      │ Blocked                      │
/// │ Key                │ Unlock+Walk  │ Unlock+Walk                  │
/// │ Stone / Box        │ Push if legal│ Blocked (never pushed up/down)│
/// │ off the map        │ Blocked      │ Blocked                      │
/// └───────────────────┴──────────────┴──────────────────────────────┘
///
/// Push legality lives in `physics::can_push`.

use super::entity::{MoveDir, Player};
use super::physics::{self, GridView};
use super::tile::{KeyConfiguration, Tile};

/// What a single move request resolves to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    /// Nothing changes.
    Blocked,
    /// Player steps into `(x, y)`. `ate_flux` when the cell held Flux.
    Walk { x: usize, y: usize, ate_flux: bool },
    /// Remove every Lock of `key`'s family, then step into `(x, y)`.
    Unlock { x: usize, y: usize, key: KeyConfiguration },
    /// Place `tile` at `(to_x, y)`, then step into `(x, y)`.
    Push { x: usize, y: usize, to_x: usize, tile: Tile },
}

/// Resolve a move of `player` in `dir` against the current grid.
pub fn resolve_move(view: &GridView, player: Player, dir: MoveDir) -> MoveOutcome {
    let (x, y) = match player.offset(dir, 1) {
        Some(pos) => pos,
        None => return MoveOutcome::Blocked,
    };

    match view.tile_at(x, y) {
        tile if tile.is_edible() => MoveOutcome::Walk { x, y, ate_flux: !tile.is_air() },
        Tile::Key(key) => MoveOutcome::Unlock { x, y, key },
        tile if tile.is_pushable() => {
            if !dir.is_horizontal() {
                return MoveOutcome::Blocked;
            }
            let (dx, _) = dir.delta();
            if physics::can_push(view, x, y, dx) {
                let to_x = (x as i32 + dx) as usize;
                MoveOutcome::Push { x, y, to_x, tile }
            } else {
                MoveOutcome::Blocked
            }
        }
        _ => MoveOutcome::Blocked,
    }
}
