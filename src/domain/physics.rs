/// Gravity layer: the Falling/Resting state machine for Stones and Boxes.
///
/// ## Classification
///
/// The tag is re-derived from the grid every tick, before acting on it:
///
/// ┌──────────────────────────┬──────────┐
/// │ Cell directly below       │ State    │
/// ├──────────────────────────┼──────────┤
/// │ Air                       │ Falling  │
/// │ anything else / map edge  │ Resting  │
/// └──────────────────────────┴──────────┘
///
/// A Falling tile drops exactly one cell per tick. A Resting tile may be
/// pushed sideways by the player.
///
/// ## Push rule
///
/// Pushing the tile at (x, y) by dx succeeds iff ALL of:
///   - the tile is tagged Resting
///   - the cell below the tile is not Air right now (a tile about to fall
///     cannot be pushed, even if it still carries last tick's Resting tag)
///   - (x+dx, y) is Air                 (two steps from the player)
///   - (x+dx, y+1) is not Air           (the tile lands on solid ground)
///
/// The last condition looks below the destination, not below the tile's
/// current cell, so a stone can't be shoved off a ledge to drop on the
/// next sweep.

use super::tile::{FallState, Tile};

/// Immutable view of the tile array for physics and rule queries.
pub struct GridView<'a> {
    pub tiles: &'a [Vec<Tile>],
    pub width: usize,
    pub height: usize,
}

impl<'a> GridView<'a> {
    /// Out of bounds reads as a wall, so the map edge behaves like a border.
    #[inline]
    pub fn tile_at(&self, x: usize, y: usize) -> Tile {
        if x < self.width && y < self.height {
            self.tiles[y][x]
        } else {
            Tile::Unbreakable
        }
    }

    #[inline]
    pub fn is_air(&self, x: usize, y: usize) -> bool {
        self.tile_at(x, y).is_air()
    }
}

/// Classify a falling-capable tile by what sits beneath it.
#[inline]
pub fn classify(below: Tile) -> FallState {
    if below.is_air() { FallState::Falling } else { FallState::Resting }
}

/// Lookahead classification for the cell at (x, y).
#[inline]
pub fn fall_state_at(view: &GridView, x: usize, y: usize) -> FallState {
    classify(view.tile_at(x, y + 1))
}

/// Can the Stone/Box at (x, y) be pushed one cell by `dx` (±1)?
pub fn can_push(view: &GridView, x: usize, y: usize, dx: i32) -> bool {
    let tile = view.tile_at(x, y);
    if !tile.is_pushable() || tile.is_falling() {
        return false;
    }
    if fall_state_at(view, x, y) == FallState::Falling {
        return false;
    }

    let tx = x as i32 + dx;
    if tx < 0 {
        return false;
    }
    let tx = tx as usize;
    view.is_air(tx, y) && !view.is_air(tx, y + 1)
}
