/// WorldState: the complete state of a running game.
///
/// ## Grid ownership
///
/// `tiles` is the single owner of every cell. Shape is fixed at load.
/// Mutations go through `set_tile()`, `move_player()` and `remove()`;
/// each overwrites whole cells with fresh tile values.
///
/// ## Player invariant
///
/// Exactly one `Tile::Player` exists in `tiles`, at `(player.x, player.y)`.
/// `move_player()` is the only way the player moves, and it updates both
/// representations together.

use crate::domain::entity::Player;
use crate::domain::physics::GridView;
use crate::domain::tile::{Rgb, Tile, PLAYER_COLOR};
use crate::sim::level;
use crate::sim::queue::InputQueue;

#[derive(Clone, Debug)]
pub struct WorldState {
    pub tiles: Vec<Vec<Tile>>,
    pub width: usize,
    pub height: usize,
    pub player: Player,
    pub inputs: InputQueue,
    pub tick: u64,
}

// ── Construction ──

impl WorldState {
    /// Wrap a validated tile array. `level::load_level` is the checked entry point.
    pub fn new(tiles: Vec<Vec<Tile>>, player: Player, inputs: InputQueue) -> Self {
        let height = tiles.len();
        let width = tiles.first().map_or(0, |row| row.len());
        WorldState { tiles, width, height, player, inputs, tick: 0 }
    }
}

// ── Tile query / mutation API ──

impl WorldState {
    /// Read-only view for physics and rule queries.
    #[inline]
    pub fn view(&self) -> GridView<'_> {
        GridView { tiles: &self.tiles, width: self.width, height: self.height }
    }

    /// Tile at (x, y). Out of bounds = wall.
    #[inline]
    pub fn tile_at(&self, x: usize, y: usize) -> Tile {
        self.view().tile_at(x, y)
    }

    /// Overwrite one cell. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set_tile(&mut self, x: usize, y: usize, tile: Tile) {
        if x < self.width && y < self.height {
            self.tiles[y][x] = tile;
        }
    }

    /// Relocate the player: old cell becomes Air, new cell the Player marker.
    /// Call exactly once per accepted move, after its side effects.
    pub fn move_player(&mut self, new_x: usize, new_y: usize) {
        let (old_x, old_y) = (self.player.x, self.player.y);
        self.set_tile(old_x, old_y, Tile::Air);
        self.set_tile(new_x, new_y, Tile::Player);
        self.player = Player::new(new_x, new_y);
    }

    /// Replace every cell matching `pred` with Air. Returns how many were cleared.
    pub fn remove<F>(&mut self, pred: F) -> usize
    where
        F: Fn(Tile) -> bool,
    {
        let mut removed = 0;
        for row in &mut self.tiles {
            for cell in row.iter_mut() {
                if pred(*cell) {
                    *cell = Tile::Air;
                    removed += 1;
                }
            }
        }
        removed
    }

    /// Count of `Tile::Player` markers. 1 in any valid state.
    pub fn player_marker_count(&self) -> usize {
        self.tiles.iter().flatten().filter(|t| t.is_player()).count()
    }
}

// ── Render surface ──

impl WorldState {
    /// Fill color for (x, y). The player cell reports the player color;
    /// Air reports `None`.
    pub fn cell_color(&self, x: usize, y: usize) -> Option<Rgb> {
        if x == self.player.x && y == self.player.y {
            return Some(PLAYER_COLOR);
        }
        self.tile_at(x, y).color()
    }

    /// Numeric-code text dump, one row per line. Stable across runs,
    /// so equal snapshots mean equal grids.
    pub fn snapshot(&self) -> String {
        let mut out = String::with_capacity(self.width * self.height * 3);
        for row in &self.tiles {
            let line: Vec<String> = row.iter()
                .map(|t| level::encode_tile(*t).to_string())
                .collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }
}
