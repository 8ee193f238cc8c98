/// Level decoding.
///
/// A level is a rectangular array of small integers, one per cell:
///
/// ```text
///   0 = Air          1 = Flux           2 = Unbreakable    3 = Player
///   4 = Stone        5 = Falling Stone  6 = Box            7 = Falling Box
///   8 = Key1         9 = Lock1         10 = Key2          11 = Lock2
/// ```
///
/// Decoding is all-or-nothing: an unknown code, a ragged row or a wrong
/// number of players rejects the whole level. Nothing defaults silently.

use thiserror::Error;

use crate::domain::entity::Player;
use crate::domain::tile::{FallState, Tile, CYAN_KEY, YELLOW_KEY};
use crate::sim::queue::{DrainOrder, InputQueue};
use crate::sim::world::WorldState;

/// The built-in level.
pub const SAMPLE_LEVEL: [[u8; 8]; 6] = [
    [2, 2, 2, 2, 2, 2, 2, 2],
    [2, 3, 0, 1, 1, 2, 0, 2],
    [2, 4, 2, 6, 1, 2, 0, 2],
    [2, 8, 4, 1, 1, 2, 0, 2],
    [2, 4, 1, 1, 1, 9, 0, 2],
    [2, 2, 2, 2, 2, 2, 2, 2],
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("level has no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged { row: usize, expected: usize, found: usize },
    #[error("unknown tile code {code} at ({x}, {y})")]
    UnknownTileCode { code: u8, x: usize, y: usize },
    #[error("level has no player")]
    MissingPlayer,
    #[error("level has {count} players, expected exactly one")]
    MultiplePlayers { count: usize },
}

/// Numeric tile codes as stored in level data.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum RawTile {
    Air = 0,
    Flux = 1,
    Unbreakable = 2,
    Player = 3,
    Stone = 4,
    FallingStone = 5,
    Box = 6,
    FallingBox = 7,
    Key1 = 8,
    Lock1 = 9,
    Key2 = 10,
    Lock2 = 11,
}

impl RawTile {
    pub fn from_code(code: u8) -> Option<RawTile> {
        let raw = match code {
            0 => RawTile::Air,
            1 => RawTile::Flux,
            2 => RawTile::Unbreakable,
            3 => RawTile::Player,
            4 => RawTile::Stone,
            5 => RawTile::FallingStone,
            6 => RawTile::Box,
            7 => RawTile::FallingBox,
            8 => RawTile::Key1,
            9 => RawTile::Lock1,
            10 => RawTile::Key2,
            11 => RawTile::Lock2,
            _ => return None,
        };
        Some(raw)
    }

    pub fn to_tile(self) -> Tile {
        match self {
            RawTile::Air => Tile::Air,
            RawTile::Flux => Tile::Flux,
            RawTile::Unbreakable => Tile::Unbreakable,
            RawTile::Player => Tile::Player,
            RawTile::Stone => Tile::Stone(FallState::Resting),
            RawTile::FallingStone => Tile::Stone(FallState::Falling),
            RawTile::Box => Tile::Box(FallState::Resting),
            RawTile::FallingBox => Tile::Box(FallState::Falling),
            RawTile::Key1 => Tile::Key(YELLOW_KEY),
            RawTile::Lock1 => Tile::Lock(YELLOW_KEY),
            RawTile::Key2 => Tile::Key(CYAN_KEY),
            RawTile::Lock2 => Tile::Lock(CYAN_KEY),
        }
    }
}

/// Decode one cell. (x, y) only feed the error message.
pub fn decode_tile(code: u8, x: usize, y: usize) -> Result<Tile, LevelError> {
    RawTile::from_code(code)
        .map(RawTile::to_tile)
        .ok_or(LevelError::UnknownTileCode { code, x, y })
}

/// Inverse of `decode_tile`, used for snapshots.
pub fn encode_tile(tile: Tile) -> u8 {
    let raw = match tile {
        Tile::Air => RawTile::Air,
        Tile::Flux => RawTile::Flux,
        Tile::Unbreakable => RawTile::Unbreakable,
        Tile::Player => RawTile::Player,
        Tile::Stone(FallState::Resting) => RawTile::Stone,
        Tile::Stone(FallState::Falling) => RawTile::FallingStone,
        Tile::Box(FallState::Resting) => RawTile::Box,
        Tile::Box(FallState::Falling) => RawTile::FallingBox,
        Tile::Key(conf) if conf.is_first() => RawTile::Key1,
        Tile::Key(_) => RawTile::Key2,
        Tile::Lock(conf) if conf.is_first() => RawTile::Lock1,
        Tile::Lock(_) => RawTile::Lock2,
    };
    raw as u8
}

/// Build a world from level data. The player position comes from the
/// single Player marker.
pub fn load_level<R: AsRef<[u8]>>(rows: &[R], order: DrainOrder) -> Result<WorldState, LevelError> {
    let width = match rows.first() {
        Some(row) if !row.as_ref().is_empty() => row.as_ref().len(),
        _ => return Err(LevelError::Empty),
    };

    let mut tiles = Vec::with_capacity(rows.len());
    let mut players = vec![];

    for (y, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        if row.len() != width {
            return Err(LevelError::Ragged { row: y, expected: width, found: row.len() });
        }
        let mut decoded = Vec::with_capacity(width);
        for (x, &code) in row.iter().enumerate() {
            let tile = decode_tile(code, x, y)?;
            if tile.is_player() {
                players.push(Player::new(x, y));
            }
            decoded.push(tile);
        }
        tiles.push(decoded);
    }

    let player = match players.as_slice() {
        [] => return Err(LevelError::MissingPlayer),
        [only] => *only,
        many => return Err(LevelError::MultiplePlayers { count: many.len() }),
    };

    log::info!("level loaded: {}x{}, player at ({}, {})", width, rows.len(), player.x, player.y);
    Ok(WorldState::new(tiles, player, InputQueue::new(order)))
}

/// Load the built-in level.
pub fn load_sample(order: DrainOrder) -> Result<WorldState, LevelError> {
    load_level(&SAMPLE_LEVEL, order)
}
