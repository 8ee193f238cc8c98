/// Test helper: build tile rows from a string diagram.
///
/// Legend:
///   ' ' = Air        '.' = Flux       '#' = Unbreakable   'P' = Player
///   'o' = Stone      'O' = Falling Stone
///   'b' = Box        'B' = Falling Box
///   'k' = Key1       'K' = Lock1      'j' = Key2          'J' = Lock2

use super::tile::{FallState, Tile, CYAN_KEY, YELLOW_KEY};

pub fn tile_from_char(ch: char) -> Tile {
    match ch {
        '.' => Tile::Flux,
        '#' => Tile::Unbreakable,
        'P' => Tile::Player,
        'o' => Tile::Stone(FallState::Resting),
        'O' => Tile::Stone(FallState::Falling),
        'b' => Tile::Box(FallState::Resting),
        'B' => Tile::Box(FallState::Falling),
        'k' => Tile::Key(YELLOW_KEY),
        'K' => Tile::Lock(YELLOW_KEY),
        'j' => Tile::Key(CYAN_KEY),
        'J' => Tile::Lock(CYAN_KEY),
        _ => Tile::Air,
    }
}

pub fn tiles_from(rows: &[&str]) -> Vec<Vec<Tile>> {
    rows.iter()
        .map(|row| row.chars().map(tile_from_char).collect())
        .collect()
}
