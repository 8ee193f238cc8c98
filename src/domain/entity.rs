/// Entities: the player and the directional commands that move it.

/// One directional command. No payload beyond the direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Left,
    Right,
    Up,
    Down,
}

impl MoveDir {
    /// Grid displacement `(dx, dy)`; y grows downward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            MoveDir::Left => (-1, 0),
            MoveDir::Right => (1, 0),
            MoveDir::Up => (0, -1),
            MoveDir::Down => (0, 1),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, MoveDir::Left | MoveDir::Right)
    }

    /// Single-letter form used by replays and snapshots.
    pub fn from_letter(c: char) -> Option<MoveDir> {
        match c.to_ascii_uppercase() {
            'L' => Some(MoveDir::Left),
            'R' => Some(MoveDir::Right),
            'U' => Some(MoveDir::Up),
            'D' => Some(MoveDir::Down),
            _ => None,
        }
    }
}

/// Player position. Mirrors the single `Tile::Player` marker in the grid;
/// both are updated together by `WorldState::move_player`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Player {
    pub x: usize,
    pub y: usize,
}

impl Player {
    pub fn new(x: usize, y: usize) -> Self {
        Player { x, y }
    }

    /// Neighbor cell `steps` cells away in `dir`, or `None` past the
    /// top/left edge.
    pub fn offset(self, dir: MoveDir, steps: i32) -> Option<(usize, usize)> {
        let (dx, dy) = dir.delta();
        let x = self.x as i32 + dx * steps;
        let y = self.y as i32 + dy * steps;
        if x < 0 || y < 0 {
            return None;
        }
        Some((x as usize, y as usize))
    }
}
