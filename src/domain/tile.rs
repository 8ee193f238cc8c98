/// Tile types and their capabilities.
/// Capabilities are queried via methods, not stored as flags,
/// so tile semantics are centralized here.
///
/// Tiles are plain values. "Moving" a tile means writing a fresh value
/// into the destination slot and `Air` into the source slot.

/// 24-bit display color, independent of any terminal backend.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }
}

pub const FLUX_COLOR: Rgb = Rgb::new(0xcc, 0xff, 0xcc);
pub const UNBREAKABLE_COLOR: Rgb = Rgb::new(0x99, 0x99, 0x99);
pub const STONE_COLOR: Rgb = Rgb::new(0x00, 0x00, 0xcc);
pub const BOX_COLOR: Rgb = Rgb::new(0x8b, 0x45, 0x13);
pub const PLAYER_COLOR: Rgb = Rgb::new(0xff, 0x00, 0x00);

/// Gravity sub-state of a Stone or Box.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FallState {
    Falling,
    Resting,
}

/// Key/Lock pairing shared by both tiles of a family.
///
/// A Key never carries its own color or lock logic; it points at the
/// same configuration as the Locks it opens, so a Key always matches
/// exactly one Lock family.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct KeyConfiguration {
    color: Rgb,
    first: bool,
}

pub const YELLOW_KEY: KeyConfiguration = KeyConfiguration {
    color: Rgb::new(0xff, 0xcc, 0x00),
    first: true,
};

pub const CYAN_KEY: KeyConfiguration = KeyConfiguration {
    color: Rgb::new(0x00, 0xcc, 0xff),
    first: false,
};

impl KeyConfiguration {
    pub fn color(self) -> Rgb {
        self.color
    }

    /// Family discriminator: `true` opens Lock1, `false` opens Lock2.
    pub fn is_first(self) -> bool {
        self.first
    }

    /// Removal predicate: does picking up this key clear `tile`?
    pub fn removes(self, tile: Tile) -> bool {
        if self.first { tile.is_lock1() } else { tile.is_lock2() }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Air,
    Flux,          // Walkable, eaten on entry
    Unbreakable,   // Wall
    Player,        // Marker for the single player cell
    Stone(FallState),
    Box(FallState),
    Key(KeyConfiguration),
    Lock(KeyConfiguration),
}

impl Tile {
    pub fn is_air(self) -> bool {
        matches!(self, Tile::Air)
    }

    pub fn is_player(self) -> bool {
        matches!(self, Tile::Player)
    }

    pub fn is_lock1(self) -> bool {
        matches!(self, Tile::Lock(conf) if conf.is_first())
    }

    pub fn is_lock2(self) -> bool {
        matches!(self, Tile::Lock(conf) if !conf.is_first())
    }

    /// Can the player walk into this cell (consuming whatever is there)?
    pub fn is_edible(self) -> bool {
        matches!(self, Tile::Air | Tile::Flux)
    }

    /// Subject to gravity and sideways pushes.
    pub fn is_pushable(self) -> bool {
        self.fall_state().is_some()
    }

    pub fn is_stony(self) -> bool {
        matches!(self, Tile::Stone(_))
    }

    pub fn is_boxy(self) -> bool {
        matches!(self, Tile::Box(_))
    }

    pub fn is_falling(self) -> bool {
        self.fall_state() == Some(FallState::Falling)
    }

    /// Gravity tag of a Stone/Box; `None` for everything gravity ignores.
    pub fn fall_state(self) -> Option<FallState> {
        match self {
            Tile::Stone(state) | Tile::Box(state) => Some(state),
            _ => None,
        }
    }

    /// Same tile with a new gravity tag. Non-falling tiles are returned as-is.
    pub fn with_fall_state(self, state: FallState) -> Tile {
        match self {
            Tile::Stone(_) => Tile::Stone(state),
            Tile::Box(_) => Tile::Box(state),
            other => other,
        }
    }

    /// Fill color for the renderer. Air and the player cell are never
    /// painted as generic tiles.
    pub fn color(self) -> Option<Rgb> {
        match self {
            Tile::Air | Tile::Player => None,
            Tile::Flux => Some(FLUX_COLOR),
            Tile::Unbreakable => Some(UNBREAKABLE_COLOR),
            Tile::Stone(_) => Some(STONE_COLOR),
            Tile::Box(_) => Some(BOX_COLOR),
            Tile::Key(conf) | Tile::Lock(conf) => Some(conf.color()),
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::Air
    }
}
