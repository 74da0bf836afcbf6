//! Tiles and colour identifiers.

/// Number of distinct tile colours the palette provides.
pub const PALETTE_SIZE: u8 = 6;

/// Opaque colour identifier, an index into the palette (0..PALETTE_SIZE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorId(pub u8);

impl ColorId {
    /// Palette index for presentation lookups.
    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }
}

/// One coloured cell on the board.
///
/// `x`/`y` always equal the grid cell holding the tile; only the grid's
/// move operations change them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub color: ColorId,
    pub x: usize,
    pub y: usize,
}

impl Tile {
    pub fn new(color: ColorId, x: usize, y: usize) -> Self {
        Self { color, x, y }
    }

    #[inline]
    pub fn pos(&self) -> (usize, usize) {
        (self.x, self.y)
    }
}
