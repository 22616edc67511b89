//! Bordered tile storage.
//!
//! A `Grid` of height H and width W stores `(H + 2) * (W + 2)` tiles: the
//! playable area at x in `1..=W`, y in `1..=H`, surrounded by one ring of
//! permanently blocked padding. The padding lets a slide stop at the edge
//! without any bounds checks.
//!
//! Every buffer the engine needs (live board, reset snapshot, solver and
//! augmentation scratch) is its own `Grid` value, owned by whoever uses it.

/// State of a single tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Not yet lit. Every playable tile starts here.
    #[default]
    Off,
    /// Lit by the player.
    On,
    /// Does not take part in the game.
    Blocked,
}

impl Tile {
    /// Character used when printing boards.
    pub const fn symbol(self) -> char {
        match self {
            Tile::Off => 'O',
            Tile::On => 'X',
            Tile::Blocked => '#',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    height: usize,
    width: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Creates a grid with an all-`Off` interior and a blocked border.
    pub fn new(height: usize, width: usize) -> Self {
        assert!(height > 0 && width > 0, "grid dimensions must be positive");

        let mut grid = Self {
            height,
            width,
            tiles: vec![Tile::Off; (height + 2) * (width + 2)],
        };
        for x in 0..width + 2 {
            let top = grid.index(x, 0);
            let bottom = grid.index(x, height + 1);
            grid.tiles[top] = Tile::Blocked;
            grid.tiles[bottom] = Tile::Blocked;
        }
        for y in 1..=height {
            let left = grid.index(0, y);
            let right = grid.index(width + 1, y);
            grid.tiles[left] = Tile::Blocked;
            grid.tiles[right] = Tile::Blocked;
        }
        grid
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Converts (x, y) to a raw index. Row-major with a stride of `width + 2`.
    #[inline(always)]
    pub(crate) fn index(&self, x: usize, y: usize) -> usize {
        x + (self.width + 2) * y
    }

    /// True if (x, y) is a playable coordinate.
    #[inline]
    pub fn in_range(&self, x: usize, y: usize) -> bool {
        (1..=self.width).contains(&x) && (1..=self.height).contains(&y)
    }

    /// Reads a tile. Border coordinates (0 and H+1 / W+1) are allowed.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Tile {
        self.tiles[self.index(x, y)]
    }

    /// Writes an interior tile.
    #[inline]
    pub(crate) fn set(&mut self, x: usize, y: usize, tile: Tile) {
        debug_assert!(self.in_range(x, y), "border tile ({x}, {y}) is read-only");
        let index = self.index(x, y);
        self.tiles[index] = tile;
    }

    /// Overwrites this buffer with the contents of another of the same shape.
    pub fn copy_from(&mut self, other: &Grid) {
        assert_eq!(
            (self.height, self.width),
            (other.height, other.width),
            "buffers must share a shape"
        );
        self.tiles.copy_from_slice(&other.tiles);
    }

    /// Counts tiles in the given state across the whole bordered buffer.
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// Scans the whole bordered buffer, border included, for a tile state.
    pub fn contains(&self, tile: Tile) -> bool {
        self.tiles.contains(&tile)
    }

    /// Raw tiles in buffer order, border included.
    pub(crate) fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }
}
