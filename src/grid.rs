//! Grid: dense `width x height` store of optional tiles.
//!
//! Row 0 is the top; y grows downward, the direction tiles fall.
//! Cells are kept in a flat row-major `Vec` (index `y * width + x`), so every
//! lookup is an index computation and removal or movement never chases references.

use crate::error::CoreError;
use crate::sampler::ColorSampler;
use crate::tile::{ColorId, PALETTE_SIZE, Tile};

/// Up, down, left, right.
const NEIGHBOURS_4: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// A single-cell move performed by a resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileMove {
    pub color: ColorId,
    pub from: (usize, usize),
    pub to: (usize, usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Option<Tile>>,
}

impl Grid {
    /// Empty grid. Dimensions are clamped to at least 1.
    pub fn new(width: usize, height: usize) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Build a grid from text rows, top row first: `'a'..='f'` are colours 0..=5,
    /// anything else is an empty cell. Short rows are padded with empty cells.
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(1);
        let mut grid = Self::new(width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if let Some(color) = color_from_char(ch) {
                    let idx = y * grid.width + x;
                    grid.cells[idx] = Some(Tile::new(color, x, y));
                }
            }
        }
        grid
    }

    /// Inverse of [`Grid::from_rows`]; empty cells render as `'.'`.
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width)
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map_or('.', |t| char_from_color(t.color)))
                    .collect()
            })
            .collect()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        self.contains(x, y).then(|| y * self.width + x)
    }

    fn checked_index(&self, x: usize, y: usize) -> Result<usize, CoreError> {
        self.index(x, y).ok_or(CoreError::InvalidCoordinate {
            x,
            y,
            width: self.width,
            height: self.height,
        })
    }

    /// Cell contents at (x, y); out-of-bounds is an error.
    pub fn get(&self, x: usize, y: usize) -> Result<Option<&Tile>, CoreError> {
        let idx = self.checked_index(x, y)?;
        Ok(self.cells[idx].as_ref())
    }

    /// Tile at (x, y), or `None` for empty or out-of-bounds cells.
    #[inline]
    pub fn tile(&self, x: usize, y: usize) -> Option<&Tile> {
        self.index(x, y).and_then(|idx| self.cells[idx].as_ref())
    }

    #[inline]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.tile(x, y).is_some()
    }

    /// Remove and return the tile at (x, y).
    pub fn take(&mut self, x: usize, y: usize) -> Result<Option<Tile>, CoreError> {
        let idx = self.checked_index(x, y)?;
        Ok(self.cells[idx].take())
    }

    /// Assign every cell a fresh tile, colours drawn from the first
    /// `unique_colors` palette entries (clamped to the palette), top row first.
    pub fn fill(&mut self, unique_colors: u8, sampler: &mut dyn ColorSampler) {
        let unique_colors = unique_colors.clamp(1, PALETTE_SIZE);
        for y in 0..self.height {
            for x in 0..self.width {
                let color = sampler.sample(unique_colors);
                self.cells[y * self.width + x] = Some(Tile::new(color, x, y));
            }
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// True iff no cell holds a tile.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// All live tiles, row-major from the top.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().filter_map(Option::as_ref)
    }

    /// In-bounds orthogonal neighbours of (x, y): up, down, left, right. Never wraps.
    pub fn neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        NEIGHBOURS_4.into_iter().filter_map(move |(dx, dy)| {
            let nx = x.checked_add_signed(dx)?;
            let ny = y.checked_add_signed(dy)?;
            self.contains(nx, ny).then_some((nx, ny))
        })
    }

    /// Move the tile at `from` into the empty cell `to`, keeping its stored
    /// coordinates in step. No-op unless `from` is occupied and `to` is empty.
    pub(crate) fn shift(&mut self, from: (usize, usize), to: (usize, usize)) -> Option<TileMove> {
        let src = self.index(from.0, from.1)?;
        let dst = self.index(to.0, to.1)?;
        if self.cells[dst].is_some() {
            return None;
        }
        let mut tile = self.cells[src].take()?;
        tile.x = to.0;
        tile.y = to.1;
        self.cells[dst] = Some(tile);
        Some(TileMove {
            color: tile.color,
            from,
            to,
        })
    }

    /// Every live tile's stored coordinates match its cell.
    pub fn coordinates_consistent(&self) -> bool {
        self.cells.iter().enumerate().all(|(idx, cell)| {
            cell.is_none_or(|t| t.x == idx % self.width && t.y == idx / self.width)
        })
    }
}

fn color_from_char(ch: char) -> Option<ColorId> {
    let offset = (ch as u32).checked_sub('a' as u32)?;
    (offset < u32::from(PALETTE_SIZE)).then(|| ColorId(offset as u8))
}

fn char_from_color(color: ColorId) -> char {
    char::from(b'a' + color.index())
}
