//! Board controller: owns the grid and level shape, performs pops, runs the
//! settling passes and answers the idle / terminal queries.

use crate::centering;
use crate::error::CoreError;
use crate::gravity;
use crate::grid::{Grid, TileMove};
use crate::level::{LevelState, SizeLimits};
use crate::matching;
use crate::power::PowerBudget;
use crate::sampler::ColorSampler;
use crate::tile::{PALETTE_SIZE, Tile};

/// A successful pop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopResult {
    /// Origin first.
    pub removed_tiles: Vec<Tile>,
    pub points_awarded: u32,
    /// The group was a single tile, removed by spending power.
    pub used_power: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Lone tile and no power left.
    NoPower,
    /// Nothing at that cell.
    EmptyCell,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopOutcome {
    Removed(PopResult),
    Rejected(RejectReason),
}

impl PopOutcome {
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed(_))
    }

    pub fn removed(&self) -> Option<&PopResult> {
        match self {
            Self::Removed(result) => Some(result),
            Self::Rejected(_) => None,
        }
    }
}

/// Points for popping a group of `n` tiles: 0 + 1 + ... + (n - 1).
pub fn group_points(n: usize) -> u32 {
    let n = n as u64;
    (n * n.saturating_sub(1) / 2).min(u64::from(u32::MAX)) as u32
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: Grid,
    level: LevelState,
    limits: SizeLimits,
}

impl Board {
    /// Empty board shaped by `level`; the colour count is capped to the palette.
    pub fn new(mut level: LevelState, limits: SizeLimits) -> Self {
        level.unique_color_count = level.unique_color_count.clamp(1, PALETTE_SIZE);
        level.width = level.width.clamp(1, limits.max_width.max(1));
        level.height = level.height.clamp(1, limits.max_height.max(1));
        Self {
            grid: Grid::new(level.width, level.height),
            level,
            limits,
        }
    }

    /// Board around a prepared grid (fixed layouts, replays, tests).
    pub fn from_grid(grid: Grid, unique_color_count: u8, difficulty_threshold: u32) -> Self {
        let level = LevelState::new(
            grid.width(),
            grid.height(),
            unique_color_count.clamp(1, PALETTE_SIZE),
            difficulty_threshold,
        );
        Self {
            grid,
            level,
            limits: SizeLimits::default(),
        }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn level(&self) -> &LevelState {
        &self.level
    }

    /// Regenerate the board at the current level's size, every cell coloured
    /// from the level's first `unique_color_count` palette entries.
    pub fn refill(&mut self, sampler: &mut dyn ColorSampler) {
        let LevelState {
            width,
            height,
            unique_color_count,
            ..
        } = self.level;
        self.grid = Grid::new(width, height);
        self.grid.fill(unique_color_count, sampler);
    }

    /// Pop the group containing (x, y).
    ///
    /// Groups of two or more always succeed. A lone tile needs one unit of
    /// power; without it the pop is rejected and nothing changes. Points are
    /// the triangular number `n(n-1)/2`, so a powered single pop scores 0.
    pub fn request_pop(&mut self, x: usize, y: usize, power: &mut PowerBudget) -> Result<PopOutcome, CoreError> {
        let group = matching::find_group(&self.grid, x, y)?;
        if group.is_empty() {
            return Ok(PopOutcome::Rejected(RejectReason::EmptyCell));
        }

        let used_power = group.len() == 1;
        if used_power && !power.try_use() {
            log::debug!("pop at ({x}, {y}) rejected: lone tile, no power");
            return Ok(PopOutcome::Rejected(RejectReason::NoPower));
        }

        let points_awarded = group_points(group.len());
        for tile in &group {
            self.grid.take(tile.x, tile.y)?;
        }
        log::debug!(
            "popped {} tile(s) at ({x}, {y}) for {points_awarded} point(s){}",
            group.len(),
            if used_power { " using power" } else { "" }
        );
        Ok(PopOutcome::Removed(PopResult {
            removed_tiles: group,
            points_awarded,
            used_power,
        }))
    }

    /// One gravity pass.
    pub fn tick_gravity(&mut self) -> Vec<TileMove> {
        if self.grid.is_empty() {
            return Vec::new();
        }
        let moves = gravity::settle_step(&mut self.grid);
        if !moves.is_empty() {
            log::trace!("gravity pass moved {} tile(s)", moves.len());
        }
        moves
    }

    /// One centering pass; skipped entirely while tiles are still falling.
    pub fn tick_centering(&mut self) -> Vec<TileMove> {
        if self.grid.is_empty() || !self.is_vertically_settled() {
            return Vec::new();
        }
        let moves = centering::center_step(&mut self.grid);
        if !moves.is_empty() {
            log::trace!("centering pass moved {} tile(s)", moves.len());
        }
        moves
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    pub fn is_vertically_settled(&self) -> bool {
        gravity::is_vertically_settled(&self.grid)
    }

    pub fn is_horizontally_settled(&self) -> bool {
        centering::is_horizontally_settled(&self.grid)
    }

    /// Nothing would move on further gravity or centering passes.
    pub fn is_idle(&self) -> bool {
        self.is_vertically_settled() && self.is_horizontally_settled()
    }

    pub fn has_match_available(&self) -> bool {
        matching::has_match_available(&self.grid)
    }

    /// Advance the level shape (see [`LevelState::advance`]) and refill.
    /// Returns true when the difficulty went up.
    pub fn start_next_level(&mut self, sampler: &mut dyn ColorSampler) -> bool {
        let harder = self.level.advance(PALETTE_SIZE, self.limits);
        self.refill(sampler);
        log::debug!(
            "level {}: {}x{} board, {} colour(s){}",
            self.level.level,
            self.level.width,
            self.level.height,
            self.level.unique_color_count,
            if harder { ", difficulty up" } else { "" }
        );
        harder
    }

    /// Swap in a new level shape (game restart) and refill.
    pub fn reset_level(&mut self, level: LevelState, sampler: &mut dyn ColorSampler) {
        *self = Self::new(level, self.limits);
        self.refill(sampler);
    }
}
