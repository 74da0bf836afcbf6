//! Level progression: board size and colour count per level.

/// Level counter plus the board shape it implies.
///
/// Dimensions are recomputed by [`LevelState::advance`] only; nothing else sets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelState {
    pub level: u32,
    pub width: usize,
    pub height: usize,
    pub unique_color_count: u8,
    /// Every this-many levels the board gains a colour and shrinks.
    pub difficulty_threshold: u32,
}

/// Upper bounds for level growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimits {
    pub max_width: usize,
    pub max_height: usize,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            max_width: usize::MAX,
            max_height: usize::MAX,
        }
    }
}

impl LevelState {
    pub fn new(width: usize, height: usize, unique_color_count: u8, difficulty_threshold: u32) -> Self {
        Self {
            level: 1,
            width: width.max(1),
            height: height.max(1),
            unique_color_count: unique_color_count.max(1),
            difficulty_threshold: difficulty_threshold.max(1),
        }
    }

    /// Whether moving to the next level raises the difficulty.
    pub fn difficulty_increases(&self, palette_size: u8) -> bool {
        self.unique_color_count < palette_size
            && (self.level + 1) % self.difficulty_threshold.max(1) == 0
    }

    /// Step to the next level.
    ///
    /// On a difficulty step one colour is added and the board shrinks:
    /// the longer axis by 1, the shorter one by `longer / shorter`. Otherwise
    /// the board grows by the inverse rule. Square boards keep their size.
    /// Both axes stay within `1..=limit`. Returns true on a difficulty step.
    pub fn advance(&mut self, palette_size: u8, limits: SizeLimits) -> bool {
        let harder = self.difficulty_increases(palette_size);
        if harder {
            self.unique_color_count += 1;
        }
        self.resize(!harder, limits);
        self.level += 1;
        harder
    }

    fn resize(&mut self, grow: bool, limits: SizeLimits) {
        let (w, h) = (self.width, self.height);
        if w == h {
            return;
        }
        let (longer, shorter) = (w.max(h), w.min(h));
        let ratio = longer / shorter;
        let (longer, shorter) = if grow {
            (longer + 1, shorter + ratio)
        } else {
            (longer.saturating_sub(1), shorter.saturating_sub(ratio))
        };
        let (new_w, new_h) = if w > h { (longer, shorter) } else { (shorter, longer) };
        self.width = new_w.clamp(1, limits.max_width.max(1));
        self.height = new_h.clamp(1, limits.max_height.max(1));
    }
}
