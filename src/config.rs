//! Game tuning options.

use crate::level::{LevelState, SizeLimits};
use crate::tile::PALETTE_SIZE;
use std::time::Duration;

/// Every tuning option, with defaults for a 10x5 two-colour start.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub board_width: usize,
    pub board_height: usize,
    /// Level growth never exceeds these.
    pub max_board_width: usize,
    pub max_board_height: usize,
    pub unique_color_count: u8,
    pub max_power: u32,
    pub starting_power: u32,
    pub score_requirement_per_power_gain: u32,
    pub difficulty_increase_threshold: u32,
    pub score_update_delay: Duration,
    pub score_update_speed: Duration,
    pub post_level_bonus_requirement: u32,
    pub level_end_bonus_multiplier: f64,
    pub new_level_start_delay: Duration,
    pub gravity_interval: Duration,
    pub centering_interval: Duration,
    /// Wait before the first gravity / centering pass.
    pub settle_start_delay: Duration,
    /// Colour RNG seed; `None` picks one at random.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 10,
            board_height: 5,
            max_board_width: 40,
            max_board_height: 20,
            unique_color_count: 2,
            max_power: 6,
            starting_power: 3,
            score_requirement_per_power_gain: 5000,
            difficulty_increase_threshold: 5,
            score_update_delay: Duration::from_secs(1),
            score_update_speed: Duration::from_millis(100),
            post_level_bonus_requirement: 100,
            level_end_bonus_multiplier: 1.0,
            new_level_start_delay: Duration::from_secs(2),
            gravity_interval: Duration::from_millis(200),
            centering_interval: Duration::from_millis(330),
            settle_start_delay: Duration::from_millis(500),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Copy with out-of-range values clamped rather than rejected: colours
    /// capped to the palette, starting power to max power, zero divisors and
    /// zero intervals raised to their minimum, a negative or non-finite
    /// bonus multiplier dropped to 0.
    pub fn sanitized(&self) -> Self {
        let min_step = Duration::from_millis(1);
        let max_board_width = self.max_board_width.max(1);
        let max_board_height = self.max_board_height.max(1);
        Self {
            board_width: self.board_width.clamp(1, max_board_width),
            board_height: self.board_height.clamp(1, max_board_height),
            max_board_width,
            max_board_height,
            unique_color_count: self.unique_color_count.clamp(1, PALETTE_SIZE),
            starting_power: self.starting_power.min(self.max_power),
            score_requirement_per_power_gain: self.score_requirement_per_power_gain.max(1),
            difficulty_increase_threshold: self.difficulty_increase_threshold.max(1),
            score_update_speed: self.score_update_speed.max(min_step),
            level_end_bonus_multiplier: if self.level_end_bonus_multiplier.is_finite() {
                self.level_end_bonus_multiplier.max(0.0)
            } else {
                0.0
            },
            gravity_interval: self.gravity_interval.max(min_step),
            centering_interval: self.centering_interval.max(min_step),
            ..self.clone()
        }
    }

    /// Level-one shape.
    pub fn initial_level(&self) -> LevelState {
        LevelState::new(
            self.board_width,
            self.board_height,
            self.unique_color_count,
            self.difficulty_increase_threshold,
        )
    }

    pub fn size_limits(&self) -> SizeLimits {
        SizeLimits {
            max_width: self.max_board_width,
            max_height: self.max_board_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_already_sane() {
        let config = GameConfig::default();
        assert_eq!(config.sanitized(), config);
    }

    #[test]
    fn test_sanitized_clamps() {
        let config = GameConfig {
            unique_color_count: 40,
            starting_power: 10,
            max_power: 4,
            score_requirement_per_power_gain: 0,
            difficulty_increase_threshold: 0,
            level_end_bonus_multiplier: f64::NAN,
            board_width: 0,
            board_height: 99,
            score_update_speed: Duration::ZERO,
            ..GameConfig::default()
        }
        .sanitized();
        assert_eq!(config.unique_color_count, PALETTE_SIZE);
        assert_eq!(config.starting_power, 4);
        assert_eq!(config.score_requirement_per_power_gain, 1);
        assert_eq!(config.difficulty_increase_threshold, 1);
        assert_eq!(config.level_end_bonus_multiplier, 0.0);
        assert_eq!((config.board_width, config.board_height), (1, 20));
        assert_eq!(config.score_update_speed, Duration::from_millis(1));
    }
}
