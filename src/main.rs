//! Collapsetui — tile-collapse puzzle game in the terminal.

mod app;
mod input;
mod logging;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};
use collapsetui::GameConfig;
use std::path::PathBuf;
use std::time::Duration;

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        logging::init(path, args.log_level)?;
    }
    let theme = match theme::Theme::load(args.theme.as_deref(), args.palette) {
        Ok(theme) => theme,
        Err(e) => {
            log::warn!("theme not loaded, using defaults: {e}");
            theme::Theme::default()
        }
    };
    let config = args.game_config();
    let mut app = App::new(&args, config, theme)?;
    let result = app.run();
    logging::flush();
    result
}

/// Tile-collapse puzzle game in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "collapsetui",
    version,
    about = "Tile-collapse puzzle in the terminal. Pop groups of same-coloured tiles; the board falls and slides back to the centre.",
    long_about = "Collapsetui is a terminal tile-collapse puzzle.\n\n\
        Click a tile (or move the cursor onto it and press Space) to pop every touching tile of \
        the same colour. A group of n tiles scores 0 + 1 + ... + (n - 1). Tiles above fall, \
        columns slide toward the centre. Lone tiles can only be popped by spending power; \
        power is earned every few thousand points. Clear the board to reach the next level.\n\n\
        CONTROLS:\n  Mouse click       Pop    Arrows / hjkl  Move cursor   Space / Enter  Pop\n  P                 Pause  R              Restart       Q / Esc        Quit menu\n\n\
        Use --theme to load a btop-style theme (e.g. onedark.theme)."
)]
pub struct Args {
    /// Level-one board width in tiles.
    #[arg(long, default_value = "10", value_name = "COLS")]
    pub width: usize,

    /// Level-one board height in tiles.
    #[arg(long, default_value = "5", value_name = "ROWS")]
    pub height: usize,

    /// Board width never grows past this.
    #[arg(long, default_value = "40", value_name = "COLS")]
    pub max_width: usize,

    /// Board height never grows past this.
    #[arg(long, default_value = "20", value_name = "ROWS")]
    pub max_height: usize,

    /// Colours on level one (1-6).
    #[arg(short, long, default_value = "2", value_name = "N")]
    pub colors: u8,

    /// Maximum stored power.
    #[arg(long, default_value = "6", value_name = "N")]
    pub max_power: u32,

    /// Power at game start.
    #[arg(long, default_value = "3", value_name = "N")]
    pub starting_power: u32,

    /// Settled points per power gain.
    #[arg(long, default_value = "5000", value_name = "POINTS")]
    pub power_score: u32,

    /// Every N levels the board gains a colour and shrinks.
    #[arg(long, default_value = "5", value_name = "N")]
    pub difficulty_threshold: u32,

    /// Wait after an award before the score starts counting up.
    #[arg(long, default_value = "1000", value_name = "MS")]
    pub score_delay_ms: u64,

    /// Time per point while the score counts up.
    #[arg(long, default_value = "100", value_name = "MS")]
    pub score_speed_ms: u64,

    /// Incoming points needed at level end for the bonus.
    #[arg(long, default_value = "100", value_name = "POINTS")]
    pub bonus_requirement: u32,

    /// Level-end bonus as a multiple of the incoming points.
    #[arg(long, default_value = "1.0", value_name = "X")]
    pub bonus_multiplier: f64,

    /// Pause between a cleared board and the next level.
    #[arg(long, default_value = "2000", value_name = "MS")]
    pub level_delay_ms: u64,

    /// Time between gravity passes.
    #[arg(long, default_value = "200", value_name = "MS")]
    pub gravity_ms: u64,

    /// Time between centering passes.
    #[arg(long, default_value = "330", value_name = "MS")]
    pub centering_ms: u64,

    /// Wait before the first gravity and centering pass.
    #[arg(long, default_value = "500", value_name = "MS")]
    pub settle_delay_ms: u64,

    /// Colour RNG seed (random if not set; logged so a game can be replayed).
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Simulation ticks per second.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub tick_rate: f64,

    /// Target render frames per second.
    #[arg(long, default_value = "30.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Disable the pop flash/fade animation.
    #[arg(long)]
    pub no_animation: bool,

    /// Write log records to this file.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level for --log-file (error, warn, info, debug, trace).
    #[arg(long, default_value = "debug", value_name = "LEVEL")]
    pub log_level: log::LevelFilter,
}

impl Args {
    /// Core tuning from the command line; out-of-range values are clamped by the game.
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            board_width: self.width,
            board_height: self.height,
            max_board_width: self.max_width,
            max_board_height: self.max_height,
            unique_color_count: self.colors,
            max_power: self.max_power,
            starting_power: self.starting_power,
            score_requirement_per_power_gain: self.power_score,
            difficulty_increase_threshold: self.difficulty_threshold,
            score_update_delay: Duration::from_millis(self.score_delay_ms),
            score_update_speed: Duration::from_millis(self.score_speed_ms),
            post_level_bonus_requirement: self.bonus_requirement,
            level_end_bonus_multiplier: self.bonus_multiplier,
            new_level_start_delay: Duration::from_millis(self.level_delay_ms),
            gravity_interval: Duration::from_millis(self.gravity_ms),
            centering_interval: Duration::from_millis(self.centering_ms),
            settle_start_delay: Duration::from_millis(self.settle_delay_ms),
            seed: self.seed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_match_game_defaults() {
        let args = Args::parse_from(["collapsetui"]);
        assert_eq!(args.game_config(), GameConfig::default());
    }

    #[test]
    fn test_cli_overrides() {
        let args = Args::parse_from([
            "collapsetui",
            "--width",
            "6",
            "--colors",
            "4",
            "--seed",
            "7",
            "--gravity-ms",
            "50",
            "--palette",
            "colourblind",
        ]);
        let config = args.game_config();
        assert_eq!(config.board_width, 6);
        assert_eq!(config.unique_color_count, 4);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.gravity_interval, Duration::from_millis(50));
        assert_eq!(args.palette, Palette::Colorblind);
    }
}
