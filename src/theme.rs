//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use crate::Palette;
use collapsetui::{ColorId, PALETTE_SIZE};
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

const TILE_COUNT: usize = PALETTE_SIZE as usize;

/// Tile palette and UI colours loaded from a theme file.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Tile colours by palette index: green, yellow, red, blue, magenta, cyan.
    pub tiles: [Color; TILE_COUNT],
    /// Board background.
    pub bg: Color,
    /// Borders.
    pub div_line: Color,
    /// Text (score, level).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Secondary text: key hints, unused palette slots.
    pub inactive_fg: Color,
    /// Power counter at its maximum.
    pub power_full: Color,
    /// Power counter right after a gain.
    pub power_gain: Color,
    /// Power counter at zero and the denied-pop flash.
    pub power_empty: Color,
    /// Popped tiles flash this before fading out.
    pub flash: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

/// `0xRRGGBB` literal to a ratatui colour.
const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

const ONEDARK_TILES: [u32; TILE_COUNT] = [0x98C379, 0xE5C07B, 0xE06C75, 0x61AFEF, 0xC678DD, 0x56B6C2];
const HIGH_CONTRAST_TILES: [u32; TILE_COUNT] = [0x00FF00, 0xFFFF00, 0xFF0000, 0x0088FF, 0xFF00FF, 0x00FFFF];
// Avoids red/green pairs.
const COLORBLIND_TILES: [u32; TILE_COUNT] = [0x0077BB, 0xEE7733, 0x009988, 0xCC3311, 0xEE3377, 0xBBBB00];

impl Theme {
    /// One Dark defaults (hex values from onedark.theme).
    pub fn onedark_default() -> Self {
        Self {
            tiles: ONEDARK_TILES.map(rgb),
            bg: rgb(0x31353F),
            div_line: rgb(0x3F444F),
            main_fg: rgb(0xABB2BF),
            title: rgb(0xE5C07B),
            inactive_fg: rgb(0x5C6370),
            power_full: rgb(0xE5C07B),
            power_gain: rgb(0x98C379),
            power_empty: rgb(0xE06C75),
            flash: Color::White,
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to One Dark defaults if path is None or the file is missing.
    pub fn load(path: Option<&Path>, palette: Palette) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default_for_palette(palette)),
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        let mut theme = Self::from_map(&map);
        theme.apply_palette(palette);
        Ok(theme)
    }

    fn default_for_palette(palette: Palette) -> Self {
        let mut t = Self::onedark_default();
        t.apply_palette(palette);
        t
    }

    /// Override tile colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: Palette) {
        match palette {
            Palette::Normal => {}
            Palette::HighContrast => self.tiles = HIGH_CONTRAST_TILES.map(rgb),
            Palette::Colorblind => self.tiles = COLORBLIND_TILES.map(rgb),
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).and_then(|v| parse_hex(v).ok());
        let defaults = Self::onedark_default();
        let [green, yellow, red, blue, magenta, cyan] = defaults.tiles;
        Self {
            tiles: [
                get("mem_box").or_else(|| get("cpu_start")).unwrap_or(green),
                get("title").or_else(|| get("cpu_mid")).unwrap_or(yellow),
                get("cpu_end").or_else(|| get("temp_end")).unwrap_or(red),
                get("cpu_box").unwrap_or(blue),
                get("net_box").unwrap_or(magenta),
                get("hi_fg").or_else(|| get("proc_misc")).unwrap_or(cyan),
            ],
            bg: get("meter_bg").unwrap_or(defaults.bg),
            div_line: get("div_line").unwrap_or(defaults.div_line),
            main_fg: get("main_fg").unwrap_or(defaults.main_fg),
            title: get("title").unwrap_or(defaults.title),
            inactive_fg: get("inactive_fg").unwrap_or(defaults.inactive_fg),
            power_full: get("cpu_mid").unwrap_or(defaults.power_full),
            power_gain: get("cpu_start").unwrap_or(defaults.power_gain),
            power_empty: get("cpu_end").unwrap_or(defaults.power_empty),
            flash: get("selected_fg").unwrap_or(defaults.flash),
        }
    }

    /// Colour for a tile's palette index.
    #[inline]
    pub fn tile_color(&self, color: ColorId) -> Color {
        self.tiles[usize::from(color.index()) % TILE_COUNT]
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
    if !s.is_ascii() {
        return Err(invalid());
    }
    match s.len() {
        6 => Ok(Color::Rgb(channel(&s[0..2])?, channel(&s[2..4])?, channel(&s[4..6])?)),
        3 => Ok(Color::Rgb(
            channel(&s[0..1])? * 17,
            channel(&s[1..2])? * 17,
            channel(&s[2..3])? * 17,
        )),
        _ => Err(invalid()),
    }
}
