//! Simulation core for a tile-collapse puzzle.
//!
//! A rectangular board of coloured tiles; popping a group of same-coloured
//! neighbours removes it, tiles above fall, columns slide toward the centre,
//! and clearing the board starts a new, differently shaped level. The
//! [`Game`] type drives everything from explicit time deltas and reports
//! what happened as [`GameEvent`]s; the terminal front end lives in the binary.

pub mod board;
pub mod centering;
pub mod config;
pub mod error;
pub mod events;
pub mod game;
pub mod gravity;
pub mod grid;
pub mod level;
pub mod matching;
pub mod power;
pub mod sampler;
pub mod schedule;
pub mod score;
pub mod tile;

pub use board::{Board, PopOutcome, PopResult, RejectReason};
pub use config::GameConfig;
pub use error::CoreError;
pub use events::GameEvent;
pub use game::Game;
pub use grid::{Grid, TileMove};
pub use level::{LevelState, SizeLimits};
pub use power::PowerBudget;
pub use sampler::{ColorSampler, SeededSampler};
pub use score::ScoreLedger;
pub use tile::{ColorId, PALETTE_SIZE, Tile};
