//! Events the simulation emits for the presentation layer.
//!
//! The core never touches presentation state; it queues these and the host
//! drains them (see [`Game::drain_events`](crate::game::Game::drain_events)).

use crate::tile::{ColorId, Tile};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A fresh board was generated.
    BoardFilled { width: usize, height: usize, colors: u8 },
    /// A tile was popped; despawn it.
    TileRemoved(Tile),
    /// A tile slid one cell (gravity or centering).
    TileMoved {
        color: ColorId,
        from: (usize, usize),
        to: (usize, usize),
    },
    ScoreChanged { settled: u32, incoming: u32 },
    PowerChanged { current: u32, max: u32 },
    /// A matchless tile was clicked with no power left.
    PowerDenied,
    /// The board was cleared; `bonus` is `Some` when the end-of-level bonus applied.
    LevelCompleted { bonus: Option<u32> },
    LevelChanged {
        level: u32,
        width: usize,
        height: usize,
        colors: u8,
    },
    GameOver,
}
