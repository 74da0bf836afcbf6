//! Core error type.

use thiserror::Error;

/// Faults raised by the simulation core.
///
/// Expected outcomes (a rejected pop, an empty cell) are values of
/// [`PopOutcome`](crate::board::PopOutcome), not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("coordinate ({x}, {y}) is outside the {width}x{height} grid")]
    InvalidCoordinate {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}
