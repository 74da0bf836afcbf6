//! Vertical settling: tiles fall into empty cells below them, one row per pass.

use crate::grid::{Grid, TileMove};

/// One gravity pass. Scans from the bottom row up to row 1; wherever a cell
/// is empty and the cell above it holds a tile, that tile drops one row.
///
/// A tile moves at most one row per pass, so a whole floating column sinks
/// together and full settling takes as many passes as the deepest gap.
pub fn settle_step(grid: &mut Grid) -> Vec<TileMove> {
    let mut moves = Vec::new();
    for y in (1..grid.height()).rev() {
        for x in 0..grid.width() {
            if grid.is_occupied(x, y) || !grid.is_occupied(x, y - 1) {
                continue;
            }
            if let Some(mv) = grid.shift((x, y - 1), (x, y)) {
                moves.push(mv);
            }
        }
    }
    moves
}

/// True iff no column has a tile directly above an empty cell.
pub fn is_vertically_settled(grid: &Grid) -> bool {
    (0..grid.width()).all(|x| is_column_grounded(grid, x))
}

fn is_column_grounded(grid: &Grid, x: usize) -> bool {
    (0..grid.height().saturating_sub(1)).all(|y| !(grid.is_occupied(x, y) && !grid.is_occupied(x, y + 1)))
}
