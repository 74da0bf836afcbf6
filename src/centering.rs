//! Horizontal settling: pull tiles toward the two centre columns so no group
//! is cut off from the middle of the board by empty floor cells.

use crate::grid::{Grid, TileMove};

/// One centering pass; call only while the board is vertically settled.
///
/// Left half (columns `width/2` down to 1): starting at the bottom row and
/// walking up while the cell is empty, a tile in the column to the left slides
/// one column right. The right half (columns `width/2 + 1` to `width - 2`)
/// mirrors this, sliding tiles one column left. A tile moves at most one
/// column per pass.
pub fn center_step(grid: &mut Grid) -> Vec<TileMove> {
    let mut moves = Vec::new();
    let centre = grid.width() / 2;

    for x in (1..=centre).rev() {
        pull_column(grid, x, x - 1, &mut moves);
    }
    for x in (centre + 1)..grid.width().saturating_sub(1) {
        pull_column(grid, x, x + 1, &mut moves);
    }
    moves
}

/// Fill the empty cells at the foot of column `x` from column `source`.
fn pull_column(grid: &mut Grid, x: usize, source: usize, moves: &mut Vec<TileMove>) {
    for y in (0..grid.height()).rev() {
        if grid.is_occupied(x, y) {
            break;
        }
        if let Some(mv) = grid.shift((source, y), (x, y)) {
            moves.push(mv);
        }
    }
}

/// True iff the occupied cells of the bottom row form one unbroken run, so no
/// floor tile has an empty neighbour with more tiles beyond it.
pub fn is_horizontally_settled(grid: &Grid) -> bool {
    let floor = grid.height() - 1;
    let occupied: Vec<usize> = (0..grid.width())
        .filter(|&x| grid.is_occupied(x, floor))
        .collect();
    match (occupied.first(), occupied.last()) {
        (Some(&first), Some(&last)) => last - first + 1 == occupied.len(),
        _ => true,
    }
}
