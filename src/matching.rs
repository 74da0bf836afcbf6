//! Same-colour group search over the grid.

use crate::error::CoreError;
use crate::grid::Grid;
use crate::tile::Tile;
use std::collections::HashSet;

/// Connected group of tiles sharing the origin's colour (orthogonal adjacency).
///
/// The origin is always first; the order of the rest is unspecified.
/// An empty origin cell yields an empty group.
pub fn find_group(grid: &Grid, origin_x: usize, origin_y: usize) -> Result<Vec<Tile>, CoreError> {
    let Some(&origin) = grid.get(origin_x, origin_y)? else {
        return Ok(Vec::new());
    };

    let mut group = vec![origin];
    let mut visited = HashSet::from([origin.pos()]);
    let mut stack = vec![origin.pos()];

    while let Some((x, y)) = stack.pop() {
        for (nx, ny) in grid.neighbors(x, y) {
            if visited.contains(&(nx, ny)) {
                continue;
            }
            if let Some(&tile) = grid.tile(nx, ny) {
                if tile.color == origin.color {
                    visited.insert((nx, ny));
                    group.push(tile);
                    stack.push((nx, ny));
                }
            }
        }
    }
    Ok(group)
}

/// True iff some tile has an orthogonal neighbour of the same colour,
/// i.e. a move that needs no power is still available.
pub fn has_match_available(grid: &Grid) -> bool {
    grid.tiles().any(|tile| {
        grid.neighbors(tile.x, tile.y)
            .filter_map(|(nx, ny)| grid.tile(nx, ny))
            .any(|n| n.color == tile.color)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(group: &[Tile]) -> HashSet<(usize, usize)> {
        group.iter().map(Tile::pos).collect()
    }

    #[test]
    fn test_group_of_whole_uniform_board() {
        let grid = Grid::from_rows(&["aa", "aa"]);
        let group = find_group(&grid, 0, 0).unwrap();
        assert_eq!(group.len(), 4);
        assert_eq!(group[0].pos(), (0, 0));
    }

    #[test]
    fn test_group_follows_winding_path_only() {
        let grid = Grid::from_rows(&[
            "aab", //
            "bab", //
            "baa", //
        ]);
        let group = find_group(&grid, 2, 2).unwrap();
        assert_eq!(group[0].pos(), (2, 2));
        assert_eq!(
            positions(&group),
            HashSet::from([(0, 0), (1, 0), (1, 1), (1, 2), (2, 2)])
        );
    }

    #[test]
    fn test_diagonal_is_not_adjacent() {
        let grid = Grid::from_rows(&["ab", "ba"]);
        assert_eq!(find_group(&grid, 0, 0).unwrap().len(), 1);
        assert!(!has_match_available(&grid));
    }

    #[test]
    fn test_gaps_break_groups() {
        let grid = Grid::from_rows(&["a.a"]);
        assert_eq!(find_group(&grid, 0, 0).unwrap().len(), 1);
        assert!(find_group(&grid, 1, 0).unwrap().is_empty());
    }

    #[test]
    fn test_out_of_bounds_origin_errors() {
        let grid = Grid::from_rows(&["ab"]);
        assert!(matches!(
            find_group(&grid, 0, 3),
            Err(CoreError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_has_match_available() {
        assert!(has_match_available(&Grid::from_rows(&["ab", "cb"])));
        assert!(!has_match_available(&Grid::from_rows(&["ab", "ca"])));
        assert!(!has_match_available(&Grid::new(3, 3)));
    }
}
