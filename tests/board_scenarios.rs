//! Board rules through the public API: pops, settling, terminal checks.

use collapsetui::{
    Board, ColorId, Grid, LevelState, PopOutcome, PowerBudget, RejectReason, SeededSampler, SizeLimits,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn board(rows: &[&str]) -> Board {
    Board::from_grid(Grid::from_rows(rows), 6, 5)
}

fn settle(board: &mut Board) {
    for _ in 0..1000 {
        if board.is_idle() {
            return;
        }
        board.tick_gravity();
        board.tick_centering();
    }
    panic!("board did not settle:\n{}", board.grid().to_rows().join("\n"));
}

#[test]
fn uniform_square_pops_whole_board() {
    let mut b = board(&["aa", "aa"]);
    let mut power = PowerBudget::new(0, 6, 5000);
    let outcome = b.request_pop(0, 0, &mut power).unwrap();
    let result = outcome.removed().unwrap();
    assert_eq!(result.removed_tiles.len(), 4);
    assert_eq!(result.removed_tiles[0].pos(), (0, 0));
    assert_eq!(result.points_awarded, 6);
    assert!(b.is_empty());
}

#[test]
fn distinct_row_without_power_is_rejected() {
    let mut b = board(&["abc"]);
    let mut power = PowerBudget::new(0, 6, 5000);
    for x in 0..3 {
        let outcome = b.request_pop(x, 0, &mut power).unwrap();
        assert_eq!(outcome, PopOutcome::Rejected(RejectReason::NoPower));
    }
    assert_eq!(b.grid().to_rows(), vec!["abc"]);
}

#[test]
fn singleton_with_power_scores_zero_and_spends_one() {
    let mut b = board(&["ab", "ba"]);
    let mut power = PowerBudget::new(2, 6, 5000);
    let outcome = b.request_pop(1, 1, &mut power).unwrap();
    let result = outcome.removed().unwrap();
    assert_eq!(result.points_awarded, 0);
    assert!(result.used_power);
    assert_eq!(power.current(), 1);
    assert_eq!(b.grid().tile_count(), 3);
}

#[test]
fn multi_row_drop_takes_one_pass_per_row() {
    let mut b = board(&["a", ".", "."]);
    assert_eq!(b.tick_gravity().len(), 1);
    assert_eq!(b.grid().to_rows(), vec![".", "a", "."]);
    assert!(!b.is_vertically_settled());
    assert_eq!(b.tick_gravity().len(), 1);
    assert_eq!(b.grid().to_rows(), vec![".", ".", "a"]);
    assert!(b.is_vertically_settled());
}

#[test]
fn gravity_is_idempotent_once_settled() {
    let mut b = board(&["a.", "ab", "ab"]);
    assert!(b.is_vertically_settled());
    for _ in 0..5 {
        assert!(b.tick_gravity().is_empty());
        assert!(b.is_vertically_settled());
    }
}

#[test]
fn checkerboard_without_power_is_terminal() {
    let b = board(&["ab", "ba"]);
    let power = PowerBudget::new(0, 6, 5000);
    assert!(!b.is_empty());
    assert!(b.is_idle());
    assert!(!b.has_match_available());
    assert!(power.is_exhausted());
}

#[test]
fn pop_then_settle_collapses_toward_centre() {
    // Removing the middle pair leaves two islands on the floor.
    let mut b = board(&[
        "a..b", //
        "caab", //
    ]);
    let mut power = PowerBudget::new(0, 6, 5000);
    let outcome = b.request_pop(1, 1, &mut power).unwrap();
    assert_eq!(outcome.removed().unwrap().points_awarded, 1);
    assert!(!b.is_vertically_settled());
    settle(&mut b);
    assert_eq!(b.grid().to_rows(), vec!["..ab", "..cb"]);
    assert!(b.grid().coordinates_consistent());
}

#[test]
fn random_play_conserves_tiles_and_coordinates() {
    let mut b = Board::new(LevelState::new(8, 6, 3, 5), SizeLimits::default());
    b.refill(&mut SeededSampler::new(1234));
    let mut power = PowerBudget::new(3, 6, 5000);
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    for _ in 0..200 {
        if b.is_empty() {
            break;
        }
        let (x, y) = (rng.gen_range(0..8), rng.gen_range(0..6));
        let before = b.grid().tile_count();
        let outcome = b.request_pop(x, y, &mut power).unwrap();
        let after = b.grid().tile_count();
        match outcome {
            PopOutcome::Removed(result) => {
                assert_eq!(after, before - result.removed_tiles.len());
                assert!(result.removed_tiles.iter().all(|t| t.color == result.removed_tiles[0].color));
            }
            PopOutcome::Rejected(_) => assert_eq!(after, before),
        }
        settle(&mut b);
        assert!(b.grid().coordinates_consistent());
    }
}

#[test]
fn same_sampler_sequence_reproduces_layout() {
    let mut grid = Grid::new(7, 4);
    grid.fill(4, &mut SeededSampler::new(77));
    let first = grid.to_rows();
    grid.clear();
    assert!(grid.is_empty());
    grid.fill(4, &mut SeededSampler::new(77));
    assert_eq!(grid.to_rows(), first);

    let mut other = Grid::new(7, 4);
    let mut colours = [ColorId(0), ColorId(1), ColorId(2)].into_iter().cycle();
    other.fill(3, &mut |_: u8| colours.next().unwrap_or(ColorId(0)));
    assert_eq!(other.to_rows()[0], "abcabca");
}
