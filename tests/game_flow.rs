//! Whole-game behaviour: scheduling, score drain, power, levels, game over.

use collapsetui::{ColorId, CoreError, Game, GameConfig, GameEvent, PopOutcome, RejectReason};
use std::time::Duration;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn cycling(config: GameConfig, colours: &[u8]) -> Game {
    let colours: Vec<ColorId> = colours.iter().copied().map(ColorId).collect();
    let mut next = colours.into_iter().cycle();
    Game::with_sampler(config, Box::new(move |_: u8| next.next().unwrap_or(ColorId(0))))
}

fn sized(width: usize, height: usize) -> GameConfig {
    GameConfig {
        board_width: width,
        board_height: height,
        ..GameConfig::default()
    }
}

/// Tick in 16 ms frames for `total`.
fn run_for(game: &mut Game, total: Duration) {
    let frame = ms(16);
    let mut elapsed = Duration::ZERO;
    while elapsed < total {
        game.tick(frame);
        elapsed += frame;
    }
}

#[test]
fn pop_reports_removed_tiles_and_score() {
    let mut game = cycling(sized(2, 2), &[0]);
    game.drain_events();
    let outcome = game.request_pop(1, 1).unwrap();
    assert_eq!(outcome.removed().unwrap().points_awarded, 6);

    let events = game.drain_events();
    let removed = events.iter().filter(|e| matches!(e, GameEvent::TileRemoved(_))).count();
    assert_eq!(removed, 4);
    assert!(events.contains(&GameEvent::ScoreChanged {
        settled: 0,
        incoming: 6
    }));
    assert_eq!(game.score().incoming(), 6);
}

#[test]
fn out_of_bounds_pop_is_an_error() {
    let mut game = cycling(sized(2, 2), &[0]);
    assert!(matches!(
        game.request_pop(5, 0),
        Err(CoreError::InvalidCoordinate { x: 5, y: 0, .. })
    ));
    assert_eq!(game.board().grid().tile_count(), 4);
}

#[test]
fn falling_tile_moves_on_the_gravity_cadence() {
    // One column: a / b / b.
    let mut game = cycling(sized(1, 3), &[0, 1, 1]);
    game.request_pop(0, 2).unwrap();
    game.drain_events();

    game.tick(ms(499));
    assert!(game.drain_events().iter().all(|e| !matches!(e, GameEvent::TileMoved { .. })));

    game.tick(ms(1));
    let moved: Vec<_> = game
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::TileMoved { .. }))
        .collect();
    assert_eq!(
        moved,
        vec![GameEvent::TileMoved {
            color: ColorId(0),
            from: (0, 0),
            to: (0, 1)
        }]
    );

    game.tick(ms(200));
    assert_eq!(game.board().grid().to_rows(), vec![".", ".", "a"]);
    assert!(game.board().is_idle());
}

#[test]
fn settled_score_milestone_gains_power_up_to_max() {
    let config = GameConfig {
        starting_power: 5,
        max_power: 6,
        score_requirement_per_power_gain: 5,
        post_level_bonus_requirement: 1000,
        ..sized(3, 2)
    };
    let mut game = cycling(config, &[0]);
    game.request_pop(0, 0).unwrap();
    assert_eq!(game.score().incoming(), 15);

    // Not before the drain starts.
    run_for(&mut game, ms(900));
    assert_eq!(game.power().current(), 5);

    run_for(&mut game, ms(2000));
    assert_eq!(game.score().settled(), 15);
    assert!(game.score().is_idle());
    // Milestones at 5, 10 and 15, capped at 6.
    assert_eq!(game.power().current(), 6);
    assert!(game.power().is_full());
}

#[test]
fn unmatched_board_without_power_ends_the_game() {
    let config = GameConfig {
        starting_power: 0,
        ..sized(3, 3)
    };
    let mut game = cycling(config, &[0, 1]);
    assert_eq!(game.board().grid().to_rows(), vec!["aba", "bab", "aba"]);
    assert!(game.game_over_condition());

    game.tick(ms(16));
    assert!(game.is_game_over());
    assert!(game.drain_events().contains(&GameEvent::GameOver));

    let outcome = game.request_pop(1, 1).unwrap();
    assert_eq!(outcome, PopOutcome::Rejected(RejectReason::NoPower));

    run_for(&mut game, ms(5000));
    assert!(game.drain_events().iter().all(|e| *e != GameEvent::GameOver));
    assert!(!game.is_next_level_queued());
}

#[test]
fn incoming_points_settle_after_game_over() {
    let config = GameConfig {
        starting_power: 0,
        ..sized(3, 1)
    };
    let mut game = cycling(config, &[0, 0, 1]);
    assert_eq!(game.board().grid().to_rows(), vec!["aab"]);
    assert!(game.request_pop(0, 0).unwrap().is_removed());
    assert_eq!(game.score().incoming(), 1);

    // The lone tile has no match, so the game ends before the drain delay expires.
    run_for(&mut game, ms(900));
    assert!(game.is_game_over());
    assert_eq!(game.score().settled(), 0);
    game.drain_events();

    run_for(&mut game, ms(2000));
    assert!(game.is_game_over());
    assert_eq!(game.score().incoming(), 0);
    assert_eq!(game.score().settled(), 1);
    assert!(game.score().is_idle());
    assert!(game.drain_events().contains(&GameEvent::ScoreChanged {
        settled: 1,
        incoming: 0
    }));
    assert!(!game.is_next_level_queued());
}

#[test]
fn power_keeps_the_game_alive() {
    let config = GameConfig {
        starting_power: 1,
        ..sized(3, 3)
    };
    let mut game = cycling(config, &[0, 1]);
    game.tick(ms(16));
    assert!(!game.is_game_over());
    assert!(game.request_pop(1, 1).unwrap().is_removed());
    assert_eq!(game.power().current(), 0);
}

#[test]
fn cleared_board_awards_bonus_once_then_starts_next_level() {
    let config = GameConfig {
        post_level_bonus_requirement: 10,
        ..sized(4, 2)
    };
    let mut game = cycling(config, &[0]);
    game.request_pop(0, 0).unwrap();
    assert_eq!(game.score().incoming(), 28);
    game.drain_events();

    game.tick(ms(16));
    assert_eq!(game.score().incoming(), 56);

    // Drain: 1 s delay + 56 points at 100 ms.
    run_for(&mut game, ms(6800));
    assert!(game.score().is_idle());
    assert_eq!(game.score().settled(), 56);
    assert!(game.is_next_level_queued());
    assert_eq!(game.level().level, 1);

    run_for(&mut game, ms(2100));
    assert!(!game.is_next_level_queued());
    assert_eq!(game.level().level, 2);
    assert_eq!((game.level().width, game.level().height), (5, 4));
    assert_eq!(game.board().grid().tile_count(), 20);

    let events = game.drain_events();
    let completed: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, GameEvent::LevelCompleted { .. }))
        .collect();
    assert_eq!(completed, vec![&GameEvent::LevelCompleted { bonus: Some(28) }]);
    let changed = events
        .iter()
        .filter(|e| matches!(e, GameEvent::LevelChanged { level: 2, .. }))
        .count();
    assert_eq!(changed, 1);
}

#[test]
fn small_level_end_gets_no_bonus() {
    let mut game = cycling(sized(2, 1), &[0]);
    game.request_pop(0, 0).unwrap();
    game.tick(ms(16));
    assert_eq!(game.score().incoming(), 1);
    assert!(game
        .drain_events()
        .contains(&GameEvent::LevelCompleted { bonus: None }));
}

#[test]
fn restart_resets_score_power_and_level() {
    let config = GameConfig {
        post_level_bonus_requirement: 1000,
        ..sized(4, 2)
    };
    let mut game = cycling(config, &[0]);
    game.request_pop(0, 0).unwrap();
    run_for(&mut game, ms(12_000));
    assert_eq!(game.level().level, 2);

    game.restart();
    assert_eq!(game.level().level, 1);
    assert_eq!((game.score().settled(), game.score().incoming()), (0, 0));
    assert_eq!(game.power().current(), 3);
    assert_eq!(game.board().grid().tile_count(), 8);
    assert!(!game.is_next_level_queued());
}

#[test]
fn same_seed_same_game() {
    let config = GameConfig {
        seed: Some(2024),
        unique_color_count: 3,
        ..GameConfig::default()
    };
    let play = |mut game: Game| {
        let mut events = Vec::new();
        for round in 0..30 {
            let (x, y) = (round % 10, 4 - round % 5);
            let _ = game.request_pop(x, y);
            run_for(&mut game, ms(400));
            events.extend(game.drain_events());
        }
        (events, game.board().grid().to_rows(), game.score().settled())
    };
    assert_eq!(play(Game::new(config.clone())), play(Game::new(config)));
}
