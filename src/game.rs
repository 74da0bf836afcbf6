//! Game: the top-level simulation. Owns the board, score ledger, power budget
//! and colour sampler, drives the fixed-interval settling passes from explicit
//! time deltas, runs the level-completion / game-over driver and queues events.

use crate::board::{Board, PopOutcome, RejectReason};
use crate::config::GameConfig;
use crate::error::CoreError;
use crate::events::GameEvent;
use crate::grid::TileMove;
use crate::level::LevelState;
use crate::power::PowerBudget;
use crate::sampler::{ColorSampler, SeededSampler};
use crate::schedule::{Countdown, Interval};
use crate::score::ScoreLedger;
use std::time::Duration;

pub struct Game {
    config: GameConfig,
    board: Board,
    score: ScoreLedger,
    power: PowerBudget,
    sampler: Box<dyn ColorSampler>,
    /// Seed of the built-in sampler; `None` for injected samplers.
    seed: Option<u64>,
    gravity_clock: Interval,
    centering_clock: Interval,
    /// Pending "start next level"; at most one.
    next_level: Countdown,
    /// End-of-level bonus already evaluated for the current level.
    bonus_evaluated: bool,
    game_over: bool,
    events: Vec<GameEvent>,
}

impl Game {
    /// New game with a seeded colour sampler (`config.seed`, or a random seed).
    pub fn new(config: GameConfig) -> Self {
        let sampler = config
            .seed
            .map_or_else(SeededSampler::from_entropy, SeededSampler::new);
        let seed = sampler.seed();
        log::info!("colour seed {seed}");
        let mut game = Self::with_sampler(config, Box::new(sampler));
        game.seed = Some(seed);
        game
    }

    /// New game drawing colours from `sampler`.
    pub fn with_sampler(config: GameConfig, mut sampler: Box<dyn ColorSampler>) -> Self {
        let config = config.sanitized();
        let mut board = Board::new(config.initial_level(), config.size_limits());
        board.refill(sampler.as_mut());
        let mut game = Self {
            score: ScoreLedger::new(
                config.score_update_delay,
                config.score_update_speed,
                config.post_level_bonus_requirement,
                config.level_end_bonus_multiplier,
            ),
            power: PowerBudget::new(
                config.starting_power,
                config.max_power,
                config.score_requirement_per_power_gain,
            ),
            gravity_clock: Interval::new(config.settle_start_delay, config.gravity_interval),
            centering_clock: Interval::new(config.settle_start_delay, config.centering_interval),
            next_level: Countdown::default(),
            bonus_evaluated: false,
            game_over: false,
            events: Vec::new(),
            board,
            sampler,
            seed: None,
            config,
        };
        game.emit_board_filled();
        game
    }

    /// Start over from level one: new board, zero score, starting power.
    pub fn restart(&mut self) {
        self.board
            .reset_level(self.config.initial_level(), self.sampler.as_mut());
        self.score.reset();
        self.power.reset(self.config.starting_power);
        self.gravity_clock.reset();
        self.centering_clock.reset();
        self.next_level.cancel();
        self.bonus_evaluated = false;
        self.game_over = false;
        log::debug!("game restarted");

        self.emit_board_filled();
        self.emit_level_changed();
        self.emit_score();
        self.emit_power();
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn score(&self) -> &ScoreLedger {
        &self.score
    }

    #[inline]
    pub fn power(&self) -> &PowerBudget {
        &self.power
    }

    #[inline]
    pub fn level(&self) -> &LevelState {
        self.board.level()
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Game over has been reached and latched.
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_next_level_queued(&self) -> bool {
        self.next_level.is_pending()
    }

    /// The terminal condition itself: tiles remain, nothing is moving, no
    /// power is left and no tile has a same-coloured neighbour.
    pub fn game_over_condition(&self) -> bool {
        !self.board.is_empty()
            && self.board.is_idle()
            && self.power.is_exhausted()
            && !self.board.has_match_available()
    }

    /// Pop the group at (x, y), crediting points and spending power as needed.
    pub fn request_pop(&mut self, x: usize, y: usize) -> Result<PopOutcome, CoreError> {
        let outcome = self.board.request_pop(x, y, &mut self.power)?;
        match &outcome {
            PopOutcome::Removed(result) => {
                self.events
                    .extend(result.removed_tiles.iter().copied().map(GameEvent::TileRemoved));
                self.score.add_settled_increase(result.points_awarded);
                self.emit_score();
                if result.used_power {
                    self.emit_power();
                }
            }
            PopOutcome::Rejected(RejectReason::NoPower) => self.events.push(GameEvent::PowerDenied),
            PopOutcome::Rejected(RejectReason::EmptyCell) => {}
        }
        Ok(outcome)
    }

    /// Advance the simulation by `dt`.
    ///
    /// Each phase runs to completion before the next: due gravity passes,
    /// due centering passes, score drain, level driver, game-over check.
    /// After game over only the settling passes and the score drain run.
    pub fn tick(&mut self, dt: Duration) {
        for _ in 0..self.gravity_clock.advance(dt) {
            let moves = self.board.tick_gravity();
            self.emit_moves(&moves);
        }
        for _ in 0..self.centering_clock.advance(dt) {
            let moves = self.board.tick_centering();
            self.emit_moves(&moves);
        }

        self.drain_score(dt);
        if self.game_over {
            return;
        }
        self.drive_level(dt);
        self.check_game_over();
    }

    /// Take every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn drain_score(&mut self, dt: Duration) {
        let before = self.score.settled();
        if self.score.advance(dt) == 0 {
            return;
        }
        self.emit_score();
        let gained = self.power.on_score_settled(before, self.score.settled());
        if gained > 0 {
            log::debug!(
                "score {} earned {gained} power (now {}/{})",
                self.score.settled(),
                self.power.current(),
                self.power.max()
            );
            self.emit_power();
        }
    }

    /// Level completion: once the board is empty, evaluate the bonus once;
    /// once the score has drained, queue the next level after the start delay.
    fn drive_level(&mut self, dt: Duration) {
        if self.next_level.is_pending() {
            if self.next_level.advance(dt) {
                self.start_next_level();
            }
            return;
        }
        if !self.board.is_empty() {
            return;
        }

        if !self.bonus_evaluated {
            self.bonus_evaluated = true;
            let bonus = self.score.award_level_bonus();
            log::debug!("level {} complete, bonus {bonus:?}", self.level().level);
            self.events.push(GameEvent::LevelCompleted { bonus });
            if bonus.is_some_and(|b| b > 0) {
                self.emit_score();
            }
        } else if self.score.is_idle() {
            self.next_level.start(self.config.new_level_start_delay);
        }
    }

    fn start_next_level(&mut self) {
        self.board.start_next_level(self.sampler.as_mut());
        self.bonus_evaluated = false;
        self.emit_board_filled();
        self.emit_level_changed();
    }

    fn check_game_over(&mut self) {
        if self.game_over || !self.game_over_condition() {
            return;
        }
        self.game_over = true;
        self.next_level.cancel();
        log::debug!(
            "game over on level {} with {} tile(s) left, score {}",
            self.level().level,
            self.board.grid().tile_count(),
            self.score.settled() + self.score.incoming()
        );
        self.events.push(GameEvent::GameOver);
    }

    fn emit_moves(&mut self, moves: &[TileMove]) {
        self.events.extend(moves.iter().map(|mv| GameEvent::TileMoved {
            color: mv.color,
            from: mv.from,
            to: mv.to,
        }));
    }

    fn emit_score(&mut self) {
        self.events.push(GameEvent::ScoreChanged {
            settled: self.score.settled(),
            incoming: self.score.incoming(),
        });
    }

    fn emit_power(&mut self) {
        self.events.push(GameEvent::PowerChanged {
            current: self.power.current(),
            max: self.power.max(),
        });
    }

    fn emit_board_filled(&mut self) {
        let grid = self.board.grid();
        self.events.push(GameEvent::BoardFilled {
            width: grid.width(),
            height: grid.height(),
            colors: self.board.level().unique_color_count,
        });
    }

    fn emit_level_changed(&mut self) {
        let level = *self.board.level();
        self.events.push(GameEvent::LevelChanged {
            level: level.level,
            width: level.width,
            height: level.height,
            colors: level.unique_color_count,
        });
    }
}
