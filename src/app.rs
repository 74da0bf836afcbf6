//! App: terminal init, main loop, fixed-step ticking, key and mouse handling.

use crate::Args;
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use anyhow::Result;
use collapsetui::{Game, GameConfig, GameEvent, Tile};
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

/// How long the power counter flashes after a denied pop.
const POWER_FLASH_MS: u64 = 400;
/// Cap on simulation steps per frame after a stall (terminal suspended, slow draw).
const MAX_CATCH_UP_TICKS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    QuitMenu,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitOption {
    Resume,
    Restart,
    Exit,
}

impl QuitOption {
    fn next(self) -> Self {
        match self {
            Self::Resume => Self::Restart,
            Self::Restart => Self::Exit,
            Self::Exit => Self::Resume,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Resume => Self::Exit,
            Self::Restart => Self::Resume,
            Self::Exit => Self::Restart,
        }
    }
}

/// Presentation state fed by game events: the status line and power tint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub message: String,
    /// Power went up since it was last spent.
    pub power_gained: bool,
    last_power: u32,
    power_flash_until: Option<Instant>,
}

impl Hud {
    pub fn new(power: u32, level: u32) -> Self {
        Self {
            message: format!("Level {level}"),
            power_gained: false,
            last_power: power,
            power_flash_until: None,
        }
    }

    pub fn apply(&mut self, event: &GameEvent, now: Instant) {
        match *event {
            GameEvent::PowerChanged { current, .. } => {
                self.power_gained = current > self.last_power;
                self.last_power = current;
            }
            GameEvent::PowerDenied => {
                self.power_flash_until = Some(now + Duration::from_millis(POWER_FLASH_MS));
            }
            GameEvent::LevelCompleted { bonus: None } => self.message = "Level complete!".to_string(),
            GameEvent::LevelCompleted { bonus: Some(bonus) } => {
                self.message = format!("Level complete with {bonus} Bonus!");
            }
            GameEvent::LevelChanged { level, .. } => self.message = format!("Level {level}"),
            GameEvent::GameOver => self.message = "GAME OVER".to_string(),
            _ => {}
        }
    }

    pub fn power_flashing(&self, now: Instant) -> bool {
        self.power_flash_until.is_some_and(|until| now < until)
    }
}

/// Popped tiles still fading out, with their tachyonfx effect.
#[derive(Default)]
pub struct PopFx {
    pub tiles: Vec<Tile>,
    pub effect: Option<Effect>,
    /// Last time the effect was processed (for delta).
    pub process_time: Option<Instant>,
}

impl PopFx {
    fn push(&mut self, tile: Tile) {
        self.tiles.push(tile);
        // Restart so the new tiles join the filter.
        self.effect = None;
        self.process_time = None;
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// The game keeps ticking behind the game-over screen so pending score settles.
fn simulation_runs(screen: Screen, paused: bool) -> bool {
    !paused && matches!(screen, Screen::Playing | Screen::GameOver)
}

fn rate_interval(rate: f64) -> Duration {
    Duration::from_secs_f64(1.0 / rate.max(1.0).min(1000.0))
}

pub struct App {
    theme: Theme,
    game: Game,
    hud: Hud,
    pop_fx: PopFx,
    screen: Screen,
    paused: bool,
    quit_selected: QuitOption,
    /// Keyboard cursor (board cell).
    cursor: (usize, usize),
    no_animation: bool,
    tick_interval: Duration,
    frame_interval: Duration,
    last_tick: Instant,
    /// Frame area from the last draw, for mouse hit-testing.
    area: Rect,
}

impl App {
    pub fn new(args: &Args, config: GameConfig, theme: Theme) -> Result<Self> {
        let game = Game::new(config);
        let hud = Hud::new(game.power().current(), game.level().level);
        let mut app = Self {
            theme,
            game,
            hud,
            pop_fx: PopFx::default(),
            screen: Screen::Playing,
            paused: false,
            quit_selected: QuitOption::Resume,
            cursor: (0, 0),
            no_animation: args.no_animation,
            tick_interval: rate_interval(args.tick_rate),
            frame_interval: rate_interval(args.frame_rate),
            last_tick: Instant::now(),
            area: Rect::default(),
        };
        app.process_game_events(Instant::now());
        Ok(app)
    }

    fn restart(&mut self) {
        self.game.restart();
        self.hud = Hud::new(self.game.power().current(), self.game.level().level);
        self.pop_fx.clear();
        self.screen = Screen::Playing;
        self.paused = false;
        self.quit_selected = QuitOption::Resume;
        self.last_tick = Instant::now();
        log::info!("restart, seed {:?}", self.game.seed());
        self.process_game_events(Instant::now());
    }

    fn open_quit_menu(&mut self) {
        self.screen = Screen::QuitMenu;
        self.quit_selected = QuitOption::Resume;
    }

    /// Hand queued game events to the HUD and the pop animation.
    fn process_game_events(&mut self, now: Instant) {
        for event in self.game.drain_events() {
            self.hud.apply(&event, now);
            match event {
                GameEvent::TileRemoved(tile) if !self.no_animation => self.pop_fx.push(tile),
                GameEvent::BoardFilled { width, height, .. } => {
                    self.pop_fx.clear();
                    self.cursor = (
                        self.cursor.0.min(width.saturating_sub(1)),
                        self.cursor.1.min(height.saturating_sub(1)),
                    );
                }
                GameEvent::GameOver => self.screen = Screen::GameOver,
                _ => {}
            }
        }
    }

    fn pop_at(&mut self, (x, y): (usize, usize)) {
        if let Err(e) = self.game.request_pop(x, y) {
            log::warn!("pop ignored: {e}");
        }
    }

    fn move_cursor(&mut self, dx: isize, dy: isize) {
        let grid = self.game.board().grid();
        let (x, y) = self.cursor;
        self.cursor = (
            x.saturating_add_signed(dx).min(grid.width().saturating_sub(1)),
            y.saturating_add_signed(dy).min(grid.height().saturating_sub(1)),
        );
    }

    /// Returns true when the app should exit.
    fn handle_action(&mut self, action: Action) -> bool {
        match self.screen {
            Screen::Playing if self.paused => match action {
                Action::Pause => self.paused = false,
                Action::Restart => self.restart(),
                Action::Quit => self.open_quit_menu(),
                _ => {}
            },
            Screen::Playing => match action {
                Action::CursorLeft => self.move_cursor(-1, 0),
                Action::CursorRight => self.move_cursor(1, 0),
                Action::CursorUp => self.move_cursor(0, -1),
                Action::CursorDown => self.move_cursor(0, 1),
                Action::Pop => self.pop_at(self.cursor),
                Action::Pause => self.paused = true,
                Action::Restart => self.restart(),
                Action::Quit => self.open_quit_menu(),
                Action::None => {}
            },
            Screen::QuitMenu => match action {
                Action::CursorDown | Action::CursorRight => self.quit_selected = self.quit_selected.next(),
                Action::CursorUp | Action::CursorLeft => self.quit_selected = self.quit_selected.prev(),
                Action::Pop => match self.quit_selected {
                    QuitOption::Resume => self.screen = Screen::Playing,
                    QuitOption::Restart => self.restart(),
                    QuitOption::Exit => return true,
                },
                Action::Restart => self.restart(),
                Action::Pause | Action::Quit => self.screen = Screen::Playing,
                Action::None => {}
            },
            Screen::GameOver => match action {
                Action::Quit => return true,
                Action::Restart | Action::Pop => self.restart(),
                _ => {}
            },
        }
        false
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.screen != Screen::Playing || self.paused {
            return;
        }
        let Some(cell) = crate::ui::cell_at(self.area, self.game.board().grid(), mouse.column, mouse.row)
        else {
            return;
        };
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.cursor = cell;
                self.pop_at(cell);
            }
            MouseEventKind::Moved => self.cursor = cell,
            _ => {}
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let mut terminal = ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;
        self.last_tick = Instant::now();

        let result = self.run_loop(&mut terminal);

        // Restore
        execute!(std::io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            let show_cursor = self.screen == Screen::Playing && !self.paused;
            terminal.draw(|f| {
                self.area = f.area();
                crate::ui::draw(
                    f,
                    self.screen,
                    &self.game,
                    &self.hud,
                    &self.theme,
                    show_cursor.then_some(self.cursor),
                    self.paused,
                    self.quit_selected,
                    &mut self.pop_fx,
                    now,
                );
            })?;

            if self.pop_fx.effect.as_ref().is_some_and(Effect::done) {
                self.pop_fx.clear();
            }

            let timeout = self.frame_interval.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            if self.handle_action(key_to_action(key)) {
                                return Ok(());
                            }
                        }
                        Event::Mouse(mouse) => self.handle_mouse(mouse),
                        _ => {}
                    }
                }
            }

            if simulation_runs(self.screen, self.paused) {
                let mut steps = 0;
                while self.last_tick.elapsed() >= self.tick_interval {
                    self.game.tick(self.tick_interval);
                    self.last_tick += self.tick_interval;
                    steps += 1;
                    if steps >= MAX_CATCH_UP_TICKS {
                        self.last_tick = Instant::now();
                        break;
                    }
                }
            } else {
                // Paused time does not count.
                self.last_tick = Instant::now();
            }
            self.process_game_events(Instant::now());
        }
    }
}
