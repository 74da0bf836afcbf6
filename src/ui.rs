//! Layout and drawing: board, sidebar, pause, quit menu, game over.

use crate::app::{Hud, PopFx, QuitOption, Screen};
use crate::theme::Theme;
use collapsetui::{ColorId, Game, Grid, PALETTE_SIZE};
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::collections::HashSet;
use std::time::Instant;
use tachyonfx::{CellFilter, Duration as TfxDuration, EffectRenderer, Interpolation, fx, ref_count};

/// Each tile is two terminal columns wide so it reads roughly square.
const CELL_WIDTH: u16 = 2;
const CELL_HEIGHT: u16 = 1;

const SIDEBAR_WIDTH: u16 = 24;
/// Height of the stacked sidebar sections, gaps included.
const SIDEBAR_HEIGHT: u16 = 20;

/// Duration of the pop fade (TachyonFX) in ms.
const POP_FADE_MS: u32 = 300;

/// Board size in terminal cells, border included.
fn board_outer_size(grid_width: usize, grid_height: usize) -> (u16, u16) {
    let w = u16::try_from(grid_width).unwrap_or(u16::MAX);
    let h = u16::try_from(grid_height).unwrap_or(u16::MAX);
    (
        w.saturating_mul(CELL_WIDTH).saturating_add(2),
        h.saturating_mul(CELL_HEIGHT).saturating_add(2),
    )
}

/// Board (with border) and sidebar rects, centred in `area`.
fn game_rects(area: Rect, grid: &Grid) -> (Rect, Rect) {
    let (bw, bh) = board_outer_size(grid.width(), grid.height());
    let total_w = bw.saturating_add(SIDEBAR_WIDTH);
    let total_h = bh.max(SIDEBAR_HEIGHT);

    let horiz_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_h),
            Constraint::Fill(1),
        ])
        .split(horiz_chunks[1]);
    let active_area = vert_chunks[1];

    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(bw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(active_area);

    let board_h = bh.min(active_area.height);
    let board = Rect {
        y: active_area.y + (active_area.height - board_h) / 2,
        height: board_h,
        ..inner[0]
    };
    (board, inner[1])
}

/// Inner board rect (tiles only, no border) for the given frame area.
pub fn board_rect(area: Rect, grid: &Grid) -> Rect {
    let (outer, _) = game_rects(area, grid);
    Rect {
        x: outer.x.saturating_add(1),
        y: outer.y.saturating_add(1),
        width: outer.width.saturating_sub(2),
        height: outer.height.saturating_sub(2),
    }
}

/// Top-left terminal cell of board cell (x, y), if the whole tile fits in `board`.
fn cell_position(board: Rect, x: usize, y: usize) -> Option<Position> {
    let px = board.x.checked_add(u16::try_from(x).ok()?.checked_mul(CELL_WIDTH)?)?;
    let py = board.y.checked_add(u16::try_from(y).ok()?.checked_mul(CELL_HEIGHT)?)?;
    let fits = px.checked_add(CELL_WIDTH)? <= board.right() && py.checked_add(CELL_HEIGHT)? <= board.bottom();
    fits.then_some(Position::new(px, py))
}

/// Board cell under terminal position (column, row), for mouse input.
pub fn cell_at(area: Rect, grid: &Grid, column: u16, row: u16) -> Option<(usize, usize)> {
    let board = board_rect(area, grid);
    if !board.contains(Position::new(column, row)) {
        return None;
    }
    let x = usize::from((column - board.x) / CELL_WIDTH);
    let y = usize::from((row - board.y) / CELL_HEIGHT);
    grid.contains(x, y).then_some((x, y))
}

/// Draw the current screen with optional pause / quit overlays.
/// While popped tiles are fading, applies the TachyonFX effect and updates `pop_fx`.
pub fn draw(
    frame: &mut Frame,
    screen: Screen,
    game: &Game,
    hud: &Hud,
    theme: &Theme,
    cursor: Option<(usize, usize)>,
    paused: bool,
    quit_selected: QuitOption,
    pop_fx: &mut PopFx,
    now: Instant,
) {
    let area = frame.area();
    draw_game(frame, game, hud, theme, area, cursor, pop_fx, now);
    if !pop_fx.tiles.is_empty() {
        apply_pop_effect(frame, board_rect(area, game.board().grid()), theme, pop_fx, now);
    }
    match screen {
        Screen::Playing if paused => draw_pause_overlay(frame, theme, area),
        Screen::Playing => {}
        Screen::QuitMenu => draw_quit_menu(frame, theme, quit_selected),
        Screen::GameOver => draw_game_over(frame, game, theme, area),
    }
}

/// Create or update the pop fade and process it (TachyonFX: popped cells fade to bg).
fn apply_pop_effect(frame: &mut Frame, board: Rect, theme: &Theme, pop_fx: &mut PopFx, now: Instant) {
    let delta = pop_fx
        .process_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u128::from(u32::MAX)) as u32;
    pop_fx.process_time = Some(now);

    if pop_fx.effect.is_none() {
        let popped: HashSet<(u16, u16)> = pop_fx
            .tiles
            .iter()
            .filter_map(|tile| cell_position(board, tile.x, tile.y))
            .flat_map(|p| (0..CELL_WIDTH).map(move |dx| (p.x + dx, p.y)))
            .collect();
        let filter = CellFilter::PositionFn(ref_count(move |pos: Position| popped.contains(&(pos.x, pos.y))));
        let bg = theme.bg;
        let effect = fx::fade_to(bg, bg, (POP_FADE_MS, Interpolation::Linear))
            .with_filter(filter)
            .with_area(board);
        pop_fx.effect = Some(effect);
    }

    if let Some(effect) = &mut pop_fx.effect {
        frame.render_effect(effect, board, TfxDuration::from_millis(delta_ms));
    }
}

fn draw_game(
    frame: &mut Frame,
    game: &Game,
    hud: &Hud,
    theme: &Theme,
    area: Rect,
    cursor: Option<(usize, usize)>,
    pop_fx: &PopFx,
    now: Instant,
) {
    let (board_area, sidebar_area) = game_rects(area, game.board().grid());
    draw_board(frame, game, theme, board_area, cursor, pop_fx);
    draw_sidebar(frame, game, hud, theme, sidebar_area, now);
}

fn draw_board(
    frame: &mut Frame,
    game: &Game,
    theme: &Theme,
    area: Rect,
    cursor: Option<(usize, usize)>,
    pop_fx: &PopFx,
) {
    let title = format!(" Collapsetui  | Level {} ", game.level().level);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(title, theme.title));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let grid = game.board().grid();
    // Popped cells stay white until the fade covers them or a tile lands there.
    let ghosts: HashSet<(usize, usize)> = pop_fx.tiles.iter().map(|t| t.pos()).collect();
    let buf = frame.buffer_mut();

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let Some(pos) = cell_position(inner, x, y) else {
                continue;
            };
            let tile = grid.tile(x, y);
            let bg = match tile {
                Some(tile) => theme.tile_color(tile.color),
                None if ghosts.contains(&(x, y)) => theme.flash,
                None => theme.bg,
            };
            let (symbol, style) = if cursor == Some((x, y)) {
                let fg = if tile.is_some() { Color::Black } else { theme.main_fg };
                ("[]", Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD))
            } else {
                ("  ", Style::default().bg(bg))
            };
            buf.set_string(pos.x, pos.y, symbol, style);
        }
    }
}

fn sidebar_block_style(theme: &Theme) -> Style {
    Style::default().fg(theme.div_line).bg(theme.bg)
}

/// Bordered sidebar section; returns the inner rect.
fn section(buf: &mut Buffer, theme: &Theme, area: Rect) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(sidebar_block_style(theme));
    let inner = block.inner(area);
    block.render(area, buf);
    inner
}

fn power_style(game: &Game, hud: &Hud, theme: &Theme, now: Instant) -> Style {
    if hud.power_flashing(now) {
        return Style::default()
            .fg(theme.bg)
            .bg(theme.power_empty)
            .add_modifier(Modifier::BOLD);
    }
    let power = game.power();
    let color = if power.is_exhausted() {
        theme.power_empty
    } else if power.is_full() {
        theme.power_full
    } else if hud.power_gained {
        theme.power_gain
    } else {
        theme.main_fg
    };
    Style::default().fg(color)
}

fn draw_sidebar(frame: &mut Frame, game: &Game, hud: &Hud, theme: &Theme, area: Rect, now: Instant) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let dim_style = Style::default().fg(theme.inactive_fg);

    // Free-floating sections with their own borders; vertical layout with small gaps
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Stats (border + score, power, level, tiles)
            Constraint::Length(1), // gap
            Constraint::Length(4), // Colours (border + title + strip)
            Constraint::Length(1), // gap
            Constraint::Length(3), // Status message
            Constraint::Length(1), // gap
            Constraint::Length(4), // Key hints
        ])
        .split(area);
    let buf = frame.buffer_mut();

    // --- Stats ---
    let stats_inner = section(buf, theme, chunks[0]);
    let score = game.score();
    let mut score_line = vec![
        Span::styled("Score: ", title_style),
        Span::styled(score.settled().to_string(), fg_style),
    ];
    if score.incoming() > 0 {
        score_line.push(Span::styled(format!(" +{}", score.incoming()), dim_style));
    }
    let stats_lines = vec![
        Line::from(score_line),
        Line::from(vec![
            Span::styled("Power: ", title_style),
            Span::styled(format!("x{}", game.power().current()), power_style(game, hud, theme, now)),
        ]),
        Line::from(vec![
            Span::styled("Level: ", title_style),
            Span::styled(game.level().level.to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Tiles: ", title_style),
            Span::styled(game.board().grid().tile_count().to_string(), fg_style),
        ]),
    ];
    Paragraph::new(Text::from(stats_lines)).render(stats_inner, buf);

    // --- Colours ---
    let colours_inner = section(buf, theme, chunks[2]);
    let colours_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(colours_inner);
    Paragraph::new(Line::from(Span::styled("Colours", title_style))).render(colours_layout[0], buf);
    draw_colour_strip(buf, theme, colours_layout[1], game.level().unique_color_count);

    // --- Status ---
    let status_inner = section(buf, theme, chunks[4]);
    let status_style = if game.is_game_over() {
        Style::default().fg(theme.power_empty).add_modifier(Modifier::BOLD)
    } else {
        title_style
    };
    Paragraph::new(Line::from(Span::styled(hud.message.as_str(), status_style)))
        .alignment(Alignment::Center)
        .render(status_inner, buf);

    // --- Keys ---
    let keys_inner = section(buf, theme, chunks[6]);
    let keys = vec![
        Line::from(Span::styled("Click/Space  pop", dim_style)),
        Line::from(Span::styled("P pause  R restart", dim_style)),
    ];
    Paragraph::new(Text::from(keys)).render(keys_inner, buf);
}

/// Palette strip: colours in play drawn solid, the rest dimmed.
fn draw_colour_strip(buf: &mut Buffer, theme: &Theme, area: Rect, active: u8) {
    let block_w = (area.width / u16::from(PALETTE_SIZE)).max(1);
    for i in 0..PALETTE_SIZE {
        let r = Rect {
            x: area.x + u16::from(i) * block_w,
            y: area.y,
            width: block_w,
            height: area.height.min(1),
        }
        .intersection(area);
        if r.is_empty() {
            break;
        }
        let p = if i < active {
            let c = theme.tile_color(ColorId(i));
            Paragraph::new("██").style(Style::default().fg(c).bg(c))
        } else {
            Paragraph::new("··").style(Style::default().fg(theme.inactive_fg))
        };
        p.render(r, buf);
    }
}

/// `w x h` rect centred in `area`, clamped to it.
fn popup_rect(area: Rect, w: u16, h: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w.min(area.width),
        height: h.min(area.height),
    }
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup = popup_rect(area, 28, 5);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(theme.title),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P — Resume    Q — Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
    );
    p.render(popup, frame.buffer_mut());
}

fn draw_game_over(frame: &mut Frame, game: &Game, theme: &Theme, area: Rect) {
    let popup = popup_rect(area, 30, 9);
    let score = game.score();
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Game Over ",
            Style::default().fg(Color::White).bg(theme.power_empty),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(" Score: {} ", score.settled() + score.incoming()),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(Span::styled(
            format!(" Level: {} ", game.level().level),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " R — Restart    Q — Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
            .title(Span::styled(" Collapsetui ", theme.title)),
    );
    p.render(popup, frame.buffer_mut());
}

pub fn draw_quit_menu(frame: &mut Frame, theme: &Theme, selected: QuitOption) {
    let area = frame.area();
    let quit_rect = popup_rect(area, 24, 8);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.title))
        .title(" Quit? ");

    // Clear background
    for pos in quit_rect.positions() {
        frame.buffer_mut()[pos].set_symbol(" ").set_style(Style::default().bg(theme.bg));
    }

    let inner = block.inner(quit_rect);
    block.render(quit_rect, frame.buffer_mut());

    let options = [
        (QuitOption::Resume, " Resume "),
        (QuitOption::Restart, " Restart "),
        (QuitOption::Exit, " Exit "),
    ];

    for (i, (opt, label)) in options.iter().enumerate() {
        let style = if *opt == selected {
            Style::default()
                .fg(theme.bg)
                .bg(theme.title)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.title)
        };
        let rx = inner.x + (inner.width.saturating_sub(label.len() as u16)) / 2;
        let ry = inner.y + 1 + i as u16 * 2;
        if ry < inner.bottom() {
            frame.buffer_mut().set_string(rx, ry, label, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Rect {
        Rect::new(0, 0, 80, 24)
    }

    #[test]
    fn test_board_rect_fits_tiles() {
        let grid = Grid::new(10, 5);
        let board = board_rect(area(), &grid);
        assert_eq!((board.width, board.height), (20, 5));
        assert!(area().contains(Position::new(board.right() - 1, board.bottom() - 1)));
    }

    #[test]
    fn test_cell_at_maps_two_columns_per_tile() {
        let grid = Grid::new(10, 5);
        let board = board_rect(area(), &grid);
        assert_eq!(cell_at(area(), &grid, board.x, board.y), Some((0, 0)));
        assert_eq!(cell_at(area(), &grid, board.x + 1, board.y), Some((0, 0)));
        assert_eq!(cell_at(area(), &grid, board.x + 3, board.y + 4), Some((1, 4)));
        assert_eq!(cell_at(area(), &grid, board.x - 1, board.y), None);
        assert_eq!(cell_at(area(), &grid, board.x, board.y + 5), None);
    }

    #[test]
    fn test_cell_position_clips_to_board() {
        let board = Rect::new(2, 3, 5, 2);
        assert_eq!(cell_position(board, 1, 1), Some(Position::new(4, 4)));
        // Only half of tile 2 would fit.
        assert_eq!(cell_position(board, 2, 0), None);
        assert_eq!(cell_position(board, 0, 2), None);
    }
}
