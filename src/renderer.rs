use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::config::{
    COLOR_BORDER, COLOR_EMPTY, COLOR_FOOD, COLOR_SNAKE_BODY, COLOR_SNAKE_HEAD, GLYPH_EMPTY,
    GLYPH_FOOD, GLYPH_SNAKE_BODY, GLYPH_SNAKE_HEAD, GLYPH_SNAKE_TAIL,
};
use crate::game::{GameState, GameStatus};
use crate::grid::{Cell, Position};
use crate::ui::hud::render_hud;
use crate::ui::menu::{render_game_over_menu, render_start_menu, render_suspended_menu};

/// Terminal columns used by one grid cell.
const CELL_WIDTH: u16 = 2;

/// Renders the full game frame from immutable state.
pub fn render(frame: &mut Frame<'_>, state: &GameState) {
    let area = frame.area();
    let play_area = render_hud(frame, area, state);

    let block = Block::bordered()
        .title(" snake ")
        .border_style(Style::new().fg(COLOR_BORDER));
    let board_area = centered_board(block.inner(play_area), state.grid().size());
    let framed = Rect {
        x: board_area.x.saturating_sub(1),
        y: board_area.y.saturating_sub(1),
        width: board_area.width.saturating_add(2).min(play_area.width),
        height: board_area.height.saturating_add(2).min(play_area.height),
    };
    frame.render_widget(block, framed);

    render_cells(frame, board_area, state);

    match state.status() {
        GameStatus::Init => render_start_menu(frame, play_area, state),
        GameStatus::Suspended => render_suspended_menu(frame, play_area),
        GameStatus::GameOver => render_game_over_menu(frame, play_area, state),
        GameStatus::Playing => {}
    }
}

fn render_cells(frame: &mut Frame<'_>, board: Rect, state: &GameState) {
    let head = state.snake().head();
    let tail = state.snake().tail();
    let buffer = frame.buffer_mut();

    for (y, row) in state.grid().rows().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) else {
                continue;
            };
            let position = Position { x, y };
            let Some((column, line)) = logical_to_terminal(board, position) else {
                continue;
            };

            let (glyph, style) = match cell {
                Cell::Snake if position == head => (
                    GLYPH_SNAKE_HEAD,
                    Style::new()
                        .fg(COLOR_SNAKE_HEAD)
                        .add_modifier(Modifier::BOLD),
                ),
                Cell::Snake if position == tail => {
                    (GLYPH_SNAKE_TAIL, Style::new().fg(COLOR_SNAKE_BODY))
                }
                Cell::Snake => (GLYPH_SNAKE_BODY, Style::new().fg(COLOR_SNAKE_BODY)),
                Cell::Food => (GLYPH_FOOD, Style::new().fg(COLOR_FOOD)),
                Cell::Empty => (GLYPH_EMPTY, Style::new().fg(COLOR_EMPTY)),
            };
            buffer.set_string(column, line, glyph, style);
        }
    }
}

fn centered_board(inner: Rect, grid_size: u16) -> Rect {
    let width = grid_size.saturating_mul(CELL_WIDTH).min(inner.width);
    let height = grid_size.min(inner.height);

    Rect {
        x: inner.x + (inner.width - width) / 2,
        y: inner.y + (inner.height - height) / 2,
        width,
        height,
    }
}

fn logical_to_terminal(board: Rect, position: Position) -> Option<(u16, u16)> {
    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = board.x.saturating_add(x_offset);
    let y = board.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > board.right() || y >= board.bottom() {
        return None;
    }

    Some((x, y))
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;
    use ratatui::Terminal;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{centered_board, logical_to_terminal, render};
    use crate::config::GameConfig;
    use crate::game::{GameEvent, GameState};
    use crate::grid::Position;
    use crate::snake::Snake;

    #[test]
    fn board_is_centered_and_clipped() {
        let inner = Rect::new(0, 0, 100, 40);
        let board = centered_board(inner, 35);

        assert_eq!(board, Rect::new(15, 2, 70, 35));

        let small = centered_board(Rect::new(0, 0, 20, 10), 35);
        assert_eq!(small, Rect::new(0, 0, 20, 10));
    }

    #[test]
    fn cells_outside_the_visible_board_are_skipped() {
        let board = Rect::new(10, 5, 8, 4);

        assert_eq!(logical_to_terminal(board, Position::new(0, 0)), Some((10, 5)));
        assert_eq!(logical_to_terminal(board, Position::new(3, 3)), Some((16, 8)));
        assert_eq!(logical_to_terminal(board, Position::new(4, 0)), None);
        assert_eq!(logical_to_terminal(board, Position::new(0, 4)), None);
        assert_eq!(logical_to_terminal(board, Position::new(-1, 0)), None);
    }

    #[test]
    fn render_draws_without_panicking_on_small_terminals() {
        let state = GameState::new(GameConfig::default()).expect("default config is valid");

        for (width, height) in [(120, 45), (30, 12), (4, 4)] {
            let mut terminal =
                Terminal::new(TestBackend::new(width, height)).expect("test backend");
            terminal
                .draw(|frame| render(frame, &state))
                .expect("draw should succeed");
        }
    }

    #[test]
    fn head_body_and_tail_get_distinct_glyphs() {
        let mut state = GameState::new(GameConfig::default()).expect("default config is valid");
        state.apply(GameEvent::Start, &mut StdRng::seed_from_u64(3));
        state
            .set_board(
                Snake::from_segments(vec![
                    Position::new(5, 7),
                    Position::new(5, 6),
                    Position::new(5, 5),
                ]),
                Some(Position::new(9, 9)),
            )
            .expect("board is valid");

        let mut terminal = Terminal::new(TestBackend::new(120, 45)).expect("test backend");
        terminal
            .draw(|frame| render(frame, &state))
            .expect("draw should succeed");

        let count = |symbol: &str| {
            terminal
                .backend()
                .buffer()
                .content()
                .iter()
                .filter(|cell| cell.symbol() == symbol)
                .count()
        };
        assert_eq!(count("█"), 2);
        assert_eq!(count("▓"), 2);
        assert_eq!(count("░"), 2);
    }
}
