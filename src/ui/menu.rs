use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};
use ratatui::Frame;

use crate::game::GameState;
use crate::movement::Collision;

/// Draws the start screen as a centered popup.
pub fn render_start_menu(frame: &mut Frame<'_>, area: Rect, state: &GameState) {
    let popup = centered_popup(area, 60, 40);
    frame.render_widget(Clear, popup);

    let [title_row, body_row] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(3)]).areas(popup);

    frame.render_widget(
        Paragraph::new(Line::from("SNAKE"))
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        title_row,
    );

    let body = vec![
        Line::from(format!(
            "Difficulty {} of {} ({} ms per move)",
            state.difficulty(),
            state.config().difficulty_levels(),
            state.tick_interval().as_millis()
        )),
        Line::from(""),
        Line::from("[Enter]/[Space] Start"),
        Line::from(format!("[1]-[{}] Difficulty", state.config().difficulty_levels())),
        Line::from("[Q]/[Esc] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" start ")),
        body_row,
    );
}

/// Draws the suspended screen as a centered popup.
pub fn render_suspended_menu(frame: &mut Frame<'_>, area: Rect) {
    let popup = centered_popup(area, 50, 30);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("SUSPENDED"),
        Line::from(""),
        Line::from("[P]/[Enter] Resume"),
        Line::from("[R] Restart"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" suspended ")),
        popup,
    );
}

/// Draws the game-over screen as a centered popup.
pub fn render_game_over_menu(frame: &mut Frame<'_>, area: Rect, state: &GameState) {
    let popup = centered_popup(area, 60, 35);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::styled("GAME OVER", Style::default().fg(Color::Red)),
        Line::from(""),
        Line::from(format!("Length: {}", state.snake().len())),
        Line::from(collision_text(state.collision())),
        Line::from(""),
        Line::from("[Enter]/[R] Play Again"),
        Line::from("[Q]/[Esc] Quit"),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" game over ")),
        popup,
    );
}

fn collision_text(collision: Option<Collision>) -> &'static str {
    match collision {
        Some(Collision::Wall) => "Cause: hit wall",
        Some(Collision::SelfBody) => "Cause: hit yourself",
        None => "",
    }
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
