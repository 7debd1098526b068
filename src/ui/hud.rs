use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::game::{GameState, GameStatus};

/// Renders the status and key-help rows and returns the play area above them.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, state: &GameState) -> Rect {
    let [play_area, status_area, help_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(status_line(state)).alignment(Alignment::Center),
        status_area,
    );
    frame.render_widget(
        Paragraph::new(Line::from(help_text(state.status())))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        help_area,
    );

    play_area
}

fn status_line(state: &GameState) -> Line<'static> {
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

    Line::from(vec![
        Span::styled("Status ", label),
        Span::styled(status_label(state.status()), status_style(state.status())),
        Span::styled("  Difficulty ", label),
        Span::styled(
            format!(
                "{}/{} ({} ms)",
                state.difficulty(),
                state.config().difficulty_levels(),
                state.tick_interval().as_millis()
            ),
            value,
        ),
        Span::styled("  Length ", label),
        Span::styled(state.snake().len().to_string(), value),
    ])
}

fn status_label(status: GameStatus) -> &'static str {
    match status {
        GameStatus::Init => "ready",
        GameStatus::Playing => "playing",
        GameStatus::Suspended => "suspended",
        GameStatus::GameOver => "game over",
    }
}

fn status_style(status: GameStatus) -> Style {
    let color = match status {
        GameStatus::Init => Color::Cyan,
        GameStatus::Playing => Color::Green,
        GameStatus::Suspended => Color::Yellow,
        GameStatus::GameOver => Color::Red,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn help_text(status: GameStatus) -> &'static str {
    match status {
        GameStatus::Init => "[Enter] start  [1-9] difficulty  [Q] quit",
        GameStatus::Playing => "arrows/WASD move  [P] suspend  [R] restart  [Q] quit",
        GameStatus::Suspended => "[P]/[Enter] resume  [R] restart  [Q] quit",
        GameStatus::GameOver => "[Enter]/[R] restart  [Q] quit",
    }
}

#[cfg(test)]
mod tests {
    use super::{status_label, status_line};
    use crate::config::GameConfig;
    use crate::game::{GameState, GameStatus};

    #[test]
    fn status_line_shows_difficulty_and_length() {
        let state = GameState::new(GameConfig::default()).expect("default config is valid");

        let text: String = status_line(&state)
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect();

        assert!(text.contains("ready"));
        assert!(text.contains("3/5 (100 ms)"));
        assert!(text.contains("Length 1"));
    }

    #[test]
    fn every_status_has_a_label() {
        for status in [
            GameStatus::Init,
            GameStatus::Playing,
            GameStatus::Suspended,
            GameStatus::GameOver,
        ] {
            assert!(!status_label(status).is_empty());
        }
    }
}
