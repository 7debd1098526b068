use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::{Deserialize, Serialize};

use crate::game::{GameEvent, GameStatus};

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Right,
    Left,
    Down,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Left, Self::Down];

    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit step in grid coordinates; `y` grows downwards.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Left => (-1, 0),
            Self::Down => (0, 1),
        }
    }
}

/// High-level input events produced by the key mapping.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    /// Start from the title screen, resume from suspension, or play again.
    Confirm,
    /// Suspend a running game, or resume a suspended one.
    Pause,
    Restart,
    Difficulty(u8),
    Quit,
}

impl GameInput {
    /// Resolves this input into the game event it means in `status`.
    ///
    /// `Quit` and inputs with no meaning in `status` resolve to `None`.
    #[must_use]
    pub fn event_for(self, status: GameStatus) -> Option<GameEvent> {
        match (self, status) {
            (Self::Direction(direction), _) => Some(GameEvent::ChangeDirection(direction)),
            (Self::Confirm, GameStatus::Init) => Some(GameEvent::Start),
            (Self::Confirm | Self::Pause, GameStatus::Suspended) => Some(GameEvent::Resume),
            (Self::Confirm, GameStatus::GameOver) | (Self::Restart, _) => {
                Some(GameEvent::Restart)
            }
            (Self::Pause, GameStatus::Playing) => Some(GameEvent::Stop),
            (Self::Difficulty(level), _) => Some(GameEvent::SetDifficulty(level)),
            _ => None,
        }
    }
}

/// Decides whether a requested direction replaces the current one.
///
/// Returns `None` when the game is not running or the request would reverse
/// the snake in place. The accepted direction is used by the next tick.
#[must_use]
pub fn request_direction_change(
    current: Direction,
    requested: Direction,
    status: GameStatus,
) -> Option<Direction> {
    if status != GameStatus::Playing {
        return None;
    }

    if requested == current.opposite() {
        return None;
    }

    Some(requested)
}

/// Translates a terminal key event into a game input.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<GameInput> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(GameInput::Quit);
    }

    let input = match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W' | 'k') => GameInput::Direction(Direction::Up),
        KeyCode::Down | KeyCode::Char('s' | 'S' | 'j') => GameInput::Direction(Direction::Down),
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h') => GameInput::Direction(Direction::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l') => GameInput::Direction(Direction::Right),
        KeyCode::Enter | KeyCode::Char(' ') => GameInput::Confirm,
        KeyCode::Char('p' | 'P') => GameInput::Pause,
        KeyCode::Char('r' | 'R') => GameInput::Restart,
        KeyCode::Char(digit @ '1'..='9') => {
            let level = digit.to_digit(10)?;
            GameInput::Difficulty(u8::try_from(level).ok()?)
        }
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => GameInput::Quit,
        _ => return None,
    };

    Some(input)
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    use super::{map_key, request_direction_change, Direction, GameInput};
    use crate::game::{GameEvent, GameStatus};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn opposite_direction_is_correct() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);

        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }

    #[test]
    fn opposite_deltas_cancel_out() {
        for direction in Direction::ALL {
            let (dx, dy) = direction.delta();
            let (ox, oy) = direction.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
            assert_eq!(dx.abs() + dy.abs(), 1);
        }
    }

    #[test]
    fn direction_change_rejects_reverse() {
        for direction in Direction::ALL {
            assert_eq!(
                request_direction_change(direction, direction.opposite(), GameStatus::Playing),
                None
            );
        }

        assert_eq!(
            request_direction_change(Direction::Up, Direction::Left, GameStatus::Playing),
            Some(Direction::Left)
        );
        assert_eq!(
            request_direction_change(Direction::Up, Direction::Up, GameStatus::Playing),
            Some(Direction::Up)
        );
    }

    #[test]
    fn direction_change_ignored_unless_playing() {
        for status in [GameStatus::Init, GameStatus::Suspended, GameStatus::GameOver] {
            assert_eq!(
                request_direction_change(Direction::Up, Direction::Left, status),
                None
            );
        }
    }

    #[test]
    fn arrow_keys_and_wasd_map_to_directions() {
        assert_eq!(
            map_key(press(KeyCode::Up)),
            Some(GameInput::Direction(Direction::Up))
        );
        assert_eq!(
            map_key(press(KeyCode::Left)),
            Some(GameInput::Direction(Direction::Left))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('s'))),
            Some(GameInput::Direction(Direction::Down))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('D'))),
            Some(GameInput::Direction(Direction::Right))
        );
    }

    #[test]
    fn control_keys_map_to_commands() {
        assert_eq!(map_key(press(KeyCode::Enter)), Some(GameInput::Confirm));
        assert_eq!(map_key(press(KeyCode::Char('p'))), Some(GameInput::Pause));
        assert_eq!(map_key(press(KeyCode::Char('r'))), Some(GameInput::Restart));
        assert_eq!(
            map_key(press(KeyCode::Char('4'))),
            Some(GameInput::Difficulty(4))
        );
        assert_eq!(map_key(press(KeyCode::Esc)), Some(GameInput::Quit));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(GameInput::Quit)
        );
    }

    #[test]
    fn unrecognized_and_released_keys_are_ignored() {
        assert_eq!(map_key(press(KeyCode::Char('x'))), None);
        assert_eq!(map_key(press(KeyCode::Char('0'))), None);
        assert_eq!(map_key(press(KeyCode::Tab)), None);

        let release = KeyEvent {
            code: KeyCode::Up,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_key(release), None);
    }

    #[test]
    fn confirm_and_pause_depend_on_status() {
        assert_eq!(
            GameInput::Confirm.event_for(GameStatus::Init),
            Some(GameEvent::Start)
        );
        assert_eq!(GameInput::Confirm.event_for(GameStatus::Playing), None);
        assert_eq!(
            GameInput::Confirm.event_for(GameStatus::Suspended),
            Some(GameEvent::Resume)
        );
        assert_eq!(
            GameInput::Confirm.event_for(GameStatus::GameOver),
            Some(GameEvent::Restart)
        );

        assert_eq!(
            GameInput::Pause.event_for(GameStatus::Playing),
            Some(GameEvent::Stop)
        );
        assert_eq!(
            GameInput::Pause.event_for(GameStatus::Suspended),
            Some(GameEvent::Resume)
        );
        assert_eq!(GameInput::Pause.event_for(GameStatus::Init), None);
        assert_eq!(GameInput::Quit.event_for(GameStatus::Playing), None);
    }

    #[test]
    fn commands_pass_through_to_the_state_machine() {
        assert_eq!(
            GameInput::Restart.event_for(GameStatus::Playing),
            Some(GameEvent::Restart)
        );
        assert_eq!(
            GameInput::Difficulty(2).event_for(GameStatus::Init),
            Some(GameEvent::SetDifficulty(2))
        );
        assert_eq!(
            GameInput::Direction(Direction::Left).event_for(GameStatus::Init),
            Some(GameEvent::ChangeDirection(Direction::Left))
        );
    }
}
