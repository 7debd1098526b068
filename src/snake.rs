use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::grid::Position;

/// Ordered snake body, head first and tail last.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SnakeBody")]
pub struct Snake {
    body: VecDeque<Position>,
}

#[derive(Deserialize)]
struct SnakeBody {
    body: VecDeque<Position>,
}

impl TryFrom<SnakeBody> for Snake {
    type Error = StateError;

    fn try_from(raw: SnakeBody) -> Result<Self, Self::Error> {
        if raw.body.is_empty() {
            return Err(StateError::EmptyBody);
        }

        let snake = Self { body: raw.body };
        if !snake.is_contiguous() {
            return Err(StateError::BrokenBody);
        }
        Ok(snake)
    }
}

impl Snake {
    /// Creates a one-cell snake at `start`.
    #[must_use]
    pub fn new(start: Position) -> Self {
        let mut body = VecDeque::new();
        body.push_front(start);

        Self { body }
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>) -> Self {
        assert!(!segments.is_empty(), "snake body needs at least one segment");

        Self {
            body: VecDeque::from(segments),
        }
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Returns the current tail position.
    #[must_use]
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub(crate) fn push_head(&mut self, position: Position) {
        self.body.push_front(position);
    }

    pub(crate) fn pop_tail(&mut self) -> Option<Position> {
        if self.body.len() == 1 {
            return None;
        }
        self.body.pop_back()
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; every constructor and deserialization keeps the head.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &Position> {
        self.body.iter()
    }

    /// Returns true when every pair of neighbouring segments is one step apart.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.body
            .iter()
            .zip(self.body.iter().skip(1))
            .all(|(a, b)| a.manhattan(*b) == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::Snake;
    use crate::grid::Position;

    #[test]
    fn new_snake_is_a_single_segment() {
        let snake = Snake::new(Position::new(17, 17));

        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), snake.tail());
        assert!(snake.is_contiguous());
    }

    #[test]
    fn head_and_tail_follow_segment_order() {
        let snake = Snake::from_segments(vec![
            Position::new(5, 5),
            Position::new(4, 5),
            Position::new(4, 4),
        ]);

        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.tail(), Position::new(4, 4));
        assert!(snake.occupies(Position::new(4, 5)));
        assert!(!snake.occupies(Position::new(6, 5)));
    }

    #[test]
    fn last_segment_is_never_popped() {
        let mut snake = Snake::new(Position::new(1, 1));

        assert_eq!(snake.pop_tail(), None);
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn deserializing_rejects_empty_and_broken_bodies() {
        let empty = serde_json::json!({ "body": [] });
        assert!(serde_json::from_value::<Snake>(empty).is_err());

        let gap = serde_json::json!({ "body": [{ "x": 0, "y": 0 }, { "x": 2, "y": 0 }] });
        assert!(serde_json::from_value::<Snake>(gap).is_err());

        let ok = serde_json::json!({ "body": [{ "x": 1, "y": 0 }, { "x": 0, "y": 0 }] });
        let snake: Snake = serde_json::from_value(ok).expect("contiguous body should load");
        assert_eq!(snake.tail(), Position::new(0, 0));
    }

    #[test]
    fn gaps_break_contiguity() {
        let snake = Snake::from_segments(vec![Position::new(0, 0), Position::new(2, 0)]);

        assert!(!snake.is_contiguous());
    }
}
