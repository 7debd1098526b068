use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::food::place_food;
use crate::grid::{Cell, Grid, Position};
use crate::input::Direction;
use crate::snake::Snake;

/// Terminal outcome of a movement step.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collision {
    /// The head left the board.
    Wall,
    /// The head ran into a cell already labeled as snake.
    #[serde(rename = "self")]
    SelfBody,
}

/// Successful movement step.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Advance {
    Moved,
    /// Food was eaten; carries the replacement food cell, if the board had room.
    Ate { next_food: Option<Position> },
}

/// Moves the snake one cell in `direction`, updating `grid` and `body`.
///
/// Collisions are detected before anything is written, so on `Err` both the
/// grid and the body are exactly as they were.
pub fn advance<R: Rng + ?Sized>(
    rng: &mut R,
    grid: &mut Grid,
    body: &mut Snake,
    direction: Direction,
) -> Result<Advance, Collision> {
    let new_head = body.head().offset(direction.delta());

    // Must precede every grid lookup below.
    if !grid.contains(new_head) {
        return Err(Collision::Wall);
    }

    let target = grid.get(new_head);
    if target == Cell::Snake {
        return Err(Collision::SelfBody);
    }

    body.push_head(new_head);

    let outcome = if target == Cell::Food {
        let next_food = place_food(rng, grid.size(), body);
        if let Some(food) = next_food {
            grid.set(food, Cell::Food);
        }
        Advance::Ate { next_food }
    } else {
        if let Some(tail) = body.pop_tail() {
            grid.set(tail, Cell::Empty);
        }
        Advance::Moved
    };

    grid.set(new_head, Cell::Snake);
    Ok(outcome)
}
