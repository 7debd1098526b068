use log::warn;
use rand::Rng;

use crate::grid::Position;
use crate::snake::Snake;

/// Random draws allowed per board cell before falling back to a free-cell scan.
pub const MAX_FOOD_SAMPLES_PER_CELL: usize = 4;

/// Picks a uniformly random cell that no segment of `body` occupies.
///
/// Samples the whole board and rejects occupied cells. Rejection sampling is
/// bounded so a nearly full board cannot stall a tick; once the budget is
/// spent the free cells are enumerated and one is drawn from them. Returns
/// `None` only when `body` covers every cell.
#[must_use]
pub fn place_food<R: Rng + ?Sized>(rng: &mut R, grid_size: u16, body: &Snake) -> Option<Position> {
    let cells = usize::from(grid_size) * usize::from(grid_size);
    if cells == 0 || body.len() >= cells {
        return None;
    }

    let side = i32::from(grid_size);
    for _ in 0..cells * MAX_FOOD_SAMPLES_PER_CELL {
        let candidate = Position {
            x: rng.gen_range(0..side),
            y: rng.gen_range(0..side),
        };
        if !body.occupies(candidate) {
            return Some(candidate);
        }
    }

    warn!(
        "food sampling exhausted after {} draws, scanning free cells (body length {})",
        cells * MAX_FOOD_SAMPLES_PER_CELL,
        body.len()
    );
    free_cell(rng, grid_size, body)
}

fn free_cell<R: Rng + ?Sized>(rng: &mut R, grid_size: u16, body: &Snake) -> Option<Position> {
    let mut candidates = Vec::new();

    for y in 0..i32::from(grid_size) {
        for x in 0..i32::from(grid_size) {
            let position = Position { x, y };
            if !body.occupies(position) {
                candidates.push(position);
            }
        }
    }

    if candidates.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}
