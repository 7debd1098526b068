use std::collections::HashSet;
use std::time::Duration;

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{GameConfig, DEFAULT_DIFFICULTY_INTERVALS_MS};
use crate::error::{ConfigError, StateError};
use crate::grid::{Cell, Grid, Position};
use crate::input::{request_direction_change, Direction};
use crate::movement::{advance, Advance, Collision};
use crate::scheduler::{Scheduler, TimerHandle};
use crate::snake::Snake;

/// Direction the snake faces at the start of every game.
pub const INITIAL_DIRECTION: Direction = Direction::Up;

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Init,
    Playing,
    Suspended,
    GameOver,
}

/// Everything that can happen to a game.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameEvent {
    Start,
    Stop,
    Resume,
    Restart,
    Tick,
    ChangeDirection(Direction),
    SetDifficulty(u8),
}

/// What the owner of the tick source must do after an event.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TimerCommand {
    Keep,
    /// Cancel the running timer and install one at this interval.
    Reinstall(Duration),
}

/// Complete state for one session.
///
/// Snapshots are checked on deserialization: the config must validate, the
/// difficulty must be a configured level and the grid must agree with the
/// snake body.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GameSnapshot")]
pub struct GameState {
    status: GameStatus,
    difficulty: u8,
    tick_count: u64,
    direction: Direction,
    grid: Grid,
    snake: Snake,
    collision: Option<Collision>,
    config: GameConfig,
}

#[derive(Deserialize)]
struct GameSnapshot {
    status: GameStatus,
    difficulty: u8,
    tick_count: u64,
    direction: Direction,
    grid: Grid,
    snake: Snake,
    collision: Option<Collision>,
    config: GameConfig,
}

impl TryFrom<GameSnapshot> for GameState {
    type Error = StateError;

    fn try_from(raw: GameSnapshot) -> Result<Self, Self::Error> {
        raw.config.validate()?;
        if !raw.config.is_valid_difficulty(raw.difficulty) {
            return Err(StateError::Difficulty(raw.difficulty));
        }
        if raw.grid.size() != raw.config.grid_size {
            return Err(StateError::GridSize {
                grid: raw.grid.size(),
                config: raw.config.grid_size,
            });
        }
        check_board(&raw.grid, &raw.snake)?;

        Ok(Self {
            status: raw.status,
            difficulty: raw.difficulty,
            tick_count: raw.tick_count,
            direction: raw.direction,
            grid: raw.grid,
            snake: raw.snake,
            collision: raw.collision,
            config: raw.config,
        })
    }
}

impl GameState {
    /// Builds a fresh game in `Init` from a validated config.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let difficulty = config.default_difficulty;
        let (grid, snake) = fresh_board(&config);

        Ok(Self {
            status: GameStatus::Init,
            difficulty,
            tick_count: 0,
            direction: INITIAL_DIRECTION,
            grid,
            snake,
            collision: None,
            config,
        })
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// One-based difficulty level.
    #[must_use]
    pub fn difficulty(&self) -> u8 {
        self.difficulty
    }

    /// Ticks delivered since the last (re)start, including non-moving ones.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    /// How the last game ended, while in `GameOver`.
    #[must_use]
    pub fn collision(&self) -> Option<Collision> {
        self.collision
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Tick interval for the selected difficulty.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        // `difficulty` is only ever set to a level the config accepts.
        self.config
            .tick_interval(self.difficulty)
            .unwrap_or(Duration::from_millis(DEFAULT_DIFFICULTY_INTERVALS_MS[0]))
    }

    /// Applies one event and reports what the tick source must do.
    pub fn apply<R: Rng + ?Sized>(&mut self, event: GameEvent, rng: &mut R) -> TimerCommand {
        match event {
            GameEvent::Tick => {
                self.tick(rng);
                TimerCommand::Keep
            }
            GameEvent::Start => self.start(),
            GameEvent::Stop => {
                self.stop();
                TimerCommand::Keep
            }
            GameEvent::Resume => {
                self.resume();
                TimerCommand::Keep
            }
            GameEvent::Restart => self.restart(),
            GameEvent::ChangeDirection(direction) => {
                self.change_direction(direction);
                TimerCommand::Keep
            }
            GameEvent::SetDifficulty(level) => {
                self.set_difficulty(level);
                TimerCommand::Keep
            }
        }
    }

    /// Replaces the board with `snake` and an optional single food cell.
    ///
    /// Used by scripted scenarios. The current board is kept when a position
    /// is off the board, the body has gaps or repeats, or `food` overlaps it.
    #[doc(hidden)]
    pub fn set_board(&mut self, snake: Snake, food: Option<Position>) -> Result<(), StateError> {
        let size = self.config.grid_size;
        if let Some(off) = snake
            .segments()
            .chain(food.as_ref())
            .find(|position| !position.is_within(size))
        {
            return Err(StateError::OffBoard { x: off.x, y: off.y });
        }
        if !snake.is_contiguous() {
            return Err(StateError::BrokenBody);
        }

        let mut grid = Grid::new(size, snake.head());
        for segment in snake.segments() {
            grid.set(*segment, Cell::Snake);
        }
        if let Some(food) = food {
            if snake.occupies(food) {
                return Err(StateError::GridMismatch);
            }
            grid.set(food, Cell::Food);
        }
        check_board(&grid, &snake)?;

        self.grid = grid;
        self.snake = snake;
        Ok(())
    }

    /// Forces the facing direction, bypassing the reversal rule.
    #[doc(hidden)]
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.tick_count += 1;

        if self.status != GameStatus::Playing {
            return;
        }

        match advance(rng, &mut self.grid, &mut self.snake, self.direction) {
            Ok(Advance::Moved) => {}
            Ok(Advance::Ate { next_food }) => {
                debug!(
                    "food eaten at tick {}, length {}, next food {:?}",
                    self.tick_count,
                    self.snake.len(),
                    next_food
                );
            }
            Err(collision) => {
                info!(
                    "game over: {collision:?} collision at tick {} with length {}",
                    self.tick_count,
                    self.snake.len()
                );
                self.status = GameStatus::GameOver;
                self.collision = Some(collision);
            }
        }
    }

    fn start(&mut self) -> TimerCommand {
        if self.status != GameStatus::Init {
            debug!("start ignored in {:?}", self.status);
            return TimerCommand::Keep;
        }

        self.status = GameStatus::Playing;
        info!("game started at difficulty {}", self.difficulty);
        TimerCommand::Reinstall(self.tick_interval())
    }

    fn stop(&mut self) {
        if self.status != GameStatus::Playing {
            debug!("stop ignored in {:?}", self.status);
            return;
        }

        self.status = GameStatus::Suspended;
        info!("game suspended at tick {}", self.tick_count);
    }

    fn resume(&mut self) {
        if self.status != GameStatus::Suspended {
            debug!("resume ignored in {:?}", self.status);
            return;
        }

        self.status = GameStatus::Playing;
        info!("game resumed at tick {}", self.tick_count);
    }

    fn restart(&mut self) -> TimerCommand {
        let (grid, snake) = fresh_board(&self.config);

        self.status = GameStatus::Init;
        self.direction = INITIAL_DIRECTION;
        self.tick_count = 0;
        self.grid = grid;
        self.snake = snake;
        self.collision = None;

        info!("game restarted");
        TimerCommand::Reinstall(self.tick_interval())
    }

    fn change_direction(&mut self, requested: Direction) {
        match request_direction_change(self.direction, requested, self.status) {
            Some(direction) => self.direction = direction,
            None => debug!(
                "direction {requested:?} ignored (facing {:?}, {:?})",
                self.direction, self.status
            ),
        }
    }

    fn set_difficulty(&mut self, level: u8) {
        if self.status != GameStatus::Init || !self.config.is_valid_difficulty(level) {
            debug!("difficulty {level} ignored in {:?}", self.status);
            return;
        }

        self.difficulty = level;
        info!("difficulty set to {level}");
    }
}

/// Checks that the snake lies on the board and that the grid labels exactly
/// its segments, with at most one food cell.
fn check_board(grid: &Grid, snake: &Snake) -> Result<(), StateError> {
    if let Some(off) = snake.segments().find(|segment| !grid.contains(**segment)) {
        return Err(StateError::OffBoard { x: off.x, y: off.y });
    }

    let body: HashSet<Position> = snake.segments().copied().collect();
    let labeled: HashSet<Position> = grid.positions_of(Cell::Snake).collect();
    if body.len() != snake.len() || body != labeled {
        return Err(StateError::GridMismatch);
    }

    match grid.count(Cell::Food) {
        0 | 1 => Ok(()),
        n => Err(StateError::TooMuchFood(n)),
    }
}

fn fresh_board(config: &GameConfig) -> (Grid, Snake) {
    let mut grid = Grid::new(config.grid_size, config.initial_snake);
    grid.set(config.initial_food, Cell::Food);
    (grid, Snake::new(config.initial_snake))
}

/// Owns a [`GameState`] together with its tick source and randomness.
#[derive(Debug)]
pub struct Game<S: Scheduler, R: Rng> {
    state: GameState,
    scheduler: S,
    timer: TimerHandle,
    rng: R,
}

impl<S: Scheduler, R: Rng> Game<S, R> {
    /// Creates a game in `Init` and starts its timer.
    pub fn new(config: GameConfig, mut scheduler: S, rng: R) -> Result<Self, ConfigError> {
        let state = GameState::new(config)?;
        let timer = scheduler.schedule(state.tick_interval());

        Ok(Self {
            state,
            scheduler,
            timer,
            rng,
        })
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for scripted scenarios.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    #[must_use]
    pub fn timer(&self) -> TimerHandle {
        self.timer
    }

    /// Applies one event, swapping the timer when the transition asks for it.
    pub fn dispatch(&mut self, event: GameEvent) {
        if let TimerCommand::Reinstall(interval) = self.state.apply(event, &mut self.rng) {
            self.scheduler.cancel(self.timer);
            self.timer = self.scheduler.schedule(interval);
            debug!("tick timer reinstalled at {} ms", interval.as_millis());
        }
    }

    /// Delivers every tick the scheduler reports as fired. Returns how many.
    pub fn pump(&mut self) -> u32 {
        let fired = self.scheduler.poll();
        for _ in 0..fired {
            self.dispatch(GameEvent::Tick);
        }
        fired
    }

    pub fn start(&mut self) {
        self.dispatch(GameEvent::Start);
    }

    pub fn stop(&mut self) {
        self.dispatch(GameEvent::Stop);
    }

    pub fn resume(&mut self) {
        self.dispatch(GameEvent::Resume);
    }

    pub fn restart(&mut self) {
        self.dispatch(GameEvent::Restart);
    }

    pub fn set_difficulty(&mut self, level: u8) {
        self.dispatch(GameEvent::SetDifficulty(level));
    }

    pub fn change_direction(&mut self, direction: Direction) {
        self.dispatch(GameEvent::ChangeDirection(direction));
    }
}
