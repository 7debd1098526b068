use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid::Position;

const APP_DIR_NAME: &str = "grid-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Side length of the square board.
pub const DEFAULT_GRID_SIZE: u16 = 35;

/// Largest accepted board side; bigger boards cannot be drawn or scanned
/// in reasonable time.
pub const MAX_GRID_SIZE: u16 = 256;

/// Where the snake starts on every new game.
pub const DEFAULT_INITIAL_SNAKE: Position = Position { x: 17, y: 17 };

/// Where the first food cell sits on every new game.
pub const DEFAULT_INITIAL_FOOD: Position = Position { x: 9, y: 9 };

/// Tick interval in milliseconds per difficulty level, slowest first.
pub const DEFAULT_DIFFICULTY_INTERVALS_MS: [u64; 5] = [1000, 500, 100, 50, 10];

/// One-based difficulty selected when nothing else is configured.
pub const DEFAULT_DIFFICULTY: u8 = 3;

/// Construction-time game configuration.
///
/// Fields missing from a config file fall back to the defaults above.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub grid_size: u16,
    pub initial_snake: Position,
    pub initial_food: Position,
    pub difficulty_intervals_ms: Vec<u64>,
    pub default_difficulty: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            initial_snake: DEFAULT_INITIAL_SNAKE,
            initial_food: DEFAULT_INITIAL_FOOD,
            difficulty_intervals_ms: DEFAULT_DIFFICULTY_INTERVALS_MS.to_vec(),
            default_difficulty: DEFAULT_DIFFICULTY,
        }
    }
}

impl GameConfig {
    /// Checks the invariants the game state relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(ConfigError::invalid(format!(
                "grid_size must be within 2..={MAX_GRID_SIZE}, got {}",
                self.grid_size
            )));
        }

        if !self.initial_snake.is_within(self.grid_size) {
            return Err(ConfigError::invalid(format!(
                "initial_snake ({}, {}) is outside the {n}x{n} grid",
                self.initial_snake.x,
                self.initial_snake.y,
                n = self.grid_size,
            )));
        }

        if !self.initial_food.is_within(self.grid_size) {
            return Err(ConfigError::invalid(format!(
                "initial_food ({}, {}) is outside the {n}x{n} grid",
                self.initial_food.x,
                self.initial_food.y,
                n = self.grid_size,
            )));
        }

        if self.initial_food == self.initial_snake {
            return Err(ConfigError::invalid(
                "initial_food must not coincide with initial_snake",
            ));
        }

        if self.difficulty_intervals_ms.is_empty() {
            return Err(ConfigError::invalid(
                "difficulty_intervals_ms needs at least one level",
            ));
        }

        if self.difficulty_intervals_ms.contains(&0) {
            return Err(ConfigError::invalid(
                "difficulty_intervals_ms must all be greater than zero",
            ));
        }

        if !self.is_valid_difficulty(self.default_difficulty) {
            return Err(ConfigError::invalid(format!(
                "default_difficulty must be within 1..={}, got {}",
                self.difficulty_levels(),
                self.default_difficulty
            )));
        }

        Ok(())
    }

    /// Number of selectable difficulty levels.
    #[must_use]
    pub fn difficulty_levels(&self) -> usize {
        self.difficulty_intervals_ms.len()
    }

    #[must_use]
    pub fn is_valid_difficulty(&self, level: u8) -> bool {
        level >= 1 && usize::from(level) <= self.difficulty_levels()
    }

    /// Tick interval for a one-based difficulty level.
    #[must_use]
    pub fn tick_interval(&self, level: u8) -> Option<Duration> {
        if !self.is_valid_difficulty(level) {
            return None;
        }
        self.difficulty_intervals_ms
            .get(usize::from(level) - 1)
            .copied()
            .map(Duration::from_millis)
    }

    /// Reads and validates a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &raw)
    }

    /// Loads the per-user config file when present, defaults otherwise.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = config_path();
        match fs::read_to_string(&path) {
            Ok(raw) => Self::from_json(&path, &raw),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io { path, source }),
        }
    }

    fn from_json(path: &Path, raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// Returns the platform-correct per-user config file path.
#[must_use]
pub fn config_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    base
}

/// Frame poll interval for the terminal loop.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub const COLOR_SNAKE_HEAD: Color = Color::White;
pub const COLOR_SNAKE_BODY: Color = Color::Green;
pub const COLOR_FOOD: Color = Color::Red;
pub const COLOR_EMPTY: Color = Color::DarkGray;
pub const COLOR_BORDER: Color = Color::Gray;

/// Two terminal columns per cell keep the board roughly square.
pub const GLYPH_SNAKE_HEAD: &str = "██";
pub const GLYPH_SNAKE_BODY: &str = "▓▓";
pub const GLYPH_SNAKE_TAIL: &str = "░░";
pub const GLYPH_FOOD: &str = "()";
pub const GLYPH_EMPTY: &str = " ·";
