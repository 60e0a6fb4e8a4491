use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ratatui::style::Color;
use ratatui::symbols::border;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::{Direction, KeyMap};
use crate::snake::Point;

const USER_CONFIG_APP_DIR: &str = "grid-snake";
const USER_CONFIG_FILE_NAME: &str = "config.json";

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the number of playable cells, `(width - 1) * (height - 1)`.
    #[must_use]
    pub fn interior_cells(self) -> usize {
        usize::from(self.width.saturating_sub(1)) * usize::from(self.height.saturating_sub(1))
    }
}

/// Colors for every kind of thing drawn on screen.
#[derive(Debug)]
pub struct Theme {
    pub name: &'static str,
    pub snake: Color,
    pub pellet: Color,
    pub border_fg: Color,
    pub border_bg: Color,
    pub overlay_title: Color,
    pub overlay_footer: Color,
}

/// Orange snake, green pellets.
pub const THEME_CLASSIC: Theme = Theme {
    name: "Classic",
    snake: Color::Rgb(255, 165, 0),
    pellet: Color::Green,
    border_fg: Color::White,
    border_bg: Color::DarkGray,
    overlay_title: Color::Red,
    overlay_footer: Color::DarkGray,
};

/// Half-block border set: solid side faces the play area.
pub const BORDER_HALF_BLOCK: border::Set = border::Set {
    top_left: "▄",
    top_right: "▄",
    bottom_left: "▀",
    bottom_right: "▀",
    vertical_left: "█",
    vertical_right: "█",
    horizontal_top: "▄",
    horizontal_bottom: "▀",
};

/// Glyph drawn for every occupied cell.
pub const GLYPH_CIRCLE: &str = "●";

/// Terminal columns per grid cell; two columns make a cell roughly square.
pub const DEFAULT_CELL_WIDTH: u16 = 2;

pub const DEFAULT_GRID_WIDTH: u16 = 30;

pub const DEFAULT_GRID_HEIGHT: u16 = 30;

/// Tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 400;

/// Pellets kept on the board.
pub const DEFAULT_FOOD_TARGET: usize = 3;

/// Segments owed per pellet eaten.
pub const DEFAULT_GROWTH_PER_PELLET: u32 = 2;

/// Largest accepted grid side.
pub const MAX_GRID_SIDE: u16 = 512;

/// Largest accepted cell width in terminal columns.
pub const MAX_CELL_WIDTH: u16 = 8;

/// Largest accepted growth per pellet.
pub const MAX_GROWTH_PER_PELLET: u32 = 1024;

pub const DEFAULT_START: Point = Point { x: 20, y: 20 };

pub const DEFAULT_START_DIRECTION: Direction = Direction::Right;

/// Errors raised while loading or validating a [`GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("grid {width}x{height} is too small; both sides must be at least 3")]
    GridTooSmall { width: u16, height: u16 },
    #[error("grid {width}x{height} is too large; both sides must be at most {MAX_GRID_SIDE}")]
    GridTooLarge { width: u16, height: u16 },
    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,
    #[error("cell width must be greater than zero")]
    ZeroCellWidth,
    #[error("cell width {0} is too large; it must be at most {MAX_CELL_WIDTH}")]
    CellWidthTooLarge(u16),
    #[error("food target {target} exceeds the {cells} playable cells")]
    TooMuchFood { target: usize, cells: usize },
    #[error("growth per pellet {0} is too large; it must be at most {MAX_GROWTH_PER_PELLET}")]
    GrowthTooLarge(u32),
    #[error("start point ({x}, {y}) is outside the playable area")]
    StartOutOfBounds { x: i32, y: i32 },
    #[error("keymap must bind at least one key")]
    EmptyKeymap,
}

/// Startup configuration. Every field falls back to its default when absent.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub cell_width: u16,
    pub grid_width: u16,
    pub grid_height: u16,
    pub tick_interval_ms: u64,
    pub food_target: usize,
    pub growth_per_pellet: u32,
    pub start: Point,
    pub start_direction: Direction,
    pub keymap: KeyMap,
    /// Spawn pellets only on cells free of snake and other pellets.
    pub avoid_occupied_cells: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cell_width: DEFAULT_CELL_WIDTH,
            grid_width: DEFAULT_GRID_WIDTH,
            grid_height: DEFAULT_GRID_HEIGHT,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            food_target: DEFAULT_FOOD_TARGET,
            growth_per_pellet: DEFAULT_GROWTH_PER_PELLET,
            start: DEFAULT_START,
            start_direction: DEFAULT_START_DIRECTION,
            keymap: KeyMap::default(),
            avoid_occupied_cells: false,
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn grid(&self) -> GridSize {
        GridSize {
            width: self.grid_width,
            height: self.grid_height,
        }
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Checks the invariants the game relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width < 3 || self.grid_height < 3 {
            return Err(ConfigError::GridTooSmall {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if self.grid_width > MAX_GRID_SIDE || self.grid_height > MAX_GRID_SIDE {
            return Err(ConfigError::GridTooLarge {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.cell_width == 0 {
            return Err(ConfigError::ZeroCellWidth);
        }
        if self.cell_width > MAX_CELL_WIDTH {
            return Err(ConfigError::CellWidthTooLarge(self.cell_width));
        }
        let cells = self.grid().interior_cells();
        if self.food_target > cells {
            return Err(ConfigError::TooMuchFood {
                target: self.food_target,
                cells,
            });
        }
        if self.growth_per_pellet > MAX_GROWTH_PER_PELLET {
            return Err(ConfigError::GrowthTooLarge(self.growth_per_pellet));
        }
        if self.start.is_out_of_bound(self.grid()) {
            return Err(ConfigError::StartOutOfBounds {
                x: self.start.x,
                y: self.start.y,
            });
        }
        if self.keymap.is_empty() {
            return Err(ConfigError::EmptyKeymap);
        }

        Ok(())
    }

    /// Reads and validates a JSON config file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = serde_json::from_str::<Self>(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        Ok(config)
    }

    /// Loads `explicit` when given, else the per-user file when it exists, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }

        match user_config_path() {
            Some(path) if path.is_file() => Self::load_from_path(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// Returns the per-user config file location.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(USER_CONFIG_APP_DIR).join(USER_CONFIG_FILE_NAME))
}
