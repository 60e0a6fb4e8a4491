//! Grid Snake: a fixed-tick snake game on a walled grid, drawn in the terminal.

pub mod canvas;
pub mod config;
pub mod food;
pub mod game;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
