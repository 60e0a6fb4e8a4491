use std::io;
use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use grid_snake::canvas::CellCanvas;
use grid_snake::config::{ConfigError, GameConfig};
use grid_snake::game::{Game, GameStatus, TickOutcome};
use grid_snake::input::{poll_input, InputEvent};
use grid_snake::logging;
use grid_snake::terminal_runtime::{restore_terminal, TerminalSession};
use thiserror::Error;
use tracing::{error, info};

/// How long to wait for input once the game has stopped.
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON config file; defaults to the per-user config when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for pellet placement, for reproducible games.
    #[arg(long)]
    seed: Option<u64>,

    /// Log file path.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match start(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, "exiting with error");
            eprintln!("grid-snake: {error}");
            ExitCode::FAILURE
        }
    }
}

fn start(cli: Cli) -> Result<(), AppError> {
    let log_path = cli.log_file.clone().unwrap_or_else(logging::default_log_path);
    logging::init_or_warn(&log_path);

    let config = GameConfig::load(cli.config.as_deref())?;
    info!(?config, "configuration loaded");

    install_panic_hook();
    run(&config, cli.seed)?;
    Ok(())
}

fn run(config: &GameConfig, seed: Option<u64>) -> io::Result<()> {
    let canvas = CellCanvas::new(config.grid(), config.cell_width);
    let mut game = match seed {
        Some(seed) => Game::with_seed(config, canvas, seed),
        None => Game::new(config, canvas),
    };

    let mut session = TerminalSession::enter()?;
    game.play(Instant::now());

    loop {
        session.draw(&game)?;

        let timeout = game
            .timer()
            .time_until_next(Instant::now())
            .unwrap_or(IDLE_POLL_INTERVAL);

        match poll_input(timeout)? {
            Some(InputEvent::Quit) => break,
            Some(InputEvent::Key(key)) => game.handle_key(&key),
            None => {}
        }

        if let Some(TickOutcome::Collided(reason)) = game.poll(Instant::now()) {
            info!(?reason, "waiting for quit key");
        }
    }

    if game.status() == GameStatus::Running {
        info!(ticks = game.tick_count(), "quit while running");
    }

    Ok(())
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        error!(%panic_info, "panicked");
        default_hook(panic_info);
    }));
}
