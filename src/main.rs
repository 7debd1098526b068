use std::fs::File;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use crossterm::event::{self, Event};
use grid_snake::config::{GameConfig, FRAME_INTERVAL};
use grid_snake::game::Game;
use grid_snake::input::{map_key, GameInput};
use grid_snake::renderer;
use grid_snake::scheduler::{IntervalScheduler, Scheduler};
use grid_snake::terminal_runtime::{install_panic_hook, TerminalSession};
use log::{info, LevelFilter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simplelog::{Config, WriteLogger};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON config file; defaults to the per-user config when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Starting difficulty level (1 is slowest).
    #[arg(long)]
    difficulty: Option<u8>,

    /// Seed for food placement, for reproducible games.
    #[arg(long)]
    seed: Option<u64>,

    /// Write a log to this file.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Log level used with `--log-file`.
    #[arg(long = "log-level", default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        WriteLogger::init(cli.log_level, Config::default(), File::create(path)?)
            .map_err(io::Error::other)?;
    }

    let config = load_config(&cli)?;
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let game = Game::new(config, IntervalScheduler::system(), rng)?;
    info!(
        "starting {}x{} game at difficulty {}",
        game.state().grid().size(),
        game.state().grid().size(),
        game.state().difficulty()
    );

    install_panic_hook();
    let mut session = TerminalSession::enter()?;
    run(&mut session, game)
}

fn load_config(cli: &Cli) -> io::Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::load_or_default()?,
    };

    if let Some(level) = cli.difficulty {
        if !config.is_valid_difficulty(level) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "difficulty must be within 1..={}, got {level}",
                    config.difficulty_levels()
                ),
            ));
        }
        config.default_difficulty = level;
    }

    Ok(config)
}

fn run<S: Scheduler, R: Rng>(
    session: &mut TerminalSession,
    mut game: Game<S, R>,
) -> io::Result<()> {
    loop {
        session
            .terminal_mut()
            .draw(|frame| renderer::render(frame, game.state()))?;

        if event::poll(FRAME_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                match map_key(key) {
                    Some(GameInput::Quit) => break,
                    Some(input) => {
                        if let Some(game_event) = input.event_for(game.state().status()) {
                            game.dispatch(game_event);
                        }
                    }
                    None => {}
                }
            }
        }

        game.pump();
    }

    info!(
        "quit with status {:?} and length {}",
        game.state().status(),
        game.state().snake().len()
    );
    Ok(())
}
