//! Picks a move for the Toe-Tac-Tic position in `BOARD_FILE` with UCT search.
//!
//! The chosen move is printed to stdout. If the game is already over, prints
//! `RESIGN` instead and exits with a failure status. Diagnostics go to stderr:
//! their verbosity is set by `--log-level` unless `RUST_LOG` is present.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use uct_agent::games::toetactic::Board;
use uct_agent::{GameState, SearchConfig, Searcher};

/// Board game agent picking moves with UCT Monte Carlo Tree Search.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// File with the position: three rows of `X`, `O` or `.` followed by the
    /// side to move.
    board_file: PathBuf,
    /// Thinking time in minutes. Zero runs a single iteration.
    time_limit_minutes: u64,
    /// Seed for the random number generator, for reproducible searches.
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many iterations even if there is time left.
    #[arg(long)]
    iterations: Option<u64>,
    /// Score random playouts longer than this many moves as draws.
    #[arg(long)]
    max_rollout_plies: Option<u32>,
    /// Log verbosity used when `RUST_LOG` is not set.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn search_config(&self) -> SearchConfig {
        let mut config = SearchConfig::from_minutes(self.time_limit_minutes);
        if let Some(iterations) = self.iterations {
            config = config.with_iterations(iterations);
        }
        if let Some(plies) = self.max_rollout_plies {
            config = config.with_max_rollout_plies(plies);
        }
        config
    }
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_tracing(&args.log_level);
    info!(version = %uct_agent::engine_version(), "Starting");

    let input = std::fs::read_to_string(&args.board_file)
        .with_context(|| format!("failed to read {}", args.board_file.display()))?;
    let board = Board::try_from(input.as_str())
        .with_context(|| format!("invalid board in {}", args.board_file.display()))?;

    if let Some(terminal) = board.terminal() {
        eprintln!("the game is already over: {terminal}");
        println!("RESIGN");
        return Ok(ExitCode::FAILURE);
    }

    let config = args.search_config();
    info!(
        time_limit = ?config.time_limit,
        max_iterations = ?config.max_iterations,
        seed = ?args.seed,
        "Searching"
    );
    let result = match args.seed {
        Some(seed) => Searcher::seeded(config, seed).search(&board),
        None => Searcher::new(config).search(&board),
    }?;
    info!(
        iterations = result.iterations,
        nodes = result.nodes,
        elapsed = ?result.elapsed,
        "Best move {}",
        result.best_move
    );

    println!("{}", result.best_move);
    Ok(ExitCode::SUCCESS)
}
