//! [Monte Carlo Tree Search] with the UCT selection policy.
//!
//! Every iteration runs four phases on a fresh copy of the root position:
//!
//! 1. Selection: descend from the root, picking children by UCB1.
//! 2. Expansion: attach one child for a move that was never tried.
//! 3. Simulation: play uniformly random moves until the game is over.
//! 4. Backpropagation: record the outcome on the path back to the root.
//!
//! Iterations run back to back until the time budget (or the optional
//! iteration cap) is exhausted. The limits are only checked between
//! iterations and at least one iteration always runs. The final move is the
//! most visited child of the root (Robust Child).
//!
//! [Monte Carlo Tree Search]: https://en.wikipedia.org/wiki/Monte_Carlo_tree_search

use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::environment::{GameState, Terminal};

mod mcts;
pub mod policy;
pub mod tree;

use tree::Tree;

/// Errors that can occur during the search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The search can only start from a position where the game goes on.
    #[error("search started from a terminal position: {0}")]
    TerminalRoot(Terminal),
    /// The rules reported no legal moves in a position that is not terminal.
    #[error("no legal moves in a position that is not terminal")]
    NoLegalMoves,
}

/// Parameters of the search.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Wall-clock budget. The deadline is checked between iterations, so the
    /// last iteration may finish slightly after it.
    pub time_limit: Duration,
    /// Stop after this many iterations even if there is time left.
    pub max_iterations: Option<u64>,
    /// Playouts still running after this many random moves are scored as a
    /// draw. Only needed for rules that do not guarantee the game ends.
    pub max_rollout_plies: Option<u32>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(60),
            max_iterations: None,
            max_rollout_plies: None,
        }
    }
}

impl SearchConfig {
    /// Config with a time budget of `minutes` and no other limits.
    #[must_use]
    pub fn from_minutes(minutes: u64) -> Self {
        Self::default().with_time_limit(Duration::from_secs(minutes.saturating_mul(60)))
    }

    /// Builder pattern: set the time budget.
    #[must_use]
    pub const fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    /// Builder pattern: cap the number of iterations.
    #[must_use]
    pub const fn with_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Builder pattern: cap the length of random playouts.
    #[must_use]
    pub const fn with_max_rollout_plies(mut self, plies: u32) -> Self {
        self.max_rollout_plies = Some(plies);
        self
    }
}

/// Decides when the search should stop.
struct Limiter {
    timer: Instant,
    /// `None` if the time budget is too large to be represented.
    deadline: Option<Instant>,
    iterations: Option<u64>,
}

impl Limiter {
    fn new(config: &SearchConfig) -> Self {
        let timer = Instant::now();
        Self {
            timer,
            deadline: timer.checked_add(config.time_limit),
            iterations: config.max_iterations,
        }
    }

    fn exhausted(&self, iterations: u64) -> bool {
        self.iterations.is_some_and(|limit| iterations >= limit)
            || self
                .deadline
                .is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Statistics of one expanded child of the root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildStats<M> {
    /// Move leading from the root to this child.
    pub next_move: M,
    /// Playouts that passed through this child.
    pub visits: u64,
    /// Playouts through this child won by the player to move at the root.
    pub wins: u64,
}

/// Outcome of a finished search.
#[derive(Clone, Debug)]
pub struct SearchResult<M> {
    /// The most visited move from the root.
    pub best_move: M,
    /// Completed iterations. Always at least one.
    pub iterations: u64,
    /// Number of nodes in the final tree, including the root.
    pub nodes: usize,
    /// Wall-clock time spent searching.
    pub elapsed: Duration,
    /// Expanded root children in the order they were expanded.
    pub children: Vec<ChildStats<M>>,
}

/// Runs the search loop. Owns the configuration and the source of randomness
/// used for every random choice: expansion order, playouts and tie breaks.
#[derive(Debug)]
pub struct Searcher<R = ChaCha20Rng> {
    config: SearchConfig,
    rng: R,
}

impl Searcher<ChaCha20Rng> {
    /// Creates a searcher seeded from system entropy.
    #[must_use]
    pub fn new(config: SearchConfig) -> Self {
        Self::with_rng(config, ChaCha20Rng::from_entropy())
    }

    /// Creates a searcher whose random choices are fully determined by `seed`.
    #[must_use]
    pub fn seeded(config: SearchConfig, seed: u64) -> Self {
        Self::with_rng(config, ChaCha20Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Searcher<R> {
    /// Creates a searcher drawing random choices from `rng`.
    #[must_use]
    pub const fn with_rng(config: SearchConfig, rng: R) -> Self {
        Self { config, rng }
    }

    /// Search parameters used by [`Searcher::search`].
    #[must_use]
    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Searches `root` until the limits are exhausted and returns the most
    /// visited move together with the search statistics.
    ///
    /// `root` itself is never modified: each iteration plays on its own copy.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::TerminalRoot`] without searching if the game is
    /// already over in `root` and [`SearchError::NoLegalMoves`] if the rules
    /// report no moves in a position that is not terminal.
    pub fn search<S: GameState>(
        &mut self,
        root: &S,
    ) -> Result<SearchResult<S::Move>, SearchError> {
        if let Some(terminal) = root.terminal() {
            return Err(SearchError::TerminalRoot(terminal));
        }

        let limiter = Limiter::new(&self.config);
        let perspective = root.current_turn();
        let mut tree = Tree::new(perspective);
        debug!(
            player = %perspective,
            legal_moves = root.legal_moves().len(),
            time_limit = ?self.config.time_limit,
            max_iterations = ?self.config.max_iterations,
            "Starting search"
        );

        let mut iterations = 0;
        loop {
            self.iterate(&mut tree, root)?;
            iterations += 1;
            if limiter.exhausted(iterations) {
                break;
            }
        }

        let best = policy::robust_child(&tree, Tree::<S::Move>::ROOT, &mut self.rng)
            .ok_or(SearchError::NoLegalMoves)?;
        let children: Vec<ChildStats<S::Move>> = tree
            .root()
            .children()
            .iter()
            .filter_map(|&child| {
                let node = tree.get(child);
                node.last_move().map(|next_move| ChildStats {
                    next_move: next_move.clone(),
                    visits: node.visits(),
                    wins: node.wins(),
                })
            })
            .collect();
        let best_move = tree
            .get(best)
            .last_move()
            .cloned()
            .ok_or(SearchError::NoLegalMoves)?;

        let elapsed = limiter.timer.elapsed();
        info!(
            iterations,
            nodes = tree.len(),
            ips = (iterations as f64 / elapsed.as_secs_f64()) as u64,
            time_ms = elapsed.as_millis(),
            best_move = ?best_move,
            visits = tree.get(best).visits(),
            "Search finished"
        );

        Ok(SearchResult {
            best_move,
            iterations,
            nodes: tree.len(),
            elapsed,
            children,
        })
    }

    /// Runs one iteration of all four phases on a copy of `root`.
    fn iterate<S: GameState>(
        &mut self,
        tree: &mut Tree<S::Move>,
        root: &S,
    ) -> Result<(), SearchError> {
        let mut state = root.clone();
        let leaf = mcts::select_and_expand(tree, &mut state, &mut self.rng)?;
        let outcome = mcts::simulate(
            &mut state,
            tree.root().player(),
            self.config.max_rollout_plies,
            &mut self.rng,
        )?;
        mcts::backpropagate(tree, leaf, outcome);
        trace!(
            depth = tree.depth(leaf),
            outcome = outcome.value(),
            "Iteration complete"
        );
        Ok(())
    }
}

/// Searches `initial_state` for `time_limit_minutes` and returns the most
/// visited move. A limit of zero still runs one full iteration.
///
/// # Errors
///
/// See [`Searcher::search`].
pub fn run<S: GameState>(
    initial_state: S,
    time_limit_minutes: u64,
) -> Result<S::Move, SearchError> {
    Searcher::new(SearchConfig::from_minutes(time_limit_minutes))
        .search(&initial_state)
        .map(|result| result.best_move)
}
