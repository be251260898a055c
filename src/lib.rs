//! Board game agent that picks its move with [Monte Carlo Tree Search] guided
//! by the UCT selection policy.
//!
//! The search is game-agnostic: anything implementing
//! [`environment::GameState`] can be searched. Given a position and a
//! wall-clock budget, [`search::Searcher`] grows an asymmetric tree one node
//! per iteration, scores the new lines with uniformly random playouts and
//! finally returns the most visited move from the root.
//!
//! [`games::toetactic`] provides a small concrete game that the `uct-agent`
//! binary plays.
//!
//! [Monte Carlo Tree Search]: https://en.wikipedia.org/wiki/Monte_Carlo_tree_search

pub mod environment;
pub mod games;
pub mod search;

pub use environment::{GameState, Outcome, Player};
pub use search::{run, SearchConfig, SearchError, SearchResult, Searcher};

use shadow_rs::shadow;

shadow!(build);

/// Returns the full agent version that can be used to identify how it was
/// built in the first place.
#[must_use]
pub fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}
