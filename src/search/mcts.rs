//! The phases of a single search iteration:
//!
//! 1. Selection and expansion: descend from the root with UCB1 until reaching a
//!    node with a move that was never tried, and attach exactly one new child.
//! 2. Simulation: play uniformly random moves until the game is over.
//! 3. Backpropagation: record the outcome on the path back to the root.

use rand::seq::SliceRandom;
use rand::Rng;

use super::policy;
use super::tree::{Node, NodeIndex, Tree};
use super::SearchError;
use crate::environment::{GameState, Outcome, Player, Terminal};

/// Walks from the root to the node the iteration continues from, playing the
/// moves of the visited nodes on `state`.
///
/// The walk stops at the first terminal position or right after attaching one
/// new child to the tree, whichever comes first. The returned node corresponds
/// to `state`.
pub(super) fn select_and_expand<S: GameState, R: Rng + ?Sized>(
    tree: &mut Tree<S::Move>,
    state: &mut S,
    rng: &mut R,
) -> Result<NodeIndex, SearchError> {
    let perspective = tree.root().player;
    let mut current = Tree::<S::Move>::ROOT;

    while !state.is_terminal() {
        let unvisited = tree.get_mut(current).unvisited.get_or_insert_with(|| {
            let player = state.current_turn();
            state
                .legal_moves()
                .into_iter()
                .map(|next_move| Node::new(Some(next_move), player))
                .collect()
        });

        if !unvisited.is_empty() {
            let child = unvisited.swap_remove(rng.gen_range(0..unvisited.len()));
            if let Some(next_move) = &child.last_move {
                state.apply_move(next_move);
            }
            return Ok(tree.attach(current, child));
        }

        let best = policy::select_child(tree, current, perspective, rng)
            .ok_or(SearchError::NoLegalMoves)?;
        if let Some(next_move) = &tree.get(best).last_move {
            state.apply_move(next_move);
        }
        current = best;
    }

    Ok(current)
}

/// Plays uniformly random moves from `state` until the game is over and scores
/// the final position for `perspective`, the player to move at the root.
///
/// A decided position counts as a win exactly when `perspective` is the side to
/// move in it. If `max_plies` is set and the game is still running after that
/// many moves, the playout is scored as a draw.
pub(super) fn simulate<S: GameState, R: Rng + ?Sized>(
    state: &mut S,
    perspective: Player,
    max_plies: Option<u32>,
    rng: &mut R,
) -> Result<Outcome, SearchError> {
    let mut plies = 0;
    loop {
        match state.terminal() {
            Some(Terminal::Checkmate) if state.current_turn() == perspective => {
                return Ok(Outcome::Win)
            },
            Some(Terminal::Checkmate) => return Ok(Outcome::Loss),
            Some(Terminal::Stalemate) => return Ok(Outcome::Draw),
            None => {},
        }
        if max_plies.is_some_and(|limit| plies >= limit) {
            return Ok(Outcome::Draw);
        }
        let moves = state.legal_moves();
        let next_move = moves.choose(rng).ok_or(SearchError::NoLegalMoves)?;
        state.apply_move(next_move);
        plies += 1;
    }
}

/// Records `outcome` on `leaf` and all of its ancestors except the root.
///
/// Counters saturate instead of wrapping around.
pub(super) fn backpropagate<M>(tree: &mut Tree<M>, leaf: NodeIndex, outcome: Outcome) {
    let mut current = leaf;
    while let Some(parent) = tree.get(current).parent {
        let node = tree.get_mut(current);
        node.visits = node.visits.saturating_add(1);
        if outcome == Outcome::Win {
            node.wins = node.wins.saturating_add(1);
        }
        current = parent;
    }
}
