//! Child selection policies: UCB1 while descending the tree and Robust Child
//! once the search is over.
//!
//! Both policies break ties uniformly at random among all maximizers, so the
//! order in which children were expanded never biases the choice.

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;

use super::tree::{Node, NodeIndex, Tree};
use crate::environment::Player;

/// Exploration constant of UCB1 ($c = \sqrt{2}$).
pub const EXPLORATION: f64 = std::f64::consts::SQRT_2;

/// UCB1 score of a child: its win rate plus an exploration bonus that shrinks
/// as the child collects visits relative to its parent.
///
/// `child_visits` must be positive. The parent visit count is shifted by one so
/// the logarithm stays defined before anything was propagated through the
/// parent.
#[must_use]
pub fn ucb(win_rate: f64, parent_visits: u64, child_visits: u64) -> f64 {
    debug_assert!(child_visits > 0);
    let exploration = ((parent_visits as f64).ln_1p() / child_visits as f64).sqrt();
    EXPLORATION.mul_add(exploration, win_rate)
}

/// Fraction of playouts through `node` that ended well for the player who chose
/// the move leading to it.
///
/// Statistics are stored from the root player's perspective, so they are
/// flipped for the moves chosen by the opponent. Only wins are counted: a drawn
/// playout is a failure for the root player and a success for the opponent.
fn win_rate<M>(node: &Node<M>, perspective: Player) -> f64 {
    let rate = node.wins as f64 / node.visits as f64;
    if node.player == perspective {
        rate
    } else {
        1.0 - rate
    }
}

/// Number of playouts that passed through `parent`.
///
/// The root keeps no statistics of its own. Every playout goes through exactly
/// one of its children, so their visits add up to the completed iterations.
fn passes<M>(tree: &Tree<M>, parent: NodeIndex) -> u64 {
    if parent == Tree::<M>::ROOT {
        tree.root()
            .children
            .iter()
            .map(|&child| tree.get(child).visits)
            .sum()
    } else {
        tree.get(parent).visits
    }
}

/// Picks the expanded child of `parent` with the highest UCB1 score.
///
/// Returns `None` if `parent` has no expanded children.
pub fn select_child<M, R: Rng + ?Sized>(
    tree: &Tree<M>,
    parent: NodeIndex,
    perspective: Player,
    rng: &mut R,
) -> Option<NodeIndex> {
    let parent_visits = passes(tree, parent);
    let best = tree
        .get(parent)
        .children
        .iter()
        .map(|&child| {
            let node = tree.get(child);
            (
                child,
                ucb(win_rate(node, perspective), parent_visits, node.visits),
            )
        })
        .max_set_by(|(_, lhs), (_, rhs)| lhs.total_cmp(rhs));
    best.choose(rng).map(|&(child, _)| child)
}

/// Robust Child: picks the most visited expanded child of `parent`.
///
/// Returns `None` if `parent` has no expanded children.
pub fn robust_child<M, R: Rng + ?Sized>(
    tree: &Tree<M>,
    parent: NodeIndex,
    rng: &mut R,
) -> Option<NodeIndex> {
    tree.get(parent)
        .children
        .iter()
        .copied()
        .max_set_by_key(|&child| tree.get(child).visits)
        .choose(rng)
        .copied()
}
