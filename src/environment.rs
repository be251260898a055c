//! Interface between the search and the rules of a game.
//!
//! The search never looks inside positions or moves: everything it needs is
//! expressed by [`GameState`], which game implementations provide.

use std::fmt;
use std::ops::Not;

/// A two-player game is played between White (having the advantage of the
/// first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
}

impl Not for Player {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match &self {
                Self::White => 'w',
                Self::Black => 'b',
            }
        )
    }
}

/// Result of a finished playout from the perspective of the player to move at
/// the root of the search.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    /// Integer value of the outcome: `+1` for a win, `0` for a draw and `-1`
    /// for a loss.
    #[must_use]
    pub const fn value(self) -> i8 {
        match self {
            Self::Win => 1,
            Self::Draw => 0,
            Self::Loss => -1,
        }
    }
}

/// The kind of terminal position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// The game was decided.
    Checkmate,
    /// The game ended without a winner.
    Stalemate,
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checkmate => write!(f, "checkmate"),
            Self::Stalemate => write!(f, "stalemate"),
        }
    }
}

/// Game position together with the rules needed to play it forward.
///
/// The state is mutated in place by [`GameState::apply_move`] and cloned by the
/// search once per iteration, so implementations should keep cloning cheap.
pub trait GameState: Clone {
    /// Opaque value identifying one legal transition.
    type Move: Clone + Eq + fmt::Debug;

    /// Returns `true` if the game is decided in this position.
    fn is_checkmate(&self) -> bool;

    /// Returns `true` if the game ended without a winner in this position.
    fn is_stalemate(&self) -> bool;

    /// Generates all legal moves. Must be non-empty whenever the position is
    /// neither checkmate nor stalemate.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Plays a legal move, passing the turn and updating any bookkeeping the
    /// rules need (draw counters, special-move rights, etc).
    fn apply_move(&mut self, next_move: &Self::Move);

    /// Returns the player who owns the turn.
    fn current_turn(&self) -> Player;

    /// Returns the kind of terminal position, if the game is over.
    fn terminal(&self) -> Option<Terminal> {
        if self.is_checkmate() {
            Some(Terminal::Checkmate)
        } else if self.is_stalemate() {
            Some(Terminal::Stalemate)
        } else {
            None
        }
    }

    /// Returns `true` if no more moves can be played.
    fn is_terminal(&self) -> bool {
        self.terminal().is_some()
    }
}
