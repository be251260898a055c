//! Game defined by an explicit table of positions.
//!
//! Useful to observe the search on hand-crafted game trees: every position
//! lists who is to move, whether the game is over and which labelled moves
//! lead to which other positions.

use std::rc::Rc;

use crate::environment::{GameState, Player, Terminal};

/// One entry of the [`Scripted`] position table.
#[derive(Clone, Debug)]
pub struct Position {
    turn: Player,
    terminal: Option<Terminal>,
    moves: Vec<(&'static str, usize)>,
}

impl Position {
    /// Position where `turn` picks one of `moves`, each given as a label and
    /// the index of the position it leads to.
    #[must_use]
    pub fn new(turn: Player, moves: &[(&'static str, usize)]) -> Self {
        Self {
            turn,
            terminal: None,
            moves: moves.to_vec(),
        }
    }

    /// Decided position with `turn` to move.
    #[must_use]
    pub const fn checkmate(turn: Player) -> Self {
        Self {
            turn,
            terminal: Some(Terminal::Checkmate),
            moves: Vec::new(),
        }
    }

    /// Drawn position with `turn` to move.
    #[must_use]
    pub const fn stalemate(turn: Player) -> Self {
        Self {
            turn,
            terminal: Some(Terminal::Stalemate),
            moves: Vec::new(),
        }
    }
}

/// Cursor into a shared position table. Cloning is cheap.
#[derive(Clone, Debug)]
pub struct Scripted {
    positions: Rc<[Position]>,
    current: usize,
}

impl Scripted {
    /// Creates the game starting at the first position of the table.
    ///
    /// # Panics
    ///
    /// Panics if the table is empty or a move leads outside of it.
    #[must_use]
    pub fn new(positions: Vec<Position>) -> Self {
        assert!(!positions.is_empty(), "position table is empty");
        for (index, position) in positions.iter().enumerate() {
            for &(label, target) in &position.moves {
                assert!(
                    target < positions.len(),
                    "move {label} from position {index} leads to unknown position {target}"
                );
            }
        }
        Self {
            positions: positions.into(),
            current: 0,
        }
    }

    /// Moves the cursor to another position of the same table.
    ///
    /// # Panics
    ///
    /// Panics if `position` is not in the table.
    #[must_use]
    pub fn at(mut self, position: usize) -> Self {
        assert!(position < self.positions.len());
        self.current = position;
        self
    }

    /// Index of the current position in the table.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.current
    }

    fn current(&self) -> &Position {
        &self.positions[self.current]
    }
}

impl GameState for Scripted {
    type Move = &'static str;

    fn is_checkmate(&self) -> bool {
        self.current().terminal == Some(Terminal::Checkmate)
    }

    fn is_stalemate(&self) -> bool {
        self.current().terminal == Some(Terminal::Stalemate)
    }

    fn legal_moves(&self) -> Vec<Self::Move> {
        self.current().moves.iter().map(|&(label, _)| label).collect()
    }

    fn apply_move(&mut self, next_move: &Self::Move) {
        let target = self
            .current()
            .moves
            .iter()
            .find(|(label, _)| label == next_move)
            .map(|&(_, target)| target);
        debug_assert!(target.is_some(), "illegal move {next_move}");
        if let Some(target) = target {
            self.current = target;
        }
    }

    fn current_turn(&self) -> Player {
        self.current().turn
    }
}
