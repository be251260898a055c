//! [Toe-Tac-Tic] (misère tic-tac-toe): the player who completes a line of
//! three of their own marks loses.
//!
//! X ([`Player::White`]) moves first. Squares are named like on a chess board:
//! files `a`-`c` from left to right and ranks `1`-`3` from bottom to top, so
//! the top-left square is `a3`.
//!
//! [Toe-Tac-Tic]: https://en.wikipedia.org/wiki/Tic-tac-toe_variants

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context};

use crate::environment::{GameState, Player};

const SIZE: usize = 3;
const SQUARES: usize = SIZE * SIZE;

/// Rows, columns and diagonals.
const LINES: [[usize; SIZE]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A square of the board, indexed row-major from the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell(u8);

impl Cell {
    /// Returns the square with the given row-major index, if it exists.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < SQUARES {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Row-major index of the square, `0` being `a3`.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<&str> for Cell {
    type Error = anyhow::Error;

    fn try_from(square: &str) -> anyhow::Result<Self> {
        let &[file, rank] = square.as_bytes() else {
            bail!("square should be two characters long, got '{square}'");
        };
        let column = match file {
            b'a'..=b'c' => file - b'a',
            _ => bail!("file should be within a-c, got '{}'", char::from(file)),
        };
        let row = match rank {
            b'1'..=b'3' => b'3' - rank,
            _ => bail!("rank should be within 1-3, got '{}'", char::from(rank)),
        };
        Ok(Self(row * 3 + column))
    }
}

impl FromStr for Cell {
    type Err = anyhow::Error;

    fn from_str(square: &str) -> anyhow::Result<Self> {
        Self::try_from(square)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let column = self.0 % 3;
        let row = self.0 / 3;
        write!(f, "{}{}", char::from(b'a' + column), 3 - row)
    }
}

fn mark(player: Player) -> char {
    match player {
        Player::White => 'X',
        Player::Black => 'O',
    }
}

fn parse_mark(token: &str) -> anyhow::Result<Option<Player>> {
    match token {
        "X" | "x" => Ok(Some(Player::White)),
        "O" | "o" => Ok(Some(Player::Black)),
        "." => Ok(None),
        _ => bail!("square should be 'X', 'O' or '.', got '{token}'"),
    }
}

/// Board with the marks placed so far and the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Player>; SQUARES],
    turn: Player,
}

impl Board {
    /// Empty board with X to move.
    #[must_use]
    pub const fn starting() -> Self {
        Self {
            squares: [None; SQUARES],
            turn: Player::White,
        }
    }

    /// Parses the board file format: three rows of whitespace-separated `X`,
    /// `O` or `.` (top row first) followed by the side to move, `X` or `O`.
    /// Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is malformed or the number of marks of
    /// each player does not agree with the side to move.
    pub fn from_text(input: &str) -> anyhow::Result<Self> {
        let mut lines = input.lines().map(str::trim).filter(|line| !line.is_empty());

        let mut squares = [None; SQUARES];
        for row in 0..SIZE {
            let line = lines
                .next()
                .with_context(|| format!("expected {SIZE} rows, got {row}"))?;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != SIZE {
                bail!(
                    "row {} should contain {SIZE} squares, got {}",
                    row + 1,
                    tokens.len()
                );
            }
            for (column, token) in tokens.into_iter().enumerate() {
                squares[row * SIZE + column] = parse_mark(token)?;
            }
        }

        let turn = match lines.next() {
            Some(token) => match parse_mark(token) {
                Ok(Some(player)) => player,
                _ => bail!("side to move should be 'X' or 'O', got '{token}'"),
            },
            None => bail!("missing side to move"),
        };
        if let Some(extra) = lines.next() {
            bail!("unexpected trailing input: '{extra}'");
        }

        let board = Self { squares, turn };
        let crosses = board.count(Player::White);
        let noughts = board.count(Player::Black);
        match turn {
            Player::White if crosses != noughts => {
                bail!("X to move expects as many X as O, got {crosses} X and {noughts} O")
            },
            Player::Black if crosses != noughts + 1 => {
                bail!("O to move expects one more X than O, got {crosses} X and {noughts} O")
            },
            _ => {},
        }
        Ok(board)
    }

    /// Returns the mark on `cell`, if any.
    #[must_use]
    pub const fn at(&self, cell: Cell) -> Option<Player> {
        self.squares[cell.index()]
    }

    fn count(&self, player: Player) -> usize {
        self.squares
            .iter()
            .filter(|&&square| square == Some(player))
            .count()
    }

    fn has_line(&self) -> bool {
        LINES.iter().any(|line| {
            let first = self.squares[line[0]];
            first.is_some() && line.iter().all(|&square| self.squares[square] == first)
        })
    }

    fn is_full(&self) -> bool {
        self.squares.iter().all(Option::is_some)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

impl TryFrom<&str> for Board {
    type Error = anyhow::Error;

    fn try_from(input: &str) -> anyhow::Result<Self> {
        Self::from_text(input)
    }
}

impl FromStr for Board {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> anyhow::Result<Self> {
        Self::from_text(input)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.squares.chunks(SIZE) {
            let row: Vec<String> = row
                .iter()
                .map(|square| square.map_or('.', mark).to_string())
                .collect();
            writeln!(f, "{}", row.join(" "))?;
        }
        writeln!(f, "{}", mark(self.turn))
    }
}

impl GameState for Board {
    type Move = Cell;

    /// A completed line ends the game. The player who completed it has just
    /// moved, so the side to move is the winner.
    fn is_checkmate(&self) -> bool {
        self.has_line()
    }

    fn is_stalemate(&self) -> bool {
        self.is_full() && !self.has_line()
    }

    fn legal_moves(&self) -> Vec<Cell> {
        if self.has_line() {
            return Vec::new();
        }
        (0..SQUARES as u8)
            .map(Cell)
            .filter(|&cell| self.at(cell).is_none())
            .collect()
    }

    fn apply_move(&mut self, next_move: &Cell) {
        debug_assert!(self.at(*next_move).is_none(), "{next_move} is occupied");
        self.squares[next_move.index()] = Some(self.turn);
        self.turn = !self.turn;
    }

    fn current_turn(&self) -> Player {
        self.turn
    }
}
