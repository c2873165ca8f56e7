use std::fmt;

use crate::word::Direction;

/// Errors raised synchronously by grid mutations. The mutation is not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Input is not a blocked marker, placeholder, vowel/consonant flag or a-z letter.
    InvalidSymbol(String),
    /// More than one character in a single cell.
    RebusUnsupported(String),
    /// Cell index outside the grid.
    OutOfBounds { index: usize, len: usize },
    /// Flat board string whose length is not a perfect square.
    BoardShape(usize),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSymbol(s) => write!(f, "unrecognized cell symbol '{s}'"),
            Self::RebusUnsupported(s) => {
                write!(f, "rebus squares are not supported: '{s}'")
            }
            Self::OutOfBounds { index, len } => {
                write!(f, "cell {index} is outside a grid of {len} cells")
            }
            Self::BoardShape(len) => write!(f, "board of {len} cells is not square"),
        }
    }
}

impl std::error::Error for GridError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordError {
    /// Persisted clue data does not match the word it is restored onto.
    /// `found` is `None` when no word with that number runs in that direction.
    UnexpectedWordShape {
        number: u32,
        direction: Direction,
        expected: usize,
        found: Option<usize>,
    },
    Grid(GridError),
}

impl fmt::Display for WordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedWordShape { number, direction, expected, found: Some(found) } => write!(
                f,
                "{number} {direction}: expected {expected} letters, found {found}"
            ),
            Self::UnexpectedWordShape { number, direction, .. } => {
                write!(f, "no word {number} {direction} on this board")
            }
            Self::Grid(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for WordError {}

impl From<GridError> for WordError {
    fn from(e: GridError) -> Self {
        WordError::Grid(e)
    }
}

/// Errors from board-session operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    Grid(GridError),
    Word(WordError),
    /// No board saved under that name.
    NotFound(String),
    /// The backing store failed; carries its message.
    Store(String),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "{e}"),
            Self::Word(e) => write!(f, "{e}"),
            Self::NotFound(name) => write!(f, "no saved board named '{name}'"),
            Self::Store(msg) => write!(f, "board store: {msg}"),
        }
    }
}

impl std::error::Error for BoardError {}

impl From<GridError> for BoardError {
    fn from(e: GridError) -> Self {
        BoardError::Grid(e)
    }
}

impl From<WordError> for BoardError {
    fn from(e: WordError) -> Self {
        match e {
            WordError::Grid(g) => BoardError::Grid(g),
            other => BoardError::Word(other),
        }
    }
}
