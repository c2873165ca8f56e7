use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::{Symbol, BLOCKED_CHAR, UNFILLED_CHAR};
use crate::error::{GridError, WordError};
use crate::grid::Grid;
use crate::scoring;

/// Words shorter than this are flagged TooShort and never queried.
pub const MIN_WORD_LEN: usize = 3;
/// Words longer than this are flagged TooLong (advisory only).
pub const LONG_WORD_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Across, Direction::Down];

    pub fn index(self) -> usize {
        match self {
            Direction::Across => 0,
            Direction::Down => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Across => "across",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advisory classifications layered onto a word. Not mutually exclusive;
/// all clear means Normal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WordState {
    pub too_short: bool,
    pub too_long: bool,
    pub no_match: bool,
}

impl WordState {
    /// Length-based flags for a word of `len` cells.
    pub fn for_length(len: usize) -> Self {
        Self {
            too_short: len < MIN_WORD_LEN,
            too_long: len > LONG_WORD_LEN,
            no_match: false,
        }
    }

    pub fn is_normal(&self) -> bool {
        !self.too_short && !self.too_long && !self.no_match
    }

    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.too_short {
            labels.push("too-short");
        }
        if self.too_long {
            labels.push("too-long");
        }
        if self.no_match {
            labels.push("no-match");
        }
        labels
    }
}

/// A run of open cells in one direction. Holds cell indices into the grid
/// that produced it; rebuilt whenever the block layout changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub number: u32,
    pub direction: Direction,
    cells: Vec<usize>,
    pub state: WordState,
}

impl Word {
    pub fn new(number: u32, direction: Direction, cells: Vec<usize>) -> Self {
        let state = WordState::for_length(cells.len());
        Self { number, direction, cells, state }
    }

    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.cells.contains(&index)
    }

    fn symbols<'a>(&'a self, grid: &'a Grid) -> impl Iterator<Item = Symbol> + 'a {
        self.cells
            .iter()
            .map(move |&i| grid.cells().get(i).map(|c| c.content()).unwrap_or(Symbol::Any))
    }

    /// Constraint pattern sent to the corpus, e.g. `c.t01`.
    pub fn shape(&self, grid: &Grid) -> String {
        self.symbols(grid).map(Symbol::to_char).collect()
    }

    /// Letters with `_` for unresolved cells.
    pub fn text(&self, grid: &Grid) -> String {
        self.symbols(grid)
            .map(|s| s.letter().unwrap_or(UNFILLED_CHAR))
            .collect()
    }

    /// True if every cell holds the `Any` placeholder.
    pub fn is_blank(&self, grid: &Grid) -> bool {
        self.symbols(grid).all(|s| s == Symbol::Any)
    }

    pub fn is_complete(&self, grid: &Grid) -> bool {
        scoring::is_complete(self.symbols(grid))
    }

    pub fn scrabble_value(&self, grid: &Grid) -> u32 {
        scoring::scrabble_value(self.symbols(grid).filter_map(Symbol::letter))
    }

    /// Whether the propagation engine should ask the corpus about this word.
    pub fn is_queryable(&self, grid: &Grid) -> bool {
        !self.state.too_short && !self.is_blank(grid) && !self.is_complete(grid)
    }

    /// Write `text` into the word's cells, one symbol per cell.
    pub fn set_text(&self, grid: &mut Grid, text: &str) -> Result<(), WordError> {
        let symbols = text
            .chars()
            .map(|c| match c {
                UNFILLED_CHAR => Ok(Symbol::Any),
                BLOCKED_CHAR => Err(GridError::InvalidSymbol(c.to_string())),
                c => Symbol::from_char(c),
            })
            .collect::<Result<Vec<_>, _>>()?;
        if symbols.len() != self.cells.len() {
            return Err(self.shape_mismatch(symbols.len()));
        }
        for (&index, symbol) in self.cells.iter().zip(symbols) {
            grid.set_symbol(index, symbol)?;
        }
        Ok(())
    }

    /// Reset every cell of the word to `Any`.
    pub fn clear(&self, grid: &mut Grid) {
        for &index in &self.cells {
            if let Ok(cell) = grid.cell_mut(index) {
                if !cell.blocked {
                    cell.content = Symbol::Any;
                    cell.clear_annotations();
                }
            }
        }
    }

    pub fn to_record(&self, grid: &Grid) -> WordRecord {
        WordRecord {
            clue: String::new(),
            number: self.number,
            direction: self.direction,
            answer: self.text(grid),
            shape: self.shape(grid),
            length: self.len(),
            points: self.scrabble_value(grid),
        }
    }

    /// Restore persisted clue data onto this word. Number and length must match.
    pub fn apply_record(&self, grid: &mut Grid, record: &WordRecord) -> Result<(), WordError> {
        if record.number != self.number
            || record.length != self.len()
            || record.answer.chars().count() != self.len()
        {
            return Err(WordError::UnexpectedWordShape {
                number: record.number,
                direction: record.direction,
                expected: record.length,
                found: Some(self.len()),
            });
        }
        // Unfilled positions keep whatever the cell string restored ('.', '0', '1')
        for (&index, c) in self.cells.iter().zip(record.answer.chars()) {
            match c {
                UNFILLED_CHAR => {}
                BLOCKED_CHAR => return Err(GridError::InvalidSymbol(c.to_string()).into()),
                c => {
                    grid.set_symbol(index, Symbol::from_char(c)?)?;
                }
            }
        }
        Ok(())
    }

    fn shape_mismatch(&self, found: usize) -> WordError {
        WordError::UnexpectedWordShape {
            number: self.number,
            direction: self.direction,
            expected: self.len(),
            found: Some(found),
        }
    }
}

/// Storage form of a word and its clue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    #[serde(default)]
    pub clue: String,
    pub number: u32,
    pub direction: Direction,
    pub answer: String,
    pub shape: String,
    pub length: usize,
    #[serde(default)]
    pub points: u32,
}
