use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::word::Direction;

pub const BLOCKED_CHAR: char = '#';
pub const ANY_CHAR: char = '.';
pub const VOWEL_CHAR: char = '0';
pub const CONSONANT_CHAR: char = '1';

/// Placeholder used when rendering a cell that holds no letter.
pub const UNFILLED_CHAR: char = '_';

/// What a cell holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Blocked,
    #[default]
    Any,
    Vowel,
    Consonant,
    Letter(char),
}

impl Symbol {
    /// Parse a single flat-board character. Letters are lower-cased.
    pub fn from_char(c: char) -> Result<Self, GridError> {
        match c {
            BLOCKED_CHAR => Ok(Symbol::Blocked),
            ANY_CHAR => Ok(Symbol::Any),
            VOWEL_CHAR => Ok(Symbol::Vowel),
            CONSONANT_CHAR => Ok(Symbol::Consonant),
            c if c.is_ascii_alphabetic() => Ok(Symbol::Letter(c.to_ascii_lowercase())),
            other => Err(GridError::InvalidSymbol(other.to_string())),
        }
    }

    /// Parse user input for a cell. Empty input clears the cell back to `Any`.
    pub fn parse(input: &str) -> Result<Self, GridError> {
        let mut chars = input.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(Symbol::Any),
            (Some(c), None) => Self::from_char(c),
            (Some(_), Some(_)) => Err(GridError::RebusUnsupported(input.to_string())),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Symbol::Blocked => BLOCKED_CHAR,
            Symbol::Any => ANY_CHAR,
            Symbol::Vowel => VOWEL_CHAR,
            Symbol::Consonant => CONSONANT_CHAR,
            Symbol::Letter(c) => c,
        }
    }

    pub fn letter(self) -> Option<char> {
        match self {
            Symbol::Letter(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_letter(self) -> bool {
        matches!(self, Symbol::Letter(_))
    }

    /// True for the placeholders a word still has to resolve.
    pub fn is_unresolved(self) -> bool {
        matches!(self, Symbol::Any | Symbol::Vowel | Symbol::Consonant)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Candidate letters shown on a cell when its content is ambiguous.
pub type HintSet = BTreeSet<char>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub(crate) blocked: bool,
    pub(crate) content: Symbol,
    pub(crate) clue_number: Option<u32>,
    /// Hint sets, indexed by `Direction::index()`
    pub(crate) hints: [HintSet; 2],
    /// NoMatch warning markers, indexed by `Direction::index()`
    pub(crate) warnings: [bool; 2],
}

impl Cell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn content(&self) -> Symbol {
        self.content
    }

    pub fn clue_number(&self) -> Option<u32> {
        self.clue_number
    }

    pub fn hints(&self, direction: Direction) -> &HintSet {
        &self.hints[direction.index()]
    }

    pub fn has_warning(&self, direction: Direction) -> bool {
        self.warnings[direction.index()]
    }

    pub fn has_any_warning(&self) -> bool {
        self.warnings.iter().any(|w| *w)
    }

    /// True if the cell holds the `Any` placeholder.
    pub fn is_empty(&self) -> bool {
        self.content == Symbol::Any
    }

    /// The letter to display, or `_` when unfilled.
    pub fn display_letter(&self) -> char {
        self.content.letter().unwrap_or(UNFILLED_CHAR)
    }

    pub(crate) fn set_blocked(&mut self, blocked: bool) {
        self.blocked = blocked;
        self.content = if blocked { Symbol::Blocked } else { Symbol::Any };
        self.clear_annotations();
    }

    pub(crate) fn clear_annotations(&mut self) {
        self.hints = Default::default();
        self.warnings = [false; 2];
    }

    pub(crate) fn clear_direction(&mut self, direction: Direction) {
        self.hints[direction.index()].clear();
        self.warnings[direction.index()] = false;
    }
}
