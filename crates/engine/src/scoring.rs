//! Word completeness, point values and word-list totals.

use serde::Serialize;

use crate::cell::Symbol;
use crate::grid::Grid;
use crate::word::{Direction, Word};

/// Standard Scrabble tile values for a-z.
const LETTER_POINTS: [u32; 26] = [
    1, 3, 3, 2, 1, 4, 2, 4, 1, 8, 5, 1, 3, // a-m
    1, 1, 3, 10, 1, 1, 1, 1, 4, 4, 8, 4, 10, // n-z
];

/// Points for one letter; anything that isn't a-z scores 0.
pub fn letter_points(c: char) -> u32 {
    let c = c.to_ascii_lowercase();
    if c.is_ascii_lowercase() {
        LETTER_POINTS[(c as u8 - b'a') as usize]
    } else {
        0
    }
}

pub fn scrabble_value(letters: impl IntoIterator<Item = char>) -> u32 {
    letters.into_iter().map(letter_points).sum()
}

/// True if no symbol is an unresolved placeholder.
pub fn is_complete(symbols: impl IntoIterator<Item = Symbol>) -> bool {
    symbols.into_iter().all(|s| !s.is_unresolved())
}

/// Summary over a word list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub words: usize,
    pub across: usize,
    pub down: usize,
    pub complete: usize,
    pub flagged: usize,
    pub points: u32,
}

impl Totals {
    pub fn compute(grid: &Grid, words: &[Word]) -> Self {
        let mut totals = Totals::default();
        for word in words {
            totals.words += 1;
            match word.direction {
                Direction::Across => totals.across += 1,
                Direction::Down => totals.down += 1,
            }
            if word.is_complete(grid) {
                totals.complete += 1;
            }
            if !word.state.is_normal() {
                totals.flagged += 1;
            }
            totals.points += word.scrabble_value(grid);
        }
        totals
    }
}
