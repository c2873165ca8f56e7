//! Derives the across/down word list and clue numbers from a block layout.

use rustc_hash::FxHashMap;

use crate::grid::Grid;
use crate::word::{Direction, Word};

/// Result of one segmentation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    /// Words in anchor-visit order (across before down for a shared anchor).
    pub words: Vec<Word>,
    /// (cell index, clue number) for every numbered cell, ascending.
    pub numbers: Vec<(usize, u32)>,
}

impl Layout {
    pub fn across(&self) -> impl Iterator<Item = &Word> {
        self.words.iter().filter(|w| w.direction == Direction::Across)
    }

    pub fn down(&self) -> impl Iterator<Item = &Word> {
        self.words.iter().filter(|w| w.direction == Direction::Down)
    }
}

/// Scan the grid in row-major order.
///
/// A non-blocked cell anchors an across word when it sits on the left edge
/// or right of a block, and a down word when it sits on the top edge or
/// below a block. Each anchor takes the next clue number, once, however
/// many directions it starts.
pub fn segment(grid: &Grid) -> Layout {
    let size = grid.size();
    let mut layout = Layout::default();
    let mut next_number = 1u32;

    for index in 0..grid.len() {
        if grid.is_blocked(index) {
            continue;
        }

        let (row, col) = grid.row_col(index);
        let starts_across = col == 0 || grid.is_blocked(index - 1);
        let starts_down = row == 0 || grid.is_blocked(index - size);
        if !starts_across && !starts_down {
            continue;
        }

        let number = next_number;
        next_number += 1;
        layout.numbers.push((index, number));

        if starts_across {
            let cells = (index..index + (size - col))
                .take_while(|&i| !grid.is_blocked(i))
                .collect();
            layout.words.push(Word::new(number, Direction::Across, cells));
        }
        if starts_down {
            let cells = (index..grid.len())
                .step_by(size)
                .take_while(|&i| !grid.is_blocked(i))
                .collect();
            layout.words.push(Word::new(number, Direction::Down, cells));
        }
    }

    layout
}

/// Lookup from (cell, direction) to the word covering it.
#[derive(Debug, Clone, Default)]
pub struct WordIndex {
    by_cell: FxHashMap<(usize, Direction), usize>,
    by_number: FxHashMap<(u32, Direction), usize>,
}

impl WordIndex {
    pub fn build(words: &[Word]) -> Self {
        let mut index = WordIndex::default();
        for (i, word) in words.iter().enumerate() {
            index.by_number.insert((word.number, word.direction), i);
            for &cell in word.cells() {
                index.by_cell.insert((cell, word.direction), i);
            }
        }
        index
    }

    /// Position in the word list of the word covering `cell` in `direction`.
    pub fn word_at(&self, cell: usize, direction: Direction) -> Option<usize> {
        self.by_cell.get(&(cell, direction)).copied()
    }

    pub fn word_numbered(&self, number: u32, direction: Direction) -> Option<usize> {
        self.by_number.get(&(number, direction)).copied()
    }
}
