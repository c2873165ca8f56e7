//! Square crossword grid: an arena of cells in row-major order.
//!
//! Cells never point at each other. The symmetric partner of a cell is
//! computed from its index, and words refer to cells by index.

use crate::cell::{Cell, Symbol, ANY_CHAR, BLOCKED_CHAR};
use crate::error::GridError;

pub const DEFAULT_SIZE: usize = 15;

/// What a content edit did to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// Nothing changed.
    None,
    /// A non-blocked cell changed content; the word list is still valid.
    Content,
    /// The block layout changed; the word list must be re-derived.
    Layout,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE)
    }
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::new(); size * size],
        }
    }

    /// Resize to `size` x `size` empty, unblocked cells.
    pub fn set_size(&mut self, size: usize) {
        self.size = size;
        self.cells = vec![Cell::new(); size * size];
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Result<&Cell, GridError> {
        self.cells.get(index).ok_or(GridError::OutOfBounds {
            index,
            len: self.cells.len(),
        })
    }

    pub(crate) fn cell_mut(&mut self, index: usize) -> Result<&mut Cell, GridError> {
        let len = self.cells.len();
        self.cells
            .get_mut(index)
            .ok_or(GridError::OutOfBounds { index, len })
    }

    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    pub fn row_col(&self, index: usize) -> (usize, usize) {
        (index / self.size, index % self.size)
    }

    /// The cell at the 180-degree rotated position, or `None` for the
    /// center cell of an odd grid.
    pub fn partner(&self, index: usize) -> Option<usize> {
        let partner = self.cells.len().checked_sub(1 + index)?;
        (partner != index).then_some(partner)
    }

    pub fn is_blocked(&self, index: usize) -> bool {
        self.cells.get(index).map(|c| c.blocked).unwrap_or(true)
    }

    /// Flip the block state of `index` and its symmetric partner together.
    ///
    /// With `state` given, nothing happens when the cell already has that
    /// state; otherwise both cells take the negation of this cell's state.
    /// Returns true if the layout changed.
    pub fn toggle_blocked(&mut self, index: usize, state: Option<bool>) -> Result<bool, GridError> {
        let Some(new_state) = self.next_block_state(index, state)? else {
            return Ok(false);
        };
        self.cell_mut(index)?.set_blocked(new_state);
        if let Some(partner) = self.partner(index) {
            self.cells[partner].set_blocked(new_state);
        }
        Ok(true)
    }

    /// Like `toggle_blocked` but leaves the partner alone.
    pub fn toggle_one(&mut self, index: usize, state: Option<bool>) -> Result<bool, GridError> {
        let Some(new_state) = self.next_block_state(index, state)? else {
            return Ok(false);
        };
        self.cell_mut(index)?.set_blocked(new_state);
        Ok(true)
    }

    fn next_block_state(&self, index: usize, state: Option<bool>) -> Result<Option<bool>, GridError> {
        let current = self.cell(index)?.blocked;
        Ok(match state {
            Some(s) if s == current => None,
            _ => Some(!current),
        })
    }

    /// Parse `input` and store it in the cell.
    pub fn set_content(&mut self, index: usize, input: &str) -> Result<Edit, GridError> {
        let symbol = Symbol::parse(input)?;
        self.set_symbol(index, symbol)
    }

    /// Store a symbol. The blocked marker blocks this single cell; any other
    /// symbol on a blocked cell unblocks it first.
    pub fn set_symbol(&mut self, index: usize, symbol: Symbol) -> Result<Edit, GridError> {
        let cell = self.cell_mut(index)?;
        match (cell.blocked, symbol) {
            (true, Symbol::Blocked) => Ok(Edit::None),
            (false, Symbol::Blocked) => {
                cell.set_blocked(true);
                Ok(Edit::Layout)
            }
            (true, symbol) => {
                cell.set_blocked(false);
                cell.content = symbol;
                Ok(Edit::Layout)
            }
            (false, symbol) if cell.content == symbol => Ok(Edit::None),
            (false, symbol) => {
                cell.content = symbol;
                Ok(Edit::Content)
            }
        }
    }

    /// Flat per-cell symbol string, row-major.
    pub fn to_board_string(&self) -> String {
        self.cells.iter().map(|c| c.content.to_char()).collect()
    }

    /// Rebuild a grid from its flat symbol string.
    pub fn from_board_string(board: &str) -> Result<Self, GridError> {
        let symbols = board
            .chars()
            .map(Symbol::from_char)
            .collect::<Result<Vec<_>, _>>()?;
        let size = (symbols.len() as f64).sqrt() as usize;
        if size * size != symbols.len() {
            return Err(GridError::BoardShape(symbols.len()));
        }

        let mut grid = Self::new(size);
        for (index, symbol) in symbols.into_iter().enumerate() {
            grid.set_symbol(index, symbol)?;
        }
        Ok(grid)
    }

    /// Block layout only: `#` for blocked cells, `.` for everything else.
    pub fn template(&self) -> String {
        self.cells
            .iter()
            .map(|c| if c.blocked { BLOCKED_CHAR } else { ANY_CHAR })
            .collect()
    }

    /// Reset every open cell to `Any` and drop all hints and warnings.
    pub fn clear_content(&mut self) {
        for cell in self.cells.iter_mut().filter(|c| !c.blocked) {
            cell.content = Symbol::Any;
            cell.clear_annotations();
        }
    }

    /// Reset cells carrying a NoMatch warning. Returns how many were reset.
    pub fn clear_errors(&mut self) -> usize {
        let mut cleared = 0;
        for cell in self.cells.iter_mut().filter(|c| c.has_any_warning()) {
            cell.content = Symbol::Any;
            cell.clear_annotations();
            cleared += 1;
        }
        cleared
    }

    /// Drop hints and warnings, keeping content.
    pub fn clear_annotations(&mut self) {
        for cell in &mut self.cells {
            cell.clear_annotations();
        }
    }

    pub(crate) fn set_clue_numbers(&mut self, numbers: &[(usize, u32)]) {
        for cell in &mut self.cells {
            cell.clue_number = None;
        }
        for &(index, number) in numbers {
            if let Some(cell) = self.cells.get_mut(index) {
                cell.clue_number = Some(number);
            }
        }
    }

    /// Render as rows of symbols, one line per row.
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.size.max(1))
            .map(|row| row.iter().map(|c| c.content.to_char()).collect())
            .collect()
    }
}
