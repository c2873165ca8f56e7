//! Board session: owns the grid, the derived word list and a candidate
//! source, and keeps them consistent.
//!
//! Every mutation follows the same path. The word texts are recorded,
//! the grid is edited, layout changes re-segment it (renumbering cells and
//! publishing a layout event), then a propagation pass runs over the whole
//! word list. Words whose text differs from the record get a word-updated
//! event. Passes never overlap: each mutation holds `&mut Board` until its
//! pass settles, and `SharedBoard` extends that across threads.

use std::sync::Arc;

use log::{debug, warn};
use parking_lot::{Mutex, MutexGuard};
use rustc_hash::FxHashMap;

use crate::candidates::{CandidateSource, CorpusError};
use crate::error::{BoardError, GridError, WordError};
use crate::events::{
    BoardEvent, EventCallback, EventKind, LayoutEvent, LayoutReason, SavedEvent, Subscribers,
    WordUpdatedEvent,
};
use crate::grid::{Edit, Grid, DEFAULT_SIZE};
use crate::propagate::{PassReport, PropagationOptions, Propagator};
use crate::scoring::Totals;
use crate::segment::{segment, WordIndex};
use crate::store::{BoardData, BoardStore};
use crate::word::{Direction, Word, WordRecord};

/// Word texts keyed by clue number and direction.
type WordTexts = FxHashMap<(u32, Direction), String>;

pub struct Board<S> {
    grid: Grid,
    words: Vec<Word>,
    index: WordIndex,
    title: String,
    options: PropagationOptions,
    source: S,
    subscribers: Subscribers,
    last_report: Option<PassReport>,
}

impl<S: CandidateSource> Board<S> {
    pub fn new(source: S) -> Self {
        Self::with_size(source, DEFAULT_SIZE)
    }

    pub fn with_size(source: S, size: usize) -> Self {
        let mut board = Self {
            grid: Grid::new(size),
            words: Vec::new(),
            index: WordIndex::default(),
            title: String::new(),
            options: PropagationOptions::default(),
            source,
            subscribers: Subscribers::new(),
            last_report: None,
        };
        board.renumber();
        board
    }

    pub fn with_options(mut self, options: PropagationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &PropagationOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn word_at(&self, cell: usize, direction: Direction) -> Option<&Word> {
        self.index.word_at(cell, direction).map(|i| &self.words[i])
    }

    pub fn word(&self, number: u32, direction: Direction) -> Option<&Word> {
        self.index.word_numbered(number, direction).map(|i| &self.words[i])
    }

    pub fn totals(&self) -> Totals {
        Totals::compute(&self.grid, &self.words)
    }

    /// Report from the most recent propagation pass.
    pub fn last_report(&self) -> Option<&PassReport> {
        self.last_report.as_ref()
    }

    pub fn to_board_string(&self) -> String {
        self.grid.to_board_string()
    }

    /// Register a callback for one kind of board event.
    pub fn on(&mut self, kind: EventKind, callback: EventCallback) {
        self.subscribers.subscribe(kind, callback);
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Replace the grid with an empty `size` x `size` one.
    pub fn set_size(&mut self, size: usize) -> PassReport {
        let before = self.word_texts();
        self.grid.set_size(size);
        self.renumber();
        self.run_pass(before)
    }

    /// Toggle a block and its symmetric partner. `None` if nothing changed.
    pub fn toggle_blocked(
        &mut self,
        cell: usize,
        state: Option<bool>,
    ) -> Result<Option<PassReport>, GridError> {
        let before = self.word_texts();
        if !self.grid.toggle_blocked(cell, state)? {
            return Ok(None);
        }
        self.renumber();
        Ok(Some(self.run_pass(before)))
    }

    /// Enter a symbol into one cell. `None` if the cell already held it.
    pub fn set_content(&mut self, cell: usize, input: &str) -> Result<Option<PassReport>, GridError> {
        let before = self.word_texts();
        match self.grid.set_content(cell, input)? {
            Edit::None => Ok(None),
            Edit::Content => Ok(Some(self.run_pass(before))),
            Edit::Layout => {
                self.renumber();
                Ok(Some(self.run_pass(before)))
            }
        }
    }

    /// Apply several grid edits with one re-segmentation and one pass.
    /// If `edits` fails, the grid is restored and no pass runs.
    pub fn batch<F>(&mut self, edits: F) -> Result<PassReport, GridError>
    where
        F: FnOnce(&mut Grid) -> Result<(), GridError>,
    {
        let snapshot = self.grid.clone();
        if let Err(e) = edits(&mut self.grid) {
            self.grid = snapshot;
            return Err(e);
        }
        let before = self.word_texts_in(&snapshot);
        if self.grid.template() != snapshot.template() || self.grid.size() != snapshot.size() {
            self.renumber();
        }
        Ok(self.run_pass(before))
    }

    /// Erase every letter and constraint, keeping blocks.
    pub fn clear(&mut self) -> PassReport {
        let before = self.word_texts();
        self.grid.clear_content();
        self.run_pass(before)
    }

    /// Remove every block and letter.
    pub fn clear_grid(&mut self) -> PassReport {
        let size = self.grid.size();
        self.set_size(size)
    }

    /// Reset cells flagged by the last pass.
    pub fn clear_errors(&mut self) -> PassReport {
        let before = self.word_texts();
        let cleared = self.grid.clear_errors();
        debug!("cleared {} flagged cells", cleared);
        self.run_pass(before)
    }

    /// Replace the grid from a flat board string. Blocks are taken as
    /// given, not mirrored.
    pub fn load_board_string(&mut self, board: &str) -> Result<PassReport, GridError> {
        let before = self.word_texts();
        self.grid = Grid::from_board_string(board)?;
        self.renumber();
        Ok(self.run_pass(before))
    }

    /// Replace the grid with a template's block layout.
    pub fn load_template(&mut self, template: &str) -> Result<PassReport, GridError> {
        let layout = Grid::from_board_string(template)?.template();
        self.load_board_string(&layout)
    }

    /// Erase one word's cells.
    pub fn clear_word(&mut self, number: u32, direction: Direction) -> Result<PassReport, BoardError> {
        let word = self
            .word(number, direction)
            .ok_or_else(|| missing_word(number, direction))?
            .clone();
        let before = self.word_texts();
        word.clear(&mut self.grid);
        Ok(self.run_pass(before))
    }

    /// Write `text` into a word, `_` leaving a cell unresolved.
    pub fn set_word_text(
        &mut self,
        number: u32,
        direction: Direction,
        text: &str,
    ) -> Result<PassReport, BoardError> {
        let word = self
            .word(number, direction)
            .ok_or_else(|| missing_word(number, direction))?
            .clone();
        let before = self.word_texts();
        word.set_text(&mut self.grid, text)?;
        Ok(self.run_pass(before))
    }

    // ========================================================================
    // Clue records
    // ========================================================================

    pub fn records(&self) -> Vec<WordRecord> {
        self.words.iter().map(|w| w.to_record(&self.grid)).collect()
    }

    /// Write persisted answers back onto the current word list. Records are
    /// applied in order; the first mismatch stops the restore, leaving its
    /// own word untouched. A pass runs either way.
    pub fn restore_records(&mut self, records: &[WordRecord]) -> Result<PassReport, BoardError> {
        let before = self.word_texts();
        let restored = self.apply_records(records);
        let report = self.run_pass(before);
        restored.map(|_| report).map_err(BoardError::from)
    }

    fn apply_records(&mut self, records: &[WordRecord]) -> Result<(), WordError> {
        for record in records {
            let Some(i) = self.index.word_numbered(record.number, record.direction) else {
                return Err(WordError::UnexpectedWordShape {
                    number: record.number,
                    direction: record.direction,
                    expected: record.length,
                    found: None,
                });
            };
            self.words[i].apply_record(&mut self.grid, record)?;
        }
        Ok(())
    }

    /// Whole-word suggestions for a word's current shape.
    pub fn suggestions(&self, word: &Word, page: u32) -> Result<Arc<Vec<String>>, CorpusError> {
        self.source.resolve_word_list(&word.shape(&self.grid), page)
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    pub fn to_data(&self, name: &str) -> BoardData {
        BoardData {
            name: name.to_string(),
            cells: self.grid.to_board_string(),
            clues: self.records(),
        }
    }

    pub fn save<T: BoardStore>(&mut self, store: &mut T, name: &str) -> Result<(), BoardError> {
        store
            .save_board(&self.to_data(name))
            .map_err(|e| BoardError::Store(e.to_string()))?;
        self.title = name.to_string();
        self.subscribers.notify(&BoardEvent::Saved(SavedEvent { name: name.to_string() }));
        Ok(())
    }

    pub fn load<T: BoardStore>(&mut self, store: &T, name: &str) -> Result<PassReport, BoardError> {
        let data = store
            .load_board(name)
            .map_err(|e| BoardError::Store(e.to_string()))?
            .ok_or_else(|| BoardError::NotFound(name.to_string()))?;
        self.load_data(&data)
    }

    /// Replace the board with saved data: cells, then clue answers, then one pass.
    pub fn load_data(&mut self, data: &BoardData) -> Result<PassReport, BoardError> {
        let before = self.word_texts();
        self.grid = Grid::from_board_string(&data.cells)?;
        self.renumber();
        if let Err(e) = self.apply_records(&data.clues) {
            warn!("'{}': skipping remaining clue records: {}", data.name, e);
        }
        self.title = data.name.clone();
        Ok(self.run_pass(before))
    }

    /// Store the current block layout as a template. False if it already exists.
    pub fn save_template<T: BoardStore>(&self, store: &mut T) -> Result<bool, BoardError> {
        store
            .save_template(&self.grid.template())
            .map_err(|e| BoardError::Store(e.to_string()))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn renumber(&mut self) {
        let layout = segment(&self.grid);
        self.grid.set_clue_numbers(&layout.numbers);
        self.index = WordIndex::build(&layout.words);
        self.words = layout.words;
        self.subscribers.notify(&BoardEvent::Layout(LayoutEvent {
            reason: LayoutReason::Renumbered,
            word_count: self.words.len(),
        }));
    }

    fn word_texts(&self) -> WordTexts {
        self.word_texts_in(&self.grid)
    }

    /// Texts of the current word list read from `grid`. Only valid while
    /// `grid` has the same layout as the board.
    fn word_texts_in(&self, grid: &Grid) -> WordTexts {
        self.words
            .iter()
            .map(|w| ((w.number, w.direction), w.text(grid)))
            .collect()
    }

    /// Propagate, then announce every word whose text differs from `before`.
    /// Words that did not exist under the old numbering count as changed.
    fn run_pass(&mut self, before: WordTexts) -> PassReport {
        let report = Propagator::with_options(&self.source, self.options)
            .run(&mut self.grid, &mut self.words);

        for word in &self.words {
            let text = word.text(&self.grid);
            if before.get(&(word.number, word.direction)) != Some(&text) {
                self.subscribers.notify(&BoardEvent::WordUpdated(WordUpdatedEvent {
                    number: word.number,
                    direction: word.direction,
                    text,
                }));
            }
        }
        self.subscribers.notify(&BoardEvent::Layout(LayoutEvent {
            reason: LayoutReason::PassSettled,
            word_count: self.words.len(),
        }));

        debug!(
            "pass settled: {} rounds, {} queries, {} filled, {} no-match",
            report.rounds,
            report.queries,
            report.filled.len(),
            report.no_match.len()
        );
        self.last_report = Some(report.clone());
        report
    }
}

fn missing_word(number: u32, direction: Direction) -> BoardError {
    BoardError::Word(WordError::UnexpectedWordShape {
        number,
        direction,
        expected: 0,
        found: None,
    })
}

/// A board shared between threads. Every operation takes the lock for its
/// whole duration, so passes from different threads run one after another.
pub struct SharedBoard<S> {
    inner: Arc<Mutex<Board<S>>>,
}

impl<S> Clone for SharedBoard<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S: CandidateSource> SharedBoard<S> {
    pub fn new(board: Board<S>) -> Self {
        Self { inner: Arc::new(Mutex::new(board)) }
    }

    pub fn lock(&self) -> MutexGuard<'_, Board<S>> {
        self.inner.lock()
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut Board<S>) -> R) -> R {
        let mut board = self.inner.lock();
        f(&mut board)
    }
}
