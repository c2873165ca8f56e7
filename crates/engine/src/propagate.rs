//! Fill propagation.
//!
//! One pass runs up to `max_rounds` rounds. Each round recomputes every
//! queryable word's shape from the current grid, resolves all shapes
//! concurrently, then applies the results word by word: unique candidates
//! auto-fill their cell, ambiguous positions get a hint set, and words the
//! corpus cannot match are flagged NoMatch. A round that fills nothing ends
//! the pass.

use std::sync::Arc;
use std::thread;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::candidates::{CandidateMap, CandidateSource, CorpusError};
use crate::cell::{HintSet, Symbol};
use crate::grid::Grid;
use crate::word::{Word, WordState};

pub const MAX_ROUNDS: usize = 3;
pub const HINT_THRESHOLD: f64 = 0.15;
pub const FALLBACK_HINTS: usize = 5;

/// Upper bound on lookup threads alive at once within a round.
const MAX_LOOKUP_THREADS: usize = 16;

/// Which candidates make up the hint set when none clears the threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FallbackOrder {
    /// The lowest-weighted candidates. Matches the output of earlier
    /// releases of the tool.
    #[default]
    LowestWeight,
    /// The highest-weighted candidates.
    HighestWeight,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagationOptions {
    pub max_rounds: usize,
    pub hint_threshold: f64,
    pub fallback_count: usize,
    pub fallback_order: FallbackOrder,
}

impl Default for PropagationOptions {
    fn default() -> Self {
        Self {
            max_rounds: MAX_ROUNDS,
            hint_threshold: HINT_THRESHOLD,
            fallback_count: FALLBACK_HINTS,
            fallback_order: FallbackOrder::LowestWeight,
        }
    }
}

/// What one pass did.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PassReport {
    /// Rounds that issued at least one query.
    pub rounds: usize,
    /// Candidate requests issued across all rounds.
    pub queries: usize,
    /// Cells auto-filled, in the order they were written.
    pub filled: Vec<(usize, char)>,
    /// Positions in the word list of words left flagged NoMatch.
    pub no_match: Vec<usize>,
    /// Requests that failed outright (counted inside `no_match` too).
    pub failures: usize,
    /// False when the pass stopped on the round cap while still making progress.
    pub converged: bool,
}

/// Pick the letters to show on an ambiguous cell. Sorted alphabetically.
pub fn hint_set(weights: &[(char, f64)], options: &PropagationOptions) -> HintSet {
    let best: HintSet = weights
        .iter()
        .filter(|(_, w)| *w > options.hint_threshold)
        .map(|(c, _)| *c)
        .collect();
    if !best.is_empty() {
        return best;
    }

    let mut ranked: Vec<&(char, f64)> = weights.iter().collect();
    match options.fallback_order {
        FallbackOrder::LowestWeight => ranked.sort_by(|a, b| a.1.total_cmp(&b.1)),
        FallbackOrder::HighestWeight => ranked.sort_by(|a, b| b.1.total_cmp(&a.1)),
    }
    ranked
        .into_iter()
        .take(options.fallback_count)
        .map(|(c, _)| *c)
        .collect()
}

/// Clear per-pass state: word flags back to their length classification,
/// cell hints and warnings dropped.
pub fn reset_states(grid: &mut Grid, words: &mut [Word]) {
    grid.clear_annotations();
    for word in words.iter_mut() {
        word.state = WordState::for_length(word.len());
    }
}

pub struct Propagator<'a, S: ?Sized> {
    source: &'a S,
    options: PropagationOptions,
}

impl<'a, S: CandidateSource + ?Sized> Propagator<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self::with_options(source, PropagationOptions::default())
    }

    pub fn with_options(source: &'a S, options: PropagationOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> &PropagationOptions {
        &self.options
    }

    /// Run one pass over `words`, writing fills, hints and warnings into `grid`.
    pub fn run(&self, grid: &mut Grid, words: &mut [Word]) -> PassReport {
        reset_states(grid, words);
        let mut report = PassReport { converged: true, ..Default::default() };

        while report.rounds < self.options.max_rounds {
            let jobs: Vec<(usize, String)> = words
                .iter()
                .enumerate()
                .filter(|(_, w)| w.is_queryable(grid))
                .map(|(i, w)| (i, w.shape(grid)))
                .collect();
            Self::clear_settled(grid, words, &jobs);
            if jobs.is_empty() {
                break;
            }

            report.rounds += 1;
            report.queries += jobs.len();
            let results = self.resolve_all(&jobs);

            let mut progress = false;
            for ((word_index, shape), result) in jobs.iter().zip(results) {
                let word = &mut words[*word_index];
                progress |= self.apply(grid, word, shape, result, &mut report);
            }

            debug!(
                "round {}: {} queries, {} cells filled so far, progress={}",
                report.rounds,
                jobs.len(),
                report.filled.len(),
                progress
            );
            if !progress {
                break;
            }
            if report.rounds == self.options.max_rounds {
                report.converged = false;
            }
        }

        report.no_match = words
            .iter()
            .enumerate()
            .filter(|(_, w)| w.state.no_match)
            .map(|(i, _)| i)
            .collect();
        report
    }

    /// Drop hints, warnings and NoMatch from words that stopped being
    /// queryable, typically because crossing fills completed them.
    fn clear_settled(grid: &mut Grid, words: &mut [Word], jobs: &[(usize, String)]) {
        for (i, word) in words.iter_mut().enumerate() {
            if jobs.iter().any(|(j, _)| *j == i) {
                continue;
            }
            word.state.no_match = false;
            for &index in word.cells() {
                if let Ok(cell) = grid.cell_mut(index) {
                    cell.clear_direction(word.direction);
                }
            }
        }
    }

    fn resolve_all(&self, jobs: &[(usize, String)]) -> Vec<Result<Arc<CandidateMap>, CorpusError>> {
        let mut results = Vec::with_capacity(jobs.len());
        for chunk in jobs.chunks(MAX_LOOKUP_THREADS) {
            thread::scope(|scope| {
                let handles: Vec<_> = chunk
                    .iter()
                    .map(|(_, shape)| scope.spawn(move || self.source.resolve_candidates(shape)))
                    .collect();
                for handle in handles {
                    results.push(handle.join().unwrap_or_else(|_| {
                        Err(CorpusError::Network("lookup worker panicked".into()))
                    }));
                }
            });
        }
        results
    }

    /// Apply one word's lookup result. Returns true if any cell was filled.
    fn apply(
        &self,
        grid: &mut Grid,
        word: &mut Word,
        shape: &str,
        result: Result<Arc<CandidateMap>, CorpusError>,
        report: &mut PassReport,
    ) -> bool {
        let direction = word.direction;
        for &index in word.cells() {
            if let Ok(cell) = grid.cell_mut(index) {
                cell.clear_direction(direction);
            }
        }

        let map = match result {
            Ok(map) if !map.is_empty() => map,
            Ok(_) => {
                debug!("{} {} '{}': no match", word.number, direction, shape);
                Self::flag_no_match(grid, word);
                return false;
            }
            Err(e) => {
                warn!("{} {} '{}': {}", word.number, direction, shape, e);
                report.failures += 1;
                Self::flag_no_match(grid, word);
                return false;
            }
        };
        word.state.no_match = false;

        let mut filled = false;
        for (&index, weights) in word.cells().iter().zip(map.positions()) {
            let Ok(cell) = grid.cell_mut(index) else {
                continue;
            };
            match weights.as_slice() {
                [] => {}
                [(letter, _)] => {
                    let letter = letter.to_ascii_lowercase();
                    if !letter.is_ascii_lowercase() {
                        continue;
                    }
                    if cell.content != Symbol::Letter(letter) {
                        cell.content = Symbol::Letter(letter);
                        report.filled.push((index, letter));
                        filled = true;
                    }
                }
                _ => {
                    cell.hints[direction.index()] = hint_set(weights, &self.options);
                }
            }
        }
        filled
    }

    fn flag_no_match(grid: &mut Grid, word: &mut Word) {
        word.state.no_match = true;
        for &index in word.cells() {
            if let Ok(cell) = grid.cell_mut(index) {
                cell.warnings[word.direction.index()] = true;
            }
        }
    }
}
