//! Stub candidate sources for exercising propagation and board sessions
//! without a corpus server.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::candidates::{CandidateMap, CandidateSource, CorpusError, LetterWeights};

/// Build one position's candidate list.
pub fn weights(pairs: &[(char, f64)]) -> LetterWeights {
    pairs.to_vec()
}

/// Answers from a fixed table. Unknown shapes resolve to an empty map.
#[derive(Default)]
pub struct FixedSource {
    maps: HashMap<String, Result<Arc<CandidateMap>, CorpusError>>,
    lists: HashMap<String, Vec<String>>,
    calls: AtomicUsize,
}

impl FixedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, shape: &str, positions: Vec<LetterWeights>) -> Self {
        self.maps
            .insert(shape.to_string(), Ok(Arc::new(CandidateMap::new(positions))));
        self
    }

    pub fn failing(mut self, shape: &str) -> Self {
        self.maps.insert(
            shape.to_string(),
            Err(CorpusError::Network("connection refused".into())),
        );
        self
    }

    pub fn with_words(mut self, shape: &str, words: &[&str]) -> Self {
        self.lists
            .insert(shape.to_string(), words.iter().map(|w| w.to_string()).collect());
        self
    }

    /// Candidate requests seen so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CandidateSource for FixedSource {
    fn resolve_candidates(&self, shape: &str) -> Result<Arc<CandidateMap>, CorpusError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.maps.get(shape) {
            Some(result) => result.clone(),
            None => Ok(Arc::new(CandidateMap::default())),
        }
    }

    fn resolve_word_list(&self, shape: &str, page: u32) -> Result<Arc<Vec<String>>, CorpusError> {
        let words = self.lists.get(shape).cloned().unwrap_or_default();
        // Pages of 10, 1-based
        let start = (page.saturating_sub(1) as usize) * 10;
        Ok(Arc::new(words.into_iter().skip(start).take(10).collect()))
    }
}

enum Script {
    /// Position 1 gets a new unique letter on every call; the rest stay ambiguous.
    Cycling,
    /// Every position gets the whole alphabet at equal weight.
    Alphabet,
}

/// Generates answers from the call count instead of a table.
pub struct ScriptedSource {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn cycling() -> Self {
        Self { script: Script::Cycling, calls: AtomicUsize::new(0) }
    }

    pub fn alphabet() -> Self {
        Self { script: Script::Alphabet, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CandidateSource for ScriptedSource {
    fn resolve_candidates(&self, shape: &str) -> Result<Arc<CandidateMap>, CorpusError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let len = shape.chars().count();
        let map = match self.script {
            Script::Cycling => (0..len)
                .map(|pos| {
                    if pos == 1 {
                        vec![((b'a' + (call % 26) as u8) as char, 1.0)]
                    } else {
                        vec![('a', 0.5), ('b', 0.5)]
                    }
                })
                .collect(),
            Script::Alphabet => (0..len)
                .map(|_| ('a'..='z').map(|c| (c, 1.0 / 26.0)).collect())
                .collect(),
        };
        Ok(Arc::new(map))
    }

    fn resolve_word_list(&self, _shape: &str, _page: u32) -> Result<Arc<Vec<String>>, CorpusError> {
        Ok(Arc::new(Vec::new()))
    }
}
