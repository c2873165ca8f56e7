//! Corpus-facing types: candidate maps and the source trait the
//! propagation engine queries.

use std::fmt;
use std::sync::Arc;

/// Candidate letters for one word position, in corpus order.
pub type LetterWeights = Vec<(char, f64)>;

/// Per-position candidates for one shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateMap {
    positions: Vec<LetterWeights>,
}

impl CandidateMap {
    pub fn new(positions: Vec<LetterWeights>) -> Self {
        Self { positions }
    }

    pub fn positions(&self) -> &[LetterWeights] {
        &self.positions
    }

    pub fn position(&self, index: usize) -> Option<&LetterWeights> {
        self.positions.get(index)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// No positions, or nothing at all for the first position: no word fits.
    pub fn is_empty(&self) -> bool {
        self.positions.first().map(|p| p.is_empty()).unwrap_or(true)
    }
}

impl FromIterator<LetterWeights> for CandidateMap {
    fn from_iter<I: IntoIterator<Item = LetterWeights>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A corpus request failed. Every variant means the corpus is unavailable
/// for that shape; callers treat it as "no candidates".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusError {
    /// Shape contains characters the corpus does not understand.
    InvalidShape(String),
    /// Connection-level failure
    Network(String),
    /// Non-2xx response
    Http(u16, String),
    /// Request exceeded the configured timeout
    Timeout(String),
    /// Response body was not the expected JSON
    Parse(String),
}

impl fmt::Display for CorpusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorpusError::InvalidShape(shape) => write!(f, "Invalid shape pattern '{}'", shape),
            CorpusError::Network(msg) => write!(f, "Corpus unavailable: {}", msg),
            CorpusError::Http(code, msg) => write!(f, "Corpus unavailable: HTTP {}: {}", code, msg),
            CorpusError::Timeout(msg) => write!(f, "Corpus unavailable: timeout: {}", msg),
            CorpusError::Parse(msg) => write!(f, "Corpus unavailable: bad response: {}", msg),
        }
    }
}

impl std::error::Error for CorpusError {}

/// Anything that can answer shape queries. Implementations must be safe to
/// call from several threads at once: one propagation round issues every
/// word's request concurrently.
pub trait CandidateSource: Sync {
    /// Per-position candidate letters for `shape`.
    fn resolve_candidates(&self, shape: &str) -> Result<Arc<CandidateMap>, CorpusError>;

    /// Whole words matching `shape`, one page at a time.
    fn resolve_word_list(&self, shape: &str, page: u32) -> Result<Arc<Vec<String>>, CorpusError>;
}

impl<S: CandidateSource + Send + ?Sized> CandidateSource for Arc<S> {
    fn resolve_candidates(&self, shape: &str) -> Result<Arc<CandidateMap>, CorpusError> {
        (**self).resolve_candidates(shape)
    }

    fn resolve_word_list(&self, shape: &str, page: u32) -> Result<Arc<Vec<String>>, CorpusError> {
        (**self).resolve_word_list(shape, page)
    }
}

/// Valid query characters: `.`, `0`, `1` and a-z.
pub fn is_valid_shape(shape: &str) -> bool {
    !shape.is_empty()
        && shape
            .chars()
            .all(|c| matches!(c, '.' | '0' | '1') || c.is_ascii_lowercase())
}
