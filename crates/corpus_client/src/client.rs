//! Corpus HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required). A propagation
//! round calls it from several scoped threads at once, so both caches sit
//! behind a mutex and each key owns a once-cell: the first caller for a
//! shape issues the request, concurrent callers for the same shape wait on
//! that cell and share its result.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use log::debug;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use xwfill_engine::candidates::{is_valid_shape, CandidateMap, CandidateSource, CorpusError};

pub const DEFAULT_BASE_URL: &str = "https://cross-api-webapp.azurewebsites.net/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where and how to reach the corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Cache occupancy and traffic counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    pub candidate_entries: usize,
    pub word_list_entries: usize,
    pub requests: usize,
}

type Slot<T> = Arc<OnceLock<Result<Arc<T>, CorpusError>>>;

/// One candidate as the corpus sends it: `["a", 0.5]`, or a bare `"a"`
/// from older deployments that carry no weights.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireCandidate {
    Weighted(String, f64),
    Bare(String),
}

impl WireCandidate {
    fn into_pair(self) -> Option<(char, f64)> {
        let (letter, weight) = match self {
            WireCandidate::Weighted(l, w) => (l, w),
            WireCandidate::Bare(l) => (l, 1.0),
        };
        let mut chars = letter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some((c.to_ascii_lowercase(), weight)),
            _ => None,
        }
    }
}

/// Corpus API client (blocking). Caches live as long as the client.
pub struct CorpusClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: Option<String>,
    candidates: Mutex<HashMap<String, Slot<CandidateMap>>>,
    word_lists: Mutex<HashMap<(String, u32), Slot<Vec<String>>>>,
    requests: AtomicUsize,
}

impl CorpusClient {
    pub fn new(config: CorpusConfig) -> Result<Self, CorpusError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("xwfill/{}", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| CorpusError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.filter(|k| !k.is_empty()),
            candidates: Mutex::new(HashMap::new()),
            word_lists: Mutex::new(HashMap::new()),
            requests: AtomicUsize::new(0),
        })
    }

    /// Client against `base_url` with default timeout and no key.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, CorpusError> {
        Self::new(CorpusConfig {
            base_url: base_url.into(),
            ..CorpusConfig::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn stats(&self) -> CorpusStats {
        CorpusStats {
            candidate_entries: self.candidates.lock().len(),
            word_list_entries: self.word_lists.lock().len(),
            requests: self.requests.load(Ordering::SeqCst),
        }
    }

    fn fetch_candidates(&self, shape: &str) -> Result<Arc<CandidateMap>, CorpusError> {
        let url = format!("{}/p/{}", self.base_url, shape);
        let positions: Vec<Vec<WireCandidate>> = self.get_json(&url, None)?;
        let map: CandidateMap = positions
            .into_iter()
            .map(|pos| pos.into_iter().filter_map(WireCandidate::into_pair).collect())
            .collect();
        Ok(Arc::new(map))
    }

    fn fetch_word_list(&self, shape: &str, page: u32) -> Result<Arc<Vec<String>>, CorpusError> {
        let url = format!("{}/s/{}", self.base_url, shape);
        let words: Vec<String> = self.get_json(&url, Some(page))?;
        Ok(Arc::new(words))
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, page: Option<u32>) -> Result<T, CorpusError> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let mut request = self.http.get(url);
        if let Some(page) = page {
            request = request.query(&[("page", page)]);
        }
        if let Some(ref key) = self.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request.send().map_err(|e| transport_error(url, e))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CorpusError::Http(status, body));
        }

        response
            .json::<T>()
            .map_err(|e| CorpusError::Parse(e.to_string()))
    }
}

impl CandidateSource for CorpusClient {
    fn resolve_candidates(&self, shape: &str) -> Result<Arc<CandidateMap>, CorpusError> {
        if !is_valid_shape(shape) {
            return Err(CorpusError::InvalidShape(shape.to_string()));
        }
        cached(&self.candidates, shape.to_string(), || self.fetch_candidates(shape))
    }

    fn resolve_word_list(&self, shape: &str, page: u32) -> Result<Arc<Vec<String>>, CorpusError> {
        if !is_valid_shape(shape) {
            return Err(CorpusError::InvalidShape(shape.to_string()));
        }
        cached(&self.word_lists, (shape.to_string(), page), || {
            self.fetch_word_list(shape, page)
        })
    }
}

/// Look `key` up in `cache`, running `fetch` at most once per key among
/// concurrent callers. Failed results are evicted so the next call retries.
fn cached<K, T, F>(
    cache: &Mutex<HashMap<K, Slot<T>>>,
    key: K,
    fetch: F,
) -> Result<Arc<T>, CorpusError>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    F: FnOnce() -> Result<Arc<T>, CorpusError>,
{
    let slot = Arc::clone(cache.lock().entry(key.clone()).or_default());

    let mut fetched = false;
    let result = slot
        .get_or_init(|| {
            fetched = true;
            fetch()
        })
        .clone();
    debug!("corpus {:?}: {}", key, if fetched { "miss" } else { "hit" });

    if result.is_err() {
        let mut map = cache.lock();
        if map.get(&key).is_some_and(|s| Arc::ptr_eq(s, &slot)) {
            map.remove(&key);
        }
    }
    result
}

fn transport_error(url: &str, e: reqwest::Error) -> CorpusError {
    if e.is_timeout() {
        CorpusError::Timeout(url.to_string())
    } else {
        CorpusError::Network(e.to_string())
    }
}
