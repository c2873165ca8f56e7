//! Word corpus client, shared by the CLI and anything else that drives
//! a board.
//!
//! This crate owns the corpus wire contract: per-position candidate
//! queries and paged word-list queries, each cached for the life of the
//! client. No retries.

mod client;

pub use client::{CorpusClient, CorpusConfig, CorpusStats, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
