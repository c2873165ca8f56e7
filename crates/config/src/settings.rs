// Application settings
// Loaded from ~/.config/xwfill/settings.json

use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CORPUS_URL: &str = "https://cross-api-webapp.azurewebsites.net/api";

/// Environment variable overriding `corpus.baseUrl`.
pub const ENV_CORPUS_URL: &str = "XWFILL_CORPUS_URL";
/// Environment variable overriding `corpus.apiKey`.
pub const ENV_API_KEY: &str = "XWFILL_API_KEY";

/// Which candidates become hints when none clears the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FallbackPreference {
    #[default]
    LowestWeight,
    HighestWeight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Corpus
    #[serde(rename = "corpus.baseUrl")]
    pub corpus_url: String,

    #[serde(rename = "corpus.apiKey")]
    pub api_key: Option<String>,

    #[serde(rename = "corpus.timeoutSecs")]
    pub timeout_secs: u64,

    // Board
    #[serde(rename = "board.defaultSize")]
    pub default_size: usize,

    #[serde(rename = "board.directory")]
    pub board_dir: Option<PathBuf>,  // None = <config>/xwfill/boards

    // Fill
    #[serde(rename = "fill.maxRounds")]
    pub max_rounds: usize,

    #[serde(rename = "fill.hintThreshold")]
    pub hint_threshold: f64,

    #[serde(rename = "fill.fallbackCount")]
    pub fallback_count: usize,

    #[serde(rename = "fill.fallbackOrder")]
    pub fallback_order: FallbackPreference,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Corpus
            corpus_url: DEFAULT_CORPUS_URL.to_string(),
            api_key: None,
            timeout_secs: 10,
            // Board
            default_size: 15,
            board_dir: None,
            // Fill
            max_rounds: 3,
            hint_threshold: 0.15,
            fallback_count: 5,
            fallback_order: FallbackPreference::LowestWeight,
        }
    }
}

impl Settings {
    /// Directory holding settings and saved boards
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("xwfill")
    }

    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    /// Where saved boards live
    pub fn boards_dir(&self) -> PathBuf {
        self.board_dir
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("boards"))
    }

    /// Load settings from disk and the environment, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            Self::create_default_file(&path);
        }
        let mut settings = Self::load_from(&path);
        settings.apply_overrides(|key| std::env::var(key).ok());
        settings
    }

    /// Load one settings file. Missing or malformed files give defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(settings) => settings.sanitized(),
                Err(e) => {
                    warn!("Error parsing {}: {}; using default settings", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON, ignoring `//` comment lines
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&cleaned)
    }

    /// Apply environment-style overrides. `lookup` returns a variable's value.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_CORPUS_URL).filter(|v| !v.is_empty()) {
            self.corpus_url = url;
        }
        if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.is_empty()) {
            self.api_key = Some(key);
        }
    }

    /// Replace out-of-range values with their defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.corpus_url.trim().is_empty() {
            self.corpus_url = defaults.corpus_url;
        }
        if self.timeout_secs == 0 {
            self.timeout_secs = defaults.timeout_secs;
        }
        if self.default_size == 0 {
            self.default_size = defaults.default_size;
        }
        if self.max_rounds == 0 {
            self.max_rounds = defaults.max_rounds;
        }
        if !(0.0..=1.0).contains(&self.hint_threshold) {
            self.hint_threshold = defaults.hint_threshold;
        }
        self
    }

    /// Save current settings to disk
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| e.to_string())?;

        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Create default settings file with comments
    fn create_default_file(path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("Error creating config directory: {}", e);
                return;
            }
        }

        let default_config = format!(
            r#"{{
    // Word corpus
    // XWFILL_CORPUS_URL and XWFILL_API_KEY override these
    "corpus.baseUrl": "{DEFAULT_CORPUS_URL}",
    "corpus.apiKey": null,
    "corpus.timeoutSecs": 10,

    // New boards
    "board.defaultSize": 15,

    // Fill propagation
    "fill.maxRounds": 3,
    "fill.hintThreshold": 0.15,
    "fill.fallbackCount": 5,
    // "lowestWeight" or "highestWeight"
    "fill.fallbackOrder": "lowestWeight"
}}
"#
        );

        if let Err(e) = fs::write(path, default_config) {
            warn!("Error writing default settings.json: {}", e);
        }
    }
}
