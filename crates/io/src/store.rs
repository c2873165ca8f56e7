// File-backed board store
// One JSON file per board plus templates.json under a single directory

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use xwfill_engine::store::{board_key, BoardData, BoardStore};
use xwfill_engine::templates::{is_template, DEFAULT_TEMPLATES};

use crate::BOARD_FORMAT_VERSION;

const TEMPLATES_FILE: &str = "templates.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Filesystem failure
    Io(String),
    /// File exists but is not a board
    Parse(String),
    /// Nothing saved under that name
    NotFound(String),
    /// Name cannot be used as a file name inside the store
    InvalidName(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(msg) => write!(f, "I/O error: {}", msg),
            StoreError::Parse(msg) => write!(f, "Parse error: {}", msg),
            StoreError::NotFound(name) => write!(f, "No board named '{}'", name),
            StoreError::InvalidName(name) => write!(f, "Invalid board name '{}'", name),
        }
    }
}

impl std::error::Error for StoreError {}

/// On-disk envelope for a board
#[derive(Serialize, Deserialize)]
struct BoardFile {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(flatten)]
    board: BoardData,
}

fn default_version() -> u32 {
    BOARD_FORMAT_VERSION
}

/// Boards as JSON files in a directory
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File for a board name. The key must stay a plain file name inside `dir`.
    fn board_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        let key = board_key(name);
        let file = format!("{}.json", key);
        if key.is_empty()
            || key.starts_with('.')
            || key.contains(['/', '\\', ':', '\0'])
            || file == TEMPLATES_FILE
        {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(file))
    }

    fn templates_path(&self) -> PathBuf {
        self.dir.join(TEMPLATES_FILE)
    }

    fn ensure_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::Io(e.to_string()))
    }

    fn read_board(path: &Path) -> Result<BoardData, StoreError> {
        let contents = fs::read_to_string(path).map_err(|e| StoreError::Io(e.to_string()))?;
        let file: BoardFile = serde_json::from_str(&contents)
            .map_err(|e| StoreError::Parse(format!("{}: {}", path.display(), e)))?;
        if file.version > BOARD_FORMAT_VERSION {
            return Err(StoreError::Parse(format!(
                "{}: format version {} is newer than supported {}",
                path.display(),
                file.version,
                BOARD_FORMAT_VERSION
            )));
        }
        Ok(file.board)
    }

    /// Write via a temp file so a crash never leaves a half-written board
    fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(value).map_err(|e| StoreError::Parse(e.to_string()))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| StoreError::Io(e.to_string()))?;
        fs::rename(&tmp, path).map_err(|e| StoreError::Io(e.to_string()))
    }

    /// Templates added by the user, without the built-in ones
    fn user_templates(&self) -> Result<Vec<String>, StoreError> {
        let path = self.templates_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&path).map_err(|e| StoreError::Io(e.to_string()))?;
        serde_json::from_str(&contents)
            .map_err(|e| StoreError::Parse(format!("{}: {}", path.display(), e)))
    }

    /// Load a board, failing with `NotFound` when absent
    pub fn require(&self, name: &str) -> Result<BoardData, StoreError> {
        self.load_board(name)?
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }
}

impl BoardStore for JsonStore {
    type Error = StoreError;

    fn load_board(&self, name: &str) -> Result<Option<BoardData>, StoreError> {
        let path = self.board_path(name)?;
        if !path.exists() {
            return Ok(None);
        }
        Self::read_board(&path).map(Some)
    }

    fn save_board(&mut self, board: &BoardData) -> Result<(), StoreError> {
        let path = self.board_path(&board.name)?;
        self.ensure_dir()?;
        debug!("saving board '{}' to {}", board.name, path.display());
        Self::write_json(&path, &BoardFile { version: BOARD_FORMAT_VERSION, board: board.clone() })
    }

    fn list_boards(&self) -> Result<Vec<String>, StoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.dir).map_err(|e| StoreError::Io(e.to_string()))?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StoreError::Io(e.to_string()))?.path();
            let is_board = path.extension().is_some_and(|ext| ext == "json")
                && path.file_name().is_some_and(|n| n != TEMPLATES_FILE);
            if !is_board {
                continue;
            }
            match Self::read_board(&path) {
                Ok(board) => names.push(board.name),
                Err(e) => warn!("skipping {}: {}", path.display(), e),
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete_board(&mut self, name: &str) -> Result<bool, StoreError> {
        let path = self.board_path(name)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(true)
    }

    fn rename_board(&mut self, name: &str, new_name: &str) -> Result<bool, StoreError> {
        let Some(mut board) = self.load_board(name)? else {
            return Ok(false);
        };
        board.name = new_name.to_string();
        self.save_board(&board)?;
        if board_key(name) != board_key(new_name) {
            self.delete_board(name)?;
        }
        Ok(true)
    }

    fn templates(&self) -> Result<Vec<String>, StoreError> {
        let mut all: Vec<String> = DEFAULT_TEMPLATES.iter().map(|t| t.to_string()).collect();
        all.extend(self.user_templates()?);
        Ok(all)
    }

    fn save_template(&mut self, template: &str) -> Result<bool, StoreError> {
        if !is_template(template) {
            return Err(StoreError::Parse(format!("not a block template: '{}'", template)));
        }
        if self.templates()?.iter().any(|t| t == template) {
            return Ok(false);
        }
        let mut user = self.user_templates()?;
        user.push(template.to_string());
        self.ensure_dir()?;
        Self::write_json(&self.templates_path(), &user)?;
        Ok(true)
    }
}
