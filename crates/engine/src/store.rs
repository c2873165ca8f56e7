//! Persistence boundary for saved boards and templates.

use std::collections::BTreeMap;
use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use crate::templates::DEFAULT_TEMPLATES;
use crate::word::WordRecord;

/// A saved board: its flat cell string plus optional clue data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardData {
    pub name: String,
    pub cells: String,
    #[serde(default)]
    pub clues: Vec<WordRecord>,
}

/// Storage key for a friendly board name: trimmed, whitespace runs
/// collapsed to `_`.
pub fn board_key(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Where boards and templates live. Names are matched by `board_key`.
pub trait BoardStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn load_board(&self, name: &str) -> Result<Option<BoardData>, Self::Error>;

    fn save_board(&mut self, board: &BoardData) -> Result<(), Self::Error>;

    /// Saved board names, sorted.
    fn list_boards(&self) -> Result<Vec<String>, Self::Error>;

    /// Returns false if nothing was saved under `name`.
    fn delete_board(&mut self, name: &str) -> Result<bool, Self::Error>;

    /// Move a board to a new name. Returns false if `name` was not found.
    fn rename_board(&mut self, name: &str, new_name: &str) -> Result<bool, Self::Error>;

    /// Every known template, built-in ones first.
    fn templates(&self) -> Result<Vec<String>, Self::Error>;

    /// Add a template. Returns false if an identical one already exists.
    fn save_template(&mut self, template: &str) -> Result<bool, Self::Error>;
}

/// In-process store. Starts with the built-in templates.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    boards: BTreeMap<String, BoardData>,
    templates: Vec<String>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            boards: BTreeMap::new(),
            templates: DEFAULT_TEMPLATES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BoardStore for MemoryStore {
    type Error = Infallible;

    fn load_board(&self, name: &str) -> Result<Option<BoardData>, Infallible> {
        Ok(self.boards.get(&board_key(name)).cloned())
    }

    fn save_board(&mut self, board: &BoardData) -> Result<(), Infallible> {
        self.boards.insert(board_key(&board.name), board.clone());
        Ok(())
    }

    fn list_boards(&self) -> Result<Vec<String>, Infallible> {
        Ok(self.boards.values().map(|b| b.name.clone()).collect())
    }

    fn delete_board(&mut self, name: &str) -> Result<bool, Infallible> {
        Ok(self.boards.remove(&board_key(name)).is_some())
    }

    fn rename_board(&mut self, name: &str, new_name: &str) -> Result<bool, Infallible> {
        let Some(mut board) = self.boards.remove(&board_key(name)) else {
            return Ok(false);
        };
        board.name = new_name.to_string();
        self.boards.insert(board_key(new_name), board);
        Ok(true)
    }

    fn templates(&self) -> Result<Vec<String>, Infallible> {
        Ok(self.templates.clone())
    }

    fn save_template(&mut self, template: &str) -> Result<bool, Infallible> {
        if self.templates.iter().any(|t| t == template) {
            return Ok(false);
        }
        self.templates.push(template.to_string());
        Ok(true)
    }
}
