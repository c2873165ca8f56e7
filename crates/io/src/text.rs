// Plain-text board import/export
// One row per line; blank lines and whitespace are ignored on import

use std::fs;
use std::path::Path;

use xwfill_engine::grid::Grid;

use crate::store::StoreError;

/// Render a grid as one row of symbols per line
pub fn to_text(grid: &Grid) -> String {
    let mut out = grid.to_rows().join("\n");
    out.push('\n');
    out
}

/// Collapse row-per-line text into a flat board string.
/// Symbols are not validated here; `Grid::from_board_string` does that.
pub fn from_text(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .flat_map(|line| line.chars().filter(|c| !c.is_whitespace()))
        .collect()
}

pub fn export(grid: &Grid, path: &Path) -> Result<(), StoreError> {
    fs::write(path, to_text(grid)).map_err(|e| StoreError::Io(e.to_string()))
}

/// Read a board file into a flat board string
pub fn import(path: &Path) -> Result<String, StoreError> {
    let contents = fs::read_to_string(path).map_err(|e| StoreError::Io(e.to_string()))?;
    Ok(from_text(&contents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_text_roundtrip() {
        let grid = Grid::from_board_string("cat#.#dog").unwrap();
        let text = to_text(&grid);
        assert_eq!(text, "cat\n#.#\ndog\n");
        assert_eq!(from_text(&text), "cat#.#dog");
    }

    #[test]
    fn test_from_text_ignores_layout_noise() {
        let text = "// sunday\n c a t \n\n#.#\r\ndog\n";
        assert_eq!(from_text(text), "cat#.#dog");
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("board.txt");
        let grid = Grid::from_board_string("ab..01..#...c..d").unwrap();
        export(&grid, &path).unwrap();
        assert_eq!(import(&path).unwrap(), grid.to_board_string());
    }

    #[test]
    fn test_import_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(import(&dir.path().join("nope.txt")), Err(StoreError::Io(_))));
    }
}
