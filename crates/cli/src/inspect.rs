//! `xwfill words` and `xwfill score`: read-only views of a board's layout.
//!
//! Neither command talks to the corpus; word states here are the
//! length-based ones only.

use serde_json::json;

use xwfill_engine::grid::Grid;
use xwfill_engine::scoring::Totals;
use xwfill_engine::segment::segment;
use xwfill_engine::word::{Direction, Word};

use crate::{emit, emit_json, parse_grid, BoardArgs, CliError, Context};

fn load(ctx: &Context, input: &BoardArgs) -> Result<(Grid, Vec<Word>), CliError> {
    let data = input.resolve(ctx)?;
    let grid = parse_grid(&data.cells)?;
    let words = segment(&grid).words;
    Ok((grid, words))
}

/// Clue label like `12A` / `3D`.
pub fn clue_label(word: &Word) -> String {
    let suffix = match word.direction {
        Direction::Across => 'A',
        Direction::Down => 'D',
    };
    format!("{}{}", word.number, suffix)
}

pub fn cmd_words(ctx: &Context, input: &BoardArgs, json: bool) -> Result<(), CliError> {
    let (grid, words) = load(ctx, input)?;

    if json {
        let entries: Vec<_> = words
            .iter()
            .map(|w| {
                json!({
                    "number": w.number,
                    "direction": w.direction,
                    "length": w.len(),
                    "shape": w.shape(&grid),
                    "complete": w.is_complete(&grid),
                    "state": w.state.labels(),
                    "cells": w.cells(),
                })
            })
            .collect();
        return emit_json(&json!(entries));
    }

    for word in &words {
        let labels = word.state.labels().join(",");
        emit(&format!(
            "{:>4}  {:>2}  {}{}",
            clue_label(word),
            word.len(),
            word.shape(&grid),
            if labels.is_empty() { String::new() } else { format!("  [{}]", labels) }
        ))?;
    }
    Ok(())
}

pub fn cmd_score(ctx: &Context, input: &BoardArgs, json: bool) -> Result<(), CliError> {
    let (grid, words) = load(ctx, input)?;
    let totals = Totals::compute(&grid, &words);

    if json {
        let entries: Vec<_> = words
            .iter()
            .map(|w| {
                json!({
                    "number": w.number,
                    "direction": w.direction,
                    "text": w.text(&grid),
                    "complete": w.is_complete(&grid),
                    "points": w.scrabble_value(&grid),
                })
            })
            .collect();
        return emit_json(&json!({ "totals": totals, "words": entries }));
    }

    emit(&format!("words     {} ({} across, {} down)", totals.words, totals.across, totals.down))?;
    emit(&format!("complete  {}", totals.complete))?;
    emit(&format!("flagged   {}", totals.flagged))?;
    emit(&format!("points    {}", totals.points))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clue_label() {
        let grid = Grid::from_board_string("cat#.#dog").unwrap();
        let labels: Vec<String> = segment(&grid).words.iter().map(clue_label).collect();
        assert_eq!(labels, vec!["1A", "1D", "2D", "3D", "4A", "5A", "5D", "6D"]);
    }
}
