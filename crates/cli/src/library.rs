//! Saved boards and templates: `xwfill boards`, `xwfill save`,
//! `xwfill templates`.

use std::path::Path;

use serde_json::json;

use xwfill_engine::segment::segment;
use xwfill_engine::store::{BoardData, BoardStore};
use xwfill_engine::templates::{is_template, templates_for_size};
use xwfill_engine::word::WordRecord;
use xwfill_io::{text, StoreError};

use crate::exit_codes::EXIT_STORE_TEMPLATE;
use crate::{emit, emit_json, parse_grid, BoardArgs, CliError, Context};

// ── templates ───────────────────────────────────────────────────────

pub fn cmd_templates(ctx: &Context, size: Option<usize>, json: bool) -> Result<(), CliError> {
    let all = ctx.store().templates().map_err(CliError::store)?;
    let listed: Vec<&str> = match size {
        Some(size) => templates_for_size(all.iter().map(String::as_str), size),
        None => all.iter().map(String::as_str).collect(),
    };

    let side = |t: &str| (t.len() as f64).sqrt() as usize;
    let blocks = |t: &str| t.chars().filter(|&c| c == '#').count();

    if json {
        let entries: Vec<_> = listed
            .iter()
            .map(|t| json!({ "size": side(t), "blocks": blocks(t), "template": t }))
            .collect();
        return emit_json(&json!(entries));
    }
    for t in listed {
        emit(&format!("{:>2}x{:<2}  {:>3} blocks  {}", side(t), side(t), blocks(t), t))?;
    }
    Ok(())
}

pub fn cmd_template_add(ctx: &Context, template: &str) -> Result<(), CliError> {
    let template = template.trim();
    if !is_template(template) {
        return Err(CliError::new(EXIT_STORE_TEMPLATE, format!("not a block template: '{}'", template))
            .with_hint("templates are square and use only '#' and '.'"));
    }
    let added = ctx.store().save_template(template).map_err(CliError::store)?;
    if added {
        eprintln!("template added");
    } else {
        eprintln!("template already present");
    }
    Ok(())
}

// ── boards ──────────────────────────────────────────────────────────

pub fn cmd_boards_list(ctx: &Context, json: bool) -> Result<(), CliError> {
    let names = ctx.store().list_boards().map_err(CliError::store)?;
    if json {
        return emit_json(&json!(names));
    }
    for name in names {
        emit(&name)?;
    }
    Ok(())
}

pub fn cmd_boards_show(ctx: &Context, name: &str, json: bool) -> Result<(), CliError> {
    let data = ctx.store().require(name).map_err(CliError::store)?;
    let grid = parse_grid(&data.cells)?;

    if json {
        return emit_json(&json!({
            "name": data.name,
            "cells": data.cells,
            "rows": grid.to_rows(),
            "clues": data.clues,
        }));
    }
    emit(text::to_text(&grid).trim_end())?;
    for record in data.clues.iter().filter(|r| !r.clue.is_empty()) {
        emit(&format!("{:>3} {:<6}  {}  ({})", record.number, record.direction.as_str(), record.clue, record.length))?;
    }
    Ok(())
}

pub fn cmd_boards_delete(ctx: &Context, name: &str) -> Result<(), CliError> {
    if !ctx.store().delete_board(name).map_err(CliError::store)? {
        return Err(CliError::store(StoreError::NotFound(name.to_string())));
    }
    eprintln!("deleted '{}'", name);
    Ok(())
}

pub fn cmd_boards_rename(ctx: &Context, name: &str, new_name: &str) -> Result<(), CliError> {
    let mut store = ctx.store();
    if new_name.trim().is_empty() {
        return Err(CliError::usage("new board name is empty"));
    }
    let same_key = xwfill_engine::store::board_key(name) == xwfill_engine::store::board_key(new_name);
    if !same_key && store.load_board(new_name).map_err(CliError::store)?.is_some() {
        return Err(CliError::usage(format!("a board named '{}' already exists", new_name))
            .with_hint("delete it first with `xwfill boards delete`"));
    }
    if !store.rename_board(name, new_name).map_err(CliError::store)? {
        return Err(CliError::store(StoreError::NotFound(name.to_string())));
    }
    eprintln!("renamed '{}' to '{}'", name, new_name);
    Ok(())
}

pub fn cmd_boards_export(ctx: &Context, name: &str, output: &Path) -> Result<(), CliError> {
    let data = ctx.store().require(name).map_err(CliError::store)?;
    let grid = parse_grid(&data.cells)?;
    text::export(&grid, output).map_err(CliError::store)?;
    eprintln!("wrote {}", output.display());
    Ok(())
}

// ── save ────────────────────────────────────────────────────────────

/// Records for the board as it stands, keeping clue text from `previous`
/// where the same word still exists.
fn records_with_clues(data: &BoardData, previous: &[WordRecord]) -> Result<Vec<WordRecord>, CliError> {
    let grid = parse_grid(&data.cells)?;
    let mut records: Vec<WordRecord> = segment(&grid).words.iter().map(|w| w.to_record(&grid)).collect();
    for record in &mut records {
        if let Some(old) = previous
            .iter()
            .find(|p| p.number == record.number && p.direction == record.direction)
        {
            record.clue = old.clue.clone();
        }
    }
    Ok(records)
}

pub fn cmd_save(ctx: &Context, name: &str, input: &BoardArgs, template: bool) -> Result<(), CliError> {
    if name.trim().is_empty() {
        return Err(CliError::usage("board name is empty"));
    }
    let source = input.resolve(ctx)?;
    let grid = parse_grid(&source.cells)?;
    let clues = records_with_clues(&source, &source.clues)?;

    let mut store = ctx.store();
    let data = BoardData { name: name.trim().to_string(), cells: grid.to_board_string(), clues };
    store.save_board(&data).map_err(CliError::store)?;
    eprintln!("saved '{}' in {}", data.name, store.dir().display());

    if template {
        let added = store.save_template(&grid.template()).map_err(CliError::store)?;
        if added {
            eprintln!("template added");
        } else {
            eprintln!("template already present");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use xwfill_engine::word::Direction;

    #[test]
    fn test_records_keep_clue_text_by_number_and_direction() {
        let data = BoardData { name: "g".into(), cells: "cat#.#dog".into(), clues: vec![] };
        let previous = vec![WordRecord {
            clue: "Feline".into(),
            number: 1,
            direction: Direction::Across,
            answer: "cot".into(),
            shape: "cot".into(),
            length: 3,
            points: 5,
        }];

        let records = records_with_clues(&data, &previous).unwrap();

        let first = records.iter().find(|r| r.number == 1 && r.direction == Direction::Across).unwrap();
        assert_eq!(first.clue, "Feline");
        assert_eq!(first.answer, "cat");
        assert!(records.iter().filter(|r| r.number != 1 || r.direction != Direction::Across).all(|r| r.clue.is_empty()));
    }
}
