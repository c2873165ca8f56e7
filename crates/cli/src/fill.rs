//! `xwfill fill` and `xwfill lookup`: the commands that query the corpus.

use serde_json::json;

use xwfill_engine::board::Board;
use xwfill_engine::candidates::CandidateSource;
use xwfill_engine::grid::Grid;
use xwfill_engine::propagate::{PassReport, PropagationOptions};
use xwfill_engine::word::{Direction, Word};
use xwfill_io::text;

use crate::exit_codes::{EXIT_CORPUS_UNAVAILABLE, EXIT_FILL_NO_MATCH, EXIT_FILL_UNSETTLED};
use crate::inspect::clue_label;
use crate::{emit, emit_json, BoardArgs, CliError, Context};

/// Hint letters on one cell for one direction.
struct CellHint {
    cell: usize,
    direction: Direction,
    letters: String,
}

fn collect_hints(grid: &Grid) -> Vec<CellHint> {
    let mut hints = Vec::new();
    for (cell, c) in grid.cells().iter().enumerate() {
        for direction in Direction::ALL {
            let set = c.hints(direction);
            if !set.is_empty() {
                hints.push(CellHint { cell, direction, letters: set.iter().collect() });
            }
        }
    }
    hints
}

/// Every request failed: the corpus is down, not the board unfillable.
fn corpus_unreachable(report: &PassReport) -> bool {
    report.queries > 0 && report.failures == report.queries
}

pub fn cmd_fill(
    ctx: &Context,
    input: &BoardArgs,
    options: PropagationOptions,
    strict: bool,
    save: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let data = input.resolve(ctx)?;
    let client = ctx.corpus()?;

    let mut board = Board::with_size(client, 1).with_options(options);
    let report = board.load_data(&data).map_err(CliError::board)?;

    if corpus_unreachable(&report) {
        return Err(CliError::new(
            EXIT_CORPUS_UNAVAILABLE,
            format!(
                "corpus at {} did not answer any of {} requests",
                ctx.settings.corpus_url, report.queries
            ),
        )
        .with_hint("check corpus.baseUrl in settings, XWFILL_CORPUS_URL or --corpus-url"));
    }

    if let Some(name) = &save {
        board.save(&mut ctx.store(), name).map_err(CliError::board)?;
    }

    let grid = board.grid();
    let no_match: Vec<&Word> = board.words().iter().filter(|w| w.state.no_match).collect();
    let hints = collect_hints(grid);

    if json {
        let filled: Vec<_> = report
            .filled
            .iter()
            .map(|(cell, letter)| json!({ "cell": cell, "letter": letter.to_string() }))
            .collect();
        let unmatched: Vec<_> = no_match
            .iter()
            .map(|w| json!({ "number": w.number, "direction": w.direction, "shape": w.shape(grid) }))
            .collect();
        let hint_entries: Vec<_> = hints
            .iter()
            .map(|h| json!({ "cell": h.cell, "direction": h.direction, "letters": h.letters }))
            .collect();
        emit_json(&json!({
            "board": grid.to_board_string(),
            "rows": grid.to_rows(),
            "rounds": report.rounds,
            "queries": report.queries,
            "failures": report.failures,
            "converged": report.converged,
            "filled": filled,
            "no_match": unmatched,
            "hints": hint_entries,
            "totals": board.totals(),
        }))?;
    } else {
        emit(text::to_text(grid).trim_end())?;
        for word in &no_match {
            emit(&format!("no match  {:>4}  {}", clue_label(word), word.shape(grid)))?;
        }
        for hint in &hints {
            let (row, col) = grid.row_col(hint.cell);
            emit(&format!("hint      r{}c{} {:<6}  {}", row + 1, col + 1, hint.direction.as_str(), hint.letters))?;
        }
        eprintln!(
            "filled {} cells in {} rounds ({} queries, {} failed)",
            report.filled.len(),
            report.rounds,
            report.queries,
            report.failures
        );
    }

    if strict {
        if !no_match.is_empty() {
            return Err(CliError::new(
                EXIT_FILL_NO_MATCH,
                format!("{} words have no possible completion", no_match.len()),
            ));
        }
        if !report.converged {
            return Err(CliError::new(
                EXIT_FILL_UNSETTLED,
                format!("stopped after {} rounds with letters still being placed", report.rounds),
            )
            .with_hint("raise fill.maxRounds or pass --rounds"));
        }
    }
    Ok(())
}

pub fn cmd_lookup(ctx: &Context, shape: &str, page: u32, json: bool) -> Result<(), CliError> {
    if page == 0 {
        return Err(CliError::usage("pages start at 1"));
    }
    let shape = shape.trim().to_ascii_lowercase();
    let client = ctx.corpus()?;
    let words = client.resolve_word_list(&shape, page).map_err(CliError::corpus)?;

    if json {
        return emit_json(&json!({ "shape": shape, "page": page, "words": words.as_slice() }));
    }
    for word in words.iter() {
        emit(word)?;
    }
    Ok(())
}
