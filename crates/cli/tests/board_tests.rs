// Integration tests for the offline commands: words, score, save, boards, templates.
// Run with: cargo test -p xwfill-cli --test board_tests -- --nocapture

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Binary isolated from the user's settings and saved boards.
fn xwfill(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_xwfill"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd.env("XWFILL_CONFIG", home.join("settings.json"))
        .env("XWFILL_BOARD_DIR", home.join("boards"))
        .env_remove("XWFILL_CORPUS_URL")
        .env_remove("XWFILL_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn run(home: &Path, args: &[&str]) -> Output {
    xwfill(home).args(args).output().expect("run xwfill")
}

fn assert_single_json(stdout: &[u8]) -> serde_json::Value {
    let text = String::from_utf8_lossy(stdout);
    let trimmed = text.trim();
    assert!(!trimmed.is_empty(), "stdout should not be empty");
    serde_json::from_str(trimmed)
        .unwrap_or_else(|e| panic!("stdout must be valid JSON.\nParse error: {}\nstdout:\n{}", e, trimmed))
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

// ---------------------------------------------------------------------------
// words / score
// ---------------------------------------------------------------------------

#[test]
fn words_json_lists_layout_in_anchor_order() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["words", "cat#.#dog", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let words = assert_single_json(&output.stdout);
    let words = words.as_array().unwrap();
    assert_eq!(words.len(), 8);

    assert_eq!(words[0]["number"], 1);
    assert_eq!(words[0]["direction"], "across");
    assert_eq!(words[0]["shape"], "cat");
    assert_eq!(words[0]["complete"], true);
    assert_eq!(words[0]["state"], serde_json::json!([]));

    assert_eq!(words[1]["direction"], "down");
    assert_eq!(words[1]["state"], serde_json::json!(["too-short"]));

    assert_eq!(words[2]["number"], 2);
    assert_eq!(words[2]["shape"], "a.o");
    assert_eq!(words[2]["cells"], serde_json::json!([1, 4, 7]));
}

#[test]
fn words_text_marks_flagged_words() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["words", "--size", "11"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    // One across and one down word per row/column of an open 11x11 board
    assert_eq!(lines.len(), 22);
    assert!(lines.iter().all(|l| l.contains("[too-long]")));
}

#[test]
fn words_reads_text_board_file() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("mini.txt");
    fs::write(&path, "// mini\nc a t\n# . #\nd o g\n").unwrap();

    let output = run(home.path(), &["words", "--file", path.to_str().unwrap(), "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let words = assert_single_json(&output.stdout);
    assert_eq!(words[0]["shape"], "cat");
}

#[test]
fn words_rejects_bad_symbol_with_hint() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["words", "ca?#.#dog"]);

    assert_eq!(output.status.code(), Some(3));
    let err = stderr(&output);
    assert!(err.contains("error:"), "stderr: {}", err);
    assert!(err.contains("hint:"), "stderr: {}", err);
}

#[test]
fn words_rejects_non_square_board() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["words", "abc"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn words_missing_file_is_usage_error() {
    let home = TempDir::new().unwrap();
    let missing = home.path().join("nope.txt");
    let output = run(home.path(), &["words", "--file", missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn two_board_sources_are_rejected() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["words", "cat#.#dog", "--size", "3"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn score_json_totals() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["score", "cat#.#dog", "--json"]);
    assert!(output.status.success());

    let score = assert_single_json(&output.stdout);
    assert_eq!(score["totals"]["words"], 8);
    assert_eq!(score["totals"]["across"], 3);
    assert_eq!(score["totals"]["down"], 5);
    // cat, c, t, dog, d, g
    assert_eq!(score["totals"]["complete"], 6);
    assert_eq!(score["words"][0]["text"], "cat");
    assert_eq!(score["words"][0]["points"], 5);
}

#[test]
fn no_subcommand_prints_usage() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &[]);
    assert!(output.status.success());
    assert!(stderr(&output).contains("Usage: xwfill"));
}

// ---------------------------------------------------------------------------
// save / boards
// ---------------------------------------------------------------------------

#[test]
fn save_list_show_roundtrip() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["save", "Sunday Grid", "ca0#.#d1g"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(home.path().join("boards").join("Sunday_Grid.json").exists());

    let list = run(home.path(), &["boards", "list", "--json"]);
    assert_eq!(assert_single_json(&list.stdout), serde_json::json!(["Sunday Grid"]));

    let show = run(home.path(), &["boards", "show", "Sunday Grid", "--json"]);
    assert!(show.status.success());
    let board = assert_single_json(&show.stdout);
    assert_eq!(board["cells"], "ca0#.#d1g");
    assert_eq!(board["rows"], serde_json::json!(["ca0", "#.#", "d1g"]));
    assert_eq!(board["clues"].as_array().unwrap().len(), 8);
}

#[test]
fn saved_board_feeds_other_commands() {
    let home = TempDir::new().unwrap();
    assert!(run(home.path(), &["save", "mini", "cat#.#dog"]).status.success());

    let output = run(home.path(), &["score", "--load", "mini", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(assert_single_json(&output.stdout)["totals"]["complete"], 6);
}

#[test]
fn load_missing_board_exits_not_found() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["words", "--load", "nothing here"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("boards list"));
}

#[test]
fn rename_and_delete() {
    let home = TempDir::new().unwrap();
    assert!(run(home.path(), &["save", "old", "cat#.#dog"]).status.success());

    let rename = run(home.path(), &["boards", "rename", "old", "new name"]);
    assert!(rename.status.success(), "stderr: {}", stderr(&rename));
    let list = run(home.path(), &["boards", "list"]);
    assert_eq!(String::from_utf8_lossy(&list.stdout).trim(), "new name");

    assert_eq!(run(home.path(), &["boards", "rename", "old", "x"]).status.code(), Some(4));

    assert!(run(home.path(), &["boards", "delete", "new name"]).status.success());
    assert_eq!(run(home.path(), &["boards", "delete", "new name"]).status.code(), Some(4));
}

#[test]
fn rename_onto_existing_board_is_refused() {
    let home = TempDir::new().unwrap();
    assert!(run(home.path(), &["save", "a", "...."]).status.success());
    assert!(run(home.path(), &["save", "b", "ab.."]).status.success());

    let output = run(home.path(), &["boards", "rename", "a", "b"]);
    assert_eq!(output.status.code(), Some(2));

    let show = run(home.path(), &["boards", "show", "b", "--json"]);
    assert_eq!(assert_single_json(&show.stdout)["cells"], "ab..");
}

#[test]
fn board_names_cannot_leave_the_board_directory() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["save", "../escaped", "cat#.#dog"]);
    assert_eq!(output.status.code(), Some(2), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("hint:"));
    assert!(!home.path().join("escaped.json").exists());

    assert!(run(home.path(), &["save", "a", "...."]).status.success());
    let rename = run(home.path(), &["boards", "rename", "a", "../../x"]);
    assert_eq!(rename.status.code(), Some(2));
    assert!(run(home.path(), &["boards", "show", "a"]).status.success());
}

#[test]
fn export_writes_rows() {
    let home = TempDir::new().unwrap();
    assert!(run(home.path(), &["save", "mini", "cat#.#dog"]).status.success());
    let out = home.path().join("mini.txt");

    let output = run(home.path(), &["boards", "export", "mini", out.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(fs::read_to_string(&out).unwrap(), "cat\n#.#\ndog\n");
}

#[test]
fn corrupt_board_file_is_parse_error() {
    let home = TempDir::new().unwrap();
    let boards = home.path().join("boards");
    fs::create_dir_all(&boards).unwrap();
    fs::write(boards.join("broken.json"), "{ nope").unwrap();

    let output = run(home.path(), &["boards", "show", "broken"]);
    assert_eq!(output.status.code(), Some(31));
}

// ---------------------------------------------------------------------------
// templates
// ---------------------------------------------------------------------------

#[test]
fn templates_filtered_by_size() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["templates", "--size", "5", "--json"]);
    assert!(output.status.success());

    let templates = assert_single_json(&output.stdout);
    let templates = templates.as_array().unwrap();
    assert_eq!(templates.len(), 3);
    assert!(templates.iter().all(|t| t["size"] == 5));
}

#[test]
fn template_add_and_dedup() {
    let home = TempDir::new().unwrap();
    let add = run(home.path(), &["templates", "--add", "#.......#"]);
    assert!(add.status.success(), "stderr: {}", stderr(&add));
    assert!(stderr(&add).contains("template added"));

    let again = run(home.path(), &["templates", "--add", "#.......#"]);
    assert!(again.status.success());
    assert!(stderr(&again).contains("already present"));

    let list = run(home.path(), &["templates", "--size", "3", "--json"]);
    let templates = assert_single_json(&list.stdout);
    assert_eq!(templates.as_array().unwrap().len(), 1);
    assert_eq!(templates[0]["blocks"], 2);
}

#[test]
fn template_add_rejects_letters() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["templates", "--add", "ab#......"]);
    assert_eq!(output.status.code(), Some(32));
}

#[test]
fn save_with_template_stores_layout() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["save", "mini", "cat#.#dog", "--template"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let list = run(home.path(), &["templates", "--size", "3", "--json"]);
    let templates = assert_single_json(&list.stdout);
    assert_eq!(templates[0]["template"], "...#.#...");
}
