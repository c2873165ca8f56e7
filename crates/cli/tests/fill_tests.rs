// Integration tests for `xwfill fill` and `xwfill lookup` against a mock corpus.
// Run with: cargo test -p xwfill-cli --test fill_tests -- --nocapture

use std::path::Path;
use std::process::{Command, Output};

use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn xwfill(home: &Path, corpus: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_xwfill"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd.env("XWFILL_CONFIG", home.join("settings.json"))
        .env("XWFILL_BOARD_DIR", home.join("boards"))
        .env("XWFILL_CORPUS_URL", corpus)
        .env_remove("XWFILL_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn run(home: &Path, corpus: &str, args: &[&str]) -> Output {
    xwfill(home, corpus).args(args).output().expect("run xwfill")
}

fn parse_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim())
        .unwrap_or_else(|e| panic!("stdout must be valid JSON: {}\n{}", e, stdout))
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

// ---------------------------------------------------------------------------
// fill
// ---------------------------------------------------------------------------

#[test]
fn fill_places_unique_letter() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/p/ca.");
        then.status(200).json_body(json!([[["c", 1.0]], [["a", 1.0]], [["t", 1.0]]]));
    });

    let output = run(home.path(), &server.base_url(), &["fill", "ca.######", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report = parse_json(&output);
    assert_eq!(report["board"], "cat######");
    assert_eq!(report["rounds"], 1);
    assert_eq!(report["queries"], 1);
    assert_eq!(report["converged"], true);
    assert_eq!(report["filled"], json!([{ "cell": 2, "letter": "t" }]));
    assert_eq!(report["no_match"], json!([]));
    mock.assert_calls(1);
}

#[test]
fn fill_shows_hints_for_ambiguous_cells() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/p/c.t");
        then.status(200)
            .json_body(json!([[["c", 1.0]], [["a", 0.5], ["o", 0.3], ["u", 0.2]], [["t", 1.0]]]));
    });

    let output = run(home.path(), &server.base_url(), &["fill", "c.t######", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report = parse_json(&output);
    assert_eq!(report["board"], "c.t######");
    assert_eq!(report["filled"], json!([]));
    assert_eq!(report["hints"], json!([{ "cell": 1, "direction": "across", "letters": "aou" }]));
}

#[test]
fn fill_text_output_lists_rows_and_hints() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/p/c.t");
        then.status(200).json_body(json!([[["c", 1.0]], [["a", 0.6], ["o", 0.4]], [["t", 1.0]]]));
    });

    let output = run(home.path(), &server.base_url(), &["fill", "c.t######"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(&lines[..3], &["c.t", "###", "###"]);
    assert!(lines[3].starts_with("hint"), "{}", stdout);
    assert!(lines[3].ends_with("ao"), "{}", stdout);
    assert!(stderr(&output).contains("filled 0 cells in 1 rounds"));
}

#[test]
fn fill_strict_fails_on_no_match() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/p/zq.");
        then.status(200).json_body(json!([]));
    });

    let output = run(home.path(), &server.base_url(), &["fill", "zq.######", "--strict", "--json"]);
    assert_eq!(output.status.code(), Some(20), "stderr: {}", stderr(&output));

    // The report is still printed before the failure
    let report = parse_json(&output);
    assert_eq!(report["no_match"], json!([{ "number": 1, "direction": "across", "shape": "zq." }]));
}

#[test]
fn fill_without_strict_tolerates_no_match() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/p/zq.");
        then.status(200).json_body(json!([]));
    });

    let output = run(home.path(), &server.base_url(), &["fill", "zq.######"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("no match"));
}

#[test]
fn fill_with_unreachable_corpus() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), "http://127.0.0.1:9", &["fill", "ca.######"]);

    assert_eq!(output.status.code(), Some(10));
    let err = stderr(&output);
    assert!(err.contains("did not answer"), "stderr: {}", err);
    assert!(err.contains("hint:"), "stderr: {}", err);
}

#[test]
fn fill_only_queries_partial_words() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start();
    let any = server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(json!([]));
    });

    // Complete, blank and short words never reach the corpus
    let board = "cat##\
                 #####\
                 .....\
                 #####\
                 ab###";
    let output = run(home.path(), &server.base_url(), &["fill", board, "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(parse_json(&output)["queries"], 0);
    any.assert_calls(0);
}

#[test]
fn fill_corpus_url_flag_beats_environment() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/p/ca.");
        then.status(200).json_body(json!([[["c", 1.0]], [["a", 1.0]], [["b", 1.0]]]));
    });

    let output = run(
        home.path(),
        "http://127.0.0.1:9",
        &["fill", "ca.######", "--corpus-url", &server.base_url(), "--json"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(parse_json(&output)["board"], "cab######");
    mock.assert_calls(1);
}

#[test]
fn fill_save_persists_result() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/p/ca.");
        then.status(200).json_body(json!([[["c", 1.0]], [["a", 1.0]], [["t", 1.0]]]));
    });

    let output = run(home.path(), &server.base_url(), &["fill", "ca.######", "--save", "kitty"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let show = run(home.path(), &server.base_url(), &["boards", "show", "kitty", "--json"]);
    assert!(show.status.success());
    assert_eq!(parse_json(&show)["cells"], "cat######");
}

#[test]
fn fill_loaded_board_keeps_vowel_markers() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/p/c01");
        then.status(200).json_body(json!([[["c", 1.0]], [["a", 0.5], ["o", 0.5]], [["t", 0.5], ["d", 0.5]]]));
    });

    assert!(run(home.path(), &server.base_url(), &["save", "markers", "c01######"]).status.success());
    let output = run(home.path(), &server.base_url(), &["fill", "--load", "markers", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(parse_json(&output)["board"], "c01######");
    mock.assert_calls(1);
}

// ---------------------------------------------------------------------------
// lookup
// ---------------------------------------------------------------------------

#[test]
fn lookup_prints_one_word_per_line() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/s/c.t").query_param("page", "1");
        then.status(200).json_body(json!(["cat", "cot", "cut"]));
    });

    let output = run(home.path(), &server.base_url(), &["lookup", "C.T"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "cat\ncot\ncut\n");
    mock.assert_calls(1);
}

#[test]
fn lookup_json_with_page() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/s/1a1").query_param("page", "2");
        then.status(200).json_body(json!(["bat", "cab"]));
    });

    let output = run(home.path(), &server.base_url(), &["lookup", "1a1", "--page", "2", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(parse_json(&output), json!({ "shape": "1a1", "page": 2, "words": ["bat", "cab"] }));
}

#[test]
fn lookup_invalid_shape_sends_nothing() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start();
    let any = server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(json!([]));
    });

    let output = run(home.path(), &server.base_url(), &["lookup", "c#t"]);
    assert_eq!(output.status.code(), Some(11));
    any.assert_calls(0);
}

#[test]
fn lookup_page_zero_is_usage_error() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), "http://127.0.0.1:9", &["lookup", "c.t", "--page", "0"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn lookup_http_error_and_bad_body() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/s/x.x");
        then.status(503).body("down for maintenance");
    });
    server.mock(|when, then| {
        when.method(GET).path("/s/y.y");
        then.status(200).body("<html>");
    });

    assert_eq!(run(home.path(), &server.base_url(), &["lookup", "x.x"]).status.code(), Some(10));
    assert_eq!(run(home.path(), &server.base_url(), &["lookup", "y.y"]).status.code(), Some(12));
}
