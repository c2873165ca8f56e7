// xwfill CLI - headless crossword fill assistance
// Boards are flat row-major symbol strings: '#' block, '.' any letter,
// '0' vowel, '1' consonant, a-z fixed letters.

mod exit_codes;
mod fill;
mod inspect;
mod library;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use xwfill_config::{FallbackPreference, Settings};
use xwfill_corpus::{CorpusClient, CorpusConfig};
use xwfill_engine::candidates::CorpusError;
use xwfill_engine::error::{BoardError, GridError};
use xwfill_engine::grid::Grid;
use xwfill_engine::propagate::{FallbackOrder, PropagationOptions};
use xwfill_engine::store::BoardData;
use xwfill_io::{text, JsonStore, StoreError};

use exit_codes::{
    EXIT_BOARD_INVALID, EXIT_BOARD_NOT_FOUND, EXIT_BOARD_RECORDS, EXIT_CORPUS_RESPONSE,
    EXIT_CORPUS_SHAPE, EXIT_CORPUS_UNAVAILABLE, EXIT_ERROR, EXIT_STORE_IO, EXIT_STORE_PARSE,
    EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "xwfill")]
#[command(about = "Crossword fill assistant (headless)")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Settings file [default: <config dir>/xwfill/settings.json]
    #[arg(long, global = true, env = "XWFILL_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding saved boards and templates
    #[arg(long, global = true, env = "XWFILL_BOARD_DIR")]
    dir: Option<PathBuf>,

    /// Corpus API base URL (overrides settings and XWFILL_CORPUS_URL)
    #[arg(long, global = true)]
    corpus_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the across and down words of a board
    #[command(after_help = "\
Examples:
  xwfill words 'cat#.#dog'
  xwfill words --file sunday.txt --json
  xwfill words --load 'Sunday Grid'")]
    Words {
        #[command(flatten)]
        input: BoardArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Letter-value totals for a board
    #[command(after_help = "\
Examples:
  xwfill score 'cat#.#dog'
  xwfill score --load 'Sunday Grid' --json")]
    Score {
        #[command(flatten)]
        input: BoardArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run fill propagation against the word corpus
    #[command(after_help = "\
Examples:
  xwfill fill 'c.t#.#d.g'
  xwfill fill --file sunday.txt --json
  xwfill fill --load 'Sunday Grid' --save 'Sunday Grid'
  xwfill fill 'c1t#.#...' --strict

Exit codes (--strict):
  20  at least one word has no completion
  21  round cap reached while letters were still being placed")]
    Fill {
        #[command(flatten)]
        input: BoardArgs,

        /// Maximum propagation rounds [default: fill.maxRounds]
        #[arg(long)]
        rounds: Option<usize>,

        /// Hint fallback when no letter clears the threshold [default: fill.fallbackOrder]
        #[arg(long, value_enum)]
        fallback: Option<Fallback>,

        /// Fail when a word has no match or the pass did not settle
        #[arg(long)]
        strict: bool,

        /// Save the filled board under this name
        #[arg(long)]
        save: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Whole-word suggestions for a shape
    #[command(after_help = "\
Examples:
  xwfill lookup 'c.t'
  xwfill lookup '1a1' --page 2 --json")]
    Lookup {
        /// Shape to match ('.' any, '0' vowel, '1' consonant, a-z fixed)
        shape: String,

        /// Result page, starting at 1
        #[arg(long, default_value = "1")]
        page: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List block templates, or add one
    #[command(after_help = "\
Examples:
  xwfill templates --size 15
  xwfill templates --add '#.......#'")]
    Templates {
        /// Only templates with this side length
        #[arg(long)]
        size: Option<usize>,

        /// Store a new template ('#' and '.' only, square)
        #[arg(long)]
        add: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage saved boards
    Boards {
        #[command(subcommand)]
        command: BoardsCommands,
    },

    /// Save a board under a name
    #[command(after_help = "\
Examples:
  xwfill save 'Sunday Grid' 'cat#.#dog'
  xwfill save 'Sunday Grid' --file sunday.txt
  xwfill save 'Sunday Grid' --file sunday.txt --template")]
    Save {
        /// Board name (whitespace collapses to '_' in the file name)
        name: String,

        #[command(flatten)]
        input: BoardArgs,

        /// Also store the board's block layout as a template
        #[arg(long)]
        template: bool,
    },
}

#[derive(Subcommand)]
enum BoardsCommands {
    /// List saved board names
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a saved board
    Show {
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a saved board
    Delete { name: String },

    /// Rename a saved board
    Rename { name: String, new_name: String },

    /// Write a saved board to a text file, one row per line
    Export { name: String, output: PathBuf },
}

/// Where a command's board comes from. At most one source; none means an
/// empty board of `board.defaultSize`.
#[derive(Args, Debug, Clone, Default)]
#[group(id = "input", multiple = false)]
pub struct BoardArgs {
    /// Flat board string, row-major
    pub board: Option<String>,

    /// Read the board from a text file, one row per line
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Load a saved board by name
    #[arg(long, short = 'l')]
    pub load: Option<String>,

    /// Start from an empty board of this size
    #[arg(long)]
    pub size: Option<usize>,
}

impl BoardArgs {
    /// Resolve to board data. Only `--load` carries a name and clue records.
    pub fn resolve(&self, ctx: &Context) -> Result<BoardData, CliError> {
        let unnamed = |cells: String| BoardData { name: String::new(), cells, clues: Vec::new() };

        if let Some(board) = &self.board {
            return Ok(unnamed(board.trim().to_string()));
        }
        if let Some(path) = &self.file {
            let cells = text::import(path).map_err(|e| {
                CliError::usage(format!("{}: {}", path.display(), e))
            })?;
            return Ok(unnamed(cells));
        }
        if let Some(name) = &self.load {
            return ctx.store().require(name).map_err(CliError::store);
        }

        let size = self.size.unwrap_or(ctx.settings.default_size);
        if size == 0 {
            return Err(CliError::usage("board size must be at least 1"));
        }
        Ok(unnamed(Grid::new(size).to_board_string()))
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Fallback {
    /// Show the lowest-weight letters
    Lowest,
    /// Show the highest-weight letters
    Highest,
}

impl From<Fallback> for FallbackOrder {
    fn from(f: Fallback) -> Self {
        match f {
            Fallback::Lowest => FallbackOrder::LowestWeight,
            Fallback::Highest => FallbackOrder::HighestWeight,
        }
    }
}

// ============================================================================
// Context
// ============================================================================

/// Settings plus global flag overrides, shared by every command.
pub struct Context {
    pub settings: Settings,
}

impl Context {
    fn new(cli: &Cli) -> Self {
        let mut settings = match &cli.config {
            Some(path) => {
                let mut settings = Settings::load_from(path);
                settings.apply_overrides(|key| std::env::var(key).ok());
                settings
            }
            None => Settings::load(),
        };
        if let Some(dir) = &cli.dir {
            settings.board_dir = Some(dir.clone());
        }
        if let Some(url) = &cli.corpus_url {
            settings.corpus_url = url.clone();
        }
        log::debug!("corpus at {}, boards in {}", settings.corpus_url, settings.boards_dir().display());
        Self { settings }
    }

    pub fn store(&self) -> JsonStore {
        JsonStore::new(self.settings.boards_dir())
    }

    pub fn corpus(&self) -> Result<CorpusClient, CliError> {
        CorpusClient::new(CorpusConfig {
            base_url: self.settings.corpus_url.clone(),
            api_key: self.settings.api_key.clone(),
            timeout: Duration::from_secs(self.settings.timeout_secs),
        })
        .map_err(CliError::corpus)
    }

    pub fn options(&self) -> PropagationOptions {
        PropagationOptions {
            max_rounds: self.settings.max_rounds,
            hint_threshold: self.settings.hint_threshold,
            fallback_count: self.settings.fallback_count,
            fallback_order: match self.settings.fallback_order {
                FallbackPreference::LowestWeight => FallbackOrder::LowestWeight,
                FallbackPreference::HighestWeight => FallbackOrder::HighestWeight,
            },
        }
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  xwfill-engine ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let ctx = Context::new(&cli);

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: xwfill <command> [options]");
            eprintln!("       xwfill --help for more information");
            Ok(())
        }
        Some(Commands::Words { input, json }) => inspect::cmd_words(&ctx, &input, json),
        Some(Commands::Score { input, json }) => inspect::cmd_score(&ctx, &input, json),
        Some(Commands::Fill { input, rounds, fallback, strict, save, json }) => {
            let mut options = ctx.options();
            if let Some(rounds) = rounds {
                options.max_rounds = rounds;
            }
            if let Some(fallback) = fallback {
                options.fallback_order = fallback.into();
            }
            fill::cmd_fill(&ctx, &input, options, strict, save, json)
        }
        Some(Commands::Lookup { shape, page, json }) => fill::cmd_lookup(&ctx, &shape, page, json),
        Some(Commands::Templates { size, add, json }) => match add {
            Some(template) => library::cmd_template_add(&ctx, &template),
            None => library::cmd_templates(&ctx, size, json),
        },
        Some(Commands::Boards { command }) => match command {
            BoardsCommands::List { json } => library::cmd_boards_list(&ctx, json),
            BoardsCommands::Show { name, json } => library::cmd_boards_show(&ctx, &name, json),
            BoardsCommands::Delete { name } => library::cmd_boards_delete(&ctx, &name),
            BoardsCommands::Rename { name, new_name } => {
                library::cmd_boards_rename(&ctx, &name, &new_name)
            }
            BoardsCommands::Export { name, output } => {
                library::cmd_boards_export(&ctx, &name, &output)
            }
        },
        Some(Commands::Save { name, input, template }) => {
            library::cmd_save(&ctx, &name, &input, template)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

// ============================================================================
// Errors and output
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    pub fn grid(err: GridError) -> Self {
        Self::new(EXIT_BOARD_INVALID, err.to_string()).with_hint(
            "boards use '#', '.', '0', '1' and a-z, one symbol per cell, in a square",
        )
    }

    pub fn store(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::new(EXIT_BOARD_NOT_FOUND, err.to_string())
                .with_hint("run `xwfill boards list` to see saved boards"),
            StoreError::Io(_) => Self::new(EXIT_STORE_IO, err.to_string()),
            StoreError::Parse(_) => Self::new(EXIT_STORE_PARSE, err.to_string()),
            StoreError::InvalidName(_) => Self::usage(err.to_string())
                .with_hint("board names cannot contain '/', '\\' or ':' or start with '.'"),
        }
    }

    pub fn corpus(err: CorpusError) -> Self {
        match err {
            CorpusError::InvalidShape(_) => Self::new(EXIT_CORPUS_SHAPE, err.to_string())
                .with_hint("shapes use '.', '0', '1' and a-z"),
            CorpusError::Parse(_) => Self::new(EXIT_CORPUS_RESPONSE, err.to_string()),
            CorpusError::Network(_) | CorpusError::Http(..) | CorpusError::Timeout(_) => {
                Self::new(EXIT_CORPUS_UNAVAILABLE, err.to_string())
                    .with_hint("check corpus.baseUrl in settings, XWFILL_CORPUS_URL or --corpus-url")
            }
        }
    }

    pub fn board(err: BoardError) -> Self {
        match err {
            BoardError::Grid(e) => Self::grid(e),
            BoardError::Word(_) => Self::new(EXIT_BOARD_RECORDS, err.to_string())
                .with_hint("the saved clues no longer match the block layout"),
            BoardError::NotFound(_) => Self::new(EXIT_BOARD_NOT_FOUND, err.to_string())
                .with_hint("run `xwfill boards list` to see saved boards"),
            BoardError::Store(_) => Self::new(EXIT_STORE_IO, err.to_string()),
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Write lines to stdout.
pub fn emit(text: &str) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", text).map_err(|e| CliError::io(e.to_string()))
}

pub fn emit_json(value: &serde_json::Value) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CliError::io(e.to_string()))?;
    emit(&json)
}

pub fn parse_grid(cells: &str) -> Result<Grid, CliError> {
    Grid::from_board_string(cells).map_err(CliError::grid)
}
