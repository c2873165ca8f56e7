//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Scripts rely on them, so existing codes never change meaning.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain    | Description                                |
//! |---------|-----------|--------------------------------------------|
//! | 0       | Universal | Success                                    |
//! | 1       | Universal | General error (unspecified)                |
//! | 2       | Universal | CLI usage error (bad args, missing file)   |
//! | 3-9     | board     | Board input and saved-board lookups        |
//! | 10-19   | corpus    | Word corpus service                        |
//! | 20-29   | fill      | Propagation outcomes                       |
//! | 30-39   | store     | Board directory and file format            |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unreadable board file.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Board (3-9)
// =============================================================================

/// Board string has a bad symbol, a rebus entry, or is not square.
pub const EXIT_BOARD_INVALID: u8 = 3;

/// No saved board under the requested name.
pub const EXIT_BOARD_NOT_FOUND: u8 = 4;

/// Saved clue records no longer fit the board's word layout.
pub const EXIT_BOARD_RECORDS: u8 = 5;

// =============================================================================
// Corpus (10-19)
// =============================================================================

/// Corpus unreachable: connection failure, timeout, or HTTP error status.
pub const EXIT_CORPUS_UNAVAILABLE: u8 = 10;

/// Shape contains characters the corpus does not accept.
pub const EXIT_CORPUS_SHAPE: u8 = 11;

/// Corpus answered with a body that is not the expected JSON.
pub const EXIT_CORPUS_RESPONSE: u8 = 12;

// =============================================================================
// Fill (20-29)
// =============================================================================

/// `fill --strict`: at least one word has no possible completion.
pub const EXIT_FILL_NO_MATCH: u8 = 20;

/// `fill --strict`: round cap reached while letters were still being placed.
pub const EXIT_FILL_UNSETTLED: u8 = 21;

// =============================================================================
// Store (30-39)
// =============================================================================

/// Board directory could not be read or written.
pub const EXIT_STORE_IO: u8 = 30;

/// Saved board or template file is malformed or from a newer version.
pub const EXIT_STORE_PARSE: u8 = 31;

/// Templates must be square and contain only `#` and `.`.
pub const EXIT_STORE_TEMPLATE: u8 = 32;
