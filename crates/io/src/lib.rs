// File I/O operations

pub mod store;
pub mod text;

pub use store::{JsonStore, StoreError};

/// Saved board format version
/// Increment when schema changes in a way that old versions can't read
pub const BOARD_FORMAT_VERSION: u32 = 1;
