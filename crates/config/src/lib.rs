// Configuration loading

pub mod settings;

pub use settings::{FallbackPreference, Settings};
