pub mod board;
pub mod candidates;
pub mod cell;
pub mod error;
pub mod events;
pub mod grid;
pub mod propagate;
pub mod scoring;
pub mod segment;
pub mod store;
pub mod templates;
pub mod word;

#[cfg(test)]
pub mod harness;
