//! Shared utilities for the apple-userag CLI

pub mod progress;

pub use progress::*;
