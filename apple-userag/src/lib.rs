//! apple-userag library
//!
//! Command-line front end for the `apple-devices` catalog.

pub mod cli;
pub mod commands;
pub mod utils;
