//! Handles Command Line Interface (CLI) related functionalities.
//!
//! Defines the `export` and `import` subcommands, their arguments and environment
//! fallbacks, and runs the chosen command.

mod commands;

pub use commands::*;
