//! Presentation layer for tandem
//!
//! CLI argument parsing, console output, and the built-in persona pool.

pub mod cli;
pub mod console;
pub mod personas;

pub use cli::{Cli, StrategyArg};
pub use console::{ConsoleFormatter, ConsoleObserver};
pub use personas::builtin_personas;
