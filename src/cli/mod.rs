// CLI module for spc2wav
//
// Command-line parsing, the conversion command and console output. Only
// compiled into the binary.

pub mod commands;
pub mod config;
pub mod output;

pub use commands::command_convert;
pub use config::Config;
pub use output::Reporter;

/// Result type for CLI operations
pub type CliResult<T> = anyhow::Result<T>;
