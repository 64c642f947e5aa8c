//! stepprune command-line front end
//!
//! Argument parsing, config layering and the prune pipeline. The binary in
//! `main.rs` only wires these together with stdin confirmation.

pub mod args;
pub mod config;
pub mod report;
pub mod run;
pub mod util;

pub use args::Cli;
pub use config::{ConfigError, FileConfig, Settings};
pub use run::{run, RunOutcome};

use tracing::Level;

/// Install the stderr log subscriber for the given `-v` count
pub fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
