//! Command-line interface definition.
//!
//! # Command Structure
//!
//! - `pagebake build` - bake the bundler output into the final page
//! - `pagebake check` - validate configuration and input presence
//! - `pagebake init` - write an example `pagebake.config.json`

mod commands;
mod tests;

use clap::Parser;

pub use commands::{BuildArgs, CheckArgs, Command, InitArgs};

/// pagebake - bake a bundler's output into one self-contained HTML page
#[derive(Parser, Debug)]
#[command(
    name = "pagebake",
    version,
    about = "Bake a bundler's output into one self-contained HTML page",
    long_about = "pagebake runs after your bundler. It minifies the bundled entry with a\n\
                  sourcemap chained back to the original sources, writes the final bundle\n\
                  and map, and inlines the stylesheet and bundle into the HTML template."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
