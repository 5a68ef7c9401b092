//! pagebake CLI - bake a bundler's output into one self-contained HTML page.
//!
//! This crate wraps the `pagebake` library with argument parsing,
//! configuration loading and terminal output.
//!
//! # Architecture
//!
//! - [`cli`] - clap definitions for `build`, `check` and `init`
//! - [`config`] - `pagebake.config.json` loading and validation
//! - [`error`] - error types with actionable hints
//! - [`logger`] - `tracing` subscriber setup
//! - [`ui`] - status messages and the build summary
//! - `commands` - command implementations
//!
//! # Example
//!
//! ```rust,no_run
//! use pagebake_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{BuildError, CliError, ConfigError, Result, ResultExt};
