//! Error handling for the pagebake CLI.
//!
//! - `CliError` is the top-level type returned by commands
//! - `ConfigError` and `BuildError` carry domain detail and a "Hint:" line
//! - pipeline errors from the library keep their miette diagnostics
//!
//! # Example
//!
//! ```rust,no_run
//! use pagebake_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_template(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_path(path)
//!         .with_hint("Run the bundler before pagebake")
//! }
//! ```

mod report;

use std::path::PathBuf;
use thiserror::Error;

pub use report::cli_error_to_miette;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Build command errors outside the pipeline itself
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Errors from the pipeline
    #[error(transparent)]
    Pipeline(#[from] pagebake::Error),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file named on the command line doesn't exist
    #[error("Config file not found: {}\n\nHint: Run 'pagebake init' or pass --config <path>", .0.display())]
    NotFound(PathBuf),

    /// Config file already exists and would be overwritten
    #[error("Config file already exists: {}\n\nHint: Pass --force to overwrite it", .0.display())]
    AlreadyExists(PathBuf),

    /// Merged configuration failed to deserialize
    #[error("Invalid configuration: {0}\n\nHint: Check pagebake.config.json and PAGEBAKE_* variables for unknown keys or wrong types")]
    Extract(String),

    /// Missing required configuration field
    #[error("Missing required field: {field}\n\nHint: {hint}")]
    MissingField {
        /// Name of the missing field
        field: String,
        /// Helpful hint for providing the field
        hint: String,
    },

    /// Invalid value for a configuration option
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Helpful hint for correct values
        hint: String,
    },
}

/// Build command errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// One or more inputs are missing
    #[error("{count} input file(s) missing\n\nHint: Run the bundler first, or fix the paths in pagebake.config.json")]
    MissingInputs {
        /// Number of missing files
        count: usize,
    },

    /// A feature needs package.json data that isn't there
    #[error("package.json has no '{field}'\n\nHint: {hint}")]
    PackageField {
        /// Missing field, dotted
        field: String,
        /// Helpful hint
        hint: String,
    },
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into `CliError::FileNotFound(path)`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    /// Prefix the error with a message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            match err {
                CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                    CliError::FileNotFound(path.as_ref().to_path_buf())
                }
                other => other,
            }
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{msg}: {err}"))
        })
    }
}
