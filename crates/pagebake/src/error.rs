//! Error types for the pagebake pipeline.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while producing the final page.
///
/// Everything except [`Error::Upload`] aborts the run. Upload failures are
/// returned by uploaders but downgraded to a warning by the pipeline driver.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// A required input file could not be read
    #[error("Missing input file: {}", path.display())]
    #[diagnostic(
        code(pagebake::missing_input),
        help("Run the bundler first so that the template, bundle, sourcemap and stylesheet exist")
    )]
    MissingInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JavaScript input failed to parse
    #[error("Failed to parse '{module}': {}", errors.join("; "))]
    #[diagnostic(code(pagebake::parse_failed))]
    Parse { module: String, errors: Vec<String> },

    /// An input sourcemap could not be read
    #[error("Invalid sourcemap for '{module}': {reason}")]
    #[diagnostic(
        code(pagebake::invalid_sourcemap),
        help("Make sure the bundler emits standard v3 sourcemaps")
    )]
    InvalidSourceMap { module: String, reason: String },

    /// Module set handed to the minifier is unusable
    #[error("Invalid module set: {0}")]
    #[diagnostic(code(pagebake::invalid_modules))]
    InvalidModules(String),

    /// A substitution pattern is not a valid regular expression
    #[error("Invalid substitution pattern '{pattern}'")]
    #[diagnostic(code(pagebake::invalid_pattern))]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The compile-time define could not be set up
    #[error("Invalid define '{expression}': {reason}")]
    #[diagnostic(
        code(pagebake::invalid_define),
        help("Defines must be identifiers or member expressions such as window.__DEBUG__")
    )]
    InvalidDefine { expression: String, reason: String },

    /// Writing an output file failed
    #[error("Failed to write {}", path.display())]
    #[diagnostic(code(pagebake::write_failed), help("Check output directory permissions"))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// package.json is missing fields or malformed
    #[error("Invalid package metadata in {}: {reason}", path.display())]
    #[diagnostic(code(pagebake::package_metadata))]
    PackageMetadata { path: PathBuf, reason: String },

    /// Configuration is inconsistent
    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(pagebake::invalid_config))]
    InvalidConfig(String),

    /// External sourcemap upload failed
    #[error("Sourcemap {step} failed: {reason}")]
    #[diagnostic(code(pagebake::upload_failed))]
    Upload { step: String, reason: String },
}

impl Error {
    pub fn missing_input(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::MissingInput {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    pub fn upload(step: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Upload {
            step: step.into(),
            reason: reason.into(),
        }
    }

    /// Whether the pipeline may continue after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Upload { .. })
    }
}

/// Result type alias for pagebake operations.
pub type Result<T> = std::result::Result<T, Error>;
