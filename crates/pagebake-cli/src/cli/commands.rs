use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Available pagebake subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Produce the final page from the bundler output
    ///
    /// Minifies the bundled entry, writes `<entry>-final.js` and its map,
    /// inlines stylesheet and bundle into the template, and runs the enabled
    /// optional stages.
    Build(BuildArgs),

    /// Validate configuration and check that every input exists
    Check(CheckArgs),

    /// Write an example pagebake.config.json
    Init(InitArgs),
}

/// Arguments for the build command
#[derive(Args, Debug, Default, Clone)]
pub struct BuildArgs {
    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Path to the config file (defaults to <cwd>/pagebake.config.json)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// HTML template emitted by the bundler
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Directory holding the bundled assets
    #[arg(long, value_name = "DIR")]
    pub assets_dir: Option<PathBuf>,

    /// Where the final page is written
    #[arg(short, long, value_name = "FILE")]
    pub out_html: Option<PathBuf>,

    /// Global expression folded to `false` during minification
    #[arg(long, value_name = "EXPR")]
    pub debug_define: Option<String>,

    /// Keep line breaks in the final page
    #[arg(long)]
    pub no_collapse_whitespace: bool,

    /// Inline the Sentry loader script
    #[arg(long)]
    pub error_tracking: bool,

    /// Upload the final bundle and sourcemap with sentry-cli
    #[arg(long)]
    pub upload: bool,

    /// Add the analytics beacon script
    #[arg(long)]
    pub analytics: bool,

    /// Emit the service worker
    #[arg(long)]
    pub service_worker: bool,

    /// Build timestamp in milliseconds (defaults to now)
    ///
    /// Pin this to get byte-identical output across runs.
    #[arg(long, value_name = "MS")]
    pub timestamp: Option<i64>,
}

/// Arguments for the check command
#[derive(Args, Debug, Default, Clone)]
pub struct CheckArgs {
    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Path to the config file (defaults to <cwd>/pagebake.config.json)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only validate the configuration, skip input checks
    #[arg(long)]
    pub config_only: bool,
}

/// Arguments for the init command
#[derive(Args, Debug, Default, Clone)]
pub struct InitArgs {
    /// Directory to write the config into (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Overwrite an existing config file
    #[arg(short, long)]
    pub force: bool,

    /// Also write pagebake.schema.json for editor completion
    #[arg(long)]
    pub schema: bool,
}
