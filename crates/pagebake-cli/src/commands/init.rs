//! Init command implementation.
//!
//! Writes an example pagebake.config.json, and optionally its JSON schema.

use crate::cli::InitArgs;
use crate::commands::utils;
use crate::config::{BakeConfig, CONFIG_FILE_NAME, SCHEMA_FILE_NAME};
use crate::error::{ConfigError, Result, ResultExt};
use crate::ui;

/// Execute the init command.
///
/// # Errors
///
/// Returns [`ConfigError::AlreadyExists`] when a config exists and `--force`
/// is not set, and I/O errors from writing.
pub async fn execute(args: InitArgs) -> Result<()> {
    let root = utils::resolve_root(args.cwd.as_deref())?;
    let config_path = root.join(CONFIG_FILE_NAME);

    if config_path.exists() && !args.force {
        return Err(ConfigError::AlreadyExists(config_path).into());
    }

    let example = BakeConfig::example_config()?;
    std::fs::write(&config_path, format!("{example}\n")).with_path(&config_path)?;
    ui::success(&format!("Wrote {CONFIG_FILE_NAME}"));

    if args.schema {
        let schema_path = root.join(SCHEMA_FILE_NAME);
        let schema = serde_json::to_string_pretty(&BakeConfig::json_schema()?)?;
        std::fs::write(&schema_path, format!("{schema}\n")).with_path(&schema_path)?;
        ui::success(&format!("Wrote {SCHEMA_FILE_NAME}"));
    }

    ui::info("Optional stages are off; enable them under \"features\" or with build flags.");
    Ok(())
}
