//! Check command implementation.
//!
//! Validates configuration and input presence without writing anything.

use crate::cli::CheckArgs;
use crate::commands::utils;
use crate::config::{BakeConfig, CONFIG_FILE_NAME, ConfigOverrides};
use crate::error::{BuildError, Result};
use crate::ui;

/// Execute the check command.
///
/// # Validation Steps
///
/// 1. Load and validate the merged configuration
/// 2. Resolve it into a build plan (reads package.json if needed)
/// 3. Check every input file exists
///
/// # Errors
///
/// Returns the first configuration error, or [`BuildError::MissingInputs`]
/// after listing every missing file.
pub async fn execute(args: CheckArgs) -> Result<()> {
    let root = utils::resolve_root(args.cwd.as_deref())?;

    ui::info("Checking configuration...");
    match BakeConfig::config_file(&root, args.config.as_deref())? {
        Some(path) => ui::info(&format!("Using {}", ui::relative(&path, &root).display())),
        None => ui::warning(&format!("No {CONFIG_FILE_NAME} found, using defaults")),
    }

    let config = BakeConfig::load(&root, args.config.as_deref(), &ConfigOverrides::default())?;
    config.validate()?;
    ui::success("Configuration is valid");

    if args.config_only {
        return Ok(());
    }

    ui::info("Checking inputs...");
    let plan = config.plan(&root, None)?;
    let inputs = plan.inputs();
    let missing = utils::missing_files(&inputs);

    for input in &inputs {
        let shown = ui::relative(input, &root).display().to_string();
        if missing.contains(&input.as_path()) {
            ui::error(&format!("  {shown} is missing"));
        } else {
            ui::success(&format!("  {shown}"));
        }
    }

    if !missing.is_empty() {
        return Err(BuildError::MissingInputs {
            count: missing.len(),
        }
        .into());
    }

    ui::success("All checks passed!");
    Ok(())
}
