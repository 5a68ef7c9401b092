//! Build command implementation.

use std::path::Path;
use std::time::{Duration, Instant};

use pagebake::{BuildReport, UploadOutcome};

use crate::cli::BuildArgs;
use crate::commands::utils;
use crate::config::{BakeConfig, ConfigOverrides};
use crate::error::Result;
use crate::ui;

/// Execute the build command.
///
/// # Build Process
///
/// 1. Load and validate configuration (CLI > Env > File > Defaults)
/// 2. Resolve it into a build plan (reads package.json if needed)
/// 3. Run the pipeline
/// 4. Report written files and the upload outcome
///
/// # Errors
///
/// Returns errors for invalid configuration and every fatal pipeline
/// failure. A failed upload is reported as a warning only.
pub async fn execute(args: BuildArgs) -> Result<BuildReport> {
    let start = Instant::now();
    let root = utils::resolve_root(args.cwd.as_deref())?;

    ui::info("Loading configuration...");
    let config = BakeConfig::load(&root, args.config.as_deref(), &ConfigOverrides::from(&args))?;
    config.validate()?;

    let plan = config.plan(&root, args.timestamp)?;
    if let Some(package) = &plan.package {
        ui::info(&format!("Baking {} {}", package.name, package.version));
    }

    let report = plan.into_pipeline().run().await?;

    report_outcome(&report, &root, start.elapsed());
    Ok(report)
}

fn report_outcome(report: &BuildReport, root: &Path, elapsed: Duration) {
    let mut entries: Vec<(String, u64)> = report
        .written_files()
        .into_iter()
        .map(|path| {
            let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or_default();
            (ui::relative(path, root).display().to_string(), size)
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    ui::print_build_summary(&entries, elapsed);

    match &report.upload {
        UploadOutcome::Skipped => {}
        UploadOutcome::Uploaded { uploader } => {
            ui::success(&format!("Sourcemaps uploaded via {uploader}"));
        }
        UploadOutcome::Failed { uploader, reason } => {
            ui::warning(&format!(
                "Sourcemap upload via {uploader} failed: {reason}. The local build is still valid."
            ));
        }
    }

    ui::success(&format!(
        "Build completed in {}",
        ui::format_duration(elapsed)
    ));
}
