//! Optional integrations: sourcemap upload and bootstrap scripts.
//!
//! Both are capability traits with no-op defaults, so the pipeline never needs
//! network access or external tools unless a caller plugs one in.

mod analytics;
mod sentry;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::Result;
use crate::html::{Placement, ScriptTag};

pub use analytics::AnalyticsBeacon;
pub use sentry::{SentryCliUploader, SentryLoader, loader_rules, sentry_cdn_url};

/// Identifies a release on the error-tracking service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub org: String,
    pub project: String,
    pub release: String,
}

/// Publishes final artifacts and their sourcemaps.
///
/// Called after every artifact is on disk. Errors are reported as warnings by
/// the pipeline; the local build still succeeds.
#[async_trait]
pub trait SourcemapUploader: Send + Sync {
    /// Name used in log output.
    fn name(&self) -> &str;

    /// Upload `files` for `target`.
    async fn upload(&self, target: &UploadTarget, files: &[PathBuf]) -> Result<()>;
}

/// Uploader that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopUploader;

#[async_trait]
impl SourcemapUploader for NoopUploader {
    fn name(&self) -> &str {
        "noop"
    }

    async fn upload(&self, _target: &UploadTarget, _files: &[PathBuf]) -> Result<()> {
        Ok(())
    }
}

/// Supplies an extra `<script>` fragment for the page.
pub trait BootstrapInjector: Send + Sync {
    /// Name used in log output.
    fn name(&self) -> &str;

    /// Where the fragment goes relative to the bundle.
    fn placement(&self) -> Placement;

    /// Produce the fragment.
    fn script(&self) -> Result<ScriptTag>;
}

/// Files handed to an uploader: the bundle and its map.
pub fn upload_files(js: &Path, map: &Path) -> Vec<PathBuf> {
    vec![js.to_path_buf(), map.to_path_buf()]
}
