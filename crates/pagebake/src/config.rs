//! Immutable pipeline configuration and package metadata.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::integrations::UploadTarget;
use crate::minify::DEFAULT_DEBUG_DEFINE;
use crate::service_worker::ServiceWorker;
use crate::{Error, Result};

/// Everything a pipeline run needs to know, fixed before it starts.
///
/// Relative paths resolve against `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Project root
    pub root: PathBuf,
    /// HTML template emitted by the bundler
    pub template: PathBuf,
    /// Directory holding the bundled assets and receiving the final bundle
    pub assets_dir: PathBuf,
    /// Bundled JS file name inside `assets_dir`; its map is `<entry>.map`
    pub entry: String,
    /// Bundled CSS file name inside `assets_dir`
    pub stylesheet: String,
    /// Where the final page is written
    pub output_html: PathBuf,
    /// Global expression folded to `false`
    pub debug_define: String,
    /// Collapse line breaks in the page
    pub collapse_whitespace: bool,
    /// Upload target; `None` skips the upload step
    pub upload: Option<UploadTarget>,
    /// Service worker to emit
    pub service_worker: Option<ServiceWorker>,
    /// Value for `$POLYFILLS$` in the service worker
    pub polyfills_url: Option<String>,
    /// Value for `$SENTRY$` in the service worker
    pub sentry_cdn_url: Option<String>,
    /// Build timestamp in milliseconds, used for `$TS$`
    pub timestamp_ms: i64,
}

impl PipelineConfig {
    /// Defaults matching a Vite build in `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            template: PathBuf::from("index.html"),
            assets_dir: PathBuf::from("dist/assets"),
            entry: "index.js".to_string(),
            stylesheet: "index.css".to_string(),
            output_html: PathBuf::from("dist/index.html"),
            debug_define: DEFAULT_DEBUG_DEFINE.to_string(),
            collapse_whitespace: true,
            upload: None,
            service_worker: None,
            polyfills_url: None,
            sentry_cdn_url: None,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template = path.into();
        self
    }

    pub fn assets_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.assets_dir = path.into();
        self
    }

    pub fn entry(mut self, name: impl Into<String>) -> Self {
        self.entry = name.into();
        self
    }

    pub fn stylesheet(mut self, name: impl Into<String>) -> Self {
        self.stylesheet = name.into();
        self
    }

    pub fn output_html(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_html = path.into();
        self
    }

    pub fn debug_define(mut self, expression: impl Into<String>) -> Self {
        self.debug_define = expression.into();
        self
    }

    pub fn collapse_whitespace(mut self, enabled: bool) -> Self {
        self.collapse_whitespace = enabled;
        self
    }

    pub fn upload(mut self, target: Option<UploadTarget>) -> Self {
        self.upload = target;
        self
    }

    pub fn service_worker(mut self, worker: Option<ServiceWorker>) -> Self {
        self.service_worker = worker;
        self
    }

    pub fn polyfills_url(mut self, url: Option<String>) -> Self {
        self.polyfills_url = url;
        self
    }

    pub fn sentry_cdn_url(mut self, url: Option<String>) -> Self {
        self.sentry_cdn_url = url;
        self
    }

    pub fn timestamp_ms(mut self, timestamp_ms: i64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    /// Resolve `path` against the project root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    pub fn template_path(&self) -> PathBuf {
        self.resolve(&self.template)
    }

    pub fn assets_path(&self) -> PathBuf {
        self.resolve(&self.assets_dir)
    }

    pub fn entry_path(&self) -> PathBuf {
        self.assets_path().join(&self.entry)
    }

    pub fn entry_map_path(&self) -> PathBuf {
        self.assets_path().join(format!("{}.map", self.entry))
    }

    pub fn stylesheet_path(&self) -> PathBuf {
        self.assets_path().join(&self.stylesheet)
    }

    pub fn output_html_path(&self) -> PathBuf {
        self.resolve(&self.output_html)
    }

    /// Inputs that must exist before the run starts.
    pub fn required_inputs(&self) -> Vec<PathBuf> {
        let mut inputs = vec![
            self.template_path(),
            self.entry_path(),
            self.entry_map_path(),
            self.stylesheet_path(),
        ];
        if let Some(worker) = &self.service_worker {
            inputs.push(self.resolve(&worker.source));
        }
        inputs
    }

    /// Check for values that would make the run meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.entry.trim().is_empty() {
            return Err(Error::InvalidConfig("entry file name is empty".to_string()));
        }
        if self.stylesheet.trim().is_empty() {
            return Err(Error::InvalidConfig("stylesheet file name is empty".to_string()));
        }
        if self.debug_define.trim().is_empty() {
            return Err(Error::InvalidConfig("debug define is empty".to_string()));
        }
        if let Some(target) = &self.upload {
            if target.org.is_empty() || target.project.is_empty() || target.release.is_empty() {
                return Err(Error::InvalidConfig(
                    "upload target needs an organization, project and release".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Fields read from `package.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub config: PackageConfig,
}

/// The `config` block of `package.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PackageConfig {
    #[serde(default)]
    pub domain: Option<String>,
}

impl PackageMetadata {
    /// Read `package.json`.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::missing_input(path, e))?;
        Self::parse(path, &content)
    }

    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::PackageMetadata {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Upload target for this package's current version.
    pub fn upload_target(&self, org: impl Into<String>) -> UploadTarget {
        UploadTarget {
            org: org.into(),
            project: self.name.clone(),
            release: self.version.clone(),
        }
    }
}
