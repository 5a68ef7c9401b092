//! Pipeline driver.
//!
//! Runs every stage in sequence against a fixed [`PipelineConfig`]:
//!
//! ```text
//! read inputs -> minify -> write artifacts -> compose html -> service worker -> upload
//! ```
//!
//! All inputs are read before anything is written, so a missing file leaves
//! the output directory untouched. Later failures do not roll back files that
//! were already written. Only the upload stage is allowed to fail without
//! failing the run.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::artifact::{ArtifactPaths, write_artifacts, write_file};
use crate::config::PipelineConfig;
use crate::html::HtmlComposer;
use crate::integrations::{
    BootstrapInjector, NoopUploader, SourcemapUploader, UploadTarget, upload_files,
};
use crate::minify::{MinifyOptions, SourceModule, minify};
use crate::service_worker::{ServiceWorker, WorkerPlaceholders};
use crate::{Error, Result};

/// A bundler output file, read once and never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceArtifact {
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

impl SourceArtifact {
    /// Read `path`, failing with [`Error::MissingInput`].
    pub fn read(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content =
            std::fs::read_to_string(&path).map_err(|e| Error::missing_input(&path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            path,
            content,
        })
    }
}

/// The three texts a run produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    /// Final page
    pub html: String,
    /// Final bundle, including its sourcemap comment
    pub js: String,
    /// Final sourcemap JSON
    pub map: String,
}

/// Result of the optional upload stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Upload is disabled
    Skipped,
    /// Uploader finished successfully
    Uploaded { uploader: String },
    /// Uploader failed; the build itself still succeeded
    Failed { uploader: String, reason: String },
}

impl UploadOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for UploadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped => f.write_str("skipped"),
            Self::Uploaded { uploader } => write!(f, "uploaded via {uploader}"),
            Self::Failed { uploader, reason } => write!(f, "{uploader} failed: {reason}"),
        }
    }
}

/// What a successful run produced and where it went.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub output: BuildOutput,
    pub artifacts: ArtifactPaths,
    pub html_path: PathBuf,
    pub service_worker: Option<PathBuf>,
    pub upload: UploadOutcome,
    pub duration_ms: u128,
}

impl BuildReport {
    /// Every file written by the run.
    pub fn written_files(&self) -> Vec<&Path> {
        let mut files: Vec<&Path> = self.artifacts.files().to_vec();
        files.push(&self.html_path);
        if let Some(worker) = &self.service_worker {
            files.push(worker);
        }
        files
    }
}

struct Inputs {
    template: SourceArtifact,
    bundle: SourceArtifact,
    bundle_map: SourceArtifact,
    stylesheet: SourceArtifact,
}

/// Drives a single build.
///
/// ```no_run
/// # async fn run() -> pagebake::Result<()> {
/// use pagebake::{Pipeline, PipelineConfig};
///
/// let report = Pipeline::new(PipelineConfig::new(".")).run().await?;
/// println!("wrote {}", report.html_path.display());
/// # Ok(())
/// # }
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    uploader: Box<dyn SourcemapUploader>,
    bootstraps: Vec<Box<dyn BootstrapInjector>>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            uploader: Box::new(NoopUploader),
            bootstraps: Vec::new(),
        }
    }

    /// Uploader used when the config names an upload target.
    pub fn with_uploader(mut self, uploader: impl SourcemapUploader + 'static) -> Self {
        self.uploader = Box::new(uploader);
        self
    }

    /// Add a script fragment. Fragments keep insertion order within their
    /// placement.
    pub fn with_bootstrap(mut self, injector: impl BootstrapInjector + 'static) -> Self {
        self.bootstraps.push(Box::new(injector));
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage.
    ///
    /// The upload runs last, after the page is written. Its `inject` step
    /// rewrites the bundle on disk with a release ID, so the inlined script
    /// does not carry that ID. Keep this order: uploading must never change
    /// a page that already built.
    ///
    /// # Errors
    ///
    /// Any stage error except an upload failure, which is reported in
    /// [`BuildReport::upload`] instead.
    pub async fn run(&self) -> Result<BuildReport> {
        let start = Instant::now();
        self.config.validate()?;

        let inputs = self.read_inputs()?;
        let composer = self.composer()?;
        let worker_source = self.worker_source_check()?;

        let artifacts = ArtifactPaths::for_entry(&self.config.assets_path(), &self.config.entry);
        let js_name = artifacts.js_file_name();

        info!(entry = %inputs.bundle.path.display(), "minifying bundle");
        let module = SourceModule::new(inputs.bundle.name, inputs.bundle.content)
            .with_input_map(inputs.bundle_map.content);
        let options = MinifyOptions::default()
            .debug_define(self.config.debug_define.as_str())
            .output_file(js_name.as_str());
        let minified = minify(&[module], &options)?;
        let map = minified.map_json();

        let js = write_artifacts(&minified.code, &map, &artifacts)?;
        info!(js = %artifacts.js.display(), map = %artifacts.map.display(), "wrote bundle");

        let html = composer.compose(
            &inputs.template.content,
            &inputs.stylesheet.content,
            &js,
        );
        let html_path = self.config.output_html_path();
        write_file(&html_path, &html)?;
        info!(path = %html_path.display(), bytes = html.len(), "wrote page");

        let service_worker = match worker_source {
            Some(worker) => {
                worker.emit(&self.worker_placeholders(), &self.config.debug_define)?;
                Some(worker.output)
            }
            None => None,
        };

        let upload = self.upload(&artifacts).await;

        let duration_ms = start.elapsed().as_millis();
        info!(duration_ms, upload = %upload, "build finished");

        Ok(BuildReport {
            output: BuildOutput { html, js, map },
            artifacts,
            html_path,
            service_worker,
            upload,
            duration_ms,
        })
    }

    fn read_inputs(&self) -> Result<Inputs> {
        let inputs = Inputs {
            template: SourceArtifact::read(self.config.template_path())?,
            bundle: SourceArtifact::read(self.config.entry_path())?,
            bundle_map: SourceArtifact::read(self.config.entry_map_path())?,
            stylesheet: SourceArtifact::read(self.config.stylesheet_path())?,
        };
        debug!(
            template_bytes = inputs.template.content.len(),
            bundle_bytes = inputs.bundle.content.len(),
            map_bytes = inputs.bundle_map.content.len(),
            css_bytes = inputs.stylesheet.content.len(),
            "read inputs"
        );
        Ok(inputs)
    }

    /// Builds the composer, rendering every bootstrap fragment up front so
    /// that an unreadable loader fails before any output is written.
    fn composer(&self) -> Result<HtmlComposer> {
        let mut composer = HtmlComposer::new().collapse_whitespace(self.config.collapse_whitespace);
        for injector in &self.bootstraps {
            let tag = injector.script()?;
            debug!(injector = injector.name(), placement = ?injector.placement(), "bootstrap script");
            composer = composer.script(injector.placement(), tag);
        }
        Ok(composer)
    }

    /// Resolves the worker paths and checks the source exists.
    fn worker_source_check(&self) -> Result<Option<ServiceWorker>> {
        let Some(worker) = &self.config.service_worker else {
            return Ok(None);
        };
        let resolved = ServiceWorker::new(
            self.config.resolve(&worker.source),
            self.config.resolve(&worker.output),
        );
        std::fs::metadata(&resolved.source)
            .map_err(|e| Error::missing_input(&resolved.source, e))?;
        Ok(Some(resolved))
    }

    fn worker_placeholders(&self) -> WorkerPlaceholders {
        WorkerPlaceholders {
            timestamp_ms: self.config.timestamp_ms,
            polyfills_url: self.config.polyfills_url.clone(),
            sentry_url: self.config.sentry_cdn_url.clone(),
        }
    }

    async fn upload(&self, artifacts: &ArtifactPaths) -> UploadOutcome {
        let Some(target) = &self.config.upload else {
            debug!("sourcemap upload disabled");
            return UploadOutcome::Skipped;
        };
        upload_with(self.uploader.as_ref(), target, artifacts).await
    }
}

async fn upload_with(
    uploader: &dyn SourcemapUploader,
    target: &UploadTarget,
    artifacts: &ArtifactPaths,
) -> UploadOutcome {
    let files = upload_files(&artifacts.js, &artifacts.map);
    info!(uploader = uploader.name(), release = %target.release, "uploading sourcemaps");
    match uploader.upload(target, &files).await {
        Ok(()) => UploadOutcome::Uploaded {
            uploader: uploader.name().to_string(),
        },
        Err(e) => {
            warn!(uploader = uploader.name(), error = %e, "sourcemap upload failed, continuing");
            UploadOutcome::Failed {
                uploader: uploader.name().to_string(),
                reason: e.to_string(),
            }
        }
    }
}
