//! # pagebake
//!
//! Post-build pipeline for single-page web applications.
//!
//! Takes what a module bundler leaves in its output directory (an HTML
//! template, a bundled ES module with its sourcemap, and a stylesheet) and
//! turns it into one self-contained page:
//!
//! - the bundle is minified with a fixed configuration and its sourcemap is
//!   chained back through the bundler's map to the original sources
//! - the minified bundle and map are written as `<stem>-final.js(.map)`
//! - the stylesheet and bundle are inlined into the template
//! - optionally, a service worker is emitted and the sourcemaps are uploaded
//!   to an error-tracking service
//!
//! ## Quick Start
//!
//! ```no_run
//! use pagebake::{Pipeline, PipelineConfig, UploadOutcome};
//!
//! # #[tokio::main]
//! # async fn main() -> pagebake::Result<()> {
//! let config = PipelineConfig::new(".").output_html("dist/index.html");
//! let report = Pipeline::new(config).run().await?;
//!
//! assert_eq!(report.upload, UploadOutcome::Skipped);
//! for file in report.written_files() {
//!     println!("wrote {}", file.display());
//! }
//! # Ok(()) }
//! ```
//!
//! The stages are also usable on their own: see [`substitute`], [`minify`],
//! [`artifact`] and [`html`].

pub mod artifact;
pub mod config;
pub mod error;
pub mod html;
pub mod integrations;
pub mod minify;
pub mod pipeline;
pub mod service_worker;
pub mod sourcemap;
pub mod substitute;

pub use artifact::{ArtifactPaths, write_artifacts};
pub use config::{PackageConfig, PackageMetadata, PipelineConfig};
pub use error::{Error, Result};
pub use html::{HtmlComposer, Placement, ScriptTag, compose};
pub use integrations::{
    AnalyticsBeacon, BootstrapInjector, NoopUploader, SentryCliUploader, SentryLoader,
    SourcemapUploader, UploadTarget,
};
pub use minify::{DEFAULT_DEBUG_DEFINE, MinifyOptions, MinifyOutput, SourceModule, minify};
pub use pipeline::{BuildOutput, BuildReport, Pipeline, SourceArtifact, UploadOutcome};
pub use service_worker::{ServiceWorker, WorkerPlaceholders};
pub use substitute::{Pattern, Replacement, Rule, RuleSet};

// Sourcemap type used in public signatures
pub use oxc_sourcemap::SourceMap;
