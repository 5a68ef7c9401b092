use std::path::{Path, PathBuf};

use pagebake::integrations::sentry_cdn_url;
use pagebake::{
    AnalyticsBeacon, PackageMetadata, Pipeline, PipelineConfig, SentryCliUploader, SentryLoader,
    ServiceWorker, UploadTarget,
};

use crate::cli::BuildArgs;
use crate::config::loading::{ConfigOverrides, FeatureOverrides};
use crate::config::BakeConfig;
use crate::error::{BuildError, Result};

// CLI flags -> config overrides. A flag that isn't set never turns a
// feature off.
impl From<&BuildArgs> for ConfigOverrides {
    fn from(args: &BuildArgs) -> Self {
        let flag = |set: bool| set.then_some(true);
        Self {
            template: args.template.clone(),
            assets_dir: args.assets_dir.clone(),
            out_html: args.out_html.clone(),
            debug_define: args.debug_define.clone(),
            collapse_whitespace: args.no_collapse_whitespace.then_some(false),
            features: FeatureOverrides {
                error_tracking: flag(args.error_tracking),
                upload: flag(args.upload),
                analytics: flag(args.analytics),
                service_worker: flag(args.service_worker),
            },
        }
    }
}

/// Everything needed to run one build: the library config plus the enabled
/// integrations.
#[derive(Debug)]
pub struct BuildPlan {
    pub pipeline: PipelineConfig,
    pub package: Option<PackageMetadata>,
    pub loader: Option<SentryLoader>,
    pub beacon: Option<AnalyticsBeacon>,
    pub uploader: Option<SentryCliUploader>,
}

impl BuildPlan {
    /// Assemble the pipeline driver.
    pub fn into_pipeline(self) -> Pipeline {
        let mut pipeline = Pipeline::new(self.pipeline);
        if let Some(loader) = self.loader {
            pipeline = pipeline.with_bootstrap(loader);
        }
        if let Some(beacon) = self.beacon {
            pipeline = pipeline.with_bootstrap(beacon);
        }
        if let Some(uploader) = self.uploader {
            pipeline = pipeline.with_uploader(uploader);
        }
        pipeline
    }

    /// Paths the pipeline will read, including integration inputs.
    pub fn inputs(&self) -> Vec<PathBuf> {
        let mut inputs = self.pipeline.required_inputs();
        if let Some(loader) = &self.loader {
            inputs.push(loader.loader_path().to_path_buf());
        }
        inputs
    }
}

impl BakeConfig {
    /// Resolve the configuration against `root` into a [`BuildPlan`].
    ///
    /// Reads package.json only when an enabled stage needs it.
    pub fn plan(&self, root: &Path, timestamp_ms: Option<i64>) -> Result<BuildPlan> {
        let package = if self.needs_package() {
            Some(PackageMetadata::load(&root.join(&self.package_json))?)
        } else {
            None
        };

        let mut config = PipelineConfig::new(root)
            .template(&self.template)
            .assets_dir(&self.assets_dir)
            .entry(&self.entry)
            .stylesheet(&self.stylesheet)
            .output_html(&self.out_html)
            .debug_define(&self.debug_define)
            .collapse_whitespace(self.collapse_whitespace);
        if let Some(timestamp_ms) = timestamp_ms {
            config = config.timestamp_ms(timestamp_ms);
        }

        let sentry = self.sentry.clone().unwrap_or_default();
        let loader_path = root.join(&sentry.loader);

        let mut loader = None;
        let mut uploader = None;
        if let Some(package) = &package {
            if self.features.error_tracking {
                loader = Some(SentryLoader::new(&loader_path, package.version.as_str()));
            }
            if self.features.upload {
                let project = sentry.project.clone().unwrap_or_else(|| package.name.clone());
                config = config.upload(Some(UploadTarget {
                    org: sentry.org.clone(),
                    project,
                    release: package.version.clone(),
                }));
                uploader = Some(SentryCliUploader::with_program(&sentry.cli));
            }
        }

        let mut beacon = None;
        if self.features.analytics {
            let analytics = self.analytics.clone().unwrap_or_default();
            let domain = analytics
                .domain
                .clone()
                .or_else(|| package.as_ref().and_then(|p| p.config.domain.clone()))
                .ok_or_else(|| BuildError::PackageField {
                    field: "config.domain".to_string(),
                    hint: "Set analytics.domain or config.domain in package.json".to_string(),
                })?;
            beacon = Some(AnalyticsBeacon::new(domain, analytics.script_url));
        }

        if self.features.service_worker {
            let worker = self.service_worker.clone().unwrap_or_default();
            let cdn_url = if self.features.error_tracking {
                let loader_source = std::fs::read_to_string(&loader_path)
                    .map_err(|e| pagebake::Error::missing_input(&loader_path, e))?;
                sentry_cdn_url(&loader_source)
            } else {
                None
            };
            config = config
                .service_worker(Some(ServiceWorker::new(worker.source, worker.output)))
                .polyfills_url(worker.polyfills_url)
                .sentry_cdn_url(cdn_url);
        }

        Ok(BuildPlan {
            pipeline: config,
            package,
            loader,
            beacon,
            uploader,
        })
    }
}
