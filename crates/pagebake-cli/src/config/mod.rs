//! Configuration for the pagebake CLI.
//!
//! Merges settings from CLI args, environment variables and
//! `pagebake.config.json`.
//! Priority: CLI > Environment > File > Defaults

mod conversions;
mod defaults;
mod loading;
mod validation;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;

pub use conversions::BuildPlan;
pub use defaults::*;
pub use loading::{ConfigOverrides, FeatureOverrides, env_key};
pub use validation::is_member_expression;

/// pagebake configuration, loaded from pagebake.config.json and the
/// environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BakeConfig {
    /// HTML template emitted by the bundler
    #[serde(default = "default_template")]
    pub template: PathBuf,

    /// Directory holding the bundled assets
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    /// Bundled JS file name inside `assetsDir`
    #[serde(default = "default_entry")]
    pub entry: String,

    /// Bundled CSS file name inside `assetsDir`
    #[serde(default = "default_stylesheet")]
    pub stylesheet: String,

    /// Where the final page is written
    #[serde(default = "default_out_html")]
    pub out_html: PathBuf,

    /// Global expression folded to `false` during minification
    #[serde(default = "default_debug_define")]
    pub debug_define: String,

    /// Remove line breaks and indentation from the page
    #[serde(default = "default_collapse_whitespace")]
    pub collapse_whitespace: bool,

    /// package.json providing name, version and `config.domain`
    #[serde(default = "default_package_json")]
    pub package_json: PathBuf,

    /// Optional stages to run
    #[serde(default)]
    pub features: Features,

    /// Sentry settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentry: Option<SentryConfig>,

    /// Analytics beacon settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<AnalyticsConfig>,

    /// Service worker settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_worker: Option<ServiceWorkerConfig>,
}

/// Switches for the optional stages. All off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Features {
    /// Inline the Sentry loader before the bundle
    #[serde(default)]
    pub error_tracking: bool,

    /// Upload the final bundle and map with sentry-cli
    #[serde(default)]
    pub upload: bool,

    /// Add the analytics beacon after the bundle
    #[serde(default)]
    pub analytics: bool,

    /// Emit the service worker
    #[serde(default)]
    pub service_worker: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SentryConfig {
    /// Sentry organization slug
    #[serde(default = "default_sentry_org")]
    pub org: String,

    /// Sentry project (defaults to the package name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// Saved copy of the project's JS loader script
    #[serde(default = "default_sentry_loader")]
    pub loader: PathBuf,

    /// sentry-cli executable
    #[serde(default = "default_sentry_cli")]
    pub cli: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnalyticsConfig {
    /// Site domain reported by the beacon (defaults to package.json `config.domain`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Beacon script URL
    #[serde(default = "default_analytics_script")]
    pub script_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServiceWorkerConfig {
    /// Worker source with `$TS$`, `$POLYFILLS$` and `$SENTRY$` placeholders
    #[serde(default = "default_worker_source")]
    pub source: PathBuf,

    /// Where the minified worker is written
    #[serde(default = "default_worker_output")]
    pub output: PathBuf,

    /// Value for `$POLYFILLS$`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polyfills_url: Option<String>,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            org: default_sentry_org(),
            project: None,
            loader: default_sentry_loader(),
            cli: default_sentry_cli(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            domain: None,
            script_url: default_analytics_script(),
        }
    }
}

impl Default for ServiceWorkerConfig {
    fn default() -> Self {
        Self {
            source: default_worker_source(),
            output: default_worker_output(),
            polyfills_url: None,
        }
    }
}

impl BakeConfig {
    /// Built-in defaults: a Vite build with every optional stage off.
    pub fn default_config() -> Self {
        Self {
            template: default_template(),
            assets_dir: default_assets_dir(),
            entry: default_entry(),
            stylesheet: default_stylesheet(),
            out_html: default_out_html(),
            debug_define: default_debug_define(),
            collapse_whitespace: default_collapse_whitespace(),
            package_json: default_package_json(),
            features: Features::default(),
            sentry: None,
            analytics: None,
            service_worker: None,
        }
    }

    /// JSON Schema for pagebake.config.json.
    pub fn json_schema() -> Result<serde_json::Value> {
        let schema = schemars::schema_for!(BakeConfig);
        Ok(serde_json::to_value(schema)?)
    }

    /// Example pagebake.config.json content with every section filled in.
    pub fn example_config() -> Result<String> {
        let example = Self {
            sentry: Some(SentryConfig::default()),
            analytics: Some(AnalyticsConfig::default()),
            service_worker: Some(ServiceWorkerConfig {
                polyfills_url: Some(
                    "https://cdnjs.cloudflare.com/polyfill/v3/polyfill.min.js".to_string(),
                ),
                ..ServiceWorkerConfig::default()
            }),
            ..Self::default_config()
        };
        Ok(serde_json::to_string_pretty(&example)?)
    }
}
