use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use serde::Serialize;

use crate::config::{BakeConfig, CONFIG_FILE_NAME, ENV_PREFIX};
use crate::error::{ConfigError, Result};

/// Top-level keys of `BakeConfig`, as they appear in the config file.
pub(crate) const CONFIG_KEYS: &[&str] = &[
    "template",
    "assetsDir",
    "entry",
    "stylesheet",
    "outHtml",
    "debugDefine",
    "collapseWhitespace",
    "packageJson",
    "features",
    "sentry",
    "analytics",
    "serviceWorker",
];

/// Values set on the command line. Unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_html: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_define: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapse_whitespace: Option<bool>,
    #[serde(skip_serializing_if = "FeatureOverrides::is_empty")]
    pub features: FeatureOverrides,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_tracking: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_worker: Option<bool>,
}

impl FeatureOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl BakeConfig {
    /// Load configuration for the project in `root`.
    /// Priority: CLI overrides > `PAGEBAKE_*` environment > config file > defaults
    ///
    /// Without `config_path`, `<root>/pagebake.config.json` is used when it
    /// exists. A `config_path` that doesn't exist is an error.
    pub fn load(root: &Path, config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default_config()));

        if let Some(path) = Self::config_file(root, config_path)? {
            figment = figment.merge(Json::file(path));
        }

        // PAGEBAKE_COLLAPSE_WHITESPACE=false, PAGEBAKE_FEATURES__UPLOAD=true, ...
        // Variables outside the config keys (PAGEBAKE_LOG, ...) are skipped.
        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .lowercase(false)
                .filter_map(|key| {
                    let key = env_key(key.as_str());
                    let top = key.split('.').next().unwrap_or_default();
                    CONFIG_KEYS.contains(&top).then(|| key.into())
                }),
        );

        figment = figment.merge(Serialized::defaults(overrides));

        figment
            .extract()
            .map_err(|e| ConfigError::Extract(e.to_string()).into())
    }

    /// The config file to read, if any.
    pub fn config_file(root: &Path, config_path: Option<&Path>) -> Result<Option<PathBuf>> {
        match config_path {
            Some(path) => {
                let path = root.join(path);
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Ok(Some(path))
            }
            None => {
                let path = root.join(CONFIG_FILE_NAME);
                Ok(path.is_file().then_some(path))
            }
        }
    }
}

/// Map an environment variable name (prefix stripped) to a config key.
///
/// `__` separates nesting levels; each level is converted from
/// `SCREAMING_SNAKE` to `camelCase`.
///
/// ```
/// use pagebake_cli::config::env_key;
///
/// assert_eq!(env_key("COLLAPSE_WHITESPACE"), "collapseWhitespace");
/// assert_eq!(env_key("SERVICE_WORKER__POLYFILLS_URL"), "serviceWorker.polyfillsUrl");
/// ```
pub fn env_key(key: &str) -> String {
    key.split("__").map(camel_case).collect::<Vec<_>>().join(".")
}

fn camel_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for (index, word) in segment.split('_').filter(|w| !w.is_empty()).enumerate() {
        let word = word.to_ascii_lowercase();
        if index == 0 {
            out.push_str(&word);
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
