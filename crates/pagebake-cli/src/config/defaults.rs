use std::path::PathBuf;

use pagebake::DEFAULT_DEBUG_DEFINE;

/// Config file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "pagebake.config.json";

/// JSON schema written next to the config by `init --schema`.
pub const SCHEMA_FILE_NAME: &str = "pagebake.schema.json";

/// Prefix of environment variables read into the config.
pub const ENV_PREFIX: &str = "PAGEBAKE_";

pub fn default_template() -> PathBuf {
    PathBuf::from("index.html")
}

pub fn default_assets_dir() -> PathBuf {
    PathBuf::from("dist/assets")
}

pub fn default_entry() -> String {
    "index.js".to_string()
}

pub fn default_stylesheet() -> String {
    "index.css".to_string()
}

pub fn default_out_html() -> PathBuf {
    PathBuf::from("dist/index.html")
}

pub fn default_debug_define() -> String {
    DEFAULT_DEBUG_DEFINE.to_string()
}

pub fn default_collapse_whitespace() -> bool {
    true
}

pub fn default_package_json() -> PathBuf {
    PathBuf::from("package.json")
}

pub fn default_sentry_org() -> String {
    "sentry".to_string()
}

pub fn default_sentry_cli() -> PathBuf {
    PathBuf::from("sentry-cli")
}

pub fn default_sentry_loader() -> PathBuf {
    PathBuf::from("sentry-loader.js")
}

pub fn default_analytics_script() -> String {
    "https://plausible.io/js/script.js".to_string()
}

pub fn default_worker_source() -> PathBuf {
    PathBuf::from("src/sw.js")
}

pub fn default_worker_output() -> PathBuf {
    PathBuf::from("dist/sw.js")
}
