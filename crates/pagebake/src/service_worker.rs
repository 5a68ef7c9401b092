//! Service worker emission.
//!
//! The worker source carries placeholders that are filled in at build time:
//!
//! | placeholder    | value                                   |
//! |----------------|-----------------------------------------|
//! | `$TS$`         | build timestamp in milliseconds         |
//! | `$POLYFILLS$`  | polyfill script URL                     |
//! | `$SENTRY$`     | Sentry CDN bundle URL from the loader   |
//!
//! The result is minified with the same fixed settings as the bundle and
//! written without a sourcemap.

use std::path::PathBuf;

use tracing::info;

use crate::artifact::write_file;
use crate::minify::minify_code;
use crate::substitute::{Rule, RuleSet};
use crate::{Error, Result};

/// Values substituted into the worker source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerPlaceholders {
    pub timestamp_ms: i64,
    pub polyfills_url: Option<String>,
    pub sentry_url: Option<String>,
}

impl WorkerPlaceholders {
    /// Rules filling every placeholder that has a value.
    pub fn rules(&self) -> RuleSet {
        let mut rules = RuleSet::new().with(Rule::literal("$TS$", self.timestamp_ms.to_string()));
        if let Some(url) = &self.polyfills_url {
            rules.push(Rule::literal("$POLYFILLS$", url.as_str()));
        }
        if let Some(url) = &self.sentry_url {
            rules.push(Rule::literal("$SENTRY$", url.as_str()));
        }
        rules
    }
}

/// Source and destination of the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceWorker {
    pub source: PathBuf,
    pub output: PathBuf,
}

impl ServiceWorker {
    pub fn new(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
        }
    }

    /// Fill placeholders, minify, write. Returns the written code.
    pub fn emit(&self, placeholders: &WorkerPlaceholders, debug_define: &str) -> Result<String> {
        let source = std::fs::read_to_string(&self.source)
            .map_err(|e| Error::missing_input(&self.source, e))?;
        let filled = placeholders.rules().apply(&source);
        let name = self
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sw.js".to_string());
        let code = minify_code(&name, &filled, debug_define)?;
        write_file(&self.output, &code)?;
        info!(path = %self.output.display(), bytes = code.len(), "wrote service worker");
        Ok(code)
    }
}
