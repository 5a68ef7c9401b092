use crate::config::BakeConfig;
use crate::error::{ConfigError, Result};

/// Whether `expr` is a dotted chain of JavaScript identifiers.
pub fn is_member_expression(expr: &str) -> bool {
    !expr.is_empty() && expr.split('.').all(is_identifier)
}

fn is_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

impl BakeConfig {
    /// Validate configuration for logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.entry.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "entry".to_string(),
                hint: "Name the bundled JS file inside assetsDir, e.g. \"index.js\"".to_string(),
            }
            .into());
        }

        if !self.entry.ends_with(".js") && !self.entry.ends_with(".mjs") {
            return Err(ConfigError::InvalidValue {
                field: "entry".to_string(),
                value: self.entry.clone(),
                hint: "The entry must be the bundled .js file".to_string(),
            }
            .into());
        }

        if self.stylesheet.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "stylesheet".to_string(),
                hint: "Name the bundled CSS file inside assetsDir, e.g. \"index.css\"".to_string(),
            }
            .into());
        }

        if !is_member_expression(&self.debug_define) {
            return Err(ConfigError::InvalidValue {
                field: "debugDefine".to_string(),
                value: self.debug_define.clone(),
                hint: "Use an identifier or member expression such as window.__DEBUG__".to_string(),
            }
            .into());
        }

        if (self.features.upload || self.features.error_tracking) && self.sentry.is_none() {
            return Err(ConfigError::MissingField {
                field: "sentry".to_string(),
                hint: "Error tracking and sourcemap upload need a \"sentry\" section".to_string(),
            }
            .into());
        }

        if let Some(sentry) = &self.sentry {
            if sentry.org.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "sentry.org".to_string(),
                    value: sentry.org.clone(),
                    hint: "Set the Sentry organization slug".to_string(),
                }
                .into());
            }
        }

        if self.features.analytics && self.analytics.is_none() {
            return Err(ConfigError::MissingField {
                field: "analytics".to_string(),
                hint: "The analytics beacon needs an \"analytics\" section".to_string(),
            }
            .into());
        }

        if self.features.service_worker && self.service_worker.is_none() {
            return Err(ConfigError::MissingField {
                field: "serviceWorker".to_string(),
                hint: "Add a \"serviceWorker\" section with the worker source path".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Whether any enabled stage reads package.json.
    pub fn needs_package(&self) -> bool {
        self.features.upload
            || self.features.error_tracking
            || (self.features.analytics
                && self.analytics.as_ref().is_some_and(|a| a.domain.is_none()))
    }
}
