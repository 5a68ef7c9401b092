//! Analytics beacon script tag.

use super::BootstrapInjector;
use crate::Result;
use crate::html::{Placement, ScriptTag};

/// Deferred external analytics script keyed by site domain, placed after the
/// bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsBeacon {
    pub domain: String,
    pub script_url: String,
}

impl AnalyticsBeacon {
    pub fn new(domain: impl Into<String>, script_url: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            script_url: script_url.into(),
        }
    }
}

impl BootstrapInjector for AnalyticsBeacon {
    fn name(&self) -> &str {
        "analytics"
    }

    fn placement(&self) -> Placement {
        Placement::AfterBundle
    }

    fn script(&self) -> Result<ScriptTag> {
        Ok(ScriptTag::external(&self.script_url)
            .attr("defer", None)
            .attr("data-domain", Some(self.domain.clone())))
    }
}
