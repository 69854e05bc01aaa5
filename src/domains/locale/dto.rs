use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::system::locale::{LocaleConfig, LocaleSource, Resolution, ResolveOutcome};

#[derive(Debug, Default, Deserialize)]
pub struct ResolveQuery {
    /// Report fallbacks as errors instead of serving the default locale
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
pub struct LocaleResponse {
    pub tag: String,
    pub base: String,
    pub outcome: ResolveOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<LocaleSource>,
    pub config: LocaleConfig,
}

impl From<Resolution> for LocaleResponse {
    fn from(resolution: Resolution) -> Self {
        Self {
            tag: resolution.tag,
            base: resolution.base,
            outcome: resolution.outcome,
            source: None,
            config: Arc::unwrap_or_clone(resolution.config),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SupportResponse {
    pub tag: String,
    pub base: String,
    pub supported: bool,
}

#[derive(Debug, Serialize)]
pub struct LocaleListResponse {
    pub default: &'static str,
    pub supported: &'static [&'static str],
    pub cached: Vec<String>,
}
