use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use super::{
    is_supported, normalize_tag, LoaderRegistry, LocaleConfig, LocaleError, DEFAULT_LOCALE,
    SUPPORTED_LOCALES,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveOutcome {
    /// The default locale itself was requested
    Default,
    Cached,
    Loaded,
    Unsupported,
    EmptyPayload,
    LoadFailed,
}

impl ResolveOutcome {
    /// True when the configuration returned stands in for the requested one.
    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            ResolveOutcome::Unsupported | ResolveOutcome::EmptyPayload | ResolveOutcome::LoadFailed
        )
    }
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub tag: String,
    pub base: String,
    pub outcome: ResolveOutcome,
    pub config: Arc<LocaleConfig>,
}

impl Resolution {
    /// The fallback reason as an error, for callers that want to surface it.
    /// Only the tag is carried; loader details stay in the logs.
    pub fn fallback_error(&self) -> Option<LocaleError> {
        let tag = self.tag.clone();
        match self.outcome {
            ResolveOutcome::Unsupported => Some(LocaleError::UnsupportedLocale(tag)),
            ResolveOutcome::EmptyPayload => Some(LocaleError::EmptyPayload(tag)),
            ResolveOutcome::LoadFailed => Some(LocaleError::LoadFailed(tag)),
            _ => None,
        }
    }
}

/// Resolves locale tags to configurations, caching successful loads under
/// the tag exactly as requested.
///
/// Every failure falls back to the bundled default configuration; nothing
/// is cached for a fallback. Concurrent requests for the same uncached tag
/// each run their own load and the last insert wins.
#[derive(Debug)]
pub struct LocaleResolver {
    loaders: LoaderRegistry,
    cache: RwLock<HashMap<String, Arc<LocaleConfig>>>,
    default_config: Arc<LocaleConfig>,
}

impl LocaleResolver {
    pub fn new(loaders: LoaderRegistry) -> Self {
        Self {
            loaders,
            cache: RwLock::new(HashMap::new()),
            default_config: Arc::new(LocaleConfig::english()),
        }
    }

    pub fn is_supported(&self, tag: &str) -> bool {
        is_supported(tag)
    }

    pub fn supported_locales(&self) -> &'static [&'static str] {
        SUPPORTED_LOCALES
    }

    pub fn default_config(&self) -> Arc<LocaleConfig> {
        Arc::clone(&self.default_config)
    }

    pub async fn resolve(&self, tag: &str) -> Arc<LocaleConfig> {
        self.resolve_detailed(tag).await.config
    }

    pub async fn resolve_detailed(&self, tag: &str) -> Resolution {
        let base = normalize_tag(tag);

        if tag == DEFAULT_LOCALE {
            return self.fallback(tag, base, ResolveOutcome::Default);
        }

        let cached = self.cache.read().await.get(tag).cloned();
        if let Some(config) = cached {
            debug!(tag, "Locale served from cache");
            return Resolution {
                tag: tag.to_string(),
                base,
                outcome: ResolveOutcome::Cached,
                config,
            };
        }

        if !is_supported(tag) {
            warn!(tag, "Unsupported locale requested, using default locale");
            return self.fallback(tag, base, ResolveOutcome::Unsupported);
        }

        let Some(loader) = self.loaders.get(&base) else {
            let e = LocaleError::NoLoader(base.clone());
            error!(tag, error = %e, "Failed to load locale, using default locale");
            return self.fallback(tag, base, ResolveOutcome::LoadFailed);
        };

        match loader.load(&base).await {
            Ok(config) if config.is_empty() => {
                warn!(tag, base = %base, "Locale data not found, using default locale");
                self.fallback(tag, base, ResolveOutcome::EmptyPayload)
            }
            Ok(config) => {
                let config = Arc::new(config);
                {
                    let mut cache = self.cache.write().await;
                    cache.insert(tag.to_string(), Arc::clone(&config));
                }
                debug!(tag, base = %base, "Locale loaded and cached");
                Resolution {
                    tag: tag.to_string(),
                    base,
                    outcome: ResolveOutcome::Loaded,
                    config,
                }
            }
            Err(e) => {
                error!(tag, error = %e, "Failed to load locale, using default locale");
                self.fallback(tag, base, ResolveOutcome::LoadFailed)
            }
        }
    }

    /// Resolve several tags concurrently; returns how many resolved to their
    /// own configuration rather than a fallback.
    pub async fn preload(&self, tags: &[String]) -> usize {
        let resolutions =
            futures::future::join_all(tags.iter().map(|tag| self.resolve_detailed(tag))).await;

        resolutions
            .iter()
            .filter(|resolution| !resolution.outcome.is_fallback())
            .count()
    }

    pub async fn cached_tags(&self) -> Vec<String> {
        let cache = self.cache.read().await;
        let mut tags: Vec<String> = cache.keys().cloned().collect();
        tags.sort();
        tags
    }

    pub async fn cache_len(&self) -> usize {
        self.cache.read().await.len()
    }

    fn fallback(&self, tag: &str, base: String, outcome: ResolveOutcome) -> Resolution {
        Resolution {
            tag: tag.to_string(),
            base,
            outcome,
            config: self.default_config(),
        }
    }
}
