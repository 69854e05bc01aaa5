use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{LocaleConfig, LocaleError, DEFAULT_LOCALE, SUPPORTED_LOCALES};

/// Fetches the configuration for one base code.
///
/// Implementations return the configuration itself; whatever wrapping the
/// underlying source uses is unpacked here, before the resolver sees it.
#[async_trait]
pub trait LocaleLoader: Send + Sync + Debug {
    async fn load(&self, base: &str) -> Result<LocaleConfig, LocaleError>;
}

// Always hands back the same configuration
#[derive(Debug, Clone)]
pub struct StaticLoader {
    config: LocaleConfig,
}

impl StaticLoader {
    pub fn new(config: LocaleConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl LocaleLoader for StaticLoader {
    async fn load(&self, _base: &str) -> Result<LocaleConfig, LocaleError> {
        Ok(self.config.clone())
    }
}

// Reads `<base_path>/<base>.json`
#[derive(Debug, Clone)]
pub struct FileLoader {
    base_path: PathBuf,
}

impl FileLoader {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn get_locale_file_path(&self, base: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", base))
    }
}

#[async_trait]
impl LocaleLoader for FileLoader {
    async fn load(&self, base: &str) -> Result<LocaleConfig, LocaleError> {
        let file_path = self.get_locale_file_path(base);

        let content = tokio::fs::read_to_string(&file_path)
            .await
            .map_err(|e| LocaleError::FileError(format!(
                "Failed to read locale file {:?}: {}",
                file_path, e
            )))?;

        let document: Value = serde_json::from_str(&content)
            .map_err(|e| LocaleError::FileError(format!(
                "Failed to parse locale file {:?}: {}",
                file_path, e
            )))?;

        Ok(extract_payload(document, base))
    }
}

/// Unwrap the configuration from a locale module document.
///
/// Wrapped documents are searched in order: `{"<base>": ..}`,
/// `{"default": {"<base>": ..}}`, `{"default": ..}`; the first non-empty
/// candidate wins and an all-empty wrapper yields an empty configuration.
/// A document with neither key is the configuration itself.
pub fn extract_payload(document: Value, base: &str) -> LocaleConfig {
    let wrapped = document.get(base).is_some() || document.get("default").is_some();
    if !wrapped {
        return LocaleConfig::new(document);
    }

    let nested_default = document.get("default");
    let candidates = [
        document.get(base),
        nested_default.and_then(|default| default.get(base)),
        nested_default,
    ];

    candidates
        .into_iter()
        .flatten()
        .map(|candidate| LocaleConfig::new(candidate.clone()))
        .find(|config| !config.is_empty())
        .unwrap_or_else(|| LocaleConfig::new(Value::Null))
}

/// Base code -> loader table, filled once at startup.
#[derive(Debug, Clone, Default)]
pub struct LoaderRegistry {
    loaders: HashMap<String, Arc<dyn LocaleLoader>>,
}

impl LoaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// File-backed loaders for every supported code except the default
    /// locale, which is served from the bundled English configuration.
    pub fn with_data_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        let mut registry = Self::new();
        let file_loader: Arc<dyn LocaleLoader> = Arc::new(FileLoader::new(data_dir));
        let english: Arc<dyn LocaleLoader> = Arc::new(StaticLoader::new(LocaleConfig::english()));

        for code in SUPPORTED_LOCALES {
            if *code == DEFAULT_LOCALE {
                registry.register(code, Arc::clone(&english));
            } else {
                registry.register(code, Arc::clone(&file_loader));
            }
        }

        registry
    }

    pub fn register(&mut self, base: &str, loader: Arc<dyn LocaleLoader>) {
        self.loaders.insert(base.to_string(), loader);
    }

    pub fn get(&self, base: &str) -> Option<Arc<dyn LocaleLoader>> {
        self.loaders.get(base).cloned()
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn french() -> Value {
        json!({
            "weekdays": { "shorthand": ["dim", "lun", "mar", "mer", "jeu", "ven", "sam"] },
            "firstDayOfWeek": 1
        })
    }

    #[test]
    fn test_extract_keyed_by_base_code() {
        let config = extract_payload(json!({ "fr": french() }), "fr");
        assert_eq!(config.as_value(), &french());
    }

    #[test]
    fn test_extract_nested_under_default() {
        let config = extract_payload(json!({ "default": { "fr": french() } }), "fr");
        assert_eq!(config.as_value(), &french());
    }

    #[test]
    fn test_extract_default_itself() {
        let config = extract_payload(json!({ "default": french() }), "fr");
        assert_eq!(config.as_value(), &french());
    }

    #[test]
    fn test_extract_bare_document() {
        let config = extract_payload(french(), "fr");
        assert_eq!(config.as_value(), &french());
    }

    #[test]
    fn test_extract_skips_empty_candidates() {
        // Empty keyed entry falls through to the default export
        let config = extract_payload(json!({ "fr": {}, "default": french() }), "fr");
        assert_eq!(config.as_value(), &french());

        let config = extract_payload(json!({ "fr": null, "default": {} }), "fr");
        assert!(config.is_empty());
    }

    #[test]
    fn test_registry_covers_supported_locales() {
        let registry = LoaderRegistry::with_data_dir("locales");
        assert_eq!(registry.len(), SUPPORTED_LOCALES.len());
        assert!(registry.get("fr").is_some());
        assert!(registry.get("zz").is_none());
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_empty_registry() {
        let mut registry = LoaderRegistry::new();
        assert!(registry.is_empty());

        registry.register("fr", Arc::new(FileLoader::new("locales")));
        assert!(!registry.is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_static_loader_for_default_locale() {
        let registry = LoaderRegistry::with_data_dir("does-not-exist");
        let loader = registry.get(DEFAULT_LOCALE).unwrap();
        let config = loader.load(DEFAULT_LOCALE).await.unwrap();
        assert_eq!(config, LocaleConfig::english());
    }

    #[tokio::test]
    async fn test_file_loader() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        fs::write(
            temp_dir.path().join("fr.json"),
            serde_json::to_string_pretty(&json!({ "fr": french() }))?,
        )?;

        let loader = FileLoader::new(temp_dir.path());
        let config = loader.load("fr").await?;
        assert_eq!(config.as_value(), &french());

        Ok(())
    }

    #[tokio::test]
    async fn test_file_loader_errors() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("de.json"), "{ not json")?;

        let loader = FileLoader::new(temp_dir.path());
        assert!(matches!(loader.load("de").await, Err(LocaleError::FileError(_))));
        assert!(matches!(loader.load("it").await, Err(LocaleError::FileError(_))));

        Ok(())
    }

    #[tokio::test]
    async fn test_bundled_locale_files() {
        let locales_path = Path::new("locales");

        if !locales_path.exists() {
            // Skip test if locales directory doesn't exist
            return;
        }

        let loader = FileLoader::new(locales_path);
        for base in ["fr", "de", "ja"] {
            if let Ok(config) = loader.load(base).await {
                assert!(!config.is_empty(), "{base}.json should carry a configuration");
                assert!(config.as_value().get("months").is_some());
            }
        }
    }
}
