use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleSettings {
    /// Directory holding `<base>.json` locale files
    pub data_dir: String,
    /// Tags resolved at startup
    pub preload: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub log: LogConfig,
    pub locale: LocaleSettings,
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3001,
            },
            log: LogConfig {
                level: "info".to_string(),
            },
            locale: LocaleSettings {
                data_dir: "locales".to_string(),
                preload: vec![],
            },
            environment: "development".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let mut config = AppConfig::default();

        // Determine environment
        let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        config.environment = environment.clone();

        // Load environment files in order of priority
        let env_files = vec![
            "configs/.env.default".to_string(),
            format!("configs/.env.{}", environment),
            "configs/.env.local".to_string(),
        ];

        // Variables set before any file is read take precedence over all files
        let preset: HashSet<OsString> = env::vars_os().map(|(key, _)| key).collect();

        for env_file in env_files {
            if Path::new(&env_file).exists() {
                load_env_file(&env_file, &preset)?;
            }
        }

        // Override with environment variables
        config.apply_overrides(|key| env::var(key).ok());

        Ok(config)
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server config
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }

        // Log config
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log.level = level;
        }

        // Locale config
        if let Some(data_dir) = lookup("LOCALE_DATA_DIR") {
            self.locale.data_dir = data_dir;
        }
        if let Some(preload) = lookup("LOCALE_PRELOAD") {
            self.locale.preload = preload
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect();
        }
    }
}

fn load_env_file(path: &str, preset: &HashSet<OsString>) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read env file {}", path))?;

    for (key, value) in content.lines().filter_map(parse_env_line) {
        if !preset.contains(&OsString::from(key)) {
            unsafe { env::set_var(key, value); }
        }
    }

    Ok(())
}

fn parse_env_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    // Remove quotes if present
    let value = if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        &value[1..value.len() - 1]
    } else {
        value
    };

    Some((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_env_line() {
        assert_eq!(parse_env_line("SERVER_PORT=8080"), Some(("SERVER_PORT", "8080")));
        assert_eq!(parse_env_line("  LOG_LEVEL = debug "), Some(("LOG_LEVEL", "debug")));
        assert_eq!(
            parse_env_line(r#"LOCALE_DATA_DIR="/srv/locales""#),
            Some(("LOCALE_DATA_DIR", "/srv/locales"))
        );
        assert_eq!(parse_env_line("NAME='x'"), Some(("NAME", "x")));
        assert_eq!(parse_env_line("# comment"), None);
        assert_eq!(parse_env_line(""), None);
        assert_eq!(parse_env_line("NO_EQUALS"), None);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SERVER_PORT", "8080"),
            ("LOG_LEVEL", "debug"),
            ("LOCALE_DATA_DIR", "/srv/locales"),
            ("LOCALE_PRELOAD", "fr, de-AT,,ja"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.locale.data_dir, "/srv/locales");
        assert_eq!(config.locale.preload, vec!["fr", "de-AT", "ja"]);
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| (key == "SERVER_PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.server.port, 3001);
    }
}
