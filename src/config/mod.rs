use std::path::Path;

use serde::Deserialize;

use crate::constants::*;
use crate::models::{SortField, SortOrder};

/// Application configuration with sensible defaults.
///
/// Layers, lowest first: defaults, ~/.config/procwatch/config.toml,
/// environment (`PROCWATCH_URL`, `PROCWATCH_TOKEN`, also read from
/// ~/.config/procwatch/.env), then CLI flags applied by `main`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the process API, e.g. `http://127.0.0.1:8088`
    pub base_url: String,
    /// Initial auth token (editable at runtime)
    pub token: Option<String>,
    /// Auto-refresh period in milliseconds
    pub poll_interval_ms: u64,
    /// Whether auto-refresh starts enabled
    pub auto_refresh: bool,
    /// Initial sort field
    pub sort: SortField,
    /// Initial sort order
    pub order: SortOrder,
    /// Theme name (built-in or custom)
    pub theme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            auto_refresh: true,
            sort: SortField::Cpu,
            order: SortOrder::Desc,
            theme: "default".to_string(),
        }
    }
}

/// TOML-deserializable config file format.
/// All fields are optional; missing fields use defaults.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileConfig {
    base_url: Option<String>,
    token: Option<String>,
    poll_interval_ms: Option<u64>,
    auto_refresh: Option<bool>,
    sort: Option<String>,
    order: Option<String>,
    theme: Option<String>,
}

impl Config {
    /// Load the file and environment layers over the defaults.
    pub fn load() -> Self {
        let env_path = env_file_path();
        if dotenvy::from_path(&env_path).is_ok() {
            tracing::info!(path = %env_path.display(), "loaded environment file");
        }
        let mut config = Self::from_file(&config_file_path());
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Defaults merged with the TOML file at `path`. A missing file yields
    /// pure defaults; an unparsable one is logged and ignored.
    pub fn from_file(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Config::default(), // No config file, use defaults
        };
        match toml::from_str::<FileConfig>(&content) {
            Ok(fc) => Config::default().merged(fc),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to parse config, using defaults");
                Config::default()
            }
        }
    }

    fn merged(mut self, file: FileConfig) -> Self {
        if let Some(v) = file.base_url {
            if !v.is_empty() {
                self.base_url = v;
            }
        }
        if let Some(v) = file.token {
            if !v.is_empty() {
                self.token = Some(v);
            }
        }
        if let Some(v) = file.poll_interval_ms {
            self.poll_interval_ms = v.max(MIN_POLL_INTERVAL_MS);
        }
        if let Some(v) = file.auto_refresh {
            self.auto_refresh = v;
        }
        if let Some(v) = file.sort {
            match v.parse() {
                Ok(sort) => self.sort = sort,
                Err(e) => tracing::warn!(error = %e, "ignoring config sort"),
            }
        }
        if let Some(v) = file.order {
            match v.parse() {
                Ok(order) => self.order = order,
                Err(e) => tracing::warn!(error = %e, "ignoring config order"),
            }
        }
        if let Some(v) = file.theme {
            if !v.is_empty() {
                self.theme = v;
            }
        }
        self
    }

    /// Apply `PROCWATCH_URL` / `PROCWATCH_TOKEN` from `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_URL).filter(|v| !v.is_empty()) {
            self.base_url = url;
        }
        if let Some(token) = lookup(ENV_TOKEN).filter(|v| !v.is_empty()) {
            self.token = Some(token);
        }
    }
}
