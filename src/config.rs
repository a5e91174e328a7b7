//! Application settings: defaults, an optional TOML file, then environment variables.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::export::DEFAULT_PREFIX;

/// File picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "medq.toml";

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gemini API key.
    pub api_key: String,
    pub api_base_url: String,
    pub model: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Filename prefix of exported files.
    pub export_prefix: String,
    /// `tracing` filter directive, e.g. `info` or `medq=debug`.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-3-pro-preview".to_string(),
            timeout_secs: 120,
            export_prefix: DEFAULT_PREFIX.to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("api_base_url", &self.api_base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("export_prefix", &self.export_prefix)
            .field("log_filter", &self.log_filter)
            .finish()
    }
}

impl Config {
    /// Parse a TOML settings file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Resolve settings: explicit file, else `medq.toml` if present, else defaults;
    /// environment variables override whatever the file said.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        Ok(base.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply overrides from a variable lookup (the process environment in production).
    pub fn with_env_overrides<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let timeout_secs = match get("MEDQ_TIMEOUT_SECS") {
            Some(v) => v.trim().parse().unwrap_or_else(|_| {
                debug!(value = %v, "ignoring unparsable MEDQ_TIMEOUT_SECS");
                self.timeout_secs
            }),
            None => self.timeout_secs,
        };
        Self {
            api_key: get("GEMINI_API_KEY")
                .or_else(|| get("API_KEY"))
                .unwrap_or(self.api_key),
            api_base_url: get("MEDQ_API_BASE_URL").unwrap_or(self.api_base_url),
            model: get("MEDQ_MODEL").unwrap_or(self.model),
            timeout_secs,
            export_prefix: get("MEDQ_EXPORT_PREFIX").unwrap_or(self.export_prefix),
            log_filter: get("MEDQ_LOG").unwrap_or(self.log_filter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: Config = toml::from_str("model = \"gemini-2.5-flash\"\ntimeout_secs = 30\n").unwrap();
        assert_eq!(cfg.model, "gemini-2.5-flash");
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.export_prefix, "MedQ_Export");
    }

    #[test]
    fn env_overrides_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("GEMINI_API_KEY", "secret"),
            ("MEDQ_MODEL", "gemini-x"),
            ("MEDQ_TIMEOUT_SECS", "15"),
            ("MEDQ_EXPORT_PREFIX", ""),
        ]);
        let cfg = Config::default().with_env_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.api_key, "secret");
        assert_eq!(cfg.model, "gemini-x");
        assert_eq!(cfg.timeout_secs, 15);
        assert_eq!(cfg.export_prefix, "MedQ_Export");
    }

    #[test]
    fn bad_timeout_keeps_previous_value() {
        let cfg = Config::default().with_env_overrides(|k| {
            (k == "MEDQ_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert_eq!(cfg.timeout_secs, 120);
    }

    #[test]
    fn debug_redacts_api_key() {
        let cfg = Config {
            api_key: "secret".to_string(),
            ..Config::default()
        };
        assert!(!format!("{cfg:?}").contains("secret"));
    }
}
