//! Configuration management with layered hierarchy
//!
//! Later layers win:
//! 1. Built-in defaults
//! 2. User config (`~/.config/jqt/config.yaml`)
//! 3. Project config (`.jqt/config.yaml`)
//! 4. Environment (`JQT_AUTHOR`, `JQT_CURRENCY`)

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::project::Project;

/// Partial config as read from one layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigLayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_validity_days: Option<u32>,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    author: Option<String>,
    pub currency: String,
    pub default_format: Option<String>,
    pub default_validity_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            author: None,
            currency: "R$".to_string(),
            default_format: None,
            default_validity_days: 15,
        }
    }
}

impl Config {
    /// Load config from every layer, starting at the current project
    pub fn load() -> Self {
        let project_root = Project::discover().ok().map(|p| p.root().to_path_buf());
        Self::load_from(Self::user_config_path().as_deref(), project_root.as_deref())
    }

    /// Load with explicit user config path and project root
    pub fn load_from(user_config: Option<&Path>, project_root: Option<&Path>) -> Self {
        let mut config = Self::default();

        if let Some(layer) = user_config.and_then(read_layer) {
            config.merge(layer);
        }
        if let Some(layer) = project_root
            .map(Project::config_path_for)
            .as_deref()
            .and_then(read_layer)
        {
            config.merge(layer);
        }
        config.merge(env_layer());
        config
    }

    /// `~/.config/jqt/config.yaml` on Linux, the platform equivalent elsewhere
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "jqt").map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn merge(&mut self, layer: ConfigLayer) {
        if let Some(author) = layer.author {
            self.author = Some(author);
        }
        if let Some(currency) = layer.currency {
            self.currency = currency;
        }
        if let Some(format) = layer.default_format {
            self.default_format = Some(format);
        }
        if let Some(days) = layer.default_validity_days {
            self.default_validity_days = days;
        }
    }

    /// Author recorded on saved proposals; falls back to `$USER`
    pub fn author(&self) -> String {
        self.author
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("USERNAME").ok())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Format a money amount with the configured symbol
    pub fn money(&self, amount: f64) -> String {
        format!("{} {:.2}", self.currency, amount)
    }
}

fn read_layer(path: &Path) -> Option<ConfigLayer> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_yml::from_str(&content) {
        Ok(layer) => Some(layer),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "ignoring unreadable config");
            None
        }
    }
}

fn env_layer() -> ConfigLayer {
    ConfigLayer {
        author: std::env::var("JQT_AUTHOR").ok().filter(|s| !s.is_empty()),
        currency: std::env::var("JQT_CURRENCY").ok().filter(|s| !s.is_empty()),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.currency, "R$");
        assert_eq!(config.default_validity_days, 15);
        assert_eq!(config.money(12.5), "R$ 12.50");
    }

    #[test]
    fn test_project_layer_overrides_user_layer() {
        let tmp = TempDir::new().unwrap();
        let user = tmp.path().join("user.yaml");
        std::fs::write(&user, "currency: USD\ndefault_validity_days: 30\n").unwrap();

        let root = tmp.path().join("proj");
        std::fs::create_dir_all(root.join(".jqt")).unwrap();
        std::fs::write(root.join(".jqt/config.yaml"), "default_validity_days: 7\n").unwrap();

        let config = Config::load_from(Some(&user), Some(&root));
        assert_eq!(config.default_validity_days, 7);
        if std::env::var("JQT_CURRENCY").is_err() {
            assert_eq!(config.currency, "USD");
        }
    }

    #[test]
    fn test_broken_layer_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let user = tmp.path().join("user.yaml");
        std::fs::write(&user, "currency: [unclosed\n").unwrap();
        let config = Config::load_from(Some(&user), None);
        assert_eq!(config.default_validity_days, 15);
    }
}
