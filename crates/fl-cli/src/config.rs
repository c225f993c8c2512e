//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Root of the activity service API.
    pub server_url: String,

    /// Id prefix used to find the window-watcher bucket.
    pub bucket_prefix: String,

    /// Explicit bucket id. When set, events are read straight from this
    /// bucket instead of through a query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: fl_aw::DEFAULT_BASE_URL.to_string(),
            bucket_prefix: fl_aw::DEFAULT_BUCKET_PREFIX.to_string(),
            bucket: None,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (FL_*)
        figment = figment.merge(Env::prefixed("FL_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for focusline.
///
/// On Linux: `~/.config/focusline`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("focusline"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_config_path_ends_with_focusline() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "focusline");
    }

    #[test]
    fn test_default_config_targets_local_service() {
        let config = Config::default();
        assert_eq!(config.server_url, "http://localhost:5600/api/0");
        assert_eq!(config.bucket_prefix, "aw-watcher-window_");
        assert_eq!(config.bucket, None);
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("custom.toml");
        std::fs::write(
            &path,
            "server_url = \"http://desk:5600/api/0\"\nbucket = \"aw-watcher-window_desk\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();

        assert_eq!(config.server_url, "http://desk:5600/api/0");
        assert_eq!(config.bucket.as_deref(), Some("aw-watcher-window_desk"));
        assert_eq!(config.bucket_prefix, "aw-watcher-window_");
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::load_from(Some(&temp.path().join("absent.toml"))).unwrap();
        assert_eq!(config.server_url, Config::default().server_url);
    }
}
