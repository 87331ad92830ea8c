//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use slumber_core::EditorConfig;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Timeline editor settings.
    pub editor: EditorConfig,
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // SLUMBER_EDITOR__GRID_MINUTES=30 sets editor.grid_minutes
        figment = figment.merge(Env::prefixed("SLUMBER_").split("__"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for slumber.
///
/// On Linux: `~/.config/slumber`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("slumber"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use slumber_core::{GridSize, StageLabel};

    #[test]
    fn test_dirs_config_path_ends_with_slumber() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "slumber");
    }

    #[test]
    fn test_default_editor_settings() {
        let config = Config::default();
        assert_eq!(config.editor.grid_minutes, GridSize::QUARTER_HOUR);
        assert_eq!(config.editor.default_label, StageLabel::Light);
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("slumber.toml");
        std::fs::write(&path, "[editor]\ngrid_minutes = 30\ndefault_label = \"deep\"\n").unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.editor.grid_minutes.minutes(), 30);
        assert_eq!(config.editor.default_label, StageLabel::Deep);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("slumber.toml");
        std::fs::write(&path, "[editor]\ngrid_minutes = 5\n").unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.editor.grid_minutes.minutes(), 5);
        assert_eq!(config.editor.default_label, StageLabel::Light);
    }

    #[test]
    fn test_invalid_grid_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("slumber.toml");
        std::fs::write(&path, "[editor]\ngrid_minutes = 7\n").unwrap();

        assert!(Config::load_from(Some(&path)).is_err());
    }
}
