//! `gymplan.toml`: layout metrics, theme colors and where the plan is stored.
//!
//! Every section and field is optional; anything missing keeps its default.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use gymplan_core::Theme;
use gymplan_model::FileStore;
use gymplan_ui::Metrics;

pub const CONFIG_FILE: &str = "gymplan.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GymplanConfig {
    pub metrics: Metrics,
    pub theme: Theme,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding `<key>.json`; defaults to `~/.gymplan`.
    pub dir: Option<PathBuf>,
}

impl GymplanConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// An explicit path must load; the implicit `gymplan.toml` in the current
    /// directory is used only if present.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None if Path::new(CONFIG_FILE).exists() => Self::load_from_file(CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    pub fn file_store(&self) -> anyhow::Result<FileStore> {
        match &self.storage.dir {
            Some(dir) => Ok(FileStore::new(dir)),
            None => Ok(FileStore::in_home()?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gymplan_core::Color;

    #[test]
    fn partial_sections_keep_defaults() {
        let cfg: GymplanConfig = toml::from_str(
            r##"
[metrics]
card_h = 100.0

[theme]
accent = "#ff0000"

[storage]
dir = "/tmp/plans"
"##,
        )
        .unwrap();

        assert_eq!(cfg.metrics.card_h, 100.0);
        assert_eq!(cfg.metrics.card_gap, Metrics::default().card_gap);
        assert_eq!(cfg.theme.accent, Color::from_rgb(255, 0, 0));
        assert_eq!(cfg.theme.card, Theme::default().card);
        assert_eq!(cfg.file_store().unwrap().dir(), Path::new("/tmp/plans"));
    }

    #[test]
    fn bad_color_is_an_error() {
        let err = toml::from_str::<GymplanConfig>("[theme]\naccent = \"blue\"\n").unwrap_err();
        assert!(err.to_string().contains("invalid color"));
    }

    #[test]
    fn explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(GymplanConfig::load(Some(&missing)).is_err());
    }
}
