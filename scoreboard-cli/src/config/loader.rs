use super::types::{
    DEFAULT_TIMEOUT_SECS, DataConfig, MilestoneConfig, RawDataConfig, RawMilestoneConfig,
    RawRemoteConfig, RawScoreboardConfig, RemoteConfig, ScoreboardConfig,
};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<ScoreboardConfig> {
        let mut layers = Vec::new();
        if let Some(user_path) = Self::user_config_path() {
            layers.push(user_path);
        }
        layers.push(Self::project_config_path());
        Self::load_layers(&layers)
    }

    /// Merge the given config files in order; later files win. Missing files are skipped.
    pub fn load_layers(paths: &[PathBuf]) -> Result<ScoreboardConfig> {
        let mut raw = RawScoreboardConfig::default();
        for path in paths {
            if let Some(layer) = Self::read_raw(path)? {
                raw = Self::merge_raw(raw, layer);
            }
        }
        Ok(Self::finalize(raw))
    }

    /// Get user config path (platform-specific)
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "scoreboard").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get project config path
    /// Can be overridden with SCOREBOARD_PROJECT_CONFIG_DIR (useful for isolated e2e tests)
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("SCOREBOARD_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".scoreboard/config.toml")
        }
    }

    fn read_raw(path: &Path) -> Result<Option<RawScoreboardConfig>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let raw = toml::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(Some(raw))
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawScoreboardConfig, overlay: RawScoreboardConfig) -> RawScoreboardConfig {
        RawScoreboardConfig {
            data: RawDataConfig {
                dataset: overlay.data.dataset.or(base.data.dataset),
                state_dir: overlay.data.state_dir.or(base.data.state_dir),
            },
            remote: RawRemoteConfig {
                endpoint: overlay.remote.endpoint.or(base.remote.endpoint),
                timeout_secs: overlay.remote.timeout_secs.or(base.remote.timeout_secs),
            },
            milestone: RawMilestoneConfig {
                interval: overlay.milestone.interval.or(base.milestone.interval),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawScoreboardConfig) -> ScoreboardConfig {
        let defaults = ScoreboardConfig::default();
        ScoreboardConfig {
            data: DataConfig {
                dataset: raw.data.dataset.unwrap_or(defaults.data.dataset),
                state_dir: raw.data.state_dir,
            },
            remote: RemoteConfig {
                endpoint: raw.remote.endpoint.filter(|e| !e.trim().is_empty()),
                timeout_secs: raw.remote.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            },
            milestone: MilestoneConfig {
                interval: raw.milestone.interval.unwrap_or(defaults.milestone.interval),
            },
        }
    }
}
