use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawScoreboardConfig {
    #[serde(default)]
    pub data: RawDataConfig,

    #[serde(default)]
    pub remote: RawRemoteConfig,

    #[serde(default)]
    pub milestone: RawMilestoneConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawDataConfig {
    /// Bundled dataset file
    pub dataset: Option<PathBuf>,

    /// Directory for the persisted state file
    pub state_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawRemoteConfig {
    /// Remote transaction store URL
    pub endpoint: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawMilestoneConfig {
    /// Points per milestone band
    pub interval: Option<f64>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScoreboardConfig {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub milestone: MilestoneConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub dataset: PathBuf,

    /// Unset means the XDG data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from(DEFAULT_DATASET),
            state_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Unset means the scoreboard runs on the bundled ledger only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneConfig {
    pub interval: f64,
}

impl Default for MilestoneConfig {
    fn default() -> Self {
        Self {
            interval: scoreboard_core::MILESTONE_INTERVAL,
        }
    }
}

/// Dataset path used when none is configured
pub const DEFAULT_DATASET: &str = "data/classroom.json";

/// Default remote request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = ScoreboardConfig::default();
        assert_eq!(config.data.dataset, PathBuf::from(DEFAULT_DATASET));
        assert!(config.data.state_dir.is_none());
        assert!(config.remote.endpoint.is_none());
        assert_eq!(config.remote.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.milestone.interval, 25.0);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ScoreboardConfig {
            data: DataConfig {
                dataset: PathBuf::from("/srv/class.json"),
                state_dir: Some(PathBuf::from("/tmp/state")),
            },
            remote: RemoteConfig {
                endpoint: Some("https://script.example.com/exec".to_string()),
                timeout_secs: 5,
            },
            milestone: MilestoneConfig { interval: 50.0 },
        };

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: ScoreboardConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.data.dataset, PathBuf::from("/srv/class.json"));
        assert_eq!(parsed.data.state_dir, Some(PathBuf::from("/tmp/state")));
        assert_eq!(
            parsed.remote.endpoint.as_deref(),
            Some("https://script.example.com/exec")
        );
        assert_eq!(parsed.remote.timeout_secs, 5);
        assert_eq!(parsed.milestone.interval, 50.0);
    }

    #[test]
    fn test_raw_config_partial_parsing() {
        let toml_str = r#"
[remote]
endpoint = "https://script.example.com/exec"
"#;
        let raw: RawScoreboardConfig = toml::from_str(toml_str).unwrap();

        assert!(raw.remote.endpoint.is_some());
        assert!(raw.remote.timeout_secs.is_none());
        assert!(raw.data.dataset.is_none());
        assert!(raw.milestone.interval.is_none());
    }

    #[test]
    fn test_raw_config_empty_uses_none() {
        let raw: RawScoreboardConfig = toml::from_str("").unwrap();
        assert!(raw.remote.endpoint.is_none());
        assert!(raw.data.dataset.is_none());
    }
}
