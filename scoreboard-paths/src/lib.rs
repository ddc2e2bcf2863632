//! XDG Base Directory paths for scoreboard.
//!
//! The CLI keeps its state file and user config under XDG paths on every
//! platform, the same way tools like gh and kubectl do.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "scoreboard";

/// Get the scoreboard config directory.
///
/// Returns `$XDG_CONFIG_HOME/scoreboard` if set, otherwise `~/.config/scoreboard`.
///
/// # Examples
///
/// ```
/// use scoreboard_paths::config_dir;
///
/// let config = config_dir();
/// let file = config.join("config.toml");
/// ```
pub fn config_dir() -> PathBuf {
    resolve(
        std::env::var("XDG_CONFIG_HOME").ok().as_deref(),
        dirs::home_dir().as_deref(),
        ".config",
    )
}

/// Get the scoreboard data directory.
///
/// Returns `$XDG_DATA_HOME/scoreboard` if set, otherwise `~/.local/share/scoreboard`.
/// The persisted milestone snapshot and the remembered profile code live here.
///
/// # Examples
///
/// ```
/// use scoreboard_paths::data_dir;
///
/// let data = data_dir();
/// let state = data.join("state.json");
/// ```
pub fn data_dir() -> PathBuf {
    resolve(
        std::env::var("XDG_DATA_HOME").ok().as_deref(),
        dirs::home_dir().as_deref(),
        ".local/share",
    )
}

fn resolve(xdg: Option<&str>, home: Option<&Path>, home_relative: &str) -> PathBuf {
    match (xdg, home) {
        (Some(xdg), _) if !xdg.is_empty() => PathBuf::from(xdg).join(APP_DIR),
        (_, Some(home)) => home.join(home_relative).join(APP_DIR),
        _ => PathBuf::from(home_relative).join(APP_DIR),
    }
}
