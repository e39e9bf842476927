use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "typetally";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// `$HOME/.local/state/typetally`, else the platform data dir.
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join(APP_NAME),
            )
        } else {
            ProjectDirs::from("", "", APP_NAME).map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    pub fn leaderboard_path() -> PathBuf {
        Self::state_dir()
            .map(|dir| dir.join("leaderboard.json"))
            .unwrap_or_else(|| PathBuf::from("leaderboard.json"))
    }

    pub fn log_path() -> PathBuf {
        Self::state_dir()
            .map(|dir| dir.join("typetally.log"))
            .unwrap_or_else(|| PathBuf::from("typetally.log"))
    }

    /// Log file beside `leaderboard`, falling back to the state dir.
    pub fn log_path_for(leaderboard: &Path) -> PathBuf {
        match leaderboard.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join("typetally.log"),
            _ => Self::log_path(),
        }
    }

    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", APP_NAME)
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("typetally_config.json"))
    }
}
