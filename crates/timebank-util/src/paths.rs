//! Default paths for timebank components
//!
//! The configuration file lives in the user's config directory:
//! `$XDG_CONFIG_HOME/timebank/config.toml` or `~/.config/timebank/config.toml`.
//! Without a home directory the system-wide `/etc/timebank/config.toml` is used.

use std::path::PathBuf;

/// Environment variable for overriding the config file path
pub const TIMEBANK_CONFIG_ENV: &str = "TIMEBANK_CONFIG";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Application subdirectory name
const APP_DIR: &str = "timebank";

/// Get the default config file path.
///
/// Order of precedence:
/// 1. `$TIMEBANK_CONFIG` environment variable (if set)
/// 2. `$XDG_CONFIG_HOME/timebank/config.toml` (if XDG_CONFIG_HOME is set)
/// 3. `~/.config/timebank/config.toml` (if HOME is set)
/// 4. `/etc/timebank/config.toml` (system-wide fallback)
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(TIMEBANK_CONFIG_ENV) {
        return PathBuf::from(path);
    }

    config_path_without_env()
}

/// Get the config path without checking TIMEBANK_CONFIG env var.
pub fn config_path_without_env() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    // No home directory: fall back to the system-wide location
    PathBuf::from("/etc").join(APP_DIR).join(CONFIG_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_contains_timebank() {
        let path = config_path_without_env();
        assert!(path.to_string_lossy().contains("timebank"));
        assert!(path.ends_with(CONFIG_FILENAME));
    }
}
