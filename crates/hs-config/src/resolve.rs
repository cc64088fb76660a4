//! Spec table path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG path → built-in table.

use std::path::{Path, PathBuf};

/// Discovered spec table path.
#[derive(Debug, Clone, Default)]
pub struct SpecTablePath {
    /// Path to spec_table.json (None means the built-in table).
    pub path: Option<PathBuf>,

    /// Where the path came from (for diagnostics).
    pub source: ConfigSource,
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Using the table compiled into the binary.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
pub const ENV_SPEC_TABLE_PATH: &str = "HALL_SCOUT_SPEC_TABLE";
pub const ENV_CONFIG_DIR: &str = "HALL_SCOUT_CONFIG_DIR";

/// Standard spec table file name.
pub const SPEC_TABLE_FILENAME: &str = "spec_table.json";

/// Application name for XDG directories.
const APP_NAME: &str = "hall-scout";

/// Resolve the spec table path.
///
/// 1. Explicit CLI path. Returned even when missing so the loader reports it.
/// 2. `HALL_SCOUT_SPEC_TABLE` (direct path)
/// 3. `HALL_SCOUT_CONFIG_DIR` + `spec_table.json`
/// 4. XDG config directory (`~/.config/hall-scout/`)
/// 5. Built-in table (`None`)
pub fn resolve_spec_table(cli_path: Option<&Path>) -> SpecTablePath {
    if let Some(path) = cli_path {
        return SpecTablePath {
            path: Some(path.to_path_buf()),
            source: ConfigSource::CliArgument,
        };
    }

    if let Ok(env_path) = std::env::var(ENV_SPEC_TABLE_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return SpecTablePath {
                path: Some(path),
                source: ConfigSource::Environment,
            };
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(SPEC_TABLE_FILENAME);
        if path.exists() {
            return SpecTablePath {
                path: Some(path),
                source: ConfigSource::Environment,
            };
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(SPEC_TABLE_FILENAME);
        if path.exists() {
            return SpecTablePath {
                path: Some(path),
                source: ConfigSource::XdgConfig,
            };
        }
    }

    SpecTablePath::default()
}

/// Get the XDG config directory for hall-scout.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_source_display() {
        assert_eq!(format!("{}", ConfigSource::CliArgument), "CLI argument");
        assert_eq!(
            format!("{}", ConfigSource::Environment),
            "environment variable"
        );
        assert_eq!(format!("{}", ConfigSource::XdgConfig), "XDG config");
        assert_eq!(
            format!("{}", ConfigSource::BuiltinDefault),
            "builtin default"
        );
    }

    #[test]
    fn cli_path_wins_even_if_missing() {
        let resolved = resolve_spec_table(Some(Path::new("/nonexistent/spec_table.json")));
        assert_eq!(resolved.source, ConfigSource::CliArgument);
        assert!(resolved.path.is_some());
    }

    #[test]
    fn test_xdg_config_dir() {
        if let Some(path) = xdg_config_dir() {
            assert!(path.ends_with(APP_NAME));
        }
    }
}
