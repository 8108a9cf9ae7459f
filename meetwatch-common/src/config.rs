//! Configuration resolution
//!
//! Database path resolution priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (applied by the CLI layer)
//! 3. TOML config file (`meetwatch/config.toml` under the platform config dir)
//! 4. Platform data directory default (fallback)

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{Error, Result};

/// Resolve the SQLite database path
pub fn resolve_database_path(cli_arg: Option<PathBuf>) -> Result<PathBuf> {
    // Priority 1/2: command-line argument or environment variable
    // (the env var is mapped onto the argument by clap)
    if let Some(path) = cli_arg {
        return Ok(path);
    }

    // Priority 3: TOML config file
    if let Some(config_path) = find_config_file() {
        if let Ok(content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&content) {
                if let Some(database) = config.get("database").and_then(|v| v.as_str()) {
                    debug!("Database path from {}", config_path.display());
                    return Ok(PathBuf::from(database));
                }
            }
        }
    }

    // Priority 4: platform default
    default_database_path()
}

/// Default database location under the platform data directory
pub fn default_database_path() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|d| d.join("meetwatch").join("meetings.db"))
        .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))
}

/// Create the parent directory of a database file if it does not exist yet
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn find_config_file() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("meetwatch").join("config.toml"))
        .filter(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_arg_wins() {
        let path = resolve_database_path(Some(PathBuf::from("/tmp/custom.db"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/custom.db"));
    }

    #[test]
    fn test_ensure_parent_dir_relative_file() {
        // A bare filename has an empty parent and must not error
        ensure_parent_dir(Path::new("meetings.db")).unwrap();
    }
}
