//! Configuration loading and root folder resolution
//!
//! Resolution priority for the root folder:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the Scrawl root folder
pub const ROOT_FOLDER_ENV: &str = "SCRAWL_ROOT_FOLDER";

/// File name of the target store inside the root folder
pub const DATABASE_FILE_NAME: &str = "scrawl.db";

/// TOML configuration file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding the Scrawl database
    pub root_folder: Option<String>,
    /// Explicit path to a Scrawl Classic legacy store, overriding the
    /// platform default location
    pub legacy_store_path: Option<String>,
}

/// Resolve the root folder from CLI argument, environment, TOML config,
/// then the platform default.
pub fn resolve_root_folder(cli_arg: Option<&str>) -> PathBuf {
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Ok(config) = load_toml_config() {
        if let Some(root) = config.root_folder {
            return PathBuf::from(root);
        }
    }

    default_root_folder()
}

/// Load the TOML config file from the platform config directory
pub fn load_toml_config() -> Result<TomlConfig> {
    let path = config_file_path()?;
    if !path.exists() {
        return Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }
    let content = std::fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Write the TOML config file (best-effort atomic: write temp, rename)
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Platform config file path: `<config_dir>/scrawl/config.toml`
pub fn config_file_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("scrawl").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}

/// OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("scrawl"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/scrawl"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("Scrawl"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/Scrawl"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("Scrawl"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\Scrawl"))
    } else {
        PathBuf::from("./scrawl_data")
    }
}

/// Database path inside a root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DATABASE_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_argument_wins() {
        let root = resolve_root_folder(Some("/tmp/scrawl-test"));
        assert_eq!(root, PathBuf::from("/tmp/scrawl-test"));
    }

    #[test]
    fn database_path_joins_file_name() {
        let db = database_path(Path::new("/data/scrawl"));
        assert_eq!(db, PathBuf::from("/data/scrawl/scrawl.db"));
    }

    #[test]
    fn toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = TomlConfig {
            root_folder: Some("/data/scrawl".into()),
            legacy_store_path: None,
        };
        write_toml_config(&config, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: TomlConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed.root_folder.as_deref(), Some("/data/scrawl"));
    }
}
