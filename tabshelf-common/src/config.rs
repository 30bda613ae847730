//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "TABSHELF_ROOT_FOLDER";

/// SQLite file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "tabshelf.db";

/// Optional settings read from `config.toml`
///
/// Every key is optional; command-line arguments take precedence.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub seed_examples: Option<bool>,
}

impl TomlConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read and parse a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load the platform config file if one exists
    ///
    /// A missing file yields defaults. An unreadable or malformed file is
    /// logged and also yields defaults; it never stops startup.
    pub fn load_or_default() -> Self {
        let Some(path) = config_file_path() else {
            debug!("No config file found, using defaults");
            return Self::default();
        };

        match Self::load(&path) {
            Ok(config) => {
                debug!("Loaded config file: {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Root folder resolution, highest priority first:
/// 1. Command-line argument
/// 2. Environment variable (`TABSHELF_ROOT_FOLDER`)
/// 3. TOML config file `root_folder` key
/// 4. OS-dependent default
#[derive(Debug, Clone, Default)]
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(cli_arg: Option<PathBuf>, toml_config: &TomlConfig) -> Self {
        Self {
            cli_arg,
            toml_root: toml_config.root_folder.clone(),
        }
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_root {
            return path.clone();
        }

        default_root_folder()
    }
}

/// Path of the database file inside a root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DATABASE_FILE_NAME)
}

/// Platform config file location, if the file exists
fn config_file_path() -> Option<PathBuf> {
    // ~/.config/tabshelf/config.toml first, then /etc/tabshelf/config.toml on Linux
    let user_config = dirs::config_dir().map(|d| d.join("tabshelf").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/tabshelf/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/tabshelf (or /var/lib/tabshelf for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("tabshelf"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/tabshelf"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/tabshelf
        dirs::data_dir()
            .map(|d| d.join("tabshelf"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/tabshelf"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\tabshelf
        dirs::data_local_dir()
            .map(|d| d.join("tabshelf"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\tabshelf"))
    } else {
        PathBuf::from("./tabshelf_data")
    }
}
