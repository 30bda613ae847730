//! Server settings merged from command line, environment, and config file

use std::path::PathBuf;

use tabshelf_common::config::{database_path, RootFolderResolver, TomlConfig};

/// Default listen port
pub const DEFAULT_PORT: u16 = 5780;

/// Default listen address
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Values supplied on the command line (or their clap-managed env vars)
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub root_folder: Option<PathBuf>,
    pub no_seed: bool,
}

/// Effective settings for one server run
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub root_folder: PathBuf,
    pub seed_examples: bool,
}

impl ServerSettings {
    /// Merge command-line values over the config file, then defaults
    pub fn resolve(cli: CliOverrides, toml_config: &TomlConfig) -> Self {
        let root_folder = RootFolderResolver::new(cli.root_folder, toml_config).resolve();

        Self {
            host: cli
                .host
                .or_else(|| toml_config.host.clone())
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: cli.port.or(toml_config.port).unwrap_or(DEFAULT_PORT),
            root_folder,
            seed_examples: !cli.no_seed && toml_config.seed_examples.unwrap_or(true),
        }
    }

    /// Path of the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        database_path(&self.root_folder)
    }

    /// `host:port` string for binding the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
