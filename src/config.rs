//! Connection settings loaded once at startup and handed to the repository.
//!
//! The file uses a single `[database]` section with four keys. When it does
//! not exist yet we write the fallback values to disk so the user has a
//! template to edit, and carry on with those same values.

use std::fs;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use directories::BaseDirs;
use serde::Deserialize;
use thiserror::Error;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".library-book-manager";
/// Config file name stored inside the application data directory.
const CONFIG_FILE_NAME: &str = "config.ini";
/// Prefix for environment overrides, e.g. `LIBRARY_DATABASE__HOST`.
const ENV_PREFIX: &str = "LIBRARY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not locate home directory")]
    NoHome,

    #[error("failed to write default config `{path}`: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read config `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: config::ConfigError,
    },
}

/// Connection parameters for the book store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            user: "root".to_string(),
            password: "password".to_string(),
            database: "librarydb".to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Render the config in the on-disk INI layout.
    pub fn to_ini(&self) -> String {
        format!(
            "[database]\nhost = {}\nuser = {}\npassword = {}\ndatabase = {}\n",
            self.host, self.user, self.password, self.database
        )
    }

    /// `user@host/database`, safe to log.
    pub fn describe(&self) -> String {
        format!("{}@{}/{}", self.user, self.host, self.database)
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    database: DatabaseConfig,
}

/// Default location of the config file inside the user's home.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::NoHome)?;
    Ok(base_dirs
        .home_dir()
        .join(DATA_DIR_NAME)
        .join(CONFIG_FILE_NAME))
}

/// Directory holding the database file and logs: the folder of the config file.
pub fn data_dir_for(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Read the config at `path`, creating it with fallback values first when it
/// is missing. Environment variables prefixed with `LIBRARY_` override file
/// values.
pub fn load_or_create(path: &Path) -> Result<DatabaseConfig, ConfigError> {
    if !path.exists() {
        write_default(path)?;
    }

    let settings = Config::builder()
        .add_source(File::from(path).format(FileFormat::Ini))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .and_then(|settings| settings.try_deserialize::<ConfigFile>())
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(settings.database)
}

fn write_default(path: &Path) -> Result<(), ConfigError> {
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
    }
    fs::write(path, DatabaseConfig::default().to_ini()).map_err(write_err)
}
