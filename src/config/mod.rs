//! Configuration management module.
//!
//! This module handles loading and saving the YAML configuration file: the
//! backend base URL, the export directory, the remembered username, the log
//! level and the color theme.

mod error;

pub use error::ConfigError;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

const FILE_NAME: &str = "config.yml";
const DEFAULT_DIRECTORY_PATH: &str = ".config/casedesk";
const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_THEME_NAME: &str = "tokyo-night";

/// Oversees management of configuration file.
///
#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: String,
    pub export_dir: PathBuf,
    pub remembered_username: Option<String>,
    pub log_level: String,
    pub theme_name: String,
    file_path: Option<PathBuf>,
}

/// Define specification for configuration file.
///
#[derive(Serialize, Deserialize)]
struct FileSpec {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
    #[serde(default)]
    pub remembered_username: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_theme_name")]
    pub theme_name: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_theme_name() -> String {
    DEFAULT_THEME_NAME.to_string()
}

/// Exports land in the user's download directory, or the working directory
/// when there is none.
///
fn default_export_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Return a new instance holding default values.
    ///
    pub fn new() -> Config {
        Config {
            base_url: default_base_url(),
            export_dir: default_export_dir(),
            remembered_username: None,
            log_level: default_log_level(),
            theme_name: default_theme_name(),
            file_path: None,
        }
    }

    /// Load the configuration file from the custom directory if provided,
    /// else from `~/.config/casedesk`. A missing file is written with the
    /// defaults.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> Result<(), ConfigError> {
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };

        if !dir_path.exists() {
            fs::create_dir_all(&dir_path).map_err(|e| ConfigError::CreateDirectoryFailed {
                path: dir_path.clone(),
                source: e,
            })?;
        }

        let file_path = dir_path.join(Path::new(FILE_NAME));
        self.file_path = Some(file_path.clone());

        if !file_path.exists() {
            return self.save();
        }

        let contents = fs::read_to_string(&file_path).map_err(|e| ConfigError::LoadFailed {
            path: file_path.clone(),
            message: format!("IO error: {}", e),
        })?;
        let data: FileSpec = serde_yaml::from_str(&contents)
            .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;
        self.base_url = data.base_url;
        self.export_dir = data.export_dir.unwrap_or_else(default_export_dir);
        self.remembered_username = data.remembered_username;
        self.log_level = data.log_level;
        self.theme_name = data.theme_name;
        Ok(())
    }

    /// Returns the configuration as currently stored in the loaded file,
    /// without overrides applied to this instance.
    ///
    pub fn persisted(&self) -> Result<Config, ConfigError> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;
        let dir = file_path.parent().ok_or(ConfigError::FilePathNotSet)?;
        let mut config = Config::new();
        config.load(dir.to_str())?;
        Ok(config)
    }

    /// Serialize the configuration and write it to the loaded file path.
    ///
    pub fn save(&self) -> Result<(), ConfigError> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;
        let data = FileSpec {
            base_url: self.base_url.clone(),
            export_dir: Some(self.export_dir.clone()),
            remembered_username: self.remembered_username.clone(),
            log_level: self.log_level.clone(),
            theme_name: self.theme_name.clone(),
        };
        let content = serde_yaml::to_string(&data)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let mut file = fs::File::create(file_path).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        write!(file, "{}", content)
            .and_then(|_| file.flush())
            .map_err(|e| ConfigError::SaveFailed {
                path: file_path.clone(),
                source: e,
            })?;
        Ok(())
    }

    /// Returns the configured log level.
    ///
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }

    /// Returns the path of the loaded configuration file, if any.
    ///
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Returns the path buffer for the default configuration directory or an
    /// error if the home directory could not be found.
    ///
    fn default_path() -> Result<PathBuf, ConfigError> {
        match dirs::home_dir() {
            Some(home) => Ok(home.join(Path::new(DEFAULT_DIRECTORY_PATH))),
            None => Err(ConfigError::HomeDirectoryNotFound),
        }
    }
}
