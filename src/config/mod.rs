//! Configuration management module.
//!
//! This module handles loading, saving, and managing application configuration,
//! including the API location, refresh timings and theme preference.

mod error;

pub use error::ConfigError;

use crate::error::AppError;
use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

const FILE_NAME: &str = "config.yml";
const DEFAULT_DIRECTORY_PATH: &str = ".config/taskboard";
pub const API_URL_ENV: &str = "TASKBOARD_API_URL";

/// Oversees management of configuration file.
///
#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub silent_reload_delay_ms: u64,
    pub search_debounce_ms: u64,
    pub theme_name: String,
    dir_path: Option<PathBuf>,
    file_path: Option<PathBuf>,
}

/// Define specification for configuration file.
///
#[derive(Serialize, Deserialize)]
struct FileSpec {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_silent_reload_delay_ms")]
    pub silent_reload_delay_ms: u64,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_theme_name")]
    pub theme_name: String,
}

fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_silent_reload_delay_ms() -> u64 {
    300
}

fn default_search_debounce_ms() -> u64 {
    500
}

fn default_theme_name() -> String {
    "tokyo-night".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Return a new instance with default values.
    ///
    pub fn new() -> Config {
        Config {
            api_url: default_api_url(),
            silent_reload_delay_ms: default_silent_reload_delay_ms(),
            search_debounce_ms: default_search_debounce_ms(),
            theme_name: default_theme_name(),
            dir_path: None,
            file_path: None,
        }
    }

    /// Load the configuration from the disk using the custom directory if
    /// provided. A missing file is created with default values. The API URL
    /// can be overridden with `TASKBOARD_API_URL`.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> Result<(), AppError> {
        // Use default path unless custom path provided
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };

        // Try to create dir path if it doesn't exist
        if !dir_path.exists() {
            fs::create_dir_all(&dir_path).map_err(|e| ConfigError::CreateDirectoryFailed {
                path: dir_path.clone(),
                source: e,
            })?;
        }

        self.file_path = Some(dir_path.join(Path::new(FILE_NAME)));
        self.dir_path = Some(dir_path);
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;

        if file_path.exists() {
            let contents = fs::read_to_string(file_path).map_err(|e| ConfigError::LoadFailed {
                path: file_path.clone(),
                message: format!("IO error: {}", e),
            })?;
            self.apply_file(&contents)?;
        } else {
            self.save()?;
        }

        self.apply_env(std::env::var(API_URL_ENV).ok());
        self.validate()?;
        Ok(())
    }

    /// Copy values from file contents, falling back to defaults for absent keys.
    ///
    fn apply_file(&mut self, contents: &str) -> Result<(), ConfigError> {
        if contents.trim().is_empty() {
            return Ok(());
        }
        let data: FileSpec = serde_yaml::from_str(contents)
            .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;
        self.api_url = data.api_url;
        self.silent_reload_delay_ms = data.silent_reload_delay_ms;
        self.search_debounce_ms = data.search_debounce_ms;
        self.theme_name = data.theme_name;
        Ok(())
    }

    fn apply_env(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            log::debug!("Using API URL from {}", API_URL_ENV);
            self.api_url = url.trim().to_string();
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: "api_url",
                message: format!("'{}' must start with http:// or https://", self.api_url),
            });
        }
        Ok(())
    }

    /// Save the current configuration to disk.
    ///
    pub fn save(&self) -> Result<(), AppError> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;
        let data = FileSpec {
            api_url: self.api_url.clone(),
            silent_reload_delay_ms: self.silent_reload_delay_ms,
            search_debounce_ms: self.search_debounce_ms,
            theme_name: self.theme_name.clone(),
        };
        let content = serde_yaml::to_string(&data)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        // Create parent directory if it doesn't exist
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
        write!(file, "{}", content).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        file.flush().map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        Ok(())
    }

    /// Session stored beside the configuration file, or in memory when the
    /// configuration was never loaded from disk.
    ///
    pub fn session(&self) -> Session {
        match &self.dir_path {
            Some(dir) => Session::from_dir(dir),
            None => Session::in_memory(),
        }
    }

    pub fn silent_reload_delay(&self) -> Duration {
        Duration::from_millis(self.silent_reload_delay_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Returns the path buffer for the default configuration directory or an
    /// error if the home directory could not be found.
    ///
    fn default_path() -> Result<PathBuf, AppError> {
        match dirs::home_dir() {
            Some(home) => {
                let home_path = Path::new(&home);
                let default_config_path = Path::new(DEFAULT_DIRECTORY_PATH);
                Ok(home_path.join(default_config_path))
            }
            None => Err(ConfigError::HomeDirectoryNotFound.into()),
        }
    }
}
