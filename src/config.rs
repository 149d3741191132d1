use crate::api::Source;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const CONFIG_FILE_NAME: &str = "config.json";
const LOG_FILE_NAME: &str = "recommender-explorer.log";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine home directory")]
    NoHomeDirectory,

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("No endpoint configured for the {0} recommender")]
    NoEndpoint(Source),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Runtime settings. Every field has a default, so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scheme, host and port of the recommender API.
    pub api_base_url: String,

    /// Per-request timeout. Absent means requests may hang indefinitely.
    pub request_timeout_secs: Option<u64>,

    /// Path of the page shown at startup.
    pub initial_route: String,

    /// Where diagnostics are written. Defaults to the cache directory.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: None,
            initial_route: "/".to_string(),
            log_file: None,
        }
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub initial_route: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn project_dirs() -> Result<ProjectDirs, ConfigError> {
        ProjectDirs::from("com", "recommender", "recommender-explorer")
            .ok_or(ConfigError::NoHomeDirectory)
    }

    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::project_dirs()?.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load from `explicit` if given, otherwise from the default location.
    ///
    /// An explicitly named file must exist; a missing default file, or no
    /// home directory to look in, just means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(explicit, Self::default_path().ok().as_deref())
    }

    fn load_from(explicit: Option<&Path>, default: Option<&Path>) -> Result<Self, ConfigError> {
        match (explicit, default) {
            (Some(path), _) => Self::read(path),
            (None, Some(path)) if path.exists() => Self::read(path),
            (None, _) => Ok(Self::default()),
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(url) = overrides.api_base_url {
            self.api_base_url = url;
        }
        if let Some(secs) = overrides.request_timeout_secs {
            self.request_timeout_secs = Some(secs);
        }
        if let Some(route) = overrides.initial_route {
            self.initial_route = route;
        }
        if let Some(path) = overrides.log_file {
            self.log_file = Some(path);
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Full URL of `source`'s endpoint, or `None` if it has none.
    pub fn endpoint_url(&self, source: Source) -> Option<String> {
        let base = self.api_base_url.trim_end_matches('/');
        source.endpoint().map(|path| format!("{base}{path}"))
    }

    pub fn log_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::project_dirs()?.cache_dir().join(LOG_FILE_NAME)),
        }
    }
}
