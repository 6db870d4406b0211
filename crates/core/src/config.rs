use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

pub const BASE_URL_VAR: &str = "BASE_URL";
pub const API_KEY_VAR: &str = "API_KEY";

#[derive(Error, Debug)]
pub enum LamConfigError {
    #[error("File system error: {0}")]
    IO(#[from] std::io::Error),
    #[error("YAML parsing error: {0}")]
    YAMLError(#[from] serde_yaml::Error),
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("Environment variable {0} not found")]
    MissingEnv(String),
}

/// Everything the relay needs to reach the backend.
///
/// Built once at startup and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    pub base_url: String,
    pub api_key: String,
    pub user_id: String,
    pub platform: String,
    pub send_chat_history: bool,
    pub quick_replies: Vec<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            user_id: default_user_id(),
            platform: default_platform(),
            send_chat_history: false,
            quick_replies: default_quick_replies(),
        }
    }
}

impl RelayConfig {
    /// Config pointing at `base_url` with the given key and defaults for the rest.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }
}

fn default_user_id() -> String {
    "lam-preview-user".to_string()
}

fn default_platform() -> String {
    "terminal".to_string()
}

fn default_quick_replies() -> Vec<String> {
    vec!["process tasks".to_string(), "Play some music".to_string()]
}

#[derive(Deserialize, Debug, Default)]
struct RawConfig {
    base_url: Option<String>,
    api_key: Option<String>,
    user_id: Option<String>,
    platform: Option<String>,
    #[serde(default)]
    send_chat_history: bool,
    quick_replies: Option<Vec<String>>,
}

impl RawConfig {
    /// Resolves the file values against the environment.
    ///
    /// `BASE_URL` and `API_KEY` override the file. Anything still unset is
    /// left empty; a bad endpoint only shows up when a request is made.
    fn to_config(
        self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<RelayConfig, LamConfigError> {
        // An empty variable counts as unset.
        let env = |name: &str| env(name).filter(|value| !value.is_empty());

        let api_key = match env(API_KEY_VAR) {
            Some(key) => Some(key),
            None => self
                .api_key
                .map(|key| resolve_env_reference(key, &env))
                .transpose()?,
        };

        Ok(RelayConfig {
            base_url: env(BASE_URL_VAR).or(self.base_url).unwrap_or_default(),
            api_key: api_key.unwrap_or_default(),
            user_id: self.user_id.unwrap_or_else(default_user_id),
            platform: self.platform.unwrap_or_else(default_platform),
            send_chat_history: self.send_chat_history,
            quick_replies: self.quick_replies.unwrap_or_else(default_quick_replies),
        })
    }
}

/// Reads `env:NAME` values from the environment; other values are returned as is.
fn resolve_env_reference(
    value: String,
    env: impl Fn(&str) -> Option<String>,
) -> Result<String, LamConfigError> {
    match value.strip_prefix("env:") {
        Some(name) => {
            let name = name.trim();
            env(name).ok_or_else(|| LamConfigError::MissingEnv(name.to_string()))
        }
        None => Ok(value),
    }
}

/// `<base>/lam`, where `base` is the XDG override if set, else the platform directory.
fn app_dir(xdg_override: Option<OsString>, platform_dir: Option<PathBuf>) -> PathBuf {
    xdg_override
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or(platform_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lam")
}

/// Default location of `lam.yml`, honouring `XDG_CONFIG_HOME`.
pub fn config_file_path() -> PathBuf {
    app_dir(std::env::var_os("XDG_CONFIG_HOME"), dirs::config_dir()).join("lam.yml")
}

/// Location of `lam.log`, honouring `XDG_DATA_HOME`. The directory is created.
pub fn log_file_path() -> Result<PathBuf, LamConfigError> {
    let dir = app_dir(std::env::var_os("XDG_DATA_HOME"), dirs::data_local_dir());
    fs::create_dir_all(&dir)?;
    Ok(dir.join("lam.log"))
}

/// Loads `.env` from the working directory into the process environment, if present.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!("Loaded environment from {}", path.display());
            Some(path)
        }
        Err(_) => None,
    }
}

fn read_raw_config(config_path: Option<PathBuf>) -> Result<RawConfig, LamConfigError> {
    let path = match config_path {
        Some(path) if !path.exists() => return Err(LamConfigError::NotFound(path)),
        Some(path) => path,
        None => {
            let default_path = config_file_path();
            if !default_path.exists() {
                debug!("No config file at {}, using defaults", default_path.display());
                return Ok(RawConfig::default());
            }
            default_path
        }
    };
    parse_config_file(&path)
}

fn parse_config_file(path: &Path) -> Result<RawConfig, LamConfigError> {
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(RawConfig::default());
    }
    Ok(serde_yaml::from_str(&content)?)
}

/// Builds the relay configuration from an optional YAML file and the environment.
///
/// With `config_path` unset, [`config_file_path`] is read when it exists.
/// An explicit path must exist.
#[instrument(skip(config_path))]
pub fn get_config(config_path: Option<PathBuf>) -> Result<RelayConfig, LamConfigError> {
    let raw = read_raw_config(config_path)?;
    raw.to_config(|name| std::env::var(name).ok())
}
