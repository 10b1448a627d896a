use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use url::Url;

pub const APP_NAME: &str = "qube";
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const ENV_SERVER_URL: &str = "QUBE_SERVER_URL";
pub const ENV_PINATA_JWT: &str = "QUBE_PINATA_JWT";
pub const ENV_CONTRACT_URL: &str = "QUBE_CONTRACT_URL";
pub const ENV_SENTRY_DSN: &str = "QUBE_SENTRY_DSN";
pub const ENV_APP_ENV: &str = "QUBE_APP_ENV";
pub const ENV_LOGGING_LEVEL: &str = "QUBE_LOGGING_LEVEL";
pub const ENV_LOG_DIR: &str = "QUBE_LOG_DIR";

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the encryption service
    #[serde(default = "default_server_url")]
    pub server_url: Url,
    /// Pinata API base URL
    #[serde(default = "default_pinata_url")]
    pub pinata_url: Url,
    /// Pinata JWT used as a bearer token
    #[serde(default)]
    pub pinata_jwt: Option<String>,
    /// Gateway used to print links to pinned content
    #[serde(default = "default_gateway_url")]
    pub gateway_url: Url,
    /// Mint relay in front of the Qube contract
    #[serde(default = "default_contract_url")]
    pub contract_url: Url,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "default_log_level")]
    pub log_level: tracing::Level,
    /// Directory for daily log files (logs to stderr only if not set)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default)]
    pub error_tracking: ErrorTrackingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorTrackingConfig {
    /// Reports are only sent when a DSN is set
    #[serde(default)]
    pub dsn: Option<String>,
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_server_url() -> Url {
    Url::parse("http://localhost:3001").expect("hardcoded URL must parse")
}

fn default_pinata_url() -> Url {
    Url::parse("https://api.pinata.cloud").expect("hardcoded URL must parse")
}

fn default_gateway_url() -> Url {
    Url::parse("https://gateway.pinata.cloud").expect("hardcoded URL must parse")
}

fn default_contract_url() -> Url {
    Url::parse("http://localhost:3002").expect("hardcoded URL must parse")
}

fn default_log_level() -> tracing::Level {
    tracing::Level::INFO
}

fn default_environment() -> String {
    "development".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            pinata_url: default_pinata_url(),
            pinata_jwt: None,
            gateway_url: default_gateway_url(),
            contract_url: default_contract_url(),
            log_level: default_log_level(),
            log_dir: None,
            error_tracking: ErrorTrackingConfig::default(),
        }
    }
}

impl Default for ErrorTrackingConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: default_environment(),
        }
    }
}

impl AppConfig {
    /// Apply `QUBE_*` overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self, StateError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Empty values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, StateError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = lookup(ENV_SERVER_URL) {
            self.server_url = parse_url(ENV_SERVER_URL, &value)?;
        }
        if let Some(value) = lookup(ENV_CONTRACT_URL) {
            self.contract_url = parse_url(ENV_CONTRACT_URL, &value)?;
        }
        if let Some(value) = lookup(ENV_PINATA_JWT) {
            self.pinata_jwt = Some(value);
        }
        if let Some(value) = lookup(ENV_SENTRY_DSN) {
            self.error_tracking.dsn = Some(value);
        }
        if let Some(value) = lookup(ENV_APP_ENV) {
            self.error_tracking.environment = value;
        }
        if let Some(value) = lookup(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup(ENV_LOGGING_LEVEL) {
            self.log_level = value.parse().map_err(|_| StateError::InvalidOverride {
                key: ENV_LOGGING_LEVEL,
                value,
            })?;
        }

        Ok(self)
    }
}

fn parse_url(key: &'static str, value: &str) -> Result<Url, StateError> {
    Url::parse(value).map_err(|_| StateError::InvalidOverride {
        key,
        value: value.to_string(),
    })
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the qube directory (~/.qube)
    pub qube_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the qube directory path (custom or default ~/.qube)
    pub fn qube_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new qube state directory
    pub fn init(custom_path: Option<PathBuf>, config: Option<AppConfig>) -> Result<Self, StateError> {
        let qube_dir = Self::qube_dir(custom_path)?;

        if qube_dir.join(CONFIG_FILE_NAME).exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&qube_dir)?;

        let config = config.unwrap_or_default();
        let config_path = qube_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            qube_dir,
            config_path,
            config,
        })
    }

    /// Load existing state from the qube directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let qube_dir = Self::qube_dir(custom_path)?;

        if !qube_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_path = qube_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            qube_dir,
            config_path,
            config,
        })
    }

    /// Load the state if it exists, otherwise fall back to defaults.
    ///
    /// Minting works without `qube init` as long as the environment
    /// supplies what the defaults lack.
    pub fn load_or_default(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        match Self::load(custom_path.clone()) {
            Ok(state) => Ok(state),
            Err(StateError::NotInitialized) => {
                let qube_dir = Self::qube_dir(custom_path)?;
                Ok(Self {
                    config_path: qube_dir.join(CONFIG_FILE_NAME),
                    qube_dir,
                    config: AppConfig::default(),
                })
            }
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("qube directory not initialized. Run 'qube init' first")]
    NotInitialized,

    #[error("qube directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("invalid value for {key}: {value}")]
    InvalidOverride { key: &'static str, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
