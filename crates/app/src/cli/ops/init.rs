use std::path::PathBuf;

use clap::Args;
use url::Url;

use qube::state::{AppConfig, AppState, ErrorTrackingConfig};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Encryption service base URL
    #[arg(long)]
    pub server_url: Option<Url>,

    /// Pinata API base URL
    #[arg(long)]
    pub pinata_url: Option<Url>,

    /// Pinata JWT (can also be supplied later through QUBE_PINATA_JWT)
    #[arg(long)]
    pub pinata_jwt: Option<String>,

    /// Mint relay base URL
    #[arg(long)]
    pub contract_url: Option<Url>,

    /// Error tracking DSN
    #[arg(long)]
    pub sentry_dsn: Option<String>,

    /// Directory for daily log files (can also be set through QUBE_LOG_DIR)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Environment name attached to error reports
    #[arg(long, default_value = "development")]
    pub environment: String,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] qube::state::StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            server_url: self.server_url.clone().unwrap_or(defaults.server_url),
            pinata_url: self.pinata_url.clone().unwrap_or(defaults.pinata_url),
            pinata_jwt: self.pinata_jwt.clone(),
            contract_url: self.contract_url.clone().unwrap_or(defaults.contract_url),
            log_dir: self.log_dir.clone(),
            error_tracking: ErrorTrackingConfig {
                dsn: self.sentry_dsn.clone(),
                environment: self.environment.clone(),
            },
            ..defaults
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let jwt_str = match state.config.pinata_jwt {
            Some(_) => "set",
            None => "not set (export QUBE_PINATA_JWT)",
        };

        let log_str = match &state.config.log_dir {
            Some(dir) => dir.display().to_string(),
            None => "stderr only".to_string(),
        };

        let output = format!(
            "Initialized qube directory at: {}\n\
             - Config: {}\n\
             - Encryption service: {}\n\
             - Pinata API: {}\n\
             - Pinata JWT: {}\n\
             - Mint relay: {}\n\
             - Logs: {}\n\
             - Environment: {}",
            state.qube_dir.display(),
            state.config_path.display(),
            state.config.server_url,
            state.config.pinata_url,
            jwt_str,
            state.config.contract_url,
            log_str,
            state.config.error_tracking.environment,
        );

        Ok(output)
    }
}
