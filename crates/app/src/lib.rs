// Library exports for the CLI and integration tests

// HTTP clients for the pinning network, encryption service and mint relay
pub mod clients;
pub mod error_tracking;
pub mod logging;

// App state (configuration, paths)
pub mod state;

pub use clients::{minter, ApiClient, ApiError};
pub use logging::{init_logging, LoggingGuards};
pub use state::{AppConfig, AppState, ErrorTrackingConfig, StateError};
