//! Application execution logic.
//!
//! This module logs in, attaches change logging to every device and then
//! pumps events until the process is interrupted.

use thiserror::Error;
use tokio::signal;

use arlo_downloader::bootstrap::{self, BootstrapError};
use arlo_downloader::client::{ApiError, ArloApi, ClientConfig, CloudClient};
use arlo_downloader::config::ValidatedConfig;
use arlo_downloader::session::FileSessionStore;
use arlo_downloader::transport::{HttpError, ReqwestClient};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to build the HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[source] HttpError),

    /// Login did not succeed.
    #[error(transparent)]
    Login(#[from] BootstrapError),

    /// The event pump stopped.
    #[error("Event stream failed: {0}")]
    Events(#[source] ApiError),
}

/// Builds the client options from the validated configuration.
fn client_config(config: &ValidatedConfig) -> ClientConfig {
    ClientConfig::from(config)
}

/// Executes the main application loop.
///
/// This function:
/// 1. Creates the HTTP client and cloud API
/// 2. Logs in (reusing a saved session when possible)
/// 3. Logs every device and registers change logging
/// 4. Pumps events until shutdown signal (Ctrl+C / SIGTERM)
///
/// # Errors
///
/// Returns an error if:
/// - The HTTP client cannot be built
/// - Login fails
/// - The event pump cannot start (the client was never connected)
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires:
/// - Network access to the camera cloud
/// - Real async runtime with signal handling
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: &ValidatedConfig) -> Result<(), RunError> {
    let options = client_config(config);

    let http = ReqwestClient::with_timeout(ReqwestClient::DEFAULT_TIMEOUT)
        .map_err(RunError::HttpClient)?;
    let api = ArloApi::new(http, options.api_url.clone()).with_verbose(options.verbose_debug);
    let store = FileSessionStore::in_dir(&options.storage_dir);

    tracing::debug!("Session file: {}", store.path().display());

    let service = CloudClient::connect(api, store, options).await;

    let devices = bootstrap::attach(&service)?;
    tracing::info!("Attached to {} device(s), waiting for events", devices.len());

    bootstrap::run_until(&service, shutdown_signal())
        .await
        .map_err(RunError::Events)
}

/// Returns a future that completes when a shutdown signal is received.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
