//! Production [`CameraService`] backed by the cloud API.

use std::sync::Arc;
use std::time::Duration;

use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;

use crate::session::{FileSessionStore, LoadResult, Session, SessionStore};
use crate::time::{Sleeper, TokioSleeper};
use crate::transport::HttpClient;

use super::CameraService;
use super::api::{ArloApi, LoginOutcome};
use super::config::ClientConfig;
use super::device::{AttributeChange, CallbackRegistry, Device, DeviceKind};
use super::diff::{DeviceSnapshot, diff};
use super::error::ApiError;

/// Cloud-backed camera service.
///
/// Construction through [`CloudClient::connect`] never fails: any problem
/// leaves the client disconnected with [`CameraService::last_error`] set.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `S`: The sleeper for approval waits and retries (defaults to [`TokioSleeper`])
/// - `St`: The session store (defaults to [`FileSessionStore`])
pub struct CloudClient<H, S = TokioSleeper, St = FileSessionStore> {
    api: ArloApi<H, S>,
    store: St,
    config: ClientConfig,
    session: Option<Session>,
    last_error: Option<String>,
    initial: Vec<DeviceSnapshot>,
    base_stations: Vec<Device>,
    cameras: Vec<Device>,
    registry: Arc<CallbackRegistry>,
}

impl<H, S, St> CloudClient<H, S, St>
where
    H: HttpClient,
    S: Sleeper,
    St: SessionStore,
{
    /// Logs in and enumerates devices.
    ///
    /// A persisted session is reused while the service still accepts it;
    /// otherwise credentials are sent and, if the second factor is pending,
    /// approval is re-checked up to `tfa.retries` times, `tfa.delay` apart.
    pub async fn connect(api: ArloApi<H, S>, store: St, config: ClientConfig) -> Self {
        tracing::debug!("Client options: {config}");
        if config.tfa.source == "imap" {
            tracing::debug!(
                "Second factor source is IMAP mailbox '{}' as '{}'",
                config.tfa.host,
                config.tfa.username
            );
        }

        let mut client = Self {
            api,
            store,
            config,
            session: None,
            last_error: None,
            initial: Vec::new(),
            base_stations: Vec::new(),
            cameras: Vec::new(),
            registry: Arc::new(CallbackRegistry::new()),
        };

        match client.establish().await {
            Ok((session, snapshots)) => client.adopt(session, snapshots),
            Err(e) => {
                tracing::debug!("Connection failed: {e}");
                client.last_error = Some(e.to_string());
            }
        }

        client
    }

    fn adopt(&mut self, session: Session, snapshots: Vec<DeviceSnapshot>) {
        for snapshot in &snapshots {
            let device = Device::new(snapshot.info.clone(), Arc::clone(&self.registry));
            match snapshot.info.kind {
                DeviceKind::BaseStation => self.base_stations.push(device),
                DeviceKind::Camera => self.cameras.push(device),
            }
        }
        self.session = Some(session);
        self.initial = snapshots;
    }

    async fn establish(&self) -> Result<(Session, Vec<DeviceSnapshot>), ApiError> {
        if let Some(session) = self.resume() {
            match self.api.devices(&session).await {
                Ok(snapshots) => {
                    tracing::info!("Resumed saved session");
                    return Ok((session, snapshots));
                }
                Err(ApiError::Unauthorized) => {
                    tracing::info!("Saved session expired, logging in again");
                    if let Err(e) = self.store.clear().await {
                        tracing::warn!("Failed to remove expired session: {e}");
                    }
                }
                Err(e) => tracing::debug!("Saved session unusable ({e}), logging in again"),
            }
        }

        let session = self.authenticate().await?;
        self.persist(&session).await;

        let snapshots = self.api.devices(&session).await?;
        Ok((session, snapshots))
    }

    fn resume(&self) -> Option<Session> {
        if !self.config.save_state {
            return None;
        }

        match self.store.load() {
            LoadResult::Loaded(session) => Some(session),
            LoadResult::NotFound => None,
            LoadResult::Corrupted { reason } => {
                tracing::warn!("Saved session corrupted ({reason}), will overwrite on login");
                None
            }
        }
    }

    async fn persist(&self, session: &Session) {
        if self.config.save_state {
            if let Err(e) = self.store.save(session).await {
                tracing::warn!("Failed to save session: {e}");
            }
        }
    }

    /// Logs in again, keeping `session` if that fails.
    async fn renew(&self, session: &mut Session) {
        match self.authenticate().await {
            Ok(fresh) => {
                self.persist(&fresh).await;
                *session = fresh;
            }
            Err(e) => tracing::warn!("Re-login failed, keeping current session: {e}"),
        }
    }

    async fn authenticate(&self) -> Result<Session, ApiError> {
        let credentials = &self.config.credentials;
        let tfa = &self.config.tfa;

        if let LoginOutcome::Authenticated(session) = self.api.login(credentials, tfa).await? {
            return Ok(session);
        }

        tracing::info!(
            "Waiting for {} approval via {} (up to {} check(s), {}s apart)",
            tfa.tfa_type,
            tfa.source,
            tfa.retries,
            tfa.delay.as_secs()
        );

        for check in 1..=tfa.retries {
            self.api.sleeper().sleep(tfa.delay).await;
            tracing::debug!("Second factor check {check}/{}", tfa.retries);

            if let LoginOutcome::Authenticated(session) = self.api.login(credentials, tfa).await? {
                return Ok(session);
            }
        }

        Err(ApiError::ApprovalTimedOut {
            checks: tfa.retries,
        })
    }

    /// Delivers a batch of changes to the registered handlers.
    async fn deliver(&self, changes: Vec<AttributeChange>) {
        if changes.is_empty() {
            return;
        }

        if self.config.synchronous_mode {
            for change in &changes {
                self.registry.dispatch(change);
            }
            return;
        }

        let registry = Arc::clone(&self.registry);
        let delivered = tokio::task::spawn_blocking(move || {
            for change in &changes {
                registry.dispatch(change);
            }
        })
        .await;

        if let Err(e) = delivered {
            tracing::error!("Attribute handler panicked: {e}");
        }
    }

    /// Fetches the listing once and returns it, dumping the payload if configured.
    async fn poll(&self, session: &Session) -> Result<Vec<DeviceSnapshot>, ApiError> {
        let snapshots = self.api.devices(session).await?;
        if self.config.dump {
            for snapshot in &snapshots {
                tracing::debug!(
                    "dump: {} {:?}",
                    snapshot.info.device_id,
                    snapshot.attributes
                );
            }
        }
        Ok(snapshots)
    }
}

impl<H, S, St> CameraService for CloudClient<H, S, St>
where
    H: HttpClient,
    S: Sleeper,
    St: SessionStore,
{
    fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn base_stations(&self) -> &[Device] {
        &self.base_stations
    }

    fn cameras(&self) -> &[Device] {
        &self.cameras
    }

    /// Polls the device listing and dispatches attribute changes.
    ///
    /// Every `reconnect_every` the session is refreshed by logging in again.
    /// An expired session is replaced the same way; the baseline is kept,
    /// so changes made meanwhile are delivered by the next poll. Poll
    /// failures are logged and retried on the next tick.
    async fn run_events(&self) -> Result<(), ApiError> {
        let mut session = self.session.clone().ok_or(ApiError::NotConnected)?;

        let mut baseline = self.initial.clone();
        let mut last_login = tokio::time::Instant::now();
        let mut ticks = IntervalStream::new(tokio::time::interval(
            self.config.event_poll_interval.max(Duration::from_millis(1)),
        ));

        // The first tick completes immediately and the baseline is already fresh.
        ticks.next().await;

        while ticks.next().await.is_some() {
            if last_login.elapsed() >= self.config.reconnect_every {
                tracing::debug!("Refreshing session");
                self.renew(&mut session).await;
                last_login = tokio::time::Instant::now();
            }

            let current = match self.poll(&session).await {
                Ok(current) => current,
                Err(ApiError::Unauthorized) => {
                    tracing::info!("Session expired, logging in again");
                    if let Err(e) = self.store.clear().await {
                        tracing::warn!("Failed to remove expired session: {e}");
                    }
                    self.renew(&mut session).await;
                    last_login = tokio::time::Instant::now();
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Device poll failed: {e}");
                    continue;
                }
            };

            self.deliver(diff(&baseline, &current)).await;
            baseline = current;
        }

        Ok(())
    }
}
