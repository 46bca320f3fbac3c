//! Raw calls against the cloud JSON API.
//!
//! Every response uses the envelope `{"success": bool, "data": ...}`.
//! Transient failures (connection errors, timeouts, 5xx, 429, 408) are
//! retried according to the configured [`RetryPolicy`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{Credentials, TfaSettings};
use crate::session::Session;
use crate::time::{Sleeper, TokioSleeper};
use crate::transport::{HttpClient, HttpError, HttpRequest, HttpResponse, IsRetryable, RetryPolicy};

use super::device::{DeviceInfo, DeviceKind};
use super::diff::DeviceSnapshot;
use super::error::ApiError;

/// API paths relative to the base URL.
pub mod path {
    /// Credential login.
    pub const LOGIN: &str = "hmsweb/login/v2";
    /// Device listing.
    pub const DEVICES: &str = "hmsweb/users/devices";
}

/// `deviceType` value of base stations.
const BASE_STATION_TYPE: &str = "basestation";

/// Outcome of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials (and second factor, if any) accepted.
    Authenticated(Session),
    /// Credentials accepted; the second factor has not been approved yet.
    AwaitingApproval,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
    tfa: TfaRequest<'a>,
}

#[derive(Serialize)]
struct TfaRequest<'a> {
    #[serde(rename = "type")]
    tfa_type: &'a str,
    source: &'a str,
}

#[derive(Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginData {
    token: Option<String>,
    user_id: Option<String>,
}

/// Client for the cloud API.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `S`: The sleeper used for retry backoff (defaults to [`TokioSleeper`])
#[derive(Debug)]
pub struct ArloApi<H, S = TokioSleeper> {
    client: H,
    sleeper: S,
    base_url: url::Url,
    retry_policy: RetryPolicy,
    verbose: bool,
}

impl<H> ArloApi<H, TokioSleeper> {
    /// Creates an API client with the default retry policy.
    #[must_use]
    pub fn new(client: H, base_url: url::Url) -> Self {
        Self {
            client,
            sleeper: TokioSleeper,
            base_url,
            retry_policy: RetryPolicy::default(),
            verbose: false,
        }
    }
}

impl<H, S> ArloApi<H, S> {
    /// Sets a custom sleeper for retry delays and approval waits.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> ArloApi<H, S2> {
        ArloApi {
            client: self.client,
            sleeper,
            base_url: self.base_url,
            retry_policy: self.retry_policy,
            verbose: self.verbose,
        }
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Logs every request at debug level when enabled.
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Returns the sleeper.
    #[must_use]
    pub const fn sleeper(&self) -> &S {
        &self.sleeper
    }

    fn endpoint(&self, path: &str) -> Result<url::Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Http(HttpError::InvalidUrl(e.to_string())))
    }
}

impl<H: HttpClient, S: Sleeper> ArloApi<H, S> {
    /// Logs in with account credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] for refused credentials, or transport
    /// and decoding errors.
    pub async fn login(
        &self,
        credentials: &Credentials,
        tfa: &TfaSettings,
    ) -> Result<LoginOutcome, ApiError> {
        let body = LoginRequest {
            email: &credentials.username,
            password: credentials.password(),
            tfa: TfaRequest {
                tfa_type: &tfa.tfa_type,
                source: &tfa.source,
            },
        };
        let request = HttpRequest::post(self.endpoint(path::LOGIN)?).with_json(&body)?;

        let response = match self.send(&request).await {
            Err(ApiError::Unauthorized) => {
                return Err(ApiError::Rejected {
                    reason: "credentials not accepted".to_string(),
                });
            }
            other => other?,
        };

        if response.status == http::StatusCode::ACCEPTED {
            return Ok(LoginOutcome::AwaitingApproval);
        }

        let login: LoginData = serde_json::from_value(open_envelope(&response)?)?;
        let token = login.token.ok_or_else(|| ApiError::Rejected {
            reason: "login response carried no token".to_string(),
        })?;

        Ok(LoginOutcome::Authenticated(Session::new(token, login.user_id)))
    }

    /// Lists every device on the account.
    ///
    /// Entries without a `deviceId` are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when the session is no longer valid,
    /// or transport and decoding errors.
    pub async fn devices(&self, session: &Session) -> Result<Vec<DeviceSnapshot>, ApiError> {
        let token = http::HeaderValue::from_str(&session.token).map_err(|_| ApiError::Rejected {
            reason: "session token is not a valid header value".to_string(),
        })?;
        let request = HttpRequest::get(self.endpoint(path::DEVICES)?)
            .with_header(http::header::AUTHORIZATION, token);

        let response = self.send(&request).await?;
        let entries: Vec<serde_json::Map<String, serde_json::Value>> =
            serde_json::from_value(open_envelope(&response)?)?;

        Ok(entries.into_iter().filter_map(snapshot_from_json).collect())
    }

    /// Sends with retry logic.
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut last_error: Option<ApiError> = None;

        for attempt in 1..=self.retry_policy.max_attempts.max(1) {
            if self.verbose {
                tracing::debug!(method = %request.method, url = %request.url, attempt, "API request");
            }

            match self.execute(request).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if !e.is_retryable() {
                        return Err(e);
                    }
                    tracing::debug!("API request failed (attempt {attempt}): {e}");
                    last_error = Some(e);

                    if self.retry_policy.should_retry(attempt) {
                        let delay = self.retry_policy.delay_for_retry(attempt - 1);
                        self.sleeper.sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.expect("max_attempts >= 1 ensures at least one attempt"))
    }

    /// Executes a single request attempt.
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let response = self.client.request(request.clone()).await?;

        if response.status == http::StatusCode::UNAUTHORIZED
            || response.status == http::StatusCode::FORBIDDEN
        {
            return Err(ApiError::Unauthorized);
        }

        if response.status.is_success() {
            return Ok(response);
        }

        Err(ApiError::Status {
            status: response.status,
            body: response.body_text().map(ToString::to_string),
        })
    }
}

/// Checks the `success` flag and returns `data`.
fn open_envelope(response: &HttpResponse) -> Result<serde_json::Value, ApiError> {
    let envelope: Envelope = response.json()?;

    if envelope.success {
        Ok(envelope.data)
    } else {
        Err(ApiError::Rejected {
            reason: rejection_reason(&envelope.data),
        })
    }
}

fn rejection_reason(data: &serde_json::Value) -> String {
    ["message", "reason", "error"]
        .iter()
        .find_map(|k| data.get(k).and_then(serde_json::Value::as_str))
        .unwrap_or("no reason given")
        .to_string()
}

/// Builds a snapshot from one entry of the device listing.
fn snapshot_from_json(entry: serde_json::Map<String, serde_json::Value>) -> Option<DeviceSnapshot> {
    let text = |key: &str| entry.get(key).and_then(serde_json::Value::as_str);

    let device_id = text("deviceId")?.to_string();
    let name = text("deviceName").unwrap_or(&device_id).to_string();
    let kind = if text("deviceType") == Some(BASE_STATION_TYPE) {
        DeviceKind::BaseStation
    } else {
        DeviceKind::Camera
    };
    let state = text("state").unwrap_or("unknown").to_string();

    let info = DeviceInfo::new(name, device_id, kind, state);
    let attributes: BTreeMap<String, serde_json::Value> = entry.into_iter().collect();

    Some(DeviceSnapshot::new(info, attributes))
}
