//! Shared fixtures for client tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::json;

use crate::config::{Credentials, TfaSettings};
use crate::transport::{HttpClient, HttpError, HttpRequest, HttpResponse};

use super::config::ClientConfig;

type Scripted = Result<HttpResponse, HttpError>;

/// HTTP mock that answers per URL path from a queue.
///
/// The last queued answer for a path is repeated once the queue is down to one.
#[derive(Debug, Default)]
pub struct RouteClient {
    routes: Mutex<HashMap<String, VecDeque<Scripted>>>,
    requests: Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl RouteClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an answer for requests whose path ends with `path`.
    pub fn on(self, path: &str, response: Scripted) -> Self {
        self.routes
            .lock()
            .unwrap()
            .entry(format!("/{path}"))
            .or_default()
            .push_back(response);
        self
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn calls_to(&self, path: &str) -> usize {
        let suffix = format!("/{path}");
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.path().ends_with(&suffix))
            .count()
    }

    pub fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn clone_scripted(s: &Scripted) -> Scripted {
    match s {
        Ok(r) => Ok(r.clone()),
        Err(HttpError::Timeout) => Err(HttpError::Timeout),
        Err(HttpError::InvalidUrl(u)) => Err(HttpError::InvalidUrl(u.clone())),
        Err(HttpError::Connection(e)) => Err(HttpError::Connection(e.to_string().into())),
    }
}

impl HttpClient for RouteClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let path = req.url.path().to_string();
        self.requests.lock().unwrap().push(req);

        let mut routes = self.routes.lock().unwrap();
        let queue = routes
            .iter_mut()
            .find(|(suffix, _)| path.ends_with(suffix.as_str()))
            .map(|(_, q)| q)
            .unwrap_or_else(|| panic!("no scripted response for {path}"));

        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            clone_scripted(queue.front().unwrap())
        }
    }
}

impl HttpClient for Arc<RouteClient> {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.as_ref().request(req).await
    }
}

pub fn ok(body: &serde_json::Value) -> Scripted {
    Ok(HttpResponse::json_body(http::StatusCode::OK, body))
}

pub fn status(code: http::StatusCode) -> Scripted {
    Ok(HttpResponse::new(code, http::HeaderMap::new(), Vec::new()))
}

pub fn login_ok(token: &str) -> Scripted {
    ok(&json!({"success": true, "data": {"token": token, "userId": "user-1"}}))
}

pub fn login_pending() -> Scripted {
    Ok(HttpResponse::json_body(
        http::StatusCode::ACCEPTED,
        &json!({"success": true, "data": {}}),
    ))
}

pub fn device_json(id: &str, name: &str, kind: &str, extra: &serde_json::Value) -> serde_json::Value {
    let mut entry = json!({
        "deviceId": id,
        "deviceName": name,
        "deviceType": kind,
        "state": "provisioned",
    });
    if let (Some(obj), Some(more)) = (entry.as_object_mut(), extra.as_object()) {
        for (k, v) in more {
            obj.insert(k.clone(), v.clone());
        }
    }
    entry
}

pub fn devices(entries: &[serde_json::Value]) -> Scripted {
    ok(&json!({"success": true, "data": entries}))
}

pub fn credentials() -> Credentials {
    Credentials::new("user@example.com", "secret")
}

pub fn tfa(retries: u32) -> TfaSettings {
    TfaSettings {
        tfa_type: "PUSH".to_string(),
        source: "push".to_string(),
        retries,
        delay: Duration::from_secs(5),
        host: String::new(),
        username: String::new(),
        password: String::new(),
    }
}

pub fn base_url() -> url::Url {
    url::Url::parse("https://api.test/").unwrap()
}

pub fn client_config(retries: u32) -> ClientConfig {
    let mut config = ClientConfig::new(credentials(), tfa(retries), base_url());
    config.synchronous_mode = true;
    config.event_poll_interval = Duration::from_secs(1);
    config
}
