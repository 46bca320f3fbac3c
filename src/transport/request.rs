//! Request and response values plus the [`HttpClient`] seam.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::HttpError;

/// An outgoing API request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Method
    pub method: http::Method,
    /// Absolute target URL
    pub url: url::Url,
    /// Headers; repeated names are kept
    pub headers: http::HeaderMap,
    /// Encoded body, if any
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Creates a request without headers or body.
    #[must_use]
    pub fn new(method: http::Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: http::HeaderMap::new(),
            body: None,
        }
    }

    /// `GET url`
    #[must_use]
    pub fn get(url: url::Url) -> Self {
        Self::new(http::Method::GET, url)
    }

    /// `POST url`
    #[must_use]
    pub fn post(url: url::Url) -> Self {
        Self::new(http::Method::POST, url)
    }

    /// Encodes `value` as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if `value` cannot be encoded.
    pub fn with_json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_vec(value)?);
        Ok(self.with_header(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/json"),
        ))
    }

    /// Appends a header value.
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }
}

/// A fully buffered API response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code
    pub status: http::StatusCode,
    /// Response headers
    pub headers: http::HeaderMap,
    /// Raw body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response.
    #[must_use]
    pub const fn new(status: http::StatusCode, headers: http::HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Creates a response carrying `body` as JSON.
    #[must_use]
    pub fn json_body(status: http::StatusCode, body: &serde_json::Value) -> Self {
        Self::new(status, http::HeaderMap::new(), body.to_string().into_bytes())
    }

    /// The body as text, if it is UTF-8.
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the deserializer error if the body does not decode into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Sends requests on behalf of the cloud API client.
///
/// Production uses [`ReqwestClient`](super::ReqwestClient); tests supply
/// scripted implementations.
pub trait HttpClient: Send + Sync {
    /// Sends `req` and buffers the whole response.
    ///
    /// Any status code is a successful response at this layer.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when no response was received.
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send;
}
