//! HTTP transport used to reach the camera cloud API.
//!
//! The cloud client talks to [`HttpClient`] only; [`ReqwestClient`] is the
//! production implementation. [`RetryPolicy`] and [`IsRetryable`] decide
//! which failures are repeated and how long to wait.

mod client;
mod error;
mod request;
mod retry;


pub use client::ReqwestClient;
pub use error::HttpError;
pub use request::{HttpClient, HttpRequest, HttpResponse};
pub use retry::{IsRetryable, RetryPolicy};
