//! HTTP transport types and the async execution seam.
//!
//! # Design
//! Requests and responses are plain data. `CitiesClient` and `GeocodeClient`
//! build and parse them without touching the network; a `Transport`
//! implementation performs the round-trip. `execute_cancellable` binds one
//! round-trip to a `CancellationToken` so a newer call can invalidate it.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data. `path` is the absolute URL.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes one HTTP round-trip.
///
/// Implementations return `Ok` for every response the server produced,
/// whatever its status, and `ApiError::NetworkError` when no response
/// arrived at all.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request).await
    }
}

/// Run `request`, resolving to `ApiError::RequestCancelled` once `token`
/// is cancelled, even if the response already arrived.
pub async fn execute_cancellable<T>(
    transport: &T,
    request: HttpRequest,
    token: &CancellationToken,
) -> Result<HttpResponse, ApiError>
where
    T: Transport + ?Sized,
{
    if token.is_cancelled() {
        return Err(ApiError::RequestCancelled);
    }
    let method = request.method;
    let path = request.path.clone();
    let outcome = tokio::select! {
        biased;
        _ = token.cancelled() => Err(ApiError::RequestCancelled),
        result = transport.execute(request) => result,
    };
    if token.is_cancelled() {
        debug!(method = method.as_str(), %path, "dropping superseded response");
        return Err(ApiError::RequestCancelled);
    }
    outcome
}
