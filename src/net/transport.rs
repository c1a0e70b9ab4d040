//! Raw HTTP transport and timer seams under the gateway.
//!
//! Client-side (hydrate): real HTTP via `gloo-net`, timers via `gloo-timers`.
//! Server-side (SSR): the transport reports itself unavailable and the timer
//! never fires, since outbound API calls only make sense in the browser.
//!
//! Both seams are traits so the gateway can be driven by scripted fakes.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::time::Duration;

use futures::future::LocalBoxFuture;

/// HTTP verbs the gateway issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Whether repeating the request cannot duplicate a side effect.
    pub fn is_idempotent(self) -> bool {
        matches!(self, Self::Get | Self::Put | Self::Delete)
    }
}

/// A fully-built outbound request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and body of a completed exchange, successful or not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures that happen before an HTTP status is available.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, CORS rejection, aborted fetch.
    #[error("network request failed: {0}")]
    Network(String),

    /// No response within the configured timeout.
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The environment cannot issue requests (SSR).
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

/// Sends one request and yields the raw response.
pub trait Transport {
    fn send(&self, request: HttpRequest) -> LocalBoxFuture<'static, Result<HttpResponse, TransportError>>;
}

/// Resolves after a delay. Used for timeouts and backoff.
pub trait Timer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// `fetch`-backed transport.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

impl Transport for BrowserTransport {
    fn send(&self, request: HttpRequest) -> LocalBoxFuture<'static, Result<HttpResponse, TransportError>> {
        Box::pin(async move {
            #[cfg(feature = "hydrate")]
            {
                use gloo_net::http::{Method as GlooMethod, RequestBuilder};

                let method = match request.method {
                    Method::Get => GlooMethod::GET,
                    Method::Post => GlooMethod::POST,
                    Method::Put => GlooMethod::PUT,
                    Method::Patch => GlooMethod::PATCH,
                    Method::Delete => GlooMethod::DELETE,
                };
                let mut builder = RequestBuilder::new(&request.url).method(method);
                for (name, value) in &request.headers {
                    builder = builder.header(name, value);
                }
                let built = match request.body {
                    Some(body) => builder.body(body),
                    None => builder.build(),
                }
                .map_err(|e| TransportError::Network(e.to_string()))?;

                let resp = built.send().await.map_err(|e| TransportError::Network(e.to_string()))?;
                let status = resp.status();
                let body = resp.text().await.map_err(|e| TransportError::Network(e.to_string()))?;
                Ok(HttpResponse { status, body })
            }
            #[cfg(not(feature = "hydrate"))]
            {
                Err(TransportError::Unavailable(format!("{} {} not available on server", request.method.as_str(), request.url)))
            }
        })
    }
}

/// `setTimeout`-backed timer.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTimer;

impl Timer for BrowserTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(async move {
            #[cfg(feature = "hydrate")]
            {
                gloo_timers::future::sleep(duration).await;
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = duration;
                futures::future::pending::<()>().await;
            }
        })
    }
}
