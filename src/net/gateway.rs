//! HTTP gateway: every outbound API call goes through here.
//!
//! SYSTEM CONTEXT
//! ==============
//! Domain APIs (`net::api`) call `get`/`post`/`put`/`patch`/`delete` with an
//! endpoint relative to the configured API base. The gateway builds the URL,
//! attaches headers, races the transport against the timeout, retries, and
//! turns every failure into an `ApiError`.
//!
//! DESIGN
//! ======
//! - `Authorization` comes from the credential store (`"{type} {token}"`),
//!   falling back to the token service (`"Bearer {token}"`). It is skipped
//!   when the caller supplied one or the endpoint exchanges credentials.
//! - Only idempotent methods retry by default. POST and PATCH retry only when
//!   the caller sets `RequestOptions::retries`.
//! - Each classified error is logged, handed to every registered
//!   `ResponseInterceptor`, then returned. Quiet requests skip the
//!   interceptors. Interceptors are registered after
//!   construction because the auth interceptor needs the session manager,
//!   which itself needs the gateway.
//!
//! TRADE-OFFS
//! ==========
//! A timed-out request is abandoned rather than aborted; the browser may
//! still complete it in the background.

#[cfg(test)]
#[path = "gateway_test.rs"]
mod gateway_test;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use futures::future::{Either, select};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::transport::{HttpRequest, HttpResponse, Method, Timer, Transport, TransportError};
use crate::auth::token::TokenService;
use crate::config::ClientConfig;
use crate::storage::credentials::CredentialStore;

/// Endpoints that obtain credentials and therefore never carry one.
pub const CREDENTIAL_EXCHANGE_ENDPOINTS: [&str; 4] = ["auth/login", "auth/register", "auth/refresh", "auth/google"];

/// Observes every classified error before it reaches the caller.
pub trait ResponseInterceptor {
    fn on_error(&self, error: &ApiError);
}

/// Per-call overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub timeout: Option<Duration>,
    /// Extra attempts after the first.
    pub retries: Option<u32>,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    /// Log failures but keep them from the interceptors.
    pub quiet: bool,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_owned(), value.to_owned()));
        self
    }

    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }
}

struct GatewayInner {
    config: ClientConfig,
    credentials: CredentialStore,
    tokens: TokenService,
    transport: Rc<dyn Transport>,
    timer: Rc<dyn Timer>,
    interceptors: RefCell<Vec<Rc<dyn ResponseInterceptor>>>,
}

/// Shared gateway handle. Clones share configuration and interceptors.
#[derive(Clone)]
pub struct HttpGateway {
    inner: Rc<GatewayInner>,
}

impl HttpGateway {
    pub fn new(
        config: ClientConfig,
        credentials: CredentialStore,
        tokens: TokenService,
        transport: Rc<dyn Transport>,
        timer: Rc<dyn Timer>,
    ) -> Self {
        Self {
            inner: Rc::new(GatewayInner {
                config,
                credentials,
                tokens,
                transport,
                timer,
                interceptors: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn add_interceptor(&self, interceptor: Rc<dyn ResponseInterceptor>) {
        self.inner.interceptors.borrow_mut().push(interceptor);
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn timer(&self) -> Rc<dyn Timer> {
        Rc::clone(&self.inner.timer)
    }

    /// # Errors
    ///
    /// Returns the classified failure.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str, options: RequestOptions) -> Result<T, ApiError> {
        self.dispatch(Method::Get, endpoint, None, options).await
    }

    /// # Errors
    ///
    /// Returns the classified failure.
    pub async fn post<B, T>(&self, endpoint: &str, body: &B, options: RequestOptions) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.dispatch(Method::Post, endpoint, Some(serde_json::to_string(body)), options).await
    }

    /// # Errors
    ///
    /// Returns the classified failure.
    pub async fn put<B, T>(&self, endpoint: &str, body: &B, options: RequestOptions) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.dispatch(Method::Put, endpoint, Some(serde_json::to_string(body)), options).await
    }

    /// # Errors
    ///
    /// Returns the classified failure.
    pub async fn patch<B, T>(&self, endpoint: &str, body: &B, options: RequestOptions) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.dispatch(Method::Patch, endpoint, Some(serde_json::to_string(body)), options).await
    }

    /// # Errors
    ///
    /// Returns the classified failure.
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str, options: RequestOptions) -> Result<T, ApiError> {
        self.dispatch(Method::Delete, endpoint, None, options).await
    }

    /// `{base}/{endpoint}` plus URL-encoded query pairs.
    pub fn build_url(&self, endpoint: &str, query: &[(String, String)]) -> String {
        let mut url = format!("{}/{}", self.inner.config.api_base_url, endpoint.trim_start_matches('/'));
        for (key, value) in query {
            let separator = if url.contains('?') { '&' } else { '?' };
            url.push(separator);
            url.push_str(&urlencoding::encode(key));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    pub fn is_credential_exchange_endpoint(endpoint: &str) -> bool {
        let path = endpoint.trim_start_matches('/');
        let path = path.split('?').next().unwrap_or(path).trim_end_matches('/');
        CREDENTIAL_EXCHANGE_ENDPOINTS.contains(&path)
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<serde_json::Result<String>>,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let url = self.build_url(endpoint, &options.query);
        let result = match body.transpose() {
            Ok(body) => {
                let request = self.build_request(method, endpoint, url.clone(), body, &options.headers);
                match self.execute(request, &options).await {
                    Ok(response) => parse_body(&response, &url),
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(ApiError::unencodable_body(&url, &e)),
        };

        if let Err(error) = &result {
            error.log();
            if options.quiet {
                return result;
            }
            let interceptors = self.inner.interceptors.borrow().clone();
            for interceptor in interceptors {
                interceptor.on_error(error);
            }
        }
        result
    }

    fn build_request(
        &self,
        method: Method,
        endpoint: &str,
        url: String,
        body: Option<String>,
        extra_headers: &[(String, String)],
    ) -> HttpRequest {
        let mut request = HttpRequest {
            method,
            url,
            headers: vec![("Content-Type".to_owned(), "application/json".to_owned())],
            body,
        };
        for (name, value) in extra_headers {
            request.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
            request.headers.push((name.clone(), value.clone()));
        }
        if request.header("Authorization").is_none() && !Self::is_credential_exchange_endpoint(endpoint) {
            let auth = self
                .inner
                .credentials
                .authorization_header_value()
                .or_else(|| self.inner.tokens.authorization_header_value());
            if let Some(value) = auth {
                request.headers.push(("Authorization".to_owned(), value));
            }
        }
        request
    }

    async fn execute(&self, request: HttpRequest, options: &RequestOptions) -> Result<HttpResponse, ApiError> {
        let timeout = options.timeout.unwrap_or(self.inner.config.request_timeout);
        let retries = options.retries.unwrap_or(if request.method.is_idempotent() {
            self.inner.config.request_retries
        } else {
            0
        });

        let mut attempt = 0;
        loop {
            let error = match self.attempt(request.clone(), timeout).await {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) => ApiError::from_status(response.status, &request.url, &response.body),
                Err(e) => ApiError::from_transport(&e, &request.url),
            };
            if attempt >= retries {
                return Err(error);
            }
            attempt += 1;
            log::debug!(
                "gateway: {} {} failed ({}), retry {attempt}/{retries}",
                request.method.as_str(),
                request.url,
                error.kind
            );
        }
    }

    async fn attempt(&self, request: HttpRequest, timeout: Duration) -> Result<HttpResponse, TransportError> {
        let send = self.inner.transport.send(request);
        let deadline = self.inner.timer.sleep(timeout);
        match select(send, deadline).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => Err(TransportError::Timeout(timeout)),
        }
    }
}

/// Empty bodies parse as JSON `null`, so `()` and `Option<T>` accept them.
fn parse_body<T: DeserializeOwned>(response: &HttpResponse, url: &str) -> Result<T, ApiError> {
    let text = if response.body.trim().is_empty() { "null" } else { response.body.as_str() };
    serde_json::from_str(text).map_err(|e| ApiError::unreadable_body(response.status, url, &e))
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.inner.config.api_base_url)
            .field("interceptors", &self.inner.interceptors.borrow().len())
            .finish()
    }
}
