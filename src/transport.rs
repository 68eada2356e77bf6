//! HTTP transport abstraction for PayPal API calls.
//!
//! This module separates protocol mechanics from flow logic: the
//! [`ApiTransport`] trait issues the two request shapes the PayPal REST API
//! needs (a form POST with HTTP Basic auth for the token endpoint, a JSON
//! POST with Bearer auth for everything else), and the flow modules decide
//! what a given status/body combination means.
//!
//! A transport never interprets response bodies and never treats a non-2xx
//! status as a transport error; it hands back the raw [`ApiResponse`] so each
//! flow can classify the failure for its own stage. Only network-level
//! failures (DNS, TLS, timeouts) surface as [`GatewayError::Transport`].
//!
//! The production implementation is [`HttpTransport`] on a shared pooled
//! [`reqwest::Client`]. Tests substitute their own implementation of the
//! trait; no test in this crate performs network I/O.

use std::{sync::LazyLock, time::Duration};

use reqwest::Client;
use tracing::instrument;

use crate::error::{GatewayError, Result};

/// Default HTTP client with connection pooling enabled.
///
/// Using a singleton avoids recreating the client per transport instance,
/// preserving connection pooling benefits across all default transports.
static DEFAULT_HTTP_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .pool_max_idle_per_host(10)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to create default HTTP client")
});

/// Raw response from an API call.
///
/// Status interpretation belongs to the caller; the transport reports what
/// the wire said.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Whether the status code is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport over the PayPal REST API.
///
/// The trait is open so hosts can wrap the default transport (logging,
/// fault injection) and tests can script responses without a network.
///
/// Both methods perform exactly one request attempt; retry policy is out of
/// scope for every implementation.
pub trait ApiTransport: Send + Sync {
    /// Executes a `POST` with an `application/x-www-form-urlencoded` body and
    /// HTTP Basic authentication. Used for the OAuth2 token endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Transport`] if the request cannot be completed
    /// at the network level.
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        client_id: &'a str,
        client_secret: &'a str,
        form: &'a [(&'a str, &'a str)],
    ) -> impl Future<Output = Result<ApiResponse>> + Send + 'a;

    /// Executes a `POST` with a JSON body and Bearer authentication. Used for
    /// the order-create and capture endpoints.
    ///
    /// `headers` carries request-specific additions such as
    /// `PayPal-Request-Id`; implementations set `Content-Type` themselves.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Transport`] if the request cannot be completed
    /// at the network level.
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        bearer_token: &'a str,
        headers: &'a [(&'a str, &'a str)],
        body: &'a [u8],
    ) -> impl Future<Output = Result<ApiResponse>> + Send + 'a;
}

/// Production transport over a pooled `reqwest` client.
///
/// Default configuration:
/// - Pool max idle per host: 10
/// - Total timeout: 30 seconds
/// - Connect timeout: 10 seconds
///
/// Timeouts are deliberately bounded: these calls sit in a user-facing
/// redirect path where an unbounded hang is not acceptable.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport {
    /// Creates a transport on the shared pooled client.
    #[must_use]
    pub fn new() -> Self {
        Self { client: DEFAULT_HTTP_CLIENT.clone() }
    }

    /// Creates a transport on a caller-configured client.
    ///
    /// Callers supplying their own client are responsible for setting a
    /// bounded request timeout.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn read_response(response: reqwest::Response) -> Result<ApiResponse> {
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Transport(format!("failed to read response body: {e}")))?
            .to_vec();
        Ok(ApiResponse { status, body })
    }
}

impl ApiTransport for HttpTransport {
    #[instrument(skip(self, client_id, client_secret, form), fields(url))]
    async fn post_form<'a>(
        &'a self,
        url: &'a str,
        client_id: &'a str,
        client_secret: &'a str,
        form: &'a [(&'a str, &'a str)],
    ) -> Result<ApiResponse> {
        let response = self
            .client
            .post(url)
            .basic_auth(client_id, Some(client_secret))
            .form(form)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Self::read_response(response).await
    }

    #[instrument(skip(self, bearer_token, headers, body), fields(url))]
    async fn post_json<'a>(
        &'a self,
        url: &'a str,
        bearer_token: &'a str,
        headers: &'a [(&'a str, &'a str)],
        body: &'a [u8],
    ) -> Result<ApiResponse> {
        let mut request = self
            .client
            .post(url)
            .bearer_auth(bearer_token)
            .header("Content-Type", "application/json");

        for (key, value) in headers {
            request = request.header(*key, *value);
        }

        let response = request
            .body(body.to_vec())
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Self::read_response(response).await
    }
}
