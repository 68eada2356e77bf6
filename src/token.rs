//! OAuth2 access token acquisition and caching.
//!
//! PayPal REST calls authenticate with a short-lived bearer token obtained
//! through the client-credentials grant. Fetching one per request would both
//! slow the checkout path and hammer the token endpoint, so [`TokenProvider`]
//! keeps one cached token per credential pair and refreshes it on expiry.
//!
//! # Concurrency
//!
//! The cache sits behind an async [`Mutex`] that is held across a refresh.
//! Concurrent callers queue on the lock and re-check the cache once they
//! acquire it, so a burst of checkouts triggers at most one token fetch per
//! expiry window (single-flight). Duplicate fetches would be harmless, since
//! every fetch yields an equally valid token; the lock only avoids the
//! redundant provider load.
//!
//! # Examples
//!
//! ```no_run
//! use paypal_checkout::{Credentials, Environment, HttpTransport, TokenProvider};
//!
//! # async fn example() -> paypal_checkout::Result<()> {
//! let transport = HttpTransport::new();
//! let tokens = TokenProvider::new();
//! let credentials = Credentials::new("client-id", "client-secret", Environment::Sandbox);
//!
//! let bearer = tokens.get_access_token(&transport, &credentials).await?;
//! println!("token: {bearer}");
//! # Ok(())
//! # }
//! ```

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::{
    config::Credentials,
    endpoints,
    error::{GatewayError, Result},
    transport::ApiTransport,
};

/// Ceiling on how long a fetched token is served from cache.
///
/// Fifteen minutes is deliberately far below PayPal's usual declared token
/// lifetime; combined with [`REFRESH_MARGIN`] it guarantees a cached token is
/// never presented near its provider-side expiry.
pub const TOKEN_CACHE_TTL: Duration = Duration::from_secs(15 * 60);

/// Safety margin subtracted from a provider-declared `expires_in`.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Wire shape of the token endpoint response.
#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// One cached bearer token.
#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Token storage keyed by credential identity.
///
/// The map stays as small as the number of active credential pairs, so no
/// eviction policy is needed.
#[derive(Debug, Default)]
struct TokenCache {
    entries: HashMap<String, CachedToken>,
}

impl TokenCache {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(Instant::now()))
            .map(|entry| entry.value.as_str())
    }

    fn insert(&mut self, key: String, value: String, ttl: Duration) {
        self.entries.insert(key, CachedToken { value, expires_at: Instant::now() + ttl });
    }
}

/// Produces valid bearer tokens, fetching from the token endpoint on cache
/// miss or expiry.
///
/// One provider instance is meant to be shared across all flows of a process;
/// it is the only shared mutable state in this crate.
#[derive(Debug, Default)]
pub struct TokenProvider {
    cache: Mutex<TokenCache>,
}

impl TokenProvider {
    /// Creates a provider with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a valid access token for the given credentials.
    ///
    /// Serves from cache when a fresh token is available; otherwise performs
    /// exactly one client-credentials request (HTTP Basic auth, form body
    /// `grant_type=client_credentials`) and caches the result. No retry is
    /// attempted on failure.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AccessToken`] if the token endpoint is
    /// unreachable, responds with a non-success status, or omits the
    /// `access_token` field.
    #[instrument(skip(self, transport, credentials), fields(environment = credentials.environment.as_mode()))]
    pub async fn get_access_token<T: ApiTransport>(
        &self,
        transport: &T,
        credentials: &Credentials,
    ) -> Result<String> {
        let key = cache_key(credentials);

        // Held across the refresh: concurrent callers queue here and find the
        // fresh token on their own re-check (single-flight).
        let mut cache = self.cache.lock().await;

        if let Some(token) = cache.get(&key) {
            debug!("access token served from cache");
            return Ok(token.to_owned());
        }

        info!("fetching access token");
        let url = endpoints::token_url(credentials.environment);
        let response = transport
            .post_form(
                &url,
                &credentials.client_id,
                &credentials.client_secret,
                &[("grant_type", "client_credentials")],
            )
            .await
            .map_err(|e| GatewayError::AccessToken(e.to_string()))?;

        if !response.is_success() {
            return Err(GatewayError::AccessToken(format!(
                "token endpoint returned status {}",
                response.status
            )));
        }

        let parsed: AccessTokenResponse = serde_json::from_slice(&response.body)
            .map_err(|e| GatewayError::AccessToken(format!("malformed token response: {e}")))?;

        if parsed.access_token.is_empty() {
            return Err(GatewayError::AccessToken("token response has empty access_token".to_owned()));
        }

        cache.insert(key, parsed.access_token.clone(), ttl_for(parsed.expires_in));
        Ok(parsed.access_token)
    }
}

/// Cache TTL for a fetched token.
///
/// The provider-declared lifetime is honored when it is *shorter* than the
/// [`TOKEN_CACHE_TTL`] ceiling (minus a refresh margin); it is never allowed
/// to extend caching beyond the ceiling.
fn ttl_for(expires_in: Option<u64>) -> Duration {
    match expires_in {
        Some(seconds) => {
            Duration::from_secs(seconds).saturating_sub(REFRESH_MARGIN).min(TOKEN_CACHE_TTL)
        }
        None => TOKEN_CACHE_TTL,
    }
}

/// Derives the cache key from credential identity.
///
/// Hashed so the secret itself never sits in a map key that might be dumped
/// by diagnostics.
fn cache_key(credentials: &Credentials) -> String {
    let mut hasher = Sha256::new();
    hasher.update(credentials.client_id.as_bytes());
    hasher.update([0u8]);
    hasher.update(credentials.client_secret.as_bytes());
    hasher.update([0u8]);
    hasher.update(credentials.environment.as_mode().as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}
