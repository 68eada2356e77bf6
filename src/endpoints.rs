//! PayPal REST endpoint resolution.
//!
//! Pure functions mapping an [`Environment`] to the correct base URL and
//! building the three endpoint URLs this crate calls. OAuth2 lives under
//! `/v1`, checkout orders under `/v2`. No I/O, no failure mode.

use crate::config::Environment;

/// Sandbox API host.
pub const SANDBOX_BASE_URL: &str = "https://api.sandbox.paypal.com";

/// Production API host.
pub const LIVE_BASE_URL: &str = "https://api.paypal.com";

impl Environment {
    /// Returns the API base URL for this environment.
    #[must_use]
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Live => LIVE_BASE_URL,
            Self::Sandbox => SANDBOX_BASE_URL,
        }
    }
}

/// URL of the OAuth2 client-credentials token endpoint.
#[must_use]
pub fn token_url(environment: Environment) -> String {
    format!("{}/v1/oauth2/token", environment.base_url())
}

/// URL of the order-create endpoint.
#[must_use]
pub fn orders_url(environment: Environment) -> String {
    format!("{}/v2/checkout/orders", environment.base_url())
}

/// URL of the capture endpoint for a given order.
#[must_use]
pub fn capture_url(environment: Environment, order_id: &str) -> String {
    format!("{}/v2/checkout/orders/{order_id}/capture", environment.base_url())
}
