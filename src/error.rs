//! Error types for the PayPal checkout gateway.
//!
//! This module defines all error types that can occur during a checkout flow.
//! All errors implement the standard [`std::error::Error`] trait via [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Authentication** ([`GatewayError::AccessToken`]): OAuth2 token acquisition failures
//! - **Order creation** ([`GatewayError::OrderCreation`], [`GatewayError::ApprovalLinkMissing`],
//!   [`GatewayError::InvalidAmount`]): failures while creating the remote order
//! - **Capture** ([`GatewayError::Capture`], [`GatewayError::CaptureNotCompleted`]):
//!   failures while collecting authorized funds
//! - **Callback** ([`GatewayError::PaymentNotFound`]): inbound order id resolution failures
//! - **Configuration** ([`GatewayError::Config`]): credential loading/validation failures
//! - **Network** ([`GatewayError::Transport`]): HTTP-level failures
//!
//! Every error is terminal for the current request: nothing in this crate retries,
//! and no failure is ever reported as an ambiguous success. Callers surface the
//! error at the boundary (typically as an error page in the redirect path).

use thiserror::Error;

/// Result type alias for gateway operations.
///
/// This is a convenience type that uses [`GatewayError`] as the error type.
/// All fallible functions in this crate return this type.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur while driving a PayPal checkout flow.
///
/// Variants are classified per flow stage so callers can distinguish a rejected
/// credential pair from a declined capture without inspecting message strings.
///
/// This type implements `#[must_use]` to ensure errors are not silently ignored.
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum GatewayError {
    /// OAuth2 access token acquisition failed.
    ///
    /// The token endpoint was unreachable, returned a non-success status, or
    /// returned a body without an `access_token` field. No retry is attempted;
    /// the next flow invocation performs a fresh fetch.
    ///
    /// # Recovery
    ///
    /// Verify the client id/secret pair and that the configured environment
    /// (sandbox vs. live) matches the credential pair.
    #[error("access token request failed: {0}")]
    AccessToken(String),

    /// The create-order call failed.
    ///
    /// Covers a non-success status from the orders endpoint (the message carries
    /// PayPal's structured error details when the body is parseable) as well as
    /// a malformed success body.
    #[error("order creation failed: {0}")]
    OrderCreation(String),

    /// A created order carried no payer approval link.
    ///
    /// For intent CAPTURE the response must contain a link with `rel == "approve"`;
    /// a response without one cannot be redirected to and is treated as invalid.
    #[error("no approve link found in order response")]
    ApprovalLinkMissing,

    /// No local payment record matches the inbound order id.
    ///
    /// Raised by the callback flow before any remote call is attempted.
    #[error("no payment record matches order id: {0}")]
    PaymentNotFound(String),

    /// The capture call failed.
    ///
    /// Covers a non-success status from the capture endpoint and a response
    /// body lacking the `status` field. A missing `status` is a failure, never
    /// an ambiguous success.
    #[error("order capture failed: {0}")]
    Capture(String),

    /// The capture response carried a status other than `COMPLETED`.
    ///
    /// `APPROVED` means the payer authorized the order but funds were not
    /// collected; the caller decides whether to retry a second capture call or
    /// surface failure to the payer.
    #[error("order capture not completed, status: {status}")]
    CaptureNotCompleted {
        /// The status PayPal actually reported (e.g. `APPROVED`).
        status: String,
    },

    /// A payment amount cannot be represented for its currency.
    ///
    /// Negative totals and totals with more precision than the currency's
    /// minor-unit convention allows are rejected before any remote call.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Gateway configuration is invalid.
    ///
    /// Raised when loading credentials from TOML fails or a required field
    /// (`mode`, `client_id`, `client_secret`) is missing or empty.
    #[error("invalid gateway configuration: {0}")]
    Config(String),

    /// HTTP request failed below the API layer.
    ///
    /// Flow functions wrap this into the stage-specific variant
    /// ([`AccessToken`](Self::AccessToken), [`OrderCreation`](Self::OrderCreation),
    /// [`Capture`](Self::Capture)) so callers always see the failing stage.
    #[error("transport error: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_display() {
        let error = GatewayError::AccessToken("status 401".into());
        assert_eq!(error.to_string(), "access token request failed: status 401");
    }

    #[test]
    fn test_approval_link_missing_display() {
        let error = GatewayError::ApprovalLinkMissing;
        assert_eq!(error.to_string(), "no approve link found in order response");
    }

    #[test]
    fn test_capture_not_completed_carries_status() {
        let error = GatewayError::CaptureNotCompleted { status: "APPROVED".to_owned() };
        assert_eq!(error.to_string(), "order capture not completed, status: APPROVED");
    }

    #[test]
    fn test_payment_not_found_display() {
        let error = GatewayError::PaymentNotFound("ORDER-123".to_owned());
        assert!(error.to_string().contains("ORDER-123"));
    }

    #[test]
    fn test_config_display() {
        let error = GatewayError::Config("client_id is required".to_owned());
        assert!(error.to_string().contains("client_id is required"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&GatewayError::ApprovalLinkMissing);
    }
}
