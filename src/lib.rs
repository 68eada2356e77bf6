//! PayPal Checkout integration for hosted approval flows.
//!
//! A Rust library that drives the PayPal REST checkout lifecycle for a host
//! application: obtain an OAuth2 access token, create a CAPTURE-intent order,
//! redirect the payer to PayPal's hosted approval page, and, once the payer
//! returns, capture the authorized funds and reconcile them against the
//! host's payment record.
//!
//! # What this crate owns
//!
//! The parts with real contracts: token acquisition and caching (idempotent,
//! single-flight), the order-create → approve → capture state machine, and
//! failure classification. Payment persistence, HTTP routing, and redirect
//! rendering stay with the host, reached through the [`PaymentRecord`] and
//! [`PaymentStore`] traits.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   checkout    ┌──────────────────────────────┐
//! │ Host application │──────────────▶│  create_order                │
//! │ (records, routes)│               │   token → POST order →       │
//! └────────┬─────────┘               │   record id → approval URL   │
//!          │ redirect payer          └──────────────┬───────────────┘
//!          ▼                                        │ Bearer + JSON
//! ┌──────────────────┐                              ▼
//! │ PayPal approval  │               ┌──────────────────────────────┐
//! │ page (hosted)    │               │  PayPal REST API             │
//! └────────┬─────────┘               │  /v1/oauth2/token            │
//!          │ return with ?token=     │  /v2/checkout/orders         │
//!          ▼                         │  /v2/checkout/orders/…/capture│
//! ┌──────────────────┐   callback    └──────────────────────────────┘
//! │ Host application │──────────────▶ handle_approval_return
//! │                  │                lookup → capture → complete
//! └──────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use paypal_checkout::{
//!     Credentials, Environment, HttpTransport, PaymentRecord, TokenProvider, create_order,
//! };
//! use rust_decimal::Decimal;
//! use serde_json::Value;
//!
//! struct Payment {
//!     id: String,
//!     transaction_id: Option<String>,
//!     data: Option<Value>,
//!     paid: bool,
//! }
//!
//! impl PaymentRecord for Payment {
//!     fn reference_id(&self) -> String {
//!         self.id.clone()
//!     }
//!     fn currency(&self) -> String {
//!         "USD".to_owned()
//!     }
//!     fn total(&self) -> Decimal {
//!         Decimal::new(1000, 2) // 10.00
//!     }
//!     fn cancel_url(&self) -> String {
//!         format!("https://shop.example.com/pay/{}/cancel", self.id)
//!     }
//!     fn return_url(&self) -> String {
//!         format!("https://shop.example.com/pay/{}/return", self.id)
//!     }
//!     fn transaction_id(&self) -> Option<String> {
//!         self.transaction_id.clone()
//!     }
//!     fn is_paid(&self) -> bool {
//!         self.paid
//!     }
//!     fn record_order(&mut self, order_id: &str, data: &Value) {
//!         self.transaction_id = Some(order_id.to_owned());
//!         self.data = Some(data.clone());
//!     }
//!     fn mark_completed(&mut self, _order_id: &str, data: &Value) {
//!         self.data = Some(data.clone());
//!         self.paid = true;
//!     }
//! }
//!
//! # async fn example() -> paypal_checkout::Result<()> {
//! let transport = HttpTransport::new();
//! let tokens = TokenProvider::new();
//! let credentials = Credentials::new("client-id", "client-secret", Environment::Sandbox);
//!
//! let mut payment =
//!     Payment { id: "payment-42".to_owned(), transaction_id: None, data: None, paid: false };
//!
//! let approval_url = create_order(&transport, &tokens, &mut payment, &credentials).await?;
//! // Redirect the payer to `approval_url`. On their return, resolve the
//! // `token` query parameter through a PaymentStore and call
//! // `handle_approval_return`.
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return [`Result<T, GatewayError>`](error::Result), with one
//! variant per flow stage so callers can tell a rejected credential pair from
//! a declined capture without parsing messages. Every error is terminal for
//! the current request: nothing here retries, and a partial success (missing
//! approve link, capture response without a status) is always a failure.
//!
//! # Concurrency
//!
//! One [`TokenProvider`] is meant to be shared process-wide; it is the only
//! shared mutable state. Token refreshes are single-flight per provider, and
//! all remote calls run on a pooled client with bounded timeouts; these
//! calls sit in a user-facing redirect path and must never hang.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod capture;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod orders;
pub mod record;
pub mod token;
pub mod transport;

pub use capture::{CaptureOutcome, CaptureResult, capture_order, handle_approval_return};
pub use config::{Credentials, Environment};
pub use error::{GatewayError, Result};
pub use orders::create_order;
pub use record::{PaymentRecord, PaymentStore};
pub use token::{TOKEN_CACHE_TTL, TokenProvider};
pub use transport::{ApiResponse, ApiTransport, HttpTransport};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports_are_usable() {
        let credentials = Credentials::new("id", "secret", Environment::Sandbox);
        assert_eq!(credentials.environment.base_url(), "https://api.sandbox.paypal.com");

        let error = GatewayError::ApprovalLinkMissing;
        assert!(!error.to_string().is_empty());
    }

    #[test]
    fn test_token_provider_default_is_empty() {
        let provider = TokenProvider::new();
        let debug = format!("{provider:?}");
        assert!(debug.contains("TokenProvider"));
    }
}
