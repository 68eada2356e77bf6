//! Host payment-record abstraction traits.
//!
//! The host application owns payment persistence and lifecycle; this crate
//! only reads checkout parameters from a record and writes the remote
//! linkage back into it. These traits are the whole surface it touches.

use rust_decimal::Decimal;
use serde_json::Value;

/// A local payment record, as seen by the gateway.
///
/// Implementors back this with whatever storage the host uses; the gateway
/// never persists anything itself. Mutator calls are the host's signal to
/// write through to its store.
///
/// # Implementation Notes
///
/// - `record_order` is called once per order creation, *before* the payer is
///   redirected, and must make the transaction id durable so a crash between
///   order creation and redirect leaves the remote order findable.
/// - `mark_completed` is called at most once per capture and is expected to
///   flip [`is_paid`](Self::is_paid) for subsequent callback replays.
pub trait PaymentRecord: Send {
    /// Local identifier, sent to PayPal as the purchase unit reference id.
    fn reference_id(&self) -> String;

    /// ISO 4217 currency code of the total.
    fn currency(&self) -> String;

    /// Payment total in major units.
    fn total(&self) -> Decimal;

    /// Where the payer lands after declining on the approval page.
    fn cancel_url(&self) -> String;

    /// Where the payer lands after approving; the gateway's callback endpoint.
    fn return_url(&self) -> String;

    /// Remote order id previously written by
    /// [`record_order`](Self::record_order), if any.
    fn transaction_id(&self) -> Option<String>;

    /// Whether this payment has already been completed.
    ///
    /// Used to short-circuit replayed callbacks without a second capture.
    fn is_paid(&self) -> bool;

    /// Stores the remote order id and the raw create-order response.
    fn record_order(&mut self, order_id: &str, data: &Value);

    /// Marks the payment completed with the raw capture response.
    fn mark_completed(&mut self, order_id: &str, data: &Value);
}

/// Lookup of payment records by remote order id.
///
/// The callback flow resolves the inbound `token` query parameter to exactly
/// one record through this trait before it touches the network.
pub trait PaymentStore: Send {
    /// Record type this store yields.
    type Record: PaymentRecord;

    /// Finds the record whose stored transaction id equals `transaction_id`.
    ///
    /// Returns `None` when no record matches; the flow turns that into
    /// [`GatewayError::PaymentNotFound`](crate::GatewayError::PaymentNotFound).
    fn find_by_transaction_id(&mut self, transaction_id: &str) -> Option<&mut Self::Record>;
}
