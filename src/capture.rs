//! Capture flow and return-callback handling.
//!
//! After the payer approves on the hosted page, PayPal redirects back with
//! the order id in the `token` query parameter. [`handle_approval_return`]
//! resolves that id to a local payment record, captures the authorized funds,
//! and reconciles the result. [`capture_order`] is the bare capture call for
//! hosts that do their own record handling.
//!
//! State machine per order: `Created → Approved (payer returned) → Captured
//! (status COMPLETED)` or `NotCaptured (any other status)`. Only `COMPLETED`
//! counts as success for intent CAPTURE.

use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::{
    config::Credentials,
    endpoints,
    error::{GatewayError, Result},
    models::{OrderStatus, describe_error_body},
    record::{PaymentRecord, PaymentStore},
    token::TokenProvider,
    transport::ApiTransport,
};

/// Outcome of a successful capture call.
#[derive(Debug, Clone)]
pub struct CaptureResult {
    /// Remote order id, taken from the capture response when present.
    pub order_id: String,
    /// Always [`OrderStatus::Completed`]; any other remote status is an error.
    pub status: OrderStatus,
    /// Full capture response, handed to the record's completion write.
    pub raw: Value,
}

/// Result of handling a return callback.
#[derive(Debug, Clone)]
pub enum CaptureOutcome {
    /// Funds were captured on this invocation and the record was completed.
    Captured(CaptureResult),
    /// The record was already paid; no remote call was made.
    ///
    /// Return-URL replays (browser back button, duplicate webhook delivery)
    /// land here and are treated as success.
    AlreadyCaptured,
}

/// Captures a previously-approved order.
///
/// Single `POST` to the capture endpoint; no retry. The response must carry
/// a top-level `status` field, and only `COMPLETED` is success.
///
/// # Errors
///
/// - [`GatewayError::AccessToken`]: token acquisition failed.
/// - [`GatewayError::Capture`]: the endpoint was unreachable, returned a
///   non-success status, or the response carried no `status` field. A missing
///   `status` is never treated as an ambiguous success.
/// - [`GatewayError::CaptureNotCompleted`]: the remote status was present but
///   not `COMPLETED` (e.g. `APPROVED` awaiting a retry). The caller decides
///   whether to attempt a second capture or surface failure to the payer.
#[instrument(skip(transport, tokens, credentials), fields(order_id))]
pub async fn capture_order<T: ApiTransport>(
    transport: &T,
    tokens: &TokenProvider,
    order_id: &str,
    credentials: &Credentials,
) -> Result<CaptureResult> {
    let token = tokens.get_access_token(transport, credentials).await?;

    let url = endpoints::capture_url(credentials.environment, order_id);
    let response = transport
        .post_json(&url, &token, &[], b"{}")
        .await
        .map_err(|e| GatewayError::Capture(e.to_string()))?;

    if !response.is_success() {
        warn!(status = response.status, "capture rejected");
        return Err(GatewayError::Capture(describe_error_body(response.status, &response.body)));
    }

    let raw: Value = serde_json::from_slice(&response.body)
        .map_err(|e| GatewayError::Capture(format!("malformed capture response: {e}")))?;

    let Some(status) = raw.get("status").and_then(Value::as_str) else {
        return Err(GatewayError::Capture("capture response has no status field".to_owned()));
    };

    if status != "COMPLETED" {
        return Err(GatewayError::CaptureNotCompleted { status: status.to_owned() });
    }

    let order_id = raw.get("id").and_then(Value::as_str).unwrap_or(order_id).to_owned();
    info!(%order_id, "order captured");

    Ok(CaptureResult { order_id, status: OrderStatus::Completed, raw })
}

/// Handles the payer's return redirect (or a webhook replay) for an order id.
///
/// Resolves the inbound order id to exactly one payment record *before* any
/// remote call. If the record already reports paid, the callback is treated
/// as a replay and succeeds with zero remote calls. Otherwise the order is
/// captured and, on `COMPLETED`, the record's completion write is invoked
/// exactly once with the capture response.
///
/// The paid check-then-capture is best-effort, not transactionally guarded:
/// two racing callbacks for the same order may both reach the processor,
/// which rejects the second capture (`ORDER_ALREADY_CAPTURED`).
///
/// # Errors
///
/// - [`GatewayError::PaymentNotFound`]: the order id is empty or matches no
///   record. Checked before any network call.
/// - Everything [`capture_order`] returns.
#[instrument(skip(transport, tokens, store, credentials), fields(order_id))]
pub async fn handle_approval_return<T, S>(
    transport: &T,
    tokens: &TokenProvider,
    store: &mut S,
    order_id: &str,
    credentials: &Credentials,
) -> Result<CaptureOutcome>
where
    T: ApiTransport,
    S: PaymentStore,
    S::Record: PaymentRecord,
{
    if order_id.trim().is_empty() {
        return Err(GatewayError::PaymentNotFound("callback carried no order token".to_owned()));
    }

    let Some(payment) = store.find_by_transaction_id(order_id) else {
        return Err(GatewayError::PaymentNotFound(order_id.to_owned()));
    };

    if payment.is_paid() {
        info!("payment already completed, skipping capture");
        return Ok(CaptureOutcome::AlreadyCaptured);
    }

    let result = capture_order(transport, tokens, order_id, credentials).await?;
    payment.mark_completed(&result.order_id, &result.raw);

    Ok(CaptureOutcome::Captured(result))
}
