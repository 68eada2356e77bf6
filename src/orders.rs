//! Order creation flow.
//!
//! Creates a CAPTURE-intent order for a local payment record and returns the
//! payer approval URL. Invoked once per outbound checkout attempt; the caller
//! performs the actual redirect.

use serde_json::Value;
use tracing::{info, instrument, warn};
use url::Url;

use crate::{
    config::Credentials,
    endpoints,
    error::{GatewayError, Result},
    models::{
        ApplicationContext, CreateOrderRequest, CreateOrderResponse, Money, OrderIntent,
        PurchaseUnitRequest, ShippingPreference, describe_error_body, format_amount,
    },
    record::PaymentRecord,
    token::TokenProvider,
    transport::ApiTransport,
};

/// Creates a remote order for `payment` and returns the approval URL.
///
/// Sends a single purchase unit carrying the payment's reference id, currency
/// and total, with `shipping_preference = NO_SHIPPING`, the payment's cancel
/// URL, and its return URL as the redirect target. The request carries
/// `PayPal-Request-Id` set to the reference id, so a retried checkout attempt
/// is idempotent on the processor side.
///
/// On success the remote order id and the full raw response are written to
/// the payment record *before* the approval link is extracted: a crash after
/// order creation but before the redirect must still leave a durable link
/// between the local record and the remote order.
///
/// # Errors
///
/// - [`GatewayError::InvalidAmount`]: the total is not representable for the
///   payment's currency. No remote call is made.
/// - [`GatewayError::AccessToken`]: token acquisition failed.
/// - [`GatewayError::OrderCreation`]: the orders endpoint was unreachable,
///   returned a non-success status, or returned an unparseable body.
/// - [`GatewayError::ApprovalLinkMissing`]: a success response carried no
///   `rel == "approve"` link. The order id is still recorded on the payment.
#[instrument(skip_all, fields(reference_id = %payment.reference_id()))]
pub async fn create_order<T, R>(
    transport: &T,
    tokens: &TokenProvider,
    payment: &mut R,
    credentials: &Credentials,
) -> Result<String>
where
    T: ApiTransport,
    R: PaymentRecord + ?Sized,
{
    let reference_id = payment.reference_id();
    let currency = payment.currency();
    let amount = format_amount(payment.total(), &currency)?;

    let cancel_url = payment.cancel_url();
    let return_url = payment.return_url();
    validate_redirect_url("cancel_url", &cancel_url)?;
    validate_redirect_url("return_url", &return_url)?;

    let request = CreateOrderRequest {
        intent: OrderIntent::Capture,
        purchase_units: vec![PurchaseUnitRequest {
            reference_id: reference_id.clone(),
            amount: Money { currency_code: currency, value: amount },
        }],
        application_context: ApplicationContext {
            cancel_url,
            return_url,
            shipping_preference: ShippingPreference::NoShipping,
        },
    };

    let token = tokens.get_access_token(transport, credentials).await?;

    let body = serde_json::to_vec(&request).map_err(|e| {
        GatewayError::OrderCreation(format!("failed to serialize order request: {e}"))
    })?;

    let url = endpoints::orders_url(credentials.environment);
    let headers =
        [("PayPal-Request-Id", reference_id.as_str()), ("Prefer", "return=representation")];
    let response = transport
        .post_json(&url, &token, &headers, &body)
        .await
        .map_err(|e| GatewayError::OrderCreation(e.to_string()))?;

    if !response.is_success() {
        warn!(status = response.status, "order creation rejected");
        return Err(GatewayError::OrderCreation(describe_error_body(
            response.status,
            &response.body,
        )));
    }

    let raw: Value = serde_json::from_slice(&response.body)
        .map_err(|e| GatewayError::OrderCreation(format!("malformed order response: {e}")))?;
    let order: CreateOrderResponse = serde_json::from_value(raw.clone())
        .map_err(|e| GatewayError::OrderCreation(format!("malformed order response: {e}")))?;

    // Durable linkage first: the stored transaction id must never lag behind
    // an already-issued redirect.
    payment.record_order(&order.id, &raw);
    info!(order_id = %order.id, "order created");

    let approval_url = order.approval_link().ok_or(GatewayError::ApprovalLinkMissing)?;
    Ok(approval_url.to_owned())
}

fn validate_redirect_url(label: &str, value: &str) -> Result<()> {
    Url::parse(value)
        .map_err(|e| GatewayError::OrderCreation(format!("invalid {label} '{value}': {e}")))?;
    Ok(())
}
