//! Wire types for the PayPal checkout orders API.
//!
//! Request and response shapes for `/v2/checkout/orders`, plus amount
//! formatting. Field names follow the remote contract exactly; serde does the
//! renaming so the Rust side stays idiomatic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result};

/// Processing intent for an order.
///
/// This crate only creates CAPTURE-intent orders: funds are collected with a
/// single capture call after payer approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderIntent {
    /// Capture funds immediately after approval.
    Capture,
}

/// A currency-qualified amount, value in major units (`"10.00"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// ISO 4217 currency code.
    pub currency_code: String,
    /// Decimal string in the currency's minor-unit convention.
    pub value: String,
}

/// One purchase unit of an order.
///
/// The reference id links the remote order back to the local payment record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseUnitRequest {
    /// Caller-side reference, echoed back by PayPal.
    pub reference_id: String,
    /// Amount to collect for this unit.
    pub amount: Money,
}

/// Shipping address collection behavior on the approval page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShippingPreference {
    /// Use the address on the payer's PayPal account.
    GetFromFile,
    /// Digital goods flow: no shipping address at all.
    NoShipping,
    /// Use the address provided in the order.
    SetProvidedAddress,
}

/// Redirect and presentation settings for the hosted approval page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationContext {
    /// Where the payer lands after declining.
    pub cancel_url: String,
    /// Where the payer lands after approving; receives the order id as the
    /// `token` query parameter.
    pub return_url: String,
    /// Shipping address behavior.
    pub shipping_preference: ShippingPreference,
}

/// Body of `POST /v2/checkout/orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Processing intent.
    pub intent: OrderIntent,
    /// Purchase units; this crate always sends exactly one.
    pub purchase_units: Vec<PurchaseUnitRequest>,
    /// Approval page settings.
    pub application_context: ApplicationContext,
}

/// HATEOAS link attached to an order response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkDescription {
    /// Target URL.
    pub href: String,
    /// Relationship, e.g. `approve`, `capture`, `self`.
    pub rel: String,
    /// HTTP method for the related call, when PayPal includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// Order lifecycle status as reported by PayPal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order created, payer not yet involved.
    Created,
    /// Order saved for later completion.
    Saved,
    /// Payer approved; funds not yet captured.
    Approved,
    /// Order voided.
    Voided,
    /// Funds captured. The only success status for intent CAPTURE.
    Completed,
    /// Payer must take further action (e.g. 3DS).
    PayerActionRequired,
    /// Any status this crate does not model.
    #[serde(other)]
    Other,
}

/// Response of `POST /v2/checkout/orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderResponse {
    /// Remote order id; the `token` parameter of the return redirect.
    pub id: String,
    /// Order status, `CREATED` on success.
    pub status: OrderStatus,
    /// HATEOAS links. Absent in some error shapes, hence the default.
    #[serde(default)]
    pub links: Vec<LinkDescription>,
}

impl CreateOrderResponse {
    /// Returns the payer approval URL, if present.
    ///
    /// The remote contract does not guarantee link ordering, so this is an
    /// explicit linear scan; the first `rel == "approve"` entry wins.
    #[must_use]
    pub fn approval_link(&self) -> Option<&str> {
        self.links.iter().find(|link| link.rel == "approve").map(|link| link.href.as_str())
    }
}

/// Structured error body returned by the orders endpoints.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    name: Option<String>,
    message: Option<String>,
    #[serde(default)]
    details: Vec<ErrorDetail>,
    debug_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    issue: Option<String>,
    description: Option<String>,
}

/// Renders a non-success response into an error message.
///
/// Parses PayPal's structured error shape (`name`, `message`, `details[]`,
/// `debug_id`) when possible and falls back to the bare status code when the
/// body is empty or unparseable.
pub(crate) fn describe_error_body(status: u16, body: &[u8]) -> String {
    let mut message = format!("status {status}");

    let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) else {
        return message;
    };

    if let Some(name) = parsed.name {
        message.push_str(&format!(" {name}"));
    }
    if let Some(detail) = parsed.message {
        message.push_str(&format!(": {detail}"));
    }
    for detail in parsed.details {
        match (detail.issue, detail.description) {
            (Some(issue), Some(description)) => {
                message.push_str(&format!("; {issue} - {description}"));
            }
            (Some(issue), None) => message.push_str(&format!("; {issue}")),
            (None, Some(description)) => message.push_str(&format!("; {description}")),
            (None, None) => {}
        }
    }
    if let Some(debug_id) = parsed.debug_id {
        message.push_str(&format!(" (debug_id {debug_id})"));
    }

    message
}

/// Currencies PayPal treats as having no minor unit.
const ZERO_DECIMAL_CURRENCIES: &[&str] = &["HUF", "JPY", "TWD"];

/// Formats a payment total as the major-unit decimal string PayPal expects.
///
/// Two decimal places for ordinary currencies, none for the currencies PayPal
/// defines as zero-decimal. Amounts that cannot be represented exactly are
/// rejected rather than silently rounded.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidAmount`] for negative totals, fractional
/// totals in zero-decimal currencies, and totals with sub-cent precision.
///
/// # Examples
///
/// ```
/// use paypal_checkout::models::format_amount;
/// use rust_decimal::Decimal;
///
/// let ten = Decimal::new(1000, 2); // 10.00
/// assert_eq!(format_amount(ten, "USD")?, "10.00");
/// assert_eq!(format_amount(Decimal::new(500, 0), "JPY")?, "500");
/// # Ok::<(), paypal_checkout::GatewayError>(())
/// ```
pub fn format_amount(value: Decimal, currency: &str) -> Result<String> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(GatewayError::InvalidAmount(format!("amount must not be negative: {value}")));
    }

    if ZERO_DECIMAL_CURRENCIES.contains(&currency) {
        if !value.fract().is_zero() {
            return Err(GatewayError::InvalidAmount(format!(
                "{currency} does not support decimals: {value}"
            )));
        }
        return Ok(value.normalize().to_string());
    }

    if value.round_dp(2) != value {
        return Err(GatewayError::InvalidAmount(format!(
            "amount has sub-cent precision: {value}"
        )));
    }
    Ok(format!("{value:.2}"))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn response_with_links(links: Vec<LinkDescription>) -> CreateOrderResponse {
        CreateOrderResponse { id: "ORDER-1".to_owned(), status: OrderStatus::Created, links }
    }

    fn link(rel: &str, href: &str) -> LinkDescription {
        LinkDescription { href: href.to_owned(), rel: rel.to_owned(), method: None }
    }

    #[test]
    fn test_create_order_request_serialization() {
        let request = CreateOrderRequest {
            intent: OrderIntent::Capture,
            purchase_units: vec![PurchaseUnitRequest {
                reference_id: "payment-42".to_owned(),
                amount: Money { currency_code: "USD".to_owned(), value: "10.00".to_owned() },
            }],
            application_context: ApplicationContext {
                cancel_url: "https://shop.example.com/cancel".to_owned(),
                return_url: "https://shop.example.com/return".to_owned(),
                shipping_preference: ShippingPreference::NoShipping,
            },
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"intent\":\"CAPTURE\""));
        assert!(json.contains("\"reference_id\":\"payment-42\""));
        assert!(json.contains("\"currency_code\":\"USD\""));
        assert!(json.contains("\"value\":\"10.00\""));
        assert!(json.contains("\"shipping_preference\":\"NO_SHIPPING\""));
    }

    #[test]
    fn test_order_response_deserialization() {
        let body = r#"{
            "id": "5O190127TN364715T",
            "status": "CREATED",
            "links": [
                {"href": "https://api.sandbox.paypal.com/v2/checkout/orders/5O190127TN364715T", "rel": "self", "method": "GET"},
                {"href": "https://www.sandbox.paypal.com/checkoutnow?token=5O190127TN364715T", "rel": "approve", "method": "GET"}
            ]
        }"#;

        let response: CreateOrderResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.id, "5O190127TN364715T");
        assert_eq!(response.status, OrderStatus::Created);
        assert_eq!(
            response.approval_link(),
            Some("https://www.sandbox.paypal.com/checkoutnow?token=5O190127TN364715T")
        );
    }

    #[test]
    fn test_order_response_without_links() {
        let response: CreateOrderResponse =
            serde_json::from_str(r#"{"id": "X", "status": "CREATED"}"#).unwrap();
        assert!(response.links.is_empty());
        assert_eq!(response.approval_link(), None);
    }

    #[test]
    fn test_approval_link_first_occurrence_wins() {
        let response = response_with_links(vec![
            link("self", "https://api.example.com/orders/1"),
            link("approve", "https://pay.example.com/first"),
            link("approve", "https://pay.example.com/second"),
        ]);

        assert_eq!(response.approval_link(), Some("https://pay.example.com/first"));
    }

    #[test]
    fn test_approval_link_rel_is_case_sensitive() {
        let response = response_with_links(vec![link("Approve", "https://pay.example.com/x")]);
        assert_eq!(response.approval_link(), None);
    }

    #[test]
    fn test_order_status_parses_wire_names() {
        for (wire, status) in [
            ("\"CREATED\"", OrderStatus::Created),
            ("\"SAVED\"", OrderStatus::Saved),
            ("\"APPROVED\"", OrderStatus::Approved),
            ("\"VOIDED\"", OrderStatus::Voided),
            ("\"COMPLETED\"", OrderStatus::Completed),
            ("\"PAYER_ACTION_REQUIRED\"", OrderStatus::PayerActionRequired),
        ] {
            let parsed: OrderStatus = serde_json::from_str(wire).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_order_status_unknown_maps_to_other() {
        let parsed: OrderStatus = serde_json::from_str("\"PENDING_REVIEW\"").unwrap();
        assert_eq!(parsed, OrderStatus::Other);
    }

    #[test]
    fn test_describe_error_body_full_shape() {
        let body = br#"{
            "name": "UNPROCESSABLE_ENTITY",
            "message": "The requested action could not be performed.",
            "debug_id": "b6b9a37217d1f",
            "details": [
                {"issue": "INSTRUMENT_DECLINED", "description": "The instrument presented was declined."}
            ]
        }"#;

        let message = describe_error_body(422, body);
        assert!(message.contains("status 422"));
        assert!(message.contains("UNPROCESSABLE_ENTITY"));
        assert!(message.contains("INSTRUMENT_DECLINED"));
        assert!(message.contains("b6b9a37217d1f"));
    }

    #[test]
    fn test_describe_error_body_unparseable_falls_back_to_status() {
        assert_eq!(describe_error_body(500, b"<html>boom</html>"), "status 500");
        assert_eq!(describe_error_body(502, b""), "status 502");
    }

    #[test]
    fn test_format_amount_two_decimals() {
        assert_eq!(format_amount(Decimal::new(1000, 2), "USD").unwrap(), "10.00");
        assert_eq!(format_amount(Decimal::new(105, 1), "EUR").unwrap(), "10.50");
        assert_eq!(format_amount(Decimal::new(7, 0), "GBP").unwrap(), "7.00");
        assert_eq!(format_amount(Decimal::ZERO, "USD").unwrap(), "0.00");
    }

    #[test]
    fn test_format_amount_zero_decimal_currency() {
        assert_eq!(format_amount(Decimal::new(500, 0), "JPY").unwrap(), "500");
        assert_eq!(format_amount(Decimal::new(50000, 2), "JPY").unwrap(), "500");
    }

    #[test]
    fn test_format_amount_rejects_negative() {
        let error = format_amount(Decimal::new(-1, 2), "USD").unwrap_err();
        assert!(matches!(error, GatewayError::InvalidAmount(_)));
    }

    #[test]
    fn test_format_amount_rejects_fractional_yen() {
        let error = format_amount(Decimal::new(5005, 1), "JPY").unwrap_err();
        assert!(matches!(error, GatewayError::InvalidAmount(_)));
    }

    #[test]
    fn test_format_amount_rejects_sub_cent_precision() {
        let error = format_amount(Decimal::new(10001, 3), "USD").unwrap_err();
        assert!(matches!(error, GatewayError::InvalidAmount(_)));
    }

    proptest! {
        #[test]
        fn prop_format_amount_round_trips_for_cent_amounts(cents in 0i64..1_000_000_000) {
            let value = Decimal::new(cents, 2);
            let formatted = format_amount(value, "USD").unwrap();
            let parsed: Decimal = formatted.parse().unwrap();
            prop_assert_eq!(parsed, value);
            prop_assert_eq!(formatted.split('.').nth(1).map(str::len), Some(2));
        }
    }
}
