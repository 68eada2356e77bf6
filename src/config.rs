//! Merchant credential configuration.
//!
//! This module defines the immutable [`Credentials`] value passed to every
//! component that talks to PayPal. Nothing in this crate reads ambient
//! configuration; the host resolves its own config surface (admin form,
//! environment variables, TOML file) into a `Credentials` and hands it to
//! each flow call.
//!
//! # Examples
//!
//! ```
//! use paypal_checkout::{Credentials, Environment};
//!
//! let toml = r#"
//!     mode = "sandbox"
//!     client_id = "AYa...client-id"
//!     client_secret = "EH...client-secret"
//! "#;
//!
//! let credentials = Credentials::from_toml(toml)?;
//! assert_eq!(credentials.environment, Environment::Sandbox);
//! # Ok::<(), paypal_checkout::GatewayError>(())
//! ```

use std::fmt;

use serde::Deserialize;

use crate::error::{GatewayError, Result};

/// PayPal API environment.
///
/// `Live` maps to the production API; anything else maps to the sandbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    /// Test environment (`api.sandbox.paypal.com`).
    Sandbox,
    /// Production environment (`api.paypal.com`).
    Live,
}

impl Environment {
    /// Maps a configured `mode` string onto an environment.
    ///
    /// Only the exact value `"live"` selects production; every other value
    /// falls back to the sandbox so a misconfigured merchant can never
    /// accidentally charge real money.
    #[must_use]
    pub fn from_mode(mode: &str) -> Self {
        if mode == "live" { Self::Live } else { Self::Sandbox }
    }

    /// Returns the configured mode string for this environment.
    #[must_use]
    pub fn as_mode(self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Live => "live",
        }
    }
}

/// Raw TOML shape of the credential config surface.
///
/// Kept separate from [`Credentials`] so the public type never carries a
/// half-validated state.
#[derive(Deserialize)]
struct CredentialsFile {
    mode: String,
    client_id: String,
    client_secret: String,
}

/// A merchant's REST API credential pair plus target environment.
///
/// Immutable for the duration of a flow. Cloning is cheap enough for the
/// once-per-request call pattern this crate has.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// PayPal REST API client id.
    pub client_id: String,
    /// PayPal REST API client secret.
    pub client_secret: String,
    /// Which API host the credential pair belongs to.
    pub environment: Environment,
}

impl Credentials {
    /// Creates credentials from already-validated parts.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        environment: Environment,
    ) -> Self {
        Self { client_id: client_id.into(), client_secret: client_secret.into(), environment }
    }

    /// Parses credentials from a TOML document with `mode`, `client_id`, and
    /// `client_secret` keys, then validates them.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the document does not parse, a key
    /// is missing, or a required value is empty.
    pub fn from_toml(document: &str) -> Result<Self> {
        let file: CredentialsFile = toml::from_str(document)
            .map_err(|e| GatewayError::Config(format!("failed to parse credentials: {e}")))?;

        let credentials = Self {
            client_id: file.client_id,
            client_secret: file.client_secret,
            environment: Environment::from_mode(&file.mode),
        };
        credentials.validate()?;
        Ok(credentials)
    }

    /// Validates that the required fields are present and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(GatewayError::Config("client_id is required".to_owned()));
        }
        if self.client_secret.trim().is_empty() {
            return Err(GatewayError::Config("client_secret is required".to_owned()));
        }
        Ok(())
    }
}

// The secret must never reach logs. tracing captures Debug representations,
// so the Debug impl redacts it.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("environment", &self.environment)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mode_live() {
        assert_eq!(Environment::from_mode("live"), Environment::Live);
    }

    #[test]
    fn test_from_mode_sandbox() {
        assert_eq!(Environment::from_mode("sandbox"), Environment::Sandbox);
    }

    #[test]
    fn test_from_mode_unknown_falls_back_to_sandbox() {
        assert_eq!(Environment::from_mode("production"), Environment::Sandbox);
        assert_eq!(Environment::from_mode("LIVE"), Environment::Sandbox);
        assert_eq!(Environment::from_mode(""), Environment::Sandbox);
    }

    #[test]
    fn test_mode_round_trip() {
        for env in [Environment::Sandbox, Environment::Live] {
            assert_eq!(Environment::from_mode(env.as_mode()), env);
        }
    }

    #[test]
    fn test_from_toml_valid() {
        let toml = r#"
            mode = "live"
            client_id = "client-id"
            client_secret = "client-secret"
        "#;

        let credentials = Credentials::from_toml(toml).expect("should parse valid TOML");
        assert_eq!(credentials.client_id, "client-id");
        assert_eq!(credentials.client_secret, "client-secret");
        assert_eq!(credentials.environment, Environment::Live);
    }

    #[test]
    fn test_from_toml_missing_key() {
        let toml = r#"
            mode = "sandbox"
            client_id = "client-id"
        "#;

        let error = Credentials::from_toml(toml).unwrap_err();
        assert!(matches!(error, GatewayError::Config(_)));
    }

    #[test]
    fn test_from_toml_empty_client_id() {
        let toml = r#"
            mode = "sandbox"
            client_id = ""
            client_secret = "client-secret"
        "#;

        let error = Credentials::from_toml(toml).unwrap_err();
        assert!(error.to_string().contains("client_id is required"));
    }

    #[test]
    fn test_from_toml_whitespace_secret_rejected() {
        let toml = r#"
            mode = "sandbox"
            client_id = "client-id"
            client_secret = "   "
        "#;

        let error = Credentials::from_toml(toml).unwrap_err();
        assert!(error.to_string().contains("client_secret is required"));
    }

    #[test]
    fn test_validate_accepts_new_credentials() {
        let credentials = Credentials::new("id", "secret", Environment::Sandbox);
        assert!(credentials.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let credentials = Credentials::new("id", "super-secret", Environment::Sandbox);
        let debug = format!("{credentials:?}");
        assert!(debug.contains("[redacted]"));
        assert!(!debug.contains("super-secret"));
    }
}
