//! Facilitator configuration and response types

use reqwest::ClientBuilder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use std::time::Duration;

/// Default facilitator URL
pub const DEFAULT_FACILITATOR_URL: &str = "https://x402.org/facilitator";

/// Environment variable holding the facilitator base URL
pub const FACILITATOR_URL_ENV: &str = "X402_FACILITATOR_URL";

/// Environment variable holding the request timeout in whole seconds
pub const FACILITATOR_TIMEOUT_ENV: &str = "X402_FACILITATOR_TIMEOUT_SECS";

/// Type alias for authentication headers function
///
/// The outer map is keyed by endpoint name (`"verify"`, `"settle"`,
/// `"supported"`), the inner map holds header name/value pairs.
pub type AuthHeadersFn =
    dyn Fn() -> crate::Result<HashMap<String, HashMap<String, String>>> + Send + Sync;

/// Type alias for authentication headers function wrapped in Arc
pub type AuthHeadersFnArc = Arc<AuthHeadersFn>;

/// Type alias for authentication headers function wrapped in Box
pub type AuthHeadersFnBox = Box<AuthHeadersFn>;

/// A single transport option, applied to the HTTP client builder at construction
pub type TransportOption = Arc<dyn Fn(ClientBuilder) -> ClientBuilder + Send + Sync>;

/// Facilitator configuration
#[derive(Clone, Default)]
pub struct FacilitatorConfig {
    /// Base URL of the facilitator service; empty means [`DEFAULT_FACILITATOR_URL`]
    pub url: String,
    /// Transport options, applied in order
    pub transport_options: Vec<TransportOption>,
    /// Preconfigured HTTP client; takes precedence over `transport_options`
    pub http_client: Option<reqwest::Client>,
    /// Function to create authentication headers
    pub create_auth_headers: Option<AuthHeadersFnArc>,
}

impl std::fmt::Debug for FacilitatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacilitatorConfig")
            .field("url", &self.url)
            .field("transport_options", &self.transport_options.len())
            .field("http_client", &self.http_client.is_some())
            .field("create_auth_headers", &"<function>")
            .finish()
    }
}

impl FacilitatorConfig {
    /// Create a new facilitator config
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Build a config from `X402_FACILITATOR_URL` and `X402_FACILITATOR_TIMEOUT_SECS`
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> crate::Result<Self> {
        let mut config = Self::new(lookup(FACILITATOR_URL_ENV).unwrap_or_default());

        if let Some(raw) = lookup(FACILITATOR_TIMEOUT_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                crate::X402Error::config(format!(
                    "{} must be a whole number of seconds, got {:?}",
                    FACILITATOR_TIMEOUT_ENV, raw
                ))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// The URL requests will be sent to, after default substitution
    pub fn effective_url(&self) -> &str {
        if self.url.is_empty() {
            DEFAULT_FACILITATOR_URL
        } else {
            &self.url
        }
    }

    /// Set the request timeout
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_transport_option(move |builder| builder.timeout(timeout))
    }

    /// Append a transport option; later options override earlier ones
    pub fn with_transport_option<F>(mut self, option: F) -> Self
    where
        F: Fn(ClientBuilder) -> ClientBuilder + Send + Sync + 'static,
    {
        self.transport_options.push(Arc::new(option));
        self
    }

    /// Use a preconfigured HTTP client instead of building one
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Set the auth headers creator
    pub fn with_auth_headers(mut self, creator: AuthHeadersFnBox) -> Self {
        self.create_auth_headers = Some(Arc::from(creator));
        self
    }

    /// Produce the HTTP client this config describes
    pub(crate) fn build_http_client(&self) -> crate::Result<reqwest::Client> {
        if let Some(client) = &self.http_client {
            return Ok(client.clone());
        }

        let builder = self
            .transport_options
            .iter()
            .fold(reqwest::Client::builder(), |builder, option| option(builder));

        builder
            .build()
            .map_err(|e| crate::X402Error::config(format!("Failed to create HTTP client: {}", e)))
    }
}

/// Payment verification response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// Whether the payment is valid
    #[serde(rename = "isValid")]
    pub is_valid: bool,
    /// Reason for invalidity (if applicable)
    #[serde(rename = "invalidReason", skip_serializing_if = "Option::is_none")]
    pub invalid_reason: Option<String>,
    /// Payer's address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,
}

/// Payment settlement response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettleResponse {
    /// Whether the settlement was successful
    pub success: bool,
    /// Error reason if settlement failed
    #[serde(rename = "errorReason", skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<String>,
    /// Transaction hash or identifier
    pub transaction: String,
    /// Network where the transaction was executed
    pub network: String,
    /// Payer address if applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,
}

impl SettleResponse {
    /// Encode the settle response to base64 (the `X-PAYMENT-RESPONSE` header value)
    pub fn to_base64(&self) -> crate::Result<String> {
        use base64::{engine::general_purpose, Engine as _};
        let json = serde_json::to_string(self)?;
        Ok(general_purpose::STANDARD.encode(json))
    }
}

/// Supported payment schemes and networks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportedKinds {
    pub kinds: Vec<SupportedKind>,
}

/// Individual supported payment scheme and network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportedKind {
    #[serde(rename = "x402Version")]
    pub x402_version: u32,
    pub scheme: String,
    pub network: String,
    /// Additional metadata provided by the facilitator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_empty_url_uses_default() {
        assert_eq!(
            FacilitatorConfig::new("").effective_url(),
            DEFAULT_FACILITATOR_URL
        );
        assert_eq!(
            FacilitatorConfig::default().effective_url(),
            DEFAULT_FACILITATOR_URL
        );
        assert_eq!(
            FacilitatorConfig::new("http://localhost:8080").effective_url(),
            "http://localhost:8080"
        );
    }

    #[test]
    fn test_options_are_kept_in_order() {
        let config = FacilitatorConfig::new("https://example.com/facilitator")
            .with_timeout(Duration::from_secs(30))
            .with_transport_option(|builder| builder.user_agent("x402-test"))
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.transport_options.len(), 3);
        assert!(config.build_http_client().is_ok());
    }

    #[test]
    fn test_from_lookup_reads_url_and_timeout() {
        let config = FacilitatorConfig::from_lookup(lookup_from(&[
            (FACILITATOR_URL_ENV, "https://facilitator.example.com"),
            (FACILITATOR_TIMEOUT_ENV, "15"),
        ]))
        .unwrap();

        assert_eq!(config.effective_url(), "https://facilitator.example.com");
        assert_eq!(config.transport_options.len(), 1);
    }

    #[test]
    fn test_from_lookup_defaults_when_unset() {
        let config = FacilitatorConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.effective_url(), DEFAULT_FACILITATOR_URL);
        assert!(config.transport_options.is_empty());
    }

    #[test]
    fn test_from_lookup_rejects_bad_timeout() {
        let result =
            FacilitatorConfig::from_lookup(lookup_from(&[(FACILITATOR_TIMEOUT_ENV, "soon")]));

        let error = result.unwrap_err();
        assert!(matches!(error, crate::X402Error::Config { .. }));
        assert!(error.to_string().contains(FACILITATOR_TIMEOUT_ENV));
    }

    #[test]
    fn test_verify_response_minimal_body() {
        let response: VerifyResponse = serde_json::from_value(json!({"isValid": true})).unwrap();

        assert_eq!(
            response,
            VerifyResponse {
                is_valid: true,
                invalid_reason: None,
                payer: None,
            }
        );
    }

    #[test]
    fn test_settle_response_requires_transaction() {
        let result: Result<SettleResponse, _> =
            serde_json::from_value(json!({"success": true, "network": "base"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_settle_response_base64_omits_empty_fields() {
        use base64::{engine::general_purpose, Engine as _};

        let response = SettleResponse {
            success: true,
            error_reason: None,
            transaction: "0xabc".to_string(),
            network: "base-sepolia".to_string(),
            payer: None,
        };

        let encoded = response.to_base64().unwrap();
        let decoded = general_purpose::STANDARD.decode(encoded).unwrap();
        let value: Value = serde_json::from_slice(&decoded).unwrap();

        assert_eq!(
            value,
            json!({"success": true, "transaction": "0xabc", "network": "base-sepolia"})
        );
    }
}
