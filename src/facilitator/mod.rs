//! Facilitator client for payment verification and settlement
//!
//! A facilitator verifies payment authorizations and settles them on chain on
//! behalf of a resource server. This module talks to a remote facilitator over
//! HTTP+JSON:
//!
//! - `POST {url}/verify` with `{"paymentPayload", "paymentRequirements"}`
//! - `POST {url}/settle` with the same body
//! - `GET {url}/supported`
//!
//! Only a `200 OK` counts as success. Any other status, a transport failure
//! or an undecodable body is returned as a distinct [`X402Error`] variant.
//!
//! # Examples
//!
//! ```no_run
//! use x402_facilitator_client::facilitator::FacilitatorClient;
//! use x402_facilitator_client::types::{FacilitatorConfig, PaymentPayload, PaymentRequirements};
//! use std::time::Duration;
//!
//! # async fn example(
//! #     payment_payload: PaymentPayload,
//! #     payment_requirements: PaymentRequirements,
//! # ) -> x402_facilitator_client::Result<()> {
//! let config = FacilitatorConfig::new("https://x402.org/facilitator")
//!     .with_timeout(Duration::from_secs(10));
//! let client = FacilitatorClient::new(config)?;
//!
//! let verify_response = client.verify(&payment_payload, &payment_requirements).await?;
//!
//! if verify_response.is_valid {
//!     let settle_response = client.settle(&payment_payload, &payment_requirements).await?;
//!     println!("Payment settled: {}", settle_response.transaction);
//! }
//! # Ok(())
//! # }
//! ```

use crate::types::{
    AuthHeadersFnArc, FacilitatorConfig, PaymentPayload, PaymentRequirements, SettleResponse,
    SupportedKinds, VerifyResponse, DEFAULT_FACILITATOR_URL,
};
use crate::{Result, X402Error};
use async_trait::async_trait;
use http::StatusCode;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;


/// Upper bound on the response body kept in [`X402Error::UnexpectedStatus`]
pub const MAX_ERROR_BODY_BYTES: usize = 1024;

/// Facilitator operations a resource server depends on
#[async_trait]
pub trait Facilitator: Send + Sync {
    /// Check a payment against its requirements without executing it
    async fn verify(
        &self,
        payment_payload: &PaymentPayload,
        payment_requirements: &PaymentRequirements,
    ) -> Result<VerifyResponse>;

    /// Execute a verified payment
    async fn settle(
        &self,
        payment_payload: &PaymentPayload,
        payment_requirements: &PaymentRequirements,
    ) -> Result<SettleResponse>;
}

/// Facilitator endpoint a request is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Verify,
    Settle,
    Supported,
}

impl Endpoint {
    /// Name used for auth header lookup and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Verify => "verify",
            Endpoint::Settle => "settle",
            Endpoint::Supported => "supported",
        }
    }

    /// Path appended to the facilitator base URL
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Verify => "/verify",
            Endpoint::Settle => "/settle",
            Endpoint::Supported => "/supported",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request envelope shared by `/verify` and `/settle`
#[derive(Serialize)]
pub(crate) struct FacilitatorRequest<'a, P, R> {
    #[serde(rename = "paymentPayload")]
    pub payment_payload: &'a P,
    #[serde(rename = "paymentRequirements")]
    pub payment_requirements: &'a R,
}

/// Facilitator client for verifying and settling payments
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct FacilitatorClient {
    /// Base URL of the facilitator service
    url: String,
    /// HTTP client
    client: Client,
    /// Configuration for authentication headers
    auth_config: Option<AuthHeadersFnArc>,
}

impl fmt::Debug for FacilitatorClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacilitatorClient")
            .field("url", &self.url)
            .field("auth_config", &"<function>")
            .finish()
    }
}

impl FacilitatorClient {
    /// Create a new facilitator client
    ///
    /// An empty URL falls back to [`DEFAULT_FACILITATOR_URL`]. No I/O happens
    /// here and the URL is not validated; a malformed URL is reported as
    /// [`X402Error::RequestBuild`] by the first call. The only failure is the
    /// HTTP client itself refusing to build, reported as [`X402Error::Config`].
    pub fn new(config: FacilitatorConfig) -> Result<Self> {
        let client = config.build_http_client()?;

        Ok(Self {
            url: config.effective_url().to_string(),
            client,
            auth_config: config.create_auth_headers,
        })
    }

    /// Create a client around an existing HTTP client
    pub fn with_http_client(url: impl Into<String>, client: Client) -> Self {
        let url = url.into();
        let url = if url.is_empty() {
            DEFAULT_FACILITATOR_URL.to_string()
        } else {
            url
        };

        Self {
            url,
            client,
            auth_config: None,
        }
    }

    /// Get the base URL of this facilitator
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Full URL for an endpoint
    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.url, endpoint.path())
    }

    /// Verify a payment without executing the transaction
    pub async fn verify(
        &self,
        payment_payload: &PaymentPayload,
        payment_requirements: &PaymentRequirements,
    ) -> Result<VerifyResponse> {
        self.post(Endpoint::Verify, payment_payload, payment_requirements)
            .await
    }

    /// Settle a verified payment by executing the transaction
    ///
    /// No retry or idempotency key is added; a caller that retries owns
    /// deduplication.
    pub async fn settle(
        &self,
        payment_payload: &PaymentPayload,
        payment_requirements: &PaymentRequirements,
    ) -> Result<SettleResponse> {
        self.post(Endpoint::Settle, payment_payload, payment_requirements)
            .await
    }

    /// Get supported payment schemes and networks
    pub async fn supported(&self) -> Result<SupportedKinds> {
        let endpoint = Endpoint::Supported;
        tracing::debug!("Sending request to: {}", self.endpoint_url(endpoint));

        let request = self.client.get(self.endpoint_url(endpoint));
        let request = self.with_auth_headers(endpoint, request)?;
        let request = request
            .build()
            .map_err(|source| X402Error::RequestBuild { endpoint, source })?;

        self.execute(endpoint, request).await
    }

    /// POST the `{paymentPayload, paymentRequirements}` envelope to `endpoint`
    pub(crate) async fn post<P, R, T>(
        &self,
        endpoint: Endpoint,
        payment_payload: &P,
        payment_requirements: &R,
    ) -> Result<T>
    where
        P: Serialize,
        R: Serialize,
        T: DeserializeOwned,
    {
        let body = serde_json::to_vec(&FacilitatorRequest {
            payment_payload,
            payment_requirements,
        })
        .map_err(|source| X402Error::Serialization { endpoint, source })?;

        tracing::debug!(
            "Facilitator {} request body: {}",
            endpoint,
            String::from_utf8_lossy(&body)
        );
        tracing::debug!("Sending request to: {}", self.endpoint_url(endpoint));

        let request = self
            .client
            .post(self.endpoint_url(endpoint))
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        let request = self.with_auth_headers(endpoint, request)?;
        let request = request
            .build()
            .map_err(|source| X402Error::RequestBuild { endpoint, source })?;

        self.execute(endpoint, request).await
    }

    /// Send a built request and decode a `200 OK` body
    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        request: reqwest::Request,
    ) -> Result<T> {
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|source| X402Error::Transport { endpoint, source })?;
        let status = response.status();

        if status != StatusCode::OK {
            let body = response
                .text()
                .await
                .map(truncate_error_body)
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            tracing::error!(
                "Facilitator {} failed with status: {}. Response body: {}",
                endpoint,
                status,
                body
            );
            return Err(X402Error::UnexpectedStatus {
                endpoint,
                status,
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| X402Error::Transport { endpoint, source })?;

        serde_json::from_slice(&bytes).map_err(|source| X402Error::Decode { endpoint, source })
    }

    /// Add authentication headers for `endpoint`, if configured
    fn with_auth_headers(
        &self,
        endpoint: Endpoint,
        mut request: RequestBuilder,
    ) -> Result<RequestBuilder> {
        if let Some(auth_config) = &self.auth_config {
            let headers = auth_config()?;
            if let Some(endpoint_headers) = headers.get(endpoint.as_str()) {
                for (key, value) in endpoint_headers {
                    request = request.header(key, value);
                }
            }
        }
        Ok(request)
    }
}

/// Cut `body` to at most [`MAX_ERROR_BODY_BYTES`] on a char boundary
fn truncate_error_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY_BYTES {
        let mut end = MAX_ERROR_BODY_BYTES;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
        body.push_str("...");
    }
    body
}

#[async_trait]
impl Facilitator for FacilitatorClient {
    async fn verify(
        &self,
        payment_payload: &PaymentPayload,
        payment_requirements: &PaymentRequirements,
    ) -> Result<VerifyResponse> {
        FacilitatorClient::verify(self, payment_payload, payment_requirements).await
    }

    async fn settle(
        &self,
        payment_payload: &PaymentPayload,
        payment_requirements: &PaymentRequirements,
    ) -> Result<SettleResponse> {
        FacilitatorClient::settle(self, payment_payload, payment_requirements).await
    }
}

impl Default for FacilitatorClient {
    fn default() -> Self {
        Self::with_http_client(DEFAULT_FACILITATOR_URL, Client::new())
    }
}
