//! # x402 Facilitator Client
//!
//! An HTTP client for x402 payment facilitators. A resource server that
//! answers `402 Payment Required` hands the payment it receives to a
//! facilitator, first to **verify** it and then to **settle** it on chain.
//! This crate implements that handshake over HTTP+JSON.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use x402_facilitator_client::{FacilitatorClient, FacilitatorConfig};
//! use x402_facilitator_client::types::{PaymentPayload, PaymentRequirements};
//! use std::time::Duration;
//!
//! # async fn run(
//! #     payload: PaymentPayload,
//! #     requirements: PaymentRequirements,
//! # ) -> x402_facilitator_client::Result<()> {
//! // An empty URL selects https://x402.org/facilitator
//! let client = FacilitatorClient::new(
//!     FacilitatorConfig::new("").with_timeout(Duration::from_secs(10)),
//! )?;
//!
//! let verified = client.verify(&payload, &requirements).await?;
//! if verified.is_valid {
//!     let settled = client.settle(&payload, &requirements).await?;
//!     println!("settled in {}", settled.transaction);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - **`facilitator`**: the [`FacilitatorClient`] and the [`Facilitator`] trait
//! - **`types`**: payment payloads, requirements and facilitator responses
//! - **`error`**: the [`X402Error`] taxonomy
//!
//! ## Errors
//!
//! Calls never retry. Each failure is reported as its own variant:
//! serialization, request construction, transport (including timeouts),
//! unexpected HTTP status, and response decoding.

pub mod error;
pub mod facilitator;
pub mod types;

pub use error::{Result, X402Error};
pub use facilitator::{Endpoint, Facilitator, FacilitatorClient};
pub use types::{
    ExactEvmPayload, ExactEvmPayloadAuthorization, FacilitatorConfig, PaymentPayload,
    PaymentRequirements, SettleResponse, SupportedKind, SupportedKinds, VerifyResponse,
    DEFAULT_FACILITATOR_URL, X402_VERSION,
};

/// Current version of this library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constants() {
        assert_eq!(X402_VERSION, 1);
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_default_facilitator_url() {
        assert_eq!(DEFAULT_FACILITATOR_URL, "https://x402.org/facilitator");
    }
}
