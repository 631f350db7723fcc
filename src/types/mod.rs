//! Data contracts exchanged with an x402 facilitator
//!
//! The facilitator client treats these as serialize/deserialize targets only.
//! Their shapes follow the x402 v1 scheme shared with wallets and
//! resource-server middleware.
//!
//! - [`payment`] - Payment requirements and payload structures
//! - [`facilitator`] - Facilitator configuration and response types
//!
//! # Example
//!
//! ```
//! use x402_facilitator_client::types::FacilitatorConfig;
//! use std::time::Duration;
//!
//! let config = FacilitatorConfig::new("https://x402.org/facilitator")
//!     .with_timeout(Duration::from_secs(30));
//! assert_eq!(config.effective_url(), "https://x402.org/facilitator");
//! ```

pub mod facilitator;
pub mod payment;

pub use facilitator::{
    AuthHeadersFn, AuthHeadersFnArc, AuthHeadersFnBox, FacilitatorConfig, SettleResponse,
    SupportedKind, SupportedKinds, TransportOption, VerifyResponse, DEFAULT_FACILITATOR_URL,
    FACILITATOR_TIMEOUT_ENV, FACILITATOR_URL_ENV,
};
pub use payment::{
    ExactEvmPayload, ExactEvmPayloadAuthorization, PaymentPayload, PaymentRequirements,
    X402_VERSION,
};
