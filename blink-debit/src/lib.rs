//! Blink Debit: client SDK for the Blink Debit bank-payment API
//!
//! A Rust library for creating and tracking New Zealand bank payments through
//! the Blink Debit API. It builds validated requests for single consents,
//! quick payments and refunds, attaches authentication and correlation
//! metadata, sends them over HTTPS and decodes the tagged response bodies into
//! typed results.
//!
//! # What is in the box?
//!
//! - **Tagged request and response models**: authorisation flows, flow hints
//!   and refund details are enums, serialised with a `type` discriminator
//! - **Validation before sending**: ordered fail-fast rules with fixed
//!   messages, then one sweep reporting every malformed field
//! - **Identity per call**: correlation ids, caller tokens with expiry checks
//!   or client-credentials exchange
//! - **Bounded retry**: exponential or fixed backoff for network failures and
//!   429/5xx responses
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │   BlinkDebitClient   │  create / get / revoke
//! └──────────┬───────────┘
//!            │ validation (no I/O)
//! ┌──────────▼───────────┐      ┌─────────────────┐
//! │   RequestExecutor    │──────│  TokenProvider  │  static token or
//! │  (retry, headers)    │      └─────────────────┘  client credentials
//! └──────────┬───────────┘
//!            │ Transport
//! ┌──────────▼───────────┐
//! │  Blink Debit API     │  /payments/v1/...
//! └──────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## 1. Create a Consent
//!
//! ```rust,no_run
//! use blink_debit::{
//!     BlinkConfig, BlinkDebitClient,
//!     models::{Amount, AuthFlowDetail, Bank, Pcr, SingleConsentRequest},
//! };
//!
//! # async fn example() -> blink_debit::Result<()> {
//! let config = BlinkConfig::new(
//!     "https://sandbox.debit.blinkpay.co.nz",
//!     "my-client-id",
//!     "my-client-secret",
//! );
//! let client = BlinkDebitClient::from_config(&config)?;
//!
//! let request = SingleConsentRequest::new(
//!     AuthFlowDetail::redirect(Bank::Pnz, "https://merchant.example.com/return").into(),
//!     Pcr::new("particulars", "code", "reference"),
//!     Amount::nzd("25.00"),
//! );
//!
//! let created = client.create_single_consent(&request, None).await?;
//! println!("Send the customer to {:?}", created.redirect_uri);
//! # Ok(())
//! # }
//! ```
//!
//! ## 2. Refund a Payment with a Caller Token
//!
//! ```rust,no_run
//! use blink_debit::{
//!     BlinkConfig, BlinkDebitClient,
//!     models::{AccountNumberRefundRequest, RefundDetail},
//! };
//! use uuid::Uuid;
//!
//! # async fn example(token: String, payment_id: Uuid) -> blink_debit::Result<()> {
//! let client = BlinkDebitClient::from_config(&BlinkConfig::from_file("blink.toml")?)?
//!     .with_access_token(token)?;
//!
//! let refund = RefundDetail::AccountNumber(AccountNumberRefundRequest {
//!     payment_id: Some(payment_id),
//! });
//! let created = client.create_refund(&refund, Some("order-1234")).await?;
//! let refund = client.get_refund(Some(created.refund_id), Some("order-1234")).await?;
//! println!("Payer account: {:?}", refund.account_number);
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`client`]: High-level client grouped by resource
//! - [`models`]: Request and response bodies
//! - [`validation`]: Client-side request validation
//! - [`identity`]: Correlation ids, access tokens and token providers
//! - [`executor`]: Request building, dispatch and decoding
//! - [`transport`]: Transport abstraction and the reqwest implementation
//! - [`reliability`]: Retry with backoff
//! - [`config`]: TOML configuration
//! - [`error`]: Error types with recovery guidance
//!
//! # Error Handling
//!
//! All operations return [`Result<T, BlinkError>`](error::Result).
//! [`BlinkError::was_sent`] tells errors raised before anything was sent apart
//! from failures of a request that reached the API:
//!
//! ```rust
//! use blink_debit::{BlinkError, reliability::is_retryable};
//!
//! fn report(error: &BlinkError) {
//!     match error {
//!         BlinkError::Validation(e) => eprintln!("fix the request: {e}"),
//!         BlinkError::ExpiredToken => eprintln!("get a new token"),
//!         BlinkError::Http { status, message } => eprintln!("API said {status}: {message}"),
//!         e if is_retryable(e) => eprintln!("transient: {e}"),
//!         e => eprintln!("failed: {e}"),
//!     }
//! }
//!
//! report(&BlinkError::Network("connection reset".to_owned()));
//! ```
//!
//! # Logging
//!
//! The library emits [`tracing`] spans and events and never installs a
//! subscriber. Access tokens and client secrets are never logged.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest and wiremock"
)]

pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod identity;
pub mod models;
pub mod reliability;
pub mod transport;
pub mod validation;

pub use client::BlinkDebitClient;
pub use config::BlinkConfig;
pub use error::{BlinkError, Result, ValidationError};
pub use executor::Operation;
