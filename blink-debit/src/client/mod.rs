//! High-level API client.
//!
//! [`BlinkDebitClient`] validates every request, then hands it to the
//! [`RequestExecutor`]. Operations are grouped by resource:
//!
//! - single consents ([`BlinkDebitClient::create_single_consent`] and friends)
//! - quick payments ([`BlinkDebitClient::create_quick_payment`] and friends)
//! - refunds ([`BlinkDebitClient::create_refund`] and friends)
//!
//! Every operation takes an optional `request_id`. When absent or blank a
//! fresh correlation id is generated; it stays the same across retries.
//!
//! # Examples
//!
//! ```rust,no_run
//! use blink_debit::{
//!     BlinkConfig, BlinkDebitClient,
//!     models::{Amount, AuthFlowDetail, Bank, Pcr, SingleConsentRequest},
//! };
//!
//! # async fn example() -> blink_debit::Result<()> {
//! let config = BlinkConfig::from_env()?;
//! let client = BlinkDebitClient::from_config(&config)?;
//!
//! let request = SingleConsentRequest::new(
//!     AuthFlowDetail::redirect(Bank::Pnz, "https://merchant.example.com/return").into(),
//!     Pcr::new("particulars", "code", "reference"),
//!     Amount::nzd("25.00"),
//! );
//! let created = client.create_single_consent(&request, None).await?;
//! let consent = client.get_single_consent(Some(created.consent_id), None).await?;
//! println!("Consent {} is {:?}", consent.consent_id, consent.status);
//! # Ok(())
//! # }
//! ```

mod consents;
mod quick_payments;
mod refunds;

use std::{fmt, sync::Arc};

use tracing::instrument;

use crate::{
    config::BlinkConfig,
    error::{BlinkError, Result},
    executor::RequestExecutor,
    identity::{AccessToken, ClientCredentials, CorrelationId, StaticToken, TokenProvider},
    transport::{HttpTransport, Transport},
};

/// Blink Debit API client.
///
/// Generic over the [`Transport`] and the [`TokenProvider`]; the defaults
/// talk HTTP and exchange client credentials for a token on every call.
pub struct BlinkDebitClient<T = HttpTransport, P = ClientCredentials<T>> {
    executor: RequestExecutor<T, P>,
}

impl<T, P: fmt::Debug> fmt::Debug for BlinkDebitClient<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlinkDebitClient").field("executor", &self.executor).finish()
    }
}

impl BlinkDebitClient {
    /// Creates an HTTP client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BlinkError::Config`] if the configuration is invalid or has
    /// no credentials, or [`BlinkError::Transport`] if the HTTP client cannot
    /// be built.
    pub fn from_config(config: &BlinkConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::with_config(&config.http)?;
        Self::with_transport(config, Arc::new(transport))
    }
}

impl<T: Transport> BlinkDebitClient<T, ClientCredentials<T>> {
    /// Creates a client over `transport`, minting tokens with the configured
    /// credentials.
    ///
    /// # Errors
    ///
    /// Returns [`BlinkError::Config`] if the configuration is invalid or has
    /// no credentials.
    pub fn with_transport(config: &BlinkConfig, transport: Arc<T>) -> Result<Self> {
        let credentials = config.credentials.as_ref().ok_or_else(|| {
            BlinkError::Config("credentials are required to mint access tokens".to_owned())
        })?;

        let provider = ClientCredentials::new(
            Arc::clone(&transport),
            config.base_url.clone(),
            config.endpoints.token.clone(),
            credentials.client_id.clone(),
            credentials.client_secret.clone(),
        );
        Self::with_provider(config, transport, provider)
    }
}

impl<T: Transport, P: TokenProvider> BlinkDebitClient<T, P> {
    /// Creates a client from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`BlinkError::Config`] if the configuration is invalid.
    pub fn with_provider(config: &BlinkConfig, transport: Arc<T>, provider: P) -> Result<Self> {
        config.validate()?;
        let executor = RequestExecutor::new(
            transport,
            provider,
            config.base_url.clone(),
            config.api_prefix.clone(),
            config.endpoints.clone(),
            config.retry.to_policy(),
        );
        Ok(Self { executor })
    }

    /// Returns a client sharing this one's transport and settings that sends
    /// a caller-supplied token instead.
    ///
    /// The token's expiry is checked before every call.
    ///
    /// # Errors
    ///
    /// Returns [`BlinkError::InvalidToken`] if `raw` is not a JWT with an
    /// `exp` claim.
    pub fn with_access_token(
        &self,
        raw: impl Into<String>,
    ) -> Result<BlinkDebitClient<T, StaticToken>> {
        let token = StaticToken::new(raw)?;
        Ok(BlinkDebitClient { executor: self.executor.with_static_token(token) })
    }

    /// Returns the request executor.
    pub const fn executor(&self) -> &RequestExecutor<T, P> {
        &self.executor
    }

    /// Obtains an access token from the provider.
    ///
    /// # Errors
    ///
    /// Returns the provider's error, e.g. [`BlinkError::Http`] when the token
    /// endpoint rejects the credentials.
    #[instrument(skip(self, request_id))]
    pub async fn access_token(&self, request_id: Option<&str>) -> Result<AccessToken> {
        let correlation_id = CorrelationId::resolve(request_id);
        self.executor.provider().access_token(&correlation_id).await
    }
}
