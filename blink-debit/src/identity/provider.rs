use std::{fmt, sync::Arc};

use chrono::Utc;
use tracing::instrument;
use zeroize::Zeroizing;

use super::{AccessToken, CorrelationId, USER_AGENT};
use crate::{
    error::{BlinkError, Result},
    models::{AccessTokenRequest, AccessTokenResponse},
    transport::{RequestContext, Transport},
};

/// Supplies the bearer token for each attempt of an API call.
///
/// Called once per attempt, so a retried call asks for a token again.
pub trait TokenProvider: Send + Sync {
    /// Returns a token usable right now.
    ///
    /// # Errors
    ///
    /// Returns [`BlinkError::ExpiredToken`] for an expired caller token, or
    /// any error raised while minting a new one.
    fn access_token<'a>(
        &'a self,
        correlation_id: &'a CorrelationId,
    ) -> impl Future<Output = Result<AccessToken>> + Send + 'a;
}

/// A caller-supplied token, checked for expiry before every use.
///
/// # Examples
///
/// ```
/// use blink_debit::identity::StaticToken;
///
/// assert!(StaticToken::new("not-a-jwt").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct StaticToken {
    token: AccessToken,
}

impl StaticToken {
    /// Parses a caller-supplied JWT.
    ///
    /// # Errors
    ///
    /// Returns [`BlinkError::InvalidToken`] if the token cannot be decoded.
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        Ok(Self { token: AccessToken::parse(raw)? })
    }
}

impl From<AccessToken> for StaticToken {
    fn from(token: AccessToken) -> Self {
        Self { token }
    }
}

impl TokenProvider for StaticToken {
    async fn access_token<'a>(&'a self, _correlation_id: &'a CorrelationId) -> Result<AccessToken> {
        self.token.ensure_not_expired(Utc::now())?;
        Ok(self.token.clone())
    }
}

/// Exchanges client credentials for a fresh token on every call.
///
/// Tokens are not cached.
pub struct ClientCredentials<T> {
    transport: Arc<T>,
    base_url: String,
    token_path: String,
    client_id: String,
    client_secret: Zeroizing<String>,
}

impl<T> ClientCredentials<T> {
    /// Creates a provider posting to `base_url` + `token_path`.
    pub fn new(
        transport: Arc<T>,
        base_url: impl Into<String>,
        token_path: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: Zeroizing<String>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            token_path: token_path.into(),
            client_id: client_id.into(),
            client_secret,
        }
    }
}

impl<T> fmt::Debug for ClientCredentials<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("base_url", &self.base_url)
            .field("token_path", &self.token_path)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl<T: Transport> TokenProvider for ClientCredentials<T> {
    #[instrument(skip_all, fields(correlation_id = %correlation_id, client_id = %self.client_id))]
    async fn access_token<'a>(&'a self, correlation_id: &'a CorrelationId) -> Result<AccessToken> {
        let request = AccessTokenRequest::client_credentials(&self.client_id, &self.client_secret);
        let body = Zeroizing::new(
            serde_json::to_vec(&request).map_err(|e| BlinkError::Transport(e.to_string()))?,
        );

        let ctx = RequestContext {
            base_url: &self.base_url,
            path: &self.token_path,
            headers: vec![
                ("request-id", correlation_id.as_str()),
                ("Accept", "application/json"),
                ("User-Agent", USER_AGENT),
            ],
            content_type: Some("application/json"),
        };

        let response: AccessTokenResponse = self.transport.post(ctx, &body).await?.into_json()?;
        tracing::debug!(expires_in = ?response.expires_in, "minted access token");

        Ok(AccessToken::minted(response.access_token))
    }
}
