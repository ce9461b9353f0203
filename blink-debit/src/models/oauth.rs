//! OAuth2 client-credentials exchange.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Grant type sent to the token endpoint.
pub const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";

/// Body of a token request.
#[derive(Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessTokenRequest<'a> {
    /// OAuth2 client ID.
    pub client_id: &'a str,
    /// OAuth2 client secret.
    pub client_secret: &'a str,
    /// Always `client_credentials`.
    pub grant_type: &'static str,
}

impl<'a> AccessTokenRequest<'a> {
    /// Creates a client-credentials request.
    #[must_use]
    pub const fn client_credentials(client_id: &'a str, client_secret: &'a str) -> Self {
        Self { client_id, client_secret, grant_type: CLIENT_CREDENTIALS_GRANT }
    }
}

impl fmt::Debug for AccessTokenRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessTokenRequest")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("grant_type", &self.grant_type)
            .finish()
    }
}

/// Token endpoint response.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AccessTokenResponse {
    /// The bearer JWT.
    pub access_token: String,
    /// Usually `Bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Granted scopes.
    #[serde(default)]
    pub scope: Option<String>,
}

impl fmt::Debug for AccessTokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessTokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish()
    }
}
