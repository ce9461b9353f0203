use std::fmt;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::error::{BlinkError, Result};

#[derive(Deserialize)]
struct Claims {
    exp: Option<i64>,
}

/// A bearer access token.
///
/// Tokens supplied by the caller are JWTs whose `exp` claim is decoded up
/// front so expiry can be checked without a network call. The signature is
/// not verified; that is the API's job.
#[derive(Clone)]
pub struct AccessToken {
    raw: Zeroizing<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Parses a caller-supplied JWT and reads its `exp` claim.
    ///
    /// # Errors
    ///
    /// Returns [`BlinkError::InvalidToken`] if the token is not a JWT or has
    /// no usable `exp` claim.
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = Zeroizing::new(raw.into());
        let expires_at = decode_expiry(&raw)?;
        Ok(Self { raw, expires_at: Some(expires_at) })
    }

    /// Wraps a freshly minted token without inspecting it.
    pub fn minted(raw: impl Into<String>) -> Self {
        Self { raw: Zeroizing::new(raw.into()), expires_at: None }
    }

    /// Returns the decoded expiry, if known.
    #[must_use]
    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns `true` if the token expired before `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < now)
    }

    /// Fails if the token expired before `now`.
    ///
    /// # Errors
    ///
    /// Returns [`BlinkError::ExpiredToken`].
    pub fn ensure_not_expired(&self, now: DateTime<Utc>) -> Result<()> {
        if self.is_expired_at(now) { Err(BlinkError::ExpiredToken) } else { Ok(()) }
    }

    /// Returns the `Authorization` header value.
    #[must_use]
    pub fn bearer(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("Bearer {}", self.raw.as_str()))
    }

    /// Returns the raw token.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.raw
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

fn decode_expiry(raw: &str) -> Result<DateTime<Utc>> {
    let mut parts = raw.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(BlinkError::InvalidToken("expected three dot-separated segments".to_owned()));
    };

    let payload = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| BlinkError::InvalidToken(format!("payload is not base64url: {e}")))?;
    let claims: Claims = serde_json::from_slice(&payload)
        .map_err(|e| BlinkError::InvalidToken(format!("payload is not JSON: {e}")))?;
    let exp = claims.exp.ok_or_else(|| BlinkError::InvalidToken("missing exp claim".to_owned()))?;

    DateTime::from_timestamp(exp, 0)
        .ok_or_else(|| BlinkError::InvalidToken(format!("exp claim out of range: {exp}")))
}

#[cfg(test)]
pub(crate) fn test_jwt(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"merchant","exp":{exp}}}"#));
    format!("{header}.{payload}.c2lnbmF0dXJl")
}
