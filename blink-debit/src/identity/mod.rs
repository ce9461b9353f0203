//! Per-call identity: correlation id, bearer token and user agent.
//!
//! Two token modes are supported:
//!
//! - [`StaticToken`]: the caller supplies a JWT; its `exp` claim is checked
//!   before every attempt and an expired token fails with
//!   [`BlinkError::ExpiredToken`](crate::BlinkError::ExpiredToken) without
//!   touching the network.
//! - [`ClientCredentials`]: the SDK holds a client id and secret and mints a
//!   fresh token from the OAuth2 token endpoint for every attempt.

mod correlation;
mod provider;
mod token;

pub use correlation::CorrelationId;
pub use provider::{ClientCredentials, StaticToken, TokenProvider};
pub use token::AccessToken;

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("Rust/Blink SDK ", env!("CARGO_PKG_VERSION"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_carries_version() {
        assert!(USER_AGENT.starts_with("Rust/Blink SDK "));
        assert!(USER_AGENT.ends_with(env!("CARGO_PKG_VERSION")));
    }
}
