//! Error types for the Blink Debit SDK.
//!
//! Every fallible operation in this crate returns [`Result<T>`], which uses
//! [`BlinkError`] as the error type. All errors implement
//! [`std::error::Error`] via [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Pre-network** ([`BlinkError::Validation`], [`BlinkError::ExpiredToken`],
//!   [`BlinkError::InvalidToken`], [`BlinkError::Transport`],
//!   [`BlinkError::Config`]): the request was never sent
//! - **Server** ([`BlinkError::Http`]): the API answered with a non-2xx status
//! - **Network** ([`BlinkError::Network`]): the request may or may not have
//!   reached the API
//! - **Decode** ([`BlinkError::Decode`]): the API answered 2xx with a body that
//!   does not match the expected shape
//!
//! # Examples
//!
//! ```
//! use blink_debit::error::{BlinkError, ValidationError};
//!
//! let error = BlinkError::from(ValidationError::rule("Payment ID must not be null"));
//! assert_eq!(error.to_string(), "Payment ID must not be null");
//! assert!(!error.was_sent());
//! ```

use std::fmt;

use thiserror::Error;

/// Result type alias for SDK operations.
pub type Result<T> = std::result::Result<T, BlinkError>;

/// Errors that can occur while building, sending or decoding an API call.
///
/// # Error Recovery
///
/// - **Transient errors** ([`Network`](Self::Network), [`Http`](Self::Http)
///   with status 429 or 5xx): retried by the [`RetryPolicy`] when the
///   operation is enabled for retry
/// - **Validation errors** ([`Validation`](Self::Validation)): fix the input
/// - **Token errors** ([`ExpiredToken`](Self::ExpiredToken),
///   [`InvalidToken`](Self::InvalidToken)): obtain a fresh access token
///
/// [`RetryPolicy`]: crate::reliability::RetryPolicy
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum BlinkError {
    /// The request failed client-side validation and was not sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The caller-supplied access token has already expired.
    ///
    /// # Recovery
    ///
    /// Request a new token from the OAuth token endpoint, or configure the
    /// client with client credentials so tokens are minted per call.
    #[error("access token has expired")]
    ExpiredToken,

    /// The caller-supplied access token is not a decodable JWT.
    #[error("invalid access token: {0}")]
    InvalidToken(String),

    /// The API responded with a non-2xx status.
    ///
    /// The message is taken from the structured error body when present.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code returned by the API.
        status: u16,
        /// Server-provided error message.
        message: String,
    },

    /// Transport-level failure: connection refused or reset, DNS failure,
    /// TLS failure or timeout.
    ///
    /// # Recovery
    ///
    /// Retry with backoff. Note that for create operations the API may have
    /// processed the request before the failure was observed.
    #[error("network error: {0}")]
    Network(String),

    /// A 2xx response body could not be decoded into the expected type.
    #[error("failed to decode response body: {0}")]
    Decode(String),

    /// The request could not be built: invalid base URL, path or header.
    #[error("transport error: {0}")]
    Transport(String),

    /// SDK configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl BlinkError {
    /// Returns `true` if the request reached the transport.
    ///
    /// Validation, token, configuration and request-building errors are
    /// raised before anything is sent.
    #[must_use]
    pub const fn was_sent(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Network(_) | Self::Decode(_))
    }

    /// Returns the HTTP status for [`BlinkError::Http`] errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BlinkError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_builder() {
            Self::Transport(error.to_string())
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Network(error.to_string())
        }
    }
}

/// A client-side validation failure.
///
/// The fail-fast rules produce [`ValidationError::Rule`] with one specific
/// message. The final constraint sweep produces
/// [`ValidationError::Constraints`] listing every remaining violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A single rule failed.
    Rule(String),
    /// One or more declared field constraints failed.
    Constraints {
        /// What was being validated, e.g. "refund request".
        subject: &'static str,
        /// Every violation found, in field declaration order.
        violations: Vec<ConstraintViolation>,
    },
}

impl ValidationError {
    /// Creates a single-rule validation error.
    pub fn rule(message: impl Into<String>) -> Self {
        Self::Rule(message.into())
    }

    /// Returns the violations of a constraint sweep, or an empty slice.
    #[must_use]
    pub fn violations(&self) -> &[ConstraintViolation] {
        match self {
            Self::Rule(_) => &[],
            Self::Constraints { violations, .. } => violations,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rule(message) => f.write_str(message),
            Self::Constraints { subject, violations } => {
                write!(f, "Validation failed for {subject}: ")?;
                for (i, violation) in violations.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{violation}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// One failed field constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    /// Dotted path to the field, e.g. `amount.total`.
    pub field: String,
    /// What the constraint requires.
    pub message: String,
}

impl ConstraintViolation {
    /// Creates a violation for `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_display_is_the_message() {
        let error = BlinkError::from(ValidationError::rule("Refund ID must not be null"));
        assert_eq!(error.to_string(), "Refund ID must not be null");
    }

    #[test]
    fn test_constraints_display_lists_all_pairs() {
        let error = ValidationError::Constraints {
            subject: "refund request",
            violations: vec![
                ConstraintViolation::new("amount.total", "must match \"^\\d{1,10}\\.\\d{1,2}$\""),
                ConstraintViolation::new("amount.currency", "must not be null"),
            ],
        };
        assert_eq!(
            error.to_string(),
            "Validation failed for refund request: amount.total: must match \
             \"^\\d{1,10}\\.\\d{1,2}$\", amount.currency: must not be null"
        );
        assert_eq!(error.violations().len(), 2);
    }

    #[test]
    fn test_http_error_display() {
        let error = BlinkError::Http { status: 422, message: "Bank is unavailable".to_owned() };
        assert_eq!(error.to_string(), "HTTP 422: Bank is unavailable");
        assert_eq!(error.status(), Some(422));
    }

    #[test]
    fn test_was_sent() {
        assert!(!BlinkError::ExpiredToken.was_sent());
        assert!(!BlinkError::Config("bad".to_owned()).was_sent());
        assert!(!BlinkError::Transport("bad".to_owned()).was_sent());
        assert!(BlinkError::Network("reset".to_owned()).was_sent());
        assert!(BlinkError::Decode("eof".to_owned()).was_sent());
        assert!(BlinkError::Http { status: 500, message: String::new() }.was_sent());
    }

    #[test]
    fn test_expired_token_display() {
        assert_eq!(BlinkError::ExpiredToken.to_string(), "access token has expired");
    }
}
