//! Error body returned by the API on non-2xx responses.

use serde::Deserialize;

/// Structured error body. Every field is optional because gateways and the
/// OAuth endpoint use different shapes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiErrorResponse {
    /// Server timestamp.
    pub timestamp: Option<String>,
    /// HTTP status echoed in the body.
    pub status: Option<u16>,
    /// Short error name, e.g. `Unprocessable Entity`.
    pub error: Option<String>,
    /// Human-readable message.
    pub message: Option<String>,
    /// Request path.
    pub path: Option<String>,
    /// OAuth2 error description.
    pub error_description: Option<String>,
}

impl ApiErrorResponse {
    /// Returns the most specific non-blank message in the body.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        [&self.message, &self.error_description, &self.error]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|text| !text.trim().is_empty())
    }
}
