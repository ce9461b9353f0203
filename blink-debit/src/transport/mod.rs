//! Transport abstraction.
//!
//! A [`Transport`] sends one HTTP request and hands back the status, headers
//! and raw body, whatever the status. Decoding and error mapping happen in
//! [`TransportResponse`] and the executor, so tests can swap in an in-memory
//! transport without touching either.
//!
//! # Examples
//!
//! ```rust,no_run
//! use blink_debit::transport::{HttpTransport, RequestContext, Transport};
//!
//! # async fn example() -> blink_debit::Result<()> {
//! let transport = HttpTransport::new()?;
//!
//! let ctx = RequestContext {
//!     base_url: "https://sandbox.debit.blinkpay.co.nz",
//!     path: "/payments/v1/refunds/1c8a4f43-4c51-4bd5-a3d1-8f4fb14bdbb3",
//!     headers: vec![("Accept", "application/json")],
//!     content_type: None,
//! };
//!
//! let response = transport.get(ctx).await?;
//! println!("Status: {}", response.status);
//! # Ok(())
//! # }
//! ```

use std::{fmt, sync::Arc};

use serde::de::DeserializeOwned;

use crate::{
    error::{BlinkError, Result},
    models::ApiErrorResponse,
};

pub mod config;
pub mod http;

pub use config::{HttpConfig, HttpVersion};
pub use http::HttpTransport;

/// HTTP methods used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET, for lookups.
    Get,
    /// POST, for creates and token requests.
    Post,
    /// DELETE, for revokes.
    Delete,
}

impl Method {
    /// Returns the method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request context for transport operations.
#[derive(Debug, Clone)]
pub struct RequestContext<'a> {
    /// API base URL (e.g., <https://sandbox.debit.blinkpay.co.nz>).
    pub base_url: &'a str,
    /// Request path including any prefix (e.g., "/payments/v1/refunds").
    pub path: &'a str,
    /// HTTP headers to include.
    pub headers: Vec<(&'a str, &'a str)>,
    /// Content-Type header value (if applicable).
    pub content_type: Option<&'a str>,
}

impl RequestContext<'_> {
    /// Returns the value of the first header named `name`, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }
}

/// Response from transport operations.
#[derive(Debug, Clone, Default)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
    /// Response headers.
    pub headers: Vec<(String, String)>,
}

impl TransportResponse {
    /// Creates a JSON response, mostly useful for in-memory transports.
    pub fn json(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
            headers: vec![("content-type".to_owned(), "application/json".to_owned())],
        }
    }

    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Decodes a 2xx body into `T`.
    ///
    /// # Errors
    ///
    /// - [`BlinkError::Http`] for non-2xx statuses
    /// - [`BlinkError::Decode`] if the body does not match `T`
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T> {
        let response = self.error_for_status()?;
        serde_json::from_slice(&response.body).map_err(|e| BlinkError::Decode(e.to_string()))
    }

    /// Passes 2xx responses through and maps the rest with
    /// [`into_error`](Self::into_error).
    ///
    /// # Errors
    ///
    /// Returns [`BlinkError::Http`] for non-2xx statuses.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() { Ok(self) } else { Err(self.into_error()) }
    }

    /// Maps a non-2xx response to [`BlinkError::Http`].
    ///
    /// The message comes from the structured error body when there is one,
    /// then the raw body text, then the canonical reason phrase.
    #[must_use]
    pub fn into_error(self) -> BlinkError {
        let structured = serde_json::from_slice::<ApiErrorResponse>(&self.body)
            .ok()
            .and_then(|body| body.message().map(str::to_owned));

        let message = structured
            .or_else(|| {
                let text = String::from_utf8_lossy(&self.body);
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_owned())
            })
            .unwrap_or_else(|| {
                reqwest::StatusCode::from_u16(self.status)
                    .ok()
                    .and_then(|status| status.canonical_reason())
                    .unwrap_or("unknown status")
                    .to_owned()
            });

        BlinkError::Http { status: self.status, message }
    }
}

/// Transport abstraction.
///
/// Implementations return a [`TransportResponse`] for every status the server
/// sends; only failures to get a response at all are errors
/// ([`BlinkError::Network`], or [`BlinkError::Transport`] when the request
/// cannot be built).
///
/// # Examples
///
/// An in-memory transport answering every request with the same body:
///
/// ```
/// use blink_debit::transport::{Method, RequestContext, Transport, TransportResponse};
///
/// struct Canned(&'static str);
///
/// impl Transport for Canned {
///     async fn send<'a>(
///         &'a self,
///         _method: Method,
///         _ctx: RequestContext<'a>,
///         _body: Option<&'a [u8]>,
///     ) -> blink_debit::Result<TransportResponse> {
///         Ok(TransportResponse::json(200, self.0))
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Sends one request.
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be built or no response arrives.
    fn send<'a>(
        &'a self,
        method: Method,
        ctx: RequestContext<'a>,
        body: Option<&'a [u8]>,
    ) -> impl Future<Output = Result<TransportResponse>> + Send + 'a;

    /// Executes a GET request.
    ///
    /// # Errors
    ///
    /// See [`Transport::send`].
    fn get<'a>(
        &'a self,
        ctx: RequestContext<'a>,
    ) -> impl Future<Output = Result<TransportResponse>> + Send + 'a {
        self.send(Method::Get, ctx, None)
    }

    /// Executes a POST request with body.
    ///
    /// # Errors
    ///
    /// See [`Transport::send`].
    fn post<'a>(
        &'a self,
        ctx: RequestContext<'a>,
        body: &'a [u8],
    ) -> impl Future<Output = Result<TransportResponse>> + Send + 'a {
        self.send(Method::Post, ctx, Some(body))
    }
}

impl<T: Transport> Transport for Arc<T> {
    fn send<'a>(
        &'a self,
        method: Method,
        ctx: RequestContext<'a>,
        body: Option<&'a [u8]>,
    ) -> impl Future<Output = Result<TransportResponse>> + Send + 'a {
        (**self).send(method, ctx, body)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        refund_id: String,
    }

    #[test]
    fn test_request_context_header_lookup() {
        let ctx = RequestContext {
            base_url: "https://example.com",
            path: "/test",
            headers: vec![("request-id", "abc"), ("Accept", "application/json")],
            content_type: None,
        };
        assert_eq!(ctx.header("Request-ID"), Some("abc"));
        assert_eq!(ctx.header("interaction-id"), None);
    }

    #[test]
    fn test_into_json_success() {
        let response = TransportResponse::json(201, r#"{"refund_id":"r-1"}"#);
        let body: Body = response.into_json().unwrap();
        assert_eq!(body.refund_id, "r-1");
    }

    #[test]
    fn test_into_json_malformed_2xx_is_decode_error() {
        let response = TransportResponse::json(200, "{not json");
        let error = response.into_json::<Body>().unwrap_err();
        assert!(matches!(error, BlinkError::Decode(_)));
        assert!(error.was_sent());
    }

    #[test]
    fn test_error_message_from_structured_body() {
        let response = TransportResponse::json(
            422,
            r#"{"status":422,"error":"Unprocessable Entity","message":"Bank is unavailable"}"#,
        );
        let error = response.into_json::<Body>().unwrap_err();
        assert!(matches!(
            error,
            BlinkError::Http { status: 422, ref message } if message == "Bank is unavailable"
        ));
    }

    #[test]
    fn test_error_message_falls_back_to_text_then_reason() {
        let error = TransportResponse::json(502, "upstream down").into_error();
        assert_eq!(error.to_string(), "HTTP 502: upstream down");

        let error = TransportResponse { status: 404, ..TransportResponse::default() }.into_error();
        assert_eq!(error.to_string(), "HTTP 404: Not Found");
    }

    #[test]
    fn test_error_for_status() {
        let response = TransportResponse { status: 204, ..TransportResponse::default() };
        assert_eq!(response.error_for_status().unwrap().status, 204);
        let error = TransportResponse::json(409, "{}").error_for_status().unwrap_err();
        assert_eq!(error.status(), Some(409));
    }

    #[test]
    fn test_method_names() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Post.as_str(), "POST");
        assert_eq!(Method::Delete.as_str(), "DELETE");
    }
}
