//! HTTP transport implementation.
//!
//! HTTP/1.1 and HTTP/2 over rustls using reqwest.

use reqwest::Client;
use tracing::instrument;
use url::{Host, Url};

use super::config::{HttpConfig, HttpVersion};
use crate::{
    error::{BlinkError, Result},
    transport::{Method, RequestContext, Transport, TransportResponse},
};

/// Validates URL for security constraints.
///
/// HTTPS is required unless the host is a loopback address, which keeps
/// local mock servers usable.
fn validate_url(url: &Url) -> Result<()> {
    match url.scheme() {
        "https" => Ok(()),
        "http" if is_loopback(url) => Ok(()),
        _ => Err(BlinkError::Transport("Only HTTPS URLs are allowed".to_owned())),
    }
}

/// Returns `true` for `localhost` and loopback IP hosts.
pub(crate) fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

/// Rejects paths containing directory traversal sequences.
fn sanitize_path(path: &str) -> Result<&str> {
    if path.contains("..") || path.contains("//") {
        return Err(BlinkError::Transport(
            "Invalid path: traversal sequences not allowed".to_owned(),
        ));
    }
    if !path.starts_with('/') {
        return Err(BlinkError::Transport("Path must start with '/'".to_owned()));
    }
    Ok(path)
}

/// Validates header name and value for CRLF injection prevention.
fn validate_header(name: &str, value: &str) -> Result<()> {
    let has_control = |text: &str| text.contains(['\r', '\n', '\0']);
    if has_control(name) {
        return Err(BlinkError::Transport(
            "Invalid header name: control characters not allowed".to_owned(),
        ));
    }
    if has_control(value) {
        return Err(BlinkError::Transport(
            "Invalid header value: control characters not allowed".to_owned(),
        ));
    }
    Ok(())
}

/// HTTP/1.1 and HTTP/2 transport using reqwest.
///
/// Cloning is cheap; clones share the connection pool.
///
/// # Examples
///
/// ```
/// use blink_debit::transport::{HttpConfig, HttpTransport, HttpVersion};
///
/// let config = HttpConfig { timeout_secs: 60, http_version: HttpVersion::Http1, ..HttpConfig::default() };
/// let transport = HttpTransport::with_config(&config).unwrap();
/// assert_eq!(transport.protocol_name(), "http/1.1");
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    http_version: HttpVersion,
}

impl HttpTransport {
    /// Creates a transport with default settings: 100 idle connections per
    /// host, 30s timeout, 10s connect timeout, negotiated HTTP version.
    ///
    /// # Errors
    ///
    /// Returns error if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self> {
        Self::with_config(&HttpConfig::default())
    }

    /// Creates HTTP transport with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is out of bounds or the HTTP client
    /// cannot be built.
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout());

        builder = match config.http_version {
            HttpVersion::Http1 => builder.http1_only(),
            HttpVersion::Http2 => builder.http2_prior_knowledge(),
            HttpVersion::Auto => builder,
        };

        let client = builder.build().map_err(|e| BlinkError::Transport(e.to_string()))?;

        Ok(Self { client, http_version: config.http_version })
    }

    /// Returns the protocol name for logging.
    #[must_use]
    pub const fn protocol_name(&self) -> &'static str {
        match self.http_version {
            HttpVersion::Http1 => "http/1.1",
            HttpVersion::Http2 => "http/2",
            HttpVersion::Auto => "http",
        }
    }

    #[instrument(
        skip(self, ctx, body),
        fields(
            method = %method,
            base_url = ctx.base_url,
            path = ctx.path,
            status = tracing::field::Empty
        )
    )]
    async fn execute_request(
        &self,
        method: Method,
        ctx: RequestContext<'_>,
        body: Option<&[u8]>,
    ) -> Result<TransportResponse> {
        let url = Url::parse(ctx.base_url)
            .map_err(|e| BlinkError::Transport(format!("invalid base_url: {e}")))?;
        validate_url(&url)?;

        let path = sanitize_path(ctx.path)?;
        for (key, value) in &ctx.headers {
            validate_header(key, value)?;
        }

        let full_url = format!("{}{path}", ctx.base_url.trim_end_matches('/'));

        let mut request = match method {
            Method::Get => self.client.get(&full_url),
            Method::Post => self.client.post(&full_url),
            Method::Delete => self.client.delete(&full_url),
        };

        if let Some(content_type) = ctx.content_type {
            request = request.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        for (key, value) in ctx.headers {
            request = request.header(key, value);
        }
        if let Some(body) = body {
            request = request.body(body.to_vec());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        tracing::Span::current().record("status", status);

        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_owned()))
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(TransportResponse { status, body, headers })
    }
}

impl Transport for HttpTransport {
    async fn send<'a>(
        &'a self,
        method: Method,
        ctx: RequestContext<'a>,
        body: Option<&'a [u8]>,
    ) -> Result<TransportResponse> {
        self.execute_request(method, ctx, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(base_url: &'a str, path: &'a str) -> RequestContext<'a> {
        RequestContext { base_url, path, headers: vec![], content_type: None }
    }

    #[test]
    fn test_is_loopback() {
        let local = ["http://localhost:8080", "http://LOCALHOST", "http://127.0.0.1:9", "http://[::1]"];
        for url in local {
            assert!(is_loopback(&Url::parse(url).unwrap()), "{url}");
        }
        let remote = ["http://debit.blinkpay.co.nz", "http://10.0.0.1", "http://localhost.evil.com"];
        for url in remote {
            assert!(!is_loopback(&Url::parse(url).unwrap()), "{url}");
        }
    }

    #[test]
    fn test_http_transport_new() {
        let transport = HttpTransport::new().unwrap();
        assert_eq!(transport.protocol_name(), "http");
    }

    #[test]
    fn test_with_config_rejects_out_of_bounds() {
        let config = HttpConfig { timeout_secs: 0, ..HttpConfig::default() };
        assert!(matches!(HttpTransport::with_config(&config), Err(BlinkError::Config(_))));
    }

    #[test]
    fn test_validate_url() {
        let allowed = [
            "https://sandbox.debit.blinkpay.co.nz",
            "http://localhost:8080",
            "http://127.0.0.1:9000",
            "http://[::1]:9000",
        ];
        for url in allowed {
            assert!(validate_url(&Url::parse(url).unwrap()).is_ok(), "{url}");
        }
        for url in ["http://debit.blinkpay.co.nz", "ftp://127.0.0.1"] {
            assert!(validate_url(&Url::parse(url).unwrap()).is_err(), "{url}");
        }
    }

    #[test]
    fn test_sanitize_path() {
        assert!(sanitize_path("/payments/v1/refunds").is_ok());
        assert!(sanitize_path("/payments/../admin").is_err());
        assert!(sanitize_path("//evil.example.com").is_err());
        assert!(sanitize_path("refunds").is_err());
    }

    #[test]
    fn test_validate_header() {
        assert!(validate_header("request-id", "abc").is_ok());
        assert!(validate_header("request-id", "abc\r\nX-Evil: 1").is_err());
        assert!(validate_header("bad\nname", "v").is_err());
    }

    #[tokio::test]
    async fn test_invalid_base_url_is_not_sent() {
        let transport = HttpTransport::new().unwrap();
        let error = transport.get(ctx("not-a-url", "/test")).await.unwrap_err();
        assert!(matches!(error, BlinkError::Transport(_)));
        assert!(!error.was_sent());
    }

    #[tokio::test]
    async fn test_plain_http_remote_host_rejected() {
        let transport = HttpTransport::new().unwrap();
        let error = transport.get(ctx("http://debit.blinkpay.co.nz", "/test")).await.unwrap_err();
        assert!(matches!(error, BlinkError::Transport(_)));
    }

    #[tokio::test]
    async fn test_header_injection_rejected() {
        let transport = HttpTransport::new().unwrap();
        let mut request = ctx("https://debit.blinkpay.co.nz", "/test");
        request.headers.push(("request-id", "x\r\nAuthorization: Bearer stolen"));
        let error = transport.get(request).await.unwrap_err();
        assert!(matches!(error, BlinkError::Transport(_)));
    }
}
