//! SDK configuration.
//!
//! Configuration is usually loaded from TOML:
//!
//! ```toml
//! base_url = "https://sandbox.debit.blinkpay.co.nz"
//! api_prefix = "/payments/v1"
//!
//! [credentials]
//! client_id = "my-client-id"
//! client_secret = "my-client-secret"
//!
//! [http]
//! timeout_secs = 30
//!
//! [retry]
//! max_attempts = 3
//! backoff = "exponential"
//! operations = ["get_consent", "get_refund"]
//! ```

use std::{fmt, path::Path, time::Duration};

use serde::{Deserialize, Deserializer};
use url::Url;
use zeroize::Zeroizing;

use crate::{
    error::{BlinkError, Result},
    executor::Operation,
    reliability::{Backoff, RetryPolicy},
    transport::{HttpConfig, http::is_loopback},
};

/// Sandbox environment base URL.
pub const SANDBOX_URL: &str = "https://sandbox.debit.blinkpay.co.nz";

/// Production environment base URL.
pub const PRODUCTION_URL: &str = "https://debit.blinkpay.co.nz";

/// Environment variable holding the base URL.
pub const ENV_DEBIT_URL: &str = "BLINKPAY_DEBIT_URL";
/// Environment variable holding the OAuth2 client id.
pub const ENV_CLIENT_ID: &str = "BLINKPAY_CLIENT_ID";
/// Environment variable holding the OAuth2 client secret.
pub const ENV_CLIENT_SECRET: &str = "BLINKPAY_CLIENT_SECRET";

/// Root SDK configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BlinkConfig {
    /// Base URL of the API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Prefix of every API path except the token endpoint.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Endpoint path overrides.
    #[serde(default)]
    pub endpoints: EndpointConfig,

    /// OAuth2 client credentials; required unless every call uses a
    /// caller-supplied token.
    #[serde(default)]
    pub credentials: Option<Credentials>,

    /// HTTP transport settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Retry settings.
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_prefix: default_api_prefix(),
            endpoints: EndpointConfig::default(),
            credentials: None,
            http: HttpConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

fn default_base_url() -> String {
    SANDBOX_URL.to_owned()
}

fn default_api_prefix() -> String {
    "/payments/v1".to_owned()
}

impl BlinkConfig {
    /// Creates a default configuration for `base_url` with client credentials.
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            credentials: Some(Credentials::new(client_id, client_secret)),
            ..Self::default()
        }
    }

    /// Parses and validates TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BlinkError::Config`] if the TOML is malformed or fails
    /// [`BlinkConfig::validate`].
    ///
    /// # Examples
    ///
    /// ```
    /// use blink_debit::BlinkConfig;
    ///
    /// let config = BlinkConfig::from_toml(
    ///     r#"
    ///     base_url = "https://sandbox.debit.blinkpay.co.nz"
    ///
    ///     [credentials]
    ///     client_id = "id"
    ///     client_secret = "secret"
    ///     "#,
    /// )
    /// .unwrap();
    /// assert_eq!(config.api_prefix, "/payments/v1");
    /// ```
    pub fn from_toml(toml: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(toml).map_err(|e| BlinkError::Config(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`BlinkError::Config`] if the file cannot be read or parsed, or
    /// fails validation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| BlinkError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    /// Builds configuration from `BLINKPAY_DEBIT_URL`, `BLINKPAY_CLIENT_ID`
    /// and `BLINKPAY_CLIENT_SECRET`.
    ///
    /// The URL defaults to the sandbox when unset.
    ///
    /// # Errors
    ///
    /// Returns [`BlinkError::Config`] if a credential variable is missing or
    /// the result fails validation.
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| {
            std::env::var(name).map_err(|_| BlinkError::Config(format!("{name} is not set")))
        };
        let base_url = std::env::var(ENV_DEBIT_URL).unwrap_or_else(|_| default_base_url());
        let config = Self::new(base_url, var(ENV_CLIENT_ID)?, var(ENV_CLIENT_SECRET)?);
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// This method checks for:
    /// - Base URL must parse and use HTTPS, unless the host is loopback
    /// - API prefix must be empty or an absolute path without traversal
    /// - Endpoint templates must be absolute paths without traversal; lookup
    ///   templates must contain `{id}`
    /// - Credentials, when present, must not be blank
    /// - HTTP timeouts and retry bounds must be in range
    ///
    /// # Errors
    ///
    /// Returns [`BlinkError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        self.validate_base_url()?;

        if !self.api_prefix.is_empty() {
            validate_endpoint_path("api_prefix", &self.api_prefix)?;
            if self.api_prefix.ends_with('/') {
                return Err(BlinkError::Config("api_prefix must not end with '/'".to_owned()));
            }
        }

        self.endpoints.validate()?;
        if let Some(credentials) = &self.credentials {
            credentials.validate()?;
        }
        self.http.validate()?;
        self.retry.validate()?;
        Ok(())
    }

    fn validate_base_url(&self) -> Result<()> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            BlinkError::Config(format!("invalid base_url '{}': {e}", self.base_url))
        })?;

        match url.scheme() {
            "https" => Ok(()),
            "http" if is_loopback(&url) => Ok(()),
            scheme => Err(BlinkError::Config(format!("base_url must use HTTPS, got: {scheme}"))),
        }
    }
}

/// OAuth2 client credentials.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    /// Client id.
    pub client_id: String,
    /// Client secret; wiped from memory on drop.
    #[serde(deserialize_with = "deserialize_secret")]
    pub client_secret: Zeroizing<String>,
}

impl Credentials {
    /// Creates credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self { client_id: client_id.into(), client_secret: Zeroizing::new(client_secret.into()) }
    }

    fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(BlinkError::Config("client_id must not be blank".to_owned()));
        }
        if self.client_secret.trim().is_empty() {
            return Err(BlinkError::Config("client_secret must not be blank".to_owned()));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

fn deserialize_secret<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Zeroizing<String>, D::Error> {
    String::deserialize(deserializer).map(Zeroizing::new)
}

/// Endpoint path templates, relative to the API prefix. Lookup and revoke
/// templates use `{id}` as the identifier placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Single consents collection (default: "/single-consents").
    pub single_consents: String,
    /// Single consent item (default: "/single-consents/{id}").
    pub single_consent: String,
    /// Quick payments collection (default: "/quick-payments").
    pub quick_payments: String,
    /// Quick payment item (default: "/quick-payments/{id}").
    pub quick_payment: String,
    /// Refunds collection (default: "/refunds").
    pub refunds: String,
    /// Refund item (default: "/refunds/{id}").
    pub refund: String,
    /// OAuth2 token endpoint, not prefixed (default: "/oauth2/token").
    pub token: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            single_consents: "/single-consents".to_owned(),
            single_consent: "/single-consents/{id}".to_owned(),
            quick_payments: "/quick-payments".to_owned(),
            quick_payment: "/quick-payments/{id}".to_owned(),
            refunds: "/refunds".to_owned(),
            refund: "/refunds/{id}".to_owned(),
            token: "/oauth2/token".to_owned(),
        }
    }
}

impl EndpointConfig {
    /// Returns the path template of `operation`.
    #[must_use]
    pub fn template(&self, operation: Operation) -> &str {
        match operation {
            Operation::CreateConsent => &self.single_consents,
            Operation::GetConsent | Operation::RevokeConsent => &self.single_consent,
            Operation::CreateQuickPayment => &self.quick_payments,
            Operation::GetQuickPayment | Operation::RevokeQuickPayment => &self.quick_payment,
            Operation::CreateRefund => &self.refunds,
            Operation::GetRefund => &self.refund,
        }
    }

    /// Validates endpoint templates.
    ///
    /// # Errors
    ///
    /// Returns [`BlinkError::Config`] if any template is invalid.
    pub fn validate(&self) -> Result<()> {
        let collections = [
            ("single_consents", &self.single_consents),
            ("quick_payments", &self.quick_payments),
            ("refunds", &self.refunds),
            ("token", &self.token),
        ];
        for (name, path) in collections {
            validate_endpoint_path(name, path)?;
        }

        let items = [
            ("single_consent", &self.single_consent),
            ("quick_payment", &self.quick_payment),
            ("refund", &self.refund),
        ];
        for (name, path) in items {
            validate_endpoint_path(name, path)?;
            if !path.contains("{id}") {
                return Err(BlinkError::Config(format!(
                    "endpoint '{name}' must contain the '{{id}}' placeholder: {path}"
                )));
            }
        }
        Ok(())
    }
}

/// Validates an endpoint path template for security issues.
fn validate_endpoint_path(name: &str, path: &str) -> Result<()> {
    if path.contains("..") {
        return Err(BlinkError::Config(format!(
            "endpoint '{name}' contains path traversal sequence '..': {path}"
        )));
    }
    if path.contains("//") {
        return Err(BlinkError::Config(format!(
            "endpoint '{name}' contains double slash '//': {path}"
        )));
    }
    if !path.starts_with('/') {
        return Err(BlinkError::Config(format!("endpoint '{name}' must start with '/': {path}")));
    }
    Ok(())
}

/// Backoff style in configuration files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffKind {
    /// Exponential growth by `multiplier`.
    #[default]
    Exponential,
    /// Constant delay.
    Fixed,
}

/// Retry configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts per call, first one included.
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    pub initial_delay_ms: u64,
    /// Upper bound for any delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Backoff style.
    pub backoff: BackoffKind,
    /// Growth factor for exponential backoff.
    pub multiplier: f64,
    /// Per-attempt time budget, in milliseconds.
    pub attempt_timeout_ms: Option<u64>,
    /// Operations to retry; all when absent.
    pub operations: Option<Vec<Operation>>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5_000,
            backoff: BackoffKind::default(),
            multiplier: 2.0,
            attempt_timeout_ms: None,
            operations: None,
        }
    }
}

impl RetryConfig {
    /// Validates retry bounds.
    ///
    /// # Errors
    ///
    /// Returns [`BlinkError::Config`] if:
    /// - `max_attempts` is not between 1 and 10
    /// - `initial_delay_ms` exceeds `max_delay_ms`
    /// - `multiplier` is below 1.0 or not finite
    /// - `attempt_timeout_ms` is zero
    pub fn validate(&self) -> Result<()> {
        if !(1..=10).contains(&self.max_attempts) {
            return Err(BlinkError::Config("max_attempts must be between 1 and 10".to_owned()));
        }
        if self.initial_delay_ms > self.max_delay_ms {
            return Err(BlinkError::Config(
                "initial_delay_ms must not exceed max_delay_ms".to_owned(),
            ));
        }
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err(BlinkError::Config("multiplier must be at least 1.0".to_owned()));
        }
        if self.attempt_timeout_ms == Some(0) {
            return Err(BlinkError::Config("attempt_timeout_ms must be positive".to_owned()));
        }
        Ok(())
    }

    /// Converts to a [`RetryPolicy`].
    #[must_use]
    pub fn to_policy(&self) -> RetryPolicy {
        let policy = RetryPolicy {
            max_attempts: self.max_attempts,
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            backoff: match self.backoff {
                BackoffKind::Exponential => Backoff::Exponential { multiplier: self.multiplier },
                BackoffKind::Fixed => Backoff::Fixed,
            },
            attempt_timeout: self.attempt_timeout_ms.map(Duration::from_millis),
            ..RetryPolicy::default()
        };
        match &self.operations {
            Some(operations) => policy.only(operations),
            None => policy,
        }
    }
}
