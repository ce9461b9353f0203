//! Builds, sends and decodes API calls.
//!
//! One logical call resolves its correlation id once. Every attempt then asks
//! the [`TokenProvider`] for a token, sends the request and maps non-2xx
//! responses to [`BlinkError::Http`]. Attempts are wrapped in the
//! [`RetryPolicy`] when it applies to the operation.

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    config::EndpointConfig,
    error::{BlinkError, Result},
    identity::{CorrelationId, StaticToken, TokenProvider, USER_AGENT},
    reliability::{RetryPolicy, retry_with_backoff},
    transport::{Method, RequestContext, Transport, TransportResponse},
};

/// API operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// `POST /single-consents`
    CreateConsent,
    /// `GET /single-consents/{id}`
    GetConsent,
    /// `DELETE /single-consents/{id}`
    RevokeConsent,
    /// `POST /quick-payments`
    CreateQuickPayment,
    /// `GET /quick-payments/{id}`
    GetQuickPayment,
    /// `DELETE /quick-payments/{id}`
    RevokeQuickPayment,
    /// `POST /refunds`
    CreateRefund,
    /// `GET /refunds/{id}`
    GetRefund,
}

impl Operation {
    /// Every operation.
    pub const ALL: [Self; 8] = [
        Self::CreateConsent,
        Self::GetConsent,
        Self::RevokeConsent,
        Self::CreateQuickPayment,
        Self::GetQuickPayment,
        Self::RevokeQuickPayment,
        Self::CreateRefund,
        Self::GetRefund,
    ];

    /// HTTP method of the operation.
    #[must_use]
    pub const fn method(self) -> Method {
        match self {
            Self::CreateConsent | Self::CreateQuickPayment | Self::CreateRefund => Method::Post,
            Self::GetConsent | Self::GetQuickPayment | Self::GetRefund => Method::Get,
            Self::RevokeConsent | Self::RevokeQuickPayment => Method::Delete,
        }
    }

    /// Whether the correlation id is also sent as `interaction-id`.
    #[must_use]
    pub const fn sends_interaction_id(self) -> bool {
        !matches!(self, Self::CreateRefund | Self::GetRefund)
    }

    /// Snake-case name used in logs and configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateConsent => "create_consent",
            Self::GetConsent => "get_consent",
            Self::RevokeConsent => "revoke_consent",
            Self::CreateQuickPayment => "create_quick_payment",
            Self::GetQuickPayment => "get_quick_payment",
            Self::RevokeQuickPayment => "revoke_quick_payment",
            Self::CreateRefund => "create_refund",
            Self::GetRefund => "get_refund",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sends API calls through a [`Transport`] with tokens from a
/// [`TokenProvider`].
pub struct RequestExecutor<T, P> {
    transport: Arc<T>,
    provider: P,
    base_url: String,
    api_prefix: String,
    endpoints: EndpointConfig,
    retry: RetryPolicy,
}

impl<T, P: fmt::Debug> fmt::Debug for RequestExecutor<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("api_prefix", &self.api_prefix)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl<T: Transport, P: TokenProvider> RequestExecutor<T, P> {
    /// Creates an executor.
    pub fn new(
        transport: Arc<T>,
        provider: P,
        base_url: impl Into<String>,
        api_prefix: impl Into<String>,
        endpoints: EndpointConfig,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            provider,
            base_url: base_url.into(),
            api_prefix: api_prefix.into(),
            endpoints,
            retry,
        }
    }

    /// Returns an executor sharing this one's transport and settings but
    /// using a caller-supplied token.
    #[must_use]
    pub fn with_static_token(&self, token: StaticToken) -> RequestExecutor<T, StaticToken> {
        RequestExecutor {
            transport: Arc::clone(&self.transport),
            provider: token,
            base_url: self.base_url.clone(),
            api_prefix: self.api_prefix.clone(),
            endpoints: self.endpoints.clone(),
            retry: self.retry.clone(),
        }
    }

    /// Returns the token provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Runs `operation` and decodes the 2xx body into `R`.
    ///
    /// # Errors
    ///
    /// - [`BlinkError::Transport`] if the body cannot be serialized or the
    ///   request cannot be built
    /// - token errors from the provider
    /// - [`BlinkError::Http`], [`BlinkError::Network`] or
    ///   [`BlinkError::Decode`] once the request was sent
    pub async fn execute<R, B>(
        &self,
        operation: Operation,
        id: Option<Uuid>,
        body: Option<&B>,
        request_id: Option<&str>,
    ) -> Result<R>
    where
        R: DeserializeOwned,
        B: Serialize + Sync,
    {
        self.dispatch(operation, id, body, request_id).await?.into_json()
    }

    /// Runs `operation`, ignoring any response body.
    ///
    /// # Errors
    ///
    /// See [`RequestExecutor::execute`].
    pub async fn execute_empty(
        &self,
        operation: Operation,
        id: Option<Uuid>,
        request_id: Option<&str>,
    ) -> Result<()> {
        self.dispatch::<()>(operation, id, None, request_id).await.map(drop)
    }

    #[instrument(
        skip(self, body, request_id),
        fields(
            operation = %operation,
            method = %operation.method(),
            path = tracing::field::Empty,
            correlation_id = tracing::field::Empty
        )
    )]
    async fn dispatch<B: Serialize + Sync>(
        &self,
        operation: Operation,
        id: Option<Uuid>,
        body: Option<&B>,
        request_id: Option<&str>,
    ) -> Result<TransportResponse> {
        let correlation_id = CorrelationId::resolve(request_id);
        let path = self.path(operation, id);
        let span = tracing::Span::current();
        span.record("path", path.as_str());
        span.record("correlation_id", correlation_id.as_str());

        let body = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| BlinkError::Transport(format!("failed to serialize request: {e}")))?;

        let path = path.as_str();
        let body = body.as_deref();
        let correlation_id = &correlation_id;
        let attempt = move || self.attempt(operation, path, body, correlation_id);

        let response = if self.retry.applies_to(operation) {
            retry_with_backoff(&self.retry, attempt).await?
        } else {
            attempt().await?
        };

        tracing::debug!(status = response.status, "call succeeded");
        Ok(response)
    }

    async fn attempt(
        &self,
        operation: Operation,
        path: &str,
        body: Option<&[u8]>,
        correlation_id: &CorrelationId,
    ) -> Result<TransportResponse> {
        let token = self.provider.access_token(correlation_id).await?;
        let authorization = token.bearer();

        let mut headers = vec![("request-id", correlation_id.as_str())];
        if operation.sends_interaction_id() {
            headers.push(("interaction-id", correlation_id.as_str()));
        }
        headers.extend([
            ("Authorization", authorization.as_str()),
            ("Accept", "application/json"),
            ("User-Agent", USER_AGENT),
        ]);

        let ctx = RequestContext {
            base_url: &self.base_url,
            path,
            headers,
            content_type: body.is_some().then_some("application/json"),
        };

        self.transport.send(operation.method(), ctx, body).await?.error_for_status()
    }

    fn path(&self, operation: Operation, id: Option<Uuid>) -> String {
        let template = self.endpoints.template(operation);
        let resolved = match id {
            Some(id) => template.replace("{id}", &id.to_string()),
            None => template.to_owned(),
        };
        format!("{}{resolved}", self.api_prefix)
    }
}
