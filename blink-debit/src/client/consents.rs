//! Single consent operations.

use tracing::instrument;
use uuid::Uuid;

use super::BlinkDebitClient;
use crate::{
    error::Result,
    executor::Operation,
    identity::TokenProvider,
    models::{Consent, ConsentDetail, CreateConsentResponse, SingleConsentRequest},
    transport::Transport,
    validation::{self, ConsentFields, IdKind},
};

impl<T: Transport, P: TokenProvider> BlinkDebitClient<T, P> {
    /// Creates a single consent.
    ///
    /// # Errors
    ///
    /// Returns [`BlinkError::Validation`](crate::BlinkError::Validation)
    /// without sending anything if the request breaks a rule, otherwise any
    /// error of [`RequestExecutor::execute`](crate::executor::RequestExecutor::execute).
    #[instrument(skip(self, request, request_id))]
    pub async fn create_single_consent(
        &self,
        request: &SingleConsentRequest,
        request_id: Option<&str>,
    ) -> Result<CreateConsentResponse> {
        let request = validation::validate_consent_request(Some(request))?;
        let body = ConsentDetail::Single(request.clone());
        let response: CreateConsentResponse = self
            .executor
            .execute(Operation::CreateConsent, None, Some(&body), request_id)
            .await?;

        tracing::info!(consent_id = %response.consent_id, "created single consent");
        Ok(response)
    }

    /// Builds a single consent from loose fields and creates it.
    ///
    /// # Errors
    ///
    /// See [`build_consent_request`](crate::validation::build_consent_request)
    /// and [`BlinkDebitClient::create_single_consent`].
    pub async fn create_single_consent_with_fields(
        &self,
        fields: &ConsentFields,
        request_id: Option<&str>,
    ) -> Result<CreateConsentResponse> {
        let request = validation::build_consent_request(fields)?;
        self.create_single_consent(&request, request_id).await
    }

    /// Retrieves a single consent.
    ///
    /// # Errors
    ///
    /// Fails with `"Consent ID must not be null"` before sending anything if
    /// `consent_id` is `None`.
    #[instrument(skip(self, request_id))]
    pub async fn get_single_consent(
        &self,
        consent_id: Option<Uuid>,
        request_id: Option<&str>,
    ) -> Result<Consent> {
        let consent_id = validation::validate_id(consent_id, IdKind::Consent)?;
        self.executor
            .execute::<_, ()>(Operation::GetConsent, Some(consent_id), None, request_id)
            .await
    }

    /// Revokes a single consent.
    ///
    /// # Errors
    ///
    /// Fails with `"Consent ID must not be null"` before sending anything if
    /// `consent_id` is `None`.
    #[instrument(skip(self, request_id))]
    pub async fn revoke_single_consent(
        &self,
        consent_id: Option<Uuid>,
        request_id: Option<&str>,
    ) -> Result<()> {
        let consent_id = validation::validate_id(consent_id, IdKind::Consent)?;
        self.executor.execute_empty(Operation::RevokeConsent, Some(consent_id), request_id).await?;
        tracing::info!(%consent_id, "revoked single consent");
        Ok(())
    }
}
