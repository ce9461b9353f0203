//! Quick payment operations.
//!
//! A quick payment creates a consent and its payment in one step.

use tracing::instrument;
use uuid::Uuid;

use super::BlinkDebitClient;
use crate::{
    error::Result,
    executor::Operation,
    identity::TokenProvider,
    models::{
        ConsentDetail, CreateQuickPaymentResponse, QuickPaymentRequest, QuickPaymentResponse,
    },
    transport::Transport,
    validation::{self, ConsentFields, IdKind},
};

impl<T: Transport, P: TokenProvider> BlinkDebitClient<T, P> {
    /// Creates a quick payment.
    ///
    /// # Errors
    ///
    /// Returns [`BlinkError::Validation`](crate::BlinkError::Validation)
    /// without sending anything if the request breaks a rule, otherwise any
    /// error of [`RequestExecutor::execute`](crate::executor::RequestExecutor::execute).
    #[instrument(skip(self, request, request_id))]
    pub async fn create_quick_payment(
        &self,
        request: &QuickPaymentRequest,
        request_id: Option<&str>,
    ) -> Result<CreateQuickPaymentResponse> {
        let request = validation::validate_quick_payment_request(Some(request))?;
        let body = ConsentDetail::Single(request.clone());
        let response: CreateQuickPaymentResponse = self
            .executor
            .execute(Operation::CreateQuickPayment, None, Some(&body), request_id)
            .await?;

        tracing::info!(quick_payment_id = %response.quick_payment_id, "created quick payment");
        Ok(response)
    }

    /// Builds a quick payment from loose fields and creates it.
    ///
    /// # Errors
    ///
    /// See [`build_quick_payment_request`](crate::validation::build_quick_payment_request)
    /// and [`BlinkDebitClient::create_quick_payment`].
    pub async fn create_quick_payment_with_fields(
        &self,
        fields: &ConsentFields,
        request_id: Option<&str>,
    ) -> Result<CreateQuickPaymentResponse> {
        let request = validation::build_quick_payment_request(fields)?;
        self.create_quick_payment(&request, request_id).await
    }

    /// Retrieves a quick payment with its consent.
    ///
    /// # Errors
    ///
    /// Fails with `"Quick payment ID must not be null"` before sending
    /// anything if `quick_payment_id` is `None`.
    #[instrument(skip(self, request_id))]
    pub async fn get_quick_payment(
        &self,
        quick_payment_id: Option<Uuid>,
        request_id: Option<&str>,
    ) -> Result<QuickPaymentResponse> {
        let id = validation::validate_id(quick_payment_id, IdKind::QuickPayment)?;
        self.executor
            .execute::<_, ()>(Operation::GetQuickPayment, Some(id), None, request_id)
            .await
    }

    /// Revokes a quick payment.
    ///
    /// # Errors
    ///
    /// Fails with `"Quick payment ID must not be null"` before sending
    /// anything if `quick_payment_id` is `None`.
    #[instrument(skip(self, request_id))]
    pub async fn revoke_quick_payment(
        &self,
        quick_payment_id: Option<Uuid>,
        request_id: Option<&str>,
    ) -> Result<()> {
        let id = validation::validate_id(quick_payment_id, IdKind::QuickPayment)?;
        self.executor.execute_empty(Operation::RevokeQuickPayment, Some(id), request_id).await?;
        tracing::info!(quick_payment_id = %id, "revoked quick payment");
        Ok(())
    }
}
