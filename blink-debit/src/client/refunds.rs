//! Refund operations.

use tracing::instrument;
use uuid::Uuid;

use super::BlinkDebitClient;
use crate::{
    error::Result,
    executor::Operation,
    identity::TokenProvider,
    models::{Refund, RefundDetail, RefundResponse},
    transport::Transport,
    validation::{self, IdKind, RefundFields},
};

impl<T: Transport, P: TokenProvider> BlinkDebitClient<T, P> {
    /// Creates a refund.
    ///
    /// # Errors
    ///
    /// Fails with `"Payment ID must not be null"` for any refund type without
    /// a payment ID, or another validation error, before sending anything.
    /// Otherwise any error of
    /// [`RequestExecutor::execute`](crate::executor::RequestExecutor::execute).
    #[instrument(skip(self, request, request_id), fields(refund_type = %request.kind()))]
    pub async fn create_refund(
        &self,
        request: &RefundDetail,
        request_id: Option<&str>,
    ) -> Result<RefundResponse> {
        let request = validation::validate_refund_request(Some(request))?;
        let response: RefundResponse = self
            .executor
            .execute(Operation::CreateRefund, None, Some(request), request_id)
            .await?;

        tracing::info!(refund_id = %response.refund_id, "created refund");
        Ok(response)
    }

    /// Builds a refund from loose fields and creates it.
    ///
    /// # Errors
    ///
    /// See [`build_refund_request`](crate::validation::build_refund_request)
    /// and [`BlinkDebitClient::create_refund`].
    pub async fn create_refund_with_fields(
        &self,
        fields: &RefundFields,
        request_id: Option<&str>,
    ) -> Result<RefundResponse> {
        let request = validation::build_refund_request(fields)?;
        self.create_refund(&request, request_id).await
    }

    /// Retrieves a refund.
    ///
    /// # Errors
    ///
    /// Fails with `"Refund ID must not be null"` before sending anything if
    /// `refund_id` is `None`.
    #[instrument(skip(self, request_id))]
    pub async fn get_refund(
        &self,
        refund_id: Option<Uuid>,
        request_id: Option<&str>,
    ) -> Result<Refund> {
        let refund_id = validation::validate_id(refund_id, IdKind::Refund)?;
        self.executor
            .execute::<_, ()>(Operation::GetRefund, Some(refund_id), None, request_id)
            .await
    }
}
