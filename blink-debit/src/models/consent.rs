//! Single consents.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Amount, AuthFlow, Pcr};

/// Request body for a single payment consent.
///
/// Serialized inside [`ConsentDetail::Single`] so the body carries
/// `"type": "single"`.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleConsentRequest {
    /// Authorisation flow.
    pub flow: Option<AuthFlow>,
    /// Bank statement narrative.
    pub pcr: Option<Pcr>,
    /// Amount to be debited.
    pub amount: Option<Amount>,
}

impl SingleConsentRequest {
    /// Creates a request with every part present.
    #[must_use]
    pub const fn new(flow: AuthFlow, pcr: Pcr, amount: Amount) -> Self {
        Self { flow: Some(flow), pcr: Some(pcr), amount: Some(amount) }
    }
}

/// Consent detail, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsentDetail {
    /// Single payment consent.
    Single(SingleConsentRequest),
}

impl ConsentDetail {
    /// Returns the single consent request.
    #[must_use]
    pub const fn as_single(&self) -> &SingleConsentRequest {
        match self {
            Self::Single(request) => request,
        }
    }
}

/// Lifecycle status of a consent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsentStatus {
    /// Waiting for the customer to authorise.
    AwaitingAuthorisation,
    /// Authorised by the customer.
    Authorised,
    /// Payment has been made against the consent.
    Consumed,
    /// Declined by the customer or timed out at the bank.
    Rejected,
    /// Revoked by the merchant.
    Revoked,
    /// Waiting for the customer to submit on the gateway.
    GatewayAwaitingSubmission,
    /// The gateway session expired.
    GatewayTimeout,
}

/// Lifecycle status of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Payment submitted.
    Pending,
    /// Accepted by the bank, settlement in progress.
    #[serde(rename = "AcceptedSettlementInProcess")]
    AcceptedSettlementInProcess,
    /// Accepted by the bank and settled.
    #[serde(rename = "AcceptedSettlementCompleted")]
    AcceptedSettlementCompleted,
    /// Rejected by the bank.
    Rejected,
}

/// Summary of a payment made against a consent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Payment ID.
    pub payment_id: Uuid,
    /// Payment status.
    pub status: PaymentStatus,
    /// When the payment was created.
    pub creation_timestamp: DateTime<FixedOffset>,
    /// When the status last changed.
    pub status_updated_timestamp: DateTime<FixedOffset>,
}

/// Payer account linked to a consent.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account holder name.
    pub name: Option<String>,
    /// Masked account number or bank reference.
    pub account_reference: Option<String>,
}

/// A consent as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consent {
    /// Consent ID.
    pub consent_id: Uuid,
    /// Current status.
    pub status: ConsentStatus,
    /// When the consent was created.
    pub creation_timestamp: DateTime<FixedOffset>,
    /// When the status last changed.
    pub status_updated_timestamp: DateTime<FixedOffset>,
    /// The request the consent was created from.
    pub detail: ConsentDetail,
    /// Payer accounts, once known.
    #[serde(default)]
    pub accounts: Vec<Account>,
    /// Payments made against the consent.
    #[serde(default)]
    pub payments: Vec<Payment>,
}

/// Response to a consent creation.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateConsentResponse {
    /// ID of the new consent.
    pub consent_id: Uuid,
    /// Where to send the customer; absent for decoupled flows.
    pub redirect_uri: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::{AuthFlowDetail, Bank};

    #[test]
    fn test_consent_detail_body_carries_single_type() {
        let request = SingleConsentRequest::new(
            AuthFlowDetail::redirect(Bank::Pnz, "https://merchant.example.com/return").into(),
            Pcr::new("particulars", "code", "reference"),
            Amount::nzd("25.00"),
        );
        let body = serde_json::to_value(ConsentDetail::Single(request)).unwrap();
        assert_eq!(body["type"], "single");
        assert_eq!(body["flow"]["detail"]["type"], "redirect");
        assert_eq!(body["pcr"]["particulars"], "particulars");
        assert_eq!(body["amount"]["total"], "25.00");
    }

    #[test]
    fn test_consent_decodes_without_payments() {
        let json = json!({
            "consent_id": "0c5bc2a4-8e2b-4d4b-9a3b-1fb2a0a0b6d1",
            "status": "GatewayAwaitingSubmission",
            "creation_timestamp": "2026-10-18T10:00:00+13:00",
            "status_updated_timestamp": "2026-10-18T10:05:00+13:00",
            "detail": {
                "type": "single",
                "flow": {"detail": {"type": "gateway", "redirect_uri": "https://merchant.example.com/return"}},
                "pcr": {"particulars": "particulars"},
                "amount": {"currency": "NZD", "total": "1.25"}
            }
        });

        let consent: Consent = serde_json::from_value(json).unwrap();
        assert_eq!(consent.status, ConsentStatus::GatewayAwaitingSubmission);
        assert!(consent.payments.is_empty());
        assert!(consent.accounts.is_empty());
        assert!(consent.status_updated_timestamp > consent.creation_timestamp);
        assert_eq!(consent.detail.as_single().amount, Some(Amount::nzd("1.25")));
    }

    #[test]
    fn test_payment_status_names() {
        let status: PaymentStatus =
            serde_json::from_value(json!("AcceptedSettlementCompleted")).unwrap();
        assert_eq!(status, PaymentStatus::AcceptedSettlementCompleted);
    }
}
