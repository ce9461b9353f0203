//! Refunds.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Amount, Pcr};

/// Discriminator of [`RefundDetail`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundType {
    /// Refund the whole payment.
    FullRefund,
    /// Refund part of the payment.
    PartialRefund,
    /// Only retrieve the payer's account number.
    AccountNumber,
}

impl fmt::Display for RefundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FullRefund => "full_refund",
            Self::PartialRefund => "partial_refund",
            Self::AccountNumber => "account_number",
        })
    }
}

/// Refund request, tagged by `type`.
///
/// # Examples
///
/// ```
/// use blink_debit::models::{AccountNumberRefundRequest, RefundDetail, RefundType};
/// use uuid::Uuid;
///
/// let refund = RefundDetail::AccountNumber(AccountNumberRefundRequest {
///     payment_id: Some(Uuid::new_v4()),
/// });
/// assert_eq!(refund.kind(), RefundType::AccountNumber);
/// assert_eq!(serde_json::to_value(&refund).unwrap()["type"], "account_number");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RefundDetail {
    /// Full refund.
    FullRefund(FullRefundRequest),
    /// Partial refund.
    PartialRefund(PartialRefundRequest),
    /// Account number retrieval.
    AccountNumber(AccountNumberRefundRequest),
}

impl RefundDetail {
    /// Returns the discriminator of this refund.
    #[must_use]
    pub const fn kind(&self) -> RefundType {
        match self {
            Self::FullRefund(_) => RefundType::FullRefund,
            Self::PartialRefund(_) => RefundType::PartialRefund,
            Self::AccountNumber(_) => RefundType::AccountNumber,
        }
    }

    /// Returns the ID of the payment being refunded.
    #[must_use]
    pub const fn payment_id(&self) -> Option<Uuid> {
        match self {
            Self::FullRefund(request) => request.payment_id,
            Self::PartialRefund(request) => request.payment_id,
            Self::AccountNumber(request) => request.payment_id,
        }
    }
}

/// Full refund request.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullRefundRequest {
    /// Payment to refund.
    pub payment_id: Option<Uuid>,
    /// Narrative for the refund statement line.
    pub pcr: Option<Pcr>,
    /// Where the merchant is sent to authorise the refund payment.
    pub consent_redirect: Option<String>,
}

/// Partial refund request.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialRefundRequest {
    /// Payment to refund.
    pub payment_id: Option<Uuid>,
    /// Narrative for the refund statement line.
    pub pcr: Option<Pcr>,
    /// Amount to refund.
    pub amount: Option<Amount>,
    /// Where the merchant is sent to authorise the refund payment.
    pub consent_redirect: Option<String>,
}

/// Account number refund request.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountNumberRefundRequest {
    /// Payment whose payer account number is requested.
    pub payment_id: Option<Uuid>,
}

/// Lifecycle status of a refund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefundStatus {
    /// Waiting for the merchant to authorise the refund payment.
    AwaitingAuthorisation,
    /// Refund completed.
    Completed,
    /// Refund failed.
    Failed,
}

/// A refund as returned by the API.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refund {
    /// Refund ID.
    pub refund_id: Uuid,
    /// Current status.
    pub status: RefundStatus,
    /// When the refund was created.
    pub creation_timestamp: DateTime<FixedOffset>,
    /// When the status last changed.
    pub status_updated_timestamp: DateTime<FixedOffset>,
    /// Payer account number, when known.
    pub account_number: Option<String>,
    /// The request the refund was created from.
    pub detail: RefundDetail,
}

/// Response to a refund creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundResponse {
    /// ID of the new refund.
    pub refund_id: Uuid,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_refund_decodes_account_number_detail() {
        let payment_id = Uuid::new_v4();
        let json = json!({
            "refund_id": Uuid::new_v4(),
            "status": "Completed",
            "creation_timestamp": "2026-10-18T10:00:00+13:00",
            "status_updated_timestamp": "2026-10-18T10:05:00+13:00",
            "account_number": "99-6121-6242460-00",
            "detail": {"type": "account_number", "payment_id": payment_id}
        });

        let refund: Refund = serde_json::from_value(json).unwrap();
        assert_eq!(refund.status, RefundStatus::Completed);
        assert_eq!(refund.account_number.as_deref(), Some("99-6121-6242460-00"));
        assert_eq!(refund.detail.kind(), RefundType::AccountNumber);
        assert_eq!(refund.detail.payment_id(), Some(payment_id));
    }

    #[test]
    fn test_partial_refund_body() {
        let payment_id = Uuid::new_v4();
        let refund = RefundDetail::PartialRefund(PartialRefundRequest {
            payment_id: Some(payment_id),
            pcr: Some(Pcr::new("particulars", "code", "reference")),
            amount: Some(Amount::nzd("5.00")),
            consent_redirect: None,
        });

        let body = serde_json::to_value(&refund).unwrap();
        assert_eq!(body["type"], "partial_refund");
        assert_eq!(body["payment_id"], json!(payment_id));
        assert_eq!(body["amount"]["total"], "5.00");
        assert!(body.get("consent_redirect").is_none());
    }

    #[test]
    fn test_refund_type_display() {
        assert_eq!(RefundType::PartialRefund.to_string(), "partial_refund");
    }
}
