//! Quick payments: a single consent and its payment created in one call.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Consent, SingleConsentRequest};

/// Request body for a quick payment.
///
/// Same shape as a single consent request; the body is sent with
/// `"type": "single"`.
pub type QuickPaymentRequest = SingleConsentRequest;

/// Response to a quick payment creation.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateQuickPaymentResponse {
    /// ID of the new quick payment.
    pub quick_payment_id: Uuid,
    /// Where to send the customer; absent for decoupled flows.
    pub redirect_uri: Option<String>,
}

/// A quick payment as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickPaymentResponse {
    /// Quick payment ID.
    pub quick_payment_id: Uuid,
    /// The consent backing the quick payment.
    pub consent: Consent,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::{AuthFlowDetail, ConsentStatus, FlowHintType};

    #[test]
    fn test_quick_payment_decodes_gateway_flow_with_hint() {
        let id = Uuid::new_v4();
        let json = json!({
            "quick_payment_id": id,
            "consent": {
                "consent_id": id,
                "status": "Consumed",
                "creation_timestamp": "2026-10-18T10:00:00+13:00",
                "status_updated_timestamp": "2026-10-18T10:01:00+13:00",
                "detail": {
                    "type": "single",
                    "flow": {"detail": {
                        "type": "gateway",
                        "redirect_uri": "https://merchant.example.com/return",
                        "flow_hint": {"type": "redirect", "bank": "BNZ"}
                    }},
                    "pcr": {"particulars": "particulars", "code": "code"},
                    "amount": {"currency": "NZD", "total": "12.50"}
                },
                "payments": [{
                    "payment_id": Uuid::new_v4(),
                    "status": "AcceptedSettlementCompleted",
                    "creation_timestamp": "2026-10-18T10:01:00+13:00",
                    "status_updated_timestamp": "2026-10-18T10:01:00+13:00"
                }]
            }
        });

        let response: QuickPaymentResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.quick_payment_id, id);
        assert_eq!(response.consent.status, ConsentStatus::Consumed);
        assert_eq!(response.consent.payments.len(), 1);

        let flow = response.consent.detail.as_single().flow.as_ref().unwrap();
        let Some(AuthFlowDetail::Gateway(gateway)) = &flow.detail else {
            panic!("expected gateway flow");
        };
        assert_eq!(gateway.flow_hint.as_ref().unwrap().kind(), FlowHintType::Redirect);
    }

    #[test]
    fn test_create_response_without_redirect() {
        let id = Uuid::new_v4();
        let response: CreateQuickPaymentResponse =
            serde_json::from_value(json!({"quick_payment_id": id})).unwrap();
        assert_eq!(response.quick_payment_id, id);
        assert!(response.redirect_uri.is_none());
    }
}
