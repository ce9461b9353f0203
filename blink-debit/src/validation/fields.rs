//! Builders that validate loose fields before assembling a request.

use std::str::FromStr;

use rust_decimal::Decimal;
use uuid::Uuid;

use super::{IdKind, SingleKind, rules, validate_id, validate_refund_request, validate_single};
use crate::{
    error::ValidationError,
    models::{
        AccountNumberRefundRequest, Amount, AuthFlow, AuthFlowDetail, AuthFlowType, Bank,
        DecoupledFlow, DecoupledFlowHint, FlowHint, FlowHintType, FullRefundRequest, GatewayFlow,
        IdentifierType, PartialRefundRequest, Pcr, QuickPaymentRequest, RedirectFlow,
        RedirectFlowHint, RefundDetail, RefundType, SingleConsentRequest,
    },
};

/// Loose inputs for a single consent or quick payment.
///
/// `bank` is shared by the flow and, for gateway flows, by the flow hint.
/// `identifier_type` and `identifier_value` feed decoupled flows and
/// decoupled hints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsentFields {
    /// Which flow to build.
    pub flow_type: Option<AuthFlowType>,
    /// Customer's bank.
    pub bank: Option<Bank>,
    /// Redirect URI for redirect and gateway flows.
    pub redirect_uri: Option<String>,
    /// Callback URL for decoupled flows.
    pub callback_url: Option<String>,
    /// Hint type for gateway flows.
    pub flow_hint_type: Option<FlowHintType>,
    /// Identifier type for decoupled flows and hints.
    pub identifier_type: Option<IdentifierType>,
    /// Identifier value for decoupled flows and hints.
    pub identifier_value: Option<String>,
    /// PCR particulars.
    pub particulars: Option<String>,
    /// PCR code.
    pub code: Option<String>,
    /// PCR reference.
    pub reference: Option<String>,
    /// Decimal total in NZD.
    pub total: Option<String>,
}

impl ConsentFields {
    fn flow_hint(&self) -> Result<Option<FlowHint>, ValidationError> {
        let hint = match self.flow_hint_type {
            Some(FlowHintType::Redirect) => {
                Some(FlowHint::Redirect(RedirectFlowHint { bank: self.bank }))
            }
            Some(FlowHintType::Decoupled) => Some(FlowHint::Decoupled(DecoupledFlowHint {
                bank: self.bank,
                identifier_type: self.identifier_type,
                identifier_value: self.identifier_value.clone(),
            })),
            None if self.identifier_type.is_some() || self.identifier_value.is_some() => {
                return Err(ValidationError::rule("Flow hint type must not be null"));
            }
            None => None,
        };
        Ok(hint)
    }

    fn flow(&self) -> Result<AuthFlow, ValidationError> {
        let flow_type = self
            .flow_type
            .ok_or_else(|| ValidationError::rule("Authorisation flow type must not be null"))?;

        let detail = match flow_type {
            AuthFlowType::Redirect => AuthFlowDetail::Redirect(RedirectFlow {
                bank: self.bank,
                redirect_uri: self.redirect_uri.clone(),
            }),
            AuthFlowType::Decoupled => AuthFlowDetail::Decoupled(DecoupledFlow {
                bank: self.bank,
                identifier_type: self.identifier_type,
                identifier_value: self.identifier_value.clone(),
                callback_url: self.callback_url.clone(),
            }),
            AuthFlowType::Gateway => AuthFlowDetail::Gateway(GatewayFlow {
                redirect_uri: self.redirect_uri.clone(),
                flow_hint: self.flow_hint()?,
            }),
        };
        Ok(AuthFlow::new(detail))
    }

    fn pcr(&self) -> Pcr {
        Pcr {
            particulars: self.particulars.clone(),
            code: self.code.clone(),
            reference: self.reference.clone(),
        }
    }
}

/// Loose inputs for a refund.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefundFields {
    /// Which refund to build.
    pub refund_type: Option<RefundType>,
    /// Payment to refund.
    pub payment_id: Option<Uuid>,
    /// Consent redirect for full and partial refunds.
    pub redirect_uri: Option<String>,
    /// PCR particulars.
    pub particulars: Option<String>,
    /// PCR code.
    pub code: Option<String>,
    /// PCR reference.
    pub reference: Option<String>,
    /// Decimal total in NZD for partial refunds.
    pub total: Option<String>,
}

fn parse_total(total: Option<&str>) -> Result<Amount, ValidationError> {
    let total = total.map(str::trim).unwrap_or_default();
    Decimal::from_str(total)
        .map_err(|_| ValidationError::rule("Total is not a valid amount"))?;
    Ok(Amount::nzd(total))
}

/// Builds and validates a single consent request from loose fields.
///
/// # Errors
///
/// Fails with the first failing rule, `"Total is not a valid amount"` if the
/// total is not a decimal, or the constraint sweep's violations.
///
/// # Examples
///
/// ```
/// use blink_debit::models::{AuthFlowType, Bank};
/// use blink_debit::validation::{ConsentFields, build_consent_request};
///
/// let fields = ConsentFields {
///     flow_type: Some(AuthFlowType::Redirect),
///     bank: Some(Bank::Pnz),
///     redirect_uri: Some("https://merchant.example.com/return".to_owned()),
///     particulars: Some("particulars".to_owned()),
///     total: Some("1.25".to_owned()),
///     ..ConsentFields::default()
/// };
/// let request = build_consent_request(&fields).unwrap();
/// assert_eq!(request.amount.unwrap().total, "1.25");
/// ```
pub fn build_consent_request(
    fields: &ConsentFields,
) -> Result<SingleConsentRequest, ValidationError> {
    build_single(fields, SingleKind::Consent)
}

/// Builds and validates a quick payment request from loose fields.
///
/// # Errors
///
/// See [`build_consent_request`].
pub fn build_quick_payment_request(
    fields: &ConsentFields,
) -> Result<QuickPaymentRequest, ValidationError> {
    build_single(fields, SingleKind::QuickPayment)
}

fn build_single(
    fields: &ConsentFields,
    kind: SingleKind,
) -> Result<SingleConsentRequest, ValidationError> {
    let flow = fields.flow()?;
    rules::check_flow(Some(&flow))?;

    let pcr = fields.pcr();
    rules::check_pcr(Some(&pcr))?;

    let amount = parse_total(fields.total.as_deref())?;
    let request = SingleConsentRequest::new(flow, pcr, amount);
    validate_single(Some(&request), kind)?;
    Ok(request)
}

/// Builds and validates a refund request from loose fields.
///
/// # Errors
///
/// Fails with `"Refund type must not be null"`, `"Payment ID must not be
/// null"`, `"Redirect URI must not be blank"` (full and partial refunds), the
/// PCR rules, `"Total is not a valid amount"` (partial refunds), or the
/// constraint sweep's violations.
pub fn build_refund_request(fields: &RefundFields) -> Result<RefundDetail, ValidationError> {
    let refund_type = fields
        .refund_type
        .ok_or_else(|| ValidationError::rule("Refund type must not be null"))?;
    let payment_id = validate_id(fields.payment_id, IdKind::Payment)?;

    let request = match refund_type {
        RefundType::AccountNumber => {
            RefundDetail::AccountNumber(AccountNumberRefundRequest { payment_id: Some(payment_id) })
        }
        RefundType::FullRefund | RefundType::PartialRefund => {
            if rules::is_blank(fields.redirect_uri.as_deref()) {
                return Err(ValidationError::rule("Redirect URI must not be blank"));
            }
            let pcr = Pcr {
                particulars: fields.particulars.clone(),
                code: fields.code.clone(),
                reference: fields.reference.clone(),
            };
            rules::check_pcr(Some(&pcr))?;

            if refund_type == RefundType::FullRefund {
                RefundDetail::FullRefund(FullRefundRequest {
                    payment_id: Some(payment_id),
                    pcr: Some(pcr),
                    consent_redirect: fields.redirect_uri.clone(),
                })
            } else {
                let amount = parse_total(fields.total.as_deref())?;
                RefundDetail::PartialRefund(PartialRefundRequest {
                    payment_id: Some(payment_id),
                    pcr: Some(pcr),
                    amount: Some(amount),
                    consent_redirect: fields.redirect_uri.clone(),
                })
            }
        }
    };

    validate_refund_request(Some(&request))?;
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Currency;

    fn refund_fields(refund_type: RefundType) -> RefundFields {
        RefundFields {
            refund_type: Some(refund_type),
            payment_id: Some(Uuid::new_v4()),
            redirect_uri: Some("https://merchant.example.com/refund".to_owned()),
            particulars: Some("particulars".to_owned()),
            code: Some("code".to_owned()),
            reference: Some("reference".to_owned()),
            total: Some("5.00".to_owned()),
        }
    }

    fn gateway_fields() -> ConsentFields {
        ConsentFields {
            flow_type: Some(AuthFlowType::Gateway),
            redirect_uri: Some("https://merchant.example.com/return".to_owned()),
            particulars: Some("particulars".to_owned()),
            total: Some("10.00".to_owned()),
            ..ConsentFields::default()
        }
    }

    #[test]
    fn test_consent_fields_require_flow_type() {
        let error = build_consent_request(&ConsentFields::default()).unwrap_err();
        assert_eq!(error.to_string(), "Authorisation flow type must not be null");
    }

    #[test]
    fn test_gateway_hint_without_type() {
        let fields = ConsentFields {
            identifier_type: Some(IdentifierType::PhoneNumber),
            identifier_value: Some("+6449144425".to_owned()),
            ..gateway_fields()
        };
        let error = build_consent_request(&fields).unwrap_err();
        assert_eq!(error.to_string(), "Flow hint type must not be null");
    }

    #[test]
    fn test_gateway_decoupled_hint_is_built() {
        let fields = ConsentFields {
            bank: Some(Bank::Pnz),
            flow_hint_type: Some(FlowHintType::Decoupled),
            identifier_type: Some(IdentifierType::PhoneNumber),
            identifier_value: Some("+6449144425".to_owned()),
            ..gateway_fields()
        };
        let request = build_quick_payment_request(&fields).unwrap();
        let Some(AuthFlowDetail::Gateway(gateway)) = request.flow.unwrap().detail else {
            panic!("expected gateway flow");
        };
        let hint = gateway.flow_hint.unwrap();
        assert_eq!(hint.kind(), FlowHintType::Decoupled);
        assert_eq!(hint.bank(), Some(Bank::Pnz));
    }

    #[test]
    fn test_gateway_redirect_hint_needs_bank() {
        let fields =
            ConsentFields { flow_hint_type: Some(FlowHintType::Redirect), ..gateway_fields() };
        let error = build_consent_request(&fields).unwrap_err();
        assert_eq!(error.to_string(), "Bank must not be null");
    }

    #[test]
    fn test_consent_total_must_be_decimal() {
        let fields = ConsentFields { total: Some("ten dollars".to_owned()), ..gateway_fields() };
        assert_eq!(
            build_consent_request(&fields).unwrap_err().to_string(),
            "Total is not a valid amount"
        );

        let fields = ConsentFields { total: None, ..gateway_fields() };
        assert_eq!(
            build_consent_request(&fields).unwrap_err().to_string(),
            "Total is not a valid amount"
        );
    }

    #[test]
    fn test_consent_decimal_total_still_checked_against_pattern() {
        let fields = ConsentFields { total: Some("10".to_owned()), ..gateway_fields() };
        let error = build_consent_request(&fields).unwrap_err();
        assert_eq!(error.violations().len(), 1);
        assert!(error.to_string().starts_with("Validation failed for single consent request"));
    }

    #[test]
    fn test_consent_amount_defaults_to_nzd() {
        let request = build_consent_request(&gateway_fields()).unwrap();
        assert_eq!(request.amount.unwrap().currency, Some(Currency::Nzd));
    }

    #[test]
    fn test_refund_fields_rule_order() {
        let error = build_refund_request(&RefundFields::default()).unwrap_err();
        assert_eq!(error.to_string(), "Refund type must not be null");

        let fields = RefundFields { payment_id: None, ..refund_fields(RefundType::FullRefund) };
        assert_eq!(
            build_refund_request(&fields).unwrap_err().to_string(),
            "Payment ID must not be null"
        );

        let fields = RefundFields {
            redirect_uri: Some(String::new()),
            ..refund_fields(RefundType::PartialRefund)
        };
        assert_eq!(
            build_refund_request(&fields).unwrap_err().to_string(),
            "Redirect URI must not be blank"
        );

        let fields = RefundFields {
            reference: Some("a".repeat(13)),
            ..refund_fields(RefundType::PartialRefund)
        };
        assert_eq!(
            build_refund_request(&fields).unwrap_err().to_string(),
            "PCR must not exceed 12 characters"
        );

        let fields =
            RefundFields { total: Some("1.2.3".to_owned()), ..refund_fields(RefundType::PartialRefund) };
        assert_eq!(
            build_refund_request(&fields).unwrap_err().to_string(),
            "Total is not a valid amount"
        );
    }

    #[test]
    fn test_refund_fields_build_each_variant() {
        let full = build_refund_request(&refund_fields(RefundType::FullRefund)).unwrap();
        assert_eq!(full.kind(), RefundType::FullRefund);

        let partial = build_refund_request(&refund_fields(RefundType::PartialRefund)).unwrap();
        let RefundDetail::PartialRefund(partial) = partial else {
            panic!("expected partial refund");
        };
        assert_eq!(partial.amount, Some(Amount::nzd("5.00")));

        let fields = RefundFields {
            redirect_uri: None,
            particulars: None,
            total: None,
            ..refund_fields(RefundType::AccountNumber)
        };
        assert_eq!(build_refund_request(&fields).unwrap().kind(), RefundType::AccountNumber);
    }

    #[test]
    fn test_free_form_redirects_are_accepted() {
        let fields = RefundFields {
            redirect_uri: Some("redirectUri".to_owned()),
            total: Some("25.00".to_owned()),
            ..refund_fields(RefundType::FullRefund)
        };
        assert!(build_refund_request(&fields).is_ok());

        let fields = ConsentFields {
            flow_type: Some(AuthFlowType::Redirect),
            bank: Some(Bank::Pnz),
            redirect_uri: Some("redirectUri".to_owned()),
            ..gateway_fields()
        };
        let request = build_consent_request(&fields).unwrap();
        let Some(AuthFlowDetail::Redirect(redirect)) = request.flow.unwrap().detail else {
            panic!("expected redirect flow");
        };
        assert_eq!(redirect.redirect_uri.as_deref(), Some("redirectUri"));
    }
}
