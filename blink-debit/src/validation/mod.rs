//! Client-side request validation.
//!
//! Every request is checked before anything is sent. Validation runs in two
//! phases:
//!
//! 1. Ordered fail-fast rules: presence of the request, its nested objects,
//!    variant-specific fields, the PCR and the amount. The first failing rule
//!    wins and its message is returned as [`ValidationError::Rule`].
//! 2. A constraint sweep over declared field formats (the amount total
//!    pattern) that reports every remaining violation at once as
//!    [`ValidationError::Constraints`]. Redirect and callback URIs are not
//!    parsed; the API decides what it accepts.
//!
//! # Examples
//!
//! ```
//! use blink_debit::validation::validate_refund_request;
//! use blink_debit::models::{FullRefundRequest, RefundDetail};
//!
//! let refund = RefundDetail::FullRefund(FullRefundRequest::default());
//! let error = validate_refund_request(Some(&refund)).unwrap_err();
//! assert_eq!(error.to_string(), "Payment ID must not be null");
//! ```

mod constraints;
mod fields;
mod rules;

use std::fmt;

pub use constraints::TOTAL_PATTERN;
pub use fields::{
    ConsentFields, RefundFields, build_consent_request, build_quick_payment_request,
    build_refund_request,
};
pub use rules::PCR_MAX_CHARS;
use uuid::Uuid;

use self::constraints::ConstraintSweep;
use crate::{
    error::ValidationError,
    models::{QuickPaymentRequest, RefundDetail, SingleConsentRequest},
};

/// Which kind of single-payment request is being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SingleKind {
    Consent,
    QuickPayment,
}

impl SingleKind {
    const fn missing(self) -> &'static str {
        match self {
            Self::Consent => "Single consent request must not be null",
            Self::QuickPayment => "Quick payment request must not be null",
        }
    }

    const fn subject(self) -> &'static str {
        match self {
            Self::Consent => "single consent request",
            Self::QuickPayment => "quick payment request",
        }
    }
}

/// Validates a single consent request.
///
/// # Errors
///
/// Returns the first failing rule, or every constraint violation found by the
/// sweep.
pub fn validate_consent_request(
    request: Option<&SingleConsentRequest>,
) -> Result<&SingleConsentRequest, ValidationError> {
    validate_single(request, SingleKind::Consent)
}

/// Validates a quick payment request. Same rules as a single consent.
///
/// # Errors
///
/// See [`validate_consent_request`].
pub fn validate_quick_payment_request(
    request: Option<&QuickPaymentRequest>,
) -> Result<&QuickPaymentRequest, ValidationError> {
    validate_single(request, SingleKind::QuickPayment)
}

pub(crate) fn validate_single(
    request: Option<&SingleConsentRequest>,
    kind: SingleKind,
) -> Result<&SingleConsentRequest, ValidationError> {
    let request = request.ok_or_else(|| ValidationError::rule(kind.missing()))?;

    rules::check_flow(request.flow.as_ref())?;
    rules::check_pcr(request.pcr.as_ref())?;
    rules::check_amount(request.amount.as_ref())?;

    ConstraintSweep::new().amount(request.amount.as_ref()).finish(kind.subject())?;
    Ok(request)
}

/// Validates a refund request.
///
/// Full and partial refunds need a PCR; partial refunds also need an amount.
///
/// # Errors
///
/// Returns the first failing rule, or every constraint violation found by the
/// sweep.
pub fn validate_refund_request(
    request: Option<&RefundDetail>,
) -> Result<&RefundDetail, ValidationError> {
    let request = request.ok_or_else(|| ValidationError::rule("Refund request must not be null"))?;
    validate_id(request.payment_id(), IdKind::Payment)?;

    let mut sweep = ConstraintSweep::new();
    match request {
        RefundDetail::FullRefund(full) => rules::check_pcr(full.pcr.as_ref())?,
        RefundDetail::PartialRefund(partial) => {
            rules::check_pcr(partial.pcr.as_ref())?;
            rules::check_amount(partial.amount.as_ref())?;
            sweep.amount(partial.amount.as_ref());
        }
        RefundDetail::AccountNumber(_) => {}
    }
    sweep.finish("refund request")?;
    Ok(request)
}

/// Kind of identifier passed to a lookup or revoke operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    /// A consent ID.
    Consent,
    /// A quick payment ID.
    QuickPayment,
    /// A refund ID.
    Refund,
    /// A payment ID.
    Payment,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Consent => "Consent ID",
            Self::QuickPayment => "Quick payment ID",
            Self::Refund => "Refund ID",
            Self::Payment => "Payment ID",
        })
    }
}

/// Checks that an identifier was supplied.
///
/// # Errors
///
/// Returns `"<kind> must not be null"` when `id` is `None`.
///
/// # Examples
///
/// ```
/// use blink_debit::validation::{IdKind, validate_id};
///
/// let error = validate_id(None, IdKind::Refund).unwrap_err();
/// assert_eq!(error.to_string(), "Refund ID must not be null");
/// ```
pub fn validate_id(id: Option<Uuid>, kind: IdKind) -> Result<Uuid, ValidationError> {
    id.ok_or_else(|| ValidationError::rule(format!("{kind} must not be null")))
}
