//! Fail-fast rules. Each returns the first failing rule's message.

use crate::{
    error::ValidationError,
    models::{Amount, AuthFlow, AuthFlowDetail, FlowHint, Pcr},
};

/// Maximum characters in each PCR field.
///
/// Length is counted in Unicode scalar values (`char`s), not bytes or UTF-16
/// code units, so `"🦀"` counts as one.
pub const PCR_MAX_CHARS: usize = 12;

type RuleResult = Result<(), ValidationError>;

pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|text| text.trim().is_empty())
}

fn require<T>(value: Option<T>, message: &str) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::rule(message))
}

fn require_text(value: Option<&str>, message: &str) -> RuleResult {
    if is_blank(value) { Err(ValidationError::rule(message)) } else { Ok(()) }
}

/// Checks the flow wrapper, its detail and the variant's required fields.
pub(crate) fn check_flow(flow: Option<&AuthFlow>) -> RuleResult {
    let flow = require(flow, "Flow must not be null")?;
    let detail = require(flow.detail.as_ref(), "Flow detail must not be null")?;

    match detail {
        AuthFlowDetail::Redirect(redirect) => {
            require(redirect.bank, "Bank must not be null")?;
            require_text(redirect.redirect_uri.as_deref(), "Redirect URI must not be blank")
        }
        AuthFlowDetail::Decoupled(decoupled) => {
            require(decoupled.bank, "Bank must not be null")?;
            require(decoupled.identifier_type, "Identifier type must not be null")?;
            require_text(
                decoupled.identifier_value.as_deref(),
                "Identifier value must not be blank",
            )?;
            require_text(
                decoupled.callback_url.as_deref(),
                "Callback/webhook URL must not be blank",
            )
        }
        AuthFlowDetail::Gateway(gateway) => {
            require_text(gateway.redirect_uri.as_deref(), "Redirect URI must not be blank")?;
            gateway.flow_hint.as_ref().map_or(Ok(()), check_flow_hint)
        }
    }
}

fn check_flow_hint(hint: &FlowHint) -> RuleResult {
    require(hint.bank(), "Bank must not be null")?;
    if let FlowHint::Decoupled(decoupled) = hint {
        require(decoupled.identifier_type, "Identifier type must not be null")?;
        require_text(decoupled.identifier_value.as_deref(), "Identifier value must not be blank")?;
    }
    Ok(())
}

/// Checks presence of the PCR, non-blank particulars and field lengths.
pub(crate) fn check_pcr(pcr: Option<&Pcr>) -> RuleResult {
    let pcr = require(pcr, "PCR must not be null")?;
    require_text(pcr.particulars.as_deref(), "Particulars must have at least 1 character")?;

    let too_long = [&pcr.particulars, &pcr.code, &pcr.reference]
        .into_iter()
        .flatten()
        .any(|field| field.chars().count() > PCR_MAX_CHARS);
    if too_long {
        return Err(ValidationError::rule("PCR must not exceed 12 characters"));
    }
    Ok(())
}

/// Checks presence of the amount and its currency.
pub(crate) fn check_amount(amount: Option<&Amount>) -> RuleResult {
    let amount = require(amount, "Amount must not be null")?;
    require(amount.currency, "Currency must not be null")?;
    Ok(())
}
