//! Consent authorisation flows and gateway flow hints.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Banks supported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bank {
    /// ANZ.
    #[serde(rename = "ANZ")]
    Anz,
    /// ASB.
    #[serde(rename = "ASB")]
    Asb,
    /// BNZ.
    #[serde(rename = "BNZ")]
    Bnz,
    /// Kiwibank.
    Kiwibank,
    /// Payments NZ sandbox bank.
    #[serde(rename = "PNZ")]
    Pnz,
    /// Westpac.
    Westpac,
}

/// How a customer is identified in a decoupled flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierType {
    /// Mobile phone number in E.164 format.
    PhoneNumber,
    /// An existing consent ID.
    ConsentId,
}

/// Wrapper around the authorisation flow of a consent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthFlow {
    /// The flow variant.
    pub detail: Option<AuthFlowDetail>,
}

impl AuthFlow {
    /// Wraps a flow detail.
    #[must_use]
    pub const fn new(detail: AuthFlowDetail) -> Self {
        Self { detail: Some(detail) }
    }
}

impl From<AuthFlowDetail> for AuthFlow {
    fn from(detail: AuthFlowDetail) -> Self {
        Self::new(detail)
    }
}

/// Discriminator of [`AuthFlowDetail`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthFlowType {
    /// Customer is redirected to their bank.
    Redirect,
    /// Customer approves out-of-band in their banking app.
    Decoupled,
    /// Customer picks their bank on the hosted gateway.
    Gateway,
}

impl fmt::Display for AuthFlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Redirect => "redirect",
            Self::Decoupled => "decoupled",
            Self::Gateway => "gateway",
        })
    }
}

/// Authorisation flow of a consent, tagged by `type`.
///
/// # Examples
///
/// ```
/// use blink_debit::models::{AuthFlowDetail, AuthFlowType, Bank};
///
/// let flow = AuthFlowDetail::redirect(Bank::Pnz, "https://merchant.example.com/return");
/// assert_eq!(flow.kind(), AuthFlowType::Redirect);
///
/// let json = serde_json::to_value(&flow).unwrap();
/// assert_eq!(json["type"], "redirect");
/// assert_eq!(json["bank"], "PNZ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthFlowDetail {
    /// Redirect flow.
    Redirect(RedirectFlow),
    /// Decoupled flow.
    Decoupled(DecoupledFlow),
    /// Gateway flow.
    Gateway(GatewayFlow),
}

impl AuthFlowDetail {
    /// Returns the discriminator of this flow.
    #[must_use]
    pub const fn kind(&self) -> AuthFlowType {
        match self {
            Self::Redirect(_) => AuthFlowType::Redirect,
            Self::Decoupled(_) => AuthFlowType::Decoupled,
            Self::Gateway(_) => AuthFlowType::Gateway,
        }
    }

    /// Creates a redirect flow.
    pub fn redirect(bank: Bank, redirect_uri: impl Into<String>) -> Self {
        Self::Redirect(RedirectFlow { bank: Some(bank), redirect_uri: Some(redirect_uri.into()) })
    }

    /// Creates a decoupled flow.
    pub fn decoupled(
        bank: Bank,
        identifier_type: IdentifierType,
        identifier_value: impl Into<String>,
        callback_url: impl Into<String>,
    ) -> Self {
        Self::Decoupled(DecoupledFlow {
            bank: Some(bank),
            identifier_type: Some(identifier_type),
            identifier_value: Some(identifier_value.into()),
            callback_url: Some(callback_url.into()),
        })
    }

    /// Creates a gateway flow with an optional hint.
    pub fn gateway(redirect_uri: impl Into<String>, flow_hint: Option<FlowHint>) -> Self {
        Self::Gateway(GatewayFlow { redirect_uri: Some(redirect_uri.into()), flow_hint })
    }
}

/// Redirect flow: the customer is sent to their bank and back to `redirect_uri`.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectFlow {
    /// Customer's bank.
    pub bank: Option<Bank>,
    /// Where the bank returns the customer to.
    pub redirect_uri: Option<String>,
}

/// Decoupled flow: the bank notifies the customer directly.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoupledFlow {
    /// Customer's bank.
    pub bank: Option<Bank>,
    /// How the customer is identified.
    pub identifier_type: Option<IdentifierType>,
    /// The identifier value, e.g. a phone number.
    pub identifier_value: Option<String>,
    /// Merchant webhook notified when the consent is authorised.
    pub callback_url: Option<String>,
}

/// Gateway flow: the customer selects a bank on the hosted page.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayFlow {
    /// Where the gateway returns the customer to.
    pub redirect_uri: Option<String>,
    /// Optional pre-selection of the flow the gateway should use.
    pub flow_hint: Option<FlowHint>,
}

/// Discriminator of [`FlowHint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowHintType {
    /// Hint the redirect flow.
    Redirect,
    /// Hint the decoupled flow.
    Decoupled,
}

/// Hint steering a gateway flow, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlowHint {
    /// Redirect hint.
    Redirect(RedirectFlowHint),
    /// Decoupled hint.
    Decoupled(DecoupledFlowHint),
}

impl FlowHint {
    /// Returns the discriminator of this hint.
    #[must_use]
    pub const fn kind(&self) -> FlowHintType {
        match self {
            Self::Redirect(_) => FlowHintType::Redirect,
            Self::Decoupled(_) => FlowHintType::Decoupled,
        }
    }

    /// Creates a redirect hint.
    #[must_use]
    pub const fn redirect(bank: Bank) -> Self {
        Self::Redirect(RedirectFlowHint { bank: Some(bank) })
    }

    /// Creates a decoupled hint.
    pub fn decoupled(
        bank: Bank,
        identifier_type: IdentifierType,
        identifier_value: impl Into<String>,
    ) -> Self {
        Self::Decoupled(DecoupledFlowHint {
            bank: Some(bank),
            identifier_type: Some(identifier_type),
            identifier_value: Some(identifier_value.into()),
        })
    }

    /// Returns the hinted bank.
    #[must_use]
    pub const fn bank(&self) -> Option<Bank> {
        match self {
            Self::Redirect(hint) => hint.bank,
            Self::Decoupled(hint) => hint.bank,
        }
    }
}

/// Redirect flow hint.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectFlowHint {
    /// Bank to pre-select.
    pub bank: Option<Bank>,
}

/// Decoupled flow hint.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoupledFlowHint {
    /// Bank to pre-select.
    pub bank: Option<Bank>,
    /// How the customer is identified.
    pub identifier_type: Option<IdentifierType>,
    /// The identifier value.
    pub identifier_value: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decoupled_flow_serializes_with_discriminator() {
        let flow = AuthFlowDetail::decoupled(
            Bank::Pnz,
            IdentifierType::PhoneNumber,
            "+6449144425",
            "https://merchant.example.com/callback",
        );
        assert_eq!(
            serde_json::to_value(&flow).unwrap(),
            json!({
                "type": "decoupled",
                "bank": "PNZ",
                "identifier_type": "phone_number",
                "identifier_value": "+6449144425",
                "callback_url": "https://merchant.example.com/callback"
            })
        );
    }

    #[test]
    fn test_gateway_flow_decodes_nested_hint_variant() {
        let json = json!({
            "type": "gateway",
            "redirect_uri": "https://merchant.example.com/return",
            "flow_hint": {
                "type": "decoupled",
                "bank": "PNZ",
                "identifier_type": "phone_number",
                "identifier_value": "+6449144425"
            }
        });

        let flow: AuthFlowDetail = serde_json::from_value(json).unwrap();
        assert_eq!(flow.kind(), AuthFlowType::Gateway);
        let AuthFlowDetail::Gateway(gateway) = flow else {
            panic!("expected gateway flow");
        };
        let hint = gateway.flow_hint.unwrap();
        assert_eq!(hint.kind(), FlowHintType::Decoupled);
        assert_eq!(hint.bank(), Some(Bank::Pnz));
    }

    #[test]
    fn test_unknown_discriminator_is_rejected() {
        let json = json!({"type": "carrier_pigeon", "bank": "PNZ"});
        assert!(serde_json::from_value::<AuthFlowDetail>(json).is_err());
    }

    #[test]
    fn test_redirect_hint_without_bank_omits_field() {
        let hint = FlowHint::Redirect(RedirectFlowHint::default());
        assert_eq!(serde_json::to_value(&hint).unwrap(), json!({"type": "redirect"}));
    }

    #[test]
    fn test_auth_flow_type_display() {
        assert_eq!(AuthFlowType::Gateway.to_string(), "gateway");
    }
}
