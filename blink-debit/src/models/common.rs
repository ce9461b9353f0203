//! Value types shared by consents, quick payments and refunds.

use serde::{Deserialize, Serialize};

/// Particulars, code and reference shown on the payer's bank statement.
///
/// Each field is limited to 12 characters and `particulars` must not be blank.
/// Both rules are enforced by [`crate::validation`], not by construction.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pcr {
    /// Particulars (required).
    pub particulars: Option<String>,
    /// Code.
    pub code: Option<String>,
    /// Reference.
    pub reference: Option<String>,
}

impl Pcr {
    /// Creates a PCR with all three fields set.
    pub fn new(
        particulars: impl Into<String>,
        code: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            particulars: Some(particulars.into()),
            code: Some(code.into()),
            reference: Some(reference.into()),
        }
    }
}

/// ISO 4217 currency code accepted by the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// New Zealand dollar.
    #[default]
    #[serde(rename = "NZD")]
    Nzd,
}

/// A monetary amount.
///
/// `total` is a decimal string such as `"25.00"`; its format is checked by the
/// validation constraint sweep.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    /// Currency of the amount.
    pub currency: Option<Currency>,
    /// Decimal total.
    pub total: String,
}

impl Amount {
    /// Creates an NZD amount.
    pub fn nzd(total: impl Into<String>) -> Self {
        Self { currency: Some(Currency::Nzd), total: total.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pcr_omits_absent_fields() {
        let pcr = Pcr { particulars: Some("particulars".to_owned()), ..Pcr::default() };
        let json = serde_json::to_string(&pcr).unwrap();
        assert_eq!(json, r#"{"particulars":"particulars"}"#);
    }

    #[test]
    fn test_amount_serializes_currency_code() {
        let json = serde_json::to_value(Amount::nzd("25.00")).unwrap();
        assert_eq!(json, serde_json::json!({"currency": "NZD", "total": "25.00"}));
    }

    #[test]
    fn test_amount_deserializes() {
        let amount: Amount = serde_json::from_str(r#"{"currency":"NZD","total":"1.25"}"#).unwrap();
        assert_eq!(amount, Amount::nzd("1.25"));
    }
}
