//! Request and response models for the Blink Debit API.
//!
//! Mutually exclusive shapes are closed enums tagged by a `type`
//! discriminator:
//!
//! | Enum | Discriminator values |
//! |------|----------------------|
//! | [`AuthFlowDetail`] | `redirect`, `decoupled`, `gateway` |
//! | [`FlowHint`] | `redirect`, `decoupled` |
//! | [`RefundDetail`] | `full_refund`, `partial_refund`, `account_number` |
//! | [`ConsentDetail`] | `single` |
//!
//! The discriminator is written from the variant when serializing and selects
//! the variant when deserializing; an unknown value is a decode error.
//!
//! Request fields the validation engine checks for presence are `Option`s so
//! that an incomplete request can be represented and rejected with a specific
//! message instead of failing to construct.

mod api_error;
mod common;
mod consent;
mod flow;
mod oauth;
mod quick_payment;
mod refund;

pub use api_error::ApiErrorResponse;
pub use common::{Amount, Currency, Pcr};
pub use consent::{
    Account, Consent, ConsentDetail, ConsentStatus, CreateConsentResponse, Payment, PaymentStatus,
    SingleConsentRequest,
};
pub use flow::{
    AuthFlow, AuthFlowDetail, AuthFlowType, Bank, DecoupledFlow, DecoupledFlowHint, FlowHint,
    FlowHintType, GatewayFlow, IdentifierType, RedirectFlow, RedirectFlowHint,
};
pub use oauth::{AccessTokenRequest, AccessTokenResponse, CLIENT_CREDENTIALS_GRANT};
pub use quick_payment::{CreateQuickPaymentResponse, QuickPaymentRequest, QuickPaymentResponse};
pub use refund::{
    AccountNumberRefundRequest, FullRefundRequest, PartialRefundRequest, Refund, RefundDetail,
    RefundResponse, RefundStatus, RefundType,
};
