//! Creates a redirect single consent and polls it.
//!
//! # Running this example
//!
//! ```bash
//! export BLINKPAY_CLIENT_ID=<client id>
//! export BLINKPAY_CLIENT_SECRET=<client secret>
//! LOG_FORMAT=json RUST_LOG=blink_debit=debug cargo run --example single_consent
//! ```
//!
//! `BLINKPAY_DEBIT_URL` defaults to the sandbox.

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "examples are allowed to use println"
)]

use std::io;

use blink_debit::{
    BlinkConfig, BlinkDebitClient,
    models::{AuthFlowType, Bank},
    validation::ConsentFields,
};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Installs a stderr subscriber; `LOG_FORMAT=json` switches to JSON lines.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_writer(io::stderr),
            )
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_writer(io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = BlinkConfig::from_env()?;
    let client = BlinkDebitClient::from_config(&config)?;

    let fields = ConsentFields {
        flow_type: Some(AuthFlowType::Redirect),
        bank: Some(Bank::Pnz),
        redirect_uri: Some("https://www.blinkpay.co.nz/sample-merchant-return-page".to_owned()),
        particulars: Some("particulars".to_owned()),
        code: Some("code".to_owned()),
        reference: Some("reference".to_owned()),
        total: Some("1.25".to_owned()),
        ..ConsentFields::default()
    };

    let created = client.create_single_consent_with_fields(&fields, None).await?;
    println!("Consent created: {}", created.consent_id);
    if let Some(redirect_uri) = &created.redirect_uri {
        println!("Send the customer to: {redirect_uri}");
    }

    let consent = client.get_single_consent(Some(created.consent_id), None).await?;
    println!("Status: {:?}", consent.status);

    client.revoke_single_consent(Some(created.consent_id), None).await?;
    println!("Consent revoked");

    Ok(())
}
