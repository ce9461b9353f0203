//! Error handling example showing how to tell the error kinds apart.
//!
//! The first two examples never reach the network: validation and token
//! checks run before anything is sent. The third needs sandbox credentials.
//!
//! # Running this example
//!
//! ```bash
//! export BLINKPAY_CLIENT_ID=<client id>
//! export BLINKPAY_CLIENT_SECRET=<client secret>
//! cargo run --example error_handling
//! ```

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "examples are allowed to use println"
)]

use blink_debit::{
    BlinkConfig, BlinkDebitClient, BlinkError,
    models::{FullRefundRequest, Pcr, RefundDetail, RefundResponse},
    reliability::is_retryable,
};
use uuid::Uuid;

/// An access token that expired on 2020-09-13.
const EXPIRED_TOKEN: &str = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.\
                             eyJzdWIiOiJtZXJjaGFudCIsImV4cCI6MTYwMDAwMDAwMH0.c2lnbmF0dXJl";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Blink Debit: Error Handling Example\n");

    let config = BlinkConfig::from_env()?;
    let client = BlinkDebitClient::from_config(&config)?;

    // Example 1: refund without a payment ID
    println!("Example 1: Refund without payment ID (should fail)");
    let refund = RefundDetail::FullRefund(FullRefundRequest {
        pcr: Some(Pcr::new("particulars", "code", "reference")),
        consent_redirect: Some("https://merchant.example.com/refunds".to_owned()),
        ..FullRefundRequest::default()
    });
    handle_refund_result(client.create_refund(&refund, None).await);

    // Example 2: expired caller token
    println!("\nExample 2: Expired access token (should fail)");
    let expired = client.with_access_token(EXPIRED_TOKEN)?;
    handle_refund_result(expired.create_refund(&refund, None).await);

    // Example 3: server-side rejection of an unknown payment
    println!("\nExample 3: Refund of an unknown payment");
    let refund = RefundDetail::FullRefund(FullRefundRequest {
        payment_id: Some(Uuid::new_v4()),
        pcr: Some(Pcr::new("particulars", "code", "reference")),
        consent_redirect: Some("https://merchant.example.com/refunds".to_owned()),
    });
    handle_refund_result(client.create_refund(&refund, None).await);

    println!("\nError handling examples complete");
    Ok(())
}

/// Demonstrates error handling with recovery guidance.
fn handle_refund_result(result: blink_debit::Result<RefundResponse>) {
    match result {
        Ok(refund) => println!("   Refund created: {}", refund.refund_id),

        // Rejected before sending - fix input and retry
        Err(BlinkError::Validation(e)) => {
            eprintln!("   Validation failed: {e}");
            eprintln!("   -> Fix: Correct the request; nothing was sent");
        }

        // Token problems - obtain a new token
        Err(BlinkError::ExpiredToken | BlinkError::InvalidToken(_)) => {
            eprintln!("   Access token rejected before sending");
            eprintln!("   -> Fix: Request a new token or use client credentials");
        }

        // Server answered
        Err(e @ BlinkError::Http { .. }) => {
            eprintln!("   API rejected the refund: {e}");
            if is_retryable(&e) {
                eprintln!("   -> Retry: Transient, retries were already attempted");
            } else {
                eprintln!("   -> Fix: Check the payment ID and refund amount");
            }
        }

        // Transport failure - request may have reached the API
        Err(BlinkError::Network(e)) => {
            eprintln!("   Network error: {e}");
            eprintln!("   -> Check: Look the refund up before creating it again");
        }

        Err(e) => eprintln!("   Other error: {e}"),
    }
}
