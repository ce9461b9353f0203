//! Retry handling for transient API failures.

mod retry;

pub use retry::{Backoff, RetryPolicy, is_retryable, retry_with_backoff};
