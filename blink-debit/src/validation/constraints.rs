//! Declarative field constraints checked after the fail-fast rules.
//!
//! Unlike the rules, the sweep reports every violation at once. Only declared
//! formats are checked: redirect and callback URIs are free-form strings.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    error::{ConstraintViolation, ValidationError},
    models::Amount,
};

/// Pattern an amount total must match.
pub const TOTAL_PATTERN: &str = r"^\d{1,10}\.\d{1,2}$";

static TOTAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TOTAL_PATTERN).expect("total pattern is a valid regex"));

/// Collects constraint violations in field order.
#[derive(Debug, Default)]
pub(crate) struct ConstraintSweep {
    violations: Vec<ConstraintViolation>,
}

impl ConstraintSweep {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// `amount.total` must match [`TOTAL_PATTERN`].
    pub(crate) fn amount(&mut self, amount: Option<&Amount>) -> &mut Self {
        if let Some(amount) = amount
            && !TOTAL_REGEX.is_match(&amount.total)
        {
            self.violations.push(ConstraintViolation::new(
                "amount.total",
                format!("must match \"{TOTAL_PATTERN}\""),
            ));
        }
        self
    }

    /// Fails with every collected violation, if any.
    pub(crate) fn finish(&mut self, subject: &'static str) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            return Ok(());
        }
        let violations = std::mem::take(&mut self.violations);
        tracing::debug!(subject, count = violations.len(), "constraint validation failed");
        Err(ValidationError::Constraints { subject, violations })
    }
}
