use std::fmt;

use uuid::Uuid;

/// Identifier sent as `request-id` (and `interaction-id` where applicable)
/// to trace one logical call across retries and systems.
///
/// # Examples
///
/// ```
/// use blink_debit::identity::CorrelationId;
///
/// assert_eq!(CorrelationId::resolve(Some("order-42")).as_str(), "order-42");
///
/// let generated = CorrelationId::resolve(Some("   "));
/// assert_eq!(generated.as_str().len(), 36);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Uses the caller's value if it is not blank, otherwise generates a
    /// fresh UUID v4.
    #[must_use]
    pub fn resolve(supplied: Option<&str>) -> Self {
        match supplied {
            Some(value) if !value.trim().is_empty() => Self(value.to_owned()),
            _ => Self::generate(),
        }
    }

    /// Generates a fresh UUID v4 correlation id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
