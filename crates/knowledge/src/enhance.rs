//! Outcome of a best-effort pipeline step.

use serde::{Deserialize, Serialize};

/// Result of paraphrasing or translating.
///
/// A step never fails the request: when the backend cannot deliver, the
/// input comes back as `Fallback` together with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enhanced<T> {
    /// The step ran and produced a new value
    Enhanced(T),
    /// The step was intentionally not applied
    Skipped(T),
    /// The step failed; `value` is the unmodified input
    Fallback { value: T, reason: String },
}

impl<T> Enhanced<T> {
    pub fn fallback(value: T, reason: impl Into<String>) -> Self {
        Self::Fallback {
            value,
            reason: reason.into(),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Enhanced(value) | Self::Skipped(value) => value,
            Self::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Enhanced(value) | Self::Skipped(value) => value,
            Self::Fallback { value, .. } => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn status(&self) -> EnhancementStatus {
        match self {
            Self::Enhanced(_) => EnhancementStatus::Enhanced,
            Self::Skipped(_) => EnhancementStatus::Skipped,
            Self::Fallback { .. } => EnhancementStatus::Fallback,
        }
    }

    /// Status and reason without the value, for reporting.
    pub fn outcome(&self) -> StepOutcome {
        let reason = match self {
            Self::Fallback { reason, .. } => Some(reason.clone()),
            _ => None,
        };

        StepOutcome {
            status: self.status(),
            reason,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnhancementStatus {
    Enhanced,
    Skipped,
    Fallback,
}

/// What happened to one step of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub status: EnhancementStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl StepOutcome {
    /// Outcome of a step that never ran for this request.
    pub fn skipped() -> Self {
        Self {
            status: EnhancementStatus::Skipped,
            reason: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_keeps_original_value() {
        let result = Enhanced::fallback("text".to_string(), "backend down");
        assert!(result.is_fallback());
        assert_eq!(result.value(), "text");

        let outcome = result.outcome();
        assert_eq!(outcome.status, EnhancementStatus::Fallback);
        assert_eq!(outcome.reason.as_deref(), Some("backend down"));
        assert_eq!(result.into_value(), "text");
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = Enhanced::Enhanced(1).outcome();
        assert_eq!(serde_json::to_string(&outcome).unwrap(), r#"{"status":"enhanced"}"#);

        let skipped = serde_json::to_value(StepOutcome::skipped()).unwrap();
        assert_eq!(skipped["status"], "skipped");
    }
}
