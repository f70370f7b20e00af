//! Notification sink consumed by the engine.
//!
//! The pool never surfaces user-input errors through return types alone;
//! they are reported here and the operation aborts with no state change.

use serde::{Deserialize, Serialize};

/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Success,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Success => "success",
        }
    }
}

/// Sink for user-visible messages.
///
/// The UI layer decides how messages are rendered; the engine only reports.
pub trait Notifier: Send + Sync {
    fn report(&self, message: &str, severity: Severity);
}
