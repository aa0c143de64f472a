//! Transient user-facing notifications (toasts).

use std::time::Duration;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warn,
    Error,
}

/// A toast for the presentation layer to show for `life`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    #[serde(with = "millis")]
    pub life: Duration,
}

impl Notification {
    /// Shown when a chat request fails.
    #[must_use]
    pub fn request_failed() -> Self {
        Self {
            severity: Severity::Error,
            summary: "Request Failed".to_string(),
            detail: "There is a problem with your request. Please try again.".to_string(),
            life: Duration::from_secs(5),
        }
    }

    /// Shown after a message was copied to the clipboard.
    #[must_use]
    pub fn copied() -> Self {
        Self {
            severity: Severity::Success,
            summary: "Copied".to_string(),
            detail: "Message copied to clipboard".to_string(),
            life: Duration::from_secs(2),
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::Serializer;

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u128(d.as_millis())
    }
}
