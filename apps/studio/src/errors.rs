use serde::Serialize;
use thiserror::Error;

use crate::export::notice::Notice;

/// Failure of one export run.
///
/// `to_notice` maps each variant to a stable code and the message shown to
/// the user; the detailed error only goes to the log.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The document is not in a state that can be exported (no preview anchor).
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// The offscreen surface could not be created, written or made ready.
    #[error("Environment failure: {0}")]
    Environment(String),

    #[error("Unexpected export failure: {0}")]
    Unknown(#[from] anyhow::Error),
}

impl ExportError {
    pub fn code(&self) -> &'static str {
        match self {
            ExportError::Precondition(_) => "PRECONDITION_FAILED",
            ExportError::Environment(_) => "ENVIRONMENT_FAILURE",
            ExportError::Unknown(_) => "UNKNOWN_FAILURE",
        }
    }

    pub fn to_notice(&self) -> Notice {
        let message = match self {
            ExportError::Precondition(_) => {
                "Failed to generate PDF. The resume preview is not available."
            }
            ExportError::Environment(_) => {
                "Failed to generate PDF. The print surface could not be prepared."
            }
            ExportError::Unknown(_) => "Failed to generate PDF. Please check the logs for details.",
        };
        Notice::error(self.code(), message)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Environment(e.to_string())
    }
}

/// A link whose `href` could not be made absolute. Non-fatal: the link is
/// dropped from the export and the anchor text is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("Invalid link '{href}' ({text}): {reason}")]
pub struct LinkNormalizationError {
    pub href: String,
    /// Visible text of the anchor.
    pub text: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::notice::NoticeLevel;

    #[test]
    fn test_each_variant_has_a_stable_code() {
        assert_eq!(
            ExportError::Precondition("x".into()).code(),
            "PRECONDITION_FAILED"
        );
        assert_eq!(
            ExportError::Environment("x".into()).code(),
            "ENVIRONMENT_FAILURE"
        );
        assert_eq!(
            ExportError::from(anyhow::anyhow!("boom")).code(),
            "UNKNOWN_FAILURE"
        );
    }

    #[test]
    fn test_notice_is_an_error_without_internal_detail() {
        let notice = ExportError::Environment("/tmp/x: permission denied".into()).to_notice();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.code, "ENVIRONMENT_FAILURE");
        assert!(notice.message.starts_with("Failed to generate PDF"));
        assert!(!notice.message.contains("/tmp/x"));
    }

    #[test]
    fn test_unknown_failure_notice_is_generic() {
        let notice = ExportError::from(anyhow::anyhow!("boom at render.rs:42")).to_notice();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.code, "UNKNOWN_FAILURE");
        assert_eq!(
            notice.message,
            "Failed to generate PDF. Please check the logs for details."
        );
        assert!(!notice.message.contains("boom"));
    }

    #[test]
    fn test_io_errors_are_environment_failures() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(ExportError::from(io), ExportError::Environment(_)));
    }
}
