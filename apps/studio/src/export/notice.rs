//! User-visible outcome messages of an export.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::LinkNormalizationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub code: &'static str,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notice {
    fn new(level: NoticeLevel, code: &'static str, message: impl Into<String>) -> Self {
        Notice {
            level,
            code,
            message: message.into(),
            at: Utc::now(),
        }
    }

    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, code, message)
    }

    pub fn saved(path: &Path, pages: usize) -> Self {
        let plural = if pages == 1 { "" } else { "s" };
        Self::new(
            NoticeLevel::Success,
            "PDF_SAVED",
            format!("Saved {} ({pages} page{plural}).", path.display()),
        )
    }

    pub fn glyphs_substituted(chars: &[char]) -> Self {
        Self::new(
            NoticeLevel::Warning,
            "GLYPHS_SUBSTITUTED",
            format!(
                "{} character(s) cannot be shown by the PDF fonts and were printed as '?': {}",
                chars.len(),
                chars.iter().collect::<String>()
            ),
        )
    }

    pub fn links_dropped(errors: &[LinkNormalizationError]) -> Self {
        let texts: Vec<&str> = errors.iter().map(|e| e.text.as_str()).collect();
        Self::new(
            NoticeLevel::Warning,
            "LINKS_DROPPED",
            format!(
                "{} link(s) could not be resolved and are not clickable in the PDF: {}",
                errors.len(),
                texts.join(", ")
            ),
        )
    }
}
