//! PDF export: print surface, link normalisation, typesetting and delivery.
//!
//! `download_resume_pdf` is the user-facing boundary. It never propagates an
//! error: failures are logged and turned into notices.

pub mod links;
pub mod notice;
pub mod pipeline;
pub mod print_sheet;
pub mod sink;
pub mod surface;

use serde::Serialize;
use tracing::error;

use crate::preview::page::Document;

pub use notice::{Notice, NoticeLevel};
pub use pipeline::{ExportPipeline, ExportReport};

#[derive(Debug, Clone, Serialize)]
pub struct ExportOutcome {
    pub report: Option<ExportReport>,
    pub notices: Vec<Notice>,
}

impl ExportOutcome {
    pub fn succeeded(&self) -> bool {
        self.report.is_some()
    }
}

/// Runs one export and reports back through notices.
pub async fn download_resume_pdf(pipeline: &ExportPipeline, document: Document) -> ExportOutcome {
    match pipeline.run(document).await {
        Ok(report) => {
            let mut notices = vec![Notice::saved(&report.path, report.pages)];
            if !report.link_errors.is_empty() {
                notices.push(Notice::links_dropped(&report.link_errors));
            }
            if !report.missing_glyphs.is_empty() {
                notices.push(Notice::glyphs_substituted(&report.missing_glyphs));
            }
            ExportOutcome {
                report: Some(report),
                notices,
            }
        }
        Err(err) => {
            error!(code = err.code(), error = ?err, "PDF export failed");
            ExportOutcome {
                report: None,
                notices: vec![err.to_notice()],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use url::Url;

    use super::*;
    use crate::export::pipeline::ExportOptions;
    use crate::export::sink::DirectorySink;
    use crate::export::surface::FsResourceLoader;
    use crate::layout::page::PageSetup;
    use crate::models::sample_resume;
    use crate::preview::page::render_page;
    use crate::preview::tree::{Element, Tag};
    use crate::style::resolve;

    fn pipeline(out: &std::path::Path) -> ExportPipeline {
        ExportPipeline::new(
            ExportOptions {
                file_name: "resume.pdf".into(),
                scratch_dir: None,
                ready_timeout: Duration::from_secs(5),
                page: PageSetup::a4_portrait(),
            },
            Arc::new(FsResourceLoader),
            Arc::new(DirectorySink::new(out)),
        )
    }

    fn sample_document() -> crate::preview::page::Document {
        let data = sample_resume();
        let base = Url::parse("http://localhost:5173/").unwrap();
        render_page(&data, &resolve(data.theme, data.template), &base)
    }

    #[tokio::test]
    async fn test_success_posts_saved_notice() {
        let out = tempfile::tempdir().unwrap();
        let outcome = download_resume_pdf(&pipeline(out.path()), sample_document()).await;

        assert!(outcome.succeeded());
        assert_eq!(outcome.notices.len(), 1);
        assert_eq!(outcome.notices[0].level, NoticeLevel::Success);
        assert_eq!(outcome.notices[0].code, "PDF_SAVED");
        assert!(out.path().join("resume.pdf").exists());
    }

    #[tokio::test]
    async fn test_dropped_link_adds_warning() {
        let out = tempfile::tempdir().unwrap();
        let mut data = sample_resume();
        data.contact.website = Some("http://[::1".into());
        let base = Url::parse("http://localhost:5173/").unwrap();
        let document = render_page(&data, &resolve(data.theme, data.template), &base);

        let outcome = download_resume_pdf(&pipeline(out.path()), document).await;
        assert!(outcome.succeeded());
        let levels: Vec<NoticeLevel> = outcome.notices.iter().map(|n| n.level).collect();
        assert_eq!(levels, vec![NoticeLevel::Success, NoticeLevel::Warning]);
    }

    #[tokio::test]
    async fn test_non_latin_name_adds_glyph_warning() {
        let out = tempfile::tempdir().unwrap();
        let mut data = sample_resume();
        data.name = "Иван Петров".into();
        let base = Url::parse("http://localhost:5173/").unwrap();
        let document = render_page(&data, &resolve(data.theme, data.template), &base);

        let outcome = download_resume_pdf(&pipeline(out.path()), document).await;
        assert!(outcome.succeeded());
        let report = outcome.report.as_ref().unwrap();
        assert!(report.missing_glyphs.contains(&'И'));
        assert!(!report.missing_glyphs.contains(&' '));
        let warning = &outcome.notices[1];
        assert_eq!(warning.level, NoticeLevel::Warning);
        assert_eq!(warning.code, "GLYPHS_SUBSTITUTED");
        assert!(warning.message.contains('П'));
    }

    #[tokio::test]
    async fn test_failure_becomes_error_notice() {
        let out = tempfile::tempdir().unwrap();
        let mut document = sample_document();
        document.root = Element::new(Tag::Main);

        let outcome = download_resume_pdf(&pipeline(out.path()), document).await;
        assert!(!outcome.succeeded());
        assert_eq!(outcome.notices.len(), 1);
        assert_eq!(outcome.notices[0].level, NoticeLevel::Error);
        assert_eq!(outcome.notices[0].code, "PRECONDITION_FAILED");
        assert!(outcome.notices[0].message.starts_with("Failed to generate PDF."));
    }
}
