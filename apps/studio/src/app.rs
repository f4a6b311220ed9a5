//! Session root: owns the store, derives the preview and triggers exports.

use std::sync::Arc;

use anyhow::anyhow;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::config::Config;
use crate::editor::{compute_completeness_report, CompletenessReport, Edit};
use crate::errors::ExportError;
use crate::export::{download_resume_pdf, ExportOutcome, ExportPipeline, Notice};
use crate::models::{sample_resume, ResumeData};
use crate::preview::{render, render_page, Document, VisualTree};
use crate::state::ResumeStore;
use crate::style::{resolve, StyleParams};

pub struct App {
    store: ResumeStore,
    config: Config,
    pipeline: Arc<ExportPipeline>,
    notices: Vec<Notice>,
}

impl App {
    /// New session over the sample resume.
    pub fn new(config: Config) -> Self {
        let pipeline = Arc::new(ExportPipeline::from_config(&config));
        Self::with_pipeline(config, sample_resume(), pipeline)
    }

    pub fn with_pipeline(
        config: Config,
        initial: ResumeData,
        pipeline: Arc<ExportPipeline>,
    ) -> Self {
        App {
            store: ResumeStore::new(initial),
            config,
            pipeline,
            notices: Vec::new(),
        }
    }

    pub fn store(&self) -> &ResumeStore {
        &self.store
    }

    pub fn apply(&mut self, edit: Edit) {
        self.store.apply(edit);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn style(&self) -> StyleParams {
        let data = self.store.get_data();
        resolve(data.theme, data.template)
    }

    pub fn preview(&self) -> VisualTree {
        render(&self.store.get_data(), &self.style())
    }

    pub fn document(&self) -> Document {
        render_page(&self.store.get_data(), &self.style(), &self.config.base_url)
    }

    pub fn completeness(&self) -> CompletenessReport {
        compute_completeness_report(&self.store.get_data())
    }

    /// Starts an export of the current document on a background task.
    ///
    /// The task works on an owned snapshot, so the store may keep changing
    /// while it runs. Concurrent exports are not coordinated: two in flight
    /// race on the same output file and the last delivery wins.
    pub fn download_pdf(&self) -> ExportTask {
        let document = self.document();
        let pipeline = Arc::clone(&self.pipeline);
        debug!(revision = self.store.revision(), "Export requested");
        ExportTask {
            handle: tokio::spawn(async move { download_resume_pdf(&pipeline, document).await }),
        }
    }

    /// Keeps the notices of a finished export for display.
    pub fn record(&mut self, outcome: &ExportOutcome) {
        self.notices.extend(outcome.notices.iter().cloned());
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }
}

pub struct ExportTask {
    handle: JoinHandle<ExportOutcome>,
}

impl ExportTask {
    pub async fn wait(self) -> ExportOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Export task did not complete: {e}");
                let err = ExportError::Unknown(anyhow!("export task failed: {e}"));
                ExportOutcome {
                    report: None,
                    notices: vec![err.to_notice()],
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use async_trait::async_trait;
    use bytes::Bytes;

    use super::*;
    use crate::editor::edits::TextField;
    use crate::export::pipeline::ExportOptions;
    use crate::export::sink::ArtifactSink;
    use crate::export::surface::FsResourceLoader;
    use crate::export::NoticeLevel;
    use crate::models::{Template, Theme};
    use crate::preview::tree::PREVIEW_ANCHOR_ID;

    fn config(out: &std::path::Path) -> Config {
        Config {
            output_dir: out.to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn test_preview_follows_store_updates() {
        let out = tempfile::tempdir().unwrap();
        let mut app = App::new(config(out.path()));
        app.apply(Edit::SetTheme(Theme::Rose));
        app.apply(Edit::SetTemplate(Template::Creative));

        assert_eq!(app.style(), resolve(Theme::Rose, Template::Creative));
        assert!(app.document().anchor().is_some());
        assert_eq!(app.preview().root().id.as_deref(), Some(PREVIEW_ANCHOR_ID));
    }

    #[tokio::test]
    async fn test_export_uses_snapshot_while_store_changes() {
        let out = tempfile::tempdir().unwrap();
        let mut app = App::new(config(out.path()));

        let task = app.download_pdf();
        app.apply(Edit::SetText {
            field: TextField::Name,
            value: "Grace Hopper".into(),
        });
        let outcome = task.wait().await;
        app.record(&outcome);

        assert!(outcome.succeeded());
        assert_eq!(app.store().get_data().name, "Grace Hopper");
        assert_eq!(app.notices().len(), 1);
        assert_eq!(app.notices()[0].level, NoticeLevel::Success);

        let bytes = std::fs::read(out.path().join("resume.pdf")).unwrap();
        let text = pdf_extract::extract_text_from_mem(&bytes).unwrap();
        assert!(!text.contains("Grace Hopper"));
    }

    struct PanickingSink;

    #[async_trait]
    impl ArtifactSink for PanickingSink {
        async fn deliver(&self, _file_name: &str, _bytes: Bytes) -> Result<PathBuf, ExportError> {
            panic!("sink blew up");
        }
    }

    #[tokio::test]
    async fn test_panicked_export_task_becomes_error_notice() {
        let out = tempfile::tempdir().unwrap();
        let config = config(out.path());
        let pipeline = ExportPipeline::new(
            ExportOptions::from_config(&config),
            Arc::new(FsResourceLoader),
            Arc::new(PanickingSink),
        );
        let mut app = App::with_pipeline(config, sample_resume(), Arc::new(pipeline));

        let outcome = app.download_pdf().wait().await;
        app.record(&outcome);

        assert!(!outcome.succeeded());
        assert_eq!(app.notices().len(), 1);
        assert_eq!(app.notices()[0].level, NoticeLevel::Error);
        assert_eq!(app.notices()[0].code, "UNKNOWN_FAILURE");
        assert!(!app.notices()[0].message.contains("sink blew up"));
        assert!(!out.path().join("resume.pdf").exists());
    }

    #[test]
    fn test_completeness_of_sample_session() {
        let out = tempfile::tempdir().unwrap();
        let app = App::new(config(out.path()));
        assert_eq!(app.completeness().percent, 100);
    }
}
