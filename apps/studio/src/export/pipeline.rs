//! Export pipeline: document snapshot → delivered PDF.
//!
//! # Sequence
//! 1. Locate the preview anchor (missing → `Precondition`, nothing created).
//! 2. Create the offscreen surface.
//! 3. Detach a styled clone of the preview into the print root.
//! 4. Normalise links on the clone.
//! 5. Write the surface document and its stylesheets.
//! 6. Readiness barrier (bounded by the configured timeout).
//! 7. Typeset on a blocking worker: cascade + print sheet, layout, paginate, PDF.
//! 8. Tear the surface down.
//! 9. Deliver the finished bytes to the sink.
//!
//! The surface is a `TempDir`: every early return drops it, which removes it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::{ExportError, LinkNormalizationError};
use crate::export::links::normalize_links;
use crate::export::print_sheet::{print_stylesheet, PRINT_ROOT_ID};
use crate::export::sink::{ArtifactSink, DirectorySink};
use crate::export::surface::{FileKind, FsResourceLoader, OffscreenSurface, ResourceLoader};
use crate::layout::flow::layout;
use crate::layout::font_metrics::FontFace;
use crate::layout::page::PageSetup;
use crate::layout::paginate::{paginate, PageFillVerdict, Paginated, PaginationReport};
use crate::preview::html::{document_shell, to_html};
use crate::preview::page::Document;
use crate::preview::tree::{Element, Tag, PREVIEW_ANCHOR_ID};
use crate::render::pdf::{render_pdf, unencodable_chars};
use crate::style::cascade::style_tree;
use crate::style::palette::Rgb;
use crate::style::sheet::{Declaration, Stylesheet};
use crate::style::utility::stylesheet_for;

// ────────────────────────────────────────────────────────────────────────────
// Options & report
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub file_name: String,
    pub scratch_dir: Option<PathBuf>,
    pub ready_timeout: Duration,
    pub page: PageSetup,
}

impl ExportOptions {
    pub fn from_config(config: &Config) -> Self {
        ExportOptions {
            file_name: config.file_name.clone(),
            scratch_dir: config.scratch_dir.clone(),
            ready_timeout: config.ready_timeout,
            page: PageSetup::a4_portrait(),
        }
    }
}

/// Outcome of a successful export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub path: PathBuf,
    pub pages: usize,
    pub bytes: usize,
    /// Links dropped from the export; the rest of the document is intact.
    pub link_errors: Vec<LinkNormalizationError>,
    /// Characters the standard fonts cannot show; printed as `?`.
    pub missing_glyphs: Vec<char>,
    pub pagination: PaginationReport,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ExportPipeline {
    options: ExportOptions,
    loader: Arc<dyn ResourceLoader>,
    sink: Arc<dyn ArtifactSink>,
}

impl ExportPipeline {
    pub fn new(
        options: ExportOptions,
        loader: Arc<dyn ResourceLoader>,
        sink: Arc<dyn ArtifactSink>,
    ) -> Self {
        ExportPipeline {
            options,
            loader,
            sink,
        }
    }

    /// Filesystem loader and a directory sink at `config.output_dir`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ExportOptions::from_config(config),
            Arc::new(FsResourceLoader),
            Arc::new(DirectorySink::new(config.output_dir.clone())),
        )
    }

    pub async fn run(&self, document: Document) -> Result<ExportReport, ExportError> {
        let started_at = Utc::now();
        let anchor = document.anchor().ok_or_else(|| {
            ExportError::Precondition(format!(
                "Resume preview element (#{PREVIEW_ANCHOR_ID}) not found"
            ))
        })?;
        info!(title = %document.title, "Starting PDF export");

        let mut surface = OffscreenSurface::create(self.options.scratch_dir.as_deref())?;

        let mut root = detach_preview(anchor);
        let link_errors = normalize_links(&mut root, &document.base_url);
        if !link_errors.is_empty() {
            warn!(count = link_errors.len(), "Some links were dropped from the export");
        }

        let app_sheet = stylesheet_for(&root);
        let print_sheet = print_stylesheet(&self.options.page);
        write_surface(&mut surface, &document, &root, &app_sheet, &print_sheet).await?;
        surface
            .await_ready(self.loader.as_ref(), self.options.ready_timeout)
            .await?;

        let page = self.options.page.clone();
        let title = document.title.clone();
        let Typeset {
            bytes,
            pagination,
            missing_glyphs,
        } = tokio::task::spawn_blocking(move || typeset(&root, &print_sheet, &page, &title))
            .await
            .map_err(|e| ExportError::Unknown(anyhow!("Typesetting task panicked: {e}")))??;

        surface.teardown();
        if !missing_glyphs.is_empty() {
            warn!(
                chars = %missing_glyphs.iter().collect::<String>(),
                "Characters outside the PDF font encoding were replaced"
            );
        }

        let size = bytes.len();
        let path = self.sink.deliver(&self.options.file_name, bytes).await?;
        if pagination.verdict == PageFillVerdict::SparseLastPage {
            debug!(fill = ?pagination.fill, "Last page is sparsely filled");
        }
        info!(path = %path.display(), pages = pagination.page_count, "PDF export finished");

        Ok(ExportReport {
            path,
            pages: pagination.page_count,
            bytes: size,
            link_errors,
            missing_glyphs,
            pagination,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

/// Deep clone of the preview, without its id and with a forced white
/// background, mounted in the print root.
pub fn detach_preview(anchor: &Element) -> Element {
    let mut clone = anchor.clone();
    clone.id = None;
    clone.inline_style.push(Declaration::Background(Rgb::WHITE));
    Element::new(Tag::Div).with_id(PRINT_ROOT_ID).child(clone)
}

async fn write_surface(
    surface: &mut OffscreenSurface,
    document: &Document,
    root: &Element,
    app_sheet: &Stylesheet,
    print_sheet: &Stylesheet,
) -> Result<(), ExportError> {
    surface
        .write_file(FileKind::Stylesheet, "app.css", &app_sheet.to_css())
        .await?;
    surface
        .write_file(FileKind::Stylesheet, "print.css", &print_sheet.to_css())
        .await?;
    // Title intentionally empty so print headers stay clean.
    let html = document_shell(
        "",
        document.base_url.as_str(),
        &["app.css", "print.css"],
        &to_html(root),
    );
    surface
        .write_file(FileKind::Document, "index.html", &html)
        .await?;
    surface.require_font(FontFace::Regular);
    surface.require_font(FontFace::Bold);
    debug!(path = %surface.path().display(), "Print surface written");
    Ok(())
}

/// Styles, lays out and paginates the print root.
///
/// Utility classes resolve through the cascade itself, so only the print
/// sheet is layered on top.
pub fn compose(
    root: &Element,
    print_sheet: &Stylesheet,
    page: &PageSetup,
) -> Result<Paginated, ExportError> {
    let styled = style_tree(root, &[print_sheet]).ok_or_else(|| {
        ExportError::Unknown(anyhow!("print root is hidden by the print stylesheet"))
    })?;
    let flow = layout(&styled, page.content_width_px());
    Ok(paginate(&flow, page))
}

struct Typeset {
    bytes: Bytes,
    pagination: PaginationReport,
    missing_glyphs: Vec<char>,
}

fn typeset(
    root: &Element,
    print_sheet: &Stylesheet,
    page: &PageSetup,
    title: &str,
) -> Result<Typeset, ExportError> {
    let paginated = compose(root, print_sheet, page)?;
    let missing_glyphs = unencodable_chars(&paginated.pages);
    let bytes = render_pdf(&paginated.pages, page, title);
    Ok(Typeset {
        bytes,
        pagination: paginated.report,
        missing_glyphs,
    })
}
