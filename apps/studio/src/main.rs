mod app;
mod config;
mod editor;
mod errors;
mod export;
mod layout;
mod models;
mod preview;
mod render;
mod state;
mod style;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::app::App;
use crate::config::Config;
use crate::editor::{all_steps_complete, Edit, Step};
use crate::export::NoticeLevel;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Studio v{}", env!("CARGO_PKG_VERSION"));

    let mut app = App::new(config);
    info!(
        output_dir = %app.config().output_dir.display(),
        base_url = %app.config().base_url,
        "Session ready"
    );

    if let Some(path) = app.config().edits_file.clone() {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read edits file {}", path.display()))?;
        let edits: Vec<Edit> = serde_json::from_str(&raw)
            .with_context(|| format!("Edits file {} is not a JSON list of edits", path.display()))?;
        let count = edits.len();
        for edit in edits {
            app.apply(edit);
        }
        info!(count, revision = app.store().revision(), "Applied edits from {}", path.display());
    }

    let completeness = app.completeness();
    info!(
        "Resume is {}% complete ({}/{} sections)",
        completeness.percent, completeness.filled_sections, completeness.total_sections
    );
    let data = app.store().get_data();
    let mut step = Step::Basic;
    loop {
        info!(
            step = step.label(),
            complete = step.is_complete(&data),
            "{}",
            step.description()
        );
        if step.next() == step {
            break;
        }
        step = step.next();
    }
    if !all_steps_complete(&data) {
        warn!("Some editor steps are still incomplete");
    }

    let preview = app.preview();
    info!(
        theme = data.theme.as_str(),
        theme_style = data.theme.description(),
        template = data.template.as_str(),
        template_style = data.template.description(),
        features = ?data.template.features(),
        "Preview rendered"
    );
    for section in preview.outline() {
        info!(
            section = section.key,
            entries = section.entries,
            verified = section.verified,
            "Preview section"
        );
    }

    let outcome = app.download_pdf().wait().await;
    app.record(&outcome);
    if let Some(report) = &outcome.report {
        info!("Export report: {}", serde_json::to_string(report)?);
    }
    if !outcome.succeeded() {
        warn!("No PDF was produced");
    }
    for notice in app.notices() {
        match notice.level {
            NoticeLevel::Success => info!("{}", notice.message),
            NoticeLevel::Warning | NoticeLevel::Error => warn!("{}", notice.message),
        }
    }

    Ok(())
}
