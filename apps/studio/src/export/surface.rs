//! Offscreen print surface.
//!
//! A scratch directory holding the standalone export document and its
//! stylesheets. It lives exactly as long as one export: `teardown` removes it
//! on success, and dropping it on any error path removes it as well.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tracing::{debug, warn};

use crate::errors::ExportError;
use crate::layout::font_metrics::FontFace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Document,
    Stylesheet,
}

/// Something the surface needs before it can be typeset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceResource {
    File { kind: FileKind, path: PathBuf },
    Font(FontFace),
}

/// Loads one surface resource. The readiness barrier awaits every resource
/// through this seam.
#[async_trait]
pub trait ResourceLoader: Send + Sync {
    async fn load(&self, resource: &SurfaceResource) -> anyhow::Result<()>;
}

/// Default loader: reads files back from the surface. The standard PDF faces
/// are built into every reader, so fonts are ready immediately.
pub struct FsResourceLoader;

#[async_trait]
impl ResourceLoader for FsResourceLoader {
    async fn load(&self, resource: &SurfaceResource) -> anyhow::Result<()> {
        match resource {
            SurfaceResource::File { path, .. } => {
                let bytes = tokio::fs::read(path).await?;
                std::str::from_utf8(&bytes)
                    .map_err(|e| anyhow::anyhow!("{} is not UTF-8: {e}", path.display()))?;
                Ok(())
            }
            SurfaceResource::Font(_) => Ok(()),
        }
    }
}

pub struct OffscreenSurface {
    dir: TempDir,
    resources: Vec<SurfaceResource>,
}

impl OffscreenSurface {
    /// Creates a fresh scratch directory under `root` (system temp dir when
    /// `None`).
    pub fn create(root: Option<&Path>) -> Result<Self, ExportError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("resume-print-");
        let dir = match root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|e| ExportError::Environment(format!("cannot create print surface: {e}")))?;
        debug!(path = %dir.path().display(), "Created print surface");
        Ok(OffscreenSurface {
            dir,
            resources: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub async fn write_file(
        &mut self,
        kind: FileKind,
        name: &str,
        contents: &str,
    ) -> Result<PathBuf, ExportError> {
        let path = self.dir.path().join(name);
        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| ExportError::Environment(format!("cannot write {name}: {e}")))?;
        self.resources.push(SurfaceResource::File {
            kind,
            path: path.clone(),
        });
        Ok(path)
    }

    pub fn require_font(&mut self, face: FontFace) {
        let resource = SurfaceResource::Font(face);
        if !self.resources.contains(&resource) {
            self.resources.push(resource);
        }
    }

    /// Readiness barrier: every resource loaded, within `limit`.
    pub async fn await_ready(
        &self,
        loader: &dyn ResourceLoader,
        limit: Duration,
    ) -> Result<(), ExportError> {
        let all_loaded = async {
            for resource in &self.resources {
                loader.load(resource).await.map_err(|e| {
                    ExportError::Environment(format!("resource {resource:?} failed to load: {e}"))
                })?;
            }
            Ok::<(), ExportError>(())
        };
        match tokio::time::timeout(limit, all_loaded).await {
            Ok(result) => result,
            Err(_) => Err(ExportError::Environment(format!(
                "print surface not ready within {}ms",
                limit.as_millis()
            ))),
        }
    }

    /// Removes the scratch directory, reporting (not failing on) problems.
    pub fn teardown(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            warn!(path = %path.display(), "Failed to remove print surface: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StalledLoader;

    #[async_trait]
    impl ResourceLoader for StalledLoader {
        async fn load(&self, _resource: &SurfaceResource) -> anyhow::Result<()> {
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    struct FailingLoader;

    #[async_trait]
    impl ResourceLoader for FailingLoader {
        async fn load(&self, _resource: &SurfaceResource) -> anyhow::Result<()> {
            anyhow::bail!("font server unreachable")
        }
    }

    #[tokio::test]
    async fn test_surface_files_are_written_and_ready() {
        let scratch = tempfile::tempdir().unwrap();
        let mut surface = OffscreenSurface::create(Some(scratch.path())).unwrap();
        let path = surface
            .write_file(FileKind::Stylesheet, "print.css", "p { color: red; }")
            .await
            .unwrap();
        surface.require_font(FontFace::Regular);
        surface.require_font(FontFace::Regular);

        assert!(path.starts_with(scratch.path()));
        assert_eq!(surface.resources.len(), 2);
        surface
            .await_ready(&FsResourceLoader, Duration::from_secs(1))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_teardown_removes_directory() {
        let scratch = tempfile::tempdir().unwrap();
        let surface = OffscreenSurface::create(Some(scratch.path())).unwrap();
        let path = surface.path().to_path_buf();
        assert!(path.exists());
        surface.teardown();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_drop_removes_directory() {
        let scratch = tempfile::tempdir().unwrap();
        let path = {
            let surface = OffscreenSurface::create(Some(scratch.path())).unwrap();
            surface.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_loader_times_out() {
        let mut surface = OffscreenSurface::create(None).unwrap();
        surface.require_font(FontFace::Bold);
        let err = surface
            .await_ready(&StalledLoader, Duration::from_millis(500))
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Environment(ref m) if m.contains("500ms")));
    }

    #[tokio::test]
    async fn test_failed_load_is_environment_failure() {
        let mut surface = OffscreenSurface::create(None).unwrap();
        surface.require_font(FontFace::Regular);
        let err = surface
            .await_ready(&FailingLoader, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "ENVIRONMENT_FAILURE");
    }

    #[test]
    fn test_missing_scratch_root_is_environment_failure() {
        let err = OffscreenSurface::create(Some(Path::new("/definitely/not/here")))
            .err()
            .unwrap();
        assert!(matches!(err, ExportError::Environment(_)));
    }
}
