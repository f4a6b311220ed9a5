//! Artifact delivery.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::info;

use crate::errors::ExportError;

/// Receives finished artifacts. Only complete artifacts are ever handed over.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Stores `bytes` under `file_name`, returning where it ended up.
    async fn deliver(&self, file_name: &str, bytes: Bytes) -> Result<PathBuf, ExportError>;
}

/// Writes artifacts into a directory: bytes go to a temp file next to the
/// target, which is then renamed over it, so readers never see a partial PDF.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySink { dir: dir.into() }
    }
}

fn write_atomically(dir: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl ArtifactSink for DirectorySink {
    async fn deliver(&self, file_name: &str, bytes: Bytes) -> Result<PathBuf, ExportError> {
        let dir = self.dir.clone();
        let target = dir.join(file_name);
        let destination = target.clone();
        let size = bytes.len();

        tokio::task::spawn_blocking(move || write_atomically(&dir, &destination, &bytes))
            .await
            .map_err(|e| ExportError::Unknown(anyhow::anyhow!("Delivery task panicked: {e}")))?
            .map_err(|e| {
                ExportError::Environment(format!("cannot write {}: {e}", target.display()))
            })?;

        info!(path = %target.display(), bytes = size, "Delivered artifact");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deliver_writes_complete_file() {
        let out = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(out.path().join("nested"));
        let path = sink
            .deliver("resume.pdf", Bytes::from_static(b"%PDF-1.7 body"))
            .await
            .unwrap();
        assert_eq!(path, out.path().join("nested").join("resume.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.7 body");
        // only the final file remains: no temp leftovers
        assert_eq!(std::fs::read_dir(out.path().join("nested")).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_deliver_replaces_previous_artifact() {
        let out = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(out.path());
        sink.deliver("r.pdf", Bytes::from_static(b"old")).await.unwrap();
        sink.deliver("r.pdf", Bytes::from_static(b"new")).await.unwrap();
        assert_eq!(std::fs::read(out.path().join("r.pdf")).unwrap(), b"new");
    }
}
