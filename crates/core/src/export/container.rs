//! Scoped off-screen render container.

use crate::{ReportError, ReportResult};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary directory the PDF is staged in. Removed when the guard drops, whether or not the
/// export succeeded.
#[derive(Debug)]
pub struct RenderContainer {
    dir: TempDir,
}

impl RenderContainer {
    pub fn acquire() -> ReportResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix("clinic-report-render-")
            .tempdir()
            .map_err(ReportError::RenderContainer)?;
        tracing::debug!(path = %dir.path().display(), "render container acquired");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `bytes` into the container under `file_name`.
    pub fn stage(&self, file_name: &str, bytes: &[u8]) -> ReportResult<PathBuf> {
        let path = self.dir.path().join(file_name);
        std::fs::write(&path, bytes).map_err(ReportError::PdfStage)?;
        Ok(path)
    }
}

impl Drop for RenderContainer {
    fn drop(&mut self) {
        tracing::debug!(path = %self.dir.path().display(), "render container released");
    }
}
