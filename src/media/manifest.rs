use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ProcessingError, Result};

/// Input list for ffmpeg's concat demuxer
///
/// Line order is the temporal order of the resulting video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcatManifest {
    entries: Vec<PathBuf>,
}

impl ConcatManifest {
    pub fn new(entries: Vec<PathBuf>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as `file '<path>'` lines
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|path| format!("file '{}'", quote_concat_path(&path.display().to_string())))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Write the manifest, replacing any previous file at `path`
    pub async fn write_to(&self, path: &Path) -> Result<()> {
        let mut content = self.render();
        content.push('\n');

        tokio::fs::write(path, content)
            .await
            .map_err(|e| ProcessingError::ManifestWrite {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        debug!("Wrote manifest with {} entries to {:?}", self.len(), path);
        Ok(())
    }
}

impl FromIterator<PathBuf> for ConcatManifest {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(absolute_or_original).collect())
    }
}

/// The demuxer resolves relative entries against the manifest's directory, not ours
fn absolute_or_original(path: PathBuf) -> PathBuf {
    path.canonicalize().unwrap_or(path)
}

/// Close the quote, emit an escaped quote, reopen
fn quote_concat_path(path: &str) -> String {
    path.replace('\'', r"'\''")
}
