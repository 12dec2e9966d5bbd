use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::debug;

use crate::config::OutputConfig;
use crate::error::{Result, ValidationError};
use crate::media::Stage;

/// File name of the concat manifest inside a request directory
pub const MANIFEST_FILE_NAME: &str = "image_list.txt";

/// Root directory under which every request gets its own working directory
///
/// Artifact names are fixed inside a request directory, so running the same
/// request id twice overwrites the earlier artifacts, while distinct ids can
/// run concurrently without touching each other's files.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.root.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Timestamp plus random suffix, e.g. `20261019T142501Z-9f3a01c2`
    pub fn generate_request_id() -> String {
        let suffix: u32 = rand::thread_rng().gen();
        format!("{}-{:08x}", chrono::Utc::now().format("%Y%m%dT%H%M%SZ"), suffix)
    }

    /// Open (creating if needed) the directory for `id`
    pub async fn request(&self, id: &str) -> Result<RequestDir> {
        if !is_valid_request_id(id) {
            return Err(ValidationError::InvalidRequestId { id: id.to_string() }.into());
        }

        let dir = self.root.join(id);
        tokio::fs::create_dir_all(&dir).await?;
        debug!("Using request directory {:?}", dir);

        Ok(RequestDir {
            id: id.to_string(),
            dir,
        })
    }

    /// Open a directory for a freshly generated id
    pub async fn new_request(&self) -> Result<RequestDir> {
        self.request(&Self::generate_request_id()).await
    }
}

fn is_valid_request_id(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Working directory of one end-to-end request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDir {
    id: String,
    dir: PathBuf,
}

impl RequestDir {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE_NAME)
    }

    pub fn output_path(&self, stage: Stage) -> PathBuf {
        self.dir.join(stage.output_file_name())
    }
}
