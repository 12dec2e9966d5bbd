//! # Media Types
//!
//! Photo sources, frame dimensions, per-stage outcomes and the concat
//! manifest that turns discrete photos into a frame sequence.

pub mod manifest;
pub mod types;

pub use manifest::ConcatManifest;
pub use types::{Dimensions, ImageSource, ProcessingResult, Stage};

use std::path::Path;

use tokio::task;

use crate::error::{Result, SlideshowError, ValidationError};

/// Read an image's pixel size from its header without decoding the pixels
pub async fn probe_dimensions(source: &ImageSource, path: &Path) -> Result<Dimensions> {
    let owned = path.to_path_buf();
    let (width, height) = task::spawn_blocking(move || image::image_dimensions(owned))
        .await
        .map_err(|e| SlideshowError::generic(format!("Dimension probe task failed: {}", e)))?
        .map_err(|e| ValidationError::UnreadableImage {
            uri: source.uri().to_string(),
            reason: e.to_string(),
        })?;

    Ok(Dimensions::new(width, height))
}
