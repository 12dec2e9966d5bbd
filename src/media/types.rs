use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Result, ValidationError};

/// One selected photo, identified by the location the picker handed us
///
/// Accepts bare filesystem paths and `file://` URIs. Other schemes
/// (`content://`, `http://`, ...) cannot be read by the engine directly and
/// are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSource {
    uri: String,
}

impl ImageSource {
    /// Create a source from a URI or path string
    pub fn new<S: Into<String>>(uri: S) -> Self {
        Self { uri: uri.into() }
    }

    /// The location as supplied by the caller
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Resolve the location to a local path
    pub fn local_path(&self) -> Result<PathBuf> {
        let uri = self.uri.trim();
        if uri.is_empty() {
            return Err(self.unsupported());
        }

        if let Some(rest) = uri.strip_prefix("file://") {
            // file:///abs/path and file://localhost/abs/path
            let rest = rest.strip_prefix("localhost").unwrap_or(rest);
            if rest.is_empty() {
                return Err(self.unsupported());
            }
            return Ok(PathBuf::from(rest));
        }

        if has_scheme(uri) {
            return Err(self.unsupported());
        }

        Ok(PathBuf::from(uri))
    }

    fn unsupported(&self) -> crate::SlideshowError {
        ValidationError::UnsupportedSource { uri: self.uri.clone() }.into()
    }
}

impl From<&str> for ImageSource {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::new(path.display().to_string())
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        Self::new(path.display().to_string())
    }
}

/// `scheme:` prefix with at least two scheme characters, so `C:\photos` is still a path
fn has_scheme(uri: &str) -> bool {
    match uri.find("://") {
        Some(idx) if idx >= 2 => uri[..idx]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        _ => false,
    }
}

/// Frame or image size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Scale to `width`, keeping this aspect ratio (height rounded to nearest)
    pub fn fit_width(&self, width: u32) -> Option<Self> {
        if self.is_empty() || width == 0 {
            return None;
        }
        let height = (width as f64 * self.height as f64 / self.width as f64).round() as u32;
        Some(Self::new(width, height.max(1)))
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Which of the two engine invocations an outcome belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Photos to silent video
    Sequence,
    /// Silent video plus music to final video
    Mix,
}

impl Stage {
    /// Fixed output file name for this stage inside a request directory
    pub fn output_file_name(&self) -> &'static str {
        match self {
            Stage::Sequence => "photo_sequence.mp4",
            Stage::Mix => "final_video.mp4",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Sequence => write!(f, "photo sequence"),
            Stage::Mix => write!(f, "audio mix"),
        }
    }
}

/// Outcome of one successful engine invocation
///
/// Failed invocations surface as `ProcessingError::EngineFailed` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingResult {
    pub stage: Stage,
    pub success: bool,
    /// Present only on success
    pub output_path: Option<PathBuf>,
    /// Engine log text
    pub diagnostics: String,
}

impl ProcessingResult {
    pub fn succeeded(stage: Stage, output_path: PathBuf, diagnostics: String) -> Self {
        Self {
            stage,
            success: true,
            output_path: Some(output_path),
            diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_path_resolution() {
        assert_eq!(
            ImageSource::new("/sdcard/DCIM/a.jpg").local_path().unwrap(),
            PathBuf::from("/sdcard/DCIM/a.jpg")
        );
        assert_eq!(
            ImageSource::new("file:///sdcard/DCIM/a.jpg").local_path().unwrap(),
            PathBuf::from("/sdcard/DCIM/a.jpg")
        );
        assert_eq!(
            ImageSource::new("file://localhost/tmp/b.png").local_path().unwrap(),
            PathBuf::from("/tmp/b.png")
        );
        assert_eq!(
            ImageSource::new("photos/c.jpg").local_path().unwrap(),
            PathBuf::from("photos/c.jpg")
        );
    }

    #[test]
    fn test_unsupported_schemes_rejected() {
        for uri in ["content://media/external/images/1", "https://example.com/a.jpg", "", "file://"] {
            let err = ImageSource::new(uri).local_path().unwrap_err();
            assert!(err.is_validation(), "{uri} should be rejected");
        }
    }

    #[test]
    fn test_fit_width() {
        let hd = Dimensions::new(1920, 1080);
        assert_eq!(hd.fit_width(1280), Some(Dimensions::new(1280, 720)));

        let portrait = Dimensions::new(3024, 4032);
        assert_eq!(portrait.fit_width(1280), Some(Dimensions::new(1280, 1707)));

        assert_eq!(Dimensions::new(0, 100).fit_width(1280), None);
    }

    #[test]
    fn test_stage_file_names() {
        assert_eq!(Stage::Sequence.output_file_name(), "photo_sequence.mp4");
        assert_eq!(Stage::Mix.output_file_name(), "final_video.mp4");
    }
}
