use thiserror::Error;

use crate::media::Stage;

/// Main error type for the photo-slideshow library
#[derive(Error, Debug)]
pub enum SlideshowError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Processing failed: {0}")]
    Processing(#[from] ProcessingError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Input rejected before any engine invocation
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("At least {min} images are required, got {count}")]
    TooFewImages { count: usize, min: usize },

    #[error("Frame duration must be a positive number of seconds, got {value}")]
    InvalidFrameDuration { value: f64 },

    #[error("Mix volume must be within [0.0, 1.0], got {value}")]
    InvalidVolume { value: f64 },

    #[error("Invalid canvas size: {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    #[error("Unsupported image location: {uri}")]
    UnsupportedSource { uri: String },

    #[error("Could not read image dimensions from {uri}: {reason}")]
    UnreadableImage { uri: String, reason: String },

    #[error("Input file not found: {path}")]
    MissingInput { path: String },

    #[error("Request id must be a single path component: {id:?}")]
    InvalidRequestId { id: String },
}

/// Engine invocation and artifact errors
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("{stage} failed (exit code {}): {diagnostics}", exit_code_text(.exit_code))]
    EngineFailed {
        stage: Stage,
        exit_code: Option<i32>,
        diagnostics: String,
    },

    #[error("{stage} timed out after {seconds}s and was killed")]
    TimedOut { stage: Stage, seconds: u64 },

    #[error("Failed to start {program}: {reason}")]
    SpawnFailed { program: String, reason: String },

    #[error("Failed to write manifest {path}: {reason}")]
    ManifestWrite { path: String, reason: String },

    #[error("{stage} reported success but produced no file at {path}")]
    OutputMissing { stage: Stage, path: String },
}

fn exit_code_text(code: &Option<i32>) -> String {
    code.map(|c| c.to_string()).unwrap_or_else(|| "none".to_string())
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using SlideshowError
pub type Result<T> = std::result::Result<T, SlideshowError>;

impl SlideshowError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// True when the request was rejected before reaching the engine
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Engine diagnostic text, if this error came from a failed invocation
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            Self::Processing(ProcessingError::EngineFailed { diagnostics, .. }) => {
                Some(diagnostics.as_str())
            }
            _ => None,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(ValidationError::TooFewImages { min, .. }) => {
                format!("Please select at least {} photos to create a video.", min)
            }
            Self::Processing(ProcessingError::SpawnFailed { program, .. }) => {
                format!("Could not run '{}'. Please check that it is installed and on PATH.", program)
            }
            Self::Processing(ProcessingError::TimedOut { stage, seconds }) => {
                format!("The {} step took longer than {} seconds and was stopped.", stage, seconds)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
