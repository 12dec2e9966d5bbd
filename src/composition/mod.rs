//! # Slideshow Composition
//!
//! The two engine stages and the pipeline that chains them:
//!
//! 1. [`SequenceComposer`] - photos to a silent video
//! 2. [`AudioMixer`] - silent video plus music to the final video
//!
//! Each request works inside its own [`RequestDir`], so concurrent requests
//! never share manifest or output files.

pub mod composer;
pub mod mixer;
pub mod pipeline;
pub mod workspace;

pub use composer::{CompositionOptions, SequenceComposer, MIN_IMAGES};
pub use mixer::{AudioMixer, MixOptions};
pub use pipeline::{MusicTrack, RenderOutcome, SlideshowPipeline};
pub use workspace::{RequestDir, Workspace};

use tracing::{info, warn};

use crate::{
    engine::{Engine, EngineRequest},
    error::{ProcessingError, Result},
    media::ProcessingResult,
};

/// Invoke the engine once and turn its exit status into a result
///
/// Only successful runs come back as a [`ProcessingResult`]; a failed run is
/// `Err(ProcessingError::EngineFailed)` carrying the engine's diagnostics.
/// Failures are never retried: a non-zero exit can't be told apart from a
/// permanent one, so the diagnostics go back to the caller instead.
pub(crate) async fn run_stage<E: Engine>(engine: &E, request: &EngineRequest) -> Result<ProcessingResult> {
    let output = engine.invoke(request).await?;

    if !output.success() {
        let diagnostics = output.diagnostics_or_status();
        warn!("{} failed with exit code {:?}:\n{}", request.stage, output.exit_code, diagnostics);
        return Err(ProcessingError::EngineFailed {
            stage: request.stage,
            exit_code: output.exit_code,
            diagnostics,
        }
        .into());
    }

    if !tokio::fs::try_exists(&request.output).await.unwrap_or(false) {
        return Err(ProcessingError::OutputMissing {
            stage: request.stage,
            path: request.output.display().to_string(),
        }
        .into());
    }

    info!("{} finished: {:?}", request.stage, request.output);
    Ok(ProcessingResult::succeeded(
        request.stage,
        request.output.clone(),
        output.diagnostics,
    ))
}
