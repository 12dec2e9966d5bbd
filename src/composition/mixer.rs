use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    composition::{run_stage, workspace::RequestDir},
    config::{EncodingConfig, MixConfig},
    engine::{Engine, EngineInput, EngineRequest, FilterArg},
    error::{Result, ValidationError},
    filter::{MixGraphSpec, MIX_OUTPUT_LABEL, VIDEO_STREAM},
    media::{ProcessingResult, Stage},
};

/// Per-request mix options
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MixOptions {
    /// Music weight in [0.0, 1.0]; configuration default when unset
    pub volume: Option<f64>,
}

impl MixOptions {
    pub fn with_volume(volume: f64) -> Self {
        Self { volume: Some(volume) }
    }
}

/// Lays a music track under the slideshow's video stream
pub struct AudioMixer<E> {
    engine: Arc<E>,
    mix: MixConfig,
    encoding: EncodingConfig,
}

impl<E: Engine> AudioMixer<E> {
    pub fn new(engine: Arc<E>, mix: MixConfig, encoding: EncodingConfig) -> Self {
        Self {
            engine,
            mix,
            encoding,
        }
    }

    /// Mix `audio_track` into `silent_video`, producing `final_video.mp4`
    ///
    /// The video stream is copied untouched; the mixed audio is cut to the
    /// video's length.
    pub async fn mix(
        &self,
        request: &RequestDir,
        silent_video: &Path,
        audio_track: &Path,
        options: &MixOptions,
    ) -> Result<ProcessingResult> {
        let volume = self.check_track(audio_track, options).await?;
        require_file(silent_video).await?;

        info!("Mixing {:?} under {:?} at volume {}", audio_track, silent_video, volume);

        let engine_request = build_mix_request(
            silent_video,
            audio_track,
            volume,
            &self.encoding,
            request.output_path(Stage::Mix),
        );

        run_stage(self.engine.as_ref(), &engine_request).await
    }

    /// Validate the caller-supplied mix inputs and return the volume to use
    ///
    /// Touches neither the engine nor the request directory, so it can run
    /// before the sequence stage.
    pub async fn check_track(&self, audio_track: &Path, options: &MixOptions) -> Result<f64> {
        let volume = self.resolve_volume(options)?;
        require_file(audio_track).await?;
        Ok(volume)
    }

    /// Out-of-range volumes are rejected rather than clamped
    pub fn resolve_volume(&self, options: &MixOptions) -> Result<f64> {
        let volume = options.volume.unwrap_or(self.mix.volume);
        if !volume.is_finite() || !(0.0..=1.0).contains(&volume) {
            return Err(ValidationError::InvalidVolume { value: volume }.into());
        }
        Ok(volume)
    }
}

async fn require_file(path: &Path) -> Result<()> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Err(ValidationError::MissingInput {
            path: path.display().to_string(),
        }
        .into());
    }
    Ok(())
}

/// Engine request for the audio mix stage
pub fn build_mix_request(
    silent_video: &Path,
    audio_track: &Path,
    volume: f64,
    encoding: &EncodingConfig,
    output: PathBuf,
) -> EngineRequest {
    EngineRequest {
        stage: Stage::Mix,
        inputs: vec![
            EngineInput::file(silent_video.display().to_string()),
            EngineInput::file(audio_track.display().to_string()),
        ],
        filter: FilterArg::Complex(MixGraphSpec::new(volume).to_string()),
        output_options: vec![
            "-map".to_string(),
            VIDEO_STREAM.to_string(),
            "-map".to_string(),
            MIX_OUTPUT_LABEL.to_string(),
            "-c:v".to_string(),
            "copy".to_string(),
            "-c:a".to_string(),
            encoding.audio_codec.clone(),
        ],
        output,
    }
}
