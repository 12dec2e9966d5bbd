use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    composition::{
        composer::{CompositionOptions, SequenceComposer},
        mixer::{AudioMixer, MixOptions},
        workspace::{RequestDir, Workspace},
    },
    config::Config,
    engine::Engine,
    error::{ProcessingError, Result},
    media::{ImageSource, ProcessingResult, Stage},
};

/// Background music for a render
#[derive(Debug, Clone, PartialEq)]
pub struct MusicTrack {
    pub path: PathBuf,
    pub options: MixOptions,
}

impl MusicTrack {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            options: MixOptions::default(),
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.options.volume = Some(volume);
        self
    }
}

/// Results of both stages of one request
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub request_id: String,
    pub sequence: ProcessingResult,
    pub mixed: Option<ProcessingResult>,
}

impl RenderOutcome {
    /// The file to hand to preview/share: the mixed video when music was added
    pub fn final_path(&self) -> Option<&Path> {
        self.mixed
            .as_ref()
            .unwrap_or(&self.sequence)
            .output_path
            .as_deref()
    }
}

/// Runs the photo sequence stage and then, optionally, the music stage
///
/// The stages are strictly sequential: mixing reads the file the first stage
/// wrote and only starts once that stage has succeeded.
pub struct SlideshowPipeline<E> {
    composer: SequenceComposer<E>,
    mixer: AudioMixer<E>,
    workspace: Workspace,
}

impl<E: Engine> SlideshowPipeline<E> {
    pub fn new(config: &Config, engine: E) -> Self {
        Self::with_shared_engine(config, Arc::new(engine))
    }

    pub fn with_shared_engine(config: &Config, engine: Arc<E>) -> Self {
        Self {
            composer: SequenceComposer::new(
                engine.clone(),
                config.composition.clone(),
                config.encoding.clone(),
            ),
            mixer: AudioMixer::new(engine, config.mix.clone(), config.encoding.clone()),
            workspace: Workspace::from_config(&config.output),
        }
    }

    pub fn composer(&self) -> &SequenceComposer<E> {
        &self.composer
    }

    pub fn mixer(&self) -> &AudioMixer<E> {
        &self.mixer
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Render into a new request directory with a generated id
    pub async fn render_new(
        &self,
        images: &[ImageSource],
        options: &CompositionOptions,
        music: Option<&MusicTrack>,
    ) -> Result<RenderOutcome> {
        let request = self.workspace.new_request().await?;
        self.render(&request, images, options, music).await
    }

    /// Render into `request`, overwriting anything a previous run left there
    pub async fn render(
        &self,
        request: &RequestDir,
        images: &[ImageSource],
        options: &CompositionOptions,
        music: Option<&MusicTrack>,
    ) -> Result<RenderOutcome> {
        // Mix inputs are caller input too; reject them before the first encode
        if let Some(track) = music {
            self.mixer.check_track(&track.path, &track.options).await?;
        }

        info!("📸 Step 1: Composing photo sequence (request {})", request.id());
        let sequence = self.composer.compose(request, images, options).await.map_err(|e| {
            warn!("Photo sequence failed: {}", e);
            e
        })?;

        let silent_video = sequence
            .output_path
            .clone()
            .ok_or_else(|| ProcessingError::OutputMissing {
                stage: Stage::Sequence,
                path: request.output_path(Stage::Sequence).display().to_string(),
            })?;
        info!("   ✅ Silent video ready: {:?}", silent_video);

        let mixed = match music {
            Some(track) => {
                info!("🎵 Step 2: Mixing background music...");
                let result = self
                    .mixer
                    .mix(request, &silent_video, &track.path, &track.options)
                    .await
                    .map_err(|e| {
                        warn!("Audio mix failed: {}", e);
                        e
                    })?;
                info!("   ✅ Final video ready: {:?}", result.output_path);
                Some(result)
            }
            None => {
                debug!("No music track given, skipping audio mix");
                None
            }
        };

        Ok(RenderOutcome {
            request_id: request.id().to_string(),
            sequence,
            mixed,
        })
    }
}
