use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    composition::{run_stage, workspace::RequestDir},
    config::{CompositionConfig, EncodingConfig},
    engine::{Engine, EngineInput, EngineRequest, FilterArg},
    error::{Result, ValidationError},
    filter::FilterGraphSpec,
    media::{self, ConcatManifest, Dimensions, ImageSource, ProcessingResult, Stage},
};

/// Fewest photos a slideshow can be made from
pub const MIN_IMAGES: usize = 2;

/// Source of the silent audio stream added to the photo sequence
const SILENT_AUDIO_SOURCE: &str = "anullsrc=channel_layout=stereo:sample_rate=44100";

/// Per-request style options; unset fields fall back to configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositionOptions {
    /// Explicit canvas; when unset it is derived from the first photo
    pub scale: Option<Dimensions>,
    pub zoom_effect: Option<bool>,
    pub fade_effect: Option<bool>,
    /// Seconds each photo is held
    pub frame_duration: Option<f64>,
}

impl CompositionOptions {
    pub fn with_scale(mut self, width: u32, height: u32) -> Self {
        self.scale = Some(Dimensions::new(width, height));
        self
    }

    pub fn with_zoom_effect(mut self, enabled: bool) -> Self {
        self.zoom_effect = Some(enabled);
        self
    }

    pub fn with_fade_effect(mut self, enabled: bool) -> Self {
        self.fade_effect = Some(enabled);
        self
    }

    pub fn with_frame_duration(mut self, seconds: f64) -> Self {
        self.frame_duration = Some(seconds);
        self
    }
}

/// Options after defaults are applied and the canvas is known
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedComposition {
    pub frames: Vec<PathBuf>,
    pub graph: FilterGraphSpec,
    pub frame_duration: f64,
}

/// Turns an ordered list of photos into a silent slideshow video
pub struct SequenceComposer<E> {
    engine: Arc<E>,
    composition: CompositionConfig,
    encoding: EncodingConfig,
}

impl<E: Engine> SequenceComposer<E> {
    pub fn new(engine: Arc<E>, composition: CompositionConfig, encoding: EncodingConfig) -> Self {
        Self {
            engine,
            composition,
            encoding,
        }
    }

    /// Build and run the photo sequence stage for `request`
    ///
    /// Writes `image_list.txt` and produces `photo_sequence.mp4` in the
    /// request directory, replacing whatever a previous run left there.
    pub async fn compose(
        &self,
        request: &RequestDir,
        images: &[ImageSource],
        options: &CompositionOptions,
    ) -> Result<ProcessingResult> {
        let resolved = self.resolve(images, options).await?;
        info!(
            "Composing {} photos at {} ({}s per photo, zoom: {}, fade: {})",
            resolved.frames.len(),
            resolved.graph.canvas(),
            resolved.frame_duration,
            resolved.graph.zoom.is_some(),
            resolved.graph.fade.is_some(),
        );

        let manifest_path = request.manifest_path();
        let manifest: ConcatManifest = resolved.frames.iter().cloned().collect();
        manifest.write_to(&manifest_path).await?;

        let engine_request = build_sequence_request(
            &resolved,
            &self.encoding,
            self.composition.silent_audio_track,
            &manifest_path,
            request.output_path(Stage::Sequence),
        );

        run_stage(self.engine.as_ref(), &engine_request).await
    }

    /// Validate the request and work out the canvas and effects
    ///
    /// Nothing is written to disk here.
    pub async fn resolve(
        &self,
        images: &[ImageSource],
        options: &CompositionOptions,
    ) -> Result<ResolvedComposition> {
        if images.len() < MIN_IMAGES {
            return Err(ValidationError::TooFewImages {
                count: images.len(),
                min: MIN_IMAGES,
            }
            .into());
        }

        let frame_duration = options.frame_duration.unwrap_or(self.composition.frame_duration);
        if !frame_duration.is_finite() || frame_duration <= 0.0 {
            return Err(ValidationError::InvalidFrameDuration { value: frame_duration }.into());
        }

        if let Some(scale) = options.scale {
            if scale.is_empty() {
                return Err(ValidationError::InvalidCanvas {
                    width: scale.width,
                    height: scale.height,
                }
                .into());
            }
        }

        let frames = images
            .iter()
            .map(ImageSource::local_path)
            .collect::<Result<Vec<_>>>()?;

        let canvas = match options.scale {
            Some(scale) => scale,
            None => self.derive_canvas(&images[0], &frames[0]).await?,
        };

        let graph = FilterGraphSpec::for_canvas(
            canvas,
            options.zoom_effect.unwrap_or(self.composition.zoom_effect),
            options.fade_effect.unwrap_or(self.composition.fade_effect),
        );

        Ok(ResolvedComposition {
            frames,
            graph,
            frame_duration,
        })
    }

    /// Only the first photo's aspect ratio is used; later photos are letterboxed
    async fn derive_canvas(&self, first: &ImageSource, path: &Path) -> Result<Dimensions> {
        let source = media::probe_dimensions(first, path).await?;
        let canvas = source
            .fit_width(self.composition.default_width)
            .ok_or(ValidationError::InvalidCanvas {
                width: source.width,
                height: source.height,
            })?;

        debug!("First photo is {}, derived canvas {}", source, canvas);
        Ok(canvas)
    }
}

/// Engine request for the photo sequence stage
pub fn build_sequence_request(
    resolved: &ResolvedComposition,
    encoding: &EncodingConfig,
    silent_audio_track: bool,
    manifest_path: &Path,
    output: PathBuf,
) -> EngineRequest {
    let mut inputs = vec![EngineInput::with_options(
        manifest_path.display().to_string(),
        &["-f", "concat", "-safe", "0"],
    )];

    let mut output_options: Vec<String> = Vec::new();
    if silent_audio_track {
        inputs.push(EngineInput::with_options(SILENT_AUDIO_SOURCE, &["-f", "lavfi"]));
        output_options.extend(["-map", "0:v", "-map", "1:a"].map(String::from));
    }

    output_options.extend([
        "-r".to_string(),
        format!("1/{}", resolved.frame_duration),
        "-c:v".to_string(),
        encoding.video_codec.clone(),
        "-preset".to_string(),
        encoding.preset.clone(),
        "-crf".to_string(),
        encoding.crf.to_string(),
        "-pix_fmt".to_string(),
        encoding.pixel_format.clone(),
    ]);

    if silent_audio_track {
        output_options.extend([
            "-c:a".to_string(),
            encoding.audio_codec.clone(),
            "-shortest".to_string(),
        ]);
    }

    EngineRequest {
        stage: Stage::Sequence,
        inputs,
        filter: FilterArg::Video(resolved.graph.to_string()),
        output_options,
        output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::workspace::Workspace;
    use crate::engine::mock::MockEngine;
    use crate::SlideshowError;
    use image::RgbImage;
    use tempfile::{tempdir, TempDir};

    fn composer(engine: &Arc<MockEngine>) -> SequenceComposer<MockEngine> {
        SequenceComposer::new(
            engine.clone(),
            CompositionConfig::default(),
            EncodingConfig::default(),
        )
    }

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> ImageSource {
        let path = dir.join(name);
        RgbImage::new(width, height).save(&path).unwrap();
        ImageSource::from(path)
    }

    fn photos(dir: &TempDir) -> Vec<ImageSource> {
        vec![
            write_png(dir.path(), "one.png", 1920, 1080),
            write_png(dir.path(), "two.png", 1080, 1920),
            write_png(dir.path(), "three.png", 800, 800),
        ]
    }

    #[tokio::test]
    async fn test_compose_writes_manifest_in_input_order() {
        let dir = tempdir().unwrap();
        let images = vec![
            write_png(dir.path(), "c.png", 64, 48),
            write_png(dir.path(), "a.png", 64, 48),
            write_png(dir.path(), "b.png", 64, 48),
        ];
        let engine = Arc::new(MockEngine::succeeding());
        let request = Workspace::new(dir.path().join("out")).request("order").await.unwrap();

        composer(&engine)
            .compose(&request, &images, &CompositionOptions::default())
            .await
            .unwrap();

        let manifest = std::fs::read_to_string(request.manifest_path()).unwrap();
        let names: Vec<&str> = manifest
            .lines()
            .map(|line| line.rsplit('/').next().unwrap().trim_end_matches('\''))
            .collect();
        assert_eq!(names, vec!["c.png", "a.png", "b.png"]);
    }

    #[tokio::test]
    async fn test_canvas_derived_from_first_image() {
        let dir = tempdir().unwrap();
        let engine = Arc::new(MockEngine::succeeding());

        let resolved = composer(&engine)
            .resolve(&photos(&dir), &CompositionOptions::default())
            .await
            .unwrap();

        assert_eq!(resolved.graph.canvas(), Dimensions::new(1280, 720));
    }

    #[tokio::test]
    async fn test_explicit_scale_overrides_first_image() {
        let engine = Arc::new(MockEngine::succeeding());
        // Sources need not even be readable when the canvas is given
        let images = vec![ImageSource::new("/missing/a.jpg"), ImageSource::new("/missing/b.jpg")];

        let resolved = composer(&engine)
            .resolve(&images, &CompositionOptions::default().with_scale(720, 1280))
            .await
            .unwrap();

        assert_eq!(resolved.graph.canvas(), Dimensions::new(720, 1280));
        assert!(resolved.graph.to_string().starts_with("scale=720:1280:"));
    }

    #[tokio::test]
    async fn test_effects_default_on_and_can_be_disabled() {
        let dir = tempdir().unwrap();
        let engine = Arc::new(MockEngine::succeeding());
        let images = photos(&dir);
        let composer = composer(&engine);

        let defaults = composer.resolve(&images, &CompositionOptions::default()).await.unwrap();
        let graph = defaults.graph.to_string();
        assert!(graph.contains("zoompan="));
        assert!(graph.contains("fade=t=in"));
        assert_eq!(defaults.frame_duration, 3.0);

        let plain = composer
            .resolve(
                &images,
                &CompositionOptions::default().with_zoom_effect(false).with_fade_effect(false),
            )
            .await
            .unwrap();
        let graph = plain.graph.to_string();
        assert!(!graph.contains("zoompan"));
        assert!(!graph.contains("fade"));
    }

    #[tokio::test]
    async fn test_too_few_images_rejected_before_any_artifact() {
        let dir = tempdir().unwrap();
        let engine = Arc::new(MockEngine::succeeding());
        let request = Workspace::new(dir.path()).request("one-photo").await.unwrap();
        let images = vec![write_png(dir.path(), "only.png", 10, 10)];

        let err = composer(&engine)
            .compose(&request, &images, &CompositionOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SlideshowError::Validation(ValidationError::TooFewImages { count: 1, min: 2 })
        ));
        assert!(!request.manifest_path().exists());
        assert!(engine.calls().is_empty());
    }

    #[tokio::test]
    async fn test_non_positive_frame_duration_rejected() {
        let dir = tempdir().unwrap();
        let engine = Arc::new(MockEngine::succeeding());
        let images = photos(&dir);

        for value in [0.0, -1.0, f64::NAN] {
            let err = composer(&engine)
                .resolve(&images, &CompositionOptions::default().with_frame_duration(value))
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                SlideshowError::Validation(ValidationError::InvalidFrameDuration { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_unreadable_first_image() {
        let dir = tempdir().unwrap();
        let engine = Arc::new(MockEngine::succeeding());
        let bogus = dir.path().join("not-an-image.png");
        std::fs::write(&bogus, b"definitely not a png").unwrap();
        let images = vec![ImageSource::from(bogus), write_png(dir.path(), "ok.png", 10, 10)];

        let err = composer(&engine)
            .resolve(&images, &CompositionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SlideshowError::Validation(ValidationError::UnreadableImage { .. })
        ));
    }

    #[tokio::test]
    async fn test_engine_arguments() {
        let dir = tempdir().unwrap();
        let engine = Arc::new(MockEngine::succeeding());
        let request = Workspace::new(dir.path().join("out")).request("args").await.unwrap();

        composer(&engine)
            .compose(&request, &photos(&dir), &CompositionOptions::default().with_frame_duration(2.5))
            .await
            .unwrap();

        let calls = engine.calls();
        assert_eq!(calls.len(), 1);
        let args = calls[0].to_args();
        let manifest = request.manifest_path().display().to_string();
        let output = request.output_path(Stage::Sequence).display().to_string();

        assert_eq!(&args[2..7], ["-f", "concat", "-safe", "0", "-i"]);
        assert_eq!(args[7], manifest);
        assert!(args.windows(2).any(|w| w == ["-r", "1/2.5"]));
        assert!(args.windows(2).any(|w| w == ["-c:v", "libx264"]));
        assert!(args.windows(2).any(|w| w == ["-preset", "medium"]));
        assert!(args.windows(2).any(|w| w == ["-crf", "23"]));
        assert!(args.windows(2).any(|w| w == ["-pix_fmt", "yuv420p"]));
        assert_eq!(args.last(), Some(&output));
    }

    #[test]
    fn test_request_without_silent_audio() {
        let resolved = ResolvedComposition {
            frames: vec![PathBuf::from("/a.png"), PathBuf::from("/b.png")],
            graph: FilterGraphSpec::for_canvas(Dimensions::new(1280, 720), true, true),
            frame_duration: 3.0,
        };

        let request = build_sequence_request(
            &resolved,
            &EncodingConfig::default(),
            false,
            Path::new("/work/image_list.txt"),
            PathBuf::from("/work/photo_sequence.mp4"),
        );

        assert_eq!(
            request.to_args(),
            vec![
                "-hide_banner", "-y",
                "-f", "concat", "-safe", "0", "-i", "/work/image_list.txt",
                "-vf",
                "scale=1280:720:force_original_aspect_ratio=decrease,pad=1280:720:(ow-iw)/2:(oh-ih)/2,\
                 zoompan=z='min(zoom+0.05,1.5)':d=50,fade=t=in:st=0:d=1,fade=t=out:st=49:d=1",
                "-r", "1/3",
                "-c:v", "libx264", "-preset", "medium", "-crf", "23", "-pix_fmt", "yuv420p",
                "/work/photo_sequence.mp4",
            ]
        );
    }

    #[tokio::test]
    async fn test_engine_failure_carries_diagnostics() {
        let dir = tempdir().unwrap();
        let engine = Arc::new(MockEngine::with_exit_codes(&[1]));
        let request = Workspace::new(dir.path().join("out")).request("fail").await.unwrap();

        let err = composer(&engine)
            .compose(&request, &photos(&dir), &CompositionOptions::default())
            .await
            .unwrap_err();

        let diagnostics = err.diagnostics().expect("engine failure should carry diagnostics");
        assert!(!diagnostics.is_empty());
        assert!(!request.output_path(Stage::Sequence).exists());
    }

    #[tokio::test]
    async fn test_repeated_compose_reuses_path() {
        let dir = tempdir().unwrap();
        let engine = Arc::new(MockEngine::succeeding());
        let request = Workspace::new(dir.path().join("out")).request("again").await.unwrap();
        let images = photos(&dir);
        let composer = composer(&engine);

        let first = composer.compose(&request, &images, &CompositionOptions::default()).await.unwrap();
        let second = composer.compose(&request, &images, &CompositionOptions::default()).await.unwrap();

        assert!(first.success && second.success);
        assert_eq!(first.output_path, second.output_path);
        assert_eq!(first.output_path, Some(request.output_path(Stage::Sequence)));
        assert_eq!(std::fs::read_dir(request.dir()).unwrap().count(), 2);
    }
}
