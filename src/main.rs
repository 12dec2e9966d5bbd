use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use photo_slideshow::{
    composition::{CompositionOptions, MusicTrack, SlideshowPipeline},
    config::Config,
    engine::FfmpegEngine,
    media::ImageSource,
};

#[derive(Parser)]
#[command(
    name = "photo-slideshow",
    version,
    about = "Turn photos into a slideshow video with zoom and fade effects",
    long_about = "Photo-Slideshow assembles the given photos, in order, into a video with pan/zoom and fade transitions using ffmpeg, and can mix in a background music track."
)]
struct Cli {
    /// Photo path or file:// URI, in playback order (repeat for each photo)
    #[arg(short, long = "image", required = true)]
    images: Vec<String>,

    /// Background music file
    #[arg(short, long)]
    audio: Option<PathBuf>,

    /// Music volume (0.0-1.0)
    #[arg(long)]
    volume: Option<f64>,

    /// Root directory for request working directories
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Reuse a request directory instead of generating a new one
    #[arg(long)]
    request_id: Option<String>,

    /// Canvas width (requires --height)
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Canvas height (requires --width)
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Seconds each photo stays on screen
    #[arg(short = 'd', long)]
    frame_duration: Option<f64>,

    /// Disable the zoom/pan effect
    #[arg(long)]
    no_zoom: bool,

    /// Disable the fade effect
    #[arg(long)]
    no_fade: bool,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn composition_options(&self) -> CompositionOptions {
        let mut options = CompositionOptions {
            frame_duration: self.frame_duration,
            ..Default::default()
        };
        if let (Some(width), Some(height)) = (self.width, self.height) {
            options = options.with_scale(width, height);
        }
        if self.no_zoom {
            options = options.with_zoom_effect(false);
        }
        if self.no_fade {
            options = options.with_fade_effect(false);
        }
        options
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG takes precedence over --verbose
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    info!("Starting Photo-Slideshow v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };
    if let Some(dir) = &cli.output_dir {
        config.output.root = dir.clone();
    }

    let engine = FfmpegEngine::from_config(&config.engine);
    if !engine.is_available().await {
        warn!("'{}' did not respond to -version; rendering will likely fail", engine.program());
    }

    let pipeline = SlideshowPipeline::new(&config, engine);
    let request = match &cli.request_id {
        Some(id) => pipeline.workspace().request(id).await?,
        None => pipeline.workspace().new_request().await?,
    };

    let images: Vec<ImageSource> = cli.images.iter().map(|uri| ImageSource::new(uri.as_str())).collect();
    let music = cli.audio.as_ref().map(|path| MusicTrack {
        path: path.clone(),
        options: photo_slideshow::MixOptions { volume: cli.volume },
    });

    info!("Photos: {}", images.len());
    info!("Music: {:?}", cli.audio);
    info!("Request: {}", request.id());

    let outcome = pipeline
        .render(&request, &images, &cli.composition_options(), music.as_ref())
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    match outcome.final_path() {
        Some(path) => {
            info!("Slideshow complete! Output saved to: {:?}", path);
            println!("{}", path.display());
        }
        None => warn!("Render finished without an output path"),
    }

    Ok(())
}
