//! # Photo-Slideshow
//!
//! Turn a handful of photos into a shareable slideshow video with pan/zoom
//! and fade effects, optionally set to music.
//!
//! All pixel and audio work is done by `ffmpeg`. This library builds the
//! filter graphs, lays out per-request working files and drives the two
//! engine stages in order.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use photo_slideshow::{
//!     composition::{CompositionOptions, MusicTrack, SlideshowPipeline},
//!     config::Config,
//!     engine::FfmpegEngine,
//!     media::ImageSource,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let engine = FfmpegEngine::from_config(&config.engine);
//! let pipeline = SlideshowPipeline::new(&config, engine);
//!
//! let photos = vec![
//!     ImageSource::new("file:///sdcard/DCIM/beach.jpg"),
//!     ImageSource::new("file:///sdcard/DCIM/sunset.jpg"),
//!     ImageSource::new("file:///sdcard/DCIM/dinner.jpg"),
//! ];
//! let music = MusicTrack::new("assets/summer.mp3").with_volume(0.3);
//!
//! let outcome = pipeline
//!     .render_new(&photos, &CompositionOptions::default(), Some(&music))
//!     .await?;
//! println!("Video ready at {:?}", outcome.final_path());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`composition`] - sequence composer, audio mixer, pipeline and request directories
//! - [`filter`] - typed filter-graph stages and their serialization
//! - [`engine`] - the engine capability and its `ffmpeg` implementation
//! - [`media`] - photo sources, dimensions, stage outcomes and the concat manifest
//! - [`config`] - configuration management

pub mod composition;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod media;

// Re-export commonly used types for convenience
pub use crate::{
    composition::{CompositionOptions, MixOptions, SlideshowPipeline},
    config::Config,
    engine::{Engine, FfmpegEngine},
    error::{Result, SlideshowError},
    media::{ImageSource, ProcessingResult},
};
