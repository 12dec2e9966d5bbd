use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Main configuration for photo-slideshow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Slideshow defaults applied when a request leaves an option unset
    pub composition: CompositionConfig,

    /// Fixed encoder parameters for the sequence and mix stages
    pub encoding: EncodingConfig,

    /// Audio mix defaults
    pub mix: MixConfig,

    /// External engine settings
    pub engine: EngineConfig,

    /// Where per-request working directories are created
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.composition.validate()?;
        self.encoding.validate()?;
        self.mix.validate()?;
        self.engine.validate()?;
        Ok(())
    }
}

fn invalid(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Slideshow composition defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionConfig {
    /// Canvas width used when no explicit scale is given; height follows the first image
    pub default_width: u32,

    /// Seconds each photo is held on screen
    pub frame_duration: f64,

    /// Enable the zoom/pan stage when a request does not say otherwise
    pub zoom_effect: bool,

    /// Enable the fade stage when a request does not say otherwise
    pub fade_effect: bool,

    /// Add a silent audio stream to the photo sequence so the mixer has an `[0:a]` input
    pub silent_audio_track: bool,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            default_width: 1280,
            frame_duration: 3.0,
            zoom_effect: true,
            fade_effect: true,
            silent_audio_track: true,
        }
    }
}

impl CompositionConfig {
    fn validate(&self) -> Result<()> {
        if self.default_width == 0 {
            return Err(invalid("composition.default_width", self.default_width).into());
        }

        if !self.frame_duration.is_finite() || self.frame_duration <= 0.0 {
            return Err(invalid("composition.frame_duration", self.frame_duration).into());
        }

        Ok(())
    }
}

/// Encoder parameters chosen for broad playback compatibility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    pub video_codec: String,
    pub preset: String,
    /// Constant rate factor (0-51, lower is better)
    pub crf: u8,
    pub pixel_format: String,
    pub audio_codec: String,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            preset: "medium".to_string(),
            crf: 23,
            pixel_format: "yuv420p".to_string(),
            audio_codec: "aac".to_string(),
        }
    }
}

impl EncodingConfig {
    fn validate(&self) -> Result<()> {
        if self.crf > 51 {
            return Err(invalid("encoding.crf", self.crf).into());
        }

        for (key, value) in [
            ("encoding.video_codec", &self.video_codec),
            ("encoding.preset", &self.preset),
            ("encoding.pixel_format", &self.pixel_format),
            ("encoding.audio_codec", &self.audio_codec),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(key, value).into());
            }
        }

        Ok(())
    }
}

/// Audio mix defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixConfig {
    /// Weight of the music track (0.0-1.0)
    pub volume: f64,
}

impl Default for MixConfig {
    fn default() -> Self {
        Self { volume: 0.5 }
    }
}

impl MixConfig {
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(invalid("mix.volume", self.volume).into());
        }
        Ok(())
    }
}

/// External engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Program name or path of the ffmpeg binary
    pub program: String,

    /// Upper bound on a single invocation, after which the process is killed
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: "ffmpeg".to_string(),
            timeout_secs: 600,
        }
    }
}

impl EngineConfig {
    fn validate(&self) -> Result<()> {
        if self.program.trim().is_empty() {
            return Err(invalid("engine.program", &self.program).into());
        }

        if self.timeout_secs == 0 {
            return Err(invalid("engine.timeout_secs", self.timeout_secs).into());
        }

        Ok(())
    }
}

/// Output location settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root under which each request gets its own directory
    pub root: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./slideshow_output"),
        }
    }
}
