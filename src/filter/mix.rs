use std::fmt;

/// Output label of the mixed audio stream
pub const MIX_OUTPUT_LABEL: &str = "[a]";

/// Video stream passed through unchanged by the mix stage
pub const VIDEO_STREAM: &str = "0:v";

/// `amix` graph combining the video's own audio with a music track
///
/// The mixed stream lasts as long as the first input (the video), so the
/// music is cut at the end of the slideshow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixGraphSpec {
    /// Weight of the music track; the video's own audio keeps weight 1
    pub music_weight: f64,
}

impl MixGraphSpec {
    pub fn new(music_weight: f64) -> Self {
        Self { music_weight }
    }
}

impl fmt::Display for MixGraphSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[0:a][1:a]amix=inputs=2:duration=first:weights=1 {}{}",
            self.music_weight, MIX_OUTPUT_LABEL
        )
    }
}
