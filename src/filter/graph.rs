use std::fmt;

use crate::media::Dimensions;

/// Per-frame zoom increment of the zoom/pan ramp
pub const ZOOM_STEP: f64 = 0.05;

/// Zoom factor the ramp is capped at
pub const ZOOM_MAX: f64 = 1.5;

/// Length of the effect window, counted in output frames of the zoom stage
///
/// The fade-out is placed at the end of this same window, so both stages
/// derive their timing from this one value.
pub const EFFECT_WINDOW_FRAMES: u32 = 50;

/// Fade-in and fade-out length
pub const FADE_SECONDS: u32 = 1;

/// Letterbox scale: fit inside the canvas without changing aspect ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale {
    pub canvas: Dimensions,
}

/// Center the scaled frame on the full canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pad {
    pub canvas: Dimensions,
}

/// Continuous zoom ramp from 1.0 towards `max_zoom`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomPan {
    pub step: f64,
    pub max_zoom: f64,
    pub frames: u32,
}

impl Default for ZoomPan {
    fn default() -> Self {
        Self {
            step: ZOOM_STEP,
            max_zoom: ZOOM_MAX,
            frames: EFFECT_WINDOW_FRAMES,
        }
    }
}

/// Fade in at the start of the effect window and out at its end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fade {
    pub duration: u32,
    pub window: u32,
}

impl Fade {
    pub fn fade_out_start(&self) -> u32 {
        self.window.saturating_sub(self.duration)
    }
}

impl Default for Fade {
    fn default() -> Self {
        Self {
            duration: FADE_SECONDS,
            window: EFFECT_WINDOW_FRAMES,
        }
    }
}

/// One filter in the serialized `-vf` chain
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterStage {
    Scale(Scale),
    Pad(Pad),
    ZoomPan(ZoomPan),
    FadeIn { start: u32, duration: u32 },
    FadeOut { start: u32, duration: u32 },
}

impl FilterStage {
    /// Filter name as understood by the engine
    pub fn name(&self) -> &'static str {
        match self {
            FilterStage::Scale(_) => "scale",
            FilterStage::Pad(_) => "pad",
            FilterStage::ZoomPan(_) => "zoompan",
            FilterStage::FadeIn { .. } | FilterStage::FadeOut { .. } => "fade",
        }
    }
}

impl fmt::Display for FilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterStage::Scale(Scale { canvas }) => write!(
                f,
                "scale={}:{}:force_original_aspect_ratio=decrease",
                canvas.width, canvas.height
            ),
            FilterStage::Pad(Pad { canvas }) => {
                write!(f, "pad={}:{}:(ow-iw)/2:(oh-ih)/2", canvas.width, canvas.height)
            }
            FilterStage::ZoomPan(zoom) => write!(
                f,
                "zoompan=z='min(zoom+{},{})':d={}",
                zoom.step, zoom.max_zoom, zoom.frames
            ),
            FilterStage::FadeIn { start, duration } => {
                write!(f, "fade=t=in:st={}:d={}", start, duration)
            }
            FilterStage::FadeOut { start, duration } => {
                write!(f, "fade=t=out:st={}:d={}", start, duration)
            }
        }
    }
}

/// Video filter graph for the photo sequence stage
///
/// Scale and pad always come first; the optional effects operate on the
/// letterboxed canvas. The struct layout fixes that order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterGraphSpec {
    pub scale: Scale,
    pub pad: Pad,
    pub zoom: Option<ZoomPan>,
    pub fade: Option<Fade>,
}

impl FilterGraphSpec {
    /// Graph for `canvas` with the default effect parameters
    pub fn for_canvas(canvas: Dimensions, zoom_effect: bool, fade_effect: bool) -> Self {
        Self {
            scale: Scale { canvas },
            pad: Pad { canvas },
            zoom: zoom_effect.then(ZoomPan::default),
            fade: fade_effect.then(Fade::default),
        }
    }

    pub fn canvas(&self) -> Dimensions {
        self.pad.canvas
    }

    /// Stages in application order
    pub fn stages(&self) -> Vec<FilterStage> {
        let mut stages = vec![FilterStage::Scale(self.scale), FilterStage::Pad(self.pad)];

        if let Some(zoom) = self.zoom {
            stages.push(FilterStage::ZoomPan(zoom));
        }

        if let Some(fade) = self.fade {
            stages.push(FilterStage::FadeIn { start: 0, duration: fade.duration });
            stages.push(FilterStage::FadeOut {
                start: fade.fade_out_start(),
                duration: fade.duration,
            });
        }

        stages
    }
}

impl fmt::Display for FilterGraphSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in self.stages().iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", stage)?;
        }
        Ok(())
    }
}
