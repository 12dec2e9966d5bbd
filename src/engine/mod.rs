//! # Engine Boundary
//!
//! All pixel and audio work is done by an external multimedia engine. The
//! orchestration code only ever talks to it through [`Engine::invoke`]: one
//! request in, one exit status plus log text out.

pub mod ffmpeg;

#[cfg(test)]
pub(crate) mod mock;

pub use ffmpeg::FfmpegEngine;

use std::future::Future;
use std::path::PathBuf;

use crate::error::Result;
use crate::media::Stage;

/// One input file together with the options that must precede its `-i`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInput {
    pub options: Vec<String>,
    pub location: String,
}

impl EngineInput {
    pub fn file<S: Into<String>>(location: S) -> Self {
        Self {
            options: Vec::new(),
            location: location.into(),
        }
    }

    pub fn with_options<S: Into<String>>(location: S, options: &[&str]) -> Self {
        Self {
            options: options.iter().map(|o| o.to_string()).collect(),
            location: location.into(),
        }
    }
}

/// The filter graph of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterArg {
    /// Single-input chain (`-vf`)
    Video(String),
    /// Multi-input graph with labelled pads (`-filter_complex`)
    Complex(String),
}

impl FilterArg {
    pub fn graph(&self) -> &str {
        match self {
            FilterArg::Video(graph) | FilterArg::Complex(graph) => graph,
        }
    }

    fn flag(&self) -> &'static str {
        match self {
            FilterArg::Video(_) => "-vf",
            FilterArg::Complex(_) => "-filter_complex",
        }
    }
}

/// Everything the engine needs for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineRequest {
    pub stage: Stage,
    pub inputs: Vec<EngineInput>,
    pub filter: FilterArg,
    pub output_options: Vec<String>,
    pub output: PathBuf,
}

impl EngineRequest {
    /// Argument vector, program name excluded
    ///
    /// Existing output files are overwritten (`-y`).
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["-hide_banner".to_string(), "-y".to_string()];

        for input in &self.inputs {
            args.extend(input.options.iter().cloned());
            args.push("-i".to_string());
            args.push(input.location.clone());
        }

        args.push(self.filter.flag().to_string());
        args.push(self.filter.graph().to_string());
        args.extend(self.output_options.iter().cloned());
        args.push(self.output.display().to_string());
        args
    }
}

/// Terminal status of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOutput {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub diagnostics: String,
}

impl EngineOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Log text, or a description of the exit status when the engine printed nothing
    pub fn diagnostics_or_status(&self) -> String {
        let trimmed = self.diagnostics.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
        match self.exit_code {
            Some(code) => format!("engine exited with status {} and printed no diagnostics", code),
            None => "engine was terminated by a signal and printed no diagnostics".to_string(),
        }
    }
}

/// Capability to run one engine request to completion
pub trait Engine: Send + Sync {
    fn invoke(&self, request: &EngineRequest) -> impl Future<Output = Result<EngineOutput>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_argument_order() {
        let request = EngineRequest {
            stage: Stage::Mix,
            inputs: vec![
                EngineInput::file("/work/photo_sequence.mp4"),
                EngineInput::with_options("/music/track.mp3", &["-stream_loop", "0"]),
            ],
            filter: FilterArg::Complex("[0:a][1:a]amix=inputs=2[a]".to_string()),
            output_options: vec!["-map".to_string(), "0:v".to_string()],
            output: PathBuf::from("/work/final_video.mp4"),
        };

        assert_eq!(
            request.to_args(),
            vec![
                "-hide_banner", "-y",
                "-i", "/work/photo_sequence.mp4",
                "-stream_loop", "0", "-i", "/music/track.mp3",
                "-filter_complex", "[0:a][1:a]amix=inputs=2[a]",
                "-map", "0:v",
                "/work/final_video.mp4",
            ]
        );
    }

    #[test]
    fn test_diagnostics_never_empty() {
        let output = EngineOutput { exit_code: Some(1), diagnostics: "  \n".to_string() };
        assert_eq!(
            output.diagnostics_or_status(),
            "engine exited with status 1 and printed no diagnostics"
        );

        let output = EngineOutput { exit_code: None, diagnostics: String::new() };
        assert!(!output.diagnostics_or_status().is_empty());
        assert!(!output.success());
    }
}
