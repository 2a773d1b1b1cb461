//! The renderer boundary
//!
//! The core never renders anything itself. Once the scene is staged it is handed
//! to a [`Renderer`], which blocks until the video file has been written.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::gfx::scene::Scene;

use super::backend::RenderBackend;

/// Video container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Container {
    #[default]
    Mpeg4,
    Matroska,
    Ogg,
    Avi,
}

impl Container {
    pub fn identifier(&self) -> &'static str {
        match self {
            Container::Mpeg4 => "mp4",
            Container::Matroska => "mkv",
            Container::Ogg => "ogg",
            Container::Avi => "avi",
        }
    }
}

/// Video codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VideoCodec {
    #[default]
    H264,
    Hevc,
    Vp9,
    Ffv1,
}

impl VideoCodec {
    pub fn identifier(&self) -> &'static str {
        match self {
            VideoCodec::H264 => "h264",
            VideoCodec::Hevc => "hevc",
            VideoCodec::Vp9 => "vp9",
            VideoCodec::Ffv1 => "ffv1",
        }
    }
}

/// Where and how the video is written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    pub path: PathBuf,
    pub container: Container,
    pub codec: VideoCodec,
}

impl OutputSettings {
    /// MPEG-4 / H.264 output at `path`
    pub fn video(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            container: Container::Mpeg4,
            codec: VideoCodec::H264,
        }
    }

    /// Forces the MPEG-4 / H.264 contract, whatever a project asked for
    pub fn force_video_contract(&mut self) {
        self.container = Container::Mpeg4;
        self.codec = VideoCodec::H264;
    }
}

/// Everything a renderer needs besides the scene itself
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    pub output: OutputSettings,
    pub frame_start: i32,
    pub frame_end: i32,
    pub fps: u32,
    /// Backend chosen by probing; `None` leaves the choice to the renderer
    pub backend: Option<RenderBackend>,
}

impl RenderJob {
    pub fn from_scene(scene: &Scene, backend: Option<RenderBackend>) -> Self {
        Self {
            output: scene.output.clone(),
            frame_start: scene.frame_start,
            frame_end: scene.frame_end,
            fps: scene.fps,
            backend,
        }
    }

    pub fn frame_count(&self) -> u32 {
        (self.frame_end - self.frame_start + 1).max(0) as u32
    }
}

/// External renderer that turns a finalized scene into one video file
pub trait Renderer {
    /// Name for logging
    fn name(&self) -> &str;

    /// Whether the renderer can use the given backend
    fn supports_backend(&self, backend: RenderBackend) -> bool;

    /// Renders the scene; blocks until the video is written
    fn render(&self, scene: &Scene, job: &RenderJob) -> Result<(), RenderError>;
}
