//! # Configuration
//!
//! Two layers feed a run:
//!
//! - [`PipelineConfig`]: tuning constants (frame defaults, lens, light strengths),
//!   optionally loaded from a JSON file. Every field has a default, so a config
//!   file only needs the values it changes.
//! - [`CliOptions`]: the per-invocation request parsed from the command line.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::classify::TextureTarget;
use crate::error::ConfigError;
use crate::gfx::camera::PRODUCT_FOCAL_LENGTH_MM;

pub const USAGE: &str = "\
Usage: turntable --input <path> --output <path> [options]

Options:
  --input <path>                 3D asset (.obj, .gltf, .glb) or project file (.json)
  --output <path>                Destination video (MPEG-4 / H.264)
  --texture <path>               Image applied to every subject material
  --texture_front <path>         Image applied to front materials
  --texture_back <path>          Image applied to back materials
  --texture_background <path>    Image applied to background materials
  --frames <int>                 Frame count (0 = auto)
  --rotations <float>            Turntable rotations (negative = auto-detect)
  --test                         Render a single frame
  --renderer <path>              Renderer executable (default: $TURNTABLE_RENDERER)
  --config <path>                JSON file with tuning overrides
  --inspect                      Print the loaded scene settings and exit
  --help                         Show this message
";

/// Camera framing constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub focal_length_mm: f32,
    /// Camera distance in front of the center, in multiples of the scene size
    pub distance_factor: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            focal_length_mm: PRODUCT_FOCAL_LENGTH_MM,
            distance_factor: 2.0,
        }
    }
}

/// Lighting rig constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Sun strength of the key light
    pub key_strength: f32,
    /// Fill irradiance relative to the key
    pub fill_ratio: f32,
    /// Rim irradiance relative to the key
    pub rim_ratio: f32,
    /// Key light rotation in degrees (XYZ Euler)
    pub key_tilt_deg: [f32; 3],
    pub world_color: [f32; 3],
    pub world_strength: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            key_strength: 3.0,
            fill_ratio: 0.5,
            rim_ratio: 0.8,
            key_tilt_deg: [50.0, 0.0, 45.0],
            world_color: [0.5, 0.5, 0.5],
            world_strength: 0.2,
        }
    }
}

/// Animation detection constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Declared frame ranges shorter than this are treated as unconfigured
    pub min_declared_frames: u32,
    /// Rotations used when the caller leaves the count unspecified
    pub default_rotations: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            min_declared_frames: 2,
            default_rotations: 1.0,
        }
    }
}

/// Tuning constants for one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub fps: u32,
    /// Frame count when nothing else decides it (5 seconds at 24 fps)
    pub default_frames: u32,
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub animation: AnimationConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fps: 24,
            default_frames: 120,
            camera: CameraConfig::default(),
            lighting: LightingConfig::default(),
            animation: AnimationConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Options for one invocation of the `turntable` binary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Texture overrides in the order given
    pub textures: Vec<(TextureTarget, PathBuf)>,
    /// Explicit frame count; `None` means auto
    pub frames: Option<u32>,
    /// Explicit rotation count; `None` means auto-detect
    pub rotations: Option<f32>,
    pub test: bool,
    pub renderer: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub inspect: bool,
    pub help: bool,
}

impl CliOptions {
    /// Parses arguments, not including the program name
    ///
    /// `--help` short-circuits the required-option checks.
    pub fn parse<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut options = CliOptions::default();
        let mut input = None;
        let mut output = None;
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--help" | "-h" => options.help = true,
                "--test" => options.test = true,
                "--inspect" => options.inspect = true,
                "--input" => input = Some(PathBuf::from(value(&arg, args.next())?)),
                "--output" => output = Some(PathBuf::from(value(&arg, args.next())?)),
                "--renderer" => options.renderer = Some(PathBuf::from(value(&arg, args.next())?)),
                "--config" => options.config = Some(PathBuf::from(value(&arg, args.next())?)),
                "--texture" | "--texture_front" | "--texture_back" | "--texture_background" => {
                    let target = match arg.as_str() {
                        "--texture_front" => TextureTarget::Front,
                        "--texture_back" => TextureTarget::Back,
                        "--texture_background" => TextureTarget::Background,
                        _ => TextureTarget::AllSubjects,
                    };
                    let path = value(&arg, args.next())?;
                    options.textures.push((target, PathBuf::from(path)));
                }
                "--frames" => {
                    let raw = value(&arg, args.next())?;
                    let frames: u32 = raw.parse().map_err(|_| invalid(&arg, &raw))?;
                    options.frames = (frames > 0).then_some(frames);
                }
                "--rotations" => {
                    let raw = value(&arg, args.next())?;
                    let rotations: f32 = raw.parse().map_err(|_| invalid(&arg, &raw))?;
                    if !rotations.is_finite() {
                        return Err(invalid(&arg, &raw));
                    }
                    options.rotations = (rotations >= 0.0).then_some(rotations);
                }
                _ => return Err(ConfigError::UnknownFlag(arg)),
            }
        }

        if options.help {
            return Ok(options);
        }

        options.input = input.ok_or(ConfigError::MissingRequired("--input"))?;
        if options.inspect {
            options.output = output.unwrap_or_default();
            return Ok(options);
        }
        options.output = output.ok_or(ConfigError::MissingRequired("--output"))?;
        Ok(options)
    }

    /// Tuning constants from `--config`, or the defaults
    pub fn pipeline_config(&self) -> Result<PipelineConfig, ConfigError> {
        match &self.config {
            Some(path) => PipelineConfig::load(path),
            None => Ok(PipelineConfig::default()),
        }
    }
}

fn value(flag: &str, next: Option<String>) -> Result<String, ConfigError> {
    match next {
        Some(value) if !value.starts_with("--") => Ok(value),
        _ => Err(ConfigError::MissingValue(flag.to_string())),
    }
}

fn invalid(flag: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
    }
}
