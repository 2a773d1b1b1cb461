//! Error types for the turntable pipeline
//!
//! Each collaborator boundary (import, texture loading, scene edits, rendering,
//! configuration) has its own error enum; [`TurntableError`] aggregates them for
//! callers that drive the whole pipeline.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Top-level error for a pipeline invocation
#[derive(Error, Debug)]
pub enum TurntableError {
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
    #[error("Render failed: {0}")]
    Render(#[from] RenderError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while turning an input file into a scene
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("Input file has no extension: {0}")]
    MissingExtension(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load OBJ file: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("Failed to load glTF file: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("Failed to parse project file: {0}")]
    Project(#[from] serde_json::Error),
    #[error("Invalid project: {0}")]
    InvalidProject(String),
}

/// Errors raised while loading an image for texture injection
///
/// These are never fatal to a run: the pipeline logs them and skips the
/// affected texture assignment.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Texture image does not exist: {0}")]
    NotFound(PathBuf),
    #[error("Failed to decode texture image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Errors raised by scene graph edits
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Parenting '{child}' under '{parent}' would create a cycle")]
    ParentCycle { child: String, parent: String },
    #[error("Unknown object handle {0}")]
    UnknownObject(usize),
}

/// Errors raised by the renderer hand-off
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Renderer executable not found. Pass --renderer or set TURNTABLE_RENDERER")]
    NotFound,
    #[error("Failed to spawn renderer process: {0}")]
    SpawnFailed(#[source] std::io::Error),
    #[error("Renderer exited with {0}")]
    Failed(ExitStatus),
    #[error("Failed to write scene description {path}: {source}")]
    SceneExport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize scene: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised while reading command-line options or a config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required option {0}")]
    MissingRequired(&'static str),
    #[error("Option {0} expects a value")]
    MissingValue(String),
    #[error("Invalid value '{value}' for {flag}")]
    InvalidValue { flag: String, value: String },
    #[error("Unknown option {0}")]
    UnknownFlag(String),
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}
