//! Renderer backed by an external executable
//!
//! The finalized scene is written as JSON next to the output video, then the
//! renderer executable is run with the scene path, output path, frame range and
//! codec settings. Its stdout/stderr are passed through so render logs stay
//! visible.

use std::cell::OnceCell;
use std::ffi::OsString;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{info, warn};

use crate::error::RenderError;
use crate::gfx::scene::Scene;

use super::backend::RenderBackend;
use super::renderer::{RenderJob, Renderer};

/// Environment variable naming the renderer executable
pub const RENDERER_ENV: &str = "TURNTABLE_RENDERER";

/// Executable names searched on `PATH` when nothing else is configured
const KNOWN_EXECUTABLES: &[&str] = &["turntable-render", "turntable-renderer"];

pub struct CommandRenderer {
    executable: PathBuf,
    backends: OnceCell<Vec<String>>,
}

impl CommandRenderer {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            backends: OnceCell::new(),
        }
    }

    /// Finds the renderer executable
    ///
    /// 1. An explicit path (from `--renderer`)
    /// 2. The `TURNTABLE_RENDERER` environment variable
    /// 3. Known executable names on `PATH`
    pub fn locate(explicit: Option<&Path>) -> Result<Self, RenderError> {
        if let Some(path) = explicit {
            return if path.exists() {
                Ok(Self::new(path))
            } else {
                which::which(path).map(Self::new).map_err(|_| RenderError::NotFound)
            };
        }

        if let Some(path) = std::env::var_os(RENDERER_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(Self::new(path));
            }
            warn!(
                "{} points at {}, which does not exist",
                RENDERER_ENV,
                path.display()
            );
        }

        KNOWN_EXECUTABLES
            .iter()
            .find_map(|name| which::which(name).ok())
            .map(Self::new)
            .ok_or(RenderError::NotFound)
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Path of the scene description written for `output`
    pub fn scene_path(output: &Path) -> PathBuf {
        let mut name = output
            .file_stem()
            .map(|stem| stem.to_os_string())
            .unwrap_or_else(|| OsString::from("turntable"));
        name.push(".scene.json");
        output.with_file_name(name)
    }

    /// Arguments passed to the renderer executable
    pub fn command_args(scene_path: &Path, job: &RenderJob) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--scene".into(),
            scene_path.as_os_str().to_os_string(),
            "--output".into(),
            job.output.path.as_os_str().to_os_string(),
            "--frame-start".into(),
            job.frame_start.to_string().into(),
            "--frame-end".into(),
            job.frame_end.to_string().into(),
            "--fps".into(),
            job.fps.to_string().into(),
            "--container".into(),
            job.output.container.identifier().into(),
            "--codec".into(),
            job.output.codec.identifier().into(),
        ];
        if let Some(backend) = job.backend {
            args.push("--backend".into());
            args.push(backend.identifier().into());
        }
        args
    }

    fn write_scene(scene: &Scene, path: &Path) -> Result<(), RenderError> {
        let file = File::create(path).map_err(|source| RenderError::SceneExport {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), scene)?;
        Ok(())
    }

    fn query_backends(&self) -> Vec<String> {
        match Command::new(&self.executable).arg("--list-backends").output() {
            Ok(output) if output.status.success() => String::from_utf8_lossy(&output.stdout)
                .lines()
                .map(|line| line.trim().to_ascii_lowercase())
                .filter(|line| !line.is_empty())
                .collect(),
            Ok(output) => {
                warn!("Renderer backend query exited with {}", output.status);
                Vec::new()
            }
            Err(err) => {
                warn!("Failed to query renderer backends: {}", err);
                Vec::new()
            }
        }
    }
}

impl Renderer for CommandRenderer {
    fn name(&self) -> &str {
        self.executable
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("renderer")
    }

    fn supports_backend(&self, backend: RenderBackend) -> bool {
        self.backends
            .get_or_init(|| self.query_backends())
            .iter()
            .any(|name| name == backend.identifier())
    }

    fn render(&self, scene: &Scene, job: &RenderJob) -> Result<(), RenderError> {
        let scene_path = Self::scene_path(&job.output.path);
        Self::write_scene(scene, &scene_path)?;

        info!(
            "Running {} {:?}",
            self.executable.display(),
            Self::command_args(&scene_path, job)
        );
        info!("Rendering started... This may take a while.");

        let status = Command::new(&self.executable)
            .args(Self::command_args(&scene_path, job))
            .status()
            .map_err(RenderError::SpawnFailed)?;

        if !status.success() {
            return Err(RenderError::Failed(status));
        }

        info!("Rendering finished: {}", job.output.path.display());
        Ok(())
    }
}
