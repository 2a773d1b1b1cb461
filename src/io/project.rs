//! Pre-authored projects
//!
//! A project is a serialized [`Scene`] in JSON: the same description the
//! renderer receives. Projects bring their own camera, lights, frame range and
//! animation, which the pipeline reuses instead of synthesizing.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use crate::error::ImportError;
use crate::gfx::scene::{ObjectKind, Scene, SceneOrigin};

use super::Importer;

pub struct ProjectImporter;

impl ProjectImporter {
    /// Parses a project and checks its object handles
    pub fn from_json(text: &str) -> Result<Scene, ImportError> {
        let mut scene: Scene = serde_json::from_str(text)?;
        scene.origin = SceneOrigin::Project;
        validate(&scene)?;
        Ok(scene)
    }

    /// Writes `scene` as a project file
    pub fn save(scene: &Scene, path: &Path) -> Result<(), ImportError> {
        let file = File::create(path).map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), scene)?;
        Ok(())
    }
}

fn validate(scene: &Scene) -> Result<(), ImportError> {
    let count = scene.objects.len();

    for object in &scene.objects {
        if let Some(parent) = object.parent {
            if parent.index() >= count {
                return Err(ImportError::InvalidProject(format!(
                    "'{}' has unknown parent {}",
                    object.name,
                    parent.index()
                )));
            }
        }
    }

    for id in scene.ids() {
        if let Some(parent) = scene.objects[id.index()].parent {
            if parent == id || scene.is_ancestor(id, parent) {
                return Err(ImportError::InvalidProject(format!(
                    "'{}' is part of a parent cycle",
                    scene.objects[id.index()].name
                )));
            }
        }
    }

    if let Some(camera) = scene.active_camera {
        if scene.object(camera).map(|obj| obj.kind()) != Some(ObjectKind::Camera) {
            return Err(ImportError::InvalidProject(format!(
                "active camera {} is not a camera object",
                camera.index()
            )));
        }
    }

    Ok(())
}

impl Importer for ProjectImporter {
    fn extensions(&self) -> &[&'static str] {
        &["json"]
    }

    fn import(&self, path: &Path) -> Result<Scene, ImportError> {
        let text = fs::read_to_string(path).map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}
