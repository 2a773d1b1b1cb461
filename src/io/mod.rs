//! # Scene Import
//!
//! Importers turn an input file into a populated [`Scene`]. The
//! [`ImporterRegistry`] picks one by file extension and fails with
//! [`ImportError::UnsupportedFormat`] before anything is built when no importer
//! claims the extension.
//!
//! Imported scenes are converted to Z-up, the convention the rest of the
//! pipeline works in.

pub mod gltf;
pub mod obj;
pub mod project;

use std::path::Path;

use log::info;

use crate::error::ImportError;
use crate::gfx::scene::Scene;

pub use self::gltf::GltfImporter;
pub use obj::ObjImporter;
pub use project::ProjectImporter;

/// Loads one file format into a scene
pub trait Importer {
    /// Lower-case extensions this importer accepts, without the dot
    fn extensions(&self) -> &[&'static str];

    fn import(&self, path: &Path) -> Result<Scene, ImportError>;
}

/// Dispatches imports on file extension
pub struct ImporterRegistry {
    importers: Vec<Box<dyn Importer>>,
}

impl Default for ImporterRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ObjImporter));
        registry.register(Box::new(GltfImporter::default()));
        registry.register(Box::new(ProjectImporter));
        registry
    }
}

impl ImporterRegistry {
    /// Registry with no importers
    pub fn new() -> Self {
        Self {
            importers: Vec::new(),
        }
    }

    pub fn register(&mut self, importer: Box<dyn Importer>) {
        self.importers.push(importer);
    }

    /// Importer claiming the extension of `path`
    pub fn importer_for(&self, path: &Path) -> Result<&dyn Importer, ImportError> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .ok_or_else(|| ImportError::MissingExtension(path.to_path_buf()))?;

        self.importers
            .iter()
            .find(|importer| importer.extensions().contains(&extension.as_str()))
            .map(|importer| importer.as_ref())
            .ok_or(ImportError::UnsupportedFormat(extension))
    }

    pub fn import(&self, path: &Path) -> Result<Scene, ImportError> {
        let importer = self.importer_for(path)?;
        info!("Importing {}", path.display());
        let scene = importer.import(path)?;

        let stats = scene.get_statistics();
        info!(
            "Imported {} objects ({} meshes, {} cameras, {} lights), {} materials",
            stats.object_count,
            stats.mesh_count,
            stats.camera_count,
            stats.light_count,
            stats.material_count
        );
        Ok(scene)
    }
}
