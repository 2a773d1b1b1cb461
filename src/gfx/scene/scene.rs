use cgmath::{Matrix4, SquareMatrix};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::SceneError;
use crate::gfx::{
    lighting::World,
    rendering::renderer::OutputSettings,
    resources::{
        material::{Material, MaterialManager},
        texture_resource::ImageLibrary,
    },
};

use super::object::{ObjectId, ObjectKind, SceneObject};

/// Where the scene came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SceneOrigin {
    /// A bare asset turned into a fresh scene by an importer
    #[default]
    Imported,
    /// A pre-authored project carrying its own camera, lights and frame range
    Project,
}

fn default_fps() -> u32 {
    24
}

fn default_frame_start() -> i32 {
    1
}

fn default_frame_end() -> i32 {
    250
}

/// Main scene containing objects, materials, images and frame settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub objects: Vec<SceneObject>,
    #[serde(default)]
    pub material_manager: MaterialManager,
    #[serde(default)]
    pub images: ImageLibrary,
    #[serde(default)]
    pub world: Option<World>,
    #[serde(default)]
    pub active_camera: Option<ObjectId>,
    #[serde(default = "default_frame_start")]
    pub frame_start: i32,
    #[serde(default = "default_frame_end")]
    pub frame_end: i32,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub origin: SceneOrigin,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneOrigin::Imported)
    }
}

impl Scene {
    /// Creates an empty scene
    pub fn new(origin: SceneOrigin) -> Self {
        Self {
            objects: Vec::new(),
            material_manager: MaterialManager::new(),
            images: ImageLibrary::default(),
            world: None,
            active_camera: None,
            frame_start: default_frame_start(),
            frame_end: default_frame_end(),
            fps: default_fps(),
            output: OutputSettings::default(),
            origin,
        }
    }

    /// Adds an object, renaming it if the name is already taken
    pub fn add_object(&mut self, mut object: SceneObject) -> ObjectId {
        object.name = self.ensure_unique_name(&object.name);
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    /// Adds a material to the scene's material library
    pub fn add_material(&mut self, material: Material) {
        self.material_manager.add_material(material);
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id.0)
    }

    pub fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .position(|obj| obj.name == name)
            .map(ObjectId)
    }

    /// Handles of every object, in insertion order
    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        (0..self.objects.len()).map(ObjectId)
    }

    pub fn ids_of_kind(&self, kind: ObjectKind) -> Vec<ObjectId> {
        self.ids()
            .filter(|&id| self.objects[id.0].kind() == kind)
            .collect()
    }

    pub fn mesh_ids(&self) -> Vec<ObjectId> {
        self.ids_of_kind(ObjectKind::Mesh)
    }

    pub fn has_lights(&self) -> bool {
        self.objects
            .iter()
            .any(|obj| obj.kind() == ObjectKind::Light)
    }

    /// Materials assigned to an object that exist in the library
    pub fn materials_of(&self, id: ObjectId) -> impl Iterator<Item = &Material> + '_ {
        self.object(id)
            .map(SceneObject::material_names)
            .unwrap_or(&[])
            .iter()
            .filter_map(|name| self.material_manager.get_material(name))
    }

    /// Number of frames in the declared frame range
    pub fn declared_frame_count(&self) -> u32 {
        (self.frame_end - self.frame_start + 1).max(0) as u32
    }

    /// World matrix: `parent_world * parent_inverse * local`, up the parent chain
    pub fn world_matrix(&self, id: ObjectId) -> Matrix4<f32> {
        let mut matrix = Matrix4::identity();
        let mut current = self.object(id);
        let mut depth = 0;

        while let Some(object) = current {
            matrix = object.local_matrix() * matrix;
            current = match object.parent {
                Some(parent) if depth < self.objects.len() => {
                    matrix = object.parent_inverse * matrix;
                    self.object(parent)
                }
                _ => None,
            };
            depth += 1;
        }

        matrix
    }

    /// True when `ancestor` appears in `id`'s parent chain
    pub fn is_ancestor(&self, ancestor: ObjectId, id: ObjectId) -> bool {
        let mut current = self.object(id).and_then(|obj| obj.parent);
        let mut depth = 0;

        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            if depth >= self.objects.len() {
                break;
            }
            current = self.object(parent).and_then(|obj| obj.parent);
            depth += 1;
        }

        false
    }

    /// Parents `child` under `parent` without changing the child's world pose
    ///
    /// The child's parent-inverse becomes the parent's inverted world matrix at
    /// this moment, composed with whatever parent chain the child had before.
    pub fn set_parent_keep_transform(
        &mut self,
        child: ObjectId,
        parent: ObjectId,
    ) -> Result<(), SceneError> {
        let child_obj = self.object(child).ok_or(SceneError::UnknownObject(child.0))?;
        let parent_obj = self
            .object(parent)
            .ok_or(SceneError::UnknownObject(parent.0))?;

        if child == parent || self.is_ancestor(child, parent) {
            return Err(SceneError::ParentCycle {
                child: child_obj.name.clone(),
                parent: parent_obj.name.clone(),
            });
        }

        let previous_chain = match child_obj.parent {
            Some(old_parent) => self.world_matrix(old_parent) * child_obj.parent_inverse,
            None => Matrix4::identity(),
        };
        let parent_inverse = self
            .world_matrix(parent)
            .invert()
            .unwrap_or_else(Matrix4::identity);

        debug!("Parenting '{}' under '{}'", child_obj.name, parent_obj.name);

        let child_obj = &mut self.objects[child.0];
        child_obj.parent = Some(parent);
        child_obj.parent_inverse = parent_inverse * previous_chain;
        Ok(())
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        SceneStatistics {
            object_count: self.objects.len(),
            mesh_count: self.ids_of_kind(ObjectKind::Mesh).len(),
            camera_count: self.ids_of_kind(ObjectKind::Camera).len(),
            light_count: self.ids_of_kind(ObjectKind::Light).len(),
            material_count: self.material_manager.list_materials().len(),
            image_count: self.images.len(),
        }
    }

    pub fn ensure_unique_name(&self, desired_name: &str) -> String {
        let mut counter = 0;
        let mut test_name = desired_name.to_string();

        while self.objects.iter().any(|obj| obj.name == test_name) {
            counter += 1;
            test_name = format!("{} ({})", desired_name, counter);
        }

        test_name
    }
}

/// Scene statistics for logging and `--inspect`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub mesh_count: usize,
    pub camera_count: usize,
    pub light_count: usize,
    pub material_count: usize,
    pub image_count: usize,
}
