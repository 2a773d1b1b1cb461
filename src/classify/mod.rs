//! # Object Classification
//!
//! Splits the scene's meshes into the **subject** (what the turntable rotates)
//! and the **background** (static backdrop kept in frame).
//!
//! An object is background when any of its materials carries a background
//! keyword, or when its own name carries a background token. Everything else is
//! subject. When nothing qualifies as subject, every mesh is treated as subject
//! so later stages never work on an empty set while meshes exist.

pub mod convention;

pub use convention::{NamingConvention, StudioConvention, TextureTarget};

use log::{debug, warn};

use crate::gfx::scene::{ObjectId, Scene};

/// Result of classifying the scene's meshes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub subject: Vec<ObjectId>,
    pub background: Vec<ObjectId>,
    /// Set when no mesh qualified as subject and all meshes were taken instead
    pub fell_back: bool,
}

impl Classification {
    pub fn has_background(&self) -> bool {
        !self.background.is_empty()
    }

    /// Subject and background together
    pub fn all(&self) -> Vec<ObjectId> {
        self.subject
            .iter()
            .chain(self.background.iter())
            .copied()
            .collect()
    }
}

pub struct ObjectClassifier<C: NamingConvention = StudioConvention> {
    convention: C,
}

impl Default for ObjectClassifier<StudioConvention> {
    fn default() -> Self {
        Self::new(StudioConvention::default())
    }
}

impl<C: NamingConvention> ObjectClassifier<C> {
    pub fn new(convention: C) -> Self {
        Self { convention }
    }

    pub fn convention(&self) -> &C {
        &self.convention
    }

    /// Whether an object counts as background under the convention
    pub fn is_background(&self, scene: &Scene, id: ObjectId) -> bool {
        let Some(object) = scene.object(id) else {
            return false;
        };

        object
            .material_names()
            .iter()
            .any(|material| self.convention.is_background_material(material))
            || self.convention.is_background_object(&object.name)
    }

    pub fn classify(&self, scene: &Scene) -> Classification {
        let meshes = scene.mesh_ids();
        let (background, subject): (Vec<ObjectId>, Vec<ObjectId>) = meshes
            .iter()
            .copied()
            .partition(|&id| self.is_background(scene, id));

        for &id in &background {
            debug!("Background: {}", scene.objects[id.index()].name);
        }

        if subject.is_empty() && !meshes.is_empty() {
            warn!("No subject objects found, treating all meshes as subject");
            return Classification {
                subject: meshes,
                background: Vec::new(),
                fell_back: true,
            };
        }

        Classification {
            subject,
            background,
            fell_back: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{MeshData, SceneObject};

    fn mesh(scene: &mut Scene, name: &str, material: &str) -> ObjectId {
        scene.add_object(SceneObject::mesh(
            name,
            MeshData::from_extents([-1.0; 3], [1.0; 3], vec![material.to_string()]),
        ))
    }

    #[test]
    fn test_card_and_backdrop() {
        let mut scene = Scene::default();
        let card = mesh(&mut scene, "Card_Front", "正面_mat");
        let backdrop = mesh(&mut scene, "VEN_backdrop", "背景");

        let classification = ObjectClassifier::default().classify(&scene);

        assert_eq!(classification.subject, vec![card]);
        assert_eq!(classification.background, vec![backdrop]);
        assert!(!classification.fell_back);
    }

    #[test]
    fn test_material_keyword_alone_marks_background() {
        let mut scene = Scene::default();
        let floor = mesh(&mut scene, "Floor", "studio_BACKGROUND");
        let product = mesh(&mut scene, "Bottle", "glass");

        let classification = ObjectClassifier::default().classify(&scene);

        assert_eq!(classification.subject, vec![product]);
        assert_eq!(classification.background, vec![floor]);
    }

    #[test]
    fn test_all_background_falls_back_to_all_meshes() {
        let mut scene = Scene::default();
        let a = mesh(&mut scene, "VEN_a", "背景");
        let b = mesh(&mut scene, "VEN_b", "背景");
        scene.add_object(SceneObject::empty("Helper"));

        let classification = ObjectClassifier::default().classify(&scene);

        assert_eq!(classification.subject, vec![a, b]);
        assert!(classification.background.is_empty());
        assert!(classification.fell_back);
    }

    #[test]
    fn test_empty_scene_classifies_nothing() {
        let classification = ObjectClassifier::default().classify(&Scene::default());
        assert!(classification.subject.is_empty());
        assert!(classification.background.is_empty());
        assert!(!classification.fell_back);
    }
}
