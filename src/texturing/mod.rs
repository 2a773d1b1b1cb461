//! # Material Texture Injection
//!
//! Re-skins named materials with a supplied image. A material is a candidate
//! when it sits on an eligible object and its name carries a keyword for the
//! requested [`TextureTarget`]. For each candidate the image texture node feeding
//! the principled surface's base color is reused, or created and linked, and its
//! image is replaced.
//!
//! Materials whose names do not match are never touched. Candidates whose graph
//! has no principled node, or whose principled node lacks a base color input,
//! are skipped rather than rebuilt.

use std::collections::HashSet;
use std::path::Path;

use log::{debug, info, warn};

use crate::classify::{NamingConvention, ObjectClassifier, StudioConvention, TextureTarget};
use crate::error::TextureError;
use crate::gfx::resources::{
    material::{BASE_COLOR, COLOR},
    ImageId, MaterialId, ShaderNode, ShadingGraph,
};
use crate::gfx::scene::{ObjectId, Scene};

/// Horizontal distance between a new texture node and its principled node
const TEXTURE_NODE_OFFSET: f32 = 300.0;

/// Why a matching material was left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The material graph has no principled surface node
    NoPrincipledNode,
    /// The principled node has no base color input
    NoBaseColorInput,
    /// The object references a material missing from the library
    NotInLibrary,
}

/// What one texture assignment changed
#[derive(Debug, Clone, PartialEq)]
pub struct TextureReport {
    pub target: TextureTarget,
    pub image: ImageId,
    pub rewired: Vec<MaterialId>,
    /// Image texture nodes added to graphs that had none on base color
    pub created_nodes: usize,
    /// Default materials added to material-less meshes
    pub created_materials: Vec<MaterialId>,
    pub skipped: Vec<(MaterialId, SkipReason)>,
}

pub struct MaterialTextureResolver<C: NamingConvention = StudioConvention> {
    classifier: ObjectClassifier<C>,
}

impl Default for MaterialTextureResolver<StudioConvention> {
    fn default() -> Self {
        Self::new(ObjectClassifier::default())
    }
}

impl<C: NamingConvention> MaterialTextureResolver<C> {
    pub fn new(classifier: ObjectClassifier<C>) -> Self {
        Self { classifier }
    }

    /// Meshes the target may touch: background meshes for
    /// [`TextureTarget::Background`], every other mesh otherwise
    pub fn eligible_objects(&self, scene: &Scene, target: TextureTarget) -> Vec<ObjectId> {
        scene
            .mesh_ids()
            .into_iter()
            .filter(|&id| self.classifier.is_background(scene, id) == target.is_background())
            .collect()
    }

    /// Loads `image_path` and applies it to every material matching `target`
    ///
    /// # Errors
    /// Returns the load error when the image cannot be read; the scene is
    /// left unchanged in that case.
    pub fn apply(
        &self,
        scene: &mut Scene,
        image_path: &Path,
        target: TextureTarget,
    ) -> Result<TextureReport, TextureError> {
        let image = scene.images.load(image_path)?;
        let mut report = TextureReport {
            target,
            image,
            rewired: Vec::new(),
            created_nodes: 0,
            created_materials: Vec::new(),
            skipped: Vec::new(),
        };

        let mut visited: HashSet<MaterialId> = HashSet::new();

        for id in self.eligible_objects(scene, target) {
            if target == TextureTarget::AllSubjects && scene.objects[id.index()].material_names().is_empty() {
                let created = Self::add_default_material(scene, id);
                report.created_materials.push(created);
            }

            let names = scene.objects[id.index()].material_names().to_vec();
            for name in names {
                if !self.classifier.convention().matches_target(&name, target) {
                    continue;
                }
                if !visited.insert(name.clone()) {
                    continue;
                }

                let Some(material) = scene.material_manager.get_material_mut(&name) else {
                    warn!("Material '{}' is not in the library, skipping", name);
                    report.skipped.push((name, SkipReason::NotInLibrary));
                    continue;
                };

                match Self::wire_image(&mut material.graph, image) {
                    Ok(created) => {
                        if created {
                            report.created_nodes += 1;
                        }
                        debug!("Texture applied to material '{}'", name);
                        report.rewired.push(name);
                    }
                    Err(reason) => {
                        warn!("Material '{}' skipped: {:?}", name, reason);
                        report.skipped.push((name, reason));
                    }
                }
            }
        }

        info!(
            "Applied {} to {} {} material(s)",
            image_path.display(),
            report.rewired.len(),
            target.label()
        );

        Ok(report)
    }

    /// Points the base color of the graph's principled node at `image`
    ///
    /// Returns whether a new image texture node was created.
    fn wire_image(graph: &mut ShadingGraph, image: ImageId) -> Result<bool, SkipReason> {
        let bsdf = graph.find_principled().ok_or(SkipReason::NoPrincipledNode)?;
        let bsdf_location = match graph.node(bsdf) {
            Some(node) if node.has_input(BASE_COLOR) => node.location,
            _ => return Err(SkipReason::NoBaseColorInput),
        };

        let existing = graph
            .input_link(bsdf, BASE_COLOR)
            .map(|link| link.from_node)
            .filter(|&node| graph.node(node).is_some_and(ShaderNode::is_image_texture));

        let (texture, created) = match existing {
            Some(node) => (node, false),
            None => {
                let node = graph.add_node(ShaderNode::image_texture(
                    "Image Texture",
                    [bsdf_location[0] - TEXTURE_NODE_OFFSET, bsdf_location[1]],
                ));
                graph.link(node, COLOR, bsdf, BASE_COLOR);
                (node, true)
            }
        };

        if let Some(node) = graph.node_mut(texture) {
            node.set_image(image);
        }
        Ok(created)
    }

    fn add_default_material(scene: &mut Scene, id: ObjectId) -> MaterialId {
        let desired = format!("{}_Material", scene.objects[id.index()].name);
        let material = scene.material_manager.create_material(&desired);
        if let Some(mesh) = scene.objects[id.index()].as_mesh_mut() {
            mesh.materials.push(material.clone());
        }
        debug!("Created material '{}'", material);
        material
    }
}
