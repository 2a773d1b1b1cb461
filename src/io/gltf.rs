//! glTF 2.0 importer (`.gltf` and `.glb`)
//!
//! Nodes map one-to-one onto scene objects and keep their hierarchy. Mesh
//! bounds come from the accessor min/max of each primitive, so vertex data is
//! never decoded. Node animations (translation, rotation, scale) become
//! per-axis keyframe tracks, which lets the pipeline detect authored animation.

use std::collections::HashMap;
use std::path::Path;

use ::gltf::animation::util::ReadOutputs;
use ::gltf::animation::{Interpolation as GltfInterpolation, Property};
use ::gltf::camera::Projection;
use cgmath::{Matrix3, Quaternion, Rad, Rotation3, Vector3};
use log::{debug, warn};

use crate::error::ImportError;
use crate::gfx::{
    bounds::SceneBounds,
    camera::CameraData,
    resources::{Material, MaterialId},
    scene::{
        AnimationData, Axis, Channel, Interpolation, MeshData, ObjectId, Scene, SceneObject,
        SceneOrigin,
    },
};

use super::Importer;

/// Aspect ratio assumed for cameras that do not declare one
const DEFAULT_ASPECT: f32 = 16.0 / 9.0;

pub struct GltfImporter {
    /// Frame rate used to turn keyframe times into frames
    pub fps: u32,
}

impl Default for GltfImporter {
    fn default() -> Self {
        Self { fps: 24 }
    }
}

/// glTF is Y-up; root nodes are rotated +90° about X into Z-up
fn z_up() -> Quaternion<f32> {
    Quaternion::from_angle_x(Rad(std::f32::consts::FRAC_PI_2))
}

fn quaternion([x, y, z, w]: [f32; 4]) -> Quaternion<f32> {
    Quaternion::new(w, x, y, z)
}

/// Splits a rotation into XYZ Euler angles, `R = Rz * Ry * Rx`
fn euler_xyz(rotation: Quaternion<f32>) -> Vector3<f32> {
    // Columns: m.x is the first column, m.x.z is row 2 of it
    let m = Matrix3::from(rotation);
    let sy = (-m.x.z).clamp(-1.0, 1.0);
    let y = sy.asin();
    if sy.abs() < 1.0 - 1e-6 {
        Vector3::new(m.y.z.atan2(m.z.z), y, m.x.y.atan2(m.x.x))
    } else {
        // Gimbal lock: fold Z into X
        Vector3::new((-m.z.y).atan2(m.y.y), y, 0.0)
    }
}

fn interpolation(mode: GltfInterpolation) -> Interpolation {
    match mode {
        GltfInterpolation::Step => Interpolation::Constant,
        GltfInterpolation::Linear => Interpolation::Linear,
        GltfInterpolation::CubicSpline => Interpolation::Bezier,
    }
}

fn material_name(material: &::gltf::Material) -> Option<MaterialId> {
    let index = material.index()?;
    Some(
        material
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Material.{:03}", index)),
    )
}

impl GltfImporter {
    fn import_materials(document: &::gltf::Document, scene: &mut Scene) {
        for material in document.materials() {
            let Some(name) = material_name(&material) else {
                continue;
            };
            if scene.material_manager.get_material(&name).is_some() {
                continue;
            }
            let pbr = material.pbr_metallic_roughness();
            scene.add_material(Material::new(
                &name,
                pbr.base_color_factor(),
                pbr.metallic_factor(),
                pbr.roughness_factor(),
            ));
        }
    }

    fn mesh_data(mesh: &::gltf::Mesh) -> MeshData {
        let mut bounds = SceneBounds::empty();
        let mut materials: Vec<MaterialId> = Vec::new();

        for primitive in mesh.primitives() {
            let bbox = primitive.bounding_box();
            bounds.include(bbox.min.into());
            bounds.include(bbox.max.into());

            if let Some(name) = material_name(&primitive.material()) {
                if !materials.contains(&name) {
                    materials.push(name);
                }
            }
        }

        if bounds.is_empty() {
            return MeshData::from_extents([0.0; 3], [0.0; 3], materials);
        }
        MeshData::from_extents(bounds.min.into(), bounds.max.into(), materials)
    }

    fn camera_data(camera: &::gltf::Camera) -> CameraData {
        match camera.projection() {
            Projection::Perspective(perspective) => {
                let aspect = perspective.aspect_ratio().unwrap_or(DEFAULT_ASPECT);
                let horizontal = 2.0 * ((perspective.yfov() / 2.0).tan() * aspect).atan();
                CameraData {
                    clip_start: perspective.znear(),
                    clip_end: perspective.zfar().unwrap_or(1000.0),
                    ..CameraData::from_fov(horizontal)
                }
            }
            Projection::Orthographic(_) => {
                warn!("Orthographic camera imported with a default lens");
                CameraData::default()
            }
        }
    }

    fn add_node(
        node: &::gltf::Node,
        parent: Option<ObjectId>,
        scene: &mut Scene,
        nodes: &mut HashMap<usize, (ObjectId, bool)>,
    ) {
        let name = node
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Node_{}", node.index()));

        let mut object = match (node.mesh(), node.camera()) {
            (Some(mesh), _) => SceneObject::mesh(name, Self::mesh_data(&mesh)),
            (None, Some(camera)) => SceneObject::camera(name, Self::camera_data(&camera)),
            (None, None) => SceneObject::empty(name),
        };

        let (translation, rotation, scale) = node.transform().decomposed();
        let mut location = Vector3::from(translation);
        let mut rotation = quaternion(rotation);
        if parent.is_none() {
            location = z_up() * location;
            rotation = z_up() * rotation;
        }
        object.transform.location = location;
        object.transform.rotation = euler_xyz(rotation);
        object.transform.scale = Vector3::from(scale);
        object.parent = parent;

        let id = scene.add_object(object);
        nodes.insert(node.index(), (id, parent.is_none()));

        for child in node.children() {
            Self::add_node(&child, Some(id), scene, nodes);
        }
    }

    fn import_animations(
        &self,
        document: &::gltf::Document,
        buffers: &[::gltf::buffer::Data],
        scene: &mut Scene,
        nodes: &HashMap<usize, (ObjectId, bool)>,
    ) {
        let fps = self.fps as f32;

        for animation in document.animations() {
            for channel in animation.channels() {
                let target = channel.target();
                let Some(&(id, is_root)) = nodes.get(&target.node().index()) else {
                    continue;
                };

                let reader = channel
                    .reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));
                let (Some(times), Some(outputs)) = (reader.read_inputs(), reader.read_outputs()) else {
                    continue;
                };
                let frames: Vec<f32> = times.map(|t| 1.0 + t * fps).collect();

                let mode = channel.sampler().interpolation();
                // Cubic spline outputs are (in-tangent, value, out-tangent) triples
                let stride = if mode == GltfInterpolation::CubicSpline { 3 } else { 1 };
                let offset = stride / 2;

                let samples: Vec<(Channel, Vec<f32>)> = match (target.property(), outputs) {
                    (Property::Translation, ReadOutputs::Translations(values)) => {
                        let values: Vec<Vector3<f32>> = values
                            .map(Vector3::from)
                            .map(|v| if is_root { z_up() * v } else { v })
                            .collect();
                        per_axis(Channel::Location, &values)
                    }
                    (Property::Rotation, ReadOutputs::Rotations(values)) => {
                        let values: Vec<Vector3<f32>> = values
                            .into_f32()
                            .map(quaternion)
                            .map(|q| if is_root { z_up() * q } else { q })
                            .map(euler_xyz)
                            .collect();
                        per_axis(Channel::Rotation, &values)
                    }
                    (Property::Scale, ReadOutputs::Scales(values)) => {
                        let values: Vec<Vector3<f32>> = values.map(Vector3::from).collect();
                        per_axis(Channel::Scale, &values)
                    }
                    _ => {
                        debug!("Skipping unsupported animation channel");
                        continue;
                    }
                };

                let Some(object) = scene.object_mut(id) else {
                    continue;
                };
                let data = object.animation.get_or_insert_with(AnimationData::new);
                for (channel, values) in samples {
                    let track = data.track_mut(channel);
                    for (i, &frame) in frames.iter().enumerate() {
                        if let Some(&value) = values.get(i * stride + offset) {
                            track.insert(frame, value, interpolation(mode));
                        }
                    }
                }
            }
        }
    }
}

fn per_axis(channel: fn(Axis) -> Channel, values: &[Vector3<f32>]) -> Vec<(Channel, Vec<f32>)> {
    Axis::all()
        .into_iter()
        .map(|axis| {
            let component = values.iter().map(|v| v[axis.index()]).collect();
            (channel(axis), component)
        })
        .collect()
}

impl Importer for GltfImporter {
    fn extensions(&self) -> &[&'static str] {
        &["gltf", "glb"]
    }

    fn import(&self, path: &Path) -> Result<Scene, ImportError> {
        let (document, buffers, _images) = ::gltf::import(path)?;
        let mut scene = Scene::new(SceneOrigin::Imported);

        Self::import_materials(&document, &mut scene);

        let Some(gltf_scene) = document.default_scene().or_else(|| document.scenes().next()) else {
            warn!("glTF file {} contains no scene", path.display());
            return Ok(scene);
        };

        let mut nodes = HashMap::new();
        for node in gltf_scene.nodes() {
            Self::add_node(&node, None, &mut scene, &mut nodes);
        }

        self.import_animations(&document, &buffers, &mut scene, &nodes);

        Ok(scene)
    }
}
