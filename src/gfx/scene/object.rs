use cgmath::{Matrix4, Point3, Rad, SquareMatrix, Vector3};
use serde::{Deserialize, Serialize};

use crate::gfx::{
    camera::camera_utils::CameraData, lighting::LightData, resources::material::MaterialId,
};

use super::animation::AnimationData;

/// Handle to an object owned by a [`Scene`](super::Scene)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub(crate) usize);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Object kind, derived from the object's data payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Mesh,
    Camera,
    Light,
    Empty,
}

/// Mesh payload: local bounding box and assigned materials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    /// The 8 local-space corners of the mesh's bounding box
    pub bound_box: [Point3<f32>; 8],
    /// Material slots, in order
    pub materials: Vec<MaterialId>,
}

impl MeshData {
    pub fn new(bound_box: [Point3<f32>; 8], materials: Vec<MaterialId>) -> Self {
        Self {
            bound_box,
            materials,
        }
    }

    /// Builds the 8 corners of the box spanned by `min` and `max`
    pub fn from_extents(min: [f32; 3], max: [f32; 3], materials: Vec<MaterialId>) -> Self {
        Self::new(box_corners(min, max), materials)
    }
}

/// Returns the corners of an axis-aligned box in a fixed order
pub fn box_corners(min: [f32; 3], max: [f32; 3]) -> [Point3<f32>; 8] {
    [
        Point3::new(min[0], min[1], min[2]),
        Point3::new(min[0], min[1], max[2]),
        Point3::new(min[0], max[1], max[2]),
        Point3::new(min[0], max[1], min[2]),
        Point3::new(max[0], min[1], min[2]),
        Point3::new(max[0], min[1], max[2]),
        Point3::new(max[0], max[1], max[2]),
        Point3::new(max[0], max[1], min[2]),
    ]
}

/// Type-specific object data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectData {
    Mesh(MeshData),
    Camera(CameraData),
    Light(LightData),
    Empty,
}

/// Local transform: translation, XYZ Euler rotation (radians) and scale
///
/// XYZ means X is applied first and Z last, all about the parent's axes:
/// `R = Rz * Ry * Rx`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub location: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            location: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Composes the local matrix. Order matters: T * R * S
    pub fn matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.location);
        let r = Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_x(Rad(self.rotation.x));
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        t * r * s
    }
}

/// Axis of the constrained object that points at the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackAxis {
    NegativeZ,
    PositiveY,
}

/// Axis of the constrained object kept pointing up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpAxis {
    Y,
    Z,
}

/// Object constraints evaluated by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Constraint {
    TrackTo {
        target: ObjectId,
        track_axis: TrackAxis,
        up_axis: UpAxis,
    },
}

impl Constraint {
    /// Camera-style track-to: -Z looks at the target, Y stays up
    pub fn track_to(target: ObjectId) -> Self {
        Constraint::TrackTo {
            target,
            track_axis: TrackAxis::NegativeZ,
            up_axis: UpAxis::Y,
        }
    }
}

/// A named node in the scene graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    pub data: ObjectData,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub parent: Option<ObjectId>,
    /// Applied between the parent's world matrix and this object's local matrix
    #[serde(default = "identity")]
    pub parent_inverse: Matrix4<f32>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default)]
    pub animation: Option<AnimationData>,
}

fn identity() -> Matrix4<f32> {
    Matrix4::identity()
}

impl SceneObject {
    pub fn new(name: impl Into<String>, data: ObjectData) -> Self {
        Self {
            name: name.into(),
            data,
            transform: Transform::default(),
            parent: None,
            parent_inverse: Matrix4::identity(),
            constraints: Vec::new(),
            animation: None,
        }
    }

    pub fn mesh(name: impl Into<String>, mesh: MeshData) -> Self {
        Self::new(name, ObjectData::Mesh(mesh))
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, ObjectData::Empty)
    }

    pub fn camera(name: impl Into<String>, camera: CameraData) -> Self {
        Self::new(name, ObjectData::Camera(camera))
    }

    pub fn light(name: impl Into<String>, light: LightData) -> Self {
        Self::new(name, ObjectData::Light(light))
    }

    pub fn with_location(mut self, location: Vector3<f32>) -> Self {
        self.transform.location = location;
        self
    }

    pub fn with_rotation(mut self, rotation: Vector3<f32>) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vector3<f32>) -> Self {
        self.transform.scale = scale;
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn kind(&self) -> ObjectKind {
        match self.data {
            ObjectData::Mesh(_) => ObjectKind::Mesh,
            ObjectData::Camera(_) => ObjectKind::Camera,
            ObjectData::Light(_) => ObjectKind::Light,
            ObjectData::Empty => ObjectKind::Empty,
        }
    }

    pub fn as_mesh(&self) -> Option<&MeshData> {
        match &self.data {
            ObjectData::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut MeshData> {
        match &mut self.data {
            ObjectData::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Material names assigned to this object (empty for non-meshes)
    pub fn material_names(&self) -> &[MaterialId] {
        self.as_mesh()
            .map(|mesh| mesh.materials.as_slice())
            .unwrap_or(&[])
    }

    /// True when the object carries at least one keyframe
    pub fn is_animated(&self) -> bool {
        self.animation
            .as_ref()
            .is_some_and(AnimationData::has_keyframes)
    }

    /// Local matrix from the object's transform
    pub fn local_matrix(&self) -> Matrix4<f32> {
        self.transform.matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Transform as _, Vector4};

    #[test]
    fn test_trs_applies_scale_then_rotation_then_translation() {
        let transform = Transform {
            location: Vector3::new(1.0, 2.0, 3.0),
            rotation: Vector3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2),
            scale: Vector3::new(2.0, 2.0, 2.0),
        };

        let p = transform.matrix().transform_point(Point3::new(1.0, 0.0, 0.0));
        assert!((p.x - 1.0).abs() < 1e-5);
        assert!((p.y - 4.0).abs() < 1e-5);
        assert!((p.z - 3.0).abs() < 1e-5);

        let v = transform.matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(v.truncate(), transform.location);
    }

    #[test]
    fn test_rotation_applies_x_before_z() {
        let transform = Transform {
            rotation: Vector3::new(std::f32::consts::FRAC_PI_2, 0.0, std::f32::consts::FRAC_PI_2),
            ..Transform::default()
        };

        // +Y tips up to +Z about X, then stays on +Z about world Z
        let v = transform.matrix().transform_vector(Vector3::new(0.0, 1.0, 0.0));
        assert!((v - Vector3::new(0.0, 0.0, 1.0)).magnitude() < 1e-5);
        // +Z tips to -Y about X, then swings to +X about world Z
        let v = transform.matrix().transform_vector(Vector3::new(0.0, 0.0, 1.0));
        assert!((v - Vector3::new(1.0, 0.0, 0.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_kind_follows_payload() {
        let mesh = SceneObject::mesh(
            "Card",
            MeshData::from_extents([-1.0; 3], [1.0; 3], vec!["mat".into()]),
        );
        assert_eq!(mesh.kind(), ObjectKind::Mesh);
        assert_eq!(mesh.material_names(), &["mat".to_string()]);
        assert_eq!(SceneObject::empty("Pivot").kind(), ObjectKind::Empty);
        assert!(SceneObject::empty("Pivot").material_names().is_empty());
    }

    #[test]
    fn test_box_corners_cover_extents() {
        let corners = box_corners([-1.0, -2.0, -3.0], [1.0, 2.0, 3.0]);
        assert!(corners.contains(&Point3::new(-1.0, -2.0, -3.0)));
        assert!(corners.contains(&Point3::new(1.0, 2.0, 3.0)));
        assert!(corners.contains(&Point3::new(1.0, -2.0, 3.0)));
    }
}
