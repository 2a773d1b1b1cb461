//! # Bounding Geometry
//!
//! World-space axis-aligned bounds over a set of scene objects.
//!
//! ## How it works
//!
//! 1. **Corners**: every mesh exposes the 8 corners of its local bounding box
//! 2. **World space**: each corner is transformed by the object's world matrix
//! 3. **Fold**: component-wise min/max accumulators start at +/- infinity
//!
//! The resulting [`SceneBounds`] gives the framing stages a center and a size. An
//! empty set reports the origin and a size of 1.0 so camera and light placement
//! never divide by zero or collapse onto a point.

use cgmath::{Point3, Transform, Vector3, Zero};

use crate::gfx::scene::{ObjectId, Scene};

/// Size reported for an empty set of objects
pub const EMPTY_SIZE: f32 = 1.0;

/// Smallest size used for placement, so flat or point-like sets still get a
/// camera distance
pub const MIN_PLACEMENT_SIZE: f32 = 1e-3;

/// Axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl Default for SceneBounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl SceneBounds {
    /// Create a new AABB
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Bounds containing nothing, ready to fold points into
    pub fn empty() -> Self {
        Self {
            min: Vector3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Vector3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    /// Grow the bounds to include a point
    pub fn include(&mut self, point: Point3<f32>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Grow the bounds to include other bounds
    pub fn union(&self, other: &SceneBounds) -> SceneBounds {
        if other.is_empty() {
            return *self;
        }
        let mut merged = *self;
        merged.include(Point3::new(other.min.x, other.min.y, other.min.z));
        merged.include(Point3::new(other.max.x, other.max.y, other.max.z));
        merged
    }

    /// True when no point has been folded in
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Center of the box, or the origin for empty bounds
    pub fn center(&self) -> Vector3<f32> {
        if self.is_empty() {
            return Vector3::zero();
        }
        (self.min + self.max) / 2.0
    }

    /// Extent along each axis
    pub fn dimensions(&self) -> Vector3<f32> {
        if self.is_empty() {
            return Vector3::zero();
        }
        self.max - self.min
    }

    /// Largest extent, or [`EMPTY_SIZE`] for empty bounds
    pub fn size(&self) -> f32 {
        if self.is_empty() {
            return EMPTY_SIZE;
        }
        let d = self.dimensions();
        d.x.max(d.y).max(d.z)
    }

    /// Size floored at [`MIN_PLACEMENT_SIZE`], used to place cameras and lights
    pub fn placement_size(&self) -> f32 {
        self.size().max(MIN_PLACEMENT_SIZE)
    }

    /// Test whether a point lies inside the box, with a tolerance
    pub fn contains(&self, point: Point3<f32>, epsilon: f32) -> bool {
        point.x >= self.min.x - epsilon
            && point.y >= self.min.y - epsilon
            && point.z >= self.min.z - epsilon
            && point.x <= self.max.x + epsilon
            && point.y <= self.max.y + epsilon
            && point.z <= self.max.z + epsilon
    }
}

/// Computes world-space bounds for sets of scene objects
pub struct BoundsComputer;

impl BoundsComputer {
    /// World-space corners of one mesh object; empty for other kinds
    pub fn world_corners(scene: &Scene, id: ObjectId) -> Vec<Point3<f32>> {
        let Some(mesh) = scene.object(id).and_then(|obj| obj.as_mesh()) else {
            return Vec::new();
        };
        let world = scene.world_matrix(id);
        mesh.bound_box
            .iter()
            .map(|corner| world.transform_point(*corner))
            .collect()
    }

    /// Bounds of every mesh in `ids`; non-mesh handles are ignored
    pub fn compute(scene: &Scene, ids: &[ObjectId]) -> SceneBounds {
        let mut bounds = SceneBounds::empty();
        for &id in ids {
            for corner in Self::world_corners(scene, id) {
                bounds.include(corner);
            }
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{MeshData, SceneObject};
    use rand::Rng;

    fn box_object(name: &str, min: [f32; 3], max: [f32; 3]) -> SceneObject {
        SceneObject::mesh(name, MeshData::from_extents(min, max, vec![]))
    }

    #[test]
    fn test_empty_set_is_origin_with_unit_size() {
        let scene = Scene::default();
        let bounds = BoundsComputer::compute(&scene, &[]);
        assert!(bounds.is_empty());
        assert_eq!(bounds.center(), Vector3::zero());
        assert_eq!(bounds.size(), 1.0);
    }

    #[test]
    fn test_translated_box() {
        let mut scene = Scene::default();
        let id = scene.add_object(
            box_object("Box", [-1.0, -1.0, -1.0], [1.0, 1.0, 1.0])
                .with_location(Vector3::new(10.0, 0.0, 2.0)),
        );

        let bounds = BoundsComputer::compute(&scene, &[id]);
        assert_eq!(bounds.min, Vector3::new(9.0, -1.0, 1.0));
        assert_eq!(bounds.max, Vector3::new(11.0, 1.0, 3.0));
        assert_eq!(bounds.center(), Vector3::new(10.0, 0.0, 2.0));
        assert_eq!(bounds.size(), 2.0);
    }

    #[test]
    fn test_non_mesh_objects_are_ignored() {
        let mut scene = Scene::default();
        let empty = scene.add_object(
            SceneObject::empty("Far").with_location(Vector3::new(100.0, 100.0, 100.0)),
        );
        let mesh = scene.add_object(box_object("Box", [0.0; 3], [1.0; 3]));

        let bounds = BoundsComputer::compute(&scene, &[empty, mesh]);
        assert_eq!(bounds.max, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_flat_plane_has_placement_size() {
        let mut scene = Scene::default();
        let point = scene.add_object(box_object("Point", [2.0; 3], [2.0; 3]));
        let bounds = BoundsComputer::compute(&scene, &[point]);
        assert_eq!(bounds.size(), 0.0);
        assert_eq!(bounds.center(), Vector3::new(2.0, 2.0, 2.0));
        assert!(bounds.placement_size() > 0.0);
    }

    #[test]
    fn test_every_corner_inside_and_center_is_midpoint() {
        let mut rng = rand::rng();

        for _ in 0..20 {
            let mut scene = Scene::default();
            let mut ids = Vec::new();
            for i in 0..rng.random_range(1..6) {
                let min = [
                    rng.random_range(-5.0..0.0),
                    rng.random_range(-5.0..0.0),
                    rng.random_range(-5.0..0.0),
                ];
                let max = [
                    rng.random_range(0.0..5.0),
                    rng.random_range(0.0..5.0),
                    rng.random_range(0.0..5.0),
                ];
                let object = box_object(&format!("Box{i}"), min, max)
                    .with_location(Vector3::new(
                        rng.random_range(-20.0..20.0),
                        rng.random_range(-20.0..20.0),
                        rng.random_range(-20.0..20.0),
                    ))
                    .with_rotation(Vector3::new(
                        rng.random_range(-3.0..3.0),
                        rng.random_range(-3.0..3.0),
                        rng.random_range(-3.0..3.0),
                    ))
                    .with_scale(Vector3::new(
                        rng.random_range(0.1..3.0),
                        rng.random_range(0.1..3.0),
                        rng.random_range(0.1..3.0),
                    ));
                ids.push(scene.add_object(object));
            }

            let bounds = BoundsComputer::compute(&scene, &ids);
            for &id in &ids {
                for corner in BoundsComputer::world_corners(&scene, id) {
                    assert!(bounds.contains(corner, 0.0));
                }
            }
            assert_eq!(bounds.center(), (bounds.min + bounds.max) / 2.0);
            assert!(bounds.size().is_finite());
        }
    }
}
