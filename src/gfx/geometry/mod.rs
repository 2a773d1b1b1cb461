//! # Geometry
//!
//! Vertex data is only needed long enough to derive a mesh's local bounding box;
//! the renderer reloads full geometry from the source asset. [`GeometryData`]
//! holds positions and triangle indices from an importer or a procedural
//! primitive and turns them into [`MeshData`].
//!
//! ## Usage
//!
//! ```rust
//! use turntable::gfx::geometry::generate_cube;
//!
//! let cube = generate_cube(2.0);
//! assert_eq!(cube.extents(), Some(([-1.0; 3], [1.0; 3])));
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::{resources::MaterialId, scene::MeshData};

/// Positions and triangle indices of one mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds geometry from a flat `[x, y, z, x, y, z, ...]` position buffer
    pub fn from_flat_positions(positions: &[f32], indices: Vec<u32>) -> Self {
        Self {
            vertices: positions
                .chunks_exact(3)
                .map(|p| [p[0], p[1], p[2]])
                .collect(),
            indices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Component-wise min and max of all vertices
    pub fn extents(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(mut min, mut max), v| {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
            (min, max)
        }))
    }

    /// Mesh payload with this geometry's bounding box
    ///
    /// Geometry without vertices gets a zero-size box at the origin.
    pub fn to_mesh_data(&self, materials: Vec<MaterialId>) -> MeshData {
        let (min, max) = self.extents().unwrap_or(([0.0; 3], [0.0; 3]));
        MeshData::from_extents(min, max, materials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extents_from_flat_positions() {
        let geometry = GeometryData::from_flat_positions(
            &[0.0, 1.0, 2.0, -3.0, 4.0, 0.5, 1.0, -1.0, 1.0],
            vec![0, 1, 2],
        );

        assert_eq!(geometry.vertex_count(), 3);
        assert_eq!(geometry.triangle_count(), 1);
        assert_eq!(geometry.extents(), Some(([-3.0, -1.0, 0.5], [1.0, 4.0, 2.0])));
    }

    #[test]
    fn test_empty_geometry_has_no_extents() {
        let geometry = GeometryData::new();
        assert_eq!(geometry.extents(), None);
        let mesh = geometry.to_mesh_data(Vec::new());
        assert!(mesh.bound_box.iter().all(|c| c.x == 0.0 && c.y == 0.0 && c.z == 0.0));
    }
}
