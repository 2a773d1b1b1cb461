use cgmath::Vector3;

use super::GeometryData;
use crate::gfx::scene::{ObjectId, Scene, SceneObject};

/// Name of the primitive added to scenes without any mesh
pub const FALLBACK_CUBE_NAME: &str = "TurntableCube";
/// Edge length of the fallback primitive
pub const FALLBACK_CUBE_SIZE: f32 = 2.0;

/// Generates a cube centered on the origin
///
/// # Arguments
/// * `size` - Edge length
pub fn generate_cube(size: f32) -> GeometryData {
    let h = size / 2.0;

    #[rustfmt::skip]
    let vertices = vec![
        [-h, -h, -h], [ h, -h, -h], [ h,  h, -h], [-h,  h, -h],
        [-h, -h,  h], [ h, -h,  h], [ h,  h,  h], [-h,  h,  h],
    ];

    #[rustfmt::skip]
    let indices = vec![
        // Bottom (-Z)
        0, 2, 1,  0, 3, 2,
        // Top (+Z)
        4, 5, 6,  4, 6, 7,
        // Front (-Y)
        0, 1, 5,  0, 5, 4,
        // Back (+Y)
        3, 7, 6,  3, 6, 2,
        // Left (-X)
        0, 4, 7,  0, 7, 3,
        // Right (+X)
        1, 2, 6,  1, 6, 5,
    ];

    GeometryData { vertices, indices }
}

/// Adds the fallback cube at the origin so an empty scene still has a subject
pub fn add_fallback_cube(scene: &mut Scene) -> ObjectId {
    let mesh = generate_cube(FALLBACK_CUBE_SIZE).to_mesh_data(Vec::new());
    scene.add_object(
        SceneObject::mesh(FALLBACK_CUBE_NAME, mesh).with_location(Vector3::new(0.0, 0.0, 0.0)),
    )
}
