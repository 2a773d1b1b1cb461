use cgmath::{InnerSpace, Vector3};
use serde::{Deserialize, Serialize};

/// Focal length chosen to keep perspective distortion low on product shots
pub const PRODUCT_FOCAL_LENGTH_MM: f32 = 85.0;

/// Full-frame sensor width used to relate focal length and field of view
pub const SENSOR_WIDTH_MM: f32 = 36.0;

/// Camera payload of a scene object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraData {
    /// Focal length in millimetres (35mm-equivalent)
    pub lens_mm: f32,
    pub sensor_width_mm: f32,
    pub clip_start: f32,
    pub clip_end: f32,
}

impl Default for CameraData {
    fn default() -> Self {
        Self {
            lens_mm: 50.0,
            sensor_width_mm: SENSOR_WIDTH_MM,
            clip_start: 0.1,
            clip_end: 1000.0,
        }
    }
}

impl CameraData {
    pub fn with_lens(lens_mm: f32) -> Self {
        Self {
            lens_mm,
            ..Self::default()
        }
    }

    /// Camera with the lens matching a horizontal field of view
    pub fn from_fov(fov: f32) -> Self {
        let half = (fov / 2.0).tan().max(f32::EPSILON);
        Self::with_lens(SENSOR_WIDTH_MM / (2.0 * half))
    }

    /// Horizontal field of view in radians
    pub fn fov(&self) -> f32 {
        2.0 * (self.sensor_width_mm / (2.0 * self.lens_mm)).atan()
    }
}

/// Euler rotation (XYZ, radians) that points a camera's -Z axis along
/// `direction` while keeping it level, with world Z up
pub fn look_rotation(direction: Vector3<f32>) -> Vector3<f32> {
    if direction.magnitude2() <= f32::EPSILON {
        return Vector3::new(0.0, 0.0, 0.0);
    }
    let d = direction.normalize();
    let pitch = (-d.z).clamp(-1.0, 1.0).acos();
    let yaw = d.y.atan2(d.x) - std::f32::consts::FRAC_PI_2;
    Vector3::new(pitch, 0.0, yaw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::Transform;
    use cgmath::{Transform as _, Vector3};
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_fov_round_trips_through_lens() {
        let camera = CameraData::with_lens(PRODUCT_FOCAL_LENGTH_MM);
        let again = CameraData::from_fov(camera.fov());
        assert!((again.lens_mm - PRODUCT_FOCAL_LENGTH_MM).abs() < 1e-3);
    }

    #[test]
    fn test_look_rotation_toward_positive_y_is_level() {
        let rotation = look_rotation(Vector3::new(0.0, 1.0, 0.0));
        assert!((rotation.x - FRAC_PI_2).abs() < 1e-6);
        assert!(rotation.z.abs() < 1e-6);

        let matrix = Transform {
            rotation,
            ..Transform::default()
        }
        .matrix();
        let forward = matrix.transform_vector(Vector3::new(0.0, 0.0, -1.0));
        assert!((forward - Vector3::new(0.0, 1.0, 0.0)).magnitude() < 1e-5);
        let up = matrix.transform_vector(Vector3::new(0.0, 1.0, 0.0));
        assert!((up - Vector3::new(0.0, 0.0, 1.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_look_rotation_aims_along_any_heading() {
        for direction in [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(2.0, 2.0, -1.0),
            Vector3::new(-0.3, -4.0, 1.5),
        ] {
            let matrix = Transform {
                rotation: look_rotation(direction),
                ..Transform::default()
            }
            .matrix();

            let forward = matrix.transform_vector(Vector3::new(0.0, 0.0, -1.0));
            assert!(
                (forward - direction.normalize()).magnitude() < 1e-5,
                "aimed {direction:?}, got {forward:?}"
            );
            // Level: the camera's X axis stays horizontal
            let right = matrix.transform_vector(Vector3::new(1.0, 0.0, 0.0));
            assert!(right.z.abs() < 1e-5);
        }
    }
}
